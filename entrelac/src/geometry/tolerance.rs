// Centralized tolerances and helpers for robust geometry

pub const EPS_POS: f64 = 1e-6;            // point coincidence threshold
pub const EPS_LEN: f64 = 1e-12;           // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for range mapping

// Adaptive flattening cap
pub const MAX_FLATTEN_DEPTH: u32 = 16;

#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn norm2(mut x: f64, mut y: f64) -> ((f64,f64), f64) {
    let len = (x*x + y*y).sqrt();
    if len > EPS_LEN { x/=len; y/=len; ((x,y), len) } else { ((0.0,0.0), 0.0) }
}

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if near_zero(den, EPS_DENOM) { fallback } else { num/den }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm2_collapses_zero_vector() {
        assert_eq!(norm2(0.0, 0.0), ((0.0, 0.0), 0.0));
        let ((x, y), len) = norm2(3.0, 4.0);
        assert!(approx_eq(len, 5.0, 1e-12));
        assert!(approx_eq(x, 0.6, 1e-12) && approx_eq(y, 0.8, 1e-12));
    }

    #[test]
    fn safe_div_falls_back_on_zero_denominator() {
        assert_eq!(safe_div(1.0, 0.0, 7.0), 7.0);
        assert_eq!(safe_div(1.0, 2.0, 7.0), 0.5);
    }
}
