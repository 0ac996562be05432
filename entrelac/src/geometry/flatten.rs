use crate::geometry::math::dist_point_to_seg_sq;
use crate::geometry::tolerance::MAX_FLATTEN_DEPTH;
use crate::model::Point;

/// Control polygon of one cubic piece plus its subdivision depth.
#[derive(Clone, Copy)]
struct Piece {
    pts: [Point; 4],
    depth: u32,
}

impl Piece {
    fn is_flat(&self, tol_sq: f64) -> bool {
        let [a, b, c, d] = self.pts;
        dist_point_to_seg_sq(b, a, d).max(dist_point_to_seg_sq(c, a, d)) <= tol_sq
    }

    /// de Casteljau split at `t = 0.5`.
    fn halves(&self) -> (Piece, Piece) {
        let mid = |u: Point, v: Point| (u + v) * 0.5;
        let [a, b, c, d] = self.pts;
        let (ab, bc, cd) = (mid(a, b), mid(b, c), mid(c, d));
        let (abc, bcd) = (mid(ab, bc), mid(bc, cd));
        let centre = mid(abc, bcd);
        let depth = self.depth + 1;
        (
            Piece { pts: [a, ab, abc, centre], depth },
            Piece { pts: [centre, bcd, cd, d], depth },
        )
    }
}

/// Appends a polyline for the cubic `p0..p3` to `out`, leaving `p0` out.
/// Every emitted point lies on the curve; chords stay within `tol` of it.
pub fn flatten_cubic(out: &mut Vec<Point>, p0: Point, p1: Point, p2: Point, p3: Point, tol: f64) {
    let tol_sq = tol * tol;
    // Right halves are pushed first so pieces pop in curve order.
    let mut work = vec![Piece { pts: [p0, p1, p2, p3], depth: 0 }];
    while let Some(piece) = work.pop() {
        if piece.depth > MAX_FLATTEN_DEPTH || piece.is_flat(tol_sq) {
            out.push(piece.pts[3]);
            continue;
        }
        let (left, right) = piece.halves();
        work.push(right);
        work.push(left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_cubic_is_one_chord() {
        let mut out = Vec::new();
        let (a, d) = (Point::new(0.0, 0.0), Point::new(9.0, 0.0));
        flatten_cubic(&mut out, a, Point::new(3.0, 0.0), Point::new(6.0, 0.0), d, 0.1);
        assert_eq!(out, vec![d]);
    }

    #[test]
    fn bent_cubic_is_ordered_along_x() {
        let mut out = Vec::new();
        let d = Point::new(10.0, 0.0);
        flatten_cubic(&mut out, Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 10.0), d, 0.01);
        assert!(out.len() > 4);
        assert_eq!(out.last().copied(), Some(d));
        assert!(out.windows(2).all(|w| w[0].x < w[1].x));
    }
}
