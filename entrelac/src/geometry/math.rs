use std::f64::consts::{PI, TAU};

use super::tolerance::safe_div;
use crate::model::Point;

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// |dx| + |dy|
pub fn manhattan(a: Point, b: Point) -> f64 {
    (b.x - a.x).abs() + (b.y - a.y).abs()
}

/// Angle of `to - from` against the x axis, in `[0, 2π)`.
pub fn direction_angle(from: Point, to: Point) -> f64 {
    let ang = (to.y - from.y).atan2(to.x - from.x);
    if ang < 0.0 {
        // -0.0 and tiny negatives would otherwise round up to exactly TAU
        let wrapped = ang + TAU;
        if wrapped >= TAU { 0.0 } else { wrapped }
    } else {
        ang
    }
}

/// Counter-clockwise sweep from `reference` to `angle`, in `[0, 2π)`.
pub fn ccw_offset(reference: f64, angle: f64) -> f64 {
    let d = angle - reference;
    let d = if d < 0.0 { d + TAU } else { d };
    if d >= TAU { d - TAU } else { d }
}

/// Maps `x` linearly from `[min_x, max_x]` onto `[to_min, to_max]`.
pub fn lerp_range(x: f64, min_x: f64, max_x: f64, to_min: f64, to_max: f64) -> f64 {
    to_min + safe_div((x - min_x) * (to_max - to_min), max_x - min_x, 0.0)
}

/// `[0, π] -> [0, 1]`, `(π, 2π] -> (1, 3]`.
pub fn adaptive_scale(turn: f64) -> f64 {
    if turn <= PI {
        lerp_range(turn, 0.0, PI, 0.0, 1.0)
    } else {
        lerp_range(turn, PI, TAU, 1.0, 3.0)
    }
}

pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let v = b - a;
    let w = p - a;
    let vv = v.x*v.x + v.y*v.y;
    let mut t = if vv > 0.0 { (w.x*v.x + w.y*v.y) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let proj = a + v * t;
    let d = p - proj;
    (d.x*d.x + d.y*d.y, t)
}

pub fn dist_point_to_seg_sq(p: Point, a: Point, b: Point) -> f64 {
    let (d2, _) = seg_distance_sq(p, a, b);
    d2
}

pub fn cubic_point(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let u = 1.0 - t;
    let tt = t*t; let uu = u*u;
    let uuu = uu*u; let ttt = tt*t;
    let x = uuu*p0.x + 3.0*uu*t*p1.x + 3.0*u*tt*p2.x + ttt*p3.x;
    let y = uuu*p0.y + 3.0*uu*t*p1.y + 3.0*u*tt*p2.y + ttt*p3.y;
    Point::new(x, y)
}
