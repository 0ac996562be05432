//! Interlace generation.
//!
//! Every arc starts with a traversal budget. Paths are walked from arc
//! midpoint to arc midpoint, turning around the shared node; at each pivot the
//! next arc is the angular neighbour of the current one, and the sense used to
//! pick that neighbour alternates on every step so consecutive strands pass
//! over and under each other. A path ends when it comes back to its start
//! midpoint or when every budget is spent.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::geometry::math::{adaptive_scale, ccw_offset, direction_angle, midpoint};
use crate::geometry::tolerance::EPS_POS;
use crate::model::{ArcId, CubicCurve, Entrelac, NodeId, Point};
use crate::Graph;

/// Initial traversal budget of every arc. Not derived from node degree.
pub const ARC_CAPACITY: u8 = 4;

// The control-point reflection is a fixed quarter turn.
const REFLECT_COS: f64 = 0.0;
const REFLECT_SIN: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn flipped(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrelacOptions {
    /// Traversal budget given to each arc at the start of a run.
    pub arc_capacity: u8,
    /// Hard cap on segments per path; `None` derives one from the graph size.
    pub max_steps_per_path: Option<usize>,
}

impl Default for EntrelacOptions {
    fn default() -> Self {
        Self { arc_capacity: ARC_CAPACITY, max_steps_per_path: None }
    }
}

impl EntrelacOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.arc_capacity == 0 {
            return Err(OptionsError::ZeroCapacity);
        }
        if self.max_steps_per_path == Some(0) {
            return Err(OptionsError::ZeroStepGuard);
        }
        Ok(())
    }

    /// Parses and validates options; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        let opts: EntrelacOptions = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    fn capacity(&self) -> u8 {
        self.arc_capacity.max(1)
    }

    fn step_guard(&self, arc_count: usize) -> usize {
        match self.max_steps_per_path {
            Some(n) => n.max(1),
            None => 4usize
                .saturating_mul(self.capacity() as usize)
                .saturating_mul(arc_count)
                .saturating_add(8),
        }
    }
}

/// One traversal step, as reported to a [`TraceObserver`].
#[derive(Clone, Copy, Debug)]
pub struct StepTrace {
    pub from: ArcId,
    pub to: ArcId,
    pub pivot: NodeId,
    pub rotation: Rotation,
    pub turn: f64,
    pub curve: CubicCurve,
}

/// Diagnostics hook for a generation run. All methods default to no-ops.
pub trait TraceObserver {
    fn path_started(&mut self, _start: Point) {}
    fn step(&mut self, _step: &StepTrace) {}
    fn path_finished(&mut self, _path: &Entrelac) {}
}

pub struct NoTrace;

impl TraceObserver for NoTrace {}

/// Forwards every event to `log::trace!`.
pub struct LogTrace;

impl TraceObserver for LogTrace {
    fn path_started(&mut self, start: Point) {
        log::trace!("entrelac starts at ({}, {})", start.x, start.y);
    }
    fn step(&mut self, s: &StepTrace) {
        let c = s.curve;
        log::trace!(
            "arc {:?} -> {:?} around {:?} ({:?}, turn {:.4}): ctl ({}, {}) ({}, {}) end ({}, {})",
            s.from,
            s.to,
            s.pivot,
            s.rotation,
            s.turn,
            c.src_ctl_pt().x,
            c.src_ctl_pt().y,
            c.dst_ctl_pt().x,
            c.dst_ctl_pt().y,
            c.dst_pt().x,
            c.dst_pt().y
        );
    }
    fn path_finished(&mut self, path: &Entrelac) {
        log::trace!("entrelac done: {} segments, closed={}", path.len(), path.is_closed());
    }
}

type PendingTable = BTreeMap<ArcId, u8>;

pub fn generate(graph: &Graph, options: &EntrelacOptions) -> Vec<Entrelac> {
    generate_traced(graph, options, &mut NoTrace)
}

pub fn generate_traced(
    graph: &Graph,
    options: &EntrelacOptions,
    observer: &mut dyn TraceObserver,
) -> Vec<Entrelac> {
    let capacity = options.capacity();
    let mut pending: PendingTable = graph.arcs.keys().map(|id| (*id, capacity)).collect();
    let guard = options.step_guard(pending.len());
    let mut entrelacs = Vec::new();
    loop {
        let Some((&start_arc, &remaining)) = pending.first_key_value() else { break };
        let rotation = if remaining == capacity {
            Rotation::CounterClockwise
        } else {
            Rotation::Clockwise
        };
        match trace_path(graph, &mut pending, start_arc, rotation, guard, observer) {
            Some(path) => entrelacs.push(path),
            None => {
                // Arc table and pending table disagree; drop the stray entry.
                pending.remove(&start_arc);
            }
        }
    }
    log::debug!("generated {} entrelacs from {} arcs", entrelacs.len(), graph.arc_count());
    entrelacs
}

fn position(graph: &Graph, node: NodeId) -> Option<Point> {
    graph.node(node).map(|n| n.position())
}

fn consume(pending: &mut PendingTable, arc: ArcId) {
    if let Some(left) = pending.get_mut(&arc) {
        *left = left.saturating_sub(1);
        if *left == 0 {
            pending.remove(&arc);
        }
    }
}

fn trace_path(
    graph: &Graph,
    pending: &mut PendingTable,
    start_arc: ArcId,
    mut rotation: Rotation,
    guard: usize,
    observer: &mut dyn TraceObserver,
) -> Option<Entrelac> {
    let first = graph.arc(start_arc)?;
    let mut trailing = first.src();
    let mut leading = first.dst();
    let mut current = start_arc;
    let start = midpoint(position(graph, trailing)?, position(graph, leading)?);
    let mut path = Entrelac::new(start);
    observer.path_started(start);
    log::debug!("entrelac from arc {:?} ({:?})", start_arc, rotation);

    let mut last: Option<(Point, Point)> = None;
    let mut steps = 0usize;
    while !pending.is_empty() {
        if let Some((seg_start, seg_end)) = last {
            // Closing only counts when the segment did not itself start on the start point.
            if !seg_start.approx_eq(start, EPS_POS) && seg_end.approx_eq(start, EPS_POS) {
                break;
            }
        }
        if steps >= guard {
            log::warn!(
                "entrelac from arc {:?} stopped after {} steps without closing",
                start_arc,
                steps
            );
            break;
        }
        steps += 1;

        let Some((next, turn)) = next_arc(graph, leading, current, rotation) else { break };
        let pivot = leading;
        let pivot_pos = position(graph, pivot)?;
        let far = graph.arc(next)?.other(pivot);
        let seg_start = midpoint(position(graph, trailing)?, pivot_pos);
        let seg_end = midpoint(pivot_pos, position(graph, far)?);
        let curve = curve_around(seg_start, seg_end, pivot_pos, turn);
        path.add_subcurve(curve);
        observer.step(&StepTrace { from: current, to: next, pivot, rotation, turn, curve });

        consume(pending, current);
        consume(pending, next);

        current = next;
        trailing = pivot;
        leading = far;
        rotation = rotation.flipped();
        last = Some((seg_start, seg_end));
    }
    observer.path_finished(&path);
    Some(path)
}

/// Picks the arc at `node` that follows `current` in the given sense.
///
/// Returns the arc and the turn swept to reach it, measured in that sense.
/// A node with a single arc sends the path straight back along it (turn `2π`).
fn next_arc(
    graph: &Graph,
    node: NodeId,
    current: ArcId,
    rotation: Rotation,
) -> Option<(ArcId, f64)> {
    let n = graph.node(node)?;
    let incident = n.arcs();
    if incident.len() <= 1 {
        return incident.first().map(|a| (*a, TAU));
    }
    let here = n.position();
    let back = position(graph, graph.arc(current)?.other(node))?;
    let reference = direction_angle(here, back);

    let mut best: Option<(ArcId, f64)> = None;
    for &cand in incident {
        if cand == current {
            continue;
        }
        let Some(far) = graph.arc(cand).and_then(|a| position(graph, a.other(node))) else {
            continue;
        };
        let offset = ccw_offset(reference, direction_angle(here, far));
        let better = match (rotation, best) {
            (_, None) => true,
            (Rotation::CounterClockwise, Some((_, b))) => offset < b,
            (Rotation::Clockwise, Some((_, b))) => offset > b,
        };
        if better {
            best = Some((cand, offset));
        }
    }
    best.map(|(arc, offset)| match rotation {
        Rotation::CounterClockwise => (arc, offset),
        Rotation::Clockwise => (arc, TAU - offset),
    })
}

fn reflect(v: Point) -> Point {
    Point::new(v.x * REFLECT_COS + v.y * REFLECT_SIN, v.y * REFLECT_COS - v.x * REFLECT_SIN)
}

fn control_point(anchor: Point, basis: Point, center: Point, scale: f64) -> Point {
    let turned = reflect(basis).normalized() * basis.length();
    let f = (anchor - center) + turned;
    let candidate = center + f.normalized() * (f.length() / 2.0);
    anchor + (candidate - anchor) * scale
}

/// Cubic from `start` to `end` bending around `center`; wider turns pull the
/// control points further out.
pub fn curve_around(start: Point, end: Point, center: Point, turn: f64) -> CubicCurve {
    let scale = adaptive_scale(turn);
    let scp = control_point(start, start - center, center, scale);
    let dcp = control_point(end, center - end, center, scale);
    CubicCurve::new(scp, dcp, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: Point, b: Point) -> bool {
        a.approx_eq(b, 1e-9)
    }

    fn star() -> (Graph, ArcId, ArcId, ArcId, ArcId, NodeId) {
        let mut g = Graph::new();
        let c = g.add_node(Point::new(0.0, 0.0));
        let e = g.add_node(Point::new(10.0, 0.0));
        let n = g.add_node(Point::new(0.0, 10.0));
        let w = g.add_node(Point::new(-10.0, 0.0));
        let s = g.add_node(Point::new(0.0, -10.0));
        let ce = g.connect(c, e).unwrap();
        let cn = g.connect(c, n).unwrap();
        let cw = g.connect(w, c).unwrap();
        let cs = g.connect(c, s).unwrap();
        (g, ce, cn, cw, cs, c)
    }

    #[test]
    fn next_arc_counterclockwise_takes_nearest_left() {
        let (g, ce, cn, _, _, c) = star();
        let (arc, turn) = next_arc(&g, c, ce, Rotation::CounterClockwise).unwrap();
        assert_eq!(arc, cn);
        assert!((turn - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn next_arc_clockwise_takes_nearest_right() {
        let (g, ce, _, _, cs, c) = star();
        let (arc, turn) = next_arc(&g, c, ce, Rotation::Clockwise).unwrap();
        assert_eq!(arc, cs);
        assert!((turn - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn next_arc_from_west_wraps_around() {
        let (g, _, _, cw, cs, c) = star();
        // west is at π; counter-clockwise the next direction is south (3π/2)
        let (arc, turn) = next_arc(&g, c, cw, Rotation::CounterClockwise).unwrap();
        assert_eq!(arc, cs);
        assert!((turn - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn next_arc_on_leaf_reverses() {
        let mut g = Graph::new();
        let a = g.add_node(Point::new(0.0, 0.0));
        let b = g.add_node(Point::new(10.0, 0.0));
        let ab = g.connect(a, b).unwrap();
        assert_eq!(next_arc(&g, b, ab, Rotation::Clockwise), Some((ab, TAU)));
    }

    #[test]
    fn next_arc_straight_through_is_half_turn() {
        let mut g = Graph::new();
        let a = g.add_node(Point::new(-10.0, 0.0));
        let b = g.add_node(Point::new(0.0, 0.0));
        let c = g.add_node(Point::new(10.0, 0.0));
        let ab = g.connect(a, b).unwrap();
        let bc = g.connect(b, c).unwrap();
        let (arc, turn) = next_arc(&g, b, ab, Rotation::CounterClockwise).unwrap();
        assert_eq!(arc, bc);
        assert!((turn - PI).abs() < 1e-12);
    }

    #[test]
    fn curve_around_quarter_turn() {
        let c = curve_around(Point::new(5.0, 0.0), Point::new(0.0, 5.0), Point::new(0.0, 0.0), FRAC_PI_2);
        assert!(close(c.src_ctl_pt(), Point::new(3.75, -1.25)), "{:?}", c);
        assert!(close(c.dst_ctl_pt(), Point::new(-1.25, 3.75)), "{:?}", c);
        assert_eq!(c.dst_pt(), Point::new(0.0, 5.0));
    }

    #[test]
    fn curve_around_zero_turn_pins_controls_to_endpoints() {
        let start = Point::new(5.0, 0.0);
        let end = Point::new(0.0, 5.0);
        let c = curve_around(start, end, Point::new(0.0, 0.0), 0.0);
        assert!(close(c.src_ctl_pt(), start));
        assert!(close(c.dst_ctl_pt(), end));
    }

    #[test]
    fn curve_around_degenerate_center_is_finite() {
        let p = Point::new(1.0, 1.0);
        let c = curve_around(p, p, p, TAU);
        assert!(c.src_ctl_pt().is_finite() && c.dst_ctl_pt().is_finite());
    }

    #[test]
    fn options_guard_and_validation() {
        assert_eq!(EntrelacOptions::default().step_guard(3), 4 * 4 * 3 + 8);
        let o = EntrelacOptions { arc_capacity: 0, max_steps_per_path: None };
        assert!(matches!(o.validate(), Err(OptionsError::ZeroCapacity)));
        let o = EntrelacOptions { arc_capacity: 2, max_steps_per_path: Some(0) };
        assert!(matches!(o.validate(), Err(OptionsError::ZeroStepGuard)));
    }

    #[test]
    fn options_from_json_fills_defaults() {
        let o = EntrelacOptions::from_json_str(r#"{"max_steps_per_path": 12}"#).unwrap();
        assert_eq!(o.arc_capacity, ARC_CAPACITY);
        assert_eq!(o.max_steps_per_path, Some(12));
        assert!(EntrelacOptions::from_json_str(r#"{"arc_capacity": 0}"#).is_err());
        assert!(EntrelacOptions::from_json_str("not json").is_err());
    }

    #[derive(Default)]
    struct Counting {
        started: usize,
        steps: usize,
        finished: usize,
    }

    impl TraceObserver for Counting {
        fn path_started(&mut self, _start: Point) {
            self.started += 1;
        }
        fn step(&mut self, _step: &StepTrace) {
            self.steps += 1;
        }
        fn path_finished(&mut self, _path: &Entrelac) {
            self.finished += 1;
        }
    }

    #[test]
    fn observer_sees_every_step() {
        let (g, ..) = star();
        let mut obs = Counting::default();
        let paths = generate_traced(&g, &EntrelacOptions::default(), &mut obs);
        assert_eq!(obs.started, paths.len());
        assert_eq!(obs.finished, paths.len());
        assert_eq!(obs.steps, paths.iter().map(|p| p.len()).sum::<usize>());
    }
}
