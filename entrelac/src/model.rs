use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};
use std::sync::atomic::{AtomicU64, Ordering};

// Shared by nodes and arcs so that no identity is ever handed out twice in a process.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_raw_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcId(u64);

impl NodeId {
    pub(crate) fn fresh() -> Self {
        NodeId(next_raw_id())
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl ArcId {
    pub(crate) fn fresh() -> Self {
        ArcId(next_raw_id())
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> u64 {
        id.0
    }
}

impl From<ArcId> for u64 {
    fn from(id: ArcId) -> u64 {
        id.0
    }
}

// Only ids that were handed out by a graph resolve to anything, so building
// one from a raw value is harmless: unknown values simply miss on lookup.
impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        NodeId(raw)
    }
}

impl From<u64> for ArcId {
    fn from(raw: u64) -> Self {
        ArcId(raw)
    }
}

/// A point (or vector) in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction; vectors shorter than `EPS_LEN` collapse to zero.
    pub fn normalized(self) -> Point {
        let ((x, y), _) = crate::geometry::tolerance::norm2(self.x, self.y);
        Point { x, y }
    }

    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        use crate::geometry::tolerance::approx_eq;
        approx_eq(self.x, other.x, eps) && approx_eq(self.y, other.y, eps)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) position: Point,
    pub(crate) arcs: Vec<ArcId>, // incident arcs, attach order, no duplicates
}

impl Node {
    pub(crate) fn new(position: Point) -> Self {
        Node { id: NodeId::fresh(), position, arcs: Vec::new() }
    }
    pub fn id(&self) -> NodeId {
        self.id
    }
    pub fn position(&self) -> Point {
        self.position
    }
    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }
    pub fn degree(&self) -> usize {
        self.arcs.len()
    }

    pub(crate) fn attach(&mut self, arc: ArcId) -> bool {
        if self.arcs.contains(&arc) {
            return false;
        }
        self.arcs.push(arc);
        true
    }

    pub(crate) fn detach(&mut self, arc: ArcId) -> bool {
        match self.arcs.iter().position(|a| *a == arc) {
            Some(i) => {
                self.arcs.remove(i);
                true
            }
            None => false,
        }
    }
}

/// Undirected link between two nodes. The stored `src`/`dst` order only matters
/// to `disconnect_incoming` / `disconnect_exiting`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arc {
    pub(crate) id: ArcId,
    pub(crate) src: NodeId,
    pub(crate) dst: NodeId,
}

impl Arc {
    pub(crate) fn new(src: NodeId, dst: NodeId) -> Self {
        Arc { id: ArcId::fresh(), src, dst }
    }
    pub fn id(&self) -> ArcId {
        self.id
    }
    pub fn src(&self) -> NodeId {
        self.src
    }
    pub fn dst(&self) -> NodeId {
        self.dst
    }
    pub fn touches(&self, node: NodeId) -> bool {
        self.src == node || self.dst == node
    }
    /// The endpoint that is not `node`. Returns `src` when `node` is not an endpoint.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.src == node {
            self.dst
        } else {
            self.src
        }
    }
}

/// One cubic segment; its start is the end of the previous segment (or the path start).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicCurve {
    src_ctl: Point,
    dst_ctl: Point,
    end: Point,
}

impl CubicCurve {
    pub fn new(src_ctl: Point, dst_ctl: Point, end: Point) -> Self {
        Self { src_ctl, dst_ctl, end }
    }
    pub fn src_ctl_pt(&self) -> Point {
        self.src_ctl
    }
    pub fn dst_ctl_pt(&self) -> Point {
        self.dst_ctl
    }
    pub fn dst_pt(&self) -> Point {
        self.end
    }
}

/// A generated interlace strand: a start point followed by cubic segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entrelac {
    start: Point,
    subcurves: Vec<CubicCurve>,
}

impl Entrelac {
    pub(crate) fn new(start: Point) -> Self {
        Self { start, subcurves: Vec::new() }
    }

    pub(crate) fn add_subcurve(&mut self, curve: CubicCurve) {
        self.subcurves.push(curve);
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn subcurves(&self) -> &[CubicCurve] {
        &self.subcurves
    }

    pub fn len(&self) -> usize {
        self.subcurves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subcurves.is_empty()
    }

    /// Last segment's end point, or the start for an empty path.
    pub fn end(&self) -> Point {
        self.subcurves.last().map_or(self.start, |c| c.dst_pt())
    }

    pub fn is_closed(&self) -> bool {
        !self.subcurves.is_empty()
            && self.end().approx_eq(self.start, crate::geometry::tolerance::EPS_POS)
    }

    /// Point at parameter `t` in `[0, 1]` of segment `index`.
    pub fn point_at(&self, index: usize, t: f64) -> Option<Point> {
        let c = self.subcurves.get(index)?;
        let from = match index {
            0 => self.start,
            _ => self.subcurves[index - 1].dst_pt(),
        };
        let t = t.clamp(0.0, 1.0);
        Some(crate::geometry::math::cubic_point(t, from, c.src_ctl_pt(), c.dst_ctl_pt(), c.dst_pt()))
    }

    /// Polyline approximation of the whole path, starting with `start()`.
    pub fn flatten(&self, tol: f64) -> Vec<Point> {
        let mut points = vec![self.start];
        let mut from = self.start;
        for c in &self.subcurves {
            crate::geometry::flatten::flatten_cubic(
                &mut points,
                from,
                c.src_ctl_pt(),
                c.dst_ctl_pt(),
                c.dst_pt(),
                tol,
            );
            from = c.dst_pt();
        }
        points
    }
}
