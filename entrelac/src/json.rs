//! Read-only JSON views handed to renderers. Graphs are only persisted as `.grp` text.

use serde::Serialize;
use serde_json::Value;

use crate::model::{CubicCurve, Entrelac, Point};
use crate::Graph;

pub const SNAPSHOT_VERSION: u32 = 1;

pub fn graph_snapshot_json(g: &Graph) -> Value {
    #[derive(Serialize)]
    struct NodeSer {
        id: u64,
        x: f64,
        y: f64,
    }
    #[derive(Serialize)]
    struct ArcSer {
        id: u64,
        src: u64,
        dst: u64,
    }
    #[derive(Serialize)]
    struct Doc {
        version: u32,
        nodes: Vec<NodeSer>,
        arcs: Vec<ArcSer>,
    }
    let nodes = g
        .nodes()
        .map(|n| NodeSer { id: n.id().get(), x: n.position().x, y: n.position().y })
        .collect();
    let arcs = g
        .arcs()
        .map(|a| ArcSer { id: a.id().get(), src: a.src().get(), dst: a.dst().get() })
        .collect();
    serde_json::to_value(Doc { version: SNAPSHOT_VERSION, nodes, arcs }).unwrap_or(Value::Null)
}

pub fn entrelacs_to_json(paths: &[Entrelac]) -> Value {
    #[derive(Serialize)]
    struct PathSer<'a> {
        start: Point,
        closed: bool,
        curves: &'a [CubicCurve],
    }
    let ser: Vec<PathSer> = paths
        .iter()
        .map(|p| PathSer { start: p.start(), closed: p.is_closed(), curves: p.subcurves() })
        .collect();
    serde_json::to_value(ser).unwrap_or(Value::Null)
}
