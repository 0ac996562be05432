pub mod model;
pub mod error;
pub mod geometry {
    pub mod flatten;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod entrelac;
}
pub mod grp;
pub mod json;

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use algorithms::entrelac::{EntrelacOptions, TraceObserver};
pub use error::{GrpError, OptionsError};
pub use model::{Arc, ArcId, CubicCurve, Entrelac, Node, NodeId, Point};

/// Owns every node and arc. Iteration follows creation order.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) arcs: BTreeMap<ArcId, Arc>,
}

pub struct NodeArrays {
    pub ids: Vec<u64>,
    pub positions: Vec<f64>, // x,y per node
}

pub struct ArcArrays {
    pub ids: Vec<u64>,
    pub endpoints: Vec<u64>, // src,dst per arc
    pub positions: Vec<f64>, // sx,sy,dx,dy per arc
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.arcs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Nodes
    /// Non-finite coordinates are stored as `0` so every graph can be saved and reloaded.
    pub fn add_node(&mut self, position: Point) -> NodeId {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let node = Node::new(Point::new(finite(position.x), finite(position.y)));
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        if !position.is_finite() {
            return false;
        }
        match self.nodes.get_mut(&id) {
            Some(n) => {
                n.position = position;
                true
            }
            None => false,
        }
    }

    /// Removes the node and every arc that touches it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.disconnect_all(id);
        self.nodes.remove(&id).is_some()
    }

    /// Removes the node nearest to `position` (Manhattan distance); ties go to
    /// the earliest-created node.
    pub fn remove_node_at(&mut self, position: Point) -> bool {
        let mut closest: Option<(NodeId, f64)> = None;
        for n in self.nodes.values() {
            let d = geometry::math::manhattan(position, n.position());
            if closest.map_or(true, |(_, best)| d < best) {
                closest = Some((n.id(), d));
            }
        }
        match closest {
            Some((id, _)) => self.remove_node(id),
            None => false,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // Arcs
    /// Links two existing nodes, possibly the same one. `None` for an unknown id.
    pub fn connect(&mut self, src: NodeId, dst: NodeId) -> Option<ArcId> {
        if !self.nodes.contains_key(&src) || !self.nodes.contains_key(&dst) {
            return None;
        }
        let arc = Arc::new(src, dst);
        let id = arc.id();
        if let Some(n) = self.nodes.get_mut(&src) {
            n.attach(id);
        }
        if let Some(n) = self.nodes.get_mut(&dst) {
            n.attach(id);
        }
        self.arcs.insert(id, arc);
        Some(id)
    }

    /// Connects each consecutive pair; one entry per pair, in order.
    pub fn connect_chain(&mut self, nodes: &[NodeId]) -> Vec<Option<ArcId>> {
        nodes.windows(2).map(|w| self.connect(w[0], w[1])).collect()
    }

    pub fn disconnect(&mut self, id: ArcId) -> bool {
        let Some(arc) = self.arcs.remove(&id) else {
            return false;
        };
        if let Some(n) = self.nodes.get_mut(&arc.src()) {
            n.detach(id);
        }
        if let Some(n) = self.nodes.get_mut(&arc.dst()) {
            n.detach(id);
        }
        true
    }

    fn disconnect_matching(&mut self, pred: impl Fn(&Arc) -> bool) -> usize {
        let doomed: Vec<ArcId> = self.arcs.values().filter(|a| pred(*a)).map(|a| a.id()).collect();
        doomed.into_iter().filter(|id| self.disconnect(*id)).count()
    }

    /// Removes arcs stored with `node` as destination.
    pub fn disconnect_incoming(&mut self, node: NodeId) -> usize {
        self.disconnect_matching(|a| a.dst() == node)
    }

    /// Removes arcs stored with `node` as source.
    pub fn disconnect_exiting(&mut self, node: NodeId) -> usize {
        self.disconnect_matching(|a| a.src() == node)
    }

    pub fn disconnect_all(&mut self, node: NodeId) -> usize {
        self.disconnect_matching(|a| a.touches(node))
    }

    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(&id)
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> + '_ {
        self.arcs.values()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn arc_endpoints(&self, id: ArcId) -> Option<(Point, Point)> {
        let a = self.arcs.get(&id)?;
        let s = self.nodes.get(&a.src())?;
        let d = self.nodes.get(&a.dst())?;
        Some((s.position(), d.position()))
    }

    pub fn node_arrays(&self) -> NodeArrays {
        let mut ids = Vec::with_capacity(self.nodes.len());
        let mut positions = Vec::with_capacity(self.nodes.len() * 2);
        for n in self.nodes.values() {
            ids.push(n.id().get());
            positions.push(n.position().x);
            positions.push(n.position().y);
        }
        NodeArrays { ids, positions }
    }

    pub fn arc_arrays(&self) -> ArcArrays {
        let mut ids = Vec::with_capacity(self.arcs.len());
        let mut endpoints = Vec::with_capacity(self.arcs.len() * 2);
        let mut positions = Vec::with_capacity(self.arcs.len() * 4);
        for a in self.arcs.values() {
            let Some((s, d)) = self.arc_endpoints(a.id()) else { continue };
            ids.push(a.id().get());
            endpoints.push(a.src().get());
            endpoints.push(a.dst().get());
            positions.extend_from_slice(&[s.x, s.y, d.x, d.y]);
        }
        ArcArrays { ids, endpoints, positions }
    }

    // Interlace
    pub fn entrelacs(&self) -> Vec<Entrelac> {
        self.entrelacs_with(&EntrelacOptions::default())
    }

    pub fn entrelacs_with(&self, options: &EntrelacOptions) -> Vec<Entrelac> {
        algorithms::entrelac::generate(self, options)
    }

    pub fn entrelacs_traced(
        &self,
        options: &EntrelacOptions,
        observer: &mut dyn TraceObserver,
    ) -> Vec<Entrelac> {
        algorithms::entrelac::generate_traced(self, options, observer)
    }

    // .grp text format
    /// Replaces the contents with the graph read from `input`. The graph is
    /// cleared first and stays empty if reading fails.
    pub fn parse<R: BufRead>(&mut self, input: R) -> Result<(), GrpError> {
        grp::parse_into(self, input)
    }

    pub fn save<W: Write>(&self, output: W) -> std::io::Result<()> {
        grp::write_grp(self, output)
    }

    pub fn from_grp_str(text: &str) -> Result<Graph, GrpError> {
        let mut g = Graph::new();
        g.parse(text.as_bytes())?;
        Ok(g)
    }

    pub fn to_grp_string(&self) -> String {
        grp::to_grp_text(self)
    }
}
