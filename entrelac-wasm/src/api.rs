use crate::Graph;
use crate::error;
use entrelac::algorithms::entrelac::EntrelacOptions;
use entrelac::{ArcId, NodeId, Point};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `log` output to the browser console. Returns false when a logger is already set
/// or the level name is unknown.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    match level.parse::<log::Level>() {
        Ok(lvl) => console_log::init_with_level(lvl).is_ok(),
        Err(_) => false,
    }
}

fn raw_id(id: f64) -> Option<u64> {
    if id.is_finite() && id >= 0.0 && id.fract() == 0.0 && id <= u64::MAX as f64 {
        Some(id as u64)
    } else {
        None
    }
}

impl Graph {
    fn node_id(&self, id: f64) -> Option<NodeId> {
        raw_id(id).map(NodeId::from).filter(|n| self.inner.node(*n).is_some())
    }
    fn arc_id(&self, id: f64) -> Option<ArcId> {
        raw_id(id).map(ArcId::from).filter(|a| self.inner.arc(*a).is_some())
    }
}

#[wasm_bindgen]
impl Graph {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Graph {
        crate::Graph::rs_new()
    }

    // Nodes
    pub fn add_node(&mut self, x: f64, y: f64) -> f64 {
        self.inner.add_node(Point::new(x, y)).get() as f64
    }
    pub fn add_node_res(&mut self, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        error::ok(JsValue::from_f64(self.add_node(x, y)))
    }
    pub fn move_node(&mut self, id: f64, x: f64, y: f64) -> bool {
        match self.node_id(id) {
            Some(n) => self.inner.move_node(n, Point::new(x, y)),
            None => false,
        }
    }
    pub fn move_node_res(&mut self, id: f64, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.node_id(id).is_none() {
            return error::invalid_id("node", id);
        }
        error::ok(JsValue::from_bool(self.move_node(id, x, y)))
    }
    pub fn get_node(&self, id: f64) -> JsValue {
        match self.node_id(id).and_then(|n| self.inner.node(n)) {
            Some(n) => {
                let p = n.position();
                serde_wasm_bindgen::to_value(&[p.x, p.y]).unwrap_or(JsValue::NULL)
            }
            None => JsValue::NULL,
        }
    }
    pub fn remove_node(&mut self, id: f64) -> bool {
        match self.node_id(id) {
            Some(n) => self.inner.remove_node(n),
            None => false,
        }
    }
    pub fn remove_node_res(&mut self, id: f64) -> JsValue {
        if self.node_id(id).is_none() {
            return error::invalid_id("node", id);
        }
        error::ok(JsValue::from_bool(self.remove_node(id)))
    }
    pub fn remove_node_at(&mut self, x: f64, y: f64) -> bool {
        self.inner.remove_node_at(Point::new(x, y))
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    // Arcs
    pub fn connect(&mut self, src: f64, dst: f64) -> Option<f64> {
        let (a, b) = (self.node_id(src)?, self.node_id(dst)?);
        self.inner.connect(a, b).map(|e| e.get() as f64)
    }
    pub fn connect_res(&mut self, src: f64, dst: f64) -> JsValue {
        if self.node_id(src).is_none() {
            return error::invalid_id("node", src);
        }
        if self.node_id(dst).is_none() {
            return error::invalid_id("node", dst);
        }
        match self.connect(src, dst) {
            Some(eid) => error::ok(JsValue::from_f64(eid)),
            None => error::invalid_id("node", src),
        }
    }
    /// Connects consecutive ids; the result holds one arc id (or NaN) per pair.
    pub fn connect_chain(&mut self, ids: &[f64]) -> Vec<f64> {
        ids.windows(2)
            .map(|w| self.connect(w[0], w[1]).unwrap_or(f64::NAN))
            .collect()
    }
    pub fn disconnect(&mut self, id: f64) -> bool {
        match self.arc_id(id) {
            Some(a) => self.inner.disconnect(a),
            None => false,
        }
    }
    pub fn disconnect_res(&mut self, id: f64) -> JsValue {
        if self.arc_id(id).is_none() {
            return error::invalid_id("arc", id);
        }
        error::ok(JsValue::from_bool(self.disconnect(id)))
    }
    pub fn disconnect_incoming(&mut self, node: f64) -> u32 {
        self.node_id(node).map_or(0, |n| self.inner.disconnect_incoming(n) as u32)
    }
    pub fn disconnect_exiting(&mut self, node: f64) -> u32 {
        self.node_id(node).map_or(0, |n| self.inner.disconnect_exiting(n) as u32)
    }
    pub fn disconnect_all(&mut self, node: f64) -> u32 {
        self.node_id(node).map_or(0, |n| self.inner.disconnect_all(n) as u32)
    }
    pub fn arc_count(&self) -> u32 {
        self.inner.arc_count() as u32
    }

    // Typed arrays getters
    pub fn get_node_data(&self) -> JsValue {
        let na = self.inner.node_arrays();
        let obj = crate::interop::new_obj();
        crate::interop::set_kv(&obj, "ids", &crate::interop::ids_f64(&na.ids).into());
        crate::interop::set_kv(&obj, "positions", &crate::interop::arr_f64(&na.positions).into());
        obj.into()
    }
    pub fn get_arc_data(&self) -> JsValue {
        let aa = self.inner.arc_arrays();
        let obj = crate::interop::new_obj();
        crate::interop::set_kv(&obj, "ids", &crate::interop::ids_f64(&aa.ids).into());
        crate::interop::set_kv(&obj, "endpoints", &crate::interop::ids_f64(&aa.endpoints).into());
        crate::interop::set_kv(&obj, "positions", &crate::interop::arr_f64(&aa.positions).into());
        obj.into()
    }

    // Generation
    pub fn entrelacs(&self) -> JsValue {
        let paths = self.inner.entrelacs_with(&self.options);
        entrelac::json::entrelacs_to_json(&paths)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(JsValue::NULL)
    }
    pub fn entrelacs_json(&self) -> String {
        let paths = self.inner.entrelacs_with(&self.options);
        entrelac::json::entrelacs_to_json(&paths).to_string()
    }
    /// Flattened polylines, one Float64Array of x,y pairs per path.
    pub fn entrelac_polylines(&self, tol: f64) -> JsValue {
        let tol = if tol.is_finite() && tol > 0.0 { tol } else { 0.25 };
        let arr = js_sys::Array::new();
        for path in self.inner.entrelacs_with(&self.options) {
            let flat: Vec<f64> = path.flatten(tol).iter().flat_map(|p| [p.x, p.y]).collect();
            arr.push(&crate::interop::arr_f64(&flat).into());
        }
        arr.into()
    }
    pub fn graph_json(&self) -> String {
        entrelac::json::graph_snapshot_json(&self.inner).to_string()
    }

    // Options
    pub fn set_options(&mut self, json: &str) -> JsValue {
        match EntrelacOptions::from_json_str(json) {
            Ok(o) => {
                self.options = o;
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::invalid_options(&e),
        }
    }
    pub fn options_json(&self) -> String {
        serde_json::to_string(&self.options).unwrap_or_default()
    }

    // .grp persistence
    pub fn load_grp(&mut self, text: &str) -> bool {
        self.inner.parse(text.as_bytes()).is_ok()
    }
    /// Leaves the current graph untouched on failure.
    pub fn load_grp_res(&mut self, text: &str) -> JsValue {
        match entrelac::Graph::from_grp_str(text) {
            Ok(g) => {
                self.inner = g;
                error::ok(JsValue::from_f64(self.inner.node_count() as f64))
            }
            Err(e) => error::parse_error(&e),
        }
    }
    pub fn save_grp(&self) -> String {
        self.inner.to_grp_string()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
