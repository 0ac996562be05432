use entrelac::algorithms::entrelac::EntrelacOptions;
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Graph {
    pub(crate) inner: entrelac::Graph,
    pub(crate) options: EntrelacOptions,
}

impl Graph {
    pub fn rs_new() -> Graph {
        Graph { inner: entrelac::Graph::new(), options: EntrelacOptions::default() }
    }
}
