use entrelac_wasm::Graph;
use js_sys::{Array, Float64Array, Reflect};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn square(g: &mut Graph) -> Vec<f64> {
    let ids = vec![
        g.add_node(0.0, 0.0),
        g.add_node(10.0, 0.0),
        g.add_node(10.0, 10.0),
        g.add_node(0.0, 10.0),
    ];
    g.connect_chain(&[ids[0], ids[1], ids[2], ids[3], ids[0]]);
    ids
}

#[wasm_bindgen_test]
fn nodes_and_arcs_basic() {
    let mut g = Graph::new();
    let a = g.add_node(10.0, 20.0);
    let b = g.add_node(30.0, 40.0);
    assert_eq!(g.node_count(), 2);

    let va: Vec<f64> = serde_wasm_bindgen::from_value(g.get_node(a)).unwrap();
    assert_eq!(va, vec![10.0, 20.0]);

    assert!(g.move_node(b, 35.0, 45.0));
    let vb: Vec<f64> = serde_wasm_bindgen::from_value(g.get_node(b)).unwrap();
    assert_eq!(vb, vec![35.0, 45.0]);

    let e = g.connect(a, b).expect("arc id");
    assert_eq!(g.arc_count(), 1);
    assert_eq!(g.connect(a, 999_999.0), None);

    let nd = g.get_node_data();
    let n_ids = Float64Array::new(&Reflect::get(&nd, &JsValue::from_str("ids")).unwrap());
    let n_pos = Float64Array::new(&Reflect::get(&nd, &JsValue::from_str("positions")).unwrap());
    assert_eq!(n_ids.length(), 2);
    assert_eq!(n_pos.length(), 4);

    let ad = g.get_arc_data();
    let a_ids = Float64Array::new(&Reflect::get(&ad, &JsValue::from_str("ids")).unwrap());
    let a_ep = Float64Array::new(&Reflect::get(&ad, &JsValue::from_str("endpoints")).unwrap());
    assert_eq!(a_ids.length(), 1);
    assert_eq!(a_ep.to_vec(), vec![a, b]);

    assert!(g.disconnect(e));
    assert_eq!(g.arc_count(), 0);
    assert!(g.get_node(12345.0).is_null());
}

#[wasm_bindgen_test]
fn directional_disconnects_and_removal() {
    let mut g = Graph::new();
    let ids = square(&mut g);
    assert_eq!(g.disconnect_incoming(ids[1]), 1);
    assert_eq!(g.disconnect_exiting(ids[1]), 1);
    assert_eq!(g.arc_count(), 2);
    assert_eq!(g.disconnect_all(ids[3]), 2);
    assert_eq!(g.arc_count(), 0);
    assert!(g.remove_node_at(9.0, 1.0));
    assert!(g.get_node(ids[1]).is_null());
    assert!(g.remove_node(ids[0]));
    assert_eq!(g.node_count(), 2);
    g.clear();
    assert_eq!(g.node_count(), 0);
}

#[wasm_bindgen_test]
fn entrelacs_shape_and_json() {
    let mut g = Graph::new();
    square(&mut g);

    #[derive(Deserialize)]
    struct Pt {
        x: f64,
        y: f64,
    }
    #[derive(Deserialize)]
    struct Path {
        start: Pt,
        closed: bool,
        curves: Vec<serde_json::Value>,
    }
    let paths: Vec<Path> = serde_wasm_bindgen::from_value(g.entrelacs()).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!((paths[0].start.x, paths[0].start.y), (5.0, 0.0));
    assert!(paths.iter().all(|p| p.closed && p.curves.len() == 4));

    let json: Vec<Path> = serde_json::from_str(&g.entrelacs_json()).unwrap();
    assert_eq!(json.len(), 2);

    let polys = Array::from(&g.entrelac_polylines(0.5));
    assert_eq!(polys.length(), 2);
    let first = Float64Array::new(&polys.get(0));
    assert_eq!(first.get_index(0), 5.0);
    assert_eq!(first.get_index(1), 0.0);
}

#[wasm_bindgen_test]
fn options_change_generation() {
    let mut g = Graph::new();
    square(&mut g);
    let r = g.set_options("{\"arc_capacity\": 1}");
    assert_eq!(Reflect::get(&r, &JsValue::from_str("ok")).unwrap().as_bool(), Some(true));
    let v: serde_json::Value = serde_json::from_str(&g.entrelacs_json()).unwrap();
    assert_eq!(v.as_array().map(|a| a.len()), Some(1));
    assert!(g.options_json().contains("\"arc_capacity\":1"));
}

#[wasm_bindgen_test]
fn grp_round_trip_and_snapshot() {
    let mut g = Graph::new();
    square(&mut g);
    let text = g.save_grp();
    assert!(text.starts_with("# ---------- nodes ----------\n"));

    let mut h = Graph::new();
    assert!(h.load_grp(&text));
    assert_eq!(h.node_count(), 4);
    assert_eq!(h.arc_count(), 4);
    assert_eq!(h.save_grp(), text);

    let snap: serde_json::Value = serde_json::from_str(&h.graph_json()).unwrap();
    assert_eq!(snap["version"], 1);
    assert_eq!(snap["nodes"].as_array().map(|a| a.len()), Some(4));
    assert_eq!(snap["arcs"].as_array().map(|a| a.len()), Some(4));
}
