use js_sys::{Float64Array, Object, Reflect};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
// Ids cross into JS as f64, exact up to 2^53.
pub fn ids_f64(ids: &[u64]) -> Float64Array {
    let v: Vec<f64> = ids.iter().map(|&i| i as f64).collect();
    arr_f64(&v)
}
