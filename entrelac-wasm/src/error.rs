use crate::interop::{new_obj, set_kv};
use entrelac::{GrpError, OptionsError};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

pub fn parse_error(e: &GrpError) -> JsValue {
    let d = new_obj();
    if let Some(line) = e.line() {
        set_kv(&d, "line", &JsValue::from_f64(line as f64));
    }
    err("parse_error", e.to_string(), Some(d.into()))
}

pub fn invalid_options(e: &OptionsError) -> JsValue {
    err("invalid_options", e.to_string(), None)
}
