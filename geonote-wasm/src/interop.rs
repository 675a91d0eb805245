use js_sys::{Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

/// Plain JS objects and arrays (no `Map`s), as the host expects.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    let ser = serde_wasm_bindgen::Serializer::json_compatible();
    match v.serialize(&ser) {
        Ok(js) => js,
        Err(e) => {
            web_sys::console::error_1(&JsValue::from_str(&format!("serialize failed: {}", e)));
            JsValue::NULL
        }
    }
}

pub fn opt_str(s: Option<&str>) -> JsValue {
    s.map_or(JsValue::NULL, JsValue::from_str)
}
