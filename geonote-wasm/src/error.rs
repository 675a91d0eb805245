use crate::interop::{new_obj, set_kv};
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

/// Map a core error to `{ok:false, error:{code, message, data?}}`.
pub fn from_core(e: &geonote::Error) -> JsValue {
    let data = match e {
        geonote::Error::NotFound { kind, id } => {
            let d = new_obj();
            set_kv(&d, "kind", &JsValue::from_str(kind));
            set_kv(&d, "id", &JsValue::from_str(id));
            Some(d.into())
        }
        geonote::Error::ProtectedLayer(id) => {
            let d = new_obj();
            set_kv(&d, "layerId", &JsValue::from_str(id));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

/// `ok(f(v))` on success, the mapped core error otherwise.
pub fn wrap<T>(r: geonote::Result<T>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => ok(f(v)),
        Err(e) => from_core(&e),
    }
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_choice(param: &str, allowed: &[&str], got: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "got", &JsValue::from_str(got));
    let list = js_sys::Array::new();
    for a in allowed { list.push(&JsValue::from_str(a)); }
    set_kv(&d, "allowed", &list.into());
    err("invalid_choice", format!("{} must be one of: {}", param, allowed.join(", ")), Some(d.into()))
}
