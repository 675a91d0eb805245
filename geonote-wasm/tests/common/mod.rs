#![allow(dead_code)]

use geonote_wasm::MapHost;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// A host that records every call as `[kind, payload]` in `host.log` and
/// answers prompts from `answers` in order (then `null`).
pub fn recording_host(answers: &[&str], confirm: bool) -> (MapHost, JsValue) {
    let make = Function::new_with_args(
        "answers, confirmAll",
        r#"
        const log = [];
        return {
            log,
            render(scene) { log.push(['render', scene]); },
            showPreview(p) { log.push(['preview', p]); },
            setView(lat, lng, zoom) { log.push(['view', [lat, lng, zoom]]); },
            fitBounds(s, w, n, e) { log.push(['fit', [s, w, n, e]]); },
            setTileSource(src) { log.push(['tiles', src]); },
            copyText(t) { log.push(['copy', t]); },
            prompt(m) { log.push(['prompt', m]); return answers.length ? answers.shift() : null; },
            confirm(m) { log.push(['confirm', m]); return confirmAll; },
            alert(m) { log.push(['alert', m]); },
        };
        "#,
    );
    let list = Array::new();
    for a in answers {
        list.push(&JsValue::from_str(a));
    }
    let obj = make
        .call2(&JsValue::NULL, &list, &JsValue::from_bool(confirm))
        .expect("host factory");
    (obj.clone().unchecked_into::<MapHost>(), obj)
}

pub fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}

/// Payloads of every logged call of `kind`, oldest first.
pub fn calls(host: &JsValue, kind: &str) -> Vec<JsValue> {
    let log: Array = get(host, "log").unchecked_into();
    log.iter()
        .filter(|entry| Reflect::get_u32(entry, 0).ok().and_then(|k| k.as_string()).as_deref() == Some(kind))
        .filter_map(|entry| Reflect::get_u32(&entry, 1).ok())
        .collect()
}

pub fn last(host: &JsValue, kind: &str) -> JsValue {
    calls(host, kind).pop().unwrap_or(JsValue::UNDEFINED)
}

pub fn is_ok(v: &JsValue) -> bool {
    get(v, "ok").as_bool() == Some(true)
}

pub fn value(v: &JsValue) -> JsValue {
    get(v, "value")
}

pub fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}
