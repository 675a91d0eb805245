mod common;

use common::{calls, get, is_ok, last, recording_host, value};
use geonote_wasm::Annotator;
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn startup_pushes_tiles_and_view() {
    let (host, log) = recording_host(&[], true);
    let a = Annotator::with_memory_store(host);
    let tiles = last(&log, "tiles");
    assert_eq!(get(&tiles, "maxZoom").as_f64(), Some(22.0));
    let view: Array = last(&log, "view").unchecked_into();
    assert_eq!(view.get(2).as_f64(), Some(17.0));
    assert_eq!(get(&a.settings(), "baseLayer").as_string().as_deref(), Some("nearmap"));
}

#[wasm_bindgen_test]
fn draw_line_and_render_scene() {
    let (host, log) = recording_host(&["Route 9", "Trail"], true);
    let mut a = Annotator::with_memory_store(host);
    let layer = a.create_layer_prompted().expect("layer created");
    assert_eq!(a.active_layer().as_deref(), Some(layer.as_str()));

    assert!(is_ok(&a.start_drawing_res("line")));
    for (lat, lng) in [(32.0, -96.0), (32.5, -96.5)] {
        let r = a.map_click_res(lat, lng);
        assert_eq!(get(&value(&r), "kind").as_string().as_deref(), Some("vertex"));
    }
    assert!(a.can_finish_drawing());
    let preview = last(&log, "preview");
    assert_eq!(get(&get(&preview, "style"), "color").as_string().as_deref(), Some("#3b82f6"));

    let r = a.finish_drawing_res();
    assert!(is_ok(&r));
    let fid = value(&r).as_string().expect("feature id");
    assert_eq!(a.feature_count(&layer), Some(1));
    assert!(last(&log, "preview").is_null());
    assert!(!calls(&log, "fit").is_empty());

    let scene: Array = last(&log, "render").unchecked_into();
    let first = scene.get(0);
    assert_eq!(get(&first, "layerId").as_string(), Some(layer.clone()));
    let feature = Array::from(&get(&first, "features")).get(0);
    let props = get(&get(&feature, "feature"), "properties");
    assert_eq!(get(&props, "id").as_string(), Some(fid));
    assert_eq!(get(&props, "name").as_string().as_deref(), Some("Trail"));
    assert_eq!(get(&get(&feature, "style"), "color").as_string().as_deref(), Some("#c72e28ff"));
}

#[wasm_bindgen_test]
fn idle_click_copies_and_keys_drive_session() {
    let (host, log) = recording_host(&["L"], true);
    let mut a = Annotator::with_memory_store(host);
    let r = a.map_click_res(32.91, -96.57);
    assert_eq!(get(&value(&r), "text").as_string().as_deref(), Some("32.910000, -96.570000"));
    assert_eq!(last(&log, "copy").as_string().as_deref(), Some("32.910000, -96.570000"));

    a.create_layer_prompted();
    assert!(is_ok(&a.toggle_drawing_mode_res("polygon")));
    a.map_click_res(1.0, 1.0);
    a.map_click_res(2.0, 2.0);
    assert!(a.key_down("Backspace"));
    assert_eq!(a.vertex_count(), 1);
    assert!(!a.key_down("Enter"));
    assert!(a.key_down("Escape"));
    assert_eq!(a.drawing_mode(), None);
}

#[wasm_bindgen_test]
fn edit_form_and_export() {
    let (host, _log) = recording_host(&[], true);
    let mut a = Annotator::with_memory_store(host);
    let geojson = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-96.5,32.9]},"properties":{"id":"w1","name":"Well","tags":["a","b"]}}]}"#;
    let layer = value(&a.import_geojson_res(geojson, "wells.geojson")).as_string().unwrap();

    let r = a.feature_click_res(&layer, "w1");
    assert_eq!(get(&value(&r), "kind").as_string().as_deref(), Some("edit"));
    assert_eq!(get(&a.editing(), "name").as_string().as_deref(), Some("Well"));
    assert!(is_ok(&a.update_edit_res("Old well", "dry", "0")));
    assert!(a.save_edit());
    assert!(a.editing().is_null());

    let file = value(&a.export_layer_res(&layer));
    assert_eq!(get(&file, "fileName").as_string().as_deref(), Some("wells.geojson"));
    let text = get(&file, "contents").as_string().unwrap();
    assert!(text.contains("\"Old well\""));
    assert!(text.contains("\"validated\": \"0\""));
    assert!(text.contains("\"tags\": \"a\""));

    let all = value(&a.export_all_res());
    assert_eq!(get(&all, "fileName").as_string().as_deref(), Some("all-layers.geojson"));
    assert!(a.delete_feature(&layer, "w1"));
    assert!(!a.delete_feature(&layer, "w1"));
}

#[wasm_bindgen_test]
fn remove_layer_confirms() {
    let (host, log) = recording_host(&[], false);
    let mut a = Annotator::with_memory_store(host);
    let id = value(&a.create_layer_res("Temp")).as_string().unwrap();
    assert!(!a.remove_layer(&id));
    assert_eq!(a.layer_count(), 1);
    assert_eq!(
        last(&log, "confirm").as_string().as_deref(),
        Some("Are you sure you want to delete this layer?")
    );
}

#[wasm_bindgen_test]
fn settings_commands() {
    let (host, log) = recording_host(&[], true);
    let mut a = Annotator::with_memory_store(host);
    assert!(is_ok(&a.set_base_layer_res("osm")));
    assert_eq!(get(&last(&log, "tiles"), "maxZoom").as_f64(), Some(18.0));
    a.set_show_annotations(false);
    assert!(is_ok(&a.record_view_res(10.0, 20.0, 5.0)));
    let s = a.settings();
    assert_eq!(get(&s, "showAnnotations").as_bool(), Some(false));
    assert_eq!(get(&s, "zoom").as_f64(), Some(5.0));
    assert!(is_ok(&a.zoom_to_coordinates_res("40.7", "-74")));
    let view: Array = last(&log, "view").unchecked_into();
    assert_eq!(view.get(2).as_f64(), Some(18.0));
}
