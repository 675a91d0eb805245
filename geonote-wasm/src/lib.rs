use wasm_bindgen::prelude::*;
mod api;
mod error;
mod host;
mod interop;

pub use host::MapHost;

#[wasm_bindgen]
pub struct Annotator { pub(crate) inner: geonote::App }

impl Annotator {
    pub fn rs_with_backend(host: MapHost, store: Box<dyn geonote::store::KeyValueStore>) -> Annotator {
        Annotator { inner: geonote::App::new(host::ports(host, store)) }
    }
}
