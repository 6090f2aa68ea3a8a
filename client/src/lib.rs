mod bindings;
mod console;
mod js;
mod loader;
mod map;
mod marker;
mod surface;

use wasm_bindgen::prelude::*;

pub use map::NepalMap;
pub use marker::Marker;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
