pub mod config;
pub mod error;
pub mod parser;
pub mod processor;
pub mod geometry;
pub mod export;

use wasm_bindgen::prelude::*;
use config::Config;

pub use error::{ConvertError, Result};

#[wasm_bindgen]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn convert_stl_to_vertex(stl: &[u8]) -> std::result::Result<Vec<u8>, JsValue> {
    let mut buffer = Vec::new();
    processor::convert(stl, &mut buffer, &Config::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(buffer)
}
