//! Conversions between caller-supplied JS values and typed map options.

use js_sys::{Array, Function, Reflect};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};

use nepal_map_shared::{DiagnosticSink, MapError};

pub(crate) fn is_plain_object(value: &JsValue) -> bool {
    value.is_object() && !value.is_function() && !Array::is_array(value)
}

pub(crate) fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

/// Deserialize an options object. Anything but an object, or an object
/// with mistyped fields, is reported and yields `None`.
pub(crate) fn object_options<T: DeserializeOwned>(
    value: &JsValue,
    what: &str,
    sink: &dyn DiagnosticSink,
) -> Option<T> {
    if !is_plain_object(value) {
        sink.report(&MapError::invalid_argument(format!(
            "{what} is expected to be an Object"
        )));
        return None;
    }
    match serde_wasm_bindgen::from_value(value.clone()) {
        Ok(options) => Some(options),
        Err(err) => {
            sink.report(&MapError::invalid_argument(format!("{what}: {err}")));
            None
        }
    }
}

/// Read an optional callback property. A present value that is not a
/// function is reported and ignored.
pub(crate) fn callback(
    object: &JsValue,
    key: &str,
    sink: &dyn DiagnosticSink,
) -> Option<Function> {
    let value = Reflect::get(object, &JsValue::from_str(key)).ok()?;
    if is_absent(&value) {
        return None;
    }
    match value.dyn_into::<Function>() {
        Ok(function) => Some(function),
        Err(_) => {
            sink.report(&MapError::invalid_argument(format!(
                "{key} has to be a 'function'"
            )));
            None
        }
    }
}

/// A size given either as CSS text (`"600px"`) or a bare number (`600`).
pub(crate) fn css_text(value: &JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(number_css))
}

fn number_css(value: f64) -> String {
    format!("{value}")
}

pub(crate) fn to_js_error(error: MapError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::number_css;

    #[test]
    fn numbers_render_without_trailing_zeros() {
        assert_eq!(number_css(600.0), "600");
        assert_eq!(number_css(72.5), "72.5");
    }
}
