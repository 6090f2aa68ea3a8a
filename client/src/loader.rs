use std::future::Future;
use std::pin::pin;

use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlObjectElement};

use nepal_map_shared::MapError;

use crate::surface::dom_error;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The SVG document behind the `<object>`, once it has loaded.
#[derive(Clone)]
pub struct LoadedSvg {
    pub document: Document,
    pub svg: Element,
    pub style: Element,
}

/// Start watching `object` for its `load` event. Must be called before the
/// object is attached to the page so the event cannot be missed.
pub fn watch_load(
    object: &HtmlObjectElement,
    timeout_ms: u32,
) -> impl Future<Output = Result<LoadedSvg, MapError>> + 'static {
    let loaded = Promise::new(&mut |resolve, _reject| {
        let on_load = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        });
        object.set_onload(Some(on_load.unchecked_ref()));
    });
    let object = object.clone();

    async move {
        let load = pin!(JsFuture::from(loaded));
        let timeout = pin!(TimeoutFuture::new(timeout_ms));
        let result = match select(load, timeout).await {
            Either::Left((Ok(_), _)) => read_loaded(&object),
            Either::Left((Err(err), _)) => Err(dom_error(err)),
            Either::Right(_) => Err(MapError::LoadTimeout { timeout_ms }),
        };
        object.set_onload(None);
        result
    }
}

fn read_loaded(object: &HtmlObjectElement) -> Result<LoadedSvg, MapError> {
    let document = object
        .content_document()
        .ok_or_else(|| MapError::Dom("map document is not accessible".into()))?;
    let svg = document
        .query_selector("svg")
        .map_err(dom_error)?
        .ok_or_else(|| MapError::Dom("map document has no <svg> element".into()))?;
    let style = match svg.query_selector("style").map_err(dom_error)? {
        Some(style) => style,
        None => {
            let style = document
                .create_element_ns(Some(SVG_NAMESPACE), "style")
                .map_err(dom_error)?;
            svg.append_child(&style).map_err(dom_error)?;
            style
        }
    };
    Ok(LoadedSvg {
        document,
        svg,
        style,
    })
}
