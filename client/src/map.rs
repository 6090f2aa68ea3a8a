use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Document, EventTarget, HtmlElement, HtmlObjectElement, Url, Window};

use nepal_map_shared::config::{
    MAP_CONTAINER_CLASS, MAP_MAX_TIME_TO_LOAD_MS, SVG_ASSET_PATH, SVG_ELEMENT_CLASS,
    SVG_MIME_TYPE,
};
use nepal_map_shared::style::{MapPropertyUpdate, StyleSheet, TargetProperty};
use nepal_map_shared::{MapError, MapState, MarkerGroup, MarkerOptions, Supplied};

use crate::bindings::{BindingKind, EventBinding};
use crate::console::default_sink;
use crate::js::{callback, css_text, is_absent, is_plain_object, object_options, to_js_error};
use crate::loader::{self, LoadedSvg};
use crate::marker::Marker;
use crate::surface::{DomSurface, dom_error};

fn resolve_url(page: &Document, location: &str) -> Result<String, MapError> {
    let base = page.base_uri().map_err(dom_error)?.unwrap_or_default();
    Url::new_with_base(location, &base)
        .map(|url| url.href())
        .map_err(dom_error)
}

struct MapInner {
    state: MapState,
    window: Window,
    page: Document,
    container: HtmlElement,
    object: HtmlObjectElement,
    loaded: Option<LoadedSvg>,
    style_sheet: StyleSheet,
    // One binding per (element, kind); rebinding replaces the old listener.
    bindings: HashMap<(String, BindingKind), EventBinding>,
}

impl MapInner {
    fn loaded(&self) -> Result<&LoadedSvg, MapError> {
        self.loaded.as_ref().ok_or(MapError::NotReady)
    }

    fn finish_loading(&mut self, loaded: LoadedSvg) {
        self.style_sheet = StyleSheet::new(loaded.style.text_content().unwrap_or_default());
        self.loaded = Some(loaded);
    }

    fn append_rule(&mut self, rule: &str, clear_first: bool) -> Result<(), MapError> {
        let style = self.loaded()?.style.clone();
        self.style_sheet.append(rule, clear_first);
        style.set_text_content(Some(self.style_sheet.text()));
        Ok(())
    }

    fn bind(
        &mut self,
        place: &str,
        kind: BindingKind,
        make: impl FnOnce(&EventTarget) -> Result<EventBinding, MapError>,
    ) {
        let element = match self.loaded() {
            Ok(loaded) => loaded.document.get_element_by_id(place),
            Err(err) => {
                self.state.report(err);
                return;
            }
        };
        let Some(element) = element else {
            self.state.report(MapError::UnknownDistrict(place.to_string()));
            return;
        };
        match make(element.as_ref()) {
            Ok(binding) => {
                self.bindings.insert((place.to_string(), kind), binding);
            }
            Err(err) => self.state.report(err),
        }
    }

    fn bind_all(
        &mut self,
        place: &str,
        href: Option<&str>,
        hover: Option<&Function>,
        click: Option<&Function>,
    ) {
        if let Some(href) = href {
            let window = self.window.clone();
            let href = href.to_string();
            self.bind(place, BindingKind::Href, |target| {
                EventBinding::link(target, window, href)
            });
        }
        if let Some(hover) = hover {
            let hover = hover.clone();
            let owner = place.to_string();
            self.bind(place, BindingKind::Hover, |target| {
                EventBinding::user_callback(target, BindingKind::Hover, hover, owner)
            });
        }
        if let Some(click) = click {
            let click = click.clone();
            let owner = place.to_string();
            self.bind(place, BindingKind::Click, |target| {
                EventBinding::user_callback(target, BindingKind::Click, click, owner)
            });
        }
    }
}

/// An embeddable map of Nepal's districts.
#[wasm_bindgen]
pub struct NepalMap {
    inner: Rc<RefCell<MapInner>>,
}

#[wasm_bindgen]
impl NepalMap {
    /// Build the map's container. `svgUrl` overrides the bundled map image.
    #[wasm_bindgen(constructor)]
    pub fn new(svg_url: Option<String>) -> Result<NepalMap, JsValue> {
        let window =
            web_sys::window().ok_or_else(|| to_js_error(MapError::Dom("no window".into())))?;
        let page = window
            .document()
            .ok_or_else(|| to_js_error(MapError::Dom("no document".into())))?;

        let container = page
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| to_js_error(MapError::Dom("<div> is not an HTML element".into())))?;
        container.set_class_name(MAP_CONTAINER_CLASS);

        let object = page
            .create_element("object")?
            .dyn_into::<HtmlObjectElement>()
            .map_err(|_| to_js_error(MapError::Dom("<object> is not an object element".into())))?;
        object.set_class_name(SVG_ELEMENT_CLASS);
        object.set_type(SVG_MIME_TYPE);
        let data = resolve_url(&page, svg_url.as_deref().unwrap_or(SVG_ASSET_PATH))
            .map_err(to_js_error)?;
        object.set_data(&data);
        container.append_child(&object)?;

        Ok(Self {
            inner: Rc::new(RefCell::new(MapInner {
                state: MapState::new(default_sink()),
                window,
                page,
                container,
                object,
                loaded: None,
                style_sheet: StyleSheet::default(),
                bindings: HashMap::new(),
            })),
        })
    }

    /// Attach the map under the element with id `root` and wait for the SVG
    /// to load. Throws if no such element exists; the returned promise
    /// rejects if loading takes too long.
    #[wasm_bindgen(js_name = setRoot)]
    pub fn set_root(&self, root: &str) -> Result<Promise, JsValue> {
        let pending = {
            let map = self.inner.borrow();
            let root_element = map
                .page
                .get_element_by_id(root)
                .ok_or_else(|| to_js_error(MapError::RootNotFound(root.to_string())))?;
            let pending = loader::watch_load(&map.object, MAP_MAX_TIME_TO_LOAD_MS);
            root_element
                .append_child(&map.container)
                .map_err(|err| to_js_error(dom_error(err)))?;
            pending
        };

        let inner = self.inner.clone();
        Ok(future_to_promise(async move {
            let loaded = pending.await.map_err(to_js_error)?;
            inner.borrow_mut().finish_loading(loaded);
            Ok(JsValue::TRUE)
        }))
    }

    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner
            .try_borrow()
            .is_ok_and(|map| map.loaded.is_some())
    }

    /// Set the SVG's `height` and `width` attributes. Both are required.
    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&self, height: JsValue, width: JsValue) -> Result<JsValue, JsValue> {
        let map = self.inner.borrow();
        let loaded = map.loaded().map_err(to_js_error)?;
        let Some(size) = map
            .state
            .validate_size(css_text(&height).as_deref(), css_text(&width).as_deref())
        else {
            return Ok(JsValue::UNDEFINED);
        };
        loaded.svg.set_attribute("height", &size.height)?;
        loaded.svg.set_attribute("width", &size.width)?;
        serde_wasm_bindgen::to_value(&size).map_err(Into::into)
    }

    /// Merge style and behavior settings for the whole map.
    #[wasm_bindgen(js_name = setMapProperty)]
    pub fn set_map_property(&self, props: JsValue) -> Result<(), JsValue> {
        let mut map = self.inner.borrow_mut();
        map.loaded().map_err(to_js_error)?;
        let sink = map.state.diagnostics();
        let Some(update) = object_options::<MapPropertyUpdate>(&props, "Property", sink.as_ref())
        else {
            return Ok(());
        };

        let href = update.href.clone();
        let property = map.state.update_map_property(update).clone();
        map.append_rule(&property.rule(), property.clear_property)
            .map_err(to_js_error)?;

        let hover = callback(&props, "hoverEvent", sink.as_ref());
        let click = callback(&props, "clickEvent", sink.as_ref());
        map.bind_all(
            &property.target_place,
            href.as_deref(),
            hover.as_ref(),
            click.as_ref(),
        );
        Ok(())
    }

    /// Style and bind behavior on individual districts.
    #[wasm_bindgen(js_name = setTarget)]
    pub fn set_target(&self, target: JsValue) -> Result<(), JsValue> {
        let mut map = self.inner.borrow_mut();
        map.loaded().map_err(to_js_error)?;
        let sink = map.state.diagnostics();
        let Some(target_property) =
            object_options::<TargetProperty>(&target, "Target property", sink.as_ref())
        else {
            return Ok(());
        };

        let hover = callback(&target, "hoverEvent", sink.as_ref());
        let click = callback(&target, "clickEvent", sink.as_ref());
        for style in map.state.add_targets(&target_property) {
            map.append_rule(&style.rule(), false).map_err(to_js_error)?;
            map.bind_all(
                &style.target_place,
                style.href.as_deref(),
                hover.as_ref(),
                click.as_ref(),
            );
        }
        Ok(())
    }

    /// Detach the map and every marker group from the page.
    #[wasm_bindgen(js_name = removeMap)]
    pub fn remove_map(&self) {
        let mut map = self.inner.borrow_mut();
        map.bindings.clear();
        map.container.remove();
    }

    /// Create a marker group drawing `location` (resolved against the page's
    /// base URL) over districts.
    #[wasm_bindgen(js_name = createMarker)]
    pub fn create_marker(&self, location: JsValue, options: JsValue) -> Result<Marker, JsValue> {
        let mut map = self.inner.borrow_mut();
        let location = location.as_string().ok_or_else(|| {
            to_js_error(MapError::invalid_argument(
                "Marker location is expected to be String",
            ))
        })?;
        let sink = map.state.diagnostics();

        let supplied = if is_absent(&options) {
            Supplied::Absent
        } else if is_plain_object(&options) {
            Supplied::Object(
                serde_wasm_bindgen::from_value::<MarkerOptions>(options).map_err(|err| {
                    to_js_error(MapError::invalid_argument(format!("Options: {err}")))
                })?,
            )
        } else {
            Supplied::Other
        };
        let config = MarkerOptions::from_supplied(supplied, sink.as_ref())
            .validate()
            .map_err(to_js_error)?;

        let svg = map.loaded().map_err(to_js_error)?.svg.clone();
        let icon_source = resolve_url(&map.page, &location).map_err(to_js_error)?;
        let surface = DomSurface::new(
            map.window.clone(),
            map.page.clone(),
            svg,
            HtmlElement::from(map.object.clone()),
            map.container.clone(),
        );
        let id = map.state.next_group_id();
        let group =
            MarkerGroup::new(id, surface, icon_source, config, sink).map_err(to_js_error)?;
        Marker::attach(group).map_err(to_js_error)
    }
}
