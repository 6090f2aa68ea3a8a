use js_sys::Function;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget, Window};

use nepal_map_shared::MapError;

use crate::surface::dom_error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Hover,
    Click,
    Href,
}

impl BindingKind {
    pub(crate) const fn event_name(self) -> &'static str {
        match self {
            Self::Hover => "mouseover",
            Self::Click | Self::Href => "click",
        }
    }
}

/// An event listener that stays attached for as long as this value lives.
pub struct EventBinding {
    target: EventTarget,
    event: &'static str,
    handler: Closure<dyn FnMut(Event)>,
}

impl EventBinding {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, MapError> {
        let handler = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        Ok(Self {
            target: target.clone(),
            event,
            handler,
        })
    }

    /// Call a user callback as `callback(event, place)`.
    pub fn user_callback(
        target: &EventTarget,
        kind: BindingKind,
        callback: Function,
        place: String,
    ) -> Result<Self, MapError> {
        Self::attach(target, kind.event_name(), move |event| {
            let _ = callback.call2(&JsValue::NULL, &event, &JsValue::from_str(&place));
        })
    }

    /// Open `href` in a new browsing context on click.
    pub fn link(target: &EventTarget, window: Window, href: String) -> Result<Self, MapError> {
        Self::attach(target, BindingKind::Href.event_name(), move |_| {
            let _ = window.open_with_url(&href);
        })
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.handler.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::BindingKind;

    #[test]
    fn link_and_click_share_the_click_event() {
        assert_eq!(BindingKind::Hover.event_name(), "mouseover");
        assert_eq!(BindingKind::Click.event_name(), "click");
        assert_eq!(BindingKind::Href.event_name(), "click");
    }
}
