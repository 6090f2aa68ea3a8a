use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget};

use nepal_map_shared::{MapError, MarkerGroup};

use crate::bindings::{BindingKind, EventBinding};
use crate::js::to_js_error;
use crate::surface::DomSurface;

/// A group of identical marker images placed over districts.
#[wasm_bindgen]
pub struct Marker {
    group: Rc<RefCell<MarkerGroup<DomSurface>>>,
    id: u32,
    // Served while a batch holds the group.
    last_marked: RefCell<Vec<String>>,
    _click: Option<EventBinding>,
}

impl Marker {
    pub(crate) fn attach(group: MarkerGroup<DomSurface>) -> Result<Self, MapError> {
        let svg: EventTarget = group.surface().svg().clone().into();
        let binds_clicks = group.binds_clicks();
        let id = group.id().get();
        let group = Rc::new(RefCell::new(group));

        let click = if binds_clicks {
            let group = group.clone();
            Some(EventBinding::attach(
                &svg,
                BindingKind::Click.event_name(),
                move |event: Event| {
                    let Some(target) = event
                        .target()
                        .and_then(|target| target.dyn_into::<Element>().ok())
                    else {
                        return;
                    };
                    // A re-entrant click while a batch is running is dropped.
                    if let Ok(mut group) = group.try_borrow_mut() {
                        group.handle_click(&target);
                    }
                },
            )?)
        } else {
            None
        };

        Ok(Self {
            group,
            id,
            last_marked: RefCell::new(Vec::new()),
            _click: click,
        })
    }
}

/// `None` when `places` is not an array; `None` items where an entry is not a string.
fn batch_of(places: &JsValue) -> Option<Vec<Option<String>>> {
    Array::is_array(places).then(|| {
        Array::from(places)
            .iter()
            .map(|item| item.as_string())
            .collect()
    })
}

/// Read through `read` when `shared` is free, refreshing `last`; otherwise
/// serve `last` unchanged.
fn read_or_last<G, T: Clone>(
    shared: &RefCell<G>,
    last: &RefCell<T>,
    read: impl FnOnce(&G) -> T,
) -> T {
    let mut last = last.borrow_mut();
    if let Ok(value) = shared.try_borrow() {
        *last = read(&*value);
    }
    last.clone()
}

#[wasm_bindgen]
impl Marker {
    /// Toggle a marker on each named district. Returns how many districts
    /// changed state.
    #[wasm_bindgen(js_name = markByNames)]
    pub fn mark_by_names(&self, places: JsValue) -> Result<u32, JsValue> {
        let mut group = self
            .group
            .try_borrow_mut()
            .map_err(|_| to_js_error(MapError::invalid_argument("Marker is busy")))?;
        let summary = group.mark_batch(batch_of(&places));
        Ok(summary.changed())
    }

    #[wasm_bindgen(js_name = addMarkWithName)]
    pub fn add_mark_with_name(&self, places: JsValue) -> Result<u32, JsValue> {
        self.mark_by_names(places)
    }

    #[wasm_bindgen(getter, js_name = markedPlaces)]
    pub fn marked_places(&self) -> Vec<String> {
        read_or_last(&self.group, &self.last_marked, |group| {
            group.marked_places().to_vec()
        })
    }

    #[wasm_bindgen(getter, js_name = markerContainerId)]
    pub fn marker_container_id(&self) -> u32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::read_or_last;

    #[test]
    fn reads_while_group_is_held_return_last_snapshot() {
        let group = RefCell::new(vec!["kaski".to_string()]);
        let last = RefCell::new(Vec::new());

        let seen = read_or_last(&group, &last, |places: &Vec<String>| places.clone());
        assert_eq!(seen, ["kaski"]);

        let mut held = group.borrow_mut();
        held.push("jhapa".into());
        let seen = read_or_last(&group, &last, |places: &Vec<String>| places.clone());
        assert_eq!(seen, ["kaski"]);
        drop(held);

        let seen = read_or_last(&group, &last, |places: &Vec<String>| places.clone());
        assert_eq!(seen, ["kaski", "jhapa"]);
    }
}
