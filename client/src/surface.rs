use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DomRect, Element, HtmlElement, HtmlImageElement, Window};

use nepal_map_shared::config::{DISTRICT_SHAPE_SELECTOR, MARKER_GROUP_ATTR, MARKER_PLACE_ATTR};
use nepal_map_shared::style::id_selector;
use nepal_map_shared::{
    Anchor, GroupId, MapError, Rect, RenderSurface, ScrollOffset, Size, VisualSpec,
};

pub(crate) fn dom_error(err: JsValue) -> MapError {
    MapError::Dom(
        err.as_string()
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}

fn rect_of(rect: &DomRect) -> Rect {
    Rect::new(rect.top(), rect.left(), rect.width(), rect.height())
}

/// The loaded map as seen by a marker group: district shapes live in the
/// embedded SVG document, marker visuals are created in the host page.
#[derive(Clone)]
pub struct DomSurface {
    window: Window,
    page: Document,
    svg: Element,
    image_host: HtmlElement,
    overlay_root: HtmlElement,
}

impl DomSurface {
    pub fn new(
        window: Window,
        page: Document,
        svg: Element,
        image_host: HtmlElement,
        overlay_root: HtmlElement,
    ) -> Self {
        Self {
            window,
            page,
            svg,
            image_host,
            overlay_root,
        }
    }

    /// The `<svg>` element clicks are captured on.
    pub fn svg(&self) -> &Element {
        &self.svg
    }

    fn create_html(&self, tag: &str) -> Result<HtmlElement, MapError> {
        self.page
            .create_element(tag)
            .map_err(dom_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| MapError::Dom(format!("<{tag}> is not an HTML element")))
    }
}

impl RenderSurface for DomSurface {
    type Element = Element;
    type Container = HtmlElement;
    type Visual = HtmlImageElement;

    fn resolve_district(&self, id: &str) -> Option<Element> {
        self.svg.query_selector(&id_selector(id)).ok().flatten()
    }

    fn district_id(&self, element: &Element) -> Option<String> {
        element.get_attribute("id")
    }

    fn enclosing_district(&self, target: &Element) -> Option<Element> {
        target.closest(DISTRICT_SHAPE_SELECTOR).ok().flatten()
    }

    fn container_bounding_box(&self) -> Rect {
        rect_of(&self.image_host.get_bounding_client_rect())
    }

    fn element_bounding_box(&self, element: &Element) -> Rect {
        rect_of(&element.get_bounding_client_rect())
    }

    fn scroll_offset(&self) -> ScrollOffset {
        ScrollOffset::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn create_container(&self, group: GroupId) -> Result<HtmlElement, MapError> {
        let container = self.create_html("div")?;
        container
            .set_attribute(MARKER_GROUP_ATTR, &group.to_string())
            .map_err(dom_error)?;
        self.overlay_root
            .append_child(&container)
            .map_err(dom_error)?;
        Ok(container)
    }

    fn append_visual(
        &self,
        container: &HtmlElement,
        spec: &VisualSpec<'_>,
    ) -> Result<HtmlImageElement, MapError> {
        let marker = self
            .create_html("img")?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| MapError::Dom("<img> is not an image element".into()))?;
        marker.set_src(spec.icon_source);

        let style = marker.style();
        style.set_property("position", "absolute").map_err(dom_error)?;
        style
            .set_property("height", &spec.size.height.to_string())
            .map_err(dom_error)?;
        style
            .set_property("width", &spec.size.width.to_string())
            .map_err(dom_error)?;
        style.set_property("pointer-events", "none").map_err(dom_error)?;
        marker
            .set_attribute(MARKER_PLACE_ATTR, spec.district)
            .map_err(dom_error)?;

        container.append_child(&marker).map_err(dom_error)?;
        Ok(marker)
    }

    fn rendered_size(&self, visual: &HtmlImageElement) -> Size {
        Size::new(visual.width() as f64, visual.height() as f64)
    }

    fn place_visual(&self, visual: &HtmlImageElement, anchor: Anchor) {
        let style = visual.style();
        style.set_property("top", &px(anchor.top)).ok();
        style.set_property("left", &px(anchor.left)).ok();
    }

    fn remove_visual(&self, _container: &HtmlElement, visual: HtmlImageElement) {
        visual.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::px;

    #[test]
    fn px_formats_fractional_offsets() {
        assert_eq!(px(107.5), "107.5px");
        assert_eq!(px(-12.0), "-12px");
        assert_eq!(px(0.0), "0px");
    }
}
