use crate::error::MapError;
use crate::geometry::{Anchor, Rect, ScrollOffset, Size};
use crate::marker::GroupId;
use crate::options::MarkerSize;

/// Everything a marker visual is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSpec<'a> {
    pub district: &'a str,
    pub icon_source: &'a str,
    pub size: MarkerSize,
}

/// The rendering capability a marker group draws onto.
///
/// In the browser this is the loaded SVG document plus the page around it;
/// in tests it is an in-memory fake. Implementations take `&self` and use
/// interior mutability where they need to change state, matching how DOM
/// handles behave.
pub trait RenderSurface {
    /// A node inside the map image (district shape or any descendant).
    type Element: Clone;
    /// The node a marker group owns and appends its visuals into.
    type Container;
    /// One marker icon node.
    type Visual;

    /// Look a district shape up by its id.
    fn resolve_district(&self, id: &str) -> Option<Self::Element>;

    /// The id attribute of a district shape.
    fn district_id(&self, element: &Self::Element) -> Option<String>;

    /// Nearest district shape enclosing `target`, including `target` itself.
    fn enclosing_district(&self, target: &Self::Element) -> Option<Self::Element>;

    /// Bounding box of the element hosting the map image, in viewport coordinates.
    fn container_bounding_box(&self) -> Rect;

    /// Bounding box of a shape, relative to the map image's viewport.
    fn element_bounding_box(&self, element: &Self::Element) -> Rect;

    fn scroll_offset(&self) -> ScrollOffset;

    /// Create the group's container under the overlay root, tagged with `group`.
    fn create_container(&self, group: GroupId) -> Result<Self::Container, MapError>;

    /// Create a visual and append it to `container`. Not yet positioned.
    fn append_visual(
        &self,
        container: &Self::Container,
        spec: &VisualSpec<'_>,
    ) -> Result<Self::Visual, MapError>;

    /// Size the visual actually renders at; empty when layout has not happened.
    fn rendered_size(&self, visual: &Self::Visual) -> Size;

    fn place_visual(&self, visual: &Self::Visual, anchor: Anchor);

    fn remove_visual(&self, container: &Self::Container, visual: Self::Visual);
}
