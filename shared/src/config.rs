/// Upper bound on how long `setRoot` waits for the SVG document to load.
pub const MAP_MAX_TIME_TO_LOAD_MS: u32 = 10_000;

/// Map image location, relative to the page's base URL.
pub const SVG_ASSET_PATH: &str = "assets/nepal.svg";

/// Element id (and style target) that stands for the whole country.
pub const WHOLE_MAP_TARGET: &str = "Nepal";

pub const DEFAULT_MARKER_SIZE: &str = "15px";
pub const DEFAULT_MARKER_SIZE_PX: f64 = 15.0;

pub const MAP_CONTAINER_CLASS: &str = "nepal--map-container";
pub const SVG_ELEMENT_CLASS: &str = "nepal-svg-element";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Selector for the shape that represents one district inside the SVG.
pub const DISTRICT_SHAPE_SELECTOR: &str = "path";

/// Attribute tagging a marker group container with its group id.
pub const MARKER_GROUP_ATTR: &str = "data-marker-id";
/// Attribute tagging a marker visual with the district it marks.
pub const MARKER_PLACE_ATTR: &str = "data-place";
