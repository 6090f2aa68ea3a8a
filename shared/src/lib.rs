pub mod config;
pub mod diagnostics;
pub mod districts;
pub mod error;
pub mod geometry;
pub mod host;
pub mod marker;
pub mod options;
pub mod style;
pub mod surface;

pub use diagnostics::{DiagnosticSink, RecordingSink, TracingSink};
pub use error::{ErrorKind, MapError};
pub use geometry::{Anchor, Rect, ScrollOffset, Size, compute_anchor};
pub use host::{MapSize, MapState};
pub use marker::{GroupId, GroupIdAllocator, MarkSummary, MarkerGroup, ToggleOutcome};
pub use options::{
    AllowList, CssKeyword, Dimension, MarkerConfig, MarkerOptions, MarkerSize, Supplied,
};
pub use surface::{RenderSurface, VisualSpec};
