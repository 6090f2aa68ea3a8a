use std::fmt;
use std::rc::Rc;

use crate::config::DEFAULT_MARKER_SIZE_PX;
use crate::diagnostics::DiagnosticSink;
use crate::error::MapError;
use crate::geometry::{Anchor, Size, compute_anchor};
use crate::options::{Dimension, MarkerConfig};
use crate::surface::{RenderSurface, VisualSpec};

/// Identifies one marker group within a map. Only used to tag its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hands out increasing group ids, starting at 1. Owned by a single map.
#[derive(Debug, Default)]
pub struct GroupIdAllocator {
    last: u32,
}

impl GroupIdAllocator {
    pub fn next_id(&mut self) -> GroupId {
        self.last += 1;
        GroupId(self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Marked,
    Unmarked,
    /// The district is outside the group's allow-list; nothing changed.
    Restricted,
}

/// Per-outcome counts for one bulk mark request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkSummary {
    pub marked: usize,
    pub unmarked: usize,
    pub restricted: usize,
    pub failed: usize,
}

impl MarkSummary {
    fn record(&mut self, outcome: ToggleOutcome) {
        match outcome {
            ToggleOutcome::Marked => self.marked += 1,
            ToggleOutcome::Unmarked => self.unmarked += 1,
            ToggleOutcome::Restricted => self.restricted += 1,
        }
    }

    /// Districts whose marked state flipped.
    pub fn changed(&self) -> u32 {
        u32::try_from(self.marked + self.unmarked).unwrap_or(u32::MAX)
    }
}

struct PlacedMarker<V> {
    place: String,
    visual: V,
}

/// One marker overlay: an icon, its options, and the districts it currently marks.
///
/// `marked_places` and the visuals in the container change together inside
/// a single call, so they always describe the same set of districts.
pub struct MarkerGroup<S: RenderSurface> {
    id: GroupId,
    surface: S,
    icon_source: String,
    config: MarkerConfig,
    marked_places: Vec<String>,
    markers: Vec<PlacedMarker<S::Visual>>,
    container: S::Container,
    diagnostics: Rc<dyn DiagnosticSink>,
}

impl<S: RenderSurface> MarkerGroup<S> {
    pub fn new(
        id: GroupId,
        surface: S,
        icon_source: impl Into<String>,
        config: MarkerConfig,
        diagnostics: Rc<dyn DiagnosticSink>,
    ) -> Result<Self, MapError> {
        let icon_source = icon_source.into();
        if icon_source.trim().is_empty() {
            return Err(MapError::invalid_argument(
                "Marker location is expected to be a non-empty string",
            ));
        }
        let container = surface.create_container(id)?;
        tracing::debug!(group = id.get(), icon = %icon_source, "marker group created");
        Ok(Self {
            id,
            surface,
            icon_source,
            config,
            marked_places: Vec::new(),
            markers: Vec::new(),
            container,
            diagnostics,
        })
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn binds_clicks(&self) -> bool {
        self.config.add_on_click
    }

    /// Marked district ids, in the order they were marked.
    pub fn marked_places(&self) -> &[String] {
        &self.marked_places
    }

    pub fn is_marked(&self, district: &str) -> bool {
        self.marked_places.iter().any(|place| place == district)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Toggle every named district. Unknown names are reported and skipped;
    /// the rest of the batch still runs.
    pub fn mark_by_names<I, N>(&mut self, names: I) -> MarkSummary
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut summary = MarkSummary::default();
        for name in names {
            let name = name.as_ref();
            let Some(district) = self.surface.resolve_district(name) else {
                self.diagnostics
                    .report(&MapError::UnknownDistrict(name.to_string()));
                summary.failed += 1;
                continue;
            };
            match self.toggle(&district) {
                Ok(outcome) => summary.record(outcome),
                Err(err) => {
                    self.diagnostics.report(&err);
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    /// Toggle a batch as received from a caller: `None` when the input was
    /// not a sequence, and `None` items for entries that are not names. Bad
    /// input is reported; the remaining names are still toggled.
    pub fn mark_batch(&mut self, names: Option<Vec<Option<String>>>) -> MarkSummary {
        let Some(items) = names else {
            self.diagnostics
                .report(&MapError::invalid_argument("Target are expected to be Array"));
            return MarkSummary::default();
        };

        let mut rejected = 0;
        let names: Vec<String> = items
            .into_iter()
            .filter_map(|item| {
                if item.is_none() {
                    self.diagnostics.report(&MapError::invalid_argument(
                        "District names are expected to be String",
                    ));
                    rejected += 1;
                }
                item
            })
            .collect();
        let mut summary = self.mark_by_names(&names);
        summary.failed += rejected;
        summary
    }

    /// Mark the district if it is unmarked, unmark it otherwise.
    pub fn toggle(&mut self, district: &S::Element) -> Result<ToggleOutcome, MapError> {
        let id = self
            .surface
            .district_id(district)
            .filter(|id| !id.is_empty())
            .ok_or(MapError::MissingIdentifier)?;

        if !self.config.allow_list.permits(&id) {
            return Ok(ToggleOutcome::Restricted);
        }
        if self.is_marked(&id) {
            self.unmark(&id);
            return Ok(ToggleOutcome::Unmarked);
        }
        self.mark(id, district)
    }

    /// Route a click on the map image. Returns `None` when clicks are not
    /// bound to this group or the click missed every district.
    pub fn handle_click(&mut self, target: &S::Element) -> Option<ToggleOutcome> {
        if !self.config.add_on_click {
            return None;
        }
        let district = self.surface.enclosing_district(target)?;
        match self.toggle(&district) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.diagnostics.report(&err);
                None
            }
        }
    }

    fn mark(&mut self, id: String, district: &S::Element) -> Result<ToggleOutcome, MapError> {
        let spec = VisualSpec {
            district: &id,
            icon_source: &self.icon_source,
            size: self.config.size,
        };
        let visual = self.surface.append_visual(&self.container, &spec)?;
        let anchor = self.anchor_for(district, &visual);
        self.surface.place_visual(&visual, anchor);

        tracing::debug!(group = self.id.get(), district = %id, top = anchor.top, left = anchor.left, "marked");
        self.marked_places.push(id.clone());
        self.markers.push(PlacedMarker { place: id, visual });
        Ok(ToggleOutcome::Marked)
    }

    fn unmark(&mut self, id: &str) {
        self.marked_places.retain(|place| place != id);
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.markers)
            .into_iter()
            .partition(|marker| marker.place == id);
        self.markers = kept;
        for marker in removed {
            self.surface.remove_visual(&self.container, marker.visual);
        }
        tracing::debug!(group = self.id.get(), district = %id, "unmarked");
    }

    fn anchor_for(&self, district: &S::Element, visual: &S::Visual) -> Anchor {
        compute_anchor(
            self.surface.container_bounding_box(),
            self.surface.element_bounding_box(district),
            self.surface.scroll_offset(),
            self.marker_extent(visual),
        )
    }

    /// Rendered size of the visual, falling back to the configured pixel
    /// size for any dimension layout has not produced yet.
    fn marker_extent(&self, visual: &S::Visual) -> Size {
        let measured = self.surface.rendered_size(visual);
        let configured = |dimension: Dimension| {
            dimension.as_px().unwrap_or(DEFAULT_MARKER_SIZE_PX)
        };
        Size {
            width: if measured.width > 0.0 {
                measured.width
            } else {
                configured(self.config.size.width)
            },
            height: if measured.height > 0.0 {
                measured.height
            } else {
                configured(self.config.size.height)
            },
        }
    }
}
