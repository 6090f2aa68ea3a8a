use std::rc::Rc;

use serde::Serialize;

use crate::diagnostics::DiagnosticSink;
use crate::districts::{is_district, normalize};
use crate::error::MapError;
use crate::marker::{GroupId, GroupIdAllocator};
use crate::style::{DistrictStyle, MapProperty, MapPropertyUpdate, TargetProperty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSize {
    pub height: String,
    pub width: String,
}

/// Platform-independent state of one map instance: styling, the district
/// targets configured so far, and the marker group id counter.
pub struct MapState {
    map_property: MapProperty,
    targets: Vec<DistrictStyle>,
    group_ids: GroupIdAllocator,
    diagnostics: Rc<dyn DiagnosticSink>,
}

impl MapState {
    pub fn new(diagnostics: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            map_property: MapProperty::default(),
            targets: Vec::new(),
            group_ids: GroupIdAllocator::default(),
            diagnostics,
        }
    }

    pub fn targets(&self) -> &[DistrictStyle] {
        &self.targets
    }

    pub fn diagnostics(&self) -> Rc<dyn DiagnosticSink> {
        self.diagnostics.clone()
    }

    pub fn report(&self, error: MapError) {
        self.diagnostics.report(&error);
    }

    pub fn update_map_property(&mut self, update: MapPropertyUpdate) -> &MapProperty {
        self.map_property.merge(update);
        &self.map_property
    }

    /// Resolve a `setTarget` request into per-district styles. Unknown
    /// districts are reported and skipped. Returns only the accepted styles,
    /// which are also recorded on the map.
    pub fn add_targets(&mut self, target: &TargetProperty) -> Vec<DistrictStyle> {
        let Some(names) = target.targets.as_ref() else {
            self.report(MapError::invalid_argument("No targets set"));
            return Vec::new();
        };

        let mut accepted = Vec::with_capacity(names.len());
        for name in names {
            let place = normalize(name);
            if !is_district(&place) {
                self.report(MapError::UnknownDistrict(name.clone()));
                continue;
            }
            accepted.push(DistrictStyle::resolve(place, target, &self.map_property));
        }
        self.targets.extend(accepted.iter().cloned());
        accepted
    }

    pub fn next_group_id(&mut self) -> GroupId {
        self.group_ids.next_id()
    }

    /// Both dimensions are required; a missing one is reported and no size is applied.
    pub fn validate_size(&self, height: Option<&str>, width: Option<&str>) -> Option<MapSize> {
        let height = height.map(str::trim).filter(|h| !h.is_empty());
        let width = width.map(str::trim).filter(|w| !w.is_empty());
        match (height, width) {
            (Some(height), Some(width)) => Some(MapSize {
                height: height.to_string(),
                width: width.to_string(),
            }),
            _ => {
                self.report(MapError::invalid_argument(
                    "Please declare height and width",
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::error::ErrorKind;

    fn state() -> (MapState, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::new());
        (MapState::new(sink.clone()), sink)
    }

    #[test]
    fn targets_are_normalized_and_validated() {
        let (mut map, sink) = state();
        let target = TargetProperty {
            targets: Some(vec!["Kaski".into(), "Atlantis".into(), "JHAPA".into()]),
            fill: Some("gold".into()),
            ..TargetProperty::default()
        };

        let accepted = map.add_targets(&target);
        let places: Vec<_> = accepted.iter().map(|s| s.target_place.as_str()).collect();
        assert_eq!(places, ["kaski", "jhapa"]);
        assert_eq!(accepted[0].fill, "gold");
        assert_eq!(map.targets().len(), 2);
        assert_eq!(
            sink.reports(),
            vec![MapError::UnknownDistrict("Atlantis".into())]
        );
    }

    #[test]
    fn missing_targets_is_reported() {
        let (mut map, sink) = state();
        assert!(map.add_targets(&TargetProperty::default()).is_empty());
        assert_eq!(sink.count_of(ErrorKind::InvalidArgument), 1);
        assert!(map.targets().is_empty());
    }

    #[test]
    fn targets_inherit_current_map_property() {
        let (mut map, _) = state();
        map.update_map_property(MapPropertyUpdate {
            stroke: Some("gray".into()),
            ..MapPropertyUpdate::default()
        });
        let accepted = map.add_targets(&TargetProperty {
            targets: Some(vec!["dolpa".into()]),
            ..TargetProperty::default()
        });
        assert_eq!(accepted[0].stroke, "gray");
        assert_eq!(accepted[0].fill, "white");
    }

    #[test]
    fn group_ids_are_per_map() {
        let (mut first, _) = state();
        let (mut second, _) = state();
        assert_eq!(first.next_group_id().get(), 1);
        assert_eq!(first.next_group_id().get(), 2);
        assert_eq!(second.next_group_id().get(), 1);
    }

    #[test]
    fn size_requires_both_dimensions() {
        let (map, sink) = state();
        assert_eq!(
            map.validate_size(Some("600"), Some("800")),
            Some(MapSize {
                height: "600".into(),
                width: "800".into()
            })
        );
        assert_eq!(map.validate_size(Some("600"), None), None);
        assert_eq!(map.validate_size(Some(""), Some("800")), None);
        assert_eq!(sink.count_of(ErrorKind::InvalidArgument), 2);
    }
}
