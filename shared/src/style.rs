use std::fmt::Write as FmtWrite;

use serde::Deserialize;

use crate::config::WHOLE_MAP_TARGET;

/// Style and link settings for the whole map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperty {
    pub target_place: String,
    pub fill: String,
    pub stroke: String,
    pub hover_color: Option<String>,
    pub clear_property: bool,
    pub cursor: String,
    pub href: Option<String>,
}

impl Default for MapProperty {
    fn default() -> Self {
        Self {
            target_place: WHOLE_MAP_TARGET.to_string(),
            fill: "white".to_string(),
            stroke: "black".to_string(),
            hover_color: None,
            clear_property: false,
            cursor: "default".to_string(),
            href: None,
        }
    }
}

/// Keys a caller may change on the whole-map property set. Absent keys keep
/// their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapPropertyUpdate {
    pub target_place: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub hover_color: Option<String>,
    pub clear_property: Option<bool>,
    pub cursor: Option<String>,
    pub href: Option<String>,
}

impl MapProperty {
    pub fn merge(&mut self, update: MapPropertyUpdate) {
        if let Some(place) = update.target_place.filter(|p| !p.trim().is_empty()) {
            self.target_place = place;
        }
        if let Some(fill) = update.fill {
            self.fill = fill;
        }
        if let Some(stroke) = update.stroke {
            self.stroke = stroke;
        }
        if update.hover_color.is_some() {
            self.hover_color = update.hover_color;
        }
        if let Some(clear) = update.clear_property {
            self.clear_property = clear;
        }
        if let Some(cursor) = update.cursor {
            self.cursor = cursor;
        }
        if update.href.is_some() {
            self.href = update.href;
        }
    }

    /// Whole-map rule, or an id rule when the property targets one element.
    pub fn rule(&self) -> String {
        let selector = if self.target_place == WHOLE_MAP_TARGET {
            ".full-map,g".to_string()
        } else {
            format!("#{}", css_identifier(&self.target_place))
        };
        compose_rule(
            &selector,
            &self.stroke,
            &self.fill,
            &self.cursor,
            self.hover_color.as_deref(),
        )
    }
}

/// Per-district settings as supplied to `setTarget`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetProperty {
    pub targets: Option<Vec<String>>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub hover_color: Option<String>,
    pub cursor: Option<String>,
    pub href: Option<String>,
}

/// Resolved style for one district; unset values inherit from the map.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictStyle {
    pub target_place: String,
    pub fill: String,
    pub stroke: String,
    pub hover_color: Option<String>,
    pub cursor: String,
    pub href: Option<String>,
}

impl DistrictStyle {
    pub fn resolve(target_place: String, target: &TargetProperty, map: &MapProperty) -> Self {
        Self {
            target_place,
            fill: non_empty(&target.fill).unwrap_or(&map.fill).to_string(),
            stroke: non_empty(&target.stroke).unwrap_or(&map.stroke).to_string(),
            hover_color: non_empty(&target.hover_color).map(str::to_string),
            cursor: non_empty(&target.cursor).unwrap_or(&map.cursor).to_string(),
            href: non_empty(&target.href).map(str::to_string),
        }
    }

    pub fn rule(&self) -> String {
        compose_rule(
            &format!("#{}", css_identifier(&self.target_place)),
            &self.stroke,
            &self.fill,
            &self.cursor,
            self.hover_color.as_deref(),
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn compose_rule(
    selector: &str,
    stroke: &str,
    fill: &str,
    cursor: &str,
    hover_color: Option<&str>,
) -> String {
    let mut rule = String::with_capacity(96);
    let _ = write!(
        rule,
        "\n{selector}{{\nstroke: {};\nfill: {};\ncursor: {};\n}}\n",
        css_value(stroke),
        css_value(fill),
        css_value(cursor),
    );
    if let Some(hover) = hover_color {
        let _ = writeln!(rule, "path:hover{{fill:{}}}", css_value(hover));
    }
    rule
}

/// Drop characters that would let a value close its declaration or rule.
fn css_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn css_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

/// Attribute selector matching an element id exactly, e.g. `[id='kaski']`.
pub fn id_selector(id: &str) -> String {
    let mut selector = String::with_capacity(id.len() + 7);
    selector.push_str("[id='");
    for c in id.chars() {
        if matches!(c, '\'' | '\\') {
            selector.push('\\');
        }
        selector.push(c);
    }
    selector.push_str("']");
    selector
}

/// Text of the SVG's `<style>` element. Rules are only ever appended,
/// unless a rule asks for the sheet to be cleared first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    text: String,
}

impl StyleSheet {
    pub fn new(existing: impl Into<String>) -> Self {
        Self {
            text: existing.into(),
        }
    }

    pub fn append(&mut self, rule: &str, clear_first: bool) {
        if clear_first {
            self.text.clear();
        }
        self.text.push_str(rule);
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_rule() {
        let rule = MapProperty::default().rule();
        assert!(rule.contains(".full-map,g{"));
        assert!(rule.contains("stroke: black;"));
        assert!(rule.contains("fill: white;"));
        assert!(rule.contains("cursor: default;"));
        assert!(!rule.contains("path:hover"));
    }

    #[test]
    fn hover_color_adds_hover_rule() {
        let mut map = MapProperty::default();
        map.merge(MapPropertyUpdate {
            hover_color: Some("orange".into()),
            ..MapPropertyUpdate::default()
        });
        assert!(map.rule().contains("path:hover{fill:orange}"));
    }

    #[test]
    fn target_place_override_styles_that_element() {
        let update: MapPropertyUpdate =
            serde_json::from_str(r#"{"targetPlace":"kaski","fill":"red"}"#).unwrap();
        let mut map = MapProperty::default();
        map.merge(update);

        assert_eq!(map.target_place, "kaski");
        let rule = map.rule();
        assert!(rule.starts_with("\n#kaski{"));
        assert!(rule.contains("fill: red;"));
        assert!(!rule.contains(".full-map"));

        map.merge(MapPropertyUpdate {
            target_place: Some("Nepal".into()),
            ..MapPropertyUpdate::default()
        });
        assert!(map.rule().contains(".full-map,g{"));
    }

    #[test]
    fn merge_keeps_absent_keys() {
        let mut map = MapProperty::default();
        map.merge(MapPropertyUpdate {
            fill: Some("teal".into()),
            ..MapPropertyUpdate::default()
        });
        map.merge(MapPropertyUpdate {
            cursor: Some("pointer".into()),
            ..MapPropertyUpdate::default()
        });
        assert_eq!(map.fill, "teal");
        assert_eq!(map.cursor, "pointer");
        assert_eq!(map.stroke, "black");
        assert_eq!(map.target_place, "Nepal");
    }

    #[test]
    fn district_style_inherits_from_map() {
        let map = MapProperty {
            fill: "ivory".into(),
            cursor: "pointer".into(),
            ..MapProperty::default()
        };
        let target = TargetProperty {
            stroke: Some("navy".into()),
            fill: Some(String::new()),
            ..TargetProperty::default()
        };
        let style = DistrictStyle::resolve("kaski".into(), &target, &map);
        assert_eq!(style.fill, "ivory");
        assert_eq!(style.stroke, "navy");
        assert_eq!(style.cursor, "pointer");
        assert_eq!(style.hover_color, None);

        let rule = style.rule();
        assert!(rule.starts_with("\n#kaski{"));
        assert!(rule.contains("stroke: navy;"));
    }

    #[test]
    fn values_cannot_break_out_of_their_rule() {
        let map = MapProperty {
            fill: "red;} svg{display:none".into(),
            ..MapProperty::default()
        };
        let rule = map.rule();
        assert!(rule.contains("fill: red svgdisplay:none;"));
        assert_eq!(rule.matches('}').count(), 1);
    }

    #[test]
    fn id_selector_escapes_quotes() {
        assert_eq!(id_selector("kaski"), "[id='kaski']");
        assert_eq!(id_selector("o'brien"), "[id='o\\'brien']");
    }

    #[test]
    fn style_sheet_appends_and_clears() {
        let mut sheet = StyleSheet::new("path{}");
        sheet.append("a", false);
        assert_eq!(sheet.text(), "path{}a");
        sheet.append("b", true);
        assert_eq!(sheet.text(), "b");
    }

    #[test]
    fn target_property_from_json() {
        let target: TargetProperty = serde_json::from_str(
            r#"{"targets":["Kaski","Jhapa"],"hoverColor":"gold","href":"https://example.test"}"#,
        )
        .unwrap();
        assert_eq!(
            target.targets,
            Some(vec!["Kaski".to_string(), "Jhapa".to_string()])
        );
        assert_eq!(target.hover_color.as_deref(), Some("gold"));
        assert_eq!(target.fill, None);
    }
}
