use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::config::{DEFAULT_MARKER_SIZE, DEFAULT_MARKER_SIZE_PX};
use crate::diagnostics::DiagnosticSink;
use crate::error::MapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
}

impl LengthUnit {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Percent => "%",
            Self::Vw => "vw",
            Self::Vh => "vh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssKeyword {
    Auto,
    Initial,
    Inherit,
    Unset,
}

impl CssKeyword {
    const ALL: [Self; 4] = [Self::Auto, Self::Initial, Self::Inherit, Self::Unset];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Initial => "initial",
            Self::Inherit => "inherit",
            Self::Unset => "unset",
        }
    }
}

/// A marker size as CSS understands it: a non-negative length such as `15px`
/// or `2em` (a bare number means pixels), or a sizing keyword like `auto`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Length { value: f64, unit: LengthUnit },
    Keyword(CssKeyword),
}

impl Dimension {
    pub const fn px(value: f64) -> Self {
        Self::Length {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// Units and keywords are matched case-insensitively.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, MapError> {
        let invalid = || MapError::InvalidDimension {
            field,
            value: raw.to_string(),
        };
        let lowered = raw.trim().to_ascii_lowercase();
        if let Some(keyword) = CssKeyword::ALL
            .into_iter()
            .find(|keyword| keyword.as_str() == lowered)
        {
            return Ok(Self::Keyword(keyword));
        }

        // `rem` must be tried before `em`.
        let units = [
            LengthUnit::Px,
            LengthUnit::Rem,
            LengthUnit::Em,
            LengthUnit::Percent,
            LengthUnit::Vw,
            LengthUnit::Vh,
        ];
        let (number, unit) = units
            .iter()
            .find_map(|unit| {
                lowered
                    .strip_suffix(unit.suffix())
                    .map(|number| (number, *unit))
            })
            .unwrap_or((lowered.as_str(), LengthUnit::Px));

        let value: f64 = number.trim_end().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }
        Ok(Self::Length { value, unit })
    }

    /// Pixel value, when the size is an absolute length.
    pub fn as_px(&self) -> Option<f64> {
        match *self {
            Self::Length {
                value,
                unit: LengthUnit::Px,
            } => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { value, unit } => write!(f, "{value}{}", unit.suffix()),
            Self::Keyword(keyword) => f.write_str(keyword.as_str()),
        }
    }
}

/// Marker options as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerOptions {
    pub height: Option<String>,
    pub width: Option<String>,
    pub allowed_to_mark: Vec<String>,
    pub add_on_click: bool,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            height: Some(DEFAULT_MARKER_SIZE.to_string()),
            width: Some(DEFAULT_MARKER_SIZE.to_string()),
            allowed_to_mark: Vec::new(),
            add_on_click: false,
        }
    }
}

/// Caller input for an options argument, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Supplied<T> {
    Absent,
    Object(T),
    /// Present, but not an object.
    Other,
}

impl MarkerOptions {
    /// Options from caller input. Input that is not an object is reported
    /// and replaced by the defaults.
    pub fn from_supplied(supplied: Supplied<Self>, diagnostics: &dyn DiagnosticSink) -> Self {
        match supplied {
            Supplied::Object(options) => options,
            Supplied::Absent => Self::default(),
            Supplied::Other => {
                diagnostics.report(&MapError::invalid_argument(
                    "Options are expected to be Object",
                ));
                Self::default()
            }
        }
    }

    /// Validate into the immutable configuration a marker group is built from.
    /// Missing or empty sizes fall back to the default.
    pub fn validate(self) -> Result<MarkerConfig, MapError> {
        let size = MarkerSize {
            width: parse_size("width", self.width.as_deref())?,
            height: parse_size("height", self.height.as_deref())?,
        };
        Ok(MarkerConfig {
            size,
            allow_list: AllowList::new(self.allowed_to_mark),
            add_on_click: self.add_on_click,
        })
    }
}

fn parse_size(field: &'static str, raw: Option<&str>) -> Result<Dimension, MapError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Dimension::px(DEFAULT_MARKER_SIZE_PX)),
        Some(value) => Dimension::parse(field, value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl Default for MarkerSize {
    fn default() -> Self {
        Self {
            width: Dimension::px(DEFAULT_MARKER_SIZE_PX),
            height: Dimension::px(DEFAULT_MARKER_SIZE_PX),
        }
    }
}

/// District ids a marker group may mark. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(HashSet<String>);

impl AllowList {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn permits(&self, id: &str) -> bool {
        self.0.is_empty() || self.0.contains(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerConfig {
    pub size: MarkerSize,
    pub allow_list: AllowList,
    pub add_on_click: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::error::ErrorKind;

    #[test]
    fn empty_object_uses_defaults() {
        let options: MarkerOptions = serde_json::from_str("{}").unwrap();
        let config = options.validate().unwrap();
        assert_eq!(config.size.width, Dimension::px(15.0));
        assert_eq!(config.size.height, Dimension::px(15.0));
        assert!(config.allow_list.is_unrestricted());
        assert!(!config.add_on_click);
    }

    #[test]
    fn camel_case_fields_are_recognized() {
        let options: MarkerOptions = serde_json::from_str(
            r#"{"height":"30px","width":"2em","allowedToMark":["kaski"],"addOnClick":true}"#,
        )
        .unwrap();
        let config = options.validate().unwrap();
        assert_eq!(config.size.height.as_px(), Some(30.0));
        assert_eq!(
            config.size.width,
            Dimension::Length {
                value: 2.0,
                unit: LengthUnit::Em
            }
        );
        assert_eq!(config.size.width.as_px(), None);
        assert!(config.allow_list.permits("kaski"));
        assert!(!config.allow_list.permits("jhapa"));
        assert!(config.add_on_click);
    }

    #[test]
    fn empty_size_string_falls_back_to_default() {
        let options = MarkerOptions {
            height: Some(String::new()),
            width: None,
            ..MarkerOptions::default()
        };
        let config = options.validate().unwrap();
        assert_eq!(config.size, MarkerSize::default());
    }

    #[test]
    fn non_object_options_are_reported_and_defaulted() {
        let sink = RecordingSink::new();
        let options = MarkerOptions::from_supplied(Supplied::Other, &sink);
        assert_eq!(options, MarkerOptions::default());
        assert_eq!(sink.count_of(ErrorKind::InvalidArgument), 1);

        let absent = MarkerOptions::from_supplied(Supplied::Absent, &sink);
        assert_eq!(absent, MarkerOptions::default());
        let given = MarkerOptions {
            add_on_click: true,
            ..MarkerOptions::default()
        };
        assert!(MarkerOptions::from_supplied(Supplied::Object(given), &sink).add_on_click);
        assert_eq!(sink.reports().len(), 1);
    }

    #[test]
    fn malformed_size_is_rejected_at_construction() {
        let options = MarkerOptions {
            width: Some("wide".into()),
            ..MarkerOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
    }

    #[test]
    fn dimension_parsing() {
        assert_eq!(Dimension::parse("w", "12").unwrap(), Dimension::px(12.0));
        assert_eq!(Dimension::parse("w", " 8.5px ").unwrap(), Dimension::px(8.5));
        assert_eq!(
            Dimension::parse("w", "1.5rem").unwrap(),
            Dimension::Length {
                value: 1.5,
                unit: LengthUnit::Rem
            }
        );
        assert_eq!(
            Dimension::parse("w", "50%").unwrap(),
            Dimension::Length {
                value: 50.0,
                unit: LengthUnit::Percent
            }
        );
        assert!(Dimension::parse("w", "-3px").is_err());
        assert!(Dimension::parse("w", "px").is_err());
    }

    #[test]
    fn dimension_renders_as_css() {
        assert_eq!(Dimension::px(15.0).to_string(), "15px");
        assert_eq!(Dimension::parse("h", "2.5em").unwrap().to_string(), "2.5em");
        assert_eq!(Dimension::parse("h", "AUTO").unwrap().to_string(), "auto");
    }

    #[test]
    fn units_are_case_insensitive() {
        assert_eq!(Dimension::parse("width", "12PX").unwrap(), Dimension::px(12.0));
        assert_eq!(
            Dimension::parse("width", "3Em").unwrap(),
            Dimension::Length {
                value: 3.0,
                unit: LengthUnit::Em
            }
        );
    }

    #[test]
    fn sizing_keywords_are_accepted() {
        assert_eq!(
            Dimension::parse("width", "auto").unwrap(),
            Dimension::Keyword(CssKeyword::Auto)
        );
        assert_eq!(
            Dimension::parse("height", " Initial ").unwrap(),
            Dimension::Keyword(CssKeyword::Initial)
        );
        assert_eq!(Dimension::Keyword(CssKeyword::Auto).as_px(), None);

        let options = MarkerOptions {
            width: Some("auto".into()),
            height: Some("12PX".into()),
            ..MarkerOptions::default()
        };
        let config = options.validate().unwrap();
        assert_eq!(config.size.width, Dimension::Keyword(CssKeyword::Auto));
        assert_eq!(config.size.height.as_px(), Some(12.0));
    }
}
