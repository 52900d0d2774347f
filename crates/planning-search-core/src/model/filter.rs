use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

use super::path::FieldPath;
use crate::error::SearchError;

/// Local wall-clock timestamp as picked in the date/time inputs.
pub type Timestamp = NaiveDateTime;

/// Which slice of the planning calendar a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    Combined,
    Events,
    Planning,
}

impl ActiveFilter {
    pub const ALL: [Self; 3] = [Self::Combined, Self::Events, Self::Planning];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Events => "events",
            Self::Planning => "planning",
        }
    }
}

/// Spike inclusion for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeState {
    /// Exclude spiked items.
    #[default]
    #[serde(alias = "draft")]
    NotSpiked,
    /// Only spiked items.
    Spiked,
    /// Spiked and unspiked items.
    Both,
}

impl SpikeState {
    const fn as_str(self) -> &'static str {
        match self {
            Self::NotSpiked => "not_spiked",
            Self::Spiked => "spiked",
            Self::Both => "both",
        }
    }
}

/// Named shorthand for a start/end window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
}

impl DateRange {
    pub const ALL: [Self; 4] = [Self::Today, Self::Tomorrow, Self::ThisWeek, Self::NextWeek];

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::ThisWeek => "this_week",
            Self::NextWeek => "next_week",
        }
    }

    /// Display label for the date filter radio group.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::ThisWeek => "This Week",
            Self::NextWeek => "Next Week",
        }
    }
}

/// A vocabulary entry: workflow state, ANPA category, subject, ingest
/// provider, urgency or coverage type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    #[serde(alias = "id")]
    pub qcode: String,
    #[serde(default)]
    pub name: String,
}

impl Term {
    pub fn new(qcode: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qcode: qcode.into(),
            name: name.into(),
        }
    }
}

/// A location picked from the geo lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qcode: Option<String>,
}

/// The `{start, end, range}` triple. `range` and the explicit bounds are
/// mutually exclusive once they pass through the date resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFilter {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    #[serde(with = "range_token")]
    pub range: Option<DateRange>,
}

impl DateFilter {
    /// Returns true if neither explicit bounds nor a range are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.range.is_none()
    }

    /// The same filter with explicit bounds dropped when a range is set.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self.range {
            Some(_) => Self {
                start: None,
                end: None,
                range: self.range,
            },
            None => self,
        }
    }
}

/// Everything under the `advancedSearch` path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSearch {
    pub name: String,
    pub slugline: String,
    pub location: Option<Location>,
    /// Workflow states selected in the multi-select.
    pub state: Vec<Term>,
    pub anpa_category: Vec<Term>,
    pub subject: Vec<Term>,
    /// Ingest providers.
    pub source: Vec<Term>,
    pub urgency: Option<Term>,
    #[serde(rename = "noCoverage")]
    pub no_coverage: bool,
    pub featured: Option<bool>,
    pub g2_content_type: Option<Term>,
    /// Only posted items.
    pub posted: bool,
    pub dates: DateFilter,
}

/// The canonical filter state edited by the search panel and read by the
/// query executor. Serializes with the exact field-path names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    #[serde(rename = "advancedSearch")]
    pub advanced_search: AdvancedSearch,
    #[serde(rename = "spikeState")]
    pub spike_state: SpikeState,
}

impl FilterState {
    /// Returns true if every field still holds its default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Read the current value at `path` as JSON.
    ///
    /// Date sub-fields (`*.date`, `*.time`) read the timestamp they edit.
    #[must_use]
    pub fn get(&self, path: FieldPath) -> Option<Value> {
        let doc = serde_json::to_value(self).ok()?;
        doc.pointer(&path.pointer()).cloned()
    }

    /// Generic field-path setter.
    ///
    /// Writes `value` at `path` and re-validates the whole state. This is the
    /// raw setter: date exclusivity and the spike policy are applied by the
    /// session, not here.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidValue`] if `value` does not decode into
    /// the field's type. The state is left unchanged on error.
    pub fn set(&mut self, path: FieldPath, value: Value) -> Result<(), SearchError> {
        let invalid = |source| SearchError::InvalidValue {
            path: path.to_string(),
            source,
        };

        let mut doc = serde_json::to_value(&*self).map_err(invalid)?;
        let slot = doc
            .pointer_mut(&path.pointer())
            .ok_or_else(|| SearchError::UnknownField(path.to_string()))?;
        *slot = value;

        *self = serde_json::from_value(doc).map_err(invalid)?;
        Ok(())
    }
}

mod range_token {
    use super::DateRange;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::str::FromStr;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(range: &Option<DateRange>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(range.map_or("", DateRange::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateRange>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(token) => DateRange::from_str(token).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SpikeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for ActiveFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "combined" => Ok(Self::Combined),
            "events" => Ok(Self::Events),
            "planning" => Ok(Self::Planning),
            _ => Err(ParseEnumError {
                expected: "filter mode",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for SpikeState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "not_spiked" | "draft" => Ok(Self::NotSpiked),
            "spiked" => Ok(Self::Spiked),
            "both" => Ok(Self::Both),
            _ => Err(ParseEnumError {
                expected: "spike state",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for DateRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "this_week" => Ok(Self::ThisWeek),
            "next_week" => Ok(Self::NextWeek),
            _ => Err(ParseEnumError {
                expected: "date range",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .expect("valid timestamp")
    }

    #[test]
    fn default_state_serializes_with_field_path_names() {
        let doc = serde_json::to_value(FilterState::default()).unwrap();
        assert_eq!(
            doc,
            json!({
                "advancedSearch": {
                    "name": "",
                    "slugline": "",
                    "location": null,
                    "state": [],
                    "anpa_category": [],
                    "subject": [],
                    "source": [],
                    "urgency": null,
                    "noCoverage": false,
                    "featured": null,
                    "g2_content_type": null,
                    "posted": false,
                    "dates": {"start": null, "end": null, "range": ""}
                },
                "spikeState": "not_spiked"
            })
        );
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let state: FilterState =
            serde_json::from_value(json!({"advancedSearch": {"posted": true}})).unwrap();
        assert!(state.advanced_search.posted);
        assert_eq!(state.spike_state, SpikeState::NotSpiked);
        assert!(state.advanced_search.dates.is_empty());
    }

    #[test]
    fn legacy_draft_token_means_not_spiked() {
        let parsed: SpikeState = serde_json::from_value(json!("draft")).unwrap();
        assert_eq!(parsed, SpikeState::NotSpiked);
        assert_eq!("DRAFT".parse::<SpikeState>().unwrap(), SpikeState::NotSpiked);
    }

    #[test]
    fn range_token_accepts_empty_and_null() {
        let dates: DateFilter = serde_json::from_value(json!({"range": ""})).unwrap();
        assert_eq!(dates.range, None);
        let dates: DateFilter = serde_json::from_value(json!({"range": null})).unwrap();
        assert_eq!(dates.range, None);
        let dates: DateFilter = serde_json::from_value(json!({"range": "this_week"})).unwrap();
        assert_eq!(dates.range, Some(DateRange::ThisWeek));
        assert!(serde_json::from_value::<DateFilter>(json!({"range": "fortnight"})).is_err());
    }

    #[test]
    fn source_terms_accept_provider_id_key() {
        let term: Term = serde_json::from_value(json!({"id": "afp", "name": "AFP"})).unwrap();
        assert_eq!(term, Term::new("afp", "AFP"));
    }

    #[test]
    fn active_filter_parse_is_case_insensitive() {
        assert_eq!("COMBINED".parse::<ActiveFilter>().unwrap(), ActiveFilter::Combined);
        assert_eq!(" events ".parse::<ActiveFilter>().unwrap(), ActiveFilter::Events);
        assert!("assignments".parse::<ActiveFilter>().is_err());
    }

    #[test]
    fn display_parse_roundtrips() {
        for value in ActiveFilter::ALL {
            assert_eq!(value.to_string().parse::<ActiveFilter>().unwrap(), value);
        }
        for value in DateRange::ALL {
            assert_eq!(value.to_string().parse::<DateRange>().unwrap(), value);
        }
        for value in [SpikeState::NotSpiked, SpikeState::Spiked, SpikeState::Both] {
            assert_eq!(value.to_string().parse::<SpikeState>().unwrap(), value);
        }
    }

    #[test]
    fn set_writes_nested_paths() {
        let mut state = FilterState::default();
        state
            .set(FieldPath::Slugline, json!("election"))
            .unwrap();
        state
            .set(FieldPath::State, json!([{"qcode": "draft", "name": "Draft"}]))
            .unwrap();
        state
            .set(FieldPath::DatesStart, json!("2026-10-14T08:00:00"))
            .unwrap();

        assert_eq!(state.advanced_search.slugline, "election");
        assert_eq!(state.advanced_search.state, vec![Term::new("draft", "Draft")]);
        assert_eq!(state.advanced_search.dates.start, Some(ts(2026, 10, 14, 8, 0, 0)));
    }

    #[test]
    fn set_rejects_mistyped_values_without_mutating() {
        let mut state = FilterState::default();
        let err = state.set(FieldPath::Posted, json!("yes")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidValue { ref path, .. } if path == "advancedSearch.posted"));
        assert!(state.is_empty());
    }

    #[test]
    fn get_reads_sub_field_timestamps() {
        let mut state = FilterState::default();
        state.advanced_search.dates.end = Some(ts(2026, 10, 14, 23, 59, 59));
        assert_eq!(
            state.get(FieldPath::DatesEndTime),
            Some(json!("2026-10-14T23:59:59"))
        );
        assert_eq!(state.get(FieldPath::SpikeState), Some(json!("not_spiked")));
    }
}
