//! Dotted field paths: the addressing scheme for every filter edit.
//!
//! Paths such as `advancedSearch.dates.start` or `spikeState` are a contract
//! shared with anything that persists or serializes a filter state, so the
//! text form here must not drift.

use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::SearchError;

/// Every addressable field of a [`FilterState`](super::FilterState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    Name,
    Slugline,
    Location,
    State,
    AnpaCategory,
    Subject,
    Source,
    Urgency,
    NoCoverage,
    Featured,
    ContentType,
    Posted,
    Dates,
    DatesStart,
    DatesStartDate,
    DatesStartTime,
    DatesEnd,
    DatesEndDate,
    DatesEndTime,
    DatesRange,
    SpikeState,
}

impl FieldPath {
    pub const ALL: [Self; 21] = [
        Self::Name,
        Self::Slugline,
        Self::Location,
        Self::State,
        Self::AnpaCategory,
        Self::Subject,
        Self::Source,
        Self::Urgency,
        Self::NoCoverage,
        Self::Featured,
        Self::ContentType,
        Self::Posted,
        Self::Dates,
        Self::DatesStart,
        Self::DatesStartDate,
        Self::DatesStartTime,
        Self::DatesEnd,
        Self::DatesEndDate,
        Self::DatesEndTime,
        Self::DatesRange,
        Self::SpikeState,
    ];

    /// Leaf paths that hold a value of their own, in serialization order.
    /// Excludes the `dates` group and the date/time sub-fields.
    pub const LEAVES: [Self; 16] = [
        Self::Name,
        Self::Slugline,
        Self::Location,
        Self::State,
        Self::AnpaCategory,
        Self::Subject,
        Self::Source,
        Self::Urgency,
        Self::NoCoverage,
        Self::Featured,
        Self::ContentType,
        Self::Posted,
        Self::DatesStart,
        Self::DatesEnd,
        Self::DatesRange,
        Self::SpikeState,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "advancedSearch.name",
            Self::Slugline => "advancedSearch.slugline",
            Self::Location => "advancedSearch.location",
            Self::State => "advancedSearch.state",
            Self::AnpaCategory => "advancedSearch.anpa_category",
            Self::Subject => "advancedSearch.subject",
            Self::Source => "advancedSearch.source",
            Self::Urgency => "advancedSearch.urgency",
            Self::NoCoverage => "advancedSearch.noCoverage",
            Self::Featured => "advancedSearch.featured",
            Self::ContentType => "advancedSearch.g2_content_type",
            Self::Posted => "advancedSearch.posted",
            Self::Dates => "advancedSearch.dates",
            Self::DatesStart => "advancedSearch.dates.start",
            Self::DatesStartDate => "advancedSearch.dates.start.date",
            Self::DatesStartTime => "advancedSearch.dates.start.time",
            Self::DatesEnd => "advancedSearch.dates.end",
            Self::DatesEndDate => "advancedSearch.dates.end.date",
            Self::DatesEndTime => "advancedSearch.dates.end.time",
            Self::DatesRange => "advancedSearch.dates.range",
            Self::SpikeState => "spikeState",
        }
    }

    /// JSON pointer into the serialized state. Date/time sub-fields resolve
    /// to the timestamp they edit.
    #[must_use]
    pub fn pointer(self) -> String {
        let storage = match self {
            Self::DatesStartDate | Self::DatesStartTime => Self::DatesStart,
            Self::DatesEndDate | Self::DatesEndTime => Self::DatesEnd,
            other => other,
        };
        format!("/{}", storage.as_str().replace('.', "/"))
    }

    /// True for the start bound and its date/time sub-fields.
    #[must_use]
    pub const fn is_start(self) -> bool {
        matches!(
            self,
            Self::DatesStart | Self::DatesStartDate | Self::DatesStartTime
        )
    }

    /// True for the end bound and its date/time sub-fields.
    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(self, Self::DatesEnd | Self::DatesEndDate | Self::DatesEndTime)
    }

    /// True for the free-text fields.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Slugline)
    }

    /// True if this path edits the calendar date (as opposed to time-of-day)
    /// of a bound.
    #[must_use]
    pub const fn is_date_pick(self) -> bool {
        matches!(
            self,
            Self::DatesStart | Self::DatesStartDate | Self::DatesEnd | Self::DatesEndDate
        )
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|path| path.as_str() == trimmed)
            .ok_or_else(|| SearchError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPath;

    #[test]
    fn every_path_parses_back() {
        for path in FieldPath::ALL {
            assert_eq!(path.as_str().parse::<FieldPath>().unwrap(), path);
        }
    }

    #[test]
    fn paths_are_case_sensitive() {
        assert!("advancedsearch.posted".parse::<FieldPath>().is_err());
        assert!("spikestate".parse::<FieldPath>().is_err());
        assert!("advancedSearch.dates.start.hour".parse::<FieldPath>().is_err());
    }

    #[test]
    fn sub_fields_point_at_their_bound() {
        assert_eq!(FieldPath::DatesStartTime.pointer(), "/advancedSearch/dates/start");
        assert_eq!(FieldPath::DatesEndDate.pointer(), "/advancedSearch/dates/end");
        assert_eq!(FieldPath::SpikeState.pointer(), "/spikeState");
        assert_eq!(FieldPath::ContentType.pointer(), "/advancedSearch/g2_content_type");
    }

    #[test]
    fn bound_classification() {
        assert!(FieldPath::DatesStartTime.is_start());
        assert!(!FieldPath::DatesStartTime.is_date_pick());
        assert!(FieldPath::DatesEnd.is_end());
        assert!(FieldPath::DatesEnd.is_date_pick());
        assert!(!FieldPath::DatesRange.is_start());
        assert!(!FieldPath::DatesRange.is_end());
    }
}
