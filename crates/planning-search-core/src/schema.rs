//! Filter form schema.
//!
//! Each filter mode has a fixed, ordered field layout. Descriptors are built
//! from the static layout tables against the current state and the host's
//! option lists; an unrecognized mode yields no fields.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::SearchOptions;
use crate::dates;
use crate::error::SearchError;
use crate::model::{ActiveFilter, DateRange, FieldPath, FilterState, Term};
use crate::policy::{SpikeOption, spike_state_options};

/// A field of the advanced search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
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
    Pubstatus,
    StartDateTime,
    EndDateTime,
    SpikeState,
    DateFilters,
}

use FieldKey::{
    AnpaCategory, ContentType, DateFilters, EndDateTime, Featured, Location, Name, NoCoverage,
    Pubstatus, Slugline, Source, StartDateTime, State, Subject, Urgency,
};

const COMBINED: &[FieldKey] = &[
    Slugline,
    AnpaCategory,
    Subject,
    State,
    Pubstatus,
    FieldKey::SpikeState,
    StartDateTime,
    EndDateTime,
    DateFilters,
];

const EVENTS: &[FieldKey] = &[
    Name,
    Slugline,
    AnpaCategory,
    Subject,
    Source,
    Location,
    State,
    Pubstatus,
    FieldKey::SpikeState,
    StartDateTime,
    EndDateTime,
    DateFilters,
];

const PLANNING: &[FieldKey] = &[
    Slugline,
    ContentType,
    NoCoverage,
    Featured,
    AnpaCategory,
    Subject,
    Urgency,
    State,
    Pubstatus,
    FieldKey::SpikeState,
    StartDateTime,
    EndDateTime,
    DateFilters,
];

/// Ordered field layout for a filter mode.
#[must_use]
pub const fn layout(mode: ActiveFilter) -> &'static [FieldKey] {
    match mode {
        ActiveFilter::Combined => COMBINED,
        ActiveFilter::Events => EVENTS,
        ActiveFilter::Planning => PLANNING,
    }
}

/// Which widget renders a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    MetaTerms,
    GeoLookup,
    ColouredValue,
    Toggle,
    Select,
    DateTime,
    RadioButtons,
}

/// How an edit on a field becomes a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeHandler {
    /// Write the value at the edited path as-is.
    #[default]
    Field,
    /// Route through the date range resolver and replace `advancedSearch.dates`.
    Dates,
}

/// A single state mutation, addressed by field path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub path: FieldPath,
    pub value: Value,
}

impl ChangeHandler {
    /// Turn an edit of `field` into the change to request upstream.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidValue`] if the dates handler cannot
    /// decode `value`.
    pub fn dispatch(
        self,
        state: &FilterState,
        field: FieldPath,
        value: Value,
    ) -> Result<Change, SearchError> {
        match self {
            Self::Field => Ok(Change { path: field, value }),
            Self::Dates => {
                let resolved = dates::on_date_change(&state.advanced_search.dates, field, &value)?;
                let value = serde_json::to_value(resolved).map_err(|source| {
                    SearchError::InvalidValue {
                        path: FieldPath::Dates.to_string(),
                        source,
                    }
                })?;
                Ok(Change {
                    path: FieldPath::Dates,
                    value,
                })
            }
        }
    }
}

/// Option list attached to a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldOptions {
    Terms(Vec<Term>),
    Spike(Vec<SpikeOption>),
    Ranges(Vec<RangeOption>),
}

/// A radio option for the date filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeOption {
    pub label: &'static str,
    pub value: DateRange,
}

impl FieldKey {
    #[must_use]
    pub const fn path(self) -> FieldPath {
        match self {
            Name => FieldPath::Name,
            Slugline => FieldPath::Slugline,
            Location => FieldPath::Location,
            State => FieldPath::State,
            AnpaCategory => FieldPath::AnpaCategory,
            Subject => FieldPath::Subject,
            Source => FieldPath::Source,
            Urgency => FieldPath::Urgency,
            NoCoverage => FieldPath::NoCoverage,
            Featured => FieldPath::Featured,
            ContentType => FieldPath::ContentType,
            Pubstatus => FieldPath::Posted,
            StartDateTime => FieldPath::DatesStart,
            EndDateTime => FieldPath::DatesEnd,
            Self::SpikeState => FieldPath::SpikeState,
            DateFilters => FieldPath::DatesRange,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Name => "Name",
            Slugline => "Slugline",
            Location => "Location",
            State => "Workflow State",
            AnpaCategory => "ANPA Category",
            Subject => "Subject",
            Source => "Source",
            Urgency => "Urgency",
            NoCoverage => "Without Coverage",
            Featured => "Featured",
            ContentType => "Coverage Type",
            Pubstatus => "Only Posted",
            StartDateTime => "From",
            EndDateTime => "To",
            Self::SpikeState => "Spike State",
            DateFilters => "Date Filters",
        }
    }

    #[must_use]
    pub const fn input(self) -> InputKind {
        match self {
            Name | Slugline => InputKind::Text,
            Location => InputKind::GeoLookup,
            State | AnpaCategory | Subject | Source => InputKind::MetaTerms,
            Urgency => InputKind::ColouredValue,
            NoCoverage | Featured | Pubstatus => InputKind::Toggle,
            ContentType => InputKind::Select,
            StartDateTime | EndDateTime => InputKind::DateTime,
            Self::SpikeState | DateFilters => InputKind::RadioButtons,
        }
    }

    /// Only the start, end and date filter fields declare their own handler.
    #[must_use]
    pub const fn handler(self) -> ChangeHandler {
        match self {
            StartDateTime | EndDateTime | DateFilters => ChangeHandler::Dates,
            _ => ChangeHandler::Field,
        }
    }

    /// Value shown when the state has nothing at this field's path.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Name | Slugline | DateFilters => json!(""),
            State | AnpaCategory | Subject | Source => json!([]),
            NoCoverage | Pubstatus => json!(false),
            Self::SpikeState => json!(crate::model::SpikeState::NotSpiked),
            Location | Urgency | Featured | ContentType | StartDateTime | EndDateTime => Value::Null,
        }
    }

    /// The field an edit at `path` belongs to. Date/time sub-fields belong to
    /// their bound's field.
    #[must_use]
    pub fn owning(path: FieldPath) -> Option<Self> {
        if path.is_start() {
            return Some(StartDateTime);
        }
        if path.is_end() {
            return Some(EndDateTime);
        }
        ALL_KEYS.iter().copied().find(|key| key.path() == path)
    }

    fn options(self, state: &FilterState, options: &SearchOptions) -> Option<FieldOptions> {
        let terms = |list: &[Term]| Some(FieldOptions::Terms(list.to_vec()));
        match self {
            State => terms(&options.workflow_states),
            AnpaCategory => terms(&options.categories),
            Subject => terms(&options.subjects),
            Source => terms(&options.ingest_providers),
            Urgency => terms(&options.urgencies),
            ContentType => terms(&options.content_types),
            Self::SpikeState => Some(FieldOptions::Spike(spike_state_options(state))),
            DateFilters => Some(FieldOptions::Ranges(
                DateRange::ALL
                    .into_iter()
                    .map(|value| RangeOption {
                        label: value.label(),
                        value,
                    })
                    .collect(),
            )),
            _ => None,
        }
    }
}

const ALL_KEYS: [FieldKey; 16] = [
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
    Pubstatus,
    StartDateTime,
    EndDateTime,
    FieldKey::SpikeState,
    DateFilters,
];

/// A field bound to its current value, options and change handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub path: FieldPath,
    pub label: &'static str,
    pub input: InputKind,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
    pub read_only: bool,
    pub handler: ChangeHandler,
}

impl FieldDescriptor {
    fn bind(key: FieldKey, state: &FilterState, options: &SearchOptions) -> Self {
        let path = key.path();
        Self {
            key,
            path,
            label: key.label(),
            input: key.input(),
            value: state.get(path).unwrap_or_else(|| key.default_value()),
            options: key.options(state, options),
            read_only: key == FieldKey::SpikeState && state.advanced_search.posted,
            handler: key.handler(),
        }
    }
}

/// Descriptors for a known filter mode, in layout order.
#[must_use]
pub fn fields_for_mode(
    mode: ActiveFilter,
    state: &FilterState,
    options: &SearchOptions,
) -> Vec<FieldDescriptor> {
    layout(mode)
        .iter()
        .map(|&key| FieldDescriptor::bind(key, state, options))
        .collect()
}

/// Descriptors for `active_filter`, or none if the mode is not recognized.
#[must_use]
pub fn fields_for(
    active_filter: &str,
    state: &FilterState,
    options: &SearchOptions,
) -> Vec<FieldDescriptor> {
    match active_filter.parse::<ActiveFilter>() {
        Ok(mode) => fields_for_mode(mode, state, options),
        Err(err) => {
            debug!(%err, "no search fields for filter mode");
            Vec::new()
        }
    }
}
