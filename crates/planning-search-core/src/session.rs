//! Search session: one filter state, its edits, and the spike policy.
//!
//! Every edit arrives as `(field path, value)`. The owning field's change
//! handler turns it into a [`Change`], the change is applied to a copy of the
//! state, and the spike policy runs on `(previous, next)` before the copy
//! replaces the current state.

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::model::{ActiveFilter, FieldPath, FilterState};
use crate::policy::spike_override;
use crate::schema::{self, Change, ChangeHandler, FieldDescriptor, FieldKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    active_filter: ActiveFilter,
    state: FilterState,
}

impl SearchSession {
    /// Start a session with an empty filter state.
    #[must_use]
    pub fn new(active_filter: ActiveFilter) -> Self {
        Self::with_state(active_filter, FilterState::default())
    }

    /// Resume a session from a previously saved state.
    #[must_use]
    pub const fn with_state(active_filter: ActiveFilter, state: FilterState) -> Self {
        Self {
            active_filter,
            state,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    #[must_use]
    pub const fn active_filter(&self) -> ActiveFilter {
        self.active_filter
    }

    #[must_use]
    pub fn into_state(self) -> FilterState {
        self.state
    }

    /// Switch filter mode. Activating a different mode starts from an empty
    /// state; returns true if the state was reset.
    pub fn set_active_filter(&mut self, mode: ActiveFilter) -> bool {
        if mode == self.active_filter {
            return false;
        }
        debug!(from = %self.active_filter, to = %mode, "filter mode changed");
        self.active_filter = mode;
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.state = FilterState::default();
    }

    /// Field descriptors for the current mode.
    #[must_use]
    pub fn fields(&self, options: &SearchOptions) -> Vec<FieldDescriptor> {
        schema::fields_for_mode(self.active_filter, &self.state, options)
    }

    /// Handle an edit addressed by its dotted path.
    ///
    /// # Errors
    ///
    /// See [`SearchSession::apply`]; also fails with
    /// [`SearchError::UnknownField`] for an unrecognized path.
    pub fn on_change(&mut self, field: &str, value: Value) -> Result<Vec<Change>, SearchError> {
        let path = field.parse::<FieldPath>()?;
        self.apply(path, value)
    }

    /// Apply one user edit and then the spike policy.
    ///
    /// Returns every change written, in order: the edit itself and, if a
    /// policy rule fired, the forced `spikeState`. On error the state is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// - [`SearchError::ReadOnly`] when editing `spikeState` while only
    ///   posted items are shown.
    /// - [`SearchError::InvalidValue`] when `value` does not fit the field.
    pub fn apply(&mut self, field: FieldPath, value: Value) -> Result<Vec<Change>, SearchError> {
        self.apply_batch(vec![(field, value)])
    }

    /// Apply several edits as one update cycle: all edits land first, then
    /// the spike policy runs once against the state before the batch.
    ///
    /// # Errors
    ///
    /// Same as [`SearchSession::apply`]; the first failing edit aborts the
    /// whole batch.
    pub fn apply_batch(
        &mut self,
        edits: Vec<(FieldPath, Value)>,
    ) -> Result<Vec<Change>, SearchError> {
        let mut next = self.state.clone();
        let mut applied = Vec::with_capacity(edits.len() + 1);

        for (field, value) in edits {
            if field == FieldPath::SpikeState && next.advanced_search.posted {
                warn!(%field, "rejected edit of read-only field");
                return Err(SearchError::ReadOnly(field.to_string()));
            }

            let handler = FieldKey::owning(field).map_or(ChangeHandler::Field, FieldKey::handler);
            let mut change = handler.dispatch(&next, field, value)?;
            next.set(change.path, change.value.clone())?;
            if change.path == FieldPath::Dates {
                let dates = next.advanced_search.dates.normalized();
                if dates != next.advanced_search.dates {
                    debug!(%field, "dropped explicit bounds under a date range");
                    next.advanced_search.dates = dates;
                    change.value = json!(dates);
                }
            }
            debug!(%field, path = %change.path, value = %change.value, "applied change");
            applied.push(change);
        }

        if let Some(forced) = spike_override(&self.state, &next) {
            info!(rule = ?forced.rule, value = %forced.value, "spike state forced");
            next.spike_state = forced.value;
            applied.push(Change {
                path: FieldPath::SpikeState,
                value: json!(forced.value),
            });
        }

        self.state = next;
        Ok(applied)
    }
}

/// Transient interaction flags owned by the shell, kept apart from the
/// filter model so they never leak into saved or serialized searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionFlags {
    pub location_popup_open: bool,
    pub search_in_flight: bool,
}

impl InteractionFlags {
    pub const fn open_location_popup(&mut self) {
        self.location_popup_open = true;
    }

    pub const fn close_location_popup(&mut self) {
        self.location_popup_open = false;
    }

    /// Mark a search as started. Returns false if one is already running.
    pub const fn begin_search(&mut self) -> bool {
        if self.search_in_flight {
            return false;
        }
        self.search_in_flight = true;
        true
    }

    pub const fn finish_search(&mut self) {
        self.search_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateRange, SpikeState, Term};

    #[test]
    fn generic_edit_writes_value() {
        let mut session = SearchSession::new(ActiveFilter::Events);
        let applied = session
            .on_change("advancedSearch.name", json!("Council meeting"))
            .unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(session.state().advanced_search.name, "Council meeting");
    }

    #[test]
    fn date_sub_field_edit_replaces_dates_object() {
        let mut session = SearchSession::new(ActiveFilter::Combined);
        let applied = session
            .on_change("advancedSearch.dates.start.date", json!("2026-10-14T13:20:00"))
            .unwrap();
        assert_eq!(applied[0].path, FieldPath::Dates);
        assert_eq!(
            applied[0].value,
            json!({"start": "2026-10-14T00:00:00", "end": null, "range": ""})
        );
    }

    #[test]
    fn whole_dates_write_drops_bounds_under_a_range() {
        let mut session = SearchSession::new(ActiveFilter::Planning);
        let applied = session
            .apply(
                FieldPath::Dates,
                json!({"start": "2026-10-14T08:00:00", "range": "today"}),
            )
            .unwrap();

        let expected = json!({"start": null, "end": null, "range": "today"});
        assert_eq!(applied[0].value, expected);
        assert_eq!(json!(session.state().advanced_search.dates), expected);
    }

    #[test]
    fn whole_dates_write_without_range_keeps_bounds() {
        let mut session = SearchSession::new(ActiveFilter::Planning);
        session
            .apply(
                FieldPath::Dates,
                json!({"start": "2026-10-14T08:00:00", "end": null, "range": ""}),
            )
            .unwrap();
        let dates = session.state().advanced_search.dates;
        assert!(dates.start.is_some());
        assert_eq!(dates.range, None);
    }

    #[test]
    fn unknown_path_is_rejected() {
        let mut session = SearchSession::new(ActiveFilter::Combined);
        let err = session.on_change("advancedSearch.colour", json!("red")).unwrap_err();
        assert!(matches!(err, SearchError::UnknownField(_)));
    }

    #[test]
    fn spike_edit_rejected_while_posted() {
        let mut session = SearchSession::new(ActiveFilter::Combined);
        session.on_change("advancedSearch.posted", json!(true)).unwrap();
        let before = session.state().clone();

        let err = session.on_change("spikeState", json!("both")).unwrap_err();
        assert!(matches!(err, SearchError::ReadOnly(_)));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn posting_reports_forced_spike_state() {
        let mut session = SearchSession::new(ActiveFilter::Combined);
        session.on_change("spikeState", json!("spiked")).unwrap();
        let applied = session.on_change("advancedSearch.posted", json!(true)).unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(applied[1].path, FieldPath::SpikeState);
        assert_eq!(applied[1].value, json!("not_spiked"));
        assert_eq!(session.state().spike_state, SpikeState::NotSpiked);
    }

    #[test]
    fn failed_edit_leaves_state_untouched() {
        let mut session = SearchSession::new(ActiveFilter::Planning);
        session.on_change("advancedSearch.slugline", json!("flood")).unwrap();
        let before = session.state().clone();
        assert!(session.on_change("advancedSearch.noCoverage", json!(3)).is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn batch_runs_policy_once_with_posted_precedence() {
        let mut session = SearchSession::new(ActiveFilter::Combined);
        session.on_change("spikeState", json!("spiked")).unwrap();

        let applied = session
            .apply_batch(vec![
                (FieldPath::Posted, json!(true)),
                (FieldPath::State, json!([{"qcode": "scheduled", "name": "Scheduled"}])),
            ])
            .unwrap();

        let forced: Vec<_> = applied
            .iter()
            .filter(|change| change.path == FieldPath::SpikeState)
            .collect();
        assert_eq!(forced.len(), 1);
        assert_eq!(session.state().spike_state, SpikeState::NotSpiked);
        assert_eq!(
            session.state().advanced_search.state,
            vec![Term::new("scheduled", "Scheduled")]
        );
    }

    #[test]
    fn switching_mode_resets_state() {
        let mut session = SearchSession::new(ActiveFilter::Combined);
        session.on_change("advancedSearch.dates.range", json!("today")).unwrap();
        assert_eq!(session.state().advanced_search.dates.range, Some(DateRange::Today));

        assert!(!session.set_active_filter(ActiveFilter::Combined));
        assert!(!session.state().is_empty());

        assert!(session.set_active_filter(ActiveFilter::Planning));
        assert!(session.state().is_empty());
        assert_eq!(session.fields(&SearchOptions::default()).len(), 13);
    }

    #[test]
    fn interaction_flags_track_in_flight_search() {
        let mut flags = InteractionFlags::default();
        assert!(flags.begin_search());
        assert!(!flags.begin_search());
        flags.finish_search();
        assert!(flags.begin_search());

        flags.open_location_popup();
        assert!(flags.location_popup_open);
        flags.close_location_popup();
        assert!(!flags.location_popup_open);
    }
}
