//! Date range resolver.
//!
//! Turns picks from the start/end date-time inputs and the symbolic range
//! radio group into a normalized [`DateFilter`]. Explicit bounds and a
//! symbolic range never coexist in the output.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime, Weekday};
use serde_json::Value;

use crate::error::SearchError;
use crate::model::{DateFilter, DateRange, FieldPath, Timestamp};

const LAST_SECOND_OF_DAY: i64 = 86_399;

/// Midnight at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 on `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> Timestamp {
    start_of_day(date) + Duration::seconds(LAST_SECOND_OF_DAY)
}

/// Apply a pick from one of the start/end inputs.
///
/// A first date pick for a bound (no current value) snaps to the edge of the
/// day: 00:00:00 for start, 23:59:59 for end. Time picks and edits of a bound
/// that is already set keep the given time-of-day. `None` clears the bound.
/// The other bound is carried over and `range` is always cleared.
#[must_use]
pub fn on_date_time_input_change(
    current: &DateFilter,
    field: FieldPath,
    value: Option<Timestamp>,
) -> DateFilter {
    let mut start = current.start;
    let mut end = current.end;

    if field.is_start() {
        start = match value {
            Some(picked) if field.is_date_pick() && current.start.is_none() => {
                Some(start_of_day(picked.date()))
            }
            other => other,
        };
    }

    if field.is_end() {
        end = match value {
            Some(picked) if field.is_date_pick() && current.end.is_none() => {
                Some(end_of_day(picked.date()))
            }
            other => other,
        };
    }

    DateFilter {
        start,
        end,
        range: None,
    }
}

/// Change handler shared by the start, end and date filter fields.
///
/// Start/end paths delegate to [`on_date_time_input_change`]. Any other path
/// treats `value` as a symbolic range token: the range is set and both
/// explicit bounds are cleared. An empty token or `null` selects no range.
///
/// # Errors
///
/// Returns [`SearchError::InvalidValue`] if `value` is not a timestamp (for
/// start/end) or a known range token.
pub fn on_date_change(
    current: &DateFilter,
    field: FieldPath,
    value: &Value,
) -> Result<DateFilter, SearchError> {
    let invalid = |source| SearchError::InvalidValue {
        path: field.to_string(),
        source,
    };

    if field.is_start() || field.is_end() {
        let picked = serde_json::from_value::<Option<Timestamp>>(value.clone()).map_err(invalid)?;
        return Ok(on_date_time_input_change(current, field, picked));
    }

    let range = match value {
        Value::Null => None,
        Value::String(token) if token.trim().is_empty() => None,
        other => Some(serde_json::from_value::<DateRange>(other.clone()).map_err(invalid)?),
    };

    Ok(DateFilter {
        start: None,
        end: None,
        range,
    })
}

/// Restore exclusivity after a raw write of `edited`. The last write wins:
/// a bound clears the range, a range clears both bounds, and a whole
/// `advancedSearch.dates` object keeps its range over its bounds.
#[must_use]
pub const fn keep_exclusive(dates: DateFilter, edited: FieldPath) -> DateFilter {
    if edited.is_start() || edited.is_end() {
        return DateFilter {
            range: None,
            ..dates
        };
    }
    match edited {
        FieldPath::Dates | FieldPath::DatesRange => dates.normalized(),
        _ => dates,
    }
}

/// Days between the most recent `week_start` and `date`.
fn days_into_week(date: NaiveDate, week_start: Weekday) -> u64 {
    let today = date.weekday().num_days_from_monday();
    let first = week_start.num_days_from_monday();
    u64::from((today + 7 - first) % 7)
}

impl DateRange {
    /// Concrete `[start, end]` bounds of this range relative to `today`.
    ///
    /// Returns `None` if the window runs past the supported calendar.
    #[must_use]
    pub fn window(self, today: NaiveDate, week_start: Weekday) -> Option<(Timestamp, Timestamp)> {
        let (first, last) = match self {
            Self::Today => (today, today),
            Self::Tomorrow => {
                let tomorrow = today.checked_add_days(Days::new(1))?;
                (tomorrow, tomorrow)
            }
            Self::ThisWeek | Self::NextWeek => {
                let offset = if self == Self::NextWeek { 7 } else { 0 };
                let first = today
                    .checked_sub_days(Days::new(days_into_week(today, week_start)))?
                    .checked_add_days(Days::new(offset))?;
                (first, first.checked_add_days(Days::new(6))?)
            }
        };
        Some((start_of_day(first), end_of_day(last)))
    }
}

impl DateFilter {
    /// Effective bounds for the query executor: the symbolic range's window
    /// when one is selected, otherwise the explicit bounds as picked.
    ///
    /// Returns `None` if the range's window runs past the supported calendar.
    #[must_use]
    pub fn window(
        &self,
        today: NaiveDate,
        week_start: Weekday,
    ) -> Option<(Option<Timestamp>, Option<Timestamp>)> {
        match self.range {
            Some(range) => range
                .window(today, week_start)
                .map(|(start, end)| (Some(start), Some(end))),
            None => Some((self.start, self.end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Timestamp {
        date(y, m, d).and_hms_opt(h, min, s).expect("valid time")
    }

    #[test]
    fn first_start_pick_snaps_to_midnight() {
        let out = on_date_time_input_change(
            &DateFilter::default(),
            FieldPath::DatesStartDate,
            Some(ts(2026, 10, 14, 15, 42, 7)),
        );
        assert_eq!(out.start, Some(ts(2026, 10, 14, 0, 0, 0)));
        assert_eq!(out.end, None);
        assert_eq!(out.range, None);
    }

    #[test]
    fn first_end_pick_snaps_to_last_second() {
        let out = on_date_time_input_change(
            &DateFilter::default(),
            FieldPath::DatesEndDate,
            Some(ts(2026, 10, 16, 9, 0, 0)),
        );
        assert_eq!(out.end, Some(ts(2026, 10, 16, 23, 59, 59)));
        assert_eq!(out.start, None);
    }

    #[test]
    fn bare_bound_path_counts_as_a_date_pick() {
        let out = on_date_time_input_change(
            &DateFilter::default(),
            FieldPath::DatesStart,
            Some(ts(2026, 10, 14, 15, 42, 7)),
        );
        assert_eq!(out.start, Some(ts(2026, 10, 14, 0, 0, 0)));
    }

    #[test]
    fn later_edits_keep_time_of_day() {
        let current = DateFilter {
            start: Some(ts(2026, 10, 14, 0, 0, 0)),
            end: Some(ts(2026, 10, 16, 23, 59, 59)),
            range: None,
        };
        let out = on_date_time_input_change(
            &current,
            FieldPath::DatesStartDate,
            Some(ts(2026, 10, 15, 10, 30, 0)),
        );
        assert_eq!(out.start, Some(ts(2026, 10, 15, 10, 30, 0)));
        assert_eq!(out.end, current.end);

        let out = on_date_time_input_change(
            &current,
            FieldPath::DatesEndDate,
            Some(ts(2026, 10, 17, 12, 0, 0)),
        );
        assert_eq!(out.end, Some(ts(2026, 10, 17, 12, 0, 0)));
        assert_eq!(out.start, current.start);
    }

    #[test]
    fn time_pick_on_empty_bound_is_not_normalized() {
        let out = on_date_time_input_change(
            &DateFilter::default(),
            FieldPath::DatesEndTime,
            Some(ts(2026, 10, 14, 17, 0, 0)),
        );
        assert_eq!(out.end, Some(ts(2026, 10, 14, 17, 0, 0)));
    }

    #[test]
    fn explicit_pick_clears_range() {
        let current = DateFilter {
            start: None,
            end: None,
            range: Some(DateRange::NextWeek),
        };
        let out = on_date_time_input_change(
            &current,
            FieldPath::DatesStartDate,
            Some(ts(2026, 10, 14, 8, 0, 0)),
        );
        assert_eq!(out.range, None);
    }

    #[test]
    fn null_clears_one_bound() {
        let current = DateFilter {
            start: Some(ts(2026, 10, 14, 0, 0, 0)),
            end: Some(ts(2026, 10, 16, 23, 59, 59)),
            range: None,
        };
        let out = on_date_change(&current, FieldPath::DatesStart, &Value::Null).unwrap();
        assert_eq!(out.start, None);
        assert_eq!(out.end, current.end);
    }

    #[test]
    fn range_token_clears_explicit_bounds() {
        let current = DateFilter {
            start: Some(ts(2026, 10, 14, 0, 0, 0)),
            end: Some(ts(2026, 10, 16, 23, 59, 59)),
            range: None,
        };
        let out = on_date_change(&current, FieldPath::DatesRange, &json!("today")).unwrap();
        assert_eq!(
            out,
            DateFilter {
                start: None,
                end: None,
                range: Some(DateRange::Today),
            }
        );
    }

    #[test]
    fn empty_range_token_selects_nothing() {
        let current = DateFilter {
            start: None,
            end: None,
            range: Some(DateRange::Today),
        };
        let out = on_date_change(&current, FieldPath::DatesRange, &json!("")).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_values_are_rejected() {
        let current = DateFilter::default();
        assert!(on_date_change(&current, FieldPath::DatesRange, &json!("fortnight")).is_err());
        assert!(on_date_change(&current, FieldPath::DatesEndDate, &json!("14/10/2026")).is_err());
    }

    #[test]
    fn today_and_tomorrow_windows() {
        let today = date(2026, 10, 14);
        assert_eq!(
            DateRange::Today.window(today, Weekday::Mon),
            Some((ts(2026, 10, 14, 0, 0, 0), ts(2026, 10, 14, 23, 59, 59)))
        );
        assert_eq!(
            DateRange::Tomorrow.window(today, Weekday::Mon),
            Some((ts(2026, 10, 15, 0, 0, 0), ts(2026, 10, 15, 23, 59, 59)))
        );
    }

    #[test]
    fn week_windows_follow_configured_first_day() {
        // 2026-10-14 is a Wednesday.
        let today = date(2026, 10, 14);
        assert_eq!(
            DateRange::ThisWeek.window(today, Weekday::Mon),
            Some((ts(2026, 10, 12, 0, 0, 0), ts(2026, 10, 18, 23, 59, 59)))
        );
        assert_eq!(
            DateRange::ThisWeek.window(today, Weekday::Sun),
            Some((ts(2026, 10, 11, 0, 0, 0), ts(2026, 10, 17, 23, 59, 59)))
        );
        assert_eq!(
            DateRange::NextWeek.window(today, Weekday::Mon),
            Some((ts(2026, 10, 19, 0, 0, 0), ts(2026, 10, 25, 23, 59, 59)))
        );
    }

    #[test]
    fn week_window_on_first_day_starts_today() {
        let monday = date(2026, 10, 12);
        let (start, _) = DateRange::ThisWeek.window(monday, Weekday::Mon).unwrap();
        assert_eq!(start, ts(2026, 10, 12, 0, 0, 0));
    }

    #[test]
    fn filter_window_prefers_range() {
        let explicit = DateFilter {
            start: Some(ts(2026, 1, 1, 0, 0, 0)),
            end: None,
            range: None,
        };
        assert_eq!(
            explicit.window(date(2026, 10, 14), Weekday::Mon),
            Some((Some(ts(2026, 1, 1, 0, 0, 0)), None))
        );

        let symbolic = DateFilter {
            start: None,
            end: None,
            range: Some(DateRange::Today),
        };
        assert_eq!(
            symbolic.window(date(2026, 10, 14), Weekday::Mon),
            Some((Some(ts(2026, 10, 14, 0, 0, 0)), Some(ts(2026, 10, 14, 23, 59, 59))))
        );
    }

    #[test]
    fn windows_past_the_calendar_edge_are_none() {
        assert_eq!(DateRange::Tomorrow.window(NaiveDate::MAX, Weekday::Sun), None);
        assert_eq!(DateRange::NextWeek.window(NaiveDate::MAX, Weekday::Sun), None);
        // A week starting the day after MIN's weekday begins before MIN.
        let week_start = NaiveDate::MIN.weekday().succ();
        assert_eq!(DateRange::ThisWeek.window(NaiveDate::MIN, week_start), None);
        assert!(DateRange::ThisWeek.window(NaiveDate::MIN, NaiveDate::MIN.weekday()).is_some());

        let today = DateRange::Today.window(NaiveDate::MAX, Weekday::Sun);
        assert_eq!(today.map(|(start, _)| start.date()), Some(NaiveDate::MAX));

        let symbolic = DateFilter {
            start: None,
            end: None,
            range: Some(DateRange::NextWeek),
        };
        assert_eq!(symbolic.window(NaiveDate::MAX, Weekday::Mon), None);
    }

    #[test]
    fn raw_writes_keep_the_last_one() {
        let mixed = DateFilter {
            start: Some(ts(2026, 10, 14, 8, 0, 0)),
            end: Some(ts(2026, 10, 20, 18, 0, 0)),
            range: Some(DateRange::Today),
        };

        let bounds = keep_exclusive(mixed, FieldPath::DatesEnd);
        assert_eq!(bounds.range, None);
        assert_eq!(bounds.start, mixed.start);
        assert_eq!(bounds.end, mixed.end);

        let expected = DateFilter {
            start: None,
            end: None,
            range: Some(DateRange::Today),
        };
        assert_eq!(keep_exclusive(mixed, FieldPath::DatesRange), expected);
        assert_eq!(keep_exclusive(mixed, FieldPath::Dates), expected);
        assert_eq!(keep_exclusive(mixed, FieldPath::Name), mixed);
    }
}
