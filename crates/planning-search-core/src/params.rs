//! Filter state as dotted-path query parameters.
//!
//! Keys are the field paths themselves and values are compact JSON, so a
//! saved search or URL query carries exactly the addressing scheme the
//! editor uses. Fields still at their default are left out.

use serde_json::Value;

use crate::dates;
use crate::error::SearchError;
use crate::model::{FieldPath, FilterState};

/// Flatten `state` into `(path, json)` pairs in a stable order.
#[must_use]
pub fn to_params(state: &FilterState) -> Vec<(String, String)> {
    let defaults = FilterState::default();
    FieldPath::LEAVES
        .into_iter()
        .filter_map(|path| {
            let value = state.get(path)?;
            (Some(&value) != defaults.get(path).as_ref())
                .then(|| (path.to_string(), value.to_string()))
        })
        .collect()
}

/// Decode one raw parameter value for `path`.
///
/// JSON when it parses, else a plain string. Text fields keep the raw string
/// whenever it does not parse as a JSON string, so `slugline=2026` stays text.
#[must_use]
pub fn decode_value(path: FieldPath, raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if value.is_string() || !path.is_text() => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Rebuild a state from `(path, value)` pairs.
///
/// Values go through [`decode_value`], so `advancedSearch.slugline=flood`
/// works unquoted. Date keys are exclusive in the order given: a later range
/// drops earlier bounds and a later bound drops an earlier range.
///
/// # Errors
///
/// Returns [`SearchError::UnknownField`] for a key that is not a field path,
/// or [`SearchError::InvalidValue`] for a value of the wrong type.
pub fn from_params<I, K, V>(pairs: I) -> Result<FilterState, SearchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut state = FilterState::default();
    for (key, raw) in pairs {
        let path = key.as_ref().parse::<FieldPath>()?;
        state.set(path, decode_value(path, raw.as_ref()))?;
        state.advanced_search.dates = dates::keep_exclusive(state.advanced_search.dates, path);
    }
    Ok(state)
}
