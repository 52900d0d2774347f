//! Spike-state policy.
//!
//! Evaluated after every field change on the `(previous, next)` pair. At most
//! one rule fires per change and the posted rule wins when both would.

use serde::Serialize;

use crate::model::{FilterState, SpikeState};

/// Which rule forced the spike state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeRule {
    /// `posted` went from false to true.
    PostedEnabled,
    /// A workflow state is selected while `spiked` only is chosen.
    WorkflowStateSelected,
}

/// A forced spike state and the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpikeOverride {
    pub rule: SpikeRule,
    pub value: SpikeState,
}

/// Decide whether `next` needs its spike state forced.
#[must_use]
pub fn spike_override(previous: &FilterState, next: &FilterState) -> Option<SpikeOverride> {
    if next.advanced_search.posted && !previous.advanced_search.posted {
        return Some(SpikeOverride {
            rule: SpikeRule::PostedEnabled,
            value: SpikeState::NotSpiked,
        });
    }

    if !next.advanced_search.state.is_empty() && next.spike_state == SpikeState::Spiked {
        return Some(SpikeOverride {
            rule: SpikeRule::WorkflowStateSelected,
            value: SpikeState::NotSpiked,
        });
    }

    None
}

/// Apply the policy: `next` with any forced spike state written in.
#[must_use]
pub fn enforce(previous: &FilterState, next: &FilterState) -> FilterState {
    let mut out = next.clone();
    if let Some(forced) = spike_override(previous, next) {
        out.spike_state = forced.value;
    }
    out
}

/// A radio option for the spike state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpikeOption {
    pub label: &'static str,
    pub value: SpikeState,
}

/// Options offered for the spike state field. "Spiked only" is offered only
/// while no workflow state is selected.
#[must_use]
pub fn spike_state_options(state: &FilterState) -> Vec<SpikeOption> {
    let mut options = vec![
        SpikeOption {
            label: "Exclude spike",
            value: SpikeState::NotSpiked,
        },
        SpikeOption {
            label: "Include spike",
            value: SpikeState::Both,
        },
    ];

    if state.advanced_search.state.is_empty() {
        options.push(SpikeOption {
            label: "Spiked only",
            value: SpikeState::Spiked,
        });
    }

    options
}
