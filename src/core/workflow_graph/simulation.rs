//! Step-by-step execution of transitions for interactive "what can happen
//! next" queries.
//!
//! The engine holds no marking: callers pass the current place in and get the
//! next one back. Guards are reported, never evaluated. A transition with
//! several targets moves to its first one.

use crate::core::workflow_graph::model::Workflow;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Transition \"{0}\" not found")]
    UnknownTransition(String),
    #[error("Transition \"{transition}\" cannot be applied from place \"{place}\". Expected: {}", .expected.join(", "))]
    NotApplicable {
        transition: String,
        place: String,
        expected: Vec<String>,
    },
    #[error("No initial marking defined")]
    NoInitialMarking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTransition {
    pub name: String,
    pub label: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub guard: Option<String>,
    pub has_guard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedTransition {
    pub name: String,
    pub label: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// Result of one simulated step. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub success: bool,
    pub previous_place: String,
    pub current_place: String,
    pub applied_transition: Option<AppliedTransition>,
    pub available_transitions: Vec<AvailableTransition>,
    pub error: Option<String>,
}

impl TransitionOutcome {
    fn failed(place: &str, error: SimulationError) -> Self {
        Self {
            success: false,
            previous_place: place.to_string(),
            current_place: place.to_string(),
            applied_transition: None,
            available_transitions: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Where a simulation starts: the requested place (or the initial marking)
/// and what can fire from there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSnapshot {
    pub current_place: Option<String>,
    pub available_transitions: Vec<AvailableTransition>,
    pub error: Option<String>,
}

/// Transitions whose `from` contains `place`, in definition order.
pub fn available_transitions(workflow: &Workflow, place: &str) -> Vec<AvailableTransition> {
    workflow
        .outgoing(place)
        .map(|transition| AvailableTransition {
            name: transition.name.clone(),
            label: transition.display_label().to_string(),
            from: transition.from.clone(),
            to: transition.to.clone(),
            guard: transition.guard.expression().map(str::to_string),
            has_guard: transition.guard.is_set(),
        })
        .collect()
}

/// Fire `transition_name` from `place` without touching the workflow.
pub fn apply_transition(workflow: &Workflow, place: &str, transition_name: &str) -> TransitionOutcome {
    match try_apply(workflow, place, transition_name) {
        Ok(outcome) => outcome,
        Err(error) => {
            debug!(place, transition = transition_name, %error, "simulated transition rejected");
            TransitionOutcome::failed(place, error)
        }
    }
}

/// Fallible form of [`apply_transition`].
pub fn try_apply(
    workflow: &Workflow,
    place: &str,
    transition_name: &str,
) -> Result<TransitionOutcome, SimulationError> {
    let transition = workflow
        .transition(transition_name)
        .ok_or_else(|| SimulationError::UnknownTransition(transition_name.to_string()))?;

    if !transition.starts_at(place) {
        return Err(SimulationError::NotApplicable {
            transition: transition_name.to_string(),
            place: place.to_string(),
            expected: transition.from.clone(),
        });
    }

    let next = transition.to.first().map(String::as_str).unwrap_or(place);
    Ok(TransitionOutcome {
        success: true,
        previous_place: place.to_string(),
        current_place: next.to_string(),
        applied_transition: Some(AppliedTransition {
            name: transition.name.clone(),
            label: transition.label.clone(),
            from: transition.from.clone(),
            to: transition.to.clone(),
        }),
        available_transitions: available_transitions(workflow, next),
        error: None,
    })
}

/// Starting state for an interactive run.
pub fn simulate(workflow: &Workflow, start: Option<&str>) -> SimulationSnapshot {
    let Some(place) = start.or(workflow.initial_marking()) else {
        return SimulationSnapshot {
            current_place: None,
            available_transitions: Vec::new(),
            error: Some(SimulationError::NoInitialMarking.to_string()),
        };
    };
    SimulationSnapshot {
        current_place: Some(place.to_string()),
        available_transitions: available_transitions(workflow, place),
        error: None,
    }
}
