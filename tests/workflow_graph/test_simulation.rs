use workflow_designer::core::workflow_graph::{
    model::{Place, Transition, Workflow},
    simulation::{self, SimulationError},
};

fn workflow() -> Workflow {
    let mut workflow = Workflow::new("article");
    workflow
        .add_place(Place::new("draft"))
        .add_place(Place::new("review"))
        .add_place(Place::new("published"))
        .add_transition(Transition::new("submit", &["draft"], &["review"]).with_label("Submit"))
        .add_transition(
            Transition::new("publish", &["review"], &["published"])
                .with_guard("is_granted('ROLE_PUBLISHER')"),
        )
        .add_transition(Transition::new("reject", &["review"], &["draft"]))
        .set_initial_marking("draft");
    workflow
}

#[test]
fn applying_a_valid_transition_moves_to_its_target() {
    let outcome = simulation::apply_transition(&workflow(), "draft", "submit");
    assert!(outcome.success);
    assert_eq!(outcome.previous_place, "draft");
    assert_eq!(outcome.current_place, "review");
    let applied = outcome.applied_transition.unwrap();
    assert_eq!(applied.label.as_deref(), Some("Submit"));

    let next: Vec<&str> = outcome
        .available_transitions
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(next, ["publish", "reject"]);
    assert!(outcome.error.is_none());
}

#[test]
fn inapplicable_transition_reports_expected_places() {
    let outcome = simulation::apply_transition(&workflow(), "draft", "publish");
    assert!(!outcome.success);
    assert_eq!(outcome.current_place, "draft");
    assert_eq!(
        outcome.error.as_deref(),
        Some("Transition \"publish\" cannot be applied from place \"draft\". Expected: review")
    );
}

#[test]
fn try_apply_exposes_typed_errors() {
    let err = simulation::try_apply(&workflow(), "draft", "missing").unwrap_err();
    assert_eq!(err, SimulationError::UnknownTransition("missing".to_string()));
}

#[test]
fn guards_are_reported_not_evaluated() {
    let available = simulation::available_transitions(&workflow(), "review");
    let publish = available.iter().find(|t| t.name == "publish").unwrap();
    assert!(publish.has_guard);
    assert_eq!(publish.guard.as_deref(), Some("is_granted('ROLE_PUBLISHER')"));
    assert_eq!(publish.label, "publish");

    let outcome = simulation::apply_transition(&workflow(), "review", "publish");
    assert!(outcome.success);
    assert!(outcome.available_transitions.is_empty());
}

#[test]
fn simulate_starts_from_initial_marking_or_override() {
    let snapshot = simulation::simulate(&workflow(), None);
    assert_eq!(snapshot.current_place.as_deref(), Some("draft"));
    assert_eq!(snapshot.available_transitions.len(), 1);

    let snapshot = simulation::simulate(&workflow(), Some("review"));
    assert_eq!(snapshot.available_transitions.len(), 2);

    let snapshot = simulation::simulate(&Workflow::new("empty"), None);
    assert_eq!(snapshot.current_place, None);
    assert_eq!(snapshot.error.as_deref(), Some("No initial marking defined"));
}

#[test]
fn simulation_does_not_mutate_the_workflow() {
    let workflow = workflow();
    let before = workflow.updated_at();
    let _ = simulation::apply_transition(&workflow, "draft", "submit");
    assert_eq!(workflow.updated_at(), before);
    assert_eq!(workflow.initial_marking(), Some("draft"));
}
