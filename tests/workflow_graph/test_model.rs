use serde_json::json;
use workflow_designer::core::workflow_graph::lint;
use workflow_designer::core::workflow_graph::model::{
    GuardNote, Place, PublicationStateChange, SupportStrategy, Transition, Workflow,
    WorkflowEdit, WorkflowStatus, WorkflowType,
};

fn editorial() -> Workflow {
    let mut workflow = Workflow::new("article");
    workflow
        .add_place(Place::new("draft").with_label("Draft"))
        .add_place(Place::new("review"))
        .add_place(Place::new("published"))
        .add_transition(Transition::new("submit", &["draft"], &["review"]))
        .add_transition(Transition::new("publish", &["review"], &["published"]))
        .set_initial_marking("draft")
        .set_supports(["Pimcore\\Model\\DataObject\\Article"]);
    workflow
}

#[test]
fn json_model_accepts_lenient_shapes() {
    let document = json!({
        "name": "article",
        "type": "state_machine",
        "supports": "Pimcore\\Model\\DataObject\\Article",
        "supportStrategy": "App\\Workflow\\Strategy",
        "initialMarking": "  ",
        "places": [
            {"name": "draft", "label": ""},
            {"name": "done"}
        ],
        "transitions": {
            "finish": {
                "name": "finish",
                "from": "draft",
                "to": ["done"],
                "notes": [],
                "changePublishedState": "none"
            }
        },
        "globalActions": null,
        "createdAt": null
    });

    let workflow: Workflow = serde_json::from_value(document).unwrap();
    assert_eq!(workflow.kind(), WorkflowType::StateMachine);
    assert_eq!(workflow.supports(), ["Pimcore\\Model\\DataObject\\Article"]);
    assert_eq!(
        *workflow.support_strategy(),
        SupportStrategy::Custom {
            service: "App\\Workflow\\Strategy".to_string()
        }
    );
    assert_eq!(workflow.initial_marking(), None);
    assert_eq!(workflow.place("draft").unwrap().label, None);

    let finish = workflow.transition("finish").unwrap();
    assert_eq!(finish.from, ["draft"]);
    assert_eq!(finish.change_publication_state, PublicationStateChange::NoChange);
    assert_eq!(*workflow.global_actions(), json!([]));
}

#[test]
fn duplicate_names_in_list_input_are_recorded() {
    let workflow: Workflow = serde_json::from_value(json!({
        "name": "article",
        "places": [{"name": "draft"}, {"name": "draft", "label": "Again"}]
    }))
    .unwrap();
    assert_eq!(workflow.places().len(), 1);
    assert_eq!(workflow.places().duplicates(), ["draft"]);
}

#[test]
fn editing_a_duplicated_name_settles_it() {
    let mut workflow: Workflow = serde_json::from_value(json!({
        "name": "article",
        "supports": ["App\\Entity\\Article"],
        "places": [{"name": "draft"}, {"name": "draft"}, {"name": "done"}],
        "transitions": {"finish": {"from": "draft", "to": "done"}}
    }))
    .unwrap();
    assert_eq!(workflow.places().duplicates(), ["draft"]);

    workflow.remove_place("draft");
    workflow.add_place(Place::new("draft"));
    workflow.rename_place("draft", "start");
    workflow.set_initial_marking("start");

    assert!(workflow.places().duplicates().is_empty());
    let results = lint::validate(&workflow);
    assert!(!lint::has_errors(&results), "{:?}", results);
    let names: Vec<&str> = workflow.places().names().collect();
    assert_eq!(names, ["done", "start"]);
}

#[test]
fn invalid_workflow_status_rejects_document() {
    let result = serde_json::from_value::<Workflow>(json!({
        "name": "article",
        "status": "archived"
    }));
    assert!(result.is_err());
}

#[test]
fn invalid_workflow_type_rejects_document() {
    let result = serde_json::from_value::<Workflow>(json!({
        "name": "article",
        "type": "petri_net"
    }));
    assert!(result.is_err());
}

#[test]
fn legacy_guard_object_is_canonicalized() {
    let workflow: Workflow = serde_json::from_value(json!({
        "name": "article",
        "transitions": [{
            "name": "approve",
            "from": ["review"],
            "to": ["published"],
            "guard": {"roles": ["ROLE_EDITOR", "ROLE_ADMIN"], "permissions": ["publish"]}
        }]
    }))
    .unwrap();

    let guard = &workflow.transition("approve").unwrap().guard;
    assert_eq!(
        guard.expression(),
        Some("(is_granted('ROLE_EDITOR') or is_granted('ROLE_ADMIN')) and subject.isAllowed('publish')")
    );
    assert!(guard.notes().is_empty());
}

#[test]
fn legacy_guard_notes_travel_with_transition() {
    let workflow: Workflow = serde_json::from_value(json!({
        "name": "article",
        "transitions": [{
            "name": "approve",
            "from": "review",
            "to": "published",
            "guard": {"expression": "is_granted('ROLE_EDITOR'", "roles": []}
        }]
    }))
    .unwrap();

    let guard = &workflow.transition("approve").unwrap().guard;
    assert_eq!(guard.expression(), Some("is_granted('ROLE_EDITOR'"));
    assert!(guard.notes().contains(&GuardNote::UnbalancedParentheses));
    assert!(guard.notes().contains(&GuardNote::EmptyRoles));
}

#[test]
fn rename_place_cascades_through_transitions() {
    let mut workflow = editorial();
    assert!(workflow.rename_place("draft", "writing"));

    assert!(workflow.place("draft").is_none());
    assert!(workflow.place("writing").is_some());
    assert_eq!(workflow.initial_marking(), Some("writing"));
    assert_eq!(workflow.transition("submit").unwrap().from, ["writing"]);
    assert_eq!(workflow.places().names().next(), Some("writing"));
}

#[test]
fn removing_a_place_leaves_dangling_references() {
    let mut workflow = editorial();
    assert!(workflow.remove_place("review"));
    assert!(!workflow.remove_place("review"));
    assert_eq!(workflow.transition("submit").unwrap().to, ["review"]);
}

#[test]
fn edits_refresh_updated_at_only() {
    let mut workflow = editorial();
    let created = workflow.created_at();
    let before = workflow.updated_at();
    workflow.apply(WorkflowEdit::SetStatus(WorkflowStatus::Published));
    assert_eq!(workflow.created_at(), created);
    assert!(workflow.updated_at() >= before);
    assert_eq!(workflow.status(), WorkflowStatus::Published);
}

#[test]
fn same_definition_ignores_identity_and_layout() {
    let original = editorial();
    let mut copy: Workflow =
        serde_json::from_str(&serde_json::to_string(&original).unwrap()).unwrap();
    assert!(copy.same_definition(&original));

    let versioned = original.with_version(3);
    assert_eq!(versioned.version(), Some(3));
    assert!(versioned.same_definition(&original));

    copy.add_place(Place::new("draft").with_label("Draft").with_position(120.0, 40.0));
    assert!(copy.same_definition(&original));

    copy.add_place(Place::new("archived"));
    assert!(!copy.same_definition(&original));
}

#[test]
fn effective_supports_follow_strategy() {
    let mut workflow = editorial();
    workflow.set_supports(["A", "B"]);
    assert_eq!(workflow.effective_supports(), ["A", "B"]);

    workflow.set_support_strategy(SupportStrategy::Expression {
        expression: "subject.isReady()".to_string(),
    });
    assert_eq!(workflow.effective_supports(), ["A"]);

    workflow.set_support_strategy(SupportStrategy::Custom {
        service: "App\\Strategy".to_string(),
    });
    assert!(workflow.effective_supports().is_empty());
}
