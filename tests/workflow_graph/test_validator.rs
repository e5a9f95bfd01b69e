use insta::assert_snapshot;
use serde_json::json;
use workflow_designer::core::workflow_graph::{
    lint::{self, is_valid_name, LintRegistry, LintResult, LintSeverity},
    model::{Guard, Place, SupportStrategy, Transition, Workflow},
    publish, translate,
};

fn valid_workflow() -> Workflow {
    let mut workflow = Workflow::new("article_review");
    workflow
        .add_place(Place::new("draft"))
        .add_place(Place::new("review"))
        .add_place(Place::new("done"))
        .add_transition(Transition::new("submit", &["draft"], &["review"]))
        .add_transition(Transition::new("approve", &["review"], &["done"]))
        .set_initial_marking("draft")
        .set_supports(["Pimcore\\Model\\DataObject\\Article"]);
    workflow
}

fn messages(results: &[LintResult]) -> Vec<&str> {
    results.iter().map(|r| r.message.as_str()).collect()
}

#[test]
fn valid_workflow_has_no_errors() {
    let results = lint::validate(&valid_workflow());
    assert!(!lint::has_errors(&results));
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn has_errors_iff_an_error_is_present() {
    let mut workflow = valid_workflow();
    let results = lint::validate(&workflow);
    assert_eq!(
        lint::has_errors(&results),
        results.iter().any(|r| r.severity == LintSeverity::Error)
    );

    workflow.add_place(Place::new("orphan"));
    let results = lint::validate(&workflow);
    assert!(!lint::has_errors(&results));
    assert_eq!(lint::filter_by_severity(&results, LintSeverity::Warning).len(), 1);

    workflow.set_initial_marking("missing");
    let results = lint::validate(&workflow);
    assert!(lint::has_errors(&results));
    assert!(messages(&results).contains(&"Initial marking \"missing\" does not exist in places"));
}

#[test]
fn name_pattern_is_enforced_everywhere() {
    assert!(is_valid_name("a1_b"));
    assert!(!is_valid_name("Review"));

    let mut workflow = valid_workflow();
    workflow
        .add_place(Place::new("In Review"))
        .add_transition(Transition::new("Go-Back", &["review"], &["draft"]));
    let results = lint::validate(&workflow);

    let fields: Vec<&str> = results
        .iter()
        .filter(|r| r.is_error())
        .filter_map(|r| r.field.as_deref())
        .collect();
    assert!(fields.contains(&"places.In Review"));
    assert!(fields.contains(&"transitions.Go-Back"));
}

#[test]
fn transitions_must_reference_known_places() {
    let mut workflow = valid_workflow();
    workflow.add_transition(Transition::new("archive", &[], &["archive"]));
    let results = lint::validate(&workflow);
    let found = messages(&results);
    assert!(found.contains(&"Transition \"archive\" must have at least one \"from\" place"));
    assert!(found.contains(&"Transition \"archive\" references unknown \"to\" place: archive"));
}

#[test]
fn missing_transitions_is_only_a_warning() {
    let mut workflow = Workflow::new("single");
    workflow
        .add_place(Place::new("draft"))
        .set_initial_marking("draft")
        .set_supports(["App\\Entity"]);
    let results = lint::validate(&workflow);
    assert!(!lint::has_errors(&results));
    assert!(messages(&results)
        .contains(&"No transitions defined - workflow will have no state changes"));
}

#[test]
fn dead_ends_that_do_not_look_final_are_reported_as_info() {
    let mut workflow = valid_workflow();
    workflow
        .add_place(Place::new("rejected"))
        .add_transition(Transition::new("reject", &["review"], &["rejected"]));
    let results = lint::validate(&workflow);
    let info = lint::filter_by_severity(&results, LintSeverity::Info);
    assert_eq!(info.len(), 1);
    assert_eq!(
        info[0].message,
        "Place \"rejected\" has no outgoing transitions (final state)"
    );
}

#[test]
fn support_strategy_rules() {
    let mut workflow = valid_workflow();
    workflow.set_support_strategy(SupportStrategy::Expression {
        expression: "(subject.isReady()".to_string(),
    });
    let results = lint::validate(&workflow);
    assert!(messages(&results).contains(&"Support strategy expression has unbalanced parentheses"));

    workflow.set_support_strategy(SupportStrategy::Custom {
        service: "app.workflow.strategy".to_string(),
    });
    let results = lint::validate(&workflow);
    assert!(!lint::has_errors(&results));
    assert_eq!(
        results[0].field.as_deref(),
        Some("supportStrategy.service")
    );
}

#[test]
fn guard_notes_become_diagnostics() {
    let workflow: Workflow = serde_json::from_value(json!({
        "name": "article_review",
        "supports": ["App\\Entity\\Article"],
        "initialMarking": "draft",
        "places": {"draft": {}, "done": {}},
        "transitions": {
            "finish": {
                "from": "draft",
                "to": "done",
                "guard": {"expression": "is_granted('ROLE_A'", "roles": []}
            }
        }
    }))
    .unwrap();

    let results = lint::validate(&workflow);
    let rendered: Vec<String> = results.iter().map(ToString::to_string).collect();
    assert_snapshot!(rendered.join("\n"), @r###"
    error [WFD-LINT-008] Guard expression in transition "finish" has unbalanced parentheses (transitions.finish.guard.expression)
    warning [WFD-LINT-008] Guard in transition "finish" has empty roles array (transitions.finish.guard.roles)
    "###);
}

#[test]
fn unbalanced_guard_survives_save_and_load() {
    let workflow: Workflow = serde_json::from_value(json!({
        "name": "article_review",
        "supports": ["App\\Entity\\Article"],
        "initialMarking": "draft",
        "places": {"draft": {}, "done": {}},
        "transitions": {
            "finish": {"from": "draft", "to": "done", "guard": {"expression": "is_granted('A'"}}
        }
    }))
    .unwrap();
    assert!(lint::has_errors(&lint::validate(&workflow)));

    let saved = translate::to_json(&workflow, false).unwrap();
    let reloaded = translate::from_json(&saved).unwrap();
    let results = lint::validate(&reloaded);
    assert!(lint::has_errors(&results));
    assert_eq!(
        results[0].field.as_deref(),
        Some("transitions.finish.guard.expression")
    );
    assert!(publish::prepare_publication(&reloaded).is_err());
}

#[test]
fn plain_string_guard_is_checked_too() {
    let mut workflow = valid_workflow();
    let mut approve = Transition::new("approve", &["review"], &["done"]);
    approve.guard = Guard::new("is_granted('ROLE_EDITOR') and (subject.isReady()");
    workflow.add_transition(approve);
    let results = lint::validate(&workflow);
    assert!(messages(&results)
        .contains(&"Guard expression in transition \"approve\" has unbalanced parentheses"));
}

#[test]
fn empty_workflow_is_sorted_errors_first() {
    let results = LintRegistry::new().run(&Workflow::new("Bad Name"));
    assert_snapshot!(
        serde_json::to_string_pretty(&results).unwrap(),
        @r###"
    [
      {
        "code": "WFD-LINT-001",
        "type": "error",
        "message": "Workflow name must be lowercase, start with a letter, and contain only letters, numbers, and underscores",
        "field": "name",
        "suggestion": "try 'bad_name'"
      },
      {
        "code": "WFD-LINT-002",
        "type": "error",
        "message": "At least one supported class must be specified for Simple strategy",
        "field": "supports"
      },
      {
        "code": "WFD-LINT-003",
        "type": "error",
        "message": "Initial marking (initial place) is required",
        "field": "initialMarking"
      },
      {
        "code": "WFD-LINT-004",
        "type": "error",
        "message": "At least one place must be defined",
        "field": "places"
      },
      {
        "code": "WFD-LINT-005",
        "type": "warning",
        "message": "No transitions defined - workflow will have no state changes",
        "field": "transitions"
      }
    ]
    "###
    );
}
