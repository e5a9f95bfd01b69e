use insta::assert_snapshot;
use serde_json::json;
use workflow_designer::core::error::AppError;
use workflow_designer::core::types::ErrorCategory;
use workflow_designer::core::workflow_graph::{
    model::{
        MarkingStoreType, Place, PublicationStateChange, SupportStrategy, Transition, Workflow,
        WorkflowType,
    },
    translate::{
        self,
        config::{SupportStrategyConfig, SupportStrategySpec},
        guard,
    },
};

fn editorial() -> Workflow {
    let mut workflow = Workflow::new("article");
    workflow
        .add_place(Place::new("draft").with_label("Draft").with_color("#cccccc"))
        .add_place(Place::new("review"))
        .add_place(Place::new("published"))
        .add_transition(Transition::new("submit", &["draft"], &["review"]).with_label("Submit"))
        .add_transition(
            Transition::new("publish", &["review"], &["published"])
                .with_guard("is_granted('ROLE_PUBLISHER')"),
        )
        .set_initial_marking("draft")
        .set_supports(["Pimcore\\Model\\DataObject\\Article"]);
    workflow
}

#[test]
fn export_renders_pimcore_document() {
    let yaml = translate::to_yaml(&editorial()).unwrap();
    assert_snapshot!(yaml, @r###"
    pimcore:
      workflows:
        article:
          priority: 1
          type: workflow
          supports:
          - Pimcore\Model\DataObject\Article
          initial_markings:
          - draft
          marking_store:
            type: state_table
          places:
            draft:
              label: Draft
              color: '#cccccc'
            review: null
            published: null
          transitions:
            submit:
              from:
              - draft
              to:
              - review
              options:
                label: Submit
            publish:
              from:
              - review
              to:
              - published
              guard: is_granted('ROLE_PUBLISHER')
    "###);
}

#[test]
fn yaml_round_trip_preserves_definition() {
    let mut original = editorial();
    original.set_support_strategy(SupportStrategy::Expression {
        expression: "subject.getPublished() == false".to_string(),
    });
    let mut transition = Transition::new("archive", &["published"], &["draft"]);
    transition.change_publication_state = PublicationStateChange::ForceUnpublished;
    transition
        .options
        .insert("customFlag".to_string(), json!(true));
    original.add_transition(transition);

    let yaml = translate::to_yaml(&original).unwrap();
    let imported = translate::from_yaml(&yaml).unwrap();
    assert!(imported.same_definition(&original), "{}", yaml);
    assert_eq!(
        imported.transition("archive").unwrap().change_publication_state,
        PublicationStateChange::ForceUnpublished
    );
}

#[test]
fn json_round_trip_preserves_everything() {
    let original = editorial();
    let json = translate::to_json(&original, false).unwrap();
    let imported = translate::from_json(&json).unwrap();
    assert!(imported.same_definition(&original));
    assert_eq!(imported.id(), original.id());
    assert_eq!(imported.created_at(), original.created_at());
}

#[test]
fn import_accepts_symfony_shapes() {
    let yaml = r#"
framework:
  ignored: true
workflows:
  blog_post:
    type: state_machine
    supports: App\Entity\BlogPost
    initial_marking: draft
    marking_store:
      type: method
      property: currentPlace
    places: [draft, reviewed, rejected]
    transitions:
      to_review:
        from: draft
        to: reviewed
        guard:
          roles: [ROLE_REVIEWER]
          permissions: [review, comment]
      reject:
        from: [reviewed]
        to: rejected
        options:
          changePublicationState: save_version
"#;
    let workflow = translate::from_yaml(yaml).unwrap();
    assert_eq!(workflow.name(), "blog_post");
    assert_eq!(workflow.kind(), WorkflowType::StateMachine);
    assert_eq!(workflow.supports(), ["App\\Entity\\BlogPost"]);
    assert_eq!(workflow.initial_marking(), Some("draft"));
    assert_eq!(workflow.marking_store().kind, MarkingStoreType::Method);
    assert_eq!(workflow.marking_store().property.as_deref(), Some("currentPlace"));
    assert_eq!(workflow.places().len(), 3);
    assert_eq!(
        workflow.transition("to_review").unwrap().guard.expression(),
        Some("is_granted('ROLE_REVIEWER') and (subject.isAllowed('review') and subject.isAllowed('comment'))")
    );
    assert_eq!(
        workflow.transition("reject").unwrap().change_publication_state,
        PublicationStateChange::SaveVersion
    );

    let exported = translate::to_config(&workflow);
    assert_eq!(
        exported.marking_store.unwrap().kind.as_deref(),
        Some("state_table")
    );
}

#[test]
fn expression_strategy_imports_target_class() {
    let yaml = r#"
pimcore:
  workflows:
    product:
      support_strategy:
        type: expression
        arguments:
          - Pimcore\Model\DataObject\Product
          - "is_fully_authenticated() and subject.getPublished()"
      places: {new: ~}
"#;
    let workflow = translate::from_yaml(yaml).unwrap();
    assert_eq!(workflow.supports(), ["Pimcore\\Model\\DataObject\\Product"]);
    assert_eq!(
        *workflow.support_strategy(),
        SupportStrategy::Expression {
            expression: "is_fully_authenticated() and subject.getPublished()".to_string()
        }
    );
}

#[test]
fn expression_strategy_exports_only_its_target_class() {
    let mut workflow = editorial();
    workflow
        .set_supports(["App\\Entity\\Article", "App\\Entity\\News"])
        .set_support_strategy(SupportStrategy::Expression {
            expression: "subject.isReady()".to_string(),
        });

    let config = translate::to_config(&workflow);
    assert_eq!(config.supports, None);
    assert_eq!(
        config.support_strategy,
        Some(SupportStrategyConfig::Structured(SupportStrategySpec {
            kind: Some("expression".to_string()),
            arguments: vec![json!("App\\Entity\\Article"), json!("subject.isReady()")],
            service: None,
        }))
    );
    assert_eq!(workflow.supports().len(), 2);
}

#[test]
fn guard_synthesis_from_roles_and_permissions() {
    let roles = vec!["ROLE_A".to_string(), "ROLE_B".to_string()];
    let permissions = vec!["edit".to_string()];
    assert_eq!(
        guard::synthesize(&roles, &permissions).as_deref(),
        Some("(is_granted('ROLE_A') or is_granted('ROLE_B')) and subject.isAllowed('edit')")
    );
    assert_eq!(
        guard::synthesize(&roles[..1], &[]).as_deref(),
        Some("is_granted('ROLE_A')")
    );
    assert_eq!(guard::synthesize(&[], &[]), None);
}

#[test]
fn unparseable_input_is_rejected_whole() {
    let err: AppError = translate::from_yaml("places: [draft\n").unwrap_err();
    assert_eq!(err.category, ErrorCategory::SerializationError);
    assert_eq!(err.code, "WFD-IMPORT-001");
    assert!(err.message.starts_with("Invalid YAML"));

    let err = translate::from_yaml("workflows: [not, a, map]\n").unwrap_err();
    assert_eq!(err.message, "No workflow configuration found");
}

#[test]
fn import_file_detects_format() {
    let dir = tempfile::TempDir::new().unwrap();
    let yaml_path = dir.path().join("article.yml");
    std::fs::write(&yaml_path, translate::to_yaml(&editorial()).unwrap()).unwrap();
    let workflow = translate::import_file(&yaml_path).unwrap();
    assert_eq!(workflow.name(), "article");

    let err = translate::import_file(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.category, ErrorCategory::NotFound);

    let txt = dir.path().join("article.txt");
    std::fs::write(&txt, "x").unwrap();
    let err = translate::import_file(&txt).unwrap_err();
    assert_eq!(err.message, "Unsupported file format: txt");
}
