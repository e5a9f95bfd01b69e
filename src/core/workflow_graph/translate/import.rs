//! Pimcore configuration to model.

use super::config::{PlaceConfig, SupportStrategyConfig, TransitionConfig, WorkflowConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::workflow_graph::model::{
    MarkingStore, MarkingStoreType, Place, SupportStrategy, Transition, Workflow, WorkflowEdit,
};
use serde_json::Value as JsonValue;
use serde_yaml::Value;
use tracing::{debug, warn};

/// Name given to a bare single-workflow document.
pub const DEFAULT_IMPORT_NAME: &str = "imported_workflow";

/// Parse YAML text holding either `pimcore.workflows.<name>`,
/// `workflows.<name>` or a bare workflow block. Only the first workflow is read.
pub fn from_yaml(yaml: &str) -> Result<Workflow, AppError> {
    let document: Value = serde_yaml::from_str(yaml).map_err(|err| {
        AppError::with_source(
            ErrorCategory::SerializationError,
            format!("Invalid YAML: {}", err),
            err,
        )
        .with_code("WFD-IMPORT-001")
    })?;
    from_yaml_value(document)
}

pub fn from_yaml_value(document: Value) -> Result<Workflow, AppError> {
    let (name, body) = locate_workflow(document)?;
    let config: WorkflowConfig = serde_yaml::from_value(body).map_err(|err| {
        AppError::with_source(
            ErrorCategory::SerializationError,
            format!("Invalid workflow configuration for '{}': {}", name, err),
            err,
        )
        .with_code("WFD-IMPORT-002")
    })?;
    Ok(from_config(&name, config))
}

fn locate_workflow(document: Value) -> Result<(String, Value), AppError> {
    let missing = || {
        AppError::new(
            ErrorCategory::ValidationError,
            "No workflow configuration found",
        )
        .with_code("WFD-IMPORT-003")
    };

    let wrapped = document
        .get("pimcore")
        .and_then(|pimcore| pimcore.get("workflows"))
        .or_else(|| document.get("workflows"))
        .cloned();

    match wrapped {
        Some(Value::Mapping(workflows)) => {
            let (key, body) = workflows.into_iter().next().ok_or_else(missing)?;
            let name = match key {
                Value::String(name) => name,
                other => serde_yaml::to_string(&other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|_| DEFAULT_IMPORT_NAME.to_string()),
            };
            if !body.is_mapping() {
                return Err(missing());
            }
            Ok((name, body))
        }
        Some(_) => Err(missing()),
        None if document.is_mapping() => Ok((DEFAULT_IMPORT_NAME.to_string(), document)),
        None => Err(missing()),
    }
}

/// Build a workflow from an already parsed configuration block.
pub fn from_config(name: &str, config: WorkflowConfig) -> Workflow {
    let mut workflow = Workflow::new(name);
    workflow.apply(WorkflowEdit::SetLabel(config.label));
    if let Some(kind) = config.kind {
        workflow.apply(WorkflowEdit::SetType(kind));
    }
    if let Some(supports) = config.supports {
        workflow.apply(WorkflowEdit::SetSupports(supports));
    }
    if let Some(strategy) = config.support_strategy {
        import_strategy(&mut workflow, strategy);
    }

    let initial = config
        .initial_markings
        .and_then(|markings| markings.into_iter().next())
        .or(config.initial_marking);
    workflow.apply(WorkflowEdit::SetInitialMarking(initial));

    if let Some(store) = config.marking_store {
        workflow.apply(WorkflowEdit::SetMarkingStore(MarkingStore {
            kind: store
                .kind
                .as_deref()
                .map(MarkingStoreType::parse_lenient)
                .unwrap_or_default(),
            property: store.property,
            arguments: store.arguments,
        }));
    }
    if let Some(audit) = config.audit_trail {
        workflow.apply(WorkflowEdit::SetAuditTrail(audit.enabled));
    }
    workflow.apply(WorkflowEdit::SetMetadata(config.metadata));

    for (place_name, body) in config.places.entries() {
        workflow.add_place(place_from_config(place_name, body.unwrap_or_default()));
    }
    for (transition_name, body) in config.transitions {
        workflow.add_transition(transition_from_config(transition_name, body));
    }
    if let Some(actions) = config.global_actions {
        workflow.apply(WorkflowEdit::SetGlobalActions(actions));
    }

    debug!(
        workflow = workflow.name(),
        places = workflow.places().len(),
        transitions = workflow.transitions().len(),
        "workflow imported"
    );
    workflow
}

fn import_strategy(workflow: &mut Workflow, strategy: SupportStrategyConfig) {
    let spec = match strategy {
        SupportStrategyConfig::Service(service) => {
            workflow.set_support_strategy(SupportStrategy::Custom { service });
            return;
        }
        SupportStrategyConfig::Structured(spec) => spec,
    };

    if let Some(service) = spec.service {
        workflow.set_support_strategy(SupportStrategy::Custom { service });
        return;
    }

    match spec.kind.as_deref() {
        Some("expression") => {
            let mut arguments = spec.arguments.into_iter().map(|arg| match arg {
                JsonValue::String(text) => text,
                other => other.to_string(),
            });
            if let Some(class) = arguments.next() {
                workflow.set_supports([class]);
            }
            let expression = arguments.next().unwrap_or_default();
            workflow.set_support_strategy(SupportStrategy::Expression { expression });
        }
        Some("simple") | None => {}
        Some(other) => {
            warn!(
                workflow = workflow.name(),
                strategy = other,
                "unrecognised support_strategy, keeping simple supports"
            );
        }
    }
}

fn place_from_config(name: String, config: PlaceConfig) -> Place {
    let mut place = Place::new(name);
    place.label = config.label;
    place.title = config.title;
    place.color = config.color;
    place.color_inverted = config.color_inverted.unwrap_or(false);
    place.visible_in_header = config.visible_in_header.unwrap_or(true);
    place.permissions = config.permissions;
    place.metadata = config.metadata;
    place
}

fn transition_from_config(name: String, config: TransitionConfig) -> Transition {
    let mut transition = Transition {
        name,
        from: config.from,
        to: config.to,
        guard: config.guard,
        metadata: config.metadata,
        ..Default::default()
    };
    if let Some(options) = config.options {
        transition.label = options.label.filter(|l| !l.trim().is_empty());
        transition.icon_class = options.icon_class.filter(|c| !c.trim().is_empty());
        transition.object_layout = options.object_layout.filter(|l| !l.is_null());
        transition.notes = options.notes.unwrap_or_default();
        transition.notification_settings = options.notification_settings;
        transition.change_publication_state = options.change_published_state.unwrap_or_default();
        transition.options = options.extra;
    }
    transition
}

/// Advisory findings about an imported workflow, separate from full validation.
pub fn import_issues(workflow: &Workflow) -> Vec<String> {
    let mut issues = Vec::new();
    if workflow.name().is_empty() {
        issues.push("Workflow name is missing".to_string());
    }
    if workflow.places().is_empty() {
        issues.push("No places defined".to_string());
    }
    if workflow.initial_marking().is_none() {
        issues.push("No initial marking defined".to_string());
    }
    if workflow.supports().is_empty() {
        issues.push("No supported classes defined".to_string());
    }
    issues
}
