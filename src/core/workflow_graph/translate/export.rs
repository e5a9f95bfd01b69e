//! Model to Pimcore configuration.

use super::config::{
    AuditTrailConfig, MarkingStoreConfig, PimcoreDocument, PlaceConfig, PlacesConfig,
    SupportStrategyConfig, SupportStrategySpec, TransitionConfig, TransitionOptions,
    WorkflowConfig,
};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::workflow_graph::model::{
    MarkingStoreType, NotificationSetting, Place, PublicationStateChange, SupportStrategy,
    Transition, Workflow,
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

/// Option keys owned by dedicated transition fields; free-form options never override them.
const RESERVED_OPTION_KEYS: &[&str] = &[
    "label",
    "iconClass",
    "objectLayout",
    "notes",
    "notificationSettings",
    "changePublishedState",
    "changePublicationState",
];

/// Build the configuration block for one workflow.
pub fn to_config(workflow: &Workflow) -> WorkflowConfig {
    let mut config = WorkflowConfig {
        // Written only when set; Pimcore falls back to the workflow key itself.
        label: workflow.label().map(str::to_string),
        priority: Some(1),
        kind: Some(workflow.kind()),
        ..Default::default()
    };

    apply_support(workflow, &mut config);

    if let Some(initial) = workflow.initial_marking() {
        config.initial_markings = Some(vec![initial.to_string()]);
    }

    let store = workflow.marking_store();
    let kind = if store.kind.is_exportable() {
        store.kind
    } else {
        warn!(
            workflow = workflow.name(),
            marking_store = %store.kind,
            "marking store type not accepted by Pimcore, exporting state_table"
        );
        MarkingStoreType::StateTable
    };
    config.marking_store = Some(MarkingStoreConfig {
        kind: Some(kind.as_str().to_string()),
        property: store.property.clone(),
        arguments: store.arguments.clone(),
    });

    if workflow.audit_trail_enabled() {
        config.audit_trail = Some(AuditTrailConfig { enabled: true });
    }

    config.metadata = workflow.metadata().clone();
    config.places = PlacesConfig::Map(
        workflow
            .places()
            .iter()
            .map(|place| {
                let body = place_config(place);
                (place.name.clone(), (!body.is_empty()).then_some(body))
            })
            .collect(),
    );
    config.transitions = workflow
        .transitions()
        .iter()
        .map(|transition| (transition.name.clone(), transition_config(transition)))
        .collect::<IndexMap<_, _>>();

    if !is_empty_actions(workflow.global_actions()) {
        config.global_actions = Some(workflow.global_actions().clone());
    }

    debug!(
        workflow = workflow.name(),
        places = workflow.places().len(),
        transitions = workflow.transitions().len(),
        "workflow exported"
    );
    config
}

/// Full `pimcore.workflows.<name>` document.
pub fn to_document(workflow: &Workflow) -> PimcoreDocument {
    PimcoreDocument::single(workflow.name(), to_config(workflow))
}

pub fn to_yaml(workflow: &Workflow) -> Result<String, AppError> {
    serde_yaml::to_string(&to_document(workflow)).map_err(|err| {
        AppError::with_source(
            ErrorCategory::SerializationError,
            format!("Failed to render workflow '{}' as YAML", workflow.name()),
            err,
        )
        .with_code("WFD-EXPORT-001")
    })
}

/// Simple strategies list their classes; the others degrade to a plain
/// `supports` list when their payload is missing.
fn apply_support(workflow: &Workflow, config: &mut WorkflowConfig) {
    let supports = workflow.supports();
    match workflow.support_strategy() {
        SupportStrategy::Simple => config.supports = Some(supports.to_vec()),
        SupportStrategy::Expression { expression } => {
            match supports.first().filter(|class| !class.trim().is_empty()) {
                Some(class) if !expression.trim().is_empty() => {
                    config.support_strategy =
                        Some(SupportStrategyConfig::Structured(SupportStrategySpec {
                            kind: Some("expression".to_string()),
                            arguments: vec![
                                Value::String(class.clone()),
                                Value::String(expression.clone()),
                            ],
                            service: None,
                        }));
                }
                _ => {
                    warn!(
                        workflow = workflow.name(),
                        "expression strategy incomplete, exporting plain supports"
                    );
                    config.supports = Some(supports.to_vec());
                }
            }
        }
        SupportStrategy::Custom { service } => {
            if service.trim().is_empty() {
                warn!(
                    workflow = workflow.name(),
                    "custom strategy has no service, exporting plain supports"
                );
                config.supports = Some(supports.to_vec());
            } else {
                config.support_strategy =
                    Some(SupportStrategyConfig::Structured(SupportStrategySpec {
                        service: Some(service.clone()),
                        ..Default::default()
                    }));
            }
        }
    }
}

fn place_config(place: &Place) -> PlaceConfig {
    PlaceConfig {
        label: place.label.clone(),
        title: place.title.clone(),
        color: place.color.clone(),
        color_inverted: place.color_inverted.then_some(true),
        visible_in_header: (!place.visible_in_header).then_some(false),
        permissions: place.permissions.clone(),
        metadata: place.metadata.clone(),
    }
}

fn transition_config(transition: &Transition) -> TransitionConfig {
    let mut options = TransitionOptions {
        label: transition.label.clone(),
        icon_class: transition.icon_class.clone(),
        object_layout: transition
            .object_layout
            .clone()
            .filter(|layout| !layout.is_null()),
        notes: (!transition.notes.is_empty()).then(|| transition.notes.clone()),
        notification_settings: clean_notifications(&transition.notification_settings),
        change_published_state: (transition.change_publication_state
            != PublicationStateChange::NoChange)
            .then_some(transition.change_publication_state),
        ..Default::default()
    };
    for (key, value) in &transition.options {
        if !RESERVED_OPTION_KEYS.contains(&key.as_str()) {
            options.extra.insert(key.clone(), value.clone());
        }
    }

    TransitionConfig {
        from: transition.from.clone(),
        to: transition.to.clone(),
        guard: transition.guard.clone(),
        options: (!options.is_empty()).then_some(options),
        metadata: transition.metadata.clone(),
    }
}

/// Drop blank fields and settings that end up empty.
fn clean_notifications(settings: &[NotificationSetting]) -> Vec<NotificationSetting> {
    let non_blank = |values: &[String]| -> Vec<String> {
        values
            .iter()
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .collect()
    };
    settings
        .iter()
        .map(|setting| NotificationSetting {
            channel_type: non_blank(&setting.channel_type),
            notify_users: non_blank(&setting.notify_users),
            notify_roles: non_blank(&setting.notify_roles),
            mail_type: setting.mail_type.clone().filter(|v| !v.trim().is_empty()),
            mail_path: setting.mail_path.clone().filter(|v| !v.trim().is_empty()),
        })
        .filter(|setting| !setting.is_empty())
        .collect()
}

fn is_empty_actions(actions: &Value) -> bool {
    match actions {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
