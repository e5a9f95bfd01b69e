//! Typed view of the Pimcore workflow configuration:
//!
//! ```yaml
//! pimcore:
//!   workflows:
//!     <name>:
//!       label: ...
//!       priority: 1
//!       type: workflow
//!       supports: [...]            # or support_strategy
//!       initial_markings: [draft]
//!       marking_store: {type: state_table}
//!       audit_trail: {enabled: true}
//!       places: {...}
//!       transitions: {...}
//!       globalActions: {...}
//! ```
//!
//! Maps are `IndexMap`s so emitted YAML keeps the editor's order.

use crate::core::workflow_graph::model::lenient::{
    blank_as_none, default_on_empty, one_or_many, optional_one_or_many,
};
use crate::core::workflow_graph::model::{
    Guard, NotificationSetting, PermissionRule, PublicationStateChange, TransitionNotes,
    WorkflowType,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `pimcore.workflows.<name>` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PimcoreDocument {
    pub pimcore: PimcoreSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PimcoreSection {
    pub workflows: IndexMap<String, WorkflowConfig>,
}

impl PimcoreDocument {
    pub fn single(name: impl Into<String>, config: WorkflowConfig) -> Self {
        let mut workflows = IndexMap::new();
        workflows.insert(name.into(), config);
        Self {
            pimcore: PimcoreSection { workflows },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkflowType>,
    #[serde(
        default,
        deserialize_with = "optional_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub supports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_strategy: Option<SupportStrategyConfig>,
    #[serde(
        default,
        deserialize_with = "optional_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_markings: Option<Vec<String>>,
    /// Singular form written by older Symfony configs. Import only.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_marking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marking_store: Option<MarkingStoreConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_trail: Option<AuditTrailConfig>,
    #[serde(
        default,
        deserialize_with = "default_on_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub places: PlacesConfig,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub transitions: IndexMap<String, TransitionConfig>,
    #[serde(
        rename = "globalActions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub global_actions: Option<Value>,
}

/// `support_strategy`: `{type: expression, arguments: [Class, expr]}`,
/// `{service: Id}`, or a bare service id from older configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupportStrategyConfig {
    Service(String),
    Structured(SupportStrategySpec),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SupportStrategySpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkingStoreConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(
        default,
        deserialize_with = "default_on_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditTrailConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Places as `[draft, review]` or as `{draft: ~, review: {label: ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacesConfig {
    List(Vec<String>),
    Map(IndexMap<String, Option<PlaceConfig>>),
}

impl Default for PlacesConfig {
    fn default() -> Self {
        PlacesConfig::Map(IndexMap::new())
    }
}

impl PlacesConfig {
    /// Every place with its config body (`None` for bare names).
    pub fn entries(&self) -> Vec<(String, Option<PlaceConfig>)> {
        match self {
            PlacesConfig::List(names) => names.iter().map(|n| (n.clone(), None)).collect(),
            PlacesConfig::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceConfig {
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_inverted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_in_header: Option<bool>,
    #[serde(
        default,
        deserialize_with = "default_on_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permissions: Vec<PermissionRule>,
    #[serde(
        default,
        deserialize_with = "default_on_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub metadata: Map<String, Value>,
}

impl PlaceConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn no_guard(guard: &Guard) -> bool {
    !guard.is_set()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default, deserialize_with = "one_or_many")]
    pub from: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "no_guard")]
    pub guard: Guard,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TransitionOptions>,
    #[serde(
        default,
        deserialize_with = "default_on_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub metadata: Map<String, Value>,
}

/// Pimcore-specific `options` block. Unknown keys are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_layout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<TransitionNotes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_settings: Vec<NotificationSetting>,
    #[serde(
        rename = "changePublishedState",
        alias = "changePublicationState",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub change_published_state: Option<PublicationStateChange>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransitionOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
