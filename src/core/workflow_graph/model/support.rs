use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// `workflow` holds a single token; `state_machine` may hold several places at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    #[default]
    Workflow,
    StateMachine,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Workflow => "workflow",
            WorkflowType::StateMachine => "state_machine",
        }
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow" => Ok(WorkflowType::Workflow),
            "state_machine" => Ok(WorkflowType::StateMachine),
            other => Err(format!(
                "invalid workflow type \"{}\" (expected workflow or state_machine)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Draft => f.write_str("draft"),
            WorkflowStatus::Published => f.write_str("published"),
        }
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(WorkflowStatus::Draft),
            "published" => Ok(WorkflowStatus::Published),
            other => Err(format!(
                "invalid workflow status \"{}\" (expected draft or published)",
                other
            )),
        }
    }
}

/// Which subjects a workflow applies to.
///
/// The supported classes themselves live on `Workflow::supports`; `Expression`
/// uses only the first of them and `Custom` ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SupportStrategy {
    #[default]
    Simple,
    Expression { expression: String },
    Custom { service: String },
}

impl SupportStrategy {
    pub fn kind(&self) -> &'static str {
        match self {
            SupportStrategy::Simple => "simple",
            SupportStrategy::Expression { .. } => "expression",
            SupportStrategy::Custom { .. } => "custom",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SupportInput {
    Service(String),
    Record(SupportRecord),
    Null(()),
}

#[derive(Deserialize)]
struct SupportRecord {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    service: Option<String>,
}

impl<'de> Deserialize<'de> for SupportStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match SupportInput::deserialize(deserializer)? {
            SupportInput::Service(service) => Ok(SupportStrategy::Custom { service }),
            SupportInput::Null(()) => Ok(SupportStrategy::Simple),
            SupportInput::Record(record) => match record.kind.as_deref().unwrap_or("simple") {
                "simple" => Ok(SupportStrategy::Simple),
                "expression" => Ok(SupportStrategy::Expression {
                    expression: record.expression.unwrap_or_default(),
                }),
                "custom" => Ok(SupportStrategy::Custom {
                    service: record.service.unwrap_or_default(),
                }),
                other => Err(de::Error::custom(format!(
                    "invalid support strategy type \"{}\" (expected simple, expression or custom)",
                    other
                ))),
            },
        }
    }
}

/// Storage backend for the subject's marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingStoreType {
    #[default]
    StateTable,
    Method,
    SingleState,
    MultipleState,
    DataObjectMultipleState,
    DataObjectSplittedState,
}

impl MarkingStoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkingStoreType::StateTable => "state_table",
            MarkingStoreType::Method => "method",
            MarkingStoreType::SingleState => "single_state",
            MarkingStoreType::MultipleState => "multiple_state",
            MarkingStoreType::DataObjectMultipleState => "data_object_multiple_state",
            MarkingStoreType::DataObjectSplittedState => "data_object_splitted_state",
        }
    }

    /// Whether the Pimcore configuration accepts this type as-is.
    pub fn is_exportable(&self) -> bool {
        !matches!(self, MarkingStoreType::Method)
    }

    /// Parse a marking store name, falling back to `state_table` for anything unknown.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(
                marking_store = value,
                "unknown marking store type, using state_table"
            );
            MarkingStoreType::StateTable
        })
    }
}

impl fmt::Display for MarkingStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkingStoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "state_table" => Ok(MarkingStoreType::StateTable),
            "method" => Ok(MarkingStoreType::Method),
            "single_state" => Ok(MarkingStoreType::SingleState),
            "multiple_state" => Ok(MarkingStoreType::MultipleState),
            "data_object_multiple_state" => Ok(MarkingStoreType::DataObjectMultipleState),
            "data_object_splitted_state" => Ok(MarkingStoreType::DataObjectSplittedState),
            other => Err(format!("unknown marking store type \"{}\"", other)),
        }
    }
}

impl<'de> Deserialize<'de> for MarkingStoreType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .map(MarkingStoreType::parse_lenient)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkingStore {
    #[serde(rename = "type", default)]
    pub kind: MarkingStoreType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::default_on_empty")]
    pub arguments: Vec<serde_json::Value>,
}

/// How firing a transition affects the Pimcore element's published flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStateChange {
    #[default]
    #[serde(alias = "none")]
    NoChange,
    ForcePublished,
    ForceUnpublished,
    SaveVersion,
}

impl PublicationStateChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStateChange::NoChange => "no_change",
            PublicationStateChange::ForcePublished => "force_published",
            PublicationStateChange::ForceUnpublished => "force_unpublished",
            PublicationStateChange::SaveVersion => "save_version",
        }
    }
}
