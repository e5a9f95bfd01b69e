use super::guard::Guard;
use super::lenient::{blank_as_none, default_on_empty, one_or_many};
use super::name_map::Named;
use super::support::PublicationStateChange;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Directed edge between places. `from` and `to` name places; they are not
/// resolved until validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub object_layout: Option<Value>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub from: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub to: Vec<String>,
    #[serde(default)]
    pub guard: Guard,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub options: Map<String, Value>,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub notes: TransitionNotes,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub notification_settings: Vec<NotificationSetting>,
    #[serde(
        default,
        alias = "changePublishedState",
        deserialize_with = "default_on_empty"
    )]
    pub change_publication_state: PublicationStateChange,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub metadata: Map<String, Value>,
}

impl Transition {
    pub fn new(name: impl Into<String>, from: &[&str], to: &[&str]) -> Self {
        Self {
            name: name.into(),
            from: from.iter().map(|p| p.to_string()).collect(),
            to: to.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_guard(mut self, expression: impl AsRef<str>) -> Self {
        self.guard = Guard::new(expression);
        self
    }

    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn starts_at(&self, place: &str) -> bool {
        self.from.iter().any(|p| p == place)
    }

    /// Replace every reference to `from` in both endpoint lists.
    pub(crate) fn rename_place(&mut self, from: &str, to: &str) {
        for name in self.from.iter_mut().chain(self.to.iter_mut()) {
            if name == from {
                *name = to.to_string();
            }
        }
    }
}

impl Named for Transition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Comment prompt shown when the transition fires.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionNotes {
    pub comment_enabled: bool,
    pub comment_required: bool,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub comment_setter_fn: Option<String>,
    pub comment_getter_fn: Option<String>,
}

impl TransitionNotes {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSetting {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub channel_type: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub notify_users: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub notify_roles: Vec<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub mail_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub mail_path: Option<String>,
}

impl NotificationSetting {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
