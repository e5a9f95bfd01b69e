use super::lenient::{blank_as_none, default_on_empty, one_or_many, timestamp_or_now};
use super::name_map::NameMap;
use super::place::Place;
use super::support::{MarkingStore, SupportStrategy, WorkflowStatus, WorkflowType};
use super::transition::Transition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_name() -> String {
    "Unnamed Workflow".to_string()
}

fn empty_actions() -> Value {
    Value::Array(Vec::new())
}

fn actions_or_empty<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .filter(|value| !value.is_null())
        .unwrap_or_else(empty_actions))
}

/// The aggregate root: a named graph of places and transitions plus the
/// Pimcore settings published alongside it.
///
/// Fields are private so that every change goes through [`Workflow::apply`],
/// which refreshes `updated_at`. Nothing here validates; an edited workflow
/// may be structurally broken until the lint pass says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default = "new_id")]
    id: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    label: Option<String>,
    #[serde(rename = "type", default)]
    kind: WorkflowType,
    #[serde(default, deserialize_with = "one_or_many")]
    supports: Vec<String>,
    #[serde(default)]
    support_strategy: SupportStrategy,
    #[serde(default, deserialize_with = "blank_as_none")]
    initial_marking: Option<String>,
    #[serde(default)]
    places: NameMap<Place>,
    #[serde(default)]
    transitions: NameMap<Transition>,
    #[serde(default = "empty_actions", deserialize_with = "actions_or_empty")]
    global_actions: Value,
    #[serde(default, deserialize_with = "default_on_empty")]
    metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "default_on_empty")]
    marking_store: MarkingStore,
    #[serde(default)]
    audit_trail_enabled: bool,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(default)]
    status: WorkflowStatus,
}

/// A single change to a workflow. [`Workflow::apply`] is the only mutation path.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEdit {
    Rename(String),
    SetLabel(Option<String>),
    SetType(WorkflowType),
    SetSupports(Vec<String>),
    SetSupportStrategy(SupportStrategy),
    SetInitialMarking(Option<String>),
    /// Insert or replace the place with the same name.
    UpsertPlace(Place),
    RemovePlace(String),
    /// Re-key a place and rewrite every reference to it.
    RenamePlace { from: String, to: String },
    /// Insert or replace the transition with the same name.
    UpsertTransition(Transition),
    RemoveTransition(String),
    SetGlobalActions(Value),
    SetMetadata(Map<String, Value>),
    SetMarkingStore(MarkingStore),
    SetAuditTrail(bool),
    SetStatus(WorkflowStatus),
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            label: None,
            kind: WorkflowType::default(),
            supports: Vec::new(),
            support_strategy: SupportStrategy::default(),
            initial_marking: None,
            places: NameMap::new(),
            transitions: NameMap::new(),
            global_actions: empty_actions(),
            metadata: Map::new(),
            marking_store: MarkingStore::default(),
            audit_trail_enabled: false,
            created_at: now,
            updated_at: now,
            version: None,
            status: WorkflowStatus::default(),
        }
    }

    pub fn apply(&mut self, edit: WorkflowEdit) -> &mut Self {
        match edit {
            WorkflowEdit::Rename(name) => self.name = name,
            WorkflowEdit::SetLabel(label) => {
                self.label = label.filter(|l| !l.trim().is_empty());
            }
            WorkflowEdit::SetType(kind) => self.kind = kind,
            WorkflowEdit::SetSupports(supports) => self.supports = supports,
            WorkflowEdit::SetSupportStrategy(strategy) => self.support_strategy = strategy,
            WorkflowEdit::SetInitialMarking(place) => {
                self.initial_marking = place.filter(|p| !p.trim().is_empty());
            }
            WorkflowEdit::UpsertPlace(place) => {
                self.places.insert(place);
            }
            WorkflowEdit::RemovePlace(name) => {
                self.places.remove(&name);
            }
            WorkflowEdit::RenamePlace { from, to } => self.cascade_place_rename(&from, &to),
            WorkflowEdit::UpsertTransition(transition) => {
                self.transitions.insert(transition);
            }
            WorkflowEdit::RemoveTransition(name) => {
                self.transitions.remove(&name);
            }
            WorkflowEdit::SetGlobalActions(actions) => {
                self.global_actions = if actions.is_null() {
                    empty_actions()
                } else {
                    actions
                };
            }
            WorkflowEdit::SetMetadata(metadata) => self.metadata = metadata,
            WorkflowEdit::SetMarkingStore(store) => self.marking_store = store,
            WorkflowEdit::SetAuditTrail(enabled) => self.audit_trail_enabled = enabled,
            WorkflowEdit::SetStatus(status) => self.status = status,
        }
        self.touch()
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) -> &mut Self {
        self.updated_at = Utc::now().max(self.updated_at);
        self
    }

    fn cascade_place_rename(&mut self, from: &str, to: &str) {
        if !self.places.rename(from, to) {
            return;
        }
        for transition in self.transitions.iter_mut() {
            transition.rename_place(from, to);
        }
        if self.initial_marking.as_deref() == Some(from) {
            self.initial_marking = Some(to.to_string());
        }
    }

    pub fn add_place(&mut self, place: Place) -> &mut Self {
        self.apply(WorkflowEdit::UpsertPlace(place))
    }

    pub fn remove_place(&mut self, name: &str) -> bool {
        let existed = self.places.contains(name);
        self.apply(WorkflowEdit::RemovePlace(name.to_string()));
        existed
    }

    pub fn rename_place(&mut self, from: &str, to: &str) -> bool {
        let existed = self.places.contains(from);
        self.apply(WorkflowEdit::RenamePlace {
            from: from.to_string(),
            to: to.to_string(),
        });
        existed
    }

    pub fn add_transition(&mut self, transition: Transition) -> &mut Self {
        self.apply(WorkflowEdit::UpsertTransition(transition))
    }

    pub fn remove_transition(&mut self, name: &str) -> bool {
        let existed = self.transitions.contains(name);
        self.apply(WorkflowEdit::RemoveTransition(name.to_string()));
        existed
    }

    pub fn set_initial_marking(&mut self, place: impl Into<String>) -> &mut Self {
        self.apply(WorkflowEdit::SetInitialMarking(Some(place.into())))
    }

    pub fn set_supports<I, S>(&mut self, classes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes = classes.into_iter().map(Into::into).collect();
        self.apply(WorkflowEdit::SetSupports(classes))
    }

    pub fn set_support_strategy(&mut self, strategy: SupportStrategy) -> &mut Self {
        self.apply(WorkflowEdit::SetSupportStrategy(strategy))
    }

    pub fn set_status(&mut self, status: WorkflowStatus) -> &mut Self {
        self.apply(WorkflowEdit::SetStatus(status))
    }

    /// Snapshot copy carrying a version number. Does not count as an edit.
    pub fn with_version(&self, version: u32) -> Self {
        Self {
            version: Some(version),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> WorkflowType {
        self.kind
    }

    pub fn supports(&self) -> &[String] {
        &self.supports
    }

    pub fn support_strategy(&self) -> &SupportStrategy {
        &self.support_strategy
    }

    pub fn initial_marking(&self) -> Option<&str> {
        self.initial_marking.as_deref()
    }

    pub fn places(&self) -> &NameMap<Place> {
        &self.places
    }

    pub fn place(&self, name: &str) -> Option<&Place> {
        self.places.get(name)
    }

    pub fn transitions(&self) -> &NameMap<Transition> {
        &self.transitions
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.get(name)
    }

    /// Transitions whose `from` list contains `place`, in definition order.
    pub fn outgoing<'a>(&'a self, place: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.starts_at(place))
    }

    pub fn global_actions(&self) -> &Value {
        &self.global_actions
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn marking_store(&self) -> &MarkingStore {
        &self.marking_store
    }

    pub fn audit_trail_enabled(&self) -> bool {
        self.audit_trail_enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Supported classes that the current strategy actually reads.
    pub fn effective_supports(&self) -> &[String] {
        match self.support_strategy {
            SupportStrategy::Simple => &self.supports,
            SupportStrategy::Expression { .. } => {
                &self.supports[..self.supports.len().min(1)]
            }
            SupportStrategy::Custom { .. } => &[],
        }
    }

    /// Equality of everything that ends up in the published configuration.
    ///
    /// Ignores identity, timestamps, version, status, layout positions, guard
    /// conversion notes and the support classes the strategy does not read.
    pub fn same_definition(&self, other: &Workflow) -> bool {
        self.name == other.name
            && self.label == other.label
            && self.kind == other.kind
            && self.support_strategy == other.support_strategy
            && self.effective_supports() == other.effective_supports()
            && self.initial_marking == other.initial_marking
            && self.same_places(other)
            && self.same_transitions(other)
            && actions_are_equal(&self.global_actions, &other.global_actions)
            && self.metadata == other.metadata
            && self.marking_store == other.marking_store
            && self.audit_trail_enabled == other.audit_trail_enabled
    }

    fn same_places(&self, other: &Workflow) -> bool {
        self.places.len() == other.places.len()
            && self.places.iter().all(|place| {
                other
                    .places
                    .get(&place.name)
                    .is_some_and(|theirs| theirs.without_layout() == place.without_layout())
            })
    }

    fn same_transitions(&self, other: &Workflow) -> bool {
        self.transitions.len() == other.transitions.len()
            && self.transitions.iter().all(|transition| {
                other.transitions.get(&transition.name).is_some_and(|theirs| {
                    theirs.guard.expression() == transition.guard.expression()
                        && Transition {
                            guard: theirs.guard.clone(),
                            ..transition.clone()
                        } == *theirs
                })
            })
    }
}

fn actions_are_equal(left: &Value, right: &Value) -> bool {
    let is_empty = |value: &Value| match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    };
    (is_empty(left) && is_empty(right)) || left == right
}
