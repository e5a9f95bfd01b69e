use crate::core::workflow_graph::translate::guard as synthesis;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Findings from converting a legacy guard object into an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardNote {
    /// The legacy `expression` field did not balance its parentheses.
    UnbalancedParentheses,
    /// The legacy object carried `roles: []`.
    EmptyRoles,
}

/// Guard as written by the editor or a hand-written config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GuardInput {
    Expression(String),
    Legacy(LegacyGuard),
    Ignored(Vec<Value>),
}

/// Pre-expression guard shape, kept only long enough to be converted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LegacyGuard {
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub service: Option<String>,
}

/// Canonical guard: at most one expression string.
///
/// Serializes as the bare expression (or `null`). Any legacy object met while
/// deserializing is converted once, here, and never seen again downstream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Guard {
    expression: Option<String>,
    notes: Vec<GuardNote>,
}

impl Guard {
    /// Trimmed expression; blank input means no guard.
    pub fn new(expression: impl AsRef<str>) -> Self {
        let trimmed = expression.as_ref().trim();
        Self {
            expression: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            notes: Vec::new(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_input(input: GuardInput) -> Self {
        let (expression, notes) = synthesis::canonicalize(input);
        Self { expression, notes }
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.expression.is_some()
    }

    pub fn notes(&self) -> &[GuardNote] {
        &self.notes
    }
}

impl Serialize for Guard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.expression.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Guard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<GuardInput>::deserialize(deserializer)?
            .map(Guard::from_input)
            .unwrap_or_default())
    }
}
