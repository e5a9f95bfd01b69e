use crate::core::workflow_graph::model::Workflow;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub mod rules;
pub use rules::*;

/// Diagnostic severity levels emitted by workflow lint rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

impl LintSeverity {
    fn rank(&self) -> u8 {
        match self {
            LintSeverity::Error => 3,
            LintSeverity::Warning => 2,
            LintSeverity::Info => 1,
        }
    }
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

impl FromStr for LintSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LintSeverity::Error),
            "warning" => Ok(LintSeverity::Warning),
            "info" => Ok(LintSeverity::Info),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Individual finding emitted by a rule. Serializes as
/// `{code, type, message, field?, suggestion?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintResult {
    pub code: String,
    #[serde(rename = "type")]
    pub severity: LintSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LintResult {
    pub fn new(
        code: impl Into<String>,
        severity: LintSeverity,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            field,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == LintSeverity::Error
    }
}

impl fmt::Display for LintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        Ok(())
    }
}

/// Trait implemented by workflow lint rules.
pub trait WorkflowLintRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult>;
}

/// Registry that runs all built-in workflow lint rules.
pub struct LintRegistry {
    rules: Vec<Box<dyn WorkflowLintRule>>,
}

impl LintRegistry {
    /// Construct a registry populated with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: built_in_rules(),
        }
    }

    /// Run all registered lint rules against the workflow.
    /// The results are already sorted by `(severity desc, code asc, field asc)`.
    pub fn run(&self, workflow: &Workflow) -> Vec<LintResult> {
        let mut results = Vec::new();
        for rule in &self.rules {
            results.extend(rule.validate(workflow));
        }
        results.sort_by(|a, b| {
            let severity_cmp = b.severity.rank().cmp(&a.severity.rank());
            severity_cmp
                .then(a.code.cmp(&b.code))
                .then(a.field.cmp(&b.field))
        });
        results
    }
}

impl Default for LintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the built-in rules.
pub fn validate(workflow: &Workflow) -> Vec<LintResult> {
    LintRegistry::new().run(workflow)
}

/// True iff any result is error-level. Only error-free workflows may be published.
pub fn has_errors(results: &[LintResult]) -> bool {
    results.iter().any(LintResult::is_error)
}

pub fn filter_by_severity(results: &[LintResult], severity: LintSeverity) -> Vec<&LintResult> {
    results.iter().filter(|r| r.severity == severity).collect()
}
