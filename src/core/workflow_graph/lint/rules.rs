use super::{LintResult, LintSeverity, WorkflowLintRule};
use crate::core::workflow_graph::analysis;
use crate::core::workflow_graph::model::{GuardNote, SupportStrategy, Workflow};
use crate::core::workflow_graph::translate::guard::has_balanced_parentheses;
use regex::Regex;
use std::sync::OnceLock;

const NAME_PATTERN: &str = r"^[a-z][a-z0-9_]*$";
const NAME_HINT: &str =
    "must be lowercase, start with a letter, and contain only letters, numbers, and underscores";

/// `^[a-z][a-z0-9_]*$`: the only shape accepted for workflow, place and transition names.
pub fn is_valid_name(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern compiles"))
        .is_match(name)
}

/// Place names that read as intentional terminals.
pub fn looks_final(place: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new("(final|completed|done|finished|closed|end)").expect("final pattern compiles")
        })
        .is_match(place)
}

fn mentions_subject(expression: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"subject\.|is_granted|true|false").expect("subject pattern compiles"))
        .is_match(expression)
}

fn looks_like_class_name(service: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z][a-zA-Z0-9_\\]*$").expect("class pattern compiles"))
        .is_match(service)
}

pub fn built_in_rules() -> Vec<Box<dyn WorkflowLintRule>> {
    vec![
        Box::new(WorkflowNameRule),
        Box::new(SupportStrategyRule),
        Box::new(InitialMarkingRule),
        Box::new(PlaceDefinitionsRule),
        Box::new(TransitionDefinitionsRule),
        Box::new(UnreachablePlacesRule),
        Box::new(FinalStatePlacesRule),
        Box::new(GuardSanityRule),
    ]
}

struct WorkflowNameRule;

impl WorkflowLintRule for WorkflowNameRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        let name = workflow.name();
        if name.is_empty() {
            return vec![LintResult::new(
                "WFD-LINT-001",
                LintSeverity::Error,
                "Workflow name is required",
                Some("name".to_string()),
            )];
        }
        if !is_valid_name(name) {
            return vec![LintResult::new(
                "WFD-LINT-001",
                LintSeverity::Error,
                format!("Workflow name {}", NAME_HINT),
                Some("name".to_string()),
            )
            .with_suggestion(format!("try '{}'", suggest_name(name)))];
        }
        Vec::new()
    }
}

/// Best-effort conversion of a display name into a valid identifier.
fn suggest_name(name: &str) -> String {
    let mut out = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    match trimmed.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => trimmed.to_string(),
        Some(_) => format!("w_{}", trimmed),
        None => "workflow".to_string(),
    }
}

struct SupportStrategyRule;

impl WorkflowLintRule for SupportStrategyRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        let has_class = |s: &String| !s.trim().is_empty();
        let mut out = Vec::new();

        match workflow.support_strategy() {
            SupportStrategy::Simple => {
                if !workflow.supports().iter().any(has_class) {
                    out.push(LintResult::new(
                        "WFD-LINT-002",
                        LintSeverity::Error,
                        "At least one supported class must be specified for Simple strategy",
                        Some("supports".to_string()),
                    ));
                }
            }
            SupportStrategy::Expression { expression } => {
                if !workflow.supports().first().is_some_and(has_class) {
                    out.push(LintResult::new(
                        "WFD-LINT-002",
                        LintSeverity::Error,
                        "A target class must be specified for Expression strategy",
                        Some("supports".to_string()),
                    ));
                }
                let field = Some("supportStrategy.expression".to_string());
                if expression.trim().is_empty() {
                    out.push(LintResult::new(
                        "WFD-LINT-002",
                        LintSeverity::Error,
                        "An expression must be specified for Expression strategy",
                        field,
                    ));
                } else {
                    if !has_balanced_parentheses(expression) {
                        out.push(LintResult::new(
                            "WFD-LINT-002",
                            LintSeverity::Error,
                            "Support strategy expression has unbalanced parentheses",
                            field.clone(),
                        ));
                    }
                    if !mentions_subject(expression) {
                        out.push(LintResult::new(
                            "WFD-LINT-002",
                            LintSeverity::Warning,
                            "Expression should typically reference \"subject\" (e.g., subject.getXxx()) or use is_granted()",
                            field,
                        ));
                    }
                }
            }
            SupportStrategy::Custom { service } => {
                let field = Some("supportStrategy.service".to_string());
                if service.trim().is_empty() {
                    out.push(LintResult::new(
                        "WFD-LINT-002",
                        LintSeverity::Error,
                        "A service class must be specified for Custom strategy",
                        field,
                    ));
                } else if !looks_like_class_name(service) {
                    out.push(LintResult::new(
                        "WFD-LINT-002",
                        LintSeverity::Warning,
                        "Service class name should be a valid fully qualified class name (e.g., App\\Workflow\\MyStrategy)",
                        field,
                    ));
                }
            }
        }
        out
    }
}

struct InitialMarkingRule;

impl WorkflowLintRule for InitialMarkingRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        let field = Some("initialMarking".to_string());
        match workflow.initial_marking() {
            None => vec![LintResult::new(
                "WFD-LINT-003",
                LintSeverity::Error,
                "Initial marking (initial place) is required",
                field,
            )],
            Some(initial)
                if !workflow.places().is_empty() && !workflow.places().contains(initial) =>
            {
                vec![LintResult::new(
                    "WFD-LINT-003",
                    LintSeverity::Error,
                    format!("Initial marking \"{}\" does not exist in places", initial),
                    field,
                )]
            }
            Some(_) => Vec::new(),
        }
    }
}

struct PlaceDefinitionsRule;

impl WorkflowLintRule for PlaceDefinitionsRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        let places = workflow.places();
        if places.is_empty() {
            return vec![LintResult::new(
                "WFD-LINT-004",
                LintSeverity::Error,
                "At least one place must be defined",
                Some("places".to_string()),
            )];
        }

        let mut out = Vec::new();
        for name in places.names() {
            if name.is_empty() {
                out.push(LintResult::new(
                    "WFD-LINT-004",
                    LintSeverity::Error,
                    "Place name cannot be empty",
                    Some("places".to_string()),
                ));
            } else if !is_valid_name(name) {
                out.push(LintResult::new(
                    "WFD-LINT-004",
                    LintSeverity::Error,
                    format!("Place name \"{}\" {}", name, NAME_HINT),
                    Some(format!("places.{}", name)),
                ));
            }
        }
        for name in places.duplicates() {
            out.push(LintResult::new(
                "WFD-LINT-004",
                LintSeverity::Error,
                format!("Duplicate place name: {}", name),
                Some(format!("places.{}", name)),
            ));
        }
        out
    }
}

struct TransitionDefinitionsRule;

impl WorkflowLintRule for TransitionDefinitionsRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        let transitions = workflow.transitions();
        if transitions.is_empty() {
            return vec![LintResult::new(
                "WFD-LINT-005",
                LintSeverity::Warning,
                "No transitions defined - workflow will have no state changes",
                Some("transitions".to_string()),
            )];
        }

        let places = workflow.places();
        let mut out = Vec::new();
        for transition in transitions.iter() {
            let name = transition.name.as_str();
            if name.is_empty() {
                out.push(LintResult::new(
                    "WFD-LINT-005",
                    LintSeverity::Error,
                    "Transition name cannot be empty",
                    Some("transitions".to_string()),
                ));
                continue;
            }
            if !is_valid_name(name) {
                out.push(LintResult::new(
                    "WFD-LINT-005",
                    LintSeverity::Error,
                    format!("Transition name \"{}\" {}", name, NAME_HINT),
                    Some(format!("transitions.{}", name)),
                ));
            }

            for (direction, endpoints) in [("from", &transition.from), ("to", &transition.to)] {
                let field = Some(format!("transitions.{}.{}", name, direction));
                if endpoints.is_empty() {
                    out.push(LintResult::new(
                        "WFD-LINT-005",
                        LintSeverity::Error,
                        format!(
                            "Transition \"{}\" must have at least one \"{}\" place",
                            name, direction
                        ),
                        field,
                    ));
                    continue;
                }
                for place in endpoints.iter().filter(|p| !places.contains(p)) {
                    out.push(LintResult::new(
                        "WFD-LINT-005",
                        LintSeverity::Error,
                        format!(
                            "Transition \"{}\" references unknown \"{}\" place: {}",
                            name, direction, place
                        ),
                        field.clone(),
                    ));
                }
            }
        }
        for name in transitions.duplicates() {
            out.push(LintResult::new(
                "WFD-LINT-005",
                LintSeverity::Error,
                format!("Duplicate transition name: {}", name),
                Some(format!("transitions.{}", name)),
            ));
        }
        out
    }
}

struct UnreachablePlacesRule;

impl WorkflowLintRule for UnreachablePlacesRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        analysis::reachability(workflow)
            .unreachable
            .into_iter()
            .map(|place| {
                LintResult::new(
                    "WFD-LINT-006",
                    LintSeverity::Warning,
                    format!("Place \"{}\" is not reachable from initial marking", place),
                    Some(format!("places.{}", place)),
                )
                .with_suggestion("add a transition leading to this place or remove it")
            })
            .collect()
    }
}

struct FinalStatePlacesRule;

impl WorkflowLintRule for FinalStatePlacesRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        analysis::dead_ends(workflow)
            .into_iter()
            .filter(|place| !looks_final(place))
            .map(|place| {
                LintResult::new(
                    "WFD-LINT-007",
                    LintSeverity::Info,
                    format!("Place \"{}\" has no outgoing transitions (final state)", place),
                    Some(format!("places.{}", place)),
                )
            })
            .collect()
    }
}

struct GuardSanityRule;

impl WorkflowLintRule for GuardSanityRule {
    fn validate(&self, workflow: &Workflow) -> Vec<LintResult> {
        let mut out = Vec::new();
        for transition in workflow.transitions().iter() {
            let name = &transition.name;
            if transition.guard.notes().contains(&GuardNote::EmptyRoles) {
                out.push(LintResult::new(
                    "WFD-LINT-008",
                    LintSeverity::Warning,
                    format!("Guard in transition \"{}\" has empty roles array", name),
                    Some(format!("transitions.{}.guard.roles", name)),
                ));
            }
            let unbalanced = transition
                .guard
                .expression()
                .is_some_and(|expression| !has_balanced_parentheses(expression));
            if unbalanced {
                out.push(LintResult::new(
                    "WFD-LINT-008",
                    LintSeverity::Error,
                    format!(
                        "Guard expression in transition \"{}\" has unbalanced parentheses",
                        name
                    ),
                    Some(format!("transitions.{}.guard.expression", name)),
                ));
            }
        }
        out
    }
}
