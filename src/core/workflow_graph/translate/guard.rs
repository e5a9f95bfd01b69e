//! Guard expression synthesis.
//!
//! Older drafts stored guards as `{expression, roles, permissions, service}`.
//! Pimcore only understands a single expression, so the object is folded into
//! one string:
//!
//! - a non-empty legacy `expression` wins verbatim;
//! - otherwise each role becomes `is_granted('ROLE')`, ORed together;
//! - each permission becomes `subject.isAllowed('perm')`, ANDed together;
//! - both clauses are ANDed, multi-term clauses are parenthesized.

use crate::core::workflow_graph::model::{GuardInput, GuardNote, LegacyGuard};
use tracing::debug;

/// Convert any accepted guard shape into its canonical expression.
pub fn canonicalize(input: GuardInput) -> (Option<String>, Vec<GuardNote>) {
    match input {
        GuardInput::Expression(expression) => {
            let trimmed = expression.trim();
            ((!trimmed.is_empty()).then(|| trimmed.to_string()), Vec::new())
        }
        GuardInput::Legacy(legacy) => convert_legacy(legacy),
        GuardInput::Ignored(_) => (None, Vec::new()),
    }
}

fn convert_legacy(legacy: LegacyGuard) -> (Option<String>, Vec<GuardNote>) {
    let mut notes = Vec::new();
    if matches!(legacy.roles.as_deref(), Some([])) {
        notes.push(GuardNote::EmptyRoles);
    }

    if let Some(expression) = legacy.expression.as_deref().map(str::trim) {
        if !expression.is_empty() {
            if !has_balanced_parentheses(expression) {
                notes.push(GuardNote::UnbalancedParentheses);
            }
            return (Some(expression.to_string()), notes);
        }
    }

    let roles = legacy.roles.unwrap_or_default();
    let permissions = legacy.permissions.unwrap_or_default();
    let expression = synthesize(&roles, &permissions);
    debug!(
        roles = roles.len(),
        permissions = permissions.len(),
        synthesized = expression.as_deref().unwrap_or(""),
        "converted legacy guard"
    );
    (expression, notes)
}

/// Build an expression from role and permission lists. `None` when both are empty.
pub fn synthesize(roles: &[String], permissions: &[String]) -> Option<String> {
    let role_clause = join_clause(
        roles.iter().map(|role| format!("is_granted('{}')", role)),
        " or ",
    );
    let permission_clause = join_clause(
        permissions
            .iter()
            .map(|permission| format!("subject.isAllowed('{}')", permission)),
        " and ",
    );

    match (role_clause, permission_clause) {
        (Some(roles), Some(permissions)) => Some(format!("{} and {}", roles, permissions)),
        (Some(clause), None) | (None, Some(clause)) => Some(clause),
        (None, None) => None,
    }
}

fn join_clause(terms: impl Iterator<Item = String>, separator: &str) -> Option<String> {
    let terms: Vec<String> = terms.collect();
    match terms.len() {
        0 => None,
        1 => terms.into_iter().next(),
        _ => Some(format!("({})", terms.join(separator))),
    }
}

/// Opening and closing parentheses occur in equal numbers.
///
/// Counts only; `")("` passes, matching what the editor has always accepted.
pub fn has_balanced_parentheses(expression: &str) -> bool {
    let open = expression.matches('(').count();
    let close = expression.matches(')').count();
    open == close
}
