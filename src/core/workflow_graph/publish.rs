//! Publish gate: only error-free workflows become Pimcore configuration.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::workflow_graph::lint::{self, LintResult};
use crate::core::workflow_graph::model::Workflow;
use crate::core::workflow_graph::translate;
use tracing::{info, warn};

/// YAML ready to be written, plus the advisory findings that did not block it.
#[derive(Debug, Clone)]
pub struct Publication {
    pub file_name: String,
    pub yaml: String,
    pub diagnostics: Vec<LintResult>,
}

/// Validate and render `workflow`. Any error-level finding blocks publication.
pub fn prepare_publication(workflow: &Workflow) -> Result<Publication, AppError> {
    let diagnostics = lint::validate(workflow);
    if lint::has_errors(&diagnostics) {
        let errors: Vec<&str> = diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.message.as_str())
            .collect();
        warn!(
            workflow = workflow.name(),
            errors = errors.len(),
            "publish blocked by validation errors"
        );
        return Err(AppError::new(
            ErrorCategory::ValidationError,
            format!(
                "Workflow \"{}\" has validation errors: {}",
                workflow.name(),
                errors.join("; ")
            ),
        )
        .with_code("WFD-PUBLISH-001")
        .with_context("errors", errors.len().to_string()));
    }

    let yaml = translate::to_yaml(workflow)?;
    info!(
        workflow = workflow.name(),
        advisories = diagnostics.len(),
        "workflow ready to publish"
    );
    Ok(Publication {
        file_name: format!("{}.yaml", workflow.name()),
        yaml,
        diagnostics,
    })
}

/// Line-by-line comparison of published and draft YAML. `None` when identical.
///
/// Lines are paired by position: equal lines get two spaces of context,
/// differing lines become `- published` / `+ draft`, blank sides omitted.
pub fn diff(published: &str, draft: &str) -> Option<String> {
    if published == draft {
        return None;
    }
    let published_lines: Vec<&str> = published.split('\n').collect();
    let draft_lines: Vec<&str> = draft.split('\n').collect();
    let length = published_lines.len().max(draft_lines.len());

    let mut out = Vec::with_capacity(length);
    for index in 0..length {
        let old = published_lines.get(index).copied().unwrap_or("");
        let new = draft_lines.get(index).copied().unwrap_or("");
        if old == new {
            out.push(format!("  {}", old));
            continue;
        }
        if !old.is_empty() {
            out.push(format!("- {}", old));
        }
        if !new.is_empty() {
            out.push(format!("+ {}", new));
        }
    }
    Some(out.join("\n"))
}

/// Diff the rendered draft against what is currently published.
pub fn diff_against(published: &str, workflow: &Workflow) -> Result<Option<String>, AppError> {
    Ok(diff(published, &translate::to_yaml(workflow)?))
}
