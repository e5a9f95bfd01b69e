//! JSON model documents and format detection for files on disk.

use super::import;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::workflow_graph::model::Workflow;
use std::fs;
use std::path::Path;

/// Input formats understood by [`import_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Full JSON model (drafts, versions, JSON export).
    Json,
    /// Pimcore YAML configuration.
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("Unsupported file format: {}", other),
            )
            .with_code("WFD-IMPORT-004")
            .with_context("path", path.display().to_string())),
        }
    }
}

pub fn to_json(workflow: &Workflow, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(workflow)
    } else {
        serde_json::to_string(workflow)
    };
    rendered.map_err(|err| {
        AppError::with_source(
            ErrorCategory::SerializationError,
            format!("Failed to render workflow '{}' as JSON", workflow.name()),
            err,
        )
        .with_code("WFD-EXPORT-002")
    })
}

/// Parse a JSON model. Either the whole document is accepted or nothing is.
pub fn from_json(json: &str) -> Result<Workflow, AppError> {
    serde_json::from_str(json).map_err(|err| AppError::from(err).with_code("WFD-IMPORT-001"))
}

/// Load a workflow, choosing the parser from the file extension.
pub fn import_file(path: &Path) -> Result<Workflow, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            ErrorCategory::NotFound,
            format!("File not found: {}", path.display()),
        )
        .with_code("WFD-IMPORT-005"));
    }
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|err| {
        AppError::from(err).with_context("path", path.display().to_string())
    })?;
    let result = match format {
        DocumentFormat::Json => from_json(&content),
        DocumentFormat::Yaml => import::from_yaml(&content),
    };
    result.map_err(|err| err.with_context("path", path.display().to_string()))
}
