use crate::core::types::ErrorCategory;
use std::collections::BTreeMap;

/// Error returned by the designer core when an operation cannot produce a result.
///
/// Validation findings are never reported through this type; they are plain data
/// returned by the lint registry. `AppError` covers malformed input, missing
/// files, bad configuration and a publish blocked by error-level diagnostics.
#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
    pub context: BTreeMap<String, String>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        AppError {
            category,
            code: default_code(category).to_string(),
            message: message.into(),
            context: BTreeMap::new(),
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        let mut error = AppError::new(category, message);
        error.source = Some(source.into());
        error
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_context(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }

    pub fn is_validation(&self) -> bool {
        self.category == ErrorCategory::ValidationError
    }
}

fn default_code(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::ValidationError => "WFD-VALIDATION",
        ErrorCategory::SerializationError => "WFD-PARSE",
        ErrorCategory::IoError => "WFD-IO",
        ErrorCategory::NotFound => "WFD-NOT-FOUND",
        ErrorCategory::ConfigError => "WFD-CONFIG",
        ErrorCategory::InternalError => "WFD-INTERNAL",
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (Context: {:?})", self.context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        let message = e.to_string();
        AppError::with_source(ErrorCategory::IoError, message, e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        let message = format!("Invalid JSON: {}", e);
        AppError::with_source(ErrorCategory::SerializationError, message, e)
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        let message = format!("Invalid YAML: {}", e);
        AppError::with_source(ErrorCategory::SerializationError, message, e)
    }
}
