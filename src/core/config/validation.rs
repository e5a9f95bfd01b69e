#![allow(clippy::result_large_err)]

use super::DesignerConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

/// Upper bound for `analysis.max_depth`; path tracing is exponential.
pub const MAX_ANALYSIS_DEPTH: usize = 1000;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &DesignerConfig) -> Result<(), AppError> {
        if config.publish.path.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "publish.path cannot be empty",
            )
            .with_code("WFD-CONFIG-002"));
        }

        if config.publish.backup_enabled && config.publish.backup_dir.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "publish.backup_dir is required when publish.backup_enabled is true",
            )
            .with_code("WFD-CONFIG-002"));
        }

        if !(1..=MAX_ANALYSIS_DEPTH).contains(&config.analysis.max_depth) {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                format!(
                    "analysis.max_depth must be between 1 and {}",
                    MAX_ANALYSIS_DEPTH
                ),
            )
            .with_code("WFD-CONFIG-002"));
        }

        Ok(())
    }
}
