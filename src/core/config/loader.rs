#![allow(clippy::result_large_err)]

use super::DesignerConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "designer.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from workspace root (workspace/designer.toml)
    /// Environment variables override config file values
    /// A missing file means defaults + env vars
    pub fn load_from_workspace(workspace_path: &Path) -> Result<DesignerConfig, AppError> {
        let config_path = workspace_path.join(CONFIG_FILE_NAME);
        let config_file = Self::load_from_file(&config_path)?;

        let mut config = config_file.unwrap_or_default();
        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<DesignerConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: DesignerConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_code("WFD-CONFIG-001")
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut DesignerConfig) {
        if let Ok(path) = env::var("WFD_PUBLISH_PATH") {
            config.publish.path = PathBuf::from(path);
        }

        if let Ok(enabled) = env::var("WFD_PUBLISH_BACKUP_ENABLED") {
            if let Ok(enabled) = enabled.parse::<bool>() {
                config.publish.backup_enabled = enabled;
            }
        }

        if let Ok(dir) = env::var("WFD_BACKUP_DIR") {
            config.publish.backup_dir = PathBuf::from(dir);
        }

        if let Ok(depth) = env::var("WFD_ANALYSIS_MAX_DEPTH") {
            if let Ok(depth) = depth.parse::<usize>() {
                config.analysis.max_depth = depth;
            }
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "WFD_PUBLISH_PATH - Override the publish directory (default: config/workflows)",
            "WFD_PUBLISH_BACKUP_ENABLED - Back up the previous file before publishing (true/false, default: true)",
            "WFD_BACKUP_DIR - Override the backup directory (default: var/workflow_designer/backups)",
            "WFD_ANALYSIS_MAX_DEPTH - Override the default path tracing depth (default: 50)",
            "WFD_LOG_LEVEL - Override the default log level (default: info)",
        ]
    }
}
