use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Designer configuration loaded from designer.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DesignerConfig {
    /// Where published workflow YAML goes
    #[serde(default)]
    pub publish: PublishConfig,

    /// Analyzer bounds
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Publish configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishConfig {
    /// Directory receiving `<workflow>.yaml`
    #[serde(default = "default_publish_path")]
    pub path: PathBuf,

    /// Copy the previous file aside before overwriting it
    #[serde(default = "default_backup_enabled")]
    pub backup_enabled: bool,

    /// Directory for timestamped backups
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Default bound for path tracing
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_publish_path() -> PathBuf {
    PathBuf::from("config/workflows")
}

fn default_backup_enabled() -> bool {
    true
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("var/workflow_designer/backups")
}

fn default_max_depth() -> usize {
    crate::core::workflow_graph::analysis::DEFAULT_MAX_DEPTH
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            path: default_publish_path(),
            backup_enabled: default_backup_enabled(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            max_depth: default_max_depth(),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
