use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Output format for `validate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Output format for `export`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ExportFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format for diagnostics
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Args, Debug, Clone)]
pub struct PathsArgs {
    /// Workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Maximum number of steps per path (default: analysis.max_depth from designer.toml)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Start from this place instead of the initial marking
    #[arg(long, value_name = "PLACE")]
    pub from: Option<String>,

    /// Transition to fire; repeat to fire several in order
    #[arg(long = "apply", value_name = "TRANSITION")]
    pub apply: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Target format
    #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
    pub format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory receiving <workflow>.yaml (default: publish.path from designer.toml)
    #[arg(long, value_name = "DIR")]
    pub publish_dir: Option<PathBuf>,

    /// Directory holding designer.toml (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// Draft workflow file (.json model or .yaml/.yml Pimcore configuration)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Currently published YAML
    #[arg(value_name = "PUBLISHED_YAML")]
    pub published: PathBuf,
}
