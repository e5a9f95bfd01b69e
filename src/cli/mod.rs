pub mod args;
pub mod commands;

pub use args::{
    DiffArgs, ExportArgs, ExportFormat, FileArgs, PathsArgs, PublishArgs, ReportFormat,
    SimulateArgs, ValidateArgs,
};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
WORKFLOW COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "workflow-designer")]
#[command(version = crate::VERSION)]
#[command(about = "Design, check and publish Symfony/Pimcore workflow definitions")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: validate a draft, analyze and simulate it, then publish the YAML."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Check a workflow for structural problems",
        long_about = "Validate runs every lint rule and prints errors, warnings and hints. Exits non-zero when an error is found.",
        after_help = "Example:\n    workflow-designer validate article.json --format json"
    )]
    Validate(ValidateArgs),
    #[command(
        about = "Report reachable, unreachable and final places",
        long_about = "Analyze walks the graph from the initial marking and lists unreachable places, dead ends and cycles.",
        after_help = "Example:\n    workflow-designer analyze article.yaml"
    )]
    Analyze(FileArgs),
    #[command(
        about = "Enumerate paths from the initial marking",
        long_about = "Paths traces every route through the graph, marking cycles and truncating at the depth bound.",
        after_help = "Example:\n    workflow-designer paths article.yaml --max-depth 20"
    )]
    Paths(PathsArgs),
    #[command(
        about = "Step through transitions",
        long_about = "Simulate starts at the initial marking (or --from) and fires each --apply transition in order. Guards are shown, not evaluated.",
        after_help = "Example:\n    workflow-designer simulate article.yaml --apply submit --apply approve"
    )]
    Simulate(SimulateArgs),
    #[command(
        about = "Render Pimcore YAML or the JSON model",
        long_about = "Export converts the workflow to Pimcore configuration YAML or to the JSON model.",
        after_help = "Example:\n    workflow-designer export article.json --output config/workflows/article.yaml"
    )]
    Export(ExportArgs),
    #[command(
        about = "Validate and write the workflow YAML",
        long_about = "Publish refuses workflows with validation errors, backs up the previous file and writes <workflow>.yaml to the publish directory.",
        after_help = "Example:\n    workflow-designer publish article.json --publish-dir config/workflows"
    )]
    Publish(PublishArgs),
    #[command(
        about = "Compare a draft with the published YAML",
        long_about = "Diff renders the draft as YAML and compares it line by line with the published file.",
        after_help = "Example:\n    workflow-designer diff article.json config/workflows/article.yaml"
    )]
    Diff(DiffArgs),
}

pub fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Validate(validate_args) => commands::validate(validate_args),
        Command::Analyze(file_args) => commands::analyze(file_args),
        Command::Paths(paths_args) => commands::paths(paths_args),
        Command::Simulate(simulate_args) => commands::simulate(simulate_args),
        Command::Export(export_args) => commands::export(export_args),
        Command::Publish(publish_args) => commands::publish(publish_args),
        Command::Diff(diff_args) => commands::diff(diff_args),
    }
}
