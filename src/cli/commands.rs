use crate::{
    cli::args::{
        DiffArgs, ExportArgs, ExportFormat, FileArgs, PathsArgs, PublishArgs, ReportFormat,
        SimulateArgs, ValidateArgs,
    },
    core::{
        config::{ConfigLoader, ConfigValidator, DesignerConfig},
        workflow_graph::{
            analysis::{self, PathStep},
            lint::{self, LintSeverity},
            publish, simulation, translate, Workflow,
        },
    },
    utils::files::{backup_file, write_with_parents},
    Result,
};
use anyhow::{anyhow, bail, Context};
use serde_json::json;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

fn load_workflow(path: &Path) -> Result<Workflow> {
    let workflow = translate::import_file(path)?;
    debug!(
        workflow = workflow.name(),
        places = workflow.places().len(),
        transitions = workflow.transitions().len(),
        "loaded workflow from {}",
        path.display()
    );
    Ok(workflow)
}

fn load_config(workspace: Option<&Path>) -> Result<(PathBuf, DesignerConfig)> {
    let workspace = match workspace {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("failed to resolve current directory")?,
    };
    let config = ConfigLoader::load_from_workspace(&workspace)?;
    ConfigValidator::validate(&config)?;
    Ok((workspace, config))
}

fn anchor(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let results = lint::validate(&workflow);
    let valid = !lint::has_errors(&results);

    match args.format {
        ReportFormat::Json => {
            let report = json!({
                "workflow": workflow.name(),
                "valid": valid,
                "diagnostics": results,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => {
            for result in &results {
                println!("{}", result);
                if let Some(suggestion) = &result.suggestion {
                    println!("    suggestion: {}", suggestion);
                }
            }
            let errors = lint::filter_by_severity(&results, LintSeverity::Error).len();
            let warnings = lint::filter_by_severity(&results, LintSeverity::Warning).len();
            if valid {
                println!(
                    "Workflow \"{}\" is valid ({} warning(s))",
                    workflow.name(),
                    warnings
                );
            } else {
                println!(
                    "Workflow \"{}\" has {} error(s), {} warning(s)",
                    workflow.name(),
                    errors,
                    warnings
                );
            }
        }
    }

    if !valid {
        bail!("validation failed for workflow \"{}\"", workflow.name());
    }
    Ok(())
}

pub fn analyze(args: FileArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let report = analysis::reachability(&workflow);

    println!("Workflow: {}", workflow.name());
    println!(
        "Initial marking: {}",
        workflow.initial_marking().unwrap_or("(none)")
    );
    println!("Reachable: {}", join_or_none(&report.reachable));
    println!("Unreachable: {}", join_or_none(&report.unreachable));
    println!("Dead ends: {}", join_or_none(&report.dead_ends));
    println!("Revisits places: {}", if report.has_cycles { "yes" } else { "no" });
    if report.cycles.is_empty() {
        println!("Cycles: (none)");
    } else {
        println!("Cycles:");
        for cycle in &report.cycles {
            println!("  {}", cycle.join(" <-> "));
        }
    }
    Ok(())
}

pub fn paths(args: PathsArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let max_depth = match args.max_depth {
        Some(depth) => depth,
        None => load_config(None)?.1.analysis.max_depth,
    };
    let paths = analysis::trace_paths(&workflow, max_depth);
    info!(
        workflow = workflow.name(),
        max_depth,
        count = paths.len(),
        "traced paths"
    );

    if paths.is_empty() {
        println!("No paths (no initial marking or max depth 0)");
        return Ok(());
    }
    for (index, path) in paths.iter().enumerate() {
        println!("{:>3}. {}", index + 1, render_path(path));
    }
    Ok(())
}

fn render_path(path: &[PathStep]) -> String {
    let mut rendered = String::new();
    for step in path {
        rendered.push_str(&step.place);
        if step.cycle {
            rendered.push_str(" (cycle)");
        }
        if step.truncated {
            rendered.push_str(" ...");
        }
        if let Some(transition) = &step.transition {
            rendered.push_str(&format!(" --{}--> ", transition));
        }
    }
    rendered
}

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let snapshot = simulation::simulate(&workflow, args.from.as_deref());
    if let Some(error) = snapshot.error {
        bail!(error);
    }
    let mut place = snapshot
        .current_place
        .ok_or_else(|| anyhow!("simulation has no current place"))?;
    println!("Current place: {}", place);

    for transition in &args.apply {
        let outcome = simulation::apply_transition(&workflow, &place, transition);
        if !outcome.success {
            bail!(outcome
                .error
                .unwrap_or_else(|| format!("Transition \"{}\" failed", transition)));
        }
        println!(
            "{} --{}--> {}",
            outcome.previous_place, transition, outcome.current_place
        );
        place = outcome.current_place;
    }

    let available = simulation::available_transitions(&workflow, &place);
    if available.is_empty() {
        println!("No transitions available from \"{}\"", place);
    } else {
        println!("Available transitions:");
        for transition in available {
            match &transition.guard {
                Some(guard) => println!(
                    "  {} ({}) -> {} [guard: {}]",
                    transition.name,
                    transition.label,
                    transition.to.join(", "),
                    guard
                ),
                None => println!(
                    "  {} ({}) -> {}",
                    transition.name,
                    transition.label,
                    transition.to.join(", ")
                ),
            }
        }
    }
    Ok(())
}

pub fn export(args: ExportArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let rendered = match args.format {
        ExportFormat::Yaml => translate::to_yaml(&workflow)?,
        ExportFormat::Json => translate::to_json(&workflow, true)?,
    };

    match args.output {
        Some(path) => {
            write_with_parents(&path, &rendered)?;
            println!("Exported \"{}\" to {}", workflow.name(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub fn publish(args: PublishArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let (workspace, config) = load_config(args.workspace.as_deref())?;
    let publication = publish::prepare_publication(&workflow)?;

    let publish_dir = args
        .publish_dir
        .unwrap_or_else(|| anchor(&workspace, &config.publish.path));
    let target = publish_dir.join(&publication.file_name);

    if config.publish.backup_enabled {
        let backup_dir = anchor(&workspace, &config.publish.backup_dir);
        if let Some(backup) = backup_file(&target, &backup_dir)? {
            println!("Backed up previous version to {}", backup.display());
        }
    }
    write_with_parents(&target, &publication.yaml)?;

    for diagnostic in &publication.diagnostics {
        println!("{}", diagnostic);
    }
    println!(
        "Published workflow \"{}\" to {}",
        workflow.name(),
        target.display()
    );
    Ok(())
}

pub fn diff(args: DiffArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let published = fs::read_to_string(&args.published)
        .with_context(|| format!("failed to read {}", args.published.display()))?;

    match publish::diff_against(&published, &workflow)? {
        Some(diff) => println!("{}", diff),
        None => println!("No changes"),
    }
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
