use anyhow::Context;
use clap::Parser;
use workflow_designer::{cli, logging};

fn main() -> workflow_designer::Result<()> {
    let args = cli::Args::parse();
    let _guard = logging::init(&args.command).context("failed to initialize logging")?;
    cli::run(args)
}
