//! jitmark CLI
//!
//! Inspect how markdown is parsed, laid out, mapped back to source and shaped.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use jitmark_core::{EngineConfig, MarkdownEngine};

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let engine = MarkdownEngine::new(config).into_diagnostic()?;

    match cli.command {
        Commands::Parse { files, format } => commands::parse::run_parse(&engine, &files, format),
        Commands::Layout {
            file,
            width,
            scale,
            top,
            height,
            overscan,
            format,
        } => commands::layout::run_layout(
            &engine,
            &file,
            commands::layout::LayoutArgs {
                width,
                scale,
                top,
                height,
                overscan,
            },
            format,
        ),
        Commands::Map {
            file,
            block,
            start,
            length,
        } => commands::map::run_map(&engine, &file, block, start, length),
        Commands::Plain { files } => commands::plain::run_plain(&engine, &files),
        Commands::Shape {
            text,
            size,
            scale,
            rtl,
            format,
        } => commands::shape::run_shape(&engine, &text, size, scale, rtl, format),
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    if let Some(ref path) = cli.config {
        return EngineConfig::from_file(path).into_diagnostic();
    }

    if let Some(path) = EngineConfig::discover(".") {
        info!("Using config: {}", path.display());
        return EngineConfig::from_file(&path).into_diagnostic();
    }

    Ok(EngineConfig::new())
}
