use std::fs;
use std::io::{self, Write};
use std::path::Path;

use aci_tree_core::{parse_file_with_options, write, write_compact, Document};
use anyhow::{Context, Result};
use apic_extract::settings::{default_settings, load_settings, Settings};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch_cmd;
mod cli;
mod extract_cmd;
mod inspect_cmd;
mod path_guard;
mod status_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = resolve_settings(&cli)?;

    match cli.command {
        Command::Describe(args) => inspect_cmd::run_describe(args, &settings),
        Command::List(args) => inspect_cmd::run_list(args, &settings),
        Command::Inspect(args) => inspect_cmd::run_inspect(args, &settings),
        Command::Find(args) => inspect_cmd::run_find(args, &settings),
        Command::Extract(args) => extract_cmd::run_extract(args, &settings),
        Command::SetStatus(args) => status_cmd::run_set_status(args, &settings),
        Command::Batch(args) => batch_cmd::run_batch(args, &settings),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Embedded defaults, then `--config`, then flags.
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => default_settings(),
    };
    if let Some(threshold) = cli.stream_threshold {
        settings.load.stream_threshold = threshold;
    }
    tracing::debug!(
        stream_threshold = settings.load.stream_threshold,
        pretty = settings.output.pretty,
        "settings resolved"
    );
    Ok(settings)
}

pub(crate) fn load_document(path: &Path, settings: &Settings) -> Result<Document> {
    let doc = parse_file_with_options(path, &settings.load_options())
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!(path = %path.display(), nodes = doc.node_count(), "loaded export");
    Ok(doc)
}

/// Serialize `doc` to `output`, or to stdout when no path is given.
pub(crate) fn emit_document(doc: &Document, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let bytes = if settings.output.pretty {
        write(doc)
    } else {
        write_compact(doc)
    }
    .context("failed to serialize export")?;

    match output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("failed to write output {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote export");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes).context("failed to write to stdout")?;
            stdout.flush().context("failed to write to stdout")?;
        }
    }
    Ok(())
}
