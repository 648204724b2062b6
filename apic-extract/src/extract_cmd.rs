use aci_tree_core::{extract_nodes, resolve, with_status};
use anyhow::{bail, Context, Result};
use apic_extract::settings::Settings;

use crate::cli::ExtractArgs;
use crate::{emit_document, load_document, path_guard};

pub fn run_extract(args: ExtractArgs, settings: &Settings) -> Result<()> {
    let spec = args.selection.to_spec();
    if spec.is_empty() {
        bail!("nothing to extract: pass --position, --positions, --path, --class or --name");
    }
    let selector = spec.to_selector().context("invalid --path value")?;
    if let Some(out_path) = &args.output {
        path_guard::ensure_not_source(out_path, &args.file)?;
    }

    let doc = load_document(&args.file, settings)?;
    let paths = resolve(&doc, &selector)
        .with_context(|| format!("failed to resolve selection in {}", args.file.display()))?;
    tracing::info!(selection = %spec.describe(), matched = paths.len(), "selection resolved");
    if paths.is_empty() {
        tracing::warn!(selection = %spec.describe(), "selection matched no objects");
    }

    let extracted = match &args.set_status {
        Some(status) => {
            let marked = with_status(&doc, &paths, status)?;
            extract_nodes(&marked, &paths)
        }
        None => extract_nodes(&doc, &paths),
    };

    emit_document(&extracted, args.output.as_deref(), settings)
}
