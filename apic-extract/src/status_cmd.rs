use aci_tree_core::{clear_status, resolve, set_status, Status};
use anyhow::{bail, Context, Result};
use apic_extract::settings::Settings;

use crate::cli::SetStatusArgs;
use crate::{emit_document, load_document, path_guard};

pub fn run_set_status(args: SetStatusArgs, settings: &Settings) -> Result<()> {
    let spec = args.selection.to_spec();
    if spec.is_empty() {
        bail!("no objects selected: pass --position, --positions, --path, --class or --name");
    }
    let selector = spec.to_selector().context("invalid --path value")?;
    let status = match (&args.status, args.clear) {
        (Some(value), false) => Some(value.parse::<Status>()?),
        (None, true) => None,
        _ => bail!("pass exactly one of --status or --clear"),
    };

    let output = match (&args.output, args.in_place) {
        (Some(out_path), false) => {
            path_guard::ensure_not_source(out_path, &args.file)?;
            out_path.as_path()
        }
        (None, true) => args.file.as_path(),
        _ => bail!("pass exactly one of --output or --in-place"),
    };

    let mut doc = load_document(&args.file, settings)?;
    let paths = resolve(&doc, &selector)
        .with_context(|| format!("failed to resolve selection in {}", args.file.display()))?;

    let (updated, label) = match status {
        Some(status) => (set_status(&mut doc, &paths, status.as_str())?, status.as_str()),
        None => (clear_status(&mut doc, &paths)?, "none"),
    };
    tracing::info!(selection = %spec.describe(), updated, status = label, "status applied");

    emit_document(&doc, Some(output), settings)?;
    println!("updated={updated} status={label} output={}", output.display());
    Ok(())
}
