use aci_tree_core::{describe, hierarchy, list_children, resolve, NodePath};
use anyhow::{bail, Context, Result};
use apic_extract::report::{render_children, render_hierarchy, render_matches, render_summary};
use apic_extract::settings::Settings;
use serde::Serialize;

use crate::cli::{DescribeArgs, FindArgs, InspectArgs, ListArgs, OutputFormat};
use crate::load_document;

pub fn run_describe(args: DescribeArgs, settings: &Settings) -> Result<()> {
    let doc = load_document(&args.file, settings)?;
    let summary = describe(&doc);

    match args.format {
        OutputFormat::Text => println!("{}", render_summary(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

pub fn run_list(args: ListArgs, settings: &Settings) -> Result<()> {
    let doc = load_document(&args.file, settings)?;
    let entries = list_children(&doc);

    match args.format {
        OutputFormat::Text => {
            let limit = (!args.all).then_some(settings.list.preview_limit);
            println!("{}", render_children(&entries, limit));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

pub fn run_inspect(args: InspectArgs, settings: &Settings) -> Result<()> {
    let doc = load_document(&args.file, settings)?;
    let entries = hierarchy(&doc, args.depth);

    match args.format {
        OutputFormat::Text => print!("{}", render_hierarchy(&entries)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct FoundObject<'a> {
    path: &'a NodePath,
    class_name: &'a str,
    name: Option<&'a str>,
    status: Option<&'a str>,
}

pub fn run_find(args: FindArgs, settings: &Settings) -> Result<()> {
    let spec = args.selection.to_spec();
    if spec.is_empty() {
        bail!("nothing to find: pass --position, --positions, --path, --class or --name");
    }
    let selector = spec.to_selector().context("invalid --path value")?;

    let doc = load_document(&args.file, settings)?;
    let paths = resolve(&doc, &selector)
        .with_context(|| format!("failed to resolve selection in {}", args.file.display()))?;
    tracing::info!(selection = %spec.describe(), matched = paths.len(), "selection resolved");

    match args.format {
        OutputFormat::Text => println!("{}", render_matches(&doc, &paths)),
        OutputFormat::Json => {
            let found: Vec<FoundObject<'_>> = paths
                .iter()
                .filter_map(|path| {
                    doc.node(path).map(|node| FoundObject {
                        path,
                        class_name: &node.class_name,
                        name: node.name(),
                        status: node.status(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
    }
    Ok(())
}
