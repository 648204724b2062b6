use aci_tree_core::{extract_nodes, resolve, set_status, with_status, Document, DocumentCache};
use anyhow::{bail, Context, Result};
use apic_extract::plan::{load_plan, Job, JobMode};
use apic_extract::settings::Settings;

use crate::cli::BatchArgs;
use crate::{emit_document, path_guard};

pub fn run_batch(args: BatchArgs, settings: &Settings) -> Result<()> {
    let jobs = load_plan(&args.plan)?;
    let opts = settings.load_options();
    let mut cache = DocumentCache::new();

    for (n, job) in jobs.iter().enumerate() {
        let number = n + 1;
        if job.selection.is_empty() {
            bail!("job {number}: no objects selected");
        }
        path_guard::ensure_not_source(&job.output, &job.source)
            .with_context(|| format!("job {number}"))?;

        let doc = cache
            .load(&job.source, &opts)
            .with_context(|| format!("job {number}"))?;
        let (output, matched) = run_job(doc, job).with_context(|| format!("job {number}"))?;
        emit_document(&output, Some(&job.output), settings)?;

        tracing::info!(job = number, source = %job.source.display(), matched, "job finished");
        println!(
            "job {number}: {} {} matched={matched} output={}",
            mode_name(job.mode),
            job.selection.describe(),
            job.output.display()
        );
    }

    println!(
        "jobs={} sources_loaded={} cache_hits={}",
        jobs.len(),
        cache.misses(),
        cache.hits()
    );
    Ok(())
}

fn run_job(doc: &Document, job: &Job) -> Result<(Document, usize)> {
    let selector = job.selection.to_selector().context("invalid path")?;
    let paths = resolve(doc, &selector)?;

    let output = match (job.mode, job.status.as_deref()) {
        (JobMode::Extract, Some(status)) => extract_nodes(&with_status(doc, &paths, status)?, &paths),
        (JobMode::Extract, None) => extract_nodes(doc, &paths),
        (JobMode::Apply, Some(status)) => {
            let mut marked = doc.clone();
            set_status(&mut marked, &paths, status)?;
            marked
        }
        (JobMode::Apply, None) => bail!("apply jobs need a status"),
    };
    Ok((output, paths.len()))
}

fn mode_name(mode: JobMode) -> &'static str {
    match mode {
        JobMode::Extract => "extract",
        JobMode::Apply => "apply",
    }
}
