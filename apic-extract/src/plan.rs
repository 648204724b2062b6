use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::selection::SelectionSpec;

/// What a batch job does with its selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    /// Write a standalone export of the selected objects.
    #[default]
    Extract,
    /// Write the whole source export with the status applied to the selection.
    Apply,
}

/// One step of a batch plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    /// Export to read, relative to the plan file.
    pub source: PathBuf,
    /// File to write, relative to the plan file.
    pub output: PathBuf,
    #[serde(default)]
    pub mode: JobMode,
    /// Status to mark the selected objects with.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub selection: SelectionSpec,
}

#[derive(Debug, Deserialize)]
struct PlanFile {
    #[serde(default)]
    job: Vec<Job>,
}

/// Errors returned when loading a plan file.
#[derive(Debug, Error)]
pub enum PlanLoadError {
    #[error("failed to read plan file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse plan file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("plan file {path} defines no [[job]] entries")]
    Empty { path: String },
}

/// Load jobs from a TOML plan, resolving their paths against the plan's directory.
pub fn load_plan(path: &Path) -> Result<Vec<Job>, PlanLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| PlanLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let jobs = parse_plan(&raw, path.display().to_string())?
        .into_iter()
        .map(|mut job| {
            job.source = base.join(&job.source);
            job.output = base.join(&job.output);
            job
        })
        .collect();
    Ok(jobs)
}

fn parse_plan(raw: &str, path: String) -> Result<Vec<Job>, PlanLoadError> {
    let parsed: PlanFile = toml::from_str(raw).map_err(|source| PlanLoadError::Parse {
        path: path.clone(),
        source,
    })?;
    if parsed.job.is_empty() {
        return Err(PlanLoadError::Empty { path });
    }
    Ok(parsed.job)
}
