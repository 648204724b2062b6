use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Fail when `output` names the same file as `source`.
///
/// Overwriting a source needs an explicit in-place request.
pub fn ensure_not_source(output: &Path, source: &Path) -> Result<()> {
    let out_norm = normalize(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let src_norm = normalize(source)
        .with_context(|| format!("failed to resolve source path {}", source.display()))?;

    if out_norm == src_norm {
        bail!(
            "refusing to overwrite source export {}; pass --in-place to modify it",
            source.display()
        );
    }
    Ok(())
}

fn normalize(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not written yet: resolve the directory and keep the file name.
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir().context("current_dir")?,
    };
    let parent = parent.canonicalize().unwrap_or(parent);
    match path.file_name() {
        Some(name) => Ok(parent.join(name)),
        None => Ok(parent),
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_not_source;
    use std::fs;

    #[test]
    fn rejects_same_file_through_dot_segments() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        let source = dir.path().join("tn.json");
        fs::write(&source, "{}").expect("write source");

        let output = dir.path().join("sub").join("..").join("tn.json");
        assert!(ensure_not_source(&output, &source).is_err());
    }

    #[test]
    fn accepts_new_file_next_to_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("tn.json");
        fs::write(&source, "{}").expect("write source");

        ensure_not_source(&dir.path().join("out.json"), &source).expect("distinct output");
    }
}
