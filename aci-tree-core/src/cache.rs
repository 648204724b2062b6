use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::parser::{parse_file_with_options, LoadError, LoadOptions};
use crate::tree::Document;

/// Errors returned by [`DocumentCache::load`].
#[derive(Debug, Error)]
pub enum CacheError {
    /// The file metadata could not be read.
    #[error("failed to stat {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The file could not be loaded.
    #[error("failed to load {path}: {source}")]
    Load { path: String, source: LoadError },
}

#[derive(Debug)]
struct CachedDocument {
    modified: SystemTime,
    document: Document,
}

/// Loaded exports keyed by source path and modification time.
///
/// Owned by the caller; an entry is reused only while the file's
/// modification time is unchanged.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<PathBuf, CachedDocument>,
    hits: usize,
    misses: usize,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the document for `path`, reloading it when the file changed.
    pub fn load(&mut self, path: &Path, opts: &LoadOptions) -> Result<&Document, CacheError> {
        let key = fs::canonicalize(path).map_err(|source| CacheError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let modified = fs::metadata(&key)
            .and_then(|meta| meta.modified())
            .map_err(|source| CacheError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let fresh = self
            .entries
            .get(&key)
            .is_some_and(|cached| cached.modified == modified);
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            let document =
                parse_file_with_options(&key, opts).map_err(|source| CacheError::Load {
                    path: path.display().to_string(),
                    source,
                })?;
            self.entries
                .insert(key.clone(), CachedDocument { modified, document });
        }

        Ok(&self.entries[&key].document)
    }

    /// True when `path` is cached and its modification time is unchanged.
    pub fn is_fresh(&self, path: &Path) -> bool {
        let Ok(key) = fs::canonicalize(path) else {
            return false;
        };
        let Some(cached) = self.entries.get(&key) else {
            return false;
        };
        fs::metadata(&key)
            .and_then(|meta| meta.modified())
            .is_ok_and(|modified| modified == cached.modified)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Loads that parsed the file.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{Duration, SystemTime};

    use super::{CacheError, DocumentCache};
    use crate::parser::LoadOptions;

    const ONE_TENANT: &str =
        r#"{"totalCount":"1","imdata":[{"fvTenant":{"attributes":{"name":"t1"}}}]}"#;
    const TWO_TENANTS: &str = r#"{"totalCount":"2","imdata":[{"fvTenant":{"attributes":{"name":"t1"}}},{"fvTenant":{"attributes":{"name":"t2"}}}]}"#;

    #[test]
    fn unchanged_file_is_served_from_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tn.json");
        fs::write(&path, ONE_TENANT).expect("write export");

        let mut cache = DocumentCache::new();
        let opts = LoadOptions::default();
        cache.load(&path, &opts).expect("first load");
        cache.load(&path, &opts).expect("second load");

        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert!(cache.is_fresh(&path));
    }

    #[test]
    fn modified_file_is_reloaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tn.json");
        fs::write(&path, ONE_TENANT).expect("write export");

        let mut cache = DocumentCache::new();
        let opts = LoadOptions::default();
        assert_eq!(cache.load(&path, &opts).expect("load").imdata().len(), 1);

        fs::write(&path, TWO_TENANTS).expect("rewrite export");
        let later = SystemTime::now() + Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|f| f.set_modified(later))
            .expect("bump mtime");

        assert_eq!(cache.load(&path, &opts).expect("reload").imdata().len(), 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tn.json");
        fs::write(&path, ONE_TENANT).expect("write export");

        let mut cache = DocumentCache::new();
        let opts = LoadOptions::default();
        cache.load(&path, &opts).expect("load");
        assert!(cache.invalidate(&path));
        assert!(cache.is_empty());
        cache.load(&path, &opts).expect("load again");
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cache = DocumentCache::new();
        let err = cache
            .load(&dir.path().join("absent.json"), &LoadOptions::default())
            .expect_err("missing file");
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
