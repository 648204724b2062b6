use std::fs;
use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

use crate::tree::{AciNode, Document};

/// Errors that can occur while writing a [`Document`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize JSON.
    #[error("failed to write export JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to write the output file.
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a [`Document`] as indented JSON, the layout controllers export.
///
/// Object bodies are written in canonical shape: `attributes` always
/// (empty when the object had none), `children` only when non-empty. A body
/// read as `{"children": []}` is therefore written as `{"attributes": {}}`.
pub fn write(doc: &Document) -> Result<Vec<u8>, WriteError> {
    let mut bytes = serde_json::to_vec_pretty(doc)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serialize a [`Document`] without whitespace.
pub fn write_compact(doc: &Document) -> Result<Vec<u8>, WriteError> {
    Ok(serde_json::to_vec(doc)?)
}

/// Serialize a [`Document`] and write it to `path`.
pub fn write_file(doc: &Document, path: &Path) -> Result<(), WriteError> {
    let bytes = write(doc)?;
    fs::write(path, bytes)?;
    Ok(())
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("totalCount", &self.total_count().to_string())?;
        map.serialize_entry("imdata", self.imdata())?;
        map.end()
    }
}

impl Serialize for AciNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.class_name, &NodeBody(self))?;
        map.end()
    }
}

struct NodeBody<'a>(&'a AciNode);

impl Serialize for NodeBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let len = if node.children.is_empty() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("attributes", &node.attributes)?;
        if !node.children.is_empty() {
            map.serialize_entry("children", &node.children)?;
        }
        map.end()
    }
}
