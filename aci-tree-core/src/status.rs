use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::tree::{Document, NodePath};

/// Attribute key carrying the lifecycle marker.
pub const STATUS_KEY: &str = "status";

/// Lifecycle marker understood by reconciliation tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Status {
    Created,
    Modified,
    Deleted,
    /// The combined `modified,created` token.
    ModifiedCreated,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Created,
        Status::Modified,
        Status::Deleted,
        Status::ModifiedCreated,
    ];

    /// Canonical spelling written into exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Created => "created",
            Status::Modified => "modified",
            Status::Deleted => "deleted",
            Status::ModifiedCreated => "modified,created",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for Status {
    type Err = StatusError;

    /// Whitespace around the comma of the combined form is ignored, and the
    /// two halves may come in either order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            ["created"] => Ok(Status::Created),
            ["modified"] => Ok(Status::Modified),
            ["deleted"] => Ok(Status::Deleted),
            ["modified", "created"] | ["created", "modified"] => Ok(Status::ModifiedCreated),
            _ => Err(StatusError::Invalid(s.to_string())),
        }
    }
}

/// Errors raised by status updates. No object is changed when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// The value is not part of the status vocabulary.
    #[error("invalid status '{0}': expected one of created, modified, deleted, modified,created")]
    Invalid(String),
    /// A target path does not exist in the document.
    #[error("no object at path {0}")]
    NodeNotFound(NodePath),
}

/// Set `status` on every object at `paths`, in place.
///
/// The value and all paths are checked before anything is written. Returns
/// the number of objects updated.
pub fn set_status(doc: &mut Document, paths: &[NodePath], status: &str) -> Result<usize, StatusError> {
    let status: Status = status.parse()?;
    ensure_paths_exist(doc, paths)?;
    Ok(apply(doc, paths, Some(status)))
}

/// Return a copy of `doc` with `status` set on every object at `paths`.
pub fn with_status(doc: &Document, paths: &[NodePath], status: &str) -> Result<Document, StatusError> {
    let mut derived = doc.clone();
    set_status(&mut derived, paths, status)?;
    Ok(derived)
}

/// Remove the status marker from every object at `paths`, in place.
pub fn clear_status(doc: &mut Document, paths: &[NodePath]) -> Result<usize, StatusError> {
    ensure_paths_exist(doc, paths)?;
    Ok(apply(doc, paths, None))
}

fn ensure_paths_exist(doc: &Document, paths: &[NodePath]) -> Result<(), StatusError> {
    match paths.iter().find(|path| doc.node(path).is_none()) {
        Some(missing) => Err(StatusError::NodeNotFound(missing.clone())),
        None => Ok(()),
    }
}

fn apply(doc: &mut Document, paths: &[NodePath], status: Option<Status>) -> usize {
    let distinct: BTreeSet<&NodePath> = paths.iter().collect();
    let mut updated = 0;
    for path in distinct {
        let Some(node) = doc.node_mut(path) else {
            continue;
        };
        match status {
            Some(status) => {
                node.attributes.insert(STATUS_KEY, status.as_str());
            }
            None => {
                node.attributes.remove(STATUS_KEY);
            }
        }
        updated += 1;
    }
    updated
}
