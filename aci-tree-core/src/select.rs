use std::collections::BTreeSet;

use thiserror::Error;

use crate::index::{IndexScope, TreeIndex};
use crate::tree::{Document, NodePath};

/// Errors raised while resolving a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// A positional selector does not address an indexed object.
    #[error("position {index} is out of range (valid range 0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// An explicit node path does not exist in the document.
    #[error("no object at path {0}")]
    NodeNotFound(NodePath),
}

/// Describes which objects to pick from a document.
///
/// Positions and explicit paths select a base set; a class name either
/// selects on its own or narrows that base set. Names always narrow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    positions: Vec<usize>,
    paths: Vec<NodePath>,
    class_name: Option<String>,
    names: Vec<String>,
    scope: IndexScope,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single position.
    pub fn position(index: usize) -> Self {
        Self::positions([index])
    }

    pub fn positions(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            positions: indices.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Select every object of `class_name` at any depth.
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    /// Select explicit objects by path.
    pub fn nodes(paths: impl IntoIterator<Item = NodePath>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_positions(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.positions.extend(indices);
        self
    }

    pub fn with_paths(mut self, paths: impl IntoIterator<Item = NodePath>) -> Self {
        self.paths.extend(paths);
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Keep only objects whose `name` attribute is one of `names`.
    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Count positions over every depth instead of the tenant's children.
    pub fn deep(mut self) -> Self {
        self.scope = IndexScope::Deep;
        self
    }

    pub fn scope(&self) -> IndexScope {
        self.scope
    }

    /// True when the selector cannot match anything.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            && self.paths.is_empty()
            && self.class_name.is_none()
            && self.names.is_empty()
    }
}

/// Resolve `selector` against `doc`.
///
/// The result is free of duplicates and sorted in pre-order.
pub fn resolve(doc: &Document, selector: &Selector) -> Result<Vec<NodePath>, SelectError> {
    let index = TreeIndex::build(doc);
    resolve_with_index(&index, selector)
}

/// Resolve `selector` using an index built earlier for the same document.
pub fn resolve_with_index(
    index: &TreeIndex<'_>,
    selector: &Selector,
) -> Result<Vec<NodePath>, SelectError> {
    let doc = index.document();
    let mut matched: BTreeSet<NodePath> = BTreeSet::new();
    let narrows_by_class;

    if !selector.positions.is_empty() || !selector.paths.is_empty() {
        for &position in &selector.positions {
            matched.insert(index.position(selector.scope, position)?.clone());
        }
        for path in &selector.paths {
            if doc.node(path).is_none() {
                return Err(SelectError::NodeNotFound(path.clone()));
            }
            matched.insert(path.clone());
        }
        narrows_by_class = true;
    } else if let Some(class_name) = &selector.class_name {
        matched.extend(index.by_class(class_name).iter().cloned());
        narrows_by_class = false;
    } else if !selector.names.is_empty() {
        doc.walk_paths(|path, _| {
            matched.insert(path.clone());
        });
        narrows_by_class = false;
    } else {
        return Ok(Vec::new());
    }

    Ok(matched
        .into_iter()
        .filter(|path| {
            let Some(node) = doc.node(path) else {
                return false;
            };
            let class_ok = match (&selector.class_name, narrows_by_class) {
                (Some(class_name), true) => node.class_name == *class_name,
                _ => true,
            };
            let name_ok = selector.names.is_empty()
                || node
                    .name()
                    .is_some_and(|name| selector.names.iter().any(|n| n == name));
            class_ok && name_ok
        })
        .collect())
}
