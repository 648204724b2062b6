use std::cell::OnceCell;
use std::collections::BTreeMap;

use crate::select::SelectError;
use crate::tree::{Document, NodePath};

/// Which objects a positional index counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexScope {
    /// Direct children of the first top-level object (the tenant).
    #[default]
    Children,
    /// Every object below the top-level objects, in pre-order.
    Deep,
}

/// Positional and class lookups over one document snapshot.
///
/// The deep positional index is only computed when first asked for.
#[derive(Debug)]
pub struct TreeIndex<'a> {
    doc: &'a Document,
    children: Vec<NodePath>,
    deep: OnceCell<Vec<NodePath>>,
    classes: BTreeMap<&'a str, Vec<NodePath>>,
}

impl<'a> TreeIndex<'a> {
    pub fn build(doc: &'a Document) -> Self {
        let children = match doc.tenant() {
            Some(tenant) => (0..tenant.children.len())
                .map(|i| NodePath::top(0).child(i))
                .collect(),
            None => Vec::new(),
        };

        let mut classes: BTreeMap<&'a str, Vec<NodePath>> = BTreeMap::new();
        doc.walk_paths(|path, node| {
            classes
                .entry(node.class_name.as_str())
                .or_default()
                .push(path.clone());
        });

        Self {
            doc,
            children,
            deep: OnceCell::new(),
            classes,
        }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// All indexed paths for `scope`, in positional order.
    pub fn positions(&self, scope: IndexScope) -> &[NodePath] {
        match scope {
            IndexScope::Children => &self.children,
            IndexScope::Deep => self.deep.get_or_init(|| {
                let mut out = Vec::new();
                self.doc.walk_paths(|path, _| {
                    if path.depth() > 1 {
                        out.push(path.clone());
                    }
                });
                out
            }),
        }
    }

    /// Path of the object at `index` within `scope`.
    pub fn position(&self, scope: IndexScope, index: usize) -> Result<&NodePath, SelectError> {
        let positions = self.positions(scope);
        positions.get(index).ok_or(SelectError::IndexOutOfRange {
            index,
            len: positions.len(),
        })
    }

    pub fn len(&self, scope: IndexScope) -> usize {
        self.positions(scope).len()
    }

    pub fn is_empty(&self, scope: IndexScope) -> bool {
        self.len(scope) == 0
    }

    /// Every object of `class_name` at any depth; empty when the class is absent.
    pub fn by_class(&self, class_name: &str) -> &[NodePath] {
        self.classes
            .get(class_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indexed class names with their object counts.
    pub fn classes(&self) -> impl Iterator<Item = (&'a str, usize)> + '_ {
        self.classes.iter().map(|(name, paths)| (*name, paths.len()))
    }
}
