use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

/// Ordered string attributes of an object.
///
/// Key order is the order keys were first seen, which keeps re-serialized
/// exports comparable with the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Update `key` in place when present, otherwise append it.
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One configuration object of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AciNode {
    /// Class name, for example `fvBD`.
    pub class_name: String,
    /// Object attributes in source order.
    pub attributes: Attributes,
    /// Child objects in source order.
    pub children: Vec<AciNode>,
}

impl AciNode {
    /// Create an object with no attributes or children.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_child(mut self, child: AciNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    /// The `name` attribute, which most policy objects carry.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn status(&self) -> Option<&str> {
        self.attribute("status")
    }

    /// Copy of this object with its attributes but no children.
    pub fn shallow_copy(&self) -> AciNode {
        AciNode {
            class_name: self.class_name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    /// Return all direct children of class `class_name`.
    pub fn get_children(&self, class_name: &str) -> Vec<&AciNode> {
        self.children
            .iter()
            .filter(|child| child.class_name == class_name)
            .collect()
    }

    /// Number of objects in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(AciNode::subtree_len).sum::<usize>()
    }

    /// Visit every object of the subtree in pre-order together with its depth.
    pub fn walk<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a AciNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk(depth + 1, visit);
        }
    }
}

impl Display for AciNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name)?;
        if let Some(name) = self.name() {
            write!(f, " name={name}")?;
        }
        if let Some(status) = self.status() {
            write!(f, " status={status}")?;
        }
        Ok(())
    }
}

/// Location of an object inside a [`Document`].
///
/// The first component indexes `imdata`, every following component indexes
/// `children` of the previous object. Ordering is lexicographic, which is the
/// same as pre-order traversal order. Serializes in its dotted form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new(components: Vec<usize>) -> Self {
        Self(components)
    }

    /// Path of the top-level object at `index`.
    pub fn top(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut components = self.0.clone();
        components.push(index);
        Self(components)
    }

    pub fn components(&self) -> &[usize] {
        &self.0
    }

    /// Number of components; top-level objects have depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl Serialize for NodePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a textual node path cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node path '{0}': expected dot-separated indices such as 0.5.2")]
pub struct NodePathParseError(String);

impl FromStr for NodePath {
    type Err = NodePathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(NodePathParseError(s.to_string()));
        }
        trimmed
            .split('.')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(NodePath)
            .map_err(|_| NodePathParseError(s.to_string()))
    }
}

/// Root wrapper of an export.
///
/// A `totalCount` read from a file is kept as long as the entry list is
/// untouched; once the entries are changed the count follows `imdata`.
#[derive(Debug, Clone, Eq)]
pub struct Document {
    declared_count: Option<usize>,
    /// Top-level entries, normally a single tenant.
    imdata: Vec<AciNode>,
}

impl Document {
    /// Build a document whose count matches `imdata`.
    pub fn new(imdata: Vec<AciNode>) -> Self {
        Self {
            declared_count: None,
            imdata,
        }
    }

    pub(crate) fn with_declared_count(imdata: Vec<AciNode>, declared_count: Option<usize>) -> Self {
        Self {
            declared_count,
            imdata,
        }
    }

    /// An export with no entries.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Value of `totalCount`.
    pub fn total_count(&self) -> usize {
        self.declared_count.unwrap_or(self.imdata.len())
    }

    pub fn imdata(&self) -> &[AciNode] {
        &self.imdata
    }

    /// Mutable entry list. The count follows the list from here on.
    pub fn imdata_mut(&mut self) -> &mut Vec<AciNode> {
        self.declared_count = None;
        &mut self.imdata
    }

    /// Append a top-level entry.
    pub fn push(&mut self, node: AciNode) {
        self.imdata_mut().push(node);
    }

    /// The first top-level object, by convention the tenant.
    pub fn tenant(&self) -> Option<&AciNode> {
        self.imdata.first()
    }

    pub fn node(&self, path: &NodePath) -> Option<&AciNode> {
        let (first, rest) = path.components().split_first()?;
        let mut current = self.imdata.get(*first)?;
        for index in rest {
            current = current.children.get(*index)?;
        }
        Some(current)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut AciNode> {
        let (first, rest) = path.components().split_first()?;
        let mut current = self.imdata.get_mut(*first)?;
        for index in rest {
            current = current.children.get_mut(*index)?;
        }
        Some(current)
    }

    /// Total number of objects across all top-level entries.
    pub fn node_count(&self) -> usize {
        self.imdata.iter().map(AciNode::subtree_len).sum()
    }

    /// Visit every object in pre-order with its path.
    pub fn walk_paths<'a>(&'a self, mut visit: impl FnMut(&NodePath, &'a AciNode)) {
        fn walk<'a>(
            node: &'a AciNode,
            path: &mut Vec<usize>,
            visit: &mut impl FnMut(&NodePath, &'a AciNode),
        ) {
            visit(&NodePath(path.clone()), node);
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                walk(child, path, visit);
                path.pop();
            }
        }

        let mut path = Vec::new();
        for (i, top) in self.imdata.iter().enumerate() {
            path.push(i);
            walk(top, &mut path, &mut visit);
            path.pop();
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.total_count() == other.total_count() && self.imdata == other.imdata
    }
}

#[cfg(test)]
mod tests {
    use super::{AciNode, Attributes, Document, NodePath};

    #[test]
    fn insert_updates_in_place_and_appends_new_keys() {
        let mut attrs: Attributes = [("name", "bd1"), ("descr", "")].into_iter().collect();
        assert_eq!(attrs.insert("name", "bd2"), Some("bd1".to_string()));
        assert_eq!(attrs.insert("status", "created"), None);

        let keys: Vec<&str> = attrs.keys().collect();
        assert_eq!(keys, vec!["name", "descr", "status"]);
        assert_eq!(attrs.get("name"), Some("bd2"));
    }

    #[test]
    fn node_path_round_trips_through_text() {
        let path: NodePath = "0.5.2".parse().expect("path should parse");
        assert_eq!(path.components(), &[0, 5, 2]);
        assert_eq!(path.to_string(), "0.5.2");
        assert!("0..1".parse::<NodePath>().is_err());
        assert!("".parse::<NodePath>().is_err());
    }

    #[test]
    fn path_order_matches_pre_order() {
        let mut paths = vec![
            NodePath::new(vec![0, 1]),
            NodePath::new(vec![0, 0, 3]),
            NodePath::new(vec![0]),
            NodePath::new(vec![0, 0]),
        ];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["0", "0.0", "0.0.3", "0.1"]);
    }

    #[test]
    fn node_lookup_follows_path() {
        let tenant = AciNode::new("fvTenant")
            .with_child(AciNode::new("fvAp").with_child(AciNode::new("fvAEPg")))
            .with_child(AciNode::new("fvBD"));
        let doc = Document::new(vec![tenant]);

        let epg = doc.node(&NodePath::new(vec![0, 0, 0])).expect("epg exists");
        assert_eq!(epg.class_name, "fvAEPg");
        assert!(doc.node(&NodePath::new(vec![0, 2])).is_none());
        assert!(doc.node(&NodePath::new(vec![])).is_none());
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn clone_is_independent() {
        let original = AciNode::new("fvBD").with_attribute("name", "bd1");
        let mut copy = original.clone();
        copy.attributes.insert("name", "changed");
        assert_eq!(original.name(), Some("bd1"));
    }

    #[test]
    fn node_path_serializes_dotted() {
        let json = serde_json::to_string(&NodePath::new(vec![0, 5, 2])).expect("serialize");
        assert_eq!(json, "\"0.5.2\"");
    }

    #[test]
    fn pushing_an_entry_updates_the_count() {
        let mut doc = Document::with_declared_count(vec![AciNode::new("fvTenant")], Some(1));
        doc.push(AciNode::new("fvTenant").with_attribute("name", "t2"));
        assert_eq!(doc.total_count(), 2);

        doc.imdata_mut().clear();
        assert_eq!(doc.total_count(), 0);
    }

    #[test]
    fn declared_count_kept_while_entries_untouched() {
        let mut doc = Document::with_declared_count(vec![AciNode::new("fvTenant")], Some(3));
        if let Some(tenant) = doc.node_mut(&NodePath::top(0)) {
            tenant.attributes.insert("status", "modified");
        }
        assert_eq!(doc.total_count(), 3);
    }
}
