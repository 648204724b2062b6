use serde::Serialize;

use crate::tree::{AciNode, Attributes, Document, NodePath};

/// One direct child of the tenant with a snapshot of its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildEntry {
    pub index: usize,
    pub class_name: String,
    pub attributes: Attributes,
}

/// List the direct children of the first top-level object in positional order.
pub fn list_children(doc: &Document) -> Vec<ChildEntry> {
    doc.tenant()
        .map(|tenant| {
            tenant
                .children
                .iter()
                .enumerate()
                .map(|(index, child)| ChildEntry {
                    index,
                    class_name: child.class_name.clone(),
                    attributes: child.attributes.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A navigable view of one object and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyEntry {
    pub path: NodePath,
    pub class_name: String,
    pub name: String,
    pub status: Option<String>,
    pub children: Vec<HierarchyEntry>,
}

/// Build the object hierarchy, stopping below `max_depth` levels of children.
///
/// Objects without a `name` attribute are labelled `"<class> <index>"`.
pub fn hierarchy(doc: &Document, max_depth: Option<usize>) -> Vec<HierarchyEntry> {
    doc.imdata()
        .iter()
        .enumerate()
        .map(|(i, top)| entry(top, NodePath::top(i), i, 0, max_depth))
        .collect()
}

fn entry(
    node: &AciNode,
    path: NodePath,
    index: usize,
    depth: usize,
    max_depth: Option<usize>,
) -> HierarchyEntry {
    let children = if max_depth.is_some_and(|max| depth >= max) {
        Vec::new()
    } else {
        node.children
            .iter()
            .enumerate()
            .map(|(i, child)| entry(child, path.child(i), i, depth + 1, max_depth))
            .collect()
    };

    HierarchyEntry {
        name: node
            .name()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("{} {index}", node.class_name)),
        status: node.status().map(ToString::to_string),
        class_name: node.class_name.clone(),
        path,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::{hierarchy, list_children};
    use crate::tree::{AciNode, Document};

    fn doc() -> Document {
        Document::new(vec![AciNode::new("fvTenant")
            .with_attribute("name", "t1")
            .with_child(
                AciNode::new("fvAp")
                    .with_attribute("name", "ap1")
                    .with_child(AciNode::new("fvAEPg")),
            )
            .with_child(AciNode::new("fvBD").with_attribute("name", "bd1"))])
    }

    #[test]
    fn children_are_listed_with_indices() {
        let entries = list_children(&doc());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].class_name, "fvBD");
        assert_eq!(entries[1].attributes.get("name"), Some("bd1"));
    }

    #[test]
    fn hierarchy_respects_depth_limit_and_labels() {
        let doc = doc();
        let full = hierarchy(&doc, None);
        let epg = &full[0].children[0].children[0];
        assert_eq!(epg.name, "fvAEPg 0");
        assert_eq!(epg.path.to_string(), "0.0.0");

        let shallow = hierarchy(&doc, Some(1));
        assert_eq!(shallow[0].children.len(), 2);
        assert!(shallow[0].children[0].children.is_empty());
    }
}
