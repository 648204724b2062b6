use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::Document;

/// Aggregate statistics over one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    /// Objects across every top-level entry, the entries included.
    pub total_nodes: usize,
    /// Deepest level seen; top-level objects sit at depth 0.
    pub max_depth: usize,
    /// Direct children of the first top-level object.
    pub top_level_children: usize,
    pub class_counts: BTreeMap<String, usize>,
    pub nodes_per_depth: BTreeMap<usize, usize>,
    /// Maps a child count to how many objects have exactly that many children.
    pub child_count_distribution: BTreeMap<usize, usize>,
    pub status_counts: BTreeMap<String, usize>,
}

/// Compute a [`Summary`] of `doc`.
pub fn describe(doc: &Document) -> Summary {
    let mut summary = Summary {
        total_count: doc.total_count(),
        top_level_children: doc.tenant().map(|t| t.children.len()).unwrap_or(0),
        ..Summary::default()
    };

    for top in doc.imdata() {
        top.walk(0, &mut |node, depth| {
            summary.total_nodes += 1;
            summary.max_depth = summary.max_depth.max(depth);
            *summary
                .class_counts
                .entry(node.class_name.clone())
                .or_default() += 1;
            *summary.nodes_per_depth.entry(depth).or_default() += 1;
            *summary
                .child_count_distribution
                .entry(node.children.len())
                .or_default() += 1;
            if let Some(status) = node.status().filter(|s| !s.is_empty()) {
                *summary.status_counts.entry(status.to_string()).or_default() += 1;
            }
        });
    }

    summary
}
