use aci_tree_core::{AciNode, ChildEntry, Document, HierarchyEntry, NodePath, Summary};
use colored::{ColoredString, Colorize};

/// Render describe output.
pub fn render_summary(summary: &Summary) -> String {
    let mut out = Vec::new();
    out.push(
        format!(
            "total_count={} nodes={} max_depth={} top_level_children={}",
            summary.total_count, summary.total_nodes, summary.max_depth, summary.top_level_children
        )
        .cyan()
        .to_string(),
    );

    out.push("classes".bold().to_string());
    let mut classes: Vec<(&String, &usize)> = summary.class_counts.iter().collect();
    classes.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (class_name, count) in classes {
        out.push(format!("- {class_name}: {count}"));
    }

    out.push("depths".bold().to_string());
    for (depth, count) in &summary.nodes_per_depth {
        out.push(format!("- {depth}: {count}"));
    }

    out.push("child_counts".bold().to_string());
    for (children, count) in &summary.child_count_distribution {
        out.push(format!("- {children} children: {count}"));
    }

    if !summary.status_counts.is_empty() {
        out.push("statuses".bold().to_string());
        for (status, count) in &summary.status_counts {
            out.push(format!("- {}: {count}", paint_status(status)));
        }
    }
    out.join("\n")
}

/// Render the tenant's children, truncated to `limit` rows when given.
pub fn render_children(entries: &[ChildEntry], limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    let mut out = Vec::with_capacity(shown + 1);
    for entry in &entries[..shown] {
        let mut line = format!("[{}] {}", entry.index, entry.class_name.bold());
        if let Some(name) = entry.attributes.get("name") {
            line.push_str(&format!(" name={name}"));
        }
        if let Some(descr) = entry.attributes.get("descr").filter(|d| !d.is_empty()) {
            line.push_str(&format!(" descr={descr}"));
        }
        if let Some(status) = entry.attributes.get("status").filter(|s| !s.is_empty()) {
            line.push_str(&format!(" status={}", paint_status(status)));
        }
        out.push(line);
    }
    if entries.len() > shown {
        out.push(format!("... ({} more)", entries.len() - shown));
    }
    out.join("\n")
}

/// Render an object hierarchy as an indented tree.
pub fn render_hierarchy(entries: &[HierarchyEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        render_entry(entry, 0, &mut out);
    }
    out
}

fn render_entry(entry: &HierarchyEntry, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{indent}{} {} {}",
        entry.path.to_string().dimmed(),
        entry.class_name.bold(),
        entry.name
    ));
    if let Some(status) = entry.status.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!(" [{}]", paint_status(status)));
    }
    out.push('\n');

    for child in &entry.children {
        render_entry(child, depth + 1, out);
    }
}

/// Render resolved objects, one per line.
pub fn render_matches(doc: &Document, paths: &[NodePath]) -> String {
    let mut out = Vec::with_capacity(paths.len() + 1);
    out.push(format!("matched={}", paths.len()).cyan().to_string());
    for path in paths {
        if let Some(node) = doc.node(path) {
            out.push(format!("{} {}", path, describe_node(node)));
        }
    }
    out.join("\n")
}

fn describe_node(node: &AciNode) -> String {
    let mut line = node.class_name.bold().to_string();
    if let Some(name) = node.name() {
        line.push_str(&format!(" name={name}"));
    }
    if let Some(status) = node.status().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" status={}", paint_status(status)));
    }
    line
}

fn paint_status(status: &str) -> ColoredString {
    match status {
        "deleted" => status.red(),
        "created" => status.green(),
        _ => status.yellow(),
    }
}
