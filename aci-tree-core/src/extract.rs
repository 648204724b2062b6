use crate::select::{resolve, SelectError, Selector};
use crate::tree::{AciNode, Document, NodePath};

/// Extract the objects picked by `selector` into a standalone export.
pub fn extract(doc: &Document, selector: &Selector) -> Result<Document, SelectError> {
    let paths = resolve(doc, selector)?;
    Ok(extract_nodes(doc, &paths))
}

/// Extract the objects at `paths` into a standalone export.
///
/// Each top-level object containing a match is reduced to its attributes and
/// the ancestor chains leading to the matches; matched objects are copied
/// whole. Paths that do not exist in `doc` are skipped. The source document
/// is never modified.
pub fn extract_nodes(doc: &Document, paths: &[NodePath]) -> Document {
    let mut sorted: Vec<&[usize]> = paths
        .iter()
        .filter(|path| doc.node(path).is_some())
        .map(NodePath::components)
        .collect();
    sorted.sort_unstable();
    sorted.dedup();

    let imdata = group_by_head(&sorted)
        .into_iter()
        .map(|(top, tails)| prune(&doc.imdata()[top], &tails))
        .collect();
    Document::new(imdata)
}

fn prune(node: &AciNode, tails: &[&[usize]]) -> AciNode {
    if tails.iter().any(|tail| tail.is_empty()) {
        return node.clone();
    }

    let mut skeleton = node.shallow_copy();
    for (child, child_tails) in group_by_head(tails) {
        skeleton.children.push(prune(&node.children[child], &child_tails));
    }
    skeleton
}

/// Split sorted, non-empty paths into runs sharing their first component.
fn group_by_head<'p>(paths: &[&'p [usize]]) -> Vec<(usize, Vec<&'p [usize]>)> {
    let mut groups: Vec<(usize, Vec<&'p [usize]>)> = Vec::new();
    for path in paths {
        let Some((head, tail)) = path.split_first() else {
            continue;
        };
        match groups.last_mut() {
            Some((last, tails)) if last == head => tails.push(tail),
            _ => groups.push((*head, vec![tail])),
        }
    }
    groups
}
