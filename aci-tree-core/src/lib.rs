//! Object tree model and operations for APIC tenant exports.
//!
//! An export is a `{"totalCount": .., "imdata": [..]}` envelope whose entries
//! are objects keyed by class name, each with `attributes` and `children`.
//! This crate loads such exports (streaming large files), indexes them by
//! position and class, extracts selected objects into standalone exports,
//! and marks objects with a lifecycle status.

pub mod cache;
pub mod extract;
pub mod index;
pub mod listing;
pub mod parser;
pub mod select;
pub mod status;
pub mod summary;
pub mod tree;
pub mod writer;

pub use cache::{CacheError, DocumentCache};
pub use extract::{extract, extract_nodes};
pub use index::{IndexScope, TreeIndex};
pub use listing::{hierarchy, list_children, ChildEntry, HierarchyEntry};
pub use parser::{load, parse, parse_file, parse_file_with_options, LoadError, LoadOptions};
pub use select::{resolve, resolve_with_index, SelectError, Selector};
pub use status::{clear_status, set_status, with_status, Status, StatusError};
pub use summary::{describe, Summary};
pub use tree::{AciNode, Attributes, Document, NodePath, NodePathParseError};
pub use writer::{write, write_compact, write_file, WriteError};
