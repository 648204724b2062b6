//! Command-line front end for APIC tenant JSON exports.
//!
//! The object model, loader and tree operations live in `aci-tree-core`.
//! This crate adds what the `apic-extract` binary needs around them:
//!
//! - [`selection`]: Selections as typed on the command line or in a plan
//! - [`settings`]: TOML settings with embedded defaults
//! - [`plan`]: Batch plans of extract and status jobs
//! - [`report`]: Terminal-friendly colored rendering
//!
//! # Examples
//!
//! ```ignore
//! use aci_tree_core::{extract, parse_file};
//! use apic_extract::selection::SelectionSpec;
//!
//! let doc = parse_file("tn-datacenter.json".as_ref())?;
//! let spec = SelectionSpec {
//!     class: Some("fvBD".to_string()),
//!     ..SelectionSpec::default()
//! };
//! let bds = extract(&doc, &spec.to_selector()?)?;
//! println!("{} bridge domains", bds.node_count());
//! ```

pub mod plan;
pub mod report;
pub mod selection;
pub mod settings;
