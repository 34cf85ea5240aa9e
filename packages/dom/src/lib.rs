//! # Blockshelf DOM
//!
//! Owned HTML trees for block fragments.
//!
//! The editor keeps two copies of every previewed block (the canonical tree
//! used for copy/export and the live tree the author edits). Both are plain
//! [`Node`] values: nothing is reference-counted or shared, so the two trees
//! can only be kept in step by explicit messages.

pub mod node;
pub mod parse;
pub mod query;
pub mod serialize;
pub mod visitor;

pub use node::{Attributes, Element, Node};
pub use parse::{parse_body, parse_fragment};
pub use query::NodePath;
pub use serialize::{escape_text, is_void};
pub use visitor::{walk_element_mut, walk_node_mut, VisitorMut};
