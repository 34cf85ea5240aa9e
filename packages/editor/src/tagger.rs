//! # Identity Tagging
//!
//! Editable elements of a block get a [`StableId`] in the
//! `data-library-id` attribute before the block is previewed. The id
//! travels with the element through cloning and decoration, which is what
//! lets the mirror find the canonical counterpart of a live edit.
//!
//! A link that is the whole content of a `p`, `strong` or `em` (directly,
//! or through one intermediate element) is left untagged: the wrapper owns
//! its text.

use blockshelf_dom::{Element, Node};
use tracing::debug;

use crate::ids::{IdGenerator, StableId, LIBRARY_ID_ATTR};

const EDITABLE_TAGS: &[&str] = &["p", "strong", "em", "a", "h1", "h2", "h3", "h4", "h5", "h6", "img"];

const LINK_WRAPPER_TAGS: &[&str] = &["p", "strong", "em"];

pub fn is_editable(element: &Element) -> bool {
    EDITABLE_TAGS.iter().any(|tag| element.is(tag))
}

fn is_link_wrapper(element: &Element) -> bool {
    LINK_WRAPPER_TAGS.iter().any(|tag| element.is(tag))
}

/// Tag every editable element under (and including) `block`.
///
/// Tag a fresh clone exactly once; tagging an already tagged tree
/// overwrites its ids. Returns the number of ids assigned.
pub fn tag_editables(block: &mut Element, ids: &mut dyn IdGenerator) -> usize {
    let mut count = 0;
    if is_editable(block) {
        assign(block, ids, &mut count);
    }
    tag_children(block, false, ids, &mut count);
    debug!(count, "Tagged editable elements");
    count
}

/// `wrapped` is true when `parent` is itself the sole content of a link
/// wrapper.
fn tag_children(parent: &mut Element, wrapped: bool, ids: &mut dyn IdGenerator, count: &mut usize) {
    let sole = parent.sole_child_index();
    let wrapper = is_link_wrapper(parent);

    for (index, child) in parent.children.iter_mut().enumerate() {
        let Node::Element(child) = child else {
            continue;
        };
        let is_sole = sole == Some(index);

        if child.is("a") && is_sole && (wrapper || wrapped) {
            child.remove_attr(LIBRARY_ID_ATTR);
        } else if is_editable(child) {
            assign(child, ids, count);
        }

        tag_children(child, wrapper && is_sole, ids, count);
    }
}

fn assign(element: &mut Element, ids: &mut dyn IdGenerator, count: &mut usize) {
    element.set_attr(LIBRARY_ID_ATTR, ids.next_id().as_str());
    *count += 1;
}

/// Remove every stable id, e.g. from generated markup that echoed them
pub fn strip_ids(element: &mut Element) {
    element.remove_attr(LIBRARY_ID_ATTR);
    for child in element.element_children_mut() {
        strip_ids(child);
    }
}

/// Ids in document order
pub fn collect_ids(element: &Element) -> Vec<StableId> {
    let mut found = Vec::new();
    if let Some(id) = StableId::of(element) {
        found.push(id);
    }
    for child in element.element_children() {
        found.extend(collect_ids(child));
    }
    found
}
