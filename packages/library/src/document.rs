//! # Block Documents
//!
//! A library document is a plain-content page whose top-level `div`s are
//! sections. Each section is one authored variant of the block. A section
//! holding nothing but a `library-metadata` block carries the document-wide
//! defaults instead of a variant.

use blockshelf_dom::{parse_body, Element, Node};
use tracing::{debug, instrument};

use crate::metadata::{LibraryMetadata, LIBRARY_METADATA_CLASS};
use crate::variant::VariantListing;

/// One authored variant of a block
#[derive(Debug, Clone, PartialEq)]
pub struct VariantGroup {
    /// Position among the document's variant groups
    pub index: usize,
    /// Section element with any metadata block removed
    pub fragment: Element,
    pub metadata: Option<LibraryMetadata>,
}

impl VariantGroup {
    /// The block element: the first classed `div` in the section
    pub fn block(&self) -> Option<&Element> {
        self.fragment
            .find(&|el| el.is("div") && el.attributes.contains("class"))
    }

    /// Block name without variant classes
    pub fn block_name(&self) -> Option<&str> {
        self.block()?.class_list().next()
    }
}

/// A fetched and partitioned library document. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDocument {
    pub path: String,
    pub default_metadata: LibraryMetadata,
    pub groups: Vec<VariantGroup>,
}

impl BlockDocument {
    pub fn from_html(path: impl Into<String>, html: &str) -> Self {
        Self::from_body(path, parse_body(html))
    }

    /// Partition a parsed body into variant groups
    #[instrument(skip_all, fields(path = tracing::field::Empty))]
    pub fn from_body(path: impl Into<String>, body: Element) -> Self {
        let path = path.into();
        tracing::Span::current().record("path", path.as_str());

        let mut sections: Vec<Element> = body
            .children
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) if element.is("div") => Some(element),
                _ => None,
            })
            .collect();

        let mut default_metadata = LibraryMetadata::default();
        if sections.first().is_some_and(is_metadata_only) {
            let section = sections.remove(0);
            if let Some(block) = section.element_children().next() {
                default_metadata = LibraryMetadata::from_block(block);
            }
            debug!("Found default library metadata");
        }

        let groups: Vec<VariantGroup> = sections
            .into_iter()
            .enumerate()
            .map(|(index, mut fragment)| {
                let metadata = take_metadata(&mut fragment);
                VariantGroup {
                    index,
                    fragment,
                    metadata,
                }
            })
            .collect();

        debug!(groups = groups.len(), "Partitioned library document");

        Self {
            path,
            default_metadata,
            groups,
        }
    }

    pub fn group(&self, index: usize) -> Option<&VariantGroup> {
        self.groups.get(index)
    }

    /// Every group with a resolvable block name
    pub fn listings(&self) -> Vec<VariantListing> {
        self.groups
            .iter()
            .filter_map(|group| VariantListing::resolve(self, group))
            .collect()
    }

    pub fn listing(&self, index: usize) -> Option<VariantListing> {
        VariantListing::resolve(self, self.group(index)?)
    }

    /// Listings matching a search query
    pub fn search(&self, query: &str) -> Vec<VariantListing> {
        self.listings()
            .into_iter()
            .filter(|listing| listing.matches(query))
            .collect()
    }
}

fn is_metadata_only(section: &Element) -> bool {
    let mut children = section.element_children();
    matches!(
        (children.next(), children.next()),
        (Some(only), None) if only.has_class(LIBRARY_METADATA_CLASS)
    )
}

/// Remove the metadata block that follows the section's block and read it.
/// Only direct children of the section are considered.
fn take_metadata(section: &mut Element) -> Option<LibraryMetadata> {
    let start = section
        .children
        .iter()
        .position(|node| node.as_element().is_some_and(is_block))
        .map_or(0, |index| index + 1);
    let offset = section.children[start..].iter().position(|node| {
        node.as_element()
            .is_some_and(|el| el.has_class(LIBRARY_METADATA_CLASS))
    })?;

    match section.children.remove(start + offset) {
        Node::Element(block) => Some(LibraryMetadata::from_block(&block)),
        _ => None,
    }
}

fn is_block(element: &Element) -> bool {
    element.is("div")
        && element.attributes.contains("class")
        && !element.has_class(LIBRARY_METADATA_CLASS)
}
