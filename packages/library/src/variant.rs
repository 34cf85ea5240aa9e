use serde::Serialize;

use crate::document::{BlockDocument, VariantGroup};

/// A resolvable variant as shown in block lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantListing {
    pub path: String,
    pub index: usize,
    /// First class token of the block
    pub block_name: String,
    /// Block name with variant classes, e.g. `hero (dark, wide)`
    pub name_with_variants: String,
    /// Metadata name override, else [`Self::name_with_variants`]
    pub display_name: String,
    /// Rendered description, inherited from the document when the variant
    /// has none of its own
    pub description: Option<String>,
    pub search_tags: Option<String>,
}

impl VariantListing {
    /// Build a listing for a group. Groups without a classed block are not
    /// listable.
    pub fn resolve(document: &BlockDocument, group: &VariantGroup) -> Option<Self> {
        let block = group.block()?;
        let mut classes = block.class_list();
        let block_name = classes.next()?.to_string();
        let variants: Vec<&str> = classes.collect();

        let name_with_variants = if variants.is_empty() {
            block_name.clone()
        } else {
            format!("{} ({})", block_name, variants.join(", "))
        };

        let metadata = group.metadata.as_ref();
        let display_name = metadata
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| name_with_variants.clone());
        let description = metadata
            .and_then(|m| m.description_html())
            .or_else(|| document.default_metadata.description_html());
        let search_tags = metadata.and_then(|m| m.search_tags.clone());

        Some(Self {
            path: document.path.clone(),
            index: group.index,
            block_name,
            name_with_variants,
            display_name,
            description,
            search_tags,
        })
    }

    /// Text searched against: search tags followed by the display name
    pub fn search_text(&self) -> String {
        match &self.search_tags {
            Some(tags) if !tags.trim().is_empty() => format!("{} {}", tags, self.display_name),
            _ => self.display_name.clone(),
        }
    }

    /// True when every whitespace-separated query token is a
    /// case-insensitive substring of [`Self::search_text`]. An empty query
    /// matches nothing.
    pub fn matches(&self, query: &str) -> bool {
        let haystack = self.search_text().to_lowercase();
        let mut tokens = query.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return false;
        }
        tokens.all(|token| haystack.contains(&token.to_lowercase()))
    }
}

/// Listings across several documents that match `query`
pub fn search<'a>(
    documents: impl IntoIterator<Item = &'a BlockDocument>,
    query: &str,
) -> Vec<VariantListing> {
    documents
        .into_iter()
        .flat_map(|document| document.search(query))
        .collect()
}
