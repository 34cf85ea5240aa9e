//! # Library Metadata
//!
//! Authors annotate library documents with `library-metadata` blocks: a
//! two-column table of key/value rows. Known keys get typed fields; any
//! other key is kept in [`LibraryMetadata::extra`] so new annotations pass
//! through untouched.

use std::collections::BTreeMap;

use blockshelf_dom::Element;
use serde::{Deserialize, Serialize};

/// Class name of metadata marker blocks
pub const LIBRARY_METADATA_CLASS: &str = "library-metadata";

/// A metadata value: one entry, or several when the value cell holds
/// multiple links, images or paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Single(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// Flattened text, list entries joined by a space
    pub fn as_text(&self) -> String {
        match self {
            MetadataValue::Single(value) => value.clone(),
            MetadataValue::List(values) => values.join(" "),
        }
    }

    /// Markup for a description: list entries become paragraphs
    pub fn to_description_html(&self) -> String {
        match self {
            MetadataValue::Single(value) => value.clone(),
            MetadataValue::List(values) => values
                .iter()
                .map(|item| format!("<p>{}</p>", item))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    fn is_truthy(&self) -> bool {
        let text = self.as_text();
        let text = text.trim();
        !text.is_empty() && !text.eq_ignore_ascii_case("false")
    }
}

/// Annotations attached to a document or one of its variants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMetadata {
    /// Display name override
    pub name: Option<String>,
    pub description: Option<MetadataValue>,
    pub search_tags: Option<String>,
    /// Raw `type` value
    pub kind: Option<String>,
    pub is_template: bool,
    pub is_multi_section: bool,
    pub is_compound: bool,
    /// Unrecognized keys, camel-cased
    pub extra: BTreeMap<String, MetadataValue>,
}

impl LibraryMetadata {
    /// Build from a camel-cased key/value config
    pub fn from_config(config: BTreeMap<String, MetadataValue>) -> Self {
        let mut metadata = LibraryMetadata::default();

        for (key, value) in config {
            match key.as_str() {
                "style" => {}
                "name" => metadata.name = Some(value.as_text()),
                "description" => metadata.description = Some(value),
                "searchtags" | "searchTags" => metadata.search_tags = Some(value.as_text()),
                "type" => {
                    let kind = value.as_text();
                    metadata.is_template = kind.trim().eq_ignore_ascii_case("template");
                    metadata.kind = Some(kind);
                }
                "multiSectionBlock" => metadata.is_multi_section = value.is_truthy(),
                "compoundBlock" => metadata.is_compound = value.is_truthy(),
                _ => {
                    metadata.extra.insert(key, value);
                }
            }
        }

        metadata
    }

    /// Read a `library-metadata` block element
    pub fn from_block(block: &Element) -> Self {
        Self::from_config(read_block_config(block))
    }

    /// Description markup, if any. A blank description counts as none.
    pub fn description_html(&self) -> Option<String> {
        self.description
            .as_ref()
            .filter(|value| !value.as_text().trim().is_empty())
            .map(MetadataValue::to_description_html)
    }
}

/// Read a key/value block into a camel-cased config map.
///
/// Each row's first cell is the key. The value is taken from links in the
/// second cell if there are any, else images, else paragraphs, else the
/// cell text.
pub fn read_block_config(block: &Element) -> BTreeMap<String, MetadataValue> {
    let mut config = BTreeMap::new();

    for row in block.element_children().filter(|row| row.is("div")) {
        let mut cols = row.element_children();
        let (Some(key_col), Some(value_col)) = (cols.next(), cols.next()) else {
            continue;
        };

        let key = to_camel_case(&key_col.text_content());
        if key.is_empty() {
            continue;
        }
        config.insert(key, read_value(value_col));
    }

    config
}

fn read_value(col: &Element) -> MetadataValue {
    let anchors = col.find_all(&|el| el.is("a"));
    if !anchors.is_empty() {
        return collect(anchors.iter().map(|a| a.attr("href").unwrap_or_default().to_string()));
    }

    let images = col.find_all(&|el| el.is("img"));
    if !images.is_empty() {
        return collect(images.iter().map(|img| img.attr("src").unwrap_or_default().to_string()));
    }

    let paragraphs = col.find_all(&|el| el.is("p"));
    if !paragraphs.is_empty() {
        return collect(paragraphs.iter().map(|p| p.text_content().trim().to_string()));
    }

    MetadataValue::Single(col.text_content().trim().to_string())
}

fn collect(values: impl Iterator<Item = String>) -> MetadataValue {
    let mut values: Vec<String> = values.collect();
    if values.len() == 1 {
        MetadataValue::Single(values.remove(0))
    } else {
        MetadataValue::List(values)
    }
}

/// Sanitize a string for use as a class name: lower-case, runs of anything
/// but ASCII letters and digits collapse to one `-`, no leading/trailing `-`
pub fn to_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Class name with `-x` sequences folded to `X`
pub fn to_camel_case(name: &str) -> String {
    let class_name = to_class_name(name);
    let mut out = String::with_capacity(class_name.len());
    let mut chars = class_name.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}
