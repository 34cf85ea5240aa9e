//! HTML parsing into owned [`Node`] trees.
//!
//! Parsing is delegated to `scraper` (html5ever underneath), which never
//! fails: malformed markup is recovered the way a browser would. The
//! read-only scraper tree is then copied into our mutable representation.

use scraper::{ElementRef, Html};

use crate::node::{Element, Node};

/// Parse markup as body content and return its top-level nodes
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    convert_children(fragment.root_element())
}

/// Parse markup into a detached `body` element holding the top-level nodes.
///
/// Plain-content library documents are body fragments, so this is the root
/// every fetched document is partitioned from.
pub fn parse_body(html: &str) -> Element {
    Element::new("body").with_children(parse_fragment(html))
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        match child.value() {
            scraper::Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    nodes.push(Node::Element(convert_element(element)));
                }
            }
            scraper::Node::Text(text) => nodes.push(Node::text(&*text.text)),
            scraper::Node::Comment(comment) => nodes.push(Node::comment(&*comment.comment)),
            _ => {}
        }
    }
    nodes
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut out = Element::new(value.name());
    for (name, attr_value) in value.attrs() {
        out.set_attr(name, attr_value);
    }
    out.children = convert_children(element);
    out
}
