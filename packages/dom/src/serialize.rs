//! HTML serialization following the browser fragment serialization rules,
//! so `outer_html`/`inner_html` output matches what a DOM would produce for
//! the same tree.

use crate::node::{Element, Node};

impl Node {
    /// Markup of this node including itself
    pub fn outer_html(&self) -> String {
        let mut buffer = String::new();
        write_node(self, None, &mut buffer);
        buffer
    }

    /// Markup of this node's children
    pub fn inner_html(&self) -> String {
        match self {
            Node::Element(element) => element.inner_html(),
            _ => String::new(),
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        collect_text(self, &mut buffer);
        buffer
    }
}

impl Element {
    pub fn outer_html(&self) -> String {
        let mut buffer = String::new();
        write_element(self, &mut buffer);
        buffer
    }

    pub fn inner_html(&self) -> String {
        let mut buffer = String::new();
        for child in &self.children {
            write_node(child, Some(self.tag.as_str()), &mut buffer);
        }
        buffer
    }

    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        for child in &self.children {
            collect_text(child, &mut buffer);
        }
        buffer
    }
}

fn write_node(node: &Node, parent_tag: Option<&str>, buffer: &mut String) {
    match node {
        Node::Element(element) => write_element(element, buffer),
        Node::Text { content } => {
            if parent_tag.is_some_and(is_raw_text) {
                buffer.push_str(content);
            } else {
                escape_into(content, false, buffer);
            }
        }
        Node::Comment { content } => {
            buffer.push_str("<!--");
            buffer.push_str(content);
            buffer.push_str("-->");
        }
    }
}

fn write_element(element: &Element, buffer: &mut String) {
    buffer.push('<');
    buffer.push_str(&element.tag);
    for (name, value) in element.attributes.iter() {
        buffer.push(' ');
        buffer.push_str(name);
        buffer.push_str("=\"");
        escape_into(value, true, buffer);
        buffer.push('"');
    }
    buffer.push('>');

    if is_void(&element.tag) {
        return;
    }

    for child in &element.children {
        write_node(child, Some(element.tag.as_str()), buffer);
    }

    buffer.push_str("</");
    buffer.push_str(&element.tag);
    buffer.push('>');
}

fn collect_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text { content } => buffer.push_str(content),
        Node::Element(element) => {
            for child in &element.children {
                collect_text(child, buffer);
            }
        }
        Node::Comment { .. } => {}
    }
}

/// Escape text for markup output. Attribute mode escapes quotes and leaves
/// angle brackets alone; text mode does the opposite.
pub fn escape_into(text: &str, attribute_mode: bool, buffer: &mut String) {
    for c in text.chars() {
        match c {
            '&' => buffer.push_str("&amp;"),
            '\u{a0}' => buffer.push_str("&nbsp;"),
            '"' if attribute_mode => buffer.push_str("&quot;"),
            '<' if !attribute_mode => buffer.push_str("&lt;"),
            '>' if !attribute_mode => buffer.push_str("&gt;"),
            _ => buffer.push(c),
        }
    }
}

pub fn escape_text(text: &str) -> String {
    let mut buffer = String::with_capacity(text.len());
    escape_into(text, false, &mut buffer);
    buffer
}

pub fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag,
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}
