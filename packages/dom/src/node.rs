use serde::{Deserialize, Serialize};

/// Tree node of a block fragment.
///
/// Trees are plain owned values: cloning a node deep-copies the whole
/// subtree, so two trees never share nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// HTML element
    Element(Element),

    /// Text node
    Text { content: String },

    /// Comment node
    Comment { content: String },
}

/// HTML element with ordered, unique attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

/// Attribute map.
///
/// Keys are unique. Insertion order is kept so serialization is
/// deterministic, but equality ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Set a value, replacing in place if the key already exists
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(key, _)| key == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Attributes {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.set(k, v);
        }
        attributes
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.set(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().any(|c| c == class)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Child elements, skipping text and comments
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn element_child_count(&self) -> usize {
        self.element_children().count()
    }

    /// The only meaningful child of this element, ignoring comments and
    /// whitespace-only text.
    pub fn sole_child(&self) -> Option<&Node> {
        self.children.get(self.sole_child_index()?)
    }

    /// Index of [`Element::sole_child`]
    pub fn sole_child_index(&self) -> Option<usize> {
        let mut meaningful = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| match child {
                Node::Element(_) => true,
                Node::Text { content } => !content.trim().is_empty(),
                Node::Comment { .. } => false,
            })
            .map(|(index, _)| index);
        let first = meaningful.next()?;
        match meaningful.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(Node::text(content))
    }

    /// Replace all children with a single text node (empty text clears)
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.children.clear();
        if !content.is_empty() {
            self.children.push(Node::text(content));
        }
    }
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}
