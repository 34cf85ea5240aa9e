//! Addressing and lookup within a tree.
//!
//! A [`NodePath`] is the list of child indices from a root to a node. It is
//! how the live tree refers to nodes in mutation records without holding
//! references into the tree.

use crate::node::{Element, Node};

pub type NodePath = Vec<usize>;

impl Node {
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let mut current = self;
        for &index in path {
            current = current.as_element()?.children.get(index)?;
        }
        Some(current)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current = self;
        for &index in path {
            current = current.as_element_mut()?.children.get_mut(index)?;
        }
        Some(current)
    }
}

impl Element {
    /// Node at `path` relative to this element. The empty path has no node
    /// because the element itself is not wrapped in one.
    pub fn descendant_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        self.children.get(*first)?.node_at(rest)
    }

    pub fn descendant_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        self.children.get_mut(*first)?.node_at_mut(rest)
    }

    /// Element at `path`; the empty path is the element itself
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        if path.is_empty() {
            return Some(self);
        }
        self.descendant_at(path)?.as_element()
    }

    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        if path.is_empty() {
            return Some(self);
        }
        self.descendant_at_mut(path)?.as_element_mut()
    }

    /// Self or first descendant carrying `name="value"`
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&Element> {
        if self.attr(name) == Some(value) {
            return Some(self);
        }
        self.element_children()
            .find_map(|child| child.find_by_attr(name, value))
    }

    pub fn find_by_attr_mut(&mut self, name: &str, value: &str) -> Option<&mut Element> {
        if self.attr(name) == Some(value) {
            return Some(self);
        }
        self.element_children_mut()
            .find_map(|child| child.find_by_attr_mut(name, value))
    }

    /// Path of self or the first descendant matching `predicate`
    pub fn path_to(&self, predicate: &impl Fn(&Element) -> bool) -> Option<NodePath> {
        let mut path = Vec::new();
        if predicate(self) {
            return Some(path);
        }
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            if find_path_inner(child, predicate, &mut path) {
                return Some(path);
            }
            path.pop();
        }
        None
    }

    /// First descendant element (not self) matching `predicate`
    pub fn find(&self, predicate: &impl Fn(&Element) -> bool) -> Option<&Element> {
        self.element_children().find_map(|child| {
            if predicate(child) {
                Some(child)
            } else {
                child.find(predicate)
            }
        })
    }

    /// Every descendant element (not self) matching `predicate`
    pub fn find_all<'a>(&'a self, predicate: &impl Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        find_all_inner(self, predicate, &mut found);
        found
    }
}

fn find_path_inner(node: &Node, predicate: &impl Fn(&Element) -> bool, path: &mut NodePath) -> bool {
    let Node::Element(element) = node else {
        return false;
    };
    if predicate(element) {
        return true;
    }
    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        if find_path_inner(child, predicate, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn find_all_inner<'a>(
    element: &'a Element,
    predicate: &impl Fn(&Element) -> bool,
    found: &mut Vec<&'a Element>,
) {
    for child in element.element_children() {
        if predicate(child) {
            found.push(child);
        }
        find_all_inner(child, predicate, found);
    }
}
