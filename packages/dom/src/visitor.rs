use crate::node::{Element, Node};

/// Mutable visitor for transforming trees in place
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_text_mut(&mut self, _content: &mut String) {
        // Leaf node, no children to walk
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Element(element) => visitor.visit_element_mut(element),
        Node::Text { content } => visitor.visit_text_mut(content),
        Node::Comment { .. } => {}
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    for child in &mut element.children {
        visitor.visit_node_mut(child);
    }
}
