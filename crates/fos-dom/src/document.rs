//! Document - High-level document API

use crate::{DomError, DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the document node cannot fail to link.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create a document with no structure, to be filled by a parser
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate <html>, <head> and <body> after the tree was built
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        self.html_element = tree.children(tree.root())
            .find(|(id, _)| tree.tag_name(*id) == Some("html"))
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE);

        let find_child = |tag: &str| {
            tree.children(self.html_element)
                .find(|(id, _)| tree.tag_name(*id) == Some(tag))
                .map(|(id, _)| id)
                .unwrap_or(NodeId::NONE)
        };
        self.head_element = find_child("head");
        self.body_element = find_child("body");

        tracing::debug!(
            "Document {} finalized: html={:?} head={:?} body={:?}",
            self.url, self.html_element, self.head_element, self.body_element
        );
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree.children(self.head_element)
            .find(|(id, _)| self.tree.tag_name(*id) == Some("title"))
            .map(|(id, _)| self.tree.text_content(id))
            .unwrap_or_default()
    }

    /// The root <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get the first connected element with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// `element.id`
    pub fn element_id(&self, node: NodeId) -> &str {
        self.tree.get_attribute(node, "id").unwrap_or("")
    }

    /// `element.id = value`
    pub fn set_element_id(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.tree.set_attribute(node, "id", value)
    }

    /// `element.className`
    pub fn class_name(&self, node: NodeId) -> &str {
        self.tree.get_attribute(node, "class").unwrap_or("")
    }

    /// `element.className = value`
    pub fn set_class_name(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.tree.set_attribute(node, "class", value)
    }

    /// `element.nodeName`: uppercase tag for elements, `#text` etc. otherwise
    pub fn node_name(&self, node: NodeId) -> String {
        use crate::NodeData;
        match self.tree.get(node).map(|n| &n.data) {
            Some(NodeData::Element(e)) => self.tree.resolve(e.name).to_ascii_uppercase(),
            Some(NodeData::Text(_)) => "#text".to_string(),
            Some(NodeData::Comment(_)) => "#comment".to_string(),
            Some(NodeData::Document) => "#document".to_string(),
            Some(NodeData::Doctype { name }) => name.clone(),
            None => String::new(),
        }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("test://page");
        assert_eq!(doc.tree().tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tree().tag_name(doc.head()), Some("head"));
        assert_eq!(doc.tree().tag_name(doc.body()), Some("body"));
        assert_eq!(doc.url(), "test://page");
    }

    #[test]
    fn test_id_and_class_accessors() {
        let mut doc = Document::default();
        let div = doc.tree.create_element("div");
        doc.tree.append_child(doc.body(), div).unwrap();

        assert_eq!(doc.element_id(div), "");
        doc.set_element_id(div, "foo").unwrap();
        doc.set_class_name(div, "a b").unwrap();

        assert_eq!(doc.get_element_by_id("foo"), Some(div));
        assert_eq!(doc.class_name(div), "a b");
        assert_eq!(doc.node_name(div), "DIV");
    }

    #[test]
    fn test_detached_not_found_by_id() {
        let mut doc = Document::default();
        let div = doc.tree.create_element("div");
        doc.set_element_id(div, "loose").unwrap();
        assert_eq!(doc.get_element_by_id("loose"), None);
    }

    #[test]
    fn test_finalize_empty() {
        let mut doc = Document::empty("about:blank");
        doc.finalize();
        assert!(!doc.body().is_valid());
        assert_eq!(doc.title(), "");
    }
}
