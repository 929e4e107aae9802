//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts the result into the fOS arena tree.

use fos_dom::{Document, DomError, DomTree, NodeId};
use html5ever::{ns, parse_document, parse_fragment, LocalName, ParseOpts, QualName};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse `html` in the context of `parent` and append the resulting nodes.
    ///
    /// The parent's tag name picks the tree-builder insertion mode and the
    /// tokenizer state, so `<td>` markup inside a `<tr>` keeps its cells and
    /// `<script>`/`<style>` content stays raw text. Malformed input is
    /// repaired (or dropped) exactly as a browser would.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let node = tree.get(parent).ok_or(DomError::NodeNotFound(parent))?;
        let context = if node.is_element() { tree.tag_name(parent).unwrap_or("body") } else { "body" };
        let context = QualName::new(None, ns!(html), LocalName::from(context));

        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), true)
            .one(html);

        // The fragment lands under a synthetic <html> root
        let Some(root) = dom.document.children.borrow().first().cloned() else {
            return Ok(Vec::new());
        };

        let before = tree.child_ids(parent).len();
        for child in root.children.borrow().iter() {
            self.convert_node(child, tree, parent);
        }
        let added = tree.child_ids(parent).split_off(before);

        tracing::debug!("Parsed fragment into {:?}: {} top-level nodes", parent, added.len());
        Ok(added)
    }

    /// Convert an RcDom node and append it under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        let id = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
                return;
            }
            RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
            RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    // Freshly created element: attribute writes cannot fail.
                    let _ = tree.set_attribute(id, &attr.name.local, &attr.value);
                }
                id
            }
            RcNodeData::ProcessingInstruction { .. } => return,
        };

        if let Err(e) = tree.append_child(parent, id) {
            tracing::debug!("Dropping parsed node: {}", e);
            return;
        }

        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, id);
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// `element.innerHTML = html`: drop the current children, parse the new ones
pub fn set_inner_html(tree: &mut DomTree, element: NodeId, html: &str) -> Result<(), DomError> {
    if !tree.get(element).ok_or(DomError::NodeNotFound(element))?.is_element() {
        return Err(DomError::NotAnElement(element));
    }
    tree.remove_children(element);
    HtmlParser::new().parse_fragment_into(tree, element, html)?;
    Ok(())
}
