//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only unlinks it, so any `NodeId`
//! handed out stays resolvable and reflects the node's detached state.

use crate::{DomError, InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes ever allocated, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned name
    pub fn resolve(&self, s: InternedString) -> &str {
        self.interner.get(s)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element; HTML tag names are stored lowercase
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name.to_string()))
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn element_data_mut(&mut self, id: NodeId) -> Result<&mut crate::ElementData, DomError> {
        self.get_mut(id)
            .ok_or(DomError::NodeNotFound(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if matches!(parent_node.data, NodeData::Text(_) | NodeData::Comment(_) | NodeData::Doctype { .. }) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent; the subtree below it stays intact
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Detach every child of `id`, returning them in order
    pub fn remove_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.child_ids(id);
        for &child in &children {
            self.detach(child);
        }
        children
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        let mut current = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        std::iter::from_fn(move || {
            let node = self.get(current)?;
            let id = current;
            current = node.next_sibling;
            Some((id, node))
        })
    }

    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Pre-order walk of the subtree below `id` (excluding `id` itself)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants { tree: self, root: id, next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE) }
    }

    /// Walk from the parent of `id` up to the outermost ancestor
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        let mut current = self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE);
        std::iter::from_fn(move || {
            let node = self.get(current)?;
            let id = current;
            current = node.parent;
            Some(id)
        })
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| self.resolve(e.name))
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Attribute (name, value) pairs in source order
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| e.attrs.iter().map(|a| (self.resolve(a.name), a.value.as_str())).collect())
            .unwrap_or_default()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let name = self.interner.intern(name);
        self.element_data_mut(id)?.set_attr(name, value.to_string());
        Ok(())
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let Some(name) = self.interner.lookup(name) else {
            self.element_data_mut(id)?;
            return Ok(false);
        };
        Ok(self.element_data_mut(id)?.remove_attr(name).is_some())
    }

    /// Toggle a boolean attribute, returning whether it is now present
    pub fn toggle_attribute(&mut self, id: NodeId, name: &str, force: Option<bool>) -> Result<bool, DomError> {
        let present = self.has_attribute(id, name);
        let want = force.unwrap_or(!present);
        if want && !present {
            self.set_attribute(id, name, "")?;
        } else if !want && present {
            self.remove_attribute(id, name)?;
        } else {
            self.element_data_mut(id)?;
        }
        Ok(want)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order subtree iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else { break NodeId::NONE };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        let span = tree.create_element("span");
        let text = tree.create_text("hi");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        tree.append_child(span, text).unwrap();
        (tree, div, span, text)
    }

    #[test]
    fn test_append_and_children() {
        let (tree, div, span, _) = sample();
        assert_eq!(tree.tag_name(div), Some("div"));
        assert_eq!(tree.child_ids(div), vec![span]);
        assert_eq!(tree.text_content(div), "hi");
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut tree, div, span, text) = sample();
        let p = tree.create_element("p");
        tree.append_child(div, p).unwrap();

        let order: Vec<_> = tree.descendants(div).collect();
        assert_eq!(order, vec![span, text, p]);
        assert_eq!(tree.descendants(text).count(), 0);
    }

    #[test]
    fn test_detach_keeps_node_readable() {
        let (mut tree, div, span, _) = sample();
        tree.set_attribute(span, "id", "inner").unwrap();
        tree.detach(span);

        assert!(!tree.is_connected(span));
        assert!(tree.is_connected(div));
        assert_eq!(tree.get_attribute(span, "id"), Some("inner"));
        assert!(tree.child_ids(div).is_empty());
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut tree, div, span, _) = sample();
        assert!(matches!(
            tree.append_child(span, div),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_text_cannot_have_children() {
        let (mut tree, _, _, text) = sample();
        let other = tree.create_element("b");
        assert!(tree.append_child(text, other).is_err());
    }

    #[test]
    fn test_toggle_attribute() {
        let (mut tree, div, _, text) = sample();
        assert!(tree.toggle_attribute(div, "hidden", None).unwrap());
        assert!(tree.has_attribute(div, "hidden"));
        assert!(!tree.toggle_attribute(div, "hidden", None).unwrap());
        assert!(!tree.has_attribute(div, "hidden"));
        assert!(tree.toggle_attribute(div, "hidden", Some(true)).unwrap());
        assert!(tree.toggle_attribute(div, "hidden", Some(true)).unwrap());
        assert!(matches!(tree.toggle_attribute(text, "x", None), Err(DomError::NotAnElement(_))));
    }

    #[test]
    fn test_remove_children() {
        let (mut tree, div, span, _) = sample();
        let removed = tree.remove_children(div);
        assert_eq!(removed, vec![span]);
        assert!(tree.get(span).unwrap().parent == NodeId::NONE);
    }
}
