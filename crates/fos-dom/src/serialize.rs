//! HTML serialization
//!
//! `innerHTML` / `outerHTML` getters following the HTML fragment
//! serialization rules: void elements have no end tag, raw-text elements are
//! written verbatim, everything else is escaped.

use crate::{DomTree, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serializer over a tree, optionally skipping some subtrees
pub struct HtmlSerializer<'a> {
    tree: &'a DomTree,
    skip: &'a [NodeId],
}

impl<'a> HtmlSerializer<'a> {
    pub fn new(tree: &'a DomTree) -> Self {
        Self { tree, skip: &[] }
    }

    /// Leave these nodes (and their subtrees) out of the output
    pub fn skipping(mut self, nodes: &'a [NodeId]) -> Self {
        self.skip = nodes;
        self
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tree.tag_name(id).is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
        for (child, _) in self.tree.children(id) {
            self.write_node(&mut out, child, raw);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, false);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, parent_is_raw: bool) {
        if self.skip.contains(&id) {
            return;
        }
        let Some(node) = self.tree.get(id) else { return };

        match &node.data {
            NodeData::Element(elem) => {
                let tag = self.tree.resolve(elem.name);
                out.push('<');
                out.push_str(tag);
                for attr in &elem.attrs {
                    out.push(' ');
                    out.push_str(self.tree.resolve(attr.name));
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(&attr.value));
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                out.push_str(&self.inner_html(id));
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeData::Text(text) => {
                if parent_is_raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Doctype { name } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Document => {
                for (child, _) in self.tree.children(id) {
                    self.write_node(out, child, false);
                }
            }
        }
    }
}

/// Convenience: `element.innerHTML`
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    HtmlSerializer::new(tree).inner_html(id)
}

/// Convenience: `element.outerHTML`
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    HtmlSerializer::new(tree).outer_html(id)
}

/// Escape text content (`&`, `<`, `>`, NBSP)
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value (`&`, `"`, NBSP)
pub fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}
