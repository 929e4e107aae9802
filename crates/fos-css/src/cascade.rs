//! Style Cascade & Resolver
//!
//! Computes the resolved style of an element from:
//! 1. User-agent defaults for its tag
//! 2. Inherited properties of its parent
//! 3. Its inline `style` attribute (normal, then `!important`)

use crate::{ComputedStyle, CssParser};
use fos_dom::{DomTree, NodeId};

/// Properties that inherit from the parent element
const INHERITED: &[(&str, &str)] = &[
    ("color", "rgb(0, 0, 0)"),
    ("cursor", "auto"),
    ("font-family", "serif"),
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "400"),
    ("line-height", "normal"),
    ("text-align", "start"),
    ("visibility", "visible"),
    ("white-space", "normal"),
];

/// Properties reset on every element
const RESET: &[(&str, &str)] = &[
    ("background-color", "rgba(0, 0, 0, 0)"),
    ("border", "0px none rgb(0, 0, 0)"),
    ("box-sizing", "content-box"),
    ("height", "auto"),
    ("margin", "0px"),
    ("opacity", "1"),
    ("overflow", "visible"),
    ("padding", "0px"),
    ("position", "static"),
    ("width", "auto"),
    ("z-index", "auto"),
];

const BLOCK_TAGS: &[&str] = &[
    "html", "body", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6",
    "ul", "ol", "dl", "dt", "dd", "section", "article", "header", "footer",
    "nav", "main", "aside", "form", "pre", "blockquote", "figure", "hr",
    "address", "fieldset", "details", "summary",
];

const HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "title", "meta", "link", "template", "base",
];

/// Style resolver - computes styles for DOM elements
#[derive(Debug, Default)]
pub struct StyleResolver;

impl StyleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Compute the full resolved style of an element.
    ///
    /// Non-element nodes get an empty style.
    pub fn compute_style(&self, tree: &DomTree, node_id: NodeId) -> ComputedStyle {
        if tree.tag_name(node_id).is_none() {
            return ComputedStyle::default();
        }

        // Outermost element first so inherited values flow downwards
        let mut chain: Vec<NodeId> = tree.ancestors(node_id)
            .filter(|&a| tree.tag_name(a).is_some())
            .collect();
        chain.reverse();
        chain.push(node_id);

        let mut parent: Option<ComputedStyle> = None;
        for id in chain {
            parent = Some(self.compute_one(tree, id, parent.as_ref()));
        }
        parent.unwrap_or_default()
    }

    fn compute_one(&self, tree: &DomTree, node_id: NodeId, parent: Option<&ComputedStyle>) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        let tag = tree.tag_name(node_id).unwrap_or("");

        for &(name, initial) in INHERITED {
            let value = parent.and_then(|p| p.get(name)).unwrap_or(initial);
            style.set(name, value);
        }
        for &(name, initial) in RESET {
            style.set(name, initial);
        }
        style.set("display", default_display(tag));
        apply_tag_defaults(&mut style, tag);

        if tree.has_attribute(node_id, "hidden") {
            style.set("display", "none");
        }

        if let Some(inline) = tree.get_attribute(node_id, "style") {
            match CssParser::new().parse_declarations(inline) {
                // Important declarations come last, so plain order is cascade order
                Ok(decls) => {
                    for decl in decls {
                        style.set(&decl.property, &decl.value);
                    }
                }
                Err(e) => tracing::debug!("Ignoring inline style on {:?}: {}", node_id, e),
            }
        }

        style
    }
}

fn default_display(tag: &str) -> &'static str {
    match tag {
        "li" => "list-item",
        "table" => "table",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "button" | "input" | "select" | "textarea" => "inline-block",
        t if BLOCK_TAGS.contains(&t) => "block",
        t if HIDDEN_TAGS.contains(&t) => "none",
        _ => "inline",
    }
}

fn apply_tag_defaults(style: &mut ComputedStyle, tag: &str) {
    match tag {
        "body" => style.set("margin", "8px"),
        "p" => style.set("margin", "16px 0px"),
        "h1" => {
            style.set("font-size", "32px");
            style.set("font-weight", "700");
        }
        "h2" => {
            style.set("font-size", "24px");
            style.set("font-weight", "700");
        }
        "h3" => {
            style.set("font-size", "18.72px");
            style.set("font-weight", "700");
        }
        "b" | "strong" | "th" => style.set("font-weight", "700"),
        "i" | "em" => style.set("font-style", "italic"),
        "a" => {
            style.set("color", "rgb(0, 0, 238)");
            style.set("cursor", "pointer");
        }
        "pre" => {
            style.set("font-family", "monospace");
            style.set("white-space", "pre");
        }
        "code" => style.set("font-family", "monospace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(tag: &str) -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let el = tree.create_element(tag);
        tree.append_child(tree.root(), body).unwrap();
        tree.append_child(body, el).unwrap();
        (tree, body, el)
    }

    #[test]
    fn test_defaults_by_tag() {
        let resolver = StyleResolver::new();
        let (tree, body, span) = tree_with("span");

        assert_eq!(resolver.compute_style(&tree, body).get("display"), Some("block"));
        assert_eq!(resolver.compute_style(&tree, body).get("margin"), Some("8px"));
        assert_eq!(resolver.compute_style(&tree, span).get("display"), Some("inline"));
        assert_eq!(resolver.compute_style(&tree, span).get("position"), Some("static"));
    }

    #[test]
    fn test_inheritance() {
        let resolver = StyleResolver::new();
        let (mut tree, body, span) = tree_with("span");
        tree.set_attribute(body, "style", "font-size: 20px; width: 50px").unwrap();

        let style = resolver.compute_style(&tree, span);
        assert_eq!(style.get("font-size"), Some("20px"));
        assert_eq!(style.get("width"), Some("auto"));
    }

    #[test]
    fn test_inline_and_hidden() {
        let resolver = StyleResolver::new();
        let (mut tree, _, div) = tree_with("div");
        tree.set_attribute(div, "hidden", "").unwrap();
        assert_eq!(resolver.compute_style(&tree, div).get("display"), Some("none"));

        tree.set_attribute(div, "style", "display: flex").unwrap();
        assert_eq!(resolver.compute_style(&tree, div).get("display"), Some("flex"));
    }

    #[test]
    fn test_important_wins_over_later_normal() {
        let resolver = StyleResolver::new();
        let (mut tree, _, div) = tree_with("div");
        tree.set_attribute(div, "style", "width: 3px !important; width: 9px").unwrap();
        assert_eq!(resolver.compute_style(&tree, div).get("width"), Some("3px"));
    }

    #[test]
    fn test_text_node_has_no_style() {
        let resolver = StyleResolver::new();
        let mut tree = DomTree::new();
        let text = tree.create_text("x");
        assert!(resolver.compute_style(&tree, text).is_empty());
    }
}
