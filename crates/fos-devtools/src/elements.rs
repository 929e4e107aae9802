//! Elements panel data
//!
//! A read-only copy of what the display tab shows for one element.

use fos_css::StyleResolver;
use fos_dom::serialize::HtmlSerializer;
use fos_dom::{Document, NodeId};

/// Element snapshot taken at render time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub node: NodeId,
    /// Upper-case tag name, as `nodeName` reports it
    pub node_name: String,
    pub id: String,
    pub class_name: String,
    pub inner_html: String,
    /// Resolved style, sorted by property name
    pub computed_style: Vec<(String, String)>,
    pub connected: bool,
}

impl ElementSnapshot {
    /// Capture an element. `hidden` nodes are left out of the inner HTML.
    ///
    /// Returns `None` for nodes that are not elements.
    pub fn capture(
        doc: &Document,
        resolver: &StyleResolver,
        node: NodeId,
        hidden: &[NodeId],
    ) -> Option<Self> {
        doc.tree().tag_name(node)?;

        let computed_style = resolver
            .compute_style(doc.tree(), node)
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Some(Self {
            node,
            node_name: doc.node_name(node),
            id: doc.element_id(node).to_string(),
            class_name: doc.class_name(node).to_string(),
            inner_html: HtmlSerializer::new(doc.tree()).skipping(hidden).inner_html(node),
            computed_style,
            connected: doc.tree().is_connected(node),
        })
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.computed_style.iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_element() {
        let doc = fos_html::parse(r#"<div id="foo" class="a b" style="width: 4px"><i>x</i></div>"#);
        let div = doc.get_element_by_id("foo").unwrap();

        let snap = ElementSnapshot::capture(&doc, &StyleResolver::new(), div, &[]).unwrap();
        assert_eq!(snap.node_name, "DIV");
        assert_eq!(snap.id, "foo");
        assert_eq!(snap.class_name, "a b");
        assert_eq!(snap.inner_html, "<i>x</i>");
        assert_eq!(snap.style("width"), Some("4px"));
        assert_eq!(snap.style("display"), Some("block"));
        assert!(snap.connected);
    }

    #[test]
    fn test_hidden_nodes_skipped() {
        let doc = fos_html::parse(r#"<p id="keep">a</p><div id="skip">b</div>"#);
        let skip = doc.get_element_by_id("skip").unwrap();

        let snap = ElementSnapshot::capture(&doc, &StyleResolver::new(), doc.body(), &[skip]).unwrap();
        assert_eq!(snap.inner_html, "<p id=\"keep\">a</p>");
    }

    #[test]
    fn test_text_node_not_captured() {
        let doc = fos_html::parse("<p>text</p>");
        let p = doc.tree().child_ids(doc.body())[0];
        let text = doc.tree().child_ids(p)[0];
        assert!(ElementSnapshot::capture(&doc, &StyleResolver::new(), text, &[]).is_none());
    }
}
