//! Edge case tests for fos-html
//!
//! Malformed markup, entities and raw-text content, both for whole documents
//! and for markup assigned through `innerHTML`.

use fos_dom::serialize::inner_html;
use fos_dom::NodeId;
use fos_html::{set_inner_html, Document, HtmlParser};

fn host() -> (Document, NodeId) {
    let mut doc = Document::default();
    let div = doc.tree.create_element("div");
    let body = doc.body();
    doc.tree.append_child(body, div).unwrap();
    (doc, div)
}

fn assign(html: &str) -> String {
    let (mut doc, div) = host();
    set_inner_html(&mut doc.tree, div, html).unwrap();
    inner_html(doc.tree(), div)
}

// ============================================================================
// DOCUMENTS
// ============================================================================

#[test]
fn test_parse_empty_document_has_skeleton() {
    let doc = HtmlParser::new().parse("");
    assert!(doc.document_element().is_valid());
    assert!(doc.head().is_valid());
    assert!(doc.body().is_valid());
}

#[test]
fn test_parse_doctype_kept() {
    let doc = HtmlParser::new().parse("<!DOCTYPE html><p>x</p>");
    let first = doc.tree().child_ids(doc.tree().root())[0];
    assert_eq!(doc.node_name(first), "html");
}

#[test]
fn test_parse_with_url() {
    let doc = HtmlParser::new().parse_with_url("<title>T</title>", "test://page");
    assert_eq!(doc.url(), "test://page");
    assert_eq!(doc.title(), "T");
}

#[test]
fn test_get_element_by_id_after_parse() {
    let doc = fos_html::parse(r#"<div id="main"><span id="inner">hi</span></div>"#);
    let inner = doc.get_element_by_id("inner").unwrap();
    assert_eq!(doc.tree().tag_name(inner), Some("span"));
    assert_eq!(doc.tree().text_content(inner), "hi");
}

// ============================================================================
// MALFORMED FRAGMENTS
// ============================================================================

#[test]
fn test_unclosed_tags_are_closed() {
    assert_eq!(assign("<p><span>text"), "<p><span>text</span></p>");
}

#[test]
fn test_stray_closing_tags_dropped() {
    assert_eq!(assign("</div>ok</span>"), "ok");
}

#[test]
fn test_mismatched_tags_repaired() {
    assert_eq!(assign("<b><i>x</b></i>"), "<b><i>x</i></b>");
}

#[test]
fn test_uppercase_tags_lowercased() {
    assert_eq!(assign("<DIV CLASS=\"a\">x</DIV>"), "<div class=\"a\">x</div>");
}

#[test]
fn test_unquoted_attributes() {
    assert_eq!(assign("<a href=x id=y>l</a>"), "<a href=\"x\" id=\"y\">l</a>");
}

// ============================================================================
// ENTITIES & ESCAPING
// ============================================================================

#[test]
fn test_named_entities_decoded_then_reescaped() {
    let (mut doc, div) = host();
    set_inner_html(&mut doc.tree, div, "&lt;b&gt; &amp; &copy;").unwrap();
    assert_eq!(doc.tree().text_content(div), "<b> & \u{a9}");
    assert_eq!(inner_html(doc.tree(), div), "&lt;b&gt; &amp; \u{a9}");
}

#[test]
fn test_attribute_entities_round_trip() {
    let html = r#"<span title="a &quot;b&quot; &amp; c">x</span>"#;
    assert_eq!(assign(html), html);
}

#[test]
fn test_bare_ampersand_escaped_on_output() {
    assert_eq!(assign("fish & chips"), "fish &amp; chips");
}

// ============================================================================
// SPECIAL CONTENT
// ============================================================================

#[test]
fn test_script_content_not_escaped() {
    let html = "<script>if (a < b && c) {}</script>";
    assert_eq!(assign(html), html);
}

#[test]
fn test_textarea_content_is_text() {
    let (mut doc, div) = host();
    set_inner_html(&mut doc.tree, div, "<textarea><div>x</div></textarea>").unwrap();
    let textarea = doc.tree().child_ids(div)[0];
    assert_eq!(doc.tree().child_ids(textarea).len(), 1);
    assert_eq!(doc.tree().text_content(textarea), "<div>x</div>");
}

#[test]
fn test_void_elements() {
    assert_eq!(assign("a<br>b<img src=\"i.png\">"), "a<br>b<img src=\"i.png\">");
}

#[test]
fn test_comments_preserved() {
    assert_eq!(assign("<!-- note -->x"), "<!-- note -->x");
}

#[test]
fn test_empty_assignment_clears() {
    let (mut doc, div) = host();
    set_inner_html(&mut doc.tree, div, "<i>x</i>").unwrap();
    set_inner_html(&mut doc.tree, div, "").unwrap();
    assert!(doc.tree().child_ids(div).is_empty());
}

#[test]
fn test_many_siblings() {
    let html: String = (0..200).map(|i| format!("<li>{}</li>", i)).collect();
    let (mut doc, div) = host();
    set_inner_html(&mut doc.tree, div, &format!("<ul>{}</ul>", html)).unwrap();
    let ul = doc.tree().child_ids(div)[0];
    assert_eq!(doc.tree().child_ids(ul).len(), 200);
}

#[test]
fn test_nested_assignment_detaches_old_subtree() {
    let (mut doc, div) = host();
    set_inner_html(&mut doc.tree, div, "<section id=\"old\"><p>a</p></section>").unwrap();
    let old = doc.get_element_by_id("old").unwrap();

    set_inner_html(&mut doc.tree, div, "<section id=\"new\"></section>").unwrap();

    assert!(!doc.tree().is_connected(old));
    assert_eq!(doc.get_element_by_id("old"), None);
    assert!(doc.get_element_by_id("new").is_some());
}
