//! Comprehensive tests for fos-css
//!
//! Computed styles over parsed documents.

use fos_css::{parse_declarations, StyleResolver};
use fos_html::HtmlParser;

#[test]
fn test_parse_custom_property() {
    let decls = parse_declarations("--accent: 4px").unwrap();
    assert_eq!(decls.len(), 1);
    assert!(decls[0].property.ends_with("accent"));
}

#[test]
fn test_malformed_inline_style_ignored() {
    let doc = HtmlParser::new().parse(r#"<div id="d" style="width 10px;;; {">x</div>"#);
    let div = doc.get_element_by_id("d").unwrap();
    let style = StyleResolver::new().compute_style(doc.tree(), div);
    assert_eq!(style.get("display"), Some("block"));
}

#[test]
fn test_heading_defaults() {
    let doc = HtmlParser::new().parse(r#"<h1 id="t">Title</h1>"#);
    let h1 = doc.get_element_by_id("t").unwrap();
    let style = StyleResolver::new().compute_style(doc.tree(), h1);
    assert_eq!(style.get("font-weight"), Some("700"));
    assert_eq!(style.get("font-size"), Some("32px"));
}

#[test]
fn test_inherited_through_document() {
    let doc = HtmlParser::new().parse(
        r#"<div style="visibility: hidden"><p><span id="s">x</span></p></div>"#,
    );
    let span = doc.get_element_by_id("s").unwrap();
    let style = StyleResolver::new().compute_style(doc.tree(), span);
    assert_eq!(style.get("visibility"), Some("hidden"));
    assert_eq!(style.get("display"), Some("inline"));
}

#[test]
fn test_head_elements_not_displayed() {
    let doc = HtmlParser::new().parse("<title>t</title>");
    let style = StyleResolver::new().compute_style(doc.tree(), doc.head());
    assert_eq!(style.get("display"), Some("none"));
}

#[test]
fn test_style_is_sorted() {
    let doc = HtmlParser::new().parse(r#"<p id="p">x</p>"#);
    let p = doc.get_element_by_id("p").unwrap();
    let style = StyleResolver::new().compute_style(doc.tree(), p);
    let names: Vec<&str> = style.iter().map(|(k, _)| k).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(style.len() > 10);
}
