//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever: whole documents, and fragments
//! parsed straight into an existing element (`innerHTML` assignment).

mod parser;

pub use fos_dom::Document;
pub use parser::{set_inner_html, HtmlParser};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
