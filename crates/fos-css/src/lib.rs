//! fOS CSS Style System
//!
//! Inline declaration parsing (lightningcss) and computed-style resolution.

mod parser;
mod cascade;

pub use parser::CssParser;
pub use cascade::StyleResolver;

use std::collections::BTreeMap;

/// Parse a declaration list such as `color: red; width: 10px`
pub fn parse_declarations(css: &str) -> Result<Vec<Declaration>, CssError> {
    CssParser::new().parse_declarations(css)
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Resolved style of one element, ordered by property name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn set(&mut self, property: &str, value: &str) {
        self.properties.insert(property.to_string(), value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// CSS error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },

    #[error("Cannot serialize value: {0}")]
    PrintError(String),
}
