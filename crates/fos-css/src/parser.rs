//! CSS Parser using lightningcss
//!
//! Parses inline declaration blocks (`style="..."`) and checks whole
//! stylesheets.

use crate::{CssError, Declaration};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::Property;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

/// CSS Parser
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a declaration list such as the value of a `style` attribute
    pub fn parse_declarations(&self, css: &str) -> Result<Vec<Declaration>, CssError> {
        let block = DeclarationBlock::parse_string(css, ParserOptions::default())
            .map_err(|e| CssError::ParseError {
                line: 0,
                message: format!("{:?}", e),
            })?;

        let mut result = Vec::with_capacity(block.declarations.len() + block.important_declarations.len());
        for decl in block.declarations.iter() {
            result.push(self.convert_declaration(decl, false)?);
        }
        for decl in block.important_declarations.iter() {
            result.push(self.convert_declaration(decl, true)?);
        }
        Ok(result)
    }

    /// Parse a stylesheet and return how many top-level rules it holds
    pub fn rule_count(&self, css: &str) -> Result<usize, CssError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| CssError::ParseError {
                line: e.loc.as_ref().map(|l| l.line + 1).unwrap_or(0),
                message: e.kind.to_string(),
            })?;
        Ok(stylesheet.rules.0.len())
    }

    fn convert_declaration(&self, decl: &Property, important: bool) -> Result<Declaration, CssError> {
        let property = decl.property_id().name().to_string();
        let value = decl
            .value_to_css_string(PrinterOptions::default())
            .map_err(|e| CssError::PrintError(e.to_string()))?;
        Ok(Declaration { property, value, important })
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}
