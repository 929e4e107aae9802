//! Panel view tree
//!
//! What the panel shows, independent of how it is painted.

use crate::console::LogLevel;
use crate::inspector::{EditField, SpecialAction};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Renders nothing
    Empty,
    Container { class: &'static str, children: Vec<View> },
    Heading(String),
    Text(String),
    /// Editable field bound to an edit action
    Field { label: &'static str, field: EditField, value: String, multiline: bool },
    Button { label: String, action: SpecialAction, pressed: bool },
    LogLine { timestamp: f64, level: LogLevel, text: String },
    /// Read-only key/value dump
    Table(Vec<(String, String)>),
}

impl View {
    pub fn container(class: &'static str, children: Vec<View>) -> Self {
        Self::Container { class, children }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Container { children, .. } => children.iter().all(View::is_empty),
            _ => false,
        }
    }

    /// Plain-text lines, one per leaf, in paint order
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_lines(&mut out);
        out
    }

    fn collect_lines(&self, out: &mut Vec<String>) {
        match self {
            Self::Empty => {}
            Self::Container { children, .. } => {
                for child in children {
                    child.collect_lines(out);
                }
            }
            Self::Heading(s) | Self::Text(s) => out.push(s.clone()),
            Self::Field { label, value, .. } => out.push(format!("{}: {}", label, value)),
            Self::Button { label, .. } => out.push(format!("[{}]", label)),
            Self::LogLine { timestamp, text, .. } => out.push(format!("{} {}", format_timestamp(*timestamp), text)),
            Self::Table(rows) => out.extend(rows.iter().map(|(k, v)| format!("{}: {}", k, v))),
        }
    }

    /// Current value of an editable field, if the view shows it
    pub fn field_value(&self, wanted: EditField) -> Option<&str> {
        match self {
            Self::Field { field, value, .. } if *field == wanted => Some(value),
            Self::Container { children, .. } => children.iter().find_map(|c| c.field_value(wanted)),
            _ => None,
        }
    }

    /// Every action tag reachable from this view
    pub fn actions(&self) -> Vec<SpecialAction> {
        match self {
            Self::Button { action, .. } => vec![*action],
            Self::Container { children, .. } => children.iter().flat_map(View::actions).collect(),
            _ => Vec::new(),
        }
    }
}

/// `12.3ms`
pub fn format_timestamp(ms: f64) -> String {
    format!("{:.1}ms", ms)
}
