//! Panel painting
//!
//! Turns a [`View`] into markup for the panel element, and produces the
//! overlay stylesheet. Every class, id and data attribute carries the
//! session namespace so nothing collides with the host page.

use std::fmt::Write;

use fos_dom::serialize::{escape_attribute, escape_text};

use crate::config::DevToolsConfig;
use crate::view::{format_timestamp, View};

/// Namespaced HTML painter
#[derive(Debug, Clone)]
pub struct Painter {
    ns: String,
}

impl Painter {
    pub fn new(namespace: &str) -> Self {
        Self { ns: namespace.to_string() }
    }

    pub fn namespace(&self) -> &str {
        &self.ns
    }

    /// Attribute carrying a special-action tag
    pub fn action_attr(&self) -> String {
        format!("data-{}-action", self.ns)
    }

    /// Attribute naming the edit field of an input
    pub fn field_attr(&self) -> String {
        format!("data-{}-field", self.ns)
    }

    /// Marker on the document element while inspecting
    pub fn inspect_attr(&self) -> String {
        format!("data-{}-inspect", self.ns)
    }

    /// Marker on `<body>` while docked to the side
    pub fn side_attr(&self) -> String {
        format!("data-{}-side", self.ns)
    }

    pub fn panel_id(&self) -> String {
        format!("{}-panel", self.ns)
    }

    pub fn style_id(&self) -> String {
        format!("{}-style", self.ns)
    }

    pub fn paint(&self, view: &View) -> String {
        let mut out = String::new();
        self.paint_into(&mut out, view);
        out
    }

    fn paint_into(&self, out: &mut String, view: &View) {
        let ns = &self.ns;
        match view {
            View::Empty => {}
            View::Container { class, children } => {
                let _ = write!(out, "<div class=\"{}-{}\">", ns, class);
                for child in children {
                    self.paint_into(out, child);
                }
                out.push_str("</div>");
            }
            View::Heading(text) => {
                let _ = write!(out, "<h4>{}</h4>", escape_text(text));
            }
            View::Text(text) => {
                let _ = write!(out, "<p>{}</p>", escape_text(text));
            }
            View::Field { label, field, value, multiline } => {
                let _ = write!(out, "<label class=\"{}-field\">{} ", ns, escape_text(label));
                if *multiline {
                    let _ = write!(out, "<textarea {}=\"{}\">", self.field_attr(), field.as_str());
                    // The parser drops one leading newline inside <textarea>
                    if value.starts_with('\n') {
                        out.push('\n');
                    }
                    let _ = write!(out, "{}</textarea>", escape_text(value));
                } else {
                    let _ = write!(
                        out,
                        "<input {}=\"{}\" value=\"{}\">",
                        self.field_attr(),
                        field.as_str(),
                        escape_attribute(value)
                    );
                }
                out.push_str("</label>");
            }
            View::Button { label, action, pressed } => {
                let _ = write!(out, "<button {}=\"{}\"", self.action_attr(), escape_attribute(&action.tag()));
                if *pressed {
                    let _ = write!(out, " class=\"{}-pressed\"", ns);
                }
                let _ = write!(out, ">{}</button>", escape_text(label));
            }
            View::LogLine { timestamp, level, text } => {
                let _ = write!(
                    out,
                    "<div class=\"{ns}-entry {ns}-{}\"><span class=\"{ns}-time\">{}</span> {}</div>",
                    level.as_str(),
                    format_timestamp(*timestamp),
                    escape_text(text),
                );
            }
            View::Table(rows) => {
                let _ = write!(out, "<dl class=\"{}-table\">", ns);
                for (key, value) in rows {
                    let _ = write!(out, "<dt>{}</dt><dd>{}</dd>", escape_text(key), escape_text(value));
                }
                out.push_str("</dl>");
            }
        }
    }

    /// The overlay stylesheet injected into `<head>`
    pub fn stylesheet(&self, config: &DevToolsConfig) -> String {
        let ns = &self.ns;
        let accent = &config.accent_color;
        let width = config.panel_width;
        format!(
            "[data-{ns}-inspect] body *:hover {{ outline: 1px solid {accent}; cursor: crosshair; }}\n\
             #{ns}-panel {{ position: fixed; z-index: 2147483647; width: {width}px; max-height: 60vh; \
             overflow: auto; background: #fff; color: #111; border: 1px solid {accent}; \
             font: 12px monospace; box-sizing: border-box; }}\n\
             #{ns}-panel[hidden] {{ display: none; }}\n\
             #{ns}-panel:hover {{ outline: none; }}\n\
             [data-{ns}-side] {{ padding-right: {width}px; }}\n\
             [data-{ns}-side] #{ns}-panel {{ top: 0 !important; left: auto !important; right: 0; \
             height: 100vh; max-height: none; }}\n\
             .{ns}-tabs {{ display: flex; gap: 2px; }}\n\
             .{ns}-pressed {{ background: {accent}; color: #fff; }}\n\
             .{ns}-field {{ display: block; }}\n\
             .{ns}-field textarea {{ width: 100%; min-height: 4em; }}\n\
             .{ns}-time {{ color: #888; }}\n\
             .{ns}-warn {{ color: #a15c00; }}\n\
             .{ns}-error {{ color: #c00; }}\n"
        )
    }
}
