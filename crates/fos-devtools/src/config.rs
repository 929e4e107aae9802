//! DevTools Configuration

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::inspector::Tab;
use crate::DevToolsError;

/// Overlay configuration options
#[derive(Debug, Clone)]
pub struct DevToolsConfig {
    /// Dock the panel to the right edge instead of floating it
    pub side_mode: bool,

    /// Tab shown when the panel first opens
    pub initial_tab: Tab,

    /// Panel width (CSS pixels)
    pub panel_width: u32,

    /// Outline and highlight colour
    pub accent_color: String,

    /// Fixed namespace for injected ids and attributes; random when `None`
    pub namespace: Option<String>,
}

impl Default for DevToolsConfig {
    fn default() -> Self {
        Self {
            side_mode: false,
            initial_tab: Tab::Display,
            panel_width: 360,
            accent_color: "#3b82f6".to_string(),
            namespace: None,
        }
    }
}

impl DevToolsConfig {
    /// The namespace to use for this session, always lower-case since the
    /// HTML parser lower-cases attribute names.
    ///
    /// A pinned namespace must be a letter followed by `[a-z0-9-]`, so it is
    /// valid inside attribute names, ids and CSS selectors.
    pub fn resolve_namespace(&self) -> Result<String, DevToolsError> {
        match &self.namespace {
            Some(ns) if !ns.trim().is_empty() => {
                let ns = ns.trim().to_ascii_lowercase();
                if is_valid_namespace(&ns) {
                    Ok(ns)
                } else {
                    Err(DevToolsError::InvalidNamespace(ns))
                }
            }
            _ => Ok(generate_namespace()),
        }
    }
}

fn is_valid_namespace(ns: &str) -> bool {
    ns.starts_with(|c: char| c.is_ascii_lowercase())
        && ns.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Generate a random per-session namespace such as `fos-k3v9x0qa`
pub fn generate_namespace() -> String {
    let rng = rand::thread_rng();
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("fos-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_namespace_shape() {
        let ns = generate_namespace();
        assert_eq!(ns.len(), 12);
        assert!(ns.starts_with("fos-"));
        assert!(ns[4..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_pinned_namespace_lowercased() {
        let config = DevToolsConfig {
            namespace: Some(" DevPanel ".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_namespace().unwrap(), "devpanel");
    }

    #[test]
    fn test_blank_namespace_is_generated() {
        let config = DevToolsConfig {
            namespace: Some("  ".into()),
            ..Default::default()
        };
        assert!(config.resolve_namespace().unwrap().starts_with("fos-"));
    }

    #[test]
    fn test_pinned_namespace_rejects_unsafe_characters() {
        for bad in ["dev panel", "a\"b", "ns>", "9lives", "-dash", "café"] {
            let config = DevToolsConfig {
                namespace: Some(bad.into()),
                ..Default::default()
            };
            assert!(
                matches!(config.resolve_namespace(), Err(DevToolsError::InvalidNamespace(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn test_generated_namespace_is_valid() {
        assert!(is_valid_namespace(&generate_namespace()));
    }
}
