//! Storage APIs
//!
//! localStorage / sessionStorage areas and the `document.cookie` jar, as
//! seen by page script and dumped by the storage tab.

use std::collections::BTreeMap;

/// Key-value storage area
#[derive(Debug, Clone, Default)]
pub struct Storage {
    data: BTreeMap<String, String>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get item
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set item
    pub fn set_item(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }

    /// Remove item
    pub fn remove_item(&mut self, key: &str) {
        self.data.remove(key);
    }

    /// Clear all items
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get key at index (keys are kept sorted)
    pub fn key(&self, index: usize) -> Option<&str> {
        self.data.keys().nth(index).map(|s| s.as_str())
    }

    /// Get number of items
    pub fn length(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.data.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// A cookie visible to script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
}

impl Cookie {
    /// Parse a `document.cookie` assignment: `name=value; attr; attr=val`.
    ///
    /// Returns the cookie and whether the attributes expire it immediately.
    pub fn parse(input: &str) -> Option<(Self, bool)> {
        let mut parts = input.split(';');
        let first = parts.next()?.trim();
        let (name, value) = match first.split_once('=') {
            Some((n, v)) => (n.trim(), v.trim()),
            // A bare token is a nameless cookie
            None => ("", first),
        };
        if name.is_empty() && value.is_empty() {
            return None;
        }

        let mut cookie = Cookie {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
        };
        let mut expired = false;

        for part in parts {
            let Some((attr, val)) = part.trim().split_once('=') else {
                continue;
            };
            match attr.trim().to_lowercase().as_str() {
                "path" => cookie.path = val.trim().to_string(),
                "max-age" => {
                    if let Ok(secs) = val.trim().parse::<i64>() {
                        expired = secs <= 0;
                    }
                }
                _ => {}
            }
        }

        Some((cookie, expired))
    }
}

/// Cookie jar behind `document.cookie`
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// `document.cookie = "..."`: add, replace or expire one cookie
    pub fn set_cookie(&mut self, input: &str) {
        let Some((cookie, expired)) = Cookie::parse(input) else {
            tracing::debug!("Ignoring malformed cookie assignment: {:?}", input);
            return;
        };
        let existing = self.cookies.iter()
            .position(|c| c.name == cookie.name && c.path == cookie.path);
        match (existing, expired) {
            (Some(i), true) => {
                self.cookies.remove(i);
            }
            (Some(i), false) => self.cookies[i] = cookie,
            (None, false) => self.cookies.push(cookie),
            (None, true) => {}
        }
    }

    /// The `document.cookie` getter: `a=1; b=2` in creation order
    pub fn cookie_string(&self) -> String {
        self.cookies.iter()
            .map(|c| {
                if c.name.is_empty() {
                    c.value.clone()
                } else {
                    format!("{}={}", c.name, c.value)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Read-only copy of everything the storage tab shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSnapshot {
    pub local: Vec<(String, String)>,
    pub session: Vec<(String, String)>,
    pub cookie: String,
}

impl StorageSnapshot {
    pub fn capture(local: &Storage, session: &Storage, cookies: &CookieJar) -> Self {
        Self {
            local: local.to_pairs(),
            session: session.to_pairs(),
            cookie: cookies.cookie_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_operations() {
        let mut storage = Storage::new();

        storage.set_item("key1", "value1");
        assert_eq!(storage.get_item("key1"), Some("value1"));

        storage.set_item("key2", "value2");
        assert_eq!(storage.length(), 2);
        assert_eq!(storage.key(1), Some("key2"));
        assert_eq!(storage.key(2), None);

        storage.remove_item("key1");
        assert_eq!(storage.get_item("key1"), None);

        storage.clear();
        assert_eq!(storage.length(), 0);
    }

    #[test]
    fn test_cookie_string() {
        let mut jar = CookieJar::new();
        jar.set_cookie("theme=dark; path=/");
        jar.set_cookie("lang=en");
        jar.set_cookie("theme=light");
        assert_eq!(jar.cookie_string(), "theme=light; lang=en");
    }

    #[test]
    fn test_cookie_expiry_removes() {
        let mut jar = CookieJar::new();
        jar.set_cookie("a=1");
        jar.set_cookie("a=; max-age=0");
        assert!(jar.is_empty());
        assert_eq!(jar.cookie_string(), "");
    }

    #[test]
    fn test_cookie_paths_are_distinct() {
        let mut jar = CookieJar::new();
        jar.set_cookie("a=1; path=/");
        jar.set_cookie("a=2; path=/docs");
        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn test_malformed_cookie_ignored() {
        let mut jar = CookieJar::new();
        jar.set_cookie("");
        jar.set_cookie(" ; path=/");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_snapshot() {
        let mut local = Storage::new();
        local.set_item("b", "2");
        local.set_item("a", "1");
        let session = Storage::new();
        let mut jar = CookieJar::new();
        jar.set_cookie("sid=42");

        let snap = StorageSnapshot::capture(&local, &session, &jar);
        assert_eq!(snap.local, vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
        assert!(snap.session.is_empty());
        assert_eq!(snap.cookie, "sid=42");
    }
}
