//! Inspected page
//!
//! The host capabilities the overlay reads and writes: the document, both
//! storage areas, the cookie jar and the performance timeline.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::Document;

use crate::clock::Clock;
use crate::performance::PerformanceTimeline;
use crate::storage::{CookieJar, Storage, StorageSnapshot};

pub struct Page {
    pub document: Document,
    local_storage: Rc<RefCell<Storage>>,
    session_storage: Rc<RefCell<Storage>>,
    pub cookies: CookieJar,
    pub performance: PerformanceTimeline,
}

impl Page {
    pub fn new(document: Document, clock: Rc<dyn Clock>) -> Self {
        Self {
            document,
            local_storage: Rc::new(RefCell::new(Storage::new())),
            session_storage: Rc::new(RefCell::new(Storage::new())),
            cookies: CookieJar::new(),
            performance: PerformanceTimeline::new(clock),
        }
    }

    /// Parse markup into a fresh page
    pub fn from_html(html: &str, url: &str, clock: Rc<dyn Clock>) -> Self {
        Self::new(fos_html::HtmlParser::new().parse_with_url(html, url), clock)
    }

    /// `localStorage`, shared with script
    pub fn local_storage(&self) -> Rc<RefCell<Storage>> {
        Rc::clone(&self.local_storage)
    }

    /// `sessionStorage`, shared with script
    pub fn session_storage(&self) -> Rc<RefCell<Storage>> {
        Rc::clone(&self.session_storage)
    }

    pub fn storage_snapshot(&self) -> StorageSnapshot {
        StorageSnapshot::capture(
            &self.local_storage.borrow(),
            &self.session_storage.borrow(),
            &self.cookies,
        )
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.document.url())
            .field("local_storage", &self.local_storage.borrow().length())
            .field("session_storage", &self.session_storage.borrow().length())
            .field("cookies", &self.cookies.len())
            .finish()
    }
}
