//! fOS DevTools
//!
//! In-page inspector overlay:
//! - Console interception (log/warn/error, uncaught errors, rejections)
//! - Element inspection with live id/class/markup editing
//! - Storage and cookie dumps
//! - Performance marks and measures
//! - Script evaluation from the console tab (QuickJS)

pub mod clock;
pub mod config;
pub mod console;
pub mod elements;
pub mod inspector;
pub mod overlay;
pub mod page;
pub mod paint;
pub mod performance;
pub mod render;
pub mod script;
pub mod storage;
pub mod view;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::DevToolsConfig;
pub use console::{ConsoleSink, ConsoleValue, LogBook, LogEntry, LogInterceptor, LogLevel, TracingSink};
pub use elements::ElementSnapshot;
pub use inspector::{EditField, InspectorSession, PanelPosition, SpecialAction, Tab};
pub use overlay::{EventResult, Overlay, PageEvent};
pub use page::Page;
pub use performance::{EntryType, PerformanceEntry, PerformanceTimeline};
pub use render::{render, RenderInput};
pub use script::{DisabledEvaluator, ScriptError, ScriptEvaluator};
#[cfg(feature = "quickjs")]
pub use script::QuickJsEvaluator;
pub use storage::{CookieJar, Storage, StorageSnapshot};
pub use view::View;

/// DevTools error
#[derive(Debug, thiserror::Error)]
pub enum DevToolsError {
    #[error("Document has no <head> to hold the overlay stylesheet")]
    MissingHead,

    #[error("Document has no <body> to hold the overlay panel")]
    MissingBody,

    #[error("Invalid namespace {0:?}: expected a letter followed by [a-z0-9-]")]
    InvalidNamespace(String),

    #[error("Namespace already in use: {0}")]
    NamespaceTaken(String),

    #[error("No performance mark named {0:?}")]
    MarkNotFound(String),

    #[error("Script engine error: {0}")]
    ScriptEngine(String),

    #[error("Overlay stylesheet rejected: {0}")]
    Css(#[from] fos_css::CssError),

    #[error(transparent)]
    Dom(#[from] fos_dom::DomError),
}
