//! Console interception
//!
//! Wraps the info/warn/error channels and the uncaught-error and
//! unhandled-rejection listeners. Every call is forwarded to the original
//! channel (a [`ConsoleSink`]) and, unless its payload is `undefined`,
//! appended to the page-wide [`LogBook`].

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::clock::Clock;

/// Console channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// `console.log` / `console.info`
    Info,
    /// `console.warn`
    Warn,
    /// `console.error`, uncaught errors and unhandled rejections
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Console value (for object inspection)
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(Vec<(String, ConsoleValue)>),
    Array(Vec<ConsoleValue>),
    Function(String),
    Error { name: String, message: String },
}

impl ConsoleValue {
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error { name: name.into(), message: message.into() }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Property lookup on object values
    pub fn get(&self, key: &str) -> Option<&ConsoleValue> {
        match self {
            Self::Object(props) => props.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for ConsoleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Object(props) => {
                write!(f, "{{")?;
                for (i, (k, v)) in props.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}: ", k)?;
                    v.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    v.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Self::Function(name) => write!(f, "ƒ {}()", name),
            Self::Error { name, message } => write!(f, "{}: {}", name, message),
        }
    }
}

impl From<&str> for ConsoleValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConsoleValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for ConsoleValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for ConsoleValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// One intercepted console call or error
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Milliseconds on the interceptor's clock
    pub timestamp: f64,
    pub level: LogLevel,
    pub payload: ConsoleValue,
}

/// Append-only, page-wide log sequence. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct LogBook {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: LogEntry) {
        self.entries.borrow_mut().push(entry);
    }

    /// Borrow all entries in call order
    pub fn entries(&self) -> Ref<'_, [LogEntry]> {
        Ref::map(self.entries.borrow(), |v| v.as_slice())
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// The original console channel that intercepted calls are forwarded to
pub trait ConsoleSink {
    fn forward(&self, level: LogLevel, payload: &ConsoleValue);
}

impl<F: Fn(LogLevel, &ConsoleValue)> ConsoleSink for F {
    fn forward(&self, level: LogLevel, payload: &ConsoleValue) {
        self(level, payload)
    }
}

/// Forwards console output to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ConsoleSink for TracingSink {
    fn forward(&self, level: LogLevel, payload: &ConsoleValue) {
        match level {
            LogLevel::Error => tracing::error!("[console] {}", payload),
            LogLevel::Warn => tracing::warn!("[console] {}", payload),
            LogLevel::Info => tracing::info!("[console] {}", payload),
        }
    }
}

/// Console interceptor
#[derive(Clone)]
pub struct LogInterceptor {
    book: LogBook,
    sink: Rc<dyn ConsoleSink>,
    clock: Rc<dyn Clock>,
}

impl LogInterceptor {
    pub fn new(sink: Rc<dyn ConsoleSink>, clock: Rc<dyn Clock>) -> Self {
        Self { book: LogBook::new(), sink, clock }
    }

    /// Interceptor whose original channel is `tracing`
    pub fn with_tracing(clock: Rc<dyn Clock>) -> Self {
        Self::new(Rc::new(TracingSink), clock)
    }

    pub fn book(&self) -> &LogBook {
        &self.book
    }

    /// The clock used for entry timestamps
    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    /// console.log / console.info
    pub fn info(&self, payload: impl Into<ConsoleValue>) {
        self.call(LogLevel::Info, payload.into());
    }

    /// console.warn
    pub fn warn(&self, payload: impl Into<ConsoleValue>) {
        self.call(LogLevel::Warn, payload.into());
    }

    /// console.error
    pub fn error(&self, payload: impl Into<ConsoleValue>) {
        self.call(LogLevel::Error, payload.into());
    }

    /// A wrapped channel call: forward, then record
    pub fn call(&self, level: LogLevel, payload: ConsoleValue) {
        self.sink.forward(level, &payload);
        self.record(level, payload);
    }

    /// `error` event listener: an uncaught synchronous error
    pub fn uncaught_error(&self, error: ConsoleValue) {
        tracing::debug!("Uncaught {}", error);
        self.record(LogLevel::Error, error);
    }

    /// `unhandledrejection` event listener
    pub fn unhandled_rejection(&self, reason: ConsoleValue) {
        tracing::debug!("Unhandled rejection: {}", reason);
        self.record(LogLevel::Error, reason);
    }

    fn record(&self, level: LogLevel, payload: ConsoleValue) {
        if payload.is_undefined() {
            return;
        }
        self.book.push(LogEntry {
            timestamp: self.clock.now(),
            level,
            payload,
        });
    }
}

impl fmt::Debug for LogInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogInterceptor")
            .field("entries", &self.book.len())
            .finish()
    }
}
