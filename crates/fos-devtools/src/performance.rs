//! Performance Timeline
//!
//! User timing marks and measures on the page clock.

use std::rc::Rc;

use crate::clock::Clock;
use crate::console::ConsoleValue;
use crate::DevToolsError;

/// Performance entry
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceEntry {
    pub name: String,
    pub entry_type: EntryType,
    pub start_time: f64,
    pub duration: f64,
}

impl PerformanceEntry {
    /// The entry as script would see it when logged
    pub fn to_console_value(&self) -> ConsoleValue {
        ConsoleValue::Object(vec![
            ("name".into(), ConsoleValue::String(self.name.clone())),
            ("entryType".into(), ConsoleValue::String(self.entry_type.as_str().into())),
            ("startTime".into(), ConsoleValue::Number(self.start_time)),
            ("duration".into(), ConsoleValue::Number(self.duration)),
        ])
    }
}

/// Entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Mark,
    Measure,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mark => "mark",
            Self::Measure => "measure",
        }
    }
}

/// Marks and measures, in creation order
pub struct PerformanceTimeline {
    clock: Rc<dyn Clock>,
    marks: Vec<PerformanceEntry>,
    measures: Vec<PerformanceEntry>,
}

impl PerformanceTimeline {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            marks: Vec::new(),
            measures: Vec::new(),
        }
    }

    /// `performance.now()`
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Add performance mark
    pub fn mark(&mut self, name: &str) -> PerformanceEntry {
        let entry = PerformanceEntry {
            name: name.to_string(),
            entry_type: EntryType::Mark,
            start_time: self.clock.now(),
            duration: 0.0,
        };
        self.marks.push(entry.clone());
        entry
    }

    /// Add performance measure between two marks.
    ///
    /// The most recent mark of each name is used. Without an end mark the
    /// measure ends now.
    pub fn measure(
        &mut self,
        name: &str,
        start_mark: &str,
        end_mark: Option<&str>,
    ) -> Result<PerformanceEntry, DevToolsError> {
        let start = self.latest_mark(start_mark)?;
        let end = match end_mark {
            Some(em) => self.latest_mark(em)?,
            None => self.clock.now(),
        };

        let entry = PerformanceEntry {
            name: name.to_string(),
            entry_type: EntryType::Measure,
            start_time: start,
            duration: end - start,
        };
        self.measures.push(entry.clone());
        Ok(entry)
    }

    fn latest_mark(&self, name: &str) -> Result<f64, DevToolsError> {
        self.marks.iter()
            .rev()
            .find(|m| m.name == name)
            .map(|m| m.start_time)
            .ok_or_else(|| DevToolsError::MarkNotFound(name.to_string()))
    }

    /// All entries ordered by start time
    pub fn get_entries(&self) -> Vec<&PerformanceEntry> {
        let mut entries: Vec<_> = self.marks.iter().chain(self.measures.iter()).collect();
        entries.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        entries
    }

    /// Get entries by name
    pub fn get_entries_by_name(&self, name: &str) -> Vec<&PerformanceEntry> {
        self.get_entries().into_iter().filter(|e| e.name == name).collect()
    }

    /// Get entries by type
    pub fn get_entries_by_type(&self, entry_type: EntryType) -> Vec<&PerformanceEntry> {
        match entry_type {
            EntryType::Mark => self.marks.iter().collect(),
            EntryType::Measure => self.measures.iter().collect(),
        }
    }

    pub fn has_mark(&self, name: &str) -> bool {
        self.marks.iter().any(|m| m.name == name)
    }

    /// Clear marks
    pub fn clear_marks(&mut self, name: Option<&str>) {
        match name {
            Some(n) => self.marks.retain(|m| m.name != n),
            None => self.marks.clear(),
        }
    }

    /// Clear measures
    pub fn clear_measures(&mut self, name: Option<&str>) {
        match name {
            Some(n) => self.measures.retain(|m| m.name != n),
            None => self.measures.clear(),
        }
    }
}

impl std::fmt::Debug for PerformanceTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceTimeline")
            .field("marks", &self.marks)
            .field("measures", &self.measures)
            .finish()
    }
}
