//! Validation results accumulator
//!
//! Each rule owns one [`ValidationResults`]. Rules append entries only on
//! failure, so an empty accumulator means the rule passed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a result entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice = 0,
    Warning = 1,
    Error = 2,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Notice => write!(f, "notice"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single message produced by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub severity: Severity,
    pub message: String,
    /// Stable numeric code callers can branch on
    pub code: u32,
}

impl ResultEntry {
    pub fn new(severity: Severity, message: impl Into<String>, code: u32) -> Self {
        Self {
            severity,
            message: message.into(),
            code,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} #{}] {}", self.severity, self.code, self.message)
    }
}

/// Ordered collection of result entries for one rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResults {
    /// What produced these results (usually a rule type ID)
    pub subject: String,
    entries: Vec<ResultEntry>,
}

impl ValidationResults {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            entries: Vec::new(),
        }
    }

    /// Add an error entry
    pub fn add_error(&mut self, message: impl Into<String>, code: u32) -> &mut Self {
        self.add(ResultEntry::new(Severity::Error, message, code))
    }

    /// Add a warning entry
    pub fn add_warning(&mut self, message: impl Into<String>, code: u32) -> &mut Self {
        self.add(ResultEntry::new(Severity::Warning, message, code))
    }

    /// Add a notice entry
    pub fn add_notice(&mut self, message: impl Into<String>, code: u32) -> &mut Self {
        self.add(ResultEntry::new(Severity::Notice, message, code))
    }

    pub fn add(&mut self, entry: ResultEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Valid unless an error entry was recorded
    pub fn is_valid(&self) -> bool {
        !self.entries.iter().any(ResultEntry::is_error)
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    /// Whether an entry with the given code exists
    pub fn contains_code(&self, code: u32) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ValidationResults {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}: VALID", self.subject)?;
        } else {
            write!(f, "{}: INVALID", self.subject)?;
        }
        if !self.entries.is_empty() {
            write!(f, " ({} messages)", self.entries.len())?;
        }
        Ok(())
    }
}
