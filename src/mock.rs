//! Stand-ins for the journal and the error hook, for tests.

use crate::error::{EmitError, ErrorHandler};
use crate::fields::JournalEntry;
use crate::sink::JournalSink;
use slog::Record;
use std::io;
use std::sync::{Arc, Mutex};

/// Records every entry it is sent. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
    fail_with: Option<io::ErrorKind>,
}

impl Journal {
    pub fn new() -> Self {
        Journal::default()
    }

    /// A journal that refuses every entry with the given error kind.
    pub fn failing(kind: io::ErrorKind) -> Self {
        Journal {
            fail_with: Some(kind),
            ..Journal::default()
        }
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn single_entry(&self) -> JournalEntry {
        let entries = self.entries();
        assert_eq!(entries.len(), 1, "expected exactly one entry, got {:#?}", entries);
        entries.into_iter().next().unwrap()
    }
}

impl JournalSink for Journal {
    fn send(&self, entry: &JournalEntry) -> io::Result<()> {
        if let Some(kind) = self.fail_with {
            return Err(io::Error::new(kind, "mock journal refused the entry"));
        }

        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// A reported emission failure: the error's text and the record's message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    pub error: String,
    pub message: String,
}

/// Records every error it is handed. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct Errors {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl Errors {
    pub fn new() -> Self {
        Errors::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorHandler for Errors {
    fn handle_error(&self, error: &EmitError, record: &Record) {
        self.reports.lock().unwrap().push(Report {
            error: error.to_string(),
            message: record.msg().to_string(),
        });
    }
}
