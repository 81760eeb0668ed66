//! Where [`JournalEntry`]s go.
//!
//! [`JournalEntry`]: ../struct.JournalEntry.html

use crate::fields::JournalEntry;
use std::io;

/// Sends a finished [`JournalEntry`] to the journal.
///
/// Any `Fn(&JournalEntry) -> io::Result<()>` closure is a `JournalSink`,
/// which is handy for tests or for wrapping [`SystemJournal`]. The closure's
/// parameter needs an explicit type:
///
/// ```
/// use slog_extended_journal::{JournalBuilder, JournalEntry};
///
/// let drain = JournalBuilder::new()
///     .sink(|entry: &JournalEntry| {
///         println!("{:?} {}", entry.priority(), entry.message());
///         Ok(())
///     })
///     .build()
///     .unwrap();
/// ```
///
/// [`JournalEntry`]: ../struct.JournalEntry.html
/// [`SystemJournal`]: struct.SystemJournal.html
pub trait JournalSink {
    /// Sends one entry. Errors are reported through the drain's
    /// [`ErrorHandler`](../trait.ErrorHandler.html).
    fn send(&self, entry: &JournalEntry) -> io::Result<()>;
}

impl<F> JournalSink for F
where
    F: Fn(&JournalEntry) -> io::Result<()>,
{
    fn send(&self, entry: &JournalEntry) -> io::Result<()> {
        self(entry)
    }
}

/// The local systemd journal, written to through
/// [`libsystemd::logging::journal_send`].
///
/// [`libsystemd::logging::journal_send`]: https://docs.rs/libsystemd/0.7/libsystemd/logging/fn.journal_send.html
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SystemJournal;

impl JournalSink for SystemJournal {
    fn send(&self, entry: &JournalEntry) -> io::Result<()> {
        libsystemd::logging::journal_send(entry.priority().into(), entry.message(), entry.fields())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}
