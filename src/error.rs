use slog::Record;
use std::error::Error as StdError;
use std::io::{self, Write};
use thiserror::Error;

/// A failure while turning a record into a journal entry or sending it.
///
/// These never escape [`JournalDrain`]. Each one is reported once through the
/// drain's [`ErrorHandler`]. Only [`InvalidFieldNames`] still lets the entry
/// through; for the others the record is dropped.
///
/// [`InvalidFieldNames`]: #variant.InvalidFieldNames
///
/// [`ErrorHandler`]: trait.ErrorHandler.html
/// [`JournalDrain`]: struct.JournalDrain.html
#[derive(Debug, Error)]
pub enum EmitError {
    /// The [`Adapter`] or a key-value serializer failed.
    ///
    /// [`Adapter`]: adapter/trait.Adapter.html
    #[error("failed to format log message")]
    Format(#[source] slog::Error),

    /// Some `JOURNAL_`-prefixed keys did not leave a valid journal field
    /// name after the prefix was removed. The entry was sent without them.
    #[error("invalid journal field names {0:?}, sent the entry without them")]
    InvalidFieldNames(Vec<String>),

    /// The [`JournalSink`] rejected the entry.
    ///
    /// [`JournalSink`]: sink/trait.JournalSink.html
    #[error("failed to send entry to the journal")]
    Send(#[source] io::Error),
}

/// A problem with the settings given to [`JournalBuilder`].
///
/// [`JournalBuilder`]: struct.JournalBuilder.html
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BuildError {
    /// A default field name is not a valid journal field name.
    #[error("invalid journal field name `{0}`")]
    InvalidFieldName(String),

    /// A default field was given a table instead of a scalar value.
    #[error("journal field `{name}` must have a scalar value")]
    InvalidFieldValue {
        /// The field name.
        name: String,
    },

    /// The level argument is not a recognized slog level.
    #[error("unrecognized log level `{0}`")]
    InvalidLevel(String),

    /// More positional arguments were given than the drain accepts.
    #[error("unexpected positional argument {position}: {value}")]
    UnexpectedArgument {
        /// Zero-based index of the argument.
        position: usize,
        /// The argument, rendered for display.
        value: String,
    },

    /// The level was given both positionally and as the `level` option.
    #[error("log level given both positionally and as the `level` option")]
    DuplicateLevel,
}

/// Receives [`EmitError`]s from a [`JournalDrain`].
///
/// Any `Fn(&EmitError, &Record)` closure is an `ErrorHandler`. Closure
/// parameters need explicit types so that they accept any lifetime:
///
/// ```
/// use slog::Record;
/// use slog_extended_journal::{EmitError, JournalBuilder};
///
/// let drain = JournalBuilder::new()
///     .error_handler(|error: &EmitError, record: &Record| {
///         eprintln!("dropped `{}`: {}", record.msg(), error);
///     })
///     .build()
///     .unwrap();
/// ```
///
/// [`EmitError`]: enum.EmitError.html
/// [`JournalDrain`]: struct.JournalDrain.html
pub trait ErrorHandler {
    /// Reports a failed emission. Must not panic.
    fn handle_error(&self, error: &EmitError, record: &Record);
}

impl<F> ErrorHandler for F
where
    F: Fn(&EmitError, &Record),
{
    fn handle_error(&self, error: &EmitError, record: &Record) {
        self(error, record)
    }
}

/// The default [`ErrorHandler`]. Prints a diagnostic to `stderr` and carries
/// on.
///
/// [`ErrorHandler`]: trait.ErrorHandler.html
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrErrorHandler;

impl ErrorHandler for StderrErrorHandler {
    fn handle_error(&self, error: &EmitError, record: &Record) {
        let stderr = io::stderr();
        let mut out = stderr.lock();

        // Nowhere left to report a failure to write to stderr.
        let _ = write_report(&mut out, error, record);
    }
}

fn write_report<W: Write>(out: &mut W, error: &EmitError, record: &Record) -> io::Result<()> {
    writeln!(out, "--- Journal logging error ---")?;
    writeln!(out, "{}", error)?;

    let mut source = error.source();
    while let Some(cause) = source {
        writeln!(out, "Caused by: {}", cause)?;
        source = cause.source();
    }

    writeln!(out, "Message: {}", record.msg())?;
    writeln!(out, "Logged from file {}, line {}", record.file(), record.line())
}

#[test]
fn test_write_report() {
    let mut buf = Vec::new();
    let error = EmitError::Send(io::Error::new(io::ErrorKind::Other, "socket gone"));

    write_report(&mut buf, &error, &record!(slog::Level::Info, "", &format_args!("hello"), b!()))
        .expect("writing into a Vec failed");

    let report = String::from_utf8(buf).expect("invalid UTF-8");
    assert!(report.starts_with("--- Journal logging error ---\n"));
    assert!(report.contains("failed to send entry to the journal\nCaused by: socket gone\n"));
    assert!(report.contains("Message: hello\n"));
    assert!(report.contains(&format!("Logged from file {}", file!())));
}
