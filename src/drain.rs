use crate::adapter::{format, Adapter, DefaultAdapter};
use crate::args::{Arg, Options};
use crate::builder::JournalBuilder;
use crate::error::{BuildError, EmitError, ErrorHandler, StderrErrorHandler};
use crate::fields::{journal_entry, JournalEntry};
use crate::sink::{JournalSink, SystemJournal};
use slog::{self, Drain, Level, OwnedKVList, Record};
use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static TL_BUF: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(128))
}

/// [`Drain`] implementation that sends log records to the systemd journal.
///
/// Each record becomes one journal entry with these fields:
///
/// * `MESSAGE`: the record formatted by the drain's [`Adapter`].
/// * `PRIORITY`: chosen by the [`Adapter`], by default with
///   [`Priority::from_slog`].
/// * `LOGGER`: the record's tag, or its module path if the tag is empty.
/// * `THREAD_NAME`: the name of the thread that runs the drain.
/// * `CODE_FILE`, `CODE_LINE`, `CODE_FUNC`: the record's source location.
/// * `MESSAGE_ID`: the `MESSAGE_ID` key-value pair, only if there is one.
/// * the default fields given to the [`JournalBuilder`];
/// * every key-value pair whose key starts with [`JOURNAL_KEY_PREFIX`],
///   named by the rest of the key.
///
/// The fields listed by name above always take precedence over defaults
/// and prefixed pairs with the same name.
///
/// # Errors
///
/// Logging never fails from the caller's point of view. If formatting or
/// sending fails, the error goes to the drain's [`ErrorHandler`] (by default
/// [`StderrErrorHandler`]) and the record is dropped. Prefixed pairs that
/// don't make valid field names are left out of the entry, which is still
/// sent, and then reported the same way.
///
/// [`Adapter`]: adapter/trait.Adapter.html
/// [`Drain`]: https://docs.rs/slog/2/slog/trait.Drain.html
/// [`ErrorHandler`]: trait.ErrorHandler.html
/// [`JournalBuilder`]: struct.JournalBuilder.html
/// [`JOURNAL_KEY_PREFIX`]: constant.JOURNAL_KEY_PREFIX.html
/// [`Priority::from_slog`]: enum.Priority.html#method.from_slog
/// [`StderrErrorHandler`]: struct.StderrErrorHandler.html
#[derive(Debug)]
pub struct JournalDrain<A = DefaultAdapter, S = SystemJournal, H = StderrErrorHandler> {
    level: Level,
    fields: BTreeMap<String, String>,
    adapter: A,
    sink: S,
    error_handler: H,
}

impl JournalDrain {
    /// Creates a new `JournalDrain` with all default settings.
    ///
    /// Equivalent to `JournalBuilder::new().build()`.
    pub fn new() -> Result<Self, BuildError> {
        JournalBuilder::new().build()
    }

    /// Creates a new `JournalBuilder`.
    ///
    /// Equivalent to `JournalBuilder::new()`.
    #[inline]
    pub fn builder() -> JournalBuilder {
        JournalBuilder::new()
    }

    /// Creates a `JournalDrain` from positional arguments and keyword
    /// options.
    ///
    /// Equivalent to `JournalBuilder::from_args(args, options)?.build()`.
    pub fn from_args(args: Vec<Arg>, options: Options) -> Result<Self, BuildError> {
        JournalBuilder::from_args(args, options)?.build()
    }
}

impl<A: Adapter, S: JournalSink, H: ErrorHandler> JournalDrain<A, S, H> {
    pub(crate) fn from_builder(builder: JournalBuilder<A, S, H>) -> Self {
        JournalDrain {
            level: builder.level,
            fields: builder.fields,
            adapter: builder.adapter,
            sink: builder.sink,
            error_handler: builder.error_handler,
        }
    }

    /// The minimum level. Less severe records are dropped.
    pub fn level(&self) -> Level {
        self.level
    }

    /// A field added to every entry, if set.
    pub fn default_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Builds the journal entry for a record without sending it.
    pub fn entry(&self, record: &Record, values: &OwnedKVList) -> Result<JournalEntry, EmitError> {
        let message = TL_BUF.with(|tl_buf_ref| {
            let mut tl_buf = tl_buf_ref.borrow_mut();
            tl_buf.clear();

            let result = format(&self.adapter, &mut *tl_buf, record, values)
                .map(|()| String::from_utf8_lossy(&tl_buf).into_owned());

            tl_buf.clear();
            result
        }).map_err(EmitError::Format)?;

        let priority = self.adapter.priority(record, values);

        journal_entry(message, priority, record, values, &self.fields)
    }

    /// Builds the journal entry for a record and sends it, returning any
    /// failure instead of reporting it.
    ///
    /// Invalid prefixed field names don't stop the entry from being sent.
    /// They are returned as [`EmitError::InvalidFieldNames`] once it has
    /// been.
    ///
    /// [`EmitError::InvalidFieldNames`]: enum.EmitError.html#variant.InvalidFieldNames
    pub fn emit(&self, record: &Record, values: &OwnedKVList) -> Result<(), EmitError> {
        let entry = self.entry(record, values)?;
        self.sink.send(&entry).map_err(EmitError::Send)?;

        match entry.skipped_fields() {
            [] => Ok(()),
            names => Err(EmitError::InvalidFieldNames(names.to_vec())),
        }
    }
}

impl<A: Adapter, S: JournalSink, H: ErrorHandler> Drain for JournalDrain<A, S, H> {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        if !record.level().is_at_least(self.level) {
            return Ok(());
        }

        if let Err(error) = self.emit(record, values) {
            self.error_handler.handle_error(&error, record);
        }

        Ok(())
    }

    #[inline]
    fn is_enabled(&self, level: Level) -> bool {
        level.is_at_least(self.level)
    }
}
