//! Customize how [`slog::Record`]s become journal messages and priorities.
//!
//! See [`Adapter`] for more details.
//!
//! [`Adapter`]: trait.Adapter.html
//! [`slog::Record`]: https://docs.rs/slog/2/slog/struct.Record.html

use crate::fields::is_journal_key;
use crate::priority::Priority;
use slog::{self, OwnedKVList, Record, KV};
use std::cell::Cell;
use std::fmt::{self, Debug, Display};
use std::io;
use std::sync::Arc;

/// Converts [`slog::Record`]s to journal messages.
///
/// An `Adapter` has two responsibilities:
///
/// 1. Format the `MESSAGE` field.
/// 2. Determine the entry's journal [priority].
///
/// Key-value pairs named with [`JOURNAL_KEY_PREFIX`] are sent as journal
/// fields regardless of the adapter. Whether the remaining pairs show up in
/// the message is up to the adapter's `fmt` method.
///
/// [priority]: ../enum.Priority.html
/// [`JOURNAL_KEY_PREFIX`]: ../constant.JOURNAL_KEY_PREFIX.html
/// [`slog::Record`]: https://docs.rs/slog/2/slog/struct.Record.html
pub trait Adapter: Debug {
    /// Formats a log message into the given `Formatter`.
    ///
    /// Note that this method returns `slog::Result`, not `std::fmt::Result`.
    /// The free function [`format`](fn.format.html) turns an error from here
    /// into an ordinary `Err`.
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result;

    /// Creates a new `Adapter` based on this one, but whose `fmt` method
    /// delegates to the provided closure.
    ///
    /// # Example
    ///
    /// ```
    /// use slog_extended_journal::adapter::{Adapter, DefaultAdapter};
    /// use slog_extended_journal::JournalBuilder;
    ///
    /// let drain = JournalBuilder::new()
    ///     .adapter(DefaultAdapter.with_fmt(|f, record, _| {
    ///         write!(f, "[{}] {}", record.module(), record.msg())?;
    ///         Ok(())
    ///     }))
    ///     .build()
    ///     .unwrap();
    /// ```
    ///
    /// [`JournalBuilder::format`] is a shorthand for the same thing.
    ///
    /// The closure returns `Result<(), slog::Error>`, and `slog::Error`
    /// converts from the `std::fmt::Error` that `write!` returns, so `?`
    /// works.
    ///
    /// [`JournalBuilder::format`]: ../struct.JournalBuilder.html#method.format
    fn with_fmt<F>(self, fmt_fn: F) -> WithFormat<Self, F>
    where
        Self: Sized,
        F: Fn(&mut fmt::Formatter, &Record, &OwnedKVList) -> slog::Result,
    {
        WithFormat {
            fmt_fn,
            inner: self,
        }
    }

    /// Examines a log message and determines its journal [`Priority`].
    ///
    /// The default implementation calls [`Priority::from_slog`].
    ///
    /// [`Priority`]: ../enum.Priority.html
    /// [`Priority::from_slog`]: ../enum.Priority.html#method.from_slog
    #[allow(unused_variables)]
    fn priority(&self, record: &Record, values: &OwnedKVList) -> Priority {
        Priority::from_slog(record.level())
    }

    /// Creates a new `Adapter` based on this one, but whose `priority` method
    /// delegates to the provided closure.
    ///
    /// # Example
    ///
    /// Log `slog::Level::Info` messages from `my_app::billing` as
    /// [`Priority::Notice`]:
    ///
    /// ```
    /// use slog_extended_journal::adapter::{Adapter, DefaultAdapter};
    /// use slog_extended_journal::{JournalBuilder, Priority};
    ///
    /// let drain = JournalBuilder::new()
    ///     .adapter(DefaultAdapter.with_priority(|record, _| {
    ///         match (record.level(), record.module()) {
    ///             (slog::Level::Info, "my_app::billing") => Priority::Notice,
    ///             (level, _) => Priority::from_slog(level),
    ///         }
    ///     }))
    ///     .build()
    ///     .unwrap();
    /// ```
    ///
    /// [`Priority::Notice`]: ../enum.Priority.html#variant.Notice
    fn with_priority<P>(self, priority_fn: P) -> WithPriority<Self, P>
    where
        Self: Sized,
        P: Fn(&Record, &OwnedKVList) -> Priority,
    {
        WithPriority {
            inner: self,
            priority_fn,
        }
    }
}

impl<'a, T: Adapter + ?Sized> Adapter for &'a T {
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result {
        Adapter::fmt(&**self, f, record, values)
    }

    fn priority(&self, record: &Record, values: &OwnedKVList) -> Priority {
        Adapter::priority(&**self, record, values)
    }
}

/// Lets several drains share one adapter.
impl<T: Adapter + ?Sized> Adapter for Arc<T> {
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result {
        Adapter::fmt(&**self, f, record, values)
    }

    fn priority(&self, record: &Record, values: &OwnedKVList) -> Priority {
        Adapter::priority(&**self, record, values)
    }
}

// Implements `Display` with a closure.
struct ClosureAsDisplay<A: Fn(&mut fmt::Formatter) -> fmt::Result>(A);
impl<A: Fn(&mut fmt::Formatter) -> fmt::Result> Display for ClosureAsDisplay<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0(f)
    }
}

/// Formats a log message into the given writer using the given adapter.
///
/// # Errors
///
/// This method can fail if the [`Adapter::fmt`] method fails, as well as if
/// the `writer` encounters an I/O error.
///
/// [`Adapter::fmt`]: trait.Adapter.html#tymethod.fmt
pub fn format<A: Adapter, W: io::Write>(adapter: A, mut writer: W, record: &Record, values: &OwnedKVList) -> slog::Result<()> {
    // `Display::fmt` only gets `&self`, so an adapter error is smuggled out
    // through a `Cell`.
    let result: Cell<Option<slog::Error>> = Cell::new(None);

    let displayable = ClosureAsDisplay(|f| {
        if let Err(e) = Adapter::fmt(&adapter, f, record, values) {
            result.set(Some(e));
        }
        Ok(())
    });

    let outer_result: io::Result<()> = write!(writer, "{}", displayable);

    // An I/O error takes precedence: the adapter error, if any, is most
    // likely a `slog::Error::Fmt` caused by it.
    if let Err(e) = outer_result {
        Err(slog::Error::Io(e))
    }
    else if let Some(e) = result.take() {
        Err(e)
    }
    else {
        Ok(())
    }
}

/// The default [`Adapter`]. Formats only the [`msg`] part of a log
/// [`Record`].
///
/// Key-value pairs that should reach the journal are meant to be named with
/// [`JOURNAL_KEY_PREFIX`], which sends them as fields of their own.
///
/// [`msg`]: https://docs.rs/slog/2/slog/struct.Record.html#method.msg
/// [`Adapter`]: trait.Adapter.html
/// [`JOURNAL_KEY_PREFIX`]: ../constant.JOURNAL_KEY_PREFIX.html
/// [`Record`]: https://docs.rs/slog/2/slog/struct.Record.html
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAdapter;
impl Adapter for DefaultAdapter {
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, _: &OwnedKVList) -> slog::Result {
        write!(f, "{}", record.msg()).map_err(From::from)
    }
}

/// Copies input to output, escaping `\`, `"` and `]`.
struct ValueEscaper<W: fmt::Write>(W);

impl<W: fmt::Write> fmt::Write for ValueEscaper<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;

        while let Some(index) = rest.find(|c| c == '\\' || c == '"' || c == ']') {
            self.0.write_str(&rest[..index])?;
            self.0.write_char('\\')?;
            // All three delimiters are single-byte ASCII.
            self.0.write_str(&rest[index..index + 1])?;
            rest = &rest[index + 1..];
        }

        self.0.write_str(rest)
    }
}

/// An [`Adapter`] that appends the key-value pairs not already sent as
/// journal fields to the message, like `msg [key1="value1" key2="value2"]`.
///
/// Pairs named with [`JOURNAL_KEY_PREFIX`], and the `MESSAGE_ID` pair, are
/// left out. Values have `\`, `"` and `]` escaped with a backslash.
///
/// [`Adapter`]: trait.Adapter.html
/// [`JOURNAL_KEY_PREFIX`]: ../constant.JOURNAL_KEY_PREFIX.html
#[derive(Clone, Copy, Debug, Default)]
pub struct KvAdapter;
impl Adapter for KvAdapter {
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result {
        struct SerializerImpl<'a, 'b: 'a> {
            f: &'a mut fmt::Formatter<'b>,
            is_first_kv: bool,
        }

        impl<'a, 'b> SerializerImpl<'a, 'b> {
            fn finish(&mut self) -> slog::Result {
                if !self.is_first_kv {
                    write!(self.f, "]")?;
                }
                Ok(())
            }
        }

        impl<'a, 'b> slog::Serializer for SerializerImpl<'a, 'b> {
            fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
                use std::fmt::Write;

                if is_journal_key(&key) {
                    return Ok(());
                }

                self.f.write_str(if self.is_first_kv {" ["} else {" "})?;
                self.is_first_kv = false;

                write!(self.f, "{}=\"", key)?;
                write!(ValueEscaper(&mut *self.f), "{}", val)?;
                self.f.write_char('"')?;
                Ok(())
            }
        }

        write!(f, "{}", record.msg())?;

        let mut serializer = SerializerImpl { f, is_first_kv: true };
        values.serialize(record, &mut serializer)?;
        record.kv().serialize(record, &mut serializer)?;
        serializer.finish()
    }
}

/// An [`Adapter`] that calls a closure to format the message.
///
/// This is created by the [`Adapter::with_fmt`] method.
///
/// [`Adapter`]: trait.Adapter.html
/// [`Adapter::with_fmt`]: trait.Adapter.html#method.with_fmt
#[derive(Clone, Copy)]
pub struct WithFormat<A, F>
where
    A: Adapter,
    F: Fn(&mut fmt::Formatter, &Record, &OwnedKVList) -> slog::Result,
{
    fmt_fn: F,
    inner: A,
}

impl<A, F> Adapter for WithFormat<A, F>
where
    A: Adapter,
    F: Fn(&mut fmt::Formatter, &Record, &OwnedKVList) -> slog::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result {
        (self.fmt_fn)(f, record, values)
    }

    fn priority(&self, record: &Record, values: &OwnedKVList) -> Priority {
        self.inner.priority(record, values)
    }
}

impl<A, F> Debug for WithFormat<A, F>
where
    A: Adapter,
    F: Fn(&mut fmt::Formatter, &Record, &OwnedKVList) -> slog::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WithFormat")
            .field("inner", &self.inner)
            .finish()
    }
}

/// An [`Adapter`] that calls a closure to decide the [`Priority`] of each
/// entry.
///
/// This is created by the [`Adapter::with_priority`] method.
///
/// [`Adapter`]: trait.Adapter.html
/// [`Adapter::with_priority`]: trait.Adapter.html#method.with_priority
/// [`Priority`]: ../enum.Priority.html
#[derive(Clone, Copy)]
pub struct WithPriority<A, P>
where
    A: Adapter,
    P: Fn(&Record, &OwnedKVList) -> Priority,
{
    inner: A,
    priority_fn: P,
}

impl<A, P> Adapter for WithPriority<A, P>
where
    A: Adapter,
    P: Fn(&Record, &OwnedKVList) -> Priority,
{
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result {
        Adapter::fmt(&self.inner, f, record, values)
    }

    fn priority(&self, record: &Record, values: &OwnedKVList) -> Priority {
        (self.priority_fn)(record, values)
    }
}

impl<A, P> Debug for WithPriority<A, P>
where
    A: Adapter,
    P: Fn(&Record, &OwnedKVList) -> Priority,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WithPriority")
            .field("inner", &self.inner)
            .finish()
    }
}
