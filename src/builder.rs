use crate::adapter::{Adapter, DefaultAdapter};
use crate::args::{normalize_args, Arg, Options};
use crate::drain::JournalDrain;
use crate::error::{BuildError, ErrorHandler, StderrErrorHandler};
use crate::fields::is_valid_field_name;
use crate::priority::Priority;
use crate::sink::{JournalSink, SystemJournal};
use slog::{self, OwnedKVList, Record};
use std::collections::BTreeMap;
use std::env;
use std::fmt;

/// Field that names the program in journal entries.
pub const SYSLOG_IDENTIFIER: &str = "SYSLOG_IDENTIFIER";

lazy_static! {
    /// File name of the running executable, used as the default
    /// `SYSLOG_IDENTIFIER`.
    static ref PROGRAM_NAME: Option<String> = env::current_exe()
        .ok()
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
}

/// Builds a [`JournalDrain`].
///
/// All settings have sensible defaults. `JournalBuilder::new().build()` (or
/// `JournalDrain::new()`, which is equivalent) yields a drain that sends every
/// record to the local journal, with `SYSLOG_IDENTIFIER` set to the name of
/// the executable.
///
/// [`JournalDrain`]: struct.JournalDrain.html
#[derive(Clone, Debug)]
pub struct JournalBuilder<A = DefaultAdapter, S = SystemJournal, H = StderrErrorHandler> {
    pub(crate) level: slog::Level,
    pub(crate) fields: BTreeMap<String, String>,
    pub(crate) adapter: A,
    pub(crate) sink: S,
    pub(crate) error_handler: H,
}

impl Default for JournalBuilder {
    fn default() -> Self {
        JournalBuilder {
            level: slog::Level::Trace,
            fields: BTreeMap::new(),
            adapter: DefaultAdapter,
            sink: SystemJournal,
            error_handler: StderrErrorHandler,
        }
    }
}

impl JournalBuilder {
    /// Makes a new `JournalBuilder` instance.
    pub fn new() -> Self {
        JournalBuilder::default()
    }

    /// Makes a `JournalBuilder` from positional arguments and keyword
    /// options, the way a configuration file describes a drain.
    ///
    /// The arguments are first passed through [`normalize_args`], so a
    /// trailing table in `args` is treated as more options. After that:
    ///
    /// * `args` may hold at most one value, the minimum level (see
    ///   [`Arg::to_level`]).
    /// * The `level` option also sets the minimum level.
    /// * Every other option is a default journal field.
    ///
    /// # Example
    ///
    /// ```
    /// use slog_extended_journal::{Arg, JournalBuilder, Options};
    ///
    /// let mut fields = Options::new();
    /// fields.insert("SYSLOG_IDENTIFIER".to_string(), Arg::from("my-cool-app"));
    ///
    /// let builder = JournalBuilder::from_args(vec!["info".into(), fields.into()], Options::new())
    ///     .unwrap();
    ///
    /// assert_eq!(builder.get_level(), slog::Level::Info);
    /// assert_eq!(builder.get_field("SYSLOG_IDENTIFIER"), Some("my-cool-app"));
    /// ```
    ///
    /// # Errors
    ///
    /// Fails on extra positional arguments, an unrecognized level, a level
    /// given both ways, or a table used as a field value. Field names are
    /// checked later, by [`build`].
    ///
    /// [`Arg::to_level`]: enum.Arg.html#method.to_level
    /// [`build`]: #method.build
    /// [`normalize_args`]: fn.normalize_args.html
    pub fn from_args(args: Vec<Arg>, options: Options) -> Result<Self, BuildError> {
        let (args, mut options) = normalize_args(args, options);
        let mut builder = JournalBuilder::new();
        let mut args = args.into_iter().enumerate();

        let positional_level = match args.next() {
            Some((_, arg)) => Some(arg.to_level()?),
            None => None,
        };

        if let Some((position, arg)) = args.next() {
            return Err(BuildError::UnexpectedArgument { position, value: arg.to_string() });
        }

        let option_level = match options.remove("level") {
            Some(arg) => Some(arg.to_level()?),
            None => None,
        };

        match (positional_level, option_level) {
            (Some(_), Some(_)) => return Err(BuildError::DuplicateLevel),
            (Some(level), None) | (None, Some(level)) => builder = builder.level(level),
            (None, None) => {}
        }

        for (name, value) in options {
            let value = value.to_field_value(&name)?;
            builder = builder.field(name, value);
        }

        Ok(builder)
    }
}

impl<A: Adapter, S: JournalSink, H: ErrorHandler> JournalBuilder<A, S, H> {
    /// Sets the minimum level. Less severe records are dropped.
    ///
    /// By default, this is `slog::Level::Trace`, so nothing is dropped.
    pub fn level(mut self, level: slog::Level) -> Self {
        self.level = level;
        self
    }

    /// Adds a journal field to every entry.
    ///
    /// Per-record `JOURNAL_`-prefixed values with the same name replace it.
    /// Setting the same field twice keeps the last value.
    pub fn field<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Adds several journal fields to every entry. See [`field`].
    ///
    /// [`field`]: #method.field
    pub fn fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the `SYSLOG_IDENTIFIER` field.
    ///
    /// If this is not set, the file name of the running executable is used.
    pub fn syslog_identifier<V: Into<String>>(self, ident: V) -> Self {
        self.field(SYSLOG_IDENTIFIER, ident)
    }

    /// Sets the adapter, which formats messages and picks priorities.
    ///
    /// By default, this is [`DefaultAdapter`].
    ///
    /// [`DefaultAdapter`]: adapter/struct.DefaultAdapter.html
    pub fn adapter<A2: Adapter>(self, adapter: A2) -> JournalBuilder<A2, S, H> {
        JournalBuilder {
            level: self.level,
            fields: self.fields,
            adapter,
            sink: self.sink,
            error_handler: self.error_handler,
        }
    }

    /// Formats messages with the given closure, keeping the current
    /// adapter's priorities. See [`Adapter::with_fmt`].
    ///
    /// [`Adapter::with_fmt`]: adapter/trait.Adapter.html#method.with_fmt
    pub fn format<F>(self, fmt_fn: F) -> JournalBuilder<crate::adapter::WithFormat<A, F>, S, H>
    where
        F: Fn(&mut fmt::Formatter, &Record, &OwnedKVList) -> slog::Result,
    {
        let adapter = self.adapter;
        JournalBuilder {
            level: self.level,
            fields: self.fields,
            adapter: adapter.with_fmt(fmt_fn),
            sink: self.sink,
            error_handler: self.error_handler,
        }
    }

    /// Picks priorities with the given closure, keeping the current
    /// adapter's formatting. See [`Adapter::with_priority`].
    ///
    /// [`Adapter::with_priority`]: adapter/trait.Adapter.html#method.with_priority
    pub fn priority<P>(self, priority_fn: P) -> JournalBuilder<crate::adapter::WithPriority<A, P>, S, H>
    where
        P: Fn(&Record, &OwnedKVList) -> Priority,
    {
        let adapter = self.adapter;
        JournalBuilder {
            level: self.level,
            fields: self.fields,
            adapter: adapter.with_priority(priority_fn),
            sink: self.sink,
            error_handler: self.error_handler,
        }
    }

    /// Sets where entries are sent.
    ///
    /// By default, this is [`SystemJournal`].
    ///
    /// [`SystemJournal`]: sink/struct.SystemJournal.html
    pub fn sink<S2: JournalSink>(self, sink: S2) -> JournalBuilder<A, S2, H> {
        JournalBuilder {
            level: self.level,
            fields: self.fields,
            adapter: self.adapter,
            sink,
            error_handler: self.error_handler,
        }
    }

    /// Sets the hook that reports failed emissions.
    ///
    /// By default, this is [`StderrErrorHandler`].
    ///
    /// [`StderrErrorHandler`]: struct.StderrErrorHandler.html
    pub fn error_handler<H2: ErrorHandler>(self, error_handler: H2) -> JournalBuilder<A, S, H2> {
        JournalBuilder {
            level: self.level,
            fields: self.fields,
            adapter: self.adapter,
            sink: self.sink,
            error_handler,
        }
    }

    /// The minimum level.
    pub fn get_level(&self) -> slog::Level {
        self.level
    }

    /// A default field set so far, if any.
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Builds the `JournalDrain`.
    ///
    /// # Errors
    ///
    /// Fails if a default field name is not a valid journal field name (see
    /// [`is_valid_field_name`]).
    ///
    /// [`is_valid_field_name`]: fn.is_valid_field_name.html
    pub fn build(mut self) -> Result<JournalDrain<A, S, H>, BuildError> {
        if let Some(name) = self.fields.keys().find(|name| !is_valid_field_name(name)) {
            return Err(BuildError::InvalidFieldName(name.clone()));
        }

        if !self.fields.contains_key(SYSLOG_IDENTIFIER) {
            if let Some(ref program) = *PROGRAM_NAME {
                self.fields.insert(SYSLOG_IDENTIFIER.to_string(), program.clone());
            }
        }

        Ok(JournalDrain::from_builder(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, Arg)]) -> Options {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn from_args_with_trailing_fields() {
        let builder = JournalBuilder::from_args(
            vec![Arg::from("info"), Arg::Map(options(&[("SYSLOG_IDENTIFIER", "my-app".into())]))],
            Options::new(),
        ).expect("from_args failed");

        assert_eq!(builder.get_level(), slog::Level::Info);
        assert_eq!(builder.get_field("SYSLOG_IDENTIFIER"), Some("my-app"));
        assert_eq!(builder.fields.len(), 1);
    }

    #[test]
    fn from_args_with_options() {
        let builder = JournalBuilder::from_args(
            vec![],
            options(&[("level", "warning".into()), ("UNIT", "web".into()), ("SHARD", Arg::Int(3))]),
        ).expect("from_args failed");

        assert_eq!(builder.get_level(), slog::Level::Warning);
        assert_eq!(builder.get_field("UNIT"), Some("web"));
        assert_eq!(builder.get_field("SHARD"), Some("3"));
        assert_eq!(builder.get_field("level"), None);
    }

    #[test]
    fn from_args_empty() {
        let builder = JournalBuilder::from_args(vec![], Options::new()).expect("from_args failed");

        assert_eq!(builder.get_level(), slog::Level::Trace);
        assert!(builder.fields.is_empty());
    }

    #[test]
    fn from_args_errors() {
        assert_eq!(
            JournalBuilder::from_args(vec!["info".into(), "extra".into()], Options::new()).err(),
            Some(BuildError::UnexpectedArgument { position: 1, value: "extra".to_string() })
        );

        assert_eq!(
            JournalBuilder::from_args(vec!["info".into()], options(&[("level", "debug".into())])).err(),
            Some(BuildError::DuplicateLevel)
        );

        assert_eq!(
            JournalBuilder::from_args(vec!["chatty".into()], Options::new()).err(),
            Some(BuildError::InvalidLevel("chatty".to_string()))
        );

        assert_eq!(
            JournalBuilder::from_args(vec![], options(&[("NESTED", Arg::Map(Options::new()))])).err(),
            Some(BuildError::InvalidFieldValue { name: "NESTED".to_string() })
        );
    }

    #[test]
    fn build_rejects_bad_field_names() {
        assert_eq!(
            JournalBuilder::new().field("lowercase", "x").build().err(),
            Some(BuildError::InvalidFieldName("lowercase".to_string()))
        );

        assert_eq!(
            JournalBuilder::from_args(vec![], options(&[("_PID", "1".into())]))
                .and_then(JournalBuilder::build)
                .err(),
            Some(BuildError::InvalidFieldName("_PID".to_string()))
        );
    }

    #[test]
    fn syslog_identifier_defaults_to_program_name() {
        let drain = JournalBuilder::new().build().expect("build failed");
        assert_eq!(drain.default_field(SYSLOG_IDENTIFIER), PROGRAM_NAME.as_ref().map(String::as_str));

        let drain = JournalBuilder::new().syslog_identifier("explicit").build().expect("build failed");
        assert_eq!(drain.default_field(SYSLOG_IDENTIFIER), Some("explicit"));
    }
}
