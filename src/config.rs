//! Adapters for configuring a [`JournalDrain`] from a configuration file
//! using [serde]. Requires Cargo feature `serde`.
//!
//! [serde]: https://serde.rs/
//! [`JournalDrain`]: ../struct.JournalDrain.html

use crate::adapter::{Adapter, DefaultAdapter, KvAdapter};
use crate::args::{Arg, Options};
use crate::builder::JournalBuilder;
use crate::drain::JournalDrain;
use crate::error::BuildError;
use crate::priority::Priority;
use serde::{Deserialize, Serialize};
use slog::{self, OwnedKVList, Record};
use std::fmt;

/// Deserializable configuration for a [`JournalDrain`].
///
/// The drain is described the way a handler section of a logging
/// configuration file describes one: a list of positional `args`, whose last
/// element may be a table of journal fields, plus optional `kwargs`.
///
/// # TOML Example
///
/// ```
/// # use slog_extended_journal::config::JournalConfig;
/// # const TOML_CONFIG: &'static str = r#"
/// args = ["info", { SYSLOG_IDENTIFIER = "my-cool-app" }]
/// format = "kv"
///
/// [priority]
/// info = "notice"
/// # "#;
/// # let config: JournalConfig = toml::from_str(TOML_CONFIG).expect("deserialization failed");
/// # let builder = config.into_builder().expect("invalid settings");
/// # assert_eq!(builder.get_level(), slog::Level::Info);
/// # assert_eq!(builder.get_field("SYSLOG_IDENTIFIER"), Some("my-cool-app"));
/// ```
///
/// Call the [`build`] method to create a [`JournalDrain`] from a
/// `JournalConfig`.
///
/// [`build`]: #method.build
/// [`JournalDrain`]: ../struct.JournalDrain.html
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct JournalConfig {
    /// Positional arguments: the minimum level, optionally followed by a
    /// table of keyword options.
    ///
    /// See [`JournalBuilder::from_args`].
    ///
    /// [`JournalBuilder::from_args`]: ../struct.JournalBuilder.html#method.from_args
    pub args: Vec<Arg>,

    /// Keyword options: `level`, and default journal fields.
    ///
    /// Entries of a trailing table in `args` replace entries here with the
    /// same key.
    pub kwargs: Options,

    /// How to format the `MESSAGE` field.
    ///
    /// Possible values are `default` and `kv`.
    ///
    /// See [`Adapter`] for more information.
    ///
    /// [`Adapter`]: ../adapter/trait.Adapter.html
    pub format: MsgFormatConfig,

    /// Log some or all messages with the given [`Priority`].
    ///
    /// [`Priority`]: ../enum.Priority.html
    pub priority: PriorityConfig,
}

impl JournalConfig {
    /// Creates a new `JournalConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new `JournalBuilder` from the settings.
    pub fn into_builder(self) -> Result<JournalBuilder<ConfiguredAdapter>, BuildError> {
        let adapter = ConfiguredAdapter::from((self.format, self.priority));
        Ok(JournalBuilder::from_args(self.args, self.kwargs)?.adapter(adapter))
    }

    /// Creates a new `JournalDrain` from the settings.
    pub fn build(self) -> Result<JournalDrain<ConfiguredAdapter>, BuildError> {
        self.into_builder()?.build()
    }
}

/// Enumeration of built-in formatting styles.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MsgFormatConfig {
    /// The message only, using [`DefaultAdapter`](../adapter/struct.DefaultAdapter.html).
    Default,

    /// The message followed by the key-value pairs that aren't sent as
    /// fields, using [`KvAdapter`](../adapter/struct.KvAdapter.html).
    Kv,
}

impl Default for MsgFormatConfig {
    fn default() -> Self {
        MsgFormatConfig::Default
    }
}

/// Configures mapping of [`slog::Level`]s to journal [priorities].
///
/// # TOML Example
///
/// This configuration sends [`slog::Level::Info`] messages with priority
/// [`Notice`] and [`slog::Level::Critical`] messages with priority
/// [`Alert`]:
///
/// ```
/// # use slog_extended_journal::Priority;
/// # use slog_extended_journal::config::{PriorityConfig, JournalConfig};
/// #
/// # const TOML_CONFIG: &'static str = r#"
/// [priority]
/// info = "notice"
/// critical = "alert"
/// # "#;
/// #
/// # let config: JournalConfig = toml::from_str(TOML_CONFIG).expect("deserialization failed");
/// # assert_eq!(config.priority, {
/// #     let mut exp = PriorityConfig::new();
/// #     exp.info = Some(Priority::Notice);
/// #     exp.critical = Some(Priority::Alert);
/// #     exp
/// # });
/// ```
///
/// [`Alert`]: ../enum.Priority.html#variant.Alert
/// [`Notice`]: ../enum.Priority.html#variant.Notice
/// [priorities]: ../enum.Priority.html
/// [`slog::Level`]: https://docs.rs/slog/2/slog/enum.Level.html
/// [`slog::Level::Critical`]: https://docs.rs/slog/2/slog/enum.Level.html#variant.Critical
/// [`slog::Level::Info`]: https://docs.rs/slog/2/slog/enum.Level.html#variant.Info
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct PriorityConfig {
    /// Priority for every level that has no setting of its own.
    ///
    /// If this is not given either, the priority is chosen with
    /// [`Priority::from_slog`].
    ///
    /// [`Priority::from_slog`]: ../enum.Priority.html#method.from_slog
    pub all: Option<Priority>,

    /// Priority for `slog::Level::Trace`.
    pub trace: Option<Priority>,

    /// Priority for `slog::Level::Debug`.
    pub debug: Option<Priority>,

    /// Priority for `slog::Level::Info`.
    pub info: Option<Priority>,

    /// Priority for `slog::Level::Warning`.
    pub warning: Option<Priority>,

    /// Priority for `slog::Level::Error`.
    pub error: Option<Priority>,

    /// Priority for `slog::Level::Critical`.
    pub critical: Option<Priority>,
}

impl PriorityConfig {
    /// Creates a new `PriorityConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// The configured priority for `level`, if any.
    pub fn get(&self, level: slog::Level) -> Option<Priority> {
        let priority = match level {
            slog::Level::Critical => self.critical,
            slog::Level::Error => self.error,
            slog::Level::Warning => self.warning,
            slog::Level::Info => self.info,
            slog::Level::Debug => self.debug,
            slog::Level::Trace => self.trace,
        };

        priority.or(self.all)
    }
}

/// Implements [`Adapter`] based on the settings in a [`MsgFormatConfig`] and
/// [`PriorityConfig`].
///
/// This is the type of [`Adapter`] used by [`JournalDrain`]s constructed from
/// a [`JournalConfig`].
///
/// [`Adapter`]: ../adapter/trait.Adapter.html
/// [`MsgFormatConfig`]: enum.MsgFormatConfig.html
/// [`PriorityConfig`]: struct.PriorityConfig.html
/// [`JournalConfig`]: struct.JournalConfig.html
/// [`JournalDrain`]: ../struct.JournalDrain.html
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConfiguredAdapter {
    format: MsgFormatConfig,
    priority: PriorityConfig,
}

impl Adapter for ConfiguredAdapter {
    fn fmt(&self, f: &mut fmt::Formatter, record: &Record, values: &OwnedKVList) -> slog::Result {
        match self.format {
            MsgFormatConfig::Default => DefaultAdapter.fmt(f, record, values),
            MsgFormatConfig::Kv => KvAdapter.fmt(f, record, values),
        }
    }

    fn priority(&self, record: &Record, values: &OwnedKVList) -> Priority {
        self.priority.get(record.level())
            .unwrap_or_else(|| DefaultAdapter.priority(record, values))
    }
}

impl From<MsgFormatConfig> for ConfiguredAdapter {
    fn from(format: MsgFormatConfig) -> Self {
        ConfiguredAdapter {
            format,
            priority: PriorityConfig::default(),
        }
    }
}

impl From<PriorityConfig> for ConfiguredAdapter {
    fn from(priority: PriorityConfig) -> Self {
        ConfiguredAdapter {
            format: MsgFormatConfig::Default,
            priority,
        }
    }
}

impl From<(MsgFormatConfig, PriorityConfig)> for ConfiguredAdapter {
    fn from((format, priority): (MsgFormatConfig, PriorityConfig)) -> Self {
        ConfiguredAdapter { format, priority }
    }
}
