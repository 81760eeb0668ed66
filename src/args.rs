//! Positional and keyword constructor arguments.
//!
//! File-based configuration can only hand a drain an ordered list of
//! positional arguments, so keyword options (most importantly, default
//! journal fields) travel as a trailing table in that list. [`normalize_args`]
//! turns such a list back into positionals and options.

use crate::error::BuildError;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keyword options, keyed by name.
pub type Options = BTreeMap<String, Arg>;

/// A single constructor argument.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Arg {
    /// A boolean.
    Bool(bool),

    /// An integer.
    Int(i64),

    /// A floating-point number.
    Float(f64),

    /// A string.
    Str(String),

    /// A table of keyword options.
    Map(Options),
}

impl Arg {
    /// Interprets this argument as a minimum log level.
    ///
    /// Strings are parsed with [`parse_level`]. Integers are slog's numeric
    /// levels, `1` (critical) through `6` (trace).
    ///
    /// [`parse_level`]: fn.parse_level.html
    pub fn to_level(&self) -> Result<slog::Level, BuildError> {
        let level = match *self {
            Arg::Str(ref name) => parse_level(name),
            Arg::Int(n) if n > 0 => slog::Level::from_usize(n as usize),
            _ => None,
        };

        level.ok_or_else(|| BuildError::InvalidLevel(self.to_string()))
    }

    /// Renders a scalar argument as a journal field value.
    ///
    /// `name` is only used for the error.
    pub fn to_field_value(&self, name: &str) -> Result<String, BuildError> {
        match *self {
            Arg::Map(_) => Err(BuildError::InvalidFieldValue { name: name.to_string() }),
            _ => Ok(self.to_string()),
        }
    }
}

impl Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Float(n) => write!(f, "{}", n),
            Arg::Str(ref s) => f.write_str(s),
            Arg::Map(ref map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl<'a> From<&'a str> for Arg {
    fn from(s: &'a str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Float(n)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<Options> for Arg {
    fn from(map: Options) -> Self {
        Arg::Map(map)
    }
}

impl From<slog::Level> for Arg {
    fn from(level: slog::Level) -> Self {
        Arg::Str(level_name(level).to_string())
    }
}

/// Splits a trailing table off the positional arguments.
///
/// If the last element of `args` is an [`Arg::Map`], it is removed and its
/// entries are merged into `options`. Any other argument list is returned
/// unchanged, as is `options`.
///
/// # Precedence
///
/// When the trailing table and `options` have a key in common, the value
/// from the trailing table wins.
///
/// # Example
///
/// ```
/// use slog_extended_journal::{normalize_args, Arg, Options};
///
/// let mut fields = Options::new();
/// fields.insert("SYSLOG_IDENTIFIER".to_string(), "my-app".into());
///
/// let (args, options) = normalize_args(vec!["info".into(), fields.into()], Options::new());
///
/// assert_eq!(args, vec![Arg::from("info")]);
/// assert_eq!(options["SYSLOG_IDENTIFIER"], Arg::from("my-app"));
/// ```
///
/// [`Arg::Map`]: enum.Arg.html#variant.Map
pub fn normalize_args(mut args: Vec<Arg>, mut options: Options) -> (Vec<Arg>, Options) {
    if let Some(&Arg::Map(_)) = args.last() {
        if let Some(Arg::Map(trailing)) = args.pop() {
            options.extend(trailing);
        }
    }

    (args, options)
}

/// Parses a slog level name, ignoring case.
///
/// Full names (`critical`, `error`, `warning`, `info`, `debug`, `trace`),
/// slog's four-letter short names, and the aliases `crit`, `err` and `warn`
/// are accepted.
pub fn parse_level(name: &str) -> Option<slog::Level> {
    match &*name.to_ascii_lowercase() {
        "critical" | "crit" => Some(slog::Level::Critical),
        "error" | "err" | "erro" => Some(slog::Level::Error),
        "warning" | "warn" => Some(slog::Level::Warning),
        "info" => Some(slog::Level::Info),
        "debug" | "debg" => Some(slog::Level::Debug),
        "trace" | "trce" => Some(slog::Level::Trace),
        _ => None,
    }
}

fn level_name(level: slog::Level) -> &'static str {
    match level {
        slog::Level::Critical => "critical",
        slog::Level::Error => "error",
        slog::Level::Warning => "warning",
        slog::Level::Info => "info",
        slog::Level::Debug => "debug",
        slog::Level::Trace => "trace",
    }
}
