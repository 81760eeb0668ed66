use libc::{self, c_int};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A journal priority. Not to be confused with [`slog::Level`].
///
/// The journal stores priorities in the `PRIORITY` field using the numeric
/// syslog severity values (`libc::LOG_*`), so conversions are provided to and
/// from `c_int`.
///
/// [`slog::Level`]: https://docs.rs/slog/2/slog/enum.Level.html
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    /// Verbose debugging messages.
    Debug,

    /// Normal informational messages.
    Info,

    /// The situation is not an error, but it probably needs attention.
    Notice,

    /// Warning. Something has probably gone wrong.
    #[cfg_attr(feature = "serde", serde(alias = "warn"))]
    Warning,

    /// Error. Something has definitely gone wrong.
    #[cfg_attr(feature = "serde", serde(alias = "error"))]
    Err,

    /// Critical error.
    #[cfg_attr(feature = "serde", serde(alias = "critical"))]
    Crit,

    /// Something has happened that requires immediate action.
    Alert,

    /// The system is unusable.
    #[cfg_attr(feature = "serde", serde(alias = "panic"))]
    Emerg,
}

impl Priority {
    /// Gets the name of this `Priority`, like `emerg` or `notice`.
    ///
    /// The `FromStr` implementation accepts the same names, but it is
    /// case-insensitive.
    pub fn name(&self) -> &'static str {
        match *self {
            Priority::Emerg => "emerg",
            Priority::Alert => "alert",
            Priority::Crit => "crit",
            Priority::Err => "err",
            Priority::Warning => "warning",
            Priority::Notice => "notice",
            Priority::Info => "info",
            Priority::Debug => "debug",
        }
    }

    /// Converts a `libc::LOG_*` numeric constant to a `Priority` value.
    ///
    /// Returns `None` if the value is not a valid severity.
    pub fn from_int(value: c_int) -> Option<Priority> {
        match value {
            libc::LOG_EMERG => Some(Priority::Emerg),
            libc::LOG_ALERT => Some(Priority::Alert),
            libc::LOG_CRIT => Some(Priority::Crit),
            libc::LOG_ERR => Some(Priority::Err),
            libc::LOG_WARNING => Some(Priority::Warning),
            libc::LOG_NOTICE => Some(Priority::Notice),
            libc::LOG_INFO => Some(Priority::Info),
            libc::LOG_DEBUG => Some(Priority::Debug),
            _ => None,
        }
    }

    /// Converts this `Priority` into its numeric value.
    pub fn into_raw(self) -> c_int {
        self.into()
    }

    /// Maps a [`slog::Level`] to a journal priority.
    ///
    /// Mappings are as follows:
    ///
    /// * `Critical` ⇒ [`Crit`](#variant.Crit)
    /// * `Error` ⇒ [`Err`](#variant.Err)
    /// * `Warning` ⇒ [`Warning`](#variant.Warning)
    /// * `Info` ⇒ [`Info`](#variant.Info)
    /// * `Debug` ⇒ [`Debug`](#variant.Debug)
    /// * `Trace` ⇒ [`Debug`](#variant.Debug)
    ///
    /// This is used by the default implementation of [`Adapter::priority`].
    ///
    /// [`Adapter::priority`]: adapter/trait.Adapter.html#method.priority
    /// [`slog::Level`]: https://docs.rs/slog/2/slog/enum.Level.html
    pub fn from_slog(level: slog::Level) -> Self {
        match level {
            slog::Level::Critical => Priority::Crit,
            slog::Level::Error => Priority::Err,
            slog::Level::Warning => Priority::Warning,
            slog::Level::Info => Priority::Info,
            slog::Level::Debug | slog::Level::Trace => Priority::Debug,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Priority> for c_int {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Emerg => libc::LOG_EMERG,
            Priority::Alert => libc::LOG_ALERT,
            Priority::Crit => libc::LOG_CRIT,
            Priority::Err => libc::LOG_ERR,
            Priority::Warning => libc::LOG_WARNING,
            Priority::Notice => libc::LOG_NOTICE,
            Priority::Info => libc::LOG_INFO,
            Priority::Debug => libc::LOG_DEBUG,
        }
    }
}

impl From<Priority> for libsystemd::logging::Priority {
    fn from(priority: Priority) -> Self {
        use libsystemd::logging::Priority as Sd;

        match priority {
            Priority::Emerg => Sd::Emergency,
            Priority::Alert => Sd::Alert,
            Priority::Crit => Sd::Critical,
            Priority::Err => Sd::Error,
            Priority::Warning => Sd::Warning,
            Priority::Notice => Sd::Notice,
            Priority::Info => Sd::Info,
            Priority::Debug => Sd::Debug,
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownPriorityError;

    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        let s = s.to_ascii_lowercase();

        match &*s {
            "emerg" | "panic" => Ok(Priority::Emerg),
            "alert" => Ok(Priority::Alert),
            "crit" | "critical" => Ok(Priority::Crit),
            "err" | "error" => Ok(Priority::Err),
            "warning" | "warn" => Ok(Priority::Warning),
            "notice" => Ok(Priority::Notice),
            "info" => Ok(Priority::Info),
            "debug" => Ok(Priority::Debug),
            _ => Err(UnknownPriorityError { name: s }),
        }
    }
}

/// Indicates that `<Priority as FromStr>::from_str` was called with an
/// unknown priority name.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unrecognized journal priority name `{name}`")]
pub struct UnknownPriorityError {
    name: String,
}

impl UnknownPriorityError {
    /// The unrecognized priority name.
    pub fn name(&self) -> &str {
        &*self.name
    }
}

#[test]
fn test_priority_from_str() {
    assert_eq!(Priority::from_str("notice"), Ok(Priority::Notice));
    assert_eq!(Priority::from_str("CRITICAL"), Ok(Priority::Crit));
    assert_eq!(Priority::from_str("foobar"), Err(UnknownPriorityError { name: "foobar".to_string() }));
    assert_eq!(Priority::from_str("foobar").unwrap_err().to_string(), "unrecognized journal priority name `foobar`");
}

#[test]
fn test_priority_ordering() {
    assert!(Priority::Debug < Priority::Emerg);
    assert!(Priority::Warning < Priority::Err);
}

#[test]
fn test_from_slog() {
    assert_eq!(Priority::from_slog(slog::Level::Critical), Priority::Crit);
    assert_eq!(Priority::from_slog(slog::Level::Error), Priority::Err);
    assert_eq!(Priority::from_slog(slog::Level::Warning), Priority::Warning);
    assert_eq!(Priority::from_slog(slog::Level::Info), Priority::Info);
    assert_eq!(Priority::from_slog(slog::Level::Debug), Priority::Debug);
    assert_eq!(Priority::from_slog(slog::Level::Trace), Priority::Debug);
}

#[test]
fn test_raw_round_trip() {
    assert_eq!(Priority::Warning.into_raw(), libc::LOG_WARNING);
    assert_eq!(Priority::from_int(libc::LOG_ALERT), Some(Priority::Alert));
    assert_eq!(Priority::from_int(42), None);
}
