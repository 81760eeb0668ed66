//! Slog [`Drain`] that sends logs to the systemd journal, with structured
//! fields. Linux only. Entries are written with [`libsystemd`].
//!
//! [`Drain`]: https://docs.rs/slog/2/slog/trait.Drain.html
//! [`libsystemd`]: https://docs.rs/libsystemd
//!
//! # Example
//!
//! ```
//! #[macro_use] extern crate slog;
//! # extern crate slog_extended_journal;
//!
//! use slog::Logger;
//! use slog_extended_journal::JournalBuilder;
//!
//! # fn main() {
//! let drain = JournalBuilder::new()
//!     .level(slog::Level::Info)
//!     .syslog_identifier("example-app")
//!     .field("DEPLOYMENT", "staging")
//!     .build()
//!     .expect("invalid journal settings");
//!
//! let logger = Logger::root(drain, o!());
//!
//! info!(logger, "Hello, journal!"; "JOURNAL_REQUEST_ID" => 42, "MESSAGE_ID" => "8d45620c1a4348dbb17410da57c60c66");
//! # }
//! ```
//!
//! This sends an entry with `MESSAGE=Hello, journal!`, `PRIORITY=6`,
//! `SYSLOG_IDENTIFIER=example-app`, `DEPLOYMENT=staging`, `REQUEST_ID=42`,
//! `MESSAGE_ID=8d45620c1a4348dbb17410da57c60c66`, and the `LOGGER`,
//! `THREAD_NAME` and `CODE_*` fields. See [`JournalDrain`] for the details.
//!
//! [`JournalDrain`]: struct.JournalDrain.html
//!
//! # Constructor arguments
//!
//! Configuration formats that describe a drain as a list of arguments can't
//! pass keyword options. [`JournalBuilder::from_args`] therefore accepts a
//! table as the last positional argument and treats its entries as options,
//! which makes `["info", { SYSLOG_IDENTIFIER = "my-cool-app" }]` a complete
//! drain description. See [`normalize_args`].
//!
//! [`JournalBuilder::from_args`]: struct.JournalBuilder.html#method.from_args
//! [`normalize_args`]: fn.normalize_args.html
//!
//! # Cargo features
//!
//! With the Cargo feature `serde` (enabled by default), drain settings can be
//! loaded from a configuration file using [`config::JournalConfig`].
//!
//! [`config::JournalConfig`]: config/struct.JournalConfig.html
//!
//! # Threads
//!
//! Nothing is buffered and no locks are taken: each record is formatted and
//! sent on the thread that logs it. The `THREAD_NAME` field names that
//! thread, which is only the thread that called the logging macro if the
//! drain is not behind an asynchronous drain such as `slog_async::Async`.

#![cfg(target_os = "linux")]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

#[cfg_attr(test, macro_use)]
extern crate slog;

pub mod adapter;

mod args;
pub use args::*;

mod builder;
pub use builder::*;

#[cfg(feature = "serde")]
pub mod config;

mod drain;
pub use drain::*;

mod error;
pub use error::*;

mod fields;
pub use fields::*;

#[cfg(test)]
mod mock;

mod priority;
pub use priority::*;

pub mod sink;
