#![cfg(target_os = "linux")]

#[macro_use]
extern crate slog;

use slog::{Logger, Record};
use slog_extended_journal::*;
use std::io;
use std::sync::{Arc, Mutex};

/// Shared log of everything a closure sink was sent.
type Sent = Arc<Mutex<Vec<JournalEntry>>>;

fn recording_logger(args: Vec<Arg>, options: Options) -> (Logger, Sent, Arc<Mutex<Vec<String>>>) {
    let sent = Sent::default();
    let errors = Arc::new(Mutex::new(Vec::new()));

    let drain = {
        let sent = sent.clone();
        let errors = errors.clone();

        JournalBuilder::from_args(args, options)
            .expect("invalid arguments")
            .sink(move |entry: &JournalEntry| -> io::Result<()> {
                sent.lock().unwrap().push(entry.clone());
                Ok(())
            })
            .error_handler(move |error: &EmitError, _: &Record| {
                errors.lock().unwrap().push(error.to_string());
            })
            .build()
            .expect("couldn't build drain")
    };

    (Logger::root(drain, o!()), sent, errors)
}

fn fields(pairs: &[(&str, &str)]) -> Options {
    pairs.iter().map(|&(k, v)| (k.to_string(), Arg::from(v))).collect()
}

#[test]
fn integration_test() {
    let (logger, sent, errors) = recording_logger(
        vec![Arg::from("info"), Arg::Map(fields(&[("SYSLOG_IDENTIFIER", "my-app")]))],
        Options::new(),
    );

    debug!(logger, "below the minimum level");
    info!(logger, "Hello, journal!"; "JOURNAL_CUSTOM_FIELD" => "abc", "key" => "value");

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);

    let entry = &sent[0];
    assert_eq!(entry.message(), "Hello, journal!");
    assert_eq!(entry.priority(), Priority::Info);
    assert_eq!(entry.field("SYSLOG_IDENTIFIER"), Some("my-app"));
    assert_eq!(entry.field("CUSTOM_FIELD"), Some("abc"));
    assert_eq!(entry.field("LOGGER"), Some(module_path!()));
    assert_eq!(entry.field("CODE_FILE"), Some(file!()));
    assert_eq!(entry.field("MESSAGE_ID"), None);

    let names: Vec<&str> = entry.fields().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["CODE_FILE", "CODE_FUNC", "CODE_LINE", "CUSTOM_FIELD", "LOGGER", "SYSLOG_IDENTIFIER", "THREAD_NAME"]
    );

    assert!(errors.lock().unwrap().is_empty());
}

#[test]
fn integration_test_with_failing_format() {
    let sent = Sent::default();
    let reports = Arc::new(Mutex::new(0usize));

    let drain = {
        let sent = sent.clone();
        let reports = reports.clone();

        JournalBuilder::new()
            .format(|_, _, _| Err(slog::Error::Other))
            .sink(move |entry: &JournalEntry| -> io::Result<()> {
                sent.lock().unwrap().push(entry.clone());
                Ok(())
            })
            .error_handler(move |_: &EmitError, _: &Record| {
                *reports.lock().unwrap() += 1;
            })
            .build()
            .expect("couldn't build drain")
    };

    let logger = Logger::root(drain, o!());
    error!(logger, "this can't be formatted");

    assert!(sent.lock().unwrap().is_empty());
    assert_eq!(*reports.lock().unwrap(), 1);
}

#[test]
fn integration_test_entry_without_sending() {
    let drain = JournalDrain::builder()
        .syslog_identifier("preview")
        .build()
        .expect("couldn't build drain");

    let entry = drain
        .entry(
            &record!(slog::Level::Error, "billing", &format_args!("charge failed"), b!("JOURNAL_ORDER" => 1234)),
            &o!("MESSAGE_ID" => "0e7a9f6c1d2b4c3a8e5f6a7b8c9d0e1f").into(),
        )
        .expect("mapping failed");

    assert_eq!(entry.message(), "charge failed");
    assert_eq!(entry.priority(), Priority::Err);
    assert_eq!(entry.field("LOGGER"), Some("billing"));
    assert_eq!(entry.field("ORDER"), Some("1234"));
    assert_eq!(entry.field("MESSAGE_ID"), Some("0e7a9f6c1d2b4c3a8e5f6a7b8c9d0e1f"));
    assert_eq!(entry.field("SYSLOG_IDENTIFIER"), Some("preview"));
}
