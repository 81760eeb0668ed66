#[macro_use]
extern crate slog;
extern crate slog_extended_journal;

use slog_extended_journal::JournalBuilder;
use slog::Level;

fn main() {
    let journal = JournalBuilder::new()
        .level(Level::Info)
        .syslog_identifier("journal-app")
        .build()
        .expect("invalid journal settings");
    let root = slog::Logger::root(journal, o!());

    info!(root, "Starting");

    let log = root.new(o!("JOURNAL_BUILD_ID" => "8dfljdf", "who" => "slog-extended-journal demo"));

    info!(log, "Message"; "JOURNAL_X" => -1, "JOURNAL_Y" => 2);
    error!(log, "Error"; "MESSAGE_ID" => "b07a249cd024414a82dd00cd181378ff");
}
