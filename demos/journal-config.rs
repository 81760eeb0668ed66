#[macro_use]
extern crate slog;
extern crate slog_extended_journal;
extern crate toml;

use slog_extended_journal::config::JournalConfig;

const CONFIG: &str = r#"
args = ["info", { SYSLOG_IDENTIFIER = "journal-config-demo" }]
format = "kv"

[priority]
info = "notice"
"#;

fn main() {
    let config: JournalConfig = toml::from_str(CONFIG).expect("couldn't parse configuration");
    let root = slog::Logger::root(config.build().expect("invalid journal settings"), o!());

    info!(root, "Configured from a file"; "source" => "demos/journal-config.rs", "JOURNAL_DEMO" => "yes");
}
