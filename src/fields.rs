use crate::error::EmitError;
use crate::priority::Priority;
use slog::{self, OwnedKVList, Record, KV};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::thread;

/// Key-value pairs whose key starts with this prefix are sent as journal
/// fields, named by the rest of the key.
///
/// ```
/// # #[macro_use] extern crate slog;
/// # fn main() {
/// # let logger = slog::Logger::root(slog::Discard, o!());
/// // Sent with the journal field `CUSTOM_FIELD=abc`.
/// info!(logger, "request handled"; "JOURNAL_CUSTOM_FIELD" => "abc");
/// # }
/// ```
pub const JOURNAL_KEY_PREFIX: &str = "JOURNAL_";

/// The key-value pair with this key, if any, becomes the `MESSAGE_ID` field.
pub const MESSAGE_ID_KEY: &str = "MESSAGE_ID";

/// Longest field name journald accepts.
const MAX_FIELD_NAME_LEN: usize = 64;

/// Checks that `name` is acceptable as a journal field name.
///
/// Valid names are 1 to 64 characters of uppercase ASCII letters, digits and
/// `_`, and start with neither `_` nor a digit. Names starting with `_` are
/// reserved for fields the journal itself adds.
pub fn is_valid_field_name(name: &str) -> bool {
    let bytes = name.as_bytes();

    match bytes.first() {
        None | Some(b'_') => return false,
        Some(b) if b.is_ascii_digit() => return false,
        _ => {}
    }

    bytes.len() <= MAX_FIELD_NAME_LEN
        && bytes.iter().all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// A journal entry, ready to be handed to a [`JournalSink`].
///
/// `MESSAGE` and `PRIORITY` are kept apart from the other fields, so
/// [`fields`] never yields them.
///
/// [`fields`]: #method.fields
/// [`JournalSink`]: sink/trait.JournalSink.html
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JournalEntry {
    message: String,
    priority: Priority,
    fields: BTreeMap<String, String>,
    skipped: Vec<String>,
}

impl JournalEntry {
    /// Creates an entry. Any `MESSAGE` or `PRIORITY` key in `fields` is
    /// discarded in favor of `message` and `priority`.
    pub fn new(message: String, priority: Priority, mut fields: BTreeMap<String, String>) -> Self {
        fields.remove("MESSAGE");
        fields.remove("PRIORITY");

        JournalEntry {
            message,
            priority,
            fields,
            skipped: Vec::new(),
        }
    }

    /// The `MESSAGE` field.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The `PRIORITY` field.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Looks up a field other than `MESSAGE` and `PRIORITY`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All fields other than `MESSAGE` and `PRIORITY`, sorted by name.
    pub fn fields(&self) -> Fields {
        Fields(self.fields.iter())
    }

    /// Prefixed names that were left out because they aren't valid field
    /// names, with the prefix removed.
    pub fn skipped_fields(&self) -> &[String] {
        &self.skipped
    }
}

/// Iterator over the fields of a [`JournalEntry`].
///
/// [`JournalEntry`]: struct.JournalEntry.html
#[derive(Clone, Debug)]
pub struct Fields<'a>(btree_map::Iter<'a, String, String>);

impl<'a> Iterator for Fields<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// Builds the journal entry for `record`.
///
/// Fields are layered in this order, later layers replacing earlier ones:
///
/// 1. `defaults`, the drain's configured fields;
/// 2. key-value pairs named with [`JOURNAL_KEY_PREFIX`], prefix removed,
///    logger values first and record values second;
/// 3. `LOGGER`, `THREAD_NAME`, `CODE_FILE`, `CODE_LINE`, `CODE_FUNC`, and
///    `MESSAGE_ID` if the record or logger has a `MESSAGE_ID` value.
///
/// A prefixed key that does not leave a valid field name (see
/// [`is_valid_field_name`]) is left out, and listed in
/// [`JournalEntry::skipped_fields`]. The rest of the entry is kept.
///
/// # Errors
///
/// Fails if serializing a value fails.
///
/// [`JournalEntry::skipped_fields`]: struct.JournalEntry.html#method.skipped_fields
///
/// [`is_valid_field_name`]: fn.is_valid_field_name.html
/// [`JOURNAL_KEY_PREFIX`]: constant.JOURNAL_KEY_PREFIX.html
pub fn journal_entry(
    message: String,
    priority: Priority,
    record: &Record,
    values: &OwnedKVList,
    defaults: &BTreeMap<String, String>,
) -> Result<JournalEntry, EmitError> {
    let mut collector = FieldCollector::default();
    values.serialize(record, &mut collector).map_err(EmitError::Format)?;
    record.kv().serialize(record, &mut collector).map_err(EmitError::Format)?;

    let mut fields = defaults.clone();
    let mut skipped = Vec::new();

    for (name, value) in collector.extra {
        if is_valid_field_name(&name) {
            fields.insert(name, value);
        } else {
            skipped.push(name);
        }
    }

    fields.insert("LOGGER".to_string(), logger_name(record).to_string());
    fields.insert("THREAD_NAME".to_string(), thread_name());
    fields.insert("CODE_FILE".to_string(), record.file().to_string());
    fields.insert("CODE_LINE".to_string(), record.line().to_string());
    fields.insert("CODE_FUNC".to_string(), record.function().to_string());

    if let Some(message_id) = collector.message_id {
        fields.insert(MESSAGE_ID_KEY.to_string(), message_id);
    }

    let mut entry = JournalEntry::new(message, priority, fields);
    entry.skipped = skipped;
    Ok(entry)
}

/// The record's tag, or its module path if the tag is empty.
fn logger_name<'a>(record: &'a Record) -> &'a str {
    match record.tag() {
        "" => record.module(),
        tag => tag,
    }
}

fn thread_name() -> String {
    let current = thread::current();

    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}

/// Picks the journal-bound values out of a record's key-value pairs.
#[derive(Default)]
struct FieldCollector {
    extra: BTreeMap<String, String>,
    message_id: Option<String>,
}

impl slog::Serializer for FieldCollector {
    fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
        let key: &str = &key;

        if key == MESSAGE_ID_KEY {
            self.message_id = Some(fmt::format(*val));
        } else if key.starts_with(JOURNAL_KEY_PREFIX) {
            self.extra.insert(key[JOURNAL_KEY_PREFIX.len()..].to_string(), fmt::format(*val));
        }

        Ok(())
    }
}

/// Whether `key` is forwarded as a journal field rather than left in the
/// message.
pub(crate) fn is_journal_key(key: &str) -> bool {
    key == MESSAGE_ID_KEY || key.starts_with(JOURNAL_KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::Level;

    fn defaults(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn field_names() {
        assert!(is_valid_field_name("CUSTOM_FIELD"));
        assert!(is_valid_field_name("SYSLOG_IDENTIFIER"));
        assert!(is_valid_field_name("A1"));
        assert!(is_valid_field_name(&"X".repeat(64)));

        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("_HIDDEN"));
        assert!(!is_valid_field_name("1ST"));
        assert!(!is_valid_field_name("lower"));
        assert!(!is_valid_field_name("HAS SPACE"));
        assert!(!is_valid_field_name("DASH-ED"));
        assert!(!is_valid_field_name(&"X".repeat(65)));
    }

    #[test]
    fn standard_fields_copy_the_record() {
        let entry = journal_entry(
            "hello".to_string(),
            Priority::Info,
            &record!(Level::Info, "", &format_args!("hello"), b!()),
            &o!().into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.message(), "hello");
        assert_eq!(entry.priority(), Priority::Info);
        assert_eq!(entry.field("LOGGER"), Some(module_path!()));
        assert_eq!(entry.field("CODE_FILE"), Some(file!()));
        assert_eq!(entry.field("CODE_FUNC"), Some(""));
        assert_eq!(entry.field("THREAD_NAME"), thread::current().name());
        assert!(entry.field("CODE_LINE").expect("no CODE_LINE").parse::<u32>().is_ok());
        assert_eq!(entry.field("MESSAGE_ID"), None);
        assert_eq!(entry.field("MESSAGE"), None);
        assert_eq!(entry.field("PRIORITY"), None);
    }

    #[test]
    fn tag_names_the_logger() {
        let entry = journal_entry(
            String::new(),
            Priority::Info,
            &record!(Level::Info, "audit", &format_args!(""), b!()),
            &o!().into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.field("LOGGER"), Some("audit"));
    }

    #[test]
    fn prefixed_keys_become_fields() {
        let entry = journal_entry(
            String::new(),
            Priority::Info,
            &record!(
                Level::Info,
                "",
                &format_args!(""),
                b!("JOURNAL_CUSTOM_FIELD" => "abc", "JOURNAL_COUNT" => 3, "plain" => "ignored")
            ),
            &o!("JOURNAL_SERVICE" => "api").into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.field("CUSTOM_FIELD"), Some("abc"));
        assert_eq!(entry.field("COUNT"), Some("3"));
        assert_eq!(entry.field("SERVICE"), Some("api"));
        assert_eq!(entry.field("plain"), None);
        assert_eq!(entry.field("JOURNAL_CUSTOM_FIELD"), None);
    }

    #[test]
    fn prefix_removal_keeps_case() {
        let entry = journal_entry(
            "kept".to_string(),
            Priority::Info,
            &record!(Level::Info, "", &format_args!("kept"), b!("JOURNAL_MixedCase" => 1, "JOURNAL_UNIT" => "web")),
            &o!().into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.message(), "kept");
        assert_eq!(entry.field("UNIT"), Some("web"));
        assert_eq!(entry.field("MixedCase"), None);
        assert_eq!(entry.field("MIXEDCASE"), None);
        assert_eq!(entry.skipped_fields(), &["MixedCase".to_string()]);
    }

    #[test]
    fn bare_prefix_is_skipped() {
        let entry = journal_entry(
            String::new(),
            Priority::Info,
            &record!(Level::Info, "", &format_args!(""), b!("JOURNAL_" => 1)),
            &o!("JOURNAL__HIDDEN" => 2).into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.field(""), None);
        assert_eq!(entry.field("_HIDDEN"), None);
        assert_eq!(entry.field("LOGGER"), Some(module_path!()));
        assert_eq!(entry.skipped_fields(), &["".to_string(), "_HIDDEN".to_string()]);
    }

    #[test]
    fn layering() {
        let entry = journal_entry(
            "real message".to_string(),
            Priority::Err,
            &record!(
                Level::Error,
                "",
                &format_args!("real message"),
                b!(
                    "JOURNAL_SYSLOG_IDENTIFIER" => "per-record",
                    "JOURNAL_LOGGER" => "spoofed",
                    "JOURNAL_MESSAGE" => "spoofed",
                    "JOURNAL_PRIORITY" => "0"
                )
            ),
            &o!().into(),
            &defaults(&[("SYSLOG_IDENTIFIER", "default"), ("UNIT", "web")]),
        ).expect("mapping failed");

        assert_eq!(entry.field("SYSLOG_IDENTIFIER"), Some("per-record"));
        assert_eq!(entry.field("UNIT"), Some("web"));
        assert_eq!(entry.field("LOGGER"), Some(module_path!()));
        assert_eq!(entry.message(), "real message");
        assert_eq!(entry.priority(), Priority::Err);
        assert!(entry.fields().all(|(name, _)| name != "MESSAGE" && name != "PRIORITY"));
    }

    #[test]
    fn message_id() {
        let entry = journal_entry(
            String::new(),
            Priority::Notice,
            &record!(Level::Info, "", &format_args!(""), b!("MESSAGE_ID" => "fc2e22bc6ee647b6b90729ab34a250b1")),
            &o!().into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.field("MESSAGE_ID"), Some("fc2e22bc6ee647b6b90729ab34a250b1"));
    }

    #[test]
    fn record_values_override_logger_values() {
        let entry = journal_entry(
            String::new(),
            Priority::Info,
            &record!(Level::Info, "", &format_args!(""), b!("JOURNAL_REQUEST" => "record")),
            &o!("JOURNAL_REQUEST" => "logger").into(),
            &BTreeMap::new(),
        ).expect("mapping failed");

        assert_eq!(entry.field("REQUEST"), Some("record"));
    }
}
