//! CSV loading for the event history export.
//!
//! Each row is `timestamp, message_id, sender, recipient_list[, ...]` where the
//! recipient list is `|`-separated. Rows are expanded into one [`Event`] per
//! recipient so downstream grouping never has to look inside a list.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use summary_core::models::Event;
use summary_core::time_utils::parse_event_timestamp;
use summary_core::{Result, SummaryError};
use tracing::debug;

/// Column holding the Unix epoch milliseconds of the event.
pub const TIMESTAMP_COLUMN: usize = 0;
/// Column holding the message identifier.
pub const MESSAGE_ID_COLUMN: usize = 1;
/// Column holding the sender identifier.
pub const SENDER_COLUMN: usize = 2;
/// Column holding the recipient list.
pub const RECIPIENTS_COLUMN: usize = 3;
/// Separator between identifiers in the recipient list.
pub const RECIPIENT_SEPARATOR: char = '|';

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every event from the CSV file at `path`.
///
/// Columns after the recipient list (topic, mode) are ignored. Events are
/// returned sorted by timestamp; rows with equal timestamps keep file order.
pub fn load_events(path: &Path, has_headers: bool) -> Result<Vec<Event>> {
    let file = std::fs::File::open(path).map_err(|source| SummaryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_events(file, has_headers, path)
}

/// Parse events from any reader. `source` is only used in error messages.
pub fn read_events<R: Read>(reader: R, has_headers: bool, source: &Path) -> Result<Vec<Event>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(reader);

    let mut events: Vec<Event> = Vec::new();
    let mut rows_read = 0u64;
    let mut rows_without_recipients = 0u64;

    for result in csv_reader.records() {
        let record = result.map_err(|e| SummaryError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        rows_read += 1;

        let line = record.position().map(|p| p.line()).unwrap_or(rows_read);
        let expanded = parse_record(&record, line)?;
        if expanded.is_empty() {
            rows_without_recipients += 1;
        }
        events.extend(expanded);
    }

    events.sort_by_key(|e| e.timestamp);

    debug!(
        "File {}: {} rows read, {} without recipients, {} events",
        source.display(),
        rows_read,
        rows_without_recipients,
        events.len(),
    );

    Ok(events)
}

/// Split a recipient list into its non-empty identifiers.
///
/// Identifiers are kept byte for byte; surrounding whitespace is part of the
/// identifier.
pub fn expand_recipients(list: &str) -> impl Iterator<Item = &str> {
    list.split(RECIPIENT_SEPARATOR).filter(|r| !r.is_empty())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Turn one CSV row into its events, one per recipient.
fn parse_record(record: &StringRecord, line: u64) -> Result<Vec<Event>> {
    if record.len() <= RECIPIENTS_COLUMN {
        return Err(SummaryError::MalformedRecord {
            line,
            reason: format!(
                "expected at least {} columns, found {}",
                RECIPIENTS_COLUMN + 1,
                record.len()
            ),
        });
    }

    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let timestamp = parse_event_timestamp(field(TIMESTAMP_COLUMN)).map_err(|e| {
        SummaryError::MalformedRecord {
            line,
            reason: e.to_string(),
        }
    })?;
    let message_id = field(MESSAGE_ID_COLUMN);
    let sender = field(SENDER_COLUMN);

    Ok(expand_recipients(field(RECIPIENTS_COLUMN))
        .map(|recipient| Event {
            timestamp,
            message_id: message_id.to_string(),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
        })
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn parse(lines: &[&str]) -> Result<Vec<Event>> {
        let body = lines.join("\n");
        read_events(body.as_bytes(), false, Path::new("inline.csv"))
    }

    // ── expand_recipients ─────────────────────────────────────────────────────

    #[test]
    fn test_expand_recipients_single() {
        let list: Vec<&str> = expand_recipients("kenneth.lay").collect();
        assert_eq!(list, vec!["kenneth.lay"]);
    }

    #[test]
    fn test_expand_recipients_multiple_and_empty_tokens() {
        let list: Vec<&str> = expand_recipients("a|| b |c|").collect();
        assert_eq!(list, vec!["a", " b ", "c"]);
    }

    #[test]
    fn test_expand_recipients_empty_list() {
        assert_eq!(expand_recipients("").count(), 0);
    }

    // ── read_events ───────────────────────────────────────────────────────────

    #[test]
    fn test_read_events_expands_recipient_list() {
        let events = parse(&["910930020000,<m1>,jeff,sara|mark|tana,email,notes"]).unwrap();

        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.sender == "jeff" && e.message_id == "<m1>"));
        let recipients: Vec<&str> = events.iter().map(|e| e.recipient.as_str()).collect();
        assert_eq!(recipients, vec!["sara", "mark", "tana"]);
    }

    #[test]
    fn test_read_events_ignores_extra_columns_and_allows_ragged_rows() {
        let events = parse(&[
            "910930020000,<m1>,jeff,sara",
            "910930030000,<m2>,sara,jeff,email,notes,extra",
        ])
        .unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_read_events_keeps_identifiers_verbatim() {
        let events = parse(&[
            "910930020000,<m1>, jeff,sara",
            "910930020000,<m2>,jeff,sara ",
        ])
        .unwrap();

        let senders: Vec<&str> = events.iter().map(|e| e.sender.as_str()).collect();
        let recipients: Vec<&str> = events.iter().map(|e| e.recipient.as_str()).collect();
        assert_eq!(senders, vec![" jeff", "jeff"]);
        assert_eq!(recipients, vec!["sara", "sara "]);
    }

    #[test]
    fn test_read_events_padded_timestamp_still_parses() {
        let events = parse(&[" 910930020000 ,<m1>,jeff,sara"]).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp.to_rfc3339(), "1998-11-13T04:07:00+00:00");
    }

    #[test]
    fn test_read_events_sorted_by_timestamp() {
        let events = parse(&[
            "989000000000,<late>,a,b",
            "910930020000,<early>,a,b",
        ])
        .unwrap();
        assert_eq!(events[0].message_id, "<early>");
        assert_eq!(events[1].message_id, "<late>");
    }

    #[test]
    fn test_read_events_row_without_recipients_yields_nothing() {
        let events = parse(&["910930020000,<m1>,jeff,"]).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_read_events_quoted_fields_keep_commas() {
        let events = parse(&["910930020000,<m1>,\"lay, kenneth\",\"skilling, jeff|fastow, andy\""])
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sender, "lay, kenneth");
        assert_eq!(events[1].recipient, "fastow, andy");
    }

    #[test]
    fn test_read_events_short_row_is_malformed() {
        let err = parse(&["910930020000,<m1>,jeff,sara", "910930020000,<m2>"]).unwrap_err();
        match err {
            SummaryError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_events_bad_timestamp_is_malformed() {
        let err = parse(&["soon,<m1>,jeff,sara"]).unwrap_err();
        assert!(matches!(err, SummaryError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_read_events_with_header_row() {
        let body = "time,message_id,sender,recipients\n910930020000,<m1>,jeff,sara\n";
        let events = read_events(body.as_bytes(), true, Path::new("inline.csv")).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_read_events_empty_input() {
        let events = read_events("".as_bytes(), false, Path::new("inline.csv")).unwrap();
        assert!(events.is_empty());
    }

    // ── load_events ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_events_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "events.csv",
            &[
                "910930020000,<m1>,jeff,sara|mark,email,notes",
                "910930030000,<m2>,sara,jeff,email,notes",
            ],
        );

        let events = load_events(&path, false).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_load_events_missing_file() {
        let err = load_events(Path::new("/tmp/does-not-exist-summary-test.csv"), false).unwrap_err();
        assert!(matches!(err, SummaryError::FileRead { .. }));
    }
}
