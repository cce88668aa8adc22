//! Feeding raw chat.log lines into a session.

use serde::Serialize;

use super::Session;
use crate::loadout::Loadout;
use crate::parser::{split_log_line, LineParser};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub lines_read: usize,
    pub events_appended: usize,
    pub lines_dropped: usize,
    /// Lines whose header time went backwards and was clamped forward.
    pub timestamps_clamped: usize,
}

/// Parse `lines` and append every recognised event to a copy of `session`.
///
/// Each event takes its line's header time. Lines without a readable header
/// time reuse the previous event's time, and a header time earlier than the
/// previous event is clamped up to it, so the log stays non-decreasing.
pub fn ingest_lines<I, S>(
    session: &Session,
    lines: I,
    parser: &LineParser,
    active_loadout: Option<&Loadout>,
) -> (Session, IngestReport)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut next = session.clone();
    let mut report = IngestReport::default();
    let mut last_timestamp = next
        .events()
        .last()
        .map(|event| event.timestamp)
        .unwrap_or(next.started_at);

    for line in lines {
        let line = line.as_ref();
        report.lines_read += 1;

        let header_time = split_log_line(line).and_then(|parsed| parsed.timestamp);
        let timestamp = match header_time {
            Some(time) if time < last_timestamp => {
                report.timestamps_clamped += 1;
                last_timestamp
            }
            Some(time) => time,
            None => last_timestamp,
        };

        match parser.parse(timestamp, line) {
            Some(event) => {
                next.append_in_place(event, active_loadout);
                last_timestamp = timestamp;
                report.events_appended += 1;
            }
            None => report.lines_dropped += 1,
        }
    }

    tracing::debug!(
        session_id = %next.id,
        lines_read = report.lines_read,
        events_appended = report.events_appended,
        lines_dropped = report.lines_dropped,
        timestamps_clamped = report.timestamps_clamped,
        "ingested chat log lines"
    );
    (next, report)
}
