//! Splits a chat.log line into header and message.
//!
//! Lines look like `2024-01-15 12:34:56 [System] [] You inflicted 45.2 points of damage`.

use chrono::NaiveDateTime;

const HEADER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header fields and message body of one chat.log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// Header time in ms since the unix epoch (log times are treated as UTC).
    pub timestamp: Option<i64>,
    pub channel: &'a str,
    pub sender: &'a str,
    pub message: &'a str,
}

/// Split a full chat.log line. Returns None when the `[Channel] [Sender]`
/// header is missing.
pub fn split_log_line(line: &str) -> Option<LogLine<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let channel_open = line.find('[')?;
    let header_time = line[..channel_open].trim();

    let after_open = &line[channel_open + 1..];
    let channel_close = after_open.find(']')?;
    let channel = after_open[..channel_close].trim();

    let rest = after_open[channel_close + 1..].trim_start();
    let rest = rest.strip_prefix('[')?;
    let sender_close = rest.find(']')?;
    let sender = rest[..sender_close].trim();
    let message = rest[sender_close + 1..].trim();

    Some(LogLine {
        timestamp: parse_log_timestamp(header_time),
        channel,
        sender,
        message,
    })
}

/// Parse a `YYYY-MM-DD HH:MM:SS` header time into epoch milliseconds.
pub fn parse_log_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(text, HEADER_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis())
}
