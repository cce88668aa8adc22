//! JSON payload builders behind the HTTP routes.

use serde::Serialize;
use thiserror::Error;

use crate::events::ParsedEvent;
use crate::parser::LineParser;
use crate::session::{ingest_lines, IngestReport, Session};
use crate::stats::{calculate_session_stats, MarkupTable};

/// What the routes need besides the request itself.
#[derive(Debug, Clone, Default)]
pub struct ApiContext {
    pub parser: LineParser,
    pub markup: Option<MarkupTable>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub report: IngestReport,
    pub events: Vec<ParsedEvent>,
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "lootledger-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Parse raw chat.log text. Lines are read in order; the result carries the
/// recognised events and the ingest counters.
pub fn parse_payload(body: &str, context: &ApiContext) -> Result<String, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::Validation("request body is empty".to_string()));
    }
    let scratch = Session::started_at("api-parse", 0);
    let (session, report) = ingest_lines(&scratch, body.lines(), &context.parser, None);
    let response = ParseResponse {
        report,
        events: session.events().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

/// Stats for a session posted as JSON.
pub fn stats_payload(body: &str, context: &ApiContext) -> Result<String, ApiError> {
    let session: Session = serde_json::from_str(body)?;
    let in_order = session
        .events()
        .iter()
        .zip(session.events().iter().skip(1))
        .all(|(prev, next)| prev.timestamp <= next.timestamp);
    if !in_order {
        return Err(ApiError::Validation(
            "session events must be in non-decreasing timestamp order".to_string(),
        ));
    }
    let stats = calculate_session_stats(&session, context.markup.as_ref());
    Ok(serde_json::to_string_pretty(&stats)?)
}
