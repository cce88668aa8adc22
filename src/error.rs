//! Errors of the outer surfaces (files, decoding, export, server).
//!
//! The parser, cost model, session log and aggregator are total and never
//! produce these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid loadout: {0}")]
    InvalidLoadout(String),
}

impl LedgerError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
