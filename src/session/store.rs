//! JSON files for saved sessions: one `<id>.json` per session.

use std::fs;
use std::path::{Path, PathBuf};

use super::Session;
use crate::error::LedgerError;

pub const DEFAULT_SESSIONS_DIR: &str = "data/sessions";

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    pub fn save(&self, session: &Session) -> Result<PathBuf, LedgerError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| LedgerError::io(self.dir.display().to_string(), err))?;
        let path = self.path_for(&session.id);
        let payload = serde_json::to_string_pretty(session)?;
        fs::write(&path, payload).map_err(|err| LedgerError::io(path.display().to_string(), err))?;
        tracing::info!(
            session_id = %session.id,
            events = session.events().len(),
            path = %path.display(),
            "saved session"
        );
        Ok(path)
    }

    pub fn load(&self, session_id: &str) -> Result<Session, LedgerError> {
        let path = self.path_for(session_id);
        if !path.is_file() {
            return Err(LedgerError::NotFound(format!("session '{session_id}'")));
        }
        load_session_file(&path)
    }

    /// Every readable session in the directory, oldest start first.
    /// Unreadable files are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<Session>, LedgerError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) if !self.dir.exists() => return Ok(Vec::new()),
            Err(err) => return Err(LedgerError::io(self.dir.display().to_string(), err)),
        };

        let mut sessions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| LedgerError::io(self.dir.display().to_string(), err))?;
            let path = entry.path();
            let is_json = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if !path.is_file() || !is_json {
                continue;
            }
            match load_session_file(&path) {
                Ok(session) => sessions.push(session),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable session file");
                }
            }
        }
        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.id.cmp(&b.id)));
        Ok(sessions)
    }
}

pub fn load_session_file(path: impl AsRef<Path>) -> Result<Session, LedgerError> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).map_err(|err| LedgerError::io(path.display().to_string(), err))?;
    Ok(serde_json::from_str(&raw)?)
}
