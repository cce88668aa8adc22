//! Hunting session: an append-only event log with frozen loadout costs.
//!
//! Every update returns a new [`Session`]; a caller holding an older value
//! never observes later appends. The application owns the single "current
//! session" slot and must serialise appends (one writer).

pub mod ingest;
pub mod log;
pub mod store;

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::ParsedEvent;
use crate::loadout::Loadout;

pub use ingest::{ingest_lines, IngestReport};
pub use log::EventLog;
pub use store::{SessionStore, DEFAULT_SESSIONS_DIR};

/// Cost of a loadout as it was the first time the session used it.
/// Never changes afterwards, whatever happens to the loadout definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutSnapshot {
    pub loadout_id: String,
    pub name: String,
    pub cost_per_shot: f64,
    pub armor_decay_per_hit: f64,
    pub captured_at: i64,
}

impl LoadoutSnapshot {
    pub fn capture(loadout: &Loadout, captured_at: i64) -> Self {
        Self {
            loadout_id: loadout.id.clone(),
            name: loadout.name.clone(),
            cost_per_shot: loadout.cost_per_shot(),
            armor_decay_per_hit: loadout.armor_decay_per_hit(),
            captured_at,
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// All times are ms since the unix epoch; durations are ms.
    pub started_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<i64>,
    #[serde(default)]
    pub total_paused_time: i64,
    #[serde(default)]
    events: EventLog,
    #[serde(default)]
    loadout_snapshots: BTreeMap<String, LoadoutSnapshot>,
    /// Cost per shot for events without a tagged loadout snapshot.
    #[serde(default)]
    pub manual_cost_per_shot: f64,
    #[serde(default)]
    pub manual_armor_cost: f64,
    #[serde(default)]
    pub manual_fap_cost: f64,
    #[serde(default)]
    pub manual_misc_cost: f64,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self::started_at(name, now_millis())
    }

    pub fn started_at(name: impl Into<String>, started_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            tags: Vec::new(),
            started_at,
            ended_at: None,
            paused_at: None,
            total_paused_time: 0,
            events: EventLog::new(),
            loadout_snapshots: BTreeMap::new(),
            manual_cost_per_shot: 0.0,
            manual_armor_cost: 0.0,
            manual_fap_cost: 0.0,
            manual_misc_cost: 0.0,
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn loadout_snapshots(&self) -> &BTreeMap<String, LoadoutSnapshot> {
        &self.loadout_snapshots
    }

    pub fn snapshot(&self, loadout_id: &str) -> Option<&LoadoutSnapshot> {
        self.loadout_snapshots.get(loadout_id)
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Append `event`, tagged with the active loadout's id.
    ///
    /// The first time a loadout id is seen its cost is captured into a
    /// [`LoadoutSnapshot`]; later appends with the same id reuse it even if
    /// the loadout was edited since. Callers must append in non-decreasing
    /// timestamp order.
    pub fn append(&self, event: ParsedEvent, active_loadout: Option<&Loadout>) -> Session {
        let mut next = self.clone();
        next.append_in_place(event, active_loadout);
        next
    }

    /// Same as [`Session::append`] for a session value the caller owns
    /// exclusively, e.g. while replaying a log.
    pub fn append_in_place(&mut self, mut event: ParsedEvent, active_loadout: Option<&Loadout>) {
        event.loadout_id = active_loadout.map(|loadout| loadout.id.clone());
        if let Some(loadout) = active_loadout {
            if !self.loadout_snapshots.contains_key(&loadout.id) {
                self.loadout_snapshots.insert(
                    loadout.id.clone(),
                    LoadoutSnapshot::capture(loadout, event.timestamp),
                );
            }
        }
        self.events.push(event);
    }

    /// Mark the session ended at `now`. Calling again moves the end time.
    pub fn end_session(&self, now: i64) -> Session {
        let mut next = self.resume(now);
        next.ended_at = Some(now);
        next
    }

    pub fn end_session_now(&self) -> Session {
        self.end_session(now_millis())
    }

    /// Start a pause. No-op when already paused or ended.
    pub fn pause(&self, now: i64) -> Session {
        let mut next = self.clone();
        if next.paused_at.is_none() && next.ended_at.is_none() {
            next.paused_at = Some(now);
        }
        next
    }

    /// End the current pause, adding its length to `total_paused_time`.
    pub fn resume(&self, now: i64) -> Session {
        let mut next = self.clone();
        if let Some(paused_at) = next.paused_at.take() {
            next.total_paused_time += (now - paused_at).max(0);
        }
        next
    }

    /// Active hunting time in ms at `now`: wall time minus pauses (including
    /// a pause still in progress), never negative.
    pub fn duration_ms(&self, now: i64) -> i64 {
        let end = self.ended_at.unwrap_or(now);
        let ongoing_pause = self
            .paused_at
            .map(|paused_at| (end - paused_at).max(0))
            .unwrap_or(0);
        (end - self.started_at - self.total_paused_time - ongoing_pause).max(0)
    }
}
