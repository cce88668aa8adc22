//! Statistics for many saved sessions at once.
//!
//! Each session is aggregated independently, so the work splits one session
//! per Rayon task. Results keep the input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::pool::WorkerPool;
use crate::session::Session;
use crate::stats::{calculate_session_stats_at, ratio, MarkupTable, SessionStats};

/// Totals across a set of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub sessions: usize,
    pub events: usize,
    /// Seconds.
    pub duration: f64,
    pub shots: u64,
    pub kills: u64,
    pub total_spend: f64,
    pub total_cost: f64,
    pub loot_value: f64,
    pub net_profit: f64,
    pub return_rate: f64,
    pub skill_gains: f64,
    pub globals: u64,
    pub hofs: u64,
}

/// Aggregate every session in parallel, using `now_ms` for sessions still open.
pub fn calculate_many(
    sessions: &[Session],
    markup: Option<&MarkupTable>,
    now_ms: i64,
    pool: &WorkerPool,
) -> Vec<SessionStats> {
    pool.install(|| {
        sessions
            .par_iter()
            .map(|session| calculate_session_stats_at(session, markup, now_ms))
            .collect()
    })
}

/// Fold per-session stats into one summary. Summation follows slice order.
pub fn summarize(stats: &[SessionStats]) -> HistorySummary {
    let mut summary = stats
        .iter()
        .fold(HistorySummary::default(), |mut acc, stats| {
            acc.sessions += 1;
            acc.events += stats.event_count;
            acc.duration += stats.duration;
            acc.shots += stats.combat.shots;
            acc.kills += stats.combat.kills;
            acc.total_spend += stats.economy.total_spend;
            acc.total_cost += stats.economy.total_cost;
            acc.loot_value += stats.economy.loot_value;
            acc.net_profit += stats.economy.net_profit;
            acc.skill_gains += stats.skills.total_skill_gains;
            acc.globals += stats.meta.globals;
            acc.hofs += stats.meta.hofs;
            acc
        });
    summary.return_rate = ratio(summary.loot_value, summary.total_cost) * 100.0;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, ParsedEvent};

    fn hunt(cost_per_shot: f64, shots: usize, loot: f64) -> Session {
        let mut session = Session::started_at("hunt", 0);
        session.manual_cost_per_shot = cost_per_shot;
        for i in 0..shots {
            session.append_in_place(ParsedEvent::new(i as i64, "", EventKind::Miss), None);
        }
        session.append_in_place(
            ParsedEvent::new(
                shots as i64,
                "",
                EventKind::Loot {
                    value: loot,
                    item_name: "Animal Hide".into(),
                    quantity: 1,
                },
            ),
            None,
        );
        session.end_session(60_000)
    }

    #[test]
    fn keeps_input_order() {
        let sessions = vec![hunt(0.1, 10, 1.0), hunt(0.2, 5, 2.0), hunt(0.3, 1, 3.0)];
        let stats = calculate_many(&sessions, None, 0, &WorkerPool::with_workers(2));
        let ids: Vec<&str> = stats.iter().map(|s| s.session_id.as_str()).collect();
        let expected: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn summary_totals_sessions() {
        let sessions = vec![hunt(0.1, 10, 1.0), hunt(0.1, 10, 3.0)];
        let stats = calculate_many(&sessions, None, 0, &WorkerPool::default());
        let summary = summarize(&stats);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.shots, 20);
        assert_eq!(summary.kills, 2);
        assert!((summary.total_spend - 2.0).abs() < 1e-9);
        assert!((summary.return_rate - 200.0).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_has_zero_return() {
        let summary = summarize(&[]);
        assert_eq!(summary.sessions, 0);
        assert_eq!(summary.return_rate, 0.0);
    }
}
