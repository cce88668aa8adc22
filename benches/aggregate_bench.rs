//! Aggregation cost over a long session, and append cost at that size.
//!
//! Run with: `cargo bench --bench aggregate`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lootledger::events::{EventKind, ParsedEvent};
use lootledger::loadout::{Equipment, EquipmentEconomy, Loadout};
use lootledger::session::Session;
use lootledger::stats::calculate_session_stats_at;

const EVENTS: usize = 20_000;

fn event_kind(i: usize) -> EventKind {
    match i % 8 {
        0 | 1 | 2 => EventKind::DamageDealt {
            amount: 40.0 + (i % 13) as f64,
            critical: i % 17 == 0,
        },
        3 => EventKind::Miss,
        4 => EventKind::DamageTaken {
            amount: 12.0,
            critical: false,
        },
        5 => EventKind::Loot {
            value: 0.5,
            item_name: (if i % 3 == 0 { "Shrapnel" } else { "Animal Hide" }).to_string(),
            quantity: 10,
        },
        6 => EventKind::SkillGain {
            amount: 0.05,
            skill_name: "Rifle".to_string(),
            skill_category: lootledger::events::SkillCategory::Combat,
        },
        _ => EventKind::TargetEvaded,
    }
}

fn long_session() -> Session {
    let loadouts: Vec<Loadout> = (0..3)
        .map(|n| {
            let mut loadout = Loadout::new(format!("kit-{n}"), format!("Kit {n}"));
            loadout.weapon = Some(Equipment {
                name: format!("Rifle {n}"),
                economy: EquipmentEconomy {
                    decay_ped_per_shot: 0.01 * (n + 1) as f64,
                    ammo_burn_units: 100.0,
                },
                damage: None,
            });
            loadout
        })
        .collect();

    let mut session = Session::started_at("bench", 0);
    for i in 0..EVENTS {
        let active = &loadouts[(i / 1000) % loadouts.len()];
        session.append_in_place(
            ParsedEvent::new(i as i64 * 500, "", event_kind(i)),
            Some(active),
        );
    }
    session.end_session(EVENTS as i64 * 500)
}

fn bench_aggregate(c: &mut Criterion) {
    let session = long_session();

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(EVENTS as u64));
    group.bench_function("stats_20k_events", |b| {
        b.iter(|| calculate_session_stats_at(black_box(&session), None, 0))
    });
    group.bench_function("append_to_20k_session", |b| {
        b.iter(|| session.append(ParsedEvent::new(EVENTS as i64 * 500, "", EventKind::Miss), None))
    });
    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
