//! Single forward pass from a session's events to [`SessionStats`].

use std::collections::HashMap;

use super::{
    ratio, CombatStats, DefenseStats, EconomyStats, HealingStats, LoadoutBreakdown,
    LootStats, MarkupTable, MetaStats, SessionStats, SkillEfficiency, SkillStats,
};
use crate::events::{EventKind, ParsedEvent, SkillCategory};
use crate::session::{now_millis, Session};

pub const SHRAPNEL: &str = "Shrapnel";

const MS_PER_SECOND: f64 = 1000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Ammunition drops are named "... Ammo" ("Universal Ammo", "Weapon Cell Ammo").
pub fn is_ammo_item(item_name: &str) -> bool {
    item_name.to_ascii_lowercase().contains("ammo")
}

/// Stats for `session`, timing an open session against the wall clock.
pub fn calculate_session_stats(session: &Session, markup: Option<&MarkupTable>) -> SessionStats {
    calculate_session_stats_at(session, markup, now_millis())
}

/// Stats for `session` with `now_ms` standing in for the current time.
///
/// Pure: the same session, markup table and `now_ms` always give the same
/// result. `now_ms` only matters while the session is open.
pub fn calculate_session_stats_at(
    session: &Session,
    markup: Option<&MarkupTable>,
    now_ms: i64,
) -> SessionStats {
    let mut acc = Accumulator::new(session, markup);
    for event in session.events().iter() {
        acc.observe(event);
    }
    acc.finish(session.duration_ms(now_ms))
}

struct Accumulator<'a> {
    session: &'a Session,
    markup: Option<&'a MarkupTable>,
    combat: CombatStats,
    defense: DefenseStats,
    healing: HealingStats,
    loot: LootStats,
    skills: SkillStats,
    meta: MetaStats,
    total_spend: f64,
    armor_decay: f64,
    loot_value: f64,
    loot_value_with_markup: f64,
    loadouts: Vec<LoadoutBreakdown>,
    loadout_index: HashMap<&'a str, usize>,
    /// Breakdown slot of the most recent offense event, if it was tagged.
    current_loadout: Option<usize>,
}

impl<'a> Accumulator<'a> {
    fn new(session: &'a Session, markup: Option<&'a MarkupTable>) -> Self {
        Self {
            session,
            markup,
            combat: CombatStats::default(),
            defense: DefenseStats::default(),
            healing: HealingStats::default(),
            loot: LootStats::default(),
            skills: SkillStats::default(),
            meta: MetaStats::default(),
            total_spend: 0.0,
            armor_decay: 0.0,
            loot_value: 0.0,
            loot_value_with_markup: 0.0,
            loadouts: Vec::new(),
            loadout_index: HashMap::new(),
            current_loadout: None,
        }
    }

    fn observe(&mut self, event: &'a ParsedEvent) {
        if event.kind.is_offense() {
            self.record_shot(event);
        }
        if event.kind.wears_armor() {
            self.armor_decay += event
                .loadout_id
                .as_deref()
                .and_then(|id| self.session.snapshot(id))
                .map(|snapshot| snapshot.armor_decay_per_hit)
                .unwrap_or(0.0);
        }

        match &event.kind {
            EventKind::DamageDealt { amount, critical } => {
                self.combat.hits += 1;
                self.combat.damage_dealt += amount;
                if *critical {
                    self.combat.criticals += 1;
                    self.combat.critical_damage += amount;
                }
            }
            EventKind::Miss => self.combat.player_missed += 1,
            EventKind::TargetDodged => self.combat.target_dodged += 1,
            EventKind::TargetEvaded => self.combat.target_evaded += 1,
            EventKind::TargetResisted => self.combat.target_resisted += 1,
            EventKind::OutOfRange => self.combat.out_of_range += 1,

            EventKind::DamageTaken { amount, critical } => {
                self.defense.times_hit += 1;
                self.defense.damage_taken += amount;
                if *critical {
                    self.defense.critical_hits_taken += 1;
                }
            }
            EventKind::DamageReduced { amount } => self.defense.damage_reduced += amount,
            EventKind::Deflect => self.defense.deflects += 1,
            EventKind::PlayerDodged => self.defense.player_dodged += 1,
            EventKind::PlayerEvaded => self.defense.player_evaded += 1,
            EventKind::EnemyMissed => self.defense.enemy_missed += 1,

            EventKind::SelfHeal { amount } => self.healing.self_heal += amount,
            EventKind::HealedBy { amount } => self.healing.healed_by += amount,
            EventKind::HealGiven { amount } => self.healing.heal_given += amount,

            EventKind::Loot {
                value,
                item_name,
                quantity,
            } => self.record_loot(item_name, *value, *quantity),
            EventKind::MiningClaim { value } => {
                self.loot.mining_claims += 1;
                self.loot.mining_claim_value += value;
                self.loot_value += value;
                self.loot_value_with_markup += value;
                self.credit_current_loadout(*value);
            }
            EventKind::MiningNoFind => self.loot.mining_no_finds += 1,

            EventKind::SkillGain {
                amount,
                skill_name,
                skill_category,
            } => self.record_skill_gain(skill_name, *amount, *skill_category),
            EventKind::AttributeGain { amount, skill_name } => {
                self.record_skill_gain(skill_name, *amount, SkillCategory::Attributes)
            }
            EventKind::SkillRank { .. } => {
                self.skills.total_skill_events += 1;
                self.skills.skill_ranks += 1;
            }
            EventKind::SkillAcquired { .. } => self.skills.new_skills_unlocked += 1,

            EventKind::Global { .. } => self.meta.globals += 1,
            EventKind::Hof { .. } => self.meta.hofs += 1,
            EventKind::Death => self.meta.deaths += 1,
            EventKind::Revive => self.meta.revives += 1,
        }
    }

    fn record_shot(&mut self, event: &'a ParsedEvent) {
        self.combat.shots += 1;

        let session = self.session;
        let snapshot = event.loadout_id.as_deref().and_then(|id| session.snapshot(id));
        let cost = snapshot
            .map(|snapshot| snapshot.cost_per_shot)
            .unwrap_or(session.manual_cost_per_shot);
        self.total_spend += cost;

        let Some(id) = event.loadout_id.as_deref() else {
            self.current_loadout = None;
            return;
        };
        let slot = match self.loadout_index.get(id) {
            Some(slot) => *slot,
            None => {
                self.loadouts.push(LoadoutBreakdown {
                    loadout_id: id.to_string(),
                    loadout_name: snapshot
                        .map(|snapshot| snapshot.name.clone())
                        .unwrap_or_else(|| id.to_string()),
                    ..LoadoutBreakdown::default()
                });
                let slot = self.loadouts.len() - 1;
                self.loadout_index.insert(id, slot);
                slot
            }
        };
        let entry = &mut self.loadouts[slot];
        entry.shots += 1;
        entry.spend += cost;
        self.current_loadout = Some(slot);
    }

    fn record_loot(&mut self, item_name: &str, value: f64, quantity: u32) {
        self.combat.kills += 1;
        self.loot.loot_events += 1;
        self.loot_value += value;
        self.loot_value_with_markup += match self.markup {
            Some(table) => table.value_with_markup(item_name, value, quantity),
            None => value,
        };

        if item_name == SHRAPNEL {
            self.loot.shrapnel_value += value;
        }
        if is_ammo_item(item_name) {
            self.loot.ammo_value += value;
        }

        let item = self
            .loot
            .by_item
            .entry(item_name.to_string())
            .or_default();
        item.count += 1;
        item.quantity += u64::from(quantity);
        item.total_value += value;

        self.credit_current_loadout(value);
    }

    fn credit_current_loadout(&mut self, value: f64) {
        if let Some(slot) = self.current_loadout {
            self.loadouts[slot].loot_value += value;
        }
    }

    fn record_skill_gain(&mut self, skill_name: &str, amount: f64, category: SkillCategory) {
        self.skills.total_skill_events += 1;
        self.skills.total_skill_gains += amount;
        let totals = self
            .skills
            .by_skill
            .entry(skill_name.to_string())
            .or_default();
        totals.total_gain += amount;
        totals.gain_count += 1;
        *self.skills.by_category.entry(category).or_insert(0.0) += amount;
    }

    fn finish(self, duration_ms: i64) -> SessionStats {
        let session = self.session;
        let duration = duration_ms as f64 / MS_PER_SECOND;
        let hours = duration / SECONDS_PER_HOUR;

        let mut combat = self.combat;
        combat.misses = combat.shots - combat.hits;
        combat.hit_rate = ratio(combat.hits as f64, combat.shots as f64) * 100.0;
        combat.crit_rate = ratio(combat.criticals as f64, combat.hits as f64) * 100.0;
        combat.avg_damage_per_hit = ratio(combat.damage_dealt, combat.hits as f64);

        let mut healing = self.healing;
        healing.total_received = healing.self_heal + healing.healed_by;

        let mut loot = self.loot;
        loot.unique_items = loot.by_item.len();
        loot.real_loot_value = self.loot_value - loot.shrapnel_value;

        let total_spend = self.total_spend;
        let loot_value = self.loot_value;
        let total_cost = total_spend
            + self.armor_decay
            + session.manual_armor_cost
            + session.manual_fap_cost
            + session.manual_misc_cost;
        let net_profit = loot_value - total_cost;
        let kills = combat.kills as f64;
        let economy = EconomyStats {
            total_spend,
            loot_value,
            profit: loot_value - total_spend,
            decay: self.armor_decay,
            manual_armor_cost: session.manual_armor_cost,
            manual_fap_cost: session.manual_fap_cost,
            manual_misc_cost: session.manual_misc_cost,
            total_cost,
            net_profit,
            return_rate: ratio(loot_value, total_cost) * 100.0,
            loot_value_with_markup: self.loot_value_with_markup,
            profit_with_markup: self.loot_value_with_markup - total_spend,
            net_profit_with_markup: self.loot_value_with_markup - total_cost,
            return_rate_with_markup: ratio(self.loot_value_with_markup, total_cost) * 100.0,
            cost_per_kill: ratio(total_cost, kills),
            loot_per_kill: ratio(loot_value, kills),
            profit_per_hour: ratio(net_profit, hours),
        };

        let gains = self.skills.total_skill_gains;
        let skill_efficiency = SkillEfficiency {
            skill_per_hour: ratio(gains, hours),
            skill_per_ped_spent: ratio(gains, total_spend),
            skill_per_kill: ratio(gains, kills),
            skill_per_shot: ratio(gains, combat.shots as f64),
        };

        SessionStats {
            session_id: session.id.clone(),
            event_count: session.events().len(),
            duration,
            combat,
            defense: self.defense,
            healing,
            loot,
            skills: self.skills,
            economy,
            skill_efficiency,
            meta: self.meta,
            loadout_breakdown: self.loadouts,
        }
    }
}
