//! Derived session statistics.
//!
//! [`SessionStats`] is never stored. It is recomputed from a
//! [`Session`](crate::session::Session) and an optional
//! [`MarkupTable`] by [`calculate_session_stats`]; same inputs, same output.

pub mod aggregate;
pub mod markup;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::SkillCategory;

pub use aggregate::{calculate_session_stats, calculate_session_stats_at, is_ammo_item, SHRAPNEL};
pub use markup::{load_markup_table, MarkupEntry, MarkupTable, DEFAULT_MARKUP_PATH};

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub shots: u64,
    pub hits: u64,
    pub misses: u64,
    pub criticals: u64,
    /// One per loot event; the log has no explicit kill line.
    pub kills: u64,
    pub damage_dealt: f64,
    pub critical_damage: f64,
    pub player_missed: u64,
    pub target_dodged: u64,
    pub target_evaded: u64,
    pub target_resisted: u64,
    pub out_of_range: u64,
    pub hit_rate: f64,
    pub crit_rate: f64,
    pub avg_damage_per_hit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefenseStats {
    pub times_hit: u64,
    pub critical_hits_taken: u64,
    pub damage_taken: f64,
    pub damage_reduced: f64,
    pub deflects: u64,
    pub player_dodged: u64,
    pub player_evaded: u64,
    pub enemy_missed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealingStats {
    pub self_heal: f64,
    pub healed_by: f64,
    pub heal_given: f64,
    pub total_received: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemLoot {
    pub count: u64,
    pub quantity: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootStats {
    pub loot_events: u64,
    pub by_item: BTreeMap<String, ItemLoot>,
    pub unique_items: usize,
    pub shrapnel_value: f64,
    pub ammo_value: f64,
    /// Loot value without shrapnel.
    pub real_loot_value: f64,
    pub mining_claims: u64,
    pub mining_claim_value: f64,
    pub mining_no_finds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillTotals {
    pub total_gain: f64,
    pub gain_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillStats {
    /// Gains, attribute gains and rank-ups.
    pub total_skill_events: u64,
    pub total_skill_gains: f64,
    pub by_skill: BTreeMap<String, SkillTotals>,
    pub by_category: BTreeMap<SkillCategory, f64>,
    pub skill_ranks: u64,
    pub new_skills_unlocked: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyStats {
    /// Ammo and weapon decay: one shot cost per offense event.
    pub total_spend: f64,
    pub loot_value: f64,
    pub profit: f64,
    /// Armor decay from absorbed and deflected hits.
    pub decay: f64,
    pub manual_armor_cost: f64,
    pub manual_fap_cost: f64,
    pub manual_misc_cost: f64,
    pub total_cost: f64,
    pub net_profit: f64,
    /// Loot over total cost, in percent.
    pub return_rate: f64,
    pub loot_value_with_markup: f64,
    pub profit_with_markup: f64,
    pub net_profit_with_markup: f64,
    pub return_rate_with_markup: f64,
    pub cost_per_kill: f64,
    pub loot_per_kill: f64,
    pub profit_per_hour: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillEfficiency {
    pub skill_per_hour: f64,
    pub skill_per_ped_spent: f64,
    pub skill_per_kill: f64,
    pub skill_per_shot: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaStats {
    pub globals: u64,
    pub hofs: u64,
    pub deaths: u64,
    pub revives: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadoutBreakdown {
    pub loadout_id: String,
    pub loadout_name: String,
    pub shots: u64,
    /// Loot that followed this loadout's shots before the next switch.
    pub loot_value: f64,
    pub spend: f64,
}

impl LoadoutBreakdown {
    pub fn return_rate(&self) -> f64 {
        ratio(self.loot_value, self.spend) * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub event_count: usize,
    /// Active time in seconds, pauses excluded.
    pub duration: f64,
    pub combat: CombatStats,
    pub defense: DefenseStats,
    pub healing: HealingStats,
    pub loot: LootStats,
    pub skills: SkillStats,
    pub economy: EconomyStats,
    pub skill_efficiency: SkillEfficiency,
    pub meta: MetaStats,
    pub loadout_breakdown: Vec<LoadoutBreakdown>,
}
