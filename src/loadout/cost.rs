//! Per-shot and per-hit cost of a loadout, in PED.
//!
//! Inputs are assumed finite and non-negative; [`super::validate`] is where
//! bad equipment data gets rejected. Nothing here clamps or errors.

use super::{ArmorPlate, ArmorSet, Equipment, Loadout};

/// One ammo unit is 0.01 PEC.
pub const AMMO_PED_PER_UNIT: f64 = 0.0001;
/// Each weapon enhancer slot burns 103 extra ammo units per shot.
pub const ENHANCER_PED_PER_SLOT: f64 = 0.0103;
pub const MAX_ENHANCER_SLOTS: u8 = 10;
/// Plate durability used when a plate does not declare its own.
pub const DEFAULT_PLATE_DURABILITY: f64 = 1000.0;

/// Decay plus ammo burn for a weapon or amplifier.
pub fn weapon_cost(equipment: Option<&Equipment>) -> f64 {
    equipment
        .map(|e| e.economy.ammo_burn_units * AMMO_PED_PER_UNIT + e.economy.decay_ped_per_shot)
        .unwrap_or(0.0)
}

/// Scopes and sights only decay.
pub fn attachment_cost(equipment: Option<&Equipment>) -> f64 {
    equipment
        .map(|e| e.economy.decay_ped_per_shot)
        .unwrap_or(0.0)
}

pub fn weapon_enhancer_cost(slots: u8, cost_override: f64) -> f64 {
    if cost_override > 0.0 {
        cost_override
    } else {
        f64::from(slots) * ENHANCER_PED_PER_SLOT
    }
}

/// Armor set decay per absorbed hit: `max_tt / durability`, 0 without armor
/// or with non-positive durability.
pub fn armor_decay_per_hit(armor: Option<&ArmorSet>) -> f64 {
    match armor {
        Some(set) if set.durability > 0.0 => set.max_tt / set.durability,
        _ => 0.0,
    }
}

/// Mean per-hit decay over the plates. Exactly one plate takes a given hit
/// and the log does not say which.
pub fn single_plate_decay_per_hit(plates: &[ArmorPlate]) -> f64 {
    if plates.is_empty() {
        return 0.0;
    }
    let total: f64 = plates
        .iter()
        .map(|plate| {
            let durability = plate.durability.unwrap_or(DEFAULT_PLATE_DURABILITY);
            if durability > 0.0 {
                plate.max_tt / durability
            } else {
                0.0
            }
        })
        .sum();
    total / plates.len() as f64
}

/// Armor set plus plate decay for one absorbed hit.
pub fn loadout_armor_decay_per_hit(loadout: &Loadout) -> f64 {
    armor_decay_per_hit(loadout.armor.as_ref()) + single_plate_decay_per_hit(&loadout.plates)
}

pub fn total_per_shot(loadout: &Loadout) -> f64 {
    weapon_cost(loadout.weapon.as_ref())
        + weapon_cost(loadout.amp.as_ref())
        + attachment_cost(loadout.scope.as_ref())
        + attachment_cost(loadout.sight.as_ref())
        + weapon_enhancer_cost(loadout.weapon_enhancers, loadout.manual.weapon_enhancer_cost)
        + loadout.manual.armor_enhancer_cost
}

/// The cost a session freezes into a snapshot: the manual figure verbatim
/// when enabled, the computed total otherwise.
pub fn effective_cost_per_shot(loadout: &Loadout) -> f64 {
    if loadout.manual.use_manual_cost {
        loadout.manual.manual_cost_per_shot
    } else {
        total_per_shot(loadout)
    }
}

/// Average damage per PEC spent. Amplifier damage adds to the weapon's.
pub fn damage_per_pec(loadout: &Loadout) -> f64 {
    let cost_pec = effective_cost_per_shot(loadout) * 100.0;
    let damage = loadout
        .weapon
        .as_ref()
        .and_then(|weapon| weapon.damage)
        .map(|range| range.average())
        .unwrap_or(0.0)
        + loadout
            .amp
            .as_ref()
            .and_then(|amp| amp.damage)
            .map(|range| range.average())
            .unwrap_or(0.0);
    if cost_pec > 0.0 && damage > 0.0 {
        damage / cost_pec
    } else {
        0.0
    }
}
