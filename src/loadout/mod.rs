//! Equipment loadouts and their per-shot economy.
//!
//! Loadouts are edited outside the ledger; a session only reads one at the
//! moment an event is attributed to it and freezes the result in a
//! [`LoadoutSnapshot`](crate::session::LoadoutSnapshot).

pub mod cost;
pub mod library;
pub mod validate;

use serde::{Deserialize, Serialize};

pub use cost::{
    armor_decay_per_hit, attachment_cost, damage_per_pec, effective_cost_per_shot,
    loadout_armor_decay_per_hit, single_plate_decay_per_hit, total_per_shot, weapon_cost,
    weapon_enhancer_cost, AMMO_PED_PER_UNIT, DEFAULT_PLATE_DURABILITY,
    ENHANCER_PED_PER_SLOT, MAX_ENHANCER_SLOTS,
};
pub use library::{find_loadout, load_loadouts, parse_loadouts, DEFAULT_LOADOUTS_PATH};
pub use validate::{
    validate_loadout, validate_loadouts, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEconomy {
    /// PED of decay per shot fired.
    #[serde(default)]
    pub decay_ped_per_shot: f64,
    /// Ammo units burned per shot (1 unit = 0.0001 PED).
    #[serde(default)]
    pub ammo_burn_units: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: f64,
    pub max: f64,
}

impl DamageRange {
    pub fn average(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    #[serde(default)]
    pub economy: EquipmentEconomy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<DamageRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorSet {
    pub max_tt: f64,
    /// Hits the set absorbs from full TT to zero.
    pub durability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorPlate {
    pub max_tt: f64,
    /// Hits the plate absorbs; [`DEFAULT_PLATE_DURABILITY`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<f64>,
}

/// Manual cost settings that replace or extend the computed economy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualCost {
    #[serde(default)]
    pub use_manual_cost: bool,
    #[serde(default)]
    pub manual_cost_per_shot: f64,
    /// Replaces the per-slot weapon enhancer surcharge when > 0.
    #[serde(default)]
    pub weapon_enhancer_cost: f64,
    /// Armor enhancer cost attributed to each shot.
    #[serde(default)]
    pub armor_enhancer_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amp: Option<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sight: Option<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<ArmorSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plates: Vec<ArmorPlate>,
    #[serde(default)]
    pub weapon_enhancers: u8,
    #[serde(default)]
    pub armor_enhancers: u8,
    #[serde(default)]
    pub manual: ManualCost,
}

impl Loadout {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weapon: None,
            amp: None,
            scope: None,
            sight: None,
            armor: None,
            plates: Vec::new(),
            weapon_enhancers: 0,
            armor_enhancers: 0,
            manual: ManualCost::default(),
        }
    }

    pub fn cost_per_shot(&self) -> f64 {
        effective_cost_per_shot(self)
    }

    pub fn armor_decay_per_hit(&self) -> f64 {
        loadout_armor_decay_per_hit(self)
    }
}
