//! Boundary checks for loadout definitions.
//!
//! The cost model trusts its inputs. Anything entering from a file or the UI
//! should pass through [`validate_loadout`] first.

use std::collections::HashSet;
use std::fmt;

use super::cost::MAX_ENHANCER_SLOTS;
use super::{Equipment, Loadout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }
}

fn check_amount(report: &mut ValidationReport, context: &str, field: &str, value: f64) {
    if !value.is_finite() {
        report.push(
            ValidationSeverity::Error,
            context,
            format!("{field} must be a finite number"),
        );
    } else if value < 0.0 {
        report.push(
            ValidationSeverity::Error,
            context,
            format!("{field} must not be negative (got {value})"),
        );
    }
}

fn check_equipment(report: &mut ValidationReport, slot: &str, equipment: Option<&Equipment>) {
    let Some(equipment) = equipment else {
        return;
    };
    let context = format!("{slot} '{}'", equipment.name);
    check_amount(
        report,
        &context,
        "decay_ped_per_shot",
        equipment.economy.decay_ped_per_shot,
    );
    check_amount(
        report,
        &context,
        "ammo_burn_units",
        equipment.economy.ammo_burn_units,
    );
    if let Some(damage) = equipment.damage {
        check_amount(report, &context, "damage.min", damage.min);
        check_amount(report, &context, "damage.max", damage.max);
        if damage.min > damage.max {
            report.push(
                ValidationSeverity::Warning,
                context,
                "damage.min is greater than damage.max",
            );
        }
    }
}

pub fn validate_loadout(loadout: &Loadout) -> ValidationReport {
    let mut report = ValidationReport::default();
    let base = format!("loadout '{}'", loadout.id);

    if loadout.id.trim().is_empty() {
        report.push(ValidationSeverity::Error, &base, "id must not be empty");
    }
    if loadout.name.trim().is_empty() {
        report.push(ValidationSeverity::Warning, &base, "name is empty");
    }

    check_equipment(&mut report, "weapon", loadout.weapon.as_ref());
    check_equipment(&mut report, "amp", loadout.amp.as_ref());
    check_equipment(&mut report, "scope", loadout.scope.as_ref());
    check_equipment(&mut report, "sight", loadout.sight.as_ref());

    if let Some(armor) = loadout.armor {
        check_amount(&mut report, &base, "armor.max_tt", armor.max_tt);
        check_amount(&mut report, &base, "armor.durability", armor.durability);
        if armor.durability == 0.0 {
            report.push(
                ValidationSeverity::Warning,
                &base,
                "armor durability is 0; armor decay will not be tracked",
            );
        }
    }
    for (index, plate) in loadout.plates.iter().enumerate() {
        let context = format!("{base} plate[{index}]");
        check_amount(&mut report, &context, "max_tt", plate.max_tt);
        if let Some(durability) = plate.durability {
            check_amount(&mut report, &context, "durability", durability);
        }
    }

    for (field, slots) in [
        ("weapon_enhancers", loadout.weapon_enhancers),
        ("armor_enhancers", loadout.armor_enhancers),
    ] {
        if slots > MAX_ENHANCER_SLOTS {
            report.push(
                ValidationSeverity::Error,
                &base,
                format!("{field} must be at most {MAX_ENHANCER_SLOTS} (got {slots})"),
            );
        }
    }

    check_amount(
        &mut report,
        &base,
        "manual.manual_cost_per_shot",
        loadout.manual.manual_cost_per_shot,
    );
    check_amount(
        &mut report,
        &base,
        "manual.weapon_enhancer_cost",
        loadout.manual.weapon_enhancer_cost,
    );
    check_amount(
        &mut report,
        &base,
        "manual.armor_enhancer_cost",
        loadout.manual.armor_enhancer_cost,
    );

    report
}

/// Validate a whole library, also flagging duplicate ids.
pub fn validate_loadouts(loadouts: &[Loadout]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids = HashSet::new();
    for loadout in loadouts {
        if !seen_ids.insert(loadout.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("loadout '{}'", loadout.id),
                "duplicate loadout id",
            );
        }
        report
            .diagnostics
            .extend(validate_loadout(loadout).diagnostics);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::{ArmorSet, EquipmentEconomy};

    fn weapon(decay: f64) -> Equipment {
        Equipment {
            name: "Opalo".to_string(),
            economy: EquipmentEconomy {
                decay_ped_per_shot: decay,
                ammo_burn_units: 100.0,
            },
            damage: None,
        }
    }

    #[test]
    fn clean_loadout_has_no_errors() {
        let mut loadout = Loadout::new("hunt", "Hunting");
        loadout.weapon = Some(weapon(0.02));
        loadout.armor = Some(ArmorSet {
            max_tt: 100.0,
            durability: 1000.0,
        });
        assert!(!validate_loadout(&loadout).has_errors());
    }

    #[test]
    fn negative_decay_is_an_error() {
        let mut loadout = Loadout::new("hunt", "Hunting");
        loadout.weapon = Some(weapon(-0.02));
        let report = validate_loadout(&loadout);
        assert!(report.has_errors());
        assert!(report
            .errors()
            .any(|diag| diag.message.contains("decay_ped_per_shot")));
    }

    #[test]
    fn too_many_enhancers_is_an_error() {
        let mut loadout = Loadout::new("hunt", "Hunting");
        loadout.weapon_enhancers = 11;
        assert!(validate_loadout(&loadout).has_errors());
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let loadouts = vec![Loadout::new("a", "A"), Loadout::new("a", "B")];
        let report = validate_loadouts(&loadouts);
        assert!(report
            .errors()
            .any(|diag| diag.message == "duplicate loadout id"));
    }
}
