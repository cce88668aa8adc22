//! Market markup table used for markup-adjusted loot values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

pub const DEFAULT_MARKUP_PATH: &str = "data/markup.json";

/// Markup for one item. Either a percentage of TT (100 = no markup) or, when
/// `use_fixed` is set, a fixed PED premium per unit on top of TT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkupEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_value_fixed: Option<f64>,
    #[serde(default)]
    pub use_fixed: bool,
}

fn default_percent() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupTable {
    #[serde(default = "default_percent")]
    pub default_percent: f64,
    #[serde(default)]
    pub items: BTreeMap<String, MarkupEntry>,
}

impl Default for MarkupTable {
    fn default() -> Self {
        Self {
            default_percent: default_percent(),
            items: BTreeMap::new(),
        }
    }
}

impl MarkupTable {
    pub fn with_default_percent(default_percent: f64) -> Self {
        Self {
            default_percent,
            items: BTreeMap::new(),
        }
    }

    pub fn insert_percent(&mut self, item: impl Into<String>, percent: f64) {
        self.items.insert(
            item.into(),
            MarkupEntry {
                markup_percent: Some(percent),
                markup_value_fixed: None,
                use_fixed: false,
            },
        );
    }

    pub fn insert_fixed(&mut self, item: impl Into<String>, premium_per_unit: f64) {
        self.items.insert(
            item.into(),
            MarkupEntry {
                markup_percent: None,
                markup_value_fixed: Some(premium_per_unit),
                use_fixed: true,
            },
        );
    }

    /// Market value of `quantity` units of `item` worth `tt_value` PED at TT.
    pub fn value_with_markup(&self, item: &str, tt_value: f64, quantity: u32) -> f64 {
        let entry = self.items.get(item);
        if let Some(MarkupEntry {
            use_fixed: true,
            markup_value_fixed: Some(premium),
            ..
        }) = entry
        {
            return tt_value + premium * f64::from(quantity);
        }
        let percent = entry
            .and_then(|entry| entry.markup_percent)
            .unwrap_or(self.default_percent);
        tt_value * percent / 100.0
    }
}

/// Load a markup table from JSON or YAML (by extension).
pub fn load_markup_table(path: impl AsRef<Path>) -> Result<MarkupTable, LedgerError> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).map_err(|err| LedgerError::io(path.display().to_string(), err))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let table = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_items_use_default_percent() {
        let table = MarkupTable::with_default_percent(110.0);
        assert!((table.value_with_markup("Animal Oil Residue", 10.0, 1) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn fixed_premium_replaces_percentage() {
        let mut table = MarkupTable::default();
        table.insert_fixed("Atrox Tooth", 2.0);
        table.insert_percent("Animal Hide", 150.0);
        assert!((table.value_with_markup("Atrox Tooth", 0.5, 3) - 6.5).abs() < 1e-12);
        assert!((table.value_with_markup("Animal Hide", 2.0, 10) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn use_fixed_without_value_falls_back_to_percent() {
        let mut table = MarkupTable::default();
        table.items.insert(
            "Odd".to_string(),
            MarkupEntry {
                markup_percent: Some(200.0),
                markup_value_fixed: None,
                use_fixed: true,
            },
        );
        assert!((table.value_with_markup("Odd", 1.0, 1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn deserializes_with_defaults() {
        let table: MarkupTable =
            serde_json::from_str(r#"{"items":{"Shrapnel":{"markup_percent":101.0}}}"#)
                .expect("parse");
        assert_eq!(table.default_percent, 100.0);
        assert_eq!(table.items["Shrapnel"].markup_percent, Some(101.0));
    }
}
