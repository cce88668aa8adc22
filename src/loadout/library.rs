//! Loadout library file: a YAML or JSON list of loadouts.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::validate::{validate_loadouts, ValidationSeverity};
use super::Loadout;
use crate::error::LedgerError;

pub const DEFAULT_LOADOUTS_PATH: &str = "data/loadouts.yaml";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoadoutFile {
    Wrapped { loadouts: Vec<Loadout> },
    List(Vec<Loadout>),
}

impl LoadoutFile {
    fn into_loadouts(self) -> Vec<Loadout> {
        match self {
            Self::Wrapped { loadouts } => loadouts,
            Self::List(loadouts) => loadouts,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Parse loadouts from text. `json` selects the decoder.
pub fn parse_loadouts(raw: &str, json: bool) -> Result<Vec<Loadout>, LedgerError> {
    let file: LoadoutFile = if json {
        serde_json::from_str(raw)?
    } else {
        serde_yaml::from_str(raw)?
    };
    let loadouts = file.into_loadouts();

    let report = validate_loadouts(&loadouts);
    if report.has_errors() {
        let messages = report
            .errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LedgerError::InvalidLoadout(messages));
    }
    for warning in report
        .diagnostics
        .iter()
        .filter(|diag| diag.severity == ValidationSeverity::Warning)
    {
        tracing::warn!(diagnostic = %warning, "loadout library warning");
    }
    Ok(loadouts)
}

/// Load and validate a loadout library. `{ loadouts: [...] }` and a bare
/// list are both accepted.
pub fn load_loadouts(path: impl AsRef<Path>) -> Result<Vec<Loadout>, LedgerError> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).map_err(|err| LedgerError::io(path.display().to_string(), err))?;
    let loadouts = parse_loadouts(&raw, is_json(path))?;
    tracing::debug!(path = %path.display(), count = loadouts.len(), "loaded loadout library");
    Ok(loadouts)
}

pub fn find_loadout<'a>(loadouts: &'a [Loadout], id: &str) -> Option<&'a Loadout> {
    loadouts.iter().find(|loadout| loadout.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY_YAML: &str = r#"
loadouts:
  - id: cheap
    name: Cheap rifle
    weapon:
      name: Sollomate Opalo
      economy:
        decay_ped_per_shot: 0.0078
        ammo_burn_units: 88
  - id: armored
    name: Armored
    armor:
      max_tt: 100.0
      durability: 1000.0
"#;

    #[test]
    fn parses_wrapped_yaml() {
        let loadouts = parse_loadouts(LIBRARY_YAML, false).expect("parse");
        assert_eq!(loadouts.len(), 2);
        assert_eq!(loadouts[0].id, "cheap");
        assert!(find_loadout(&loadouts, "armored").is_some());
        assert!((loadouts[1].armor_decay_per_hit() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn parses_bare_json_list() {
        let raw = r#"[{"id":"a","name":"A"}]"#;
        let loadouts = parse_loadouts(raw, true).expect("parse");
        assert_eq!(loadouts[0].name, "A");
    }

    #[test]
    fn rejects_invalid_loadouts() {
        let raw = r#"[{"id":"a","name":"A","weapon_enhancers":12}]"#;
        let err = parse_loadouts(raw, true).expect_err("invalid");
        assert!(matches!(err, LedgerError::InvalidLoadout(_)));
    }
}
