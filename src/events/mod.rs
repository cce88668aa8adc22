//! Typed events produced from raw chat-log lines.
//!
//! Every recognised line becomes exactly one [`ParsedEvent`]. The kind-specific
//! payload lives in [`EventKind`], so the aggregator's `match` is exhaustive
//! over everything the parser can emit.

use serde::{Deserialize, Serialize};

/// Declared category of a skill gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Combat,
    Profession,
    Attributes,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combat => "combat",
            Self::Profession => "profession",
            Self::Attributes => "attributes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    // offense
    DamageDealt {
        amount: f64,
        #[serde(default)]
        critical: bool,
    },
    Miss,
    TargetDodged,
    TargetEvaded,
    TargetResisted,
    OutOfRange,

    // defense
    DamageTaken {
        amount: f64,
        #[serde(default)]
        critical: bool,
    },
    DamageReduced {
        amount: f64,
    },
    Deflect,
    PlayerDodged,
    PlayerEvaded,
    EnemyMissed,

    // healing
    SelfHeal {
        amount: f64,
    },
    HealedBy {
        amount: f64,
    },
    HealGiven {
        amount: f64,
    },

    // loot
    Loot {
        value: f64,
        item_name: String,
        quantity: u32,
    },
    MiningClaim {
        value: f64,
    },
    MiningNoFind,

    // skills
    SkillGain {
        amount: f64,
        skill_name: String,
        skill_category: SkillCategory,
    },
    AttributeGain {
        amount: f64,
        skill_name: String,
    },
    SkillRank {
        skill_name: String,
    },
    SkillAcquired {
        skill_name: String,
    },

    // meta
    Global {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    Hof {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    Death,
    Revive,
}

impl EventKind {
    /// Offense events are the ones that cost a shot.
    pub fn is_offense(&self) -> bool {
        matches!(
            self,
            Self::DamageDealt { .. }
                | Self::Miss
                | Self::TargetDodged
                | Self::TargetEvaded
                | Self::TargetResisted
                | Self::OutOfRange
        )
    }

    /// Defense events that wear armor: a hit landed or was deflected.
    pub fn wears_armor(&self) -> bool {
        matches!(self, Self::DamageTaken { .. } | Self::Deflect)
    }

    /// Wire name of the kind, identical to the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DamageDealt { .. } => "damage_dealt",
            Self::Miss => "miss",
            Self::TargetDodged => "target_dodged",
            Self::TargetEvaded => "target_evaded",
            Self::TargetResisted => "target_resisted",
            Self::OutOfRange => "out_of_range",
            Self::DamageTaken { .. } => "damage_taken",
            Self::DamageReduced { .. } => "damage_reduced",
            Self::Deflect => "deflect",
            Self::PlayerDodged => "player_dodged",
            Self::PlayerEvaded => "player_evaded",
            Self::EnemyMissed => "enemy_missed",
            Self::SelfHeal { .. } => "self_heal",
            Self::HealedBy { .. } => "healed_by",
            Self::HealGiven { .. } => "heal_given",
            Self::Loot { .. } => "loot",
            Self::MiningClaim { .. } => "mining_claim",
            Self::MiningNoFind => "mining_no_find",
            Self::SkillGain { .. } => "skill_gain",
            Self::AttributeGain { .. } => "attribute_gain",
            Self::SkillRank { .. } => "skill_rank",
            Self::SkillAcquired { .. } => "skill_acquired",
            Self::Global { .. } => "global",
            Self::Hof { .. } => "hof",
            Self::Death => "death",
            Self::Revive => "revive",
        }
    }
}

/// One recognised log line.
///
/// `loadout_id` is empty when parsed and filled in by
/// [`Session::append`](crate::session::Session::append) from the loadout
/// active at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
    pub raw: String,
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loadout_id: Option<String>,
}

impl ParsedEvent {
    pub fn new(timestamp: i64, raw: impl Into<String>, kind: EventKind) -> Self {
        Self {
            timestamp,
            raw: raw.into(),
            kind,
            loadout_id: None,
        }
    }

    pub fn is_offense(&self) -> bool {
        self.kind.is_offense()
    }
}
