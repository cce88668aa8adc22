//! Skill name catalogue used to infer a gain's category.

use crate::events::SkillCategory;

pub const ATTRIBUTES: &[&str] = &[
    "Agility",
    "Health",
    "Intelligence",
    "Psyche",
    "Stamina",
    "Strength",
];

const COMBAT_SKILLS: &[&str] = &[
    "Aim",
    "Anatomy",
    "Athletics",
    "Clubs",
    "Combat Reflexes",
    "Combat Sense",
    "Commando",
    "Courage",
    "Dexterity",
    "Dodge",
    "Evade",
    "First Aid",
    "Handgun",
    "Inflict Melee Damage",
    "Inflict Ranged Damage",
    "Longblades",
    "Martial Arts",
    "Melee Combat",
    "Melee Damage Assessment",
    "Perception",
    "Power Fist",
    "Ranged Damage Assessment",
    "Rifle",
    "Serendipity",
    "Shortblades",
    "Weapons Handling",
    "Whip",
    "Wounding",
];

const COMBAT_KEYWORDS: &[&str] = &[
    "weaponry",
    "laser",
    "blp",
    "plasma",
    "gauss",
    "sniper",
    "heavy weapon",
    "support weapon",
];

pub fn is_attribute(name: &str) -> bool {
    ATTRIBUTES
        .iter()
        .any(|attribute| attribute.eq_ignore_ascii_case(name.trim()))
}

/// Category of a skill by name. Unknown skills are professions.
pub fn categorize_skill(name: &str) -> SkillCategory {
    let name = name.trim();
    if is_attribute(name) {
        return SkillCategory::Attributes;
    }
    if COMBAT_SKILLS
        .iter()
        .any(|skill| skill.eq_ignore_ascii_case(name))
    {
        return SkillCategory::Combat;
    }
    let lower = name.to_ascii_lowercase();
    if COMBAT_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return SkillCategory::Combat;
    }
    SkillCategory::Profession
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_case_insensitive() {
        assert_eq!(categorize_skill("agility"), SkillCategory::Attributes);
        assert!(is_attribute(" Stamina "));
    }

    #[test]
    fn weapon_skills_are_combat() {
        assert_eq!(categorize_skill("Rifle"), SkillCategory::Combat);
        assert_eq!(
            categorize_skill("Laser Weaponry Technology"),
            SkillCategory::Combat
        );
        assert_eq!(categorize_skill("BLP Weaponry Technology"), SkillCategory::Combat);
    }

    #[test]
    fn unknown_skills_are_profession() {
        assert_eq!(categorize_skill("Mining"), SkillCategory::Profession);
        assert_eq!(categorize_skill("Geology"), SkillCategory::Profession);
    }
}
