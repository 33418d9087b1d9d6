use crate::types::*;
use crate::ParamError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every parameter name accepted by [`Character::set_param`]
pub const PARAM_NAMES: &[&str] = &[
    "frontAttack",
    "dualWield",
    "enemyLevel",
    "armorMul",
    "strength",
    "agility",
    "bonusAttackPower",
    "hitBonus",
    "critBonus",
    "hasteBonus",
    "mainSwingTime",
    "mainWeaponDamageMin",
    "mainWeaponDamageMax",
    "offSwingTime",
    "offWeaponDamageMin",
    "offWeaponDamageMax",
    "tacticalMasteryLevel",
    "angerManagementLevel",
    "improvedOverpowerLevel",
    "deepWoundsLevel",
    "impaleLevel",
    "twoHandSpecLevel",
    "swordSpecLevel",
    "axeSpecLevel",
    "mortalStrikeLevel",
    "crueltyLevel",
    "unbridledWrathLevel",
    "improvedBattleShoutLevel",
    "dualWieldSpecLevel",
    "deathWishLevel",
    "flurryLevel",
    "improvedBerserkerRageLevel",
    "bloodthirstLevel",
    "useWhirlwind",
    "useOverpower",
    "useBloodrage",
];

/// The full character configuration a simulation reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub combat: CombatContext,
    pub stats: GearStats,
    pub main_hand: Weapon,
    pub off_hand: Weapon,
    pub talents: Talents,
    pub abilities: Abilities,
}

/// Mutable view of a single named parameter
enum ParamSlot<'a> {
    Flag(&'a mut bool),
    Unsigned(&'a mut u32),
    Decimal(&'a mut f64),
}

impl Character {
    /// Load a character from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ParamError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamError::Io {
            error: e,
            path: path.to_path_buf(),
        })?;
        Self::parse(&content)
    }

    /// Parse a character from a TOML string
    pub fn parse(content: &str) -> Result<Self, ParamError> {
        Ok(toml::from_str(content)?)
    }

    pub fn weapon(&self, hand: Hand) -> &Weapon {
        match hand {
            Hand::MainHand => &self.main_hand,
            Hand::OffHand => &self.off_hand,
        }
    }

    /// Check every value is inside the range the simulator understands
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(60..=63).contains(&self.combat.enemy_level) {
            return Err(ParamError::OutOfRange {
                name: "enemyLevel".to_string(),
                message: format!("{} is outside 60..=63", self.combat.enemy_level),
            });
        }
        if !(self.combat.armor_mul > 0.0 && self.combat.armor_mul <= 1.0) {
            return Err(ParamError::OutOfRange {
                name: "armorMul".to_string(),
                message: format!("{} is outside (0, 1]", self.combat.armor_mul),
            });
        }

        let mut hands = vec![(Hand::MainHand, "main")];
        if self.combat.dual_wield {
            hands.push((Hand::OffHand, "off"));
        }
        for (hand, prefix) in hands {
            let weapon = self.weapon(hand);
            if !(weapon.swing_time.is_finite() && weapon.swing_time > 0.0) {
                return Err(ParamError::OutOfRange {
                    name: format!("{}SwingTime", prefix),
                    message: format!("{} must be a positive number of seconds", weapon.swing_time),
                });
            }
            if weapon.damage_min > weapon.damage_max {
                return Err(ParamError::OutOfRange {
                    name: format!("{}WeaponDamageMin", prefix),
                    message: format!(
                        "minimum {} exceeds maximum {}",
                        weapon.damage_min, weapon.damage_max
                    ),
                });
            }
        }

        for (name, rank, max) in self.talents.ranks() {
            if rank > max {
                return Err(ParamError::OutOfRange {
                    name: format!("{}Level", name),
                    message: format!("rank {} exceeds maximum {}", rank, max),
                });
            }
        }

        Ok(())
    }

    fn slot(&mut self, name: &str) -> Option<ParamSlot<'_>> {
        let slot = match name {
            "frontAttack" => ParamSlot::Flag(&mut self.combat.front_attack),
            "dualWield" => ParamSlot::Flag(&mut self.combat.dual_wield),
            "enemyLevel" => ParamSlot::Unsigned(&mut self.combat.enemy_level),
            "armorMul" => ParamSlot::Decimal(&mut self.combat.armor_mul),

            "strength" => ParamSlot::Unsigned(&mut self.stats.strength),
            "agility" => ParamSlot::Unsigned(&mut self.stats.agility),
            "bonusAttackPower" => ParamSlot::Unsigned(&mut self.stats.bonus_attack_power),
            "hitBonus" => ParamSlot::Unsigned(&mut self.stats.hit_bonus),
            "critBonus" => ParamSlot::Unsigned(&mut self.stats.crit_bonus),
            "hasteBonus" => ParamSlot::Unsigned(&mut self.stats.haste_bonus),

            "mainSwingTime" => ParamSlot::Decimal(&mut self.main_hand.swing_time),
            "mainWeaponDamageMin" => ParamSlot::Unsigned(&mut self.main_hand.damage_min),
            "mainWeaponDamageMax" => ParamSlot::Unsigned(&mut self.main_hand.damage_max),
            "offSwingTime" => ParamSlot::Decimal(&mut self.off_hand.swing_time),
            "offWeaponDamageMin" => ParamSlot::Unsigned(&mut self.off_hand.damage_min),
            "offWeaponDamageMax" => ParamSlot::Unsigned(&mut self.off_hand.damage_max),

            "tacticalMasteryLevel" => ParamSlot::Unsigned(&mut self.talents.tactical_mastery),
            "angerManagementLevel" => ParamSlot::Unsigned(&mut self.talents.anger_management),
            "improvedOverpowerLevel" => ParamSlot::Unsigned(&mut self.talents.improved_overpower),
            "deepWoundsLevel" => ParamSlot::Unsigned(&mut self.talents.deep_wounds),
            "impaleLevel" => ParamSlot::Unsigned(&mut self.talents.impale),
            "twoHandSpecLevel" => ParamSlot::Unsigned(&mut self.talents.two_hand_spec),
            "swordSpecLevel" => ParamSlot::Unsigned(&mut self.talents.sword_spec),
            "axeSpecLevel" => ParamSlot::Unsigned(&mut self.talents.axe_spec),
            "mortalStrikeLevel" => ParamSlot::Unsigned(&mut self.talents.mortal_strike),
            "crueltyLevel" => ParamSlot::Unsigned(&mut self.talents.cruelty),
            "unbridledWrathLevel" => ParamSlot::Unsigned(&mut self.talents.unbridled_wrath),
            "improvedBattleShoutLevel" => {
                ParamSlot::Unsigned(&mut self.talents.improved_battle_shout)
            }
            "dualWieldSpecLevel" => ParamSlot::Unsigned(&mut self.talents.dual_wield_spec),
            "deathWishLevel" => ParamSlot::Unsigned(&mut self.talents.death_wish),
            "flurryLevel" => ParamSlot::Unsigned(&mut self.talents.flurry),
            "improvedBerserkerRageLevel" => {
                ParamSlot::Unsigned(&mut self.talents.improved_berserker_rage)
            }
            "bloodthirstLevel" => ParamSlot::Unsigned(&mut self.talents.bloodthirst),

            "useWhirlwind" => ParamSlot::Flag(&mut self.abilities.whirlwind),
            "useOverpower" => ParamSlot::Flag(&mut self.abilities.overpower),
            "useBloodrage" => ParamSlot::Flag(&mut self.abilities.bloodrage),
            _ => return None,
        };
        Some(slot)
    }

    /// Current value of a named parameter
    pub fn param(&self, name: &str) -> Option<ParamValue> {
        let mut copy = self.clone();
        let value = match copy.slot(name)? {
            ParamSlot::Flag(v) => ParamValue::Flag(*v),
            ParamSlot::Unsigned(v) => ParamValue::Unsigned(*v),
            ParamSlot::Decimal(v) => ParamValue::Decimal(*v),
        };
        Some(value)
    }

    /// All parameters with their current values, in declaration order
    pub fn params(&self) -> Vec<(&'static str, ParamValue)> {
        PARAM_NAMES
            .iter()
            .filter_map(|name| self.param(name).map(|value| (*name, value)))
            .collect()
    }

    /// Set a named parameter
    ///
    /// Unsigned values widen into decimal parameters, and 0/1 into flags.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let slot = self
            .slot(name)
            .ok_or_else(|| ParamError::UnknownParam(name.to_string()))?;

        match (slot, value) {
            (ParamSlot::Flag(dst), ParamValue::Flag(v)) => *dst = v,
            (ParamSlot::Flag(dst), ParamValue::Unsigned(v)) if v <= 1 => *dst = v == 1,
            (ParamSlot::Unsigned(dst), ParamValue::Unsigned(v)) => *dst = v,
            (ParamSlot::Decimal(dst), ParamValue::Decimal(v)) => *dst = v,
            (ParamSlot::Decimal(dst), ParamValue::Unsigned(v)) => *dst = v as f64,
            (slot, value) => {
                return Err(ParamError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                    expected: slot.expected(),
                })
            }
        }
        Ok(())
    }

    /// Parse a raw string according to the parameter's type and set it
    pub fn set_param_str(&mut self, name: &str, raw: &str) -> Result<(), ParamError> {
        let slot = self
            .slot(name)
            .ok_or_else(|| ParamError::UnknownParam(name.to_string()))?;

        let invalid = |expected| ParamError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
            expected,
        };

        match slot {
            ParamSlot::Flag(dst) => {
                *dst = match raw {
                    "1" => true,
                    "0" => false,
                    _ => return Err(invalid("0 or 1")),
                }
            }
            ParamSlot::Unsigned(dst) => {
                *dst = raw.parse().map_err(|_| invalid("unsigned integer"))?;
            }
            ParamSlot::Decimal(dst) => {
                *dst = raw.parse().map_err(|_| invalid("decimal"))?;
            }
        }
        Ok(())
    }

    /// Apply a `name=value` token
    pub fn apply_token(&mut self, token: &str) -> Result<(), ParamError> {
        let (name, raw) = token
            .split_once('=')
            .ok_or_else(|| ParamError::InvalidToken(token.to_string()))?;
        self.set_param_str(name, raw)
    }

    /// Add an offset to a numeric parameter
    pub fn add_to_param(&mut self, name: &str, offset: ParamValue) -> Result<(), ParamError> {
        let slot = self
            .slot(name)
            .ok_or_else(|| ParamError::UnknownParam(name.to_string()))?;

        match (slot, offset) {
            (ParamSlot::Unsigned(dst), ParamValue::Unsigned(v)) => *dst += v,
            (ParamSlot::Decimal(dst), ParamValue::Decimal(v)) => *dst += v,
            (ParamSlot::Decimal(dst), ParamValue::Unsigned(v)) => *dst += v as f64,
            (slot, value) => {
                return Err(ParamError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                    expected: slot.expected(),
                })
            }
        }
        Ok(())
    }
}

impl ParamSlot<'_> {
    fn expected(&self) -> &'static str {
        match self {
            ParamSlot::Flag(_) => "0 or 1",
            ParamSlot::Unsigned(_) => "unsigned integer",
            ParamSlot::Decimal(_) => "decimal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_parameters() {
        let character = Character::default();
        assert_eq!(character.combat.enemy_level, 63);
        assert!((character.combat.armor_mul - 0.80).abs() < f64::EPSILON);
        assert!(!character.combat.dual_wield);
        assert!((character.main_hand.swing_time - 3.3).abs() < f64::EPSILON);
        assert_eq!(character.main_hand.damage_min, 100);
        assert_eq!(character.main_hand.damage_max, 200);
        assert_eq!(character.talents.points_spent(), 0);
        assert!(character.validate().is_ok());
    }

    #[test]
    fn test_apply_tokens() {
        let mut character = Character::default();
        character.apply_token("strength=223").unwrap();
        character.apply_token("dualWield=1").unwrap();
        character.apply_token("mainSwingTime=2.3").unwrap();
        character.apply_token("flurryLevel=5").unwrap();

        assert_eq!(character.stats.strength, 223);
        assert!(character.combat.dual_wield);
        assert!((character.main_hand.swing_time - 2.3).abs() < f64::EPSILON);
        assert_eq!(character.talents.flurry, 5);
    }

    #[test]
    fn test_bad_tokens() {
        let mut character = Character::default();
        assert!(matches!(
            character.apply_token("strength"),
            Err(ParamError::InvalidToken(_))
        ));
        assert!(matches!(
            character.apply_token("stamina=5"),
            Err(ParamError::UnknownParam(_))
        ));
        assert!(matches!(
            character.apply_token("dualWield=yes"),
            Err(ParamError::InvalidValue { .. })
        ));
        assert!(matches!(
            character.apply_token("strength=-3"),
            Err(ParamError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_set_param_widening() {
        let mut character = Character::default();
        character
            .set_param("armorMul", ParamValue::Unsigned(1))
            .unwrap();
        assert!((character.combat.armor_mul - 1.0).abs() < f64::EPSILON);

        character
            .set_param("frontAttack", ParamValue::Unsigned(1))
            .unwrap();
        assert!(character.combat.front_attack);

        assert!(character
            .set_param("strength", ParamValue::Decimal(1.5))
            .is_err());
        assert!(character
            .set_param("frontAttack", ParamValue::Unsigned(2))
            .is_err());
    }

    #[test]
    fn test_add_to_param() {
        let mut character = Character::default();
        character.stats.hit_bonus = 4;
        character
            .add_to_param("hitBonus", ParamValue::Unsigned(3))
            .unwrap();
        assert_eq!(character.stats.hit_bonus, 7);
        assert!(character
            .add_to_param("dualWield", ParamValue::Unsigned(1))
            .is_err());
    }

    #[test]
    fn test_every_param_name_resolves() {
        let character = Character::default();
        for name in PARAM_NAMES {
            assert!(character.param(name).is_some(), "{} has no slot", name);
        }
        assert_eq!(character.params().len(), PARAM_NAMES.len());
    }

    #[test]
    fn test_validation() {
        let mut character = Character::default();
        character.talents.mortal_strike = 2;
        assert!(matches!(
            character.validate(),
            Err(ParamError::OutOfRange { .. })
        ));

        let mut character = Character::default();
        character.combat.enemy_level = 70;
        assert!(character.validate().is_err());

        let mut character = Character::default();
        character.main_hand.damage_min = 300;
        assert!(character.validate().is_err());

        // The off hand is only checked when dual wielding
        let mut character = Character::default();
        character.off_hand.swing_time = 0.0;
        assert!(character.validate().is_ok());
        character.combat.dual_wield = true;
        assert!(character.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[combat]
dual_wield = true
enemy_level = 62

[stats]
strength = 223
agility = 172

[main_hand]
swing_time = 2.3
damage_min = 63
damage_max = 118

[talents]
flurry = 5
bloodthirst = 1

[abilities]
overpower = false
"#;
        let character = Character::parse(toml).unwrap();
        assert!(character.combat.dual_wield);
        assert_eq!(character.combat.level_delta(), 2);
        assert_eq!(character.stats.agility, 172);
        assert_eq!(character.main_hand.damage_max, 118);
        // Unset sections keep their defaults
        assert!((character.off_hand.swing_time - 3.3).abs() < f64::EPSILON);
        assert_eq!(character.talents.bloodthirst, 1);
        assert!(!character.abilities.overpower);
        assert!(character.abilities.whirlwind);
    }
}
