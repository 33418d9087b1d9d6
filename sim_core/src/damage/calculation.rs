//! Damage calculation - weapon rolls, ability bases and rage conversion

/// Weapon hit before multipliers: base roll plus attack power scaled by swing time
///
/// Swing time here is the weapon's listed speed, not the hasted one.
pub fn weapon_damage(base: f64, attack_power: f64, swing_time: f64, ap_per_dps: f64) -> f64 {
    base + attack_power / ap_per_dps * swing_time
}

/// Ability damage that adds a flat amount to a weapon hit
pub fn special_base_damage(weapon: f64, bonus: f64) -> f64 {
    weapon + bonus
}

/// Rage generated by a white hit, truncated to whole points
pub fn rage_from_damage(damage: f64, damage_per_rage: f64) -> u32 {
    if damage <= 0.0 || damage_per_rage <= 0.0 {
        return 0;
    }
    (damage / damage_per_rage) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_damage() {
        // 150 base, 193 AP on a 3.3 speed weapon
        let damage = weapon_damage(150.0, 193.0, 3.3, 14.0);
        assert!((damage - (150.0 + 193.0 / 14.0 * 3.3)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_special_base_damage() {
        assert!((special_base_damage(200.0, 160.0) - 360.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rage_from_damage() {
        assert_eq!(rage_from_damage(307.0, 30.7), 10);
        assert_eq!(rage_from_damage(30.6, 30.7), 0);
        assert_eq!(rage_from_damage(0.0, 30.7), 0);
        assert_eq!(rage_from_damage(-5.0, 30.7), 0);
    }
}
