//! Level-scaled damage and heal formulas.

/// Normal damage taken by a shelled target is divided by this.
pub const SHELL_DIVISOR: i32 = 5;

/// Upper bound on the heal fraction granted by an area cast.
pub const HEAL_FRACTION_CAP: f32 = 0.5;

/// Melee damage at `level`: `base + (level - 1) * per_level`.
pub fn melee_damage(base: i32, per_level: i32, level: u8) -> i32 {
    base + (i32::from(level.max(1)) - 1) * per_level
}

/// Area damage at `level`: `base + level * per_level`.
pub fn area_damage(base: i32, per_level: i32, level: u8) -> i32 {
    base + i32::from(level) * per_level
}

/// Heal fraction after striking `targets_hit` targets, capped at
/// [`HEAL_FRACTION_CAP`].
pub fn heal_fraction(base: f32, per_target: f32, targets_hit: u32) -> f32 {
    (base + per_target * targets_hit as f32).min(HEAL_FRACTION_CAP)
}

/// Heal amount for `fraction` of `max_health`, rounded to nearest, at least 1.
pub fn heal_amount(fraction: f32, max_health: i32) -> i32 {
    ((fraction * max_health as f32).round() as i32).max(1)
}

/// Damage a shelled target actually takes from a normal hit.
pub fn shell_intake(amount: i32) -> i32 {
    (amount / SHELL_DIVISOR).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melee_scales_from_level_one() {
        assert_eq!(melee_damage(5, 1, 1), 5);
        assert_eq!(melee_damage(5, 1, 3), 7);
    }

    #[test]
    fn area_scales_with_full_level() {
        assert_eq!(area_damage(2, 1, 1), 3);
        assert_eq!(area_damage(2, 1, 5), 7);
    }

    #[test]
    fn heal_is_capped_rounded_and_at_least_one() {
        assert!((heal_fraction(0.10, 0.01, 3) - 0.13).abs() < 1e-6);
        assert_eq!(heal_fraction(0.10, 0.05, 100), HEAL_FRACTION_CAP);
        assert_eq!(heal_amount(0.13, 100), 13);
        assert_eq!(heal_amount(0.10, 3), 1);
        assert_eq!(heal_amount(0.5, 100), 50);
    }

    #[test]
    fn shell_divides_with_floor_of_one() {
        assert_eq!(shell_intake(50), 10);
        assert_eq!(shell_intake(3), 1);
        assert_eq!(shell_intake(7), 1);
    }
}
