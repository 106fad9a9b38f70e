//! Per-archetype enemy tuning.

use std::time::Duration;

/// Enemy archetype, also its persisted name.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyTier {
    /// Corrupted pearl: keeps its distance and fires bolts.
    E01,
    /// Small coffee bean: wanders and hurts on contact.
    E02,
    /// Caramel juggernaut: stationary, slams around itself once in sight.
    E03,
    /// Crystallized caramel shell: armored, only a dash breaks it.
    E04,
}

impl EnemyTier {
    pub const fn all() -> [EnemyTier; 4] {
        [EnemyTier::E01, EnemyTier::E02, EnemyTier::E03, EnemyTier::E04]
    }
}

/// What the enemy does when its attack state executes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackStyle {
    /// Never attacks; the enemy only wanders.
    None,
    /// Fires a bolt at the player's current tile.
    Projectile { damage: i32 },
    /// Hits the player if still adjacent.
    Contact { damage: i32 },
    /// Hits every tile within a Chebyshev radius of the attacker.
    Area { radius: u32, damage: i32 },
}

/// Tuning of one archetype.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeProfile {
    pub max_health: i32,
    /// Tiles; entering `Chase` needs the player at or inside this range.
    pub detect_range: f32,
    pub attack_range: f32,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub prepare: Duration,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub cooldown: Duration,
    /// Time between steps; `None` for stationary archetypes.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis::option"))]
    pub move_interval: Option<Duration>,
    /// How long a patrol heading is kept before a new one is rolled.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub patrol_turn: Duration,
    pub attack: AttackStyle,
    /// Damage dealt to a player standing on an occupied cell.
    pub contact_damage: i32,
    /// Side length of the square footprint, in tiles.
    pub footprint: u8,
    /// Attacks only along a clear row or column.
    pub needs_line_of_sight: bool,
    /// Normal hits are reduced; breaking hits kill outright.
    pub shelled: bool,
}

impl ArchetypeProfile {
    /// Whether this archetype ever leaves `Patrol`.
    pub fn is_hostile(&self) -> bool {
        !matches!(self.attack, AttackStyle::None)
    }

    pub fn is_stationary(&self) -> bool {
        self.move_interval.is_none()
    }

    pub fn pearl() -> Self {
        Self {
            max_health: 5,
            detect_range: 6.0,
            attack_range: 5.0,
            prepare: Duration::from_millis(250),
            cooldown: Duration::from_millis(1200),
            move_interval: Some(Duration::from_millis(350)),
            patrol_turn: Duration::from_millis(1500),
            attack: AttackStyle::Projectile { damage: 10 },
            contact_damage: 5,
            footprint: 1,
            needs_line_of_sight: false,
            shelled: false,
        }
    }

    pub fn bean() -> Self {
        Self {
            max_health: 3,
            detect_range: 0.0,
            attack_range: 0.0,
            prepare: Duration::ZERO,
            cooldown: Duration::ZERO,
            move_interval: Some(Duration::from_millis(200)),
            patrol_turn: Duration::from_millis(200),
            attack: AttackStyle::None,
            contact_damage: 5,
            footprint: 1,
            needs_line_of_sight: false,
            shelled: false,
        }
    }

    pub fn juggernaut() -> Self {
        Self {
            max_health: 28,
            detect_range: 7.0,
            attack_range: 1.0,
            prepare: Duration::from_millis(600),
            cooldown: Duration::from_millis(1500),
            move_interval: None,
            patrol_turn: Duration::from_millis(1500),
            attack: AttackStyle::Area {
                radius: 1,
                damage: 10,
            },
            contact_damage: 8,
            footprint: 1,
            needs_line_of_sight: true,
            shelled: false,
        }
    }

    pub fn shell() -> Self {
        Self {
            max_health: 50,
            detect_range: 8.0,
            attack_range: 1.0,
            prepare: Duration::from_millis(500),
            cooldown: Duration::from_millis(1500),
            move_interval: Some(Duration::from_millis(800)),
            patrol_turn: Duration::from_millis(1500),
            attack: AttackStyle::Contact { damage: 8 },
            contact_damage: 8,
            footprint: 2,
            needs_line_of_sight: false,
            shelled: true,
        }
    }
}

/// One profile per tier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArchetypeTable {
    pub e01: ArchetypeProfile,
    pub e02: ArchetypeProfile,
    pub e03: ArchetypeProfile,
    pub e04: ArchetypeProfile,
}

impl ArchetypeTable {
    pub fn get(&self, tier: EnemyTier) -> &ArchetypeProfile {
        match tier {
            EnemyTier::E01 => &self.e01,
            EnemyTier::E02 => &self.e02,
            EnemyTier::E03 => &self.e03,
            EnemyTier::E04 => &self.e04,
        }
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            e01: ArchetypeProfile::pearl(),
            e02: ArchetypeProfile::bean(),
            e03: ArchetypeProfile::juggernaut(),
            e04: ArchetypeProfile::shell(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tiers() {
        let table = ArchetypeTable::default();
        assert!(!table.get(EnemyTier::E02).is_hostile());
        assert!(table.get(EnemyTier::E03).is_stationary());
        assert!(table.get(EnemyTier::E03).needs_line_of_sight);
        assert!(table.get(EnemyTier::E04).shelled);
        assert_eq!(table.get(EnemyTier::E04).footprint, 2);
    }

    #[test]
    fn tiers_parse_from_names() {
        assert_eq!("E03".parse::<EnemyTier>().ok(), Some(EnemyTier::E03));
        assert!("E09".parse::<EnemyTier>().is_err());
    }
}
