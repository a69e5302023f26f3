//! Level-up upgrades

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Number of distinct upgrades (length of the player's level array)
pub const UPGRADE_COUNT: usize = 9;

/// Upgrades offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    FireRate,
    MoveSpeed,
    MaxHealth,
    BulletSpeed,
    /// Two extra bullets per volley per level
    Spread,
    /// One extra enemy pierced per level
    Pierce,
    /// Wider pickup attraction
    Magnet,
    DashCooldown,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; UPGRADE_COUNT] = [
        UpgradeKind::Damage,
        UpgradeKind::FireRate,
        UpgradeKind::MoveSpeed,
        UpgradeKind::MaxHealth,
        UpgradeKind::BulletSpeed,
        UpgradeKind::Spread,
        UpgradeKind::Pierce,
        UpgradeKind::Magnet,
        UpgradeKind::DashCooldown,
    ];

    /// Index into the player's upgrade level array
    pub fn id(&self) -> usize {
        *self as usize
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    pub fn max_level(&self) -> u8 {
        match self {
            UpgradeKind::Damage | UpgradeKind::FireRate => 8,
            UpgradeKind::MoveSpeed | UpgradeKind::MaxHealth | UpgradeKind::BulletSpeed => 5,
            UpgradeKind::Spread | UpgradeKind::Pierce => 3,
            UpgradeKind::Magnet | UpgradeKind::DashCooldown => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Power Shot",
            UpgradeKind::FireRate => "Rapid Fire",
            UpgradeKind::MoveSpeed => "Swift Feet",
            UpgradeKind::MaxHealth => "Vitality",
            UpgradeKind::BulletSpeed => "Velocity",
            UpgradeKind::Spread => "Multi Shot",
            UpgradeKind::Pierce => "Piercing",
            UpgradeKind::Magnet => "Magnet",
            UpgradeKind::DashCooldown => "Quick Dash",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Bullets deal more damage",
            UpgradeKind::FireRate => "Shoot more often",
            UpgradeKind::MoveSpeed => "Move faster",
            UpgradeKind::MaxHealth => "Raise and restore max health",
            UpgradeKind::BulletSpeed => "Bullets travel faster",
            UpgradeKind::Spread => "Fire two extra bullets",
            UpgradeKind::Pierce => "Bullets pass through one more enemy",
            UpgradeKind::Magnet => "Attract pickups from further away",
            UpgradeKind::DashCooldown => "Dash recharges sooner",
        }
    }
}

/// Offer up to `count` random upgrades that are not yet maxed.
///
/// Shuffles the non-maxed pool and takes the first `count`; an empty result
/// means every upgrade is maxed.
pub fn roll_choices<R: Rng>(levels: &[u8; UPGRADE_COUNT], rng: &mut R, count: usize) -> Vec<UpgradeKind> {
    let mut pool: Vec<UpgradeKind> = UpgradeKind::ALL
        .iter()
        .copied()
        .filter(|u| levels[u.id()] < u.max_level())
        .collect();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
