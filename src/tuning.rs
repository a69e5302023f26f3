//! Data-driven game balance
//!
//! Every tunable lives in [`BalanceConfig`]. One preset exists per
//! [`Difficulty`]; the active preset is chosen once at run start and only
//! ever read afterwards. Presets can be overridden from JSON, with missing
//! keys falling back to the Normal preset.

use serde::{Deserialize, Serialize};

use crate::error::PersistResult;

/// Number of enemy variants (length of the per-type multiplier vectors)
pub const ENEMY_KINDS: usize = 6;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Balance preset for this difficulty
    pub fn config(&self) -> BalanceConfig {
        match self {
            Difficulty::Easy => BalanceConfig::easy(),
            Difficulty::Normal => BalanceConfig::normal(),
            Difficulty::Hard => BalanceConfig::hard(),
        }
    }
}

/// Flat table of every tunable constant for one difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    // === Player baselines ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_health: f32,
    /// Shots per second
    pub player_fire_rate: f32,
    pub player_damage: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Invulnerability granted beyond the dash duration
    pub dash_invuln_buffer: f32,
    /// Invulnerability after taking a hit
    pub hit_invuln: f32,
    pub pickup_radius: f32,
    pub joystick_deadzone: f32,
    /// Angle between neighbouring bullets in a spread volley (radians)
    pub spread_step: f32,
    /// Bullets spawn this far in front of the player's center
    pub muzzle_offset: f32,

    // === Per-level upgrade increments ===
    pub damage_per_level: f32,
    pub fire_rate_per_level: f32,
    pub speed_per_level: f32,
    pub health_per_level: f32,
    pub bullet_speed_per_level: f32,
    pub pickup_radius_per_level: f32,
    pub dash_cooldown_per_level: f32,
    pub min_dash_cooldown: f32,

    // === Leveling ===
    pub xp_per_level_mult: u32,
    pub xp_per_level_base: u32,

    // === Combo ===
    pub combo_timeout: f32,
    pub combo_mult_per_kill: f32,
    pub combo_max_mult: f32,

    // === Pickups ===
    pub health_drop_chance: f32,
    pub health_pickup_value: u32,
    pub pickup_lifetime: f32,

    // === Spawn pacing ===
    /// Seconds per danger level
    pub danger_period: f32,
    pub base_spawn_interval: f32,
    pub min_spawn_interval: f32,
    /// Interval shrink per elapsed second
    pub spawn_decay_rate: f32,
    /// Elapsed seconds per extra enemy in a spawn batch
    pub spawn_count_divisor: f32,
    pub max_spawn_per_tick: usize,
    pub max_enemies: usize,
    pub initial_spawn_delay: f32,
    /// Boss every N danger levels
    pub boss_interval: u32,
    /// Type-mix phase boundaries (elapsed seconds)
    pub early_phase_end: f32,
    pub mid_phase_end: f32,

    // === Enemy scaling ===
    /// HP growth per unit of difficulty scalar (elapsed minutes)
    pub enemy_hp_scale: f32,
    pub enemy_speed_scale: f32,
    /// Upper bound on the speed growth factor
    pub max_speed_scale: f32,
    /// Extra boss HP fraction per danger level
    pub boss_hp_per_danger: f32,
    /// Indexed by `EnemyKind::index()`
    pub enemy_hp_mult: [f32; ENEMY_KINDS],
    pub enemy_speed_mult: [f32; ENEMY_KINDS],
    pub enemy_damage_mult: [f32; ENEMY_KINDS],

    // === Ranged ===
    pub ranged_min_distance: f32,
    pub ranged_max_distance: f32,
    pub ranged_range: f32,
    /// Seconds between shots
    pub ranged_fire_interval: f32,
    pub ranged_projectile_speed: f32,
    pub ranged_projectile_damage: f32,

    // === Exploder ===
    pub exploder_radius: f32,
    pub exploder_rush_distance: f32,
    pub exploder_boost: f32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl BalanceConfig {
    /// Normal preset (reference balance)
    pub fn normal() -> Self {
        Self {
            player_radius: 14.0,
            player_speed: 220.0,
            player_health: 100.0,
            player_fire_rate: 4.0,
            player_damage: 1.0,
            bullet_speed: 520.0,
            bullet_radius: 4.0,
            dash_speed: 700.0,
            dash_duration: 0.15,
            dash_cooldown: 1.2,
            dash_invuln_buffer: 0.1,
            hit_invuln: 0.6,
            pickup_radius: 90.0,
            joystick_deadzone: 0.15,
            spread_step: 0.15,
            muzzle_offset: 18.0,

            damage_per_level: 0.5,
            fire_rate_per_level: 0.6,
            speed_per_level: 20.0,
            health_per_level: 20.0,
            bullet_speed_per_level: 60.0,
            pickup_radius_per_level: 30.0,
            dash_cooldown_per_level: 0.15,
            min_dash_cooldown: 0.4,

            xp_per_level_mult: 5,
            xp_per_level_base: 5,

            combo_timeout: 2.5,
            combo_mult_per_kill: 0.1,
            combo_max_mult: 3.0,

            health_drop_chance: 0.05,
            health_pickup_value: 15,
            pickup_lifetime: 20.0,

            danger_period: 30.0,
            base_spawn_interval: 1.6,
            min_spawn_interval: 0.25,
            spawn_decay_rate: 0.008,
            spawn_count_divisor: 45.0,
            max_spawn_per_tick: 6,
            max_enemies: 150,
            initial_spawn_delay: 2.0,
            boss_interval: 3,
            early_phase_end: 60.0,
            mid_phase_end: 180.0,

            enemy_hp_scale: 0.35,
            enemy_speed_scale: 0.06,
            max_speed_scale: 1.6,
            boss_hp_per_danger: 0.25,
            enemy_hp_mult: [1.0; ENEMY_KINDS],
            enemy_speed_mult: [1.0; ENEMY_KINDS],
            enemy_damage_mult: [1.0; ENEMY_KINDS],

            ranged_min_distance: 160.0,
            ranged_max_distance: 260.0,
            ranged_range: 450.0,
            ranged_fire_interval: 2.0,
            ranged_projectile_speed: 220.0,
            ranged_projectile_damage: 8.0,

            exploder_radius: 80.0,
            exploder_rush_distance: 160.0,
            exploder_boost: 1.8,
        }
    }

    /// Easy preset: tougher player, slower pacing, softer enemies
    pub fn easy() -> Self {
        Self {
            player_health: 130.0,
            player_speed: 230.0,
            hit_invuln: 0.8,
            health_drop_chance: 0.08,
            health_pickup_value: 20,
            base_spawn_interval: 2.0,
            min_spawn_interval: 0.4,
            spawn_decay_rate: 0.006,
            max_enemies: 100,
            initial_spawn_delay: 3.0,
            boss_interval: 4,
            enemy_hp_scale: 0.25,
            enemy_hp_mult: [0.8; ENEMY_KINDS],
            enemy_speed_mult: [0.9; ENEMY_KINDS],
            enemy_damage_mult: [0.7; ENEMY_KINDS],
            ranged_fire_interval: 2.6,
            exploder_radius: 70.0,
            ..Self::normal()
        }
    }

    /// Hard preset: fragile player, dense waves, frequent bosses
    pub fn hard() -> Self {
        Self {
            player_health: 80.0,
            hit_invuln: 0.5,
            health_drop_chance: 0.03,
            base_spawn_interval: 1.3,
            min_spawn_interval: 0.18,
            spawn_decay_rate: 0.01,
            spawn_count_divisor: 35.0,
            max_spawn_per_tick: 8,
            max_enemies: 220,
            initial_spawn_delay: 1.5,
            boss_interval: 2,
            enemy_hp_scale: 0.45,
            enemy_hp_mult: [1.25; ENEMY_KINDS],
            enemy_speed_mult: [1.1; ENEMY_KINDS],
            enemy_damage_mult: [1.3; ENEMY_KINDS],
            ranged_fire_interval: 1.6,
            exploder_radius: 90.0,
            ..Self::normal()
        }
    }

    /// Parse a preset from JSON; absent keys keep the Normal values
    pub fn from_json(json: &str) -> PersistResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// XP needed to advance from `level`
    pub fn xp_threshold(&self, level: u32) -> u32 {
        level * self.xp_per_level_mult + self.xp_per_level_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_normal_matches_reference_values() {
        let cfg = Difficulty::Normal.config();
        assert_eq!(cfg.initial_spawn_delay, 2.0);
        assert_eq!(cfg.exploder_radius, 80.0);
        assert_eq!(cfg.xp_threshold(1), 10);
    }

    #[test]
    fn test_presets_order_by_pressure() {
        let easy = BalanceConfig::easy();
        let hard = BalanceConfig::hard();
        assert!(easy.max_enemies < BalanceConfig::normal().max_enemies);
        assert!(hard.max_enemies > BalanceConfig::normal().max_enemies);
        assert!(easy.player_health > hard.player_health);
    }

    #[test]
    fn test_partial_json_override() {
        let cfg = BalanceConfig::from_json(r#"{ "max_enemies": 12, "player_damage": 3.0 }"#)
            .expect("valid json");
        assert_eq!(cfg.max_enemies, 12);
        assert_eq!(cfg.player_damage, 3.0);
        assert_eq!(cfg.bullet_speed, BalanceConfig::normal().bullet_speed);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(BalanceConfig::from_json("{ not json").is_err());
    }
}
