//! Enemy variants and their per-tick behavior
//!
//! Every enemy shares one attribute block; variant-specific state lives in
//! optional sub-structs and behavior is dispatched on [`EnemyKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Circle;
use super::bullet::Bullet;
use crate::clamp_to_arena;
use crate::tuning::BalanceConfig;

/// Seconds between contact hits from the same enemy
pub const CONTACT_COOLDOWN: f32 = 0.5;
/// Duration of the white hit flash
pub const HIT_FLASH_TIME: f32 = 0.1;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Ranged,
    Exploder,
    Boss,
}

/// Base stats before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub radius: f32,
    pub speed: f32,
    pub hp: f32,
    pub damage: f32,
    pub xp: u32,
}

impl EnemyKind {
    /// Index into the balance multiplier vectors
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn base_stats(&self) -> EnemyStats {
        let (radius, speed, hp, damage, xp) = match self {
            EnemyKind::Basic => (14.0, 85.0, 3.0, 10.0, 1),
            EnemyKind::Fast => (10.0, 150.0, 2.0, 7.0, 2),
            EnemyKind::Tank => (24.0, 55.0, 12.0, 20.0, 5),
            EnemyKind::Ranged => (14.0, 70.0, 4.0, 8.0, 3),
            EnemyKind::Exploder => (16.0, 95.0, 3.0, 25.0, 3),
            EnemyKind::Boss => (48.0, 50.0, 150.0, 30.0, 50),
        };
        EnemyStats {
            radius,
            speed,
            hp,
            damage,
            xp,
        }
    }

    /// Particle/spark color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::Basic => 0xe74c3c,
            EnemyKind::Fast => 0xf1c40f,
            EnemyKind::Tank => 0x8e44ad,
            EnemyKind::Ranged => 0x3498db,
            EnemyKind::Exploder => 0xe67e22,
            EnemyKind::Boss => 0xc0392b,
        }
    }
}

/// Ranged enemy sub-state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedParams {
    pub min_distance: f32,
    pub max_distance: f32,
    pub range: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    pub shoot_timer: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
}

/// Exploder sub-state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploderParams {
    pub explosion_radius: f32,
    pub rush_distance: f32,
    pub boost: f32,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Contact (and detonation) damage
    pub damage: f32,
    pub xp_value: u32,
    /// Seconds until this enemy may deal contact damage again
    pub contact_cooldown: f32,
    pub hit_flash: f32,
    pub alive: bool,
    pub ranged: Option<RangedParams>,
    pub exploder: Option<ExploderParams>,
}

impl Enemy {
    /// Build an enemy from the base table, the preset's per-type
    /// multipliers and the continuous difficulty scalar (elapsed minutes).
    pub fn new(kind: EnemyKind, pos: Vec2, difficulty: f32, cfg: &BalanceConfig) -> Self {
        let base = kind.base_stats();
        let i = kind.index();
        let difficulty = difficulty.max(0.0);

        let hp = base.hp * cfg.enemy_hp_mult[i] * (1.0 + difficulty * cfg.enemy_hp_scale);
        let speed_scale = (1.0 + difficulty * cfg.enemy_speed_scale).min(cfg.max_speed_scale);
        let speed = base.speed * cfg.enemy_speed_mult[i] * speed_scale;
        let damage = base.damage * cfg.enemy_damage_mult[i];

        let ranged = (kind == EnemyKind::Ranged).then(|| RangedParams {
            min_distance: cfg.ranged_min_distance,
            max_distance: cfg.ranged_max_distance,
            range: cfg.ranged_range,
            fire_interval: cfg.ranged_fire_interval,
            shoot_timer: cfg.ranged_fire_interval,
            projectile_speed: cfg.ranged_projectile_speed,
            projectile_damage: cfg.ranged_projectile_damage * cfg.enemy_damage_mult[i],
        });
        let exploder = (kind == EnemyKind::Exploder).then(|| ExploderParams {
            explosion_radius: cfg.exploder_radius,
            rush_distance: cfg.exploder_rush_distance,
            boost: cfg.exploder_boost,
        });

        Self {
            kind,
            pos,
            radius: base.radius,
            speed,
            hp,
            max_hp: hp,
            damage,
            xp_value: base.xp,
            contact_cooldown: 0.0,
            hit_flash: 0.0,
            alive: true,
            ranged,
            exploder,
        }
    }

    /// Boss with extra HP for the danger level it marks
    pub fn boss(pos: Vec2, difficulty: f32, danger_level: u32, cfg: &BalanceConfig) -> Self {
        let mut boss = Self::new(EnemyKind::Boss, pos, difficulty, cfg);
        boss.hp *= 1.0 + danger_level as f32 * cfg.boss_hp_per_danger;
        boss.max_hp = boss.hp;
        boss
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Detonation radius, if this enemy explodes on death
    pub fn explosion_radius(&self) -> Option<f32> {
        self.exploder.as_ref().map(|e| e.explosion_radius)
    }

    /// Advance one tick. Ranged enemies may return a projectile.
    pub fn update(&mut self, dt: f32, player_pos: Vec2) -> Option<Bullet> {
        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        let dir = to_player.normalize_or_zero();
        let mut shot = None;

        match self.kind {
            EnemyKind::Ranged => {
                if let Some(r) = self.ranged.as_mut() {
                    if dist < r.min_distance {
                        self.pos -= dir * self.speed * dt;
                    } else if dist > r.max_distance {
                        self.pos += dir * self.speed * dt;
                    }

                    if r.shoot_timer > 0.0 {
                        r.shoot_timer -= dt;
                    }
                    if r.shoot_timer <= 0.0 && dist <= r.range {
                        r.shoot_timer = r.fire_interval;
                        shot = Some(Bullet::enemy(self.pos, dir * r.projectile_speed, r.projectile_damage));
                    }
                }
            }
            EnemyKind::Exploder => {
                let boost = match &self.exploder {
                    Some(e) if dist < e.rush_distance => e.boost,
                    _ => 1.0,
                };
                self.pos += dir * self.speed * boost * dt;
            }
            EnemyKind::Basic | EnemyKind::Fast | EnemyKind::Tank | EnemyKind::Boss => {
                self.pos += dir * self.speed * dt;
            }
        }

        self.pos = clamp_to_arena(self.pos, self.radius);

        if self.contact_cooldown > 0.0 {
            self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);
        }
        if self.hit_flash > 0.0 {
            self.hit_flash = (self.hit_flash - dt).max(0.0);
        }

        shot
    }

    /// Apply damage. Returns true on the hit that kills.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= amount;
        self.hit_flash = HIT_FLASH_TIME;
        if self.hp <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

impl Circle for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
}
