//! The player: movement, dash, shooting, damage, XP and combo

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Circle;
use super::bullet::Bullet;
use super::tick::TickInput;
use super::upgrades::{UPGRADE_COUNT, UpgradeKind};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, MAX_PLAYER_BULLETS};
use crate::tuning::BalanceConfig;
use crate::{angle_to_vec, clamp_to_arena};

/// Rolling kill streak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Seconds left before the streak lapses
    pub timer: f32,
    pub multiplier: f32,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            count: 0,
            timer: 0.0,
            multiplier: 1.0,
        }
    }
}

impl Combo {
    /// Count down; returns true on the tick the streak lapses
    pub fn update(&mut self, dt: f32) -> bool {
        if self.timer <= 0.0 {
            return false;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = 0.0;
            self.count = 0;
            self.multiplier = 1.0;
            return true;
        }
        false
    }

    /// Register a kill and return the multiplier to apply to bonus XP
    pub fn register_kill(&mut self, cfg: &BalanceConfig) -> f32 {
        self.count += 1;
        self.timer = cfg.combo_timeout;
        self.multiplier = (1.0 + self.count as f32 * cfg.combo_mult_per_kill).min(cfg.combo_max_mult);
        self.multiplier
    }
}

/// What the player did this tick (for audio/feedback)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerActions {
    pub shots: usize,
    pub dashed: bool,
}

/// The player avatar. One instance lives for the whole process and is
/// reinitialized with [`Player::reset`] at the start of each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing angle toward the aim point (radians)
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub damage: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Current dash cooldown stat (seconds)
    pub dash_cooldown: f32,
    /// Seconds until the next dash is allowed
    pub dash_timer: f32,
    /// Seconds left in the active dash (0 = not dashing)
    pub dash_time_left: f32,
    pub dash_dir: Vec2,
    pub pickup_radius: f32,
    pub invuln_timer: f32,
    /// Invulnerability granted by a hit
    pub hit_invuln: f32,
    /// Seconds until the next volley may fire
    pub fire_timer: f32,
    pub xp: u32,
    pub level: u32,
    pub kills: u32,
    /// Current level per upgrade, indexed by `UpgradeKind::id()`
    pub upgrades: [u8; UPGRADE_COUNT],
    pub combo: Combo,
    pub alive: bool,
}

impl Player {
    pub fn new(cfg: &BalanceConfig) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            radius: 0.0,
            angle: 0.0,
            health: 0.0,
            max_health: 0.0,
            speed: 0.0,
            fire_rate: 0.0,
            damage: 0.0,
            bullet_speed: 0.0,
            bullet_radius: 0.0,
            dash_cooldown: 0.0,
            dash_timer: 0.0,
            dash_time_left: 0.0,
            dash_dir: Vec2::ZERO,
            pickup_radius: 0.0,
            invuln_timer: 0.0,
            hit_invuln: 0.0,
            fire_timer: 0.0,
            xp: 0,
            level: 1,
            kills: 0,
            upgrades: [0; UPGRADE_COUNT],
            combo: Combo::default(),
            alive: true,
        };
        player.reset(cfg);
        player
    }

    /// Reinitialize every run-scoped field
    pub fn reset(&mut self, cfg: &BalanceConfig) {
        self.pos = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
        self.radius = cfg.player_radius;
        self.angle = 0.0;
        self.upgrades = [0; UPGRADE_COUNT];
        self.recompute_stats(cfg);
        self.health = self.max_health;
        self.dash_timer = 0.0;
        self.dash_time_left = 0.0;
        self.dash_dir = Vec2::ZERO;
        self.invuln_timer = 0.0;
        self.hit_invuln = cfg.hit_invuln;
        self.fire_timer = 0.0;
        self.xp = 0;
        self.level = 1;
        self.kills = 0;
        self.combo = Combo::default();
        self.alive = true;
    }

    pub fn upgrade_level(&self, kind: UpgradeKind) -> u8 {
        self.upgrades[kind.id()]
    }

    /// Derive stats from baselines plus upgrade levels
    pub fn recompute_stats(&mut self, cfg: &BalanceConfig) {
        let lvl = |k: UpgradeKind| self.upgrades[k.id()] as f32;
        self.damage = cfg.player_damage + lvl(UpgradeKind::Damage) * cfg.damage_per_level;
        self.fire_rate = cfg.player_fire_rate + lvl(UpgradeKind::FireRate) * cfg.fire_rate_per_level;
        self.speed = cfg.player_speed + lvl(UpgradeKind::MoveSpeed) * cfg.speed_per_level;
        self.max_health = cfg.player_health + lvl(UpgradeKind::MaxHealth) * cfg.health_per_level;
        self.bullet_speed = cfg.bullet_speed + lvl(UpgradeKind::BulletSpeed) * cfg.bullet_speed_per_level;
        self.bullet_radius = cfg.bullet_radius;
        self.pickup_radius = cfg.pickup_radius + lvl(UpgradeKind::Magnet) * cfg.pickup_radius_per_level;
        self.dash_cooldown = (cfg.dash_cooldown - lvl(UpgradeKind::DashCooldown) * cfg.dash_cooldown_per_level)
            .max(cfg.min_dash_cooldown);
        self.health = self.health.min(self.max_health);
    }

    /// Take one level of an upgrade. Returns false if already maxed.
    pub fn apply_upgrade(&mut self, kind: UpgradeKind, cfg: &BalanceConfig) -> bool {
        let level = &mut self.upgrades[kind.id()];
        if *level >= kind.max_level() {
            return false;
        }
        *level += 1;
        self.recompute_stats(cfg);
        if kind == UpgradeKind::MaxHealth {
            self.heal(cfg.health_per_level);
        }
        true
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_time_left > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    /// Advance one tick; fired bullets are appended to `bullets`
    pub fn update(
        &mut self,
        dt: f32,
        input: &TickInput,
        cfg: &BalanceConfig,
        bullets: &mut Vec<Bullet>,
    ) -> PlayerActions {
        let mut actions = PlayerActions::default();

        self.combo.update(dt);

        let to_aim = input.aim - self.pos;
        if to_aim.length_squared() > 0.0 {
            self.angle = to_aim.y.atan2(to_aim.x);
        }

        if self.invuln_timer > 0.0 {
            self.invuln_timer = (self.invuln_timer - dt).max(0.0);
        }
        if self.dash_timer > 0.0 {
            self.dash_timer = (self.dash_timer - dt).max(0.0);
        }

        if self.is_dashing() {
            self.pos += self.dash_dir * cfg.dash_speed * dt;
            self.dash_time_left = (self.dash_time_left - dt).max(0.0);
            self.pos = clamp_to_arena(self.pos, self.radius);
            return actions;
        }

        let dir = self.movement_dir(input, cfg);
        self.pos = clamp_to_arena(self.pos + dir * self.speed * dt, self.radius);

        if input.dash && self.dash_timer <= 0.0 {
            self.dash_dir = if dir.length_squared() > 0.0 {
                dir.normalize_or_zero()
            } else {
                angle_to_vec(self.angle)
            };
            self.dash_time_left = cfg.dash_duration;
            self.dash_timer = self.dash_cooldown;
            self.invuln_timer = self.invuln_timer.max(cfg.dash_duration + cfg.dash_invuln_buffer);
            actions.dashed = true;
        }

        if self.fire_timer > 0.0 {
            self.fire_timer -= dt;
        }
        if self.fire_timer <= 0.0 && input.fire {
            actions.shots = self.fire(cfg, bullets);
            self.fire_timer = 1.0 / self.fire_rate.max(0.01);
        }

        actions
    }

    /// Movement direction from keys or joystick, never longer than 1
    fn movement_dir(&self, input: &TickInput, cfg: &BalanceConfig) -> Vec2 {
        let mut dir = Vec2::ZERO;
        match input.joystick {
            Some(stick) if stick.length() > cfg.joystick_deadzone => dir = stick,
            _ => {
                if input.move_left {
                    dir.x -= 1.0;
                }
                if input.move_right {
                    dir.x += 1.0;
                }
                if input.move_up {
                    dir.y -= 1.0;
                }
                if input.move_down {
                    dir.y += 1.0;
                }
            }
        }
        if dir.length_squared() > 1.0 {
            dir = dir.normalize_or_zero();
        }
        dir
    }

    /// Spawn a fan of `1 + 2 * spread` bullets around the aim angle
    fn fire(&self, cfg: &BalanceConfig, bullets: &mut Vec<Bullet>) -> usize {
        let spread = self.upgrade_level(UpgradeKind::Spread) as i32;
        let pierce = self.upgrade_level(UpgradeKind::Pierce) as u32;
        let muzzle = self.pos + angle_to_vec(self.angle) * cfg.muzzle_offset;

        let mut fired = 0;
        for i in -spread..=spread {
            if bullets.len() >= MAX_PLAYER_BULLETS {
                break;
            }
            let theta = self.angle + i as f32 * cfg.spread_step;
            bullets.push(Bullet::new(
                muzzle,
                angle_to_vec(theta) * self.bullet_speed,
                self.bullet_radius,
                self.damage,
                pierce,
                true,
            ));
            fired += 1;
        }
        fired
    }

    /// Apply damage unless invulnerable. Returns true if it landed.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive || self.is_invulnerable() {
            return false;
        }
        self.apply_damage(amount);
        true
    }

    /// Area damage (exploder detonation) that ignores invulnerability
    pub fn take_blast_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.apply_damage(amount);
        true
    }

    fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        self.invuln_timer = self.hit_invuln;
        if self.health <= 0.0 {
            self.alive = false;
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if self.alive {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// XP needed to leave the current level
    pub fn xp_to_next(&self, cfg: &BalanceConfig) -> u32 {
        cfg.xp_threshold(self.level)
    }

    /// Advance at most one level; surplus XP carries over
    pub fn check_level_up(&mut self, cfg: &BalanceConfig) -> bool {
        let threshold = self.xp_to_next(cfg);
        if self.xp >= threshold {
            self.xp -= threshold;
            self.level += 1;
            return true;
        }
        false
    }
}

impl Circle for Player {
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
