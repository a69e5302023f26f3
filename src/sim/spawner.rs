//! Time-driven enemy production
//!
//! Pacing is a pure function of elapsed run time: the danger level steps
//! every `danger_period` seconds, the difficulty scalar grows continuously,
//! the spawn interval decays linearly to a floor, and batch size grows with
//! time up to a per-tick maximum and the alive-enemy cap. Bosses arrive once
//! per qualifying danger level, outside the regular budget.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::camera::ViewRect;
use super::enemy::{Enemy, EnemyKind};
use crate::clamp_to_arena;
use crate::tuning::BalanceConfig;

/// Highest danger level
pub const MAX_DANGER_LEVEL: u32 = 10;
/// Spawns land this far outside the visible rectangle
pub const SPAWN_EDGE_BUFFER: f32 = 60.0;
/// Radius used to count crowding around a spawn candidate
pub const SPAWN_PROXIMITY_RADIUS: f32 = 80.0;
/// Stop counting neighbours once this many are found
pub const NEARBY_COUNT_CAP: usize = 3;
/// Candidates tried per placement
pub const SPAWN_CANDIDATES: usize = 3;

/// Cumulative Basic/Fast/Tank/Ranged/Exploder bands for each phase
const EARLY_BANDS: [f32; 5] = [0.70, 1.00, 1.00, 1.00, 1.00];
const MID_BANDS: [f32; 5] = [0.40, 0.65, 0.80, 0.90, 1.00];
const LATE_BANDS: [f32; 5] = [0.20, 0.40, 0.60, 0.80, 1.00];
const BAND_KINDS: [EnemyKind; 5] = [
    EnemyKind::Basic,
    EnemyKind::Fast,
    EnemyKind::Tank,
    EnemyKind::Ranged,
    EnemyKind::Exploder,
];

/// What a spawner update produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: usize,
    pub boss: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Seconds since the run started
    pub elapsed: f32,
    /// Countdown to the next regular batch
    pub spawn_timer: f32,
    /// Danger level of the most recent boss (0 = none yet)
    pub last_boss_level: u32,
}

impl Spawner {
    pub fn new(cfg: &BalanceConfig) -> Self {
        let mut spawner = Self {
            elapsed: 0.0,
            spawn_timer: 0.0,
            last_boss_level: 0,
        };
        spawner.reset(cfg);
        spawner
    }

    pub fn reset(&mut self, cfg: &BalanceConfig) {
        self.elapsed = 0.0;
        self.spawn_timer = cfg.initial_spawn_delay;
        self.last_boss_level = 0;
    }

    pub fn danger_level(&self, cfg: &BalanceConfig) -> u32 {
        danger_level(self.elapsed, cfg)
    }

    /// Continuous scaling input for enemy stats (elapsed minutes)
    pub fn difficulty(&self) -> f32 {
        self.elapsed / 60.0
    }

    pub fn spawn_interval(&self, cfg: &BalanceConfig) -> f32 {
        (cfg.base_spawn_interval - self.elapsed * cfg.spawn_decay_rate).max(cfg.min_spawn_interval)
    }

    /// Batch size before the alive-enemy cap is applied
    pub fn spawn_count(&self, cfg: &BalanceConfig) -> usize {
        let grown = 1 + (self.elapsed / cfg.spawn_count_divisor).floor() as usize;
        grown.min(cfg.max_spawn_per_tick)
    }

    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        cfg: &BalanceConfig,
        enemies: &mut Vec<Enemy>,
        view: ViewRect,
        rng: &mut R,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        self.elapsed += dt;

        let danger = self.danger_level(cfg);
        if cfg.boss_interval > 0
            && danger >= cfg.boss_interval
            && danger % cfg.boss_interval == 0
            && danger != self.last_boss_level
        {
            self.last_boss_level = danger;
            let pos = edge_position(view, EnemyKind::Boss.base_stats().radius, rng);
            enemies.push(Enemy::boss(pos, self.difficulty(), danger, cfg));
            report.boss = true;
            log::info!("Boss spawned at danger level {}", danger);
        }

        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_timer = self.spawn_interval(cfg);

            let alive = enemies.iter().filter(|e| e.alive).count();
            let headroom = cfg.max_enemies.saturating_sub(alive);
            let count = self.spawn_count(cfg).min(headroom);

            for _ in 0..count {
                let kind = pick_kind(self.elapsed, cfg, rng.random::<f32>());
                let pos = place_spawn(view, kind.base_stats().radius, enemies, rng);
                enemies.push(Enemy::new(kind, pos, self.difficulty(), cfg));
            }
            report.spawned = count;
            if count > 0 {
                log::debug!("Spawned {} enemies (alive {}, t={:.1}s)", count, alive + count, self.elapsed);
            }
        }

        report
    }
}

pub fn danger_level(elapsed: f32, cfg: &BalanceConfig) -> u32 {
    let level = (elapsed / cfg.danger_period).floor().max(0.0) as u32 + 1;
    level.min(MAX_DANGER_LEVEL)
}

/// Map a uniform roll in [0, 1) to an enemy kind for the current phase
pub fn pick_kind(elapsed: f32, cfg: &BalanceConfig, roll: f32) -> EnemyKind {
    let bands = if elapsed < cfg.early_phase_end {
        &EARLY_BANDS
    } else if elapsed < cfg.mid_phase_end {
        &MID_BANDS
    } else {
        &LATE_BANDS
    };
    bands
        .iter()
        .position(|&edge| roll < edge)
        .map(|i| BAND_KINDS[i])
        .unwrap_or(EnemyKind::Basic)
}

/// Uniform point just beyond one of the four view edges, clamped into the arena
pub fn edge_position<R: Rng>(view: ViewRect, radius: f32, rng: &mut R) -> Vec2 {
    let t: f32 = rng.random();
    let pos = match rng.random_range(0..4) {
        0 => Vec2::new(view.x + t * view.w, view.y - SPAWN_EDGE_BUFFER),
        1 => Vec2::new(view.x + view.w + SPAWN_EDGE_BUFFER, view.y + t * view.h),
        2 => Vec2::new(view.x + t * view.w, view.y + view.h + SPAWN_EDGE_BUFFER),
        _ => Vec2::new(view.x - SPAWN_EDGE_BUFFER, view.y + t * view.h),
    };
    clamp_to_arena(pos, radius)
}

/// Alive enemies within the proximity radius, counted up to the cap
pub fn count_nearby(pos: Vec2, enemies: &[Enemy]) -> usize {
    let r2 = SPAWN_PROXIMITY_RADIUS * SPAWN_PROXIMITY_RADIUS;
    let mut count = 0;
    for e in enemies {
        if e.alive && e.pos.distance_squared(pos) < r2 {
            count += 1;
            if count >= NEARBY_COUNT_CAP {
                break;
            }
        }
    }
    count
}

/// Pick the least crowded of up to three edge candidates.
///
/// Accepts the first candidate with at most one neighbour; ties keep the
/// earlier candidate.
pub fn place_spawn<R: Rng>(view: ViewRect, radius: f32, enemies: &[Enemy], rng: &mut R) -> Vec2 {
    let mut best = edge_position(view, radius, rng);
    let mut best_count = count_nearby(best, enemies);

    for _ in 1..SPAWN_CANDIDATES {
        if best_count <= 1 {
            break;
        }
        let candidate = edge_position(view, radius, rng);
        let count = count_nearby(candidate, enemies);
        if count < best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
