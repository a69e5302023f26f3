//! Arena Survivor - A top-down arena survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawner, collisions, game state)
//! - `tuning`: Data-driven game balance (difficulty presets)
//! - `settings`: Player preferences
//! - `records`: Best-run records with best-effort persistence
//! - `audio`: Sound effect notifications

pub mod audio;
pub mod error;
pub mod records;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{PersistError, PersistResult};
pub use records::BestRecords;
pub use settings::Settings;
pub use tuning::{BalanceConfig, Difficulty};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum frame delta fed to the accumulator (spiral of death guard)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (world units, origin at top-left)
    pub const ARENA_WIDTH: f32 = 2400.0;
    pub const ARENA_HEIGHT: f32 = 2400.0;

    /// Default visible viewport (overridden by the render layer)
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Spatial grid bucket size
    pub const GRID_CELL_SIZE: f32 = 100.0;

    /// Bullets are culled this far outside the arena
    pub const BULLET_BOUNDS_MARGIN: f32 = 50.0;
    /// Largest enemy body radius (boss); bounds bullet broad-phase queries
    pub const MAX_ENEMY_RADIUS: f32 = 48.0;
    /// Extra reach when collecting pickups
    pub const PICKUP_COLLECT_MARGIN: f32 = 10.0;

    /// Collection caps (spawns beyond these are silently dropped)
    pub const MAX_PLAYER_BULLETS: usize = 400;
    pub const MAX_ENEMY_BULLETS: usize = 250;
    pub const MAX_PICKUPS: usize = 300;
    pub const MAX_PARTICLES: usize = 256;
    pub const MAX_DAMAGE_NUMBERS: usize = 64;
}

/// Clamp a scalar into `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// True if two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Clamp a circle's center so the whole body stays inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, radius: f32) -> Vec2 {
    use consts::{ARENA_HEIGHT, ARENA_WIDTH};
    Vec2::new(
        clamp(pos.x, radius, ARENA_WIDTH - radius),
        clamp(pos.y, radius, ARENA_HEIGHT - radius),
    )
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_vec(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
