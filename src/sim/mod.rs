//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of every collection)
//! - No rendering or platform dependencies

pub mod bullet;
pub mod camera;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod grid;
pub mod pickup;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;

use glam::Vec2;

pub use bullet::Bullet;
pub use camera::{Camera, ViewRect};
pub use collision::{CollisionResult, CollisionSystem, DamageHit, Detonation, HitSpark, KilledEnemy};
pub use effects::{DamageNumber, Effects, Particle};
pub use enemy::{Enemy, EnemyKind};
pub use grid::SpatialGrid;
pub use pickup::{Pickup, PickupKind};
pub use player::{Combo, Player};
pub use spawner::{SpawnReport, Spawner};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{FrameClock, MenuAction, TickInput, tick};
pub use upgrades::{UPGRADE_COUNT, UpgradeKind};

/// Capability shared by every simulated object: a circle that can die
pub trait Circle {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn is_alive(&self) -> bool;

    /// Exact circle-circle overlap test
    fn overlaps(&self, other: &impl Circle) -> bool
    where
        Self: Sized,
    {
        crate::circles_overlap(self.pos(), self.radius(), other.pos(), other.radius())
    }
}

/// Remove dead members, keeping survivors in insertion order
pub fn sweep_dead<T: Circle>(items: &mut Vec<T>) {
    items.retain(|e| e.is_alive());
}
