//! Collectibles dropped by dying enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Circle;

/// Speed at which attracted pickups drift toward the player
pub const ATTRACT_SPEED: f32 = 320.0;
/// Bob amplitude (world units) and angular frequency (rad/s)
pub const BOB_AMPLITUDE: f32 = 3.0;
pub const BOB_FREQUENCY: f32 = 4.0;

pub const XP_PICKUP_RADIUS: f32 = 6.0;
pub const HEALTH_PICKUP_RADIUS: f32 = 8.0;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Xp,
    Health,
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    /// Vertical baseline the bob oscillates around
    pub base_y: f32,
    pub radius: f32,
    pub kind: PickupKind,
    pub value: u32,
    /// Seconds until the pickup expires
    pub lifetime: f32,
    /// Seconds since spawn (drives the bob phase)
    pub age: f32,
    pub alive: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2, value: u32, lifetime: f32) -> Self {
        let radius = match kind {
            PickupKind::Xp => XP_PICKUP_RADIUS,
            PickupKind::Health => HEALTH_PICKUP_RADIUS,
        };
        Self {
            pos,
            base_y: pos.y,
            radius,
            kind,
            value,
            lifetime,
            age: 0.0,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, attraction_radius: f32) {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.alive = false;
            return;
        }
        self.age += dt;

        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist < attraction_radius && dist > 0.0 {
            // Never step past the player
            let step = (ATTRACT_SPEED * dt).min(dist);
            let delta = to_player / dist * step;
            self.pos.x += delta.x;
            self.base_y += delta.y;
        }

        self.pos.y = self.base_y + (self.age * BOB_FREQUENCY).sin() * BOB_AMPLITUDE;
    }
}

impl Circle for Pickup {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_expires() {
        let mut p = Pickup::new(PickupKind::Xp, Vec2::new(100.0, 100.0), 1, 0.5);
        p.update(0.3, Vec2::new(1000.0, 1000.0), 50.0);
        assert!(p.alive);
        p.update(0.3, Vec2::new(1000.0, 1000.0), 50.0);
        assert!(!p.alive);
    }

    #[test]
    fn test_pickup_bobs_without_attraction() {
        let mut p = Pickup::new(PickupKind::Xp, Vec2::new(100.0, 100.0), 1, 10.0);
        p.update(0.2, Vec2::new(1000.0, 1000.0), 50.0);
        assert_eq!(p.pos.x, 100.0);
        assert_eq!(p.base_y, 100.0);
        assert!((p.pos.y - 100.0).abs() <= BOB_AMPLITUDE);
        assert!(p.pos.y != 100.0);
    }

    #[test]
    fn test_attraction_moves_baseline() {
        let mut p = Pickup::new(PickupKind::Health, Vec2::new(100.0, 100.0), 15, 10.0);
        let player = Vec2::new(100.0, 160.0);
        p.update(0.1, player, 90.0);
        assert!((p.base_y - (100.0 + ATTRACT_SPEED * 0.1)).abs() < 0.01);
        assert_eq!(p.pos.x, 100.0);
    }

    #[test]
    fn test_coincident_pickup_does_not_divide_by_zero() {
        let mut p = Pickup::new(PickupKind::Xp, Vec2::new(100.0, 100.0), 1, 10.0);
        p.update(0.1, Vec2::new(100.0, 100.0), 90.0);
        assert!(p.pos.is_finite());
        assert_eq!(p.base_y, 100.0);
    }
}
