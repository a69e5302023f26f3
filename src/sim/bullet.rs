//! Projectiles fired by the player and by ranged enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Circle;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, BULLET_BOUNDS_MARGIN};

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 5;

/// Radius of projectiles fired by ranged enemies
pub const ENEMY_BULLET_RADIUS: f32 = 5.0;

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Enemies this bullet may still pass through
    pub pierce: u32,
    pub from_player: bool,
    pub alive: bool,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, damage: f32, pierce: u32, from_player: bool) -> Self {
        Self {
            pos,
            vel,
            radius,
            damage,
            pierce,
            from_player,
            alive: true,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Projectile fired by a ranged enemy
    pub fn enemy(pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self::new(pos, vel, ENEMY_BULLET_RADIUS, damage, 0, false)
    }

    pub fn update(&mut self, dt: f32) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }

        self.pos += self.vel * dt;

        if self.pos.x < -BULLET_BOUNDS_MARGIN
            || self.pos.x > ARENA_WIDTH + BULLET_BOUNDS_MARGIN
            || self.pos.y < -BULLET_BOUNDS_MARGIN
            || self.pos.y > ARENA_HEIGHT + BULLET_BOUNDS_MARGIN
        {
            self.alive = false;
        }
    }

    /// Spend one pierce charge on an enemy hit.
    ///
    /// Returns true if the bullet passes through; otherwise it is now dead.
    pub fn consume_pierce(&mut self) -> bool {
        if self.pierce > 0 {
            self.pierce -= 1;
            true
        } else {
            self.alive = false;
            false
        }
    }
}

impl Circle for Bullet {
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
    fn test_bullet_moves_and_records_trail() {
        let mut b = Bullet::new(Vec2::new(100.0, 100.0), Vec2::new(60.0, 0.0), 4.0, 1.0, 0, true);
        for _ in 0..10 {
            b.update(0.1);
        }
        assert!((b.pos.x - 160.0).abs() < 0.01);
        assert_eq!(b.trail.len(), TRAIL_LENGTH);
        // Newest first
        assert!(b.trail[0].x > b.trail[1].x);
    }

    #[test]
    fn test_bullet_survives_just_past_edge() {
        let mut b = Bullet::new(Vec2::new(ARENA_WIDTH - 1.0, 50.0), Vec2::new(100.0, 0.0), 4.0, 1.0, 0, true);
        b.update(0.1);
        assert!(b.pos.x > ARENA_WIDTH);
        assert!(b.alive, "inside buffer margin");
        b.update(1.0);
        assert!(!b.alive);
    }

    #[test]
    fn test_consume_pierce() {
        let mut b = Bullet::new(Vec2::ZERO, Vec2::ZERO, 4.0, 1.0, 1, true);
        assert!(b.consume_pierce());
        assert_eq!(b.pierce, 0);
        assert!(b.alive);
        assert!(!b.consume_pierce());
        assert_eq!(b.pierce, 0);
        assert!(!b.alive);
    }
}
