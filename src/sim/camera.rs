//! Camera following the player, with screen shake

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Fraction of the remaining distance closed per second (exponential follow)
pub const FOLLOW_RATE: f32 = 8.0;
/// Shake trauma lost per second
pub const SHAKE_DECAY: f32 = 2.5;
/// Offset in world units at full trauma
pub const MAX_SHAKE_OFFSET: f32 = 14.0;

/// Axis-aligned rectangle in world space (min corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ViewRect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Camera state (center of the view in world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub center: Vec2,
    pub viewport: Vec2,
    /// Shake intensity in [0, 1]
    pub trauma: f32,
    /// Current shake displacement (render-only)
    pub shake_offset: Vec2,
    /// Off under reduced motion
    pub shake_enabled: bool,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            center: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
            viewport,
            trauma: 0.0,
            shake_offset: Vec2::ZERO,
            shake_enabled: true,
        }
    }

    /// Keep the view inside the arena (centered if the view is larger)
    fn clamp_center(&self, c: Vec2) -> Vec2 {
        let half = self.viewport / 2.0;
        let x = if self.viewport.x >= ARENA_WIDTH {
            ARENA_WIDTH / 2.0
        } else {
            c.x.clamp(half.x, ARENA_WIDTH - half.x)
        };
        let y = if self.viewport.y >= ARENA_HEIGHT {
            ARENA_HEIGHT / 2.0
        } else {
            c.y.clamp(half.y, ARENA_HEIGHT - half.y)
        };
        Vec2::new(x, y)
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.center = self.clamp_center(target);
        self.trauma = 0.0;
        self.shake_offset = Vec2::ZERO;
    }

    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = (FOLLOW_RATE * dt).min(1.0);
        self.center = self.clamp_center(self.center + (target - self.center) * t);
    }

    pub fn add_shake(&mut self, amount: f32) {
        if !self.shake_enabled {
            return;
        }
        self.trauma = (self.trauma + amount).min(1.0);
    }

    pub fn update_shake<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if self.trauma <= 0.0 {
            self.shake_offset = Vec2::ZERO;
            return;
        }
        self.trauma = (self.trauma - SHAKE_DECAY * dt).max(0.0);
        // Quadratic falloff feels better than linear
        let magnitude = self.trauma * self.trauma * MAX_SHAKE_OFFSET;
        self.shake_offset = Vec2::new(
            rng.random_range(-1.0..=1.0) * magnitude,
            rng.random_range(-1.0..=1.0) * magnitude,
        );
    }

    /// Visible world rectangle (shake excluded)
    pub fn view_rect(&self) -> ViewRect {
        ViewRect {
            x: self.center.x - self.viewport.x / 2.0,
            y: self.center.y - self.viewport.y / 2.0,
            w: self.viewport.x,
            h: self.viewport.y,
        }
    }

    /// World to screen coordinates (shake included)
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - (self.center + self.shake_offset) + self.viewport / 2.0
    }

    /// Screen to world coordinates, used to translate the aim point
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p + (self.center + self.shake_offset) - self.viewport / 2.0
    }
}
