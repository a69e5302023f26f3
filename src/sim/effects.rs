//! Visual feedback (not gameplay-affecting)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::angle_to_vec;
use crate::consts::{MAX_DAMAGE_NUMBERS, MAX_PARTICLES};

/// Seconds a damage number stays visible
pub const DAMAGE_NUMBER_LIFE: f32 = 0.7;
/// Upward drift of damage numbers
pub const DAMAGE_NUMBER_RISE: f32 = 40.0;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Floating damage text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub amount: f32,
    /// Seconds remaining
    pub life: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub damage_numbers: Vec<DamageNumber>,
}

impl Effects {
    pub fn clear(&mut self) {
        self.particles.clear();
        self.damage_numbers.clear();
    }

    /// Radial burst; silently truncated at the particle cap
    pub fn burst<R: Rng>(&mut self, pos: Vec2, color: u32, count: usize, speed: f32, rng: &mut R) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            let s = speed * rng.random_range(0.4..1.0);
            self.particles.push(Particle {
                pos,
                vel: angle_to_vec(theta) * s,
                color,
                life: 1.0,
                size: rng.random_range(2.0..5.0),
            });
        }
    }

    pub fn damage_number(&mut self, pos: Vec2, amount: f32) {
        if self.damage_numbers.len() < MAX_DAMAGE_NUMBERS {
            self.damage_numbers.push(DamageNumber {
                pos,
                amount,
                life: DAMAGE_NUMBER_LIFE,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.vel *= 0.92;
            p.life -= dt * 2.0;
        }
        self.particles.retain(|p| p.life > 0.0);

        for n in &mut self.damage_numbers {
            n.pos.y -= DAMAGE_NUMBER_RISE * dt;
            n.life -= dt;
        }
        self.damage_numbers.retain(|n| n.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_particle_cap() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fx = Effects::default();
        fx.burst(Vec2::ZERO, 0xffffff, MAX_PARTICLES + 50, 100.0, &mut rng);
        assert_eq!(fx.particles.len(), MAX_PARTICLES);
        fx.burst(Vec2::ZERO, 0xffffff, 10, 100.0, &mut rng);
        assert_eq!(fx.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_effects_expire() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fx = Effects::default();
        fx.burst(Vec2::ZERO, 0xffffff, 8, 100.0, &mut rng);
        fx.damage_number(Vec2::new(10.0, 10.0), 2.0);
        fx.update(0.1);
        assert!(fx.damage_numbers[0].pos.y < 10.0);
        for _ in 0..10 {
            fx.update(0.1);
        }
        assert!(fx.particles.is_empty());
        assert!(fx.damage_numbers.is_empty());
    }
}
