//! Per-tick collision and combat resolution
//!
//! Rebuilds the enemy grid, then runs five ordered checks:
//! 1. player bullets vs enemies (damage, kills, pierce)
//! 2. enemy bullets vs player
//! 3. enemy contact vs player
//! 4. exploder detonations vs player
//! 5. pickups vs player
//!
//! Entity state is mutated in place; outcomes are only accumulated into the
//! reusable [`CollisionResult`]. Applying XP, health and feedback is the
//! caller's job.

use glam::Vec2;

use super::bullet::Bullet;
use super::enemy::{CONTACT_COOLDOWN, Enemy, EnemyKind};
use super::grid::SpatialGrid;
use super::pickup::{Pickup, PickupKind};
use super::Circle;
use super::player::Player;
use crate::circles_overlap;
use crate::consts::{MAX_ENEMY_RADIUS, PICKUP_COLLECT_MARGIN};

/// Spark color for enemy projectiles hitting the player
pub const PLAYER_HIT_COLOR: u32 = 0xff4d4d;

/// Snapshot of an enemy killed this tick
#[derive(Debug, Clone, PartialEq)]
pub struct KilledEnemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub xp_value: u32,
}

/// An exploder that died this tick
#[derive(Debug, Clone, PartialEq)]
pub struct Detonation {
    pub pos: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// Damage dealt to an enemy (floating number feedback)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageHit {
    pub pos: Vec2,
    pub amount: f32,
}

/// Generic hit position (particle feedback)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSpark {
    pub pos: Vec2,
    pub color: u32,
}

/// Everything that happened in one tick's collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionResult {
    pub player_hit: bool,
    pub enemies_killed: Vec<KilledEnemy>,
    pub xp_gained: u32,
    pub health_gained: u32,
    pub pickups_collected: u32,
    pub exploder_deaths: Vec<Detonation>,
    pub enemy_hits: Vec<DamageHit>,
    pub hit_sparks: Vec<HitSpark>,
}

impl CollisionResult {
    /// Reset for reuse without releasing allocations
    pub fn clear(&mut self) {
        self.player_hit = false;
        self.enemies_killed.clear();
        self.xp_gained = 0;
        self.health_gained = 0;
        self.pickups_collected = 0;
        self.exploder_deaths.clear();
        self.enemy_hits.clear();
        self.hit_sparks.clear();
    }
}

/// Owns the enemy grid and the reusable result record
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    pub grid: SpatialGrid,
    query_buf: Vec<usize>,
    result: CollisionResult,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the most recent [`CollisionSystem::resolve`]
    pub fn result(&self) -> &CollisionResult {
        &self.result
    }

    pub fn resolve(
        &mut self,
        player: &mut Player,
        enemies: &mut [Enemy],
        player_bullets: &mut [Bullet],
        enemy_bullets: &mut [Bullet],
        pickups: &mut [Pickup],
    ) -> &CollisionResult {
        self.result.clear();
        self.grid.rebuild(enemies);

        self.player_bullets_vs_enemies(enemies, player_bullets);
        self.enemy_bullets_vs_player(player, enemy_bullets);
        self.contact_vs_player(player, enemies);
        self.detonations_vs_player(player);
        self.pickups_vs_player(player, pickups);

        &self.result
    }

    fn player_bullets_vs_enemies(&mut self, enemies: &mut [Enemy], bullets: &mut [Bullet]) {
        let result = &mut self.result;
        for bullet in bullets.iter_mut().filter(|b| b.alive) {
            self.grid
                .query_circle_into(bullet.pos, bullet.radius + MAX_ENEMY_RADIUS, &mut self.query_buf);

            for &idx in &self.query_buf {
                let enemy = &mut enemies[idx];
                if !enemy.alive || !bullet.overlaps(&*enemy) {
                    continue;
                }

                let killed = enemy.take_damage(bullet.damage);
                result.enemy_hits.push(DamageHit {
                    pos: enemy.pos,
                    amount: bullet.damage,
                });
                result.hit_sparks.push(HitSpark {
                    pos: bullet.pos,
                    color: enemy.kind.color(),
                });

                if killed {
                    result.enemies_killed.push(KilledEnemy {
                        kind: enemy.kind,
                        pos: enemy.pos,
                        radius: enemy.radius,
                        xp_value: enemy.xp_value,
                    });
                    if let Some(radius) = enemy.explosion_radius() {
                        result.exploder_deaths.push(Detonation {
                            pos: enemy.pos,
                            radius,
                            damage: enemy.damage,
                        });
                    }
                }

                if !bullet.consume_pierce() {
                    break;
                }
            }
        }
    }

    fn enemy_bullets_vs_player(&mut self, player: &mut Player, bullets: &mut [Bullet]) {
        if !player.alive || player.is_invulnerable() {
            return;
        }
        for bullet in bullets.iter_mut().filter(|b| b.alive) {
            if bullet.overlaps(&*player) {
                player.take_damage(bullet.damage);
                bullet.alive = false;
                self.result.player_hit = true;
                self.result.hit_sparks.push(HitSpark {
                    pos: bullet.pos,
                    color: PLAYER_HIT_COLOR,
                });
            }
        }
    }

    fn contact_vs_player(&mut self, player: &mut Player, enemies: &mut [Enemy]) {
        if !player.alive {
            return;
        }
        self.grid
            .query_circle_into(player.pos, player.radius + MAX_ENEMY_RADIUS, &mut self.query_buf);

        for &idx in &self.query_buf {
            let enemy = &mut enemies[idx];
            if !enemy.alive || enemy.contact_cooldown > 0.0 {
                continue;
            }
            if enemy.overlaps(&*player) {
                player.take_damage(enemy.damage);
                enemy.contact_cooldown = CONTACT_COOLDOWN;
                self.result.player_hit = true;
                if !player.alive {
                    break;
                }
            }
        }
    }

    fn detonations_vs_player(&mut self, player: &mut Player) {
        if !player.alive || self.result.exploder_deaths.is_empty() {
            return;
        }
        for blast in &self.result.exploder_deaths {
            if circles_overlap(blast.pos, blast.radius, player.pos, player.radius) {
                player.take_blast_damage(blast.damage);
                self.result.player_hit = true;
            }
        }
    }

    /// Not gated on the player being alive
    fn pickups_vs_player(&mut self, player: &Player, pickups: &mut [Pickup]) {
        let reach = player.radius + PICKUP_COLLECT_MARGIN;
        for pickup in pickups.iter_mut().filter(|p| p.alive) {
            if circles_overlap(pickup.pos, pickup.radius, player.pos, reach) {
                pickup.alive = false;
                self.result.pickups_collected += 1;
                match pickup.kind {
                    PickupKind::Xp => self.result.xp_gained += pickup.value,
                    PickupKind::Health => self.result.health_gained += pickup.value,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::BalanceConfig;
    use proptest::prelude::*;

    fn setup() -> (BalanceConfig, Player, CollisionSystem) {
        let cfg = BalanceConfig::normal();
        let player = Player::new(&cfg);
        (cfg, player, CollisionSystem::new())
    }

    fn far_from(player: &Player) -> Vec2 {
        player.pos + Vec2::new(600.0, 0.0)
    }

    fn player_bullet(pos: Vec2, damage: f32, pierce: u32) -> Bullet {
        Bullet::new(pos, Vec2::new(500.0, 0.0), 4.0, damage, pierce, true)
    }

    #[test]
    fn test_two_hits_kill_basic() {
        let (cfg, mut player, mut sys) = setup();
        let at = far_from(&player);
        let mut enemies = vec![Enemy::new(EnemyKind::Basic, at, 0.0, &cfg)];

        let mut bullets = vec![player_bullet(at, 2.0, 0)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);
        assert!(r.enemies_killed.is_empty());
        assert_eq!(r.enemy_hits.len(), 1);
        assert_eq!(enemies[0].hp, 1.0);
        assert!(!bullets[0].alive);

        let mut bullets = vec![player_bullet(at, 2.0, 0)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);
        assert_eq!(r.enemies_killed.len(), 1);
        assert_eq!(r.enemies_killed[0].kind, EnemyKind::Basic);
        assert!(!enemies[0].alive);
    }

    #[test]
    fn test_pierce_hits_two_enemies_then_dies() {
        let (cfg, mut player, mut sys) = setup();
        let at = far_from(&player);
        let mut enemies = vec![
            Enemy::new(EnemyKind::Tank, at, 0.0, &cfg),
            Enemy::new(EnemyKind::Tank, at + Vec2::new(5.0, 0.0), 0.0, &cfg),
            Enemy::new(EnemyKind::Tank, at + Vec2::new(10.0, 0.0), 0.0, &cfg),
        ];
        let mut bullets = vec![player_bullet(at + Vec2::new(5.0, 0.0), 1.0, 1)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);

        assert_eq!(r.enemy_hits.len(), 2);
        assert_eq!(bullets[0].pierce, 0);
        assert!(!bullets[0].alive);
        let damaged = enemies.iter().filter(|e| e.hp < e.max_hp).count();
        assert_eq!(damaged, 2, "third overlapping enemy is never reached");
    }

    #[test]
    fn test_killing_blow_still_spends_pierce() {
        let (cfg, mut player, mut sys) = setup();
        let at = far_from(&player);
        let mut enemies = vec![
            Enemy::new(EnemyKind::Fast, at, 0.0, &cfg),
            Enemy::new(EnemyKind::Fast, at + Vec2::new(3.0, 0.0), 0.0, &cfg),
        ];
        let mut bullets = vec![player_bullet(at, 5.0, 0)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);
        assert_eq!(r.enemies_killed.len(), 1);
        assert_eq!(enemies.iter().filter(|e| e.alive).count(), 1);
    }

    #[test]
    fn test_enemy_bullet_hits_player_once() {
        let (_, mut player, mut sys) = setup();
        let mut shots = vec![Bullet::enemy(player.pos, Vec2::ZERO, 8.0), Bullet::enemy(player.pos, Vec2::ZERO, 8.0)];
        let health = player.health;
        let r = sys.resolve(&mut player, &mut [], &mut [], &mut shots, &mut []);
        assert!(r.player_hit);
        assert_eq!(player.health, health - 8.0);
        // First projectile granted i-frames; the second is still consumed
        assert!(!shots[0].alive);
        assert!(!shots[1].alive);
    }

    #[test]
    fn test_enemy_bullets_skipped_while_invulnerable() {
        let (_, mut player, mut sys) = setup();
        player.invuln_timer = 1.0;
        let mut shots = vec![Bullet::enemy(player.pos, Vec2::ZERO, 8.0)];
        let r = sys.resolve(&mut player, &mut [], &mut [], &mut shots, &mut []);
        assert!(!r.player_hit);
        assert!(shots[0].alive);
    }

    #[test]
    fn test_contact_damage_respects_cooldown() {
        let (cfg, mut player, mut sys) = setup();
        let mut enemies = vec![Enemy::new(EnemyKind::Basic, player.pos, 0.0, &cfg)];
        let r = sys.resolve(&mut player, &mut enemies, &mut [], &mut [], &mut []);
        assert!(r.player_hit);
        assert_eq!(player.health, cfg.player_health - 10.0);
        assert_eq!(enemies[0].contact_cooldown, CONTACT_COOLDOWN);

        player.invuln_timer = 0.0;
        let r = sys.resolve(&mut player, &mut enemies, &mut [], &mut [], &mut []);
        assert!(!r.player_hit);
    }

    #[test]
    fn test_contact_stops_after_lethal_hit() {
        let (cfg, mut player, mut sys) = setup();
        player.health = 5.0;
        let mut enemies = vec![
            Enemy::new(EnemyKind::Basic, player.pos, 0.0, &cfg),
            Enemy::new(EnemyKind::Basic, player.pos, 0.0, &cfg),
        ];
        sys.resolve(&mut player, &mut enemies, &mut [], &mut [], &mut []);
        assert!(!player.alive);
        let cooled = enemies.iter().filter(|e| e.contact_cooldown > 0.0).count();
        assert_eq!(cooled, 1);
    }

    #[test]
    fn test_exploder_detonation_damages_player_once() {
        let (cfg, mut player, mut sys) = setup();
        let at = player.pos + Vec2::new(60.0, 0.0);
        let mut enemies = vec![Enemy::new(EnemyKind::Exploder, at, 0.0, &cfg)];
        let mut bullets = vec![player_bullet(at, 10.0, 0)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);

        assert_eq!(r.exploder_deaths.len(), 1);
        assert_eq!(r.exploder_deaths[0].radius, 80.0);
        assert!(r.player_hit);
        assert_eq!(player.health, cfg.player_health - 25.0);
    }

    #[test]
    fn test_detonation_ignores_invulnerability() {
        let (cfg, mut player, mut sys) = setup();
        player.invuln_timer = 1.0;
        let at = player.pos + Vec2::new(70.0, 0.0);
        let mut enemies = vec![Enemy::new(EnemyKind::Exploder, at, 0.0, &cfg)];
        let mut bullets = vec![player_bullet(at, 10.0, 0)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);

        assert_eq!(r.exploder_deaths.len(), 1);
        assert!(r.player_hit);
        assert_eq!(player.health, cfg.player_health - 25.0);
        assert!(player.alive);
    }

    #[test]
    fn test_detonation_outside_radius_is_harmless() {
        let (cfg, mut player, mut sys) = setup();
        let at = player.pos + Vec2::new(200.0, 0.0);
        let mut enemies = vec![Enemy::new(EnemyKind::Exploder, at, 0.0, &cfg)];
        let mut bullets = vec![player_bullet(at, 10.0, 0)];
        let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);
        assert_eq!(r.exploder_deaths.len(), 1);
        assert!(!r.player_hit);
        assert_eq!(player.health, cfg.player_health);
    }

    #[test]
    fn test_pickups_collected_even_when_dead() {
        let (cfg, mut player, mut sys) = setup();
        player.take_damage(1000.0);
        assert!(!player.alive);
        let mut pickups = vec![
            Pickup::new(PickupKind::Xp, player.pos + Vec2::new(20.0, 0.0), 3, cfg.pickup_lifetime),
            Pickup::new(PickupKind::Health, player.pos, 15, cfg.pickup_lifetime),
            Pickup::new(PickupKind::Xp, player.pos + Vec2::new(300.0, 0.0), 9, cfg.pickup_lifetime),
        ];
        let r = sys.resolve(&mut player, &mut [], &mut [], &mut [], &mut pickups);
        assert_eq!(r.xp_gained, 3);
        assert_eq!(r.health_gained, 15);
        assert_eq!(r.pickups_collected, 2);
        assert!(pickups[2].alive);
    }

    #[test]
    fn test_result_is_cleared_between_ticks() {
        let (cfg, mut player, mut sys) = setup();
        let mut enemies = vec![Enemy::new(EnemyKind::Basic, player.pos, 0.0, &cfg)];
        assert!(sys.resolve(&mut player, &mut enemies, &mut [], &mut [], &mut []).player_hit);
        let r = sys.resolve(&mut player, &mut [], &mut [], &mut [], &mut []);
        assert!(!r.player_hit);
        assert!(r.hit_sparks.is_empty());
    }

    proptest! {
        #[test]
        fn prop_pierce_never_increases(pierce in 0u32..4, offsets in proptest::collection::vec(-20.0f32..20.0, 0..8)) {
            let (cfg, mut player, mut sys) = setup();
            let at = far_from(&player);
            let mut enemies: Vec<Enemy> = offsets
                .iter()
                .map(|dx| Enemy::new(EnemyKind::Tank, at + Vec2::new(*dx, 0.0), 0.0, &cfg))
                .collect();
            let mut bullets = vec![player_bullet(at, 1.0, pierce)];
            let r = sys.resolve(&mut player, &mut enemies, &mut bullets, &mut [], &mut []);
            let hits = r.enemy_hits.len() as u32;

            prop_assert!(bullets[0].pierce <= pierce);
            prop_assert_eq!(hits, (offsets.len() as u32).min(pierce + 1));
            prop_assert_eq!(bullets[0].alive, hits <= pierce);
            prop_assert_eq!(bullets[0].pierce, pierce - hits.min(pierce));
        }
    }
}
