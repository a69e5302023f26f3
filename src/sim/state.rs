//! Game state and run lifecycle
//!
//! [`GameState`] owns every entity collection, the spawner, the collision
//! system and the active balance preset. Everything the render layer reads
//! after a tick lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::camera::Camera;
use super::collision::CollisionSystem;
use super::effects::Effects;
use super::enemy::Enemy;
use super::pickup::Pickup;
use super::player::Player;
use super::spawner::Spawner;
use super::upgrades::UpgradeKind;
use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::records::BestRecords;
use crate::settings::Settings;
use crate::tuning::{BalanceConfig, Difficulty};

/// Mixed into the run seed for the visual-effects stream
const FX_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    StartMenu,
    HowToPlay,
    /// Active gameplay (the only phase that advances the simulation)
    Playing,
    Paused,
    /// Waiting for an upgrade choice
    LevelUp,
    GameOver,
}

/// Notifications raised during a tick (audio and feedback hooks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Shoot,
    EnemyHit,
    EnemyKilled,
    PlayerHurt,
    Pickup,
    Dash,
    Explosion,
    /// Combo reached a milestone
    Combo(u32),
    BossSpawned,
    LevelUp(u32),
    Death,
    RecordsImproved,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay draws only (spawns, drops, upgrade offers)
    pub rng: Pcg32,
    /// Particles and shake; never read by gameplay
    pub fx_rng: Pcg32,
    pub phase: GamePhase,
    /// Difficulty used for the next run
    pub difficulty: Difficulty,
    /// Balance preset of the current run
    pub config: BalanceConfig,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub spawner: Spawner,
    pub collisions: CollisionSystem,
    pub camera: Camera,
    /// Visual particles and damage numbers (not gameplay-affecting)
    pub effects: Effects,
    /// Upgrades offered in the LevelUp phase
    pub upgrade_choices: Vec<UpgradeKind>,
    /// Spawn floating damage numbers on hits
    pub show_damage_numbers: bool,
    /// Best results, populated by the loader at startup
    pub records: BestRecords,
    /// Set when a finished run improved the records (cleared by the saver)
    pub records_dirty: bool,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game state with the given seed, sitting at the start menu
    pub fn new(seed: u64) -> Self {
        let config = Difficulty::default().config();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            phase: GamePhase::StartMenu,
            difficulty: Difficulty::default(),
            player: Player::new(&config),
            spawner: Spawner::new(&config),
            config,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            pickups: Vec::new(),
            collisions: CollisionSystem::new(),
            camera: Camera::new(Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)),
            effects: Effects::default(),
            upgrade_choices: Vec::new(),
            show_damage_numbers: true,
            records: BestRecords::default(),
            records_dirty: false,
            events: Vec::new(),
            time_ticks: 0,
        }
    }

    /// Begin a fresh run with the selected difficulty
    pub fn start_run(&mut self) {
        self.config = self.difficulty.config();
        self.start_run_with(self.config.clone());
    }

    /// Begin a fresh run with an explicit balance preset
    pub fn start_run_with(&mut self, config: BalanceConfig) {
        self.config = config;
        self.player.reset(&self.config);
        self.spawner.reset(&self.config);
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.pickups.clear();
        self.effects.clear();
        self.upgrade_choices.clear();
        self.camera.snap_to(self.player.pos);
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run started ({}, seed {})", self.difficulty.as_str(), self.seed);
    }

    /// Take the player's preferences (difficulty for the next run, feedback toggles)
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.difficulty = settings.difficulty;
        self.camera.shake_enabled = settings.effective_screen_shake();
        self.show_damage_numbers = settings.damage_numbers;
    }

    /// Resize the visible area (render layer calls this on window resize)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.camera.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Seconds survived in the current run
    pub fn elapsed(&self) -> f32 {
        self.spawner.elapsed
    }

    pub fn danger_level(&self) -> u32 {
        self.spawner.danger_level(&self.config)
    }

    pub fn is_simulating(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Nearest alive enemy to `pos`, if any
    pub fn nearest_enemy(&self, pos: Vec2) -> Option<&Enemy> {
        self.enemies.iter().filter(|e| e.alive).min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
    }

    /// Mark records saved
    pub fn take_records_dirty(&mut self) -> bool {
        std::mem::take(&mut self.records_dirty)
    }
}
