//! Arena Survivor entry point
//!
//! Headless runner: plays one run with a simple autopilot and reports the
//! result. Rendering backends drive the same `FrameClock` + `TickInput`
//! loop with real input instead.
//!
//! Usage: `arena-survivor [seconds] [easy|normal|hard] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use glam::Vec2;

    use arena_survivor::audio::{AudioManager, LogSink};
    use arena_survivor::consts::{ARENA_HEIGHT, ARENA_WIDTH, SIM_DT};
    use arena_survivor::records::{JsonFileStore, RecordStore};
    use arena_survivor::settings::SETTINGS_FILE;
    use arena_survivor::sim::{FrameClock, GamePhase, GameState, MenuAction, TickInput};
    use arena_survivor::{Difficulty, Settings};

    /// Frame pacing of the simulated display
    const FRAME_DT: f32 = 2.0 * SIM_DT;
    /// Enemies closer than this push the autopilot away
    const THREAT_RADIUS: f32 = 260.0;
    /// Dash when this many enemies are inside `CROWD_RADIUS`
    const CROWD_SIZE: usize = 3;
    const CROWD_RADIUS: f32 = 90.0;

    struct Options {
        seconds: f32,
        difficulty: Option<Difficulty>,
        seed: u64,
    }

    fn parse_args() -> Options {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let seconds = args
            .first()
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|s| *s > 0.0)
            .unwrap_or(180.0);
        let difficulty = args.get(1).and_then(|s| Difficulty::from_str(s));
        if let Some(arg) = args.get(1) {
            if difficulty.is_none() {
                let known: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
                log::warn!("Unknown difficulty '{}' (expected one of {}), using settings", arg, known.join(", "));
            }
        }
        let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0x5eed);
        Options {
            seconds,
            difficulty,
            seed,
        }
    }

    /// Kite away from nearby enemies while shooting the closest one
    fn autopilot(state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.phase {
            GamePhase::StartMenu => input.menu = Some(MenuAction::Start),
            GamePhase::LevelUp => input.menu = Some(MenuAction::ChooseUpgrade(0)),
            GamePhase::Paused => input.menu = Some(MenuAction::Resume),
            GamePhase::Playing => {
                let me = state.player.pos;
                let mut away = Vec2::ZERO;
                let mut crowd = 0;
                for enemy in state.enemies.iter().filter(|e| e.alive) {
                    let offset = me - enemy.pos;
                    let dist = offset.length();
                    if dist < THREAT_RADIUS {
                        away += offset.normalize_or_zero() * (1.0 - dist / THREAT_RADIUS);
                    }
                    if dist < CROWD_RADIUS + enemy.radius {
                        crowd += 1;
                    }
                }
                // Bias toward the arena center
                let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
                away += (center - me) * 0.0008;
                input.joystick = Some(away.clamp_length_max(1.0));
                input.dash = crowd >= CROWD_SIZE;

                if let Some(target) = state.nearest_enemy(me) {
                    input.aim = target.pos;
                    input.fire = true;
                }
            }
            GamePhase::HowToPlay => input.menu = Some(MenuAction::Back),
            GamePhase::GameOver => {}
        }
        input
    }

    pub fn run() {
        let options = parse_args();
        let settings = Settings::load(Path::new(SETTINGS_FILE));
        let store = JsonFileStore::default();

        let mut state = GameState::new(options.seed);
        state.records = store.load_or_default();
        state.apply_settings(&settings);
        if let Some(difficulty) = options.difficulty {
            state.difficulty = difficulty;
        }

        let mut audio = AudioManager::from_settings(&settings);
        let mut sink = LogSink;
        let mut clock = FrameClock::new();

        let max_frames = (options.seconds / FRAME_DT).ceil() as u64 * 4;
        let mut frames = 0u64;
        loop {
            let mut input = autopilot(&state);
            clock.advance_with(&mut state, &mut input, FRAME_DT, |s| {
                audio.dispatch(&s.events, &mut sink);
            });
            frames += 1;

            if state.phase == GamePhase::GameOver || state.elapsed() >= options.seconds || frames >= max_frames
            {
                break;
            }
        }

        let player = &state.player;
        log::info!(
            "{} run finished: {:.1}s, {} kills, level {}, health {:.0}/{:.0}, {} enemies alive, {} sounds",
            state.difficulty.as_str(),
            state.elapsed(),
            player.kills,
            player.level,
            player.health,
            player.max_health,
            state.enemies.len(),
            audio.played()
        );
        if state.take_records_dirty() {
            store.save_best_effort(&state.records);
        }
        log::info!(
            "Best: {:.1}s, {} kills, level {}",
            state.records.best_time,
            state.records.best_kills,
            state.records.best_level
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arena Survivor (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive the library from their own entry point
}
