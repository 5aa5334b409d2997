//! Game session
//!
//! Owns the simulation state, the seeded RNG, the spawn schedule and the
//! high-score store. The host calls `frame` once per animation frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{SimConfig, SpawnSchedule, Theme};
use crate::consts::MAX_FRAME_DT;
use crate::error::{GameError, Result};
use crate::highscores::{HighScore, HighScoreStore};
use crate::sim::{GameEvent, Hud, SimState, TickInput, roll_frame_spawn, spawn_enemy, tick};

pub struct Session<S: HighScoreStore> {
    config: SimConfig,
    theme: Option<Theme>,
    state: Option<SimState>,
    rng: Pcg32,
    /// Seconds banked toward the next interval spawn
    spawn_timer: f32,
    store: S,
    high_score: HighScore,
    seed: u64,
}

impl<S: HighScoreStore> Session<S> {
    /// Validate the config and read the stored best score. A store that
    /// can't be read starts from zero.
    pub fn new(config: SimConfig, mut store: S) -> Result<Self> {
        config.validate()?;
        let high_score = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load high score: {}", e);
            HighScore::default()
        });
        Ok(Self {
            config,
            theme: None,
            state: None,
            rng: Pcg32::seed_from_u64(0),
            spawn_timer: 0.0,
            store,
            high_score,
            seed: 0,
        })
    }

    pub fn select_theme(&mut self, theme: Theme) {
        log::info!("Theme selected: {}", theme.as_str());
        self.theme = Some(theme);
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// Begin a fresh run. Needs a theme.
    pub fn start(&mut self, seed: u64) -> Result<()> {
        let theme = self.theme.ok_or(GameError::NoThemeSelected)?;
        self.state = Some(SimState::new(self.config.clone(), theme));
        self.rng = Pcg32::seed_from_u64(seed);
        self.spawn_timer = 0.0;
        self.seed = seed;
        log::info!("Run started with seed {} ({})", seed, theme.as_str());
        Ok(())
    }

    pub fn restart(&mut self, seed: u64) -> Result<()> {
        self.start(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> Option<&SimState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut SimState> {
        self.state.as_mut()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    /// Run one frame: the simulation step, then the spawn schedule.
    /// `dt` is clamped so a long stall doesn't dump a wave of enemies.
    pub fn frame(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let Some(state) = self.state.as_mut() else {
            return Vec::new();
        };
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let mut events = tick(state, input, dt, &mut self.rng);

        if state.is_playing() {
            match self.config.spawn_schedule {
                SpawnSchedule::Interval { secs } => {
                    self.spawn_timer += dt;
                    while self.spawn_timer >= secs {
                        self.spawn_timer -= secs;
                        events.extend(spawn_enemy(state, &mut self.rng));
                    }
                }
                SpawnSchedule::PerFrameChance { base, per_level } => {
                    events.extend(roll_frame_spawn(state, base, per_level, &mut self.rng));
                }
            }
        }

        let game_over = events.iter().find_map(|e| match e {
            GameEvent::GameOver { score, level } => Some((*score, *level)),
            _ => None,
        });
        if let Some((score, level)) = game_over {
            self.record_run(score, level);
        }

        events
    }

    /// One spawn attempt, for hosts that run their own spawn timer
    pub fn spawn_tick(&mut self) -> Option<GameEvent> {
        let state = self.state.as_mut()?;
        spawn_enemy(state, &mut self.rng)
    }

    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        self.state.as_mut()?.toggle_pause()
    }

    /// The drawable surface changed size. Applies to the current run and
    /// to every later one.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.arena_width = width.max(1.0);
        self.config.arena_height = height.max(1.0);
        if let Some(state) = self.state.as_mut() {
            state.resize(width, height);
        }
    }

    pub fn hud(&self) -> Option<Hud> {
        self.state.as_ref().map(|s| s.hud(self.high_score.best))
    }

    /// Persist the run if it beat the best. Storage failures are logged
    /// and otherwise ignored.
    fn record_run(&mut self, score: u64, level: u32) {
        if !self.high_score.submit(score, level) {
            return;
        }
        log::info!("New high score: {}", score);
        if let Err(e) = self.store.save(&self.high_score) {
            log::warn!("Could not save high score: {}", e);
        }
    }
}
