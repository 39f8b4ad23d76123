//! Frame-driven orchestrator
//!
//! [`Simulation`] owns the match and everything around it: the control flags
//! written by input handlers, the frame clock, the seeded RNG feeding the
//! opponent and the sound/score ports. Whatever schedules frames (browser
//! animation frames, a headless loop, a test) only calls [`Simulation::frame`]
//! or [`Simulation::advance`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{SoundEffect, SoundPort};
use crate::consts::{FRAME_MS, MAX_DELTA_FRAMES};
use crate::highscores::{MatchRecord, ScorePort};
use crate::settings::Settings;
use crate::sim::{
    AiController, ControlKey, Controls, Difficulty, GameConfig, GameEvent, GameState, GameStatus,
    PhysicsConfig, PlayerId, TickInput, rules, tick,
};

/// Latest intent flags per player, written by input handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlBoard {
    player1: Controls,
    player2: Controls,
}

impl ControlBoard {
    /// Idempotent; the last write before a tick wins
    pub fn set_control(&mut self, player: PlayerId, key: ControlKey, pressed: bool) {
        self.get_mut(player).set(key, pressed);
    }

    pub fn get(&self, player: PlayerId) -> Controls {
        match player {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }

    fn get_mut(&mut self, player: PlayerId) -> &mut Controls {
        match player {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        }
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Converts wall-clock timestamps into bounded step sizes
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Step size in nominal frames since the previous call
    ///
    /// The first call yields one frame. Long stalls (a backgrounded tab) are
    /// capped at [`MAX_DELTA_FRAMES`]; timestamps running backwards yield 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) => ((now_ms - last) / FRAME_MS).max(0.0) as f32,
            None => 1.0,
        };
        self.last_ms = Some(now_ms);
        delta.min(MAX_DELTA_FRAMES)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// A running match plus everything needed to advance it
pub struct Simulation {
    state: GameState,
    game: GameConfig,
    physics: PhysicsConfig,
    opponent: Option<AiController>,
    autopilot: Option<AiController>,
    difficulty: Difficulty,
    controls: ControlBoard,
    clock: FrameClock,
    rng: Pcg32,
    seed: u64,
    sound: Box<dyn SoundPort>,
    scores: Box<dyn ScorePort>,
}

impl Simulation {
    /// Build a simulation from settings; the match starts immediately
    pub fn new(
        settings: &Settings,
        seed: u64,
        sound: Box<dyn SoundPort>,
        scores: Box<dyn ScorePort>,
    ) -> Self {
        let opponent = settings
            .vs_computer
            .then(|| AiController::new(settings.difficulty).with_targeting(settings.targeting));
        let state = GameState::new(&settings.game).with_ai_opponent(opponent.is_some());
        log::info!(
            "new match: first to {}, opponent {}",
            settings.game.points_to_win,
            if opponent.is_some() {
                settings.difficulty.as_str()
            } else {
                "human"
            }
        );

        Self {
            state,
            game: settings.game.clone(),
            physics: settings.physics,
            opponent,
            autopilot: None,
            difficulty: settings.difficulty,
            controls: ControlBoard::default(),
            clock: FrameClock::default(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            sound,
            scores,
        }
    }

    /// Park the new match on the title screen until [`Simulation::start`]
    pub fn starting_in_menu(mut self) -> Self {
        self.state.game_status = GameStatus::Menu;
        self
    }

    /// Let the computer drive player one as well (demo / headless play)
    pub fn with_autopilot(mut self, controller: AiController) -> Self {
        self.state.player1.is_ai = true;
        self.autopilot = Some(controller);
        self
    }

    /// Read-only view for the renderer
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Record an input event for the next tick
    pub fn set_control(&mut self, player: PlayerId, key: ControlKey, pressed: bool) {
        self.controls.set_control(player, key, pressed);
    }

    /// Called once per animation frame with a wall-clock timestamp
    ///
    /// Paused or finished matches still consume the timestamp, so resuming
    /// never produces a catch-up step.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let delta = self.clock.delta(now_ms);
        self.advance(delta)
    }

    /// Run one full update pass of `delta_time` nominal frames
    pub fn advance(&mut self, delta_time: f32) -> Vec<GameEvent> {
        if self.state.game_status != GameStatus::Playing {
            return Vec::new();
        }

        let input = self.resolve_input();
        let events = tick(&mut self.state, &input, &self.game, &self.physics, delta_time);
        self.dispatch(&events);
        events
    }

    /// Pause or resume; returns whether anything changed
    pub fn toggle_pause(&mut self) -> bool {
        let changed = rules::toggle_pause(&mut self.state);
        if changed {
            log::info!("match {:?}", self.state.game_status);
        }
        changed
    }

    pub fn pause(&mut self) -> bool {
        rules::pause(&mut self.state)
    }

    /// Start from the menu; no-op otherwise
    pub fn start(&mut self) -> bool {
        rules::start(&mut self.state)
    }

    /// Throw the match away and begin a fresh one
    pub fn reset(&mut self) {
        let is_ai = self.state.player1.is_ai;
        self.state = GameState::new(&self.game).with_ai_opponent(self.opponent.is_some());
        self.state.player1.is_ai = is_ai;
        self.controls.release_all();
        self.clock.reset();
        log::info!("match reset");
    }

    /// Controls for both players: board flags for humans, the AI otherwise
    fn resolve_input(&mut self) -> TickInput {
        let state = &self.state;
        let player1 = match (&self.autopilot, state.player1.is_ai) {
            (Some(ai), true) => {
                ai.controls(&state.player1, &state.ball, &state.court, &self.physics, &mut self.rng)
            }
            _ => self.controls.get(PlayerId::One),
        };
        let player2 = match &self.opponent {
            Some(ai) => {
                ai.controls(&state.player2, &state.ball, &state.court, &self.physics, &mut self.rng)
            }
            None => self.controls.get(PlayerId::Two),
        };
        TickInput { player1, player2 }
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.sound.play(effect);
            }
            if let GameEvent::MatchOver { winner } = *event {
                self.scores.record_match(MatchRecord {
                    score: self.state.score,
                    winner,
                    difficulty: self.opponent.map(|_| self.difficulty),
                    timestamp: now_ms(),
                });
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
