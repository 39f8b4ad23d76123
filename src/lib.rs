//! Jelly Volley - two jelly blobs, one ball, one net
//!
//! Core modules:
//! - `sim`: Simulation core (physics, collisions, AI, match rules)
//! - `driver`: Frame-driven orchestrator around the simulation core
//! - `audio`: Sound effect port (Web Audio on wasm32)
//! - `highscores`: Finished-match history port
//! - `settings`: User-facing configuration

pub mod audio;
pub mod driver;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use driver::Simulation;
pub use highscores::MatchHistory;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
///
/// Velocities are in pixels per nominal frame and `delta_time` is measured in
/// nominal frames, so a `delta_time` of 1.0 is one 60 Hz frame.
pub mod consts {
    /// Nominal frame budget in milliseconds (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest step the loop will integrate, in nominal frames
    pub const MAX_DELTA_FRAMES: f32 = 2.0;

    /// Court dimensions
    pub const COURT_WIDTH: f32 = 800.0;
    pub const COURT_HEIGHT: f32 = 400.0;
    pub const NET_WIDTH: f32 = 10.0;
    pub const NET_HEIGHT: f32 = 100.0;

    /// Player (jelly blob) defaults
    pub const PLAYER_RADIUS: f32 = 40.0;
    pub const PLAYER_MASS: f32 = 5.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_MASS: f32 = 1.0;
    /// Height the opening ball is dropped from, over the net
    pub const OPENING_BALL_Y: f32 = 100.0;
    /// Height above the serving player's head at which the ball is dropped
    pub const SERVE_HEIGHT: f32 = 150.0;
    /// Horizontal serve speed toward the opponent
    pub const SERVE_SPEED: f32 = 1.5;

    pub const POINTS_TO_WIN: u32 = 7;

    /// Physics tuning
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_FORCE: f32 = 12.0;
    pub const MOVE_SPEED: f32 = 6.0;
    pub const PLAYER_BOUNCINESS: f32 = 0.3;
    pub const BALL_RESTITUTION: f32 = 0.8;
    pub const SPRING_STIFFNESS: f32 = 0.3;
    pub const SPRING_DAMPING: f32 = 0.8;
    pub const FRICTION: f32 = 0.85;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector in the direction of `v`, or zero when `v` has no direction
#[inline]
pub fn direction_or_zero(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}
