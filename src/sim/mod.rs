//! Simulation core
//!
//! All gameplay logic lives here. Nothing in this module schedules frames,
//! touches the platform or draws randomness on its own:
//! - `delta_time` is supplied by the caller
//! - the AI takes its RNG by reference
//! - `tick` returns events instead of playing sounds

pub mod ai;
pub mod collision;
pub mod physics;
pub mod rules;
pub mod state;
pub mod tick;

pub use ai::{AiConfig, AiController, Difficulty, Targeting, calculate_ai_controls};
pub use collision::{Contact, NetContact, resolve_ball_net, resolve_circle_collision};
pub use physics::{BallStep, PhysicsConfig, PlayerStep, update_ball, update_player};
pub use rules::{PointOutcome, award_point, serve};
pub use state::{
    Body, ControlKey, Controls, Court, GameConfig, GameState, GameStatus, Player, PlayerId,
    Score, Side,
};
pub use tick::{GameEvent, TickInput, tick};
