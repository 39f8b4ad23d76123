//! Computer opponent
//!
//! Each tick the controller turns the current ball and player state into the
//! same `Controls` flags a human produces. Difficulty only changes three
//! numbers; the decision logic is shared.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::PhysicsConfig;
use super::state::{Body, Controls, Court, Player, Side};

/// Ball positions looked ahead when predicting where it comes down
pub const PREDICTION_STEPS: u32 = 30;
/// Target jitter at zero accuracy, in pixels either way
pub const MAX_JITTER: f32 = 40.0;
/// Dead-zone at perfect reaction time
pub const BASE_REACTION_THRESHOLD: f32 = 5.0;
/// Extra dead-zone at zero reaction time
pub const SLOW_REACTION_THRESHOLD: f32 = 30.0;
/// Ball must be horizontally closer than this for a jump
pub const JUMP_REACH_X: f32 = 80.0;
/// Ball must be no higher than this above the player's centre for a jump
pub const JUMP_REACH_Y: f32 = 200.0;

/// Difficulty knobs, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    /// Higher reacts to smaller target offsets
    pub reaction_time: f32,
    /// Higher aims closer to the predicted landing point
    pub accuracy: f32,
    /// Chance to jump when the ball is in reach
    pub aggressiveness: f32,
}

/// Named difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn config(self) -> AiConfig {
        match self {
            Difficulty::Easy => AiConfig {
                reaction_time: 0.3,
                accuracy: 0.4,
                aggressiveness: 0.3,
            },
            Difficulty::Medium => AiConfig {
                reaction_time: 0.6,
                accuracy: 0.7,
                aggressiveness: 0.5,
            },
            Difficulty::Hard => AiConfig {
                reaction_time: 0.9,
                accuracy: 0.95,
                aggressiveness: 0.8,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl From<Difficulty> for AiConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

/// How the opponent picks the spot it wants to stand under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Targeting {
    /// Extrapolate the ball forward, bouncing off the walls
    Intercept { lookahead: u32 },
    /// Stand under the ball as it is right now
    Shadow,
}

impl Default for Targeting {
    fn default() -> Self {
        Targeting::Intercept {
            lookahead: PREDICTION_STEPS,
        }
    }
}

impl Targeting {
    /// Point the player should move toward, before skill jitter
    pub fn compute_target(&self, ball: &Body, court: &Court, physics: &PhysicsConfig) -> Vec2 {
        match *self {
            Targeting::Intercept { lookahead } => Vec2::new(
                predict_ball_x(ball, court, physics.ball_restitution, lookahead),
                ball.position.y,
            ),
            Targeting::Shadow => ball.position,
        }
    }
}

/// Linear look-ahead of the ball's x, reflecting off the side walls
pub fn predict_ball_x(ball: &Body, court: &Court, restitution: f32, steps: u32) -> f32 {
    let min_x = ball.radius;
    let max_x = court.width - ball.radius;
    let mut x = ball.position.x;
    let mut vx = ball.velocity.x;

    for _ in 0..steps {
        x += vx;
        if x < min_x {
            x = min_x;
            vx = vx.abs() * restitution;
        } else if x > max_x {
            x = max_x;
            vx = -vx.abs() * restitution;
        }
    }
    x
}

/// Where the opponent waits while the ball is away: the middle of its half
pub fn home_x(court: &Court, side: Side) -> f32 {
    match side {
        Side::Left => court.width / 4.0,
        Side::Right => court.width * 3.0 / 4.0,
    }
}

/// Steer toward `target_x`, holding still inside the dead-zone
fn steer(current_x: f32, target_x: f32, threshold: f32) -> Controls {
    let offset = target_x - current_x;
    Controls {
        left: offset < -threshold,
        right: offset > threshold,
        jump: false,
    }
}

/// Decide this tick's controls for a computer-driven player
///
/// Randomness (aim jitter, jump roll) comes from `rng` so a seeded generator
/// gives a repeatable opponent.
pub fn calculate_ai_controls<R: Rng>(
    player: &Player,
    ball: &Body,
    court: &Court,
    config: &AiConfig,
    targeting: &Targeting,
    physics: &PhysicsConfig,
    rng: &mut R,
) -> Controls {
    let side = player.side();
    let body = &player.body;
    let reaction_threshold =
        BASE_REACTION_THRESHOLD + (1.0 - config.reaction_time) * SLOW_REACTION_THRESHOLD;

    // Ball on the other half and heading further away: drift home
    let ball_on_our_side = court.side_of(ball.position.x) == side;
    let ball_moving_away = ball.velocity.x * side.toward_net() > 0.0;
    if !ball_on_our_side && ball_moving_away {
        log::trace!("ai {:?} returning home", player.id);
        return steer(body.position.x, home_x(court, side), reaction_threshold);
    }

    let predicted = targeting.compute_target(ball, court, physics);
    let jitter = (1.0 - config.accuracy) * MAX_JITTER * rng.random_range(-1.0f32..=1.0);
    let (min_x, max_x) = court.half_bounds(side, body.radius);
    let target_x = (predicted.x + jitter).clamp(min_x, max_x);

    let mut controls = steer(body.position.x, target_x, reaction_threshold);

    let ball_close = (ball.position.x - body.position.x).abs() < JUMP_REACH_X;
    let ball_hittable =
        ball.position.y < body.position.y && body.position.y - ball.position.y < JUMP_REACH_Y;
    if body.is_grounded(court) && ball_close && ball_hittable {
        controls.jump = rng.random::<f32>() < config.aggressiveness;
    }

    log::trace!(
        "ai {:?} target_x={:.1} controls={:?}",
        player.id,
        target_x,
        controls
    );
    controls
}

/// A computer opponent: difficulty plus targeting strategy, fixed at build time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    pub config: AiConfig,
    pub targeting: Targeting,
}

impl AiController {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            config: difficulty.config(),
            targeting: Targeting::default(),
        }
    }

    pub fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.targeting = targeting;
        self
    }

    pub fn controls<R: Rng>(
        &self,
        player: &Player,
        ball: &Body,
        court: &Court,
        physics: &PhysicsConfig,
        rng: &mut R,
    ) -> Controls {
        calculate_ai_controls(
            player,
            ball,
            court,
            &self.config,
            &self.targeting,
            physics,
            rng,
        )
    }
}
