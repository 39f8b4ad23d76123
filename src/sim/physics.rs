//! Per-body integration: gravity, input forces and court boundaries
//!
//! Explicit Euler, one step per tick. The loop bounds `delta_time` so a single
//! step can never be large enough to carry a body far past a boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{NetContact, resolve_ball_net};
use super::state::{Body, Controls, Court, Player, Side};
use crate::consts::*;

/// Vertical speed below which a grounded player stops bouncing
pub const REST_SPEED: f32 = 0.5;
/// Rebound speed below which a ball on the ground counts as landed
pub const LANDING_SPEED: f32 = 2.0;
/// Body speed above which motion feeds the wobble spring
pub const WOBBLE_SPEED_THRESHOLD: f32 = 3.0;
/// Fraction of body velocity fed into the wobble spring each tick
pub const WOBBLE_MOTION_GAIN: f32 = 0.05;

/// Tunable physics constants, fixed for the length of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
    /// Ground rebound factor for players
    pub player_restitution: f32,
    /// Rebound factor for the ball against ground, walls, net and players
    pub ball_restitution: f32,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    /// Per-tick horizontal velocity retention when no direction is held
    pub friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            move_speed: MOVE_SPEED,
            player_restitution: PLAYER_BOUNCINESS,
            ball_restitution: BALL_RESTITUTION,
            spring_stiffness: SPRING_STIFFNESS,
            spring_damping: SPRING_DAMPING,
            friction: FRICTION,
        }
    }
}

/// What happened to a player during its step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub jumped: bool,
    pub landed: bool,
}

/// What happened to the ball during its step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallStep {
    /// Ball came to rest on the ground this step
    pub scored: bool,
    /// Half the ball landed on, set only when `scored`
    pub scoring_side: Option<Side>,
    pub wall_contact: bool,
    pub net_contact: Option<NetContact>,
}

/// Advance one player by `delta_time` frames
pub fn update_player(
    player: &mut Player,
    court: &Court,
    config: &PhysicsConfig,
    controls: &Controls,
    delta_time: f32,
) -> PlayerStep {
    let mut step = PlayerStep::default();
    let side = player.side();
    let body = &mut player.body;

    body.velocity.y += config.gravity * delta_time;

    // Holding both directions cancels out
    match (controls.left, controls.right) {
        (true, false) => body.velocity.x = -config.move_speed,
        (false, true) => body.velocity.x = config.move_speed,
        _ => body.velocity.x *= config.friction,
    }

    if controls.jump && body.is_grounded(court) {
        body.velocity.y = -config.jump_force;
        step.jumped = true;
    }

    body.position += body.velocity * delta_time;

    if body.position.y + body.radius > court.height {
        let was_falling = body.velocity.y > REST_SPEED;
        body.position.y = court.height - body.radius;
        body.velocity.y = -body.velocity.y * config.player_restitution;
        if body.velocity.y.abs() < REST_SPEED {
            body.velocity.y = 0.0;
        }
        step.landed = was_falling;
    }

    confine_to_half(body, court, side);
    update_wobble(player, config);

    step
}

/// Keep a player inside the outer wall and on its own side of the net
///
/// Position is clamped and horizontal velocity zeroed on contact.
pub fn confine_to_half(body: &mut Body, court: &Court, side: Side) {
    let (min_x, max_x) = court.half_bounds(side, body.radius);
    if body.position.x < min_x {
        body.position.x = min_x;
        body.velocity.x = 0.0;
    } else if body.position.x > max_x {
        body.position.x = max_x;
        body.velocity.x = 0.0;
    }
}

/// Lift a player pushed into the floor back onto it
///
/// Collision correction can move a grounded player downward; any remaining
/// downward velocity is dropped.
pub fn confine_to_ground(body: &mut Body, court: &Court) {
    let floor = court.height - body.radius;
    if body.position.y > floor {
        body.position.y = floor;
        body.velocity.y = body.velocity.y.min(0.0);
    }
}

/// Drive the squash/stretch spring one tick
///
/// Never touches `body`, so gameplay is unaffected.
pub fn update_wobble(player: &mut Player, config: &PhysicsConfig) {
    let velocity = player.body.velocity;
    if velocity.length() > WOBBLE_SPEED_THRESHOLD {
        player.wobble_velocity += velocity * WOBBLE_MOTION_GAIN;
    }

    let force = -player.wobble_offset * config.spring_stiffness;
    player.wobble_velocity = (player.wobble_velocity + force) * config.spring_damping;
    player.wobble_offset += player.wobble_velocity;
}

/// Kick the wobble spring from outside (ball contact)
pub fn add_wobble_impulse(player: &mut Player, impulse: Vec2) {
    player.wobble_velocity += impulse;
}

/// Advance the ball by `delta_time` frames and report contacts and landing
pub fn update_ball(
    ball: &mut Body,
    court: &Court,
    config: &PhysicsConfig,
    delta_time: f32,
) -> BallStep {
    let mut step = BallStep::default();
    let previous = ball.position;
    let restitution = config.ball_restitution;

    ball.velocity.y += config.gravity * delta_time;
    ball.position += ball.velocity * delta_time;

    // Ground: only a dying bounce counts as the ball coming to rest
    if ball.position.y + ball.radius >= court.height {
        ball.position.y = court.height - ball.radius;
        ball.velocity.y = -ball.velocity.y.abs() * restitution;
        if ball.velocity.y.abs() < LANDING_SPEED {
            step.scored = true;
        }
    }

    // Ceiling
    if ball.position.y - ball.radius < 0.0 {
        ball.position.y = ball.radius;
        ball.velocity.y = ball.velocity.y.abs() * restitution;
    }

    // Side walls
    if ball.position.x - ball.radius < 0.0 {
        ball.position.x = ball.radius;
        ball.velocity.x = ball.velocity.x.abs() * restitution;
        step.wall_contact = true;
    } else if ball.position.x + ball.radius > court.width {
        ball.position.x = court.width - ball.radius;
        ball.velocity.x = -ball.velocity.x.abs() * restitution;
        step.wall_contact = true;
    }

    step.net_contact = resolve_ball_net(ball, previous, court, restitution);

    if step.scored {
        step.scoring_side = Some(court.side_of(ball.position.x));
    }

    step
}

/// Pull the ball back inside the court without touching its velocity
///
/// Used after collision resolution, which may push the ball past a wall.
pub fn confine_ball(ball: &mut Body, court: &Court) {
    ball.position.x = ball.position.x.clamp(ball.radius, court.width - ball.radius);
    ball.position.y = ball.position.y.clamp(ball.radius, court.height - ball.radius);
}
