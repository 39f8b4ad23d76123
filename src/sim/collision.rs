//! Collision detection and response
//!
//! Circle-circle contacts between the ball and the players are resolved with
//! an impulse; the net is an axis-aligned box standing on the ground.

use glam::Vec2;

use super::physics::add_wobble_impulse;
use crate::{direction_or_zero, distance};
use super::state::{Body, Court, Player, Side};

/// Horizontal speed kept after the ball skims the top of the net
pub const NET_TOP_DAMPING: f32 = 0.7;
/// Smallest sideways speed a ball keeps on the net top, so it rolls off
pub const NET_ROLL_SPEED: f32 = 0.5;
/// Wobble kick applied to a player per ball contact
pub const CONTACT_WOBBLE: f32 = 3.0;

/// Result of a circle-circle contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Overlap that was removed by positional correction
    pub penetration: f32,
    /// Impulse magnitude applied along the normal (0 when already separating)
    pub impulse: f32,
}

/// Which part of the net the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetContact {
    Top,
    /// Ball bounced off the face looking onto this half
    Face(Side),
}

/// Separate two overlapping circles and exchange momentum between them
///
/// Overlap is removed by moving both bodies half the distance along the
/// contact normal regardless of mass. No velocity change happens when the
/// bodies are already moving apart. Returns `None` without touching either
/// body when they do not overlap or their centres coincide.
pub fn resolve_circle_collision(a: &mut Body, b: &mut Body, restitution: f32) -> Option<Contact> {
    let dist = distance(a.position, b.position);
    let min_dist = a.radius + b.radius;

    if dist >= min_dist || dist == 0.0 {
        return None;
    }

    let normal = direction_or_zero(b.position - a.position);
    let penetration = min_dist - dist;
    let correction = normal * (penetration / 2.0);
    a.position -= correction;
    b.position += correction;

    let relative_normal_speed = (b.velocity - a.velocity).dot(normal);
    if relative_normal_speed > 0.0 {
        return Some(Contact {
            normal,
            penetration,
            impulse: 0.0,
        });
    }

    let inv_mass_a = 1.0 / a.mass;
    let inv_mass_b = 1.0 / b.mass;
    let impulse = -(1.0 + restitution) * relative_normal_speed / (inv_mass_a + inv_mass_b);

    a.velocity -= normal * (impulse * inv_mass_a);
    b.velocity += normal * (impulse * inv_mass_b);

    Some(Contact {
        normal,
        penetration,
        impulse,
    })
}

/// Resolve the ball against a player and kick the player's wobble spring
pub fn resolve_ball_player(player: &mut Player, ball: &mut Body, restitution: f32) -> Option<Contact> {
    let contact = resolve_circle_collision(&mut player.body, ball, restitution)?;
    // Ball presses the jelly surface inward
    add_wobble_impulse(player, -contact.normal * CONTACT_WOBBLE);
    Some(contact)
}

/// Closest point of the net box to `point`
fn closest_point_on_net(court: &Court, point: Vec2) -> Vec2 {
    Vec2::new(
        point.x.clamp(court.net_left(), court.net_right()),
        point.y.clamp(court.net_top(), court.height),
    )
}

/// Whether a circle overlaps the net box
pub fn overlaps_net(court: &Court, center: Vec2, radius: f32) -> bool {
    center.distance_squared(closest_point_on_net(court, center)) < radius * radius
}

/// Bounce the ball off the net
///
/// A ball whose centre is above the net top, or whose lower edge was still
/// clear of it last step, rebounds vertically and loses some horizontal
/// speed, never so much that it can come to rest up there.
/// Otherwise it reflects off the face on the side it came from and is placed
/// flush against it. A ball whose centre jumped across the net line in a
/// single step below the net top is treated as a face hit even when it no
/// longer overlaps the box.
pub fn resolve_ball_net(
    ball: &mut Body,
    previous: Vec2,
    court: &Court,
    restitution: f32,
) -> Option<NetContact> {
    let from = court.side_of(previous.x);
    let crossed = from != court.side_of(ball.position.x)
        && ball.position.y + ball.radius > court.net_top()
        && previous.y + ball.radius > court.net_top();

    if !crossed && !overlaps_net(court, ball.position, ball.radius) {
        return None;
    }

    let from_above =
        ball.position.y < court.net_top() || previous.y + ball.radius <= court.net_top();
    if !crossed && from_above {
        ball.position.y = court.net_top() - ball.radius;
        ball.velocity.y = -ball.velocity.y.abs() * restitution;
        ball.velocity.x *= NET_TOP_DAMPING;
        if ball.velocity.x.abs() < NET_ROLL_SPEED {
            ball.velocity.x = if ball.position.x < court.net_x() {
                -NET_ROLL_SPEED
            } else {
                NET_ROLL_SPEED
            };
        }
        return Some(NetContact::Top);
    }

    match from {
        Side::Left => {
            ball.position.x = court.net_left() - ball.radius;
            ball.velocity.x = -ball.velocity.x.abs() * restitution;
        }
        Side::Right => {
            ball.position.x = court.net_right() + ball.radius;
            ball.velocity.x = ball.velocity.x.abs() * restitution;
        }
    }
    Some(NetContact::Face(from))
}
