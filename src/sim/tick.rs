//! One simulation step
//!
//! Advances a match by a single update pass. Controls for both players are
//! resolved before the call (human input or the AI controller), so this
//! function does no scheduling and draws no randomness.

use super::collision::{NetContact, resolve_ball_player};
use super::physics::{
    PhysicsConfig, confine_ball, confine_to_ground, confine_to_half, update_ball, update_player,
};
use super::rules::{PointOutcome, award_point};
use super::state::{Controls, GameConfig, GameState, GameStatus, PlayerId, Side};

/// Controls for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub player1: Controls,
    pub player2: Controls,
}

impl TickInput {
    pub fn for_player(&self, id: PlayerId) -> &Controls {
        match id {
            PlayerId::One => &self.player1,
            PlayerId::Two => &self.player2,
        }
    }
}

/// Things that happened during a tick, for sound and bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump { player: PlayerId },
    BallHitPlayer { player: PlayerId },
    BallHitNet,
    BallHitWall,
    PointScored { scorer: PlayerId, landed_on: Side },
    MatchOver { winner: PlayerId },
}

/// Advance the match by `delta_time` nominal frames
///
/// Does nothing unless the match is `Playing`.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    physics: &PhysicsConfig,
    delta_time: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.game_status != GameStatus::Playing {
        return events;
    }
    state.time_ticks += 1;

    let court = state.court;

    for id in [PlayerId::One, PlayerId::Two] {
        let controls = *input.for_player(id);
        let step = update_player(state.player_mut(id), &court, physics, &controls, delta_time);
        if step.jumped {
            events.push(GameEvent::Jump { player: id });
        }
    }

    let ball_step = update_ball(&mut state.ball, &court, physics, delta_time);
    if ball_step.wall_contact {
        events.push(GameEvent::BallHitWall);
    }
    if let Some(NetContact::Top | NetContact::Face(_)) = ball_step.net_contact {
        events.push(GameEvent::BallHitNet);
    }

    for id in [PlayerId::One, PlayerId::Two] {
        let player = match id {
            PlayerId::One => &mut state.player1,
            PlayerId::Two => &mut state.player2,
        };
        if let Some(contact) = resolve_ball_player(player, &mut state.ball, physics.ball_restitution)
        {
            if contact.impulse > 0.0 {
                events.push(GameEvent::BallHitPlayer { player: id });
            }
        }
        let side = player.side();
        confine_to_half(&mut player.body, &court, side);
        confine_to_ground(&mut player.body, &court);
    }
    confine_ball(&mut state.ball, &court);

    if let (true, Some(landed_on)) = (ball_step.scored, ball_step.scoring_side) {
        match award_point(state, config, landed_on) {
            PointOutcome::Serve { scorer, .. } => {
                events.push(GameEvent::PointScored { scorer, landed_on });
            }
            PointOutcome::MatchOver { winner } => {
                events.push(GameEvent::PointScored {
                    scorer: winner,
                    landed_on,
                });
                events.push(GameEvent::MatchOver { winner });
            }
            PointOutcome::Ignored => {}
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn scored(events: &[GameEvent]) -> Vec<PlayerId> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PointScored { scorer, .. } => Some(*scorer),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_opening_drop_scores_exactly_once() {
        let config = GameConfig::default();
        let physics = PhysicsConfig {
            gravity: 0.1,
            ..Default::default()
        };
        let mut state = GameState::new(&config);
        // Park both players where the ball never reaches
        state.player1.body.position.x = 355.0;
        state.player2.body.position.x = 760.0;
        assert_eq!(state.ball.position, Vec2::new(400.0, 100.0));
        assert_eq!(state.ball.velocity, Vec2::new(-1.5, 0.0));

        let input = TickInput::default();
        let mut points = Vec::new();
        for _ in 0..5000 {
            let events = tick(&mut state, &input, &config, &physics, 1.0);
            points.extend(scored(&events));
            if !points.is_empty() {
                break;
            }
        }

        assert_eq!(points.len(), 1);
        assert_eq!(state.score.total(), 1);
        // Drifting left, so it settles on player one's half
        assert_eq!(points[0], PlayerId::Two);
        assert_eq!(state.last_scorer, Some(PlayerId::Two));
        assert_eq!(state.serving_player, PlayerId::One);
    }

    #[test]
    fn test_paused_tick_is_a_no_op() {
        let config = GameConfig::default();
        let physics = PhysicsConfig::default();
        let mut state = GameState::new(&config);
        state.game_status = GameStatus::Paused;
        let before = serde_json::to_string(&state).unwrap();

        let events = tick(&mut state, &TickInput::default(), &config, &physics, 1.0);
        assert!(events.is_empty());
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let config = GameConfig {
            points_to_win: 1,
            ..Default::default()
        };
        let physics = PhysicsConfig::default();
        let mut state = GameState::new(&config);
        state.ball.position = Vec2::new(500.0, 384.5);
        state.ball.velocity = Vec2::ZERO;

        let events = tick(&mut state, &TickInput::default(), &config, &physics, 1.0);
        assert!(events.contains(&GameEvent::MatchOver {
            winner: PlayerId::One
        }));
        assert_eq!(state.game_status, GameStatus::GameOver);

        let frozen = state.time_ticks;
        for _ in 0..100 {
            assert!(tick(&mut state, &TickInput::default(), &config, &physics, 1.0).is_empty());
        }
        assert_eq!(state.time_ticks, frozen);
        assert_eq!(state.score.total(), 1);
        assert_eq!(state.game_status, GameStatus::GameOver);
    }

    #[test]
    fn test_header_reports_player_contact() {
        let config = GameConfig::default();
        let physics = PhysicsConfig::default();
        let mut state = GameState::new(&config);
        let head = state.player1.body.position;
        state.ball.position = head - Vec2::new(0.0, 56.0);
        state.ball.velocity = Vec2::new(0.0, 4.0);

        let events = tick(&mut state, &TickInput::default(), &config, &physics, 1.0);
        assert!(events.contains(&GameEvent::BallHitPlayer {
            player: PlayerId::One
        }));
        assert!(state.ball.velocity.y < 0.0);
        assert!(state.player1.wobble_velocity.length() > 0.0);
    }

    #[test]
    fn test_ball_landing_on_head_keeps_player_on_the_floor() {
        let config = GameConfig::default();
        let physics = PhysicsConfig::default();
        let mut state = GameState::new(&config);
        let head = state.player1.body.position;
        state.ball.position = head - Vec2::new(0.0, 40.0);
        state.ball.velocity = Vec2::new(0.0, 10.0);

        tick(&mut state, &TickInput::default(), &config, &physics, 1.0);
        let body = &state.player1.body;
        assert!(body.position.y + body.radius <= state.court.height + 1e-4);
        assert!(body.velocity.y <= 0.0);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_under_random_input(
            seq in prop::collection::vec((any::<[bool; 6]>(), 0.0f32..=2.0), 1..400)
        ) {
            let config = GameConfig::default();
            let physics = PhysicsConfig::default();
            let mut state = GameState::new(&config);
            let court = state.court;

            for (flags, dt) in seq {
                let input = TickInput {
                    player1: Controls { left: flags[0], right: flags[1], jump: flags[2] },
                    player2: Controls { left: flags[3], right: flags[4], jump: flags[5] },
                };
                let total_before = state.score.total();
                let was_over = state.is_over();
                let events = tick(&mut state, &input, &config, &physics, dt);

                let points = scored(&events).len() as u32;
                prop_assert!(points <= 1);
                prop_assert_eq!(state.score.total(), total_before + points);
                if was_over {
                    prop_assert_eq!(points, 0);
                }

                for player in [&state.player1, &state.player2] {
                    let (min_x, max_x) = court.half_bounds(player.side(), player.body.radius);
                    prop_assert!(player.body.position.x >= min_x && player.body.position.x <= max_x);
                    prop_assert!(player.body.position.y + player.body.radius <= court.height + 1e-3);
                }
                let ball = &state.ball;
                prop_assert!(ball.position.x >= ball.radius && ball.position.x <= court.width - ball.radius);
                prop_assert!(ball.position.y >= ball.radius && ball.position.y <= court.height - ball.radius);
            }
        }
    }
}
