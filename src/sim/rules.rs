//! Match state machine: scoring, serving, pausing and the end of the match

use glam::Vec2;

use super::state::{GameConfig, GameState, GameStatus, PlayerId, Side};

/// Outcome of a point being awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// Rally over, ball back in play from `server`'s half
    Serve { scorer: PlayerId, server: PlayerId },
    /// `winner` reached the target score
    MatchOver { winner: PlayerId },
    /// Nothing changed because no rally was in progress
    Ignored,
}

/// Credit the point for a ball that came to rest on `landed_on`
///
/// The player defending that half concedes and serves the next rally.
pub fn award_point(state: &mut GameState, config: &GameConfig, landed_on: Side) -> PointOutcome {
    if state.game_status != GameStatus::Playing {
        return PointOutcome::Ignored;
    }

    let conceded = landed_on.owner();
    let scorer = conceded.opponent();
    let tally = state.score.increment(scorer);
    state.last_scorer = Some(scorer);
    state.serving_player = conceded;

    log::debug!(
        "point to player {} ({}-{})",
        scorer.number(),
        state.score.player1,
        state.score.player2
    );

    if tally >= state.points_to_win {
        state.game_status = GameStatus::GameOver;
        state.winner = Some(scorer);
        log::info!("player {} wins the match", scorer.number());
        return PointOutcome::MatchOver { winner: scorer };
    }

    serve(state, config, conceded);
    PointOutcome::Serve {
        scorer,
        server: conceded,
    }
}

/// Reset both players and put the ball up over `server`'s head
///
/// Every velocity from the previous rally is discarded.
pub fn serve(state: &mut GameState, config: &GameConfig, server: PlayerId) {
    state.player1.reset(config);
    state.player2.reset(config);

    let side = server.side();
    let launch_x = config.start_x(server);
    let launch_y = (config.ground_y() - config.player_radius - config.serve_height)
        .max(config.ball_radius);

    state.ball.position = Vec2::new(launch_x, launch_y);
    state.ball.velocity = Vec2::new(config.serve_speed * side.toward_net(), 0.0);
    state.serving_player = server;

    log::debug!("player {} serves", server.number());
}

/// Enter a match from the title screen
pub fn start(state: &mut GameState) -> bool {
    if state.game_status == GameStatus::Menu {
        state.game_status = GameStatus::Playing;
        log::info!("match started");
        true
    } else {
        false
    }
}

/// Suspend a rally in progress
pub fn pause(state: &mut GameState) -> bool {
    if state.game_status == GameStatus::Playing {
        state.game_status = GameStatus::Paused;
        true
    } else {
        false
    }
}

/// Resume a paused rally
pub fn resume(state: &mut GameState) -> bool {
    if state.game_status == GameStatus::Paused {
        state.game_status = GameStatus::Playing;
        true
    } else {
        false
    }
}

/// Flip between playing and paused; other states are left alone
pub fn toggle_pause(state: &mut GameState) -> bool {
    pause(state) || resume(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_flips_serve_to_conceding_side() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);

        let outcome = award_point(&mut state, &config, Side::Right);
        assert_eq!(
            outcome,
            PointOutcome::Serve {
                scorer: PlayerId::One,
                server: PlayerId::Two
            }
        );
        assert_eq!(state.score.player1, 1);
        assert_eq!(state.score.player2, 0);
        assert_eq!(state.last_scorer, Some(PlayerId::One));
        assert_eq!(state.serving_player, PlayerId::Two);
        // Ball above player two, heading toward player one
        assert!(state.ball.position.x > state.court.net_x());
        assert!(state.ball.position.y < state.player2.body.position.y);
        assert!(state.ball.velocity.x < 0.0);
        assert_eq!(state.ball.velocity.y, 0.0);
    }

    #[test]
    fn test_serve_clears_stale_velocity() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.player1.body.velocity = Vec2::new(6.0, -12.0);
        state.player1.body.position = Vec2::new(300.0, 200.0);
        state.player2.body.velocity = Vec2::new(-6.0, 3.0);
        state.player2.wobble_velocity = Vec2::new(1.0, 1.0);

        award_point(&mut state, &config, Side::Left);
        assert_eq!(state.player1.body.velocity, Vec2::ZERO);
        assert_eq!(state.player2.body.velocity, Vec2::ZERO);
        assert_eq!(state.player2.wobble_velocity, Vec2::ZERO);
        assert_eq!(state.player1.body.position.x, config.start_x(PlayerId::One));
        assert!(state.player1.body.is_grounded(&state.court));
    }

    #[test]
    fn test_match_ends_on_the_winning_point() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);

        for point in 1..config.points_to_win {
            award_point(&mut state, &config, Side::Right);
            assert_eq!(state.score.player1, point);
            assert_eq!(state.game_status, GameStatus::Playing);
        }

        let outcome = award_point(&mut state, &config, Side::Right);
        assert_eq!(outcome, PointOutcome::MatchOver { winner: PlayerId::One });
        assert_eq!(state.score.player1, 7);
        assert_eq!(state.game_status, GameStatus::GameOver);
        assert_eq!(state.winner, Some(PlayerId::One));

        // Terminal: no more points once the match is over
        assert_eq!(award_point(&mut state, &config, Side::Left), PointOutcome::Ignored);
        assert_eq!(state.score.total(), 7);
    }

    #[test]
    fn test_pause_and_resume() {
        let config = GameConfig::default();
        let mut state = GameState::in_menu(&config);

        assert!(!pause(&mut state));
        assert!(start(&mut state));
        assert!(toggle_pause(&mut state));
        assert_eq!(state.game_status, GameStatus::Paused);
        assert_eq!(award_point(&mut state, &config, Side::Left), PointOutcome::Ignored);
        assert!(toggle_pause(&mut state));
        assert_eq!(state.game_status, GameStatus::Playing);

        state.game_status = GameStatus::GameOver;
        assert!(!toggle_pause(&mut state));
        assert!(!start(&mut state));
        assert_eq!(state.game_status, GameStatus::GameOver);
    }
}
