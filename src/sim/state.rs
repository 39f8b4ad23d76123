//! Game state and core simulation types
//!
//! Everything the renderer reads each frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    /// Waiting on the title screen
    Menu,
    /// Active rally
    Playing,
    /// Ticks are no-ops until resumed
    Paused,
    /// Match decided; terminal until a fresh state is built
    GameOver,
}

/// One of the two players
///
/// Serialised as its player number (`1` or `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayerId {
    One,
    Two,
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.number()
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            n => Err(format!("no player {n}")),
        }
    }
}

impl PlayerId {
    /// 1-based player number as shown on the scoreboard
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Player one always defends the left half
    pub fn side(self) -> Side {
        match self {
            PlayerId::One => Side::Left,
            PlayerId::Two => Side::Right,
        }
    }
}

/// A half of the court, split at the net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The player defending this half
    pub fn owner(self) -> PlayerId {
        match self {
            Side::Left => PlayerId::One,
            Side::Right => PlayerId::Two,
        }
    }

    /// +1 pointing from this half toward the other, -1 otherwise
    pub fn toward_net(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Static court geometry, fixed for the length of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub width: f32,
    pub height: f32,
    pub net_height: f32,
    pub net_width: f32,
}

impl Default for Court {
    fn default() -> Self {
        Self {
            width: COURT_WIDTH,
            height: COURT_HEIGHT,
            net_height: NET_HEIGHT,
            net_width: NET_WIDTH,
        }
    }
}

impl Court {
    /// x-coordinate of the net's centre line
    #[inline]
    pub fn net_x(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn net_left(&self) -> f32 {
        self.net_x() - self.net_width / 2.0
    }

    #[inline]
    pub fn net_right(&self) -> f32 {
        self.net_x() + self.net_width / 2.0
    }

    /// y-coordinate of the top of the net (y grows downward)
    #[inline]
    pub fn net_top(&self) -> f32 {
        self.height - self.net_height
    }

    /// Which half a given x-coordinate falls on
    pub fn side_of(&self, x: f32) -> Side {
        if x < self.net_x() { Side::Left } else { Side::Right }
    }

    /// Horizontal range a body of `radius` may occupy on `side`
    pub fn half_bounds(&self, side: Side, radius: f32) -> (f32, f32) {
        match side {
            Side::Left => (radius, self.net_left() - radius),
            Side::Right => (self.net_right() + radius, self.width - radius),
        }
    }
}

/// Everything needed to build a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub court: Court,
    pub player_radius: f32,
    pub player_mass: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub points_to_win: u32,
    pub serve_height: f32,
    pub serve_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            court: Court::default(),
            player_radius: PLAYER_RADIUS,
            player_mass: PLAYER_MASS,
            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            points_to_win: POINTS_TO_WIN,
            serve_height: SERVE_HEIGHT,
            serve_speed: SERVE_SPEED,
        }
    }
}

impl GameConfig {
    /// Starting x-coordinate for a player: the middle of their half
    pub fn start_x(&self, id: PlayerId) -> f32 {
        match id.side() {
            Side::Left => self.court.width / 4.0,
            Side::Right => self.court.width * 3.0 / 4.0,
        }
    }

    /// Resting y-coordinate of a grounded player
    pub fn ground_y(&self) -> f32 {
        self.court.height - self.player_radius
    }
}

/// Shared shape of anything that moves and collides
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Body {
    pub fn new(position: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            mass,
        }
    }

    /// Lower edge touching or below the ground line
    #[inline]
    pub fn is_grounded(&self, court: &Court) -> bool {
        self.position.y + self.radius >= court.height
    }
}

/// A jelly blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub body: Body,
    /// Squash/stretch spring displacement (visual only)
    pub wobble_offset: Vec2,
    pub wobble_velocity: Vec2,
    pub is_ai: bool,
}

impl Player {
    pub fn new(id: PlayerId, config: &GameConfig, is_ai: bool) -> Self {
        let position = Vec2::new(config.start_x(id), config.ground_y());
        Self {
            id,
            body: Body::new(position, config.player_radius, config.player_mass),
            wobble_offset: Vec2::ZERO,
            wobble_velocity: Vec2::ZERO,
            is_ai,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.id.side()
    }

    /// Back to the starting spot with no motion left over
    pub fn reset(&mut self, config: &GameConfig) {
        self.body.position = Vec2::new(config.start_x(self.id), config.ground_y());
        self.body.velocity = Vec2::ZERO;
        self.wobble_offset = Vec2::ZERO;
        self.wobble_velocity = Vec2::ZERO;
    }
}

/// Per-player intent flags, overwritten every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Which intent flag an input event targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Left,
    Right,
    Jump,
}

impl Controls {
    pub fn set(&mut self, key: ControlKey, pressed: bool) {
        match key {
            ControlKey::Left => self.left = pressed,
            ControlKey::Right => self.right = pressed,
            ControlKey::Jump => self.jump = pressed,
        }
    }
}

/// Points per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub fn of(&self, id: PlayerId) -> u32 {
        match id {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }

    pub fn total(&self) -> u32 {
        self.player1 + self.player2
    }

    pub(crate) fn increment(&mut self, id: PlayerId) -> u32 {
        let tally = match id {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        };
        *tally += 1;
        *tally
    }
}

/// Root aggregate of a match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player1: Player,
    pub player2: Player,
    pub ball: Body,
    pub court: Court,
    pub score: Score,
    pub game_status: GameStatus,
    pub winner: Option<PlayerId>,
    pub last_scorer: Option<PlayerId>,
    pub serving_player: PlayerId,
    /// Points needed to take the match
    pub points_to_win: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Build a fresh match, already in play
    ///
    /// The opening ball drops from high over the net drifting toward player
    /// one's half.
    pub fn new(config: &GameConfig) -> Self {
        let court = config.court;
        let mut ball = Body::new(
            Vec2::new(court.net_x(), OPENING_BALL_Y),
            config.ball_radius,
            config.ball_mass,
        );
        ball.velocity = Vec2::new(-config.serve_speed, 0.0);

        Self {
            player1: Player::new(PlayerId::One, config, false),
            player2: Player::new(PlayerId::Two, config, true),
            ball,
            court,
            score: Score::default(),
            game_status: GameStatus::Playing,
            winner: None,
            last_scorer: None,
            serving_player: PlayerId::One,
            points_to_win: config.points_to_win,
            time_ticks: 0,
        }
    }

    /// Same as [`GameState::new`] but parked on the title screen
    pub fn in_menu(config: &GameConfig) -> Self {
        let mut state = Self::new(config);
        state.game_status = GameStatus::Menu;
        state
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.player1,
            PlayerId::Two => &self.player2,
        }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        }
    }

    /// Mark player two as human or computer controlled
    pub fn with_ai_opponent(mut self, is_ai: bool) -> Self {
        self.player2.is_ai = is_ai;
        self
    }

    pub fn is_over(&self) -> bool {
        self.game_status == GameStatus::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let config = GameConfig::default();
        let state = GameState::new(&config);

        assert_eq!(state.game_status, GameStatus::Playing);
        assert_eq!(state.score, Score::default());
        assert!(state.player1.body.position.x < state.court.net_x());
        assert!(state.player2.body.position.x > state.court.net_x());
        assert!(state.player1.body.is_grounded(&state.court));
        assert!(!state.player1.is_ai);
        assert!(state.player2.is_ai);
        assert_eq!(state.ball.position, Vec2::new(400.0, 100.0));
        assert!(state.ball.velocity.x < 0.0);
    }

    #[test]
    fn test_half_bounds_exclude_net() {
        let court = Court::default();
        let (lo, hi) = court.half_bounds(Side::Left, 40.0);
        assert_eq!(lo, 40.0);
        assert!(hi + 40.0 <= court.net_left());
        let (lo, hi) = court.half_bounds(Side::Right, 40.0);
        assert!(lo - 40.0 >= court.net_right());
        assert_eq!(hi, 760.0);
    }

    #[test]
    fn test_controls_last_write_wins() {
        let mut controls = Controls::default();
        controls.set(ControlKey::Left, true);
        controls.set(ControlKey::Left, true);
        controls.set(ControlKey::Jump, true);
        controls.set(ControlKey::Left, false);
        assert_eq!(
            controls,
            Controls {
                left: false,
                right: false,
                jump: true
            }
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(&GameConfig::default());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"gameStatus\":\"playing\""));
        assert!(json.contains("\"servingPlayer\":1"));
        assert!(json.contains("\"winner\":null"));
    }

    #[test]
    fn test_player_id_is_a_number_on_the_wire() {
        assert_eq!(serde_json::to_string(&Some(PlayerId::Two)).unwrap(), "2");
        let id: PlayerId = serde_json::from_str("1").unwrap();
        assert_eq!(id, PlayerId::One);
        assert!(serde_json::from_str::<PlayerId>("3").is_err());
    }
}
