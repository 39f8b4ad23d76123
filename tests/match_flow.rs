use std::cell::RefCell;
use std::rc::Rc;

use jelly_volley::audio::{SoundEffect, SoundPort};
use jelly_volley::consts::FRAME_MS;
use jelly_volley::highscores::{MatchRecord, ScorePort};
use jelly_volley::sim::{AiController, Difficulty, GameEvent, GameStatus, PlayerId};
use jelly_volley::{Settings, Simulation};

#[derive(Clone, Default)]
struct RecordingSound(Rc<RefCell<Vec<SoundEffect>>>);

impl SoundPort for RecordingSound {
    fn play(&mut self, effect: SoundEffect) {
        self.0.borrow_mut().push(effect);
    }
}

#[derive(Clone, Default)]
struct RecordingScores(Rc<RefCell<Vec<MatchRecord>>>);

impl ScorePort for RecordingScores {
    fn record_match(&mut self, record: MatchRecord) {
        self.0.borrow_mut().push(record);
    }
}

fn ai_vs_ai(seed: u64, points_to_win: u32) -> (Simulation, RecordingSound, RecordingScores) {
    let mut settings = Settings {
        difficulty: Difficulty::Hard,
        ..Default::default()
    };
    settings.game.points_to_win = points_to_win;

    let sound = RecordingSound::default();
    let scores = RecordingScores::default();
    let sim = Simulation::new(&settings, seed, Box::new(sound.clone()), Box::new(scores.clone()))
        .with_autopilot(AiController::new(Difficulty::Medium));
    (sim, sound, scores)
}

const MAX_TICKS: u32 = 500_000;

#[test]
fn test_full_match_reaches_game_over() {
    let (mut sim, sound, scores) = ai_vs_ai(2024, 3);

    let mut points = 0;
    let mut ticks = 0;
    while sim.state().game_status == GameStatus::Playing && ticks < MAX_TICKS {
        let before = sim.state().score.total();
        let events = sim.advance(1.0);
        let scored = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PointScored { .. }))
            .count() as u32;
        assert_eq!(sim.state().score.total(), before + scored);
        points += scored;
        ticks += 1;
    }

    let state = sim.state();
    assert_eq!(state.game_status, GameStatus::GameOver);
    let winner = state.winner.expect("finished match has a winner");
    assert_eq!(state.score.of(winner), 3);
    assert!(state.score.of(winner.opponent()) < 3);
    assert_eq!(points, state.score.total());

    let records = scores.0.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].winner, winner);
    assert_eq!(records[0].score, state.score);
    assert_eq!(records[0].difficulty, Some(Difficulty::Hard));

    assert_eq!(
        sound.0.borrow().last().copied(),
        Some(SoundEffect::GameOver)
    );

    // Finished matches stay finished
    let frozen = state.clone();
    for i in 0..120 {
        assert!(sim.frame(i as f64 * FRAME_MS).is_empty());
    }
    assert_eq!(sim.state().score, frozen.score);
    assert_eq!(sim.state().time_ticks, frozen.time_ticks);

    sim.reset();
    assert_eq!(sim.state().game_status, GameStatus::Playing);
    assert_eq!(sim.state().score.total(), 0);
    assert_eq!(sim.state().winner, None);
}

#[test]
fn test_same_seed_same_match() {
    let (mut a, _, _) = ai_vs_ai(99, 2);
    let (mut b, _, _) = ai_vs_ai(99, 2);

    for _ in 0..5_000 {
        a.advance(1.0);
        b.advance(1.0);
    }

    let a = serde_json::to_string(a.state()).unwrap();
    let b = serde_json::to_string(b.state()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_ai_players_stay_on_their_half() {
    let (mut sim, _, _) = ai_vs_ai(7, 5);

    for _ in 0..20_000 {
        sim.advance(1.5);
        let state = sim.state();
        let net_x = state.court.net_x();
        assert!(state.player1.body.position.x < net_x);
        assert!(state.player2.body.position.x > net_x);
        if state.game_status != GameStatus::Playing {
            break;
        }
    }
}

#[test]
fn test_menu_waits_for_start() {
    let settings = Settings::default();
    let mut sim = Simulation::new(
        &settings,
        5,
        Box::new(RecordingSound::default()),
        Box::new(RecordingScores::default()),
    )
    .starting_in_menu();

    let ball = sim.state().ball;
    for _ in 0..10 {
        assert!(sim.advance(1.0).is_empty());
    }
    assert_eq!(sim.state().ball, ball);

    assert!(sim.start());
    sim.advance(1.0);
    assert_ne!(sim.state().ball, ball);
    assert_eq!(sim.state().serving_player, PlayerId::One);
}
