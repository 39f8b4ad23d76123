//! Jelly Volley entry point
//!
//! Browser builds run the match off `requestAnimationFrame` and hand a JSON
//! snapshot to the page's canvas renderer every frame. Native builds play a
//! headless computer-vs-computer match and print the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use jelly_volley::audio::WebAudio;
    use jelly_volley::sim::{ControlKey, GameStatus, PlayerId};
    use jelly_volley::{MatchHistory, Settings, Simulation};

    // Hands each frame's state to the page; the renderer lives in JS
    #[wasm_bindgen(inline_js = "
        export function render_snapshot(json) {
            if (typeof window.renderJellyVolley === 'function') {
                window.renderJellyVolley(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_snapshot(json: &str);
    }

    /// Map a key to the player and flag it drives
    fn key_binding(key: &str, vs_computer: bool) -> Option<(PlayerId, ControlKey)> {
        match key {
            "a" | "A" => Some((PlayerId::One, ControlKey::Left)),
            "d" | "D" => Some((PlayerId::One, ControlKey::Right)),
            "w" | "W" => Some((PlayerId::One, ControlKey::Jump)),
            "ArrowLeft" if vs_computer => Some((PlayerId::One, ControlKey::Left)),
            "ArrowRight" if vs_computer => Some((PlayerId::One, ControlKey::Right)),
            "ArrowUp" | " " if vs_computer => Some((PlayerId::One, ControlKey::Jump)),
            "ArrowLeft" => Some((PlayerId::Two, ControlKey::Left)),
            "ArrowRight" => Some((PlayerId::Two, ControlKey::Right)),
            "ArrowUp" => Some((PlayerId::Two, ControlKey::Jump)),
            _ => None,
        }
    }

    struct Game {
        sim: Simulation,
        settings: Settings,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            let mut audio = WebAudio::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            let sim = Simulation::new(
                &settings,
                seed,
                Box::new(audio),
                Box::new(MatchHistory::load()),
            )
            .starting_in_menu();
            Self { sim, settings }
        }

        fn render(&self) {
            match serde_json::to_string(self.sim.state()) {
                Ok(json) => render_snapshot(&json),
                Err(e) => log::warn!("Snapshot failed: {}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Jelly Volley starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    "Escape" | "p" | "P" => {
                        g.sim.toggle_pause();
                    }
                    "Enter" => {
                        if g.sim.state().game_status == GameStatus::GameOver {
                            g.sim.reset();
                        } else {
                            g.sim.start();
                        }
                    }
                    _ => {
                        if let Some((player, control)) = key_binding(&key, g.settings.vs_computer) {
                            event.prevent_default();
                            g.sim.set_control(player, control, true);
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some((player, control)) = key_binding(&event.key(), g.settings.vs_computer) {
                    g.sim.set_control(player, control, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.settings.pause_on_blur && g.sim.pause() {
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.pause_on_blur && g.sim.pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Paused frames still reschedule; stopping means not rescheduling
    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.sim.frame(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;

    use jelly_volley::audio::Silent;
    use jelly_volley::sim::{AiController, Difficulty, GameStatus};
    use jelly_volley::{MatchHistory, Settings, Simulation};

    /// Headless computer-vs-computer Jelly Volley match
    #[derive(Parser, Debug)]
    #[command(version, about)]
    pub struct Args {
        /// JSON settings file
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// RNG seed for the opponents
        #[arg(long, default_value_t = 1)]
        pub seed: u64,

        /// Right-hand opponent strength (easy, medium, hard)
        #[arg(long, value_parser = parse_difficulty)]
        pub difficulty: Option<Difficulty>,

        /// Points needed to win
        #[arg(long)]
        pub points_to_win: Option<u32>,

        /// Give up after this many simulated seconds
        #[arg(long, default_value_t = 3600)]
        pub max_seconds: u32,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        let mut settings = match &args.settings {
            Some(path) => Settings::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Settings::load(),
        };
        if let Some(difficulty) = args.difficulty {
            settings.difficulty = difficulty;
        }
        if let Some(points) = args.points_to_win {
            settings.game.points_to_win = points;
        }
        settings.vs_computer = true;
        settings.validate()?;

        let mut sim = Simulation::new(
            &settings,
            args.seed,
            Box::new(Silent),
            Box::new(MatchHistory::new()),
        )
        .with_autopilot(AiController::new(settings.difficulty));

        let max_ticks = u64::from(args.max_seconds) * 60;
        while sim.state().game_status == GameStatus::Playing && sim.state().time_ticks < max_ticks {
            sim.advance(1.0);
        }

        let state = sim.state();
        match state.winner {
            Some(winner) => println!(
                "Player {} wins {}-{} after {} ticks",
                winner.number(),
                state.score.player1,
                state.score.player2,
                state.time_ticks
            ),
            None => println!(
                "No winner after {} ticks ({}-{})",
                state.time_ticks, state.score.player1, state.score.player2
            ),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Jelly Volley (native, headless) starting...");
    native::run(native::Args::parse())
}
