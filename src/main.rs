//! Le Pong entry point
//!
//! Browser builds run the game on a canvas. Native builds run a headless
//! match with a fixed frame clock, for smoke testing and debugging.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use le_pong::Game;
    use le_pong::Settings;
    use le_pong::audio::AudioManager;
    use le_pong::input::{Key, KeyboardState};
    use le_pong::platform::web::CanvasBridge;

    /// Longest frame step fed to the simulation (tab switches, breakpoints)
    const MAX_FRAME_DT: f32 = 0.1;
    /// Frame steps must be strictly positive
    const MIN_FRAME_DT: f32 = 1e-6;

    struct WebGame {
        game: Game,
        settings: Settings,
        bridge: CanvasBridge,
        keys: KeyboardState,
        last_time: f64,
    }

    impl WebGame {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time;
            let dt = dt.clamp(MIN_FRAME_DT, MAX_FRAME_DT);

            self.game.frame(dt, &self.keys, &mut self.bridge);
            self.bridge.audio().update_music();
            self.keys.end_frame();

            // Remember the overlay choice across reloads
            if self.game.show_fps() != self.settings.show_fps {
                self.settings.show_fps = self.game.show_fps();
                self.settings.save();
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Le Pong starting...");

        let settings = Settings::load();
        let config = settings.match_config();

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        document.set_title(settings.theme().window_title);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(config.arena_width as u32);
        canvas.set_height(config.arena_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let audio = AudioManager::new(settings.sfx_gain(), settings.music_gain());
        let game = Rc::new(RefCell::new(WebGame {
            game: Game::new(&settings),
            settings,
            bridge: CanvasBridge::new(ctx, audio),
            keys: KeyboardState::new(),
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Le Pong running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if g.game.mapper().bindings.is_bound(key) {
                    event.prevent_default();
                }
                // Browsers only allow audio after a gesture
                g.bridge.audio().resume();
                g.keys.key_down(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().keys.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur - key-ups never arrive, so drop everything held
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.release_all();
                log::info!("Released keys (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use le_pong::input::{Key, KeyboardState};
    use le_pong::platform::headless::RecordingBridge;
    use le_pong::sim::{GameEvent, MatchPhase};
    use le_pong::{Game, Settings, Variant};

    #[derive(Parser)]
    #[command(name = "le-pong")]
    #[command(about = "Run a headless Le Pong match with a fixed frame clock")]
    struct Args {
        /// Game variant (classic or duff); overrides the settings file
        #[arg(long, value_parser = parse_variant)]
        variant: Option<Variant>,

        /// JSON settings file (default: le_pong_settings.json if present)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Give up after this many simulated seconds
        #[arg(long, default_value_t = 60.0)]
        max_seconds: f32,

        /// Print the final match state as JSON
        #[arg(long)]
        json: bool,
    }

    fn parse_variant(s: &str) -> Result<Variant, String> {
        Variant::from_str(s).ok_or_else(|| format!("unknown variant '{s}'"))
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        let args = Args::parse();

        let mut settings = match &args.settings {
            Some(path) => match Settings::load_from(path) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            },
            None => Settings::load(),
        };
        if let Some(variant) = args.variant {
            settings.variant = variant;
        }
        if let Err(e) = settings.match_config().validate() {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
        if args.fps == 0 {
            log::error!("--fps must be at least 1");
            return ExitCode::FAILURE;
        }

        let dt = 1.0 / args.fps as f32;
        let max_frames = (args.max_seconds * args.fps as f32).ceil() as u64;

        let mut game = Game::new(&settings);
        let mut keys = KeyboardState::new();
        let mut bridge = RecordingBridge::new();
        let mut hits = 0u32;
        let mut frames = 0u64;

        log::info!("Le Pong (headless) starting, {} fps", args.fps);

        // Confirm on the first frame, then hands off
        keys.key_down(Key::Space);
        while frames < max_frames {
            bridge.begin_frame();
            let events = game.frame(dt, &keys, &mut bridge);
            keys.end_frame();
            keys.key_up(Key::Space);
            frames += 1;

            for event in &events {
                match event {
                    GameEvent::WallHit | GameEvent::PaddleHit(_) => hits += 1,
                    GameEvent::Goal { winner } => log::info!("{:?} player scores", winner),
                }
            }
            if matches!(game.phase(), MatchPhase::Won(_)) {
                break;
            }
        }

        let state = game.render_state();
        match state.winner() {
            Some(winner) => println!(
                "{:?} player wins after {:.2}s ({} bounces)",
                winner,
                frames as f32 * dt,
                hits
            ),
            None => println!("No winner after {:.2}s ({} bounces)", frames as f32 * dt, hits),
        }
        println!("Last frame: {} draw calls", bridge.draws.len());

        if args.json {
            match serde_json::to_string_pretty(&state) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }

        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}
