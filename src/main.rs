//! Stellar Harmony entry point
//!
//! On wasm32 this wires browser input and animation frames to the game loop.
//! Natively it plays a scripted headless run and prints the result as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, HtmlSelectElement};

    use stellar_harmony::audio;
    use stellar_harmony::consts::SHAKE_DURATION_MS;
    use stellar_harmony::platform;
    use stellar_harmony::renderer::RenderFrame;
    use stellar_harmony::sim::{Command, GameMode, HeldKeys, ShakeToken};
    use stellar_harmony::{Game, GameError, Settings};

    const CANVAS_ID: &str = "gameCanvas";

    /// Menu buttons and the command each one issues
    const BUTTONS: &[(&str, Command)] = &[
        ("startBtn", Command::StartRun),
        ("restartBtn", Command::StartRun),
        ("instructionsBtn", Command::ShowInstructions),
        ("settingsBtn", Command::ShowSettings),
        ("backBtn", Command::ShowMenu),
        ("settingsBackBtn", Command::ShowMenu),
        ("menuBtn", Command::ShowMenu),
    ];

    /// Settings form fields: element id and the event that reports a change
    const SETTING_INPUTS: &[(&str, &str)] = &[
        ("themeSelect", "change"),
        ("difficultySelect", "change"),
        ("particleDensity", "input"),
        ("musicVolume", "input"),
        ("trailsToggle", "change"),
        ("glowToggle", "change"),
        ("shakeToggle", "change"),
    ];

    const SCREENS: &[(GameMode, &str)] = &[
        (GameMode::Menu, "menuScreen"),
        (GameMode::Instructions, "instructionsScreen"),
        (GameMode::Settings, "settingsScreen"),
        (GameMode::GameOver, "gameOverScreen"),
    ];

    struct App {
        game: Game,
        held: HeldKeys,
        shown_mode: Option<GameMode>,
        /// Shake already handed to a clear timer
        scheduled_shake: Option<ShakeToken>,
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn css_color(c: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            (c[0] * 255.0) as u8,
            (c[1] * 255.0) as u8,
            (c[2] * 255.0) as u8,
            c[3]
        )
    }

    impl App {
        /// Push the frame's HUD and effect flags into the page
        fn present(&mut self, frame: &RenderFrame) {
            let Some(document) = document() else { return };

            if frame.mode == GameMode::Playing || frame.mode == GameMode::GameOver {
                if let Some(el) = document.get_element_by_id("score") {
                    el.set_text_content(Some(&frame.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("healthFill") {
                    let style = format!(
                        "width: {}%; background: {}",
                        frame.health,
                        css_color(frame.health_band.color())
                    );
                    let _ = el.set_attribute("style", &style);
                }
            }

            if let Some(container) = document.get_element_by_id("gameContainer") {
                let classes = container.class_list();
                let _ = classes.toggle_with_force("shake", frame.shake);
                let _ = classes.toggle_with_force("glow", frame.glow.is_some());
            }

            if self.shown_mode != Some(frame.mode) {
                for (mode, id) in SCREENS {
                    if let Some(el) = document.get_element_by_id(id) {
                        let _ = el.class_list().toggle_with_force("active", *mode == frame.mode);
                    }
                }
                if frame.mode == GameMode::GameOver {
                    if let Some(el) = document.get_element_by_id("finalScoreValue") {
                        el.set_text_content(Some(&frame.score.to_string()));
                    }
                    if let Some(el) = document.get_element_by_id("achievements") {
                        let text: Vec<String> =
                            self.game.achievements().iter().map(|a| a.to_string()).collect();
                        el.set_text_content(Some(&text.join("\n")));
                    }
                }
                self.shown_mode = Some(frame.mode);
            }
        }
    }

    pub fn run() -> Result<(), GameError> {
        platform::init_logging();
        log::info!("Stellar Harmony starting...");

        let mut required: Vec<&str> = vec![CANVAS_ID, "score", "healthFill"];
        required.extend(BUTTONS.iter().map(|(id, _)| *id));
        required.extend(SCREENS.iter().map(|(_, id)| *id));
        required.extend(SETTING_INPUTS.iter().map(|(id, _)| *id));
        platform::require_elements(&required)?;

        let playfield = platform::fit_canvas(CANVAS_ID)?;
        let seed = platform::time_seed();

        let app = Rc::new(RefCell::new(App {
            game: Game::new(playfield, Settings::default(), seed, audio::default_sink()),
            held: HeldKeys::default(),
            shown_mode: None,
            scheduled_shake: None,
        }));

        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_settings(app.clone());
        setup_resize(app.clone());
        request_animation_frame(app);

        log::info!("Stellar Harmony running!");
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        for (event, down) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                let key = event.key();
                if down && key == "Escape" && a.game.world().mode == GameMode::Playing {
                    a.held = HeldKeys::default();
                    a.game.command(Command::ShowSettings);
                    return;
                }
                a.held.set_key(&key, down);
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };
        for &(id, command) in BUTTONS {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                log::debug!("{} clicked", id);
                let mut a = app.borrow_mut();
                a.held = HeldKeys::default();
                a.game.command(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Current value of a settings control as text
    fn input_value(target: web_sys::EventTarget) -> Option<String> {
        let target = match target.dyn_into::<HtmlSelectElement>() {
            Ok(select) => return Some(select.value()),
            Err(target) => target,
        };
        let input = target.dyn_into::<HtmlInputElement>().ok()?;
        if input.type_() == "checkbox" {
            Some(input.checked().to_string())
        } else {
            Some(input.value())
        }
    }

    fn setup_settings(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };
        for &(id, event) in SETTING_INPUTS {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            let name = id.trim_end_matches("Select");
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(value) = event.target().and_then(input_value) else {
                    return;
                };
                match Command::from_setting(name, &value) {
                    Some(command) => app.borrow_mut().game.command(command),
                    None => log::warn!("Ignoring setting {}={}", name, value),
                }
            });
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            match platform::fit_canvas(CANVAS_ID) {
                Ok(playfield) => app.borrow_mut().game.resize(playfield),
                Err(e) => log::warn!("Resize ignored: {}", e),
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Clear the shake class after its duration, unless a newer shake took over
    fn schedule_shake_clear(app: Rc<RefCell<App>>, token: ShakeToken) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move || {
            if app.borrow_mut().game.clear_shake(token) {
                log::trace!("shake {:?} cleared by timer", token);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SHAKE_DURATION_MS as i32,
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let new_shake = {
            let mut a = app.borrow_mut();
            let held = a.held;
            let frame = a.game.frame(time, held);
            a.present(&frame);

            let token = a.game.world().shake.map(|s| s.token);
            match token {
                Some(t) if a.scheduled_shake != Some(t) => {
                    a.scheduled_shake = Some(t);
                    Some(t)
                }
                _ => None,
            }
        };
        if let Some(token) = new_shake {
            schedule_shake_clear(app.clone(), token);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use serde::Serialize;

    use stellar_harmony::audio::Silent;
    use stellar_harmony::platform;
    use stellar_harmony::sim::{Command, GameMode, HeldKeys, RunSummary, World};
    use stellar_harmony::{Achievement, Game, GameError, Settings};

    /// Simulated display rate
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten simulated minutes
    const MAX_FRAMES: u64 = 36_000;
    /// Obstacles closer than this push the autopilot away
    const DANGER_RADIUS: f32 = 90.0;

    #[derive(Serialize)]
    struct Report {
        seed: u64,
        frames: u64,
        finished: bool,
        summary: RunSummary,
        achievements: Vec<String>,
    }

    /// Steer toward the nearest note unless an obstacle is close
    fn autopilot(world: &World) -> HeldKeys {
        let pos = world.player.pos;
        let threat = world
            .obstacles
            .iter()
            .map(|o| o.center())
            .filter(|c| c.distance(pos) < DANGER_RADIUS)
            .min_by(|a, b| a.distance(pos).total_cmp(&b.distance(pos)));

        let dir = match threat {
            Some(c) => pos - c,
            None => world
                .notes
                .iter()
                .map(|n| n.pos)
                .min_by(|a, b| a.distance(pos).total_cmp(&b.distance(pos)))
                .map(|target| target - pos)
                .unwrap_or(Vec2::ZERO),
        };

        let dead_zone = world.player.speed;
        HeldKeys {
            up: dir.y < -dead_zone,
            down: dir.y > dead_zone,
            left: dir.x < -dead_zone,
            right: dir.x > dead_zone,
        }
    }

    pub fn run(seed: u64, settings_path: Option<String>) -> Result<(), GameError> {
        platform::init_logging();
        log::info!("Stellar Harmony (headless) starting...");

        let settings = match settings_path {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        let playfield = platform::canvas_playfield("gameCanvas")?;
        let mut game = Game::new(playfield, settings, seed, Box::new(Silent));
        game.command(Command::StartRun);

        let mut frames = 0;
        while frames < MAX_FRAMES && game.world().mode == GameMode::Playing {
            let held = autopilot(game.world());
            game.frame(frames as f64 * FRAME_MS, held);
            frames += 1;
        }

        let finished = game.world().mode == GameMode::GameOver;
        if !finished {
            log::warn!("Run still going after {} frames", frames);
        }

        let report = Report {
            seed,
            frames,
            finished,
            summary: game.world().summary(),
            achievements: game.achievements().iter().map(Achievement::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    // Usage: stellar-harmony [seed] [settings.json]
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(stellar_harmony::platform::time_seed);

    if let Err(e) = headless::run(seed, args.next()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
