//! Filepurge entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use filepurge::highscores;
    use filepurge::platform::{KeyState, assets, input};
    use filepurge::renderer::CanvasRenderer;
    use filepurge::sim::{GamePhase, GameState, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        keys: Rc<RefCell<KeyState>>,
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("filepurge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // The first frame waits for the charset sheet.
        let charset = assets::load_charset("./assets/cp437_8x16.png")
            .await
            .expect("failed to load charset");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let renderer =
            CanvasRenderer::new(&document, &canvas, charset).expect("failed to build renderer");

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed);
        log::info!("session initialized with seed {seed}");

        let keys = Rc::new(RefCell::new(KeyState::default()));
        input::attach_keyboard(keys.clone());

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer,
            keys,
        }));
        request_animation_frame(game);

        log::info!("filepurge running");
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(game: Rc<RefCell<Game>>) {
        let phase = {
            let mut g = game.borrow_mut();
            let input = g.keys.borrow().sample();
            let sprites = tick(&mut g.state, &input);
            g.renderer.render(&sprites);
            g.renderer.render_hud(g.state.score, g.state.corrupted);
            g.state.phase
        };

        // Terminal phases stop the loop; the session restarts via reload.
        match phase {
            GamePhase::Playing => request_animation_frame(game),
            GamePhase::Won => finish_won(game.borrow().state.score),
            GamePhase::Lost => finish_lost(),
        }
    }

    /// Summarize the cleared run, persist the best, and restart
    fn finish_won(score: u32) {
        if let Some(best) = highscores::record(score) {
            log::info!("new best run: {}kb", best.freed_kb);
        }

        let window = web_sys::window().unwrap();
        let _ = window.alert_with_message(&format!("Task succeeded. Freed {score}kb on disk."));
        let _ = window.location().reload();
    }

    fn finish_lost() {
        let window = web_sys::window().unwrap();
        let _ = window.alert_with_message("Filesystem corrupted. Aborting...");
        let _ = window.location().reload();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use filepurge::sim::{GameState, TickInput, tick};

    env_logger::init();
    log::info!("filepurge (native) starting...");
    log::info!("native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: hold fire and drift up, let a session play out.
    let mut state = GameState::new(0xF11E);
    let input = TickInput {
        fire: true,
        up: true,
        ..Default::default()
    };
    for _ in 0..20_000 {
        tick(&mut state, &input);
    }
    log::info!(
        "smoke run: {:?} after {} ticks, freed {}kb, corrupted {}kb, {} files generated",
        state.phase,
        state.time_ticks,
        state.score,
        state.corrupted,
        state.spawned
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
