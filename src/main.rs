//! Retro Arcade entry point
//!
//! In the browser this wires the DOM shell, the session loop and the score
//! client together. Natively it runs a headless soak over every game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use retro_arcade::consts::SIM_DT;
    use retro_arcade::games::GameKind;
    use retro_arcade::highscores::HighScores;
    use retro_arcade::platform::{blocks_default, fresh_seed, map_button, map_key};
    use retro_arcade::renderer::{RenderState, canvas_to_game};
    use retro_arcade::scores::{Backend, HttpBackend, MemoryBackend, ScoreClient};
    use retro_arcade::sim::{GameEvent, GamePhase, Session, TickInput};
    use retro_arcade::ui::{FpsCounter, ScoreDialog, ToastQueue, dom, pages, phase_overlay};
    use retro_arcade::{Route, Settings};

    type Client = Rc<ScoreClient<Backend>>;

    /// Everything the page shell owns
    struct App {
        route: Route,
        session: Option<Session>,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        input: TickInput,
        last_time: f64,
        fps: FpsCounter,
        toasts: ToastQueue,
        dialog: ScoreDialog,
        settings: Settings,
        client: Client,
        /// `None` until the catalog arrives
        leaderboard: Option<Vec<(GameKind, Option<HighScores>)>>,
        // Last markup pushed to the DOM, to skip redundant writes
        hud_cache: String,
        toast_cache: String,
        overlay_cache: Option<String>,
        dialog_key: (bool, bool),
    }

    fn build_client(settings: &Settings, origin: &str) -> ScoreClient<Backend> {
        if settings.offline {
            log::info!("Offline mode: scores kept in memory");
            return ScoreClient::new(Backend::Memory(MemoryBackend::new()));
        }
        match settings.backend_base(origin) {
            Ok(Some(url)) => {
                log::info!("Score backend at {url}");
                ScoreClient::new(Backend::Http(HttpBackend::new(url)))
            }
            Ok(None) => {
                log::warn!("No score backend configured");
                ScoreClient::disconnected()
            }
            Err(e) => {
                log::warn!("Score backend disabled: {e}");
                ScoreClient::disconnected()
            }
        }
    }

    impl App {
        fn new(canvas: HtmlCanvasElement, settings: Settings, client: Client) -> Self {
            Self {
                route: Route::NotFound,
                session: None,
                render_state: None,
                canvas,
                input: TickInput::default(),
                last_time: 0.0,
                fps: FpsCounter::default(),
                toasts: ToastQueue::new(),
                dialog: ScoreDialog::Closed,
                settings,
                client,
                leaderboard: None,
                hud_cache: String::new(),
                toast_cache: String::new(),
                overlay_cache: None,
                dialog_key: (false, false),
            }
        }

        fn show_page(&mut self, html: &str) {
            dom::set_hidden("game-view", true);
            dom::set_hidden("page", false);
            dom::set_html("page", html);
        }

        fn render_leaderboard(&mut self) {
            if self.route == Route::Leaderboard {
                let html = pages::leaderboard_page(self.leaderboard.as_deref());
                self.show_page(&html);
            }
        }

        fn start_game(&mut self, kind: GameKind) {
            let session = Session::new(kind, fresh_seed());
            let (w, h) = session.game().size();
            self.input.release_all();
            self.dialog = ScoreDialog::Closed;

            dom::set_hidden("page", true);
            dom::set_hidden("game-view", false);
            dom::set_text("game-title", kind.name());
            let hint = session.game().controls().hint;
            dom::set_text("controls", if self.settings.show_controls { hint } else { "" });
            self.session = Some(session);
            self.fit_canvas(w, h);
        }

        /// Size the canvas element to the game and its backing store to the DPR
        fn fit_canvas(&mut self, w: f32, h: f32) {
            let dpr = web_sys::window().map_or(1.0, |win| win.device_pixel_ratio());
            let _ = self
                .canvas
                .set_attribute("style", &format!("aspect-ratio: {w} / {h}; max-width: {w}px;"));
            let width = (w as f64 * dpr) as u32;
            let height = (h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(rs) = self.render_state.as_mut() {
                rs.resize(width, height);
            }
        }

        fn restart(&mut self) {
            if let Some(session) = self.session.as_mut() {
                session.restart(fresh_seed());
            }
            self.dialog.cancel();
            self.input.release_all();
        }

        fn auto_pause(&mut self, why: &str) {
            self.input.release_all();
            if let Some(session) = self.session.as_mut() {
                if session.phase == GamePhase::Playing {
                    session.pause();
                    log::info!("Auto-paused ({why})");
                }
            }
        }

        /// Game-space pointer position for a mouse event on the canvas
        fn pointer(&self, event: &MouseEvent) -> Option<Vec2> {
            let (w, h) = self.session.as_ref()?.game().size();
            let client = (self.canvas.client_width() as f32, self.canvas.client_height() as f32);
            Some(canvas_to_game(event.offset_x() as f32, event.offset_y() as f32, w, h, client))
        }

        fn update(&mut self, dt: f32, time: f64) {
            self.fps.record(time);
            let Some(session) = self.session.as_mut() else {
                self.toasts.update(dt);
                return;
            };

            session.update(dt, &mut self.input);
            for event in session.drain_events() {
                match event {
                    GameEvent::Notice(text) => {
                        self.toasts.info(text);
                    }
                    GameEvent::LevelUp(level) => {
                        log::info!("{} level {level}", session.kind().name())
                    }
                    _ => {}
                }
            }
            if let Some(report) = session.take_report() {
                self.dialog.open(report, &self.settings.player_name);
            }
            self.toasts.update(dt);
        }

        fn render(&mut self) {
            if !matches!(self.route, Route::Game(_)) {
                return;
            }
            let (Some(session), Some(rs)) = (self.session.as_ref(), self.render_state.as_mut())
            else {
                return;
            };
            let frame = session.render();
            match rs.render(&frame) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    rs.resize(rs.size.0, rs.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {e:?}"),
            }
        }

        fn sync_dom(&mut self) {
            let toasts = pages::toasts_html(&self.toasts);
            if toasts != self.toast_cache {
                dom::set_html("toasts", &toasts);
                self.toast_cache = toasts;
            }

            // Only rebuild the dialog on state changes so typing is not clobbered
            let key = (self.dialog.is_open(), self.dialog.is_submitting());
            if key != self.dialog_key {
                dom::set_html("dialog", &pages::dialog_html(&self.dialog));
                dom::set_hidden("dialog", !key.0);
                if key == (true, false) {
                    dom::focus_input("player-name");
                }
                self.dialog_key = key;
            }

            let Some(session) = self.session.as_ref() else {
                return;
            };
            let fps = self.settings.show_fps.then(|| self.fps.fps());
            let hud = pages::hud_html(session.score(), &session.game().hud(), fps);
            if hud != self.hud_cache {
                dom::set_html("hud", &hud);
                self.hud_cache = hud;
            }

            let overlay = phase_overlay(session.phase, &session.game().controls());
            if overlay != self.overlay_cache {
                dom::set_text("overlay", overlay.as_deref().unwrap_or_default());
                dom::set_hidden("overlay", overlay.is_none());
                self.overlay_cache = overlay;
            }
        }
    }

    fn navigate(app: &Rc<RefCell<App>>, route: Route) {
        {
            let mut a = app.borrow_mut();
            if a.route == route {
                return;
            }
            a.route = route;
            dom::set_title(route.title());
            if !matches!(route, Route::Game(_)) {
                a.session = None;
                a.dialog = ScoreDialog::Closed;
            }
            match route {
                Route::Home => a.show_page(&pages::home_page(None)),
                Route::NotFound => a.show_page(&pages::not_found_page()),
                Route::Game(kind) => a.start_game(kind),
                Route::Leaderboard => {
                    a.leaderboard = None;
                    a.render_leaderboard();
                }
            }
        }
        match route {
            Route::Home => load_home(app),
            Route::Leaderboard => load_leaderboards(app),
            _ => {}
        }
    }

    fn load_home(app: &Rc<RefCell<App>>) {
        let client = app.borrow().client.clone();
        let app = app.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let games = client.catalog().await;
            let mut a = app.borrow_mut();
            if a.route == Route::Home {
                a.show_page(&pages::home_page(Some(&games)));
            }
        });
    }

    fn load_leaderboards(app: &Rc<RefCell<App>>) {
        let (client, player) = {
            let a = app.borrow();
            (a.client.clone(), a.settings.player_name.clone())
        };
        let app = app.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let games = client.catalog().await;
            {
                let mut a = app.borrow_mut();
                if a.route != Route::Leaderboard {
                    return;
                }
                a.leaderboard = Some(games.iter().map(|&k| (k, None)).collect());
                a.render_leaderboard();
            }
            for kind in games {
                load_table(&app, &client, &player, kind);
            }
        });
    }

    fn load_table(app: &Rc<RefCell<App>>, client: &Client, player: &str, kind: GameKind) {
        let app = app.clone();
        let client = client.clone();
        let player = player.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let entries = client.leaderboard_or_empty(kind.name()).await;
            let mut table = HighScores::from_entries(kind, entries);
            table.player_best = match client.player_best(kind.name(), &player).await {
                Ok(best) => best,
                Err(e) => {
                    log::warn!("Failed to load best {} score for {player}: {e}", kind.name());
                    None
                }
            };

            let mut a = app.borrow_mut();
            let slot = a.leaderboard.iter_mut().flatten().find(|(k, _)| *k == kind);
            if let Some(slot) = slot {
                slot.1 = Some(table);
            }
            a.render_leaderboard();
        });
    }

    fn submit_score(app: &Rc<RefCell<App>>) {
        let (request, client) = {
            let mut a = app.borrow_mut();
            if let Some(name) = dom::input_value("player-name") {
                a.dialog.set_name(&name);
            }
            let a = &mut *a;
            let Some(request) = a.dialog.begin_submit(&mut a.toasts) else {
                return;
            };
            (request, a.client.clone())
        };

        let app = app.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = client
                .submit(&request.game, &request.player_name, request.score)
                .await;
            let mut a = app.borrow_mut();
            let a = &mut *a;
            if let Ok(name) = &result {
                a.settings.remember_player(name);
                a.settings.save();
            }
            if a.dialog.finish(&result, &mut a.toasts) {
                a.restart();
            }
        });
    }

    fn on_action(app: &Rc<RefCell<App>>, action: &str, id: Option<String>) {
        match action {
            "submit-score" => submit_score(app),
            "skip-score" => app.borrow_mut().dialog.cancel(),
            "restart" => app.borrow_mut().restart(),
            "pause" => {
                if let Some(session) = app.borrow_mut().session.as_mut() {
                    session.toggle_pause();
                }
            }
            "dismiss-toast" => {
                if let Some(id) = id.and_then(|id| id.parse().ok()) {
                    app.borrow_mut().toasts.dismiss(id);
                }
            }
            "toggle-fps" => {
                let mut a = app.borrow_mut();
                let on = a.settings.toggle_fps();
                a.settings.save();
                log::info!("FPS counter {}", if on { "on" } else { "off" });
            }
            other => log::warn!("Unknown action {other}"),
        }
    }

    fn setup_listeners(app: &Rc<RefCell<App>>) -> Option<()> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let canvas = app.borrow().canvas.clone();

        {
            let app = app.clone();
            dom::listen(&window, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                // Typing a name must not drive the game
                if a.dialog.is_open() || a.session.is_none() {
                    if a.dialog.is_open() && event.key() == "Enter" {
                        drop(a);
                        submit_score(&app);
                    }
                    return;
                }
                if let Some(key) = map_key(&event.key()) {
                    if blocks_default(key) {
                        event.prevent_default();
                    }
                    if !event.repeat() {
                        a.input.key_down(key);
                    }
                }
            });
        }
        {
            let app = app.clone();
            dom::listen(&window, "keyup", move |event| {
                let key = event.dyn_ref::<KeyboardEvent>().and_then(|e| map_key(&e.key()));
                if let Some(key) = key {
                    app.borrow_mut().input.key_up(key);
                }
            });
        }
        {
            let app = app.clone();
            dom::listen(&canvas, "mousemove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                let pos = a.pointer(event);
                a.input.pointer = pos;
            });
        }
        {
            let app = app.clone();
            dom::listen(&canvas, "mousedown", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                if let (Some(pos), Some(button)) = (a.pointer(event), map_button(event.button())) {
                    a.input.click(pos, button);
                }
            });
        }
        // Right click flags in Minesweeper
        dom::listen(&canvas, "contextmenu", |event| event.prevent_default());
        {
            let app = app.clone();
            dom::listen(&document, "click", move |event| {
                if let Some((action, id)) = dom::action_of(&event) {
                    on_action(&app, &action, id);
                }
            });
        }
        {
            let app = app.clone();
            dom::listen(&window, "hashchange", move |_| {
                navigate(&app, Route::parse(&dom::current_hash()));
            });
        }
        {
            let app = app.clone();
            let doc = document.clone();
            dom::listen(&document, "visibilitychange", move |_| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
                }
            });
        }
        {
            let app = app.clone();
            dom::listen(&window, "blur", move |_| app.borrow_mut().auto_pause("window blur"));
        }
        Some(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| game_loop(app, time));
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.sync_dom();
        }
        request_animation_frame(app);
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {e}").into());
        }
        log::info!("Retro Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let origin = window.location().origin()?;
        let client = Rc::new(build_client(&settings, &origin));
        let app = Rc::new(RefCell::new(App::new(canvas.clone(), settings, client)));

        match RenderState::from_canvas(canvas).await {
            Ok(rs) => app.borrow_mut().render_state = Some(rs),
            Err(e) => {
                log::error!("Renderer unavailable: {e}");
                app.borrow_mut().toasts.error("This browser cannot run WebGPU or WebGL2");
            }
        }

        dom::set_hidden("loading", true);
        setup_listeners(&app).ok_or("failed to attach listeners")?;
        navigate(&app, Route::parse(&dom::current_hash()));
        request_animation_frame(app);

        log::info!("Retro Arcade running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let ticks = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(soak::DEFAULT_TICKS);
    let seed = std::env::args()
        .nth(2)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(retro_arcade::platform::fresh_seed);

    log::info!("Retro Arcade soak: {ticks} ticks per game, seed {seed}");
    for result in soak::run_all(seed, ticks) {
        println!(
            "{:<16} score {:>7}  ticks {:>6}  {}",
            result.kind.name(),
            result.score,
            result.ticks,
            match result.won {
                Some(true) => "won",
                Some(false) => "lost",
                None => "running",
            }
        );
    }
}

/// Headless soak: every game driven by seeded pseudo-random input
#[cfg(not(target_arch = "wasm32"))]
mod soak {
    use glam::Vec2;
    use rand::Rng;
    use rand::seq::IndexedRandom;
    use retro_arcade::games::GameKind;
    use retro_arcade::sim::{GamePhase, Key, PointerButton, Session, TickInput, seeded_rng};

    pub const DEFAULT_TICKS: u64 = 60 * 60;

    pub struct SoakResult {
        pub kind: GameKind,
        pub score: u64,
        pub ticks: u64,
        /// `None` if still running when the budget ran out
        pub won: Option<bool>,
    }

    pub fn run_all(seed: u64, ticks: u64) -> Vec<SoakResult> {
        GameKind::ALL.into_iter().map(|kind| run(kind, seed, ticks)).collect()
    }

    pub fn run(kind: GameKind, seed: u64, ticks: u64) -> SoakResult {
        let mut rng = seeded_rng(seed ^ kind as u64);
        let mut session = Session::new(kind, seed);
        session.start();
        let (w, h) = session.game().size();
        let mut input = TickInput::default();
        let mut won = None;

        for _ in 0..ticks {
            // Hold a direction for a while, tap the action key now and then
            if rng.random_bool(0.05) {
                input.release_all();
                if let Some(&key) = [Key::Up, Key::Down, Key::Left, Key::Right].choose(&mut rng) {
                    input.key_down(key);
                }
            }
            if rng.random_bool(0.1) {
                input.key_down(Key::Action);
            } else {
                input.key_up(Key::Action);
            }
            if rng.random_bool(0.03) {
                let pos = Vec2::new(rng.random::<f32>() * w, rng.random::<f32>() * h);
                let button = if rng.random_bool(0.8) {
                    PointerButton::Primary
                } else {
                    PointerButton::Secondary
                };
                input.click(pos, button);
            }

            session.step(&input);
            input.clear_one_shots();
            if session.phase == GamePhase::Paused {
                // Some games pause themselves after a lost life
                session.start();
            }
            if let Some(report) = session.take_report() {
                won = Some(report.won);
                break;
            }
        }

        SoakResult {
            kind,
            score: session.score(),
            ticks: session.ticks,
            won,
        }
    }

}
