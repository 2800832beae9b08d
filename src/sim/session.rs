//! Fixed-timestep session driver
//!
//! Owns the active game plus the phase machine around it. Frame deltas are
//! accumulated and drained in `SIM_DT` steps; one-shot input is cleared
//! after every tick that consumed it.

use super::input::{Key, PointerButton, TickInput};
use super::state::{ArcadeGame, GameEvent, GamePhase};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::games::GameKind;
use crate::renderer::Frame;

/// Final result of a run, latched exactly once per game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub kind: GameKind,
    pub score: u64,
    pub won: bool,
}

pub struct Session {
    kind: GameKind,
    game: Box<dyn ArcadeGame>,
    seed: u64,
    pub phase: GamePhase,
    accumulator: f32,
    /// Ticks simulated while playing
    pub ticks: u64,
    report: Option<GameOverReport>,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        log::info!("Starting {} with seed {}", kind.name(), seed);
        Self {
            kind,
            game: kind.create(seed),
            seed,
            phase: GamePhase::Ready,
            accumulator: 0.0,
            ticks: 0,
            report: None,
            events: Vec::new(),
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn game(&self) -> &dyn ArcadeGame {
        self.game.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.game.score()
    }

    /// Throw the current run away and start over in `Ready`
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting {} with seed {}", self.kind.name(), seed);
        self.game = self.kind.create(seed);
        self.seed = seed;
        self.phase = GamePhase::Ready;
        self.accumulator = 0.0;
        self.ticks = 0;
        self.report = None;
        self.events.clear();
    }

    pub fn start(&mut self) {
        if matches!(self.phase, GamePhase::Ready | GamePhase::Paused) {
            self.phase = GamePhase::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.phase = GamePhase::Paused,
            GamePhase::Ready | GamePhase::Paused => self.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    /// Feed a frame delta and run as many fixed ticks as it covers
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32, input: &mut TickInput) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(input);
            self.accumulator -= SIM_DT;
            substeps += 1;
            input.clear_one_shots();
        }

        // Drop any backlog the substep cap left behind
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one tick with the given input
    pub fn step(&mut self, input: &TickInput) {
        if input.was_pressed(Key::Restart) {
            let seed = next_seed(self.seed);
            self.restart(seed);
            return;
        }

        let pause_key = self.game.controls().pause_key;
        let clicked = input
            .clicks
            .iter()
            .any(|c| c.button == PointerButton::Primary);

        match self.phase {
            GamePhase::Ready => {
                if clicked {
                    // The starting click is also the first move
                    self.phase = GamePhase::Playing;
                    self.run_tick(input);
                } else if input.was_pressed(pause_key) || input.was_pressed(Key::Action) {
                    self.phase = GamePhase::Playing;
                }
            }
            GamePhase::Paused => {
                if input.was_pressed(pause_key) {
                    self.phase = GamePhase::Playing;
                }
            }
            GamePhase::Playing => {
                if input.was_pressed(pause_key) {
                    self.phase = GamePhase::Paused;
                    return;
                }
                self.run_tick(input);
            }
            GamePhase::GameOver => {}
        }
    }

    fn run_tick(&mut self, input: &TickInput) {
        let events = self.game.tick(input);
        self.ticks += 1;

        for event in &events {
            if *event == GameEvent::Pause {
                self.phase = GamePhase::Paused;
            }
        }
        self.events.extend(events);

        if let super::state::GameStatus::Over { won } = self.game.status() {
            self.phase = GamePhase::GameOver;
            if self.report.is_none() {
                let score = self.game.score();
                log::info!(
                    "{} over: score {} ({})",
                    self.kind.name(),
                    score,
                    if won { "won" } else { "lost" }
                );
                self.report = Some(GameOverReport {
                    kind: self.kind,
                    score,
                    won,
                });
                self.events.push(GameEvent::Finished { won });
            }
        }
    }

    /// Take the game-over report; yields `Some` once per run
    pub fn take_report(&mut self) -> Option<GameOverReport> {
        if self.phase != GamePhase::GameOver {
            return None;
        }
        // Ticks stop in GameOver, so the report is never rebuilt
        self.report.take()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn render(&self) -> Frame {
        let (w, h) = self.game.size();
        let mut frame = Frame::new(w, h);
        self.game.render(&mut frame);
        frame
    }
}

/// SplitMix64 step, used to derive a fresh seed for quick restarts
pub fn next_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::palette;
    use glam::Vec2;

    fn press(key: Key) -> TickInput {
        let mut input = TickInput::default();
        input.key_down(key);
        input
    }

    #[test]
    fn test_session_starts_ready() {
        let session = Session::new(GameKind::Snake, 1);
        assert_eq!(session.phase, GamePhase::Ready);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_space_toggles_pause_for_snake() {
        let mut session = Session::new(GameKind::Snake, 1);
        session.step(&press(Key::Action));
        assert_eq!(session.phase, GamePhase::Playing);
        session.step(&press(Key::Action));
        assert_eq!(session.phase, GamePhase::Paused);
        session.step(&press(Key::Action));
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_p_pauses_tetris_and_space_does_not() {
        let mut session = Session::new(GameKind::Tetris, 1);
        session.step(&press(Key::Action));
        assert_eq!(session.phase, GamePhase::Playing);
        session.step(&press(Key::Action));
        assert_eq!(session.phase, GamePhase::Playing);
        session.step(&press(Key::Pause));
        assert_eq!(session.phase, GamePhase::Paused);
        session.step(&press(Key::Action));
        assert_eq!(session.phase, GamePhase::Paused);
        session.step(&press(Key::Pause));
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_first_click_is_played() {
        let revealed = palette::hex(0xe2e8f0);
        let shown = |session: &Session| {
            session
                .render()
                .vertices()
                .iter()
                .filter(|v| v.color == revealed)
                .count()
        };

        let mut session = Session::new(GameKind::Minesweeper, 7);
        assert_eq!(shown(&session), 0);

        let mut input = TickInput::default();
        input.click(Vec2::new(5.0, 5.0), PointerButton::Primary);
        session.step(&input);
        assert_eq!(session.ticks, 1);
        assert!(shown(&session) > 0);
    }

    #[test]
    fn test_no_ticks_while_ready() {
        let mut session = Session::new(GameKind::Pong, 3);
        let mut input = TickInput::default();
        session.update(0.1, &mut input);
        assert_eq!(session.ticks, 0);
    }

    #[test]
    fn test_update_substep_cap() {
        let mut session = Session::new(GameKind::Pong, 3);
        session.start();
        let mut input = TickInput::default();
        let steps = session.update(10.0, &mut input);
        assert!(steps <= MAX_SUBSTEPS);
        assert_eq!(session.ticks, steps as u64);
    }

    #[test]
    fn test_one_shots_cleared_after_tick() {
        let mut session = Session::new(GameKind::Snake, 3);
        let mut input = press(Key::Action);
        session.update(SIM_DT * 1.5, &mut input);
        assert!(input.pressed.is_empty());
    }

    #[test]
    fn test_report_latched_once() {
        let mut session = Session::new(GameKind::Snake, 9);
        session.start();
        // Snake heading right from the centre hits the wall well within this
        let input = TickInput::default();
        for _ in 0..2000 {
            session.step(&input);
        }
        assert_eq!(session.phase, GamePhase::GameOver);
        let report = session.take_report();
        assert!(report.is_some());
        assert_eq!(report.map(|r| r.kind), Some(GameKind::Snake));
        assert!(session.take_report().is_none());
    }

    #[test]
    fn test_restart_resets() {
        let mut session = Session::new(GameKind::Snake, 9);
        session.start();
        for _ in 0..50 {
            session.step(&TickInput::default());
        }
        session.step(&press(Key::Restart));
        assert_eq!(session.phase, GamePhase::Ready);
        assert_eq!(session.ticks, 0);
        assert_ne!(session.seed(), 9);
    }
}
