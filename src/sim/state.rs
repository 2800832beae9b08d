//! Shared game-state types and the per-game contract

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::{Key, TickInput};
use crate::games::GameKind;
use crate::renderer::Frame;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    Ready,
    /// Active gameplay
    Playing,
    /// Paused by the player, a lost life or a lost focus
    Paused,
    /// Game over
    GameOver,
}

/// What a game reports about itself after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over { won: bool },
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over { .. })
    }
}

/// Events emitted by a tick (for HUD, notices and the session)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Scored(u64),
    LifeLost,
    LevelUp(u32),
    /// Short message worth surfacing as a toast
    Notice(String),
    /// The game wants the session paused (e.g. after losing a ball)
    Pause,
    Finished { won: bool },
}

/// A labelled HUD value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudStat {
    pub label: &'static str,
    pub value: String,
}

impl HudStat {
    pub fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// How a game is started, paused and played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlScheme {
    /// Key that toggles pause (`Action` for games that do not use the space bar)
    pub pause_key: Key,
    /// One-line control hint shown under the canvas
    pub hint: &'static str,
}

impl Default for ControlScheme {
    fn default() -> Self {
        Self {
            pause_key: Key::Pause,
            hint: "Arrow keys to move, Space for action, P to pause",
        }
    }
}

/// Contract every arcade game implements
///
/// Games run at a fixed 60 Hz tick and draw into a [`Frame`] in canvas
/// pixel coordinates (origin top-left, y down). They never touch the
/// platform directly.
pub trait ArcadeGame {
    fn kind(&self) -> GameKind;

    /// Canvas size in pixels
    fn size(&self) -> (f32, f32);

    fn controls(&self) -> ControlScheme {
        ControlScheme::default()
    }

    /// Advance one fixed tick
    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent>;

    fn score(&self) -> u64;

    fn status(&self) -> GameStatus;

    /// Extra HUD stats beyond the score (lives, level, ...)
    fn hud(&self) -> Vec<HudStat> {
        Vec::new()
    }

    fn render(&self, frame: &mut Frame);
}

/// Shorthand used by the games
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);
        for _ in 0..16 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }
}
