//! Retro Arcade - classic arcade games in the browser
//!
//! Core modules:
//! - `sim`: Shared simulation contract (input, session, collision)
//! - `games`: The eighteen games and their registry
//! - `renderer`: WebGPU rendering pipeline
//! - `scores`: Remote leaderboard client
//! - `ui`: Toasts, score dialog and DOM shell
//! - `platform`: Browser/native platform abstraction

pub mod games;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod routes;
pub mod scores;
pub mod settings;
pub mod sim;
pub mod ui;

pub use games::GameKind;
pub use highscores::HighScores;
pub use routes::Route;
pub use settings::Settings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Frame delta clamp (seconds) after a stall or tab switch
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Leaderboard depth shown per game
    pub const LEADERBOARD_SIZE: usize = 10;
    /// Longest player name accepted by the score dialog
    pub const PLAYER_NAME_MAX_LEN: usize = 20;
    /// Lifetime of a toast notification (seconds)
    pub const TOAST_SECONDS: f32 = 4.0;
}

/// Convert a millisecond interval into whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: f32) -> u32 {
    ((ms / 1000.0) * consts::TICK_RATE as f32).round().max(1.0) as u32
}

/// Wrap a scalar into [0, max)
#[inline]
pub fn wrap(value: f32, max: f32) -> f32 {
    value.rem_euclid(max)
}

/// Wrap a point into the [0, size) rectangle (screen wrap)
#[inline]
pub fn wrap_point(pos: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(wrap(pos.x, size.x), wrap(pos.y, size.y))
}

/// Unit vector for an angle in radians
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(150.0), 9);
        assert_eq!(ms_to_ticks(1000.0), 60);
        assert_eq!(ms_to_ticks(0.0), 1);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-1.0, 10.0), 9.0);
        assert_eq!(wrap(12.0, 10.0), 2.0);
        let p = wrap_point(Vec2::new(601.0, -5.0), Vec2::new(600.0, 500.0));
        assert!((p.x - 1.0).abs() < 1e-4);
        assert!((p.y - 495.0).abs() < 1e-4);
    }
}
