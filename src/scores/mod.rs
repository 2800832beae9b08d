//! Remote leaderboard client
//!
//! The backend owns scores; the client only validates names, sorts what
//! comes back and keeps the top of the table.

pub mod backend;
pub mod client;
pub mod error;
pub mod model;

pub use backend::{Backend, HttpBackend, MemoryBackend, ScoreBackend};
pub use client::ScoreClient;
pub use error::{NameError, ScoreError, validate_player_name};
pub use model::{GameInfo, ScoreEntry, ScoreSubmission, top_scores};
