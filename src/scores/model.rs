//! Wire types for the score backend

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_SIZE;
use crate::games::GameKind;

/// Catalog entry served by `GET /games`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub name: String,
    pub description: String,
    pub thumbnail: String,
}

impl From<GameKind> for GameInfo {
    fn from(kind: GameKind) -> Self {
        let meta = kind.metadata();
        Self {
            name: meta.name.to_string(),
            description: meta.description.to_string(),
            thumbnail: meta.thumbnail.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u64,
}

/// Body of `POST /scores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub game: String,
    pub player_name: String,
    pub score: u64,
}

/// Sort descending by score and keep the leaderboard depth
///
/// Ties keep the order the backend returned them in.
pub fn top_scores(mut entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}
