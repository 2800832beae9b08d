//! Score backends
//!
//! [`HttpBackend`] talks to the remote REST service; [`MemoryBackend`]
//! keeps scores in process for offline play. [`Backend`] picks one at
//! runtime.

use std::cell::RefCell;
use std::collections::BTreeMap;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::error::{ScoreError, validate_player_name};
use super::model::{GameInfo, ScoreEntry, ScoreSubmission};
use crate::games::GameKind;

/// Operations the score service offers
///
/// Everything runs on the browser's single thread, so the futures are
/// not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait ScoreBackend {
    async fn get_available_games(&self) -> Result<Vec<GameInfo>, ScoreError>;

    /// Scores as the backend returns them (unsorted)
    async fn get_high_scores(&self, game: &str) -> Result<Vec<ScoreEntry>, ScoreError>;

    async fn get_player_score(
        &self,
        game: &str,
        player_name: &str,
    ) -> Result<Option<u64>, ScoreError>;

    async fn submit_score(
        &self,
        game: &str,
        player_name: &str,
        score: u64,
    ) -> Result<(), ScoreError>;
}

pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    /// Append percent-encoded path segments to the base URL
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ScoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ScoreError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ScoreError> {
        let url = self.endpoint(segments)?;
        let response = self.client.get(url).send().await?;
        Ok(check_status(response)?.json::<T>().await?)
    }
}

fn check_status(response: Response) -> Result<Response, ScoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ScoreError::Status(status.as_u16()))
    }
}

impl ScoreBackend for HttpBackend {
    async fn get_available_games(&self) -> Result<Vec<GameInfo>, ScoreError> {
        self.get_json(&["games"]).await
    }

    async fn get_high_scores(&self, game: &str) -> Result<Vec<ScoreEntry>, ScoreError> {
        self.get_json(&["games", game, "scores"]).await
    }

    async fn get_player_score(
        &self,
        game: &str,
        player_name: &str,
    ) -> Result<Option<u64>, ScoreError> {
        self.get_json(&["games", game, "scores", player_name]).await
    }

    async fn submit_score(
        &self,
        game: &str,
        player_name: &str,
        score: u64,
    ) -> Result<(), ScoreError> {
        let body = ScoreSubmission {
            game: game.to_string(),
            player_name: player_name.to_string(),
            score,
        };
        let url = self.endpoint(&["scores"])?;
        let response = self.client.post(url).json(&body).send().await?;
        check_status(response)?;
        Ok(())
    }
}

/// In-process store holding each player's best score per game
#[derive(Debug)]
pub struct MemoryBackend {
    games: Vec<GameKind>,
    // BTreeMap keeps listing order stable between calls
    scores: RefCell<BTreeMap<(String, String), u64>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_games(GameKind::ALL.to_vec())
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve only these games, in this order
    pub fn with_games(games: Vec<GameKind>) -> Self {
        Self {
            games,
            scores: RefCell::default(),
        }
    }
}

impl ScoreBackend for MemoryBackend {
    async fn get_available_games(&self) -> Result<Vec<GameInfo>, ScoreError> {
        Ok(self.games.iter().copied().map(GameInfo::from).collect())
    }

    async fn get_high_scores(&self, game: &str) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self
            .scores
            .borrow()
            .iter()
            .filter(|((g, _), _)| g == game)
            .map(|((_, player), &score)| ScoreEntry {
                player_name: player.clone(),
                score,
            })
            .collect())
    }

    async fn get_player_score(
        &self,
        game: &str,
        player_name: &str,
    ) -> Result<Option<u64>, ScoreError> {
        let key = (game.to_string(), player_name.trim().to_string());
        Ok(self.scores.borrow().get(&key).copied())
    }

    async fn submit_score(
        &self,
        game: &str,
        player_name: &str,
        score: u64,
    ) -> Result<(), ScoreError> {
        let name = validate_player_name(player_name)?;
        if !GameKind::from_name(game).is_some_and(|kind| self.games.contains(&kind)) {
            return Err(ScoreError::InvalidScore);
        }
        let mut scores = self.scores.borrow_mut();
        let best = scores.entry((game.to_string(), name)).or_insert(score);
        *best = (*best).max(score);
        Ok(())
    }
}

/// Runtime choice between the remote and the offline store
pub enum Backend {
    Http(HttpBackend),
    Memory(MemoryBackend),
}

impl ScoreBackend for Backend {
    async fn get_available_games(&self) -> Result<Vec<GameInfo>, ScoreError> {
        match self {
            Backend::Http(b) => b.get_available_games().await,
            Backend::Memory(b) => b.get_available_games().await,
        }
    }

    async fn get_high_scores(&self, game: &str) -> Result<Vec<ScoreEntry>, ScoreError> {
        match self {
            Backend::Http(b) => b.get_high_scores(game).await,
            Backend::Memory(b) => b.get_high_scores(game).await,
        }
    }

    async fn get_player_score(
        &self,
        game: &str,
        player_name: &str,
    ) -> Result<Option<u64>, ScoreError> {
        match self {
            Backend::Http(b) => b.get_player_score(game, player_name).await,
            Backend::Memory(b) => b.get_player_score(game, player_name).await,
        }
    }

    async fn submit_score(
        &self,
        game: &str,
        player_name: &str,
        score: u64,
    ) -> Result<(), ScoreError> {
        match self {
            Backend::Http(b) => b.submit_score(game, player_name, score).await,
            Backend::Memory(b) => b.submit_score(game, player_name, score).await,
        }
    }
}
