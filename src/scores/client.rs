//! Leaderboard queries and score submission on top of a backend

use super::backend::ScoreBackend;
use super::error::{ScoreError, validate_player_name};
use super::model::{GameInfo, ScoreEntry, top_scores};
use crate::games::GameKind;

/// Score client; `None` backend means nothing is configured
pub struct ScoreClient<B> {
    backend: Option<B>,
}

impl<B: ScoreBackend> ScoreClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn disconnected() -> Self {
        Self { backend: None }
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> Result<&B, ScoreError> {
        self.backend.as_ref().ok_or(ScoreError::NotConnected)
    }

    pub async fn games(&self) -> Result<Vec<GameInfo>, ScoreError> {
        self.backend()?.get_available_games().await
    }

    /// Games to list, in catalog order
    ///
    /// Catalog entries are matched to the registry by name, then by slug.
    /// The whole registry stands in when there is no backend or the catalog
    /// cannot be loaded.
    pub async fn catalog(&self) -> Vec<GameKind> {
        if !self.is_connected() {
            return GameKind::ALL.to_vec();
        }
        match self.games().await {
            Ok(games) => games
                .iter()
                .filter_map(|info| {
                    let kind = GameKind::from_name(&info.name)
                        .or_else(|| GameKind::from_slug(&info.name));
                    if kind.is_none() {
                        log::debug!("Skipping unknown game {}", info.name);
                    }
                    kind
                })
                .collect(),
            Err(e) => {
                log::warn!("Failed to load game catalog: {e}");
                GameKind::ALL.to_vec()
            }
        }
    }

    /// Top scores for a game, best first
    pub async fn leaderboard(&self, game: &str) -> Result<Vec<ScoreEntry>, ScoreError> {
        let entries = self.backend()?.get_high_scores(game).await?;
        Ok(top_scores(entries))
    }

    /// Leaderboard for display; failures are logged and shown as empty
    pub async fn leaderboard_or_empty(&self, game: &str) -> Vec<ScoreEntry> {
        match self.leaderboard(game).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to load {game} scores: {e}");
                Vec::new()
            }
        }
    }

    pub async fn player_best(
        &self,
        game: &str,
        player_name: &str,
    ) -> Result<Option<u64>, ScoreError> {
        let name = player_name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.backend()?.get_player_score(game, name).await
    }

    /// Validate the name and submit; returns the name as sent
    pub async fn submit(
        &self,
        game: &str,
        player_name: &str,
        score: u64,
    ) -> Result<String, ScoreError> {
        let name = validate_player_name(player_name)?;
        let result = self.backend()?.submit_score(game, &name, score).await;
        match &result {
            Ok(()) => log::info!("Submitted {score} for {name} on {game}"),
            Err(e) => log::error!("Score submission for {game} failed: {e}"),
        }
        result.map(|()| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LEADERBOARD_SIZE;
    use crate::scores::{MemoryBackend, NameError};
    use futures::executor::block_on;

    #[test]
    fn test_disconnected_client() {
        let client: ScoreClient<MemoryBackend> = ScoreClient::disconnected();
        assert_eq!(block_on(client.submit("Snake", "Ada", 1)), Err(ScoreError::NotConnected));
        assert!(block_on(client.leaderboard_or_empty("Snake")).is_empty());
    }

    #[test]
    fn test_catalog_follows_backend() {
        let backend = MemoryBackend::with_games(vec![GameKind::Qbert, GameKind::Snake]);
        let client = ScoreClient::new(backend);
        assert_eq!(block_on(client.catalog()), vec![GameKind::Qbert, GameKind::Snake]);
        assert_eq!(
            block_on(client.submit("Tetris", "Ada", 5)),
            Err(ScoreError::InvalidScore)
        );

        let offline: ScoreClient<MemoryBackend> = ScoreClient::disconnected();
        assert_eq!(block_on(offline.catalog()), GameKind::ALL.to_vec());
    }

    #[test]
    fn test_submit_trims_name() {
        let client = ScoreClient::new(MemoryBackend::new());
        block_on(async {
            assert_eq!(client.submit("Tetris", "  Ada ", 900).await, Ok("Ada".to_string()));
            assert_eq!(client.player_best("Tetris", "Ada").await, Ok(Some(900)));
        });
    }

    #[test]
    fn test_blank_name_never_reaches_backend() {
        let client = ScoreClient::new(MemoryBackend::new());
        block_on(async {
            assert_eq!(
                client.submit("Tetris", "", 900).await,
                Err(ScoreError::InvalidName(NameError::Empty))
            );
            assert!(client.leaderboard("Tetris").await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_leaderboard_top_ten_descending() {
        let client = ScoreClient::new(MemoryBackend::new());
        block_on(async {
            for i in 0..14u64 {
                client.submit("Galaga", &format!("pilot{i}"), i * 100).await.unwrap();
            }
            let board = client.leaderboard("Galaga").await.unwrap();
            assert_eq!(board.len(), LEADERBOARD_SIZE);
            assert_eq!(board[0].score, 1300);
            assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
        });
    }
}
