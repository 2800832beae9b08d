//! Leaderboard tables as shown on the leaderboard page
//!
//! One table per game, fed from the score client and kept to the top 10.

use crate::games::GameKind;
use crate::scores::{ScoreEntry, top_scores};

/// Rank decoration for display (1-indexed rank)
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{n}"),
    }
}

/// A single game's leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    pub game: GameKind,
    /// Best first, at most `LEADERBOARD_SIZE`
    pub entries: Vec<ScoreEntry>,
    /// The local player's best as reported by the backend
    pub player_best: Option<u64>,
}

impl HighScores {
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            entries: Vec::new(),
            player_best: None,
        }
    }

    /// Build from whatever the backend returned
    pub fn from_entries(game: GameKind, entries: Vec<ScoreEntry>) -> Self {
        Self {
            game,
            entries: top_scores(entries),
            player_best: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display rows as (rank label, player, score)
    pub fn rows(&self) -> Vec<(String, &str, u64)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (rank_label(i + 1), e.player_name.as_str(), e.score))
            .collect()
    }

    /// Text shown in place of the table when there is nothing to list
    pub fn placeholder(&self) -> Option<&'static str> {
        self.is_empty().then_some("No scores yet")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LEADERBOARD_SIZE;
    use proptest::prelude::*;

    fn table(scores: &[u64]) -> HighScores {
        let entries = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| ScoreEntry {
                player_name: format!("p{i}"),
                score,
            })
            .collect();
        HighScores::from_entries(GameKind::Snake, entries)
    }

    #[test]
    fn test_rank_labels() {
        assert_eq!(rank_label(1), "🥇");
        assert_eq!(rank_label(3), "🥉");
        assert_eq!(rank_label(4), "#4");
        assert_eq!(rank_label(10), "#10");
    }

    #[test]
    fn test_empty_table() {
        let hs = HighScores::new(GameKind::Pong);
        assert_eq!(hs.placeholder(), Some("No scores yet"));
        assert!(hs.rows().is_empty());
    }

    #[test]
    fn test_rows_sorted_with_medals() {
        let hs = table(&[10, 300, 20]);
        let rows = hs.rows();
        assert_eq!(rows[0], ("🥇".to_string(), "p1", 300));
        assert_eq!(rows[2].2, 10);
        assert_eq!(hs.placeholder(), None);
    }

    #[test]
    fn test_table_truncated_to_leaderboard_size() {
        let hs = table(&[100, 90, 80, 70, 60, 50, 40, 30, 20, 10, 5]);
        assert_eq!(hs.entries.len(), LEADERBOARD_SIZE);
        assert_eq!(hs.rows().last().map(|r| r.2), Some(10));
    }

    proptest! {
        #[test]
        fn prop_rows_ranked_best_first(scores in proptest::collection::vec(0u64..1000, 0..15)) {
            let hs = table(&scores);
            let rows = hs.rows();
            prop_assert_eq!(rows.len(), scores.len().min(LEADERBOARD_SIZE));
            for (i, row) in rows.iter().enumerate() {
                prop_assert_eq!(&row.0, &rank_label(i + 1));
            }
            prop_assert!(rows.windows(2).all(|w| w[0].2 >= w[1].2));
        }
    }
}
