//! HTML for the page shell
//!
//! Pages are rebuilt as strings and swapped in with `innerHTML`; clicks are
//! routed through `data-action` attributes.

use std::fmt::Write;

use super::{ScoreDialog, ToastQueue};
use crate::consts::PLAYER_NAME_MAX_LEN;
use crate::games::GameKind;
use crate::highscores::{HighScores, rank_label};
use crate::routes::Route;
use crate::sim::HudStat;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const LOADING: &str = r#"<p class="muted">Loading...</p>"#;

/// Game cards for the catalog; `None` while it is being fetched
pub fn home_page(games: Option<&[GameKind]>) -> String {
    let mut html = String::from(
        r##"<header class="page-header"><h1>Retro Arcade</h1><a class="button" href="#/leaderboard">Leaderboard</a></header>"##,
    );
    let Some(games) = games else {
        html.push_str(LOADING);
        return html;
    };
    html.push_str(r#"<div class="game-grid">"#);
    for &kind in games {
        let meta = kind.metadata();
        let _ = write!(
            html,
            r#"<a class="game-card" href="{href}"><img src="{thumb}" alt="{name}"><h2>{name}</h2><p>{desc}</p></a>"#,
            href = Route::Game(kind).hash(),
            thumb = meta.thumbnail,
            name = escape_html(meta.name),
            desc = escape_html(meta.description),
        );
    }
    html.push_str("</div>");
    html
}

/// One card per game; `None` while the catalog or a table is loading
pub fn leaderboard_page(tables: Option<&[(GameKind, Option<HighScores>)]>) -> String {
    let mut html = String::from(
        r##"<header class="page-header"><a class="button" href="#/">Back</a><h1>Leaderboard</h1></header>"##,
    );
    let Some(tables) = tables else {
        html.push_str(LOADING);
        return html;
    };
    html.push_str(r#"<div class="board-grid">"#);
    for (kind, table) in tables {
        let _ = write!(
            html,
            r#"<section class="board-card"><h2>{}</h2>"#,
            escape_html(kind.metadata().short_name)
        );
        match table {
            None => html.push_str(LOADING),
            Some(table) => {
                if let Some(text) = table.placeholder() {
                    let _ = write!(html, r#"<p class="muted">{text}</p>"#);
                } else {
                    html.push_str("<ol>");
                    for (rank, player, score) in table.rows() {
                        let _ = write!(
                            html,
                            r#"<li><span class="rank">{rank}</span><span class="player">{}</span><span class="score">{score}</span></li>"#,
                            escape_html(player)
                        );
                    }
                    html.push_str("</ol>");
                }
                if let Some(best) = table.player_best {
                    let _ = write!(html, r#"<p class="player-best">Your best: {best}</p>"#);
                }
            }
        }
        html.push_str("</section>");
    }
    html.push_str("</div>");
    html
}

pub fn not_found_page() -> String {
    r##"<div class="not-found"><h1>404</h1><p>No such game.</p><a class="button" href="#/">Back to the arcade</a></div>"##
        .to_string()
}

pub fn hud_html(score: u64, stats: &[HudStat], fps: Option<u32>) -> String {
    let mut html = format!(r#"<span class="hud-item"><b>Score</b> {score}</span>"#);
    for stat in stats {
        let _ = write!(
            html,
            r#"<span class="hud-item"><b>{}</b> {}</span>"#,
            stat.label,
            escape_html(&stat.value)
        );
    }
    if let Some(fps) = fps {
        let _ = write!(html, r#"<span class="hud-item hud-fps"><b>FPS</b> {fps}</span>"#);
    }
    html
}

pub fn dialog_html(dialog: &ScoreDialog) -> String {
    let Some(report) = dialog.report() else {
        return String::new();
    };
    let title = if report.won { "You Win!" } else { "Game Over" };
    let (disabled, label) = if dialog.is_submitting() {
        (" disabled", "Submitting...")
    } else {
        ("", "Submit Score")
    };
    format!(
        r#"<div class="dialog"><h2>{title}</h2><p>Final score: <b>{score}</b></p><label for="player-name">Your name</label><input id="player-name" maxlength="{max}" value="{name}"{disabled}><div class="dialog-actions"><button data-action="skip-score"{disabled}>Skip</button><button data-action="submit-score"{disabled}>{label}</button></div></div>"#,
        score = report.score,
        max = PLAYER_NAME_MAX_LEN,
        name = escape_html(dialog.name()),
    )
}

pub fn toasts_html(toasts: &ToastQueue) -> String {
    let mut html = String::new();
    for toast in toasts.iter() {
        let _ = write!(
            html,
            r#"<div class="toast {}" data-action="dismiss-toast" data-id="{}">{}</div>"#,
            toast.kind.class(),
            toast.id,
            escape_html(&toast.message)
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{MemoryBackend, ScoreClient, ScoreEntry};
    use crate::sim::GameOverReport;
    use futures::executor::block_on;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_html(r#"<b>"Q*bert" & co</b>"#),
            "&lt;b&gt;&quot;Q*bert&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn test_home_links_every_game() {
        let html = home_page(Some(&GameKind::ALL));
        for kind in GameKind::ALL {
            assert!(html.contains(&format!(r##"href="#/{}""##, kind.slug())));
        }
        assert!(home_page(None).contains("Loading..."));
    }

    #[test]
    fn test_home_lists_backend_catalog() {
        let backend = MemoryBackend::with_games(vec![GameKind::DigDug, GameKind::Pong]);
        let client = ScoreClient::new(backend);
        let games = block_on(client.catalog());
        let html = home_page(Some(&games));
        let dig_dug = html.find(r##"href="#/dig-dug""##).unwrap();
        let pong = html.find(r##"href="#/pong""##).unwrap();
        assert!(dig_dug < pong);
        assert!(!html.contains(r##"href="#/snake""##));
    }

    #[test]
    fn test_leaderboard_card_states() {
        let mut snake = HighScores::from_entries(
            GameKind::Snake,
            vec![ScoreEntry {
                player_name: "<Ada>".to_string(),
                score: 50,
            }],
        );
        snake.player_best = Some(50);
        let html = leaderboard_page(Some(&[
            (GameKind::Snake, Some(snake)),
            (GameKind::Pong, Some(HighScores::new(GameKind::Pong))),
            (GameKind::Tetris, None),
        ]));
        assert!(html.contains(&rank_label(1)));
        assert!(html.contains("&lt;Ada&gt;"));
        assert!(html.contains("Your best: 50"));
        assert!(html.contains("No scores yet"));
        assert!(html.contains("Loading..."));
    }

    #[test]
    fn test_dialog_markup() {
        assert!(dialog_html(&ScoreDialog::Closed).is_empty());
        let mut dialog = ScoreDialog::default();
        dialog.open(
            GameOverReport {
                kind: GameKind::Pong,
                score: 7,
                won: true,
            },
            "Ada",
        );
        let html = dialog_html(&dialog);
        assert!(html.contains("You Win!"));
        assert!(html.contains(r#"value="Ada""#));
        assert!(html.contains(r#"maxlength="20""#));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn test_hud_markup() {
        let html = hud_html(120, &[HudStat::new("Lives", 2)], Some(59));
        assert!(html.contains("Score</b> 120"));
        assert!(html.contains("Lives</b> 2"));
        assert!(html.contains("FPS</b> 59"));
    }
}
