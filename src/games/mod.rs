//! The game catalog
//!
//! Each game lives in its own module and implements
//! [`ArcadeGame`](crate::sim::ArcadeGame). [`GameKind`] is the registry:
//! display name (also the score key on the backend), route slug and
//! leaderboard metadata.

pub mod asteroids;
pub mod breakout;
pub mod bubble_shooter;
pub mod centipede;
pub mod dig_dug;
pub mod donkey_kong;
pub mod frogger;
pub mod galaga;
pub mod minesweeper;
pub mod missile_command;
pub mod pacman;
pub mod pinball;
pub mod pong;
pub mod qbert;
pub mod rolling_balls;
pub mod snake;
pub mod space_invaders;
pub mod tetris;

use serde::{Deserialize, Serialize};

use crate::sim::ArcadeGame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Snake,
    Tetris,
    Pong,
    PacMan,
    SpaceInvaders,
    Breakout,
    Asteroids,
    DonkeyKong,
    RollingBalls,
    Frogger,
    Galaga,
    Minesweeper,
    Centipede,
    MissileCommand,
    Pinball,
    BubbleShooter,
    Qbert,
    DigDug,
}

/// Static catalog entry for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMetadata {
    /// Display name, also the key scores are filed under
    pub name: &'static str,
    /// Route path segment (`/snake`)
    pub slug: &'static str,
    pub description: &'static str,
    /// Compact name for the leaderboard grid
    pub short_name: &'static str,
    pub thumbnail: &'static str,
}

impl GameKind {
    pub const ALL: [GameKind; 18] = [
        GameKind::Snake,
        GameKind::Tetris,
        GameKind::Pong,
        GameKind::PacMan,
        GameKind::SpaceInvaders,
        GameKind::Breakout,
        GameKind::Asteroids,
        GameKind::DonkeyKong,
        GameKind::RollingBalls,
        GameKind::Frogger,
        GameKind::Galaga,
        GameKind::Minesweeper,
        GameKind::Centipede,
        GameKind::MissileCommand,
        GameKind::Pinball,
        GameKind::BubbleShooter,
        GameKind::Qbert,
        GameKind::DigDug,
    ];

    pub fn metadata(&self) -> GameMetadata {
        let (name, slug, description, short_name) = match self {
            GameKind::Snake => (
                "Snake",
                "snake",
                "Eat, grow, and don't bite your own tail",
                "Snake",
            ),
            GameKind::Tetris => (
                "Tetris",
                "tetris",
                "Stack falling blocks and clear lines",
                "Tetris",
            ),
            GameKind::Pong => ("Pong", "pong", "Classic paddle duel against the computer", "Pong"),
            GameKind::PacMan => (
                "Pac-Man",
                "pacman",
                "Clear the maze of dots while dodging ghosts",
                "Pac-Man",
            ),
            GameKind::SpaceInvaders => (
                "Space Invaders",
                "space-invaders",
                "Defend Earth from the descending alien fleet",
                "Space",
            ),
            GameKind::Breakout => (
                "Breakout",
                "breakout",
                "Smash every brick with a bouncing ball",
                "Breakout",
            ),
            GameKind::Asteroids => (
                "Asteroids",
                "asteroids",
                "Blast drifting rocks into ever smaller pieces",
                "Asteroids",
            ),
            GameKind::DonkeyKong => (
                "Donkey Kong",
                "donkey-kong",
                "Climb the girders and jump the barrels",
                "DK",
            ),
            GameKind::RollingBalls => (
                "Rolling Balls",
                "rolling-balls",
                "Roll across tilted platforms and hit every checkpoint",
                "Balls",
            ),
            GameKind::Frogger => (
                "Frogger",
                "frogger",
                "Cross the road and the river in one piece",
                "Frogger",
            ),
            GameKind::Galaga => (
                "Galaga",
                "galaga",
                "Shoot down wave after wave of alien fighters",
                "Galaga",
            ),
            GameKind::Minesweeper => (
                "Minesweeper",
                "minesweeper",
                "Clear the field without touching a mine",
                "Mines",
            ),
            GameKind::Centipede => (
                "Centipede",
                "centipede",
                "Shoot the centipede before it reaches you",
                "Centipede",
            ),
            GameKind::MissileCommand => (
                "Missile Command",
                "missile-command",
                "Protect your cities from incoming missiles",
                "Missile",
            ),
            GameKind::Pinball => (
                "Pinball",
                "pinball",
                "Keep the ball alive with bumpers and flippers",
                "Pinball",
            ),
            GameKind::BubbleShooter => (
                "Bubble Shooter",
                "bubble-shooter",
                "Match three bubbles of the same color to pop them",
                "Bubbles",
            ),
            GameKind::Qbert => (
                "Q*bert",
                "qbert",
                "Hop the pyramid and change every cube's color",
                "Q*bert",
            ),
            GameKind::DigDug => (
                "Dig Dug",
                "dig-dug",
                "Tunnel underground and pump up the monsters",
                "Dig Dug",
            ),
        };
        GameMetadata {
            name,
            slug,
            description,
            short_name,
            thumbnail: thumbnail_for(slug),
        }
    }

    pub fn name(&self) -> &'static str {
        self.metadata().name
    }

    pub fn slug(&self) -> &'static str {
        self.metadata().slug
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.slug().eq_ignore_ascii_case(slug))
    }

    /// Lookup by display name (as stored by the score backend)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Build a fresh game instance
    pub fn create(&self, seed: u64) -> Box<dyn ArcadeGame> {
        match self {
            GameKind::Snake => Box::new(snake::Snake::new(seed)),
            GameKind::Tetris => Box::new(tetris::Tetris::new(seed)),
            GameKind::Pong => Box::new(pong::Pong::new(seed)),
            GameKind::PacMan => Box::new(pacman::PacMan::new(seed)),
            GameKind::SpaceInvaders => Box::new(space_invaders::SpaceInvaders::new(seed)),
            GameKind::Breakout => Box::new(breakout::Breakout::new(seed)),
            GameKind::Asteroids => Box::new(asteroids::Asteroids::new(seed)),
            GameKind::DonkeyKong => Box::new(donkey_kong::DonkeyKong::new(seed)),
            GameKind::RollingBalls => Box::new(rolling_balls::RollingBalls::new(seed)),
            GameKind::Frogger => Box::new(frogger::Frogger::new(seed)),
            GameKind::Galaga => Box::new(galaga::Galaga::new(seed)),
            GameKind::Minesweeper => Box::new(minesweeper::Minesweeper::new(seed)),
            GameKind::Centipede => Box::new(centipede::Centipede::new(seed)),
            GameKind::MissileCommand => Box::new(missile_command::MissileCommand::new(seed)),
            GameKind::Pinball => Box::new(pinball::Pinball::new(seed)),
            GameKind::BubbleShooter => Box::new(bubble_shooter::BubbleShooter::new(seed)),
            GameKind::Qbert => Box::new(qbert::Qbert::new(seed)),
            GameKind::DigDug => Box::new(dig_dug::DigDug::new(seed)),
        }
    }
}

fn thumbnail_for(slug: &'static str) -> &'static str {
    // Paths are served next to index.html
    match slug {
        "snake" => "assets/thumbnails/snake.png",
        "tetris" => "assets/thumbnails/tetris.png",
        "pong" => "assets/thumbnails/pong.png",
        "pacman" => "assets/thumbnails/pacman.png",
        "space-invaders" => "assets/thumbnails/space-invaders.png",
        "breakout" => "assets/thumbnails/breakout.png",
        "asteroids" => "assets/thumbnails/asteroids.png",
        "donkey-kong" => "assets/thumbnails/donkey-kong.png",
        "rolling-balls" => "assets/thumbnails/rolling-balls.png",
        "frogger" => "assets/thumbnails/frogger.png",
        "galaga" => "assets/thumbnails/galaga.png",
        "minesweeper" => "assets/thumbnails/minesweeper.png",
        "centipede" => "assets/thumbnails/centipede.png",
        "missile-command" => "assets/thumbnails/missile-command.png",
        "pinball" => "assets/thumbnails/pinball.png",
        "bubble-shooter" => "assets/thumbnails/bubble-shooter.png",
        "qbert" => "assets/thumbnails/qbert.png",
        _ => "assets/thumbnails/dig-dug.png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameStatus, TickInput};
    use std::collections::HashSet;

    #[test]
    fn test_registry_unique_names_and_slugs() {
        let names: HashSet<_> = GameKind::ALL.iter().map(|k| k.name()).collect();
        let slugs: HashSet<_> = GameKind::ALL.iter().map(|k| k.slug()).collect();
        assert_eq!(names.len(), GameKind::ALL.len());
        assert_eq!(slugs.len(), GameKind::ALL.len());
    }

    #[test]
    fn test_short_names() {
        assert_eq!(GameKind::SpaceInvaders.metadata().short_name, "Space");
        assert_eq!(GameKind::DonkeyKong.metadata().short_name, "DK");
        assert_eq!(GameKind::RollingBalls.metadata().short_name, "Balls");
    }

    #[test]
    fn test_lookup_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_slug(kind.slug()), Some(kind));
            assert_eq!(GameKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(GameKind::from_slug("SNAKE"), Some(GameKind::Snake));
        assert_eq!(GameKind::from_name("Q*bert"), Some(GameKind::Qbert));
    }

    #[test]
    fn test_every_game_builds_ticks_and_renders() {
        for kind in GameKind::ALL {
            let mut game = kind.create(1234);
            assert_eq!(game.kind(), kind);
            assert_eq!(game.score(), 0, "{} should start at zero", kind.name());
            assert_eq!(game.status(), GameStatus::Running);
            let input = TickInput::default();
            for _ in 0..30 {
                game.tick(&input);
            }
            let (w, h) = game.size();
            let mut frame = crate::renderer::Frame::new(w, h);
            game.render(&mut frame);
            assert!(!frame.vertices().is_empty(), "{} drew nothing", kind.name());
        }
    }

    #[test]
    fn test_every_game_is_deterministic() {
        for kind in GameKind::ALL {
            let mut a = kind.create(77);
            let mut b = kind.create(77);
            let mut input = TickInput::default();
            input.held.left = true;
            input.held.action = true;
            for _ in 0..600 {
                a.tick(&input);
                b.tick(&input);
            }
            assert_eq!(a.score(), b.score(), "{} diverged", kind.name());
            assert_eq!(a.status(), b.status(), "{} diverged", kind.name());
        }
    }
}
