//! Centipede

use glam::Vec2;
use rand::Rng;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, TickInput, seeded_rng};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 700.0;
pub const CELL_SIZE: f32 = 20.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const BULLET_SPEED: f32 = 8.0;
pub const CENTIPEDE_SPEED: f32 = 2.0;
pub const SEGMENTS: usize = 12;
pub const MUSHROOMS: usize = 30;
pub const FIRE_COOLDOWN_MS: f32 = 300.0;
pub const SEGMENT_POINTS: u64 = 10;
pub const MUSHROOM_POINTS: u64 = 1;
pub const CLEAR_BONUS: u64 = 100;

const PLAYER_START: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 40.0);
const PLAYER_TOP: f32 = HEIGHT - 150.0;
const PLAYER_BOTTOM: f32 = HEIGHT - 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Top-left of the segment's cell
    pub pos: Vec2,
    pub direction: f32,
}

/// Closer than one cell on both axes
fn touching(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < CELL_SIZE && (a.y - b.y).abs() < CELL_SIZE
}

fn fresh_centipede() -> Vec<Segment> {
    (0..SEGMENTS)
        .map(|i| Segment {
            pos: Vec2::new(i as f32 * CELL_SIZE, 20.0),
            direction: 1.0,
        })
        .collect()
}

pub struct Centipede {
    pub player: Vec2,
    pub segments: Vec<Segment>,
    /// Top-left corners
    pub mushrooms: Vec<Vec2>,
    pub bullets: Vec<Vec2>,
    pub score: u64,
    pub lives: u32,
    pub status: GameStatus,
    cooldown: u32,
}

impl Centipede {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let cols = (WIDTH / CELL_SIZE) as u32;
        let rows = (HEIGHT / CELL_SIZE) as u32 - 3;
        let mushrooms = (0..MUSHROOMS)
            .map(|_| {
                Vec2::new(
                    rng.random_range(0..cols) as f32 * CELL_SIZE,
                    rng.random_range(0..rows) as f32 * CELL_SIZE + 40.0,
                )
            })
            .collect();

        Self {
            player: PLAYER_START,
            segments: fresh_centipede(),
            mushrooms,
            bullets: Vec::new(),
            score: 0,
            lives: 3,
            status: GameStatus::Running,
            cooldown: 0,
        }
    }

    fn crawl(&mut self) {
        for seg in &mut self.segments {
            seg.pos.x += seg.direction * CENTIPEDE_SPEED;
            if seg.pos.x <= 0.0 || seg.pos.x >= WIDTH - CELL_SIZE {
                seg.direction = -seg.direction;
                seg.pos.y += CELL_SIZE;
            }
            if self.mushrooms.iter().any(|m| touching(*m, seg.pos)) {
                seg.direction = -seg.direction;
                seg.pos.y += CELL_SIZE;
            }
            // Re-enter from the top after crawling off the bottom
            if seg.pos.y >= HEIGHT {
                seg.pos.y = 20.0;
            }
        }
    }

    fn resolve_shots(&mut self, events: &mut Vec<GameEvent>) {
        let mut remaining = Vec::with_capacity(self.bullets.len());
        for bullet in std::mem::take(&mut self.bullets) {
            if let Some(i) = self.segments.iter().position(|s| touching(s.pos, bullet)) {
                self.segments.remove(i);
                self.mushrooms.push(bullet);
                self.score += SEGMENT_POINTS;
                events.push(GameEvent::Scored(SEGMENT_POINTS));
            } else if let Some(i) = self.mushrooms.iter().position(|m| touching(*m, bullet)) {
                self.mushrooms.remove(i);
                self.score += MUSHROOM_POINTS;
                events.push(GameEvent::Scored(MUSHROOM_POINTS));
            } else {
                remaining.push(bullet);
            }
        }
        self.bullets = remaining;
    }
}

impl ArcadeGame for Centipede {
    fn kind(&self) -> GameKind {
        GameKind::Centipede
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        self.player.x =
            (self.player.x + input.held.axis_x() * PLAYER_SPEED).clamp(15.0, WIDTH - 15.0);
        self.player.y =
            (self.player.y + input.held.axis_y() * PLAYER_SPEED).clamp(PLAYER_TOP, PLAYER_BOTTOM);

        self.cooldown = self.cooldown.saturating_sub(1);
        if input.held.action && self.cooldown == 0 {
            self.bullets.push(self.player);
            self.cooldown = ms_to_ticks(FIRE_COOLDOWN_MS);
        }
        for b in &mut self.bullets {
            b.y -= BULLET_SPEED;
        }
        self.bullets.retain(|b| b.y > 0.0);

        self.crawl();
        self.resolve_shots(&mut events);

        if self.segments.iter().any(|s| touching(s.pos, self.player)) {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            self.player = PLAYER_START;
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
                return events;
            }
        }

        if self.segments.is_empty() {
            self.score += CLEAR_BONUS;
            events.push(GameEvent::Scored(CLEAR_BONUS));
            self.segments = fresh_centipede();
        }
        events
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn hud(&self) -> Vec<HudStat> {
        vec![HudStat::new("Lives", self.lives)]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.15, 0.02, 264.0));
        let half = Vec2::splat(CELL_SIZE / 2.0);

        let cap = palette::oklch(0.75, 0.15, 140.0);
        for m in &self.mushrooms {
            frame.circle(*m + half, CELL_SIZE / 2.0, cap);
        }
        for (i, seg) in self.segments.iter().enumerate() {
            let hue = 280.0 + i as f32 * 10.0;
            frame.circle(seg.pos + half, CELL_SIZE / 2.0, palette::oklch(0.65, 0.25, hue));
        }
        for b in &self.bullets {
            frame.rect(b.x - 2.0, b.y, 4.0, 10.0, palette::oklch(0.85, 0.25, 85.0));
        }

        let p = self.player;
        frame.triangle(
            p + Vec2::new(0.0, 20.0),
            p + Vec2::new(-15.0, 0.0),
            p + Vec2::new(15.0, 0.0),
            palette::oklch(0.75, 0.25, 180.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_field(seed: u64) -> Centipede {
        let mut game = Centipede::new(seed);
        game.mushrooms.clear();
        game
    }

    #[test]
    fn test_setup() {
        let game = Centipede::new(4);
        assert_eq!(game.segments.len(), SEGMENTS);
        assert_eq!(game.mushrooms.len(), MUSHROOMS);
        assert!(game.mushrooms.iter().all(|m| m.y >= 40.0 && m.x < WIDTH));
    }

    #[test]
    fn test_segment_turns_at_wall() {
        let mut game = clear_field(1);
        game.segments = vec![Segment {
            pos: Vec2::new(WIDTH - CELL_SIZE - 1.0, 100.0),
            direction: 1.0,
        }];
        game.crawl();
        assert_eq!(game.segments[0].direction, -1.0);
        assert_eq!(game.segments[0].pos.y, 120.0);
    }

    #[test]
    fn test_segment_turns_at_mushroom() {
        let mut game = clear_field(1);
        game.mushrooms.push(Vec2::new(220.0, 100.0));
        game.segments = vec![Segment { pos: Vec2::new(198.0, 100.0), direction: 1.0 }];
        game.crawl();
        assert_eq!(game.segments[0].direction, -1.0);
        assert_eq!(game.segments[0].pos.y, 120.0);
    }

    #[test]
    fn test_shooting_segment_leaves_mushroom() {
        let mut game = clear_field(1);
        game.segments = vec![
            Segment { pos: Vec2::new(300.0, 300.0), direction: 1.0 },
            Segment { pos: Vec2::new(100.0, 100.0), direction: 1.0 },
        ];
        game.bullets.push(Vec2::new(302.0, 300.0 + BULLET_SPEED));
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::Scored(SEGMENT_POINTS)));
        assert_eq!(game.segments.len(), 1);
        assert_eq!(game.mushrooms.len(), 1);
    }

    #[test]
    fn test_shooting_mushroom() {
        let mut game = clear_field(1);
        game.mushrooms.push(Vec2::new(300.0, 400.0));
        game.bullets.push(Vec2::new(305.0, 400.0 + BULLET_SPEED));
        game.tick(&TickInput::default());
        assert!(game.mushrooms.is_empty());
        assert_eq!(game.score, MUSHROOM_POINTS);
    }

    #[test]
    fn test_clearing_centipede_respawns() {
        let mut game = clear_field(1);
        game.segments.clear();
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::Scored(CLEAR_BONUS)));
        assert_eq!(game.segments.len(), SEGMENTS);
    }

    #[test]
    fn test_contact_costs_life() {
        let mut game = clear_field(1);
        game.segments = vec![Segment { pos: PLAYER_START - Vec2::new(2.0, 0.0), direction: 1.0 }];
        game.tick(&TickInput::default());
        assert_eq!(game.lives, 2);
        assert_eq!(game.player, PLAYER_START);
    }

    #[test]
    fn test_player_confined_to_bottom() {
        let mut game = clear_field(1);
        let mut input = TickInput::default();
        input.held.up = true;
        for _ in 0..60 {
            game.tick(&input);
        }
        assert_eq!(game.player.y, PLAYER_TOP);
    }
}
