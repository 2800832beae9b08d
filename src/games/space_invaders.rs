//! Space Invaders

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, GameEvent, GameStatus, HudStat, Key, Rect, TickInput, point_in_rect, seeded_rng,
};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 500.0;
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const ALIEN_WIDTH: f32 = 30.0;
pub const ALIEN_HEIGHT: f32 = 25.0;
pub const ALIEN_ROWS: usize = 4;
pub const ALIEN_COLS: usize = 8;
pub const ALIEN_STEP: f32 = 2.0;
pub const ALIEN_DROP: f32 = 20.0;
/// Chance per tick that some alien fires
pub const ALIEN_FIRE_CHANCE: f64 = 0.02;
pub const PLAYER_BULLET_SPEED: f32 = 8.0;
pub const ALIEN_BULLET_SPEED: f32 = 5.0;
pub const ALIEN_POINTS: u64 = 100;

const PLAYER_Y: f32 = HEIGHT - 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alien {
    pub pos: Vec2,
    pub alive: bool,
}

impl Alien {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ALIEN_WIDTH, ALIEN_HEIGHT)
    }
}

pub struct SpaceInvaders {
    pub player_x: f32,
    pub aliens: Vec<Alien>,
    pub bullets: Vec<Vec2>,
    pub alien_bullets: Vec<Vec2>,
    /// +1 right, -1 left
    pub direction: f32,
    pub score: u64,
    pub lives: u32,
    pub status: GameStatus,
    rng: Pcg32,
}

impl SpaceInvaders {
    pub fn new(seed: u64) -> Self {
        let mut aliens = Vec::with_capacity(ALIEN_ROWS * ALIEN_COLS);
        for row in 0..ALIEN_ROWS {
            for col in 0..ALIEN_COLS {
                aliens.push(Alien {
                    pos: Vec2::new(
                        col as f32 * (ALIEN_WIDTH + 20.0) + 50.0,
                        row as f32 * (ALIEN_HEIGHT + 15.0) + 50.0,
                    ),
                    alive: true,
                });
            }
        }
        Self {
            player_x: WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
            aliens,
            bullets: Vec::new(),
            alien_bullets: Vec::new(),
            direction: 1.0,
            score: 0,
            lives: 3,
            status: GameStatus::Running,
            rng: seeded_rng(seed),
        }
    }

    pub fn player_rect(&self) -> Rect {
        Rect::new(self.player_x, PLAYER_Y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    fn alive(&self) -> impl Iterator<Item = &Alien> {
        self.aliens.iter().filter(|a| a.alive)
    }

    fn march(&mut self) {
        let (mut left, mut right) = (f32::MAX, f32::MIN);
        for alien in self.alive() {
            left = left.min(alien.pos.x);
            right = right.max(alien.pos.x);
        }

        let mut drop = 0.0;
        let step = self.direction * ALIEN_STEP;
        if right >= WIDTH - ALIEN_WIDTH - 10.0 && self.direction > 0.0 {
            drop = ALIEN_DROP;
            self.direction = -1.0;
        } else if left <= 10.0 && self.direction < 0.0 {
            drop = ALIEN_DROP;
            self.direction = 1.0;
        }

        for alien in &mut self.aliens {
            alien.pos += Vec2::new(step, drop);
        }
    }

    fn alien_fire(&mut self) {
        if !self.rng.random_bool(ALIEN_FIRE_CHANCE) {
            return;
        }
        let shooters: Vec<Vec2> = self.alive().map(|a| a.pos).collect();
        if let Some(pos) = shooters.choose(&mut self.rng) {
            self.alien_bullets
                .push(*pos + Vec2::new(ALIEN_WIDTH / 2.0, ALIEN_HEIGHT));
        }
    }
}

impl ArcadeGame for SpaceInvaders {
    fn kind(&self) -> GameKind {
        GameKind::SpaceInvaders
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        self.player_x =
            (self.player_x + input.held.axis_x() * PLAYER_SPEED).clamp(0.0, WIDTH - PLAYER_WIDTH);
        if input.was_pressed(Key::Action) {
            self.bullets
                .push(Vec2::new(self.player_x + PLAYER_WIDTH / 2.0, PLAYER_Y));
        }

        for b in &mut self.bullets {
            b.y -= PLAYER_BULLET_SPEED;
        }
        self.bullets.retain(|b| b.y > 0.0);
        for b in &mut self.alien_bullets {
            b.y += ALIEN_BULLET_SPEED;
        }
        self.alien_bullets.retain(|b| b.y < HEIGHT);

        self.march();
        self.alien_fire();

        for bullet in &mut self.bullets {
            for alien in self.aliens.iter_mut().filter(|a| a.alive) {
                if point_in_rect(*bullet, &alien.rect()) {
                    alien.alive = false;
                    bullet.y = -100.0;
                    self.score += ALIEN_POINTS;
                    events.push(GameEvent::Scored(ALIEN_POINTS));
                    break;
                }
            }
        }
        self.bullets.retain(|b| b.y > 0.0);

        let player = self.player_rect();
        let before = self.alien_bullets.len();
        self.alien_bullets.retain(|b| !point_in_rect(*b, &player));
        if self.alien_bullets.len() < before {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
                return events;
            }
        }

        if self.alive().next().is_none() {
            self.status = GameStatus::Over { won: true };
        } else if self.alive().any(|a| a.pos.y + ALIEN_HEIGHT >= PLAYER_Y) {
            self.status = GameStatus::Over { won: false };
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
        frame.background(palette::oklch(0.145, 0.0, 0.0));

        let p = self.player_rect();
        let ship = palette::oklch(0.6, 0.118, 184.704);
        frame.rect(p.pos.x, p.pos.y + 10.0, p.size.x, p.size.y - 10.0, ship);
        frame.rect(p.pos.x + p.size.x / 2.0 - 4.0, p.pos.y, 8.0, 10.0, ship);

        let alien_color = palette::oklch(0.696, 0.17, 162.48);
        for alien in self.alive() {
            let r = alien.rect();
            frame.rect(r.pos.x, r.pos.y + 5.0, r.size.x, r.size.y - 10.0, alien_color);
            frame.rect(r.pos.x + 5.0, r.pos.y, 5.0, r.size.y, alien_color);
            frame.rect(r.pos.x + r.size.x - 10.0, r.pos.y, 5.0, r.size.y, alien_color);
        }

        for b in &self.bullets {
            frame.rect(b.x - 2.0, b.y, 4.0, 10.0, palette::oklch(0.828, 0.189, 84.429));
        }
        for b in &self.alien_bullets {
            frame.rect(b.x - 2.0, b.y, 4.0, 10.0, palette::oklch(0.704, 0.191, 22.216));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_layout() {
        let game = SpaceInvaders::new(1);
        assert_eq!(game.aliens.len(), 32);
        assert_eq!(game.aliens[9].pos, Vec2::new(100.0, 90.0));
    }

    #[test]
    fn test_formation_drops_at_edge() {
        let mut game = SpaceInvaders::new(1);
        for alien in &mut game.aliens {
            alien.pos.x += 170.0;
        }
        let y = game.aliens[0].pos.y;
        game.march();
        assert_eq!(game.direction, -1.0);
        assert_eq!(game.aliens[0].pos.y, y + ALIEN_DROP);
    }

    #[test]
    fn test_bullet_kills_alien() {
        let mut game = SpaceInvaders::new(1);
        let target = game.aliens[24].rect().center();
        game.bullets.push(target + Vec2::new(-ALIEN_STEP, PLAYER_BULLET_SPEED));
        let events = game.tick(&TickInput::default());
        assert!(!game.aliens[24].alive);
        assert_eq!(game.score, ALIEN_POINTS);
        assert!(events.contains(&GameEvent::Scored(ALIEN_POINTS)));
    }

    #[test]
    fn test_alien_bullet_costs_life() {
        let mut game = SpaceInvaders::new(1);
        let p = game.player_rect().center();
        game.alien_bullets.push(p - Vec2::new(0.0, ALIEN_BULLET_SPEED));
        game.tick(&TickInput::default());
        assert_eq!(game.lives, 2);
    }

    #[test]
    fn test_invasion_ends_game() {
        let mut game = SpaceInvaders::new(1);
        for alien in &mut game.aliens {
            alien.pos.y += 400.0;
        }
        game.tick(&TickInput::default());
        assert_eq!(game.status, GameStatus::Over { won: false });
    }
}
