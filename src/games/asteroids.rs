//! Asteroids
//!
//! Everything wraps at the screen edges. A rock hit by a bullet splits
//! into two smaller rocks flying off at random headings.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, Key, TickInput, seeded_rng, within};
use crate::{from_angle, ms_to_ticks, wrap_point};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 500.0;
pub const SHIP_SIZE: f32 = 15.0;
pub const TURN_RATE: f32 = 0.1;
pub const THRUST: f32 = 0.3;
pub const DRAG: f32 = 0.99;
pub const BULLET_SPEED: f32 = 8.0;
pub const BULLET_LIFE: u32 = 60;
pub const ROCK_SPEED: f32 = 2.0;
pub const START_ROCKS: usize = 5;
pub const INVULNERABLE_MS: f32 = 2000.0;

const FIELD: Vec2 = Vec2::new(WIDTH, HEIGHT);
const SHIP_START: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
}

impl Ship {
    fn spawn() -> Self {
        Self {
            pos: SHIP_START,
            vel: Vec2::ZERO,
            angle: 0.0,
        }
    }

    fn nose(&self) -> Vec2 {
        self.pos + from_angle(self.angle) * SHIP_SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rock {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 3 (large) down to 1 (small)
    pub size: u32,
}

impl Rock {
    pub fn radius(&self) -> f32 {
        self.size as f32 * 10.0
    }

    /// Points for shooting this rock; smaller is worth more
    pub fn points(&self) -> u64 {
        (4 - self.size.min(3)) as u64 * 100
    }
}

pub struct Asteroids {
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub rocks: Vec<Rock>,
    pub score: u64,
    pub lives: u32,
    /// Ticks of post-hit invulnerability left
    pub invulnerable: u32,
    pub status: GameStatus,
    rng: Pcg32,
}

impl Asteroids {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let rocks = (0..START_ROCKS)
            .map(|_| {
                let pos = Vec2::new(
                    rng.random::<f32>() * WIDTH,
                    rng.random::<f32>() * HEIGHT,
                );
                let vel = from_angle(rng.random::<f32>() * TAU) * ROCK_SPEED;
                Rock { pos, vel, size: 3 }
            })
            .collect();

        Self {
            ship: Ship::spawn(),
            bullets: Vec::new(),
            rocks,
            score: 0,
            lives: 3,
            invulnerable: 0,
            status: GameStatus::Running,
            rng,
        }
    }

    fn fire(&mut self) {
        self.bullets.push(Bullet {
            pos: self.ship.nose(),
            vel: from_angle(self.ship.angle) * BULLET_SPEED,
            life: BULLET_LIFE,
        });
    }

    fn fly(&mut self, input: &TickInput) {
        self.ship.angle += input.held.axis_x() * TURN_RATE;
        if input.held.up {
            self.ship.vel += from_angle(self.ship.angle) * THRUST;
        }
        self.ship.vel *= DRAG;
        self.ship.pos = wrap_point(self.ship.pos + self.ship.vel, FIELD);
    }

    /// Resolve bullet hits; returns the points scored
    fn shoot_rocks(&mut self, events: &mut Vec<GameEvent>) {
        let mut survivors = Vec::with_capacity(self.rocks.len() + 2);
        for rock in std::mem::take(&mut self.rocks) {
            let mut hit = false;
            for bullet in &mut self.bullets {
                if bullet.life > 0 && within(rock.pos, bullet.pos, rock.radius()) {
                    bullet.life = 0;
                    hit = true;
                }
            }
            if !hit {
                survivors.push(rock);
                continue;
            }

            let points = rock.points();
            self.score += points;
            events.push(GameEvent::Scored(points));
            if rock.size > 1 {
                for _ in 0..2 {
                    let heading = self.rng.random::<f32>() * TAU;
                    survivors.push(Rock {
                        pos: rock.pos,
                        vel: from_angle(heading) * ROCK_SPEED,
                        size: rock.size - 1,
                    });
                }
            }
        }
        self.rocks = survivors;
        self.bullets.retain(|b| b.life > 0);
    }
}

impl ArcadeGame for Asteroids {
    fn kind(&self) -> GameKind {
        GameKind::Asteroids
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        if input.was_pressed(Key::Action) {
            self.fire();
        }
        self.fly(input);

        for bullet in &mut self.bullets {
            bullet.pos += bullet.vel;
            bullet.life = bullet.life.saturating_sub(1);
        }
        self.bullets.retain(|b| b.life > 0);

        for rock in &mut self.rocks {
            rock.pos = wrap_point(rock.pos + rock.vel, FIELD);
        }

        self.invulnerable = self.invulnerable.saturating_sub(1);
        if self.invulnerable == 0
            && self
                .rocks
                .iter()
                .any(|r| within(r.pos, self.ship.pos, r.radius() + SHIP_SIZE))
        {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
                return events;
            }
            self.ship = Ship::spawn();
            self.invulnerable = ms_to_ticks(INVULNERABLE_MS);
        }

        self.shoot_rocks(&mut events);
        if self.rocks.is_empty() {
            self.status = GameStatus::Over { won: true };
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

        let ship_color = if self.invulnerable > 0 {
            palette::oklch(0.7, 0.2, 60.0)
        } else {
            palette::oklch(0.646, 0.222, 41.116)
        };
        let s = &self.ship;
        let hull = [
            s.nose(),
            s.pos + from_angle(s.angle + 2.5) * SHIP_SIZE,
            s.pos + from_angle(s.angle + PI) * SHIP_SIZE * 0.5,
            s.pos + from_angle(s.angle - 2.5) * SHIP_SIZE,
        ];
        frame.outline(&hull, 2.0, ship_color);

        for bullet in &self.bullets {
            frame.circle(bullet.pos, 3.0, palette::oklch(0.9, 0.2, 60.0));
        }

        let rock_color = palette::oklch(0.6, 0.15, 280.0);
        for rock in &self.rocks {
            let outline: Vec<Vec2> = (0..8)
                .map(|i| rock.pos + from_angle(i as f32 / 8.0 * TAU) * rock.radius())
                .collect();
            frame.outline(&outline, 2.0, rock_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(seed: u64) -> Asteroids {
        let mut game = Asteroids::new(seed);
        game.rocks.clear();
        game
    }

    #[test]
    fn test_start_field() {
        let game = Asteroids::new(42);
        assert_eq!(game.rocks.len(), START_ROCKS);
        assert!(game.rocks.iter().all(|r| r.size == 3));
        assert!(game.rocks.iter().all(|r| (r.vel.length() - ROCK_SPEED).abs() < 1e-4));
    }

    #[test]
    fn test_rock_points() {
        let rock = |size| Rock { pos: Vec2::ZERO, vel: Vec2::ZERO, size };
        assert_eq!(rock(3).points(), 100);
        assert_eq!(rock(2).points(), 200);
        assert_eq!(rock(1).points(), 300);
    }

    #[test]
    fn test_ship_wraps() {
        let mut game = quiet(1);
        game.rocks.push(Rock { pos: Vec2::new(100.0, 100.0), vel: Vec2::ZERO, size: 1 });
        game.ship.pos = Vec2::new(WIDTH - 0.5, 250.0);
        game.ship.vel = Vec2::new(2.0, 0.0);
        game.tick(&TickInput::default());
        assert!(game.ship.pos.x < 5.0);
    }

    #[test]
    fn test_shot_splits_rock() {
        let mut game = quiet(3);
        game.rocks.push(Rock { pos: Vec2::new(400.0, 250.0), vel: Vec2::ZERO, size: 3 });
        game.bullets.push(Bullet {
            pos: Vec2::new(380.0, 250.0),
            vel: Vec2::new(BULLET_SPEED, 0.0),
            life: 10,
        });
        let events = game.tick(&TickInput::default());
        assert_eq!(game.score, 100);
        assert!(events.contains(&GameEvent::Scored(100)));
        assert_eq!(game.rocks.len(), 2);
        assert!(game.rocks.iter().all(|r| r.size == 2));
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn test_smallest_rock_vanishes_and_clearing_wins() {
        let mut game = quiet(3);
        game.rocks.push(Rock { pos: Vec2::new(400.0, 250.0), vel: Vec2::ZERO, size: 1 });
        game.bullets.push(Bullet { pos: Vec2::new(400.0, 250.0), vel: Vec2::ZERO, life: 5 });
        game.tick(&TickInput::default());
        assert!(game.rocks.is_empty());
        assert_eq!(game.status, GameStatus::Over { won: true });
    }

    #[test]
    fn test_collision_grants_invulnerability() {
        let mut game = quiet(9);
        game.rocks.push(Rock { pos: SHIP_START + Vec2::new(20.0, 0.0), vel: Vec2::ZERO, size: 1 });
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(game.lives, 2);
        assert_eq!(game.invulnerable, 120);

        // Still overlapping, but protected
        game.tick(&TickInput::default());
        assert_eq!(game.lives, 2);
    }

    #[test]
    fn test_fire_spawns_bullet_at_nose() {
        let mut game = quiet(1);
        game.rocks.push(Rock { pos: Vec2::new(50.0, 50.0), vel: Vec2::ZERO, size: 1 });
        let mut input = TickInput::default();
        input.key_down(Key::Action);
        game.tick(&input);
        assert_eq!(game.bullets.len(), 1);
        assert_eq!(game.bullets[0].life, BULLET_LIFE - 1);
    }
}
