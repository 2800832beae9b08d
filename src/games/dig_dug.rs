//! Dig Dug
//!
//! Positions are top-left corners in pixels; tunnels are tracked per cell.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, TickInput, seeded_rng};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 600.0;
pub const CELL_SIZE: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 3.0;
pub const ENEMIES: usize = 4;
pub const ENEMY_STEP_CHANCE: f64 = 0.02;
/// Pump reach, in cells
pub const PUMP_RANGE: f32 = 2.0;
pub const TUNNEL_POINTS: u64 = 10;
pub const ENEMY_POINTS: u64 = 100;
pub const CLEAR_BONUS: u64 = 500;

const PLAYER_START: Vec2 = Vec2::new(CELL_SIZE, CELL_SIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Pooka,
    Fygar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub alive: bool,
}

/// Closer than `cells` on both axes
fn near(a: Vec2, b: Vec2, cells: f32) -> bool {
    let d = (a - b).abs();
    d.x < CELL_SIZE * cells && d.y < CELL_SIZE * cells
}

fn cell_of(pos: Vec2) -> (i32, i32) {
    ((pos.x / CELL_SIZE).floor() as i32, (pos.y / CELL_SIZE).floor() as i32)
}

pub struct DigDug {
    pub player: Vec2,
    pub enemies: Vec<Enemy>,
    /// Dug cells as (col, row)
    pub tunnels: HashSet<(i32, i32)>,
    pub score: u64,
    pub lives: u32,
    pub status: GameStatus,
    rng: Pcg32,
}

impl DigDug {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            player: PLAYER_START,
            enemies: Vec::new(),
            tunnels: HashSet::from([cell_of(PLAYER_START)]),
            score: 0,
            lives: 3,
            status: GameStatus::Running,
            rng: seeded_rng(seed),
        };
        game.spawn_enemies();
        game
    }

    fn spawn_enemies(&mut self) {
        let cols = (WIDTH / CELL_SIZE) as u32;
        self.enemies = (0..ENEMIES)
            .map(|i| Enemy {
                pos: Vec2::new(
                    self.rng.random_range(0..cols) as f32 * CELL_SIZE,
                    self.rng.random_range(5..15) as f32 * CELL_SIZE,
                ),
                kind: if i % 2 == 0 { EnemyKind::Pooka } else { EnemyKind::Fygar },
                alive: true,
            })
            .collect();
    }

    /// Dig the cell under the player, scoring fresh ground
    fn dig(&mut self, events: &mut Vec<GameEvent>) {
        if self.tunnels.insert(cell_of(self.player)) {
            self.score += TUNNEL_POINTS;
            events.push(GameEvent::Scored(TUNNEL_POINTS));
        }
    }

    fn chase(&mut self) {
        let target = self.player;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            if !self.rng.random_bool(ENEMY_STEP_CHANCE) {
                continue;
            }
            let d = target - enemy.pos;
            if d.x.abs() > d.y.abs() {
                enemy.pos.x += PLAYER_SPEED.copysign(d.x);
            } else {
                enemy.pos.y += PLAYER_SPEED.copysign(d.y);
            }
            enemy.pos = enemy
                .pos
                .clamp(Vec2::ZERO, Vec2::new(WIDTH - CELL_SIZE, HEIGHT - CELL_SIZE));
        }
    }

    fn pump(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.player;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            if near(player, enemy.pos, PUMP_RANGE) {
                enemy.alive = false;
                self.score += ENEMY_POINTS;
                events.push(GameEvent::Scored(ENEMY_POINTS));
            }
        }
    }
}

impl ArcadeGame for DigDug {
    fn kind(&self) -> GameKind {
        GameKind::DigDug
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        let step = Vec2::new(input.held.axis_x(), input.held.axis_y()) * PLAYER_SPEED;
        if step != Vec2::ZERO {
            self.player = (self.player + step)
                .clamp(Vec2::ZERO, Vec2::new(WIDTH - CELL_SIZE, HEIGHT - CELL_SIZE));
            self.dig(&mut events);
        }

        self.chase();

        if self.enemies.iter().any(|e| e.alive && near(self.player, e.pos, 1.0)) {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
                return events;
            }
            self.player = PLAYER_START;
        }

        if input.held.action {
            self.pump(&mut events);
        }

        if self.enemies.iter().all(|e| !e.alive) {
            self.score += CLEAR_BONUS;
            events.push(GameEvent::Scored(CLEAR_BONUS));
            self.spawn_enemies();
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
        frame.background(palette::oklch(0.35, 0.08, 60.0));

        let tunnel = palette::oklch(0.15, 0.02, 264.0);
        for &(col, row) in &self.tunnels {
            frame.rect(
                col as f32 * CELL_SIZE,
                row as f32 * CELL_SIZE,
                CELL_SIZE,
                CELL_SIZE,
                tunnel,
            );
        }

        let eye = palette::oklch(0.95, 0.05, 85.0);
        for e in self.enemies.iter().filter(|e| e.alive) {
            let hue = match e.kind {
                EnemyKind::Pooka => 0.0,
                EnemyKind::Fygar => 140.0,
            };
            frame.circle(
                e.pos + Vec2::splat(CELL_SIZE / 2.0),
                CELL_SIZE / 2.0 - 2.0,
                palette::oklch(0.75, 0.25, hue),
            );
            frame.circle(e.pos + Vec2::new(CELL_SIZE / 3.0, CELL_SIZE / 3.0), 4.0, eye);
            frame.circle(e.pos + Vec2::new(CELL_SIZE * 2.0 / 3.0, CELL_SIZE / 3.0), 4.0, eye);
        }

        let p = self.player;
        frame.rect(
            p.x + CELL_SIZE / 4.0,
            p.y + CELL_SIZE / 4.0,
            CELL_SIZE / 2.0,
            CELL_SIZE / 2.0,
            palette::oklch(0.75, 0.25, 180.0),
        );
        frame.circle(
            p + Vec2::splat(CELL_SIZE / 2.0),
            CELL_SIZE / 3.0,
            palette::oklch(0.85, 0.25, 180.0),
        );
    }
}
