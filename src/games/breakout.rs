//! Breakout

use glam::Vec2;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, Rect, TickInput, aabb_overlap,
};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 500.0;
pub const PADDLE_WIDTH: f32 = 100.0;
pub const PADDLE_HEIGHT: f32 = 15.0;
pub const PADDLE_SPEED: f32 = 7.0;
pub const BALL_RADIUS: f32 = 8.0;
pub const BRICK_ROWS: usize = 6;
pub const BRICK_COLS: usize = 10;
pub const BRICK_WIDTH: f32 = 55.0;
pub const BRICK_HEIGHT: f32 = 20.0;
pub const BRICK_POINTS: u64 = 50;
pub const START_LIVES: u32 = 3;

const BALL_START: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 60.0);
const BALL_START_VELOCITY: Vec2 = Vec2::new(4.0, -4.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub row: usize,
    pub alive: bool,
}

pub struct Breakout {
    pub paddle_x: f32,
    pub ball: Vec2,
    pub velocity: Vec2,
    pub bricks: Vec<Brick>,
    pub score: u64,
    pub lives: u32,
    pub status: GameStatus,
}

impl Breakout {
    pub fn new(_seed: u64) -> Self {
        let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                bricks.push(Brick {
                    rect: Rect::new(
                        col as f32 * (BRICK_WIDTH + 5.0) + 20.0,
                        row as f32 * (BRICK_HEIGHT + 5.0) + 50.0,
                        BRICK_WIDTH,
                        BRICK_HEIGHT,
                    ),
                    row,
                    alive: true,
                });
            }
        }

        Self {
            paddle_x: WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            ball: BALL_START,
            velocity: BALL_START_VELOCITY,
            bricks,
            score: 0,
            lives: START_LIVES,
            status: GameStatus::Running,
        }
    }

    pub fn paddle_rect(&self) -> Rect {
        Rect::new(self.paddle_x, HEIGHT - 40.0, PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    fn ball_rect(&self) -> Rect {
        Rect::from_center(self.ball, Vec2::splat(BALL_RADIUS * 2.0))
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }
}

fn row_color(row: usize) -> palette::Color {
    match row {
        0 => palette::oklch(0.7, 0.25, 0.0),
        1 => palette::oklch(0.7, 0.2, 30.0),
        2 => palette::oklch(0.7, 0.2, 60.0),
        3 => palette::oklch(0.6, 0.25, 120.0),
        4 => palette::oklch(0.6, 0.2, 200.0),
        _ => palette::oklch(0.6, 0.2, 280.0),
    }
}

impl ArcadeGame for Breakout {
    fn kind(&self) -> GameKind {
        GameKind::Breakout
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn controls(&self) -> ControlScheme {
        ControlScheme {
            pause_key: Key::Action,
            hint: "Left/Right to move, Space to launch or pause",
        }
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        self.paddle_x =
            (self.paddle_x + input.held.axis_x() * PADDLE_SPEED).clamp(0.0, WIDTH - PADDLE_WIDTH);

        self.ball += self.velocity;
        if self.ball.x - BALL_RADIUS <= 0.0 || self.ball.x + BALL_RADIUS >= WIDTH {
            self.velocity.x = -self.velocity.x;
        }
        if self.ball.y - BALL_RADIUS <= 0.0 {
            self.velocity.y = -self.velocity.y;
        }

        let paddle = self.paddle_rect();
        let ball_box = self.ball_rect();
        if aabb_overlap(&ball_box, &paddle)
            && self.ball.x >= paddle.pos.x
            && self.ball.x <= paddle.max().x
        {
            self.velocity.y = -self.velocity.y.abs();
            let hit = (self.ball.x - paddle.pos.x) / PADDLE_WIDTH;
            self.velocity.x = (hit - 0.5) * 10.0;
        }

        if self.ball.y - BALL_RADIUS > HEIGHT {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
            } else {
                self.ball = BALL_START;
                self.velocity = BALL_START_VELOCITY;
                events.push(GameEvent::Pause);
            }
            return events;
        }

        let mut hit = false;
        for brick in self.bricks.iter_mut().filter(|b| b.alive) {
            if aabb_overlap(&ball_box, &brick.rect) {
                brick.alive = false;
                hit = true;
                self.score += BRICK_POINTS;
                events.push(GameEvent::Scored(BRICK_POINTS));
            }
        }
        if hit {
            self.velocity.y = -self.velocity.y;
        }

        if self.bricks_left() == 0 {
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

        for brick in self.bricks.iter().filter(|b| b.alive) {
            let r = brick.rect;
            frame.rect(r.pos.x, r.pos.y, r.size.x, r.size.y, row_color(brick.row));
        }

        let paddle = self.paddle_rect();
        frame.rect(
            paddle.pos.x,
            paddle.pos.y,
            paddle.size.x,
            paddle.size.y,
            palette::oklch(0.6, 0.118, 184.704),
        );
        frame.circle(self.ball, BALL_RADIUS, palette::oklch(0.985, 0.0, 0.0));
    }
}
