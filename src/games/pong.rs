//! Pong against a lagging computer paddle; first to ten points wins

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, TickInput, seeded_rng,
};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 400.0;
pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
pub const BALL_SIZE: f32 = 10.0;
pub const PADDLE_SPEED: f32 = 6.0;
pub const BALL_SPEED: f32 = 4.0;
/// Computer paddle speed as a fraction of the player's
pub const AI_SPEED_FACTOR: f32 = 0.7;
pub const AI_DEADZONE: f32 = 20.0;
pub const WINNING_SCORE: u64 = 10;

pub struct Pong {
    pub player_y: f32,
    pub ai_y: f32,
    /// Ball top-left corner
    pub ball: Vec2,
    pub velocity: Vec2,
    pub player_score: u64,
    pub ai_score: u64,
    pub status: GameStatus,
    rng: Pcg32,
}

impl Pong {
    pub fn new(seed: u64) -> Self {
        let center = HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0;
        Self {
            player_y: center,
            ai_y: center,
            ball: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            velocity: Vec2::new(BALL_SPEED, BALL_SPEED),
            player_score: 0,
            ai_score: 0,
            status: GameStatus::Running,
            rng: seeded_rng(seed),
        }
    }

    fn serve(&mut self) {
        self.ball = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.velocity = Vec2::new(
            BALL_SPEED * direction,
            (self.rng.random::<f32>() - 0.5) * BALL_SPEED,
        );
    }

    fn move_ai(&mut self) {
        let center = self.ai_y + PADDLE_HEIGHT / 2.0;
        let step = PADDLE_SPEED * AI_SPEED_FACTOR;
        if center < self.ball.y - AI_DEADZONE {
            self.ai_y = (self.ai_y + step).min(HEIGHT - PADDLE_HEIGHT);
        } else if center > self.ball.y + AI_DEADZONE {
            self.ai_y = (self.ai_y - step).max(0.0);
        }
    }

    /// Paddle deflection: faster and angled by where the ball struck
    fn deflect(&mut self, paddle_y: f32, toward: f32) {
        let hit = (self.ball.y - paddle_y) / PADDLE_HEIGHT - 0.5;
        self.velocity.x = self.velocity.x.abs() * 1.05 * toward;
        self.velocity.y += hit * 3.0;
    }
}

impl ArcadeGame for Pong {
    fn kind(&self) -> GameKind {
        GameKind::Pong
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn controls(&self) -> ControlScheme {
        ControlScheme {
            pause_key: Key::Action,
            hint: "Up/Down to move, Space to pause",
        }
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        if input.held.up {
            self.player_y = (self.player_y - PADDLE_SPEED).max(0.0);
        }
        if input.held.down {
            self.player_y = (self.player_y + PADDLE_SPEED).min(HEIGHT - PADDLE_HEIGHT);
        }
        self.move_ai();

        self.ball += self.velocity;
        if self.ball.y <= 0.0 || self.ball.y >= HEIGHT - BALL_SIZE {
            self.velocity.y = -self.velocity.y;
            self.ball.y = self.ball.y.clamp(0.0, HEIGHT - BALL_SIZE);
        }

        let in_range = |y: f32, paddle: f32| y >= paddle && y <= paddle + PADDLE_HEIGHT;

        if self.ball.x <= PADDLE_WIDTH {
            if in_range(self.ball.y, self.player_y) {
                self.deflect(self.player_y, 1.0);
                self.ball.x = PADDLE_WIDTH;
            } else if self.ball.x <= 0.0 {
                self.ai_score += 1;
                events.push(GameEvent::LifeLost);
                self.serve();
            }
        } else if self.ball.x >= WIDTH - PADDLE_WIDTH - BALL_SIZE {
            if in_range(self.ball.y, self.ai_y) {
                self.deflect(self.ai_y, -1.0);
                self.ball.x = WIDTH - PADDLE_WIDTH - BALL_SIZE;
            } else if self.ball.x >= WIDTH {
                self.player_score += 1;
                events.push(GameEvent::Scored(1));
                if self.player_score >= WINNING_SCORE {
                    self.status = GameStatus::Over { won: true };
                } else {
                    self.serve();
                }
            }
        }

        if self.ai_score >= WINNING_SCORE {
            self.status = GameStatus::Over { won: false };
        }
        events
    }

    fn score(&self) -> u64 {
        self.player_score
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn hud(&self) -> Vec<HudStat> {
        vec![HudStat::new("Computer", self.ai_score)]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.145, 0.0, 0.0));

        // Dashed centre line
        let mut y = 0.0;
        while y < HEIGHT {
            frame.rect(WIDTH / 2.0 - 1.0, y, 2.0, 10.0, palette::oklch(0.269, 0.0, 0.0));
            y += 20.0;
        }

        let paddle = palette::oklch(0.985, 0.0, 0.0);
        frame.rect(0.0, self.player_y, PADDLE_WIDTH, PADDLE_HEIGHT, paddle);
        frame.rect(WIDTH - PADDLE_WIDTH, self.ai_y, PADDLE_WIDTH, PADDLE_HEIGHT, paddle);
        frame.rect(
            self.ball.x,
            self.ball.y,
            BALL_SIZE,
            BALL_SIZE,
            palette::oklch(0.6, 0.118, 184.704),
        );

        frame.number(Vec2::new(WIDTH / 4.0, 40.0), self.player_score, 5.0, paddle);
        frame.number(Vec2::new(WIDTH * 3.0 / 4.0, 40.0), self.ai_score, 5.0, paddle);
    }
}
