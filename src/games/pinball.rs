//! Pinball
//!
//! Flipper physics are deliberately arcade: an actuated flipper within
//! reach kicks the ball straight up rather than modelling a swept segment.

use glam::Vec2;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, TickInput, circle_circle};

pub const WIDTH: f32 = 400.0;
pub const HEIGHT: f32 = 700.0;
pub const WALL: f32 = 10.0;
pub const BALL_RADIUS: f32 = 8.0;
pub const GRAVITY: f32 = 0.3;
pub const FRICTION: f32 = 0.99;
pub const WALL_BOUNCE: f32 = -0.9;
pub const BUMPER_KICK: f32 = 8.0;
pub const FLIPPER_LENGTH: f32 = 80.0;
pub const FLIPPER_KICK: f32 = -12.0;
pub const FLIPPER_STEP: f32 = 10.0;
pub const FLIPPER_MAX: f32 = 30.0;
pub const BUMPER_POINTS: u64 = 10;
pub const FLIPPER_POINTS: u64 = 5;
pub const START_BALLS: u32 = 3;

const BALL_START: Vec2 = Vec2::new(200.0, 100.0);
const BALL_START_VELOCITY: Vec2 = Vec2::new(2.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bumper {
    pub pos: Vec2,
    pub radius: f32,
}

pub const BUMPERS: [Bumper; 5] = [
    Bumper { pos: Vec2::new(150.0, 200.0), radius: 25.0 },
    Bumper { pos: Vec2::new(250.0, 200.0), radius: 25.0 },
    Bumper { pos: Vec2::new(200.0, 280.0), radius: 25.0 },
    Bumper { pos: Vec2::new(120.0, 350.0), radius: 20.0 },
    Bumper { pos: Vec2::new(280.0, 350.0), radius: 20.0 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flipper {
    /// Pivot
    pub pos: Vec2,
    /// Degrees, clockwise on screen
    pub angle: f32,
    pub active: bool,
    /// +1 for the left flipper (extends right), -1 for the right one
    pub side: f32,
}

impl Flipper {
    fn new(x: f32, side: f32) -> Self {
        Self {
            pos: Vec2::new(x, 620.0),
            angle: -FLIPPER_MAX * side,
            active: false,
            side,
        }
    }

    /// Swing up while held, fall back when released
    fn actuate(&mut self, held: bool) {
        self.active = held;
        let step = if held { FLIPPER_STEP } else { -FLIPPER_STEP };
        self.angle = (self.angle + step * self.side).clamp(-FLIPPER_MAX, FLIPPER_MAX);
    }

    fn reaches(&self, ball: Vec2) -> bool {
        let d = ball - self.pos;
        self.active && d.length() < FLIPPER_LENGTH && d.y.abs() < 20.0
    }
}

pub struct Pinball {
    pub ball: Vec2,
    pub velocity: Vec2,
    pub left: Flipper,
    pub right: Flipper,
    pub score: u64,
    pub balls: u32,
    pub status: GameStatus,
}

impl Pinball {
    pub fn new(_seed: u64) -> Self {
        Self {
            ball: BALL_START,
            velocity: BALL_START_VELOCITY,
            left: Flipper::new(120.0, 1.0),
            right: Flipper::new(280.0, -1.0),
            score: 0,
            balls: START_BALLS,
            status: GameStatus::Running,
        }
    }

    fn bounce_walls(&mut self) {
        if self.ball.x - BALL_RADIUS < WALL || self.ball.x + BALL_RADIUS > WIDTH - WALL {
            self.velocity.x *= WALL_BOUNCE;
            self.ball.x = if self.ball.x < WIDTH / 2.0 {
                WALL + BALL_RADIUS
            } else {
                WIDTH - WALL - BALL_RADIUS
            };
        }
        if self.ball.y - BALL_RADIUS < WALL {
            self.velocity.y *= WALL_BOUNCE;
            self.ball.y = WALL + BALL_RADIUS;
        }
    }

    fn score_points(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        self.score += points;
        events.push(GameEvent::Scored(points));
    }
}

impl ArcadeGame for Pinball {
    fn kind(&self) -> GameKind {
        GameKind::Pinball
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        self.velocity.y += GRAVITY;
        self.ball += self.velocity;
        self.bounce_walls();

        if self.ball.y > HEIGHT - WALL {
            self.balls = self.balls.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.balls == 0 {
                self.status = GameStatus::Over { won: false };
                return events;
            }
            self.ball = BALL_START;
            self.velocity = BALL_START_VELOCITY;
        }

        for bumper in &BUMPERS {
            let hit = circle_circle(self.ball, BALL_RADIUS, bumper.pos, bumper.radius);
            if hit.hit {
                self.velocity = hit.normal * BUMPER_KICK;
                self.ball += hit.normal * hit.penetration;
                self.score_points(BUMPER_POINTS, &mut events);
            }
        }

        self.left.actuate(input.held.left);
        self.right.actuate(input.held.right);
        for flipper in [self.left, self.right] {
            if flipper.reaches(self.ball) {
                self.velocity.y = FLIPPER_KICK;
                self.velocity.x += (self.ball.x - flipper.pos.x) * 0.1;
                self.score_points(FLIPPER_POINTS, &mut events);
            }
        }

        self.velocity *= FRICTION;
        events
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn hud(&self) -> Vec<HudStat> {
        vec![HudStat::new("Balls", self.balls)]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.15, 0.02, 264.0));
        frame.rect_outline(
            WALL,
            WALL,
            WIDTH - 2.0 * WALL,
            HEIGHT - 2.0 * WALL,
            4.0,
            palette::oklch(0.75, 0.15, 180.0),
        );

        for b in &BUMPERS {
            frame.circle(b.pos, b.radius, palette::oklch(0.75, 0.25, 0.0));
            frame.ring(b.pos, b.radius, 3.0, palette::oklch(0.85, 0.25, 60.0));
        }

        for f in [&self.left, &self.right] {
            let dir = Vec2::from_angle(f.angle.to_radians()) * f.side;
            let center = f.pos + dir * FLIPPER_LENGTH / 2.0;
            frame.rotated_rect(
                center,
                Vec2::new(FLIPPER_LENGTH, 16.0),
                f.angle.to_radians(),
                palette::oklch(0.75, 0.25, 140.0),
            );
        }

        frame.circle(self.ball, BALL_RADIUS, palette::oklch(0.85, 0.25, 85.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipper_swing_limits() {
        let mut f = Flipper::new(120.0, 1.0);
        assert_eq!(f.angle, -30.0);
        for _ in 0..10 {
            f.actuate(true);
        }
        assert_eq!(f.angle, 30.0);
        f.actuate(false);
        assert_eq!(f.angle, 20.0);

        let mut r = Flipper::new(280.0, -1.0);
        assert_eq!(r.angle, 30.0);
        r.actuate(true);
        assert_eq!(r.angle, 20.0);
    }

    #[test]
    fn test_bumper_kicks_ball_away() {
        let mut game = Pinball::new(0);
        game.ball = Vec2::new(150.0, 200.0 - 30.0);
        game.velocity = Vec2::new(0.0, 2.0);
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::Scored(BUMPER_POINTS)));
        // Kicked upward, away from the bumper centre
        assert!(game.velocity.y < -7.0);
        assert_eq!(game.score, BUMPER_POINTS);
    }

    #[test]
    fn test_active_flipper_launches() {
        let mut game = Pinball::new(0);
        game.ball = Vec2::new(150.0, 610.0);
        game.velocity = Vec2::ZERO;
        let mut input = TickInput::default();
        input.held.left = true;
        let events = game.tick(&input);
        assert!(events.contains(&GameEvent::Scored(FLIPPER_POINTS)));
        assert!(game.velocity.y < -11.0);
        assert!(game.velocity.x > 2.0);
    }

    #[test]
    fn test_idle_flipper_does_nothing() {
        let mut game = Pinball::new(0);
        game.ball = Vec2::new(150.0, 610.0);
        game.velocity = Vec2::ZERO;
        game.tick(&TickInput::default());
        assert!(game.velocity.y > 0.0);
    }

    #[test]
    fn test_drain_costs_ball() {
        let mut game = Pinball::new(0);
        game.ball = Vec2::new(200.0, HEIGHT - 5.0);
        game.velocity = Vec2::new(0.0, 3.0);
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(game.balls, 2);
        assert_eq!(game.ball.y, BALL_START.y);
    }

    #[test]
    fn test_side_walls_bounce() {
        let mut game = Pinball::new(0);
        game.ball = Vec2::new(WIDTH - 20.0, 400.0);
        game.velocity = Vec2::new(5.0, 0.0);
        game.tick(&TickInput::default());
        assert!(game.velocity.x < 0.0);
        assert_eq!(game.ball.x, WIDTH - WALL - BALL_RADIUS);
    }
}
