//! Rolling Balls
//!
//! Steer a ball across tilted and moving platforms, collecting checkpoints.
//! Survival time scores too; the run ends when the ball drops off the world.

use glam::Vec2;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, TickInput, circle_rotated_rect,
    within,
};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const BALL_RADIUS: f32 = 15.0;
pub const GRAVITY: f32 = 0.5;
pub const FRICTION: f32 = 0.98;
pub const ACCELERATION: f32 = 0.8;
pub const MAX_VELOCITY: f32 = 12.0;
pub const CHECKPOINT_RADIUS: f32 = 25.0;
pub const CHECKPOINT_POINTS: u64 = 100;
/// Below this the ball is considered lost
pub const FALL_LIMIT: f32 = HEIGHT + 100.0;
pub const SURVIVAL_MS: f32 = 100.0;

const BALL_START: Vec2 = Vec2::new(100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    /// Centre of the slab
    pub center: Vec2,
    pub size: Vec2,
    /// Tilt in degrees, clockwise on screen
    pub angle: f32,
}

impl Platform {
    const fn fixed(x: f32, y: f32, width: f32, angle: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            size: Vec2::new(width, 20.0),
            angle,
        }
    }

    fn radians(&self) -> f32 {
        self.angle.to_radians()
    }
}

/// A level platform sliding back and forth between two x positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingPlatform {
    pub platform: Platform,
    pub start_x: f32,
    pub end_x: f32,
    pub speed: f32,
    pub direction: f32,
}

impl MovingPlatform {
    fn advance(&mut self) {
        self.platform.center.x += self.speed * self.direction;
        let x = self.platform.center.x;
        if x >= self.end_x || x <= self.start_x {
            self.direction = -self.direction;
        }
    }

    pub fn velocity(&self) -> f32 {
        self.speed * self.direction
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub pos: Vec2,
    pub collected: bool,
}

pub const PLATFORMS: [Platform; 7] = [
    Platform::fixed(50.0, 150.0, 150.0, 0.0),
    Platform::fixed(250.0, 200.0, 120.0, -15.0),
    Platform::fixed(400.0, 250.0, 100.0, 10.0),
    Platform::fixed(550.0, 300.0, 150.0, -5.0),
    Platform::fixed(100.0, 350.0, 120.0, 20.0),
    Platform::fixed(300.0, 420.0, 180.0, 0.0),
    Platform::fixed(550.0, 480.0, 140.0, -10.0),
];

const CHECKPOINTS: [Vec2; 6] = [
    Vec2::new(300.0, 170.0),
    Vec2::new(450.0, 220.0),
    Vec2::new(625.0, 270.0),
    Vec2::new(180.0, 320.0),
    Vec2::new(390.0, 390.0),
    Vec2::new(620.0, 450.0),
];

pub struct RollingBalls {
    pub ball: Vec2,
    pub velocity: Vec2,
    pub movers: [MovingPlatform; 2],
    pub checkpoints: Vec<Checkpoint>,
    pub score: u64,
    pub status: GameStatus,
    survival_timer: u32,
}

impl RollingBalls {
    pub fn new(_seed: u64) -> Self {
        Self {
            ball: BALL_START,
            velocity: Vec2::ZERO,
            movers: [
                MovingPlatform {
                    platform: Platform::fixed(200.0, 380.0, 100.0, 0.0),
                    start_x: 200.0,
                    end_x: 400.0,
                    speed: 2.0,
                    direction: 1.0,
                },
                MovingPlatform {
                    platform: Platform::fixed(450.0, 180.0, 80.0, 0.0),
                    start_x: 350.0,
                    end_x: 550.0,
                    speed: 1.5,
                    direction: 1.0,
                },
            ],
            checkpoints: CHECKPOINTS
                .iter()
                .map(|&pos| Checkpoint { pos, collected: false })
                .collect(),
            score: 0,
            status: GameStatus::Running,
            survival_timer: 0,
        }
    }

    pub fn collected(&self) -> usize {
        self.checkpoints.iter().filter(|c| c.collected).count()
    }

    /// Land the ball on anything it is falling onto
    fn land(&mut self) {
        let movers = self.movers.iter().map(|m| (m.platform, m.velocity()));
        let fixed = PLATFORMS.iter().map(|p| (*p, 0.0));
        for (platform, carry) in fixed.chain(movers) {
            let hit = circle_rotated_rect(
                self.ball,
                BALL_RADIUS,
                platform.center,
                platform.size * 0.5,
                platform.radians(),
            );
            if hit.hit && self.velocity.y > 0.0 {
                self.ball.y = platform.center.y - BALL_RADIUS - platform.size.y / 2.0;
                self.velocity.y = 0.0;
                self.velocity.x += carry * 0.5 + platform.radians().sin() * 0.5;
            }
        }
    }
}

impl ArcadeGame for RollingBalls {
    fn kind(&self) -> GameKind {
        GameKind::RollingBalls
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn controls(&self) -> ControlScheme {
        ControlScheme {
            pause_key: Key::Action,
            hint: "Left/Right to roll, Space to pause",
        }
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        if input.held.left {
            self.velocity.x = (self.velocity.x - ACCELERATION).max(-MAX_VELOCITY);
        }
        if input.held.right {
            self.velocity.x = (self.velocity.x + ACCELERATION).min(MAX_VELOCITY);
        }
        self.velocity.y += GRAVITY;
        self.velocity.x *= FRICTION;
        self.ball += self.velocity;

        for mover in &mut self.movers {
            mover.advance();
        }
        self.land();

        for checkpoint in self.checkpoints.iter_mut().filter(|c| !c.collected) {
            if within(self.ball, checkpoint.pos, BALL_RADIUS + CHECKPOINT_RADIUS) {
                checkpoint.collected = true;
                self.score += CHECKPOINT_POINTS;
                events.push(GameEvent::Scored(CHECKPOINT_POINTS));
                events.push(GameEvent::Notice("Checkpoint collected! +100 points".into()));
            }
        }

        if self.ball.y > FALL_LIMIT {
            self.status = GameStatus::Over { won: false };
            return events;
        }

        self.survival_timer += 1;
        if self.survival_timer >= ms_to_ticks(SURVIVAL_MS) {
            self.survival_timer = 0;
            self.score += 1;
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
        vec![HudStat::new(
            "Checkpoints",
            format!("{}/{}", self.collected(), self.checkpoints.len()),
        )]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.145, 0.0, 0.0));

        let edge = palette::oklch(0.8, 0.1, 184.704);
        let slab = |frame: &mut Frame, p: &Platform, color| {
            frame.rotated_rect(p.center, p.size + Vec2::splat(2.0), p.radians(), edge);
            frame.rotated_rect(p.center, p.size - Vec2::splat(2.0), p.radians(), color);
        };
        for p in &PLATFORMS {
            slab(frame, p, palette::oklch(0.6, 0.118, 184.704));
        }
        for m in &self.movers {
            slab(frame, &m.platform, palette::oklch(0.704, 0.191, 22.216));
        }

        for c in self.checkpoints.iter().filter(|c| !c.collected) {
            frame.circle(c.pos, CHECKPOINT_RADIUS, palette::oklch(0.704, 0.191, 22.216));
            frame.ring(c.pos, CHECKPOINT_RADIUS, 3.0, palette::oklch(0.8, 0.2, 22.216));
            frame.circle(c.pos, 6.0, palette::oklch(0.9, 0.1, 60.0));
        }

        frame.circle(self.ball, BALL_RADIUS, palette::oklch(0.828, 0.189, 84.429));
        frame.ring(self.ball, BALL_RADIUS, 2.0, palette::oklch(0.9, 0.15, 84.429));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_settles_on_start_platform() {
        let mut game = RollingBalls::new(0);
        for _ in 0..60 {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.ball.y, 150.0 - BALL_RADIUS - 10.0);
        assert_eq!(game.velocity.y, 0.0);
        assert_eq!(game.status, GameStatus::Running);
    }

    #[test]
    fn test_rolling_is_capped() {
        let mut game = RollingBalls::new(0);
        let mut input = TickInput::default();
        input.held.right = true;
        for _ in 0..5 {
            game.tick(&input);
            assert!(game.velocity.x.abs() <= MAX_VELOCITY + 1.0);
        }
    }

    #[test]
    fn test_moving_platform_turns_around() {
        let mut mover = RollingBalls::new(0).movers[1];
        for _ in 0..80 {
            mover.advance();
        }
        assert!(mover.platform.center.x <= mover.end_x + mover.speed);
        assert_eq!(mover.direction, -1.0);
    }

    #[test]
    fn test_checkpoint_scores_once() {
        let mut game = RollingBalls::new(0);
        game.ball = CHECKPOINTS[0];
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::Scored(CHECKPOINT_POINTS)));
        assert_eq!(game.collected(), 1);

        game.ball = CHECKPOINTS[0];
        game.velocity = Vec2::ZERO;
        let events = game.tick(&TickInput::default());
        assert!(!events.contains(&GameEvent::Scored(CHECKPOINT_POINTS)));
    }

    #[test]
    fn test_survival_points() {
        let mut game = RollingBalls::new(0);
        for _ in 0..60 {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.score, 10);
    }

    #[test]
    fn test_falling_off_ends_run() {
        let mut game = RollingBalls::new(0);
        game.ball = Vec2::new(760.0, FALL_LIMIT - 1.0);
        game.velocity = Vec2::new(0.0, 5.0);
        game.tick(&TickInput::default());
        assert_eq!(game.status, GameStatus::Over { won: false });
    }
}
