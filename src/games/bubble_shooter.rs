//! Bubble Shooter
//!
//! Bubbles stick wherever the shot first touches; there is no snapping to
//! a hex grid. Matching runs over the free-form positions by distance.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, PointerButton, TickInput, seeded_rng, within};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 700.0;
pub const BUBBLE_RADIUS: f32 = 20.0;
pub const SHOT_SPEED: f32 = 10.0;
/// Hues of the six bubble colors
pub const HUES: [f32; 6] = [0.0, 60.0, 140.0, 200.0, 280.0, 330.0];
pub const MIN_GROUP: usize = 3;
pub const BUBBLE_POINTS: u64 = 10;
pub const CLEAR_BONUS: u64 = 500;
/// A bubble lower than this ends the game
pub const DANGER_LINE: f32 = HEIGHT - 150.0;
const CEILING: f32 = 20.0;
/// Shallowest aim above the horizontal (radians)
const MIN_ELEVATION: f32 = 0.15;
const SHOOTER: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 40.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub pos: Vec2,
    /// Index into `HUES`
    pub color: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: usize,
}

/// Indices of the same-colored bubbles connected to `start`
pub fn connected_group(bubbles: &[Bubble], start: usize) -> Vec<usize> {
    let color = bubbles[start].color;
    let mut group = vec![start];
    let mut seen = vec![false; bubbles.len()];
    seen[start] = true;
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        for (i, b) in bubbles.iter().enumerate() {
            if !seen[i]
                && b.color == color
                && within(b.pos, bubbles[current].pos, BUBBLE_RADIUS * 2.2)
            {
                seen[i] = true;
                group.push(i);
                stack.push(i);
            }
        }
    }
    group
}

pub struct BubbleShooter {
    pub bubbles: Vec<Bubble>,
    pub shot: Option<Shot>,
    pub next_color: usize,
    /// Radians, screen orientation
    pub aim: f32,
    pub score: u64,
    pub status: GameStatus,
    rng: Pcg32,
}

impl BubbleShooter {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let mut bubbles = Vec::new();
        for row in 0..5 {
            let (cols, offset) = if row % 2 == 0 {
                (13, BUBBLE_RADIUS)
            } else {
                (12, BUBBLE_RADIUS * 2.0)
            };
            for col in 0..cols {
                bubbles.push(Bubble {
                    pos: Vec2::new(
                        col as f32 * BUBBLE_RADIUS * 2.0 + offset + 20.0,
                        row as f32 * BUBBLE_RADIUS * 1.8 + BUBBLE_RADIUS + 20.0,
                    ),
                    color: rng.random_range(0..HUES.len()),
                });
            }
        }

        Self {
            bubbles,
            shot: None,
            next_color: rng.random_range(0..HUES.len()),
            aim: -std::f32::consts::FRAC_PI_2,
            score: 0,
            status: GameStatus::Running,
            rng,
        }
    }

    pub fn fire(&mut self) {
        if self.shot.is_some() {
            return;
        }
        self.shot = Some(Shot {
            pos: SHOOTER,
            vel: Vec2::from_angle(self.aim) * SHOT_SPEED,
            color: self.next_color,
        });
    }

    /// Stick the shot where it is and pop any group it completes
    fn settle(&mut self, shot: Shot, events: &mut Vec<GameEvent>) {
        self.bubbles.push(Bubble { pos: shot.pos, color: shot.color });
        let group = connected_group(&self.bubbles, self.bubbles.len() - 1);
        if group.len() >= MIN_GROUP {
            let points = group.len() as u64 * BUBBLE_POINTS;
            let mut index = 0;
            self.bubbles.retain(|_| {
                let keep = !group.contains(&index);
                index += 1;
                keep
            });
            self.score += points;
            events.push(GameEvent::Scored(points));
        }
        self.next_color = self.rng.random_range(0..HUES.len());

        if self.bubbles.is_empty() {
            self.score += CLEAR_BONUS;
            events.push(GameEvent::Scored(CLEAR_BONUS));
            self.status = GameStatus::Over { won: true };
        } else if self.bubbles.iter().any(|b| b.pos.y > DANGER_LINE) {
            self.status = GameStatus::Over { won: false };
        }
    }
}

/// Keep the aim pointing upward so every shot reaches the ceiling
fn clamp_aim(angle: f32) -> f32 {
    use std::f32::consts::{FRAC_PI_2, PI};
    if angle > -MIN_ELEVATION && angle <= FRAC_PI_2 {
        -MIN_ELEVATION
    } else if angle > FRAC_PI_2 || angle < -PI + MIN_ELEVATION {
        -PI + MIN_ELEVATION
    } else {
        angle
    }
}

fn hue_color(color: usize) -> palette::Color {
    palette::oklch(0.7, 0.25, HUES[color % HUES.len()])
}

impl ArcadeGame for BubbleShooter {
    fn kind(&self) -> GameKind {
        GameKind::BubbleShooter
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        if let Some(pointer) = input.pointer {
            let d = pointer - SHOOTER;
            self.aim = clamp_aim(d.y.atan2(d.x));
        }
        if input.clicks.iter().any(|c| c.button == PointerButton::Primary) {
            self.fire();
        }

        let Some(mut shot) = self.shot else {
            return events;
        };
        shot.pos += shot.vel;
        if shot.pos.x - BUBBLE_RADIUS < 0.0 || shot.pos.x + BUBBLE_RADIUS > WIDTH {
            shot.vel.x = -shot.vel.x;
            shot.pos.x = shot.pos.x.clamp(BUBBLE_RADIUS, WIDTH - BUBBLE_RADIUS);
        }

        let touching = self
            .bubbles
            .iter()
            .any(|b| within(b.pos, shot.pos, BUBBLE_RADIUS * 2.0));
        if touching || shot.pos.y - BUBBLE_RADIUS < CEILING {
            self.shot = None;
            self.settle(shot, &mut events);
        } else {
            self.shot = Some(shot);
        }
        events
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.15, 0.02, 264.0));

        let rim = palette::oklch(0.85, 0.25, 85.0);
        let bubbles = self.bubbles.iter().map(|b| (b.pos, b.color));
        for (pos, color) in bubbles.chain(self.shot.map(|s| (s.pos, s.color))) {
            frame.circle(pos, BUBBLE_RADIUS, hue_color(color));
            frame.ring(pos, BUBBLE_RADIUS, 2.0, rim);
        }

        let barrel = SHOOTER + Vec2::from_angle(self.aim) * 40.0;
        frame.line(SHOOTER, barrel, 4.0, palette::oklch(0.75, 0.25, 180.0));
        frame.circle(SHOOTER, BUBBLE_RADIUS, hue_color(self.next_color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let game = BubbleShooter::new(2);
        assert_eq!(game.bubbles.len(), 13 + 12 + 13 + 12 + 13);
        assert_eq!(game.bubbles[0].pos, Vec2::new(40.0, 40.0));
        assert_eq!(game.bubbles[13].pos, Vec2::new(60.0, 76.0));
    }

    #[test]
    fn test_group_search() {
        let bubbles = vec![
            Bubble { pos: Vec2::new(100.0, 100.0), color: 0 },
            Bubble { pos: Vec2::new(140.0, 100.0), color: 0 },
            Bubble { pos: Vec2::new(180.0, 100.0), color: 0 },
            Bubble { pos: Vec2::new(220.0, 100.0), color: 1 },
            Bubble { pos: Vec2::new(300.0, 100.0), color: 0 },
        ];
        let mut group = connected_group(&bubbles, 0);
        group.sort();
        assert_eq!(group, vec![0, 1, 2]);
    }

    #[test]
    fn test_matching_shot_pops_group() {
        let mut game = BubbleShooter::new(2);
        game.bubbles = vec![
            Bubble { pos: Vec2::new(300.0, 100.0), color: 3 },
            Bubble { pos: Vec2::new(340.0, 100.0), color: 3 },
            Bubble { pos: Vec2::new(500.0, 100.0), color: 1 },
        ];
        game.shot = Some(Shot {
            pos: Vec2::new(320.0, 150.0),
            vel: Vec2::new(0.0, -SHOT_SPEED),
            color: 3,
        });
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::Scored(30)));
        assert_eq!(game.bubbles.len(), 1);
        assert!(game.shot.is_none());
    }

    #[test]
    fn test_mismatch_sticks() {
        let mut game = BubbleShooter::new(2);
        game.bubbles = vec![Bubble { pos: Vec2::new(300.0, 100.0), color: 0 }];
        game.shot = Some(Shot {
            pos: Vec2::new(300.0, 150.0),
            vel: Vec2::new(0.0, -SHOT_SPEED),
            color: 2,
        });
        game.tick(&TickInput::default());
        assert_eq!(game.bubbles.len(), 2);
        assert_eq!(game.status, GameStatus::Running);
    }

    #[test]
    fn test_clearing_board_wins() {
        let mut game = BubbleShooter::new(2);
        game.bubbles = vec![
            Bubble { pos: Vec2::new(300.0, 100.0), color: 4 },
            Bubble { pos: Vec2::new(340.0, 100.0), color: 4 },
        ];
        game.shot = Some(Shot {
            pos: Vec2::new(320.0, 150.0),
            vel: Vec2::new(0.0, -SHOT_SPEED),
            color: 4,
        });
        game.tick(&TickInput::default());
        assert_eq!(game.status, GameStatus::Over { won: true });
        assert_eq!(game.score, 30 + CLEAR_BONUS);
    }

    #[test]
    fn test_shot_bounces_off_wall() {
        let mut game = BubbleShooter::new(2);
        game.bubbles.clear();
        game.bubbles.push(Bubble { pos: Vec2::new(300.0, 40.0), color: 0 });
        game.shot = Some(Shot {
            pos: Vec2::new(25.0, 400.0),
            vel: Vec2::new(-8.0, -6.0),
            color: 1,
        });
        game.tick(&TickInput::default());
        let shot = game.shot.expect("still flying");
        assert!(shot.vel.x > 0.0);
        assert_eq!(shot.pos.x, BUBBLE_RADIUS);
    }

    #[test]
    fn test_aim_follows_pointer_and_click_fires() {
        let mut game = BubbleShooter::new(2);
        let mut input = TickInput::default();
        input.click(SHOOTER + Vec2::new(100.0, -100.0), PointerButton::Primary);
        game.tick(&input);
        assert!((game.aim + std::f32::consts::FRAC_PI_4).abs() < 1e-4);
        assert!(game.shot.is_some());
    }

    #[test]
    fn test_level_aim_still_climbs() {
        let mut game = BubbleShooter::new(2);
        let mut input = TickInput::default();
        input.click(SHOOTER + Vec2::new(-200.0, 0.0), PointerButton::Primary);
        game.tick(&input);
        let shot = game.shot.expect("fired");
        assert!(shot.vel.x < 0.0);
        assert!(shot.vel.y < 0.0);

        assert_eq!(clamp_aim(1.0), -MIN_ELEVATION);
        assert_eq!(clamp_aim(-1.0), -1.0);
    }
}
