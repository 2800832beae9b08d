//! Q*bert
//!
//! Hop around a seven-row pyramid turning every cube to its target color.
//! Cells are addressed as (row, col) with `0 <= col <= row`.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, TickInput, seeded_rng};

pub const WIDTH: f32 = 700.0;
pub const HEIGHT: f32 = 600.0;
pub const ROWS: i32 = 7;
pub const CUBE_SIZE: f32 = 50.0;
pub const HOP_MS: f32 = 200.0;
pub const MAX_ENEMIES: usize = 3;
pub const SPAWN_CHANCE: f64 = 0.005;
pub const ENEMY_STEP_CHANCE: f64 = 0.02;
pub const CUBE_POINTS: u64 = 25;
pub const LEVEL_BONUS: u64 = 500;

/// (row, col) deltas for up, down, left and right
pub const MOVES: [(i32, i32); 4] = [(-1, 0), (1, 1), (0, -1), (1, 0)];

pub fn on_pyramid(row: i32, col: i32) -> bool {
    (0..ROWS).contains(&row) && (0..=row).contains(&col)
}

/// Top vertex of the cube's diamond
pub fn cube_position(row: i32, col: i32) -> Vec2 {
    Vec2::new(
        WIDTH / 2.0 + (col as f32 - row as f32 / 2.0) * CUBE_SIZE,
        100.0 + row as f32 * CUBE_SIZE * 0.7,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub row: i32,
    pub col: i32,
    pub color: u8,
    pub target: u8,
}

fn pyramid() -> Vec<Cube> {
    (0..ROWS)
        .flat_map(|row| (0..=row).map(move |col| Cube { row, col, color: 0, target: 1 }))
        .collect()
}

pub struct Qbert {
    pub cubes: Vec<Cube>,
    /// (row, col)
    pub player: (i32, i32),
    pub enemies: Vec<(i32, i32)>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub status: GameStatus,
    hop_cooldown: u32,
    rng: Pcg32,
}

impl Qbert {
    pub fn new(seed: u64) -> Self {
        Self {
            cubes: pyramid(),
            player: (0, 0),
            enemies: Vec::new(),
            score: 0,
            lives: 3,
            level: 1,
            status: GameStatus::Running,
            hop_cooldown: 0,
            rng: seeded_rng(seed),
        }
    }

    fn reset_pyramid(&mut self) {
        self.cubes = pyramid();
        self.player = (0, 0);
        self.enemies.clear();
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LifeLost);
        if self.lives == 0 {
            self.status = GameStatus::Over { won: false };
            return;
        }
        self.player = (0, 0);
        // Otherwise an enemy parked on the apex kills again on respawn
        self.enemies.clear();
    }

    pub fn hop(&mut self, (dr, dc): (i32, i32), events: &mut Vec<GameEvent>) {
        let (row, col) = (self.player.0 + dr, self.player.1 + dc);
        if !on_pyramid(row, col) {
            self.lose_life(events);
            return;
        }
        self.player = (row, col);

        let Some(cube) = self.cubes.iter_mut().find(|c| c.row == row && c.col == col) else {
            return;
        };
        if cube.color != cube.target {
            cube.color = cube.target;
            self.score += CUBE_POINTS;
            events.push(GameEvent::Scored(CUBE_POINTS));
        }

        if self.cubes.iter().all(|c| c.color == c.target) {
            self.level += 1;
            self.score += LEVEL_BONUS;
            events.push(GameEvent::Scored(LEVEL_BONUS));
            events.push(GameEvent::LevelUp(self.level));
            self.reset_pyramid();
        }
    }

    fn move_enemies(&mut self) {
        for i in 0..self.enemies.len() {
            if !self.rng.random_bool(ENEMY_STEP_CHANCE) {
                continue;
            }
            let Some(&(dr, dc)) = MOVES.choose(&mut self.rng) else {
                continue;
            };
            let (row, col) = self.enemies[i];
            if on_pyramid(row + dr, col + dc) {
                self.enemies[i] = (row + dr, col + dc);
            }
        }
    }
}

impl ArcadeGame for Qbert {
    fn kind(&self) -> GameKind {
        GameKind::Qbert
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        self.hop_cooldown = self.hop_cooldown.saturating_sub(1);
        if self.hop_cooldown == 0 {
            let held = &input.held;
            let direction = [held.up, held.down, held.left, held.right]
                .iter()
                .position(|&down| down);
            if let Some(i) = direction {
                self.hop(MOVES[i], &mut events);
                self.hop_cooldown = ms_to_ticks(HOP_MS);
                if self.status.is_over() {
                    return events;
                }
            }
        }

        self.move_enemies();
        if self.enemies.contains(&self.player) {
            self.lose_life(&mut events);
            if self.status.is_over() {
                return events;
            }
        }

        if self.enemies.len() < MAX_ENEMIES
            && self.player != (0, 0)
            && self.rng.random_bool(SPAWN_CHANCE)
        {
            self.enemies.push((0, 0));
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
        vec![HudStat::new("Lives", self.lives), HudStat::new("Level", self.level)]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.15, 0.02, 264.0));

        let edge = palette::oklch(0.85, 0.25, 85.0);
        for cube in &self.cubes {
            let top = cube_position(cube.row, cube.col);
            let hue = match cube.color {
                0 => 200.0,
                1 => 60.0,
                _ => 140.0,
            };
            let diamond = [
                top,
                top + Vec2::new(CUBE_SIZE / 2.0, CUBE_SIZE / 4.0),
                top + Vec2::new(0.0, CUBE_SIZE / 2.0),
                top + Vec2::new(-CUBE_SIZE / 2.0, CUBE_SIZE / 4.0),
            ];
            frame.polygon(&diamond, palette::oklch(0.65, 0.25, hue));
            frame.outline(&diamond, 2.0, edge);
        }

        let p = cube_position(self.player.0, self.player.1);
        frame.circle(p - Vec2::new(0.0, 20.0), 15.0, palette::oklch(0.75, 0.25, 30.0));
        let eye = palette::oklch(0.85, 0.25, 30.0);
        frame.circle(p + Vec2::new(-5.0, -25.0), 5.0, eye);
        frame.circle(p + Vec2::new(5.0, -25.0), 5.0, eye);

        for &(row, col) in &self.enemies {
            let e = cube_position(row, col);
            frame.circle(e - Vec2::new(0.0, 20.0), 12.0, palette::oklch(0.65, 0.25, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyramid_shape() {
        let game = Qbert::new(3);
        assert_eq!(game.cubes.len(), 28);
        assert!(on_pyramid(6, 6));
        assert!(!on_pyramid(6, 7));
        assert!(!on_pyramid(-1, 0));
        assert_eq!(cube_position(0, 0), Vec2::new(350.0, 100.0));
        assert_eq!(cube_position(2, 0), Vec2::new(300.0, 170.0));
    }

    #[test]
    fn test_hop_colors_cube() {
        let mut game = Qbert::new(3);
        let mut events = Vec::new();
        game.hop((1, 1), &mut events);
        assert_eq!(game.player, (1, 1));
        assert_eq!(game.score, CUBE_POINTS);
        // Revisiting scores nothing
        game.hop((0, -1), &mut events);
        game.hop((1, 1), &mut events);
        assert_eq!(game.score, CUBE_POINTS * 2);
    }

    #[test]
    fn test_jumping_off_costs_life() {
        let mut game = Qbert::new(3);
        let mut events = Vec::new();
        game.hop((-1, 0), &mut events);
        assert_eq!(game.lives, 2);
        assert_eq!(game.player, (0, 0));
        assert!(events.contains(&GameEvent::LifeLost));
    }

    #[test]
    fn test_completing_pyramid_levels_up() {
        let mut game = Qbert::new(3);
        for cube in game.cubes.iter_mut().filter(|c| (c.row, c.col) != (1, 0)) {
            cube.color = cube.target;
        }
        let mut events = Vec::new();
        game.hop((1, 0), &mut events);
        assert_eq!(game.level, 2);
        assert_eq!(game.score, CUBE_POINTS + LEVEL_BONUS);
        assert!(events.contains(&GameEvent::LevelUp(2)));
        assert!(game.cubes.iter().all(|c| c.color == 0));
        assert_eq!(game.player, (0, 0));
    }

    #[test]
    fn test_held_key_hops_on_cooldown() {
        let mut game = Qbert::new(3);
        let mut input = TickInput::default();
        input.held.right = true;
        game.tick(&input);
        assert_eq!(game.player, (1, 0));
        for _ in 0..ms_to_ticks(HOP_MS) - 1 {
            game.tick(&input);
        }
        assert_eq!(game.player, (1, 0));
        game.tick(&input);
        assert_eq!(game.player, (2, 0));
    }

    #[test]
    fn test_enemy_contact_costs_life() {
        let mut game = Qbert::new(3);
        game.player = (3, 1);
        game.enemies = vec![(3, 1)];
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::LifeLost));
        assert!(game.enemies.is_empty());
    }

    #[test]
    fn test_enemies_stay_on_pyramid() {
        let mut game = Qbert::new(11);
        game.player = (6, 3);
        for _ in 0..5000 {
            game.tick(&TickInput::default());
            if game.status.is_over() {
                break;
            }
        }
        assert!(game.enemies.len() <= MAX_ENEMIES);
        assert!(game.enemies.iter().all(|&(r, c)| on_pyramid(r, c)));
    }
}
