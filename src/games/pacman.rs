//! Pac-Man
//!
//! Grid movement on a fixed maze. Pac-Man steps every 150 ms and prefers the
//! queued direction; ghosts wander to a random open neighbour every 200 ms.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, TickInput, seeded_rng,
};

pub const COLS: usize = 19;
pub const ROWS: usize = 22;
pub const CELL_SIZE: f32 = 20.0;
pub const PACMAN_STEP_MS: f32 = 150.0;
pub const GHOST_STEP_MS: f32 = 200.0;
pub const POWER_MS: f32 = 5000.0;
pub const DOT_POINTS: u64 = 10;
pub const PELLET_POINTS: u64 = 50;
pub const GHOST_POINTS: u64 = 200;

const PACMAN_START: IVec2 = IVec2::new(9, 16);
const GHOST_STARTS: [IVec2; 3] = [IVec2::new(8, 10), IVec2::new(9, 10), IVec2::new(10, 10)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Dot,
    Pellet,
}

const MAZE: [[u8; COLS]; ROWS] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 2, 1],
    [1, 3, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 3, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 2, 1, 2, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 2, 1, 1, 1, 0, 1, 0, 1, 1, 1, 2, 1, 1, 1, 1],
    [0, 0, 0, 1, 2, 1, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 0, 0, 0],
    [1, 1, 1, 1, 2, 1, 0, 1, 1, 0, 1, 1, 0, 1, 2, 1, 1, 1, 1],
    [0, 0, 0, 0, 2, 0, 0, 1, 0, 0, 0, 1, 0, 0, 2, 0, 0, 0, 0],
    [1, 1, 1, 1, 2, 1, 0, 1, 1, 1, 1, 1, 0, 1, 2, 1, 1, 1, 1],
    [0, 0, 0, 1, 2, 1, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 0, 0, 0],
    [1, 1, 1, 1, 2, 1, 0, 1, 1, 1, 1, 1, 0, 1, 2, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 2, 1],
    [1, 3, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 3, 1],
    [1, 1, 2, 1, 2, 1, 2, 1, 1, 1, 1, 1, 2, 1, 2, 1, 2, 1, 1],
    [1, 2, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

fn initial_tiles() -> [[Tile; COLS]; ROWS] {
    MAZE.map(|row| {
        row.map(|t| match t {
            1 => Tile::Wall,
            2 => Tile::Dot,
            3 => Tile::Pellet,
            _ => Tile::Empty,
        })
    })
}

pub struct PacMan {
    pub tiles: [[Tile; COLS]; ROWS],
    pub pacman: IVec2,
    pub direction: IVec2,
    pub next_direction: IVec2,
    pub ghosts: Vec<IVec2>,
    pub score: u64,
    pub lives: u32,
    /// Ticks of power mode remaining
    pub power_ticks: u32,
    pub status: GameStatus,
    pacman_timer: u32,
    ghost_timer: u32,
    rng: Pcg32,
}

impl PacMan {
    pub fn new(seed: u64) -> Self {
        Self {
            tiles: initial_tiles(),
            pacman: PACMAN_START,
            direction: IVec2::X,
            next_direction: IVec2::X,
            ghosts: GHOST_STARTS.to_vec(),
            score: 0,
            lives: 3,
            power_ticks: 0,
            status: GameStatus::Running,
            pacman_timer: 0,
            ghost_timer: 0,
            rng: seeded_rng(seed),
        }
    }

    /// Open cell inside the maze
    pub fn can_move(&self, pos: IVec2) -> bool {
        if pos.x < 0 || pos.y < 0 || pos.x >= COLS as i32 || pos.y >= ROWS as i32 {
            return false;
        }
        self.tiles[pos.y as usize][pos.x as usize] != Tile::Wall
    }

    pub fn remaining(&self) -> usize {
        self.tiles
            .iter()
            .flatten()
            .filter(|t| matches!(t, Tile::Dot | Tile::Pellet))
            .count()
    }

    pub fn step_pacman(&mut self, events: &mut Vec<GameEvent>) {
        let preferred = self.pacman + self.next_direction;
        let next = if self.can_move(preferred) {
            self.direction = self.next_direction;
            preferred
        } else {
            let ahead = self.pacman + self.direction;
            if !self.can_move(ahead) {
                return;
            }
            ahead
        };
        self.pacman = next;

        let tile = &mut self.tiles[next.y as usize][next.x as usize];
        match *tile {
            Tile::Dot => {
                *tile = Tile::Empty;
                self.score += DOT_POINTS;
                events.push(GameEvent::Scored(DOT_POINTS));
            }
            Tile::Pellet => {
                *tile = Tile::Empty;
                self.score += PELLET_POINTS;
                self.power_ticks = ms_to_ticks(POWER_MS);
                events.push(GameEvent::Scored(PELLET_POINTS));
            }
            _ => {}
        }
    }

    pub fn step_ghosts(&mut self) {
        for i in 0..self.ghosts.len() {
            let ghost = self.ghosts[i];
            let options: Vec<IVec2> = [IVec2::NEG_Y, IVec2::Y, IVec2::NEG_X, IVec2::X]
                .into_iter()
                .map(|d| ghost + d)
                .filter(|p| self.can_move(*p))
                .collect();
            if let Some(&next) = options.choose(&mut self.rng) {
                self.ghosts[i] = next;
            }
        }
    }

    fn resolve_contacts(&mut self, events: &mut Vec<GameEvent>) {
        if !self.ghosts.contains(&self.pacman) {
            return;
        }
        if self.power_ticks > 0 {
            let before = self.ghosts.len();
            let pacman = self.pacman;
            self.ghosts.retain(|g| *g != pacman);
            let eaten = (before - self.ghosts.len()) as u64;
            self.score += GHOST_POINTS * eaten;
            events.push(GameEvent::Scored(GHOST_POINTS * eaten));
        } else {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
            } else {
                self.pacman = PACMAN_START;
            }
        }
    }
}

impl ArcadeGame for PacMan {
    fn kind(&self) -> GameKind {
        GameKind::PacMan
    }

    fn size(&self) -> (f32, f32) {
        (COLS as f32 * CELL_SIZE, ROWS as f32 * CELL_SIZE)
    }

    fn controls(&self) -> ControlScheme {
        ControlScheme {
            pause_key: Key::Action,
            hint: "Arrow keys to steer, Space to pause",
        }
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        for key in &input.pressed {
            match key {
                Key::Up => self.next_direction = IVec2::NEG_Y,
                Key::Down => self.next_direction = IVec2::Y,
                Key::Left => self.next_direction = IVec2::NEG_X,
                Key::Right => self.next_direction = IVec2::X,
                _ => {}
            }
        }

        self.power_ticks = self.power_ticks.saturating_sub(1);

        self.pacman_timer += 1;
        if self.pacman_timer >= ms_to_ticks(PACMAN_STEP_MS) {
            self.pacman_timer = 0;
            self.step_pacman(&mut events);
            self.resolve_contacts(&mut events);
        }

        self.ghost_timer += 1;
        if self.ghost_timer >= ms_to_ticks(GHOST_STEP_MS) && !self.status.is_over() {
            self.ghost_timer = 0;
            self.step_ghosts();
            self.resolve_contacts(&mut events);
        }

        if !self.status.is_over() && self.remaining() == 0 {
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
        let mut stats = vec![HudStat::new("Lives", self.lives)];
        if self.power_ticks > 0 {
            stats.push(HudStat::new("Power", format!("{}s", self.power_ticks / 60 + 1)));
        }
        stats
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::BLACK);

        let wall = palette::oklch(0.488, 0.243, 264.376);
        let dot = palette::oklch(0.985, 0.0, 0.0);
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let center = cell_center(IVec2::new(x as i32, y as i32));
                match tile {
                    Tile::Wall => frame.rect(
                        x as f32 * CELL_SIZE,
                        y as f32 * CELL_SIZE,
                        CELL_SIZE,
                        CELL_SIZE,
                        wall,
                    ),
                    Tile::Dot => frame.circle(center, 2.0, dot),
                    Tile::Pellet => frame.circle(center, 5.0, dot),
                    Tile::Empty => {}
                }
            }
        }

        // Mouth opens toward the current heading
        let heading = self.direction.as_vec2().y.atan2(self.direction.as_vec2().x);
        let mouth = 0.25 * std::f32::consts::PI;
        frame.pie(
            cell_center(self.pacman),
            CELL_SIZE / 2.0 - 2.0,
            heading + mouth,
            heading + 2.0 * std::f32::consts::PI - mouth,
            palette::YELLOW,
        );

        let ghost_color = if self.power_ticks > 0 {
            palette::BLUE
        } else {
            palette::oklch(0.704, 0.191, 22.216)
        };
        for ghost in &self.ghosts {
            let c = cell_center(*ghost);
            frame.circle(c - Vec2::new(0.0, 2.0), CELL_SIZE / 2.0 - 2.0, ghost_color);
            frame.rect(c.x - 8.0, c.y - 2.0, 16.0, 10.0, ghost_color);
        }
    }
}

fn cell_center(cell: IVec2) -> Vec2 {
    (cell.as_vec2() + 0.5) * CELL_SIZE
}
