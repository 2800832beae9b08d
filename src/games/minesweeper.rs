//! Minesweeper
//!
//! Mouse driven: primary click reveals, secondary click toggles a flag.
//! Only a win scores, and the faster the better.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::GameKind;
use crate::consts::TICK_RATE;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, PointerButton, TickInput,
    seeded_rng,
};

pub const ROWS: usize = 12;
pub const COLS: usize = 12;
pub const MINES: usize = 20;
pub const CELL_SIZE: f32 = 40.0;
pub const MAX_SCORE: u64 = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    pub adjacent: u8,
}

pub type Grid = [[Cell; COLS]; ROWS];

fn neighbours(row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    (-1i32..=1)
        .flat_map(|dr| (-1i32..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| (dr, dc) != (0, 0))
        .filter_map(move |(dr, dc)| {
            let r = row as i32 + dr;
            let c = col as i32 + dc;
            let inside = r >= 0 && r < ROWS as i32 && c >= 0 && c < COLS as i32;
            inside.then_some((r as usize, c as usize))
        })
}

/// Fill in the adjacency counts for every safe cell
pub fn count_adjacent(grid: &mut Grid) {
    for row in 0..ROWS {
        for col in 0..COLS {
            if !grid[row][col].mine {
                grid[row][col].adjacent =
                    neighbours(row, col).filter(|&(r, c)| grid[r][c].mine).count() as u8;
            }
        }
    }
}

pub struct Minesweeper {
    pub grid: Grid,
    pub flags: u32,
    pub status: GameStatus,
    ticks: u64,
}

impl Minesweeper {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let mut grid: Grid = [[Cell::default(); COLS]; ROWS];
        let mut placed = 0;
        while placed < MINES {
            let cell = &mut grid[rng.random_range(0..ROWS)][rng.random_range(0..COLS)];
            if !cell.mine {
                cell.mine = true;
                placed += 1;
            }
        }
        count_adjacent(&mut grid);

        Self {
            grid,
            flags: 0,
            status: GameStatus::Running,
            ticks: 0,
        }
    }

    pub fn seconds(&self) -> u64 {
        self.ticks / TICK_RATE as u64
    }

    /// Reveal a cell, flood-filling from zero cells
    pub fn reveal(&mut self, row: usize, col: usize) {
        let cell = &mut self.grid[row][col];
        if cell.revealed || cell.flagged {
            return;
        }
        cell.revealed = true;

        if cell.mine {
            for cell in self.grid.iter_mut().flatten().filter(|c| c.mine) {
                cell.revealed = true;
            }
            self.status = GameStatus::Over { won: false };
            return;
        }

        if cell.adjacent == 0 {
            let mut queue = VecDeque::from([(row, col)]);
            while let Some((r, c)) = queue.pop_front() {
                for (nr, nc) in neighbours(r, c) {
                    let next = &mut self.grid[nr][nc];
                    if next.revealed || next.flagged {
                        continue;
                    }
                    next.revealed = true;
                    if next.adjacent == 0 && !next.mine {
                        queue.push_back((nr, nc));
                    }
                }
            }
        }

        if self.grid.iter().flatten().all(|c| c.mine || c.revealed) {
            self.status = GameStatus::Over { won: true };
        }
    }

    pub fn toggle_flag(&mut self, row: usize, col: usize) {
        let cell = &mut self.grid[row][col];
        if cell.revealed {
            return;
        }
        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flags += 1;
        } else {
            self.flags -= 1;
        }
    }

    fn cell_at(pos: Vec2) -> Option<(usize, usize)> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let col = (pos.x / CELL_SIZE) as usize;
        let row = (pos.y / CELL_SIZE) as usize;
        (row < ROWS && col < COLS).then_some((row, col))
    }
}

fn count_color(n: u8) -> palette::Color {
    match n {
        1 => palette::hex(0x3b82f6),
        2 => palette::hex(0x22c55e),
        3 => palette::hex(0xef4444),
        4 => palette::hex(0x8b5cf6),
        5 => palette::hex(0xf59e0b),
        6 => palette::hex(0x06b6d4),
        7 => palette::hex(0xec4899),
        _ => palette::hex(0x64748b),
    }
}

impl ArcadeGame for Minesweeper {
    fn kind(&self) -> GameKind {
        GameKind::Minesweeper
    }

    fn size(&self) -> (f32, f32) {
        (COLS as f32 * CELL_SIZE, ROWS as f32 * CELL_SIZE)
    }

    fn controls(&self) -> ControlScheme {
        ControlScheme {
            pause_key: Key::Pause,
            hint: "Left click to reveal, right click to flag",
        }
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        if self.status.is_over() {
            return Vec::new();
        }
        self.ticks += 1;

        for click in &input.clicks {
            let Some((row, col)) = Self::cell_at(click.pos) else {
                continue;
            };
            match click.button {
                PointerButton::Primary => self.reveal(row, col),
                PointerButton::Secondary => self.toggle_flag(row, col),
            }
            if self.status.is_over() {
                break;
            }
        }

        match self.status {
            GameStatus::Over { won: true } => vec![GameEvent::Scored(self.score())],
            _ => Vec::new(),
        }
    }

    fn score(&self) -> u64 {
        match self.status {
            GameStatus::Over { won: true } => MAX_SCORE.saturating_sub(self.seconds() * 10),
            _ => 0,
        }
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn hud(&self) -> Vec<HudStat> {
        vec![
            HudStat::new("Mines", MINES as i64 - self.flags as i64),
            HudStat::new("Time", self.seconds()),
        ]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::hex(0x1e293b));

        for (r, row) in self.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let x = c as f32 * CELL_SIZE;
                let y = r as f32 * CELL_SIZE;
                let center = Vec2::new(x + CELL_SIZE / 2.0, y + CELL_SIZE / 2.0);

                if cell.revealed {
                    frame.rect(
                        x + 1.0,
                        y + 1.0,
                        CELL_SIZE - 2.0,
                        CELL_SIZE - 2.0,
                        palette::hex(0xe2e8f0),
                    );
                    if cell.mine {
                        frame.circle(center, CELL_SIZE / 4.0, palette::hex(0xef4444));
                    } else if cell.adjacent > 0 {
                        frame.number(center, cell.adjacent as u64, 4.0, count_color(cell.adjacent));
                    }
                } else {
                    frame.rect(
                        x + 1.0,
                        y + 1.0,
                        CELL_SIZE - 2.0,
                        CELL_SIZE - 2.0,
                        palette::hex(0x64748b),
                    );
                    if cell.flagged {
                        frame.triangle(
                            center + Vec2::new(-8.0, -10.0),
                            center + Vec2::new(10.0, -4.0),
                            center + Vec2::new(-8.0, 2.0),
                            palette::hex(0xef4444),
                        );
                        frame.rect(
                            center.x - 9.0,
                            center.y - 10.0,
                            2.0,
                            22.0,
                            palette::hex(0x0f172a),
                        );
                    }
                }
            }
        }
    }
}
