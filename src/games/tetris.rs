//! Tetris
//!
//! 10x20 well, seven one-sided tetrominoes, clockwise rotation without wall
//! kicks. A piece locks when a downward move is blocked.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, TickInput, seeded_rng,
};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
pub const CELL_SIZE: f32 = 25.0;

/// Piece matrix, row-major
pub type Shape = Vec<Vec<bool>>;

/// 0 is empty, otherwise color index + 1
pub type Board = [[u8; COLS]; ROWS];

const SHAPES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[1, 1, 0], &[0, 1, 1]],
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[0, 0, 1], &[1, 1, 1]],
];

fn piece_color(index: u8) -> palette::Color {
    match index {
        0 => palette::oklch(0.6, 0.118, 184.704),
        1 => palette::oklch(0.828, 0.189, 84.429),
        2 => palette::oklch(0.488, 0.243, 264.376),
        3 => palette::oklch(0.646, 0.222, 41.116),
        4 => palette::oklch(0.704, 0.191, 22.216),
        5 => palette::oklch(0.696, 0.17, 162.48),
        _ => palette::oklch(0.769, 0.188, 70.08),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub shape: Shape,
    pub color: u8,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new(index: usize) -> Self {
        let shape = SHAPES[index]
            .iter()
            .map(|row| row.iter().map(|&c| c != 0).collect())
            .collect();
        Self {
            shape,
            color: index as u8,
            x: COLS as i32 / 2 - 1,
            y: 0,
        }
    }

    /// Occupied cells in board coordinates
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (self.x + c as i32, self.y + r as i32))
        })
    }
}

/// Rotate a matrix clockwise (transpose, then reverse each row)
pub fn rotate_clockwise(shape: &Shape) -> Shape {
    let rows = shape.len();
    let cols = shape.first().map_or(0, |r| r.len());
    (0..cols)
        .map(|c| (0..rows).rev().map(|r| shape[r][c]).collect())
        .collect()
}

/// Whether `piece` overlaps a wall, the floor or a settled cell
///
/// Cells above the top of the well are allowed.
pub fn collides(board: &Board, piece: &Piece) -> bool {
    piece.cells().any(|(x, y)| {
        if x < 0 || x >= COLS as i32 || y >= ROWS as i32 {
            return true;
        }
        y >= 0 && board[y as usize][x as usize] != 0
    })
}

/// Remove full rows, shifting the rest down; returns the number cleared
pub fn clear_lines(board: &mut Board) -> u32 {
    let kept: Vec<[u8; COLS]> = board
        .iter()
        .filter(|row| row.iter().any(|&c| c == 0))
        .copied()
        .collect();
    let cleared = ROWS - kept.len();
    let mut next = [[0u8; COLS]; ROWS];
    next[cleared..].copy_from_slice(&kept);
    *board = next;
    cleared as u32
}

pub struct Tetris {
    pub board: Board,
    pub piece: Piece,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub status: GameStatus,
    gravity_timer: u32,
    rng: Pcg32,
}

impl Tetris {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let piece = Piece::new(rng.random_range(0..SHAPES.len()));
        Self {
            board: [[0; COLS]; ROWS],
            piece,
            score: 0,
            lines: 0,
            level: 1,
            status: GameStatus::Running,
            gravity_timer: 0,
            rng,
        }
    }

    pub fn gravity_ms(&self) -> f32 {
        (1000.0 - (self.level as f32 - 1.0) * 100.0).max(100.0)
    }

    /// Try to shift the piece; a blocked downward move locks it
    pub fn shift(&mut self, dx: i32, dy: i32, events: &mut Vec<GameEvent>) -> bool {
        let mut moved = self.piece.clone();
        moved.x += dx;
        moved.y += dy;
        if !collides(&self.board, &moved) {
            self.piece = moved;
            return true;
        }
        if dy > 0 {
            self.lock(events);
        }
        false
    }

    pub fn rotate(&mut self) {
        let mut rotated = self.piece.clone();
        rotated.shape = rotate_clockwise(&self.piece.shape);
        if !collides(&self.board, &rotated) {
            self.piece = rotated;
        }
    }

    pub fn hard_drop(&mut self, events: &mut Vec<GameEvent>) {
        while self.shift(0, 1, events) {}
    }

    fn lock(&mut self, events: &mut Vec<GameEvent>) {
        for (x, y) in self.piece.cells() {
            if y >= 0 {
                self.board[y as usize][x as usize] = self.piece.color + 1;
            }
        }

        let cleared = clear_lines(&mut self.board);
        if cleared > 0 {
            let points = cleared as u64 * 100 * self.level as u64;
            self.score += points;
            self.lines += cleared;
            events.push(GameEvent::Scored(points));
            let level = self.lines / 10 + 1;
            if level != self.level {
                self.level = level;
                events.push(GameEvent::LevelUp(level));
            }
        }

        let next = Piece::new(self.rng.random_range(0..SHAPES.len()));
        if collides(&self.board, &next) {
            self.status = GameStatus::Over { won: false };
        } else {
            self.piece = next;
        }
    }
}

impl ArcadeGame for Tetris {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn size(&self) -> (f32, f32) {
        (COLS as f32 * CELL_SIZE, ROWS as f32 * CELL_SIZE)
    }

    fn controls(&self) -> ControlScheme {
        ControlScheme {
            pause_key: Key::Pause,
            hint: "Left/Right to move, Up to rotate, Down to drop, Space for hard drop, P to pause",
        }
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        for key in &input.pressed {
            match key {
                Key::Left => {
                    self.shift(-1, 0, &mut events);
                }
                Key::Right => {
                    self.shift(1, 0, &mut events);
                }
                Key::Down => {
                    self.shift(0, 1, &mut events);
                }
                Key::Up => self.rotate(),
                Key::Action => self.hard_drop(&mut events),
                _ => {}
            }
            if self.status.is_over() {
                return events;
            }
        }

        self.gravity_timer += 1;
        if self.gravity_timer >= ms_to_ticks(self.gravity_ms()) {
            self.gravity_timer = 0;
            self.shift(0, 1, &mut events);
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
        vec![
            HudStat::new("Lines", self.lines),
            HudStat::new("Level", self.level),
        ]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.145, 0.0, 0.0));

        let cell = |frame: &mut Frame, x: i32, y: i32, color| {
            frame.rect(
                x as f32 * CELL_SIZE + 1.0,
                y as f32 * CELL_SIZE + 1.0,
                CELL_SIZE - 2.0,
                CELL_SIZE - 2.0,
                color,
            );
        };

        for (y, row) in self.board.iter().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                if c != 0 {
                    cell(frame, x as i32, y as i32, piece_color(c - 1));
                }
            }
        }
        if !self.status.is_over() {
            for (x, y) in self.piece.cells() {
                cell(frame, x, y, piece_color(self.piece.color));
            }
        }

        let grid = palette::oklch(0.269, 0.0, 0.0);
        let (w, h) = self.size();
        for i in 0..=COLS {
            let x = i as f32 * CELL_SIZE;
            frame.line(Vec2::new(x, 0.0), Vec2::new(x, h), 1.0, grid);
        }
        for i in 0..=ROWS {
            let y = i as f32 * CELL_SIZE;
            frame.line(Vec2::new(0.0, y), Vec2::new(w, y), 1.0, grid);
        }
    }
}
