//! Frogger
//!
//! Grid-based: the frog hops one cell per key press, while vehicles and
//! logs slide continuously (in cell units) and wrap around the screen.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, Key, TickInput, seeded_rng};
use crate::wrap;

pub const COLS: usize = 10;
pub const ROWS: usize = 15;
pub const CELL_SIZE: f32 = 40.0;
pub const ROAD_ROWS: std::ops::RangeInclusive<i32> = 8..=12;
pub const WATER_ROWS: std::ops::RangeInclusive<i32> = 2..=6;
/// Lane speeds are in cells per 0.02 ticks
pub const LANE_SCALE: f32 = 0.02;
pub const CROSSING_POINTS: u64 = 100;

const FROG_START: Vec2 = Vec2::new(4.0, 14.0);

/// A vehicle or a log; `x` is the left edge in cells, always in [0, COLS)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub x: f32,
    pub row: i32,
    pub width: f32,
    pub speed: f32,
}

impl Mover {
    /// Whether column `x` is covered, accounting for the wrap seam
    pub fn covers(&self, x: f32) -> bool {
        let cols = COLS as f32;
        let inside = |left: f32| x >= left && x < left + self.width;
        inside(self.x) || inside(self.x - cols)
    }

    fn advance(&mut self) {
        self.x = wrap(self.x + self.speed * LANE_SCALE, COLS as f32);
    }
}

fn lanes(
    rng: &mut Pcg32,
    rows: std::ops::RangeInclusive<i32>,
    base: f32,
    jitter: f32,
    widths: std::ops::Range<u32>,
) -> Vec<Mover> {
    let mut movers = Vec::new();
    for row in rows {
        let sign = if row % 2 == 0 { 1.0 } else { -1.0 };
        let speed = sign * base * (1.0 + rng.random::<f32>() * jitter);
        let count = rng.random_range(2..4);
        for i in 0..count {
            movers.push(Mover {
                x: (i * COLS) as f32 / count as f32,
                row,
                width: rng.random_range(widths.clone()) as f32,
                speed,
            });
        }
    }
    movers
}

pub struct Frogger {
    /// Column is fractional while riding a log
    pub frog: Vec2,
    pub vehicles: Vec<Mover>,
    pub logs: Vec<Mover>,
    pub score: u64,
    pub lives: u32,
    pub status: GameStatus,
}

impl Frogger {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let vehicles = lanes(&mut rng, ROAD_ROWS, 1.0, 0.5, 1..3);
        let logs = lanes(&mut rng, WATER_ROWS, 0.5, 0.3, 2..4);
        Self {
            frog: FROG_START,
            vehicles,
            logs,
            score: 0,
            lives: 3,
            status: GameStatus::Running,
        }
    }

    fn frog_row(&self) -> i32 {
        self.frog.y as i32
    }

    fn log_under_frog(&self) -> Option<&Mover> {
        let row = self.frog_row();
        self.logs.iter().find(|l| l.row == row && l.covers(self.frog.x))
    }

    fn hop(&mut self, key: Key, events: &mut Vec<GameEvent>) {
        let mut next = self.frog;
        match key {
            Key::Up if next.y > 0.0 => next.y -= 1.0,
            Key::Down if next.y < (ROWS - 1) as f32 => next.y += 1.0,
            Key::Left if next.x > 0.0 => next.x -= 1.0,
            Key::Right if next.x < (COLS - 1) as f32 => next.x += 1.0,
            _ => return,
        }

        if next.y == 0.0 {
            self.score += CROSSING_POINTS;
            events.push(GameEvent::Scored(CROSSING_POINTS));
            self.frog = FROG_START;
        } else {
            self.frog = next;
        }
    }

    fn die(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LifeLost);
        self.frog = FROG_START;
        if self.lives == 0 {
            self.status = GameStatus::Over { won: false };
        }
    }

    /// Ride, drown or get run over
    fn hazards(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(speed) = self.log_under_frog().map(|l| l.speed) {
            let x = self.frog.x + speed * LANE_SCALE;
            if x < 0.0 || x >= COLS as f32 {
                self.die(events);
            } else {
                self.frog.x = x;
            }
            return;
        }

        let row = self.frog_row();
        if WATER_ROWS.contains(&row) {
            self.die(events);
        } else if self.vehicles.iter().any(|v| v.row == row && v.covers(self.frog.x)) {
            self.die(events);
        }
    }
}

impl ArcadeGame for Frogger {
    fn kind(&self) -> GameKind {
        GameKind::Frogger
    }

    fn size(&self) -> (f32, f32) {
        (COLS as f32 * CELL_SIZE, ROWS as f32 * CELL_SIZE)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        for &key in &input.pressed {
            self.hop(key, &mut events);
        }

        for mover in self.vehicles.iter_mut().chain(self.logs.iter_mut()) {
            mover.advance();
        }
        self.hazards(&mut events);
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
        frame.background(palette::hex(0x1a1a2e));
        let (w, _) = self.size();
        let band = |frame: &mut Frame, row: i32, color| {
            frame.rect(0.0, row as f32 * CELL_SIZE, w, CELL_SIZE, color);
        };

        let grass = palette::hex(0x16a34a);
        for row in [0, 7, 13, 14] {
            band(frame, row, grass);
        }
        for row in WATER_ROWS {
            band(frame, row, palette::hex(0x0ea5e9));
        }
        for row in ROAD_ROWS {
            band(frame, row, palette::hex(0x374151));
        }

        let draw = |frame: &mut Frame, m: &Mover, color| {
            // Draw twice so a mover straddling the seam shows on both sides
            for offset in [0.0, -(COLS as f32)] {
                frame.rect(
                    (m.x + offset) * CELL_SIZE,
                    m.row as f32 * CELL_SIZE,
                    m.width * CELL_SIZE,
                    CELL_SIZE - 4.0,
                    color,
                );
            }
        };
        for log in &self.logs {
            draw(frame, log, palette::hex(0x92400e));
        }
        for vehicle in &self.vehicles {
            draw(frame, vehicle, palette::hex(0xdc2626));
        }

        frame.rect(
            self.frog.x * CELL_SIZE + 5.0,
            self.frog.y * CELL_SIZE + 5.0,
            CELL_SIZE - 10.0,
            CELL_SIZE - 10.0,
            palette::hex(0x22c55e),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(seed: u64) -> Frogger {
        let mut game = Frogger::new(seed);
        game.vehicles.clear();
        game.logs.clear();
        game
    }

    fn press(key: Key) -> TickInput {
        let mut input = TickInput::default();
        input.key_down(key);
        input
    }

    #[test]
    fn test_lanes_are_populated() {
        let game = Frogger::new(11);
        for row in ROAD_ROWS {
            let lane: Vec<_> = game.vehicles.iter().filter(|v| v.row == row).collect();
            assert!((2..=3).contains(&lane.len()));
            assert!(lane.iter().all(|v| (1.0..=2.0).contains(&v.width)));
            assert!(lane.iter().all(|v| v.speed.abs() >= 1.0 && v.speed.abs() <= 1.5));
        }
        assert!(game.logs.iter().all(|l| (2.0..=3.0).contains(&l.width)));
    }

    #[test]
    fn test_hop_and_walls() {
        let mut game = empty(1);
        game.tick(&press(Key::Up));
        assert_eq!(game.frog, Vec2::new(4.0, 13.0));
        game.frog = Vec2::new(0.0, 13.0);
        game.tick(&press(Key::Left));
        assert_eq!(game.frog.x, 0.0);
    }

    #[test]
    fn test_reaching_top_scores() {
        let mut game = empty(1);
        game.frog = Vec2::new(4.0, 1.0);
        let events = game.tick(&press(Key::Up));
        assert_eq!(game.score, CROSSING_POINTS);
        assert!(events.contains(&GameEvent::Scored(CROSSING_POINTS)));
        assert_eq!(game.frog, FROG_START);
    }

    #[test]
    fn test_water_drowns() {
        let mut game = empty(1);
        game.frog = Vec2::new(4.0, 3.0);
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(game.frog, FROG_START);
    }

    #[test]
    fn test_log_carries_frog() {
        let mut game = empty(1);
        game.logs.push(Mover { x: 3.0, row: 4, width: 3.0, speed: 1.0 });
        game.frog = Vec2::new(4.0, 4.0);
        game.tick(&TickInput::default());
        assert!((game.frog.x - 4.02).abs() < 1e-4);
        assert_eq!(game.lives, 3);
    }

    #[test]
    fn test_vehicle_hit() {
        let mut game = empty(1);
        game.vehicles.push(Mover { x: 3.5, row: 9, width: 1.0, speed: 1.0 });
        game.frog = Vec2::new(4.0, 9.0);
        game.tick(&TickInput::default());
        assert_eq!(game.lives, 2);
    }

    #[test]
    fn test_covers_across_seam() {
        let m = Mover { x: 9.5, row: 8, width: 2.0, speed: 1.0 };
        assert!(m.covers(9.7));
        assert!(m.covers(1.0));
        assert!(!m.covers(2.0));
    }
}
