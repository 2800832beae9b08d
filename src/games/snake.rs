//! Snake
//!
//! Grid snake on a 20x20 board. The snake steps every 150 ms; a queued turn
//! is applied on the next step unless it would reverse into the body.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, ControlScheme, GameEvent, GameStatus, HudStat, Key, TickInput, seeded_rng,
};

pub const GRID_SIZE: i32 = 20;
pub const CELL_SIZE: f32 = 20.0;
pub const STEP_MS: f32 = 150.0;
pub const FOOD_POINTS: u64 = 10;

pub struct Snake {
    /// Head first
    pub body: VecDeque<IVec2>,
    pub direction: IVec2,
    pub queued: IVec2,
    pub food: IVec2,
    pub score: u64,
    pub status: GameStatus,
    step_timer: u32,
    rng: Pcg32,
}

impl Snake {
    pub fn new(seed: u64) -> Self {
        Self {
            body: VecDeque::from([IVec2::new(10, 10)]),
            direction: IVec2::X,
            queued: IVec2::X,
            food: IVec2::new(15, 15),
            score: 0,
            status: GameStatus::Running,
            step_timer: 0,
            rng: seeded_rng(seed),
        }
    }

    /// Queue a turn; reversals onto the current heading are ignored
    pub fn turn(&mut self, dir: IVec2) {
        if dir + self.direction != IVec2::ZERO {
            self.queued = dir;
        }
    }

    /// Advance the snake by one cell
    pub fn step(&mut self, events: &mut Vec<GameEvent>) {
        self.direction = self.queued;
        let Some(&head) = self.body.front() else {
            return;
        };
        let next = head + self.direction;

        let off_board = next.x < 0 || next.x >= GRID_SIZE || next.y < 0 || next.y >= GRID_SIZE;
        if off_board || self.body.contains(&next) {
            self.status = GameStatus::Over { won: false };
            events.push(GameEvent::LifeLost);
            return;
        }

        self.body.push_front(next);
        if next == self.food {
            self.score += FOOD_POINTS;
            events.push(GameEvent::Scored(FOOD_POINTS));
            match self.free_cell() {
                Some(cell) => self.food = cell,
                None => self.status = GameStatus::Over { won: true },
            }
        } else {
            self.body.pop_back();
        }
    }

    fn free_cell(&mut self) -> Option<IVec2> {
        if self.body.len() >= (GRID_SIZE * GRID_SIZE) as usize {
            return None;
        }
        loop {
            let cell = IVec2::new(
                self.rng.random_range(0..GRID_SIZE),
                self.rng.random_range(0..GRID_SIZE),
            );
            if !self.body.contains(&cell) {
                return Some(cell);
            }
        }
    }
}

impl ArcadeGame for Snake {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn size(&self) -> (f32, f32) {
        let side = GRID_SIZE as f32 * CELL_SIZE;
        (side, side)
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
                Key::Up => self.turn(IVec2::NEG_Y),
                Key::Down => self.turn(IVec2::Y),
                Key::Left => self.turn(IVec2::NEG_X),
                Key::Right => self.turn(IVec2::X),
                _ => {}
            }
        }

        self.step_timer += 1;
        if self.step_timer >= ms_to_ticks(STEP_MS) {
            self.step_timer = 0;
            self.step(&mut events);
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
        vec![HudStat::new("Length", self.body.len())]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::hex(0x111827));

        let food = cell_center(self.food);
        frame.circle(food, CELL_SIZE * 0.4, palette::RED);

        for (i, cell) in self.body.iter().enumerate() {
            let color = if i == 0 {
                palette::hex(0x16a34a)
            } else {
                palette::GREEN
            };
            frame.rect(
                cell.x as f32 * CELL_SIZE + 1.0,
                cell.y as f32 * CELL_SIZE + 1.0,
                CELL_SIZE - 2.0,
                CELL_SIZE - 2.0,
                color,
            );
        }
    }
}

fn cell_center(cell: IVec2) -> Vec2 {
    (cell.as_vec2() + 0.5) * CELL_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grows_by_one_per_food() {
        let mut snake = Snake::new(1);
        snake.food = IVec2::new(11, 10);
        let mut events = Vec::new();
        snake.step(&mut events);
        assert_eq!(snake.body.len(), 2);
        assert_eq!(snake.score, 10);
        assert!(!snake.body.contains(&snake.food));

        // Plain move keeps the length
        snake.food = IVec2::new(0, 0);
        snake.step(&mut events);
        assert_eq!(snake.body.len(), 2);
    }

    #[test]
    fn test_reversal_ignored() {
        let mut snake = Snake::new(1);
        snake.turn(IVec2::NEG_X);
        assert_eq!(snake.queued, IVec2::X);
        snake.turn(IVec2::Y);
        assert_eq!(snake.queued, IVec2::Y);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut snake = Snake::new(1);
        snake.food = IVec2::new(0, 0);
        let mut events = Vec::new();
        for _ in 0..10 {
            snake.step(&mut events);
        }
        assert_eq!(snake.status, GameStatus::Over { won: false });
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut snake = Snake::new(1);
        snake.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(4, 5),
            IVec2::new(4, 6),
            IVec2::new(5, 6),
            IVec2::new(6, 6),
        ]);
        snake.direction = IVec2::X;
        snake.queued = IVec2::Y;
        snake.step(&mut Vec::new());
        assert_eq!(snake.status, GameStatus::Over { won: false });
    }

    #[test]
    fn test_steps_on_interval() {
        let mut snake = Snake::new(1);
        let input = TickInput::default();
        for _ in 0..ms_to_ticks(STEP_MS) - 1 {
            snake.tick(&input);
        }
        assert_eq!(snake.body[0], IVec2::new(10, 10));
        snake.tick(&input);
        assert_eq!(snake.body[0], IVec2::new(11, 10));
    }

    proptest! {
        #[test]
        fn prop_food_never_on_body(seed in any::<u64>()) {
            let mut snake = Snake::new(seed);
            snake.body = (0..30).map(|i| IVec2::new(i % GRID_SIZE, i / GRID_SIZE)).collect();
            let cell = snake.free_cell();
            prop_assert!(cell.is_some());
            prop_assert!(!snake.body.contains(&cell.unwrap_or_default()));
        }
    }
}
