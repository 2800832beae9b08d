//! Donkey Kong
//!
//! Climb the girders to the top while barrels roll down them. Barrels drop
//! off the end of each girder and reverse when they land on the next one.

use glam::Vec2;

use super::GameKind;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, Key, Rect, TickInput, aabb_overlap};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 500.0;
pub const PLAYER_WIDTH: f32 = 25.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 3.0;
pub const GRAVITY: f32 = 0.5;
pub const JUMP_STRENGTH: f32 = -10.0;
pub const BARREL_SIZE: f32 = 20.0;
pub const LADDER_WIDTH: f32 = 20.0;
pub const PLATFORM_THICKNESS: f32 = 10.0;
pub const LEVEL_BONUS: u64 = 1000;

const PLAYER_START: Vec2 = Vec2::new(50.0, HEIGHT - 80.0);
const BARREL_SPAWN: Vec2 = Vec2::new(500.0, 70.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ladder {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

pub const PLATFORMS: [Platform; 5] = [
    Platform { x: 0.0, y: HEIGHT - 50.0, width: WIDTH },
    Platform { x: 100.0, y: HEIGHT - 150.0, width: 400.0 },
    Platform { x: 50.0, y: HEIGHT - 250.0, width: 450.0 },
    Platform { x: 100.0, y: HEIGHT - 350.0, width: 400.0 },
    Platform { x: 0.0, y: 50.0, width: WIDTH },
];

pub const LADDERS: [Ladder; 4] = [
    Ladder { x: 150.0, y: HEIGHT - 150.0, height: 100.0 },
    Ladder { x: 450.0, y: HEIGHT - 250.0, height: 100.0 },
    Ladder { x: 200.0, y: HEIGHT - 350.0, height: 100.0 },
    Ladder { x: 400.0, y: 50.0, height: 100.0 },
];

/// The platform whose top surface a box of `width` at `pos` is resting in
fn landing(pos: Vec2, width: f32, height: f32) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| {
        pos.x + width > p.x
            && pos.x < p.x + p.width
            && pos.y + height >= p.y
            && pos.y + height <= p.y + PLATFORM_THICKNESS
    })
}

fn on_ladder(pos: Vec2) -> bool {
    let mid = pos.x + PLAYER_WIDTH / 2.0;
    LADDERS.iter().any(|l| {
        mid >= l.x
            && mid <= l.x + LADDER_WIDTH
            && pos.y + PLAYER_HEIGHT >= l.y
            && pos.y <= l.y + l.height
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vy: f32,
    pub on_ground: bool,
}

impl Player {
    fn spawn() -> Self {
        Self {
            pos: PLAYER_START,
            vy: 0.0,
            on_ground: true,
        }
    }

    fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrel {
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    /// Set after the first landing; later landings reverse the roll
    pub rolled: bool,
}

impl Barrel {
    fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BARREL_SIZE, BARREL_SIZE)
    }

    fn roll(&mut self) {
        self.pos.x += self.vel.x;
        self.vel.y += GRAVITY;
        self.pos.y += self.vel.y;

        match landing(self.pos, BARREL_SIZE, BARREL_SIZE) {
            Some(platform) if self.vel.y >= 0.0 => {
                self.pos.y = platform.y - BARREL_SIZE;
                self.vel.y = 0.0;
                if !self.grounded && self.rolled {
                    self.vel.x = -self.vel.x;
                }
                self.grounded = true;
                self.rolled = true;
            }
            _ => self.grounded = false,
        }
    }

    fn gone(&self) -> bool {
        self.pos.x < -30.0 || self.pos.x > WIDTH || self.pos.y > HEIGHT
    }
}

pub struct DonkeyKong {
    pub player: Player,
    pub barrels: Vec<Barrel>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub status: GameStatus,
    spawn_timer: u32,
}

impl DonkeyKong {
    pub fn new(_seed: u64) -> Self {
        Self {
            player: Player::spawn(),
            barrels: Vec::new(),
            score: 0,
            lives: 3,
            level: 1,
            status: GameStatus::Running,
            spawn_timer: 0,
        }
    }

    pub fn spawn_interval(&self) -> u32 {
        120 / self.level.max(1)
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LifeLost);
        if self.lives == 0 {
            self.status = GameStatus::Over { won: false };
        }
    }

    fn move_player(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) {
        let p = &mut self.player;
        if input.was_pressed(Key::Action) && p.on_ground {
            p.vy = JUMP_STRENGTH;
            p.on_ground = false;
        }
        p.pos.x = (p.pos.x + input.held.axis_x() * PLAYER_SPEED).clamp(0.0, WIDTH - PLAYER_WIDTH);

        if on_ladder(p.pos) {
            if input.held.up {
                p.pos.y = (p.pos.y - PLAYER_SPEED).max(0.0);
                p.vy = 0.0;
                p.on_ground = false;
            }
            if input.held.down {
                p.pos.y = (p.pos.y + PLAYER_SPEED).min(HEIGHT - PLAYER_HEIGHT);
                p.vy = 0.0;
            }
        } else {
            p.vy += GRAVITY;
            p.pos.y += p.vy;
            match landing(p.pos, PLAYER_WIDTH, PLAYER_HEIGHT) {
                Some(platform) => {
                    p.pos.y = platform.y - PLAYER_HEIGHT;
                    p.vy = 0.0;
                    p.on_ground = true;
                }
                None => p.on_ground = false,
            }

            if p.pos.y > HEIGHT {
                self.player = Player::spawn();
                self.lose_life(events);
                return;
            }
        }

        let p = self.player.pos;
        if p.y < 100.0 && p.x > 200.0 && p.x < 400.0 {
            self.score += LEVEL_BONUS;
            self.level += 1;
            events.push(GameEvent::Scored(LEVEL_BONUS));
            events.push(GameEvent::LevelUp(self.level));
            self.player = Player::spawn();
            self.barrels.clear();
        }
    }
}

impl ArcadeGame for DonkeyKong {
    fn kind(&self) -> GameKind {
        GameKind::DonkeyKong
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        self.spawn_timer += 1;
        if self.spawn_timer > self.spawn_interval() {
            self.spawn_timer = 0;
            self.barrels.push(Barrel {
                pos: BARREL_SPAWN,
                vel: Vec2::new(-2.0 * self.level as f32, 0.0),
                grounded: false,
                rolled: false,
            });
        }

        self.move_player(input, &mut events);
        if self.status.is_over() {
            return events;
        }

        let player = self.player.rect();
        let mut hits = 0;
        for barrel in &mut self.barrels {
            barrel.roll();
            if aabb_overlap(&barrel.rect(), &player) {
                barrel.pos.y = HEIGHT + 1.0;
                hits += 1;
            }
        }
        self.barrels.retain(|b| !b.gone());
        for _ in 0..hits {
            self.lose_life(&mut events);
            if self.status.is_over() {
                return events;
            }
        }

        self.score += 1;
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
            HudStat::new("Lives", self.lives),
            HudStat::new("Level", self.level),
        ]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.145, 0.0, 0.0));

        let girder = palette::oklch(0.5, 0.15, 30.0);
        for p in &PLATFORMS {
            frame.rect(p.x, p.y, p.width, PLATFORM_THICKNESS, girder);
        }

        let rail = palette::oklch(0.6, 0.2, 60.0);
        for l in &LADDERS {
            frame.rect(l.x, l.y, 5.0, l.height, rail);
            frame.rect(l.x + 15.0, l.y, 5.0, l.height, rail);
            let mut y = 0.0;
            while y < l.height {
                frame.rect(l.x, l.y + y, LADDER_WIDTH, 3.0, rail);
                y += 15.0;
            }
        }

        // Kong and the captive
        frame.rect(490.0, 20.0, 30.0, 30.0, palette::oklch(0.6, 0.2, 0.0));
        frame.rect(295.0, 20.0, 14.0, 28.0, palette::oklch(0.9, 0.2, 60.0));

        let p = self.player.pos;
        frame.rect(p.x, p.y, PLAYER_WIDTH, PLAYER_HEIGHT, palette::oklch(0.7, 0.25, 0.0));
        frame.rect(p.x + 5.0, p.y + 5.0, 15.0, 10.0, palette::oklch(0.9, 0.1, 60.0));

        let barrel = palette::oklch(0.5, 0.2, 30.0);
        for b in &self.barrels {
            frame.rect(b.pos.x, b.pos.y, BARREL_SIZE, BARREL_SIZE, barrel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_n(game: &mut DonkeyKong, n: usize) {
        for _ in 0..n {
            game.tick(&TickInput::default());
        }
    }

    #[test]
    fn test_player_stands_on_ground() {
        let mut game = DonkeyKong::new(0);
        tick_n(&mut game, 30);
        assert_eq!(game.player.pos.y, PLATFORMS[0].y - PLAYER_HEIGHT);
        assert!(game.player.on_ground);
        assert_eq!(game.score, 30);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut game = DonkeyKong::new(0);
        let mut input = TickInput::default();
        input.key_down(Key::Action);
        game.tick(&input);
        assert!(!game.player.on_ground);
        assert!(game.player.pos.y < PLAYER_START.y);
    }

    #[test]
    fn test_barrel_spawn_interval_shrinks() {
        let mut game = DonkeyKong::new(0);
        assert_eq!(game.spawn_interval(), 120);
        game.level = 3;
        assert_eq!(game.spawn_interval(), 40);
    }

    #[test]
    fn test_barrel_reverses_on_lower_girder() {
        let mut barrel = Barrel {
            pos: BARREL_SPAWN,
            vel: Vec2::new(-2.0, 0.0),
            grounded: false,
            rolled: false,
        };
        let mut reversed = false;
        for _ in 0..400 {
            barrel.roll();
            if barrel.vel.x > 0.0 {
                reversed = true;
                break;
            }
        }
        assert!(reversed);
        assert_eq!(barrel.pos.y, PLATFORMS[2].y - BARREL_SIZE);
    }

    #[test]
    fn test_barrel_hit_costs_life() {
        let mut game = DonkeyKong::new(0);
        game.barrels.push(Barrel {
            pos: game.player.pos + Vec2::new(2.0, 10.0),
            vel: Vec2::ZERO,
            grounded: true,
            rolled: true,
        });
        let events = game.tick(&TickInput::default());
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(game.lives, 2);
        assert!(game.barrels.is_empty());
    }

    #[test]
    fn test_reaching_top_levels_up() {
        let mut game = DonkeyKong::new(0);
        game.player.pos = Vec2::new(300.0, 60.0);
        game.barrels.push(Barrel {
            pos: BARREL_SPAWN,
            vel: Vec2::ZERO,
            grounded: false,
            rolled: false,
        });
        let events = game.tick(&TickInput::default());
        assert_eq!(game.level, 2);
        assert!(events.contains(&GameEvent::LevelUp(2)));
        assert_eq!(game.player.pos, PLAYER_START);
        assert!(game.barrels.is_empty());
        assert_eq!(game.score, LEVEL_BONUS + 1);
    }

    #[test]
    fn test_falling_off_screen_costs_life() {
        let mut game = DonkeyKong::new(0);
        game.player.pos = Vec2::new(300.0, HEIGHT + 5.0);
        game.player.on_ground = false;
        game.tick(&TickInput::default());
        assert_eq!(game.lives, 2);
        assert_eq!(game.player.pos, PLAYER_START);
    }
}
