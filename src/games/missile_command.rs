//! Missile Command
//!
//! Click to launch interceptors from the central silo. Each wave drops a
//! fixed salvo on the bases; the wave ends once the sky has been clear
//! for three seconds.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{
    ArcadeGame, GameEvent, GameStatus, HudStat, PointerButton, TickInput, seeded_rng, within,
};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const BASE_Y: f32 = HEIGHT - 40.0;
pub const BASES: usize = 6;
pub const INTERCEPTOR_SPEED: f32 = 8.0;
pub const EXPLOSION_MAX_RADIUS: f32 = 50.0;
pub const MISSILE_POINTS: u64 = 25;
pub const WAVE_BONUS: u64 = 100;
/// Enemy missiles launched per wave
pub const WAVE_SALVO: u32 = 10;
pub const WAVE_CLEAR_MS: f32 = 3000.0;

const SILO: Vec2 = Vec2::new(WIDTH / 2.0, BASE_Y);

pub fn base_x(index: usize) -> f32 {
    100.0 + index as f32 * 120.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Missile {
    pub pos: Vec2,
    /// Where the trail started
    pub origin: Vec2,
    pub target: Vec2,
    pub speed: f32,
}

impl Missile {
    /// Step toward the target; true once it arrives
    fn advance(&mut self) -> bool {
        let to_target = self.target - self.pos;
        let dist = to_target.length();
        if dist < self.speed {
            return true;
        }
        self.pos += to_target / dist * self.speed;
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub growing: bool,
}

pub struct MissileCommand {
    pub bases: [bool; BASES],
    pub missiles: Vec<Missile>,
    pub interceptors: Vec<Missile>,
    pub explosions: Vec<Explosion>,
    pub score: u64,
    pub wave: u32,
    pub status: GameStatus,
    /// Missiles still to launch this wave
    pub salvo_left: u32,
    spawn_timer: u32,
    since_spawn: u32,
    rng: Pcg32,
}

impl MissileCommand {
    pub fn new(seed: u64) -> Self {
        Self {
            bases: [true; BASES],
            missiles: Vec::new(),
            interceptors: Vec::new(),
            explosions: Vec::new(),
            score: 0,
            wave: 1,
            status: GameStatus::Running,
            salvo_left: WAVE_SALVO,
            spawn_timer: 0,
            since_spawn: 0,
            rng: seeded_rng(seed),
        }
    }

    pub fn spawn_interval(&self) -> u32 {
        ms_to_ticks(2000.0 / self.wave as f32)
    }

    fn spawn_missile(&mut self) {
        let base = self.rng.random_range(0..BASES);
        let origin = Vec2::new(self.rng.random::<f32>() * WIDTH, 0.0);
        self.missiles.push(Missile {
            pos: origin,
            origin,
            target: Vec2::new(base_x(base), BASE_Y),
            speed: 1.0 + self.wave as f32 * 0.2,
        });
    }

    pub fn launch(&mut self, target: Vec2) {
        self.interceptors.push(Missile {
            pos: SILO,
            origin: SILO,
            target,
            speed: INTERCEPTOR_SPEED,
        });
    }

    fn strike(&mut self, target: Vec2) {
        let index = ((target.x - 80.0) / 120.0).floor();
        if index >= 0.0 && (index as usize) < BASES {
            self.bases[index as usize] = false;
        }
    }

    fn grow_explosions(&mut self) {
        for e in &mut self.explosions {
            if e.growing {
                e.radius += 2.0;
                if e.radius >= EXPLOSION_MAX_RADIUS {
                    e.growing = false;
                }
            } else {
                e.radius -= 1.0;
            }
        }
        self.explosions.retain(|e| e.radius > 0.0);
    }
}

impl ArcadeGame for MissileCommand {
    fn kind(&self) -> GameKind {
        GameKind::MissileCommand
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }

        for click in input.clicks.iter().filter(|c| c.button == PointerButton::Primary) {
            self.launch(click.pos);
        }

        self.spawn_timer += 1;
        self.since_spawn += 1;
        if self.salvo_left > 0 && self.spawn_timer > self.spawn_interval() {
            self.spawn_timer = 0;
            self.since_spawn = 0;
            self.salvo_left -= 1;
            self.spawn_missile();
        }

        let mut impacts = Vec::new();
        self.missiles.retain_mut(|m| {
            let arrived = m.advance();
            if arrived {
                impacts.push(m.target);
            }
            !arrived
        });
        for target in impacts {
            self.strike(target);
        }

        let mut detonations = Vec::new();
        self.interceptors.retain_mut(|m| {
            if m.pos.distance(m.target) < 5.0 {
                detonations.push(m.pos);
                return false;
            }
            m.advance();
            true
        });
        self.explosions.extend(detonations.into_iter().map(|pos| Explosion {
            pos,
            radius: 0.0,
            growing: true,
        }));
        self.grow_explosions();

        let explosions = &self.explosions;
        let before = self.missiles.len();
        self.missiles
            .retain(|m| !explosions.iter().any(|e| within(e.pos, m.pos, e.radius)));
        for _ in self.missiles.len()..before {
            self.score += MISSILE_POINTS;
            events.push(GameEvent::Scored(MISSILE_POINTS));
        }

        if self.bases.iter().all(|b| !b) {
            self.status = GameStatus::Over { won: false };
            return events;
        }

        if self.salvo_left == 0
            && self.missiles.is_empty()
            && self.since_spawn > ms_to_ticks(WAVE_CLEAR_MS)
        {
            self.wave += 1;
            self.salvo_left = WAVE_SALVO;
            self.score += WAVE_BONUS;
            events.push(GameEvent::Scored(WAVE_BONUS));
            events.push(GameEvent::LevelUp(self.wave));
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
            HudStat::new("Bases", self.bases.iter().filter(|b| **b).count()),
            HudStat::new("Wave", self.wave),
        ]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::oklch(0.1, 0.02, 264.0));

        for (i, _) in self.bases.iter().enumerate().filter(|(_, alive)| **alive) {
            let x = base_x(i);
            frame.rect(x - 20.0, BASE_Y, 40.0, 30.0, palette::oklch(0.65, 0.25, 180.0));
            frame.pie(Vec2::new(x, BASE_Y), 15.0, PI, 2.0 * PI, palette::oklch(0.75, 0.25, 180.0));
        }

        for m in &self.missiles {
            frame.line(m.origin, m.pos, 2.0, palette::oklch(0.75, 0.25, 0.0));
            frame.circle(m.pos, 4.0, palette::oklch(0.85, 0.25, 0.0));
        }
        for m in &self.interceptors {
            frame.line(m.origin, m.pos, 2.0, palette::oklch(0.75, 0.25, 140.0));
            frame.circle(m.pos, 3.0, palette::oklch(0.85, 0.25, 140.0));
        }

        // Three stacked discs stand in for the radial gradient
        for e in &self.explosions {
            frame.circle(
                e.pos,
                e.radius,
                palette::with_alpha(palette::oklch(0.65, 0.25, 30.0), 0.3),
            );
            frame.circle(
                e.pos,
                e.radius * 0.66,
                palette::with_alpha(palette::oklch(0.75, 0.25, 60.0), 0.5),
            );
            frame.circle(
                e.pos,
                e.radius * 0.33,
                palette::with_alpha(palette::oklch(0.85, 0.25, 85.0), 0.8),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Click;

    #[test]
    fn test_missile_destroys_base() {
        let mut game = MissileCommand::new(1);
        game.salvo_left = 0;
        let target = Vec2::new(base_x(2), BASE_Y);
        game.missiles.push(Missile {
            pos: target - Vec2::new(0.0, 1.0),
            origin: target,
            target,
            speed: 1.2,
        });
        game.tick(&TickInput::default());
        assert!(!game.bases[2]);
        assert!(game.bases[1] && game.bases[3]);
    }

    #[test]
    fn test_all_bases_lost_ends_game() {
        let mut game = MissileCommand::new(1);
        game.bases = [false, false, false, false, false, true];
        let target = Vec2::new(base_x(5), BASE_Y);
        game.missiles.push(Missile { pos: target, origin: target, target, speed: 1.2 });
        game.tick(&TickInput::default());
        assert_eq!(game.status, GameStatus::Over { won: false });
    }

    #[test]
    fn test_click_launches_interceptor() {
        let mut game = MissileCommand::new(1);
        let mut input = TickInput::default();
        input.clicks.push(Click { pos: Vec2::new(400.0, 300.0), button: PointerButton::Primary });
        game.tick(&input);
        assert_eq!(game.interceptors.len(), 1);
        assert_eq!(game.interceptors[0].pos, SILO - Vec2::new(0.0, INTERCEPTOR_SPEED));
    }

    #[test]
    fn test_explosion_lifecycle() {
        let mut game = MissileCommand::new(1);
        game.explosions.push(Explosion {
            pos: Vec2::new(100.0, 100.0),
            radius: 0.0,
            growing: true,
        });
        for _ in 0..25 {
            game.grow_explosions();
        }
        assert_eq!(game.explosions[0].radius, EXPLOSION_MAX_RADIUS);
        assert!(!game.explosions[0].growing);
        for _ in 0..50 {
            game.grow_explosions();
        }
        assert!(game.explosions.is_empty());
    }

    #[test]
    fn test_explosion_catches_missile() {
        let mut game = MissileCommand::new(1);
        game.salvo_left = 0;
        let pos = Vec2::new(300.0, 200.0);
        game.explosions.push(Explosion { pos, radius: 30.0, growing: true });
        game.missiles.push(Missile {
            pos,
            origin: Vec2::new(300.0, 0.0),
            target: Vec2::new(base_x(1), BASE_Y),
            speed: 1.2,
        });
        let events = game.tick(&TickInput::default());
        assert!(game.missiles.is_empty());
        assert!(events.contains(&GameEvent::Scored(MISSILE_POINTS)));
    }

    #[test]
    fn test_wave_advances_after_quiet_sky() {
        let mut game = MissileCommand::new(1);
        game.salvo_left = 0;
        for _ in 0..=ms_to_ticks(WAVE_CLEAR_MS) {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.wave, 2);
        assert_eq!(game.salvo_left, WAVE_SALVO);
        assert_eq!(game.score, WAVE_BONUS);
    }
}
