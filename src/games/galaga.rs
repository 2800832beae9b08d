//! Galaga
//!
//! Waves of swaying aliens; each cleared wave brings a deeper formation.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::GameKind;
use crate::ms_to_ticks;
use crate::renderer::{Frame, palette};
use crate::sim::{ArcadeGame, GameEvent, GameStatus, HudStat, Rect, TickInput, seeded_rng};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 700.0;
pub const PLAYER_Y: f32 = HEIGHT - 60.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_MARGIN: f32 = 20.0;
pub const BULLET_SPEED: f32 = 8.0;
pub const ALIEN_BULLET_SPEED: f32 = 4.0;
pub const FIRE_COOLDOWN_MS: f32 = 300.0;
pub const ALIEN_FIRE_MS: f32 = 1000.0;
pub const FORMATION_COLS: usize = 8;
pub const SPACING: f32 = 60.0;
/// Half-size of every hit box (aliens and player)
pub const HIT_HALF: f32 = 20.0;
pub const SWAY_AMPLITUDE: f32 = 30.0;
const SWAY_RATE: f32 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alien {
    /// Formation slot; the drawn position adds the sway offset
    pub home: Vec2,
    pub alive: bool,
    /// 0..3, picks color and points
    pub kind: u32,
}

impl Alien {
    pub fn points(&self) -> u64 {
        10 * (self.kind as u64 + 1)
    }
}

fn hit_box(center: Vec2) -> Rect {
    Rect::from_center(center, Vec2::splat(HIT_HALF * 2.0))
}

/// Strictly inside a ±20 box around `center`
fn strikes(point: Vec2, center: Vec2) -> bool {
    let r = hit_box(center);
    point.x > r.min().x && point.x < r.max().x && point.y > r.min().y && point.y < r.max().y
}

pub fn formation(wave: u32) -> Vec<Alien> {
    let rows = 4 + wave as usize / 2;
    let start_x = (WIDTH - FORMATION_COLS as f32 * SPACING) / 2.0;
    let mut aliens = Vec::with_capacity(rows * FORMATION_COLS);
    for row in 0..rows {
        for col in 0..FORMATION_COLS {
            aliens.push(Alien {
                home: Vec2::new(start_x + col as f32 * SPACING, 80.0 + row as f32 * SPACING),
                alive: true,
                kind: (row % 3) as u32,
            });
        }
    }
    aliens
}

pub struct Galaga {
    pub player_x: f32,
    pub bullets: Vec<Vec2>,
    pub alien_bullets: Vec<Vec2>,
    pub aliens: Vec<Alien>,
    pub score: u64,
    pub lives: u32,
    pub wave: u32,
    pub status: GameStatus,
    ticks: u32,
    cooldown: u32,
    alien_timer: u32,
    rng: Pcg32,
}

impl Galaga {
    pub fn new(seed: u64) -> Self {
        Self {
            player_x: WIDTH / 2.0,
            bullets: Vec::new(),
            alien_bullets: Vec::new(),
            aliens: formation(1),
            score: 0,
            lives: 3,
            wave: 1,
            status: GameStatus::Running,
            ticks: 0,
            cooldown: 0,
            alien_timer: 0,
            rng: seeded_rng(seed),
        }
    }

    pub fn sway(&self) -> f32 {
        (self.ticks as f32 * SWAY_RATE).sin() * SWAY_AMPLITUDE
    }

    /// Where an alien currently is on screen
    pub fn alien_pos(&self, alien: &Alien) -> Vec2 {
        alien.home + Vec2::new(self.sway(), 0.0)
    }

    fn player(&self) -> Vec2 {
        Vec2::new(self.player_x, PLAYER_Y)
    }

    fn shoot_aliens(&mut self, events: &mut Vec<GameEvent>) {
        let offset = Vec2::new(self.sway(), 0.0);
        for alien in self.aliens.iter_mut().filter(|a| a.alive) {
            let center = alien.home + offset;
            if let Some(i) = self.bullets.iter().position(|b| strikes(*b, center)) {
                self.bullets.remove(i);
                alien.alive = false;
                let points = alien.points();
                self.score += points;
                events.push(GameEvent::Scored(points));
            }
        }
    }
}

impl ArcadeGame for Galaga {
    fn kind(&self) -> GameKind {
        GameKind::Galaga
    }

    fn size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status.is_over() {
            return events;
        }
        self.ticks += 1;

        self.player_x = (self.player_x + input.held.axis_x() * PLAYER_SPEED)
            .clamp(PLAYER_MARGIN, WIDTH - PLAYER_MARGIN);

        self.cooldown = self.cooldown.saturating_sub(1);
        if input.held.action && self.cooldown == 0 {
            self.cooldown = ms_to_ticks(FIRE_COOLDOWN_MS);
            self.bullets.push(self.player() - Vec2::new(0.0, 20.0));
        }
        for b in &mut self.bullets {
            b.y -= BULLET_SPEED;
        }
        self.bullets.retain(|b| b.y > 0.0);

        self.alien_timer += 1;
        if self.alien_timer >= ms_to_ticks(ALIEN_FIRE_MS) {
            self.alien_timer = 0;
            let shooters: Vec<Vec2> = self
                .aliens
                .iter()
                .filter(|a| a.alive)
                .map(|a| self.alien_pos(a))
                .collect();
            if let Some(pos) = shooters.choose(&mut self.rng) {
                self.alien_bullets.push(*pos + Vec2::new(0.0, 20.0));
            }
        }
        for b in &mut self.alien_bullets {
            b.y += ALIEN_BULLET_SPEED;
        }
        self.alien_bullets.retain(|b| b.y < HEIGHT);

        self.shoot_aliens(&mut events);

        let player = self.player();
        if self.alien_bullets.iter().any(|b| strikes(*b, player)) {
            self.alien_bullets.clear();
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.status = GameStatus::Over { won: false };
                return events;
            }
        }

        if self.aliens.iter().all(|a| !a.alive) {
            self.wave += 1;
            self.aliens = formation(self.wave);
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
            HudStat::new("Lives", self.lives),
            HudStat::new("Wave", self.wave),
        ]
    }

    fn render(&self, frame: &mut Frame) {
        frame.background(palette::hex(0x0a0a0f));

        let star = palette::hex(0xffffff);
        for i in 0..50u32 {
            let x = (i * 137) as f32 % WIDTH;
            let y = (i * 211) as f32 % HEIGHT;
            frame.rect(x, y, 2.0, 2.0, star);
        }

        let p = self.player();
        frame.triangle(
            p + Vec2::new(0.0, -15.0),
            p + Vec2::new(-15.0, 15.0),
            p + Vec2::new(15.0, 15.0),
            palette::hex(0x22c55e),
        );

        for b in &self.bullets {
            frame.rect(b.x - 2.0, b.y, 4.0, 10.0, palette::hex(0xfbbf24));
        }
        for b in &self.alien_bullets {
            frame.rect(b.x - 2.0, b.y, 4.0, 10.0, palette::hex(0xef4444));
        }

        const COLORS: [u32; 3] = [0x8b5cf6, 0xec4899, 0xf59e0b];
        let eye = palette::hex(0x000000);
        for alien in self.aliens.iter().filter(|a| a.alive) {
            let c = self.alien_pos(alien);
            frame.rect_centered(
                c,
                Vec2::splat(30.0),
                palette::hex(COLORS[alien.kind as usize % 3]),
            );
            frame.rect(c.x - 8.0, c.y - 8.0, 5.0, 5.0, eye);
            frame.rect(c.x + 3.0, c.y - 8.0, 5.0, 5.0, eye);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_grows_with_waves() {
        assert_eq!(formation(1).len(), 32);
        assert_eq!(formation(2).len(), 40);
        assert_eq!(formation(4).len(), 48);
        let f = formation(1);
        assert_eq!(f[0].home, Vec2::new(60.0, 80.0));
        assert_eq!(f[8].kind, 1);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut game = Galaga::new(1);
        let mut input = TickInput::default();
        input.held.action = true;
        for _ in 0..18 {
            game.tick(&input);
        }
        assert_eq!(game.bullets.len(), 1);
        game.tick(&input);
        assert_eq!(game.bullets.len(), 2);
    }

    #[test]
    fn test_player_clamped() {
        let mut game = Galaga::new(1);
        let mut input = TickInput::default();
        input.held.left = true;
        for _ in 0..200 {
            game.tick(&input);
        }
        assert_eq!(game.player_x, PLAYER_MARGIN);
    }

    #[test]
    fn test_kill_scores_by_type() {
        let mut game = Galaga::new(1);
        let target = game.aliens[16];
        // After this tick the sway is evaluated at ticks = 1
        game.ticks = 0;
        let pos = target.home + Vec2::new((SWAY_RATE).sin() * SWAY_AMPLITUDE, 0.0);
        game.bullets.push(pos + Vec2::new(0.0, BULLET_SPEED));
        let events = game.tick(&TickInput::default());
        assert!(!game.aliens[16].alive);
        assert_eq!(game.score, 30);
        assert!(events.contains(&GameEvent::Scored(30)));
    }

    #[test]
    fn test_hit_clears_alien_bullets() {
        let mut game = Galaga::new(1);
        game.alien_bullets.push(Vec2::new(game.player_x, PLAYER_Y - ALIEN_BULLET_SPEED));
        game.alien_bullets.push(Vec2::new(50.0, 300.0));
        game.tick(&TickInput::default());
        assert_eq!(game.lives, 2);
        assert!(game.alien_bullets.is_empty());
    }

    #[test]
    fn test_cleared_wave_advances() {
        let mut game = Galaga::new(1);
        for alien in &mut game.aliens {
            alien.alive = false;
        }
        let events = game.tick(&TickInput::default());
        assert_eq!(game.wave, 2);
        assert!(events.contains(&GameEvent::LevelUp(2)));
        assert_eq!(game.aliens.len(), 40);
    }
}
