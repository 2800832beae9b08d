//! Shared simulation layer
//!
//! Every game runs on top of this. The rules the games follow:
//! - Fixed timestep only (one `tick` = 1/60 s)
//! - Seeded RNG only
//! - No rendering or platform dependencies inside `tick`

pub mod collision;
pub mod input;
pub mod session;
pub mod state;

pub use collision::{
    CollisionResult, Rect, aabb_overlap, circle_circle, circle_rect, circle_rotated_rect,
    point_in_rect, reflect_velocity, within,
};
pub use input::{Click, HeldKeys, Key, PointerButton, TickInput};
pub use session::{GameOverReport, Session, next_seed};
pub use state::{ArcadeGame, ControlScheme, GameEvent, GamePhase, GameStatus, HudStat, seeded_rng};
