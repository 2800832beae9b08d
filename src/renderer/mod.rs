//! WebGPU rendering module
//!
//! Games build a [`Frame`] of flat-colored triangles in canvas pixels;
//! [`RenderState`] maps it to the viewport and draws it in one pass.

pub mod frame;
pub mod palette;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::Frame;
pub use pipeline::{RenderError, RenderState, canvas_to_game, game_to_ndc};
pub use vertex::Vertex;
