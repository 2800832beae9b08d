//! Per-frame draw list
//!
//! Games append shapes in canvas pixel space; the pipeline uploads the
//! accumulated triangles in one draw call.

use glam::Vec2;

use super::palette::{self, Color};
use super::shapes;
use super::vertex::Vertex;

pub struct Frame {
    width: f32,
    height: f32,
    clear: Color,
    vertices: Vec<Vertex>,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            clear: palette::BACKGROUND,
            vertices: Vec::with_capacity(4096),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn clear_color(&self) -> Color {
        self.clear
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Set the clear color and fill the whole canvas with it
    pub fn background(&mut self, color: Color) {
        self.clear = color;
        self.rect(0.0, 0.0, self.width, self.height, color);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.vertices.extend(shapes::rect(x, y, w, h, color));
    }

    pub fn rect_centered(&mut self, center: Vec2, size: Vec2, color: Color) {
        let min = center - size * 0.5;
        self.rect(min.x, min.y, size.x, size.y, color);
    }

    pub fn rect_outline(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Color) {
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ];
        self.vertices.extend(shapes::outline(&corners, width, color));
    }

    pub fn rotated_rect(&mut self, center: Vec2, size: Vec2, angle: f32, color: Color) {
        self.vertices
            .extend(shapes::rotated_rect(center, size, angle, color));
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.vertices.extend(shapes::circle(
            center,
            radius,
            color,
            shapes::segments_for(radius),
        ));
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.vertices.extend(shapes::ring(
            center,
            (radius - width * 0.5).max(0.0),
            radius + width * 0.5,
            color,
            shapes::segments_for(radius),
        ));
    }

    pub fn pie(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.vertices.extend(shapes::pie(
            center,
            radius,
            start,
            end,
            color,
            shapes::segments_for(radius),
        ));
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        self.vertices.extend(shapes::line(a, b, width, color));
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.vertices.extend(shapes::triangle(a, b, c, color));
    }

    pub fn polygon(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(shapes::convex_polygon(points, color));
    }

    pub fn outline(&mut self, points: &[Vec2], width: f32, color: Color) {
        self.vertices.extend(shapes::outline(points, width, color));
    }

    pub fn number(&mut self, center: Vec2, value: u64, pixel: f32, color: Color) {
        self.vertices
            .extend(shapes::number(center, value, pixel, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_sets_clear_and_fills() {
        let mut frame = Frame::new(100.0, 50.0);
        frame.background(palette::RED);
        assert_eq!(frame.clear_color(), palette::RED);
        assert_eq!(frame.vertices().len(), 6);
    }

    #[test]
    fn test_shapes_accumulate() {
        let mut frame = Frame::new(100.0, 100.0);
        frame.rect(0.0, 0.0, 1.0, 1.0, palette::WHITE);
        frame.triangle(Vec2::ZERO, Vec2::X, Vec2::Y, palette::WHITE);
        assert_eq!(frame.vertices().len(), 9);
    }
}
