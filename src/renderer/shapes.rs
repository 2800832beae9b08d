//! Shape generation for 2D primitives
//!
//! Every builder returns a triangle list in canvas pixel space.

use glam::Vec2;
use std::f32::consts::PI;

use super::palette::Color;
use super::vertex::Vertex;

/// Segments used for circles of the given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(12, 64)
}

/// Axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> Vec<Vertex> {
    quad(
        Vec2::new(x, y),
        Vec2::new(x + w, y),
        Vec2::new(x + w, y + h),
        Vec2::new(x, y + h),
        color,
    )
}

/// Rectangle of size `size` centred at `center`, rotated by `angle`
pub fn rotated_rect(center: Vec2, size: Vec2, angle: f32, color: Color) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let half = size * 0.5;
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));
    quad(corners[0], corners[1], corners[2], corners[3], color)
}

/// Quad from four corners in winding order
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: Color) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Thick line segment
pub fn line(a: Vec2, b: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    quad(a + perp, b + perp, b - perp, a - perp, color)
}

/// Filled convex polygon (triangle fan from the first point)
pub fn convex_polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(points[0].x, points[0].y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Closed outline through the given points
pub fn outline(points: &[Vec2], width: f32, color: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 6);
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        vertices.extend(line(a, b, width, color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    pie(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Filled circular sector from `start` to `end` radians (Pac-Man's mouth)
pub fn pie(
    center: Vec2,
    radius: f32,
    start: f32,
    end: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let span = end - start;

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + inner_radius * Vec2::from_angle(theta1);
        let outer1 = center + outer_radius * Vec2::from_angle(theta1);
        let inner2 = center + inner_radius * Vec2::from_angle(theta2);
        let outer2 = center + outer_radius * Vec2::from_angle(theta2);

        vertices.extend(quad(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

/// 3x5 bitmap digits, one row per entry, high bit on the left
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Single digit glyph with its top-left at `origin`; `pixel` is the cell size
pub fn digit(origin: Vec2, value: u8, pixel: f32, color: Color) -> Vec<Vertex> {
    let Some(rows) = DIGITS.get(value as usize) else {
        return Vec::new();
    };
    let mut vertices = Vec::new();
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..3 {
            if bits & (0b100 >> col) != 0 {
                vertices.extend(rect(
                    origin.x + col as f32 * pixel,
                    origin.y + row as f32 * pixel,
                    pixel,
                    pixel,
                    color,
                ));
            }
        }
    }
    vertices
}

/// Decimal number centred at `center`
pub fn number(center: Vec2, value: u64, pixel: f32, color: Color) -> Vec<Vertex> {
    let text = value.to_string();
    let advance = pixel * 4.0;
    let width = advance * text.len() as f32 - pixel;
    let mut origin = center - Vec2::new(width * 0.5, pixel * 2.5);

    let mut vertices = Vec::new();
    for ch in text.bytes() {
        vertices.extend(digit(origin, ch - b'0', pixel, color));
        origin.x += advance;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::palette::WHITE;

    #[test]
    fn test_rect_is_two_triangles() {
        assert_eq!(rect(0.0, 0.0, 10.0, 10.0, WHITE).len(), 6);
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 10.0, WHITE, 16).len(), 48);
    }

    #[test]
    fn test_convex_polygon_fan() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(convex_polygon(&square, WHITE).len(), 6);
        assert!(convex_polygon(&square[..2], WHITE).is_empty());
    }

    #[test]
    fn test_digit_one_has_eight_pixels() {
        // "1" glyph lights 8 cells
        assert_eq!(digit(Vec2::ZERO, 1, 2.0, WHITE).len(), 8 * 6);
        assert!(digit(Vec2::ZERO, 12, 2.0, WHITE).is_empty());
    }

    #[test]
    fn test_number_is_centred() {
        let verts = number(Vec2::new(100.0, 100.0), 8, 2.0, WHITE);
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) * 0.5 - 100.0).abs() < 1e-3);
    }
}
