//! Color helpers and shared colors
//!
//! The swapchain is configured with a non-sRGB format, so these helpers
//! return gamma-encoded sRGB components that pass through unchanged.

pub type Color = [f32; 4];

/// `#rrggbb` as a color
pub const fn hex(rgb: u32) -> Color {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub const fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// CSS-style `hsl(h, s%, l%)`, with `s` and `l` in 0..=1
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 360.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;
    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m, 1.0]
}

/// CSS `oklch(L C H)` to gamma-encoded sRGB (clamped to gamut)
pub fn oklch(lightness: f32, chroma: f32, hue_degrees: f32) -> Color {
    let h = hue_degrees.to_radians();
    let a = chroma * h.cos();
    let b = chroma * h.sin();

    let l_ = lightness + 0.396_337_78 * a + 0.215_803_76 * b;
    let m_ = lightness - 0.105_561_346 * a - 0.063_854_17 * b;
    let s_ = lightness - 0.089_484_18 * a - 1.291_485_5 * b;

    let (l, m, s) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.076_741_7 * l - 3.307_711_6 * m + 0.230_969_94 * s;
    let g = -1.268_438 * l + 2.609_757_4 * m - 0.341_319_38 * s;
    let bl = -0.004_196_086_3 * l - 0.703_418_6 * m + 1.707_614_7 * s;

    [encode(r), encode(g), encode(bl), 1.0]
}

fn encode(linear: f32) -> f32 {
    let c = linear.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

pub const BACKGROUND: Color = hex(0x0a0a0f);
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const RED: Color = hex(0xef4444);
pub const ORANGE: Color = hex(0xf97316);
pub const YELLOW: Color = hex(0xfacc15);
pub const GREEN: Color = hex(0x22c55e);
pub const CYAN: Color = hex(0x22d3ee);
pub const BLUE: Color = hex(0x3b82f6);
pub const PURPLE: Color = hex(0xa855f7);
pub const PINK: Color = hex(0xec4899);
pub const BROWN: Color = hex(0x92400e);
pub const GRAY: Color = hex(0x6b7280);
pub const DARK_GRAY: Color = hex(0x1f2937);

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn test_hex() {
        assert!(close(hex(0xff0000), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hex(0x00ff00), [0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsl(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl(240.0, 1.0, 0.5), [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_oklch_white_and_black() {
        assert!(close(oklch(1.0, 0.0, 0.0), WHITE));
        assert!(close(oklch(0.0, 0.0, 0.0), BLACK));
    }
}
