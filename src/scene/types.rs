use bytemuck::{Pod, Zeroable};
pub use glam::Vec2;

/// RGBA color with f32 components (0.0 - 1.0), straight (not premultiplied) alpha
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from 8-bit channels, like CSS `rgb(r, g, b)`
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Same color with a different alpha, clamped to [0, 1]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Channels multiplied by alpha, as expected by premultiplied blending
    pub fn premultiplied(&self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }
}

/// Stroke styling for path outlines
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Complete styling for a shape (fill and/or stroke)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
}

impl ShapeStyle {
    pub fn stroke_only(stroke: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }

    pub fn fill_and_stroke(fill: Color, stroke: StrokeStyle) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8() {
        let indigo = Color::from_rgb8(79, 70, 229);
        assert!((indigo.r - 79.0 / 255.0).abs() < 1e-6);
        assert_eq!(indigo.a, 1.0);
    }

    #[test]
    fn test_with_alpha_clamps() {
        let c = Color::rgb(1.0, 0.0, 0.0);
        assert_eq!(c.with_alpha(0.9 * 1.5).a, 1.0);
        assert_eq!(c.with_alpha(-0.5).a, 0.0);
    }

    #[test]
    fn test_premultiplied() {
        let c = Color::rgb(1.0, 0.5, 0.0).with_alpha(0.5);
        assert_eq!(c.premultiplied(), [0.5, 0.25, 0.0, 0.5]);
    }
}
