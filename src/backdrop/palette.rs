use crate::config::BackdropConfig;
use crate::scene::{Color, PathShape, ShapeStyle, StrokeStyle};
use crate::theme::ThemeMode;

use super::geometry::{heart_path, pulse_path};
use super::shapes::Population;

/// Color family used to draw the backdrop in one display mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub base: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let base = match mode {
            // indigo-400
            ThemeMode::Dark => Color::from_rgb8(129, 140, 248),
            // indigo-700
            ThemeMode::Light => Color::from_rgb8(79, 70, 229),
        };
        Self { base }
    }

    pub fn heart_style(&self, opacity: f64, line_width: f32) -> ShapeStyle {
        let opacity = opacity as f32;
        ShapeStyle::fill_and_stroke(
            self.base.with_alpha(opacity),
            StrokeStyle::new(self.base.with_alpha(opacity * 1.5), line_width),
        )
    }

    pub fn pulse_style(&self, alpha: f32, line_width: f32) -> ShapeStyle {
        ShapeStyle::stroke_only(StrokeStyle::new(self.base.with_alpha(alpha), line_width))
    }
}

/// Vector paths for the current state of every shape, hearts first
pub fn frame_shapes(population: &Population, palette: &Palette, config: &BackdropConfig) -> Vec<PathShape> {
    let hearts = population.hearts.iter().map(|h| {
        PathShape::new(
            heart_path(h.x, h.y, h.size),
            palette.heart_style(h.opacity, config.heart_line_width),
        )
    });
    let pulses = population.pulses.iter().map(|p| {
        PathShape::new(
            pulse_path(p.x, p.y, config.pulse_width),
            palette.pulse_style(config.pulse_alpha, config.pulse_line_width),
        )
    });
    hearts.chain(pulses).collect()
}
