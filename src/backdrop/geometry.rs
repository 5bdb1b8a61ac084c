use crate::scene::{PathCommand, Vec2};

fn v(x: f64, y: f64) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}

/// Heart outline anchored at its top notch `(x, y)`.
///
/// Four cubic segments, mirrored about the vertical axis through `x`:
/// the shape spans `x - size/2 ..= x + size/2` and `y ..= y + size`.
pub fn heart_path(x: f64, y: f64, size: f64) -> Vec<PathCommand> {
    let half = size * 0.5;
    let notch = y + size * 0.3;

    vec![
        PathCommand::MoveTo(v(x, notch)),
        PathCommand::CubicTo {
            ctrl1: v(x, y),
            ctrl2: v(x - half, y),
            to: v(x - half, notch),
        },
        PathCommand::CubicTo {
            ctrl1: v(x - half, y + size * 0.6),
            ctrl2: v(x, y + size * 0.8),
            to: v(x, y + size),
        },
        PathCommand::CubicTo {
            ctrl1: v(x, y + size * 0.8),
            ctrl2: v(x + half, y + size * 0.6),
            to: v(x + half, notch),
        },
        PathCommand::CubicTo {
            ctrl1: v(x + half, y),
            ctrl2: v(x, y),
            to: v(x, notch),
        },
        PathCommand::Close,
    ]
}

/// Vertical offsets of the waveform peaks, as (fraction of width, dy)
const PULSE_WAVE: [(f64, f64); 7] = [
    (0.2, 0.0),
    (0.3, -20.0),
    (0.35, 20.0),
    (0.4, -40.0),
    (0.45, 40.0),
    (0.5, 0.0),
    (1.0, 0.0),
];

/// Open zig-zag heartbeat trace starting at `(x, y)` and `width` pixels long
pub fn pulse_path(x: f64, y: f64, width: f64) -> Vec<PathCommand> {
    std::iter::once(PathCommand::MoveTo(v(x, y)))
        .chain(
            PULSE_WAVE
                .iter()
                .map(|&(fx, dy)| PathCommand::LineTo(v(x + width * fx, y + dy))),
        )
        .collect()
}
