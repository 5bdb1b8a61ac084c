use super::types::{ShapeStyle, Vec2};

/// Path command for arbitrary vector paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

/// A styled vector path in viewport coordinates, ready for tessellation
#[derive(Clone, Debug, PartialEq)]
pub struct PathShape {
    pub commands: Vec<PathCommand>,
    pub style: ShapeStyle,
}

impl PathShape {
    pub fn new(commands: Vec<PathCommand>, style: ShapeStyle) -> Self {
        Self { commands, style }
    }
}
