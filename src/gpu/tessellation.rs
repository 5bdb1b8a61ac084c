use crate::gpu::vertex::{Mesh, Vertex};
use crate::scene::{Color, PathCommand, PathShape};
use lyon::geom::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, StrokeOptions, StrokeTessellator,
    StrokeVertex, VertexBuffers,
};

/// Curve flattening tolerance in pixels
const TOLERANCE: f32 = 0.1;

/// Tessellator for converting vector paths to GPU-renderable triangles
pub struct Tessellator {
    fill_tessellator: FillTessellator,
    stroke_tessellator: StrokeTessellator,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Self {
            fill_tessellator: FillTessellator::new(),
            stroke_tessellator: StrokeTessellator::new(),
        }
    }

    /// Tessellate a shape into a mesh, fill below stroke
    pub fn tessellate_shape(&mut self, shape: &PathShape) -> Mesh {
        let mut mesh = Mesh::new();
        let path = build_path(&shape.commands);

        if let Some(fill) = shape.style.fill {
            if let Some(fill_mesh) = self.fill(&path, fill) {
                mesh.extend(fill_mesh);
            }
        }

        if let Some(stroke) = shape.style.stroke {
            if let Some(stroke_mesh) = self.stroke(&path, stroke.color, stroke.width) {
                mesh.extend(stroke_mesh);
            }
        }

        mesh
    }

    /// Tessellate shapes in paint order into a single mesh
    pub fn tessellate_shapes(&mut self, shapes: &[PathShape]) -> Mesh {
        let mut mesh = Mesh::new();
        for shape in shapes {
            mesh.extend(self.tessellate_shape(shape));
        }
        mesh
    }

    fn fill(&mut self, path: &Path, color: Color) -> Option<Mesh> {
        let mut buffers: VertexBuffers<Vertex, u32> = VertexBuffers::new();
        let color = color.premultiplied();

        let result = self.fill_tessellator.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                Vertex::new(vertex.position().to_array(), color)
            }),
        );

        finish(result.is_ok(), buffers)
    }

    fn stroke(&mut self, path: &Path, color: Color, width: f32) -> Option<Mesh> {
        let mut buffers: VertexBuffers<Vertex, u32> = VertexBuffers::new();
        let color = color.premultiplied();

        let result = self.stroke_tessellator.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut buffers, |vertex: StrokeVertex| {
                Vertex::new(vertex.position().to_array(), color)
            }),
        );

        finish(result.is_ok(), buffers)
    }
}

fn finish(ok: bool, buffers: VertexBuffers<Vertex, u32>) -> Option<Mesh> {
    if ok && !buffers.indices.is_empty() {
        Some(Mesh {
            vertices: buffers.vertices,
            indices: buffers.indices,
        })
    } else {
        None
    }
}

/// Convert path commands into a lyon path. Subpaths without an explicit
/// close are left open.
fn build_path(commands: &[PathCommand]) -> Path {
    let mut builder = Path::builder();
    let mut started = false;

    for cmd in commands {
        match cmd {
            PathCommand::MoveTo(p) => {
                if started {
                    builder.end(false);
                }
                builder.begin(point(p.x, p.y));
                started = true;
            }
            PathCommand::LineTo(p) => {
                if !started {
                    builder.begin(point(p.x, p.y));
                    started = true;
                } else {
                    builder.line_to(point(p.x, p.y));
                }
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                if !started {
                    builder.begin(point(ctrl1.x, ctrl1.y));
                    started = true;
                }
                builder.cubic_bezier_to(
                    point(ctrl1.x, ctrl1.y),
                    point(ctrl2.x, ctrl2.y),
                    point(to.x, to.y),
                );
            }
            PathCommand::Close => {
                if started {
                    builder.close();
                    started = false;
                }
            }
        }
    }

    if started {
        builder.end(false);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::{heart_path, pulse_path};
    use crate::scene::{ShapeStyle, StrokeStyle};

    #[test]
    fn test_tessellate_heart_fill_and_stroke() {
        let mut tessellator = Tessellator::new();
        let color = Color::from_rgb8(79, 70, 229);
        let heart = PathShape::new(
            heart_path(100.0, 100.0, 20.0),
            ShapeStyle::fill_and_stroke(color.with_alpha(0.4), StrokeStyle::new(color.with_alpha(0.6), 1.0)),
        );
        let fill_only = PathShape::new(
            heart_path(100.0, 100.0, 20.0),
            ShapeStyle {
                fill: Some(color.with_alpha(0.4)),
                stroke: None,
            },
        );

        let mesh = tessellator.tessellate_shape(&heart);
        let fill_mesh = tessellator.tessellate_shape(&fill_only);

        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0); // Should be triangles
        assert!(mesh.vertices.len() > fill_mesh.vertices.len());
    }

    #[test]
    fn test_tessellate_open_pulse_stroke() {
        let mut tessellator = Tessellator::new();
        let pulse = PathShape::new(
            pulse_path(0.0, 50.0, 100.0),
            ShapeStyle::stroke_only(StrokeStyle::new(Color::rgb(0.0, 0.0, 1.0).with_alpha(0.2), 2.0)),
        );

        let mesh = tessellator.tessellate_shape(&pulse);
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);

        // stroke stays near the waveform; joins may overshoot by the miter limit
        for v in &mesh.vertices {
            assert!(v.position[1] >= 10.0 - 5.0 && v.position[1] <= 90.0 + 5.0);
        }
    }

    #[test]
    fn test_vertex_colors_are_premultiplied() {
        let mut tessellator = Tessellator::new();
        let pulse = PathShape::new(
            pulse_path(0.0, 50.0, 100.0),
            ShapeStyle::stroke_only(StrokeStyle::new(Color::rgb(1.0, 1.0, 1.0).with_alpha(0.2), 2.0)),
        );
        let mesh = tessellator.tessellate_shape(&pulse);
        let c = mesh.vertices[0].color;
        assert!((c[0] - 0.2).abs() < 1e-6 && (c[3] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_tessellate_shapes_concatenates() {
        let mut tessellator = Tessellator::new();
        let style = ShapeStyle::stroke_only(StrokeStyle::new(Color::rgb(0.0, 0.0, 0.0), 1.0));
        let a = PathShape::new(pulse_path(0.0, 50.0, 100.0), style);
        let b = PathShape::new(pulse_path(200.0, 50.0, 100.0), style);

        let single = tessellator.tessellate_shape(&a);
        let both = tessellator.tessellate_shapes(&[a, b]);
        assert_eq!(both.vertices.len(), single.vertices.len() * 2);
        assert!(both.indices.iter().all(|&i| (i as usize) < both.vertices.len()));
    }
}
