//! CPU-side line geometry.
//!
//! Consecutive vertex pairs form independent segments (GL_LINES layout).

use glam::Vec3;

use crate::grid::GridPlane;

/// Line-segment soup: every two vertices make one segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineList {
    pub vertices: Vec<Vec3>,
}

impl LineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, a: Vec3, b: Vec3) {
        self.vertices.push(a);
        self.vertices.push(b);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flatten to interleaved [x, y, z] floats for GPU upload.
    pub fn to_floats(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            out.extend_from_slice(&[v.x, v.y, v.z]);
        }
        out
    }
}

/// Generate grid lines for one coordinate plane.
///
/// The grid spans [-size/2, size/2] along both in-plane axes and is cut
/// into `subdivisions` cells per axis, so each axis gets `subdivisions + 1`
/// lines. The out-of-plane coordinate is 0 for every vertex, giving exactly
/// `4 * (subdivisions + 1)` vertices.
pub fn grid_lines(plane: GridPlane, size: f32, subdivisions: u32) -> LineList {
    let mut lines = LineList::new();

    let half = size / 2.0;
    // subdivisions == 0 is accepted as degenerate: one zero-offset pair of
    // lines rather than a NaN from the division.
    let cell = if subdivisions == 0 {
        0.0
    } else {
        size / subdivisions as f32
    };

    for i in 0..=subdivisions {
        let offset = -half + i as f32 * cell;
        match plane {
            GridPlane::Xy => {
                // Parallel to X, stepped along Y; then parallel to Y, stepped along X.
                lines.push_line(Vec3::new(-half, offset, 0.0), Vec3::new(half, offset, 0.0));
                lines.push_line(Vec3::new(offset, -half, 0.0), Vec3::new(offset, half, 0.0));
            }
            GridPlane::Yz => {
                lines.push_line(Vec3::new(0.0, -half, offset), Vec3::new(0.0, half, offset));
                lines.push_line(Vec3::new(0.0, offset, -half), Vec3::new(0.0, offset, half));
            }
            GridPlane::Zx => {
                lines.push_line(Vec3::new(-half, 0.0, offset), Vec3::new(half, 0.0, offset));
                lines.push_line(Vec3::new(offset, 0.0, -half), Vec3::new(offset, 0.0, half));
            }
        }
    }

    lines
}
