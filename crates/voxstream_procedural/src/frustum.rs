//! 2D visibility triangle for column streaming.
//!
//! The camera frustum is flattened onto the `x/y` plane (in chunk units)
//! as a triangle: apex near the eye, base spanning the field of view at
//! render distance. Column coordinates whose centers fall inside are
//! candidates for generation.

use voxstream_core::{Camera, ColumnCoord, MAX_CHUNK_COORD};

/// Horizontal look vectors shorter than this are degenerate.
const MIN_LOOK_LENGTH: f32 = 1e-4;

/// Visibility triangle in chunk units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum2D {
    /// Apex (the eye, pulled back by the near margin).
    pub eye: [f32; 2],
    /// Far corner on the counter-clockwise side of the look direction.
    pub left: [f32; 2],
    /// Far corner on the clockwise side of the look direction.
    pub right: [f32; 2],
}

impl Frustum2D {
    /// Creates a triangle from its corners.
    #[must_use]
    pub const fn new(eye: [f32; 2], left: [f32; 2], right: [f32; 2]) -> Self {
        Self { eye, left, right }
    }

    /// Flattens a camera into a triangle.
    ///
    /// `near_margin` pulls the apex back along the look direction so the
    /// columns around the eye are covered. Returns `None` for a degenerate
    /// orientation: vertical or zero look vector, a field of view outside
    /// `(0, 180)` degrees, or zero render distance.
    #[must_use]
    pub fn from_camera(camera: &Camera, chunk_size: u32, near_margin: f32) -> Option<Self> {
        let [lx, ly, _] = camera.look;
        let len = (lx * lx + ly * ly).sqrt();
        if !len.is_finite() || len < MIN_LOOK_LENGTH {
            return None;
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return None;
        }
        if camera.render_distance == 0 || chunk_size == 0 {
            return None;
        }

        let dir = [lx / len, ly / len];
        let size = chunk_size as f32;
        let eye = [camera.eye[0] / size, camera.eye[1] / size];
        let apex = [eye[0] - dir[0] * near_margin, eye[1] - dir[1] * near_margin];

        let reach = camera.render_distance as f32 + near_margin;
        let half = (camera.fov_degrees * 0.5).to_radians();
        let left_dir = rotate(dir, half);
        let right_dir = rotate(dir, -half);

        Some(Self {
            eye: apex,
            left: [apex[0] + left_dir[0] * reach, apex[1] + left_dir[1] * reach],
            right: [apex[0] + right_dir[0] * reach, apex[1] + right_dir[1] * reach],
        })
    }

    /// Point-in-triangle test via three edge cross-product signs.
    ///
    /// Points on an edge count as inside.
    #[must_use]
    pub fn contains(&self, p: [f32; 2]) -> bool {
        let d1 = edge_sign(p, self.eye, self.left);
        let d2 = edge_sign(p, self.left, self.right);
        let d3 = edge_sign(p, self.right, self.eye);

        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    /// Returns true if the column's center lies inside.
    #[must_use]
    pub fn contains_column(&self, column: ColumnCoord) -> bool {
        self.contains(column.center())
    }

    /// Integer bounding box `(min_x, min_y, max_x, max_y)` of the triangle,
    /// clamped to `±`[`MAX_CHUNK_COORD`].
    #[must_use]
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let xs = [self.eye[0], self.left[0], self.right[0]];
        let ys = [self.eye[1], self.left[1], self.right[1]];
        let min = |v: [f32; 3]| v.iter().copied().fold(f32::INFINITY, f32::min);
        let max = |v: [f32; 3]| v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let clamp = |v: f32| (v as i32).clamp(-MAX_CHUNK_COORD, MAX_CHUNK_COORD);
        (
            clamp(min(xs).floor()),
            clamp(min(ys).floor()),
            clamp(max(xs).ceil()),
            clamp(max(ys).ceil()),
        )
    }

    /// Every column whose center is inside, in row-major order.
    #[must_use]
    pub fn columns(&self) -> Vec<ColumnCoord> {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        let mut out = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let column = ColumnCoord::new(x, y);
                if self.contains_column(column) {
                    out.push(column);
                }
            }
        }
        out
    }

}

#[inline]
fn edge_sign(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (p[0] - b[0]) * (a[1] - b[1]) - (a[0] - b[0]) * (p[1] - b[1])
}

#[inline]
fn rotate(v: [f32; 2], angle: f32) -> [f32; 2] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos]
}
