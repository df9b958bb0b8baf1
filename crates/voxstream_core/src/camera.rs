//! # Camera
//!
//! Read-only camera state handed to the streaming scheduler once per
//! recompute. The camera itself (input, matrices) lives outside the core.

use crate::config::WorldSettings;

/// Camera snapshot in world block units, `z` up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: [f32; 3],
    /// Normalized look direction.
    pub look: [f32; 3],
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    /// View distance in chunks.
    pub render_distance: u32,
}

impl Camera {
    /// Creates a camera using the field of view and render distance from `settings`.
    ///
    /// `look` is normalized here; a zero vector is kept as-is (the scheduler
    /// treats it as a degenerate orientation).
    #[must_use]
    pub fn new(settings: &WorldSettings, eye: [f32; 3], look: [f32; 3]) -> Self {
        Self {
            eye,
            look: normalize(look),
            fov_degrees: settings.fov_degrees,
            render_distance: settings.render_distance,
        }
    }

    /// Returns a copy looking along `look`.
    #[must_use]
    pub fn looking(mut self, look: [f32; 3]) -> Self {
        self.look = normalize(look);
        self
    }

    /// Returns a copy moved to `eye`.
    #[must_use]
    pub fn moved_to(mut self, eye: [f32; 3]) -> Self {
        self.eye = eye;
        self
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_is_normalized() {
        let camera = Camera::new(&WorldSettings::default(), [0.0, 0.0, 80.0], [3.0, 4.0, 0.0]);
        assert!((camera.look[0] - 0.6).abs() < 1e-6);
        assert!((camera.look[1] - 0.8).abs() < 1e-6);
        assert_eq!(camera.render_distance, 8);
    }

    #[test]
    fn test_zero_look_kept() {
        let camera = Camera::new(&WorldSettings::default(), [0.0; 3], [0.0; 3]);
        assert_eq!(camera.look, [0.0; 3]);
    }
}
