//! Renderer collaborator interface.
//!
//! The frame driver hands over plain vertex data and a draw list; GPU
//! buffers, shaders and the window live behind this trait.

use voxstream_core::ChunkCoord;
use voxstream_procedural::Vertex;

/// Receives terrain geometry and draw submissions.
pub trait Renderer {
    /// Replaces the terrain vertex buffer.
    ///
    /// Interleaved `[x, y, z, u, v]`, triangle list, world-space positions.
    /// Called only on frames where the merged buffer was rebuilt.
    fn upload_terrain(&mut self, vertices: &[Vertex]);

    /// Draws the resident chunks.
    fn draw(&mut self, resident: &[ChunkCoord]);
}

/// Renderer that only counts what it receives.
#[derive(Clone, Debug, Default)]
pub struct NullRenderer {
    /// Number of terrain uploads.
    pub uploads: u64,
    /// Bytes received by the last upload.
    pub last_upload_bytes: usize,
    /// Number of draw submissions.
    pub draws: u64,
    /// Chunks in the last draw list.
    pub last_draw_len: usize,
}

impl Renderer for NullRenderer {
    fn upload_terrain(&mut self, vertices: &[Vertex]) {
        self.uploads += 1;
        self.last_upload_bytes = bytemuck::cast_slice::<Vertex, u8>(vertices).len();
    }

    fn draw(&mut self, resident: &[ChunkCoord]) {
        self.draws += 1;
        self.last_draw_len = resident.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_renderer_counts() {
        let mut renderer = NullRenderer::default();
        renderer.upload_terrain(&[Vertex::default(); 6]);
        renderer.draw(&[ChunkCoord::default()]);

        assert_eq!(renderer.uploads, 1);
        assert_eq!(renderer.last_upload_bytes, 6 * 20);
        assert_eq!(renderer.draws, 1);
        assert_eq!(renderer.last_draw_len, 1);
    }
}
