//! # VOXSTREAM Game Loop
//!
//! One call to [`Engine::run_frame`] is one rendered frame:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. EDITS                                                            │
//! │    └─ Apply FrameInput edits in order, log rejections               │
//! │                                                                     │
//! │ 2. STREAM                                                           │
//! │    └─ Scheduler tick: recompute visibility OR generate one column   │
//! │                                                                     │
//! │ 3. MESH                                                             │
//! │    └─ Re-mesh dirty chunks, re-merge terrain if anything changed    │
//! │                                                                     │
//! │ 4. RENDER                                                           │
//! │    ├─ Upload merged terrain (only when rebuilt)                     │
//! │    └─ Submit resident chunk list                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the calling thread. The engine owns its settings;
//! there is no global state.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use voxstream_core::{Camera, ColumnCoord, FrameInput, VoxelResult, WorldSettings};
use voxstream_procedural::{
    BlockEditor, ChunkFactory, MeshBuilder, StreamingScheduler, TerrainMesh, TextureAtlas,
    TickOutcome, World,
};

use crate::render::Renderer;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Maximum allowed frame time before warning.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Timing and work done by one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Edit application time in microseconds.
    pub edit_us: u64,
    /// Scheduler tick time in microseconds.
    pub stream_us: u64,
    /// Meshing and merge time in microseconds.
    pub mesh_us: u64,
    /// Renderer submission time in microseconds.
    pub render_us: u64,
    /// Edits that succeeded.
    pub edits_applied: u32,
    /// Edits that were rejected.
    pub edits_rejected: u32,
    /// Whether the scheduler recomputed visibility this frame.
    pub recomputed: bool,
    /// Column made resident this frame.
    pub generated: Option<ColumnCoord>,
    /// Whether the merged terrain was rebuilt and uploaded.
    pub uploaded: bool,
    /// Bytes handed to the renderer this frame.
    pub upload_bytes: usize,
    /// Vertices in the merged terrain.
    pub vertices: usize,
    /// Chunks submitted for drawing.
    pub resident_chunks: usize,
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded the target frame time.
    pub frames_over_budget: u64,
    /// Columns generated.
    pub columns_generated: u64,
    /// Terrain uploads.
    pub uploads: u64,
    /// Bytes uploaded over all frames.
    pub upload_bytes: u64,
    /// Edits applied.
    pub edits_applied: u64,
    /// Edits rejected.
    pub edits_rejected: u64,
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            columns_generated: 0,
            uploads: 0,
            upload_bytes: 0,
            edits_applied: 0,
            edits_rejected: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: &FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        if stats.total_us > TARGET_FRAME_TIME.as_micros() as u64 {
            self.frames_over_budget += 1;
        }
        self.columns_generated += u64::from(stats.generated.is_some());
        self.uploads += u64::from(stats.uploaded);
        self.upload_bytes += stats.upload_bytes as u64;
        self.edits_applied += u64::from(stats.edits_applied);
        self.edits_rejected += u64::from(stats.edits_rejected);
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }
}

/// Owns the world and drives it one frame at a time.
pub struct Engine {
    settings: WorldSettings,
    factory: ChunkFactory,
    world: World,
    scheduler: StreamingScheduler,
    editor: BlockEditor,
    mesher: MeshBuilder,
    terrain: TerrainMesh,
    frame_count: u64,
    totals: FrameStatsAccumulator,
}

impl Engine {
    /// Creates an engine with the default texture atlas.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid; initialization stops there.
    pub fn new(settings: WorldSettings) -> VoxelResult<Self> {
        Self::with_atlas(settings, TextureAtlas::default())
    }

    /// Creates an engine with a custom texture atlas.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn with_atlas(settings: WorldSettings, atlas: TextureAtlas) -> VoxelResult<Self> {
        let factory = ChunkFactory::new(&settings)?;
        info!(
            "Engine ready: chunk_size={}, render_distance={}, seed={}",
            settings.chunk_size, settings.render_distance, settings.seed
        );

        Ok(Self {
            world: World::new(settings.chunk_size),
            scheduler: StreamingScheduler::new(&settings),
            editor: BlockEditor::new(settings.chunk_size),
            mesher: MeshBuilder::new(atlas),
            terrain: TerrainMesh::new(),
            factory,
            settings,
            frame_count: 0,
            totals: FrameStatsAccumulator::new(),
        })
    }

    /// Streams the whole current view in one go (spawn loading).
    ///
    /// Returns how many columns were made resident.
    pub fn preload(&mut self, camera: &Camera) -> usize {
        self.scheduler.recompute(camera, &mut self.world);
        let columns = self.scheduler.flush(&self.factory, &mut self.world);
        self.terrain.refresh(&self.mesher, self.world.store_mut());
        columns
    }

    /// Runs one frame.
    pub fn run_frame<R: Renderer>(
        &mut self,
        camera: &Camera,
        input: &FrameInput,
        renderer: &mut R,
    ) -> FrameStats {
        let frame_start = Instant::now();
        let mut stats = FrameStats {
            frame: input.frame,
            ..FrameStats::default()
        };

        // 1. Edits
        let start = Instant::now();
        for edit in &input.edits {
            match self.editor.apply(&mut self.world, edit) {
                Ok(()) => stats.edits_applied += 1,
                Err(e) => {
                    stats.edits_rejected += 1;
                    debug!("Frame {}: edit at {} {:?} rejected: {e}", input.frame, edit.chunk, edit.local);
                }
            }
        }
        stats.edit_us = elapsed_us(start);

        // 2. Stream
        let start = Instant::now();
        match self.scheduler.tick(camera, &self.factory, &mut self.world) {
            TickOutcome::Recomputed(_) => stats.recomputed = true,
            TickOutcome::Generated { column, .. } => stats.generated = Some(column),
            TickOutcome::Skipped(_) => {}
        }
        stats.stream_us = elapsed_us(start);

        // 3. Mesh
        let start = Instant::now();
        stats.uploaded = self.terrain.refresh(&self.mesher, self.world.store_mut());
        stats.mesh_us = elapsed_us(start);

        // 4. Render
        let start = Instant::now();
        if stats.uploaded {
            renderer.upload_terrain(self.terrain.vertices());
            stats.upload_bytes = self.terrain.as_bytes().len();
        }
        let resident = self.world.resident_coords();
        renderer.draw(&resident);
        stats.render_us = elapsed_us(start);

        stats.vertices = self.terrain.vertex_count();
        stats.resident_chunks = resident.len();
        stats.total_us = elapsed_us(frame_start);

        if stats.total_us > MAX_FRAME_TIME.as_micros() as u64 {
            warn!(
                "Frame {} exceeded budget: {:.2}ms (target: {:.2}ms)",
                input.frame,
                stats.total_us as f64 / 1000.0,
                TARGET_FRAME_TIME.as_micros() as f64 / 1000.0
            );
        }

        self.frame_count += 1;
        self.totals.record(&stats);
        stats
    }

    /// Frames run so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The settings the engine was built with.
    #[must_use]
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably (for edits outside the frame input).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The chunk factory.
    #[must_use]
    pub fn factory(&self) -> &ChunkFactory {
        &self.factory
    }

    /// The streaming scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &StreamingScheduler {
        &self.scheduler
    }

    /// The block editor.
    #[must_use]
    pub fn editor(&self) -> &BlockEditor {
        &self.editor
    }

    /// The merged terrain mesh.
    #[must_use]
    pub fn terrain(&self) -> &TerrainMesh {
        &self.terrain
    }

    /// Accumulated frame statistics.
    #[must_use]
    pub fn totals(&self) -> &FrameStatsAccumulator {
        &self.totals
    }
}

#[inline]
fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}
