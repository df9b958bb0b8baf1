//! # Streaming Scheduler
//!
//! Decides, frame by frame, which chunk columns to generate and which to
//! discard.
//!
//! ## State machine
//!
//! - **Idle**: nothing pending. The next tick recomputes the visibility
//!   triangle, rebuilds the pending list nearest-first and evicts columns
//!   that left view.
//! - **Generating**: every tick pops one column, restores its parked
//!   edits, generates the rest and makes it resident. Back to idle when
//!   the list drains.
//!
//! Generation is amortized to one column per tick so a wide frustum never
//! stalls a frame. A degenerate camera yields no candidates and keeps the
//! scheduler idle.

use std::collections::VecDeque;

use tracing::{debug, info, trace};
use voxstream_core::{Camera, ColumnCoord, WorldSettings};

use crate::frustum::Frustum2D;
use crate::generator::ChunkFactory;
use crate::world::World;

/// Scheduler phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// No pending columns.
    #[default]
    Idle,
    /// Working through the pending list.
    Generating,
}

/// Outcome of one visibility recompute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Columns queued for generation.
    pub candidates: usize,
    /// Columns removed from view.
    pub evicted_columns: usize,
    /// Unedited chunks dropped.
    pub dropped: usize,
    /// Edited chunks moved into the edit cache.
    pub parked: usize,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Recomputed visibility; no column was generated this tick.
    Recomputed(RecomputeReport),
    /// Made one column resident.
    Generated {
        /// The column.
        column: ColumnCoord,
        /// Chunks freshly generated.
        generated: usize,
        /// Chunks restored from the edit cache.
        restored: usize,
    },
    /// Popped a column that was already resident.
    Skipped(ColumnCoord),
}

/// Running totals over the scheduler's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Visibility recomputes.
    pub recomputes: u64,
    /// Columns made resident.
    pub columns_generated: u64,
    /// Chunks freshly generated.
    pub chunks_generated: u64,
    /// Chunks restored from the edit cache.
    pub chunks_restored: u64,
    /// Chunks dropped by eviction.
    pub chunks_evicted: u64,
    /// Edited chunks parked by eviction.
    pub chunks_parked: u64,
}

/// Frustum-driven column scheduler.
#[derive(Clone, Debug)]
pub struct StreamingScheduler {
    state: SchedulerState,
    pending: VecDeque<ColumnCoord>,
    chunk_size: u32,
    near_margin: f32,
    stats: StreamingStats,
}

impl StreamingScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            state: SchedulerState::Idle,
            pending: VecDeque::new(),
            chunk_size: settings.chunk_size,
            near_margin: settings.near_margin,
            stats: StreamingStats::default(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    /// Pending columns, next first.
    pub fn pending(&self) -> impl Iterator<Item = ColumnCoord> + '_ {
        self.pending.iter().copied()
    }

    /// Number of pending columns.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Lifetime totals.
    #[must_use]
    pub const fn stats(&self) -> StreamingStats {
        self.stats
    }

    /// Runs one step of the state machine.
    pub fn tick(&mut self, camera: &Camera, factory: &ChunkFactory, world: &mut World) -> TickOutcome {
        if self.pending.is_empty() {
            return TickOutcome::Recomputed(self.recompute(camera, world));
        }

        let outcome = match self.pending.pop_front() {
            Some(column) => self.generate_column(column, factory, world),
            None => TickOutcome::Recomputed(RecomputeReport::default()),
        };
        if self.pending.is_empty() {
            self.state = SchedulerState::Idle;
        }
        outcome
    }

    /// Rebuilds the pending list from the camera and evicts columns out of view.
    ///
    /// The new list replaces the old one. A degenerate camera queues
    /// nothing and evicts nothing.
    pub fn recompute(&mut self, camera: &Camera, world: &mut World) -> RecomputeReport {
        self.stats.recomputes += 1;
        self.pending.clear();
        self.state = SchedulerState::Idle;

        let Some(frustum) = Frustum2D::from_camera(camera, self.chunk_size, self.near_margin) else {
            trace!("Degenerate camera, staying idle");
            return RecomputeReport::default();
        };

        let size = self.chunk_size as f32;
        let eye = [camera.eye[0] / size, camera.eye[1] / size];

        let mut candidates: Vec<ColumnCoord> = frustum
            .columns()
            .into_iter()
            .filter(|column| !world.is_column_resident(*column))
            .collect();
        candidates.sort_by(|a, b| {
            distance_sq(eye, *a)
                .total_cmp(&distance_sq(eye, *b))
                .then_with(|| (a.x, a.y).cmp(&(b.x, b.y)))
        });

        let stale: Vec<ColumnCoord> = world
            .store()
            .columns()
            .filter(|column| !frustum.contains_column(*column))
            .collect();

        let mut report = RecomputeReport {
            candidates: candidates.len(),
            evicted_columns: stale.len(),
            ..RecomputeReport::default()
        };
        for column in stale {
            let eviction = world.evict_column(column);
            report.dropped += eviction.dropped;
            report.parked += eviction.parked;
        }
        self.stats.chunks_evicted += report.dropped as u64;
        self.stats.chunks_parked += report.parked as u64;

        self.pending.extend(candidates);
        if !self.pending.is_empty() {
            self.state = SchedulerState::Generating;
        }

        debug!(
            "Recompute: {} candidates, {} columns evicted ({} chunks parked)",
            report.candidates, report.evicted_columns, report.parked
        );
        report
    }

    /// Generates every pending column now. Returns how many were made resident.
    pub fn flush(&mut self, factory: &ChunkFactory, world: &mut World) -> usize {
        let mut made = 0;
        while let Some(column) = self.pending.pop_front() {
            if matches!(
                self.generate_column(column, factory, world),
                TickOutcome::Generated { .. }
            ) {
                made += 1;
            }
        }
        self.state = SchedulerState::Idle;
        if made > 0 {
            info!("Flushed {made} columns");
        }
        made
    }

    fn generate_column(
        &mut self,
        column: ColumnCoord,
        factory: &ChunkFactory,
        world: &mut World,
    ) -> TickOutcome {
        if world.is_column_resident(column) {
            return TickOutcome::Skipped(column);
        }

        // Parked edits win over fresh terrain
        let restored = world.restore_column(column);
        let mut generated = 0;
        for chunk in factory.make_chunk_column(column).chunks {
            if world.insert(chunk) {
                generated += 1;
            }
        }

        self.stats.columns_generated += 1;
        self.stats.chunks_generated += generated as u64;
        self.stats.chunks_restored += restored as u64;
        trace!("Column {column}: {generated} generated, {restored} restored");

        TickOutcome::Generated {
            column,
            generated,
            restored,
        }
    }
}

#[inline]
fn distance_sq(eye: [f32; 2], column: ColumnCoord) -> f32 {
    let [cx, cy] = column.center();
    let (dx, dy) = (cx - eye[0], cy - eye[1]);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (WorldSettings, ChunkFactory, World, StreamingScheduler) {
        let settings = WorldSettings {
            chunk_size: 8,
            render_distance: 3,
            ..WorldSettings::default()
        };
        let factory = ChunkFactory::new(&settings).unwrap();
        let world = World::new(settings.chunk_size);
        let scheduler = StreamingScheduler::new(&settings);
        (settings, factory, world, scheduler)
    }

    #[test]
    fn test_first_tick_recomputes() {
        let (settings, factory, mut world, mut scheduler) = setup();
        let camera = Camera::new(&settings, [4.0, 4.0, 90.0], [1.0, 0.0, 0.0]);

        match scheduler.tick(&camera, &factory, &mut world) {
            TickOutcome::Recomputed(report) => assert!(report.candidates > 0),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(scheduler.state(), SchedulerState::Generating);
        assert!(world.store().is_empty(), "no generation on the recompute frame");
    }

    #[test]
    fn test_pending_sorted_nearest_first() {
        let (settings, _factory, mut world, mut scheduler) = setup();
        let camera = Camera::new(&settings, [4.0, 4.0, 90.0], [0.0, 1.0, 0.0]);
        scheduler.recompute(&camera, &mut world);

        let eye = [0.5, 0.5];
        let distances: Vec<f32> = scheduler.pending().map(|c| distance_sq(eye, c)).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scheduler.pending().next(), Some(ColumnCoord::new(0, 0)));
    }

    #[test]
    fn test_one_column_per_tick() {
        let (settings, factory, mut world, mut scheduler) = setup();
        let camera = Camera::new(&settings, [4.0, 4.0, 90.0], [1.0, 1.0, 0.0]);
        scheduler.tick(&camera, &factory, &mut world);
        let queued = scheduler.pending_len();

        scheduler.tick(&camera, &factory, &mut world);
        assert_eq!(world.store().column_count(), 1);
        assert_eq!(scheduler.pending_len(), queued - 1);
    }

    #[test]
    fn test_degenerate_camera_idles() {
        let (settings, factory, mut world, mut scheduler) = setup();
        let camera = Camera::new(&settings, [0.0, 0.0, 90.0], [0.0, 0.0, -1.0]);

        for _ in 0..3 {
            let outcome = scheduler.tick(&camera, &factory, &mut world);
            assert_eq!(outcome, TickOutcome::Recomputed(RecomputeReport::default()));
            assert!(scheduler.is_idle());
        }
        assert!(world.store().is_empty());
    }

    #[test]
    fn test_flush_drains() {
        let (settings, factory, mut world, mut scheduler) = setup();
        let camera = Camera::new(&settings, [4.0, 4.0, 90.0], [1.0, 0.0, 0.0]);
        let report = scheduler.recompute(&camera, &mut world);

        assert_eq!(scheduler.flush(&factory, &mut world), report.candidates);
        assert!(scheduler.is_idle());
        assert_eq!(world.store().column_count(), report.candidates);
        assert_eq!(scheduler.stats().columns_generated, report.candidates as u64);
    }
}
