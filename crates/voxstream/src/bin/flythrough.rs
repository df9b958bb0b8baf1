//! # Flythrough
//!
//! Headless scripted run: a camera orbits the spawn point, the scheduler
//! streams columns in and out, a few blocks are placed and removed along
//! the way, and a summary is printed at the end.
//!
//! Usage: `flythrough [settings.toml] [frames]`
//!
//! Log level comes from `RUST_LOG` (e.g. `RUST_LOG=voxstream=debug`).

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use voxstream::core::{
    BlockEdit, BlockType, Camera, ChunkCoord, FrameInput, LocalCoord, WorldSettings,
};
use voxstream::{Engine, NullRenderer};

/// Frames to run without an explicit count.
const DEFAULT_FRAMES: u64 = 600;

/// Orbit radius in blocks.
const ORBIT_RADIUS: f32 = 96.0;

/// Radians per frame.
const ORBIT_SPEED: f32 = 0.01;

/// Eye height in blocks.
const EYE_HEIGHT: f32 = 120.0;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match WorldSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("✗ Failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => WorldSettings::default(),
    };
    let frames = args
        .next()
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut engine = match Engine::new(settings.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("✗ Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut renderer = NullRenderer::default();

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    VOXSTREAM FLYTHROUGH");
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  chunk_size:      {}", settings.chunk_size);
    println!("  render_distance: {}", settings.render_distance);
    println!("  seed:            {}", settings.seed);
    println!("  frames:          {frames}");
    println!();

    let spawn = orbit_camera(&settings, 0);
    let preloaded = engine.preload(&spawn);
    println!("🏗️  Preloaded {preloaded} columns around spawn");

    let edit_target = spawn_surface_chunk(&engine);

    for frame in 0..frames {
        let camera = orbit_camera(&settings, frame);
        let mut input = FrameInput::new(frame, 1.0 / 60.0);
        if let Some(chunk) = edit_target {
            input = scripted_edits(input, frame, chunk);
        }
        engine.run_frame(&camera, &input, &mut renderer);
    }

    let totals = engine.totals();
    let streaming = engine.scheduler().stats();
    let world = engine.world();

    println!();
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                           SUMMARY");
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Frames:            {}", totals.frames_recorded);
    println!("  Avg frame:         {:.3}ms", totals.avg_frame_ms());
    println!("  Max frame:         {:.3}ms", totals.max_frame_us as f64 / 1000.0);
    println!("  Over budget:       {}", totals.frames_over_budget);
    println!("  Recomputes:        {}", streaming.recomputes);
    println!("  Columns generated: {}", streaming.columns_generated);
    println!("  Chunks evicted:    {}", streaming.chunks_evicted);
    println!("  Chunks parked:     {}", streaming.chunks_parked);
    println!("  Chunks restored:   {}", streaming.chunks_restored);
    println!("  Edits applied:     {}", totals.edits_applied);
    println!("  Edits rejected:    {}", totals.edits_rejected);
    println!("  Resident chunks:   {}", world.store().len());
    println!("  Edited chunks:     {}", world.edits().edited_len());
    println!("  Terrain vertices:  {}", engine.terrain().vertex_count());
    println!("  Terrain uploads:   {}", renderer.uploads);
    println!("  Bytes uploaded:    {}", totals.upload_bytes);
    println!("═══════════════════════════════════════════════════════════════════");

    ExitCode::SUCCESS
}

/// Camera circling the origin, looking along the orbit tangent.
fn orbit_camera(settings: &WorldSettings, frame: u64) -> Camera {
    let angle = frame as f32 * ORBIT_SPEED;
    let (sin, cos) = angle.sin_cos();
    Camera::new(
        settings,
        [ORBIT_RADIUS * cos, ORBIT_RADIUS * sin, EYE_HEIGHT],
        [-sin, cos, -0.2],
    )
}

/// Topmost resident chunk of the spawn column.
fn spawn_surface_chunk(engine: &Engine) -> Option<ChunkCoord> {
    let spawn = ChunkCoord::from_block_pos(ORBIT_RADIUS as i32, 0, 0, engine.settings().chunk_size);
    engine
        .world()
        .store()
        .column_chunks(spawn.column())
        .last()
        .copied()
}

/// A pillar goes up early, its middle block is knocked out later.
fn scripted_edits(input: FrameInput, frame: u64, chunk: ChunkCoord) -> FrameInput {
    match frame {
        10 => input
            .with_edit(BlockEdit::place(chunk, LocalCoord::new(1, 1, 0), BlockType::Wood, true))
            .with_edit(BlockEdit::place(chunk, LocalCoord::new(1, 1, 1), BlockType::Wood, true))
            .with_edit(BlockEdit::place(chunk, LocalCoord::new(1, 1, 2), BlockType::Leaves, false)),
        20 => input.with_edit(BlockEdit::remove(chunk, LocalCoord::new(1, 1, 1))),
        // Rejected: out of bounds
        30 => input.with_edit(BlockEdit::remove(chunk, LocalCoord::new(-1, 0, 0))),
        _ => input,
    }
}
