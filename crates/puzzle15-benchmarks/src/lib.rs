#![warn(missing_docs)]
//! # puzzle15-benchmarks
//!
//! Shared workloads for the render-loop smoke benchmarks in `tests/`.

use puzzle15_capture::{CaptureError, FrameSource, SyntheticFrameSource};
use puzzle15_core::{Frame, TileBoard};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Pre-captured frames plus a shuffled board for repeatable timing loops.
#[derive(Debug, Clone)]
pub struct RenderWorkload {
    /// Input frames, all of one size.
    pub frames: Vec<Frame>,
    /// Arrangement applied to every frame.
    pub board: TileBoard,
}

/// Builds `count` synthetic frames of `width x height` and a seeded board.
///
/// # Errors
/// Returns [`CaptureError`] when the geometry cannot hold the grid.
pub fn render_workload(
    width: u32,
    height: u32,
    count: usize,
    seed: u64,
) -> Result<RenderWorkload, CaptureError> {
    let source = SyntheticFrameSource::new(width, height)?;
    let frames = (0..count as u64)
        .map(|index| source.next_frame(index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut board = TileBoard::solved();
    board.new_game(&mut StdRng::seed_from_u64(seed));

    Ok(RenderWorkload { frames, board })
}
