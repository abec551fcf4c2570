//! Shared fixtures for app integration tests.

use puzzle15_app::{Puzzle15Processor, PuzzleConfig};
use puzzle15_capture::{FrameSource, SyntheticFrameSource};
use puzzle15_core::{EMPTY_TILE, Frame, GRID_SIZE, TileBoard};

/// Side of the square fixture frame.
#[allow(dead_code)]
pub const FRAME_SIDE: u32 = 400;

/// Creates a seeded processor prepared for `FRAME_SIDE` square frames.
#[allow(dead_code)]
pub fn prepared_processor() -> Puzzle15Processor {
    let processor = Puzzle15Processor::new(&PuzzleConfig {
        seed: Some(2024),
        ..PuzzleConfig::default()
    });
    processor
        .set_frame_size(FRAME_SIDE, FRAME_SIDE)
        .expect("fixture size should be accepted");
    processor
}

/// Solved arrangement with the blank moved to `slot`.
#[allow(dead_code)]
pub fn board_with_empty_at(slot: usize) -> TileBoard {
    let mut tiles = *TileBoard::solved().tiles();
    tiles.swap(slot, EMPTY_TILE);
    TileBoard::from_tiles(tiles).expect("fixture permutation should be valid")
}

/// Pixel at the centre of `slot` in a `FRAME_SIDE` square frame.
#[allow(dead_code)]
pub fn slot_center(slot: usize) -> (i64, i64) {
    let cell = (FRAME_SIDE as usize / GRID_SIZE) as i64;
    let row = (slot / GRID_SIZE) as i64;
    let col = (slot % GRID_SIZE) as i64;
    (col * cell + cell / 2, row * cell + cell / 2)
}

/// Deterministic gradient frame of `FRAME_SIDE` square size.
#[allow(dead_code)]
pub fn fixture_frame() -> Frame {
    SyntheticFrameSource::new(FRAME_SIDE, FRAME_SIDE)
        .expect("fixture source should build")
        .next_frame(1_000)
        .expect("fixture frame should be produced")
}

/// Returns `true` when `a` and `b` are 4-neighbours on the grid.
#[allow(dead_code)]
pub fn are_neighbors(a: usize, b: usize) -> bool {
    let (row_a, col_a) = (a / GRID_SIZE, a % GRID_SIZE);
    let (row_b, col_b) = (b / GRID_SIZE, b % GRID_SIZE);
    row_a.abs_diff(row_b) + col_a.abs_diff(col_b) == 1
}
