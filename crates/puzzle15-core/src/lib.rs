#![warn(missing_docs)]
//! # puzzle15-core
//!
//! ## Purpose
//! Defines the pure data model used across the `puzzle15` workspace.
//!
//! ## Responsibilities
//! - Represent RGBA frames delivered by the camera collaborator.
//! - Partition a frame into the fixed 4x4 grid of cell rectangles.
//! - Own the tile permutation, its solvability parity, shuffling, and the
//!   slide-into-empty move.
//!
//! ## Data flow
//! Frame source emits [`Frame`] values -> [`grid_cells`] yields the cell
//! layout shared by input and output buffers -> [`TileBoard`] decides which
//! input cell lands in which output slot.
//!
//! ## Ownership and lifetimes
//! Frames own their backing buffers (`Vec<u8>`). [`TileBoard`] is a plain
//! `Copy` array so snapshots can leave a lock guard without borrowing it.
//!
//! ## Error model
//! Shape and permutation validation failures return [`CoreError`].
//!
//! ## Example
//! ```rust
//! use puzzle15_core::{GRID_AREA, TileBoard};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut board = TileBoard::solved();
//! board.new_game(&mut StdRng::seed_from_u64(7));
//! assert!(board.is_solvable());
//! assert_eq!(board.tiles().len(), GRID_AREA);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells along one side of the puzzle grid.
pub const GRID_SIZE: usize = 4;

/// Total number of slots (and tile identities) in the grid.
pub const GRID_AREA: usize = GRID_SIZE * GRID_SIZE;

/// Tile identity reserved for the blank cell.
pub const EMPTY_TILE: usize = GRID_AREA - 1;

/// One RGBA8 color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Builds a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
}

/// Represents one captured camera frame.
///
/// Fields are public for cheap reads; build through [`Frame::new`] so the
/// buffer length matches the geometry. Consumers that accept frames from
/// elsewhere re-check the length before indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Capture time in Unix epoch milliseconds.
    pub captured_at_ms: u64,
    /// Raw RGBA pixel buffer (`width * height * 4` bytes, no row padding).
    pub rgba: Vec<u8>,
}

impl Frame {
    /// Constructs a validated frame.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidFrameShape`] when the pixel buffer length is
    /// not exactly `width * height * 4`.
    pub fn new(
        width: u32,
        height: u32,
        captured_at_ms: u64,
        rgba: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let expected_len = required_rgba_len(width, height)?;
        if rgba.len() != expected_len {
            return Err(CoreError::InvalidFrameShape {
                expected: expected_len,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            width,
            height,
            captured_at_ms,
            rgba,
        })
    }

    /// Allocates a frame with every pixel set to `color`.
    ///
    /// # Errors
    /// Returns [`CoreError::Overflow`] when the buffer size cannot be computed.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, CoreError> {
        let len = required_rgba_len(width, height)?;
        let mut rgba = vec![0_u8; len];
        for pixel in rgba.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color.0);
        }

        Ok(Self {
            width,
            height,
            captured_at_ms: 0,
            rgba,
        })
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the frame or its buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut channels = [0_u8; 4];
        channels.copy_from_slice(self.rgba.get(offset..offset + 4)?);
        Some(Rgba(channels))
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Axis-aligned pixel rectangle of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CellRect {
    /// Returns `true` when `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Pixel count covered by the rectangle.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Partitions a `width x height` frame into [`GRID_AREA`] row-major cells.
///
/// Cell `k = row * GRID_SIZE + col` spans rows
/// `row * height / GRID_SIZE .. (row + 1) * height / GRID_SIZE` and the
/// matching column range, so the integer-division remainder is spread by
/// the floor arithmetic and the last row/column always end on the frame edge.
///
/// # Errors
/// Returns [`CoreError::InvalidFrameSize`] when either dimension is smaller
/// than [`GRID_SIZE`].
pub fn grid_cells(width: u32, height: u32) -> Result<[CellRect; GRID_AREA], CoreError> {
    if (width as usize) < GRID_SIZE || (height as usize) < GRID_SIZE {
        return Err(CoreError::InvalidFrameSize { width, height });
    }

    let mut cells = [CellRect::default(); GRID_AREA];
    for row in 0..GRID_SIZE {
        let top = grid_line(height, row);
        let bottom = grid_line(height, row + 1);
        for col in 0..GRID_SIZE {
            let left = grid_line(width, col);
            let right = grid_line(width, col + 1);
            cells[row * GRID_SIZE + col] = CellRect {
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
            };
        }
    }

    Ok(cells)
}

/// Pixel offset of the `index`-th grid line along an axis of `extent` pixels.
pub fn grid_line(extent: u32, index: usize) -> u32 {
    (index as u64 * extent as u64 / GRID_SIZE as u64) as u32
}

/// Maps a pixel coordinate to its row-major slot.
///
/// Uses `row = floor(y * GRID_SIZE / height)` and
/// `col = floor(x * GRID_SIZE / width)`. Returns `None` when the coordinate
/// falls outside the grid or the frame has a zero dimension.
pub fn slot_at(x: i64, y: i64, width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 || x < 0 || y < 0 {
        return None;
    }

    let row = y.saturating_mul(GRID_SIZE as i64) / height as i64;
    let col = x.saturating_mul(GRID_SIZE as i64) / width as i64;
    if row >= GRID_SIZE as i64 || col >= GRID_SIZE as i64 {
        return None;
    }

    Some(row as usize * GRID_SIZE + col as usize)
}

/// Permutation of tile identities over grid slots.
///
/// `tiles()[slot]` is the identity of the tile shown at `slot`; identity
/// [`EMPTY_TILE`] is the blank. Use [`TileBoard::from_tiles`] to build an
/// arbitrary validated board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBoard {
    tiles: [usize; GRID_AREA],
}

impl TileBoard {
    /// Identity arrangement: every tile in its home slot.
    pub fn solved() -> Self {
        let mut tiles = [0_usize; GRID_AREA];
        for (slot, tile) in tiles.iter_mut().enumerate() {
            *tile = slot;
        }
        Self { tiles }
    }

    /// Builds a board from an explicit arrangement.
    ///
    /// Solvability is not checked; callers forcing a layout (tests, replays)
    /// get exactly what they pass in.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPermutation`] when `tiles` is not a
    /// permutation of `0..GRID_AREA`.
    pub fn from_tiles(tiles: [usize; GRID_AREA]) -> Result<Self, CoreError> {
        let mut seen = [false; GRID_AREA];
        for &tile in &tiles {
            if tile >= GRID_AREA {
                return Err(CoreError::InvalidPermutation(format!(
                    "tile identity {tile} is out of range"
                )));
            }
            if seen[tile] {
                return Err(CoreError::InvalidPermutation(format!(
                    "tile identity {tile} appears more than once"
                )));
            }
            seen[tile] = true;
        }

        Ok(Self { tiles })
    }

    /// Current arrangement in row-major slot order.
    pub fn tiles(&self) -> &[usize; GRID_AREA] {
        &self.tiles
    }

    /// Tile identity at `slot`.
    ///
    /// # Panics
    /// Panics when `slot >= GRID_AREA`.
    pub fn tile_at(&self, slot: usize) -> usize {
        self.tiles[slot]
    }

    /// Slot currently holding the blank.
    pub fn empty_slot(&self) -> usize {
        self.tiles
            .iter()
            .position(|&tile| tile == EMPTY_TILE)
            .unwrap_or(EMPTY_TILE)
    }

    /// Parity sum used by [`TileBoard::is_solvable`].
    ///
    /// The blank contributes `1 + row`; every other tile contributes the
    /// number of smaller identities found in later slots.
    pub fn parity_sum(&self) -> usize {
        let mut sum = 0;
        for (slot, &tile) in self.tiles.iter().enumerate() {
            if tile == EMPTY_TILE {
                sum += slot / GRID_SIZE + 1;
            } else {
                sum += self.tiles[slot + 1..]
                    .iter()
                    .filter(|&&later| later < tile)
                    .count();
            }
        }
        sum
    }

    /// Returns `true` when the arrangement is reachable from [`TileBoard::solved`].
    pub fn is_solvable(&self) -> bool {
        self.parity_sum() % 2 == 0
    }

    /// One unbiased Fisher-Yates pass over the arrangement.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for index in (1..GRID_AREA).rev() {
            let swap_with = rng.random_range(0..=index);
            self.tiles.swap(index, swap_with);
        }
    }

    /// Reshuffles until the arrangement is solvable.
    ///
    /// Rejection sampling over uniform permutations keeps the result uniform
    /// over the solvable half. Returns the number of shuffles performed.
    pub fn new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let mut attempts = 0;
        loop {
            self.shuffle(rng);
            attempts += 1;
            if self.is_solvable() {
                return attempts;
            }
        }
    }

    /// Slot of the blank if it is a 4-neighbour of `slot`.
    ///
    /// Neighbours are checked left, right, top, bottom.
    pub fn empty_neighbor(&self, slot: usize) -> Option<usize> {
        if slot >= GRID_AREA {
            return None;
        }
        let row = slot / GRID_SIZE;
        let col = slot % GRID_SIZE;

        let candidates = [
            (col > 0).then(|| slot - 1),
            (col < GRID_SIZE - 1).then(|| slot + 1),
            (row > 0).then(|| slot - GRID_SIZE),
            (row < GRID_SIZE - 1).then(|| slot + GRID_SIZE),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|&neighbor| self.tiles[neighbor] == EMPTY_TILE)
    }

    /// Slides the tile at `slot` into an adjacent blank.
    ///
    /// Returns the slot the blank moved from (now holding the tapped tile),
    /// or `None` when no neighbour is blank and nothing changed.
    pub fn slide(&mut self, slot: usize) -> Option<usize> {
        let empty = self.empty_neighbor(slot)?;
        self.tiles.swap(slot, empty);
        Some(empty)
    }
}

impl Default for TileBoard {
    fn default() -> Self {
        Self::solved()
    }
}

/// Error type for core domain validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Frame buffer shape does not match declared geometry.
    #[error("invalid frame shape: expected {expected} bytes, got {actual}")]
    InvalidFrameShape {
        /// Expected RGBA byte count.
        expected: usize,
        /// Actual RGBA byte count.
        actual: usize,
    },
    /// Frame is too small to hold the grid.
    #[error("invalid frame size {width}x{height}: each side needs at least {} pixels", GRID_SIZE)]
    InvalidFrameSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Tile arrangement is not a permutation of `0..GRID_AREA`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    /// Integer overflow occurred while computing buffer geometry.
    #[error("frame dimension overflow")]
    Overflow,
}

/// Byte length of a tightly packed RGBA buffer.
///
/// # Errors
/// Returns [`CoreError::Overflow`] when the length does not fit in `usize`.
pub fn required_rgba_len(width: u32, height: u32) -> Result<usize, CoreError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(CoreError::Overflow)
}

#[cfg(test)]
mod tests {
    //! Unit tests for grid geometry and board moves.

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn frame_rejects_short_buffer() {
        let error = Frame::new(2, 2, 0, vec![0; 15]).expect_err("shape should be rejected");
        assert!(matches!(
            error,
            CoreError::InvalidFrameShape {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn pixel_lookup_tolerates_truncated_buffer() {
        let frame = Frame {
            width: 2,
            height: 2,
            captured_at_ms: 0,
            rgba: vec![1, 2, 3, 4],
        };
        assert_eq!(frame.pixel(0, 0), Some(Rgba::new(1, 2, 3, 4)));
        assert_eq!(frame.pixel(1, 1), None);
    }

    #[test]
    fn grid_cells_spread_remainder_and_end_on_frame_edge() {
        let cells = grid_cells(10, 7).expect("grid should partition");
        assert_eq!(cells[0], CellRect { x: 0, y: 0, width: 2, height: 1 });
        let last = cells[GRID_AREA - 1];
        assert_eq!(last.x + last.width, 10);
        assert_eq!(last.y + last.height, 7);
    }

    #[test]
    fn grid_cells_reject_tiny_frames() {
        assert!(matches!(
            grid_cells(3, 100),
            Err(CoreError::InvalidFrameSize { width: 3, height: 100 })
        ));
    }

    #[test]
    fn slot_at_uses_floor_mapping() {
        assert_eq!(slot_at(0, 0, 400, 400), Some(0));
        assert_eq!(slot_at(150, 50, 400, 400), Some(1));
        assert_eq!(slot_at(50, 150, 400, 400), Some(4));
        assert_eq!(slot_at(399, 399, 400, 400), Some(15));
        assert_eq!(slot_at(400, 10, 400, 400), None);
        assert_eq!(slot_at(-1, 10, 400, 400), None);
        assert_eq!(slot_at(1, 1, 0, 400), None);
    }

    #[test]
    fn solved_board_has_even_parity() {
        let board = TileBoard::solved();
        // Blank sits in the last row: contributes 4, no inversions elsewhere.
        assert_eq!(board.parity_sum(), 4);
        assert!(board.is_solvable());
    }

    #[test]
    fn single_transposition_is_unsolvable() {
        let mut tiles = *TileBoard::solved().tiles();
        tiles.swap(0, 1);
        let board = TileBoard::from_tiles(tiles).expect("valid permutation");
        assert!(!board.is_solvable());
    }

    #[test]
    fn from_tiles_rejects_duplicates() {
        let mut tiles = *TileBoard::solved().tiles();
        tiles[3] = 2;
        assert!(matches!(
            TileBoard::from_tiles(tiles),
            Err(CoreError::InvalidPermutation(_))
        ));
    }

    #[test]
    fn new_game_is_solvable_for_fixed_seed() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut board = TileBoard::solved();
        let attempts = board.new_game(&mut rng);
        assert!(attempts >= 1);
        assert!(board.is_solvable());
    }

    #[test]
    fn slide_prefers_left_neighbor_and_moves_blank() {
        // Blank at slot 0, tap slot 1: the blank is its left neighbour.
        let mut tiles = *TileBoard::solved().tiles();
        tiles.swap(0, EMPTY_TILE);
        let mut board = TileBoard::from_tiles(tiles).expect("valid permutation");

        assert_eq!(board.slide(1), Some(0));
        assert_eq!(board.empty_slot(), 1);
        assert_eq!(board.tile_at(0), 1);
    }

    #[test]
    fn slide_does_not_wrap_rows() {
        // Blank at slot 3 (end of row 0); slot 4 starts row 1 and is not adjacent.
        let mut tiles = *TileBoard::solved().tiles();
        tiles.swap(3, EMPTY_TILE);
        let mut board = TileBoard::from_tiles(tiles).expect("valid permutation");
        let before = board;

        assert_eq!(board.slide(4), None);
        assert_eq!(board, before);
    }
}
