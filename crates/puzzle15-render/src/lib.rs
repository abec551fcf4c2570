#![warn(missing_docs)]
//! # puzzle15-render
//!
//! ## Purpose
//! Composes the shuffled puzzle view from one live camera frame.
//!
//! ## Responsibilities
//! - Own the output buffer and its fixed cell layout for one frame size.
//! - Cache per-tile label metrics so labels can be centred without
//!   re-measuring every frame.
//! - Copy input cells into their permuted output slots, blank the empty slot,
//!   stamp tile numbers, and draw grid separators.
//!
//! ## Data flow
//! Camera [`Frame`] + [`TileBoard`] -> [`PuzzleCanvas::render`] -> borrowed
//! output [`Frame`] handed back to the display layer.
//!
//! ## Ownership and lifetimes
//! [`PuzzleCanvas`] owns its output buffer for as long as the frame size stays
//! fixed. The input frame is only borrowed for the duration of one render, and
//! the returned output borrow ends at the next mutating call.
//!
//! ## Error model
//! Input frames whose geometry differs from the canvas fail with
//! [`RenderError::SizeMismatch`], and frames whose buffer is shorter or longer
//! than their geometry fail with [`CoreError::InvalidFrameShape`]. In both
//! cases the previous output is left untouched.

use puzzle15_core::{
    CellRect, CoreError, EMPTY_TILE, Frame, GRID_AREA, GRID_SIZE, Rgba, TileBoard, grid_cells,
    grid_line, required_rgba_len,
};
use thiserror::Error;

/// Fill color of the blank slot.
pub const DEFAULT_EMPTY_COLOR: Rgba = Rgba::new(0x33, 0x33, 0x33, 0xFF);
/// Color of the separator lines between cells.
pub const DEFAULT_GRID_LINE_COLOR: Rgba = Rgba::new(0, 255, 0, 255);
/// Color of the tile numbers.
pub const DEFAULT_LABEL_COLOR: Rgba = Rgba::new(255, 0, 0, 255);
/// Separator thickness in pixels.
pub const DEFAULT_GRID_LINE_THICKNESS: u32 = 3;
/// Glyph magnification for tile numbers.
pub const DEFAULT_LABEL_SCALE: u32 = 3;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SPACING: u32 = 1;
const MAX_LABEL_DIGITS: usize = 3;

// 5x7 bitmaps, one byte per row, bit 4 is the leftmost column.
const DIGIT_GLYPHS: [[u8; GLYPH_HEIGHT as usize]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Visual parameters applied by [`PuzzleCanvas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Fill color of the blank slot.
    pub empty_color: Rgba,
    /// Separator line color.
    pub grid_line_color: Rgba,
    /// Tile number color.
    pub label_color: Rgba,
    /// Separator thickness in pixels; `0` disables separators.
    pub grid_line_thickness: u32,
    /// Integer glyph magnification; clamped to at least 1.
    pub label_scale: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            empty_color: DEFAULT_EMPTY_COLOR,
            grid_line_color: DEFAULT_GRID_LINE_COLOR,
            label_color: DEFAULT_LABEL_COLOR,
            grid_line_thickness: DEFAULT_GRID_LINE_THICKNESS,
            label_scale: DEFAULT_LABEL_SCALE,
        }
    }
}

/// Pixel size of one rendered tile number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelMetrics {
    /// Text width in pixels.
    pub width: u32,
    /// Text height in pixels.
    pub height: u32,
}

/// Output buffer plus the cell layout and label cache for one frame size.
#[derive(Debug, Clone)]
pub struct PuzzleCanvas {
    output: Frame,
    cells: [CellRect; GRID_AREA],
    label_metrics: [LabelMetrics; GRID_AREA],
    style: RenderStyle,
}

impl PuzzleCanvas {
    /// Allocates a canvas for frames of `width x height`.
    ///
    /// # Errors
    /// Returns [`RenderError::Core`] when either side is smaller than the grid
    /// or the buffer size overflows.
    pub fn new(width: u32, height: u32, style: RenderStyle) -> Result<Self, RenderError> {
        let cells = grid_cells(width, height)?;
        let output = Frame::filled(width, height, style.empty_color)?;

        let scale = style.label_scale.max(1);
        let mut label_metrics = [LabelMetrics::default(); GRID_AREA];
        for (tile, metrics) in label_metrics.iter_mut().enumerate() {
            *metrics = measure_label(tile + 1, scale);
        }

        tracing::debug!(width, height, "allocated puzzle canvas");

        Ok(Self {
            output,
            cells,
            label_metrics,
            style: RenderStyle {
                label_scale: scale,
                ..style
            },
        })
    }

    /// Returns `(width, height)` of the canvas.
    pub fn size(&self) -> (u32, u32) {
        self.output.size()
    }

    /// Cell layout shared by input and output frames.
    pub fn cells(&self) -> &[CellRect; GRID_AREA] {
        &self.cells
    }

    /// Cached label size for tile identity `tile`.
    pub fn label_metrics(&self, tile: usize) -> Option<LabelMetrics> {
        self.label_metrics.get(tile).copied()
    }

    /// Style in effect.
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Last rendered output.
    pub fn output(&self) -> &Frame {
        &self.output
    }

    /// Region covered by the label of `tile` when it is shown at `slot`.
    ///
    /// The label is centred in the slot and clipped to it.
    pub fn label_rect(&self, slot: usize, tile: usize) -> Option<CellRect> {
        let cell = *self.cells.get(slot)?;
        let metrics = self.label_metrics(tile)?;

        let x = cell.x + cell.width.saturating_sub(metrics.width) / 2;
        let y = cell.y + cell.height.saturating_sub(metrics.height) / 2;
        Some(CellRect {
            x,
            y,
            width: metrics.width.min(cell.x + cell.width - x),
            height: metrics.height.min(cell.y + cell.height - y),
        })
    }

    /// Renders `input` rearranged according to `board`.
    ///
    /// Output slot `i` receives input cell `board.tile_at(i)`; the blank slot
    /// is filled with the empty color. Tile numbers (`tile + 1`) are stamped
    /// when `show_labels` is set, then grid separators are drawn on top.
    ///
    /// # Errors
    /// Returns [`RenderError::SizeMismatch`] when `input` does not have the
    /// canvas geometry and [`RenderError::Core`] when its buffer length does
    /// not match its own geometry.
    pub fn render(
        &mut self,
        board: &TileBoard,
        input: &Frame,
        show_labels: bool,
    ) -> Result<&Frame, RenderError> {
        if input.size() != self.output.size() {
            return Err(RenderError::SizeMismatch {
                expected: self.output.size(),
                actual: input.size(),
            });
        }
        let expected_len = required_rgba_len(input.width, input.height)?;
        if input.rgba.len() != expected_len {
            return Err(CoreError::InvalidFrameShape {
                expected: expected_len,
                actual: input.rgba.len(),
            }
            .into());
        }

        let empty_color = self.style.empty_color;
        for slot in 0..GRID_AREA {
            let tile = board.tile_at(slot);
            let target = self.cells[slot];
            if tile == EMPTY_TILE {
                fill_rect(&mut self.output, target, empty_color);
                continue;
            }

            copy_cell(input, self.cells[tile], &mut self.output, target, empty_color);
            if show_labels {
                self.stamp_label(slot, tile);
            }
        }

        self.draw_grid();
        self.output.captured_at_ms = input.captured_at_ms;

        Ok(&self.output)
    }

    fn stamp_label(&mut self, slot: usize, tile: usize) {
        let Some(area) = self.label_rect(slot, tile) else {
            return;
        };
        let scale = self.style.label_scale;
        let color = self.style.label_color;
        let (digits, count) = label_digits(tile + 1);

        for (position, &digit) in digits[..count].iter().enumerate() {
            let glyph = &DIGIT_GLYPHS[digit as usize];
            let glyph_x = area.x + position as u32 * (GLYPH_WIDTH + GLYPH_SPACING) * scale;

            for (glyph_row, bits) in glyph.iter().enumerate() {
                for glyph_col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - glyph_col)) == 0 {
                        continue;
                    }
                    let block = CellRect {
                        x: glyph_x + glyph_col * scale,
                        y: area.y + glyph_row as u32 * scale,
                        width: scale,
                        height: scale,
                    };
                    fill_rect(&mut self.output, clip(block, area), color);
                }
            }
        }
    }

    fn draw_grid(&mut self) {
        let thickness = self.style.grid_line_thickness;
        if thickness == 0 {
            return;
        }
        let color = self.style.grid_line_color;
        let (width, height) = self.output.size();

        for index in 1..GRID_SIZE {
            let row = grid_line(height, index);
            let col = grid_line(width, index);
            let start_row = row.saturating_sub(thickness / 2);
            let start_col = col.saturating_sub(thickness / 2);

            fill_rect(
                &mut self.output,
                CellRect {
                    x: 0,
                    y: start_row,
                    width,
                    height: thickness.min(height - start_row),
                },
                color,
            );
            fill_rect(
                &mut self.output,
                CellRect {
                    x: start_col,
                    y: 0,
                    width: thickness.min(width - start_col),
                    height,
                },
                color,
            );
        }
    }
}

/// Measures the rendered size of decimal `value` at glyph magnification `scale`.
pub fn measure_label(value: usize, scale: u32) -> LabelMetrics {
    let (_, count) = label_digits(value);
    let count = count as u32;
    LabelMetrics {
        width: (count * GLYPH_WIDTH + (count - 1) * GLYPH_SPACING) * scale,
        height: GLYPH_HEIGHT * scale,
    }
}

fn label_digits(mut value: usize) -> ([u8; MAX_LABEL_DIGITS], usize) {
    let mut reversed = [0_u8; MAX_LABEL_DIGITS];
    let mut count = 0;
    loop {
        reversed[count] = (value % 10) as u8;
        count += 1;
        value /= 10;
        if value == 0 || count == MAX_LABEL_DIGITS {
            break;
        }
    }

    let mut digits = [0_u8; MAX_LABEL_DIGITS];
    for index in 0..count {
        digits[index] = reversed[count - 1 - index];
    }
    (digits, count)
}

fn clip(rect: CellRect, bounds: CellRect) -> CellRect {
    let left = rect.x.max(bounds.x);
    let top = rect.y.max(bounds.y);
    let right = (rect.x + rect.width).min(bounds.x + bounds.width);
    let bottom = (rect.y + rect.height).min(bounds.y + bounds.height);
    CellRect {
        x: left,
        y: top,
        width: right.saturating_sub(left),
        height: bottom.saturating_sub(top),
    }
}

fn fill_rect(frame: &mut Frame, rect: CellRect, color: Rgba) {
    let frame_width = frame.width as usize;
    let rect = clip(
        rect,
        CellRect {
            x: 0,
            y: 0,
            width: frame.width,
            height: frame.height,
        },
    );

    for y in rect.y as usize..(rect.y + rect.height) as usize {
        let start = (y * frame_width + rect.x as usize) * 4;
        let end = start + rect.width as usize * 4;
        for pixel in frame.rgba[start..end].chunks_exact_mut(4) {
            pixel.copy_from_slice(&color.0);
        }
    }
}

fn copy_cell(source: &Frame, from: CellRect, target: &mut Frame, to: CellRect, padding: Rgba) {
    // Invariant:
    // - Both frames share one geometry, but cells of one layout may differ by
    //   a pixel; the overlap is copied and any leftover is padded.
    let copy_width = from.width.min(to.width) as usize;
    let copy_height = from.height.min(to.height);
    let source_stride = source.width as usize * 4;
    let target_stride = target.width as usize * 4;

    for row in 0..copy_height as usize {
        let src_offset = (from.y as usize + row) * source_stride + from.x as usize * 4;
        let dst_offset = (to.y as usize + row) * target_stride + to.x as usize * 4;
        let row_len = copy_width * 4;

        target.rgba[dst_offset..dst_offset + row_len]
            .copy_from_slice(&source.rgba[src_offset..src_offset + row_len]);
    }

    if (copy_width as u32) < to.width {
        fill_rect(
            target,
            CellRect {
                x: to.x + copy_width as u32,
                y: to.y,
                width: to.width - copy_width as u32,
                height: to.height,
            },
            padding,
        );
    }
    if copy_height < to.height {
        fill_rect(
            target,
            CellRect {
                x: to.x,
                y: to.y + copy_height,
                width: to.width,
                height: to.height - copy_height,
            },
            padding,
        );
    }
}

/// Error type for puzzle rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Input frame geometry differs from the canvas.
    #[error("frame size mismatch: canvas is {expected:?}, frame is {actual:?}")]
    SizeMismatch {
        /// Canvas `(width, height)`.
        expected: (u32, u32),
        /// Input `(width, height)`.
        actual: (u32, u32),
    },
    /// Core geometry validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
