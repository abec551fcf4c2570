#![warn(missing_docs)]
//! # puzzle15-capture
//!
//! ## Purpose
//! Provides the frame-source seam that feeds camera frames to the puzzle.
//!
//! ## Responsibilities
//! - Define a backend-agnostic frame source trait.
//! - Expose a still-image source that replays one decoded picture.
//! - Expose a deterministic synthetic source for CI and unit tests.
//! - Provide FPS scheduling helpers used by the demo driver.
//!
//! ## Data flow
//! Driver asks a [`FrameSource`] for its size -> configures the processor ->
//! pulls [`puzzle15_core::Frame`] values at the configured cadence.
//!
//! ## Ownership and lifetimes
//! Every produced frame is an owned value with an independent buffer; no
//! borrowed source memory escapes a backend.
//!
//! ## Error model
//! Invalid FPS, bad geometry, decode and backend failures are reported as
//! [`CaptureError`] values.

use std::path::Path;
use std::sync::Mutex;

use puzzle15_core::{CoreError, Frame, GRID_SIZE};
use thiserror::Error;

/// Capture configuration used by schedulers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Frames delivered per second.
    pub fps: u32,
}

impl CaptureConfig {
    /// Creates validated capture configuration.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidFps`] when `fps == 0`.
    pub fn new(fps: u32) -> Result<Self, CaptureError> {
        if fps == 0 {
            return Err(CaptureError::InvalidFps);
        }
        Ok(Self { fps })
    }

    /// Returns frame interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        1_000 / self.fps as u64
    }
}

/// Trait implemented by concrete frame providers.
pub trait FrameSource: Send + Sync {
    /// Fixed `(width, height)` of every frame this source produces.
    fn frame_size(&self) -> (u32, u32);

    /// Produces the next frame stamped with `captured_at_ms`.
    ///
    /// # Errors
    /// Returns [`CaptureError::Backend`] when the backend cannot deliver.
    fn next_frame(&self, captured_at_ms: u64) -> Result<Frame, CaptureError>;
}

/// Source that replays one decoded still image as a video feed.
#[derive(Debug, Clone)]
pub struct StillImageSource {
    frame: Frame,
}

impl StillImageSource {
    /// Decodes an image file into a replayable source.
    ///
    /// # Errors
    /// Returns [`CaptureError::Decode`] when the file cannot be read or
    /// decoded, and [`CaptureError::InvalidFrameSize`] when it is smaller than
    /// the puzzle grid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let decoded = image::open(path)?.to_rgba8();
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "decoded still image source"
        );
        Self::from_image(decoded)
    }

    /// Wraps an already decoded RGBA image.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidFrameSize`] when the image is smaller
    /// than the puzzle grid.
    pub fn from_image(image: image::RgbaImage) -> Result<Self, CaptureError> {
        let (width, height) = image.dimensions();
        ensure_grid_fits(width, height)?;
        let frame = Frame::new(width, height, 0, image.into_raw())?;
        Ok(Self { frame })
    }
}

impl FrameSource for StillImageSource {
    fn frame_size(&self) -> (u32, u32) {
        self.frame.size()
    }

    fn next_frame(&self, captured_at_ms: u64) -> Result<Frame, CaptureError> {
        let mut frame = self.frame.clone();
        frame.captured_at_ms = captured_at_ms;
        Ok(frame)
    }
}

/// Deterministic synthetic source for test and CI usage.
///
/// Red encodes the column, green the row, and blue the sequence number, so
/// every grid cell is visually distinct and consecutive frames differ.
#[derive(Debug)]
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    sequence: Mutex<u64>,
}

impl SyntheticFrameSource {
    /// Creates a synthetic source of the given geometry.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidFrameSize`] when the geometry cannot
    /// hold the puzzle grid.
    pub fn new(width: u32, height: u32) -> Result<Self, CaptureError> {
        ensure_grid_fits(width, height)?;
        Ok(Self {
            width,
            height,
            sequence: Mutex::new(0),
        })
    }

    /// Number of frames produced so far.
    pub fn frames_produced(&self) -> u64 {
        self.sequence.lock().map(|sequence| *sequence).unwrap_or(0)
    }
}

impl FrameSource for SyntheticFrameSource {
    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&self, captured_at_ms: u64) -> Result<Frame, CaptureError> {
        let mut sequence = self
            .sequence
            .lock()
            .map_err(|_| CaptureError::Backend("synthetic sequence lock poisoned".to_string()))?;
        *sequence += 1;

        let blue = (*sequence % 255) as u8;
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            let green = (y as u64 * 255 / self.height as u64) as u8;
            for x in 0..self.width {
                let red = (x as u64 * 255 / self.width as u64) as u8;
                rgba.extend_from_slice(&[red, green, blue, 255]);
            }
        }

        Ok(Frame::new(self.width, self.height, captured_at_ms, rgba)?)
    }
}

/// Computes deterministic schedule timestamps for fixed-FPS delivery.
///
/// # Returns
/// Vector of `count` timestamps starting at `start_ms` with `interval_ms` spacing.
pub fn scheduled_capture_times(config: CaptureConfig, start_ms: u64, count: usize) -> Vec<u64> {
    let interval = config.interval_ms();
    (0..count)
        .map(|index| start_ms.saturating_add(interval.saturating_mul(index as u64)))
        .collect()
}

fn ensure_grid_fits(width: u32, height: u32) -> Result<(), CaptureError> {
    if (width as usize) < GRID_SIZE || (height as usize) < GRID_SIZE {
        return Err(CaptureError::InvalidFrameSize { width, height });
    }
    Ok(())
}

/// Capture layer error type.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// FPS must be positive.
    #[error("invalid fps: must be greater than zero")]
    InvalidFps,
    /// Source geometry cannot hold the puzzle grid.
    #[error("invalid source size {width}x{height}")]
    InvalidFrameSize {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
    /// Image file could not be read or decoded.
    #[error("image decode failure: {0}")]
    Decode(#[from] image::ImageError),
    /// Produced frame failed core validation.
    #[error("frame validation failure: {0}")]
    Frame(#[from] CoreError),
    /// Backend runtime failure.
    #[error("capture backend failure: {0}")]
    Backend(String),
}
