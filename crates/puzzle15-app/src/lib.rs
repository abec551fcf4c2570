#![warn(missing_docs)]
//! # puzzle15-app
//!
//! ## Purpose
//! Orchestrates configuration, frame delivery, the puzzle processor, and UI
//! input for the camera 15-puzzle.
//!
//! ## Responsibilities
//! - Own the mutex-guarded [`Puzzle15Processor`] shared by frame and input
//!   call sites.
//! - Load layered [`PuzzleConfig`] values.
//! - Drive a [`FrameSource`] through the processor on a fixed schedule.
//! - Route view touches and menu actions to the processor.
//!
//! ## Data flow
//! Config -> processor; frame source -> [`Puzzle15Processor::render_frame`]
//! -> display; view touch -> [`UiState::translate_touch`] ->
//! [`Puzzle15Processor::handle_tap`].
//!
//! ## Ownership and lifetimes
//! The processor exclusively owns the tile arrangement and output buffer.
//! Input frames are borrowed per call; rendered output is lent back through a
//! lock guard.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Out-of-picture taps are
//! logged, not returned as errors.

mod config;
mod processor;

pub use config::{ConfigError, PuzzleConfig, SEED_ENV, SHOW_NUMBERS_ENV};
pub use processor::{Puzzle15Processor, RenderedFrame, TapOutcome};

use puzzle15_capture::{CaptureConfig, CaptureError, FrameSource, scheduled_capture_times};
use puzzle15_core::CoreError;
use puzzle15_render::RenderError;
use puzzle15_ui::UiState;
use thiserror::Error;

/// Build-time application version loaded from root `VERSION`.
pub const APP_VERSION: &str = env!("PUZZLE15_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Schedules deterministic frame times at configured FPS.
///
/// # Errors
/// Returns [`AppError::Capture`] when FPS config is invalid.
pub fn schedule_frames(fps: u32, start_ms: u64, frame_count: usize) -> Result<Vec<u64>, AppError> {
    let config = CaptureConfig::new(fps)?;
    Ok(scheduled_capture_times(config, start_ms, frame_count))
}

/// Counters collected by [`drive_frames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameLoopReport {
    /// Frames rendered successfully.
    pub rendered: usize,
    /// Frames dropped because their size did not match the game size.
    pub size_mismatches: usize,
}

/// Pulls one frame per scheduled timestamp and renders it.
///
/// `on_frame` receives each rendered output while the processor is locked.
/// Size mismatches drop only the offending frame.
///
/// # Errors
/// Returns the first capture failure or any render error other than a size
/// mismatch.
pub fn drive_frames(
    processor: &Puzzle15Processor,
    source: &dyn FrameSource,
    schedule: &[u64],
    mut on_frame: impl FnMut(&puzzle15_core::Frame),
) -> Result<FrameLoopReport, AppError> {
    let mut report = FrameLoopReport::default();

    for &captured_at_ms in schedule {
        let frame = source.next_frame(captured_at_ms)?;
        match processor.render_frame(&frame) {
            Ok(rendered) => {
                on_frame(&*rendered);
                report.rendered += 1;
            }
            Err(AppError::SizeMismatch { expected, actual }) => {
                tracing::warn!(?expected, ?actual, "dropping frame with unexpected size");
                report.size_mismatches += 1;
            }
            Err(error) => return Err(error),
        }
    }

    Ok(report)
}

/// Starts the camera view: records the size in `ui` and prepares the game.
///
/// # Errors
/// Returns [`AppError::InvalidFrameSize`] for sizes smaller than the grid.
pub fn on_camera_view_started(
    processor: &Puzzle15Processor,
    ui: &mut UiState,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    processor.set_frame_size(width, height)?;
    ui.on_camera_view_started(width, height);
    Ok(())
}

/// Stops the camera view and releases the output buffer.
///
/// # Errors
/// Returns [`AppError::LockPoisoned`] when the processor lock is poisoned.
pub fn on_camera_view_stopped(
    processor: &Puzzle15Processor,
    ui: &mut UiState,
) -> Result<(), AppError> {
    ui.on_camera_view_stopped();
    processor.release_frame_size()
}

/// Delivers a view touch to the processor.
///
/// Returns `None` when the touch misses the picture or the camera is stopped.
///
/// # Errors
/// Returns [`AppError::LockPoisoned`] when the processor lock is poisoned.
pub fn deliver_touch(
    processor: &Puzzle15Processor,
    ui: &UiState,
    view_x: f32,
    view_y: f32,
) -> Result<Option<TapOutcome>, AppError> {
    match ui.translate_touch(view_x, view_y) {
        Some((x, y)) => processor.handle_tap(x, y).map(Some),
        None => Ok(None),
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Frame does not match the size fixed by `set_frame_size`.
    #[error("frame size mismatch: game is {expected:?}, frame is {actual:?}")]
    SizeMismatch {
        /// Configured `(width, height)`.
        expected: (u32, u32),
        /// Received `(width, height)`.
        actual: (u32, u32),
    },
    /// Rendering requested before a game size was set.
    #[error("game size has not been prepared")]
    NotPrepared,
    /// Requested game size cannot hold the grid.
    #[error("invalid game size {width}x{height}")]
    InvalidFrameSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Processor mutex was poisoned by a panicking holder.
    #[error("processor lock poisoned")]
    LockPoisoned,
    /// Core model error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    /// Render subsystem error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    /// Capture subsystem error.
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
