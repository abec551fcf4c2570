//! Thread-safe puzzle controller shared by the frame and input call sites.

use std::ops::Deref;
use std::sync::{Mutex, MutexGuard};

use puzzle15_core::{Frame, GRID_SIZE, TileBoard, slot_at};
use puzzle15_render::{PuzzleCanvas, RenderError, RenderStyle};
use puzzle15_ui::MenuAction;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::AppError;
use crate::config::PuzzleConfig;

/// Result of one tap delivered to [`Puzzle15Processor::handle_tap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The tapped tile slid into the neighbouring blank.
    Moved {
        /// Slot that was tapped; it now holds the blank.
        from: usize,
        /// Slot that held the blank; it now holds the tapped tile.
        to: usize,
    },
    /// No neighbour of the tapped slot is blank.
    NoMove,
    /// Tap fell outside the puzzle or no frame size is configured.
    Rejected,
}

#[derive(Debug)]
struct ProcessorState {
    board: TileBoard,
    show_labels: bool,
    style: RenderStyle,
    canvas: Option<PuzzleCanvas>,
    rng: StdRng,
}

/// Controller for the camera 15-puzzle.
///
/// Converts each camera frame into its shuffled rendition according to the
/// current tile arrangement. Every operation runs under one mutex, so the
/// processor can be shared through an `Arc` between the frame callback and
/// the input/menu callbacks.
#[derive(Debug)]
pub struct Puzzle15Processor {
    state: Mutex<ProcessorState>,
}

impl Puzzle15Processor {
    /// Creates a processor holding the solved arrangement.
    ///
    /// Call [`Puzzle15Processor::new_game`] to shuffle and
    /// [`Puzzle15Processor::set_frame_size`] before rendering.
    pub fn new(config: &PuzzleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            state: Mutex::new(ProcessorState {
                board: TileBoard::solved(),
                show_labels: config.show_tile_numbers,
                style: config.render_style(),
                canvas: None,
                rng,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ProcessorState>, AppError> {
        self.state.lock().map_err(|_| AppError::LockPoisoned)
    }

    /// Shuffles the board into a uniformly random solvable arrangement.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn new_game(&self) -> Result<TileBoard, AppError> {
        let mut state = self.lock()?;
        let ProcessorState { board, rng, .. } = &mut *state;
        let attempts = board.new_game(rng);
        tracing::debug!(attempts, "prepared new game");
        Ok(*board)
    }

    /// Replaces the arrangement with `board` as-is.
    ///
    /// Solvability is not enforced; this is meant for restoring a known layout.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn restore_board(&self, board: TileBoard) -> Result<(), AppError> {
        self.lock()?.board = board;
        Ok(())
    }

    /// Snapshot of the current arrangement.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn board(&self) -> Result<TileBoard, AppError> {
        Ok(self.lock()?.board)
    }

    /// Fixes the size of frames later passed to
    /// [`Puzzle15Processor::render_frame`] and (re)allocates the output buffer.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidFrameSize`] when either side is smaller than
    /// the grid.
    pub fn set_frame_size(&self, width: u32, height: u32) -> Result<(), AppError> {
        if (width as usize) < GRID_SIZE || (height as usize) < GRID_SIZE {
            return Err(AppError::InvalidFrameSize { width, height });
        }

        let mut state = self.lock()?;
        let canvas = PuzzleCanvas::new(width, height, state.style)?;
        state.canvas = Some(canvas);
        tracing::debug!(width, height, "game size prepared");
        Ok(())
    }

    /// Drops the output buffer, e.g. when the camera stops.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn release_frame_size(&self) -> Result<(), AppError> {
        if self.lock()?.canvas.take().is_some() {
            tracing::debug!("game size released");
        }
        Ok(())
    }

    /// Configured `(width, height)`, if any.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn frame_size(&self) -> Result<Option<(u32, u32)>, AppError> {
        Ok(self.lock()?.canvas.as_ref().map(PuzzleCanvas::size))
    }

    /// Renders `input` with tiles rearranged by the current board.
    ///
    /// The returned guard keeps the processor locked; drop it before the next
    /// call from the same thread.
    ///
    /// # Errors
    /// Returns [`AppError::NotPrepared`] before
    /// [`Puzzle15Processor::set_frame_size`], [`AppError::SizeMismatch`]
    /// when `input` does not have the configured size, and
    /// [`AppError::Render`] when its buffer does not match its geometry. The
    /// processor stays usable after any of these.
    pub fn render_frame(&self, input: &Frame) -> Result<RenderedFrame<'_>, AppError> {
        let mut state = self.lock()?;
        let ProcessorState {
            board,
            show_labels,
            canvas,
            ..
        } = &mut *state;
        let canvas = canvas.as_mut().ok_or(AppError::NotPrepared)?;

        canvas
            .render(board, input, *show_labels)
            .map_err(|error| match error {
                RenderError::SizeMismatch { expected, actual } => {
                    AppError::SizeMismatch { expected, actual }
                }
                other => AppError::Render(other),
            })?;

        Ok(RenderedFrame { guard: state })
    }

    /// Flips tile-number drawing and returns the new setting.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn toggle_labels(&self) -> Result<bool, AppError> {
        let mut state = self.lock()?;
        state.show_labels = !state.show_labels;
        Ok(state.show_labels)
    }

    /// Whether tile numbers are currently drawn.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn show_labels(&self) -> Result<bool, AppError> {
        Ok(self.lock()?.show_labels)
    }

    /// Handles a tap at output-buffer pixel `(x, y)`.
    ///
    /// A tap on a tile next to the blank slides it into the blank. Taps outside
    /// the picture are logged and ignored.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn handle_tap(&self, x: i64, y: i64) -> Result<TapOutcome, AppError> {
        let mut state = self.lock()?;
        let Some((width, height)) = state.canvas.as_ref().map(PuzzleCanvas::size) else {
            tracing::warn!(x, y, "tap received before game size was prepared");
            return Ok(TapOutcome::Rejected);
        };

        let Some(slot) = slot_at(x, y, width, height) else {
            tracing::warn!(x, y, width, height, "tap outside of picture ignored");
            return Ok(TapOutcome::Rejected);
        };

        match state.board.slide(slot) {
            Some(empty) => {
                tracing::debug!(from = slot, to = empty, "tile moved");
                Ok(TapOutcome::Moved {
                    from: slot,
                    to: empty,
                })
            }
            None => Ok(TapOutcome::NoMove),
        }
    }

    /// Dispatches one menu action.
    ///
    /// # Errors
    /// Returns [`AppError::LockPoisoned`] when another holder panicked.
    pub fn apply_menu_action(&self, action: MenuAction) -> Result<(), AppError> {
        tracing::info!(action = action.label(), "menu item selected");
        match action {
            MenuAction::StartNewGame => {
                self.new_game()?;
            }
            MenuAction::ToggleTileNumbers => {
                self.toggle_labels()?;
            }
        }
        Ok(())
    }
}

/// Locked view of the most recent render output.
///
/// Dereferences to the processor-owned output [`Frame`]; the processor stays
/// locked until this guard is dropped.
///
/// Invariant: only built by [`Puzzle15Processor::render_frame`] after the
/// canvas was found present, and the held lock keeps
/// [`Puzzle15Processor::release_frame_size`] from clearing it.
#[derive(Debug)]
pub struct RenderedFrame<'a> {
    guard: MutexGuard<'a, ProcessorState>,
}

impl Deref for RenderedFrame<'_> {
    type Target = Frame;

    fn deref(&self) -> &Frame {
        match &self.guard.canvas {
            Some(canvas) => canvas.output(),
            None => unreachable!("rendered frame guard outlived its canvas"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for processor state transitions.

    use puzzle15_core::EMPTY_TILE;

    use super::*;

    fn seeded() -> Puzzle15Processor {
        Puzzle15Processor::new(&PuzzleConfig {
            seed: Some(3),
            ..PuzzleConfig::default()
        })
    }

    #[test]
    fn render_before_prepare_fails() {
        let processor = seeded();
        let frame = Frame::filled(8, 8, puzzle15_core::Rgba::new(0, 0, 0, 255))
            .expect("frame should build");
        assert!(matches!(
            processor.render_frame(&frame),
            Err(AppError::NotPrepared)
        ));
    }

    #[test]
    fn tap_before_prepare_is_rejected() {
        let processor = seeded();
        assert_eq!(
            processor.handle_tap(1, 1).expect("tap should not error"),
            TapOutcome::Rejected
        );
    }

    #[test]
    fn tiny_frame_size_is_rejected() {
        let processor = seeded();
        assert!(matches!(
            processor.set_frame_size(2, 100),
            Err(AppError::InvalidFrameSize { width: 2, height: 100 })
        ));
    }

    #[test]
    fn released_size_rejects_taps() {
        let processor = seeded();
        processor.set_frame_size(40, 40).expect("size should be accepted");
        processor.release_frame_size().expect("release should work");
        assert_eq!(processor.frame_size().expect("lock"), None);
        assert_eq!(
            processor.handle_tap(5, 5).expect("tap should not error"),
            TapOutcome::Rejected
        );
    }

    #[test]
    fn rendered_guard_reads_current_output() {
        let processor = seeded();
        processor.set_frame_size(8, 8).expect("size should be accepted");
        let frame = Frame::filled(8, 8, puzzle15_core::Rgba::new(9, 9, 9, 255))
            .expect("frame should build");
        let rendered = processor.render_frame(&frame).expect("render should work");
        assert_eq!(rendered.size(), (8, 8));
    }

    #[test]
    fn menu_actions_reach_processor_state() {
        let processor = seeded();
        assert!(processor.show_labels().expect("lock"));
        processor
            .apply_menu_action(MenuAction::ToggleTileNumbers)
            .expect("toggle should apply");
        assert!(!processor.show_labels().expect("lock"));

        processor
            .apply_menu_action(MenuAction::StartNewGame)
            .expect("new game should apply");
        let board = processor.board().expect("lock");
        assert!(board.is_solvable());
        assert!(board.tiles().contains(&EMPTY_TILE));
    }
}
