#![warn(missing_docs)]
//! # puzzle15-ui
//!
//! ## Purpose
//! Defines the UI-facing state model for the puzzle sample.
//!
//! ## Responsibilities
//! - Track the camera view lifecycle (started with a frame size, or stopped).
//! - Translate touches in view coordinates into frame pixel coordinates for
//!   a frame centred inside a larger view.
//! - Enumerate the menu actions offered to the user.
//!
//! ## Data flow
//! Host view events mutate [`UiState`]; touches pass through
//! [`UiState::translate_touch`] before reaching the puzzle processor, and
//! [`MenuAction`] values are dispatched to the processor by the app crate.
//!
//! ## Ownership and lifetimes
//! `UiState` is plain owned data so the host can keep it on its event thread
//! without borrowing the processor.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. A touch that
//! misses the picture yields `None` instead of an error.

/// Actions exposed through the options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Show or hide the tile numbers.
    ToggleTileNumbers,
    /// Reshuffle the board.
    StartNewGame,
}

impl MenuAction {
    /// Menu entries in display order.
    pub const ALL: [MenuAction; 2] = [MenuAction::ToggleTileNumbers, MenuAction::StartNewGame];

    /// Menu caption.
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::ToggleTileNumbers => "Show/hide tile numbers",
            MenuAction::StartNewGame => "Start new game",
        }
    }
}

/// Camera view lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraViewState {
    /// No frames are being delivered.
    Stopped,
    /// Frames of the given size are being delivered.
    Started {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
    },
}

/// Placement of a frame centred inside a host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    /// Host view width.
    pub view_width: u32,
    /// Host view height.
    pub view_height: u32,
    /// Frame width.
    pub frame_width: u32,
    /// Frame height.
    pub frame_height: u32,
}

impl ViewLayout {
    /// Top-left corner of the frame in view coordinates.
    ///
    /// Negative when the frame is larger than the view.
    pub fn frame_offset(&self) -> (i64, i64) {
        (
            (self.view_width as i64 - self.frame_width as i64) / 2,
            (self.view_height as i64 - self.frame_height as i64) / 2,
        )
    }

    /// Converts a view touch into frame pixels.
    ///
    /// Fractional view coordinates are truncated. Both frame edges are
    /// accepted (`0..=width`, `0..=height`); finer bounds checking is left to
    /// the processor.
    pub fn view_to_frame(&self, view_x: f32, view_y: f32) -> Option<(i64, i64)> {
        let (offset_x, offset_y) = self.frame_offset();
        let x = view_x as i64 - offset_x;
        let y = view_y as i64 - offset_y;

        if x >= 0 && x <= self.frame_width as i64 && y >= 0 && y <= self.frame_height as i64 {
            Some((x, y))
        } else {
            None
        }
    }
}

/// Aggregate UI runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Host view size in pixels.
    pub view_size: (u32, u32),
    /// Camera lifecycle.
    pub camera: CameraViewState,
}

impl UiState {
    /// Creates state for a view of the given size with the camera stopped.
    pub fn new(view_width: u32, view_height: u32) -> Self {
        Self {
            view_size: (view_width, view_height),
            camera: CameraViewState::Stopped,
        }
    }

    /// Records that the camera started delivering `width x height` frames.
    pub fn on_camera_view_started(&mut self, width: u32, height: u32) {
        self.camera = CameraViewState::Started { width, height };
    }

    /// Records that the camera stopped.
    pub fn on_camera_view_stopped(&mut self) {
        self.camera = CameraViewState::Stopped;
    }

    /// Current layout, available only while the camera runs.
    pub fn layout(&self) -> Option<ViewLayout> {
        match self.camera {
            CameraViewState::Started { width, height } => Some(ViewLayout {
                view_width: self.view_size.0,
                view_height: self.view_size.1,
                frame_width: width,
                frame_height: height,
            }),
            CameraViewState::Stopped => None,
        }
    }

    /// Translates a view touch into frame pixels.
    ///
    /// Returns `None` while the camera is stopped or when the touch misses the
    /// picture.
    pub fn translate_touch(&self, view_x: f32, view_y: f32) -> Option<(i64, i64)> {
        let layout = self.layout()?;
        let translated = layout.view_to_frame(view_x, view_y);
        if translated.is_none() {
            tracing::debug!(view_x, view_y, "touch outside of picture ignored");
        }
        translated
    }
}
