//! Integration tests for view touch routing and camera lifecycle.

mod common;

use puzzle15_app::{
    Puzzle15Processor, PuzzleConfig, TapOutcome, deliver_touch, on_camera_view_started,
    on_camera_view_stopped,
};
use puzzle15_ui::UiState;

#[test]
fn touch_routing_tests_letterboxed_touch_reaches_processor() {
    let processor = Puzzle15Processor::new(&PuzzleConfig {
        seed: Some(1),
        ..PuzzleConfig::default()
    });
    let mut ui = UiState::new(600, 500);
    on_camera_view_started(&processor, &mut ui, 400, 400).expect("camera should start");
    processor
        .restore_board(common::board_with_empty_at(5))
        .expect("board should be restored");

    // Frame sits at (100, 50) in the view; view (250, 100) is frame (150, 50).
    let outcome = deliver_touch(&processor, &ui, 250.0, 100.0).expect("touch");
    assert_eq!(outcome, Some(TapOutcome::Moved { from: 1, to: 5 }));

    // Left margin of the view misses the picture entirely.
    assert_eq!(deliver_touch(&processor, &ui, 20.0, 100.0).expect("touch"), None);

    // The inclusive right edge passes the view check but not the grid check.
    assert_eq!(
        deliver_touch(&processor, &ui, 500.0, 100.0).expect("touch"),
        Some(TapOutcome::Rejected)
    );

    on_camera_view_stopped(&processor, &mut ui).expect("camera should stop");
    assert_eq!(processor.frame_size().expect("size"), None);
    assert_eq!(deliver_touch(&processor, &ui, 250.0, 100.0).expect("touch"), None);
}
