//! Integration tests for concurrent frame, tap, and menu call sites.

mod common;

use std::sync::Arc;
use std::thread;

use puzzle15_core::GRID_AREA;
use puzzle15_ui::MenuAction;

#[test]
fn concurrency_tests_board_stays_valid_under_contention() {
    let processor = Arc::new(common::prepared_processor());
    processor.new_game().expect("game should start");
    let frame = Arc::new(common::fixture_frame());

    let renderer = {
        let processor = Arc::clone(&processor);
        let frame = Arc::clone(&frame);
        thread::spawn(move || {
            for _ in 0..50 {
                let rendered = processor.render_frame(&frame).expect("render");
                assert_eq!(rendered.size(), (common::FRAME_SIDE, common::FRAME_SIDE));
            }
        })
    };

    let tapper = {
        let processor = Arc::clone(&processor);
        thread::spawn(move || {
            for step in 0..2_000_usize {
                let (x, y) = common::slot_center(step % GRID_AREA);
                processor.handle_tap(x, y).expect("tap");
            }
        })
    };

    let menu = {
        let processor = Arc::clone(&processor);
        thread::spawn(move || {
            for round in 0..20 {
                let action = if round % 2 == 0 {
                    MenuAction::ToggleTileNumbers
                } else {
                    MenuAction::StartNewGame
                };
                processor.apply_menu_action(action).expect("menu action");
            }
        })
    };

    renderer.join().expect("renderer thread");
    tapper.join().expect("tapper thread");
    menu.join().expect("menu thread");

    let board = processor.board().expect("board");
    let mut sorted = *board.tiles();
    sorted.sort_unstable();
    assert_eq!(sorted, *puzzle15_core::TileBoard::solved().tiles());
    assert!(board.is_solvable());
    // Ten toggles leave the flag where it started.
    assert!(processor.show_labels().expect("flag"));
}
