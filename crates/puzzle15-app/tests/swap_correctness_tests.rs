//! Integration tests for tap-driven tile slides.

mod common;

use puzzle15_app::TapOutcome;
use puzzle15_core::GRID_AREA;

#[test]
fn swap_correctness_tests_exchanges_only_tapped_and_empty_slots() {
    let processor = common::prepared_processor();

    for empty in 0..GRID_AREA {
        for tapped in 0..GRID_AREA {
            let before = common::board_with_empty_at(empty);
            processor.restore_board(before).expect("board should be restored");

            let (x, y) = common::slot_center(tapped);
            let outcome = processor.handle_tap(x, y).expect("tap should be handled");
            let after = processor.board().expect("board should be readable");

            if common::are_neighbors(empty, tapped) {
                assert_eq!(outcome, TapOutcome::Moved { from: tapped, to: empty });
                assert_eq!(after.tile_at(empty), before.tile_at(tapped));
                assert_eq!(after.tile_at(tapped), before.tile_at(empty));
                for slot in (0..GRID_AREA).filter(|&slot| slot != empty && slot != tapped) {
                    assert_eq!(after.tile_at(slot), before.tile_at(slot));
                }
            } else {
                assert_eq!(outcome, TapOutcome::NoMove, "empty {empty}, tapped {tapped}");
                assert_eq!(after, before);
            }
        }
    }
}

#[test]
fn swap_correctness_tests_non_moves_are_idempotent() {
    let processor = common::prepared_processor();
    processor.new_game().expect("game should start");
    let board = processor.board().expect("board should be readable");
    let empty = board.empty_slot();
    let far = (0..GRID_AREA)
        .find(|&slot| slot != empty && !common::are_neighbors(slot, empty))
        .expect("a non-neighbour slot always exists");

    let (x, y) = common::slot_center(far);
    assert_eq!(processor.handle_tap(x, y).expect("tap"), TapOutcome::NoMove);
    let once = processor.board().expect("board");
    assert_eq!(processor.handle_tap(x, y).expect("tap"), TapOutcome::NoMove);
    let twice = processor.board().expect("board");

    assert_eq!(once, board);
    assert_eq!(twice, once);
}

#[test]
fn swap_correctness_tests_out_of_range_taps_are_rejected() {
    let processor = common::prepared_processor();
    processor
        .restore_board(common::board_with_empty_at(0))
        .expect("board should be restored");
    let before = processor.board().expect("board");

    for (x, y) in [(-1, 10), (10, -1), (400, 10), (10, 400), (10_000, 10_000)] {
        assert_eq!(
            processor.handle_tap(x, y).expect("tap should not error"),
            TapOutcome::Rejected
        );
    }
    assert_eq!(processor.board().expect("board"), before);
}
