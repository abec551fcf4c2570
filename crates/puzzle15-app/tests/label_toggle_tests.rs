//! Integration tests for tile-number rendering.

mod common;

use puzzle15_core::{EMPTY_TILE, GRID_AREA};
use puzzle15_render::{PuzzleCanvas, RenderStyle};

#[test]
fn label_toggle_tests_labels_change_only_label_regions() {
    let processor = common::prepared_processor();
    processor.new_game().expect("game should start");
    let board = processor.board().expect("board");
    let frame = common::fixture_frame();

    assert!(processor.show_labels().expect("flag"));
    let with_labels = processor.render_frame(&frame).expect("render").clone();
    assert!(!processor.toggle_labels().expect("toggle"));
    let without_labels = processor.render_frame(&frame).expect("render").clone();

    let layout = PuzzleCanvas::new(common::FRAME_SIDE, common::FRAME_SIDE, RenderStyle::default())
        .expect("layout canvas");
    let label_rects: Vec<_> = (0..GRID_AREA)
        .filter(|&slot| board.tile_at(slot) != EMPTY_TILE)
        .map(|slot| {
            layout
                .label_rect(slot, board.tile_at(slot))
                .expect("label rect should exist")
        })
        .collect();

    for rect in &label_rects {
        let differs = (rect.y..rect.y + rect.height).any(|y| {
            (rect.x..rect.x + rect.width).any(|x| with_labels.pixel(x, y) != without_labels.pixel(x, y))
        });
        assert!(differs, "label region {rect:?} should change");
    }

    for y in 0..common::FRAME_SIDE {
        for x in 0..common::FRAME_SIDE {
            if label_rects.iter().any(|rect| rect.contains(x, y)) {
                continue;
            }
            assert_eq!(with_labels.pixel(x, y), without_labels.pixel(x, y));
        }
    }
}
