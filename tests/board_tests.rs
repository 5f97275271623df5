//! Board tests - collision, merging and row removal on variable-size boards

use led_tetris::core::{get_shape, Board};
use led_tetris::types::{PieceKind, Rgb};

const RED: Rgb = Rgb::new(255, 0, 0);

#[test]
fn test_board_new_empty() {
    let board = Board::new(8, 12);
    assert_eq!(board.width(), 8);
    assert_eq!(board.height(), 12);

    for row in 0..12 {
        for col in 0..8 {
            assert!(board.is_free(col, row), "Cell ({}, {}) should be free", col, row);
            assert_eq!(board.get(col, row), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(10, 20);

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(10, 0), None);
    assert_eq!(board.get(0, 20), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new(10, 20);

    assert!(board.set(5, 10, Some(RED)));
    assert_eq!(board.get(5, 10), Some(Some(RED)));
    assert!(!board.is_free(5, 10));

    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));

    assert!(!board.set(-1, 0, Some(RED)));
    assert!(!board.set(0, 20, Some(RED)));
}

#[test]
fn test_walls_and_floor_block() {
    let board = Board::new(10, 20);
    let o = get_shape(PieceKind::O);

    assert!(board.is_valid(&o, 0, 0));
    assert!(board.is_valid(&o, 8, 18));
    assert!(!board.is_valid(&o, -1, 0));
    assert!(!board.is_valid(&o, 9, 0));
    assert!(!board.is_valid(&o, 0, 19));
}

#[test]
fn test_spawn_band_allows_hanging_piece() {
    let board = Board::new(10, 20);
    let i = get_shape(PieceKind::I).rotated(true);
    // Vertical I three cells above the top edge, one on the board.
    assert!(board.is_valid(&i, 0, -3));
    assert!(!board.is_valid(&i, -3, -3));
}

#[test]
fn test_merge_then_collide() {
    let mut board = Board::new(10, 20);
    let t = get_shape(PieceKind::T);

    assert_eq!(board.merge(&t, RED, 3, 18), 0);
    assert_eq!(board.get(4, 18), Some(Some(RED)));
    assert_eq!(board.get(3, 19), Some(Some(RED)));
    assert_eq!(board.get(5, 19), Some(Some(RED)));
    assert!(!board.is_valid(&t, 3, 18));
    assert!(board.is_valid(&t, 3, 16));
}

#[test]
fn test_find_full_rows_ascending() {
    let mut board = Board::new(4, 6);
    board.fill_row(5, RED);
    board.fill_row(2, RED);
    board.set(0, 4, Some(RED));

    assert_eq!(board.find_full_rows(), vec![2, 5]);
    assert!(board.is_row_full(5));
    assert!(!board.is_row_full(4));
    assert!(!board.is_row_full(6));
}

#[test]
fn test_remove_rows_shifts_down_and_refills_top() {
    let mut board = Board::from_ascii(&["#...", "####", ".#..", "####", "..#."], RED);

    board.remove_rows(&[1, 3]);

    let expected = Board::from_ascii(&["....", "....", "#...", ".#..", "..#."], RED);
    assert_eq!(board, expected);
}

#[test]
fn test_remove_no_rows_is_noop() {
    let mut board = Board::from_ascii(&["#...", ".#..", "..#."], RED);
    let before = board.clone();
    board.remove_rows(&[]);
    assert_eq!(board, before);
}

#[test]
fn test_clear_empties_everything() {
    let mut board = Board::new(5, 5);
    board.fill_row(0, RED);
    board.fill_row(4, RED);
    board.clear();
    assert!(board.cells().iter().all(|c| c.is_none()));
}

#[test]
fn test_merge_completing_rows_then_clear_leaves_none_full() {
    let mut board = Board::from_ascii(
        &[
            "......",
            "......",
            "#.....",
            "##.###",
            "##.###",
            "##.###",
        ],
        RED,
    );
    // Vertical I occupies column 2 of its 4x4 box.
    let i = get_shape(PieceKind::I).rotated(true);
    assert!(board.is_valid(&i, 0, 2));
    assert_eq!(board.merge(&i, RED, 0, 2), 0);

    let full = board.find_full_rows();
    assert_eq!(full, vec![3, 4, 5]);
    board.remove_rows(&full);

    assert!(board.find_full_rows().is_empty());
    // Row 2 ("#.#...") is all that is left, now on the floor.
    assert_eq!(board.get(0, 5), Some(Some(RED)));
    assert_eq!(board.get(2, 5), Some(Some(RED)));
    assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 2);
}
