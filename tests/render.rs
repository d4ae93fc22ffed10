//! Preview renderer behavior: determinism, clamping and check marking.

use dchess_server::error::Error;
use dchess_server::render::{render_preview, IMAGE_SIZE};

fn moves(list: &[&str]) -> Vec<String> {
    list.iter().map(|m| m.to_string()).collect()
}

#[test]
fn start_position_is_a_512_square_png() {
    let png = render_preview(&[], 0).unwrap();
    let img = image::load_from_memory(&png).expect("valid png");
    assert_eq!(img.width(), IMAGE_SIZE);
    assert_eq!(img.height(), IMAGE_SIZE);
}

#[test]
fn index_zero_always_renders_the_start_position() {
    let game = moves(&["e4", "e5", "Nf3", "Nc6"]);
    assert_eq!(render_preview(&game, 0).unwrap(), render_preview(&[], 0).unwrap());
}

#[test]
fn oversized_index_clamps_to_final_position() {
    let game = moves(&["e4", "e5", "Nf3"]);
    let last = render_preview(&game, game.len()).unwrap();
    let clamped = render_preview(&game, 999).unwrap();
    assert_eq!(last, clamped);
}

#[test]
fn output_is_deterministic() {
    let game = moves(&["d4", "d5", "c4"]);
    assert_eq!(render_preview(&game, 2).unwrap(), render_preview(&game, 2).unwrap());
}

#[test]
fn positions_at_different_indices_differ() {
    let game = moves(&["e4", "e5"]);
    assert_ne!(render_preview(&game, 1).unwrap(), render_preview(&game, 2).unwrap());
}

#[test]
fn check_changes_the_rendered_board() {
    // 1. f3 e5 2. g4 Qh4# — black delivers mate, white king square is marked
    let game = moves(&["f3", "e5", "g4", "Qh4"]);
    let before_check = render_preview(&game, 3).unwrap();
    let in_check = render_preview(&game, 4).unwrap();
    assert_ne!(before_check, in_check);
}

#[test]
fn malformed_san_is_a_render_error() {
    let game = moves(&["e4", "zz9"]);
    let err = render_preview(&game, 2).unwrap_err();
    assert!(matches!(err, Error::Render(_)));
}

#[test]
fn moves_past_the_target_index_are_never_parsed() {
    // the junk token sits beyond the requested prefix
    let game = moves(&["e4", "zz9"]);
    assert!(render_preview(&game, 1).is_ok());
}
