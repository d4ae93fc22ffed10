//! Board-position preview rendering.
//!
//! Reconstructs the position after a prefix of the game's SAN moves and
//! rasterizes it to a fixed 512×512 PNG. Output is fully deterministic:
//! same moves + same index ⇒ byte-identical image. Coordinate labels are
//! intentionally absent. When the side to move is in check, its king
//! square is drawn on the alert color.

use crate::error::{Error, Result};
use chess::{Board, ChessMove, Color, File, Piece, Rank, Square};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const IMAGE_SIZE: u32 = 512;
const SQUARE_PX: i32 = 64;
/// Mask pixels are scaled 4× onto a 64px square.
const GLYPH_SCALE: i32 = 4;

const LIGHT_SQUARE: Rgb<u8> = Rgb([240, 217, 181]);
const DARK_SQUARE: Rgb<u8> = Rgb([181, 136, 99]);
const CHECK_SQUARE: Rgb<u8> = Rgb([235, 97, 80]);
const WHITE_FILL: Rgb<u8> = Rgb([248, 248, 248]);
const WHITE_EDGE: Rgb<u8> = Rgb([70, 70, 70]);
const BLACK_FILL: Rgb<u8> = Rgb([40, 40, 40]);
const BLACK_EDGE: Rgb<u8> = Rgb([215, 215, 215]);

/// Position after applying the first `count` moves to the start position.
pub fn position_after(moves: &[String], count: usize) -> Result<Board> {
    let mut board = Board::default();
    for san in moves.iter().take(count) {
        // exports carry check/annotation suffixes the parser does not want
        let san = san.trim_end_matches(['+', '#', '!', '?']);
        let mv = ChessMove::from_san(&board, san)
            .map_err(|e| Error::Render(format!("bad move '{san}': {e}")))?;
        board = board.make_move_new(mv);
    }
    Ok(board)
}

/// PNG preview of the position after `target_index` moves. An index past
/// the end of the game clamps to the final position.
pub fn render_preview(moves: &[String], target_index: usize) -> Result<Vec<u8>> {
    let board = position_after(moves, target_index.min(moves.len()))?;

    let check_square = if board.checkers().popcnt() > 0 {
        Some(board.king_square(board.side_to_move()))
    } else {
        None
    };

    let img = draw_board(&board, check_square);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(bytes)
}

/// White's perspective: rank 8 on top, file a on the left.
fn draw_board(board: &Board, check_square: Option<Square>) -> RgbImage {
    let mut img = RgbImage::new(IMAGE_SIZE, IMAGE_SIZE);

    for rank in 0..8usize {
        for file in 0..8usize {
            let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
            let x0 = file as i32 * SQUARE_PX;
            let y0 = (7 - rank) as i32 * SQUARE_PX;

            let base = if check_square == Some(sq) {
                CHECK_SQUARE
            } else if (rank + file) % 2 == 0 {
                DARK_SQUARE
            } else {
                LIGHT_SQUARE
            };
            fill_square(&mut img, x0, y0, base);

            if let Some(piece) = board.piece_on(sq) {
                let (fill, edge) = match board.color_on(sq) {
                    Some(Color::White) => (WHITE_FILL, WHITE_EDGE),
                    _ => (BLACK_FILL, BLACK_EDGE),
                };
                let mask = glyph(piece);
                // edge pass first, then the fill on top
                for (dx, dy) in [(-2, 0), (2, 0), (0, -2), (0, 2)] {
                    draw_mask(&mut img, x0 + dx, y0 + dy, mask, edge);
                }
                draw_mask(&mut img, x0, y0, mask, fill);
            }
        }
    }
    img
}

fn fill_square(img: &mut RgbImage, x0: i32, y0: i32, color: Rgb<u8>) {
    for dy in 0..SQUARE_PX {
        for dx in 0..SQUARE_PX {
            img.put_pixel((x0 + dx) as u32, (y0 + dy) as u32, color);
        }
    }
}

fn draw_mask(img: &mut RgbImage, x0: i32, y0: i32, mask: &[u16; 16], color: Rgb<u8>) {
    for (row, bits) in mask.iter().enumerate() {
        for col in 0..16 {
            if bits & (0x8000u16 >> col) == 0 {
                continue;
            }
            for dy in 0..GLYPH_SCALE {
                for dx in 0..GLYPH_SCALE {
                    let x = x0 + col * GLYPH_SCALE + dx;
                    let y = y0 + row as i32 * GLYPH_SCALE + dy;
                    if (0..IMAGE_SIZE as i32).contains(&x) && (0..IMAGE_SIZE as i32).contains(&y) {
                        img.put_pixel(x as u32, y as u32, color);
                    }
                }
            }
        }
    }
}

/// 16×16 piece silhouettes, bit 15 = leftmost pixel of the row.
fn glyph(piece: Piece) -> &'static [u16; 16] {
    match piece {
        Piece::Pawn => &PAWN,
        Piece::Knight => &KNIGHT,
        Piece::Bishop => &BISHOP,
        Piece::Rook => &ROOK,
        Piece::Queen => &QUEEN,
        Piece::King => &KING,
    }
}

const PAWN: [u16; 16] = [
    0b0000000000000000,
    0b0000000000000000,
    0b0000000000000000,
    0b0000001111000000,
    0b0000011111100000,
    0b0000011111100000,
    0b0000001111000000,
    0b0000001111000000,
    0b0000011111100000,
    0b0000011111100000,
    0b0000001111000000,
    0b0000001111000000,
    0b0000011111100000,
    0b0000111111110000,
    0b0001111111111000,
    0b0000000000000000,
];

const KNIGHT: [u16; 16] = [
    0b0000000000000000,
    0b0000001110000000,
    0b0000011111100000,
    0b0001111111110000,
    0b0011111111111000,
    0b0111100111111000,
    0b0110000111111000,
    0b0000001111110000,
    0b0000011111100000,
    0b0000111111000000,
    0b0001111110000000,
    0b0011111111000000,
    0b0011111111100000,
    0b0111111111110000,
    0b0111111111110000,
    0b0000000000000000,
];

const BISHOP: [u16; 16] = [
    0b0000000000000000,
    0b0000000110000000,
    0b0000001111000000,
    0b0000011111100000,
    0b0000111001110000,
    0b0000111001110000,
    0b0000111111110000,
    0b0000111111110000,
    0b0000011111100000,
    0b0000001111000000,
    0b0000001111000000,
    0b0000011111100000,
    0b0000111111110000,
    0b0001111111111000,
    0b0011111111111100,
    0b0000000000000000,
];

const ROOK: [u16; 16] = [
    0b0000000000000000,
    0b0011001111001100,
    0b0011001111001100,
    0b0011111111111100,
    0b0001111111111000,
    0b0000111111110000,
    0b0000111111110000,
    0b0000111111110000,
    0b0000111111110000,
    0b0000111111110000,
    0b0000111111110000,
    0b0001111111111000,
    0b0011111111111100,
    0b0111111111111110,
    0b0111111111111110,
    0b0000000000000000,
];

const QUEEN: [u16; 16] = [
    0b0000000000000000,
    0b0100100110010010,
    0b0100100110010010,
    0b0110111111110110,
    0b0011111111111100,
    0b0001111111111000,
    0b0001111111111000,
    0b0000111111110000,
    0b0000111111110000,
    0b0000111111110000,
    0b0001111111111000,
    0b0001111111111000,
    0b0011111111111100,
    0b0111111111111110,
    0b0111111111111110,
    0b0000000000000000,
];

const KING: [u16; 16] = [
    0b0000000110000000,
    0b0000000110000000,
    0b0000011111100000,
    0b0000000110000000,
    0b0011100110011100,
    0b0111110110111110,
    0b0111111111111110,
    0b0111111111111110,
    0b0011111111111100,
    0b0001111111111000,
    0b0000111111110000,
    0b0000111111110000,
    0b0001111111111000,
    0b0011111111111100,
    0b0111111111111110,
    0b0000000000000000,
];
