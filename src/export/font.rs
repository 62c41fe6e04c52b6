//! Minimal 3x5 bitmap font for chart labels.
//!
//! Covers digits, `A`-`Z` (lowercase is drawn as uppercase), space and
//! `.-()`. Each glyph cell is 3 pixels wide plus 1 pixel of spacing, scaled
//! by an integer factor.

use image::{Rgb, RgbImage};

/// Glyph height in unscaled pixels.
pub const GLYPH_HEIGHT: u32 = 5;

/// Horizontal advance per character in unscaled pixels.
const ADVANCE: u32 = 4;

/// Glyph rows, one byte per row, high bit on the left.
pub fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0; 5],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * ADVANCE * scale
}

/// Height in pixels of a line of text drawn at `scale`.
pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

/// Set a pixel, ignoring coordinates outside the image.
pub fn put_pixel(img: &mut RgbImage, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

/// Draw `text` left to right with its top-left corner at `(x, y)`.
pub fn draw_text(
    img: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    scale: u32,
    color: [u8; 3],
) {
    let scale = scale as i64;
    let advance = ADVANCE as i64 * scale;
    for (i, c) in text.chars().enumerate() {
        let origin = x + i as i64 * advance;
        fill_glyph(c, |col, row| {
            fill_square(img, origin + col * scale, y + row * scale, scale, color);
        });
    }
}

/// Draw `text` bottom to top (rotated a quarter turn counter-clockwise) with
/// its bottom-left corner at `(x, y)`.
pub fn draw_text_up(
    img: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    scale: u32,
    color: [u8; 3],
) {
    let scale = scale as i64;
    let advance = ADVANCE as i64 * scale;
    for (i, c) in text.chars().enumerate() {
        let origin = y - i as i64 * advance;
        fill_glyph(c, |col, row| {
            fill_square(img, x + row * scale, origin - (col + 1) * scale, scale, color);
        });
    }
}

/// Call `plot(col, row)` for each lit cell of the glyph for `c`.
fn fill_glyph(c: char, mut plot: impl FnMut(i64, i64)) {
    let Some(rows) = glyph(c) else {
        return;
    };
    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..3_i64 {
            if (bits >> (2 - col)) & 1 == 1 {
                plot(col, row as i64);
            }
        }
    }
}

fn fill_square(img: &mut RgbImage, x: i64, y: i64, size: i64, color: [u8; 3]) {
    for dy in 0..size {
        for dx in 0..size {
            put_pixel(img, x + dx, y + dy, color);
        }
    }
}
