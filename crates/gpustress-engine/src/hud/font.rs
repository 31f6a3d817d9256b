//! 5×7 bitmap digit font.

use super::atlas::GLYPH_COUNT;

const BITMAP_WIDTH: usize = 5;
const BITMAP_HEIGHT: usize = 7;

/// Pixels per bitmap dot.
const SCALE: usize = 4;

/// Empty border around each scaled glyph inside its cell.
const PADDING: usize = 2;

/// Width of one atlas cell in texels.
pub const CELL_WIDTH: usize = BITMAP_WIDTH * SCALE + 2 * PADDING;

/// Height of one atlas cell (and of the atlas) in texels.
pub const CELL_HEIGHT: usize = BITMAP_HEIGHT * SCALE + 2 * PADDING;

/// Rows top to bottom; bit 4 is the leftmost column.
const GLYPHS: [[u8; BITMAP_HEIGHT]; GLYPH_COUNT] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C], // .
];

/// Single-channel coverage image of the digit atlas.
#[derive(Debug, Clone)]
pub struct DigitAtlasImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, one byte per texel.
    pub pixels: Vec<u8>,
}

#[cfg(test)]
impl DigitAtlasImage {
    fn texel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width as usize + x]
    }
}

/// Rasterises all glyphs into one row of `CELL_WIDTH × CELL_HEIGHT` cells, in
/// atlas index order, matching [`super::DIGIT_ATLAS`].
pub fn rasterize_digit_atlas() -> DigitAtlasImage {
    let width = CELL_WIDTH * GLYPH_COUNT;
    let mut pixels = vec![0u8; width * CELL_HEIGHT];

    for (glyph, rows) in GLYPHS.iter().enumerate() {
        let cell_x = glyph * CELL_WIDTH + PADDING;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..BITMAP_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }

                let x0 = cell_x + col * SCALE;
                let y0 = PADDING + row * SCALE;
                for y in y0..y0 + SCALE {
                    pixels[y * width + x0..y * width + x0 + SCALE].fill(0xFF);
                }
            }
        }
    }

    DigitAtlasImage {
        width: width as u32,
        height: CELL_HEIGHT as u32,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::DIGIT_ATLAS;

    #[test]
    fn atlas_dimensions() {
        let img = rasterize_digit_atlas();
        assert_eq!(img.width as usize, CELL_WIDTH * GLYPH_COUNT);
        assert_eq!(img.height as usize, CELL_HEIGHT);
        assert_eq!(img.pixels.len(), (img.width * img.height) as usize);
    }

    #[test]
    fn cells_line_up_with_uv_layout() {
        let width = (CELL_WIDTH * GLYPH_COUNT) as f32;
        for i in 0..GLYPH_COUNT {
            let start = (i * CELL_WIDTH) as f32 / width;
            assert!((DIGIT_ATLAS.uv_start[i] - start).abs() < 1e-6);
        }
    }

    #[test]
    fn padding_is_empty() {
        let img = rasterize_digit_atlas();
        for glyph in 0..GLYPH_COUNT {
            let left = glyph * CELL_WIDTH;
            for y in 0..CELL_HEIGHT {
                assert_eq!(img.texel(left, y), 0);
                assert_eq!(img.texel(left + CELL_WIDTH - 1, y), 0);
            }
        }
        for x in 0..img.width as usize {
            assert_eq!(img.texel(x, 0), 0);
            assert_eq!(img.texel(x, CELL_HEIGHT - 1), 0);
        }
    }

    #[test]
    fn one_has_a_full_width_base() {
        // Bottom row of `1` is 0x0E: columns 1..=3 set.
        let img = rasterize_digit_atlas();
        let y = PADDING + 6 * SCALE;
        let cell = CELL_WIDTH;
        assert_eq!(img.texel(cell + PADDING, y), 0);
        assert_eq!(img.texel(cell + PADDING + SCALE, y), 0xFF);
        assert_eq!(img.texel(cell + PADDING + 3 * SCALE + SCALE - 1, y), 0xFF);
        assert_eq!(img.texel(cell + PADDING + 4 * SCALE, y), 0);
    }

    #[test]
    fn decimal_point_sits_on_the_baseline() {
        let img = rasterize_digit_atlas();
        let cell = 10 * CELL_WIDTH + PADDING;
        assert_eq!(img.texel(cell + 2 * SCALE, PADDING), 0);
        assert_eq!(img.texel(cell + 2 * SCALE, PADDING + 6 * SCALE), 0xFF);
    }
}
