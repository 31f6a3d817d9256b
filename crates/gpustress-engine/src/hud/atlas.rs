/// Glyphs in the digit atlas: `0`..=`9` followed by the decimal point.
pub const GLYPH_COUNT: usize = 11;

/// Atlas index of the decimal point, one past the `9` glyph.
pub const DECIMAL_POINT_GLYPH: u8 = 10;

/// Texture-coordinate layout of the digit atlas plus glyph metrics.
///
/// Only the horizontal extent of each glyph is stored. Vertical texture
/// coordinates come from the quad template, since every glyph spans the full
/// atlas height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphAtlasLayout {
    /// Left edge U coordinate per glyph.
    pub uv_start: [f32; GLYPH_COUNT],

    /// Right edge U coordinate per glyph.
    pub uv_end: [f32; GLYPH_COUNT],

    /// On-screen glyph width (logical px).
    pub glyph_width: f32,

    /// Gap between neighbouring glyphs (logical px).
    pub glyph_spacing: f32,
}

impl GlyphAtlasLayout {
    /// Layout for an atlas made of `GLYPH_COUNT` equal cells in a single row.
    pub const fn horizontal_strip(glyph_width: f32, glyph_spacing: f32) -> Self {
        let mut uv_start = [0.0; GLYPH_COUNT];
        let mut uv_end = [0.0; GLYPH_COUNT];

        let mut i = 0;
        while i < GLYPH_COUNT {
            uv_start[i] = i as f32 / GLYPH_COUNT as f32;
            uv_end[i] = (i + 1) as f32 / GLYPH_COUNT as f32;
            i += 1;
        }

        Self {
            uv_start,
            uv_end,
            glyph_width,
            glyph_spacing,
        }
    }

    /// Horizontal distance between the origins of neighbouring glyphs.
    #[inline]
    pub fn advance(&self) -> f32 {
        self.glyph_width + self.glyph_spacing
    }

    /// Maps a character to its atlas index.
    pub fn glyph_for(c: char) -> Option<u8> {
        match c {
            '.' => Some(DECIMAL_POINT_GLYPH),
            // to_digit(10) is < 10, the cast cannot truncate.
            _ => c.to_digit(10).map(|d| d as u8),
        }
    }
}

/// The layout matching the atlas produced by [`super::font::rasterize_digit_atlas`].
pub const DIGIT_ATLAS: GlyphAtlasLayout = GlyphAtlasLayout::horizontal_strip(24.0, 4.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_cells_are_contiguous() {
        let atlas = DIGIT_ATLAS;
        assert_eq!(atlas.uv_start[0], 0.0);
        assert!((atlas.uv_end[GLYPH_COUNT - 1] - 1.0).abs() < 1e-6);
        for i in 1..GLYPH_COUNT {
            assert_eq!(atlas.uv_start[i], atlas.uv_end[i - 1]);
        }
    }

    #[test]
    fn glyph_indices() {
        assert_eq!(GlyphAtlasLayout::glyph_for('0'), Some(0));
        assert_eq!(GlyphAtlasLayout::glyph_for('9'), Some(9));
        assert_eq!(GlyphAtlasLayout::glyph_for('.'), Some(DECIMAL_POINT_GLYPH));
        assert_eq!(GlyphAtlasLayout::glyph_for('-'), None);
        assert_eq!(GlyphAtlasLayout::glyph_for('e'), None);
    }

    #[test]
    fn advance_is_width_plus_spacing() {
        assert_eq!(DIGIT_ATLAS.advance(), 28.0);
    }
}
