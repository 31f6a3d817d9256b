//! On-screen fps counter.
//!
//! Numbers are laid out as textured quads from a fixed 11-glyph bitmap atlas
//! (digits and the decimal point). No font shaping is involved:
//!
//! 1. [`rasterize_digit_atlas`] builds the atlas image once at startup
//! 2. [`DigitLayoutEngine::layout`] turns a value into vertex/texcoord buffers each frame
//! 3. `render::DigitRenderer` uploads and draws them in a single call

mod atlas;
mod font;
mod layout;

pub use atlas::{GlyphAtlasLayout, DECIMAL_POINT_GLYPH, DIGIT_ATLAS, GLYPH_COUNT};
pub use font::{rasterize_digit_atlas, DigitAtlasImage, CELL_HEIGHT, CELL_WIDTH};
pub use layout::{
    counted_glyphs, format_display_value, DigitLayoutEngine, DigitMesh, DigitRun, GlyphPlacement,
    TemplateVertex, DIGIT_QUAD, MAX_DISPLAY_VALUE, MAX_GLYPHS, VERTICES_PER_GLYPH,
};
