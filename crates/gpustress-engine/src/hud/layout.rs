use super::atlas::{GlyphAtlasLayout, DECIMAL_POINT_GLYPH, DIGIT_ATLAS};

/// Vertices emitted per glyph (two triangles).
pub const VERTICES_PER_GLYPH: usize = 6;

/// Largest value shown; anything above is clamped.
pub const MAX_DISPLAY_VALUE: f32 = 99_999.9;

/// Upper bound on glyphs per run: five integer digits, the point and one decimal.
pub const MAX_GLYPHS: usize = 7;

/// One vertex of the glyph quad template.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TemplateVertex {
    /// Position of the first glyph's vertex (logical px, +Y down).
    pub pos: [f32; 3],

    /// Vertical texture coordinate.
    pub v: f32,

    /// Whether this vertex lies on the glyph's left edge (selects `uv_start`).
    pub left_edge: bool,
}

const fn corner(x: f32, y: f32, v: f32, left_edge: bool) -> TemplateVertex {
    TemplateVertex {
        pos: [x, y, 0.0],
        v,
        left_edge,
    }
}

const QUAD_LEFT: f32 = 16.0;
const QUAD_TOP: f32 = 16.0;
const QUAD_RIGHT: f32 = QUAD_LEFT + DIGIT_ATLAS.glyph_width;
const QUAD_BOTTOM: f32 = QUAD_TOP + 32.0;

/// Upper-left anchored glyph quad used by the fps overlay.
pub const DIGIT_QUAD: [TemplateVertex; VERTICES_PER_GLYPH] = [
    corner(QUAD_LEFT, QUAD_TOP, 0.0, true),
    corner(QUAD_RIGHT, QUAD_TOP, 0.0, false),
    corner(QUAD_RIGHT, QUAD_BOTTOM, 1.0, false),
    corner(QUAD_LEFT, QUAD_TOP, 0.0, true),
    corner(QUAD_RIGHT, QUAD_BOTTOM, 1.0, false),
    corner(QUAD_LEFT, QUAD_BOTTOM, 1.0, true),
];

/// A glyph and its horizontal offset from the template position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphPlacement {
    pub glyph: u8,
    pub x_offset: f32,
}

/// Glyph placements for one displayed value, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigitRun {
    pub glyphs: Vec<GlyphPlacement>,
}

/// Per-vertex buffers for one triangle-list draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigitMesh {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
}

impl DigitMesh {
    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.positions.len() / VERTICES_PER_GLYPH
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Formats `value` the way the overlay displays it.
///
/// Always one fractional digit. NaN and non-positive values show as `0.0`,
/// values above [`MAX_DISPLAY_VALUE`] (including infinity) are clamped.
pub fn format_display_value(value: f32) -> String {
    let value = if value > 0.0 {
        value.min(MAX_DISPLAY_VALUE)
    } else {
        0.0
    };
    format!("{value:.1}")
}

/// Number of characters of `text` that get a glyph.
///
/// Everything up to the first `.`, the `.` itself and one character after it.
pub fn counted_glyphs(text: &str) -> usize {
    match text.find('.') {
        Some(point) => (point + 2).min(text.len()),
        None => text.len(),
    }
}

/// Lays out numbers as glyph quads against a fixed atlas and quad template.
///
/// The glyph following the decimal point is pulled left by half a glyph width,
/// closing the gap the narrow point leaves behind. Only one digit after the point
/// is ever emitted.
#[derive(Debug, Clone)]
pub struct DigitLayoutEngine {
    atlas: GlyphAtlasLayout,
    quad: [TemplateVertex; VERTICES_PER_GLYPH],
}

impl DigitLayoutEngine {
    pub fn new(atlas: GlyphAtlasLayout, quad: [TemplateVertex; VERTICES_PER_GLYPH]) -> Self {
        Self { atlas, quad }
    }

    pub fn atlas(&self) -> &GlyphAtlasLayout {
        &self.atlas
    }

    /// Computes glyph placements for `value`.
    pub fn run(&self, value: f32) -> DigitRun {
        let text = format_display_value(value);
        let counted = counted_glyphs(&text);
        let advance = self.atlas.advance();

        let mut glyphs = Vec::with_capacity(counted);
        let mut after_point = false;

        for (index, c) in text.chars().take(counted).enumerate() {
            let Some(glyph) = GlyphAtlasLayout::glyph_for(c) else { break };

            let mut x_offset = index as f32 * advance;
            if after_point {
                x_offset -= self.atlas.glyph_width / 2.0;
            }

            glyphs.push(GlyphPlacement { glyph, x_offset });

            if glyph == DECIMAL_POINT_GLYPH {
                after_point = true;
            }
        }

        DigitRun { glyphs }
    }

    /// Builds vertex and texcoord buffers for `value`, sized exactly
    /// `VERTICES_PER_GLYPH * glyphs`.
    pub fn layout(&self, value: f32) -> DigitMesh {
        let run = self.run(value);
        let len = run.glyphs.len() * VERTICES_PER_GLYPH;

        let mut positions = Vec::with_capacity(len);
        let mut texcoords = Vec::with_capacity(len);

        for placement in &run.glyphs {
            let glyph = usize::from(placement.glyph);

            for vertex in &self.quad {
                let [x, y, z] = vertex.pos;
                positions.push([x + placement.x_offset, y, z]);

                let u = if vertex.left_edge {
                    self.atlas.uv_start[glyph]
                } else {
                    self.atlas.uv_end[glyph]
                };
                texcoords.push([u, vertex.v]);
            }
        }

        DigitMesh {
            positions,
            texcoords,
        }
    }
}

impl Default for DigitLayoutEngine {
    fn default() -> Self {
        Self::new(DIGIT_ATLAS, DIGIT_QUAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(run: &DigitRun) -> Vec<u8> {
        run.glyphs.iter().map(|g| g.glyph).collect()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── formatting ────────────────────────────────────────────────────────

    #[test]
    fn format_always_has_one_decimal() {
        assert_eq!(format_display_value(60.0), "60.0");
        assert_eq!(format_display_value(59.94), "59.9");
        assert_eq!(format_display_value(0.04), "0.0");
        assert_eq!(format_display_value(144.27), "144.3");
    }

    #[test]
    fn format_clamps_degenerate_values() {
        assert_eq!(format_display_value(f32::NAN), "0.0");
        assert_eq!(format_display_value(-12.5), "0.0");
        assert_eq!(format_display_value(-0.0), "0.0");
        assert_eq!(format_display_value(f32::INFINITY), "99999.9");
        assert_eq!(format_display_value(1.0e12), "99999.9");
    }

    #[test]
    fn counting_stops_one_past_the_point() {
        assert_eq!(counted_glyphs("42.7"), 4);
        assert_eq!(counted_glyphs("3.14159"), 3);
        assert_eq!(counted_glyphs("120"), 3);
        assert_eq!(counted_glyphs("7."), 2);
    }

    // ── runs ──────────────────────────────────────────────────────────────

    #[test]
    fn one_fractional_digit_gives_four_glyphs() {
        let engine = DigitLayoutEngine::default();
        let run = engine.run(42.7);
        assert_eq!(glyphs(&run), vec![4, 2, DECIMAL_POINT_GLYPH, 7]);

        let a = engine.atlas().advance();
        let w = engine.atlas().glyph_width;
        let offsets: Vec<f32> = run.glyphs.iter().map(|g| g.x_offset).collect();
        assert!(approx(offsets[0], 0.0));
        assert!(approx(offsets[1], a));
        assert!(approx(offsets[2], 2.0 * a));
        assert!(approx(offsets[3], 3.0 * a - w / 2.0));
    }

    #[test]
    fn whole_number_still_gets_point_and_digit() {
        let engine = DigitLayoutEngine::default();
        let run = engine.run(100.0);
        assert_eq!(glyphs(&run), vec![1, 0, 0, DECIMAL_POINT_GLYPH, 0]);
        assert_eq!(run.glyphs.len(), 3 + 2);
    }

    #[test]
    fn degenerate_input_is_bounded() {
        let engine = DigitLayoutEngine::default();
        assert_eq!(glyphs(&engine.run(f32::NAN)), vec![0, DECIMAL_POINT_GLYPH, 0]);
        assert_eq!(engine.run(f32::INFINITY).glyphs.len(), MAX_GLYPHS);
        assert_eq!(engine.layout(f32::MAX).glyph_count(), MAX_GLYPHS);
    }

    // ── meshes ────────────────────────────────────────────────────────────

    #[test]
    fn fps_59_94_geometry() {
        let engine = DigitLayoutEngine::default();
        let mesh = engine.layout(59.94);

        assert_eq!(mesh.glyph_count(), 4);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.texcoords.len(), 24);

        let a = engine.atlas().advance();
        let w = engine.atlas().glyph_width;

        // Quad 2 is the point, unshifted.
        for (i, vertex) in DIGIT_QUAD.iter().enumerate() {
            assert!(approx(mesh.positions[12 + i][0], vertex.pos[0] + 2.0 * a));
            assert_eq!(mesh.positions[12 + i][1], vertex.pos[1]);
        }
        // Quad 3 is the trailing 9, shifted left by half a glyph.
        for (i, vertex) in DIGIT_QUAD.iter().enumerate() {
            assert!(approx(mesh.positions[18 + i][0], vertex.pos[0] + 3.0 * a - w / 2.0));
        }
    }

    #[test]
    fn texcoords_follow_left_edge_flag() {
        let engine = DigitLayoutEngine::default();
        let mesh = engine.layout(59.94);
        let atlas = engine.atlas();

        // Quad 0 is the `5` glyph.
        for (i, vertex) in DIGIT_QUAD.iter().enumerate() {
            let expected_u = if vertex.left_edge { atlas.uv_start[5] } else { atlas.uv_end[5] };
            assert_eq!(mesh.texcoords[i], [expected_u, vertex.v]);
        }
        // Quad 2 is the point.
        assert_eq!(mesh.texcoords[12][0], atlas.uv_start[DECIMAL_POINT_GLYPH as usize]);
        assert_eq!(mesh.texcoords[13][0], atlas.uv_end[DECIMAL_POINT_GLYPH as usize]);
    }

    #[test]
    fn buffers_are_sized_exactly() {
        let engine = DigitLayoutEngine::default();
        let mesh = engine.layout(7.5);
        assert_eq!(mesh.positions.len(), 3 * VERTICES_PER_GLYPH);
        assert_eq!(mesh.texcoords.len(), mesh.positions.len());
    }

    #[test]
    fn layout_is_deterministic() {
        let engine = DigitLayoutEngine::default();
        let a = engine.layout(1234.56);
        let b = engine.layout(1234.56);

        let a_pos: &[u8] = bytemuck::cast_slice(&a.positions);
        let b_pos: &[u8] = bytemuck::cast_slice(&b.positions);
        let a_uv: &[u8] = bytemuck::cast_slice(&a.texcoords);
        let b_uv: &[u8] = bytemuck::cast_slice(&b.texcoords);
        assert_eq!(a_pos, b_pos);
        assert_eq!(a_uv, b_uv);
    }

    #[test]
    fn custom_template_is_respected() {
        let quad = DIGIT_QUAD.map(|v| TemplateVertex {
            pos: [v.pos[0] + 100.0, v.pos[1] + 50.0, 0.5],
            ..v
        });
        let engine = DigitLayoutEngine::new(DIGIT_ATLAS, quad);
        let mesh = engine.layout(1.0);
        assert_eq!(mesh.positions[0], [QUAD_LEFT + 100.0, QUAD_TOP + 50.0, 0.5]);
    }
}
