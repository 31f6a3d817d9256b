use std::path::Path;

use crate::error::ParamsError;
use crate::params::{StressParams, DEFAULT_SIZE, PYRAMID_AXIS_MAX};
use crate::scene::Scene;

/// Characters considered on numeric lines.
const NUMBER_DIGITS: usize = 5;
/// Characters considered on on/off lines.
const FLAG_DIGITS: usize = 1;

// ── Leading-integer scan ──────────────────────────────────────────────────

/// Reads the integer at the start of the first `max_chars` characters of
/// `line`, the way C's `strtol(.., 10)` does: leading whitespace, an optional
/// sign, then as many decimal digits as follow. Anything unparsable is 0.
pub fn parse_leading_int(line: &str, max_chars: usize) -> i64 {
    let mut chars = line.chars().take(max_chars).peekable();

    while chars.next_if(|c| c.is_ascii_whitespace() || *c == '\u{b}').is_some() {}

    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(d) = chars.next_if(char::is_ascii_digit).and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    }

    if negative { -value } else { value }
}

/// Negative values become 0, then `min` is applied.
fn clamp_field(value: i64, min: u32) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX).max(min)
}

// ── Line reader ───────────────────────────────────────────────────────────

/// Hands out the lines of a params file in order; lines past the end read as
/// empty, i.e. as 0.
struct LineReader<'s> {
    lines: std::str::Lines<'s>,
    line: usize,
}

impl<'s> LineReader<'s> {
    fn new(src: &'s str) -> Self {
        Self { lines: src.lines(), line: 0 }
    }

    fn next_line(&mut self) -> &'s str {
        self.line += 1;
        self.lines.next().unwrap_or("")
    }

    fn number(&mut self, min: u32) -> u32 {
        clamp_field(parse_leading_int(self.next_line(), NUMBER_DIGITS), min)
    }

    fn pyramid_axis(&mut self) -> u32 {
        let n = self.number(1);
        if n > PYRAMID_AXIS_MAX {
            log::warn!("line {}: {n} pyramids per axis, capping at {PYRAMID_AXIS_MAX}", self.line);
        }
        n.min(PYRAMID_AXIS_MAX)
    }

    fn flag(&mut self) -> bool {
        parse_leading_int(self.next_line(), FLAG_DIGITS) > 0
    }
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Parses the contents of a `params.txt` file.
///
/// Never fails: every line is read leniently, see [`parse_leading_int`].
pub fn parse_str(src: &str) -> StressParams {
    let mut r = LineReader::new(src);

    let mut width = r.number(0);
    let mut height = r.number(0);
    if width == 0 || height == 0 {
        log::warn!(
            "window size {width}x{height} is empty, using {}x{}",
            DEFAULT_SIZE.0,
            DEFAULT_SIZE.1
        );
        (width, height) = DEFAULT_SIZE;
    }

    let fullscreen = r.flag();
    let record_metrics = r.flag();
    let offscreen = r.flag();
    let vsync = r.flag();
    let no_swapbuffer = r.flag();

    let scene_line = r.line + 1;
    let scene_index = r.number(0);
    let scene = Scene::from_index(scene_index).unwrap_or_else(|| {
        log::warn!("line {scene_line}: scene {scene_index} not supported, defaulting to dial");
        Scene::Dial
    });

    let texture_flat = r.flag();
    let texture_fetch_radius = r.number(1);

    let pyramids = [r.pyramid_axis(), r.pyramid_axis(), r.pyramid_axis()];
    let batch_count = r.number(1);

    let pyramid_shader_loops = r.number(0);
    let dial_shader_loops = r.number(0);
    let long_shader_loops = r.number(0);
    let frames_to_render = r.number(0);

    StressParams {
        width,
        height,
        fullscreen,
        record_metrics,
        offscreen,
        vsync,
        no_swapbuffer,
        scene,
        texture_flat,
        texture_fetch_radius,
        pyramids,
        batch_count,
        pyramid_shader_loops,
        dial_shader_loops,
        long_shader_loops,
        frames_to_render,
    }
}

/// Reads and parses a params file.
pub fn load(path: impl AsRef<Path>) -> Result<StressParams, ParamsError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ParamsError::read(path, &e))?;
    log::info!("reading config from {}", path.display());
    Ok(parse_str(&String::from_utf8_lossy(&bytes)))
}
