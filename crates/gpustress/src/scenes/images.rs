//! Procedural RGBA8 images for the textured scenes.

/// Side of one checker square in texels.
const CHECKER_CELL: u32 = 8;

/// Black and white checkerboard, fully opaque.
pub fn checkerboard(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let white = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0;
            let c = if white { 0xFF } else { 0x00 };
            pixels.extend_from_slice(&[c, c, c, 0xFF]);
        }
    }
    pixels
}

/// Gauge face: light disc with a dark rim and twelve tick marks, transparent
/// outside the rim. Premultiplied alpha.
pub fn dial_face(size: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; (size * size * 4) as usize];
    let half = size as f32 / 2.0;

    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let r = (dx * dx + dy * dy).sqrt();
            if r > 1.0 {
                continue;
            }

            let rgb = if r > 0.92 {
                [40, 44, 52]
            } else if r > 0.72 && on_tick(dx, dy) {
                [230, 80, 40]
            } else {
                [210, 214, 220]
            };

            let i = ((y * size + x) * 4) as usize;
            pixels[i..i + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 0xFF]);
        }
    }
    pixels
}

/// True within a narrow wedge around each hour position.
fn on_tick(dx: f32, dy: f32) -> bool {
    let step = std::f32::consts::TAU / 12.0;
    let a = dy.atan2(dx).rem_euclid(step);
    a < 0.04 || a > step - 0.04
}
