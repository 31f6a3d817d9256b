use crate::scene::Scene;

/// Window size used when the params file leaves width or height at 0.
pub const DEFAULT_SIZE: (u32, u32) = (1920, 1080);

/// Step for the `Q`/`A` and `+`/`-` loop adjustments on dial and pyramid shaders.
pub const SHADER_LOOP_STEP: u32 = 25;
/// Step for the long-shader loop adjustment.
pub const LONG_SHADER_LOOP_STEP: u32 = 50;
/// Per-axis step when growing or shrinking the pyramid grid.
pub const PYRAMID_STEP: u32 = 5;
/// Smallest per-axis pyramid count reachable with `-`.
pub const PYRAMID_SHRINK_FLOOR: u32 = 3;
/// Largest per-axis pyramid count, from the params file or `+`. A full
/// 160³ grid is 4 096 000 instances, about 47 MiB of instance offsets.
pub const PYRAMID_AXIS_MAX: u32 = 160;

/// Everything a run is configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressParams {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub record_metrics: bool,
    /// Render scenes into an offscreen texture; only the HUD reaches the window.
    pub offscreen: bool,
    pub vsync: bool,
    /// Skip presenting. Not expressible with wgpu; reported and ignored.
    pub no_swapbuffer: bool,
    pub scene: Scene,

    /// Texture scene draws a flat grey, unrotated quad instead of the blur.
    pub texture_flat: bool,
    /// Blur kernel radius in texels for the texture scene, at least 1.
    pub texture_fetch_radius: u32,

    /// Pyramid grid dimensions, each in `1..=PYRAMID_AXIS_MAX`.
    pub pyramids: [u32; 3],
    /// Number of draw calls the batch scene splits the grid into, at least 1.
    pub batch_count: u32,

    pub pyramid_shader_loops: u32,
    pub dial_shader_loops: u32,
    pub long_shader_loops: u32,

    /// Exit after this many frames; 0 runs until closed.
    pub frames_to_render: u32,
}

impl Default for StressParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
            fullscreen: false,
            record_metrics: false,
            offscreen: false,
            vsync: true,
            no_swapbuffer: false,
            scene: Scene::Dial,
            texture_flat: false,
            texture_fetch_radius: 3,
            pyramids: [10, 10, 10],
            batch_count: 10,
            pyramid_shader_loops: 0,
            dial_shader_loops: 0,
            long_shader_loops: 100,
            frames_to_render: 0,
        }
    }
}

impl StressParams {
    /// Total pyramids in the grid, saturating at `u32::MAX`.
    pub fn pyramid_count(&self) -> u32 {
        let total = self
            .pyramids
            .iter()
            .fold(1u64, |acc, &n| acc.saturating_mul(u64::from(n)));
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    /// Pyramids covered by each draw call of the batch scene (at least one).
    pub fn pyramids_per_batch(&self) -> u32 {
        (self.pyramid_count() / self.batch_count.max(1)).max(1)
    }

    pub fn grow_pyramids(&mut self) {
        for n in &mut self.pyramids {
            *n = n.saturating_add(PYRAMID_STEP).min(PYRAMID_AXIS_MAX);
        }
    }

    pub fn shrink_pyramids(&mut self) {
        for n in &mut self.pyramids {
            *n = n.saturating_sub(PYRAMID_STEP).max(PYRAMID_SHRINK_FLOOR);
        }
    }

    /// Adds work to the per-pixel loop of `scene`'s shader. Returns the new
    /// count, or `None` if the scene has no adjustable loop.
    pub fn add_shader_loops(&mut self, scene: Scene) -> Option<u32> {
        let (loops, step) = self.loops_mut(scene)?;
        *loops = loops.saturating_add(step);
        Some(*loops)
    }

    /// Removes work from the per-pixel loop of `scene`'s shader, never below 0.
    pub fn shrink_shader_loops(&mut self, scene: Scene) -> Option<u32> {
        let (loops, step) = self.loops_mut(scene)?;
        *loops = loops.saturating_sub(step);
        Some(*loops)
    }

    fn loops_mut(&mut self, scene: Scene) -> Option<(&mut u32, u32)> {
        match scene {
            Scene::Dial => Some((&mut self.dial_shader_loops, SHADER_LOOP_STEP)),
            Scene::SingleDraw | Scene::MultiDraw | Scene::BatchDraw => {
                Some((&mut self.pyramid_shader_loops, SHADER_LOOP_STEP))
            }
            Scene::LongShader => Some((&mut self.long_shader_loops, LONG_SHADER_LOOP_STEP)),
            Scene::Texture => None,
        }
    }

    /// Logs the configuration, one line per setting.
    pub fn log_summary(&self) {
        log::info!("window dimensions = ({}, {})", self.width, self.height);
        log::info!("fullscreen = {}", self.fullscreen);
        log::info!("record metrics = {}", self.record_metrics);
        log::info!("draw offscreen = {}", self.offscreen);
        log::info!("vsync = {}", self.vsync);
        log::info!("no swapbuffer = {}", self.no_swapbuffer);
        log::info!("scene = {}", self.scene);
        log::info!("texture scene flat shader = {}", self.texture_flat);
        log::info!("texture fetch radius = {}", self.texture_fetch_radius);

        let [x, y, z] = self.pyramids;
        if self.scene == Scene::BatchDraw {
            log::info!("pyramid grid = {x}x{y}x{z} in {} batches", self.batch_count);
        } else {
            log::info!("pyramid grid = {x}x{y}x{z}");
        }

        log::info!("pyramid shader loops = {}", self.pyramid_shader_loops);
        log::info!("dial shader loops = {}", self.dial_shader_loops);
        log::info!("long shader loops = {}", self.long_shader_loops);
        match self.frames_to_render {
            0 => log::info!("frames to render = <infinite>"),
            n => log::info!("frames to render = {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_stops_at_floor() {
        let mut p = StressParams {
            pyramids: [12, 7, 1],
            ..StressParams::default()
        };
        p.shrink_pyramids();
        assert_eq!(p.pyramids, [7, 3, 3]);
        p.shrink_pyramids();
        assert_eq!(p.pyramids, [3, 3, 3]);
        p.grow_pyramids();
        assert_eq!(p.pyramids, [8, 8, 8]);
        assert_eq!(p.pyramid_count(), 512);
    }

    #[test]
    fn grow_stops_at_axis_max() {
        let mut p = StressParams {
            pyramids: [PYRAMID_AXIS_MAX - 2, 20, PYRAMID_AXIS_MAX],
            ..StressParams::default()
        };
        p.grow_pyramids();
        assert_eq!(p.pyramids, [PYRAMID_AXIS_MAX, 25, PYRAMID_AXIS_MAX]);
        p.pyramids = [PYRAMID_AXIS_MAX; 3];
        assert_eq!(p.pyramid_count(), 4_096_000);
    }

    #[test]
    fn count_saturates_instead_of_wrapping() {
        let p = StressParams {
            pyramids: [99_999, 99_999, 99_999],
            batch_count: 10,
            ..StressParams::default()
        };
        assert_eq!(p.pyramid_count(), u32::MAX);
        assert_eq!(p.pyramids_per_batch(), u32::MAX / 10);
    }

    #[test]
    fn loop_steps_per_scene() {
        let mut p = StressParams {
            dial_shader_loops: 10,
            pyramid_shader_loops: 0,
            long_shader_loops: 60,
            ..StressParams::default()
        };

        assert_eq!(p.add_shader_loops(Scene::Dial), Some(35));
        assert_eq!(p.shrink_shader_loops(Scene::Dial), Some(10));
        assert_eq!(p.shrink_shader_loops(Scene::Dial), Some(0));

        assert_eq!(p.add_shader_loops(Scene::BatchDraw), Some(25));
        assert_eq!(p.add_shader_loops(Scene::SingleDraw), Some(50));

        assert_eq!(p.shrink_shader_loops(Scene::LongShader), Some(10));
        assert_eq!(p.shrink_shader_loops(Scene::LongShader), Some(0));
        assert_eq!(p.add_shader_loops(Scene::LongShader), Some(50));

        assert_eq!(p.add_shader_loops(Scene::Texture), None);
    }

    #[test]
    fn batch_split() {
        let p = StressParams {
            pyramids: [10, 10, 10],
            batch_count: 8,
            ..StressParams::default()
        };
        assert_eq!(p.pyramids_per_batch(), 125);

        let tiny = StressParams {
            pyramids: [1, 1, 1],
            batch_count: 4,
            ..StressParams::default()
        };
        assert_eq!(tiny.pyramids_per_batch(), 1);
    }
}
