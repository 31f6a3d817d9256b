use gpustress_engine::core::{App, AppControl, FrameCtx};
use gpustress_engine::hud::{DigitLayoutEngine, DIGIT_ATLAS, DIGIT_QUAD};
use gpustress_engine::input::{InputEvent, Key, KeyState};
use gpustress_engine::paint::Color;
use gpustress_engine::render::{DigitRenderer, RenderTarget};
use gpustress_engine::time::{FrameTimer, Recording};
use gpustress_params::{Scene, StressParams};

use crate::controls::{apply_key, KeyAction};
use crate::offscreen::OffscreenTarget;
use crate::scenes::{SceneFrame, Scenes};

/// Overlay tint; readable over every scene.
const HUD_COLOR: Color = Color::from_premul(1.0, 0.85, 0.2, 1.0);

/// The harness: one active scene, the fps overlay and the frame timer.
pub struct StressApp {
    params: StressParams,
    scenes: Scenes,
    offscreen: Option<OffscreenTarget>,

    timer: FrameTimer,
    layout: DigitLayoutEngine,
    digits: DigitRenderer,

    /// Frames since the timer last closed a benchmark window.
    frames_since_reset: u32,
    frames_rendered: u64,
}

impl StressApp {
    pub fn new(params: StressParams) -> Self {
        let recording = if params.record_metrics {
            Recording::current_dir()
        } else {
            Recording::Disabled
        };
        let mut timer = FrameTimer::new(recording);
        timer.set_label(params.scene.name());

        let mut digits = DigitRenderer::new();
        digits.set_color(HUD_COLOR);

        Self {
            offscreen: params.offscreen.then(OffscreenTarget::new),
            params,
            scenes: Scenes::new(),
            timer,
            layout: DigitLayoutEngine::new(DIGIT_ATLAS, DIGIT_QUAD),
            digits,
            frames_since_reset: 0,
            frames_rendered: 0,
        }
    }

    fn handle_keys(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let keys: Vec<Key> = ctx
            .input_frame
            .events
            .iter()
            .filter_map(|ev| match ev {
                InputEvent::Key {
                    key,
                    state: KeyState::Pressed,
                    repeat: false,
                } => Some(*key),
                _ => None,
            })
            .collect();

        for key in keys {
            match apply_key(&mut self.params, key) {
                KeyAction::Exit => return AppControl::Exit,
                KeyAction::ToggleFullscreen => ctx.window.toggle_fullscreen(),
                KeyAction::SceneChanged(scene) => self.scene_changed(ctx, scene),
                KeyAction::LoopsChanged { scene, loops } => {
                    log::info!("{scene} shader loops = {loops}");
                }
                KeyAction::PyramidsChanged([x, y, z]) => {
                    log::info!("pyramids = {x}x{y}x{z} ({} total)", self.params.pyramid_count());
                }
                KeyAction::Ignored => {}
            }
        }

        AppControl::Continue
    }

    fn scene_changed(&mut self, ctx: &FrameCtx<'_, '_>, scene: Scene) {
        log::info!("switching to {scene} scene");
        self.timer.set_label(scene.name());
        ctx.window.set_title(&format!("gpustress - {scene}"));
    }

    fn frame_budget_spent(&self) -> bool {
        let limit = self.params.frames_to_render;
        limit > 0 && self.frames_rendered >= u64::from(limit)
    }
}

impl App for StressApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let fps = self.timer.tick(ctx.time.micros, &mut self.frames_since_reset);

        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        let mesh = self.layout.layout(fps);
        let elapsed_ms = ctx.time.micros as f64 / 1000.0;
        let scene = self.params.scene;

        let params = &self.params;
        let scenes = &mut self.scenes;
        let offscreen = &mut self.offscreen;
        let digits = &mut self.digits;

        // Offscreen: the surface only gets the overlay, so clear it here.
        let clear = offscreen.is_some().then_some(Color::BLACK);

        let control = ctx.render(clear, |rctx, target| {
            let frame = SceneFrame {
                params,
                elapsed_ms,
                size: rctx.target_size,
            };

            match offscreen.as_mut() {
                Some(offscreen) => {
                    let view = offscreen.view(rctx);
                    let mut scene_target = RenderTarget::new(&mut *target.encoder, view);
                    scenes.render(scene, rctx, &mut scene_target, &frame);
                }
                None => scenes.render(scene, rctx, target, &frame),
            }

            digits.render(rctx, target, &mesh);
        });

        self.frames_since_reset += 1;
        self.frames_rendered += 1;

        if self.frame_budget_spent() {
            log::info!("rendered {} frames, exiting", self.frames_rendered);
            return AppControl::Exit;
        }

        control
    }

    fn on_exit(&mut self) {
        self.timer.finish();
    }
}
