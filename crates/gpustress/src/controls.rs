//! Keyboard bindings.

use gpustress_engine::input::Key;
use gpustress_params::{Scene, StressParams};

/// What a key press did, for the caller to act on and log.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyAction {
    Exit,
    ToggleFullscreen,
    SceneChanged(Scene),
    LoopsChanged { scene: Scene, loops: u32 },
    PyramidsChanged([u32; 3]),
    Ignored,
}

/// Applies one key press to the run parameters.
///
/// `Q`/`A` always adjust the pyramid shader, whatever is on screen. `+`/`-`
/// act on the current scene: loop counts for the dial and long shader, grid
/// size for the pyramid scenes, nothing for the texture scene.
pub fn apply_key(params: &mut StressParams, key: Key) -> KeyAction {
    match key {
        Key::Escape => KeyAction::Exit,
        Key::F11 => KeyAction::ToggleFullscreen,
        Key::C => {
            params.scene = params.scene.next();
            KeyAction::SceneChanged(params.scene)
        }
        Key::Q => loops_changed(Scene::MultiDraw, params.add_shader_loops(Scene::MultiDraw)),
        Key::A => loops_changed(Scene::MultiDraw, params.shrink_shader_loops(Scene::MultiDraw)),
        Key::Plus if params.scene.is_pyramids() => {
            params.grow_pyramids();
            KeyAction::PyramidsChanged(params.pyramids)
        }
        Key::Minus if params.scene.is_pyramids() => {
            params.shrink_pyramids();
            KeyAction::PyramidsChanged(params.pyramids)
        }
        Key::Plus => loops_changed(params.scene, params.add_shader_loops(params.scene)),
        Key::Minus => loops_changed(params.scene, params.shrink_shader_loops(params.scene)),
        _ => KeyAction::Ignored,
    }
}

fn loops_changed(scene: Scene, loops: Option<u32>) -> KeyAction {
    match loops {
        Some(loops) => KeyAction::LoopsChanged { scene, loops },
        None => KeyAction::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_on(scene: Scene) -> StressParams {
        StressParams {
            scene,
            ..StressParams::default()
        }
    }

    #[test]
    fn c_cycles_through_every_scene() {
        let mut params = params_on(Scene::SingleDraw);
        let mut seen = vec![params.scene];
        for _ in 0..5 {
            match apply_key(&mut params, Key::C) {
                KeyAction::SceneChanged(scene) => seen.push(scene),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(
            seen,
            [
                Scene::SingleDraw,
                Scene::MultiDraw,
                Scene::BatchDraw,
                Scene::Texture,
                Scene::LongShader,
                Scene::Dial
            ]
        );
        assert_eq!(apply_key(&mut params, Key::C), KeyAction::SceneChanged(Scene::SingleDraw));
    }

    #[test]
    fn q_and_a_target_the_pyramid_shader_from_any_scene() {
        let mut params = params_on(Scene::Dial);
        assert_eq!(
            apply_key(&mut params, Key::Q),
            KeyAction::LoopsChanged {
                scene: Scene::MultiDraw,
                loops: 25
            }
        );
        assert_eq!(params.dial_shader_loops, 0);

        apply_key(&mut params, Key::A);
        apply_key(&mut params, Key::A);
        assert_eq!(params.pyramid_shader_loops, 0);
    }

    #[test]
    fn plus_and_minus_follow_the_scene() {
        let mut params = params_on(Scene::Dial);
        apply_key(&mut params, Key::Plus);
        assert_eq!(params.dial_shader_loops, 25);

        let mut params = params_on(Scene::LongShader);
        apply_key(&mut params, Key::Minus);
        assert_eq!(params.long_shader_loops, 50);

        let mut params = params_on(Scene::BatchDraw);
        assert_eq!(apply_key(&mut params, Key::Plus), KeyAction::PyramidsChanged([15, 15, 15]));
        apply_key(&mut params, Key::Minus);
        apply_key(&mut params, Key::Minus);
        assert_eq!(apply_key(&mut params, Key::Minus), KeyAction::PyramidsChanged([3, 3, 3]));

        let mut params = params_on(Scene::Texture);
        assert_eq!(apply_key(&mut params, Key::Plus), KeyAction::Ignored);
        assert_eq!(params, params_on(Scene::Texture));
    }

    #[test]
    fn window_keys_leave_params_alone() {
        let mut params = StressParams::default();
        assert_eq!(apply_key(&mut params, Key::Escape), KeyAction::Exit);
        assert_eq!(apply_key(&mut params, Key::F11), KeyAction::ToggleFullscreen);
        assert_eq!(apply_key(&mut params, Key::Digit4), KeyAction::Ignored);
        assert_eq!(params, StressParams::default());
    }
}
