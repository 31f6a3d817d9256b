use std::fmt;
use std::str::FromStr;

use crate::error::ParamsError;

/// The selectable stress scenes.
///
/// Discriminants are the indices used on the scene line of `params.txt`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Scene {
    /// Spinning textured dials with a per-pixel loop.
    #[default]
    Dial = 0,
    /// Pyramid grid, one draw call for the whole grid.
    SingleDraw = 1,
    /// Pyramid grid, one draw call per pyramid.
    MultiDraw = 2,
    /// Fullscreen texture, optionally blurred.
    Texture = 3,
    /// Fullscreen quad running a long arithmetic loop.
    LongShader = 4,
    /// Pyramid grid split into a fixed number of draw calls.
    BatchDraw = 5,
}

impl Scene {
    pub const ALL: [Scene; 6] = [
        Scene::Dial,
        Scene::SingleDraw,
        Scene::MultiDraw,
        Scene::Texture,
        Scene::LongShader,
        Scene::BatchDraw,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| *s as u32 == index)
    }

    /// Next scene in the `C` key cycle:
    /// SingleDraw → MultiDraw → BatchDraw → Texture → LongShader → Dial → SingleDraw.
    pub fn next(self) -> Self {
        match self {
            Scene::SingleDraw => Scene::MultiDraw,
            Scene::MultiDraw => Scene::BatchDraw,
            Scene::BatchDraw => Scene::Texture,
            Scene::Texture => Scene::LongShader,
            Scene::LongShader => Scene::Dial,
            Scene::Dial => Scene::SingleDraw,
        }
    }

    /// Scenes that draw the pyramid grid.
    pub fn is_pyramids(self) -> bool {
        matches!(self, Scene::SingleDraw | Scene::MultiDraw | Scene::BatchDraw)
    }

    /// Kebab-case name accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Scene::Dial => "dial",
            Scene::SingleDraw => "single-draw",
            Scene::MultiDraw => "multi-draw",
            Scene::Texture => "texture",
            Scene::LongShader => "long-shader",
            Scene::BatchDraw => "batch-draw",
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scene {
    type Err = ParamsError;

    /// Accepts the kebab-case name (case-insensitive, `_` allowed for `-`) or the index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");

        if let Ok(index) = norm.parse::<u32>() {
            if let Some(scene) = Scene::from_index(index) {
                return Ok(scene);
            }
        }

        Scene::ALL
            .into_iter()
            .find(|scene| scene.name() == norm)
            .ok_or_else(|| ParamsError::UnknownScene { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_scene_once() {
        let mut scene = Scene::SingleDraw;
        let mut seen = Vec::new();
        for _ in 0..Scene::ALL.len() {
            seen.push(scene);
            scene = scene.next();
        }
        assert_eq!(scene, Scene::SingleDraw);
        assert_eq!(
            seen,
            [
                Scene::SingleDraw,
                Scene::MultiDraw,
                Scene::BatchDraw,
                Scene::Texture,
                Scene::LongShader,
                Scene::Dial,
            ]
        );
    }

    #[test]
    fn indices_match_params_file() {
        assert_eq!(Scene::from_index(0), Some(Scene::Dial));
        assert_eq!(Scene::from_index(3), Some(Scene::Texture));
        assert_eq!(Scene::from_index(5), Some(Scene::BatchDraw));
        assert_eq!(Scene::from_index(6), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("long-shader".parse::<Scene>(), Ok(Scene::LongShader));
        assert_eq!("Batch_Draw".parse::<Scene>(), Ok(Scene::BatchDraw));
        assert_eq!("2".parse::<Scene>(), Ok(Scene::MultiDraw));
        assert_eq!(
            "pyramids".parse::<Scene>(),
            Err(ParamsError::UnknownScene { name: "pyramids".into() })
        );
        for scene in Scene::ALL {
            assert_eq!(scene.name().parse::<Scene>(), Ok(scene));
        }
    }
}
