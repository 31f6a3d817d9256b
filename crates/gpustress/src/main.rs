//! gpustress: renders one of several GPU-heavy scenes with an fps overlay and,
//! optionally, logs every frame interval to a `metrics_*.cvs` file.

mod app;
mod controls;
mod offscreen;
mod scenes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::PhysicalSize;

use gpustress_engine::device::GpuInit;
use gpustress_engine::logging::{init_logging, LoggingConfig};
use gpustress_engine::window::{Runtime, RuntimeConfig};
use gpustress_params::{Scene, StressParams};

use app::StressApp;

/// Read from the working directory when no path is given.
const DEFAULT_PARAMS_FILE: &str = "params.txt";

#[derive(Debug, Parser)]
#[command(name = "gpustress", version, about = "GPU stress-test harness")]
struct Cli {
    /// Run configuration, one integer per line. Defaults to ./params.txt,
    /// falling back to built-in settings if that file does not exist.
    params: Option<PathBuf>,

    /// Log per-frame intervals to metrics_<timestamp>.cvs.
    #[arg(long)]
    record_metrics: bool,

    /// Exit after N frames (0 runs until closed).
    #[arg(long, value_name = "N")]
    frames: Option<u32>,

    /// Start on this scene (name or index).
    #[arg(long, value_name = "NAME")]
    scene: Option<Scene>,
}

impl Cli {
    fn load_params(&self) -> Result<StressParams> {
        let mut params = match &self.params {
            Some(path) => gpustress_params::load(path)
                .with_context(|| format!("failed to load run configuration {}", path.display()))?,
            None => match gpustress_params::load(DEFAULT_PARAMS_FILE) {
                Ok(params) => params,
                Err(err) if err.is_not_found() => {
                    log::info!("{DEFAULT_PARAMS_FILE} not found, using built-in defaults");
                    StressParams::default()
                }
                Err(err) => return Err(err).context("failed to load run configuration"),
            },
        };

        self.apply_overrides(&mut params);
        Ok(params)
    }

    fn apply_overrides(&self, params: &mut StressParams) {
        if self.record_metrics {
            params.record_metrics = true;
        }
        if let Some(frames) = self.frames {
            params.frames_to_render = frames;
        }
        if let Some(scene) = self.scene {
            params.scene = scene;
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let cli = Cli::parse();
    let params = cli.load_params()?;
    params.log_summary();

    if params.no_swapbuffer {
        log::warn!("no_swapbuffer is not supported; frames are always presented");
    }

    let config = RuntimeConfig {
        title: format!("gpustress - {}", params.scene),
        initial_size: PhysicalSize::new(params.width, params.height),
        fullscreen: params.fullscreen,
    };
    let gpu_init = GpuInit::with_vsync(params.vsync);

    Runtime::run(config, gpu_init, StressApp::new(params)).context("gpustress terminated with an error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win_over_file_values() {
        let cli = Cli::try_parse_from([
            "gpustress",
            "run.txt",
            "--record-metrics",
            "--frames",
            "600",
            "--scene",
            "long-shader",
        ])
        .unwrap();
        assert_eq!(cli.params, Some(PathBuf::from("run.txt")));

        let mut params = StressParams::default();
        cli.apply_overrides(&mut params);
        assert!(params.record_metrics);
        assert_eq!(params.frames_to_render, 600);
        assert_eq!(params.scene, Scene::LongShader);
    }

    #[test]
    fn scene_accepts_an_index() {
        let cli = Cli::try_parse_from(["gpustress", "--scene", "5"]).unwrap();
        assert_eq!(cli.scene, Some(Scene::BatchDraw));
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert!(Cli::try_parse_from(["gpustress", "--scene", "teapot"]).is_err());
    }

    #[test]
    fn no_flags_leave_params_untouched() {
        let cli = Cli::try_parse_from(["gpustress"]).unwrap();
        let mut params = StressParams::default();
        cli.apply_overrides(&mut params);
        assert_eq!(params, StressParams::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            params: Some(dir.path().join("missing.txt")),
            record_metrics: false,
            frames: None,
            scene: None,
        };
        assert!(cli.load_params().is_err());
    }
}
