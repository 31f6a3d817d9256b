//! gpustress engine crate.
//!
//! Platform and GPU runtime for the stress harness, plus the two pieces that
//! run every frame regardless of scene: the [`time::FrameTimer`] (fps estimate
//! and optional per-frame metrics log) and the [`hud`] digit overlay.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod render;
pub mod hud;
