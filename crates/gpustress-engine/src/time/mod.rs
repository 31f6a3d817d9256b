//! Time subsystem.
//!
//! - `FrameClock`: one per render loop, `tick()` once per presented frame to obtain
//!   `FrameTime` (delta time plus a monotonic microsecond timestamp)
//! - `FrameTimer`: turns those timestamps into a once-per-second fps estimate and,
//!   when enabled, a `metrics_*.cvs` log of per-frame intervals

mod frame_clock;
mod frame_timer;
mod metrics;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_timer::{FrameTimer, BENCHMARK_INTERVAL_MICROS};
pub use metrics::{metrics_file_name, FrameSample, Recording, FRAME_TIME_WINDOW, METRICS_HEADER};
