//! Run configuration for the gpustress harness.
//!
//! A run is described by a `params.txt` file holding one integer per line, in
//! a fixed order. Parsing is deliberately lenient: each line contributes the
//! integer it starts with (like C's `strtol`), malformed or missing lines read
//! as 0, and per-field minimums are applied afterwards.
//!
//! | Line | Field | Chars read | Minimum |
//! |------|-------|------------|---------|
//! | 1, 2 | width, height (0 → 1920×1080) | 5 | 0 |
//! | 3 | fullscreen | 1 | |
//! | 4 | record metrics | 1 | |
//! | 5 | offscreen | 1 | |
//! | 6 | vsync | 1 | |
//! | 7 | no swapbuffer | 1 | |
//! | 8 | scene index (see [`Scene`]) | 5 | |
//! | 9 | texture scene flat shader | 1 | |
//! | 10 | texture fetch radius | 5 | 1 |
//! | 11–13 | pyramid grid x, y, z (at most 160 each) | 5 | 1 |
//! | 14 | batch count | 5 | 1 |
//! | 15 | pyramid shader loops | 5 | 0 |
//! | 16 | dial shader loops | 5 | 0 |
//! | 17 | long shader loops | 5 | 0 |
//! | 18 | frames to render (0 = until closed) | 5 | 0 |
//!
//! # Quick start
//!
//! ```rust
//! use gpustress_params::{parse_str, Scene};
//!
//! let params = parse_str("1280\n720\n0\n0\n0\n1\n0\n4\n");
//! assert_eq!(params.width, 1280);
//! assert!(params.vsync);
//! assert_eq!(params.scene, Scene::LongShader);
//! ```

pub mod error;
pub mod params;
pub mod parser;
pub mod scene;

pub use error::ParamsError;
pub use params::StressParams;
pub use parser::{load, parse_leading_int, parse_str};
pub use scene::Scene;
