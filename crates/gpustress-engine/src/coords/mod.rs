//! Coordinate types shared by renderers.
//!
//! Convention: logical pixels, top-left origin, +Y down.

mod viewport;

pub use viewport::Viewport;
