//! Color model shared by renderers and the harness.

mod color;

pub use color::Color;
