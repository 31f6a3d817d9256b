//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, textures) and creates
//! them lazily on first use, rebuilding pipelines when the surface format changes.
//!
//! Convention:
//! - HUD geometry is in logical pixels (top-left origin, +Y down)
//! - vertex shaders convert to NDC using a viewport uniform

mod ctx;
mod digits;

pub mod common;

pub use ctx::{RenderCtx, RenderTarget};
pub use digits::DigitRenderer;
