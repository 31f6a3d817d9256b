/// What the frame loop should do after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated swapchain, already reconfigured. Try again next frame.
    Reconfigured,
    /// Timeout or driver hiccup; this frame is dropped.
    SkipFrame,
    /// Out of memory. The run cannot continue.
    Fatal,
}
