//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Enable or disable profiling scope collection globally.
///
/// Scopes are compiled in but cost nothing while collection is off.
pub fn set_profiling_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
    tracing::debug!(enabled, "profiling scope collection toggled");
}

/// Mark the start of a new profiling frame.
///
/// Call once per frame from the frame pump when profiling is enabled.
pub fn new_frame() {
    GlobalProfiler::lock().new_frame();
}
