// Collaborator capabilities consumed by the localization and launch core.
// Implementations live in shell.rs / replay.rs / selector.rs, fakes in tests.
use super::error::DesktopResult;
use crate::vision::Candidate;
use image::RgbImage;
use std::time::Duration;

/// Full-screen raster capture
#[allow(async_fn_in_trait)]
pub trait ScreenCapture {
    async fn capture(&self) -> DesktopResult<RgbImage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Left,
    Double,
    Right,
}

/// Pointer and keyboard simulation. Results are only logged by callers.
#[allow(async_fn_in_trait)]
pub trait InputSimulator {
    async fn move_to(&self, x: u32, y: u32) -> DesktopResult<()>;
    async fn click(&self, kind: ClickKind) -> DesktopResult<()>;
    async fn key_press(&self, key: &str) -> DesktopResult<()>;
    async fn type_text(&self, text: &str, interval: Duration) -> DesktopResult<()>;
    async fn hotkey(&self, keys: &[&str]) -> DesktopResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    pub id: String,
    pub title: String,
}

/// Top-level window lookup and focus
#[allow(async_fn_in_trait)]
pub trait WindowManager {
    async fn find_windows(&self, title_substring: &str) -> DesktopResult<Vec<WindowHandle>>;
    async fn activate(&self, window: &WindowHandle) -> DesktopResult<()>;
}

/// Everything the launch state machine drives
pub trait Desktop: ScreenCapture + InputSimulator + WindowManager {}

impl<T: ScreenCapture + InputSimulator + WindowManager> Desktop for T {}

/// Human disambiguation among several look-alike candidates.
///
/// Blocks until a choice is made; `None` means the user declined.
#[allow(async_fn_in_trait)]
pub trait Selector {
    async fn choose(&self, candidates: &[Candidate], frame: &RgbImage) -> Option<(u32, u32)>;
}

/// Log a fire-and-forget input failure instead of propagating it
pub fn warn_on_failure(action: &str, result: DesktopResult<()>) {
    if let Err(e) = result {
        log::warn!("⚠️ {} failed: {}", action, e);
    }
}
