use super::error::{DesktopError, DesktopResult};
use super::types::ScreenCapture;
use image::RgbImage;
use std::path::PathBuf;

/// Capture source that replays a saved screenshot from disk
#[derive(Debug, Clone)]
pub struct ImageFileCapture {
    path: PathBuf,
}

impl ImageFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScreenCapture for ImageFileCapture {
    async fn capture(&self) -> DesktopResult<RgbImage> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DesktopError::FrameRead {
                path: self.path.clone(),
                source,
            })?;
        Ok(image::load_from_memory(&bytes)?.to_rgb8())
    }
}
