//! Edge preprocessing shared by the reference template and every live frame
//!
//! Matching compares edge map against edge map, so theme colours and
//! antialiasing differences between the stored icon and the rendered one
//! mostly drop out.

use crate::config::MatchConfig;
use image::{GrayImage, RgbImage};
use imageproc::edges::canny;

/// Canny detector with fixed hysteresis thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    low: f32,
    high: f32,
}

impl EdgeDetector {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.canny_low, config.canny_high)
    }

    /// Binary edge map: 255 on edges, 0 elsewhere
    pub fn edges(&self, gray: &GrayImage) -> GrayImage {
        canny(gray, self.low, self.high)
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(50.0, 150.0)
    }
}

/// A captured screen with its derived representations
#[derive(Debug, Clone)]
pub struct Frame {
    rgb: RgbImage,
    gray: GrayImage,
    edges: GrayImage,
}

impl Frame {
    pub fn new(rgb: RgbImage, detector: &EdgeDetector) -> Self {
        let gray = image::imageops::grayscale(&rgb);
        let edges = detector.edges(&gray);
        Self { rgb, gray, edges }
    }

    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn edges(&self) -> &GrayImage {
        &self.edges
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgb.dimensions()
    }

    pub fn into_rgb(self) -> RgbImage {
        self.rgb
    }
}
