//! Reference template loading and the precomputed scale sweep

use super::edges::EdgeDetector;
use crate::config::MatchConfig;
use image::GrayImage;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{path:?}' missing")]
    Missing { path: PathBuf },

    #[error("Failed to load template {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// `count` evenly spaced factors from `min` to `max`, both ends included
pub fn scale_factors(min: f32, max: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f32;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f32 })
                .collect()
        }
    }
}

/// One resized template variant and its edge map
#[derive(Debug, Clone)]
pub struct ScaledTemplate {
    pub scale: f32,
    pub edges: GrayImage,
}

impl ScaledTemplate {
    pub fn width(&self) -> u32 {
        self.edges.width()
    }

    pub fn height(&self) -> u32 {
        self.edges.height()
    }
}

/// The template and every scaled edge variant, computed once per session
#[derive(Debug, Clone)]
pub struct TemplateSet {
    width: u32,
    height: u32,
    variants: Vec<ScaledTemplate>,
}

impl TemplateSet {
    /// Load the template named in the config and derive the scale sweep
    pub fn load(config: &MatchConfig, detector: &EdgeDetector) -> Result<Self, TemplateError> {
        let path = &config.template_path;
        if !Path::new(path).exists() {
            return Err(TemplateError::Missing { path: path.clone() });
        }
        let gray = image::open(path)
            .map_err(|source| TemplateError::Unreadable {
                path: path.clone(),
                source,
            })?
            .to_luma8();
        Ok(Self::from_gray(&gray, config, detector))
    }

    pub fn from_gray(gray: &GrayImage, config: &MatchConfig, detector: &EdgeDetector) -> Self {
        let (width, height) = gray.dimensions();
        let variants = scale_factors(config.scale_min, config.scale_max, config.scale_count)
            .into_iter()
            .filter_map(|scale| {
                let w = (width as f32 * scale).round() as u32;
                let h = (height as f32 * scale).round() as u32;
                if w == 0 || h == 0 {
                    return None;
                }
                let resized = if w == width && h == height {
                    gray.clone()
                } else {
                    image::imageops::resize(gray, w, h, FilterType::Triangle)
                };
                Some(ScaledTemplate {
                    scale,
                    edges: detector.edges(&resized),
                })
            })
            .collect();

        Self {
            width,
            height,
            variants,
        }
    }

    /// Unscaled template size
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn variants(&self) -> &[ScaledTemplate] {
        &self.variants
    }
}
