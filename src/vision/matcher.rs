//! Multi-scale template matching on edge maps
//!
//! Every scaled template variant is correlated against the frame's edge map
//! and every location clearing the threshold becomes a raw match.
use super::template::ScaledTemplate;
use super::types::RawMatch;
use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, match_template, match_template_parallel};

/// Correlates scaled templates against a frame
#[derive(Debug, Clone, Copy)]
pub struct MultiScaleMatcher {
    threshold: f32,
    /// Spread each score surface across the rayon pool
    parallel: bool,
}

impl MultiScaleMatcher {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            parallel: true,
        }
    }

    /// Correlate on the calling thread only
    pub fn serial(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Find all raw matches across the scale sweep
    ///
    /// Matches are returned in discovery order: scale ascending, then
    /// row-major over each score surface. Variants larger than the frame are
    /// skipped.
    pub fn find_matches(&self, frame_edges: &GrayImage, variants: &[ScaledTemplate]) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for variant in variants {
            self.match_at_scale(frame_edges, variant, &mut matches);
        }
        matches
    }

    fn match_at_scale(&self, frame_edges: &GrayImage, variant: &ScaledTemplate, out: &mut Vec<RawMatch>) {
        let (tw, th) = (variant.width(), variant.height());

        if tw > frame_edges.width() || th > frame_edges.height() {
            log::debug!(
                "⚠️ Skipping scale {:.2} - template {}x{} larger than frame {}x{}",
                variant.scale,
                tw,
                th,
                frame_edges.width(),
                frame_edges.height()
            );
            return;
        }

        let method = MatchTemplateMethod::CrossCorrelationNormalized;
        let scores = if self.parallel {
            match_template_parallel(frame_edges, &variant.edges, method)
        } else {
            match_template(frame_edges, &variant.edges, method)
        };

        let before = out.len();
        for (x, y, pixel) in scores.enumerate_pixels() {
            // Flat regions give NaN, which never clears the threshold
            let score = pixel[0];
            if score >= self.threshold {
                out.push(RawMatch {
                    cx: x + tw / 2,
                    cy: y + th / 2,
                    width: tw,
                    height: th,
                    score,
                    scale: variant.scale,
                });
            }
        }

        log::debug!(
            "🔍 Scale {:.2} ({}x{}): {} raw matches",
            variant.scale,
            tw,
            th,
            out.len() - before
        );
    }
}
