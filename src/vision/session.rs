//! Localization session: one `scan()` per captured frame plus anchor tracking

use super::annotate::Annotator;
use super::dedup::{dedup_matches, nearest_to};
use super::edges::{EdgeDetector, Frame};
use super::matcher::MultiScaleMatcher;
use super::template::TemplateSet;
use super::types::{Anchor, Candidate};
use crate::automation::{RunError, RunResult};
use crate::config::MatchConfig;
use crate::desktop::{ScreenCapture, Selector};
use image::RgbImage;
use std::path::PathBuf;

/// Candidates found in one frame, with the frame they came from
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub candidates: Vec<Candidate>,
    /// Absent when the capture itself failed or no template is loaded
    pub frame: Option<RgbImage>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

pub struct LocalizationSession {
    detector: EdgeDetector,
    matcher: MultiScaleMatcher,
    dedup_radius: u32,
    templates: Option<TemplateSet>,
    anchor: Option<Anchor>,
    diagnostics: Option<(Annotator, PathBuf)>,
}

impl LocalizationSession {
    /// Build a session, loading and scaling the template once.
    ///
    /// A missing or unreadable template is not an error: every scan then
    /// reports no candidates.
    pub fn new(config: &MatchConfig) -> Self {
        let detector = EdgeDetector::from_config(config);
        let templates = match TemplateSet::load(config, &detector) {
            Ok(set) => {
                log::info!(
                    "🧩 Template {:?} loaded ({}x{}, {} scales)",
                    config.template_path,
                    set.dimensions().0,
                    set.dimensions().1,
                    set.variants().len()
                );
                Some(set)
            }
            Err(e) => {
                log::warn!("[Error] {}", e);
                None
            }
        };

        Self {
            detector,
            matcher: MultiScaleMatcher::new(config.confidence_threshold),
            dedup_radius: config.dedup_radius,
            templates,
            anchor: None,
            diagnostics: None,
        }
    }

    /// Write an annotated copy of every scanned frame into `dir`
    pub fn with_diagnostics(mut self, dir: impl Into<PathBuf>, label: &str) -> Self {
        self.diagnostics = Some((Annotator::new(label), dir.into()));
        self
    }

    pub fn has_template(&self) -> bool {
        self.templates.is_some()
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Option<Anchor>) {
        self.anchor = anchor;
    }

    /// Capture a fresh frame and return the candidate set
    pub async fn scan<C: ScreenCapture>(&self, capture: &C, scan_index: u64) -> ScanReport {
        if self.templates.is_none() {
            return ScanReport::default();
        }
        match capture.capture().await {
            Ok(rgb) => {
                let (candidates, frame) = self.locate(rgb);
                if let Some((annotator, dir)) = &self.diagnostics {
                    let annotated = annotator.annotate(&frame, &candidates);
                    spawn_save(annotated, dir.clone(), scan_index);
                }
                ScanReport {
                    candidates,
                    frame: Some(frame.into_rgb()),
                }
            }
            Err(e) if e.is_unavailable() => {
                log::error!("❌ Screen capture unavailable: {}", e);
                ScanReport::default()
            }
            Err(e) => {
                log::warn!("⚠️ Screen capture failed: {}", e);
                ScanReport::default()
            }
        }
    }

    /// Run edge extraction, the scale sweep and deduplication on one image
    pub fn locate(&self, rgb: RgbImage) -> (Vec<Candidate>, Frame) {
        let frame = Frame::new(rgb, &self.detector);
        let Some(templates) = &self.templates else {
            return (Vec::new(), frame);
        };

        let raw = self.matcher.find_matches(frame.edges(), templates.variants());
        let candidates = dedup_matches(&raw, self.dedup_radius);
        log::debug!(
            "🔍 {} raw matches -> {} candidates (threshold {:.2})",
            raw.len(),
            candidates.len(),
            self.matcher.threshold()
        );
        (candidates, frame)
    }

    /// Re-identify the icon: pick the candidate nearest the anchor and move
    /// the anchor there. Without an anchor nothing is tracked.
    pub fn track(&mut self, candidates: &[Candidate]) -> Option<Candidate> {
        let anchor = self.anchor?;
        let nearest = nearest_to(candidates, anchor)?;
        self.anchor = Some(Anchor::from(&nearest));
        Some(nearest)
    }

    /// Pick the initial anchor from the first successful scan.
    ///
    /// No candidates leaves the session without an anchor; a single one is
    /// taken as-is; several are handed to the selector, whose refusal aborts
    /// the run.
    pub async fn establish_anchor<S: Selector>(
        &mut self,
        report: &ScanReport,
        selector: &S,
    ) -> RunResult<Option<Anchor>> {
        let anchor = match report.candidates.as_slice() {
            [] => None,
            [only] => Some(Anchor::from(only)),
            many => {
                let Some(frame) = &report.frame else {
                    return Err(RunError::SelectionAborted);
                };
                log::info!("🤔 {} look-alike icons found, asking for a choice", many.len());
                let chosen = selector
                    .choose(many, frame)
                    .await
                    .ok_or(RunError::SelectionAborted)?;
                Some(Anchor::from(chosen))
            }
        };
        self.anchor = anchor;
        Ok(anchor)
    }
}

/// Encode and write the annotated frame off the scan path
fn spawn_save(annotated: RgbImage, dir: PathBuf, scan_index: u64) {
    tokio::task::spawn_blocking(move || match Annotator::save(&annotated, &dir, scan_index) {
        Ok(path) => log::info!(" -> Annotated screenshot saved: {}", path.display()),
        Err(e) => log::warn!("⚠️ Could not save annotated scan {}: {}", scan_index, e),
    });
}
