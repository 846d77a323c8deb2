//! Console picker used when the first scan finds several look-alike icons
//!
//! Each candidate is cropped out of the frame (with room below for the
//! icon's caption) and written next to the diagnostics, then the user types
//! the number of the right one.

use super::types::Selector;
use crate::vision::Candidate;
use image::RgbImage;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const CROP_MARGIN: u32 = 10;
const CAPTION_MARGIN: u32 = 50;

pub struct ConsoleSelector {
    crop_dir: PathBuf,
}

impl ConsoleSelector {
    pub fn new(crop_dir: impl Into<PathBuf>) -> Self {
        Self {
            crop_dir: crop_dir.into(),
        }
    }

    /// Region around a candidate, clamped to the frame
    pub fn crop(frame: &RgbImage, candidate: &Candidate) -> RgbImage {
        let (x0, y0, w, h) = candidate.bounds();
        let (x0, y0) = (x0 as i64, y0 as i64);
        let (fw, fh) = (frame.width() as i64, frame.height() as i64);
        // Edges come from the real corner, which may be off-screen
        let left = (x0 - CROP_MARGIN as i64).clamp(0, fw);
        let top = (y0 - CROP_MARGIN as i64).clamp(0, fh);
        let right = (x0 + w as i64 + CROP_MARGIN as i64).clamp(0, fw);
        let bottom = (y0 + h as i64 + CAPTION_MARGIN as i64).clamp(0, fh);
        image::imageops::crop_imm(
            frame,
            left as u32,
            top as u32,
            (right - left).max(0) as u32,
            (bottom - top).max(0) as u32,
        )
        .to_image()
    }

    /// 1-based option number typed by the user
    pub fn parse_choice(line: &str, count: usize) -> Option<usize> {
        let n = line.trim().parse::<usize>().ok()?;
        (1..=count).contains(&n).then(|| n - 1)
    }
}

impl Selector for ConsoleSelector {
    async fn choose(&self, candidates: &[Candidate], frame: &RgbImage) -> Option<(u32, u32)> {
        if let Err(e) = std::fs::create_dir_all(&self.crop_dir) {
            log::warn!("⚠️ Could not create crop directory {:?}: {}", self.crop_dir, e);
        }

        println!("Several icons look like the target. Pick one:");
        for (i, candidate) in candidates.iter().enumerate() {
            let path = self.crop_dir.join(format!("option_{}.png", i + 1));
            let shown = match Self::crop(frame, candidate).save(&path) {
                Ok(()) => path.display().to_string(),
                Err(e) => format!("crop unavailable: {e}"),
            };
            println!(
                "    Option {} at ({}, {}) {}x{}  [{}]",
                i + 1,
                candidate.cx,
                candidate.cy,
                candidate.width,
                candidate.height,
                shown
            );
        }
        println!("Enter option number (empty to abort):");

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = stdin.read_line(&mut line).await {
            log::error!("Failed to read selection: {}", e);
            return None;
        }
        let index = Self::parse_choice(&line, candidates.len())?;
        Some(candidates[index].center())
    }
}
