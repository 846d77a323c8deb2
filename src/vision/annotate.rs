//! Diagnostic overlays for scan frames
//!
//! Red: bounding boxes of every external edge contour larger than the noise
//! floor. Green: accepted candidates with a text label. The result is only
//! written to disk for inspection.

use super::edges::Frame;
use super::types::Candidate;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CANDIDATE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

#[derive(Debug, Clone)]
pub struct Annotator {
    /// Contours must exceed this on both sides to be drawn
    min_contour_size: u32,
    label: String,
}

impl Annotator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            min_contour_size: 20,
            label: label.into(),
        }
    }

    pub fn annotate(&self, frame: &Frame, candidates: &[Candidate]) -> RgbImage {
        let mut canvas = frame.rgb().clone();

        for (x, y, w, h) in self.contour_boxes(frame) {
            draw_hollow_rect_mut(&mut canvas, Rect::at(x as i32, y as i32).of_size(w, h), CONTOUR_COLOR);
        }

        for candidate in candidates {
            let (x, y, w, h) = candidate.bounds();
            if w == 0 || h == 0 {
                continue;
            }
            draw_hollow_rect_mut(&mut canvas, Rect::at(x, y).of_size(w, h), CANDIDATE_COLOR);
            if w > 2 && h > 2 {
                draw_hollow_rect_mut(&mut canvas, Rect::at(x + 1, y + 1).of_size(w - 2, h - 2), CANDIDATE_COLOR);
            }
            draw_label(&mut canvas, x, y - 10, &self.label, CANDIDATE_COLOR);
        }

        canvas
    }

    /// Bounding boxes of outer contours in the edge map, noise filtered
    pub fn contour_boxes(&self, frame: &Frame) -> Vec<(u32, u32, u32, u32)> {
        find_contours::<u32>(frame.edges())
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(|c| {
                let min_x = c.points.iter().map(|p| p.x).min()?;
                let max_x = c.points.iter().map(|p| p.x).max()?;
                let min_y = c.points.iter().map(|p| p.y).min()?;
                let max_y = c.points.iter().map(|p| p.y).max()?;
                let (w, h) = (max_x - min_x + 1, max_y - min_y + 1);
                (w > self.min_contour_size && h > self.min_contour_size).then_some((min_x, min_y, w, h))
            })
            .collect()
    }

    /// Write `scan_<index>.png` into `dir`
    pub fn save(image: &RgbImage, dir: &Path, scan_index: u64) -> image::ImageResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(image::ImageError::IoError)?;
        let path = dir.join(format!("scan_{scan_index}.png"));
        image.save(&path)?;
        Ok(path)
    }
}

fn draw_label(img: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
    let mut cursor_x = x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += 8;
            continue;
        };
        for (row_idx, &row) in glyph.iter().enumerate() {
            for col_idx in 0..8i32 {
                if (row >> col_idx) & 1 == 0 {
                    continue;
                }
                let px = cursor_x + col_idx;
                let py = y + row_idx as i32;
                if px >= 0 && py >= 0 && px < img.width() as i32 && py < img.height() as i32 {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
        cursor_x += 8;
    }
}
