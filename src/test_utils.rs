//! Synthetic icons and desktops shared by the unit tests

use crate::config::MatchConfig;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

pub const BACKGROUND: Rgb<u8> = Rgb([40, 40, 40]);
pub const ICON_SIZE: u32 = 24;

/// A bright square on the desktop background, with a margin around it
pub fn icon_template() -> RgbImage {
    RgbImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        if (6..18).contains(&x) && (6..18).contains(&y) {
            Rgb([220, 220, 220])
        } else {
            BACKGROUND
        }
    })
}

/// Blank desktop with the icon pasted centered on each given point
pub fn desktop_with_icons(width: u32, height: u32, centers: &[(u32, u32)]) -> RgbImage {
    let mut desktop = RgbImage::from_pixel(width, height, BACKGROUND);
    let icon = icon_template();
    for &(cx, cy) in centers {
        let x = cx as i64 - (ICON_SIZE / 2) as i64;
        let y = cy as i64 - (ICON_SIZE / 2) as i64;
        image::imageops::replace(&mut desktop, &icon, x, y);
    }
    desktop
}

/// Save the icon template under `dir` and return its path
pub fn write_template(dir: &Path) -> PathBuf {
    let path = dir.join("icon_template.png");
    icon_template().save(&path).expect("write template");
    path
}

pub fn match_config(template_path: PathBuf) -> MatchConfig {
    MatchConfig {
        template_path,
        ..MatchConfig::default()
    }
}

/// Whether a candidate center lies within `tolerance` of `expected` on both axes
pub fn near(actual: (u32, u32), expected: (u32, u32), tolerance: u32) -> bool {
    actual.0.abs_diff(expected.0) <= tolerance && actual.1.abs_diff(expected.1) <= tolerance
}
