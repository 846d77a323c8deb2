//! Localization data types
use serde::Serialize;

/// One correlation hit at one scale, centered on the matched region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawMatch {
    pub cx: u32,
    pub cy: u32,
    /// Size of the scaled template that produced the hit
    pub width: u32,
    pub height: u32,
    /// Normalized correlation score
    pub score: f32,
    pub scale: f32,
}

/// A deduplicated icon instance believed to be on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub cx: u32,
    pub cy: u32,
    pub width: u32,
    pub height: u32,
}

/// Last confirmed icon position, used to track it across scans
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub x: u32,
    pub y: u32,
}

impl Candidate {
    pub fn new(cx: u32, cy: u32, width: u32, height: u32) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
        }
    }

    pub fn center(&self) -> (u32, u32) {
        (self.cx, self.cy)
    }

    /// Top-left corner and size; the corner may lie off-screen
    pub fn bounds(&self) -> (i32, i32, u32, u32) {
        (
            self.cx as i32 - (self.width / 2) as i32,
            self.cy as i32 - (self.height / 2) as i32,
            self.width,
            self.height,
        )
    }

    pub fn distance_to(&self, anchor: Anchor) -> f64 {
        let dx = self.cx as f64 - anchor.x as f64;
        let dy = self.cy as f64 - anchor.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<&RawMatch> for Candidate {
    fn from(m: &RawMatch) -> Self {
        Self::new(m.cx, m.cy, m.width, m.height)
    }
}

impl Anchor {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Anchor {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl From<&Candidate> for Anchor {
    fn from(c: &Candidate) -> Self {
        Self { x: c.cx, y: c.cy }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
