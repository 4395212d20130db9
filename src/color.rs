//! Color-signature scoring of detection regions.
//!
//! Each bounding box is cropped from the frame, converted to HSV, and masked
//! against a configured hue/saturation/value range. The score is the total
//! pixel area of the mask's 4-connected foreground regions, so a box draped
//! over a person wearing the target color outranks one that merely overlaps
//! a stray matching pixel or two.

use image::RgbImage;
use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use crate::detect::BBox;

/// A pixel in HSV, OpenCV 8-bit scale: hue 0..=179, saturation and value
/// 0..=255.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive per-channel HSV bounds. No hue wraparound: a range crossing the
/// red boundary must be expressed as two scorer passes, the same contract as
/// a per-channel in-range mask.
#[derive(Clone, Copy, Debug)]
pub struct HsvRange {
    low: Hsv,
    high: Hsv,
}

impl HsvRange {
    pub fn new(low: Hsv, high: Hsv) -> Result<Self> {
        if low.h > 179 || high.h > 179 {
            return Err(anyhow!("hue bound out of range: hue is 0..=179"));
        }
        if low.h > high.h || low.s > high.s || low.v > high.v {
            return Err(anyhow!(
                "inverted color range: low ({},{},{}) above high ({},{},{})",
                low.h,
                low.s,
                low.v,
                high.h,
                high.s,
                high.v
            ));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> Hsv {
        self.low
    }

    pub fn high(&self) -> Hsv {
        self.high
    }

    fn contains(&self, px: Hsv) -> bool {
        (self.low.h..=self.high.h).contains(&px.h)
            && (self.low.s..=self.high.s).contains(&px.s)
            && (self.low.v..=self.high.v).contains(&px.v)
    }
}

/// Convert an 8-bit RGB pixel to OpenCV-scale HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let rf = r as f32;
    let gf = g as f32;
    let bf = b as f32;
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max * 255.0 };

    let hue_deg = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let hue_deg = if hue_deg < 0.0 { hue_deg + 360.0 } else { hue_deg };

    // Halved to fit 8 bits; 360 degrees folds back onto 0.
    let mut h = (hue_deg / 2.0).round();
    if h >= 180.0 {
        h = 0.0;
    }

    Hsv {
        h: h as u8,
        s: s.round() as u8,
        v: max as u8,
    }
}

/// Scores bounding boxes by how much of the target color they contain.
#[derive(Clone, Copy, Debug)]
pub struct ColorScorer {
    range: HsvRange,
    min_region_area: u32,
}

impl ColorScorer {
    pub fn new(range: HsvRange) -> Self {
        Self {
            range,
            min_region_area: 0,
        }
    }

    /// Exclude connected regions smaller than `area` pixels from the score.
    /// With the default of 0 the score equals the total mask pixel count.
    pub fn with_min_region_area(mut self, area: u32) -> Self {
        self.min_region_area = area;
        self
    }

    pub fn range(&self) -> HsvRange {
        self.range
    }

    /// Score each box against the frame, in input order.
    ///
    /// Boxes are clamped to the frame dimensions first; a box that clamps to
    /// zero area, or whose region contains no matching pixels, scores 0.0.
    /// Never fails: a score of zero means "no color match".
    pub fn score_regions(&self, frame: &RgbImage, boxes: &[BBox]) -> Vec<f32> {
        boxes.iter().map(|b| self.score_region(frame, b)).collect()
    }

    fn score_region(&self, frame: &RgbImage, bbox: &BBox) -> f32 {
        let roi = bbox.clamp_to(frame.width(), frame.height());
        let w = roi.width() as usize;
        let h = roi.height() as usize;
        if w == 0 || h == 0 {
            return 0.0;
        }

        let mut mask = vec![false; w * h];
        for y in 0..h {
            for x in 0..w {
                let px = frame.get_pixel((roi.x1 as u32) + x as u32, (roi.y1 as u32) + y as u32);
                let hsv = rgb_to_hsv(px[0], px[1], px[2]);
                mask[y * w + x] = self.range.contains(hsv);
            }
        }

        sum_region_areas(&mask, w, h, self.min_region_area) as f32
    }
}

/// Label 4-connected foreground regions of `mask` and sum the areas of those
/// at or above `min_area` pixels.
fn sum_region_areas(mask: &[bool], w: usize, h: usize, min_area: u32) -> u64 {
    let mut visited = vec![false; mask.len()];
    let mut queue = VecDeque::new();
    let mut total: u64 = 0;

    for start in 0..mask.len() {
        if !mask[start] || visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        let mut region_area: u64 = 0;

        while let Some(idx) = queue.pop_front() {
            region_area += 1;
            let x = idx % w;
            let y = idx / w;

            let mut visit = |nx: usize, ny: usize| {
                let nidx = ny * w + nx;
                if mask[nidx] && !visited[nidx] {
                    visited[nidx] = true;
                    queue.push_back(nidx);
                }
            };

            if x > 0 {
                visit(x - 1, y);
            }
            if x + 1 < w {
                visit(x + 1, y);
            }
            if y > 0 {
                visit(x, y - 1);
            }
            if y + 1 < h {
                visit(x, y + 1);
            }
        }

        if region_area >= min_area as u64 {
            total += region_area;
        }
    }

    total
}
