//! Target selection: turning a frame's surviving detections into a single
//! tracked target and a movement command.
//!
//! Two deterministic ranking rules exist. Area-priority ranks by decoded box
//! area and is used when no color signal is available. Color-priority ranks
//! by the paired color scores from the scorer. Both resolve ties toward the
//! first occurrence and treat an empty detection list as a normal outcome:
//! hold position, no target, no error.

use crate::detect::{BBox, Detection, Position};

/// Movement command for the motion-control collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Hold,
    Left,
    Center,
    Right,
}

impl From<Position> for Command {
    fn from(position: Position) -> Self {
        match position {
            Position::Left => Command::Left,
            Position::Center => Command::Center,
            Position::Right => Command::Right,
        }
    }
}

/// The detection selected for this frame.
#[derive(Clone, Debug)]
pub struct Target {
    pub bbox: BBox,
    pub confidence: f32,
    pub position: Position,
    /// Distance to the target center in meters, when a depth collaborator
    /// was supplied and had a reading for that pixel.
    pub distance: Option<f32>,
}

/// Depth-sensing collaborator.
///
/// Implementations return the distance at a pixel in METERS, or `None` when
/// no reading is available there. Sensors that report other units convert
/// inside their implementation; the pipeline never rescales.
pub trait DepthLookup {
    fn distance_at(&self, x: i32, y: i32) -> Option<f32>;
}

/// Pick the detection with the largest decoded area; ties keep the first.
pub fn select_by_area(detections: &[Detection]) -> Option<&Detection> {
    let mut best: Option<&Detection> = None;
    for det in detections {
        match best {
            Some(current) if det.area <= current.area => {}
            _ => best = Some(det),
        }
    }
    best
}

/// Pick the detection with the highest paired color score; ties keep the
/// first. A detection without a paired score counts as 0.0 (no color match).
pub fn select_by_color<'a>(detections: &'a [Detection], scores: &[f32]) -> Option<&'a Detection> {
    let mut best: Option<(&Detection, f32)> = None;
    for (idx, det) in detections.iter().enumerate() {
        let score = scores.get(idx).copied().unwrap_or(0.0);
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((det, score)),
        }
    }
    best.map(|(det, _)| det)
}

/// Area-priority movement decision: `Hold` if and only if nothing survived
/// the pipeline, otherwise the position band of the largest detection.
pub fn get_command(detections: &[Detection]) -> Command {
    match select_by_area(detections) {
        Some(det) => det.position.into(),
        None => Command::Hold,
    }
}

/// Build the frame's target from an already-selected detection, sampling
/// distance at the box center when a depth collaborator is present.
pub fn make_target(det: &Detection, depth: Option<&dyn DepthLookup>) -> Target {
    let (cx, cy) = det.bbox.center();
    Target {
        bbox: det.bbox,
        confidence: det.confidence,
        position: det.position,
        distance: depth.and_then(|d| d.distance_at(cx, cy)),
    }
}

/// Color-priority selection ("hunt"): the highest color score wins.
/// Returns `None` when the detection list is empty.
pub fn hunt(
    detections: &[Detection],
    scores: &[f32],
    depth: Option<&dyn DepthLookup>,
) -> Option<Target> {
    select_by_color(detections, scores).map(|det| make_target(det, depth))
}
