//! The per-frame pipeline: Decoder -> Suppressor -> (ColorScorer) ->
//! TargetSelector.
//!
//! `FollowPipeline` is the single entry point for both selection modes. It
//! holds configuration only; every call receives its frame's data as
//! explicit arguments and returns a fresh `FrameVerdict`, so no state leaks
//! between frames and concurrent invocations need no synchronization.

use image::RgbImage;

use crate::color::ColorScorer;
use crate::config::FollowConfig;
use crate::detect::{suppress, Detection, DetectionDecoder, OutputLayer};
use crate::select::{hunt, make_target, select_by_area, Command, DepthLookup, Target};

/// Which ranking rule picks the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// Largest decoded box wins. Used when no color signature is configured
    /// or no frame pixels are available.
    AreaPriority,
    /// Highest color-signature score wins.
    ColorPriority,
}

/// Everything the pipeline decided about one frame.
#[derive(Clone, Debug)]
pub struct FrameVerdict {
    /// Detections surviving filtering and suppression.
    pub detections: Vec<Detection>,
    /// The selected target, if any detection survived.
    pub target: Option<Target>,
    /// Movement command; `Hold` exactly when `detections` is empty.
    pub command: Command,
}

pub struct FollowPipeline {
    decoder: DetectionDecoder,
    nms_threshold: f32,
    scorer: ColorScorer,
    mode: SelectionMode,
}

impl FollowPipeline {
    pub fn new(
        decoder: DetectionDecoder,
        nms_threshold: f32,
        scorer: ColorScorer,
        mode: SelectionMode,
    ) -> Self {
        Self {
            decoder,
            nms_threshold,
            scorer,
            mode,
        }
    }

    /// Build a pipeline from a validated configuration.
    pub fn from_config(cfg: &FollowConfig, mode: SelectionMode) -> Self {
        let decoder = DetectionDecoder::new(cfg.confidence_threshold, cfg.target_class_id);
        let scorer =
            ColorScorer::new(cfg.color.range).with_min_region_area(cfg.color.min_region_area);
        Self::new(decoder, cfg.nms_threshold, scorer, mode)
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Run the full pipeline over one frame's raw detector output.
    ///
    /// `frame` carries the pixels for color scoring and is only consulted in
    /// color-priority mode; without it the pipeline degrades to area
    /// ranking. `depth` is sampled at the selected box center when present.
    /// Empty detector output is a legitimate call and yields `Hold`.
    pub fn process(
        &self,
        layers: &[OutputLayer],
        width: u32,
        height: u32,
        frame: Option<&RgbImage>,
        depth: Option<&dyn DepthLookup>,
    ) -> FrameVerdict {
        let candidates = self.decoder.decode(layers, width, height);
        let detections = suppress(candidates, self.nms_threshold);
        log::debug!(
            "pipeline: {} detection(s) after suppression ({}x{} frame)",
            detections.len(),
            width,
            height
        );

        let target = match (self.mode, frame) {
            (SelectionMode::ColorPriority, Some(frame)) => {
                let boxes: Vec<_> = detections.iter().map(|d| d.bbox).collect();
                let scores = self.scorer.score_regions(frame, &boxes);
                hunt(&detections, &scores, depth)
            }
            (SelectionMode::ColorPriority, None) => {
                log::debug!("pipeline: no frame pixels, falling back to area ranking");
                select_by_area(&detections).map(|det| make_target(det, depth))
            }
            (SelectionMode::AreaPriority, _) => {
                select_by_area(&detections).map(|det| make_target(det, depth))
            }
        };

        let command = match &target {
            Some(t) => t.position.into(),
            None => Command::Hold,
        };

        FrameVerdict {
            detections,
            target,
            command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Hsv, HsvRange};
    use image::Rgb;

    fn pipeline(mode: SelectionMode) -> FollowPipeline {
        let range = HsvRange::new(Hsv::new(0, 140, 185), Hsv::new(30, 255, 255)).unwrap();
        FollowPipeline::new(
            DetectionDecoder::new(0.3, 0),
            0.4,
            ColorScorer::new(range),
            mode,
        )
    }

    fn person_row(cx: f32, cy: f32, w: f32, h: f32, score: f32) -> Vec<f32> {
        vec![cx, cy, w, h, 0.9, score]
    }

    #[test]
    fn empty_output_holds() {
        let verdict = pipeline(SelectionMode::AreaPriority).process(&[], 640, 480, None, None);
        assert!(verdict.detections.is_empty());
        assert!(verdict.target.is_none());
        assert_eq!(verdict.command, Command::Hold);
    }

    #[test]
    fn area_mode_steers_toward_largest_person() {
        let layers = vec![vec![
            person_row(0.1, 0.5, 0.05, 0.1, 0.8),
            person_row(0.9, 0.5, 0.3, 0.6, 0.7),
        ]];
        let verdict = pipeline(SelectionMode::AreaPriority).process(&layers, 640, 480, None, None);
        assert_eq!(verdict.detections.len(), 2);
        assert_eq!(verdict.command, Command::Right);
    }

    #[test]
    fn color_mode_prefers_the_marked_person() {
        // left person is small but wears the target color; right one is larger
        let layers = vec![vec![
            person_row(0.15, 0.5, 0.2, 0.4, 0.8),
            person_row(0.85, 0.5, 0.3, 0.6, 0.7),
        ]];
        let mut frame = RgbImage::from_pixel(640, 480, Rgb([0, 0, 0]));
        for y in 200..280 {
            for x in 60..130 {
                frame.put_pixel(x, y, Rgb([255, 40, 0]));
            }
        }
        let verdict =
            pipeline(SelectionMode::ColorPriority).process(&layers, 640, 480, Some(&frame), None);
        assert_eq!(verdict.command, Command::Left);
    }

    #[test]
    fn color_mode_without_frame_degrades_to_area() {
        let layers = vec![vec![
            person_row(0.15, 0.5, 0.05, 0.1, 0.8),
            person_row(0.85, 0.5, 0.3, 0.6, 0.7),
        ]];
        let verdict = pipeline(SelectionMode::ColorPriority).process(&layers, 640, 480, None, None);
        assert_eq!(verdict.command, Command::Right);
    }

    #[test]
    fn repeated_calls_are_independent() {
        let p = pipeline(SelectionMode::AreaPriority);
        let layers = vec![vec![person_row(0.5, 0.5, 0.2, 0.3, 0.8)]];
        let first = p.process(&layers, 640, 480, None, None);
        let second = p.process(&layers, 640, 480, None, None);
        assert_eq!(first.detections.len(), second.detections.len());
        assert_eq!(first.command, second.command);
        let third = p.process(&[], 640, 480, None, None);
        assert_eq!(third.command, Command::Hold);
    }
}
