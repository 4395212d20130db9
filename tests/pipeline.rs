//! End-to-end pipeline behavior over synthetic detector output.

use image::{Rgb, RgbImage};

use follow_kernel::{
    Command, ColorScorer, DetectionDecoder, FollowPipeline, Hsv, HsvRange, OutputLayer, Position,
    SelectionMode,
};

fn vest_range() -> HsvRange {
    HsvRange::new(Hsv::new(0, 140, 185), Hsv::new(30, 255, 255)).unwrap()
}

fn pipeline(mode: SelectionMode) -> FollowPipeline {
    FollowPipeline::new(
        DetectionDecoder::new(0.3, 0),
        0.4,
        ColorScorer::new(vest_range()),
        mode,
    )
}

fn person_row(cx: f32, cy: f32, w: f32, h: f32, score: f32) -> Vec<f32> {
    vec![cx, cy, w, h, 0.9, score]
}

#[test]
fn single_synthetic_row_decodes_and_survives_suppression() {
    let layers: Vec<OutputLayer> = vec![vec![person_row(0.5, 0.5, 0.2, 0.3, 0.8)]];
    let verdict = pipeline(SelectionMode::AreaPriority).process(&layers, 640, 480, None, None);

    assert_eq!(verdict.detections.len(), 1);
    let det = &verdict.detections[0];
    assert_eq!((det.bbox.x1, det.bbox.y1, det.bbox.x2, det.bbox.y2), (256, 168, 384, 312));
    assert_eq!(det.position, Position::Center);
    assert_eq!(verdict.command, Command::Center);
}

#[test]
fn overlapping_duplicates_collapse_to_one_target() {
    // three near-identical boxes around the same person
    let layers: Vec<OutputLayer> = vec![vec![
        person_row(0.50, 0.50, 0.20, 0.30, 0.6),
        person_row(0.51, 0.50, 0.20, 0.30, 0.9),
        person_row(0.50, 0.51, 0.20, 0.30, 0.7),
    ]];
    let verdict = pipeline(SelectionMode::AreaPriority).process(&layers, 640, 480, None, None);

    assert_eq!(verdict.detections.len(), 1);
    assert_eq!(verdict.detections[0].confidence, 0.9);
}

#[test]
fn hold_exactly_when_nothing_survives() {
    let p = pipeline(SelectionMode::AreaPriority);

    // no detector output at all (camera/inference unavailable)
    let verdict = p.process(&[], 640, 480, None, None);
    assert_eq!(verdict.command, Command::Hold);
    assert!(verdict.target.is_none());

    // rows exist but none pass the gates
    let layers: Vec<OutputLayer> = vec![vec![
        person_row(0.5, 0.5, 0.2, 0.3, 0.1),          // below threshold
        vec![0.5, 0.5, 0.2, 0.3, 0.9, 0.0, 0.99],     // wrong class
    ]];
    let verdict = p.process(&layers, 640, 480, None, None);
    assert_eq!(verdict.command, Command::Hold);
}

#[test]
fn color_priority_tracks_the_marked_person_across_positions() {
    // two people; only the right one wears the vest color
    let layers: Vec<OutputLayer> = vec![vec![
        person_row(0.15, 0.5, 0.3, 0.6, 0.9),
        person_row(0.85, 0.5, 0.2, 0.4, 0.8),
    ]];
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([20, 20, 20]));
    for y in 200..280 {
        for x in 500..580 {
            frame.put_pixel(x, y, Rgb([255, 60, 0]));
        }
    }

    let verdict =
        pipeline(SelectionMode::ColorPriority).process(&layers, 640, 480, Some(&frame), None);
    assert_eq!(verdict.command, Command::Right);

    // area priority would have picked the larger person on the left instead
    let verdict = pipeline(SelectionMode::AreaPriority).process(&layers, 640, 480, None, None);
    assert_eq!(verdict.command, Command::Left);
}

#[test]
fn position_bands_drive_the_command() {
    let p = pipeline(SelectionMode::AreaPriority);
    for (cx, expected) in [
        (0.1, Command::Left),
        (0.5, Command::Center),
        (0.9, Command::Right),
    ] {
        let layers: Vec<OutputLayer> = vec![vec![person_row(cx, 0.5, 0.1, 0.2, 0.8)]];
        let verdict = p.process(&layers, 300, 300, None, None);
        assert_eq!(verdict.command, expected, "cx {}", cx);
    }
}
