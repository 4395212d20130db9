use crate::detect::result::{BBox, Detection, Position};

/// One output layer of the detector: a sequence of per-cell rows shaped
/// `[cx, cy, w, h, obj_score, class_score_0, .., class_score_K-1]`, with the
/// geometry normalized to [0,1] relative to the frame.
pub type OutputLayer = Vec<Vec<f32>>;

/// Decodes raw detector output into candidate detections.
///
/// The decoder is a pure function of its inputs: it holds only configuration
/// and keeps no per-frame state, so a single instance can serve any number of
/// frames (or threads) without synchronization.
#[derive(Clone, Copy, Debug)]
pub struct DetectionDecoder {
    confidence_threshold: f32,
    target_class_id: usize,
}

impl DetectionDecoder {
    pub fn new(confidence_threshold: f32, target_class_id: usize) -> Self {
        Self {
            confidence_threshold,
            target_class_id,
        }
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn target_class_id(&self) -> usize {
        self.target_class_id
    }

    /// Decode every row of every output layer against the frame dimensions.
    ///
    /// Output order is input row order, not confidence order. Rows that are
    /// malformed, below threshold, or of the wrong class are silently
    /// dropped; an empty result is a valid outcome, not an error.
    pub fn decode(&self, layers: &[OutputLayer], width: u32, height: u32) -> Vec<Detection> {
        let mut detections = Vec::new();
        for layer in layers {
            for row in layer {
                if let Some(det) = self.decode_row(row, width, height) {
                    detections.push(det);
                }
            }
        }
        detections
    }

    fn decode_row(&self, row: &[f32], width: u32, height: u32) -> Option<Detection> {
        // A row without at least one class score cannot be decoded.
        if row.len() < 6 {
            return None;
        }
        if row[..4].iter().any(|v| !v.is_finite()) {
            return None;
        }

        let (class_id, confidence) = argmax_finite(&row[5..])?;

        // Confidence gate first, class gate second; both are unconditional.
        if confidence <= self.confidence_threshold {
            return None;
        }
        if class_id != self.target_class_id {
            return None;
        }

        let cx = row[0] * width as f32;
        let cy = row[1] * height as f32;
        let w = row[2] * width as f32;
        let h = row[3] * height as f32;

        // Area is taken before truncation so near-identical boxes still rank.
        let area = (w * h) as i64;

        let bbox = BBox::new(
            (cx - w / 2.0) as i32,
            (cy - h / 2.0) as i32,
            (cx + w / 2.0) as i32,
            (cy + h / 2.0) as i32,
        );

        Some(Detection {
            class_id,
            confidence,
            bbox,
            position: Position::classify(cx, width),
            area,
        })
    }
}

/// Index and value of the largest finite score; ties keep the first index.
fn argmax_finite(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if !score.is_finite() {
            continue;
        }
        match best {
            Some((_, value)) if score <= value => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cx: f32, cy: f32, w: f32, h: f32, scores: &[f32]) -> Vec<f32> {
        let mut r = vec![cx, cy, w, h, 0.9];
        r.extend_from_slice(scores);
        r
    }

    fn decoder() -> DetectionDecoder {
        DetectionDecoder::new(0.3, 0)
    }

    #[test]
    fn decodes_single_row_round_trip() {
        let layers = vec![vec![row(0.5, 0.5, 0.2, 0.3, &[0.8, 0.1])]];
        let out = decoder().decode(&layers, 640, 480);
        assert_eq!(out.len(), 1);
        let det = &out[0];
        assert_eq!(det.bbox, BBox::new(256, 168, 384, 312));
        assert_eq!(det.class_id, 0);
        assert_eq!(det.position, Position::Center);
        assert_eq!(det.area, (0.2 * 640.0 * 0.3 * 480.0) as i64);
    }

    #[test]
    fn rejects_confidence_at_or_below_threshold() {
        // exactly at threshold is rejected; the comparison is strict
        let layers = vec![vec![
            row(0.5, 0.5, 0.2, 0.2, &[0.3]),
            row(0.5, 0.5, 0.2, 0.2, &[0.2]),
        ]];
        assert!(decoder().decode(&layers, 640, 480).is_empty());
    }

    #[test]
    fn rejects_wrong_class_regardless_of_confidence() {
        let layers = vec![vec![row(0.5, 0.5, 0.2, 0.2, &[0.1, 0.99])]];
        assert!(decoder().decode(&layers, 640, 480).is_empty());
    }

    #[test]
    fn argmax_picks_highest_class_score() {
        let layers = vec![vec![row(0.5, 0.5, 0.2, 0.2, &[0.7, 0.4])]];
        let out = decoder().decode(&layers, 640, 480);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_id, 0);
        assert_eq!(out[0].confidence, 0.7);
    }

    #[test]
    fn skips_malformed_and_non_finite_rows() {
        let layers = vec![vec![
            vec![0.5, 0.5, 0.2],
            row(f32::NAN, 0.5, 0.2, 0.2, &[0.9]),
            row(0.5, 0.5, 0.2, 0.2, &[f32::NAN]),
            row(0.5, 0.5, 0.2, 0.2, &[0.9]),
        ]];
        let out = decoder().decode(&layers, 640, 480);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn preserves_input_row_order() {
        let layers = vec![
            vec![row(0.2, 0.5, 0.1, 0.1, &[0.4])],
            vec![row(0.8, 0.5, 0.1, 0.1, &[0.9])],
        ];
        let out = decoder().decode(&layers, 300, 300);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, Position::Left);
        assert_eq!(out[1].position, Position::Right);
    }

    #[test]
    fn empty_output_is_valid() {
        assert!(decoder().decode(&[], 640, 480).is_empty());
        assert!(decoder().decode(&[vec![]], 640, 480).is_empty());
    }

    #[test]
    fn corners_truncate_toward_zero() {
        // cx=0.05*100=5.0, w=0.11*100=11.0 -> x1 = -0.5 truncated to 0
        let layers = vec![vec![row(0.05, 0.05, 0.11, 0.11, &[0.9])]];
        let out = decoder().decode(&layers, 100, 100);
        assert_eq!(out[0].bbox.x1, 0);
        assert_eq!(out[0].bbox.x2, 10);
    }
}
