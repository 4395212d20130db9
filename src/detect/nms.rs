use crate::detect::result::Detection;

/// Greedy non-maximum suppression.
///
/// Repeatedly keeps the highest-confidence remaining candidate and discards
/// every candidate whose IoU with an already-kept box exceeds
/// `iou_threshold`. Equal confidences resolve in input order (the sort is
/// stable), so the result is deterministic for a given input order.
///
/// The returned order is confidence order, not input order; callers must
/// rely on membership only. Running the suppression over its own output is a
/// no-op: survivors already satisfy the pairwise IoU bound.
pub fn suppress(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let redundant = kept
            .iter()
            .any(|survivor| survivor.bbox.iou(&candidate.bbox) > iou_threshold);
        if !redundant {
            kept.push(candidate);
        }
    }
    kept
}
