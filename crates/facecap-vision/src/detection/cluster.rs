//! Greedy IoU clustering of face candidates.

use facecap_models::FaceDetection;

/// Merge overlapping candidates into one detection per face.
///
/// Candidates are visited in descending confidence order (ties keep their
/// input order). The first unassigned candidate seeds a cluster and absorbs
/// every other unassigned candidate whose IoU with the seed is strictly above
/// `iou_threshold`. The representative keeps the seed's window and carries
/// the summed confidence of its members.
///
/// The output is sorted by that summed confidence, strongest first. No two
/// representatives overlap above the threshold, so clustering the output
/// again returns it unchanged.
pub fn cluster_detections(candidates: &[FaceDetection], iou_threshold: f64) -> Vec<FaceDetection> {
    let mut sorted = candidates.to_vec();
    sort_by_confidence(&mut sorted);

    let mut assigned = vec![false; sorted.len()];
    let mut clusters = Vec::new();

    for i in 0..sorted.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let seed = sorted[i];
        let mut confidence = seed.confidence;

        for j in (i + 1)..sorted.len() {
            if !assigned[j] && seed.iou(&sorted[j]) > iou_threshold {
                assigned[j] = true;
                confidence += sorted[j].confidence;
            }
        }

        clusters.push(FaceDetection { confidence, ..seed });
    }

    sort_by_confidence(&mut clusters);
    clusters
}

/// Stable descending sort by confidence.
fn sort_by_confidence(detections: &mut [FaceDetection]) {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}
