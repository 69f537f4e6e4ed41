//! Per-session face count statistics.

use std::collections::BTreeMap;
use std::fmt;

use facecap_models::{DetectionStats, FaceDetection};

/// IoU threshold quantized to two decimal digits.
///
/// `0.2`, `0.20000001` and `0.1 + 0.1` all map to the same key, rendered as
/// `"0.20"`. Precision beyond two digits is not preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThresholdKey(i64);

impl ThresholdKey {
    pub fn new(threshold: f64) -> Self {
        Self((threshold * 100.0).round() as i64)
    }

    /// Threshold in hundredths.
    pub fn hundredths(&self) -> i64 {
        self.0
    }
}

impl From<f64> for ThresholdKey {
    fn from(threshold: f64) -> Self {
        Self::new(threshold)
    }
}

impl fmt::Display for ThresholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0 as f64 / 100.0)
    }
}

/// Tracks the current face count and the best count seen per threshold.
#[derive(Debug, Clone, Default)]
pub struct DetectionStatisticsTracker {
    current: usize,
    max_by_threshold: BTreeMap<ThresholdKey, usize>,
}

impl DetectionStatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame's faces detected at `iou_threshold`.
    pub fn update(&mut self, faces: &[FaceDetection], iou_threshold: f64) {
        self.record_count(faces.len(), iou_threshold);
    }

    /// Record one frame's face count detected at `iou_threshold`.
    pub fn record_count(&mut self, count: usize, iou_threshold: f64) {
        self.current = count;
        let max = self
            .max_by_threshold
            .entry(ThresholdKey::new(iou_threshold))
            .or_insert(0);
        *max = (*max).max(count);
    }

    /// Highest count ever recorded at `iou_threshold`, 0 if never used.
    pub fn get_max(&self, iou_threshold: f64) -> usize {
        self.max_by_threshold
            .get(&ThresholdKey::new(iou_threshold))
            .copied()
            .unwrap_or(0)
    }

    /// Face count of the most recent frame.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Clear everything. Only called when a session is torn down.
    pub fn reset(&mut self) {
        self.current = 0;
        self.max_by_threshold.clear();
    }

    /// Serializable copy of the statistics.
    pub fn snapshot(&self) -> DetectionStats {
        DetectionStats {
            current: self.current,
            max_by_threshold: self
                .max_by_threshold
                .iter()
                .map(|(key, max)| (key.to_string(), *max))
                .collect(),
        }
    }
}
