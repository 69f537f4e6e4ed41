//! Detection statistics snapshot.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Face-count statistics for a capture session.
///
/// `max_by_threshold` is keyed by the IoU threshold rendered with exactly
/// two decimal digits (`"0.20"`), one entry per distinct threshold used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionStats {
    /// Faces detected in the most recent frame
    pub current: usize,
    /// Highest face count ever observed per threshold
    pub max_by_threshold: BTreeMap<String, usize>,
}

impl DetectionStats {
    /// Highest count recorded under a rendered threshold key, 0 if unseen.
    pub fn max_for_key(&self, key: &str) -> usize {
        self.max_by_threshold.get(key).copied().unwrap_or(0)
    }
}
