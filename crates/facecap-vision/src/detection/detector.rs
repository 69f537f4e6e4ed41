//! Face detector: classifier scan, temporal memory, clustering and
//! confidence floor.

use facecap_models::{FaceDetection, GrayFrame};
use tracing::{debug, warn};

use super::classifier::FaceClassifier;
use super::cluster::cluster_detections;
use super::memory::DetectionMemory;
use crate::config::DetectorConfig;
use crate::metrics;

/// Stateful face detector for one capture session.
///
/// Owns the temporal memory, so frames of one session must go through the
/// same detector in delivery order.
pub struct FaceDetector {
    config: DetectorConfig,
    classifier: Option<Box<dyn FaceClassifier>>,
    memory: DetectionMemory,
}

impl FaceDetector {
    /// Create a detector with no classifier attached yet.
    pub fn new(config: DetectorConfig) -> Self {
        let memory = DetectionMemory::new(config.memory_size);
        Self {
            config,
            classifier: None,
            memory,
        }
    }

    /// Builder-style variant of [`FaceDetector::attach_classifier`].
    pub fn with_classifier(mut self, classifier: Box<dyn FaceClassifier>) -> Self {
        self.attach_classifier(classifier);
        self
    }

    /// Attach (or replace) the classifier.
    pub fn attach_classifier(&mut self, classifier: Box<dyn FaceClassifier>) {
        debug!(classifier = classifier.name(), "Face classifier attached");
        self.classifier = Some(classifier);
    }

    /// Remove the classifier and return it.
    pub fn detach_classifier(&mut self) -> Option<Box<dyn FaceClassifier>> {
        self.classifier.take()
    }

    /// Whether a classifier is attached.
    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }

    /// Detector settings.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect faces in `frame`.
    ///
    /// Returns an empty list when no classifier is attached or the
    /// classifier fails. A failed frame leaves the temporal memory untouched.
    /// Candidates with non-finite fields or a non-positive size are dropped
    /// and logged before they reach the memory.
    pub fn detect(&mut self, frame: &GrayFrame, iou_threshold: f64) -> Vec<FaceDetection> {
        let Some(classifier) = self.classifier.as_ref() else {
            debug!("Face classifier not attached, skipping detection");
            return Vec::new();
        };

        let raw = match classifier.classify(frame, &self.config.scan) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    classifier = classifier.name(),
                    error = %e,
                    "Face classifier failed, treating frame as empty"
                );
                metrics::record_classifier_failure(classifier.name());
                return Vec::new();
            }
        };

        let raw_count = raw.len();
        let raw: Vec<FaceDetection> = raw
            .into_iter()
            .filter(|candidate| match candidate_defect(candidate) {
                None => true,
                Some(reason) => {
                    warn!(
                        classifier = classifier.name(),
                        reason,
                        candidate = ?candidate,
                        "Dropping malformed face candidate"
                    );
                    metrics::record_rejected_candidate(reason);
                    false
                }
            })
            .collect();
        let remembered = self.memory.update(raw);
        let clustered = cluster_detections(&remembered, iou_threshold);
        let min_confidence = self.config.min_confidence;
        let faces: Vec<FaceDetection> = clustered
            .into_iter()
            .filter(|d| d.confidence > min_confidence)
            .collect();

        debug!(
            raw = raw_count,
            remembered = remembered.len(),
            faces = faces.len(),
            "Face detection pass"
        );

        faces
    }

    /// Forget the temporal memory.
    pub fn reset(&mut self) {
        self.memory.clear();
    }
}

/// Why a raw candidate cannot be used, if it cannot.
fn candidate_defect(candidate: &FaceDetection) -> Option<&'static str> {
    let finite = candidate.row.is_finite()
        && candidate.col.is_finite()
        && candidate.size.is_finite()
        && candidate.confidence.is_finite();

    if !finite {
        Some("non_finite")
    } else if candidate.size <= 0.0 {
        Some("non_positive_size")
    } else {
        None
    }
}

impl std::fmt::Debug for FaceDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceDetector")
            .field("config", &self.config)
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .field("remembered_frames", &self.memory.len())
            .finish()
    }
}
