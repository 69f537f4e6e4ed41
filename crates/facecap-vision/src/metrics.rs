//! Capture pipeline metrics.
//!
//! Recorded through the `metrics` facade. Installing an exporter is left to
//! the embedding application.

use facecap_models::CapturePhase;
use metrics::{counter, histogram};
use std::time::Duration;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total frames run through the pipeline.
    pub const FRAMES_PROCESSED_TOTAL: &str = "facecap_frames_processed_total";

    /// Faces kept per frame after clustering and filtering.
    pub const FACES_PER_FRAME: &str = "facecap_faces_per_frame";

    /// Wall-clock duration of one detection pass in seconds.
    pub const FRAME_PROCESSING_SECONDS: &str = "facecap_frame_processing_seconds";

    /// Pupil localization attempts by outcome.
    pub const PUPIL_LOCALIZATIONS_TOTAL: &str = "facecap_pupil_localizations_total";

    /// Classifier calls that returned an error.
    pub const CLASSIFIER_FAILURES_TOTAL: &str = "facecap_classifier_failures_total";

    /// Classifier candidates dropped as malformed, by reason.
    pub const REJECTED_CANDIDATES_TOTAL: &str = "facecap_rejected_candidates_total";

    /// Capture phase transitions by target phase.
    pub const PHASE_TRANSITIONS_TOTAL: &str = "facecap_phase_transitions_total";

    /// Captures fired, labelled by whether the frame had faces.
    pub const CAPTURES_TOTAL: &str = "facecap_captures_total";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record one completed detection pass.
pub fn record_frame(faces: usize, elapsed: Duration) {
    counter!(names::FRAMES_PROCESSED_TOTAL).increment(1);
    histogram!(names::FACES_PER_FRAME).record(faces as f64);
    histogram!(names::FRAME_PROCESSING_SECONDS).record(elapsed.as_secs_f64());
}

/// Record a pupil localization outcome (`found` or a miss kind).
pub fn record_pupil_outcome(outcome: &'static str) {
    counter!(names::PUPIL_LOCALIZATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a classifier error.
pub fn record_classifier_failure(classifier: &'static str) {
    counter!(names::CLASSIFIER_FAILURES_TOTAL, "classifier" => classifier).increment(1);
}

/// Record a malformed classifier candidate.
pub fn record_rejected_candidate(reason: &'static str) {
    counter!(names::REJECTED_CANDIDATES_TOTAL, "reason" => reason).increment(1);
}

/// Record a capture phase transition.
pub fn record_phase_transition(to: CapturePhase) {
    counter!(names::PHASE_TRANSITIONS_TOTAL, "to" => to.as_str()).increment(1);
}

/// Record a capture.
pub fn record_capture(faces: usize) {
    let label = if faces == 0 { "none" } else { "present" };
    counter!(names::CAPTURES_TOTAL, "faces" => label).increment(1);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        for name in [
            names::FRAMES_PROCESSED_TOTAL,
            names::FACES_PER_FRAME,
            names::FRAME_PROCESSING_SECONDS,
            names::PUPIL_LOCALIZATIONS_TOTAL,
            names::CLASSIFIER_FAILURES_TOTAL,
            names::REJECTED_CANDIDATES_TOTAL,
            names::PHASE_TRANSITIONS_TOTAL,
            names::CAPTURES_TOTAL,
        ] {
            assert!(name.starts_with("facecap_"));
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_frame(2, Duration::from_millis(12));
        record_pupil_outcome("found");
        record_rejected_candidate("non_finite");
        record_phase_transition(CapturePhase::Validating);
        record_capture(0);
    }
}
