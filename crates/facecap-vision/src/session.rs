//! Capture session: one detection pass per delivered frame.
//!
//! [`CaptureSession`] owns every stateful component of the pipeline and
//! runs them in order for each frame:
//!
//! 1. RGBA to luminance ([`GrayscaleConverter`])
//! 2. Face detection with temporal smoothing ([`FaceDetector`])
//! 3. Eye regions and pupils for each face ([`EyeRegionDeriver`], [`PupilLocalizer`])
//! 4. Face count statistics ([`DetectionStatisticsTracker`])
//! 5. Capture decision ([`CaptureStabilityController`]) and crop ([`FrameCropper`])
//!
//! Missing or failing collaborators never abort a pass. They degrade to
//! empty results and are logged.

use std::time::{Duration, Instant};

use facecap_models::{
    CapturePhase, CapturedImage, DetectionStats, EyePupils, FaceDetection, FrameReport,
    GrayFrame, SessionId,
};
use tracing::{debug, error, info, info_span};

use crate::capture::{CaptureStabilityController, FrameCropper};
use crate::config::PipelineConfig;
use crate::detection::{FaceClassifier, FaceDetector};
use crate::error::VisionResult;
use crate::eyes::EyeRegionDeriver;
use crate::grayscale::GrayscaleConverter;
use crate::metrics;
use crate::pupil::{LandmarkLocalizer, PupilLocalizer};
use crate::statistics::DetectionStatisticsTracker;

/// A single face capture session.
#[derive(Debug)]
pub struct CaptureSession {
    id: SessionId,
    config: PipelineConfig,
    converter: GrayscaleConverter,
    detector: FaceDetector,
    eyes: EyeRegionDeriver,
    localizer: PupilLocalizer,
    stats: DetectionStatisticsTracker,
    controller: CaptureStabilityController,
    cropper: FrameCropper,
}

impl CaptureSession {
    /// Start a session at `started_at` on the frame source's clock.
    ///
    /// Fails only if `config` does not validate.
    pub fn new(config: PipelineConfig, started_at: Duration) -> VisionResult<Self> {
        config.validate()?;

        let id = SessionId::new();
        info!(
            session_id = %id,
            iou_threshold = config.iou_threshold,
            idle_time_ms = config.capture.idle_time_ms,
            evaluation_window_ms = config.capture.evaluation_window_ms,
            "Capture session started"
        );

        Ok(Self {
            id,
            converter: GrayscaleConverter::new(),
            detector: FaceDetector::new(config.detector.clone()),
            eyes: EyeRegionDeriver::new(),
            localizer: PupilLocalizer::new(config.localizer),
            stats: DetectionStatisticsTracker::new(),
            controller: CaptureStabilityController::new(config.capture, started_at),
            cropper: FrameCropper::new(),
            config,
        })
    }

    /// Builder-style variant of [`CaptureSession::attach_classifier`].
    pub fn with_classifier(mut self, classifier: Box<dyn FaceClassifier>) -> Self {
        self.attach_classifier(classifier);
        self
    }

    /// Builder-style variant of [`CaptureSession::attach_localizer`].
    pub fn with_localizer(mut self, localizer: Box<dyn LandmarkLocalizer>) -> Self {
        self.attach_localizer(localizer);
        self
    }

    /// Attach the face classifier. Frames processed before this report no faces.
    pub fn attach_classifier(&mut self, classifier: Box<dyn FaceClassifier>) {
        self.detector.attach_classifier(classifier);
    }

    /// Attach the landmark model. Frames processed before this report no pupils.
    pub fn attach_localizer(&mut self, localizer: Box<dyn LandmarkLocalizer>) {
        self.localizer.attach_model(localizer);
    }

    /// Run one detection pass over an RGBA frame.
    ///
    /// `timestamp` is the frame's time on the same monotonic clock the
    /// session was started with. The only error is a buffer whose length is
    /// not `width * height * 4`.
    pub fn process_frame(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
        timestamp: Duration,
    ) -> VisionResult<FrameReport> {
        let span = info_span!(
            "process_frame",
            session_id = %self.id,
            timestamp_ms = timestamp.as_millis() as u64
        );
        let _enter = span.enter();
        let started = Instant::now();
        let iou_threshold = self.config.iou_threshold;

        let gray = self.converter.convert(rgba, width, height)?;
        let faces = self.detector.detect(gray, iou_threshold);
        let pupils = locate_pupils(&self.eyes, &self.localizer, &faces, gray);

        self.stats.update(&faces, iou_threshold);
        let decision = self.controller.observe(
            timestamp,
            self.stats.current(),
            self.stats.get_max(iou_threshold),
        );

        let captured = decision
            .is_capture()
            .then(|| self.crop(rgba, width, height, &faces));

        let processing_time = started.elapsed();
        metrics::record_frame(faces.len(), processing_time);
        debug!(
            faces = faces.len(),
            pupils = pupils.iter().map(EyePupils::found).sum::<usize>(),
            phase = %self.controller.phase(),
            elapsed_us = processing_time.as_micros() as u64,
            "Frame processed"
        );

        Ok(FrameReport {
            timestamp,
            faces,
            pupils,
            stats: self.stats.snapshot(),
            phase: self.controller.phase(),
            captured,
            processing_time,
        })
    }

    fn crop(&self, rgba: &[u8], width: u32, height: u32, faces: &[FaceDetection]) -> Vec<CapturedImage> {
        match self.cropper.capture(rgba, width, height, faces) {
            Ok(images) => images,
            Err(e) => {
                error!(error = %e, "Failed to encode face crop");
                Vec::new()
            }
        }
    }

    /// Release buffers, statistics and both collaborators.
    ///
    /// The session keeps its phase; attach new collaborators and call
    /// [`CaptureSession::reset`] to reuse it.
    pub fn teardown(&mut self) {
        self.stats.reset();
        self.detector.reset();
        self.detector.detach_classifier();
        self.localizer.detach_model();
        self.converter.release();
        info!(session_id = %self.id, "Capture session torn down");
    }

    /// Start a fresh session at `now`, keeping the attached collaborators.
    pub fn reset(&mut self, now: Duration) {
        let previous = std::mem::replace(&mut self.id, SessionId::new());
        self.stats.reset();
        self.detector.reset();
        self.controller.reset(now);
        info!(session_id = %self.id, previous = %previous, "Capture session reset");
    }

    pub fn session_id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> CapturePhase {
        self.controller.phase()
    }

    /// Statistics snapshot.
    pub fn stats(&self) -> DetectionStats {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether both collaborators are attached.
    pub fn is_ready(&self) -> bool {
        self.detector.is_ready() && self.localizer.is_ready()
    }
}

/// Pupils for each face, in face order.
fn locate_pupils(
    eyes: &EyeRegionDeriver,
    localizer: &PupilLocalizer,
    faces: &[FaceDetection],
    frame: &GrayFrame,
) -> Vec<EyePupils> {
    faces
        .iter()
        .map(|face| {
            let (left, right) = eyes.derive(face);
            let mut pupils = EyePupils::default();
            for region in [left, right] {
                pupils.set(region.side, localizer.localize(&region, frame));
            }
            pupils
        })
        .collect()
}
