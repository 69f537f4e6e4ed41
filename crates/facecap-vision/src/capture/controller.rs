//! Capture stability state machine.
//!
//! A session first waits out an idle period so exposure and the detector's
//! temporal memory can settle. It then requires a full evaluation window in
//! which every frame shows at least half of the session's best face count.
//! One frame below that restarts the window. When a window completes, the
//! controller fires exactly once and stays `Captured` until reset.

use std::time::Duration;

use facecap_models::CapturePhase;
use tracing::{debug, info};

use crate::config::CaptureConfig;
use crate::metrics;

/// What the caller should do with the frame just observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDecision {
    /// Keep delivering frames.
    Wait,
    /// Crop this frame now. Returned once per session.
    Capture,
    /// The session already captured; the frame was ignored.
    Finished,
}

impl CaptureDecision {
    pub fn is_capture(&self) -> bool {
        matches!(self, CaptureDecision::Capture)
    }
}

/// Per-session capture controller.
#[derive(Debug, Clone)]
pub struct CaptureStabilityController {
    config: CaptureConfig,
    session_start: Duration,
    phase: CapturePhase,
    validation_start: Option<Duration>,
    validation_passed: bool,
}

impl CaptureStabilityController {
    /// Start a session at `session_start`.
    pub fn new(config: CaptureConfig, session_start: Duration) -> Self {
        Self {
            config,
            session_start,
            phase: CapturePhase::Warming,
            validation_start: None,
            validation_passed: false,
        }
    }

    /// Restart the session at `now`.
    pub fn reset(&mut self, now: Duration) {
        self.session_start = now;
        self.phase = CapturePhase::Warming;
        self.validation_start = None;
        self.validation_passed = false;
    }

    /// Feed one frame's counts.
    ///
    /// `max_count` is the session's best face count at the active IoU
    /// threshold, including this frame.
    pub fn observe(&mut self, now: Duration, current_count: usize, max_count: usize) -> CaptureDecision {
        match self.phase {
            CapturePhase::Captured => CaptureDecision::Finished,
            CapturePhase::Warming => {
                if now.saturating_sub(self.session_start) >= self.config.idle_time() {
                    self.enter_validation(now);
                }
                CaptureDecision::Wait
            }
            CapturePhase::Validating => self.validate(now, current_count, max_count),
        }
    }

    fn enter_validation(&mut self, now: Duration) {
        self.phase = CapturePhase::Validating;
        self.validation_start = Some(now);
        self.validation_passed = true;

        info!(
            elapsed_ms = now.saturating_sub(self.session_start).as_millis() as u64,
            "Capture warm-up complete, validating stability"
        );
        metrics::record_phase_transition(CapturePhase::Validating);
    }

    fn validate(&mut self, now: Duration, current_count: usize, max_count: usize) -> CaptureDecision {
        let required = max_count / 2;

        if current_count < required {
            debug!(
                current = current_count,
                required,
                "Face count below stability minimum, restarting window"
            );
            self.validation_start = Some(now);
            self.validation_passed = false;
            return CaptureDecision::Wait;
        }

        // A frame that qualifies after a restart re-arms the window without
        // moving its start, but cannot complete it itself.
        let armed = self.validation_passed;
        self.validation_passed = true;
        let start = *self.validation_start.get_or_insert(now);

        if !armed || now.saturating_sub(start) < self.config.evaluation_window() {
            return CaptureDecision::Wait;
        }

        if self.config.require_faces && current_count == 0 {
            debug!("Stability window complete but no face in frame, holding capture");
            return CaptureDecision::Wait;
        }

        self.phase = CapturePhase::Captured;
        info!(
            faces = current_count,
            window_start_ms = start.as_millis() as u64,
            now_ms = now.as_millis() as u64,
            "Capture stability reached"
        );
        metrics::record_phase_transition(CapturePhase::Captured);
        metrics::record_capture(current_count);

        CaptureDecision::Capture
    }

    /// Current phase.
    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    /// When the session started.
    pub fn session_start(&self) -> Duration {
        self.session_start
    }

    /// Start of the running evaluation window, if validating.
    pub fn validation_start(&self) -> Option<Duration> {
        self.validation_start
    }

    /// Whether the running window has been continuously satisfied.
    pub fn validation_passed(&self) -> bool {
        self.validation_passed
    }

    pub fn is_captured(&self) -> bool {
        self.phase.is_terminal()
    }
}
