//! Configuration for the capture pipeline.
//!
//! Defaults reproduce the constants the capture screens were tuned with.
//! Every value can be overridden from `FACECAP_*` environment variables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{VisionError, VisionResult};

/// Scan parameters passed to the face classifier on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanParams {
    /// Window step as a fraction of the window size (default: 0.1)
    pub shift_factor: f64,

    /// Multiplicative step between scan scales (default: 1.1)
    pub scale_factor: f64,

    /// Smallest window side in pixels (default: 100)
    pub min_size: u32,

    /// Largest window side in pixels (default: 1000)
    pub max_size: u32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            shift_factor: 0.1,
            scale_factor: 1.1,
            min_size: 100,
            max_size: 1000,
        }
    }
}

/// Face detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Classifier scan parameters
    pub scan: ScanParams,

    /// Frames kept in the temporal detection memory (default: 5)
    pub memory_size: usize,

    /// Clustered detections must score strictly above this (default: 50.0)
    pub min_confidence: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scan: ScanParams::default(),
            memory_size: 5,
            min_confidence: 50.0,
        }
    }
}

/// Pupil localizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizerConfig {
    /// Random perturbations the landmark model averages over (default: 63)
    pub perturbations: u32,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self { perturbations: 63 }
    }
}

/// Capture stability controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Warm-up before detections are judged, in milliseconds (default: 3000)
    pub idle_time_ms: u64,

    /// Sustained-evidence window before capturing, in milliseconds (default: 5000)
    pub evaluation_window_ms: u64,

    /// Refuse to fire on a frame with zero faces (default: false).
    ///
    /// With the default, a session that never sees a face captures an empty
    /// crop list once the window elapses.
    pub require_faces: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            idle_time_ms: 3000,
            evaluation_window_ms: 5000,
            require_faces: false,
        }
    }
}

impl CaptureConfig {
    /// Warm-up duration.
    pub fn idle_time(&self) -> Duration {
        Duration::from_millis(self.idle_time_ms)
    }

    /// Evaluation window duration.
    pub fn evaluation_window(&self) -> Duration {
        Duration::from_millis(self.evaluation_window_ms)
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// IoU threshold used to cluster detections and key statistics (default: 0.2)
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub localizer: LocalizerConfig,

    #[serde(default)]
    pub capture: CaptureConfig,
}

fn default_iou_threshold() -> f64 {
    0.2
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            iou_threshold: default_iou_threshold(),
            detector: DetectorConfig::default(),
            localizer: LocalizerConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup, falling back to defaults
    /// for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();
        let get = |key: &str, default| parse_or(&lookup, key, default);

        Self {
            iou_threshold: get("FACECAP_IOU_THRESHOLD", defaults.iou_threshold),
            detector: DetectorConfig {
                scan: ScanParams {
                    shift_factor: get("FACECAP_SHIFT_FACTOR", defaults.detector.scan.shift_factor),
                    scale_factor: get("FACECAP_SCALE_FACTOR", defaults.detector.scan.scale_factor),
                    min_size: parse_or(
                        &lookup,
                        "FACECAP_MIN_DETECTION_SIZE",
                        defaults.detector.scan.min_size,
                    ),
                    max_size: parse_or(
                        &lookup,
                        "FACECAP_MAX_DETECTION_SIZE",
                        defaults.detector.scan.max_size,
                    ),
                },
                memory_size: parse_or(&lookup, "FACECAP_MEMORY_SIZE", defaults.detector.memory_size),
                min_confidence: get("FACECAP_MIN_CONFIDENCE", defaults.detector.min_confidence),
            },
            localizer: LocalizerConfig {
                perturbations: parse_or(
                    &lookup,
                    "FACECAP_PUPIL_PERTURBATIONS",
                    defaults.localizer.perturbations,
                ),
            },
            capture: CaptureConfig {
                idle_time_ms: parse_or(&lookup, "FACECAP_IDLE_TIME_MS", defaults.capture.idle_time_ms),
                evaluation_window_ms: parse_or(
                    &lookup,
                    "FACECAP_EVALUATION_WINDOW_MS",
                    defaults.capture.evaluation_window_ms,
                ),
                require_faces: parse_or(
                    &lookup,
                    "FACECAP_REQUIRE_FACES",
                    defaults.capture.require_faces,
                ),
            },
        }
    }

    /// Set the IoU threshold.
    pub fn with_iou_threshold(mut self, threshold: f64) -> Self {
        self.iou_threshold = threshold;
        self
    }

    /// Set the detection memory size.
    pub fn with_memory_size(mut self, frames: usize) -> Self {
        self.detector.memory_size = frames;
        self
    }

    /// Set the minimum and maximum detection window sizes.
    pub fn with_detection_size(mut self, min_size: u32, max_size: u32) -> Self {
        self.detector.scan.min_size = min_size;
        self.detector.scan.max_size = max_size;
        self
    }

    /// Set the capture timings in milliseconds.
    pub fn with_capture_timing(mut self, idle_time_ms: u64, evaluation_window_ms: u64) -> Self {
        self.capture.idle_time_ms = idle_time_ms;
        self.capture.evaluation_window_ms = evaluation_window_ms;
        self
    }

    /// Enable or disable the zero-face capture guard.
    pub fn with_require_faces(mut self, require: bool) -> Self {
        self.capture.require_faces = require;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> VisionResult<()> {
        let scan = &self.detector.scan;

        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(VisionError::invalid_config(format!(
                "iou_threshold must be within [0, 1], got {}",
                self.iou_threshold
            )));
        }
        if !(scan.shift_factor > 0.0 && scan.shift_factor <= 1.0) {
            return Err(VisionError::invalid_config(format!(
                "shift_factor must be within (0, 1], got {}",
                scan.shift_factor
            )));
        }
        if !(scan.scale_factor > 1.0) {
            return Err(VisionError::invalid_config(format!(
                "scale_factor must be > 1, got {}",
                scan.scale_factor
            )));
        }
        if scan.min_size == 0 || scan.min_size > scan.max_size {
            return Err(VisionError::invalid_config(format!(
                "detection size range {}..={} is empty",
                scan.min_size, scan.max_size
            )));
        }
        if self.detector.memory_size == 0 {
            return Err(VisionError::invalid_config("memory_size must be > 0"));
        }
        if !self.detector.min_confidence.is_finite() {
            return Err(VisionError::invalid_config("min_confidence must be finite"));
        }

        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
