//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use facecap_models::{FaceDetection, GrayFrame};
use facecap_vision::{FaceClassifier, LandmarkLocalizer, ScanParams, VisionError, VisionResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a test subscriber once per test binary.
///
/// Honors `RUST_LOG`, and `LOG_FORMAT=json` for structured output.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_test_writer())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(filter)
            .try_init()
    };
    // Another test in this binary already installed it
    let _ = result;
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Solid RGBA frame.
pub fn solid_frame(width: u32, height: u32, value: u8) -> Vec<u8> {
    vec![value; (width * height * 4) as usize]
}

type ClassifyFn = dyn Fn(usize, &GrayFrame) -> VisionResult<Vec<FaceDetection>> + Send + Sync;

/// Classifier driven by a closure of the call index.
pub struct ScriptedClassifier {
    script: Box<ClassifyFn>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedClassifier {
    pub fn from_fn<F>(script: F) -> Self
    where
        F: Fn(usize, &GrayFrame) -> VisionResult<Vec<FaceDetection>> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Same candidates on every frame.
    pub fn constant(candidates: Vec<FaceDetection>) -> Self {
        Self::from_fn(move |_, _| Ok(candidates.clone()))
    }

    /// Fails on every frame.
    pub fn failing() -> Self {
        Self::from_fn(|_, _| Err(VisionError::classifier_failed("model not loaded")))
    }

    /// Shared call counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl FaceClassifier for ScriptedClassifier {
    fn classify(&self, frame: &GrayFrame, _params: &ScanParams) -> VisionResult<Vec<FaceDetection>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(index, frame)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

type LocalizeFn = dyn Fn(f64, f64, f64) -> VisionResult<Vec<f64>> + Send + Sync;

/// Landmark localizer driven by a closure of the search window.
pub struct ScriptedLocalizer {
    script: Box<LocalizeFn>,
    calls: Arc<AtomicUsize>,
    windows: Arc<std::sync::Mutex<Vec<(f64, f64, f64)>>>,
}

impl ScriptedLocalizer {
    pub fn from_fn<F>(script: F) -> Self
    where
        F: Fn(f64, f64, f64) -> VisionResult<Vec<f64>> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
            windows: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Answers with the window center shifted by `(dr, dc)`.
    pub fn offset(dr: f64, dc: f64) -> Self {
        Self::from_fn(move |row, col, _| Ok(vec![row + dr, col + dc]))
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Every `(row, col, size)` window the localizer was asked about.
    pub fn windows(&self) -> Arc<std::sync::Mutex<Vec<(f64, f64, f64)>>> {
        self.windows.clone()
    }
}

impl LandmarkLocalizer for ScriptedLocalizer {
    fn localize(
        &self,
        row: f64,
        col: f64,
        size: f64,
        _perturbations: u32,
        _frame: &GrayFrame,
    ) -> VisionResult<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().unwrap().push((row, col, size));
        (self.script)(row, col, size)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
