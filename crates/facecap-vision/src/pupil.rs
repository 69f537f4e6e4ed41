//! Pupil localization inside an eye region.
//!
//! The landmark model is an external collaborator. Anything it returns is
//! validated before it becomes a [`PupilPosition`]; every way of not finding
//! a pupil is an ordinary [`PupilMiss`], never an error.

use facecap_models::{EyeRegion, GrayFrame, PupilPosition};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LocalizerConfig;
use crate::error::VisionResult;
use crate::metrics;

/// Landmark model that refines a pupil position inside a search window.
pub trait LandmarkLocalizer: Send + Sync {
    /// Localize the landmark in the window centered at `(row, col)` with
    /// side `size`, averaging over `perturbations` randomized runs.
    ///
    /// Returns the raw coordinate payload; a well-formed answer is exactly
    /// `[row, col]`.
    fn localize(
        &self,
        row: f64,
        col: f64,
        size: f64,
        perturbations: u32,
        frame: &GrayFrame,
    ) -> VisionResult<Vec<f64>>;

    /// Localizer name for logging.
    fn name(&self) -> &'static str;
}

impl<L: LandmarkLocalizer + ?Sized> LandmarkLocalizer for Box<L> {
    fn localize(
        &self,
        row: f64,
        col: f64,
        size: f64,
        perturbations: u32,
        frame: &GrayFrame,
    ) -> VisionResult<Vec<f64>> {
        (**self).localize(row, col, size, perturbations, frame)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Why no pupil was produced for a region.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PupilMiss {
    #[error("landmark localizer not attached")]
    Unavailable,

    #[error("eye region outside the frame")]
    RegionInvalid,

    #[error("landmark localizer failed: {0}")]
    Failed(String),

    #[error("malformed localizer output: {0:?}")]
    Malformed(Vec<f64>),

    #[error("non-finite pupil position ({row}, {col})")]
    NonFinite { row: f64, col: f64 },

    #[error("pupil position ({row}, {col}) outside the frame")]
    OutOfBounds { row: f64, col: f64 },
}

impl PupilMiss {
    /// Stable diagnostic label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PupilMiss::Unavailable => "unavailable",
            PupilMiss::RegionInvalid => "region_invalid",
            PupilMiss::Failed(_) => "failed",
            PupilMiss::Malformed(_) => "malformed",
            PupilMiss::NonFinite { .. } => "non_finite",
            PupilMiss::OutOfBounds { .. } => "out_of_bounds",
        }
    }
}

/// Validates landmark model output into pupil positions.
pub struct PupilLocalizer {
    config: LocalizerConfig,
    model: Option<Box<dyn LandmarkLocalizer>>,
}

impl PupilLocalizer {
    /// Create a localizer with no model attached yet.
    pub fn new(config: LocalizerConfig) -> Self {
        Self { config, model: None }
    }

    /// Builder-style variant of [`PupilLocalizer::attach_model`].
    pub fn with_model(mut self, model: Box<dyn LandmarkLocalizer>) -> Self {
        self.attach_model(model);
        self
    }

    /// Attach (or replace) the landmark model.
    pub fn attach_model(&mut self, model: Box<dyn LandmarkLocalizer>) {
        debug!(localizer = model.name(), "Landmark localizer attached");
        self.model = Some(model);
    }

    /// Remove the landmark model and return it.
    pub fn detach_model(&mut self) -> Option<Box<dyn LandmarkLocalizer>> {
        self.model.take()
    }

    /// Whether a landmark model is attached.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Localize the pupil in `region`, reporting why when there is none.
    ///
    /// The model is never invoked for a region whose center lies outside
    /// the frame.
    pub fn try_localize(
        &self,
        region: &EyeRegion,
        frame: &GrayFrame,
    ) -> Result<PupilPosition, PupilMiss> {
        if !region.is_valid_for(frame.width, frame.height) {
            return Err(PupilMiss::RegionInvalid);
        }

        let model = self.model.as_ref().ok_or(PupilMiss::Unavailable)?;

        let raw = model
            .localize(
                region.row,
                region.col,
                region.size,
                self.config.perturbations,
                frame,
            )
            .map_err(|e| PupilMiss::Failed(e.to_string()))?;

        let (row, col) = match raw.as_slice() {
            &[row, col] => (row, col),
            _ => return Err(PupilMiss::Malformed(raw)),
        };

        if !row.is_finite() || !col.is_finite() {
            return Err(PupilMiss::NonFinite { row, col });
        }
        if !frame.contains(row, col) {
            return Err(PupilMiss::OutOfBounds { row, col });
        }

        Ok(PupilPosition::new(row, col))
    }

    /// Localize the pupil in `region`, logging and counting misses.
    pub fn localize(&self, region: &EyeRegion, frame: &GrayFrame) -> Option<PupilPosition> {
        match self.try_localize(region, frame) {
            Ok(pupil) => {
                metrics::record_pupil_outcome("found");
                Some(pupil)
            }
            Err(miss) => {
                match &miss {
                    PupilMiss::Failed(_) | PupilMiss::Malformed(_) => warn!(
                        pupil_miss = miss.as_str(),
                        eye = %region.side,
                        detail = %miss,
                        "Pupil localization rejected"
                    ),
                    _ => debug!(
                        pupil_miss = miss.as_str(),
                        eye = %region.side,
                        detail = %miss,
                        "No pupil found"
                    ),
                }
                metrics::record_pupil_outcome(miss.as_str());
                None
            }
        }
    }
}

impl std::fmt::Debug for PupilLocalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PupilLocalizer")
            .field("config", &self.config)
            .field("model", &self.model.as_ref().map(|m| m.name()))
            .finish()
    }
}
