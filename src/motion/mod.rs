//! # Motion analyses
//!
//! This module holds the statistical motion descriptors of the crate, all consuming the
//! trajectory tables defined in [`crate::trajectories`]:
//!
//! * [`msd`](crate::motion::msd) – THE CORE: the single-trajectory mean-squared-displacement engine, plus the
//!   per-probe ([`imsd`](crate::motion::ensemble::imsd)) and ensemble
//!   ([`emsd`](crate::motion::ensemble::emsd)) aggregators in
//!   [`ensemble`](crate::motion::ensemble).
//! * [`drift`](crate::motion::drift) – Ensemble drift estimation and subtraction.
//! * [`vanhove`](crate::motion::vanhove) – Van Hove self-correlation functions.
//! * [`entropy`](crate::motion::entropy) – Directional Shannon entropy measures.
//! * [`correlation`](crate::motion::correlation) – Pairwise direction / velocity correlations.
//! * [`proximity`](crate::motion::proximity) – Nearest-neighbor distances.
//! * [`filters`](crate::motion::filters) – Outlier classification and trajectory extent.
//!
//! ## Configuration
//!
//! The MSD pipeline is configured through [`MotionParams`], built with a validating
//! fluent builder:
//!
//! ```rust
//! use microrheo::MotionParams;
//!
//! let params = MotionParams::builder()
//!     .mpp(0.1)          // microns per pixel
//!     .fps(24.0)         // frames per second
//!     .max_lagtime(50)   // frame intervals out to which MSD is computed
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Units
//!
//! Input positions are pixels and input times are frames; outputs are microns (first
//! moments scaled by `mpp`, second moments by `mpp²`) and seconds (lags divided by
//! `fps`).
use crate::microrheo_errors::MicrorheoError;
use crate::constants::DEFAULT_MAX_LAGTIME;

pub mod correlation;
pub mod drift;
pub mod ensemble;
pub mod entropy;
pub mod filters;
pub mod msd;
pub mod proximity;
pub mod vanhove;

#[cfg(feature = "progress")]
pub(crate) mod progress_bar;

/// Configuration parameters shared by the MSD pipeline (`msd`, `imsd`, `emsd`).
///
/// Fields
/// -----------------
/// * `mpp` – microns per pixel: spatial calibration of the camera. First-moment output
///   columns are scaled by `mpp`, second-moment columns by `mpp²`.
/// * `fps` – frames per second: temporal calibration. Output lag times are
///   `lag / fps` seconds.
/// * `max_lagtime` – number of frame intervals out to which the MSD is computed. Values
///   larger than a trajectory's observation count are clamped per trajectory (a
///   usability affordance, not an error).
///
/// Defaults
/// -----------------
/// `mpp = 1.0`, `fps = 1.0`, `max_lagtime = 100` — i.e. raw pixel/frame units, the
/// original toolkit's conventions.
///
/// See also
/// -----------------
/// * [`msd`](crate::motion::msd::msd) – Single-trajectory engine consuming these parameters.
/// * [`imsd`](crate::motion::ensemble::imsd) / [`emsd`](crate::motion::ensemble::emsd) – Multi-probe aggregators.
#[derive(Debug, Clone)]
pub struct MotionParams {
    /// Microns per pixel.
    pub mpp: f64,
    /// Frames per second.
    pub fps: f64,
    /// Frame intervals out to which the MSD is computed.
    pub max_lagtime: usize,
}

impl MotionParams {
    /// Construct a new [`MotionParams`] with the default calibration.
    ///
    /// This is equivalent to calling [`MotionParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`MotionParamsBuilder`] to configure a custom calibration.
    pub fn builder() -> MotionParamsBuilder {
        MotionParamsBuilder::new()
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        MotionParams {
            mpp: 1.0,
            fps: 1.0,
            max_lagtime: DEFAULT_MAX_LAGTIME,
        }
    }
}

/// Builder for [`MotionParams`], with validation.
#[derive(Debug, Clone)]
pub struct MotionParamsBuilder {
    params: MotionParams,
}

impl Default for MotionParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: MotionParams::default(),
        }
    }

    pub fn mpp(mut self, v: f64) -> Self {
        self.params.mpp = v;
        self
    }

    pub fn fps(mut self, v: f64) -> Self {
        self.params.fps = v;
        self
    }

    pub fn max_lagtime(mut self, v: usize) -> Self {
        self.params.max_lagtime = v;
        self
    }

    /// Finalize the builder and produce a [`MotionParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `mpp` – finite and strictly positive.
    /// * `fps` – finite and strictly positive.
    /// * `max_lagtime ≥ 1`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(MotionParams)` if all values are valid.
    /// * `Err(MicrorheoError::InvalidParameter)` if any validation rule fails.
    pub fn build(self) -> Result<MotionParams, MicrorheoError> {
        let p = &self.params;

        if !(p.mpp.is_finite() && p.mpp > 0.0) {
            return Err(MicrorheoError::InvalidParameter(
                "mpp must be finite and > 0".into(),
            ));
        }
        if !(p.fps.is_finite() && p.fps > 0.0) {
            return Err(MicrorheoError::InvalidParameter(
                "fps must be finite and > 0".into(),
            ));
        }
        if p.max_lagtime < 1 {
            return Err(MicrorheoError::InvalidParameter(
                "max_lagtime must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}

#[cfg(test)]
mod test_motion_params {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = MotionParams::default();
        assert_eq!(p.mpp, 1.0);
        assert_eq!(p.fps, 1.0);
        assert_eq!(p.max_lagtime, 100);
    }

    #[test]
    fn test_builder_overrides() {
        let p = MotionParams::builder()
            .mpp(0.5)
            .fps(30.0)
            .max_lagtime(10)
            .build()
            .unwrap();
        assert_eq!(p.mpp, 0.5);
        assert_eq!(p.fps, 30.0);
        assert_eq!(p.max_lagtime, 10);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(MotionParams::builder().mpp(0.0).build().is_err());
        assert!(MotionParams::builder().fps(f64::NAN).build().is_err());
        assert!(MotionParams::builder().max_lagtime(0).build().is_err());
    }
}
