//! # Constants and type definitions for microrheo
//!
//! This module centralizes the **unit conventions**, **shared defaults**, and **common type
//! definitions** used throughout the `microrheo` library. It also defines the container type
//! for storing one probe's position observations.
//!
//! ## Overview
//!
//! - Unit aliases (pixels ↔ microns, frames ↔ seconds)
//! - Core type aliases used across the crate
//! - Defaults shared by the motion analyses (maximum lag count, histogram bins, quantiles)
//!
//! These definitions are used by all main modules, including the MSD pipeline, drift
//! correction, and the van Hove / entropy analyses.

use crate::trajectories::Observation;
use smallvec::SmallVec;

// -------------------------------------------------------------------------------------------------
// Unit conventions
// -------------------------------------------------------------------------------------------------
//
// Input positions are in pixels and input times in frames; the motion analyses convert to
// microns (via the `mpp` scale factor) and seconds (via `fps`) on output.

/// Position in pixels (camera units)
pub type Pixel = f64;
/// Length in microns
pub type Micron = f64;
/// Squared length in microns²
pub type MicronSq = f64;
/// Time in seconds
pub type Seconds = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers and data containers
// -------------------------------------------------------------------------------------------------

/// Identifier of a tracked probe (bead / feature id assigned by the upstream linker)
pub type ProbeId = u32;

/// Video frame number. Unsigned by construction: frame numbers are never negative.
pub type Frame = u32;

/// A small, inline-optimized container for the position observations of a single probe,
/// kept ordered by frame by the ingestion paths.
pub type Positions = SmallVec<[Observation; 8]>;

// -------------------------------------------------------------------------------------------------
// Shared defaults
// -------------------------------------------------------------------------------------------------

/// Default number of frame intervals out to which the MSD is computed
pub const DEFAULT_MAX_LAGTIME: usize = 100;

/// Default number of equally-spaced histogram bins (van Hove, directional entropy)
pub const DEFAULT_BINS: usize = 24;

/// Default rolling-window length for windowed entropy, in observations
pub const DEFAULT_ENTROPY_WINDOW: usize = 24;

/// Default lag row compared by the outlier filter (1 second at 24 fps)
pub const DEFAULT_TYPICAL_ROW: usize = 23;

/// Default lower quantile of the outlier filter
pub const DEFAULT_LOWER_QUANTILE: f64 = 0.1;

/// Default upper quantile of the outlier filter
pub const DEFAULT_UPPER_QUANTILE: f64 = 0.9;
