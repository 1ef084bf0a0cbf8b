//! # Trajectories: ingestion, storage, and set-level statistics
//!
//! High-level facilities to **ingest** and **store** particle-tracking observations grouped
//! by probe. The central type is [`TrajectorySet`], a fast hash map that buckets
//! frame-ordered position observations per probe id. Public helpers let you build a set
//! from a CSV tracking table or from in-memory batches, and query basic set-level metrics.
//!
//! Modules
//! -----------------
//! * [`batch_reader`](crate::trajectories::batch_reader) – Zero-copy container and routines to expand columnar
//!   (probe, frame, x, y) batches into concrete [`Observation`]s.
//! * [`csv_reader`](crate::trajectories::csv_reader) – CSV tracking-table reader (columns `probe`, `frame`, `x`, `y`).
//! * [`trajectory_file`](crate::trajectories::trajectory_file) – **Public** trait exposing `new_from_*` and `add_from_*`
//!   helpers to construct/extend a [`TrajectorySet`], plus observation-count statistics.
//! * [`synthetic`](crate::trajectories::synthetic) – Seeded Gaussian random walks, used by tests and benches.
//!
//! Data Model
//! -----------------
//! * **Key:** [`ProbeId`](crate::constants::ProbeId) (identifier assigned by the upstream trajectory linker).
//! * **Value:** [`Positions`](crate::constants::Positions) = `SmallVec<Observation>` frame-ordered per probe.
//! * **Set:** [`TrajectorySet`] = `HashMap<ProbeId, Positions, ahash::RandomState>`
//!   for fast hashing and predictable performance on large bead populations.
//!
//! Units & Conventions
//! -----------------
//! * Positions are **pixels**; frame numbers are non-negative integers.
//! * Frames for a given probe need not be contiguous: a gap is a missed detection, and the
//!   analyses in [`crate::motion`] treat gaps as explicitly missing, never as zero.
//! * At most one observation per (probe, frame). The `add_*` methods perform **no
//!   deduplication**; the MSD engine fails fast if the invariant is violated.
//!
//! See also
//! ------------
//! * [`trajectory_file::TrajectoryFile`] – Public ingestion API.
//! * [`crate::motion`] – The analyses consuming a [`TrajectorySet`].
use std::collections::HashMap;

use ahash::RandomState;

use crate::constants::{Frame, Pixel, Positions, ProbeId};

pub mod batch_reader;
pub mod csv_reader;
pub mod synthetic;
pub mod trajectory_file;

/// A single position observation: one probe seen at one frame.
///
/// # Fields
///
/// * `frame` - The video frame number of the detection
/// * `x` - The x position in pixels
/// * `y` - The y position in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub frame: Frame,
    pub x: Pixel,
    pub y: Pixel,
}

impl Observation {
    /// Create a new observation
    ///
    /// Arguments
    /// ---------
    /// * `frame`: the video frame number
    /// * `x`: the x position in pixels
    /// * `y`: the y position in pixels
    ///
    /// Return
    /// ------
    /// * a new Observation struct
    pub fn new(frame: Frame, x: Pixel, y: Pixel) -> Self {
        Observation { frame, x, y }
    }
}

/// A full set of trajectories for multiple probes.
///
/// The key is the [`ProbeId`] (identifier of a tracked probe).
/// The value is the frame-ordered list of [`Observation`]s associated with this probe.
///
/// Uses [`ahash`](https://docs.rs/ahash) for fast hashing.
pub type TrajectorySet = HashMap<ProbeId, Positions, RandomState>;

/// Sort a probe's observations in place by frame number.
///
/// Ingestion paths call this once per touched probe so that the
/// frame-ordered invariant of [`Positions`] holds after every `add_*`.
pub(crate) fn sort_by_frame(positions: &mut Positions) {
    positions.sort_unstable_by_key(|obs| obs.frame);
}
