//! # Columnar Tracking-Batch Ingestion
//!
//! This module provides the [`PositionBatch`] type, which groups multiple position
//! detections into a compact columnar container. Such a batch can then be expanded into
//! concrete [`Observation`]s and stored in a [`TrajectorySet`].
//!
//! ## Overview
//! -----------------
//! A feature-linking pipeline typically delivers flat (probe, frame, x, y) records.
//! [`PositionBatch`] wraps such measurements into a structured form ready for ingestion
//! into the motion analyses.
//!
//! To actually turn batches into stored observations, use the trait
//! [`TrajectoryFile`](crate::trajectories::trajectory_file::TrajectoryFile):
//! - [`TrajectoryFile::new_from_vec`](crate::trajectories::trajectory_file::TrajectoryFile::new_from_vec) — build a new [`TrajectorySet`] from a batch.
//! - [`TrajectoryFile::add_from_vec`](crate::trajectories::trajectory_file::TrajectoryFile::add_from_vec) — append a batch into an existing [`TrajectorySet`].
//!
//! ## Invariants
//! -----------------
//! - `probe_id.len() == frame.len() == x.len() == y.len()`
//! - Positions are **pixels**, frames are non-negative integers.
//! - A batch may hold observations for multiple probes simultaneously
//!   (distinguished by `probe_id`); rows need no particular ordering.
//!
//! ## Construction Paths
//! -----------------
//! - [`PositionBatch::from_slices_borrowed`] — zero-copy when your pipeline already holds
//!   columnar buffers.
//! - [`PositionBatch::from_vecs_owned`] — take ownership of freshly built columns.
//!
//! ## See also
//! ------------
//! * [`TrajectoryFile::new_from_vec`](crate::trajectories::trajectory_file::TrajectoryFile::new_from_vec) – Public entry point for batch ingestion.
//! * [`csv_reader`](crate::trajectories::csv_reader) – File-based ingestion with the same row schema.
use std::borrow::Cow;

use crate::constants::{Frame, Pixel, ProbeId};
use crate::trajectories::{sort_by_frame, Observation, TrajectorySet};

/// Columnar batch of position observations (pixels / frames).
///
/// Each row `i` of the batch describes one detection: probe `probe_id[i]` seen at frame
/// `frame[i]`, position (`x[i]`, `y[i]`) in pixels.
///
/// Fields
/// -----------------
/// * `probe_id` — Probe identifiers. Length must match `frame`/`x`/`y`.
/// * `frame` — Frame numbers. Length must match `probe_id`/`x`/`y`.
/// * `x` — x positions (**pixels**).
/// * `y` — y positions (**pixels**).
///
/// See also
/// ------------
/// * [`PositionBatch::from_slices_borrowed`] – Borrow existing columns (zero-copy).
/// * [`PositionBatch::from_vecs_owned`] – Own freshly built columns.
#[derive(Debug, Clone)]
pub struct PositionBatch<'a> {
    pub probe_id: Cow<'a, [ProbeId]>,
    pub frame: Cow<'a, [Frame]>,
    pub x: Cow<'a, [Pixel]>,
    pub y: Cow<'a, [Pixel]>,
}

impl<'a> PositionBatch<'a> {
    /// Construct a batch by **borrowing** columnar slices.
    ///
    /// The returned batch holds `Cow::Borrowed` views of the provided slices, performing
    /// **no allocation**.
    ///
    /// Arguments
    /// -----------------
    /// * `probe_id` — Probe identifiers; length must match all other columns.
    /// * `frame` — Frame numbers (borrowed).
    /// * `x` — x positions in **pixels** (borrowed).
    /// * `y` — y positions in **pixels** (borrowed).
    ///
    /// Return
    /// ----------
    /// * A batch borrowing the provided slices (**zero-copy**).
    ///
    /// Panics
    /// ----------
    /// * Debug builds only: panics if the column lengths do not match.
    pub fn from_slices_borrowed(
        probe_id: &'a [ProbeId],
        frame: &'a [Frame],
        x: &'a [Pixel],
        y: &'a [Pixel],
    ) -> Self {
        debug_assert_eq!(probe_id.len(), frame.len(), "probe/frame length mismatch");
        debug_assert_eq!(probe_id.len(), x.len(), "probe/x length mismatch");
        debug_assert_eq!(probe_id.len(), y.len(), "probe/y length mismatch");

        Self {
            probe_id: Cow::Borrowed(probe_id),
            frame: Cow::Borrowed(frame),
            x: Cow::Borrowed(x),
            y: Cow::Borrowed(y),
        }
    }

    /// Construct a batch that **owns** its columns.
    ///
    /// Use this when the columns are built on the fly and no upstream buffer outlives the
    /// batch.
    ///
    /// Panics
    /// ----------
    /// * Panics if the column lengths do not match.
    pub fn from_vecs_owned(
        probe_id: Vec<ProbeId>,
        frame: Vec<Frame>,
        x: Vec<Pixel>,
        y: Vec<Pixel>,
    ) -> Self {
        assert_eq!(probe_id.len(), frame.len(), "probe/frame length mismatch");
        assert_eq!(probe_id.len(), x.len(), "probe/x length mismatch");
        assert_eq!(probe_id.len(), y.len(), "probe/y length mismatch");

        Self {
            probe_id: Cow::Owned(probe_id),
            frame: Cow::Owned(frame),
            x: Cow::Owned(x),
            y: Cow::Owned(y),
        }
    }

    /// Number of rows in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.probe_id.len()
    }

    /// Whether the batch holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.probe_id.is_empty()
    }
}

/// Expand a batch into per-probe [`Observation`]s stored in `traj_set`.
///
/// Every touched probe's position list is re-sorted by frame afterwards, so the
/// frame-ordered invariant of [`Positions`](crate::constants::Positions) holds even for
/// unordered batches. No deduplication is performed.
pub(crate) fn positions_from_batch(traj_set: &mut TrajectorySet, batch: &PositionBatch<'_>) {
    for (((&probe, &frame), &x), &y) in batch
        .probe_id
        .iter()
        .zip(batch.frame.iter())
        .zip(batch.x.iter())
        .zip(batch.y.iter())
    {
        traj_set
            .entry(probe)
            .or_default()
            .push(Observation::new(frame, x, y));
    }

    let mut touched: Vec<ProbeId> = batch.probe_id.to_vec();
    touched.sort_unstable();
    touched.dedup();
    for probe in touched {
        if let Some(positions) = traj_set.get_mut(&probe) {
            sort_by_frame(positions);
        }
    }
}

#[cfg(test)]
mod test_batch_reader {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_batch_expansion_groups_and_sorts() {
        let probe_id = vec![7_u32, 3, 7, 3];
        let frame = vec![2_u32, 0, 0, 1];
        let x = vec![2.0, 10.0, 0.0, 11.0];
        let y = vec![-2.0, 5.0, 0.0, 5.5];
        let batch = PositionBatch::from_slices_borrowed(&probe_id, &frame, &x, &y);
        assert_eq!(batch.len(), 4);

        let mut set: TrajectorySet = HashMap::default();
        positions_from_batch(&mut set, &batch);

        assert_eq!(set.len(), 2);
        let p7 = &set[&7];
        assert_eq!(p7.len(), 2);
        assert_eq!(p7[0], Observation::new(0, 0.0, 0.0));
        assert_eq!(p7[1], Observation::new(2, 2.0, -2.0));

        let p3 = &set[&3];
        let frames: Vec<_> = p3.iter().map(|o| o.frame).collect();
        assert_eq!(frames, vec![0, 1]);
    }
}
