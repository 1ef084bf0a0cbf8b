//! # Building and extending trajectory sets
//!
//! Public trait exposing `new_from_*` and `add_from_*` helpers to construct or extend a
//! [`TrajectorySet`] from the supported sources, plus set-level observation statistics.
//!
//! Ingestion sources
//! -----------------
//! * **CSV tracking tables** (columns `probe`, `frame`, `x`, `y`):
//!   [`TrajectoryFile::new_from_csv`], [`TrajectoryFile::add_from_csv`], and the generic
//!   [`TrajectoryFile::new_from_reader`] / [`TrajectoryFile::add_from_reader`] for any
//!   `io::Read` source.
//! * **In-memory columnar batches**: [`TrajectoryFile::new_from_vec`],
//!   [`TrajectoryFile::add_from_vec`] using
//!   [`PositionBatch`](crate::trajectories::batch_reader::PositionBatch).
//!
//! Set statistics
//! -----------------
//! * [`TrajectoryFile::total_observations`] – total number of stored observations.
//! * [`TrajectoryFile::number_of_trajectories`] – number of distinct probes.
//! * [`TrajectoryFile::obs_count_stats`] – distribution of observation counts per probe.
//! * [`TrajectoryFile::frame_range`] – inclusive frame span over the whole set.
//!
//! Note
//! ----
//! * Warning: No check is done for duplicated observations by any `add_*` method.
//!   * The user should be careful not to add the same observation or the same file twice;
//!     the MSD engine fails fast when it meets two observations of one probe at one frame.
use std::fmt;
use std::fs::File;
use std::io::Read;

use camino::Utf8Path;

use crate::constants::{Frame, Positions};
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::batch_reader::{positions_from_batch, PositionBatch};
use crate::trajectories::csv_reader::csv_to_trajset;
use crate::trajectories::TrajectorySet;

/// Summary statistics for per-probe observation counts.
///
/// Each [`TrajectorySet`] entry (one probe) has an associated [`Positions`] container.
/// This structure stores basic distribution statistics on the **number of observations
/// per probe**, as returned by [`obs_count_stats`](TrajectoryFile::obs_count_stats).
///
/// Percentiles are computed using the *nearest-rank* method: the index is
/// `round(q × (N-1))` for quantile `q ∈ [0,1]`, clamped to the valid range. This
/// convention makes results stable even for small sample sizes.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – compact single-line summary, e.g.:
///   ```text
///   min=2, p25=4, median=8, p95=15, max=20
///   ```
///
/// * `format!("{:#}", stats)` – pretty multi-line table.
#[derive(Debug, Clone, Copy)]
pub struct ObsCountStats {
    pub min: usize,
    pub p25: usize,
    pub median: usize,
    pub p95: usize,
    pub max: usize,
}

impl fmt::Display for ObsCountStats {
    /// Compact by default; pretty multi-line when using the alternate flag (`{:#}`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Observation count per probe — summary")?;
            writeln!(f, "-------------------------------------")?;
            writeln!(f, "min    : {}", self.min)?;
            writeln!(f, "p25    : {}", self.p25)?;
            writeln!(f, "median : {}", self.median)?;
            writeln!(f, "p95    : {}", self.p95)?;
            write!(f, "max    : {}", self.max)
        } else {
            write!(
                f,
                "min={}, p25={}, median={}, p95={}, max={}",
                self.min, self.p25, self.median, self.p95, self.max
            )
        }
    }
}

pub trait TrajectoryFile {
    /// Create a [`TrajectorySet`] from a CSV tracking table on disk.
    ///
    /// Arguments
    /// ---------
    /// * `path`: path to a CSV file with header columns `probe`, `frame`, `x`, `y`
    ///
    /// Return
    /// ------
    /// * A new set containing every observation of the table, grouped by probe and
    ///   frame-sorted per probe.
    /// * `Err(MicrorheoError::MissingColumn)` when a required column is absent,
    ///   `Err(MicrorheoError::IoError)` / `Err(MicrorheoError::CsvError)` on I/O or
    ///   malformed rows.
    fn new_from_csv(path: &Utf8Path) -> Result<Self, MicrorheoError>
    where
        Self: Sized;

    /// Add the observations of a CSV tracking table to an existing set.
    ///
    /// Probes already present receive additional observations; their position lists are
    /// re-sorted by frame.
    fn add_from_csv(&mut self, path: &Utf8Path) -> Result<(), MicrorheoError>;

    /// Create a [`TrajectorySet`] from any CSV `Read` source (byte buffer, socket, ...).
    ///
    /// Same schema and error policy as [`new_from_csv`](TrajectoryFile::new_from_csv).
    fn new_from_reader<R: Read>(reader: R) -> Result<Self, MicrorheoError>
    where
        Self: Sized;

    /// Add the observations of a CSV `Read` source to an existing set.
    fn add_from_reader<R: Read>(&mut self, reader: R) -> Result<(), MicrorheoError>;

    /// Create a [`TrajectorySet`] from an in-memory columnar batch.
    ///
    /// Arguments
    /// ---------
    /// * `batch`: columnar (probe, frame, x, y) rows; see
    ///   [`PositionBatch`](crate::trajectories::batch_reader::PositionBatch)
    ///
    /// Return
    /// ------
    /// * A new set with one entry per distinct probe id in the batch.
    fn new_from_vec(batch: &PositionBatch<'_>) -> Self
    where
        Self: Sized;

    /// Add the observations of an in-memory columnar batch to an existing set.
    fn add_from_vec(&mut self, batch: &PositionBatch<'_>);

    /// Count the total number of [`Observation`](crate::trajectories::Observation)
    /// entries across all probes.
    fn total_observations(&self) -> usize;

    /// Return the number of distinct probes in the set.
    fn number_of_trajectories(&self) -> usize;

    /// Compute distribution statistics for the number of observations per probe.
    ///
    /// Return
    /// ----------
    /// * `None` if the set is empty.
    /// * `Some(ObsCountStats)` containing the summary statistics otherwise.
    fn obs_count_stats(&self) -> Option<ObsCountStats>;

    /// Inclusive (first, last) frame numbers seen anywhere in the set.
    ///
    /// Return
    /// ----------
    /// * `None` if the set holds no observations.
    fn frame_range(&self) -> Option<(Frame, Frame)>;
}

impl TrajectoryFile for TrajectorySet {
    fn new_from_csv(path: &Utf8Path) -> Result<Self, MicrorheoError> {
        let mut traj_set: TrajectorySet = TrajectorySet::default();
        let file = File::open(path.as_std_path())?;
        csv_to_trajset(file, &mut traj_set)?;
        Ok(traj_set)
    }

    fn add_from_csv(&mut self, path: &Utf8Path) -> Result<(), MicrorheoError> {
        let file = File::open(path.as_std_path())?;
        csv_to_trajset(file, self)
    }

    fn new_from_reader<R: Read>(reader: R) -> Result<Self, MicrorheoError> {
        let mut traj_set: TrajectorySet = TrajectorySet::default();
        csv_to_trajset(reader, &mut traj_set)?;
        Ok(traj_set)
    }

    fn add_from_reader<R: Read>(&mut self, reader: R) -> Result<(), MicrorheoError> {
        csv_to_trajset(reader, self)
    }

    fn new_from_vec(batch: &PositionBatch<'_>) -> Self {
        let mut traj_set: TrajectorySet = TrajectorySet::default();
        positions_from_batch(&mut traj_set, batch);
        traj_set
    }

    fn add_from_vec(&mut self, batch: &PositionBatch<'_>) {
        positions_from_batch(self, batch);
    }

    #[inline]
    fn total_observations(&self) -> usize {
        self.values().map(|obs: &Positions| obs.len()).sum()
    }

    #[inline]
    fn number_of_trajectories(&self) -> usize {
        self.len()
    }

    fn obs_count_stats(&self) -> Option<ObsCountStats> {
        let mut counts: Vec<usize> = self.values().map(|obs| obs.len()).collect();
        if counts.is_empty() {
            return None;
        }

        counts.sort_unstable();

        #[inline]
        fn q_index(n: usize, q: f64) -> usize {
            // Nearest-rank on [0, n-1] using linear index; robust for small n.
            let pos = q * (n as f64 - 1.0);
            let idx = pos.round() as isize;
            idx.clamp(0, (n as isize) - 1) as usize
        }

        let n = counts.len();
        Some(ObsCountStats {
            min: counts[0],
            p25: counts[q_index(n, 0.25)],
            median: counts[q_index(n, 0.50)],
            p95: counts[q_index(n, 0.95)],
            max: counts[n - 1],
        })
    }

    fn frame_range(&self) -> Option<(Frame, Frame)> {
        let mut range: Option<(Frame, Frame)> = None;
        for obs in self.values().flat_map(|positions| positions.iter()) {
            range = Some(match range {
                None => (obs.frame, obs.frame),
                Some((lo, hi)) => (lo.min(obs.frame), hi.max(obs.frame)),
            });
        }
        range
    }
}

#[cfg(test)]
mod test_trajectory_file {
    use super::*;

    fn sample_set() -> TrajectorySet {
        let probe_id = vec![1_u32, 1, 1, 2, 2, 3];
        let frame = vec![0_u32, 1, 2, 4, 5, 9];
        let x = vec![0.0; 6];
        let y = vec![0.0; 6];
        TrajectorySet::new_from_vec(&PositionBatch::from_slices_borrowed(
            &probe_id, &frame, &x, &y,
        ))
    }

    #[test]
    fn test_set_metrics() {
        let set = sample_set();
        assert_eq!(set.number_of_trajectories(), 3);
        assert_eq!(set.total_observations(), 6);
        assert_eq!(set.frame_range(), Some((0, 9)));

        let stats = set.obs_count_stats().unwrap();
        assert_eq!(stats.min, 1);
        assert_eq!(stats.median, 2);
        assert_eq!(stats.max, 3);
    }

    #[test]
    fn test_empty_set_stats() {
        let set = TrajectorySet::default();
        assert!(set.obs_count_stats().is_none());
        assert!(set.frame_range().is_none());
    }

    #[test]
    fn test_stats_display() {
        let set = sample_set();
        let stats = set.obs_count_stats().unwrap();
        assert_eq!(format!("{stats}"), "min=1, p25=2, median=2, p95=3, max=3");
    }
}
