//! # Per-Probe and Ensemble MSD Aggregators
//!
//! Multi-probe layers over the single-trajectory engine in
//! [`msd`](crate::motion::msd):
//!
//! * [`imsd`] – runs the engine per probe and reshapes the chosen statistic into a
//!   **lag × probe matrix** ([`ImsdTable`]), probes as columns in ascending id order.
//! * [`emsd`] / [`emsd_detail`] – runs the engine per probe *with* sample-count detail
//!   and combines the per-probe curves into one ensemble curve by an **N-weighted
//!   average** per lag: `value(τ) = Σ_p value_p(τ)·N_p(τ) / Σ_p N_p(τ)`. Probes with
//!   fewer independent samples at a lag (gappy probes, probes that end early) are
//!   downweighted accordingly; a probe with no data at a lag contributes zero weight
//!   there — excluded, never treated as a zero MSD.
//!
//! Per-probe processing is independent (no cross-probe data dependency) and runs
//! sequentially; with the `progress` cargo feature, the loop renders a live progress
//! bar for large bead populations.
use nalgebra::DMatrix;

use crate::constants::{ProbeId, Seconds};
use crate::microrheo_errors::MicrorheoError;
use crate::motion::msd::{msd, MsdPoint, MsdTable, Statistic};
use crate::motion::MotionParams;
use crate::trajectories::TrajectorySet;

#[cfg(feature = "progress")]
use std::time::Duration;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(feature = "progress")]
use super::progress_bar::{fmt_dur, IterTimer};

/// Per-probe MSD statistics, probes as columns.
///
/// Fields
/// -----------------
/// * `lag_times` – row index: lag times in seconds, lags `1..=n_lags`.
/// * `probes` – column index: probe ids in ascending order.
/// * `values` – `n_lags × n_probes` matrix of the chosen statistic. Rows beyond a
///   probe's own lag range hold `NaN` (shorter trajectories produce fewer populated
///   rows; nothing is extrapolated).
#[derive(Debug, Clone, PartialEq)]
pub struct ImsdTable {
    pub lag_times: Vec<Seconds>,
    pub probes: Vec<ProbeId>,
    pub values: DMatrix<f64>,
}

impl ImsdTable {
    /// Number of lag rows.
    #[inline]
    pub fn n_lags(&self) -> usize {
        self.lag_times.len()
    }

    /// Number of probe columns.
    #[inline]
    pub fn n_probes(&self) -> usize {
        self.probes.len()
    }

    /// Extract one probe's column, in lag order.
    ///
    /// Return
    /// ------
    /// * `None` if the probe is not part of the table.
    pub fn column(&self, probe: ProbeId) -> Option<Vec<f64>> {
        let col = self.probes.iter().position(|&p| p == probe)?;
        Some(self.values.column(col).iter().copied().collect())
    }
}

/// One ensemble-averaged statistic indexed by lag time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MsdSeries {
    pub lag_times: Vec<Seconds>,
    pub values: Vec<f64>,
}

impl MsdSeries {
    /// Number of lag rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (lag time, value) pairs in lag order.
    pub fn iter(&self) -> impl Iterator<Item = (Seconds, f64)> + '_ {
        self.lag_times.iter().copied().zip(self.values.iter().copied())
    }
}

/// Probe ids of the set in ascending order (the group-by key order).
fn sorted_probes(traj_set: &TrajectorySet) -> Vec<ProbeId> {
    let mut probes: Vec<ProbeId> = traj_set.keys().copied().collect();
    probes.sort_unstable();
    probes
}

#[cfg(not(feature = "progress"))]
fn msd_per_probe(
    traj_set: &TrajectorySet,
    probes: &[ProbeId],
    params: &MotionParams,
    detail: bool,
) -> Result<Vec<MsdTable>, MicrorheoError> {
    probes
        .iter()
        .map(|probe| msd(&traj_set[probe], params, detail))
        .collect()
}

#[cfg(feature = "progress")]
fn msd_per_probe(
    traj_set: &TrajectorySet,
    probes: &[ProbeId],
    params: &MotionParams,
    detail: bool,
) -> Result<Vec<MsdTable>, MicrorheoError> {
    let pb = ProgressBar::new(probes.len().max(1) as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) \
             | {per_sec} | ETA {eta_precise} | {msg}",
        )
        .expect("indicatif template"),
    );
    pb.enable_steady_tick(Duration::from_millis(200));

    let mut tables = Vec::with_capacity(probes.len());
    let mut it_timer = IterTimer::new(0.2);

    for probe in probes {
        let last = it_timer.tick();
        let avg = it_timer.avg();
        pb.set_message(format!("last: {}, avg: {}", fmt_dur(last), fmt_dur(avg)));

        tables.push(msd(&traj_set[probe], params, detail)?);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(tables)
}

/// Compute the mean squared displacements of probes individually.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `params`: spatial/temporal calibration and maximum lag count
/// * `statistic`: which engine column to extract; [`Statistic::Msd`] is the
///   conventional choice (and the enum's default)
///
/// Return
/// ------
/// * An [`ImsdTable`] with one column per probe and one row per lag time in seconds.
///   Each probe's column equals the same statistic from calling
///   [`msd`](crate::motion::msd::msd) on that probe alone.
/// * `Err(MicrorheoError::EmptyTrajectorySet)` for an empty set;
///   `Err(MicrorheoError::DuplicateFrame)` if any probe violates the one-observation
///   per frame invariant.
///
/// Notes
/// -----
/// * Input units are pixels and frames. Output units are microns and seconds.
pub fn imsd(
    traj_set: &TrajectorySet,
    params: &MotionParams,
    statistic: Statistic,
) -> Result<ImsdTable, MicrorheoError> {
    if traj_set.is_empty() {
        return Err(MicrorheoError::EmptyTrajectorySet);
    }

    let probes = sorted_probes(traj_set);
    let tables = msd_per_probe(traj_set, &probes, params, false)?;

    // The engine's lag index depends only on the lag count, so the per-probe tables
    // share row structure and reshape directly: probes become columns.
    let n_rows = tables.iter().map(MsdTable::len).max().unwrap_or(0);
    let mut values = DMatrix::from_element(n_rows, probes.len(), f64::NAN);
    for (col, table) in tables.iter().enumerate() {
        for (row, point) in table.iter().enumerate() {
            values[(row, col)] = statistic.of(point);
        }
    }

    let lag_times = (1..=n_rows).map(|lag| lag as f64 / params.fps).collect();
    Ok(ImsdTable {
        lag_times,
        probes,
        values,
    })
}

/// Accumulator for the N-weighted combination of one lag row.
#[derive(Debug, Clone, Copy, Default)]
struct RowAccumulator {
    mean_x: f64,
    mean_y: f64,
    mean_x2: f64,
    mean_y2: f64,
    msd: f64,
    n: f64,
    weight: f64,
}

/// N-weighted ensemble combination of the per-probe MSD tables.
fn ensemble_table(
    traj_set: &TrajectorySet,
    params: &MotionParams,
) -> Result<MsdTable, MicrorheoError> {
    if traj_set.is_empty() {
        return Err(MicrorheoError::EmptyTrajectorySet);
    }

    let probes = sorted_probes(traj_set);
    let tables = msd_per_probe(traj_set, &probes, params, true)?;
    let n_rows = tables.iter().map(MsdTable::len).max().unwrap_or(0);

    // Explicit accumulation of value·weight and weight per lag key: every statistic
    // column receives the same fold, N included.
    let mut acc = vec![RowAccumulator::default(); n_rows];
    for table in &tables {
        for (row, point) in table.iter().enumerate() {
            let w = point.n.unwrap_or(0.0);
            if w <= 0.0 {
                // No independent samples at this lag: zero weight, excluded.
                continue;
            }
            let a = &mut acc[row];
            a.mean_x += point.mean_x * w;
            a.mean_y += point.mean_y * w;
            a.mean_x2 += point.mean_x2 * w;
            a.mean_y2 += point.mean_y2 * w;
            a.msd += point.msd * w;
            a.n += w * w;
            a.weight += w;
        }
    }

    let points = acc
        .iter()
        .enumerate()
        .map(|(row, a)| {
            let lagt = (row + 1) as f64 / params.fps;
            if a.weight > 0.0 {
                MsdPoint {
                    lagt,
                    mean_x: a.mean_x / a.weight,
                    mean_y: a.mean_y / a.weight,
                    mean_x2: a.mean_x2 / a.weight,
                    mean_y2: a.mean_y2 / a.weight,
                    msd: a.msd / a.weight,
                    n: Some(a.n / a.weight),
                }
            } else {
                MsdPoint {
                    lagt,
                    mean_x: f64::NAN,
                    mean_y: f64::NAN,
                    mean_x2: f64::NAN,
                    mean_y2: f64::NAN,
                    msd: f64::NAN,
                    n: Some(0.0),
                }
            }
        })
        .collect();

    Ok(MsdTable { points })
}

/// Compute the ensemble mean squared displacement of many probes.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `params`: spatial/temporal calibration and maximum lag count
///
/// Return
/// ------
/// * An [`MsdSeries`] holding the combined `msd` column, indexed by lag time in
///   seconds. See [`emsd_detail`] for the full statistic table.
/// * `Err(MicrorheoError::EmptyTrajectorySet)` for an empty set.
///
/// Notes
/// -----
/// * Input units are pixels and frames. Output units are microns and seconds.
///
/// See also
/// --------
/// * [`emsd_detail`] – Same combination, all statistic columns.
pub fn emsd(traj_set: &TrajectorySet, params: &MotionParams) -> Result<MsdSeries, MicrorheoError> {
    let table = ensemble_table(traj_set, params)?;
    Ok(MsdSeries {
        lag_times: table.lag_times(),
        values: table.statistic(Statistic::Msd),
    })
}

/// Compute the full ensemble MSD table (`<x>`, `<y>`, `<x^2>`, `<y^2>`, `msd`, `N`).
///
/// The statistically correct combination of per-probe noisy MSD curves: every column is
/// the N-weighted average of the per-probe columns at each lag, so probes with fewer
/// independent samples at a lag weigh correspondingly less.
///
/// See also
/// --------
/// * [`emsd`] – Just the combined `msd` column.
pub fn emsd_detail(
    traj_set: &TrajectorySet,
    params: &MotionParams,
) -> Result<MsdTable, MicrorheoError> {
    ensemble_table(traj_set, params)
}
