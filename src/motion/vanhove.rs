//! # Van Hove self-correlation
//!
//! The van Hove correlation function G(Δx, τ) is the probability density of a probe
//! displacing by Δx over a lag of τ frames, along one coordinate axis. Its shape
//! distinguishes Gaussian diffusion from heterogeneous or hopping dynamics.
//!
//! The input is an [`AxisTable`]: one coordinate axis of the whole set, reshaped to a
//! dense frame × probe matrix with `NaN` in detection gaps (built by [`axis_table`]).
//! Bin edges are chosen **once** from the pooled displacements of all probes, then each
//! probe is histogrammed as a probability density against those shared edges, so the
//! per-probe curves are directly comparable.
use nalgebra::DMatrix;

use crate::constants::{Frame, ProbeId};
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::TrajectorySet;

/// Coordinate axis selector for [`axis_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One coordinate axis of a trajectory set as a dense frame × probe matrix.
///
/// Fields
/// -----------------
/// * `start_frame` – frame number of row 0; rows cover the set's full inclusive frame
///   range with `NaN` marking missed detections.
/// * `probes` – column index: probe ids in ascending order.
/// * `values` – positions in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTable {
    pub start_frame: Frame,
    pub probes: Vec<ProbeId>,
    pub values: DMatrix<f64>,
}

impl AxisTable {
    /// Number of dense frame rows (gaps included).
    #[inline]
    pub fn span(&self) -> usize {
        self.values.nrows()
    }
}

/// Reshape one coordinate axis of the set into a dense frame × probe matrix.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `axis`: which coordinate to extract
///
/// Return
/// ------
/// * An [`AxisTable`] over the set's full inclusive frame range.
/// * `Err(MicrorheoError::EmptyTrajectorySet)` for an empty or observation-free set;
///   `Err(MicrorheoError::DuplicateFrame)` if a probe holds two observations at one
///   frame.
pub fn axis_table(traj_set: &TrajectorySet, axis: Axis) -> Result<AxisTable, MicrorheoError> {
    let mut probes: Vec<ProbeId> = traj_set.keys().copied().collect();
    probes.sort_unstable();

    let all_frames = traj_set.values().flat_map(|positions| positions.iter());
    let (first, last) = match all_frames.map(|obs| obs.frame).fold(None, |acc: Option<(Frame, Frame)>, f| {
        Some(match acc {
            None => (f, f),
            Some((lo, hi)) => (lo.min(f), hi.max(f)),
        })
    }) {
        Some(range) => range,
        None => return Err(MicrorheoError::EmptyTrajectorySet),
    };

    let span = (last - first) as usize + 1;
    let mut values = DMatrix::from_element(span, probes.len(), f64::NAN);
    for (col, probe) in probes.iter().enumerate() {
        for obs in &traj_set[probe] {
            let row = (obs.frame - first) as usize;
            if !values[(row, col)].is_nan() {
                return Err(MicrorheoError::DuplicateFrame(obs.frame));
            }
            values[(row, col)] = match axis {
                Axis::X => obs.x,
                Axis::Y => obs.y,
            };
        }
    }

    Ok(AxisTable {
        start_frame: first,
        probes,
        values,
    })
}

/// Per-probe van Hove correlation functions sharing one set of bins.
///
/// Fields
/// -----------------
/// * `displacement` – row index: left bin edges, in the input's length unit scaled by
///   `mpp`.
/// * `probes` – column index: probe ids in ascending order.
/// * `density` – probability densities; a probe with no finite displacement at the lag
///   holds `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct VanHoveTable {
    pub displacement: Vec<f64>,
    pub probes: Vec<ProbeId>,
    pub density: DMatrix<f64>,
}

/// Ensemble van Hove correlation function.
#[derive(Debug, Clone, PartialEq)]
pub struct VanHoveSeries {
    pub displacement: Vec<f64>,
    pub density: Vec<f64>,
}

/// Shared bin layout: `bins` equal-width bins spanning the pooled finite values.
fn bin_layout(pooled: &[f64], bins: usize) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in pooled {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo == hi {
        // Degenerate single-valued data: give the histogram a unit range.
        lo -= 0.5;
        hi += 0.5;
    }
    (lo, (hi - lo) / bins as f64)
}

/// Compute the van Hove correlation function of every probe at a given lag.
///
/// Arguments
/// ---------
/// * `pos`: one coordinate axis of the set, from [`axis_table`]
/// * `lagtime`: frame span of the displacements, ≥ 1
/// * `mpp`: microns per pixel; pass 1.0 to stay in pixels, which is usually fine for
///   this analysis
/// * `bins`: number of equally spaced bins shared by all probes
///
/// Return
/// ------
/// * A [`VanHoveTable`] of per-probe probability densities indexed by left bin edge.
/// * `Err(MicrorheoError::LagBeyondData)` when no displacement fits in the frame span,
///   `Err(MicrorheoError::NoFiniteDisplacements)` when gaps leave nothing to histogram,
///   `Err(MicrorheoError::InvalidParameter)` for a zero `lagtime` or `bins`.
pub fn vanhove(
    pos: &AxisTable,
    lagtime: usize,
    mpp: f64,
    bins: usize,
) -> Result<VanHoveTable, MicrorheoError> {
    if lagtime == 0 {
        return Err(MicrorheoError::InvalidParameter("lagtime must be >= 1".into()));
    }
    if bins == 0 {
        return Err(MicrorheoError::InvalidParameter("bins must be >= 1".into()));
    }
    let span = pos.span();
    if lagtime >= span {
        return Err(MicrorheoError::LagBeyondData {
            lagtime,
            span: span.saturating_sub(1),
        });
    }

    // Displacements over the lag, per probe column; NaN wherever either endpoint is
    // a missed detection.
    let n_probes = pos.probes.len();
    let n_rows = span - lagtime;
    let mut disp = DMatrix::from_element(n_rows, n_probes, f64::NAN);
    for col in 0..n_probes {
        for row in 0..n_rows {
            disp[(row, col)] = mpp * (pos.values[(row + lagtime, col)] - pos.values[(row, col)]);
        }
    }

    // Let the pooled data of all probes choose the bins, then histogram each probe
    // by itself against them.
    let pooled: Vec<f64> = disp.iter().copied().filter(|v| v.is_finite()).collect();
    if pooled.is_empty() {
        return Err(MicrorheoError::NoFiniteDisplacements);
    }
    let (lo, width) = bin_layout(&pooled, bins);

    let mut density = DMatrix::from_element(bins, n_probes, f64::NAN);
    for col in 0..n_probes {
        let mut counts = vec![0_usize; bins];
        let mut total = 0_usize;
        for row in 0..n_rows {
            let v = disp[(row, col)];
            if !v.is_finite() {
                continue;
            }
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
            total += 1;
        }
        if total > 0 {
            for (idx, &count) in counts.iter().enumerate() {
                density[(idx, col)] = count as f64 / (total as f64 * width);
            }
        }
    }

    let displacement = (0..bins).map(|i| lo + i as f64 * width).collect();
    Ok(VanHoveTable {
        displacement,
        probes: pos.probes.clone(),
        density,
    })
}

/// Compute the van Hove correlation function of the whole ensemble at a given lag.
///
/// Averages the per-probe densities of [`vanhove`] across probes (probes without data
/// at the lag contribute nothing to the sum but stay in the denominator, matching the
/// per-probe normalization convention).
pub fn vanhove_ensemble(
    pos: &AxisTable,
    lagtime: usize,
    mpp: f64,
    bins: usize,
) -> Result<VanHoveSeries, MicrorheoError> {
    let table = vanhove(pos, lagtime, mpp, bins)?;
    let n_probes = table.probes.len() as f64;
    let density = (0..table.density.nrows())
        .map(|row| {
            table
                .density
                .row(row)
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .sum::<f64>()
                / n_probes
        })
        .collect();
    Ok(VanHoveSeries {
        displacement: table.displacement,
        density,
    })
}
