//! # Outlier classification and trajectory extent
//!
//! Small per-probe filters used to clean a population before ensemble statistics:
//! [`is_typical`] flags probes whose MSD at a chosen lag sits inside the central
//! quantile band of the population, and [`diagonal_size`] measures the bounding-box
//! diagonal of a single trajectory (a cheap proxy for "did this bead actually move").
use crate::constants::{Positions, ProbeId};
use crate::microrheo_errors::MicrorheoError;
use crate::motion::ensemble::ImsdTable;

/// Nearest-rank quantile index on `[0, n-1]`; robust for small n.
#[inline]
fn q_index(n: usize, q: f64) -> usize {
    let pos = q * (n as f64 - 1.0);
    let idx = pos.round() as isize;
    idx.clamp(0, (n as isize) - 1) as usize
}

/// Examine individual probe MSDs, distinguishing outliers from those in the central
/// quantile band.
///
/// Arguments
/// ---------
/// * `msds`: per-probe MSD table like the output of [`imsd`](crate::motion::ensemble::imsd)
/// * `row`: compare MSDs at this lag row (the conventional default is row 23 — 1 second
///   at 24 fps; see [`DEFAULT_TYPICAL_ROW`](crate::constants::DEFAULT_TYPICAL_ROW))
/// * `lower`: probes with MSD up to this quantile are deemed outliers (default 0.1)
/// * `upper`: probes with MSD above this quantile are deemed outliers (default 0.9)
///
/// Return
/// ------
/// * One `(probe, typical)` pair per probe column, probe-ascending:
///   `true` = typical probe, `false` = outlier probe. Probes with a missing value at
///   the chosen row are never typical.
/// * `Err(MicrorheoError::RowOutOfRange)` if the table has no such row,
///   `Err(MicrorheoError::InvalidParameter)` if the quantiles are not in `[0, 1]`.
///
/// Quantiles use the nearest-rank convention over the finite values at the row;
/// comparisons are strict, as in `lower < value < upper`.
pub fn is_typical(
    msds: &ImsdTable,
    row: usize,
    lower: f64,
    upper: f64,
) -> Result<Vec<(ProbeId, bool)>, MicrorheoError> {
    if row >= msds.n_lags() {
        return Err(MicrorheoError::RowOutOfRange {
            row,
            rows: msds.n_lags(),
        });
    }
    if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) {
        return Err(MicrorheoError::InvalidParameter(
            "quantiles must lie in [0, 1]".into(),
        ));
    }

    let values: Vec<f64> = msds.values.row(row).iter().copied().collect();

    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        // No probe has data at this lag: nothing is typical.
        return Ok(msds.probes.iter().map(|&p| (p, false)).collect());
    }
    finite.sort_unstable_by(|a, b| a.partial_cmp(b).expect("finite values"));

    let a = finite[q_index(finite.len(), lower)];
    let b = finite[q_index(finite.len(), upper)];

    Ok(msds
        .probes
        .iter()
        .zip(values.iter())
        .map(|(&probe, &v)| (probe, v > a && v < b))
        .collect())
}

/// Measure the diagonal size of a trajectory.
///
/// Return
/// ------
/// * The length of the diagonal of the rectangular box containing the trajectory, in
///   the trajectory's own (pixel) units; `NaN` for an empty trajectory.
///
/// Example
/// -------
/// ```rust
/// # use microrheo::{diagonal_size, Positions, Observation};
/// let traj: Positions = [Observation::new(0, 0.0, 0.0), Observation::new(1, 3.0, 4.0)]
///     .into_iter()
///     .collect();
/// assert_eq!(diagonal_size(&traj), 5.0);
/// ```
pub fn diagonal_size(traj: &Positions) -> f64 {
    if traj.is_empty() {
        return f64::NAN;
    }
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for obs in traj {
        min_x = min_x.min(obs.x);
        max_x = max_x.max(obs.x);
        min_y = min_y.min(obs.y);
        max_y = max_y.max(obs.y);
    }
    let dx = max_x - min_x;
    let dy = max_y - min_y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod test_filters {
    use super::*;
    use crate::motion::ensemble::imsd;
    use crate::motion::msd::{positions_from_columns, Statistic};
    use crate::motion::MotionParams;
    use crate::trajectories::TrajectorySet;

    /// Probes moving with per-frame steps 1..=5 px: MSD at lag 1 is step².
    fn graded_set() -> TrajectorySet {
        let mut set = TrajectorySet::default();
        for step in 1..=5_u32 {
            let s = step as f64;
            set.insert(
                step,
                positions_from_columns(&[0, 1, 2], &[0.0, s, 2.0 * s], &[0.0; 3]),
            );
        }
        set
    }

    #[test]
    fn test_extremes_flagged() {
        let table = imsd(&graded_set(), &MotionParams::default(), Statistic::Msd).unwrap();
        let flags = is_typical(&table, 0, 0.1, 0.9).unwrap();
        let by_probe: std::collections::HashMap<_, _> = flags.into_iter().collect();
        // Slowest and fastest probes sit on the quantile bounds and are excluded.
        assert!(!by_probe[&1]);
        assert!(!by_probe[&5]);
        assert!(by_probe[&2] && by_probe[&3] && by_probe[&4]);
    }

    #[test]
    fn test_row_out_of_range() {
        let table = imsd(&graded_set(), &MotionParams::default(), Statistic::Msd).unwrap();
        assert!(matches!(
            is_typical(&table, 99, 0.1, 0.9),
            Err(MicrorheoError::RowOutOfRange { row: 99, .. })
        ));
    }

    #[test]
    fn test_diagonal_size() {
        let traj = positions_from_columns(&[0, 1, 2], &[0.0, 3.0, 1.0], &[0.0, 4.0, 2.0]);
        assert_eq!(diagonal_size(&traj), 5.0);
        assert!(diagonal_size(&Positions::new()).is_nan());
    }
}
