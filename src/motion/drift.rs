//! # Ensemble drift estimation and subtraction
//!
//! Beads embedded in a medium share any bulk motion of the sample (stage creep, flow).
//! [`compute_drift`] estimates that common motion as the cumulative sum of the
//! per-frame mean single-step displacement across probes; [`subtract_drift`] removes it
//! from every trajectory, leaving the thermal motion of interest.
//!
//! Only displacements between **consecutive** frames enter the estimate: a step across
//! a detection gap spans several frames of drift and would bias the per-frame mean, so
//! it is excluded.
use std::collections::BTreeMap;

use crate::constants::{Frame, Pixel};
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::{sort_by_frame, TrajectorySet};

/// Cumulative ensemble drift x(t), y(t), indexed by frame.
///
/// Frames with no consecutive-frame displacement anywhere in the set are absent;
/// [`subtract_drift`] treats absent frames as zero drift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriftTable {
    pub frames: Vec<Frame>,
    pub x: Vec<Pixel>,
    pub y: Vec<Pixel>,
}

impl DriftTable {
    /// Number of frames carrying a drift value.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the table holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Trailing rolling mean over up to `window` values, partial windows allowed.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Return the ensemble drift, x(t).
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `smoothing`: smooth the per-frame mean displacement with a trailing rolling mean
///   over this many frames before accumulating; `0` disables smoothing
///
/// Return
/// ------
/// * A [`DriftTable`] of cumulative drift per frame. Probe-by-probe, the difference
///   between consecutive frames is taken; only deltas between frames exactly one apart
///   are kept; deltas are averaged per frame across probes, optionally smoothed, then
///   cumulatively summed.
/// * `Err(MicrorheoError::EmptyTrajectorySet)` for an empty set.
///
/// Example
/// -------
/// ```rust,no_run
/// # use microrheo::{TrajectorySet, compute_drift, subtract_drift};
/// # fn demo(traj_set: &TrajectorySet) -> Result<(), microrheo::MicrorheoError> {
/// let drift = compute_drift(traj_set, 15)?; // try various smoothing values
/// let corrected = subtract_drift(traj_set, Some(&drift))?;
/// # Ok(()) }
/// ```
pub fn compute_drift(
    traj_set: &TrajectorySet,
    smoothing: usize,
) -> Result<DriftTable, MicrorheoError> {
    if traj_set.is_empty() {
        return Err(MicrorheoError::EmptyTrajectorySet);
    }

    // Probe by probe, accumulate single-step deltas keyed by the later frame.
    let mut deltas: BTreeMap<Frame, (f64, f64, usize)> = BTreeMap::new();
    for positions in traj_set.values() {
        let mut ordered = positions.clone();
        sort_by_frame(&mut ordered);
        for pair in ordered.windows(2) {
            if pair[1].frame == pair[0].frame + 1 {
                let entry = deltas.entry(pair[1].frame).or_insert((0.0, 0.0, 0));
                entry.0 += pair[1].x - pair[0].x;
                entry.1 += pair[1].y - pair[0].y;
                entry.2 += 1;
            }
        }
    }

    let frames: Vec<Frame> = deltas.keys().copied().collect();
    let mut dx: Vec<f64> = deltas
        .values()
        .map(|&(sum, _, count)| sum / count as f64)
        .collect();
    let mut dy: Vec<f64> = deltas
        .values()
        .map(|&(_, sum, count)| sum / count as f64)
        .collect();

    if smoothing > 0 {
        dx = rolling_mean(&dx, smoothing);
        dy = rolling_mean(&dy, smoothing);
    }

    for i in 1..dx.len() {
        dx[i] += dx[i - 1];
        dy[i] += dy[i - 1];
    }

    Ok(DriftTable {
        frames,
        x: dx,
        y: dy,
    })
}

/// Return a copy of the probe trajectories with the overall drift subtracted out.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `drift`: optional drift table like the output of [`compute_drift`]. If no drift is
///   passed, drift is computed from `traj_set` (unsmoothed).
///
/// Return
/// ------
/// * A corrected copy of the set; frames absent from the drift table subtract zero.
pub fn subtract_drift(
    traj_set: &TrajectorySet,
    drift: Option<&DriftTable>,
) -> Result<TrajectorySet, MicrorheoError> {
    let computed;
    let drift = match drift {
        Some(table) => table,
        None => {
            computed = compute_drift(traj_set, 0)?;
            &computed
        }
    };

    let lookup: BTreeMap<Frame, (f64, f64)> = drift
        .frames
        .iter()
        .zip(drift.x.iter().zip(drift.y.iter()))
        .map(|(&frame, (&x, &y))| (frame, (x, y)))
        .collect();

    let mut corrected = traj_set.clone();
    for positions in corrected.values_mut() {
        for obs in positions.iter_mut() {
            if let Some(&(dx, dy)) = lookup.get(&obs.frame) {
                obs.x -= dx;
                obs.y -= dy;
            }
        }
    }
    Ok(corrected)
}

#[cfg(test)]
mod test_drift {
    use super::*;
    use crate::motion::msd::positions_from_columns;
    use approx::assert_relative_eq;

    fn drifting_set() -> TrajectorySet {
        // Both probes carry a common +0.5 px/frame drift in x.
        let mut set = TrajectorySet::default();
        set.insert(
            1,
            positions_from_columns(&[0, 1, 2, 3], &[0.0, 0.5, 1.0, 1.5], &[0.0; 4]),
        );
        set.insert(
            2,
            positions_from_columns(&[0, 1, 2, 3], &[10.0, 10.5, 11.0, 11.5], &[5.0; 4]),
        );
        set
    }

    #[test]
    fn test_linear_drift_recovered() {
        let drift = compute_drift(&drifting_set(), 0).unwrap();
        assert_eq!(drift.frames, vec![1, 2, 3]);
        for (i, &x) in drift.x.iter().enumerate() {
            assert_relative_eq!(x, 0.5 * (i + 1) as f64);
        }
        assert!(drift.y.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_subtract_drift_restores_stationary() {
        let set = drifting_set();
        let corrected = subtract_drift(&set, None).unwrap();
        for positions in corrected.values() {
            let x0 = positions[0].x;
            for obs in positions.iter() {
                assert_relative_eq!(obs.x, x0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gap_deltas_excluded() {
        let mut set = TrajectorySet::default();
        // Frames 0,1,3,4: the 1→3 step spans a gap and must not enter the estimate.
        set.insert(
            1,
            positions_from_columns(&[0, 1, 3, 4], &[0.0, 1.0, 100.0, 101.0], &[0.0; 4]),
        );
        let drift = compute_drift(&set, 0).unwrap();
        assert_eq!(drift.frames, vec![1, 4]);
        assert_relative_eq!(drift.x[0], 1.0);
        // Cumulative: 1.0 then 1.0 + 1.0, the 99-px jump never appears.
        assert_relative_eq!(drift.x[1], 2.0);
    }

    #[test]
    fn test_smoothing_uses_partial_windows() {
        let mut set = TrajectorySet::default();
        set.insert(
            1,
            positions_from_columns(&[0, 1, 2], &[0.0, 1.0, 1.0], &[0.0; 3]),
        );
        // Raw per-frame deltas: [1.0, 0.0]; trailing mean over 2 with partial first
        // window: [1.0, 0.5]; cumulative: [1.0, 1.5].
        let drift = compute_drift(&set, 2).unwrap();
        assert_relative_eq!(drift.x[0], 1.0);
        assert_relative_eq!(drift.x[1], 1.5);
    }

    #[test]
    fn test_empty_set_fails_fast() {
        assert!(matches!(
            compute_drift(&TrajectorySet::default(), 0),
            Err(MicrorheoError::EmptyTrajectorySet)
        ));
    }
}
