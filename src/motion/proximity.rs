//! # Nearest-neighbor proximity
//!
//! Distance from each detected feature to its nearest neighbor within one frame. Used
//! to filter probes whose analysis would be contaminated by close encounters (overlap
//! of diffraction patterns, linker mixups).
//!
//! The search is an exact pairwise scan: O(n²) in the number of features per frame,
//! which is cheap at typical per-frame feature counts and needs no spatial index.
use itertools::Itertools;

use crate::constants::{Frame, Pixel, ProbeId};
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::TrajectorySet;

/// Find the distance to each point's nearest neighbor.
///
/// Arguments
/// ---------
/// * `points`: (x, y) positions of the features of one frame, in pixels
///
/// Return
/// ------
/// * One distance per input point, in input order.
/// * `Err(MicrorheoError::NotEnoughPoints)` with fewer than 2 points — proximity is
///   undefined without a neighbor.
pub fn proximity(points: &[(Pixel, Pixel)]) -> Result<Vec<f64>, MicrorheoError> {
    if points.len() < 2 {
        return Err(MicrorheoError::NotEnoughPoints {
            expected: 2,
            got: points.len(),
        });
    }

    let mut nearest = vec![f64::INFINITY; points.len()];
    for ((i, a), (j, b)) in points.iter().enumerate().tuple_combinations() {
        let d = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
        if d < nearest[i] {
            nearest[i] = d;
        }
        if d < nearest[j] {
            nearest[j] = d;
        }
    }
    Ok(nearest)
}

/// Find each probe's nearest-neighbor distance within one frame of a trajectory set.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `frame`: the frame to examine
///
/// Return
/// ------
/// * `(probe, distance)` pairs for every probe detected at `frame`, probe-ascending.
/// * `Err(MicrorheoError::NotEnoughPoints)` when fewer than 2 probes are detected
///   there.
///
/// Example
/// -------
/// ```rust,no_run
/// # use microrheo::{TrajectorySet, proximity_at_frame};
/// # fn demo(traj_set: &TrajectorySet) -> Result<(), microrheo::MicrorheoError> {
/// // Average proximity of probe 3 over the first hundred frames:
/// let mut sum = 0.0;
/// let mut count = 0;
/// for frame in 0..100 {
///     if let Some((_, d)) = proximity_at_frame(traj_set, frame)?
///         .into_iter()
///         .find(|&(p, _)| p == 3)
///     {
///         sum += d;
///         count += 1;
///     }
/// }
/// # Ok(()) }
/// ```
pub fn proximity_at_frame(
    traj_set: &TrajectorySet,
    frame: Frame,
) -> Result<Vec<(ProbeId, f64)>, MicrorheoError> {
    let mut probes: Vec<ProbeId> = traj_set.keys().copied().collect();
    probes.sort_unstable();

    let mut present: Vec<ProbeId> = Vec::new();
    let mut points: Vec<(Pixel, Pixel)> = Vec::new();
    for probe in probes {
        if let Some(obs) = traj_set[&probe].iter().find(|obs| obs.frame == frame) {
            present.push(probe);
            points.push((obs.x, obs.y));
        }
    }

    let distances = proximity(&points)?;
    Ok(present.into_iter().zip(distances).collect())
}
