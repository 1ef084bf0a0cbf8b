//! # Directional entropy measures
//!
//! The distribution of step *directions* separates isotropic diffusion (high entropy)
//! from directed or constrained motion (low entropy). [`theta_entropy`] computes the
//! Shannon entropy of a trajectory's direction histogram; [`min_rolling_theta_entropy`]
//! finds the least-entropic stretch, a sensitive detector of transient directed runs.
//!
//! Directions are taken between **successive observations** in frame order. A step that
//! spans a detection gap counts as one step: direction is scale-free, so the gap does
//! not bias the angle the way it would bias a displacement magnitude.
use std::f64::consts::PI;

use crate::constants::Positions;
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::sort_by_frame;

/// Compute the Shannon entropy of the distribution of `samples` over histogram bins.
///
/// Arguments
/// ---------
/// * `samples`: the sample values
/// * `edges`: ascending bin edges (`bins + 1` values); the right-most bin is inclusive,
///   samples outside the range are ignored
///
/// Return
/// ------
/// * `−Σ p·ln p` over the occupied bins, in nats; `0.0` when no sample falls in range.
pub fn shannon_entropy(samples: &[f64], edges: &[f64]) -> f64 {
    let bins = edges.len().saturating_sub(1);
    if bins == 0 {
        return 0.0;
    }

    let lo = edges[0];
    let hi = edges[bins];
    let mut counts = vec![0_usize; bins];
    let mut total = 0_usize;
    for &v in samples {
        if !(v >= lo && v <= hi) {
            continue;
        }
        let idx = edges[1..bins]
            .iter()
            .position(|&edge| v < edge)
            .unwrap_or(bins - 1);
        counts[idx] += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    -counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p.ln()
        })
        .sum::<f64>()
}

/// Bin edges spanning [−π, π] with `bins` equal-width bins.
fn direction_edges(bins: usize) -> Vec<f64> {
    (0..=bins)
        .map(|i| -PI + 2.0 * PI * i as f64 / bins as f64)
        .collect()
}

/// Step directions (atan2) between successive frame-ordered observations.
fn step_directions(traj: &Positions) -> Vec<f64> {
    let mut ordered = traj.clone();
    sort_by_frame(&mut ordered);
    ordered
        .windows(2)
        .map(|pair| (pair[1].y - pair[0].y).atan2(pair[1].x - pair[0].x))
        .collect()
}

/// Compute the Shannon entropy of a trajectory's distribution of step directions.
///
/// Arguments
/// ---------
/// * `traj`: one probe's observations
/// * `bins`: number of equally-spaced direction bins over [−π, π]
///   (see [`DEFAULT_BINS`](crate::constants::DEFAULT_BINS))
///
/// Return
/// ------
/// * The Shannon entropy in nats: `0` for a perfectly directed walk, up to `ln(bins)`
///   for directions spread uniformly over all bins.
/// * `Err(MicrorheoError::EmptyTrajectory)` with fewer than 2 observations,
///   `Err(MicrorheoError::InvalidParameter)` for zero `bins`.
pub fn theta_entropy(traj: &Positions, bins: usize) -> Result<f64, MicrorheoError> {
    if bins == 0 {
        return Err(MicrorheoError::InvalidParameter("bins must be >= 1".into()));
    }
    if traj.len() < 2 {
        return Err(MicrorheoError::EmptyTrajectory(traj.len()));
    }
    Ok(shannon_entropy(
        &step_directions(traj),
        &direction_edges(bins),
    ))
}

/// Compute the minimum Shannon entropy of step directions in any window.
///
/// Slides a window of `window` successive directions along the trajectory and returns
/// the smallest per-window entropy — low values expose transient directed runs that
/// the whole-trajectory entropy averages away.
///
/// Arguments
/// ---------
/// * `traj`: one probe's observations
/// * `window`: directions per window
///   (see [`DEFAULT_ENTROPY_WINDOW`](crate::constants::DEFAULT_ENTROPY_WINDOW))
/// * `bins`: number of equally-spaced direction bins over [−π, π]
///
/// Return
/// ------
/// * The minimum windowed entropy, in nats.
/// * `Err(MicrorheoError::WindowTooLarge)` when the trajectory has fewer than `window`
///   directions; parameter errors as for [`theta_entropy`].
pub fn min_rolling_theta_entropy(
    traj: &Positions,
    window: usize,
    bins: usize,
) -> Result<f64, MicrorheoError> {
    if bins == 0 {
        return Err(MicrorheoError::InvalidParameter("bins must be >= 1".into()));
    }
    if window == 0 {
        return Err(MicrorheoError::InvalidParameter(
            "window must be >= 1".into(),
        ));
    }
    if traj.len() < 2 {
        return Err(MicrorheoError::EmptyTrajectory(traj.len()));
    }

    let directions = step_directions(traj);
    if window > directions.len() {
        return Err(MicrorheoError::WindowTooLarge {
            window,
            available: directions.len(),
        });
    }

    let edges = direction_edges(bins);
    Ok(directions
        .windows(window)
        .map(|w| shannon_entropy(w, &edges))
        .fold(f64::INFINITY, f64::min))
}

#[cfg(test)]
mod test_entropy {
    use super::*;
    use crate::motion::msd::positions_from_columns;
    use approx::assert_relative_eq;

    #[test]
    fn test_shannon_entropy_uniform() {
        let samples = [0.5, 1.5, 2.5, 3.5];
        let edges = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(shannon_entropy(&samples, &edges), 4.0_f64.ln());
    }

    #[test]
    fn test_shannon_entropy_single_bin() {
        let samples = [0.1, 0.2, 0.3];
        let edges = [0.0, 1.0, 2.0];
        assert_relative_eq!(shannon_entropy(&samples, &edges), 0.0);
    }

    #[test]
    fn test_straight_walk_has_zero_entropy() {
        let traj = positions_from_columns(
            &[0, 1, 2, 3],
            &[0.0, 1.0, 2.0, 3.0],
            &[0.0, 1.0, 2.0, 3.0],
        );
        assert_relative_eq!(theta_entropy(&traj, 24).unwrap(), 0.0);
    }

    #[test]
    fn test_diagonal_spread_reaches_ln_bins() {
        // Successive steps along the four diagonals: one direction per quadrant bin.
        let traj = positions_from_columns(
            &[0, 1, 2, 3, 4],
            &[0.0, 1.0, 0.0, -1.0, 0.0],
            &[0.0, 1.0, 2.0, 1.0, 0.0],
        );
        assert_relative_eq!(theta_entropy(&traj, 4).unwrap(), 4.0_f64.ln());
    }

    #[test]
    fn test_min_rolling_finds_directed_run() {
        // Three identical steps followed by a turnabout: the best window is pure.
        let traj = positions_from_columns(
            &[0, 1, 2, 3, 4, 5],
            &[0.0, 1.0, 2.0, 3.0, 2.0, 3.0],
            &[0.0; 6],
        );
        let min_entropy = min_rolling_theta_entropy(&traj, 3, 8).unwrap();
        assert_relative_eq!(min_entropy, 0.0);
        let whole = theta_entropy(&traj, 8).unwrap();
        assert!(whole > 0.0);
    }

    #[test]
    fn test_window_too_large() {
        let traj = positions_from_columns(&[0, 1], &[0.0, 1.0], &[0.0; 2]);
        assert!(matches!(
            min_rolling_theta_entropy(&traj, 5, 8),
            Err(MicrorheoError::WindowTooLarge {
                window: 5,
                available: 1
            })
        ));
    }
}
