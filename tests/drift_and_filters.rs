use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use microrheo::trajectories::synthetic::random_walk;
use microrheo::{
    compute_drift, diagonal_size, emsd, imsd, is_typical, msd, proximity_at_frame, subtract_drift,
    MicrorheoError, MotionParams, Observation, Positions, Statistic, TrajectorySet,
};

fn positions(rows: &[(u32, f64, f64)]) -> Positions {
    rows.iter()
        .map(|&(frame, x, y)| Observation::new(frame, x, y))
        .collect()
}

/// Two random walks riding a common linear drift of (+0.25, −0.1) px/frame.
fn drifting_walks() -> TrajectorySet {
    let mut rng = StdRng::seed_from_u64(42);
    let mut set = TrajectorySet::default();
    for probe in 0..2_u32 {
        let walk = random_walk(40, 0.05, (0.25, -0.1), (probe as f64 * 10.0, 0.0), &mut rng)
            .unwrap();
        set.insert(probe, walk);
    }
    set
}

#[test]
fn test_drift_estimate_tracks_common_motion() {
    let drift = compute_drift(&drifting_walks(), 0).unwrap();
    assert_eq!(drift.len(), 39);
    // Cumulative drift after the full movie: 39 steps of the common motion, with a
    // small random-walk residual (σ = 0.05 / √2 per mean step).
    let last = drift.len() - 1;
    assert_relative_eq!(drift.x[last], 0.25 * 39.0, epsilon = 1.5);
    assert_relative_eq!(drift.y[last], -0.1 * 39.0, epsilon = 1.5);
}

#[test]
fn test_subtracting_drift_reduces_ensemble_msd() {
    let set = drifting_walks();
    let corrected = subtract_drift(&set, None).unwrap();

    let p = MotionParams::builder().max_lagtime(20).build().unwrap();
    let raw = emsd(&set, &p).unwrap();
    let clean = emsd(&corrected, &p).unwrap();

    // The ballistic drift dominates raw MSD at long lags; removing it must shrink
    // the curve dramatically.
    let last = raw.len() - 1;
    assert!(clean.values[last] < raw.values[last] / 4.0);
}

#[test]
fn test_exact_linear_drift_restores_stationary_probes() {
    let mut set = TrajectorySet::default();
    set.insert(
        1,
        positions(&[(0, 0.0, 0.0), (1, 0.5, 1.0), (2, 1.0, 2.0), (3, 1.5, 3.0)]),
    );
    set.insert(
        2,
        positions(&[(0, 8.0, 4.0), (1, 8.5, 5.0), (2, 9.0, 6.0), (3, 9.5, 7.0)]),
    );

    let corrected = subtract_drift(&set, None).unwrap();
    for probe in corrected.values() {
        for obs in probe.iter() {
            assert_relative_eq!(obs.x, probe[0].x, epsilon = 1e-12);
            assert_relative_eq!(obs.y, probe[0].y, epsilon = 1e-12);
        }
    }

    // And the corrected MSD is identically zero.
    let table = msd(&corrected[&1], &MotionParams::default(), false).unwrap();
    for point in table.iter() {
        assert_relative_eq!(point.msd, 0.0, epsilon = 1e-24);
    }
}

#[test]
fn test_drift_skips_gap_spanning_steps() {
    let mut set = TrajectorySet::default();
    set.insert(
        1,
        positions(&[(0, 0.0, 0.0), (1, 1.0, 0.0), (5, 50.0, 0.0), (6, 51.0, 0.0)]),
    );
    let drift = compute_drift(&set, 0).unwrap();
    // Only the two consecutive-frame steps count; the 49-px jump across the gap
    // never enters.
    assert_eq!(drift.frames, vec![1, 6]);
    assert_relative_eq!(drift.x[1], 2.0);
}

#[test]
fn test_is_typical_flags_quantile_outliers() {
    let mut set = TrajectorySet::default();
    for step in 1..=5_u32 {
        let s = step as f64;
        set.insert(
            step,
            positions(&[(0, 0.0, 0.0), (1, s, 0.0), (2, 2.0 * s, 0.0)]),
        );
    }

    let table = imsd(&set, &MotionParams::default(), Statistic::Msd).unwrap();
    let flags = is_typical(&table, 0, 0.1, 0.9).unwrap();
    let typical: Vec<_> = flags
        .iter()
        .filter(|(_, ok)| *ok)
        .map(|&(probe, _)| probe)
        .collect();
    assert_eq!(typical, vec![2, 3, 4]);

    assert!(matches!(
        is_typical(&table, 50, 0.1, 0.9),
        Err(MicrorheoError::RowOutOfRange { row: 50, .. })
    ));
}

#[test]
fn test_diagonal_size_of_known_box() {
    let traj = positions(&[(0, 1.0, 1.0), (1, 4.0, 1.0), (2, 4.0, 5.0)]);
    assert_relative_eq!(diagonal_size(&traj), 5.0);
}

#[test]
fn test_proximity_within_one_frame() {
    let mut set = TrajectorySet::default();
    set.insert(1, positions(&[(0, 0.0, 0.0)]));
    set.insert(2, positions(&[(0, 3.0, 4.0)]));
    set.insert(3, positions(&[(0, 3.0, 5.0), (1, 0.0, 0.0)]));

    let result = proximity_at_frame(&set, 0).unwrap();
    assert_eq!(result.len(), 3);
    // Probe 1's nearest neighbor is probe 2 (distance 5); probes 2 and 3 are 1 apart.
    assert_relative_eq!(result[0].1, 5.0);
    assert_relative_eq!(result[1].1, 1.0);
    assert_relative_eq!(result[2].1, 1.0);

    // A frame with a single detection has no defined proximity.
    assert!(matches!(
        proximity_at_frame(&set, 1),
        Err(MicrorheoError::NotEnoughPoints { .. })
    ));
}
