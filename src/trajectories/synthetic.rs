//! # Synthetic trajectories
//!
//! Seeded 2-D Gaussian random walks, used by the test suite and the benchmarks to build
//! trajectory sets with known statistics. A pure random walk with step standard
//! deviation σ has an expected MSD of `2σ²·τ` per axis, which makes these fixtures
//! convenient references for the MSD pipeline.
//!
//! All generators take a caller-provided [`rand::Rng`], so a seeded
//! [`StdRng`](rand::rngs::StdRng) gives fully reproducible sets.
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::constants::{Pixel, Positions, ProbeId};
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::{Observation, TrajectorySet};

/// Generate one Gaussian random-walk trajectory.
///
/// Arguments
/// ---------
/// * `n_frames`: number of observations (frames 0..n_frames, fully dense)
/// * `step_sigma`: standard deviation of each per-frame step, in pixels
/// * `drift`: constant (dx, dy) added to every step, in pixels per frame
/// * `origin`: starting (x, y) position, in pixels
/// * `rng`: random number generator
///
/// Return
/// ------
/// * A frame-ordered [`Positions`] container of `n_frames` observations.
/// * `Err(MicrorheoError::NoiseGeneration)` if `step_sigma` is not a valid standard
///   deviation (negative or non-finite).
pub fn random_walk(
    n_frames: usize,
    step_sigma: f64,
    drift: (Pixel, Pixel),
    origin: (Pixel, Pixel),
    rng: &mut impl Rng,
) -> Result<Positions, MicrorheoError> {
    let step = Normal::new(0.0, step_sigma)?;

    let (mut x, mut y) = origin;
    let mut positions = Positions::with_capacity(n_frames);
    for frame in 0..n_frames {
        if frame > 0 {
            x += drift.0 + step.sample(rng);
            y += drift.1 + step.sample(rng);
        }
        positions.push(Observation::new(frame as u32, x, y));
    }
    Ok(positions)
}

/// Generate a set of driftless Gaussian random walks, one per probe.
///
/// Probe ids are `0..n_probes`; every probe starts at the origin and spans frames
/// `0..n_frames` with no gaps.
///
/// Arguments
/// ---------
/// * `n_probes`: number of probes in the set
/// * `n_frames`: observations per probe
/// * `step_sigma`: standard deviation of each per-frame step, in pixels
/// * `rng`: random number generator
pub fn random_walk_set(
    n_probes: usize,
    n_frames: usize,
    step_sigma: f64,
    rng: &mut impl Rng,
) -> Result<TrajectorySet, MicrorheoError> {
    let mut set = TrajectorySet::default();
    for probe in 0..n_probes {
        let walk = random_walk(n_frames, step_sigma, (0.0, 0.0), (0.0, 0.0), rng)?;
        set.insert(probe as ProbeId, walk);
    }
    Ok(set)
}
