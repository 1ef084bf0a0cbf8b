//! # Pairwise displacement correlations
//!
//! Relates every probe's displacement between two chosen frames to every other
//! probe's, as a function of pair separation. Correlated displacement directions at
//! short separations reveal hydrodynamic coupling or collective flow; two-point
//! microrheology is built on exactly these curves.
//!
//! [`relate_frames`] builds the per-probe displacement records; [`direction_corr`] and
//! [`velocity_corr`] reduce them to per-pair (separation, correlation) samples over the
//! upper triangle of the pair matrix.
use itertools::Itertools;

use crate::constants::{Frame, Pixel, ProbeId};
use crate::trajectories::TrajectorySet;

/// One probe's displacement between two frames.
///
/// Fields
/// -----------------
/// * `probe` – probe id.
/// * `x`, `y` – position at the first frame (pixels).
/// * `x_b`, `y_b` – position at the second frame (pixels).
/// * `dx`, `dy` – displacement components.
/// * `dr` – displacement magnitude.
/// * `direction` – displacement direction, `atan2(dy, dx)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLink {
    pub probe: ProbeId,
    pub x: Pixel,
    pub y: Pixel,
    pub x_b: Pixel,
    pub y_b: Pixel,
    pub dx: Pixel,
    pub dy: Pixel,
    pub dr: Pixel,
    pub direction: f64,
}

/// One unordered probe pair's direction correlation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCorrelation {
    /// Pair separation at the first frame (pixels).
    pub r: Pixel,
    /// Cosine of the angle between the two displacement directions.
    pub cos: f64,
}

/// One unordered probe pair's velocity correlation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairVelocity {
    /// Pair separation at the first frame (pixels).
    pub r: Pixel,
    /// `cos(Δdirection) · |dr_i · dr_j|` — the displacement dot product.
    pub dot_product: f64,
}

/// Relate each probe's position at `frame1` to its position at `frame2`.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `frame1`, `frame2`: the two frames to compare
///
/// Return
/// ------
/// * One [`FrameLink`] per probe detected in **both** frames, probe-ascending. Probes
///   missing either detection are left out entirely.
pub fn relate_frames(traj_set: &TrajectorySet, frame1: Frame, frame2: Frame) -> Vec<FrameLink> {
    let mut probes: Vec<ProbeId> = traj_set.keys().copied().collect();
    probes.sort_unstable();

    probes
        .iter()
        .filter_map(|probe| {
            let positions = &traj_set[probe];
            let at = |frame: Frame| positions.iter().find(|obs| obs.frame == frame);
            let (a, b) = (at(frame1)?, at(frame2)?);
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            Some(FrameLink {
                probe: *probe,
                x: a.x,
                y: a.y,
                x_b: b.x,
                y_b: b.y,
                dx,
                dy,
                dr: (dx * dx + dy * dy).sqrt(),
                direction: dy.atan2(dx),
            })
        })
        .collect()
}

/// Compute the cosine between every pair of probes' displacements.
///
/// Arguments
/// ---------
/// * `traj_set`: trajectories of multiple probes
/// * `frame1`, `frame2`: the two frames spanning the displacements
///
/// Return
/// ------
/// * One [`PairCorrelation`] per unordered pair of probes present in both frames,
///   carrying the pair separation at `frame1` and the direction cosine.
pub fn direction_corr(
    traj_set: &TrajectorySet,
    frame1: Frame,
    frame2: Frame,
) -> Vec<PairCorrelation> {
    relate_frames(traj_set, frame1, frame2)
        .iter()
        .tuple_combinations()
        .map(|(a, b)| PairCorrelation {
            r: ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt(),
            cos: (a.direction - b.direction).cos(),
        })
        .collect()
}

/// Compute the velocity correlation between every pair of probes' displacements.
///
/// Same pair enumeration as [`direction_corr`], but weighting the direction cosine by
/// the displacement magnitudes: `cos(Δdirection) · |dr_i · dr_j|`.
pub fn velocity_corr(traj_set: &TrajectorySet, frame1: Frame, frame2: Frame) -> Vec<PairVelocity> {
    relate_frames(traj_set, frame1, frame2)
        .iter()
        .tuple_combinations()
        .map(|(a, b)| PairVelocity {
            r: ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt(),
            dot_product: (a.direction - b.direction).cos() * (a.dr * b.dr).abs(),
        })
        .collect()
}
