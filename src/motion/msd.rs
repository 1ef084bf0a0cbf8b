//! # Single-Trajectory MSD Engine
//!
//! Mean displacement and mean squared displacement of one probe's trajectory over a range
//! of frame intervals (lag times). This is the numerical core of the crate: the per-probe
//! ([`imsd`](crate::motion::ensemble::imsd)) and ensemble
//! ([`emsd`](crate::motion::ensemble::emsd)) aggregators are thin layers over [`msd`].
//!
//! ## Algorithm
//! -----------------
//! 1. **Dense reindexing.** The trajectory is spread over a dense per-axis series covering
//!    the full inclusive frame range `[min(frame), max(frame)]`. Frames with no detection
//!    hold `NaN`, the explicit missing marker — a gap is *missing*, never zero.
//! 2. **Shifted differences.** For every lag τ in `1..L` (with
//!    `L = min(max_lagtime, observation count)`), the displacement set is the elementwise
//!    difference between the series and itself shifted by τ frames. A displacement with a
//!    missing endpoint is itself missing and excluded from every mean. This costs
//!    O(L · span), not the O(n²) of a naive pair loop.
//! 3. **Per-lag statistics.** Means of dx, dy (scaled by `mpp`) and of dx², dy² (scaled by
//!    `mpp²`); `msd = <dx²> + <dy²>`. With `detail`, the estimated number of statistically
//!    independent measurements `N(τ) = 2 · count(τ) / τ`: consecutive overlapping lag
//!    windows are correlated, and dividing by τ approximates the number of non-overlapping
//!    windows, doubled per the standard MSD statistical-efficiency convention.
//! 4. **Final row dropped.** The largest lag (τ = L) is the least statistically supported
//!    and is not returned, so the table has exactly `L − 1` rows.
//!
//! ## Units
//! -----------------
//! Input units are pixels and frames. Output units are microns and seconds.
//!
//! ## Edge cases
//! -----------------
//! * `max_lagtime` larger than the observation count is silently clamped.
//! * Zero or one observation → empty table (`Ok`), not an error.
//! * A lag where no frame pair has both endpoints present yields a `NaN`-valued row with
//!   `N = 0` — missing, never conflated with a true zero displacement.
//! * Two observations at the same frame → [`MicrorheoError::DuplicateFrame`].
use std::fmt;
use std::str::FromStr;

use crate::constants::{Micron, MicronSq, Positions, Seconds};
use crate::microrheo_errors::MicrorheoError;
use crate::motion::MotionParams;

/// Dense per-axis position series over the inclusive frame range of one trajectory.
///
/// Unobserved frames hold `NaN`; presence is tracked explicitly while building so that a
/// duplicated frame is detected rather than silently overwritten.
#[derive(Debug)]
pub(crate) struct PositionSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PositionSeries {
    /// Spread `traj` over the dense range `[min(frame), max(frame)]`.
    ///
    /// Arguments
    /// ---------
    /// * `traj`: one probe's observations, in any frame order, at least one entry
    ///
    /// Return
    /// ------
    /// * The dense series, or [`MicrorheoError::DuplicateFrame`] if the at-most-one
    ///   observation per frame invariant is violated.
    pub(crate) fn from_positions(traj: &Positions) -> Result<Self, MicrorheoError> {
        let first = traj.iter().map(|obs| obs.frame).min().expect("non-empty");
        let last = traj.iter().map(|obs| obs.frame).max().expect("non-empty");
        let span = (last - first) as usize + 1;

        let mut x = vec![f64::NAN; span];
        let mut y = vec![f64::NAN; span];
        let mut present = vec![false; span];
        for obs in traj {
            let idx = (obs.frame - first) as usize;
            if present[idx] {
                return Err(MicrorheoError::DuplicateFrame(obs.frame));
            }
            present[idx] = true;
            x[idx] = obs.x;
            y[idx] = obs.y;
        }

        Ok(Self { x, y })
    }

    /// Number of dense frames covered (gaps included).
    #[inline]
    pub(crate) fn span(&self) -> usize {
        self.x.len()
    }
}

/// One statistic column of an MSD table, named after the original toolkit's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Statistic {
    /// Mean displacement along x: `<x>`
    MeanX,
    /// Mean displacement along y: `<y>`
    MeanY,
    /// Mean squared displacement along x: `<x^2>`
    MeanXSq,
    /// Mean squared displacement along y: `<y^2>`
    MeanYSq,
    /// Summed mean squared displacement: `msd`
    #[default]
    Msd,
}

impl Statistic {
    /// Extract this statistic from one result row.
    #[inline]
    pub fn of(&self, point: &MsdPoint) -> f64 {
        match self {
            Statistic::MeanX => point.mean_x,
            Statistic::MeanY => point.mean_y,
            Statistic::MeanXSq => point.mean_x2,
            Statistic::MeanYSq => point.mean_y2,
            Statistic::Msd => point.msd,
        }
    }

    /// Column name used by the tabular interchange format.
    pub fn column_name(&self) -> &'static str {
        match self {
            Statistic::MeanX => "<x>",
            Statistic::MeanY => "<y>",
            Statistic::MeanXSq => "<x^2>",
            Statistic::MeanYSq => "<y^2>",
            Statistic::Msd => "msd",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for Statistic {
    type Err = MicrorheoError;

    /// Parse a column name (`"msd"`, `"<x>"`, `"<y>"`, `"<x^2>"`, `"<y^2>"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "msd" => Ok(Statistic::Msd),
            "<x>" => Ok(Statistic::MeanX),
            "<y>" => Ok(Statistic::MeanY),
            "<x^2>" => Ok(Statistic::MeanXSq),
            "<y^2>" => Ok(Statistic::MeanYSq),
            other => Err(MicrorheoError::UnknownStatistic(other.to_string())),
        }
    }
}

/// One row of an MSD result table, keyed by lag time.
///
/// First-moment columns are in microns, second-moment columns in microns². `n` is the
/// estimated number of statistically independent measurements behind the row
/// (`Some` only when the table was computed with detail).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MsdPoint {
    /// Lag time in seconds (`lag / fps`).
    pub lagt: Seconds,
    /// Mean x displacement, `<x>`.
    pub mean_x: Micron,
    /// Mean y displacement, `<y>`.
    pub mean_y: Micron,
    /// Mean squared x displacement, `<x^2>`.
    pub mean_x2: MicronSq,
    /// Mean squared y displacement, `<y^2>`.
    pub mean_y2: MicronSq,
    /// Summed mean squared displacement, `<x^2> + <y^2>`.
    pub msd: MicronSq,
    /// Estimated independent measurement count, `2 · count / lag`.
    pub n: Option<f64>,
}

/// MSD result table: one [`MsdPoint`] per lag, lags `1..L` in frame order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsdTable {
    pub points: Vec<MsdPoint>,
}

impl MsdTable {
    /// An empty table (the degenerate result for 0- or 1-observation trajectories).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of lag rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the rows in lag order.
    pub fn iter(&self) -> std::slice::Iter<'_, MsdPoint> {
        self.points.iter()
    }

    /// Extract one statistic column, in lag order.
    pub fn statistic(&self, stat: Statistic) -> Vec<f64> {
        self.points.iter().map(|p| stat.of(p)).collect()
    }

    /// Lag times in seconds, in lag order.
    pub fn lag_times(&self) -> Vec<Seconds> {
        self.points.iter().map(|p| p.lagt).collect()
    }
}

impl fmt::Display for MsdTable {
    /// Aligned columns, one row per lag; `N` only when present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with_n = self.points.first().is_some_and(|p| p.n.is_some());
        write!(
            f,
            "{:>10} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "lagt", "<x>", "<y>", "<x^2>", "<y^2>", "msd"
        )?;
        if with_n {
            write!(f, " {:>10}", "N")?;
        }
        for p in &self.points {
            write!(
                f,
                "\n{:>10.4} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                p.lagt, p.mean_x, p.mean_y, p.mean_x2, p.mean_y2, p.msd
            )?;
            if let Some(n) = p.n {
                write!(f, " {n:>10.2}")?;
            }
        }
        Ok(())
    }
}

/// Compute the mean displacement and mean squared displacement of one trajectory over a
/// range of time intervals.
///
/// Arguments
/// ---------
/// * `traj`: one probe's observations (any frame order; gaps allowed)
/// * `params`: spatial/temporal calibration and maximum lag count
/// * `detail`: when true, each row also carries `N`, the estimated number of
///   statistically independent measurements comprising the result at that lag
///
/// Return
/// ------
/// * An [`MsdTable`] with exactly `min(max_lagtime, traj.len()) − 1` rows (the final,
///   least-supported lag is dropped). Zero or one observation yields an empty table.
/// * `Err(MicrorheoError::DuplicateFrame)` if two observations share a frame.
///
/// Notes
/// -----
/// * Input units are pixels and frames. Output units are microns and seconds.
/// * A lag with no supporting frame pair yields a `NaN` row (missing, not zero).
///
/// See also
/// --------
/// * [`imsd`](crate::motion::ensemble::imsd) and [`emsd`](crate::motion::ensemble::emsd)
pub fn msd(
    traj: &Positions,
    params: &MotionParams,
    detail: bool,
) -> Result<MsdTable, MicrorheoError> {
    if traj.is_empty() {
        return Ok(MsdTable::empty());
    }

    let series = PositionSeries::from_positions(traj)?;
    let span = series.span();
    let max_lagtime = params.max_lagtime.min(traj.len());

    let mpp = params.mpp;
    let mpp_sq = mpp * mpp;

    // Lags 1..max_lagtime: the row at max_lagtime itself is the dropped final lag.
    let mut points = Vec::with_capacity(max_lagtime.saturating_sub(1));
    for lag in 1..max_lagtime {
        let mut sum_dx = 0.0;
        let mut sum_dy = 0.0;
        let mut sum_dx2 = 0.0;
        let mut sum_dy2 = 0.0;
        let mut count = 0_usize;

        for f in lag..span {
            let dx = series.x[f] - series.x[f - lag];
            let dy = series.y[f] - series.y[f - lag];
            if dx.is_nan() || dy.is_nan() {
                continue;
            }
            sum_dx += dx;
            sum_dy += dy;
            sum_dx2 += dx * dx;
            sum_dy2 += dy * dy;
            count += 1;
        }

        let (mean_x, mean_y, mean_x2, mean_y2, msd_val) = if count == 0 {
            // All-missing lag: the means stay missing, never zero.
            (f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN)
        } else {
            let c = count as f64;
            (
                mpp * sum_dx / c,
                mpp * sum_dy / c,
                mpp_sq * sum_dx2 / c,
                mpp_sq * sum_dy2 / c,
                mpp_sq * (sum_dx2 + sum_dy2) / c,
            )
        };

        points.push(MsdPoint {
            lagt: lag as f64 / params.fps,
            mean_x,
            mean_y,
            mean_x2,
            mean_y2,
            msd: msd_val,
            // Estimated statistically independent measurements = 2·count/τ.
            n: detail.then(|| 2.0 * count as f64 / lag as f64),
        });
    }

    Ok(MsdTable { points })
}

/// Build a [`Positions`] container from parallel frame/x/y columns.
#[cfg(test)]
pub(crate) fn positions_from_columns(
    frames: &[crate::constants::Frame],
    x: &[f64],
    y: &[f64],
) -> Positions {
    use crate::trajectories::Observation;

    frames
        .iter()
        .zip(x.iter())
        .zip(y.iter())
        .map(|((&frame, &x), &y)| Observation::new(frame, x, y))
        .collect()
}
