use thiserror::Error;

use crate::constants::Frame;

#[derive(Error, Debug)]
pub enum MicrorheoError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column `{0}` in tracking table")]
    MissingColumn(String),

    #[error("Duplicate observation at frame {0}; at most one observation per (probe, frame)")]
    DuplicateFrame(Frame),

    #[error("Trajectory set is empty")]
    EmptyTrajectorySet,

    #[error("Trajectory has no displacements ({0} observations)")]
    EmptyTrajectory(usize),

    #[error("Row {row} out of range for a table with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("No data out to a lag of {lagtime} frames (frame span is {span})")]
    LagBeyondData { lagtime: usize, span: usize },

    #[error("No finite displacements to histogram")]
    NoFiniteDisplacements,

    #[error("Rolling window of {window} exceeds the {available} available directions")]
    WindowTooLarge { window: usize, available: usize },

    #[error("Need at least {expected} points, got {got}")]
    NotEnoughPoints { expected: usize, got: usize },

    #[error("Unknown statistic column: {0}")]
    UnknownStatistic(String),

    #[error("Gaussian step generation failed: {0:?}")]
    NoiseGeneration(rand_distr::NormalError),
}

impl From<rand_distr::NormalError> for MicrorheoError {
    fn from(err: rand_distr::NormalError) -> Self {
        MicrorheoError::NoiseGeneration(err)
    }
}
