pub mod constants;
pub mod microrheo_errors;
pub mod motion;
pub mod trajectories;

pub use constants::{Frame, Micron, MicronSq, Pixel, Positions, ProbeId, Seconds};
pub use microrheo_errors::MicrorheoError;
pub use motion::correlation::{
    direction_corr, relate_frames, velocity_corr, FrameLink, PairCorrelation, PairVelocity,
};
pub use motion::drift::{compute_drift, subtract_drift, DriftTable};
pub use motion::ensemble::{emsd, emsd_detail, imsd, ImsdTable, MsdSeries};
pub use motion::entropy::{min_rolling_theta_entropy, shannon_entropy, theta_entropy};
pub use motion::filters::{diagonal_size, is_typical};
pub use motion::msd::{msd, MsdPoint, MsdTable, Statistic};
pub use motion::proximity::{proximity, proximity_at_frame};
pub use motion::vanhove::{
    axis_table, vanhove, vanhove_ensemble, Axis, AxisTable, VanHoveSeries, VanHoveTable,
};
pub use motion::MotionParams;
pub use trajectories::batch_reader::PositionBatch;
pub use trajectories::synthetic::{random_walk, random_walk_set};
pub use trajectories::trajectory_file::{ObsCountStats, TrajectoryFile};
pub use trajectories::{Observation, TrajectorySet};
