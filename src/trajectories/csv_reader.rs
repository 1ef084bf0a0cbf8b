//! # CSV Tracking-Table Ingestion
//!
//! Reader for the plain tabular interchange format of the crate: one row per position
//! observation, with the required header columns `probe`, `frame`, `x`, `y`.
//!
//! The reader validates the header before deserializing any row, so a table missing a
//! required column fails fast with [`MicrorheoError::MissingColumn`] rather than
//! producing an empty or garbage set. Extra columns (e.g. a `mass` or `size` column from
//! the upstream feature finder) are ignored.
//!
//! See also
//! ------------
//! * [`TrajectoryFile::new_from_csv`](crate::trajectories::trajectory_file::TrajectoryFile::new_from_csv) – Public entry point.
//! * [`batch_reader`](crate::trajectories::batch_reader) – In-memory ingestion with the same row schema.
use std::io::Read;

use serde::Deserialize;

use crate::constants::{Frame, Pixel, ProbeId};
use crate::microrheo_errors::MicrorheoError;
use crate::trajectories::{sort_by_frame, Observation, TrajectorySet};

/// Header columns every tracking table must carry.
const REQUIRED_COLUMNS: [&str; 4] = ["probe", "frame", "x", "y"];

/// One deserialized row of a tracking table.
#[derive(Debug, Deserialize)]
struct TrackRecord {
    probe: ProbeId,
    frame: Frame,
    x: Pixel,
    y: Pixel,
}

/// Read a tracking table from any `Read` source into `traj_set`.
///
/// Arguments
/// ---------
/// * `reader`: the CSV source (file, byte buffer, ...)
/// * `traj_set`: the set receiving the observations, probe by probe
///
/// Return
/// ------
/// * `Ok(())` on success, with every touched probe's positions re-sorted by frame.
/// * `Err(MicrorheoError::MissingColumn)` if a required header column is absent.
/// * `Err(MicrorheoError::CsvError)` on malformed rows.
pub(crate) fn csv_to_trajset<R: Read>(
    reader: R,
    traj_set: &mut TrajectorySet,
) -> Result<(), MicrorheoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(MicrorheoError::MissingColumn(required.to_string()));
        }
    }

    let mut touched: Vec<ProbeId> = Vec::new();
    for record in csv_reader.deserialize::<TrackRecord>() {
        let record = record?;
        traj_set
            .entry(record.probe)
            .or_default()
            .push(Observation::new(record.frame, record.x, record.y));
        touched.push(record.probe);
    }

    touched.sort_unstable();
    touched.dedup();
    for probe in touched {
        if let Some(positions) = traj_set.get_mut(&probe) {
            sort_by_frame(positions);
        }
    }

    Ok(())
}

#[cfg(test)]
mod test_csv_reader {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_read_simple_table() {
        let data = "probe,frame,x,y\n1,0,5.0,5.0\n1,2,6.0,5.5\n2,0,0.0,0.0\n";
        let mut set: TrajectorySet = HashMap::default();
        csv_to_trajset(data.as_bytes(), &mut set).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set[&1].len(), 2);
        assert_eq!(set[&2].len(), 1);
        assert_eq!(set[&1][1], Observation::new(2, 6.0, 5.5));
    }

    #[test]
    fn test_unordered_rows_are_sorted_per_probe() {
        let data = "probe,frame,x,y\n1,5,1.0,0.0\n1,1,2.0,0.0\n1,3,3.0,0.0\n";
        let mut set: TrajectorySet = HashMap::default();
        csv_to_trajset(data.as_bytes(), &mut set).unwrap();

        let frames: Vec<_> = set[&1].iter().map(|o| o.frame).collect();
        assert_eq!(frames, vec![1, 3, 5]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let data = "probe,frame,x,y,mass\n4,0,1.0,2.0,130.5\n";
        let mut set: TrajectorySet = HashMap::default();
        csv_to_trajset(data.as_bytes(), &mut set).unwrap();
        assert_eq!(set[&4][0], Observation::new(0, 1.0, 2.0));
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let data = "probe,frame,x\n1,0,5.0\n";
        let mut set: TrajectorySet = HashMap::default();
        let err = csv_to_trajset(data.as_bytes(), &mut set).unwrap_err();
        assert!(matches!(err, MicrorheoError::MissingColumn(c) if c == "y"));
        assert!(set.is_empty());
    }
}
