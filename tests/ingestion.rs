use microrheo::{
    msd, MicrorheoError, MotionParams, Observation, PositionBatch, TrajectoryFile, TrajectorySet,
};

const TABLE: &str = "\
probe,frame,x,y
3,0,10.0,20.0
3,1,10.5,20.5
1,0,0.0,0.0
1,1,1.0,0.0
1,2,2.0,0.0
";

#[test]
fn test_csv_round_trip() {
    let set = TrajectorySet::new_from_reader(TABLE.as_bytes()).unwrap();

    assert_eq!(set.number_of_trajectories(), 2);
    assert_eq!(set.total_observations(), 5);
    assert_eq!(set.frame_range(), Some((0, 2)));

    // Rows arrive grouped by probe and frame-sorted regardless of file order.
    let probe1 = &set[&1];
    assert_eq!(probe1[0], Observation::new(0, 0.0, 0.0));
    assert_eq!(probe1[2], Observation::new(2, 2.0, 0.0));
    assert_eq!(set[&3].len(), 2);
}

#[test]
fn test_csv_missing_column_fails_fast() {
    let broken = "probe,frame,x\n1,0,0.0\n";
    let err = TrajectorySet::new_from_reader(broken.as_bytes()).unwrap_err();
    assert!(matches!(err, MicrorheoError::MissingColumn(column) if column == "y"));
}

#[test]
fn test_add_from_reader_extends_existing_probes() {
    let mut set = TrajectorySet::new_from_reader(TABLE.as_bytes()).unwrap();
    let more = "probe,frame,x,y\n1,5,5.0,0.0\n9,0,1.0,1.0\n";
    set.add_from_reader(more.as_bytes()).unwrap();

    assert_eq!(set.number_of_trajectories(), 3);
    assert_eq!(set[&1].len(), 4);
    assert_eq!(set[&1].last().unwrap().frame, 5);
}

#[test]
fn test_batch_ingestion() {
    let probe_id = vec![4_u32, 4, 8];
    let frame = vec![1_u32, 0, 0];
    let x = vec![1.0, 0.0, 9.0];
    let y = vec![0.5, 0.0, 9.0];

    let set =
        TrajectorySet::new_from_vec(&PositionBatch::from_slices_borrowed(&probe_id, &frame, &x, &y));
    assert_eq!(set.number_of_trajectories(), 2);
    let frames: Vec<_> = set[&4].iter().map(|obs| obs.frame).collect();
    assert_eq!(frames, vec![0, 1]);

    let stats = set.obs_count_stats().unwrap();
    assert_eq!(stats.min, 1);
    assert_eq!(stats.max, 2);
}

#[test]
fn test_duplicate_observation_caught_by_engine() {
    // Ingestion deliberately does not deduplicate; the MSD engine enforces the
    // one-observation-per-frame invariant instead.
    let mut set = TrajectorySet::new_from_reader(TABLE.as_bytes()).unwrap();
    set.add_from_reader("probe,frame,x,y\n1,2,99.0,99.0\n".as_bytes())
        .unwrap();

    let err = msd(&set[&1], &MotionParams::default(), false).unwrap_err();
    assert!(matches!(err, MicrorheoError::DuplicateFrame(2)));
}
