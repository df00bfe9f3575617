use cubeflow::shape::{complete_shape, Coordinate, ShapeError};

fn coords(raw: &[[i32; 3]]) -> Vec<Coordinate> {
    raw.iter().copied().map(Coordinate::from).collect()
}

#[test]
fn completed_shape_fills_the_bounding_cuboid() {
    // An L made of three cubes inside a 2x2x2 box.
    let shape = coords(&[[0, 0, 0], [1, 0, 0], [1, 1, 1]]);
    let completed = complete_shape(&shape).unwrap();

    let bounds = completed.bounds();
    assert_eq!(bounds.volume(), 8);
    assert_eq!(completed.coordinates().len(), 8);
    assert_eq!(completed.original_len(), 3);
    assert_eq!(completed.filler_count(), 5);

    // Originals come first, in input order, untouched.
    assert_eq!(&completed.coordinates()[..3], shape.as_slice());

    // Every cell of the cuboid appears exactly once.
    let mut cells: Vec<Coordinate> = completed.coordinates().to_vec();
    cells.sort_by_key(|c| (c.x, c.y, c.z));
    cells.dedup();
    assert_eq!(cells.len(), 8);
}

#[test]
fn completion_is_deterministic() {
    let shape = coords(&[[2, 0, 1], [0, 3, 0], [1, 1, 2], [2, 2, 2]]);
    let first = complete_shape(&shape).unwrap();
    let second = complete_shape(&shape).unwrap();
    assert_eq!(first.coordinates(), second.coordinates());
    assert_eq!(first.bounds(), second.bounds());
}

#[test]
fn full_cuboid_needs_no_filler() {
    // Two adjacent cubes already span their whole bounding box.
    let shape = coords(&[[0, 0, 0], [1, 0, 0]]);
    let completed = complete_shape(&shape).unwrap();

    let bounds = completed.bounds();
    assert_eq!((bounds.min_x, bounds.max_x), (0, 1));
    assert_eq!((bounds.min_y, bounds.max_y), (0, 0));
    assert_eq!((bounds.min_z, bounds.max_z), (0, 0));
    assert_eq!(completed.filler_count(), 0);
    assert_eq!(completed.coordinates(), shape.as_slice());
}

#[test]
fn single_gap_yields_single_filler() {
    let shape = coords(&[[0, 0, 0], [0, 2, 0]]);
    let completed = complete_shape(&shape).unwrap();

    assert_eq!(
        completed.coordinates(),
        coords(&[[0, 0, 0], [0, 2, 0], [0, 1, 0]]).as_slice()
    );
    assert_eq!(completed.filler_count(), 1);
    assert!(completed.is_original(0));
    assert!(completed.is_original(1));
    assert!(!completed.is_original(2));
}

#[test]
fn empty_shape_is_rejected() {
    assert!(matches!(complete_shape(&[]), Err(ShapeError::EmptyShape)));
}
