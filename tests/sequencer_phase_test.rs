use cubeflow::{
    construction::STEPPED_SHAPE,
    sequencer::{Phase, Sequencer, SequencerConfig, SequencerEvent},
    shape::Coordinate,
};
use instant::Duration;

mod common;
use common::test_utils::{run_to_completion, TICK};

fn stepped_shape() -> Vec<Coordinate> {
    STEPPED_SHAPE.into_iter().map(Coordinate::from).collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn single_cube_flight_hits_both_endpoints() {
    let mut sequencer =
        Sequencer::new(&[Coordinate::new(0, 0, 0)], SequencerConfig::default()).unwrap();

    // The first tick spawns the cube at the shared origin.
    let update = sequencer.tick(Duration::ZERO);
    let frame = update.frames[0];
    assert_eq!(frame.position, cgmath::Vector3::new(5.0, 5.0, 5.0));
    assert!(approx(frame.scale, 0.0));

    // At exactly the animation duration it sits on its grid cell, full size.
    let update = sequencer.tick(Duration::from_millis(1000));
    let frame = update.frames[0];
    assert_eq!(frame.position, cgmath::Vector3::new(0.0, 0.0, 0.0));
    assert!(approx(frame.scale, 1.0));
}

#[test]
fn spawns_are_serialized_and_spaced() {
    let mut sequencer = Sequencer::new(&stepped_shape(), SequencerConfig::default()).unwrap();

    let mut activation_times = Vec::new();
    let mut activation_indices = Vec::new();
    for i in 0..200u32 {
        let now = TICK * i;
        let update = sequencer.tick(now);
        let spawned: Vec<usize> = update
            .events
            .iter()
            .filter_map(|event| match event {
                SequencerEvent::TaskActivated { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        // Never more than one spawn per tick, no matter the tick cadence.
        assert!(spawned.len() <= 1);
        if let Some(&index) = spawned.first() {
            activation_times.push(now);
            activation_indices.push(index);
        }
    }

    // Spawn order is completed-shape order.
    let expected: Vec<usize> = (0..activation_indices.len()).collect();
    assert_eq!(activation_indices, expected);
    assert!(activation_indices.len() > 10);

    // Consecutive spawns are strictly more than the delay apart.
    for pair in activation_times.windows(2) {
        assert!(pair[1] - pair[0] > Duration::from_millis(100));
    }
}

#[test]
fn full_sequence_completes_once_with_filler_count() {
    let mut sequencer = Sequencer::new(&stepped_shape(), SequencerConfig::default()).unwrap();
    assert_eq!(sequencer.task_count(), 48);
    assert_eq!(sequencer.filler_count(), 29);

    let log = run_to_completion(&mut sequencer, 5000);

    assert_eq!(sequencer.phase(), Phase::Complete);
    assert_eq!(log.completions, vec![29]);
    assert_eq!(log.activations.len(), 48);
    for (position, (index, is_original)) in log.activations.iter().enumerate() {
        assert_eq!(*index, position);
        assert_eq!(*is_original, position < 19);
    }
}

#[test]
fn fillers_end_in_axis_ordered_rows() {
    let config = SequencerConfig::default();
    let mut sequencer = Sequencer::new(&stepped_shape(), config).unwrap();
    let log = run_to_completion(&mut sequencer, 5000);

    assert_eq!(log.final_frames.len(), 48);

    // Original cubes rest on their grid cells at full size.
    let shape = sequencer.complete_shape();
    let mut rows: Vec<Vec<f32>> = vec![Vec::new(); 4];
    for frame in &log.final_frames {
        assert!(approx(frame.scale, 1.0));
        if frame.is_original {
            assert_eq!(frame.position, shape.coordinates()[frame.index].to_world());
        } else {
            // Fillers sit in one of the four display rows on the ground.
            assert!(approx(frame.position.y, 0.0));
            let row = (frame.position.z / 2.4).round() as usize;
            assert!(approx(frame.position.z, row as f32 * 2.4));
            rows[row].push(frame.position.x);
        }
    }

    // One row per filler y-layer of the stepped shape, bottom layer first.
    let row_sizes: Vec<usize> = rows.iter().map(Vec::len).collect();
    assert_eq!(row_sizes, vec![6, 6, 8, 9]);

    // Within a row the cubes line up from the start at the configured spacing.
    for row in &mut rows {
        row.sort_by(f32::total_cmp);
        for (j, &x) in row.iter().enumerate() {
            assert!(approx(x, 5.0 + j as f32 * 1.2));
        }
    }
}

#[test]
fn already_filled_shape_skips_layering() {
    let shape = [Coordinate::new(0, 0, 0), Coordinate::new(1, 0, 0)];
    let mut sequencer = Sequencer::new(&shape, SequencerConfig::default()).unwrap();
    let log = run_to_completion(&mut sequencer, 1000);

    assert_eq!(log.completions, vec![0]);
    assert_eq!(sequencer.phase(), Phase::Complete);
    // Both cubes simply rest in the grid.
    for frame in &log.final_frames {
        assert!(frame.is_original);
        assert!(approx(frame.position.y, 0.0));
    }
}
