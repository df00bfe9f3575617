//! Shape completion: from a sparse voxel shape to its filled bounding cuboid.
//!
//! A shape is an ordered list of integer cube coordinates. [`complete_shape`]
//! computes the axis-aligned bounds of the shape and appends every coordinate
//! of the enclosed cuboid that the shape does not already occupy. The order of
//! the result is significant downstream: the sequencer spawns cubes in exactly
//! this order, originals first.

use std::collections::HashSet;

use thiserror::Error;

/// An integer cube position on the construction grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The world-space center of this grid cell (unit cube size).
    pub fn to_world(self) -> cgmath::Vector3<f32> {
        cgmath::Vector3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl From<[i32; 3]> for Coordinate {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Inclusive axis-aligned extents of a non-empty shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Bounds {
    /// Number of grid cells in the enclosed cuboid.
    pub fn volume(&self) -> usize {
        let dx = (self.max_x - self.min_x + 1) as usize;
        let dy = (self.max_y - self.min_y + 1) as usize;
        let dz = (self.max_z - self.min_z + 1) as usize;
        dx * dy * dz
    }

    fn of(shape: &[Coordinate]) -> Result<Self, ShapeError> {
        let first = shape.first().ok_or(ShapeError::EmptyShape)?;
        let mut bounds = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
            min_z: first.z,
            max_z: first.z,
        };
        for c in &shape[1..] {
            bounds.min_x = bounds.min_x.min(c.x);
            bounds.max_x = bounds.max_x.max(c.x);
            bounds.min_y = bounds.min_y.min(c.y);
            bounds.max_y = bounds.max_y.max(c.y);
            bounds.min_z = bounds.min_z.min(c.z);
            bounds.max_z = bounds.max_z.max(c.z);
        }
        Ok(bounds)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// Bounds of an empty shape are undefined, so completion refuses it outright.
    #[error("cannot complete an empty shape")]
    EmptyShape,
}

/// The completed cuboid: the original shape followed by its filler cubes.
#[derive(Clone, Debug)]
pub struct CompleteShape {
    coordinates: Vec<Coordinate>,
    original_len: usize,
    bounds: Bounds,
}

impl CompleteShape {
    /// All coordinates, originals first in their input order, then fillers in
    /// nested ascending (x, y, z) order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// How many leading entries came from the input shape.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// How many cubes were added to fill the cuboid.
    pub fn filler_count(&self) -> usize {
        self.coordinates.len() - self.original_len
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Whether the entry at `index` belongs to the input shape.
    pub fn is_original(&self, index: usize) -> bool {
        index < self.original_len
    }
}

/// Complete `shape` into its bounding cuboid.
///
/// Deterministic: the same input always yields the same coordinates in the
/// same order. Fails with [`ShapeError::EmptyShape`] when `shape` is empty.
pub fn complete_shape(shape: &[Coordinate]) -> Result<CompleteShape, ShapeError> {
    let bounds = Bounds::of(shape)?;

    let existing: HashSet<Coordinate> = shape.iter().copied().collect();
    let mut coordinates = shape.to_vec();
    for x in bounds.min_x..=bounds.max_x {
        for y in bounds.min_y..=bounds.max_y {
            for z in bounds.min_z..=bounds.max_z {
                let candidate = Coordinate::new(x, y, z);
                if !existing.contains(&candidate) {
                    coordinates.push(candidate);
                }
            }
        }
    }

    log::debug!(
        "completed shape: {} originals + {} fillers in a {} cell cuboid",
        shape.len(),
        coordinates.len() - shape.len(),
        bounds.volume()
    );

    Ok(CompleteShape {
        coordinates,
        original_len: shape.len(),
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(raw: &[[i32; 3]]) -> Vec<Coordinate> {
        raw.iter().copied().map(Coordinate::from).collect()
    }

    #[test]
    fn empty_shape_is_rejected() {
        assert_eq!(complete_shape(&[]).unwrap_err(), ShapeError::EmptyShape);
    }

    #[test]
    fn filled_cuboid_needs_no_fillers() {
        let shape = coords(&[[0, 0, 0], [1, 0, 0]]);
        let complete = complete_shape(&shape).unwrap();
        assert_eq!(complete.coordinates(), shape.as_slice());
        assert_eq!(complete.filler_count(), 0);
        assert_eq!(complete.bounds().volume(), 2);
    }

    #[test]
    fn gap_in_column_is_filled() {
        let shape = coords(&[[0, 0, 0], [0, 2, 0]]);
        let complete = complete_shape(&shape).unwrap();
        assert_eq!(
            complete.coordinates(),
            coords(&[[0, 0, 0], [0, 2, 0], [0, 1, 0]]).as_slice()
        );
        assert_eq!(complete.filler_count(), 1);
        assert!(complete.is_original(1));
        assert!(!complete.is_original(2));
    }

    #[test]
    fn length_matches_volume_and_originals_keep_order() {
        let shape = coords(&[[2, 0, 1], [0, 0, 0], [1, 1, 1]]);
        let complete = complete_shape(&shape).unwrap();
        assert_eq!(complete.coordinates().len(), complete.bounds().volume());
        assert_eq!(&complete.coordinates()[..3], shape.as_slice());

        let unique: HashSet<_> = complete.coordinates().iter().collect();
        assert_eq!(unique.len(), complete.coordinates().len());
    }

    #[test]
    fn fillers_come_in_nested_ascending_order() {
        let shape = coords(&[[1, 1, 1], [0, 0, 0]]);
        let complete = complete_shape(&shape).unwrap();
        let fillers = &complete.coordinates()[2..];
        assert_eq!(
            fillers,
            coords(&[[0, 0, 1], [0, 1, 0], [0, 1, 1], [1, 0, 0], [1, 0, 1], [1, 1, 0]]).as_slice()
        );
    }

    #[test]
    fn completion_is_deterministic() {
        let shape = coords(&[[0, 0, 0], [3, 1, 0], [1, 2, 2]]);
        let a = complete_shape(&shape).unwrap();
        let b = complete_shape(&shape).unwrap();
        assert_eq!(a.coordinates(), b.coordinates());
    }
}
