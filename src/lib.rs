//! cubeflow: a deterministic two-phase cube construction animation.
//!
//! The crate splits into a pure, render-free core and a wgpu presentation
//! layer on top of it:
//!
//! - [`shape`] turns a set of integer grid coordinates into its completed
//!   bounding cuboid, tagging which cubes were part of the input and which
//!   were generated as filling.
//! - [`sequencer`] drives the two animation phases off caller-supplied
//!   timestamps: first every cube spawns and flies to its grid position, then
//!   the filling cubes peel off layer by layer into rows on the ground.
//! - [`easing`] holds the cubic easing curves both phases interpolate with.
//! - [`construction`], [`context`], [`camera`], [`pipelines`], [`render`] and
//!   [`app`] wrap the core in an instanced wgpu renderer with an orbiting
//!   orthographic camera, runnable natively or on wasm.
//!
//! The core never reads a clock; feed [`sequencer::Sequencer::tick`] the same
//! timestamps twice and you get the same animation twice.

pub mod app;
pub mod camera;
pub mod construction;
pub mod context;
pub mod data_structures;
pub mod easing;
pub mod pipelines;
pub mod render;
pub mod sequencer;
pub mod shape;

pub use cgmath::*;

pub use sequencer::{
    Axis, CubeFrame, Phase, Sequencer, SequencerConfig, SequencerError, SequencerEvent, TickUpdate,
};
pub use shape::{complete_shape, Bounds, CompleteShape, Coordinate, ShapeError};
