//! Engine data structures: meshes, textures and instances.
//!
//! This module contains the core data types for scene representation:
//!
//! - `mesh` contains procedural cube geometry and draw helpers
//! - `texture` contains the GPU depth-texture wrapper
//! - `instance` holds per-instance transformation and material data

pub mod instance;
pub mod mesh;
pub mod texture;
