//! Render composition and pipeline batching.
//!
//! Scene code describes *what* to draw with the [`Render`] enum; the app loop
//! sorts the tree into per-pipeline batches and draws them in a fixed order:
//! solid cubes first, then outlines, then glass last so alpha blending sees
//! everything behind it.

use crate::data_structures::mesh::CubeMesh;

/// Data for one instanced draw: a mesh and the buffer of instances to stamp
/// it out with.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a CubeMesh,
    pub amount: usize,
}

/// Specifies how scene content should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Solid(Instanced)` / `Solids(Vec<Instanced>)` use the lit opaque pipeline
/// - `Glass(Instanced)` / `Glasses(Vec<Instanced>)` use the alpha-blended pipeline
/// - `Outline(Instanced)` / `Outlines(Vec<Instanced>)` use the line-list pipeline
/// - `Composed(Vec<Render>)` recursively composes multiple renders
pub enum Render<'a> {
    None,
    Solid(Instanced<'a>),
    Solids(Vec<Instanced<'a>>),
    Glass(Instanced<'a>),
    Glasses(Vec<Instanced<'a>>),
    Outline(Instanced<'a>),
    Outlines(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flatten the render tree into the three pipeline batches.
    pub(crate) fn sort_batches(
        self,
        solids: &mut Vec<Instanced<'a>>,
        outlines: &mut Vec<Instanced<'a>>,
        glasses: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::Solid(instanced) => solids.push(instanced),
            Render::Solids(mut vec) => solids.append(&mut vec),
            Render::Glass(instanced) => glasses.push(instanced),
            Render::Glasses(mut vec) => glasses.append(&mut vec),
            Render::Outline(instanced) => outlines.push(instanced),
            Render::Outlines(mut vec) => outlines.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.sort_batches(solids, outlines, glasses)),
            Render::None => (),
        }
    }
}
