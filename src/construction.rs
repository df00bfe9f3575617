//! The construction scene: the stepped demo shape, its cube instances and the
//! glue between sequencer output and GPU buffers.
//!
//! Every cube is drawn three times: a solid inner cube, a slightly larger
//! glass shell, and a black edge outline. Original cubes render cyan, filler
//! cubes red; the sequencer's `TaskActivated` event decides which group a
//! cube joins, exactly when it enters the scene.

use instant::Duration;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        mesh::CubeMesh,
    },
    render::{Instanced, Render},
    sequencer::{Sequencer, SequencerConfig, SequencerError, SequencerEvent},
    shape::Coordinate,
};

/// The stepped shape the visualization constructs, as drawn in its plan,
/// side and front elevations. Order matters: cubes spawn in this order.
pub const STEPPED_SHAPE: [[i32; 3]; 19] = [
    // right
    [0, 0, 0],
    [1, 0, 0],
    [2, 0, 0],
    [3, 0, 0],
    [0, 1, 0],
    [0, 2, 0],
    [0, 3, 0],
    [1, 1, 0],
    [1, 2, 0],
    [2, 1, 0],
    [3, 1, 0],
    // middle
    [0, 0, 1],
    [0, 1, 1],
    [0, 2, 1],
    [0, 3, 1],
    // left
    [0, 0, 2],
    [0, 1, 2],
    [0, 2, 2],
    [0, 3, 2],
];

const CUBE_SIZE: f32 = 1.0;
/// The solid cube sits inside the glass shell.
const INNER_SIZE: f32 = CUBE_SIZE * 0.8;

const ORIGINAL_INNER: ([f32; 4], [f32; 3]) = ([0.0, 1.0, 1.0, 1.0], [0.0, 0.25, 0.25]);
const ORIGINAL_SHELL: ([f32; 4], [f32; 3]) = ([0.53, 0.8, 1.0, 0.4], [0.0, 0.0, 0.0]);
const FILLER_INNER: ([f32; 4], [f32; 3]) = ([1.0, 0.0, 0.0, 0.7], [0.2, 0.0, 0.0]);
const FILLER_SHELL: ([f32; 4], [f32; 3]) = ([1.0, 0.27, 0.27, 0.4], [0.0, 0.0, 0.0]);
const OUTLINE: ([f32; 4], [f32; 3]) = ([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0]);

/// A growable group of instances backed by one pre-sized GPU buffer.
struct CubeBatch {
    instances: Vec<Instance>,
    buffer: wgpu::Buffer,
}

impl CubeBatch {
    fn new(device: &wgpu::Device, capacity: usize, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            instances: Vec::with_capacity(capacity),
            buffer,
        }
    }

    /// Append an instance, returning its slot.
    fn push(&mut self, instance: Instance) -> usize {
        self.instances.push(instance);
        self.instances.len() - 1
    }

    fn write_to_buffer(&self, queue: &wgpu::Queue) {
        if self.instances.is_empty() {
            return;
        }
        let raws: Vec<InstanceRaw> = self.instances.iter().map(Instance::to_raw).collect();
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&raws));
    }

    fn as_instanced<'a>(&'a self, mesh: &'a CubeMesh) -> Instanced<'a> {
        Instanced {
            instance: &self.buffer,
            mesh,
            amount: self.instances.len(),
        }
    }
}

/// Where a task's instances live: one slot in a material batch (inner + shell
/// share it) and one in the shared outline batch.
#[derive(Clone, Copy)]
struct Slot {
    material: usize,
    outline: usize,
    is_original: bool,
}

pub struct Construction {
    sequencer: Sequencer,
    slots: Vec<Option<Slot>>,

    inner_mesh: CubeMesh,
    shell_mesh: CubeMesh,
    edge_mesh: CubeMesh,

    original_inner: CubeBatch,
    original_shell: CubeBatch,
    filler_inner: CubeBatch,
    filler_shell: CubeBatch,
    outlines: CubeBatch,
}

impl Construction {
    pub fn new(device: &wgpu::Device) -> Result<Self, SequencerError> {
        let shape: Vec<Coordinate> = STEPPED_SHAPE.into_iter().map(Coordinate::from).collect();
        let sequencer = Sequencer::new(&shape, SequencerConfig::default())?;

        let originals = sequencer.complete_shape().original_len();
        let fillers = sequencer.filler_count();
        let total = sequencer.task_count();
        log::info!("constructing {originals} cubes plus {fillers} fillers");

        Ok(Self {
            slots: vec![None; total],
            inner_mesh: CubeMesh::solid(device, INNER_SIZE, "inner cube"),
            shell_mesh: CubeMesh::solid(device, CUBE_SIZE, "glass shell"),
            edge_mesh: CubeMesh::edges(device, CUBE_SIZE, "cube edges"),
            original_inner: CubeBatch::new(device, originals, "original inner instances"),
            original_shell: CubeBatch::new(device, originals, "original shell instances"),
            filler_inner: CubeBatch::new(device, fillers, "filler inner instances"),
            filler_shell: CubeBatch::new(device, fillers, "filler shell instances"),
            outlines: CubeBatch::new(device, total, "outline instances"),
            sequencer,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Advance the sequencer to `now` and mirror its frames into instances.
    pub fn update(&mut self, now: Duration) {
        let update = self.sequencer.tick(now);

        for event in update.events {
            match event {
                SequencerEvent::TaskActivated { index, is_original } => {
                    self.activate(index, is_original);
                }
                SequencerEvent::SequenceComplete { filler_count } => {
                    log::info!("construction complete, total filling cubes: {filler_count}");
                }
            }
        }

        // Soft pulse on the original cubes' glow.
        let pulse = 1.0 + ((now.as_secs_f32() * 2.0).sin() * 0.5 + 0.5) * 0.2;

        for frame in update.frames {
            let slot = match self.slots[frame.index] {
                Some(slot) => slot,
                None => continue,
            };
            let (inner, shell) = if slot.is_original {
                (&mut self.original_inner, &mut self.original_shell)
            } else {
                (&mut self.filler_inner, &mut self.filler_shell)
            };
            for batch in [&mut *inner, &mut *shell] {
                let instance = &mut batch.instances[slot.material];
                instance.position = frame.position;
                instance.set_uniform_scale(frame.scale);
            }
            if slot.is_original {
                inner.instances[slot.material].emissive_intensity = pulse;
            }
            let outline = &mut self.outlines.instances[slot.outline];
            outline.position = frame.position;
            outline.set_uniform_scale(frame.scale);
        }
    }

    /// A cube entered the scene: give it instances in the right material
    /// group.
    fn activate(&mut self, index: usize, is_original: bool) {
        log::debug!(
            "cube {index} activated ({})",
            if is_original { "original" } else { "filler" }
        );
        let ((inner_color, inner_emissive), (shell_color, shell_emissive)) = if is_original {
            (ORIGINAL_INNER, ORIGINAL_SHELL)
        } else {
            (FILLER_INNER, FILLER_SHELL)
        };
        let (inner, shell) = if is_original {
            (&mut self.original_inner, &mut self.original_shell)
        } else {
            (&mut self.filler_inner, &mut self.filler_shell)
        };
        let material = inner.push(Instance::with_material(inner_color, inner_emissive));
        shell.push(Instance::with_material(shell_color, shell_emissive));
        let outline = self
            .outlines
            .push(Instance::with_material(OUTLINE.0, OUTLINE.1));
        self.slots[index] = Some(Slot {
            material,
            outline,
            is_original,
        });
    }

    pub fn write_to_buffers(&self, queue: &wgpu::Queue) {
        self.original_inner.write_to_buffer(queue);
        self.original_shell.write_to_buffer(queue);
        self.filler_inner.write_to_buffer(queue);
        self.filler_shell.write_to_buffer(queue);
        self.outlines.write_to_buffer(queue);
    }

    pub fn render(&self) -> Render<'_> {
        Render::Composed(vec![
            Render::Solids(vec![
                self.original_inner.as_instanced(&self.inner_mesh),
                self.filler_inner.as_instanced(&self.inner_mesh),
            ]),
            Render::Outline(self.outlines.as_instanced(&self.edge_mesh)),
            Render::Glasses(vec![
                self.original_shell.as_instanced(&self.shell_mesh),
                self.filler_shell.as_instanced(&self.shell_mesh),
            ]),
        ])
    }
}
