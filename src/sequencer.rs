//! The two-phase construction sequencer.
//!
//! This module is the timing heart of the visualization and owns no GPU state
//! at all. A [`Sequencer`] is built from a shape, completes it into its
//! bounding cuboid and then drives two animation phases off the timestamps the
//! caller feeds into [`Sequencer::tick`]:
//!
//! 1. **Spawning**: every cube (originals first, then fillers) flies from a
//!    shared spawn origin to its grid position, at most one new cube per
//!    spawn-delay interval.
//! 2. **Layering**: once all cubes have settled, the filler cubes regroup by
//!    one axis into rows next to the shape, one layer at a time, and a
//!    completion event reports how many fillers the cuboid needed.
//!
//! All motion is a pure function of elapsed time relative to stored
//! timestamps, so a caller that stops ticking simply freezes the animation.
//! The renderer consumes the returned [`TickUpdate`] and never reaches into
//! sequencer state.

use cgmath::Vector3;
use instant::Duration;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::easing::{clamped_progress, ease_in_out_cubic, ease_out_cubic, lerp};
use crate::shape::{complete_shape, CompleteShape, Coordinate, ShapeError};

/// Which coordinate axis filler cubes are grouped by in the layering phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub fn component(self, c: Coordinate) -> i32 {
        match self {
            Axis::X => c.x,
            Axis::Y => c.y,
            Axis::Z => c.z,
        }
    }
}

/// Tunables for the construction animation.
///
/// The defaults match the construction demo: a cube every 100ms,
/// one-second flights, rows spaced 1.2 units apart starting at `(5, 0, 0)`,
/// spawns from `(5, 5, 5)`, layers grouped by height.
#[derive(Clone, Copy, Debug)]
pub struct SequencerConfig {
    /// Minimum time between two cube spawns.
    pub spawn_delay: Duration,
    /// Flight time of a single cube, in both phases.
    pub animation_duration: Duration,
    /// Distance between neighbouring cubes in a display row.
    pub line_spacing: f32,
    /// World position of the first cube of the first row.
    pub line_start: Vector3<f32>,
    /// Shared world position every cube spawns from.
    pub spawn_origin: Vector3<f32>,
    /// Axis the filler rows are grouped by.
    pub grouping_axis: Axis,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            spawn_delay: Duration::from_millis(100),
            animation_duration: Duration::from_millis(1000),
            line_spacing: 1.2,
            line_start: Vector3::new(5.0, 0.0, 0.0),
            spawn_origin: Vector3::new(5.0, 5.0, 5.0),
            grouping_axis: Axis::default(),
        }
    }
}

impl SequencerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_duration.is_zero() {
            return Err(ConfigError::ZeroAnimationDuration);
        }
        if !self.line_spacing.is_finite() {
            return Err(ConfigError::NonFinite("line_spacing"));
        }
        for (name, v) in [("line_start", self.line_start), ("spawn_origin", self.spawn_origin)] {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(ConfigError::NonFinite(name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Progress would divide by zero.
    #[error("animation duration must be non-zero")]
    ZeroAnimationDuration,
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One cube of the completed shape and its animation lifecycle.
///
/// Tasks are created up front and never destroyed; the optional timestamps
/// track which stage of its life a cube is in.
#[derive(Clone, Debug)]
struct CubeTask {
    grid: Coordinate,
    grid_world: Vector3<f32>,
    is_original: bool,
    /// Set once the spawn queue reaches this cube.
    spawned_at: Option<Duration>,
    /// Set when this cube's layer becomes the active one in phase 2.
    row_target: Option<Vector3<f32>>,
    row_started_at: Option<Duration>,
}

/// Filler cubes sharing one grouping-axis value, in completed-shape order.
#[derive(Clone, Debug)]
struct Layer {
    axis_value: i32,
    members: Vec<usize>,
}

/// Where the sequencer currently is in its fixed forward-only lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No tick seen yet.
    Idle,
    /// Cubes are still spawning or settling into the grid.
    Spawning,
    /// Filler layer `active` is sliding into its display row.
    Layering { active: usize },
    /// Everything has happened; further ticks only report resting frames.
    Complete,
}

/// Something the renderer should react to on this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A cube has entered the scene; `is_original` picks its material.
    TaskActivated { index: usize, is_original: bool },
    /// The whole sequence is finished. Fires exactly once per sequencer.
    SequenceComplete { filler_count: usize },
}

/// Render state of one visible cube.
#[derive(Clone, Copy, Debug)]
pub struct CubeFrame {
    /// Index into the completed shape.
    pub index: usize,
    pub position: Vector3<f32>,
    pub scale: f32,
    pub is_original: bool,
}

/// Everything a renderer needs from one tick.
#[derive(Clone, Debug, Default)]
pub struct TickUpdate {
    /// One frame per already-spawned cube, in completed-shape order.
    pub frames: Vec<CubeFrame>,
    pub events: Vec<SequencerEvent>,
}

#[derive(Debug)]
pub struct Sequencer {
    config: SequencerConfig,
    shape: CompleteShape,
    tasks: Vec<CubeTask>,
    layers: Vec<Layer>,
    phase: Phase,
    spawn_cursor: usize,
    last_spawn: Option<Duration>,
    last_now: Option<Duration>,
}

impl Sequencer {
    /// Build a sequencer for `shape`. The shape is completed eagerly, so the
    /// full task queue exists before the first tick.
    pub fn new(shape: &[Coordinate], config: SequencerConfig) -> Result<Self, SequencerError> {
        config.validate()?;
        let shape = complete_shape(shape)?;
        let tasks = shape
            .coordinates()
            .iter()
            .enumerate()
            .map(|(index, &grid)| CubeTask {
                grid,
                grid_world: grid.to_world(),
                is_original: shape.is_original(index),
                spawned_at: None,
                row_target: None,
                row_started_at: None,
            })
            .collect();
        Ok(Self {
            config,
            shape,
            tasks,
            layers: Vec::new(),
            phase: Phase::Idle,
            spawn_cursor: 0,
            last_spawn: None,
            last_now: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn filler_count(&self) -> usize {
        self.shape.filler_count()
    }

    pub fn complete_shape(&self) -> &CompleteShape {
        &self.shape
    }

    /// Advance the animation to `now` and report cube frames plus events.
    ///
    /// `now` is a monotonic offset from whatever epoch the caller picked (app
    /// start, typically). A regressing timestamp is clamped to the last seen
    /// value, which turns the offending tick into a time-stand-still.
    pub fn tick(&mut self, now: Duration) -> TickUpdate {
        let now = match self.last_now {
            Some(last) if now < last => {
                log::warn!("timestamp went backwards ({now:?} < {last:?}), clamping");
                last
            }
            _ => now,
        };
        self.last_now = Some(now);

        if self.phase == Phase::Idle {
            self.phase = Phase::Spawning;
        }

        let mut events = Vec::new();
        match self.phase {
            Phase::Spawning => {
                self.advance_spawn(now, &mut events);
                if self.settled(now) {
                    self.enter_layering(now, &mut events);
                }
            }
            Phase::Layering { active } => {
                if self.layer_finished(active, now) {
                    self.advance_layer(active, now, &mut events);
                }
            }
            Phase::Idle | Phase::Complete => {}
        }

        TickUpdate {
            frames: self.frames(now),
            events,
        }
    }

    /// Spawn at most one cube per tick, and only after the spawn delay has
    /// fully passed. There is deliberately no catch-up for slow frames.
    fn advance_spawn(&mut self, now: Duration, events: &mut Vec<SequencerEvent>) {
        if self.spawn_cursor >= self.tasks.len() {
            return;
        }
        let due = match self.last_spawn {
            // The very first spawn happens on the first tick.
            None => true,
            Some(last) => now - last > self.config.spawn_delay,
        };
        if !due {
            return;
        }
        let index = self.spawn_cursor;
        let task = &mut self.tasks[index];
        task.spawned_at = Some(now);
        self.last_spawn = Some(now);
        self.spawn_cursor += 1;
        events.push(SequencerEvent::TaskActivated {
            index,
            is_original: task.is_original,
        });
    }

    /// Phase-1 completion: every cube spawned and strictly past its flight
    /// time, so the grid has visibly held still for a moment.
    fn settled(&self, now: Duration) -> bool {
        self.spawn_cursor == self.tasks.len()
            && self
                .tasks
                .iter()
                .all(|task| match task.spawned_at {
                    Some(started) => now - started > self.config.animation_duration,
                    None => false,
                })
    }

    /// Group fillers into layers and start the first one, or finish outright
    /// when the shape was already a filled cuboid.
    fn enter_layering(&mut self, now: Duration, events: &mut Vec<SequencerEvent>) {
        let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (index, task) in self.tasks.iter().enumerate() {
            if !task.is_original {
                groups
                    .entry(self.config.grouping_axis.component(task.grid))
                    .or_default()
                    .push(index);
            }
        }
        self.layers = groups
            .into_iter()
            .map(|(axis_value, members)| Layer { axis_value, members })
            .collect();

        if self.layers.is_empty() {
            log::debug!("no filler cubes, construction complete");
            self.phase = Phase::Complete;
            events.push(SequencerEvent::SequenceComplete {
                filler_count: 0,
            });
            return;
        }

        log::debug!(
            "all cubes settled, sorting {} filler cubes into {} layers",
            self.filler_count(),
            self.layers.len()
        );
        self.activate_layer(0, now);
        self.phase = Phase::Layering { active: 0 };
    }

    /// Stamp row targets and start times for every member of layer `index`.
    fn activate_layer(&mut self, index: usize, now: Duration) {
        let members = self.layers[index].members.clone();
        log::debug!(
            "layer {} (axis value {}) starts with {} cubes",
            index,
            self.layers[index].axis_value,
            members.len()
        );
        for (j, task_index) in members.into_iter().enumerate() {
            let task = &mut self.tasks[task_index];
            task.row_target = Some(Vector3::new(
                self.config.line_start.x + j as f32 * self.config.line_spacing,
                self.config.line_start.y,
                self.config.line_start.z + index as f32 * self.config.line_spacing * 2.0,
            ));
            task.row_started_at = Some(now);
        }
    }

    /// A layer is done when every member has run out its full animation
    /// duration. Progress is clamped, so `>= 1` is the robust spelling of
    /// "arrived".
    fn layer_finished(&self, index: usize, now: Duration) -> bool {
        self.layers[index].members.iter().all(|&task_index| {
            let task = &self.tasks[task_index];
            match task.row_started_at {
                Some(started) => {
                    let elapsed = now - started;
                    clamped_progress(elapsed, self.config.animation_duration) >= 1.0
                        && elapsed >= self.config.animation_duration
                }
                None => false,
            }
        })
    }

    fn advance_layer(&mut self, finished: usize, now: Duration, events: &mut Vec<SequencerEvent>) {
        let next = finished + 1;
        if next < self.layers.len() {
            self.activate_layer(next, now);
            self.phase = Phase::Layering { active: next };
        } else {
            log::debug!(
                "all layers sorted, {} filler cubes counted",
                self.filler_count()
            );
            self.phase = Phase::Complete;
            events.push(SequencerEvent::SequenceComplete {
                filler_count: self.filler_count(),
            });
        }
    }

    /// Current position and scale of every spawned cube.
    fn frames(&self, now: Duration) -> Vec<CubeFrame> {
        let duration = self.config.animation_duration;
        self.tasks
            .iter()
            .enumerate()
            .filter_map(|(index, task)| {
                let spawned_at = task.spawned_at?;
                let frame = match (task.row_target, task.row_started_at) {
                    // Phase 2 (also holds finished layers at their rows,
                    // since progress stays clamped at 1).
                    (Some(row_target), Some(row_started)) => {
                        let t = ease_in_out_cubic(clamped_progress(
                            now - row_started,
                            duration,
                        ));
                        CubeFrame {
                            index,
                            position: lerp(task.grid_world, row_target, t),
                            scale: 1.0,
                            is_original: task.is_original,
                        }
                    }
                    // Phase 1. The position eases out but the scale-up is
                    // linear; the mismatch is intentional.
                    _ => {
                        let progress = clamped_progress(now - spawned_at, duration);
                        CubeFrame {
                            index,
                            position: lerp(
                                self.config.spawn_origin,
                                task.grid_world,
                                ease_out_cubic(progress),
                            ),
                            scale: progress,
                            is_original: task.is_original,
                        }
                    }
                };
                Some(frame)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn shape(raw: &[[i32; 3]]) -> Vec<Coordinate> {
        raw.iter().copied().map(Coordinate::from).collect()
    }

    fn sequencer(raw: &[[i32; 3]]) -> Sequencer {
        Sequencer::new(&shape(raw), SequencerConfig::default()).unwrap()
    }

    #[test]
    fn rejects_zero_animation_duration() {
        let config = SequencerConfig {
            animation_duration: Duration::ZERO,
            ..Default::default()
        };
        let err = Sequencer::new(&shape(&[[0, 0, 0]]), config).unwrap_err();
        assert!(matches!(
            err,
            SequencerError::Config(ConfigError::ZeroAnimationDuration)
        ));
    }

    #[test]
    fn rejects_empty_shape() {
        let err = Sequencer::new(&[], SequencerConfig::default()).unwrap_err();
        assert!(matches!(err, SequencerError::Shape(ShapeError::EmptyShape)));
    }

    #[test]
    fn first_tick_spawns_immediately() {
        let mut seq = sequencer(&[[0, 0, 0], [0, 2, 0]]);
        let update = seq.tick(ms(0));
        assert_eq!(
            update.events,
            vec![SequencerEvent::TaskActivated {
                index: 0,
                is_original: true
            }]
        );
        assert_eq!(update.frames.len(), 1);
        // At progress zero the cube sits at the spawn origin, scale zero.
        assert_eq!(update.frames[0].position, Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(update.frames[0].scale, 0.0);
    }

    #[test]
    fn at_most_one_spawn_per_tick() {
        let mut seq = sequencer(&[[0, 0, 0], [0, 2, 0]]);
        seq.tick(ms(0));
        // A huge gap still releases only one cube; no batch catch-up.
        let update = seq.tick(ms(10_000));
        let spawns = update
            .events
            .iter()
            .filter(|e| matches!(e, SequencerEvent::TaskActivated { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn spawn_interval_is_strict() {
        let mut seq = sequencer(&[[0, 0, 0], [0, 2, 0]]);
        seq.tick(ms(0));
        // Exactly spawn_delay later is not yet "more than" spawn_delay.
        assert!(seq.tick(ms(100)).events.is_empty());
        assert_eq!(seq.tick(ms(101)).events.len(), 1);
    }

    #[test]
    fn arrival_is_exact_at_full_duration() {
        let mut seq = sequencer(&[[0, 0, 0], [1, 0, 0]]);
        seq.tick(ms(0));
        let update = seq.tick(ms(1000));
        let frame = update.frames[0];
        assert_eq!(frame.position, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(frame.scale, 1.0);
    }

    #[test]
    fn filled_cuboid_completes_without_layering() {
        let mut seq = sequencer(&[[0, 0, 0], [1, 0, 0]]);
        seq.tick(ms(0));
        seq.tick(ms(150));
        // Both spawned; settle needs strictly more than a second after the
        // second spawn.
        assert_eq!(seq.phase(), Phase::Spawning);
        let update = seq.tick(ms(1200));
        assert_eq!(
            update.events,
            vec![SequencerEvent::SequenceComplete { filler_count: 0 }]
        );
        assert!(seq.is_complete());
        // And never again.
        assert!(seq.tick(ms(2000)).events.is_empty());
    }

    #[test]
    fn single_filler_forms_single_layer_and_reaches_row() {
        let mut seq = sequencer(&[[0, 0, 0], [0, 2, 0]]);
        let mut t = 0;
        // Drive until layering starts.
        while !matches!(seq.phase(), Phase::Layering { .. }) {
            seq.tick(ms(t));
            t += 50;
            assert!(t < 20_000, "sequencer never reached layering");
        }
        assert_eq!(seq.phase(), Phase::Layering { active: 0 });
        // The filler (grid y=1) slides to the first row slot.
        let update = seq.tick(ms(t + 1000));
        let filler = update
            .frames
            .iter()
            .find(|f| !f.is_original)
            .expect("filler frame");
        assert_eq!(filler.position, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn non_monotonic_now_is_clamped() {
        let mut seq = sequencer(&[[0, 0, 0], [0, 2, 0]]);
        seq.tick(ms(500));
        let forward = seq.tick(ms(600));
        let backward = seq.tick(ms(200));
        // The backwards tick behaves like time standing still at 600ms.
        assert_eq!(backward.frames[0].position, forward.frames[0].position);
        assert_eq!(backward.frames[0].scale, forward.frames[0].scale);
    }

    #[test]
    fn layers_advance_in_ascending_axis_order() {
        // A four-cube column with its middle missing: one-cube layers at
        // y = 1 and y = 2.
        let mut seq = sequencer(&[[0, 0, 0], [0, 3, 0]]);
        let mut t = 0;
        let mut completed = None;
        let mut first_layer_seen = false;
        while completed.is_none() {
            let update = seq.tick(ms(t));
            if let Phase::Layering { active } = seq.phase() {
                if active == 0 {
                    first_layer_seen = true;
                } else {
                    // Layer 1 only ever starts after layer 0.
                    assert!(first_layer_seen);
                }
            }
            for event in update.events {
                if let SequencerEvent::SequenceComplete { filler_count } = event {
                    completed = Some(filler_count);
                }
            }
            t += 50;
            assert!(t < 60_000, "sequence never completed");
        }
        assert_eq!(completed, Some(2));
    }
}
