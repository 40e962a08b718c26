/*
 * Physics Module
 *
 * This module advances the flock by one time step. For every boid it
 * updates the heading, applies propulsion and drag, scans neighbors for the
 * avoidance/alignment/cohesion channels, spends the maneuver budget, then
 * integrates and wraps.
 *
 * Every boid reads a snapshot of positions and velocities taken at the start
 * of the step and writes only its own slot, so the result does not depend on
 * update order. That makes the following interchangeable, bit for bit:
 * - Sequential or parallel (rayon) processing
 * - Brute-force neighbor scan or spatial grid candidates
 */

use rayon::prelude::*;

use crate::boid::{allocate_budget, Boid, Kinematics};
use crate::debug::DebugInfo;
use crate::params::FlockParams;
use crate::spatial_grid::SpatialGrid;
use crate::vector::FlockVector;
use crate::world::{KindId, World};

pub struct FlockStepper<V> {
    pub parallel: bool,
    pub spatial_grid: bool,
    // Scratch buffers reused across frames
    snapshot: Vec<Kinematics<V>>,
    grid: SpatialGrid,
    // One grid candidate list per parallel chunk
    candidates: Vec<Vec<usize>>,
}

impl<V: FlockVector> Default for FlockStepper<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: FlockVector> FlockStepper<V> {
    pub fn new() -> Self {
        Self::with_modes(false, false)
    }

    pub fn with_modes(parallel: bool, spatial_grid: bool) -> Self {
        Self {
            parallel,
            spatial_grid,
            snapshot: Vec::new(),
            grid: SpatialGrid::new(),
            candidates: Vec::new(),
        }
    }

    // Step every kind with its own parameters. Kinds do not sense each other.
    pub fn step(&mut self, world: &mut World<V>, dt: f32) -> DebugInfo {
        let mut info = DebugInfo::default();
        for index in 0..world.kinds().len() {
            info = info.merge(self.step_kind(world, KindId::new(index), dt));
        }
        info
    }

    pub fn step_kind(&mut self, world: &mut World<V>, kind: KindId, dt: f32) -> DebugInfo {
        let domain_size = world.domain_size();
        let (params, boids) = world.kind_parts_mut(kind);

        // Freeze the start-of-step state every boid reads from
        self.snapshot.clear();
        self.snapshot.extend(boids.iter().map(Boid::kinematics));

        let grid = if self.spatial_grid && !boids.is_empty() {
            // Cell size must cover the largest scaled sense radius
            let max_size = boids.iter().map(|boid| boid.size).fold(0.0f32, f32::max);
            let radius = params.sense_radius * max_size;
            self.grid.rebuild(
                self.snapshot.iter().map(|k| k.position),
                radius,
                domain_size,
            );
            Some(&self.grid)
        } else {
            None
        };

        let snapshot = self.snapshot.as_slice();

        if self.parallel {
            // Process boids in chunks to reduce synchronization overhead
            let chunk_size = std::cmp::max(boids.len() / rayon::current_num_threads(), 1);
            let chunk_count = boids.len().div_ceil(chunk_size);
            if self.candidates.len() < chunk_count {
                self.candidates.resize_with(chunk_count, Vec::new);
            }

            let info = boids
                .par_chunks_mut(chunk_size)
                .zip(self.candidates.par_iter_mut())
                .enumerate()
                .map(|(chunk_idx, (boid_chunk, candidates))| {
                    let mut info = DebugInfo::default();
                    for (i_in_chunk, boid) in boid_chunk.iter_mut().enumerate() {
                        let i = chunk_idx * chunk_size + i_in_chunk;
                        info = info.merge(advance_boid(
                            i,
                            boid,
                            snapshot,
                            grid,
                            candidates,
                            params,
                            domain_size,
                            dt,
                        ));
                    }
                    info
                })
                .reduce(DebugInfo::default, DebugInfo::merge);

            DebugInfo { chunk_size, ..info }
        } else {
            if self.candidates.is_empty() {
                self.candidates.push(Vec::new());
            }
            let candidates = &mut self.candidates[0];
            let mut info = DebugInfo::default();
            for (i, boid) in boids.iter_mut().enumerate() {
                info = info.merge(advance_boid(
                    i,
                    boid,
                    snapshot,
                    grid,
                    candidates,
                    params,
                    domain_size,
                    dt,
                ));
            }
            info
        }
    }
}

// Full update of a single boid against the frozen snapshot
#[allow(clippy::too_many_arguments)]
fn advance_boid<V: FlockVector>(
    index: usize,
    boid: &mut Boid<V>,
    snapshot: &[Kinematics<V>],
    grid: Option<&SpatialGrid>,
    candidates: &mut Vec<usize>,
    params: &FlockParams,
    domain_size: V,
    dt: f32,
) -> DebugInfo {
    let speed = boid.speed();
    boid.update_heading(speed);

    let propulsion = boid.propulsion(speed, params);

    let sums = match grid {
        Some(grid) => {
            grid.gather(boid.position, candidates);
            boid.sense(index, snapshot, candidates.iter().copied(), params)
        }
        None => boid.sense(index, snapshot, 0..snapshot.len(), params),
    };

    let steering = allocate_budget(&sums, params);

    boid.integrate(propulsion + steering.total(), dt, domain_size);
    boid.record(&steering);

    DebugInfo {
        boids: 1,
        sensed_pairs: sums.sensed,
        avoiding_pairs: sums.avoiding,
        saturated_boids: usize::from(steering.saturated),
        chunk_size: 0,
    }
}
