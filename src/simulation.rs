/*
 * Simulation Module
 *
 * This module defines the Simulation struct that drives a world frame by
 * frame. It owns the world, the stepper, the seeded random stream used for
 * spawning and the diagnostics of the last frame.
 *
 * Each frame:
 * - Reconciles every kind to its configured count
 * - Steps every kind once with the given dt
 *
 * Given the same config and dt sequence, two simulations produce identical
 * trajectories regardless of the parallel and spatial grid settings.
 */

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::boid::Boid;
use crate::config::SimulationConfig;
use crate::debug::DebugInfo;
use crate::error::Result;
use crate::physics::FlockStepper;
use crate::vector::FlockVector;
use crate::world::World;

pub struct Simulation<V> {
    pub world: World<V>,
    pub stepper: FlockStepper<V>,
    pub debug_info: DebugInfo,
    rng: ChaCha8Rng,
    frame: u64,
}

impl<V: FlockVector> Simulation<V> {
    // Validate a config and build an empty world from it. Boids are spawned
    // by the first update.
    pub fn new(config: &SimulationConfig<V>) -> Result<Self> {
        config.validate()?;

        let world = World::with_kinds(config.domain_size, config.kinds.iter().cloned());
        let stepper = FlockStepper::with_modes(config.parallel, config.spatial_grid);

        tracing::info!(
            dimensions = V::DIM,
            kinds = config.kinds.len(),
            seed = config.seed,
            parallel = config.parallel,
            spatial_grid = config.spatial_grid,
            "created simulation"
        );

        Ok(Self {
            world,
            stepper,
            debug_info: DebugInfo::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            frame: 0,
        })
    }

    // Advance one frame
    pub fn update(&mut self, dt: f32) -> DebugInfo {
        self.world.reconcile_all(&mut self.rng);
        self.debug_info = self.stepper.step(&mut self.world, dt);
        self.frame += 1;

        tracing::debug!(
            frame = self.frame,
            boids = self.debug_info.boids,
            sensed_pairs = self.debug_info.sensed_pairs,
            avoiding_pairs = self.debug_info.avoiding_pairs,
            saturated = self.debug_info.saturated_boids,
            "stepped frame"
        );

        self.debug_info
    }

    // Clear every boid; the next update respawns them from the same random
    // stream, which is not rewound
    pub fn reset(&mut self) {
        self.world.reset();
        self.debug_info = DebugInfo::default();
        tracing::info!(frame = self.frame, "reset simulation");
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn agents(&self) -> &[Boid<V>] {
        self.world.agents()
    }
}
