/*
 * Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the flocking simulation core.
 * The core is generic over the vector type, so the same stepper runs 2D
 * (glam::Vec2) and 3D (glam::Vec3) worlds.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use config::SimulationConfig;
pub use debug::DebugInfo;
pub use error::ConfigError;
pub use params::FlockParams;
pub use physics::FlockStepper;
pub use simulation::Simulation;
pub use spatial_grid::SpatialGrid;
pub use vector::FlockVector;
pub use world::{Kind, KindId, World};

// Define modules
pub mod boid;
pub mod config;
pub mod debug;
pub mod error;
pub mod params;
pub mod physics;
pub mod simulation;
pub mod spatial_grid;
pub mod vector;
pub mod world;

// Constants
pub const DEFAULT_WORLD_SIZE: f32 = 100.0;
