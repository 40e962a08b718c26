/*
 * Configuration Module
 *
 * This module defines SimulationConfig, which maps onto a TOML file. Every
 * field has a default, so a config only needs to name what it changes. A
 * missing `kinds` table yields one kind with default parameters.
 *
 * Example flock.toml:
 *
 *     seed = 1
 *     domain_size = [100.0, 100.0]
 *     parallel = false
 *     spatial_grid = false
 *
 *     [[kinds]]
 *     count = 100
 *     sense_radius = 25.0
 *     avoid_radius = 5.0
 *     sense_angle_deg = 290.0
 *     avoid_strength = 0.8
 *     align_strength = 0.5
 *     center_strength = 0.3
 *
 * The length of `domain_size` must match the dimension of the simulation
 * the config is loaded for.
 */

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::params::FlockParams;
use crate::vector::FlockVector;
use crate::DEFAULT_WORLD_SIZE;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, bound(deserialize = "V: FlockVector + Deserialize<'de>"))]
pub struct SimulationConfig<V> {
    /// Seed for the random stream used to spawn boids.
    pub seed: u64,
    pub domain_size: V,
    pub parallel: bool,
    pub spatial_grid: bool,
    pub kinds: Vec<FlockParams>,
}

impl<V: FlockVector> Default for SimulationConfig<V> {
    fn default() -> Self {
        Self {
            seed: 1,
            domain_size: V::splat(DEFAULT_WORLD_SIZE),
            parallel: false,
            spatial_grid: false,
            kinds: vec![FlockParams::default()],
        }
    }
}

impl<V: FlockVector> SimulationConfig<V> {
    /// Checks the domain and every kind's parameters.
    pub fn validate(&self) -> Result<()> {
        let axes = self.domain_size.axes();
        for &value in &axes[..V::DIM] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDomain { value });
            }
        }

        if self.kinds.is_empty() {
            return Err(ConfigError::NoKinds);
        }

        for (index, params) in self.kinds.iter().enumerate() {
            params.validate().map_err(|err| err.for_kind(index))?;
        }

        Ok(())
    }
}

impl<V: FlockVector + DeserializeOwned> SimulationConfig<V> {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(
            path = %path.display(),
            kinds = config.kinds.len(),
            "loaded simulation config"
        );
        Ok(config)
    }
}
