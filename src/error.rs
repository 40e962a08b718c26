/*
 * Error Module
 *
 * This module defines the errors produced while loading and validating a
 * simulation configuration. The simulation step itself cannot fail, so
 * everything that can go wrong is caught once, before a Simulation is built.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this simulation
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A flock parameter is outside its valid range
    #[error("kind {kind}: invalid {field} = {value} ({reason})")]
    InvalidParam {
        kind: usize,
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// Every domain axis must be finite and strictly positive
    #[error("invalid domain size component {value}")]
    InvalidDomain { value: f32 },

    /// A simulation needs at least one kind of boid
    #[error("config declares no boid kinds")]
    NoKinds,
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Attaches the kind index to a parameter error raised without one.
    #[must_use]
    pub fn for_kind(self, index: usize) -> Self {
        match self {
            Self::InvalidParam {
                field,
                value,
                reason,
                ..
            } => Self::InvalidParam {
                kind: index,
                field,
                value,
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidParam {
            kind: 2,
            field: "sense_radius",
            value: -1.0,
            reason: "must be positive",
        };
        assert_eq!(
            err.to_string(),
            "kind 2: invalid sense_radius = -1 (must be positive)"
        );
    }

    #[test]
    fn test_for_kind_rewrites_index() {
        let err = ConfigError::InvalidParam {
            kind: 0,
            field: "accel",
            value: f32::NAN,
            reason: "must be finite",
        }
        .for_kind(3);
        assert!(matches!(err, ConfigError::InvalidParam { kind: 3, .. }));
    }

    #[test]
    fn test_for_kind_keeps_other_variants() {
        let err = ConfigError::NoKinds.for_kind(1);
        assert!(matches!(err, ConfigError::NoKinds));
    }
}
