/*
 * Flock Parameters Module
 *
 * This module defines the FlockParams struct that holds the tuning values
 * shared by every boid of one kind: perception radii, the propulsion model
 * and the steering budget with its per-channel strengths.
 *
 * Parameters are validated once when a simulation is built. The stepper
 * reads them every frame and never checks them again.
 */

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// Parameters for one kind of boid
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FlockParams {
    pub count: usize,
    pub sense_radius: f32,
    pub avoid_radius: f32,
    // Used directly as the cosine threshold angle, not halved
    pub sense_angle_deg: f32,
    pub speed_target: f32,
    pub accel: f32,
    pub maneuver_budget: f32,
    pub avoid_strength: f32,
    pub align_strength: f32,
    pub center_strength: f32,
    pub agent_size: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            count: 100,
            sense_radius: 25.0,
            avoid_radius: 5.0,
            sense_angle_deg: 360.0 - 70.0,
            speed_target: 25.0,
            accel: 25.0,
            maneuver_budget: 50.0,
            avoid_strength: 0.8,
            align_strength: 0.5,
            center_strength: 0.3,
            agent_size: 1.0,
        }
    }
}

impl FlockParams {
    // Quadratic drag, equal to `accel` exactly at `speed_target`
    #[inline]
    pub fn drag(&self, speed: f32) -> f32 {
        (self.accel / (self.speed_target * self.speed_target)) * (speed * speed)
    }

    // Minimum dot(heading, direction) for a neighbor to be sensed
    #[inline]
    pub fn sense_cos_theta(&self) -> f32 {
        self.sense_angle_deg.to_radians().cos()
    }

    // Check every value once before the parameters reach the stepper.
    // The returned error carries kind 0; callers re-tag it with `for_kind`.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("sense_radius", self.sense_radius),
            ("avoid_radius", self.avoid_radius),
            ("sense_angle_deg", self.sense_angle_deg),
            ("speed_target", self.speed_target),
            ("accel", self.accel),
            ("maneuver_budget", self.maneuver_budget),
            ("avoid_strength", self.avoid_strength),
            ("align_strength", self.align_strength),
            ("center_strength", self.center_strength),
            ("agent_size", self.agent_size),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, value, "must be finite"));
            }
        }

        for (field, value) in [
            ("sense_radius", self.sense_radius),
            ("speed_target", self.speed_target),
            ("agent_size", self.agent_size),
        ] {
            if value <= 0.0 {
                return Err(invalid(field, value, "must be positive"));
            }
        }

        for (field, value) in [
            ("avoid_radius", self.avoid_radius),
            ("accel", self.accel),
            ("maneuver_budget", self.maneuver_budget),
        ] {
            if value < 0.0 {
                return Err(invalid(field, value, "must not be negative"));
            }
        }

        let strengths = Self::strength_range();
        for (field, value) in [
            ("avoid_strength", self.avoid_strength),
            ("align_strength", self.align_strength),
            ("center_strength", self.center_strength),
        ] {
            if !strengths.contains(&value) {
                return Err(invalid(field, value, "must be within [0, 1]"));
            }
        }

        Ok(())
    }

    // Valid range for the three channel strengths
    pub fn strength_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }
}

fn invalid(field: &'static str, value: f32, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParam {
        kind: 0,
        field,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_matches_accel_at_target_speed() {
        let params = FlockParams::default();
        assert!((params.drag(params.speed_target) - params.accel).abs() < 1e-4);
        assert_eq!(params.drag(0.0), 0.0);
        assert!(params.drag(2.0 * params.speed_target) > params.accel);
    }

    #[test]
    fn sense_angle_is_used_literally() {
        let params = FlockParams::default();
        // cos(290 deg) == cos(70 deg)
        let expected = 70f32.to_radians().cos();
        assert!((params.sense_cos_theta() - expected).abs() < 1e-6);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(FlockParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_strength_out_of_range() {
        let params = FlockParams {
            align_strength: 1.5,
            ..FlockParams::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParam {
                field: "align_strength",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_speed_target() {
        let params = FlockParams {
            speed_target: 0.0,
            ..FlockParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        let params = FlockParams {
            maneuver_budget: f32::INFINITY,
            ..FlockParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_avoid_radius_is_allowed() {
        let params = FlockParams {
            avoid_radius: 0.0,
            ..FlockParams::default()
        };
        assert!(params.validate().is_ok());
    }
}
