/*
 * Boid Module
 *
 * This module defines the Boid struct and its per-frame behavior.
 * Each boid is driven by:
 * 1. Propulsion: constant forward thrust opposed by quadratic drag
 * 2. Avoidance: strong repulsion from neighbors inside the avoid radius
 * 3. Alignment: match the velocity of sensed neighbors
 * 4. Cohesion: steer towards the weighted center of sensed neighbors
 *
 * The three steering channels share a maneuver budget, claimed in the
 * order avoidance, alignment, cohesion.
 */

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::params::FlockParams;
use crate::vector::FlockVector;

// Below this dot product between old and new heading the turn is blended
const HEADING_SNAP_DOT: f32 = 0.2;
const HEADING_BLEND: f32 = 0.05;

// Fraction of the target speed a spawned boid may start with
const SPAWN_SPEED_FRACTION: f32 = 0.2;

// Avoidance falloff 1/(d + OFFSET) - BIAS, roughly zero at the avoid radius
const AVOID_FALLOFF_OFFSET: f32 = 0.2;
const AVOID_FALLOFF_BIAS: f32 = 0.83;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boid<V> {
    pub position: V,
    pub velocity: V,
    /// Smoothed unit travel direction, decoupled from the instantaneous
    /// velocity so rapid velocity flips do not make the boid spin.
    pub heading: V,
    pub size: f32,
    // Last steering contributions, kept for inspection only
    pub last_avoid: V,
    pub last_align: V,
    pub last_center: V,
    // Cosmetic value for the presentation layer, never read here
    pub color_tag: f32,
}

// The part of a boid its neighbors read during a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics<V> {
    pub position: V,
    pub velocity: V,
}

// Raw channel sums from one neighbor scan
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NeighborSums<V> {
    pub avoid: V,
    pub align: V,
    pub center: V,
    pub sensed: usize,
    pub avoiding: usize,
}

// Steering after budget allocation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering<V> {
    pub avoid: V,
    pub align: V,
    pub center: V,
    // True when the budget cut at least one channel short
    pub saturated: bool,
}

impl<V: FlockVector> Steering<V> {
    #[inline]
    pub fn total(&self) -> V {
        self.avoid + self.align + self.center
    }
}

impl<V: FlockVector> Boid<V> {
    pub fn new(position: V, velocity: V, size: f32) -> Self {
        Self {
            position,
            velocity,
            heading: V::FORWARD,
            size,
            last_avoid: V::ZERO,
            last_align: V::ZERO,
            last_center: V::ZERO,
            color_tag: 0.0,
        }
    }

    // Create a boid at a random spot in the domain with a slow random velocity.
    // Draw order: position axes, direction, speed fraction, color tag.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, domain_size: V, params: &FlockParams) -> Self {
        let unit = V::random_unit_box(rng);
        let position = unit.mul_elementwise(domain_size);
        let direction = V::random_unit(rng);
        let magnitude = rng.gen::<f32>();
        let velocity = direction * magnitude * SPAWN_SPEED_FRACTION * params.speed_target;
        let color_tag = rng.gen::<f32>();

        Self {
            color_tag,
            ..Self::new(position, velocity, params.agent_size)
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn kinematics(&self) -> Kinematics<V> {
        Kinematics {
            position: self.position,
            velocity: self.velocity,
        }
    }

    // Follow the velocity direction, but blend slowly through sharp reversals
    pub fn update_heading(&mut self, speed: f32) {
        // Never normalize a zero velocity
        if speed == 0.0 {
            return;
        }

        let candidate = self.velocity / speed;

        if candidate.dot(self.heading) < HEADING_SNAP_DOT {
            let blended = self.heading.lerp(candidate, HEADING_BLEND).normalize_or_zero();
            if blended != V::ZERO {
                self.heading = blended;
            }
        } else {
            self.heading = candidate;
        }
    }

    // Always accelerate forward; drag limits the speed
    #[inline]
    pub fn propulsion(&self, speed: f32, params: &FlockParams) -> V {
        self.heading * (params.accel - params.drag(speed))
    }

    // Scan the candidate neighbors and accumulate the three channels.
    // `index` is this boid's slot in `others` and is skipped.
    pub fn sense<I>(
        &self,
        index: usize,
        others: &[Kinematics<V>],
        candidates: I,
        params: &FlockParams,
    ) -> NeighborSums<V>
    where
        I: IntoIterator<Item = usize>,
    {
        let sense_cos_theta = params.sense_cos_theta();
        let radius = params.sense_radius * self.size;
        let avoid_radius = params.avoid_radius * self.size;

        let mut sums = NeighborSums {
            avoid: V::ZERO,
            align: V::ZERO,
            center: V::ZERO,
            sensed: 0,
            avoiding: 0,
        };

        for j in candidates {
            if j == index {
                continue;
            }
            let other = &others[j];

            let offset = other.position - self.position;
            let distance = offset.length();
            let direction = if distance != 0.0 {
                offset / distance
            } else {
                V::ZERO
            };

            // Outside the sense radius or behind the field of view
            if distance > radius || self.heading.dot(direction) < sense_cos_theta {
                continue;
            }

            // Quadratic falloff, 1 at contact and 0 at the sense radius
            let sensitivity = {
                let s = 1.0 - distance / radius;
                s * s
            };

            if avoid_radius > 0.0 && distance <= avoid_radius {
                let d = distance / avoid_radius;
                let strength = 1.0 / (d + AVOID_FALLOFF_OFFSET) - AVOID_FALLOFF_BIAS;
                sums.avoid += -direction * strength;
                sums.avoiding += 1;
            }

            sums.align += (other.velocity - self.velocity) * sensitivity;
            sums.center += offset * sensitivity;
            sums.sensed += 1;
        }

        // Avoidance stays a raw sum; the other two are averaged
        if sums.sensed > 0 {
            let count = sums.sensed as f32;
            sums.align = sums.align / count;
            sums.center = sums.center / count;
        }

        sums
    }

    // Advance velocity and position by one step and wrap into the domain
    #[inline]
    pub fn integrate(&mut self, acceleration: V, dt: f32, domain_size: V) {
        self.velocity += acceleration * dt;
        self.position = (self.position + self.velocity * dt).wrap(domain_size);
    }

    #[inline]
    pub fn record(&mut self, steering: &Steering<V>) {
        self.last_avoid = steering.avoid;
        self.last_align = steering.align;
        self.last_center = steering.center;
    }
}

// Scale the channels by their strengths and share the maneuver budget between
// them in priority order. The summed magnitudes never exceed the budget.
pub fn allocate_budget<V: FlockVector>(sums: &NeighborSums<V>, params: &FlockParams) -> Steering<V> {
    let budget = params.maneuver_budget;
    let mut remaining = budget;

    let avoid = sums.avoid * params.avoid_strength * budget;
    let align = sums.align * params.align_strength * budget;
    let center = sums.center * params.center_strength * budget;

    let (avoid, avoid_cut) = claim(avoid, &mut remaining);
    let (align, align_cut) = claim(align, &mut remaining);
    let (center, center_cut) = claim(center, &mut remaining);

    Steering {
        avoid,
        align,
        center,
        saturated: avoid_cut || align_cut || center_cut,
    }
}

// Clamp one channel to what is left of the budget, keeping its direction
#[inline]
fn claim<V: FlockVector>(channel: V, remaining: &mut f32) -> (V, bool) {
    let length = channel.length();
    let magnitude = length.min(*remaining);
    *remaining -= magnitude;
    (channel.normalize_or_zero() * magnitude, magnitude < length)
}
