/*
 * Vector Module
 *
 * This module defines the FlockVector trait, the small set of vector
 * operations the simulation needs. It is implemented for glam's Vec2 and
 * Vec3 so the same world and stepper code runs in two or three dimensions.
 */

use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

pub trait FlockVector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + Neg<Output = Self>
    + AddAssign
{
    /// Number of spatial axes.
    const DIM: usize;
    const ZERO: Self;
    /// Heading given to freshly spawned boids.
    const FORWARD: Self;

    fn splat(value: f32) -> Self;
    fn dot(self, rhs: Self) -> f32;
    fn length(self) -> f32;
    fn lerp(self, rhs: Self, s: f32) -> Self;
    fn normalize_or_zero(self) -> Self;
    fn mul_elementwise(self, rhs: Self) -> Self;
    fn is_finite(self) -> bool;

    // Components padded with zeros up to three axes
    fn axes(self) -> [f32; 3];

    // Componentwise toroidal wrap into [0, bounds)
    fn wrap(self, bounds: Self) -> Self;

    // Uniformly distributed direction on the unit circle/sphere
    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self;

    // Each component uniform in [0, 1)
    fn random_unit_box<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

// Wrap a single coordinate into [0, size).
// `%` keeps the sign of the dividend, so negative remainders are shifted up
// by one period. A tiny negative remainder can round up to exactly `size`
// in f32, which belongs to the opposite edge.
#[inline]
pub fn wrap_axis(value: f32, size: f32) -> f32 {
    let mut wrapped = value % size;
    if wrapped < 0.0 {
        wrapped += size;
    }
    if wrapped >= size {
        0.0
    } else {
        wrapped
    }
}

impl FlockVector for Vec2 {
    const DIM: usize = 2;
    const ZERO: Self = Vec2::new(0.0, 0.0);
    const FORWARD: Self = Vec2::new(0.0, 1.0);

    #[inline]
    fn splat(value: f32) -> Self {
        Vec2::new(value, value)
    }

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        Vec2::dot(self, rhs)
    }

    #[inline]
    fn length(self) -> f32 {
        Vec2::length(self)
    }

    #[inline]
    fn lerp(self, rhs: Self, s: f32) -> Self {
        Vec2::lerp(self, rhs, s)
    }

    #[inline]
    fn normalize_or_zero(self) -> Self {
        Vec2::normalize_or_zero(self)
    }

    #[inline]
    fn mul_elementwise(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline]
    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }

    #[inline]
    fn axes(self) -> [f32; 3] {
        [self.x, self.y, 0.0]
    }

    #[inline]
    fn wrap(self, bounds: Self) -> Self {
        Vec2::new(wrap_axis(self.x, bounds.x), wrap_axis(self.y, bounds.y))
    }

    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let angle = rng.gen::<f32>() * TAU;
        Vec2::new(angle.cos(), angle.sin())
    }

    fn random_unit_box<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let x = rng.gen::<f32>();
        let y = rng.gen::<f32>();
        Vec2::new(x, y)
    }
}

impl FlockVector for Vec3 {
    const DIM: usize = 3;
    const ZERO: Self = Vec3::new(0.0, 0.0, 0.0);
    const FORWARD: Self = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    fn splat(value: f32) -> Self {
        Vec3::new(value, value, value)
    }

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        Vec3::dot(self, rhs)
    }

    #[inline]
    fn length(self) -> f32 {
        Vec3::length(self)
    }

    #[inline]
    fn lerp(self, rhs: Self, s: f32) -> Self {
        Vec3::lerp(self, rhs, s)
    }

    #[inline]
    fn normalize_or_zero(self) -> Self {
        Vec3::normalize_or_zero(self)
    }

    #[inline]
    fn mul_elementwise(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline]
    fn is_finite(self) -> bool {
        Vec3::is_finite(self)
    }

    #[inline]
    fn axes(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    fn wrap(self, bounds: Self) -> Self {
        Vec3::new(
            wrap_axis(self.x, bounds.x),
            wrap_axis(self.y, bounds.y),
            wrap_axis(self.z, bounds.z),
        )
    }

    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Uniform height plus uniform azimuth gives a uniform sphere point
        let z = rng.gen::<f32>() * 2.0 - 1.0;
        let angle = rng.gen::<f32>() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * angle.cos(), r * angle.sin(), z)
    }

    fn random_unit_box<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let x = rng.gen::<f32>();
        let y = rng.gen::<f32>();
        let z = rng.gen::<f32>();
        Vec3::new(x, y, z)
    }
}
