//! Steering helpers layered on top of [Vec2].
//!
//! Vectors are values, each method returns a new vector and callers rebind:
//!
//! ```rust
//! use bevy::prelude::*;
//! use bevy_flocking_goals_plugin::prelude::*;
//! let v = Vec2::new(3.0, 4.0).set_magnitude(10.0).limit_max(5.0);
//! assert!((v.length() - 5.0).abs() < 0.0001);
//! ```
//!

use bevy::prelude::*;
use rand::Rng;

/// Operations used when accumulating and limiting steering forces
pub trait SteeringVector: Sized {
	/// `self + other * scalar`
	fn scaled_add(self, other: Self, scalar: f32) -> Self;
	/// Normalise then scale to `magnitude`. A zero vector stays zero
	fn set_magnitude(self, magnitude: f32) -> Self;
	/// Clamp the length to at most `max`
	fn limit_max(self, max: f32) -> Self;
	/// Clamp the length to at least `min`. A zero vector has no direction to scale so it is
	/// reseeded to a random heading with length `min`
	fn limit_min<R: Rng + ?Sized>(self, min: f32, rng: &mut R) -> Self;
	/// Rotate anti-clockwise by `angle` radians
	fn rotated(self, angle: f32) -> Self;
	/// Angle of the vector in radians measured from the positive x-axis
	fn heading(self) -> f32;
	/// A vector pointing in a uniformly random direction with length `magnitude`
	fn random_unit<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> Self;
}

impl SteeringVector for Vec2 {
	fn scaled_add(self, other: Self, scalar: f32) -> Self {
		self + other * scalar
	}
	fn set_magnitude(self, magnitude: f32) -> Self {
		self.normalize_or_zero() * magnitude
	}
	fn limit_max(self, max: f32) -> Self {
		self.clamp_length_max(max.max(0.0))
	}
	fn limit_min<R: Rng + ?Sized>(self, min: f32, rng: &mut R) -> Self {
		let length_squared = self.length_squared();
		if length_squared == 0.0 {
			Vec2::random_unit(rng, min)
		} else if length_squared < min * min {
			self.set_magnitude(min)
		} else {
			self
		}
	}
	fn rotated(self, angle: f32) -> Self {
		Vec2::from_angle(angle).rotate(self)
	}
	fn heading(self) -> f32 {
		self.y.atan2(self.x)
	}
	fn random_unit<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> Self {
		let angle = rng.random_range(0.0..std::f32::consts::TAU);
		Vec2::from_angle(angle) * magnitude
	}
}
