//! Useful structures and tools used by the fields and agents
//!

use bevy::prelude::*;

/// Substituted for any distance that could be exactly zero before it is used as a divisor
pub const DISTANCE_EPSILON: f32 = 0.00001;
/// Returned by [crate::prelude::WallMap::random_free_position] when sampling fails to find an open cell
pub const FALLBACK_FREE_POSITION: Vec2 = Vec2::new(35.0, 100.0);
/// Number of rejection samples attempted before using [FALLBACK_FREE_POSITION]
pub const MAX_FREE_POSITION_ATTEMPTS: usize = 10;
/// Multiplier applied to the explosion strength every tick
pub const EXPLOSION_DECAY: f32 = 0.9;
/// Once the explosion strength drops to or below this it is reset to zero
pub const EXPLOSION_CUTOFF: f32 = 0.001;
/// Numerator of the pointer falloff, divided by the squared distance to the pointer
pub const POINTER_FALLOFF: f32 = 10000.0;
/// Numerator of the explosion falloff, scaled by the explosion strength
pub const EXPLOSION_FALLOFF: f32 = 100000.0;
/// Upper bound on the samples taken along a single raycast
pub const MAX_RAYCAST_STEPS: usize = 4096;
/// Upper bound on the rotations tried while searching for a clear heading
pub const MAX_AVOIDANCE_STEPS: usize = 1024;

/// Convenience way of accessing the 4 sides of a grid cell in a [crate::prelude::ForceField]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Reflect)]
pub enum Cardinal {
	North,
	East,
	South,
	West,
}

impl Cardinal {
	/// Every direction in the order neighbours are explored
	pub const ALL: [Cardinal; 4] = [
		Cardinal::North,
		Cardinal::East,
		Cardinal::South,
		Cardinal::West,
	];
	/// Grid `(column, row)` offset of the direction. Rows increase downwards so north is a negative row step
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Cardinal::North => (0, -1),
			Cardinal::East => (1, 0),
			Cardinal::South => (0, 1),
			Cardinal::West => (-1, 0),
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn cardinal_order() {
		let result = Cardinal::ALL;
		let actual = [Cardinal::North, Cardinal::East, Cardinal::South, Cardinal::West];
		assert_eq!(actual, result);
	}
	#[test]
	fn north_offset_is_negative_row() {
		let result = Cardinal::North.offset();
		let actual = (0, -1);
		assert_eq!(actual, result);
	}
	#[test]
	fn opposite_offsets_cancel() {
		let pairs = [
			(Cardinal::North, Cardinal::South),
			(Cardinal::East, Cardinal::West),
		];
		for (a, b) in pairs {
			let (a, b) = (a.offset(), b.offset());
			assert_eq!((0, 0), (a.0 + b.0, a.1 + b.1));
		}
	}
}
