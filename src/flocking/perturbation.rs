//! Outside influences on the flock. Holding the pointer down attracts or repels agents and an
//! explosion pushes every agent away from a point with a strength that decays each tick.
//!
//! Capturing input is left to the application, which drives [Perturbations] through
//! [crate::prelude::EventPerturb].
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Whether the pointer pulls agents in or pushes them away
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PointerMode {
	Attract,
	Repel,
}

/// Current pointer and explosion state
#[derive(Resource, Debug, Default, Clone, PartialEq, Reflect)]
pub struct Perturbations {
	/// Position and mode of the pointer while it is held down over the world
	pointer: Option<(Vec2, PointerMode)>,
	/// Strength of the active explosion, `0` when none is active
	explosion_strength: f32,
	/// Centre of the most recent explosion
	explosion_position: Vec2,
}

impl Perturbations {
	/// Pointer pressed or moved while pressed
	pub fn set_pointer(&mut self, position: Vec2, mode: PointerMode) {
		self.pointer = Some((position, mode));
	}
	/// Pointer released or left the world
	pub fn clear_pointer(&mut self) {
		self.pointer = None;
	}
	pub fn get_pointer(&self) -> Option<(Vec2, PointerMode)> {
		self.pointer
	}
	/// Start an explosion at full strength
	pub fn trigger_explosion(&mut self, position: Vec2) {
		self.explosion_strength = 1.0;
		self.explosion_position = position;
	}
	pub fn get_explosion_strength(&self) -> f32 {
		self.explosion_strength
	}
	pub fn get_explosion_position(&self) -> Vec2 {
		self.explosion_position
	}
	/// Whether an explosion currently affects agents
	pub fn is_exploding(&self) -> bool {
		self.explosion_strength > EXPLOSION_CUTOFF
	}
	/// Weaken the explosion by one tick, once it is negligible it ends
	pub fn decay_explosion(&mut self) {
		if self.is_exploding() {
			self.explosion_strength *= EXPLOSION_DECAY;
		} else {
			self.explosion_strength = 0.0;
		}
	}
	/// Combined pointer and explosion force on an agent at `position`
	pub fn force_on(&self, position: Vec2, config: &FlockConfig) -> Vec2 {
		let limit = config.pointer_force();
		let mut force = Vec2::ZERO;
		if let Some((pointer, mode)) = self.pointer {
			let d = pointer.distance_squared(position).max(1.0);
			let pull = (pointer - position)
				.set_magnitude(POINTER_FALLOFF / d)
				.limit_max(limit);
			match mode {
				PointerMode::Attract => force += pull,
				PointerMode::Repel => force -= pull,
			}
		}
		if self.is_exploding() {
			let d = self.explosion_position.distance_squared(position).max(1.0);
			let push = (self.explosion_position - position)
				.set_magnitude(self.explosion_strength * EXPLOSION_FALLOFF / d)
				.limit_max(limit * 3.0);
			force -= push;
		}
		force
	}
}
