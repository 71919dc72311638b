//! Tuning of the simulation. All rates are expressed per tick, the plugin converts frame time into
//! ticks with [FlockConfig::ticks_per_second] so the defaults behave the same at any frame rate
//!

use crate::prelude::*;
use bevy::prelude::*;

/// What happens to an agent which leaves the world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BoundaryPolicy {
	/// Invert the offending velocity component and clamp the position back into the world
	Reflect,
	/// Teleport to the opposite edge
	#[default]
	Wrap,
}

/// Read-only configuration shared by every part of the simulation
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
pub struct FlockConfig {
	/// Radius within which other agents count as neighbours
	pub vision: f32,
	/// Upper bound of an agent's speed
	pub max_speed: f32,
	/// Upper bound of each flocking steering force
	pub max_force: f32,
	/// Lower bound of an agent's speed, `0` disables it
	pub min_speed: f32,
	/// Weight of the alignment force
	pub alignment: f32,
	/// Weight of the cohesion force
	pub cohesion: f32,
	/// Weight of the separation force
	pub separation: f32,
	/// Base of the exponent weighting each neighbour's velocity by how closely it matches our own
	pub bias: f32,
	/// Weight of the obstacle avoidance heading
	pub avoidance_weight: f32,
	/// Maximum raycast distance
	pub avoidance_lookahead: f32,
	/// Distance between raycast samples
	pub raycast_granularity: f32,
	/// Angle in radians of each rotation step when searching for a clear heading
	pub avoidance_test_rotation: f32,
	/// Total rotation in radians the heading search may accumulate before giving up
	pub avoidance_max_rotation: f32,
	/// Magnitude of every non-zero force field vector
	pub goal_force: f32,
	/// Radius of a goal's visual
	pub goal_radius: f32,
	/// Lifetime in ticks of a newly added goal
	pub goal_lifetime: f32,
	/// Width of a grid cell in world units
	pub cell_width: f32,
	/// Height of a grid cell in world units
	pub cell_height: f32,
	/// Number of tags, each owns its own goals and force field
	pub tag_count: usize,
	/// Rough number of neighbour candidates examined per agent, `0` examines every candidate
	pub accuracy: usize,
	/// Behaviour at the world edges
	pub boundary: BoundaryPolicy,
	/// Fraction of velocity lost each tick, `0` disables drag
	pub drag: f32,
	/// Maximum random heading change per tick in radians, `0` disables it
	pub heading_jitter: f32,
	/// Number of agents spawned when the world is created
	pub agent_count: usize,
	/// Disable flocking so agents only react to goals, walls and perturbations
	pub particle: bool,
	/// Number of simulation ticks per second of frame time
	pub ticks_per_second: f32,
	/// Seed of the simulation's random number generator, `None` seeds from the OS
	pub seed: Option<u64>,
}

impl Default for FlockConfig {
	fn default() -> Self {
		FlockConfig {
			vision: 50.0,
			max_speed: 4.0,
			max_force: 0.2,
			min_speed: 2.0,
			alignment: 1.0,
			cohesion: 1.0,
			separation: 1.5,
			bias: 1.1,
			avoidance_weight: 0.5,
			avoidance_lookahead: 40.0,
			raycast_granularity: 4.0,
			avoidance_test_rotation: 0.15,
			avoidance_max_rotation: std::f32::consts::PI,
			goal_force: 0.3,
			goal_radius: 8.0,
			goal_lifetime: 600.0,
			cell_width: 20.0,
			cell_height: 20.0,
			tag_count: 3,
			accuracy: 50,
			boundary: BoundaryPolicy::Wrap,
			drag: 0.0,
			heading_jitter: 0.0,
			agent_count: 300,
			particle: false,
			ticks_per_second: 60.0,
			seed: None,
		}
	}
}

impl FlockConfig {
	/// Check that the configuration can drive a simulation. Values which would cause division by
	/// zero or unbounded loops are rejected
	pub fn validate(&self) -> Result<(), FlockError> {
		if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
			return Err(FlockError::InvalidConfig(format!(
				"cell dimensions must be positive, found ({}, {})",
				self.cell_width, self.cell_height
			)));
		}
		if !self.raycast_granularity.is_finite() || self.raycast_granularity <= 0.0 {
			return Err(FlockError::InvalidConfig(
				"raycast_granularity must be finite and positive".to_string(),
			));
		}
		if !self.avoidance_lookahead.is_finite() || self.avoidance_lookahead < 0.0 {
			return Err(FlockError::InvalidConfig(
				"avoidance_lookahead must be finite and not negative".to_string(),
			));
		}
		if self.avoidance_lookahead / self.raycast_granularity > MAX_RAYCAST_STEPS as f32 {
			return Err(FlockError::InvalidConfig(format!(
				"raycast_granularity {} is too fine for a lookahead of {}, at most {} samples are taken",
				self.raycast_granularity, self.avoidance_lookahead, MAX_RAYCAST_STEPS
			)));
		}
		if !self.avoidance_test_rotation.is_finite() || self.avoidance_test_rotation <= 0.0 {
			return Err(FlockError::InvalidConfig(
				"avoidance_test_rotation must be finite and positive".to_string(),
			));
		}
		if !self.avoidance_max_rotation.is_finite() || self.avoidance_max_rotation <= 0.0 {
			return Err(FlockError::InvalidConfig(
				"avoidance_max_rotation must be finite and positive".to_string(),
			));
		}
		let rotation_steps = self.avoidance_max_rotation.min(std::f32::consts::TAU)
			/ self.avoidance_test_rotation;
		if rotation_steps > MAX_AVOIDANCE_STEPS as f32 {
			return Err(FlockError::InvalidConfig(format!(
				"avoidance_test_rotation {} is too fine, at most {} rotations are tried",
				self.avoidance_test_rotation, MAX_AVOIDANCE_STEPS
			)));
		}
		if self.tag_count == 0 {
			return Err(FlockError::InvalidConfig(
				"tag_count must be at least 1".to_string(),
			));
		}
		if self.min_speed < 0.0 || self.min_speed > self.max_speed {
			return Err(FlockError::InvalidConfig(format!(
				"min_speed {} must lie within [0, max_speed {}]",
				self.min_speed, self.max_speed
			)));
		}
		if !(0.0..1.0).contains(&self.drag) {
			return Err(FlockError::InvalidConfig(format!(
				"drag {} must lie within [0, 1)",
				self.drag
			)));
		}
		if self.ticks_per_second <= 0.0 {
			return Err(FlockError::InvalidConfig(
				"ticks_per_second must be positive".to_string(),
			));
		}
		if self.bias <= 0.0 {
			return Err(FlockError::InvalidConfig(
				"bias must be positive".to_string(),
			));
		}
		Ok(())
	}
	/// Strength limit of the pointer, scaling with how strongly the flock is steered
	pub fn pointer_force(&self) -> f32 {
		(self.max_speed
			* self.max_force
			* (self.alignment + self.cohesion + self.separation + 1.0)
			/ 16.0)
			.max(0.0)
	}
	/// Vision radius squared
	pub fn vision_squared(&self) -> f32 {
		self.vision * self.vision
	}
	/// True when agents ignore each other
	pub fn is_particle_mode(&self) -> bool {
		self.particle || self.vision == 0.0
	}
	/// Load a [FlockConfig] from a `ron` file and validate it
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, FlockError> {
		let file = std::fs::File::open(path)?;
		let config: FlockConfig = ron::de::from_reader(file)?;
		if let Err(e) = config.validate() {
			error!("Rejected config {}: {}", path, e);
			return Err(e);
		}
		Ok(config)
	}
}

/// State every component operation needs for a single tick
#[derive(Debug, Clone, Copy)]
pub struct SimulationContext<'a> {
	/// Simulation tuning
	pub config: &'a FlockConfig,
	/// Size of the world and its grid
	pub dimensions: &'a WorldDimensions,
	/// Ticks elapsed since the previous update
	pub elapsed: f32,
}

impl<'a> SimulationContext<'a> {
	/// Create a new instance of [SimulationContext]
	pub fn new(config: &'a FlockConfig, dimensions: &'a WorldDimensions, elapsed: f32) -> Self {
		SimulationContext {
			config,
			dimensions,
			elapsed,
		}
	}
}
