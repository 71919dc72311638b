//! An agent (boid) sums several steering forces into its acceleration each tick:
//!
//! * Flocking - steer with neighbours (alignment), towards their centre (cohesion) and away from
//! those too close (separation)
//! * Perturbations - the pointer and explosions
//! * Goal seeking - the force field of the agent's tag
//! * Obstacle avoidance - if a raycast along the current heading hits a wall, rotate the heading
//! until the ray is clear and steer along it
//!
//! Once every agent has steered a separate pass integrates acceleration into velocity and position,
//! so no agent sees another's new position within the same tick.
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// Another agent within vision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
	/// Position of the neighbour
	pub position: Vec2,
	/// Velocity of the neighbour
	pub velocity: Vec2,
	/// Squared distance between the agent and the neighbour
	pub distance_squared: f32,
}

/// Unweighted flocking forces
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlockingForces {
	/// Steer towards the velocity of neighbours
	pub alignment: Vec2,
	/// Steer towards the centre of neighbours
	pub cohesion: Vec2,
	/// Steer away from neighbours
	pub separation: Vec2,
}

/// Outcome of the obstacle avoidance heading search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avoidance {
	/// Unit heading to steer along, zero if the agent is stationary
	pub heading: Vec2,
	/// True if no clear heading was found within the rotation budget, `heading` is then the last
	/// one tried
	pub exhausted: bool,
}

/// A boid
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct SteeringAgent {
	/// Identity, unique within the flock
	index: usize,
	/// Selects which goals the agent seeks
	tag: usize,
	/// World position
	position: Vec2,
	/// Velocity in world units per tick
	velocity: Vec2,
	/// Steering accumulated this tick
	acceleration: Vec2,
}

impl SteeringAgent {
	/// Create a new instance of [SteeringAgent] at rest
	pub fn new(index: usize, tag: usize, position: Vec2, velocity: Vec2) -> Self {
		SteeringAgent {
			index,
			tag,
			position,
			velocity,
			acceleration: Vec2::ZERO,
		}
	}
	/// Create an agent at a random free position with a random tag and a random velocity between
	/// the minimum and maximum speed
	pub fn spawn_random<R: Rng + ?Sized>(
		index: usize,
		walls: &WallMap,
		config: &FlockConfig,
		rng: &mut R,
	) -> Self {
		let position = walls.random_free_position(rng);
		let tag = rng.random_range(0..config.tag_count.max(1));
		let speed = if config.min_speed < config.max_speed {
			rng.random_range(config.min_speed..config.max_speed)
		} else {
			config.max_speed
		};
		let velocity = Vec2::random_unit(rng, speed);
		SteeringAgent::new(index, tag, position, velocity)
	}
	pub fn get_index(&self) -> usize {
		self.index
	}
	pub fn get_tag(&self) -> usize {
		self.tag
	}
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
	pub fn get_velocity(&self) -> Vec2 {
		self.velocity
	}
	pub fn get_acceleration(&self) -> Vec2 {
		self.acceleration
	}
	/// Freeze the agent's position and velocity for the spatial index
	pub fn snapshot(&self) -> AgentSnapshot {
		AgentSnapshot {
			index: self.index,
			position: self.position,
			velocity: self.velocity,
		}
	}
	/// Gather the agents within vision from the candidates of a [SpatialIndex].
	///
	/// To bound the cost in dense crowds only roughly `accuracy` candidates are examined. The
	/// candidates are walked at a fixed stride from a random starting offset, with the stride
	/// carried over from one bucket to the next
	pub fn neighbours<I: SpatialIndex + ?Sized, R: Rng + ?Sized>(
		&self,
		index: &I,
		config: &FlockConfig,
		rng: &mut R,
	) -> Vec<Neighbour> {
		let buckets = index.candidates_for(self.position);
		let count: usize = buckets.iter().map(|b| b.len()).sum();
		let step = if config.accuracy == 0 {
			1
		} else {
			count.div_ceil(config.accuracy).max(1)
		};
		let vision_squared = config.vision_squared();
		let mut neighbours = Vec::new();
		let mut i = rng.random_range(0..step);
		for bucket in buckets {
			while i < bucket.len() {
				let candidate = bucket[i];
				i += step;
				if candidate.index == self.index {
					continue;
				}
				let distance_squared = self.position.distance_squared(candidate.position);
				if distance_squared < vision_squared {
					neighbours.push(Neighbour {
						position: candidate.position,
						velocity: candidate.velocity,
						distance_squared,
					});
				}
			}
			i -= bucket.len();
		}
		neighbours
	}
	/// Alignment, cohesion and separation from a set of neighbours, each limited to the maximum
	/// force. No neighbours produces no force
	pub fn flocking_forces(&self, neighbours: &[Neighbour], config: &FlockConfig) -> FlockingForces {
		if neighbours.is_empty() {
			return FlockingForces::default();
		}
		let mut alignment = Vec2::ZERO;
		let mut cohesion = Vec2::ZERO;
		let mut separation = Vec2::ZERO;
		for other in neighbours {
			// neighbours moving the same way count for more
			let weight = config.bias.powf(other.velocity.dot(self.velocity));
			alignment = alignment.scaled_add(other.velocity, weight);
			cohesion += other.position;
			let closeness = 1.0 / other.distance_squared.max(DISTANCE_EPSILON);
			separation = separation.scaled_add(self.position - other.position, closeness);
		}
		let centre = cohesion / neighbours.len() as f32;
		FlockingForces {
			alignment: (alignment.set_magnitude(config.max_speed) - self.velocity)
				.limit_max(config.max_force),
			cohesion: ((centre - self.position).set_magnitude(config.max_speed) - self.velocity)
				.limit_max(config.max_force),
			separation: (separation.set_magnitude(config.max_speed) - self.velocity)
				.limit_max(config.max_force),
		}
	}
	/// Add the weighted flocking forces to the acceleration
	pub fn flock(&mut self, neighbours: &[Neighbour], config: &FlockConfig) -> FlockingForces {
		let forces = self.flocking_forces(neighbours, config);
		self.acceleration = self
			.acceleration
			.scaled_add(forces.alignment, config.alignment)
			.scaled_add(forces.cohesion, config.cohesion)
			.scaled_add(forces.separation, config.separation);
		forces
	}
	/// Add the pointer and explosion forces to the acceleration
	pub fn apply_perturbations(&mut self, perturbations: &Perturbations, config: &FlockConfig) {
		self.acceleration += perturbations.force_on(self.position, config);
	}
	/// Add the force field of the agent's tag to the acceleration. A failed lookup adds nothing
	pub fn seek_goal(&mut self, goals: &Goals) {
		match goals.force_at(self.tag, self.position) {
			Ok(force) => self.acceleration += force,
			Err(e) => trace!("Agent {} has no goal force: {}", self.index, e),
		}
	}
	/// Step along `direction` from the agent's position and report the distance of the first
	/// sample inside a wall, `None` if every sample up to the lookahead is clear
	pub fn raycast_walls(&self, direction: Vec2, walls: &WallMap, config: &FlockConfig) -> Option<f32> {
		let direction = direction.normalize_or_zero();
		if direction == Vec2::ZERO || config.raycast_granularity <= 0.0 {
			return None;
		}
		// NaN and negative ratios saturate to zero steps
		let steps = ((config.avoidance_lookahead / config.raycast_granularity).floor() as usize)
			.min(MAX_RAYCAST_STEPS);
		for step in 1..=steps {
			let distance = step as f32 * config.raycast_granularity;
			if walls.has_wall_at_world(self.position + direction * distance) {
				return Some(distance);
			}
		}
		None
	}
	/// Find a heading clear of walls. If the current heading is blocked the side whose wall is
	/// further away is chosen (ties rotate negatively) and the heading is rotated that way a step
	/// at a time until the raycast is clear or the rotation budget is spent
	pub fn avoidance_heading(&self, walls: &WallMap, config: &FlockConfig) -> Avoidance {
		let heading = self.velocity.normalize_or_zero();
		if self.raycast_walls(heading, walls, config).is_none() {
			return Avoidance {
				heading,
				exhausted: false,
			};
		}
		let test = config.avoidance_test_rotation;
		if test <= 0.0 {
			warn!(
				"Agent {} cannot search for a clear heading, test rotation is {}",
				self.index, test
			);
			return Avoidance {
				heading,
				exhausted: true,
			};
		}
		let positive = self
			.raycast_walls(heading.rotated(test), walls, config)
			.unwrap_or(f32::INFINITY);
		let negative = self
			.raycast_walls(heading.rotated(-test), walls, config)
			.unwrap_or(f32::INFINITY);
		let step = if positive > negative { test } else { -test };
		// a budget beyond a full turn only repeats headings already tried
		let budget = config.avoidance_max_rotation.min(std::f32::consts::TAU);
		let steps = ((budget / test).ceil().max(1.0) as usize).min(MAX_AVOIDANCE_STEPS);
		let mut candidate = heading;
		for _ in 0..steps {
			candidate = candidate.rotated(step);
			if self.raycast_walls(candidate, walls, config).is_none() {
				return Avoidance {
					heading: candidate,
					exhausted: false,
				};
			}
		}
		warn!(
			"Agent {} found no clear heading within {} radians",
			self.index, config.avoidance_max_rotation
		);
		Avoidance {
			heading: candidate,
			exhausted: true,
		}
	}
	/// Add the weighted avoidance heading to the acceleration
	pub fn avoid_obstacles(&mut self, walls: &WallMap, config: &FlockConfig) -> Avoidance {
		let avoidance = self.avoidance_heading(walls, config);
		self.acceleration = self
			.acceleration
			.scaled_add(avoidance.heading, config.avoidance_weight);
		avoidance
	}
	/// Replace the acceleration with the sum of every steering force for this tick
	pub fn steer<I: SpatialIndex + ?Sized, R: Rng + ?Sized>(
		&mut self,
		context: &SimulationContext,
		index: &I,
		walls: &WallMap,
		goals: &Goals,
		perturbations: &Perturbations,
		rng: &mut R,
	) {
		let config = context.config;
		self.acceleration = Vec2::ZERO;
		if !config.is_particle_mode() {
			let neighbours = self.neighbours(index, config, rng);
			self.flock(&neighbours, config);
		}
		self.apply_perturbations(perturbations, config);
		self.seek_goal(goals);
		self.avoid_obstacles(walls, config);
		trace!(
			"Agent {} at {} steering {}",
			self.index,
			self.position,
			self.acceleration
		);
	}
	/// Apply the acceleration to the velocity and the velocity to the position, then handle the
	/// world edges
	pub fn integrate<R: Rng + ?Sized>(&mut self, context: &SimulationContext, rng: &mut R) {
		let config = context.config;
		let elapsed = context.elapsed;
		let mut velocity = self.velocity.scaled_add(self.acceleration, elapsed);
		if config.drag > 0.0 {
			velocity *= 1.0 - config.drag;
		}
		if config.heading_jitter > 0.0 {
			let jitter = config.heading_jitter;
			velocity = velocity.rotated(rng.random_range(-jitter..=jitter));
		}
		if config.min_speed > 0.0 {
			velocity = velocity.limit_min(config.min_speed, rng);
		}
		self.velocity = velocity.limit_max(config.max_speed);
		self.position = self.position.scaled_add(self.velocity, elapsed);
		self.apply_boundary(context.dimensions, config.boundary);
	}
	/// Bring an agent which left the world back into it
	fn apply_boundary(&mut self, dimensions: &WorldDimensions, policy: BoundaryPolicy) {
		let width = dimensions.get_width();
		let height = dimensions.get_height();
		match policy {
			BoundaryPolicy::Reflect => {
				let mut hit = false;
				if self.position.x < 0.0 || self.position.x > width {
					hit = true;
					self.velocity.x = -self.velocity.x;
				}
				if self.position.y < 0.0 || self.position.y > height {
					hit = true;
					self.velocity.y = -self.velocity.y;
				}
				if hit {
					self.position = self.position.clamp(Vec2::ZERO, Vec2::new(width, height));
				}
			}
			BoundaryPolicy::Wrap => {
				if self.position.x < 0.0 {
					self.position.x = width;
				} else if self.position.x > width {
					self.position.x = 0.0;
				}
				if self.position.y < 0.0 {
					self.position.y = height;
				} else if self.position.y > height {
					self.position.y = 0.0;
				}
			}
		}
	}
}
