//! Logic relating to [SteeringAgent] spawning, steering and movement
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Outside influence on the flock, typically sent by the application's input handling
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum EventPerturb {
	/// Pointer pressed, or moved while pressed, over the world
	PointerDown {
		/// World position of the pointer
		position: Vec2,
		/// Attract or repel
		mode: PointerMode,
	},
	/// Pointer released or left the world
	PointerUp,
	/// Blast agents away from a point
	Explode {
		/// Centre of the explosion
		position: Vec2,
	},
}

/// Spawn [FlockConfig::agent_count] agents into each newly created world
#[cfg(not(tarpaulin_include))]
pub fn spawn_flock(
	mut commands: Commands,
	world_q: Query<&WallMap, Added<WallMap>>,
	existing_q: Query<(), With<SteeringAgent>>,
	config: Res<FlockConfig>,
	mut rng: ResMut<FlockRng>,
) {
	let mut next_index = existing_q.iter().count();
	for walls in world_q.iter() {
		for _ in 0..config.agent_count {
			let agent = SteeringAgent::spawn_random(next_index, walls, &config, rng.get_mut());
			let transform = agent_transform(&agent);
			commands.spawn((agent, transform));
			next_index += 1;
		}
		debug!("Spawned a flock of {} agents", config.agent_count);
	}
}

/// Apply [EventPerturb] to the [Perturbations] resource
#[cfg(not(tarpaulin_include))]
pub fn process_perturb_events(
	mut events: EventReader<EventPerturb>,
	mut perturbations: ResMut<Perturbations>,
) {
	for event in events.read() {
		match *event {
			EventPerturb::PointerDown { position, mode } => {
				perturbations.set_pointer(position, mode)
			}
			EventPerturb::PointerUp => perturbations.clear_pointer(),
			EventPerturb::Explode { position } => perturbations.trigger_explosion(position),
		}
	}
}

/// Snapshot every agent into the [BucketGrid] so neighbour queries see the flock as it was at the
/// start of the tick
#[cfg(not(tarpaulin_include))]
pub fn rebuild_spatial_index(
	agent_q: Query<&SteeringAgent>,
	world_q: Query<&WorldDimensions>,
	config: Res<FlockConfig>,
	mut grid: ResMut<BucketGrid>,
) {
	let Some(dimensions) = world_q.iter().next() else {
		return;
	};
	grid.rebuild(
		dimensions,
		config.vision,
		agent_q.iter().map(|agent| agent.snapshot()),
	);
}

/// Compute the acceleration of every agent
#[cfg(not(tarpaulin_include))]
pub fn steer_agents(
	mut agent_q: Query<&mut SteeringAgent>,
	world_q: Query<(&WorldDimensions, &WallMap, &Goals)>,
	grid: Res<BucketGrid>,
	perturbations: Res<Perturbations>,
	config: Res<FlockConfig>,
	time: Res<Time>,
	mut rng: ResMut<FlockRng>,
) {
	let Some((dimensions, walls, goals)) = world_q.iter().next() else {
		return;
	};
	let context = SimulationContext::new(&config, dimensions, elapsed_ticks(&time, &config));
	for mut agent in agent_q.iter_mut() {
		agent.steer(
			&context,
			&*grid,
			walls,
			goals,
			&perturbations,
			rng.get_mut(),
		);
	}
}

/// Move every agent by its acceleration
#[cfg(not(tarpaulin_include))]
pub fn integrate_agents(
	mut agent_q: Query<&mut SteeringAgent>,
	world_q: Query<&WorldDimensions>,
	config: Res<FlockConfig>,
	time: Res<Time>,
	mut rng: ResMut<FlockRng>,
) {
	let Some(dimensions) = world_q.iter().next() else {
		return;
	};
	let context = SimulationContext::new(&config, dimensions, elapsed_ticks(&time, &config));
	for mut agent in agent_q.iter_mut() {
		agent.integrate(&context, rng.get_mut());
	}
}

/// Place and orient an agent's [Transform] from its position and heading
fn agent_transform(agent: &SteeringAgent) -> Transform {
	let position = agent.get_position();
	Transform::from_xyz(position.x, position.y, 0.0)
		.with_rotation(Quat::from_rotation_z(agent.get_velocity().heading()))
}

/// Copy the position and heading of each agent into its [Transform] for rendering
#[cfg(not(tarpaulin_include))]
pub fn sync_agent_transforms(mut agent_q: Query<(&SteeringAgent, &mut Transform)>) {
	for (agent, mut transform) in agent_q.iter_mut() {
		*transform = agent_transform(agent);
	}
}

/// Weaken any active explosion
#[cfg(not(tarpaulin_include))]
pub fn decay_explosion(mut perturbations: ResMut<Perturbations>) {
	if perturbations.get_explosion_strength() != 0.0 {
		perturbations.decay_explosion();
	}
}
