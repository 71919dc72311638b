//! Defines the Bevy [Plugin] for flocking
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

pub mod agent_layer;
pub mod goal_layer;

/// Stages of a simulation tick, run in order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Spawn the flock and apply outside input
	Populate,
	/// Drop new goals and age existing ones, rebuilding force fields
	Goals,
	/// Snapshot every agent into the spatial index
	Index,
	/// Compute the acceleration of every agent
	Steer,
	/// Move every agent
	Integrate,
	/// Per-tick bookkeeping
	Tidy,
}

/// Random number generator shared by every part of the simulation. Seeded from
/// [FlockConfig::seed] when one is set so runs can be reproduced
#[derive(Resource, Debug)]
pub struct FlockRng(StdRng);

impl FlockRng {
	/// Create a new instance of [FlockRng] from a fixed seed
	pub fn from_seed(seed: u64) -> Self {
		FlockRng(StdRng::seed_from_u64(seed))
	}
	/// Get the generator
	pub fn get_mut(&mut self) -> &mut StdRng {
		&mut self.0
	}
}

impl FromWorld for FlockRng {
	fn from_world(world: &mut World) -> Self {
		match world.get_resource::<FlockConfig>().and_then(|c| c.seed) {
			Some(seed) => FlockRng::from_seed(seed),
			None => FlockRng(StdRng::from_os_rng()),
		}
	}
}

/// Pause and single-step toggles. Kept apart from [FlockConfig] which never changes at runtime
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct SimulationControl {
	/// Skip goal ageing and flock updates
	pub paused: bool,
	/// While paused, run exactly one tick
	pub step_requested: bool,
}

impl SimulationControl {
	/// Whether the simulation advances this tick
	pub fn should_tick(&self) -> bool {
		!self.paused || self.step_requested
	}
}

/// Run condition, true unless the simulation is paused without a pending single step
pub fn simulation_should_tick(control: Res<SimulationControl>) -> bool {
	control.should_tick()
}

/// A single step lasts one tick
#[cfg(not(tarpaulin_include))]
pub fn clear_single_step(mut control: ResMut<SimulationControl>) {
	if control.step_requested {
		control.step_requested = false;
	}
}

/// Frame time converted into simulation ticks
pub fn elapsed_ticks(time: &Time, config: &FlockConfig) -> f32 {
	time.delta_secs() * config.ticks_per_second
}

pub struct FlockingPlugin;

impl Plugin for FlockingPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.init_resource::<FlockConfig>()
			.init_resource::<FlockRng>()
			.init_resource::<Perturbations>()
			.init_resource::<SimulationControl>()
			.init_resource::<BucketGrid>();
		if let Err(e) = app.world().resource::<FlockConfig>().validate() {
			error!("FlockingPlugin started with an unusable config: {}", e);
		}
		app.register_type::<Cardinal>()
			.register_type::<GridCell>()
			.register_type::<WorldDimensions>()
			.register_type::<WallRegion>()
			.register_type::<WallMap>()
			.register_type::<ForceField>()
			.register_type::<Goal>()
			.register_type::<GoalSet>()
			.register_type::<Goals>()
			.register_type::<SteeringAgent>()
			.register_type::<FlockConfig>()
			.register_type::<BoundaryPolicy>()
			.register_type::<Perturbations>()
			.register_type::<PointerMode>()
			.register_type::<SimulationControl>()
			.register_type::<goal_layer::GoalVisual>()
			.add_event::<goal_layer::EventDropGoal>()
			.add_event::<goal_layer::EventClearGoals>()
			.add_event::<agent_layer::EventPerturb>()
			.configure_sets(
				Update,
				(
					OrderingSet::Populate,
					OrderingSet::Goals,
					OrderingSet::Index,
					OrderingSet::Steer,
					OrderingSet::Integrate,
					OrderingSet::Tidy,
				)
					.chain(),
			)
			.add_systems(
				Update,
				(
					(agent_layer::spawn_flock, agent_layer::process_perturb_events)
						.in_set(OrderingSet::Populate),
					(
						goal_layer::event_clear_goals,
						goal_layer::event_drop_goal,
						goal_layer::update_goals.run_if(simulation_should_tick),
					)
						.chain()
						.in_set(OrderingSet::Goals),
					agent_layer::rebuild_spatial_index
						.run_if(simulation_should_tick)
						.in_set(OrderingSet::Index),
					agent_layer::steer_agents
						.run_if(simulation_should_tick)
						.in_set(OrderingSet::Steer),
					(
						agent_layer::integrate_agents,
						agent_layer::sync_agent_transforms,
					)
						.chain()
						.run_if(simulation_should_tick)
						.in_set(OrderingSet::Integrate),
					// explosions fade every frame, paused or not
					agent_layer::decay_explosion.in_set(OrderingSet::Integrate),
					clear_single_step.in_set(OrderingSet::Tidy),
				),
			);
	}
}
