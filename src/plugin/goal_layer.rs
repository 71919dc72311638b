//! Logic relating to [Goals] and their visuals
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// Request to drop a goal. Without a tag a random one is chosen
#[derive(Event, Debug, Clone, Copy)]
pub struct EventDropGoal {
	/// Tag of the goal, `None` picks one at random
	tag: Option<usize>,
	/// World position of the goal
	position: Vec2,
}

impl EventDropGoal {
	pub fn new(tag: Option<usize>, position: Vec2) -> Self {
		EventDropGoal { tag, position }
	}
	pub fn get_tag(&self) -> Option<usize> {
		self.tag
	}
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
}

/// Remove every goal, for instance before the world is torn down
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct EventClearGoals;

/// Marks the entity representing a goal, renderers may attach a sprite or mesh to it
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct GoalVisual {
	/// Tag of the goal
	pub tag: usize,
	/// Radius to draw the goal at
	pub radius: f32,
}

/// Spawns a [GoalVisual] entity for each goal and despawns it once the goal is removed
pub struct CommandsGoalVisuals<'a, 'w, 's> {
	/// Command queue of the running system
	commands: &'a mut Commands<'w, 's>,
	/// Radius given to every visual
	radius: f32,
}

impl<'a, 'w, 's> CommandsGoalVisuals<'a, 'w, 's> {
	/// Create a new instance of [CommandsGoalVisuals]
	pub fn new(commands: &'a mut Commands<'w, 's>, radius: f32) -> Self {
		CommandsGoalVisuals { commands, radius }
	}
}

impl GoalVisuals for CommandsGoalVisuals<'_, '_, '_> {
	fn spawn_goal_visual(&mut self, tag: usize, position: Vec2) -> Option<Entity> {
		let entity = self
			.commands
			.spawn((
				GoalVisual {
					tag,
					radius: self.radius,
				},
				Transform::from_xyz(position.x, position.y, 0.0),
			))
			.id();
		Some(entity)
	}
	fn despawn_goal_visual(&mut self, visual: Entity) {
		self.commands.entity(visual).despawn();
	}
}

/// Read [EventDropGoal] and add the goals to their tags
#[cfg(not(tarpaulin_include))]
pub fn event_drop_goal(
	mut events: EventReader<EventDropGoal>,
	mut commands: Commands,
	mut world_q: Query<(&WallMap, &mut Goals)>,
	config: Res<FlockConfig>,
	mut rng: ResMut<FlockRng>,
) {
	for event in events.read() {
		for (walls, mut goals) in world_q.iter_mut() {
			let tag_count = goals.tag_count();
			if tag_count == 0 {
				warn!("Goal dropped at {} but there are no tags", event.position);
				continue;
			}
			let tag = event
				.tag
				.unwrap_or_else(|| rng.get_mut().random_range(0..tag_count));
			let mut visuals = CommandsGoalVisuals::new(&mut commands, config.goal_radius);
			if goals
				.add_goal_at(tag, event.position, walls, &mut visuals)
				.is_ok()
			{
				debug!("Goal dropped for tag {} at {}", tag, event.position);
			}
		}
	}
}

/// Age every goal, expired goals are removed along with their visuals
#[cfg(not(tarpaulin_include))]
pub fn update_goals(
	mut commands: Commands,
	mut world_q: Query<(&WallMap, &mut Goals)>,
	config: Res<FlockConfig>,
	time: Res<Time>,
) {
	let elapsed = elapsed_ticks(&time, &config);
	let mut visuals = CommandsGoalVisuals::new(&mut commands, config.goal_radius);
	for (walls, mut goals) in world_q.iter_mut() {
		let removed = goals.update(elapsed, walls, &mut visuals);
		if removed > 0 {
			debug!("{} goals expired", removed);
		}
	}
}

/// Read [EventClearGoals] and remove every goal
#[cfg(not(tarpaulin_include))]
pub fn event_clear_goals(
	mut events: EventReader<EventClearGoals>,
	mut commands: Commands,
	mut world_q: Query<(&WallMap, &mut Goals)>,
	config: Res<FlockConfig>,
) {
	// several requests in a tick clear just as well as one
	if events.read().last().is_none() {
		return;
	}
	let mut visuals = CommandsGoalVisuals::new(&mut commands, config.goal_radius);
	for (walls, mut goals) in world_q.iter_mut() {
		goals.clear(walls, &mut visuals);
	}
}
