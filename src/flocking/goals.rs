//! Goals are short-lived attractors. Each tag owns a [GoalSet] of goals and a [ForceField] built
//! from them, whenever a goal is added or expires the field is rebuilt so agents of that tag are
//! always guided to the nearest live goal.
//!
//! Goals may have a visual representation. The core never looks inside of it, a [GoalVisuals]
//! sink creates one when a goal is added and is handed it back when the goal is removed so nothing
//! is left behind in the scene.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Creates and destroys the visual representation of goals
pub trait GoalVisuals {
	/// Create a visual for a new goal of `tag` at `position`, returning a handle to it if one
	/// was created
	fn spawn_goal_visual(&mut self, tag: usize, position: Vec2) -> Option<Entity>;
	/// Release the visual of a removed goal
	fn despawn_goal_visual(&mut self, visual: Entity);
}

/// Headless, goals have no visuals
impl GoalVisuals for () {
	fn spawn_goal_visual(&mut self, _tag: usize, _position: Vec2) -> Option<Entity> {
		None
	}
	fn despawn_goal_visual(&mut self, _visual: Entity) {}
}

/// A transient attractor
#[derive(Debug, PartialEq, Reflect)]
pub struct Goal {
	/// World position
	position: Vec2,
	/// Ticks left before the goal expires
	remaining: f32,
	/// Handle of the goal's visual
	visual: Option<Entity>,
}

impl Goal {
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
	pub fn get_remaining(&self) -> f32 {
		self.remaining
	}
	pub fn get_visual(&self) -> Option<Entity> {
		self.visual
	}
}

/// Goals of a single tag and the [ForceField] derived from them
#[derive(Debug, Reflect)]
pub struct GoalSet {
	/// Tag the goals belong to
	tag: usize,
	/// Live goals
	goals: Vec<Goal>,
	/// Steering towards the nearest goal
	force_field: ForceField,
	/// Lifetime in ticks given to new goals
	default_lifetime: f32,
}

impl GoalSet {
	/// Create a new instance of [GoalSet] with no goals
	pub fn new(tag: usize, dimensions: WorldDimensions, goal_force: f32, lifetime: f32) -> Self {
		GoalSet {
			tag,
			goals: Vec::new(),
			force_field: ForceField::new(dimensions, goal_force),
			default_lifetime: lifetime,
		}
	}
	pub fn get_tag(&self) -> usize {
		self.tag
	}
	pub fn get_goals(&self) -> &[Goal] {
		&self.goals
	}
	pub fn get_force_field(&self) -> &ForceField {
		&self.force_field
	}
	pub fn get_default_lifetime(&self) -> f32 {
		self.default_lifetime
	}
	/// Age every goal by `elapsed` ticks, removing those whose lifetime has run out. The
	/// [ForceField] is rebuilt if any were removed. Returns the number of goals removed
	pub fn update<V: GoalVisuals + ?Sized>(
		&mut self,
		elapsed: f32,
		walls: &WallMap,
		visuals: &mut V,
	) -> usize {
		let before = self.goals.len();
		let mut kept = Vec::with_capacity(before);
		for mut goal in self.goals.drain(..) {
			goal.remaining -= elapsed;
			if goal.remaining <= 0.0 {
				if let Some(visual) = goal.visual {
					visuals.despawn_goal_visual(visual);
				}
			} else {
				kept.push(goal);
			}
		}
		self.goals = kept;
		let removed = before - self.goals.len();
		if removed > 0 {
			trace!("Tag {} lost {} goals", self.tag, removed);
			self.refresh_force_field(walls);
		}
		removed
	}
	/// Add a goal at a world position with the default lifetime and rebuild the [ForceField]
	pub fn add_goal_at<V: GoalVisuals + ?Sized>(
		&mut self,
		position: Vec2,
		walls: &WallMap,
		visuals: &mut V,
	) {
		let visual = visuals.spawn_goal_visual(self.tag, position);
		self.goals.push(Goal {
			position,
			remaining: self.default_lifetime,
			visual,
		});
		self.refresh_force_field(walls);
	}
	/// Steering force towards the nearest goal from a world position
	pub fn force_at(&self, position: Vec2) -> Result<Vec2, FlockError> {
		self.force_field.force_at(position)
	}
	/// Remove every goal, releasing their visuals, leaving an empty field
	pub fn clear<V: GoalVisuals + ?Sized>(&mut self, walls: &WallMap, visuals: &mut V) {
		for goal in self.goals.drain(..) {
			if let Some(visual) = goal.visual {
				visuals.despawn_goal_visual(visual);
			}
		}
		self.refresh_force_field(walls);
	}
	/// Rebuild the [ForceField] from the current goals
	pub fn refresh_force_field(&mut self, walls: &WallMap) {
		let positions = self.goals.iter().map(|g| g.position);
		self.force_field.recalculate(positions, walls);
	}
}

/// The [GoalSet] of every tag
#[derive(Component, Debug, Reflect)]
pub struct Goals {
	/// Indexed by tag
	sets: Vec<GoalSet>,
}

impl Goals {
	/// Create a new instance of [Goals] with an empty [GoalSet] for each configured tag
	pub fn new(dimensions: WorldDimensions, config: &FlockConfig) -> Self {
		let sets = (0..config.tag_count)
			.map(|tag| GoalSet::new(tag, dimensions, config.goal_force, config.goal_lifetime))
			.collect();
		Goals { sets }
	}
	/// Number of tags
	pub fn tag_count(&self) -> usize {
		self.sets.len()
	}
	pub fn get_sets(&self) -> &[GoalSet] {
		&self.sets
	}
	/// Get the [GoalSet] of a tag
	pub fn get_set(&self, tag: usize) -> Result<&GoalSet, FlockError> {
		let tag_count = self.sets.len();
		self.sets
			.get(tag)
			.ok_or(FlockError::UnknownTag { tag, tag_count })
	}
	/// Age the goals of every tag, returns the total number removed
	pub fn update<V: GoalVisuals + ?Sized>(
		&mut self,
		elapsed: f32,
		walls: &WallMap,
		visuals: &mut V,
	) -> usize {
		let mut removed = 0;
		for set in self.sets.iter_mut() {
			removed += set.update(elapsed, walls, &mut *visuals);
		}
		removed
	}
	/// Add a goal for a tag
	pub fn add_goal_at<V: GoalVisuals + ?Sized>(
		&mut self,
		tag: usize,
		position: Vec2,
		walls: &WallMap,
		visuals: &mut V,
	) -> Result<(), FlockError> {
		let tag_count = self.sets.len();
		match self.sets.get_mut(tag) {
			Some(set) => {
				set.add_goal_at(position, walls, visuals);
				Ok(())
			}
			None => {
				let e = FlockError::UnknownTag { tag, tag_count };
				error!("Cannot add goal: {}", e);
				Err(e)
			}
		}
	}
	/// Steering force towards the nearest goal of a tag
	pub fn force_at(&self, tag: usize, position: Vec2) -> Result<Vec2, FlockError> {
		match self.get_set(tag) {
			Ok(set) => set.force_at(position),
			Err(e) => {
				error!("Cannot look up goal force: {}", e);
				Err(e)
			}
		}
	}
	/// Remove the goals of every tag
	pub fn clear<V: GoalVisuals + ?Sized>(&mut self, walls: &WallMap, visuals: &mut V) {
		for set in self.sets.iter_mut() {
			set.clear(walls, visuals);
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	/// Records every visual created and released
	#[derive(Default)]
	struct RecordingVisuals {
		next: u32,
		live: Vec<Entity>,
		released: Vec<Entity>,
	}
	impl GoalVisuals for RecordingVisuals {
		fn spawn_goal_visual(&mut self, _tag: usize, _position: Vec2) -> Option<Entity> {
			self.next += 1;
			let e = Entity::from_raw(self.next);
			self.live.push(e);
			Some(e)
		}
		fn despawn_goal_visual(&mut self, visual: Entity) {
			self.live.retain(|e| *e != visual);
			self.released.push(visual);
		}
	}
	fn world() -> (WorldDimensions, WallMap) {
		let dims = WorldDimensions::new(200.0, 200.0, 20.0, 20.0);
		(dims, WallMap::new(vec![], dims))
	}
	#[test]
	fn force_towards_goal() {
		let (dims, walls) = world();
		let mut set = GoalSet::new(0, dims, 0.3, 600.0);
		set.add_goal_at(Vec2::new(100.0, 100.0), &walls, &mut ());
		let result = set.force_at(Vec2::new(90.0, 100.0)).unwrap();
		assert!(result.x > 0.0);
	}
	#[test]
	fn expired_goals_removed() {
		let (dims, walls) = world();
		let lifetime = 600.0;
		let mut set = GoalSet::new(0, dims, 0.3, lifetime);
		set.add_goal_at(Vec2::new(100.0, 100.0), &walls, &mut ());
		let removed = set.update(lifetime + 1.0, &walls, &mut ());
		assert_eq!(1, removed);
		assert!(set.get_goals().is_empty());
		let field = set.get_force_field();
		for column in 0..field.get_columns() {
			for row in 0..field.get_rows() {
				assert_eq!(Some(Vec2::ZERO), field.force_at_cell(GridCell::new(column, row)));
			}
		}
	}
	#[test]
	fn exact_lifetime_expires() {
		let (dims, walls) = world();
		let mut set = GoalSet::new(0, dims, 0.3, 10.0);
		set.add_goal_at(Vec2::new(100.0, 100.0), &walls, &mut ());
		assert_eq!(0, set.update(4.0, &walls, &mut ()));
		assert_eq!(1, set.update(6.0, &walls, &mut ()));
	}
	#[test]
	fn ageing_keeps_field_while_alive() {
		let (dims, walls) = world();
		let mut set = GoalSet::new(0, dims, 0.3, 10.0);
		set.add_goal_at(Vec2::new(100.0, 100.0), &walls, &mut ());
		set.update(5.0, &walls, &mut ());
		let result = set.get_goals()[0].get_remaining();
		assert_eq!(5.0, result);
		assert!(set.force_at(Vec2::new(90.0, 100.0)).unwrap().x > 0.0);
	}
	#[test]
	fn expiry_releases_visual() {
		let (dims, walls) = world();
		let mut visuals = RecordingVisuals::default();
		let mut set = GoalSet::new(0, dims, 0.3, 10.0);
		set.add_goal_at(Vec2::new(100.0, 100.0), &walls, &mut visuals);
		set.add_goal_at(Vec2::new(20.0, 20.0), &walls, &mut visuals);
		assert_eq!(2, visuals.live.len());
		set.update(11.0, &walls, &mut visuals);
		assert!(visuals.live.is_empty());
		assert_eq!(2, visuals.released.len());
	}
	#[test]
	fn clear_releases_visuals() {
		let (dims, walls) = world();
		let config = FlockConfig::default();
		let mut visuals = RecordingVisuals::default();
		let mut goals = Goals::new(dims, &config);
		goals.add_goal_at(0, Vec2::new(100.0, 100.0), &walls, &mut visuals).unwrap();
		goals.add_goal_at(2, Vec2::new(10.0, 100.0), &walls, &mut visuals).unwrap();
		goals.clear(&walls, &mut visuals);
		assert!(visuals.live.is_empty());
		assert_eq!(Vec2::ZERO, goals.force_at(0, Vec2::new(90.0, 100.0)).unwrap());
	}
	#[test]
	fn tags_are_independent() {
		let (dims, walls) = world();
		let config = FlockConfig::default();
		let mut goals = Goals::new(dims, &config);
		goals.add_goal_at(1, Vec2::new(100.0, 100.0), &walls, &mut ()).unwrap();
		let result = goals.force_at(0, Vec2::new(90.0, 100.0)).unwrap();
		assert_eq!(Vec2::ZERO, result);
		let result = goals.force_at(1, Vec2::new(90.0, 100.0)).unwrap();
		assert!(result.x > 0.0);
	}
	#[test]
	fn unknown_tag_is_error() {
		let (dims, walls) = world();
		let config = FlockConfig::default();
		let mut goals = Goals::new(dims, &config);
		let result = goals.add_goal_at(config.tag_count, Vec2::ZERO, &walls, &mut ());
		assert!(matches!(result, Err(FlockError::UnknownTag { .. })));
		let result = goals.force_at(99, Vec2::ZERO);
		assert!(matches!(result, Err(FlockError::UnknownTag { tag: 99, .. })));
	}
	#[test]
	fn update_counts_across_tags() {
		let (dims, walls) = world();
		let config = FlockConfig {
			goal_lifetime: 5.0,
			..default()
		};
		let mut goals = Goals::new(dims, &config);
		goals.add_goal_at(0, Vec2::new(10.0, 10.0), &walls, &mut ()).unwrap();
		goals.add_goal_at(1, Vec2::new(50.0, 10.0), &walls, &mut ()).unwrap();
		goals.add_goal_at(1, Vec2::new(90.0, 10.0), &walls, &mut ()).unwrap();
		let result = goals.update(6.0, &walls, &mut ());
		let actual = 3;
		assert_eq!(actual, result);
	}
}
