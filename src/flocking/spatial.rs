//! Agents find their neighbours through a [SpatialIndex]. The index groups snapshots of agents into
//! buckets and hands an agent only the buckets which could contain agents within its vision.
//!
//! [BucketGrid] is a uniform grid with buckets as large as the vision radius, so an agent only
//! needs the 3x3 block of buckets around its own. Any other grouping may be substituted by
//! implementing [SpatialIndex].
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Position and velocity of an agent frozen at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AgentSnapshot {
	/// Identity of the agent
	pub index: usize,
	/// Position at the start of the tick
	pub position: Vec2,
	/// Velocity at the start of the tick
	pub velocity: Vec2,
}

/// Groups agents for neighbour queries
pub trait SpatialIndex {
	/// Buckets of agents which may lie close to `position`. Implementations must not hand out any
	/// agent more than once
	fn candidates_for(&self, position: Vec2) -> Vec<&[AgentSnapshot]>;
}

/// Every agent is a candidate of every other agent
impl SpatialIndex for [AgentSnapshot] {
	fn candidates_for(&self, _position: Vec2) -> Vec<&[AgentSnapshot]> {
		vec![self]
	}
}

/// Uniform grid of buckets rebuilt from snapshots every tick
#[derive(Resource, Debug, Default, Clone)]
pub struct BucketGrid {
	/// Width and height of a bucket
	bucket_size: f32,
	/// Number of bucket columns
	columns: usize,
	/// Number of bucket rows
	rows: usize,
	/// Snapshots in each bucket, column-major
	buckets: Vec<Vec<AgentSnapshot>>,
}

impl BucketGrid {
	/// Create a new instance of [BucketGrid] and fill it
	pub fn new<I: IntoIterator<Item = AgentSnapshot>>(
		dimensions: &WorldDimensions,
		bucket_size: f32,
		snapshots: I,
	) -> Self {
		let mut grid = BucketGrid::default();
		grid.rebuild(dimensions, bucket_size, snapshots);
		grid
	}
	pub fn get_bucket_size(&self) -> f32 {
		self.bucket_size
	}
	/// Total number of agents held
	pub fn len(&self) -> usize {
		self.buckets.iter().map(|b| b.len()).sum()
	}
	/// True when no agents are held
	pub fn is_empty(&self) -> bool {
		self.buckets.iter().all(|b| b.is_empty())
	}
	/// Discard the current contents and bucket `snapshots` afresh. A `bucket_size` below `1` is
	/// raised to `1`
	pub fn rebuild<I: IntoIterator<Item = AgentSnapshot>>(
		&mut self,
		dimensions: &WorldDimensions,
		bucket_size: f32,
		snapshots: I,
	) {
		self.bucket_size = bucket_size.max(1.0);
		self.columns = (dimensions.get_width() / self.bucket_size).floor() as usize + 1;
		self.rows = (dimensions.get_height() / self.bucket_size).floor() as usize + 1;
		self.buckets.clear();
		self.buckets.resize_with(self.columns * self.rows, Vec::new);
		for snapshot in snapshots {
			let (column, row) = self.bucket_of(snapshot.position);
			self.buckets[column * self.rows + row].push(snapshot);
		}
	}
	/// Bucket `(column, row)` of a position, positions beyond the world are clamped to the edge
	/// buckets
	fn bucket_of(&self, position: Vec2) -> (usize, usize) {
		let column = (position.x / self.bucket_size).floor().max(0.0) as usize;
		let row = (position.y / self.bucket_size).floor().max(0.0) as usize;
		(
			column.min(self.columns.saturating_sub(1)),
			row.min(self.rows.saturating_sub(1)),
		)
	}
}

impl SpatialIndex for BucketGrid {
	fn candidates_for(&self, position: Vec2) -> Vec<&[AgentSnapshot]> {
		if self.buckets.is_empty() {
			return Vec::new();
		}
		let (column, row) = self.bucket_of(position);
		let mut candidates = Vec::with_capacity(9);
		for c in column.saturating_sub(1)..=(column + 1).min(self.columns - 1) {
			for r in row.saturating_sub(1)..=(row + 1).min(self.rows - 1) {
				let bucket = &self.buckets[c * self.rows + r];
				if !bucket.is_empty() {
					candidates.push(bucket.as_slice());
				}
			}
		}
		candidates
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	fn snap(index: usize, x: f32, y: f32) -> AgentSnapshot {
		AgentSnapshot {
			index,
			position: Vec2::new(x, y),
			velocity: Vec2::ZERO,
		}
	}
	fn dims() -> WorldDimensions {
		WorldDimensions::new(500.0, 500.0, 20.0, 20.0)
	}
	#[test]
	fn slice_is_one_bucket() {
		let agents = vec![snap(0, 1.0, 1.0), snap(1, 400.0, 400.0)];
		let result = agents.as_slice().candidates_for(Vec2::ZERO);
		assert_eq!(1, result.len());
		assert_eq!(2, result[0].len());
	}
	#[test]
	fn rebuild_holds_every_agent() {
		let agents = vec![snap(0, 1.0, 1.0), snap(1, 400.0, 400.0), snap(2, 500.0, 500.0)];
		let grid = BucketGrid::new(&dims(), 50.0, agents);
		assert_eq!(3, grid.len());
	}
	#[test]
	fn near_agents_are_candidates() {
		let agents = vec![snap(0, 100.0, 100.0), snap(1, 140.0, 60.0), snap(2, 400.0, 400.0)];
		let grid = BucketGrid::new(&dims(), 50.0, agents);
		let result: Vec<usize> = grid
			.candidates_for(Vec2::new(100.0, 100.0))
			.iter()
			.flat_map(|b| b.iter().map(|s| s.index))
			.collect();
		assert!(result.contains(&0));
		assert!(result.contains(&1));
		assert!(!result.contains(&2));
	}
	#[test]
	fn agent_beyond_edge_clamped() {
		let agents = vec![snap(0, -30.0, 520.0)];
		let grid = BucketGrid::new(&dims(), 50.0, agents);
		let result = grid.candidates_for(Vec2::new(10.0, 490.0));
		assert_eq!(1, result.len());
	}
	#[test]
	fn empty_grid_has_no_candidates() {
		let grid = BucketGrid::default();
		assert!(grid.is_empty());
		assert!(grid.candidates_for(Vec2::ZERO).is_empty());
	}
}
