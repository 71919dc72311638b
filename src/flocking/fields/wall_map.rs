//! Walls are described as inclusive rectangles of grid cells. A cell is a wall if any rectangle
//! covers it.
//!
//! Maps are built by hand from a small number of regions so lookups scan every region rather
//! than rasterising them into a grid.
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// An inclusive rectangle of grid cells, `min` and `max` are both part of the region
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct WallRegion {
	/// Lowest `(column, row)` covered
	min: (i32, i32),
	/// Highest `(column, row)` covered
	max: (i32, i32),
}

impl WallRegion {
	/// Create a new instance of [WallRegion] from two opposite corners given in any order
	pub fn new(a: (i32, i32), b: (i32, i32)) -> Self {
		WallRegion {
			min: (a.0.min(b.0), a.1.min(b.1)),
			max: (a.0.max(b.0), a.1.max(b.1)),
		}
	}
	pub fn get_min(&self) -> (i32, i32) {
		self.min
	}
	pub fn get_max(&self) -> (i32, i32) {
		self.max
	}
	/// Whether the grid `(column, row)` lies within the region
	pub fn contains(&self, column: i32, row: i32) -> bool {
		self.min.0 <= column && column <= self.max.0 && self.min.1 <= row && row <= self.max.1
	}
}

/// The obstacles of a world
#[derive(Component, Debug, Clone, Reflect)]
pub struct WallMap {
	/// Every wall rectangle, order is irrelevant
	regions: Vec<WallRegion>,
	/// Size of the world and its cells
	dimensions: WorldDimensions,
}

impl WallMap {
	/// Create a new instance of [WallMap]
	pub fn new(regions: Vec<WallRegion>, dimensions: WorldDimensions) -> Self {
		WallMap {
			regions,
			dimensions,
		}
	}
	pub fn get_regions(&self) -> &[WallRegion] {
		&self.regions
	}
	pub fn get_dimensions(&self) -> &WorldDimensions {
		&self.dimensions
	}
	/// Whether a wall covers the grid `(column, row)`. Coordinates outside of the grid are open
	/// unless a region explicitly extends over them
	pub fn has_wall_at_grid(&self, column: i32, row: i32) -> bool {
		self.regions.iter().any(|r| r.contains(column, row))
	}
	/// Whether a wall covers the [GridCell]
	pub fn has_wall_at_cell(&self, cell: GridCell) -> bool {
		self.has_wall_at_grid(cell.get_column() as i32, cell.get_row() as i32)
	}
	/// Whether a wall covers the cell a world position falls into
	pub fn has_wall_at_world(&self, position: Vec2) -> bool {
		let (column, row) = self.dimensions.world_to_grid(position);
		self.has_wall_at_grid(column, row)
	}
	/// Pick a random position within the world that is not inside a wall. If a handful of samples
	/// all land in walls the fixed [FALLBACK_FREE_POSITION] is returned instead, which is only
	/// guaranteed to be open on maps that leave it clear
	pub fn random_free_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
		let width = self.dimensions.get_width();
		let height = self.dimensions.get_height();
		for _ in 0..MAX_FREE_POSITION_ATTEMPTS {
			let candidate = Vec2::new(
				rng.random_range(0.0..width),
				rng.random_range(0.0..height),
			);
			if !self.has_wall_at_world(candidate) {
				return candidate;
			}
		}
		warn!(
			"No free position found after {} attempts, using fallback {}",
			MAX_FREE_POSITION_ATTEMPTS, FALLBACK_FREE_POSITION
		);
		FALLBACK_FREE_POSITION
	}
	/// Read a list of [WallRegion] from a `ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str, dimensions: WorldDimensions) -> Result<Self, FlockError> {
		let file = std::fs::File::open(path)?;
		let regions: Vec<WallRegion> = ron::de::from_reader(file)?;
		// corners in a file may be given in any order
		let regions = regions
			.into_iter()
			.map(|r| WallRegion::new(r.min, r.max))
			.collect();
		Ok(WallMap::new(regions, dimensions))
	}
}
