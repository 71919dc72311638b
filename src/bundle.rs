//! The world entity, its size and the per-world state agents steer against
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The `width` and `height` of the world in world units along with the size of a grid cell.
///
/// The world spans `0..=width` and `0..=height` inclusive, so the grid has one more column and row
/// than fit exactly into it, allowing the far edge itself to map to a cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WorldDimensions {
	/// Extent along x
	width: f32,
	/// Extent along y
	height: f32,
	/// Width of a grid cell
	cell_width: f32,
	/// Height of a grid cell
	cell_height: f32,
}

impl WorldDimensions {
	/// Create a new instance of [WorldDimensions]. Y grows downwards, the origin is the top-left
	/// corner of the world
	pub fn new(width: f32, height: f32, cell_width: f32, cell_height: f32) -> Self {
		if width <= 0.0 || height <= 0.0 {
			panic!(
				"World dimensions `({}, {})` must be positive",
				width, height
			);
		}
		if cell_width <= 0.0 || cell_height <= 0.0 {
			panic!(
				"Cell dimensions `({}, {})` must be positive",
				cell_width, cell_height
			);
		}
		WorldDimensions {
			width,
			height,
			cell_width,
			cell_height,
		}
	}
	/// Create a new instance of [WorldDimensions] using the cell size of a [FlockConfig]
	pub fn from_config(width: f32, height: f32, config: &FlockConfig) -> Self {
		WorldDimensions::new(width, height, config.cell_width, config.cell_height)
	}
	pub fn get_width(&self) -> f32 {
		self.width
	}
	pub fn get_height(&self) -> f32 {
		self.height
	}
	pub fn get_cell_width(&self) -> f32 {
		self.cell_width
	}
	pub fn get_cell_height(&self) -> f32 {
		self.cell_height
	}
	/// Number of grid columns
	pub fn get_grid_columns(&self) -> usize {
		(self.width / self.cell_width).floor() as usize + 1
	}
	/// Number of grid rows
	pub fn get_grid_rows(&self) -> usize {
		(self.height / self.cell_height).floor() as usize + 1
	}
	/// Whether a position lies within the world, edges included
	pub fn contains(&self, position: Vec2) -> bool {
		position.x >= 0.0
			&& position.x <= self.width
			&& position.y >= 0.0
			&& position.y <= self.height
	}
	/// Grid `(column, row)` a position falls into, without any bounds checking. Positions outside of
	/// the world produce coordinates outside of the grid, including negative ones
	pub fn world_to_grid(&self, position: Vec2) -> (i32, i32) {
		(
			(position.x / self.cell_width).floor() as i32,
			(position.y / self.cell_height).floor() as i32,
		)
	}
	/// From a position in world space find the [GridCell] it sits in
	pub fn get_grid_cell_from_xy(&self, position: Vec2) -> Result<GridCell, FlockError> {
		if !self.contains(position) {
			return Err(FlockError::OutOfBounds {
				x: position.x,
				y: position.y,
				width: self.width,
				height: self.height,
			});
		}
		let (column, row) = self.world_to_grid(position);
		Ok(GridCell::new(column as usize, row as usize))
	}
}

/// Everything the flock steers against, spawn it as a single entity
#[derive(Bundle)]
pub struct FlockWorldBundle {
	/// Size of the world
	dimensions: WorldDimensions,
	/// Obstacles
	walls: WallMap,
	/// Goals and force fields of each tag
	goals: Goals,
}

impl FlockWorldBundle {
	/// Create a new instance of [FlockWorldBundle] with walls covering `regions`
	pub fn new(width: f32, height: f32, regions: Vec<WallRegion>, config: &FlockConfig) -> Self {
		let dimensions = WorldDimensions::from_config(width, height, config);
		let walls = WallMap::new(regions, dimensions);
		let goals = Goals::new(dimensions, config);
		FlockWorldBundle {
			dimensions,
			walls,
			goals,
		}
	}
	/// Create a new instance of [FlockWorldBundle] where the wall regions are read from disk
	#[cfg(feature = "ron")]
	pub fn from_ron(
		width: f32,
		height: f32,
		path: &str,
		config: &FlockConfig,
	) -> Result<Self, FlockError> {
		let dimensions = WorldDimensions::from_config(width, height, config);
		let walls = WallMap::from_ron(path, dimensions)?;
		let goals = Goals::new(dimensions, config);
		Ok(FlockWorldBundle {
			dimensions,
			walls,
			goals,
		})
	}
	pub fn get_dimensions(&self) -> &WorldDimensions {
		&self.dimensions
	}
	pub fn get_walls(&self) -> &WallMap {
		&self.walls
	}
	pub fn get_goals(&self) -> &Goals {
		&self.goals
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn valid_world_dimensions() {
		let _dims = WorldDimensions::new(800.0, 600.0, 20.0, 20.0);
		assert!(true)
	}
	#[test]
	#[should_panic]
	fn invalid_world_dimensions() {
		WorldDimensions::new(-1.0, 600.0, 20.0, 20.0);
	}
	#[test]
	#[should_panic]
	fn invalid_cell_dimensions() {
		WorldDimensions::new(800.0, 600.0, 0.0, 20.0);
	}
	#[test]
	fn grid_covers_far_edge() {
		let dims = WorldDimensions::new(800.0, 600.0, 20.0, 20.0);
		let result = (dims.get_grid_columns(), dims.get_grid_rows());
		let actual = (41, 31);
		assert_eq!(actual, result);
	}
	#[test]
	fn far_corner_in_grid() {
		let dims = WorldDimensions::new(800.0, 600.0, 20.0, 20.0);
		let result = dims.get_grid_cell_from_xy(Vec2::new(800.0, 600.0)).unwrap();
		let actual = GridCell::new(40, 30);
		assert_eq!(actual, result);
	}
	#[test]
	fn position_to_cell() {
		let dims = WorldDimensions::new(800.0, 600.0, 20.0, 20.0);
		let result = dims.get_grid_cell_from_xy(Vec2::new(65.0, 19.9)).unwrap();
		let actual = GridCell::new(3, 0);
		assert_eq!(actual, result);
	}
	#[test]
	fn outside_is_error() {
		let dims = WorldDimensions::new(800.0, 600.0, 20.0, 20.0);
		let result = dims.get_grid_cell_from_xy(Vec2::new(-0.1, 10.0));
		assert!(matches!(result, Err(FlockError::OutOfBounds { .. })));
	}
	#[test]
	fn world_to_grid_negative() {
		let dims = WorldDimensions::new(800.0, 600.0, 20.0, 20.0);
		let result = dims.world_to_grid(Vec2::new(-5.0, 10.0));
		let actual = (-1, 0);
		assert_eq!(actual, result);
	}
	#[test]
	fn new_bundle() {
		let config = FlockConfig::default();
		let bundle = FlockWorldBundle::new(
			400.0,
			300.0,
			vec![WallRegion::new((2, 2), (4, 4))],
			&config,
		);
		let result = bundle.get_goals().tag_count();
		let actual = config.tag_count;
		assert_eq!(actual, result);
		assert!(bundle.get_walls().has_wall_at_cell(GridCell::new(3, 3)));
	}
}
