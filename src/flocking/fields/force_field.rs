//! A ForceField is a grid of steering vectors covering the world, one per tag. Each cell points one
//! step closer to the nearest live goal of that tag, routing around walls.
//!
//! Built with a multi-source Dijkstra search: every goal cell is seeded with a distance of `0`
//! and the frontier expands through the four orthogonal neighbours of each cell with a uniform
//! edge weight of `1`. As a cell is reached its predecessor (the cell it was reached from) is
//! recorded, once the search completes every cell with a predecessor is given a vector pointing
//! at it, scaled to a fixed magnitude:
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  X  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  4  |  X  |  0  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Walls (`X`) are never entered so they keep a distance of infinity and a zero force, as do cells
//! which no goal can reach.
//!
//! Every change of goals rebuilds the whole field from scratch. On large grids with frequent goal
//! churn this is the main cost of the simulation, see the `calc_force_field` benchmark.
//!

use std::collections::BTreeMap;

use crate::prelude::*;
use bevy::prelude::*;

/// Distances and steering vectors of every grid cell for a single tag
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ForceField {
	/// Size of the world covered
	dimensions: WorldDimensions,
	/// Number of grid columns
	columns: usize,
	/// Number of grid rows
	rows: usize,
	/// Grid hops from each cell to its nearest goal, column-major
	distances: Vec<f32>,
	/// Steering vector of each cell, column-major
	forces: Vec<Vec2>,
	/// Magnitude of every non-zero force
	goal_force: f32,
}

impl Field<Vec2> for ForceField {
	fn get_dimensions(&self) -> &WorldDimensions {
		&self.dimensions
	}
	/// Retrieve the force of a cell
	fn get_field_cell_value(&self, grid_cell: GridCell) -> Vec2 {
		match self.index_of(grid_cell) {
			Some(i) => self.forces[i],
			None => panic!(
				"Cell {:?} is outside of the {}x{} force field",
				grid_cell, self.columns, self.rows
			),
		}
	}
	/// Set the force of a cell
	fn set_field_cell_value(&mut self, value: Vec2, grid_cell: GridCell) {
		match self.index_of(grid_cell) {
			Some(i) => self.forces[i] = value,
			None => panic!(
				"Cell {:?} is outside of the {}x{} force field",
				grid_cell, self.columns, self.rows
			),
		}
	}
}

impl ForceField {
	/// Create a new instance of [ForceField] with no goals, every force is zero
	pub fn new(dimensions: WorldDimensions, goal_force: f32) -> Self {
		let columns = dimensions.get_grid_columns();
		let rows = dimensions.get_grid_rows();
		ForceField {
			dimensions,
			columns,
			rows,
			distances: vec![f32::INFINITY; columns * rows],
			forces: vec![Vec2::ZERO; columns * rows],
			goal_force,
		}
	}
	pub fn get_columns(&self) -> usize {
		self.columns
	}
	pub fn get_rows(&self) -> usize {
		self.rows
	}
	pub fn get_goal_force(&self) -> f32 {
		self.goal_force
	}
	/// Position of a cell in the field arrays
	fn index_of(&self, grid_cell: GridCell) -> Option<usize> {
		let (column, row) = grid_cell.get_column_row();
		if column < self.columns && row < self.rows {
			Some(column * self.rows + row)
		} else {
			None
		}
	}
	/// Set every distance to infinity and every force to zero
	pub fn reset(&mut self) {
		self.distances.fill(f32::INFINITY);
		self.forces.fill(Vec2::ZERO);
	}
	/// Grid hops from a cell to its nearest goal, infinity if no goal can reach it. `None` if the
	/// cell is outside of the grid
	pub fn distance_at_cell(&self, grid_cell: GridCell) -> Option<f32> {
		self.index_of(grid_cell).map(|i| self.distances[i])
	}
	/// Force of a cell, `None` if the cell is outside of the grid
	pub fn force_at_cell(&self, grid_cell: GridCell) -> Option<Vec2> {
		self.index_of(grid_cell).map(|i| self.forces[i])
	}
	/// Force of the cell a world position falls into
	pub fn force_at(&self, position: Vec2) -> Result<Vec2, FlockError> {
		match self.dimensions.get_grid_cell_from_xy(position) {
			Ok(cell) => Ok(self.get_field_cell_value(cell)),
			Err(e) => {
				error!("Force field lookup failed: {}", e);
				Err(e)
			}
		}
	}
	/// Rebuild the field from scratch so that every reachable cell points towards the nearest of
	/// `goals`. Goals outside of the world or inside of a wall are skipped
	pub fn recalculate<I: IntoIterator<Item = Vec2>>(&mut self, goals: I, walls: &WallMap) {
		self.reset();
		let mut predecessors: BTreeMap<GridCell, GridCell> = BTreeMap::new();
		let mut finalised = vec![false; self.columns * self.rows];
		// lowest distance first
		let mut queue = PriorityQueue::with_capacity(
			self.columns * self.rows,
			|a: &(f32, GridCell), b: &(f32, GridCell)| a.0 < b.0,
		);
		let mut seeded = 0;
		for goal in goals {
			let cell = match self.dimensions.get_grid_cell_from_xy(goal) {
				Ok(cell) => cell,
				Err(e) => {
					error!("Goal skipped: {}", e);
					continue;
				}
			};
			if walls.has_wall_at_cell(cell) {
				debug!("Goal at {} is inside a wall, skipping", goal);
				continue;
			}
			let Some(i) = self.index_of(cell) else {
				continue;
			};
			self.distances[i] = 0.0;
			queue.push((0.0, cell));
			seeded += 1;
		}
		while let Some((distance, cell)) = queue.pop() {
			let Some(i) = self.index_of(cell) else {
				continue;
			};
			// stale entry of a cell already reached by a shorter route
			if finalised[i] {
				continue;
			}
			finalised[i] = true;
			for neighbour in cell.get_orthogonal_neighbours(self.columns, self.rows) {
				let Some(n) = self.index_of(neighbour) else {
					continue;
				};
				if finalised[n] || walls.has_wall_at_cell(neighbour) {
					continue;
				}
				let alternative = distance + 1.0;
				if alternative < self.distances[n] {
					self.distances[n] = alternative;
					predecessors.insert(neighbour, cell);
					queue.push((alternative, neighbour));
				}
			}
		}
		for (cell, predecessor) in predecessors.iter() {
			let direction = Vec2::new(
				predecessor.get_column() as f32 - cell.get_column() as f32,
				predecessor.get_row() as f32 - cell.get_row() as f32,
			);
			self.set_field_cell_value(direction.set_magnitude(self.goal_force), *cell);
		}
		debug!(
			"Force field rebuilt from {} goals, {} cells point to a goal",
			seeded,
			predecessors.len()
		);
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	fn dims() -> WorldDimensions {
		WorldDimensions::new(200.0, 200.0, 20.0, 20.0)
	}
	/// Unit step in grid space described by a force
	fn step(force: Vec2) -> (i32, i32) {
		(force.x.round() as i32, force.y.round() as i32)
	}
	#[test]
	fn grid_size() {
		let field = ForceField::new(dims(), 1.0);
		let result = (field.get_columns(), field.get_rows());
		let actual = (11, 11);
		assert_eq!(actual, result);
	}
	#[test]
	fn no_goals_all_zero() {
		let walls = WallMap::new(vec![], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(Vec::new(), &walls);
		for column in 0..field.get_columns() {
			for row in 0..field.get_rows() {
				let cell = GridCell::new(column, row);
				assert_eq!(Some(Vec2::ZERO), field.force_at_cell(cell));
				assert_eq!(Some(f32::INFINITY), field.distance_at_cell(cell));
			}
		}
	}
	#[test]
	fn goal_cell_has_zero_distance_and_force() {
		let walls = WallMap::new(vec![], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(vec![Vec2::new(100.0, 100.0)], &walls);
		let cell = GridCell::new(5, 5);
		assert_eq!(Some(0.0), field.distance_at_cell(cell));
		assert_eq!(Some(Vec2::ZERO), field.force_at_cell(cell));
	}
	#[test]
	fn force_points_at_goal() {
		let walls = WallMap::new(vec![], dims());
		let mut field = ForceField::new(dims(), 0.3);
		field.recalculate(vec![Vec2::new(100.0, 100.0)], &walls);
		let result = field.force_at(Vec2::new(90.0, 100.0)).unwrap();
		assert!(result.x > 0.0);
		assert!((result.length() - 0.3).abs() < 0.0001);
	}
	#[test]
	fn following_forces_descends() {
		let walls = WallMap::new(vec![], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(vec![Vec2::new(130.0, 50.0)], &walls);
		let goal = GridCell::new(6, 2);
		for column in 0..field.get_columns() {
			for row in 0..field.get_rows() {
				let mut cell = GridCell::new(column, row);
				let mut hops = 0;
				while cell != goal {
					let distance = field.distance_at_cell(cell).unwrap();
					let (dx, dy) = step(field.get_field_cell_value(cell));
					assert_eq!(1, dx.abs() + dy.abs());
					cell = GridCell::new(
						(cell.get_column() as i32 + dx) as usize,
						(cell.get_row() as i32 + dy) as usize,
					);
					let next = field.distance_at_cell(cell).unwrap();
					assert!(next < distance);
					hops += 1;
					assert!(hops <= field.get_columns() + field.get_rows());
				}
			}
		}
	}
	#[test]
	fn walls_have_zero_force() {
		let regions = vec![WallRegion::new((3, 0), (3, 7)), WallRegion::new((6, 4), (9, 5))];
		let walls = WallMap::new(regions, dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(
			vec![Vec2::new(10.0, 10.0), Vec2::new(190.0, 190.0)],
			&walls,
		);
		for column in 0..field.get_columns() {
			for row in 0..field.get_rows() {
				let cell = GridCell::new(column, row);
				if walls.has_wall_at_cell(cell) {
					assert_eq!(Some(Vec2::ZERO), field.force_at_cell(cell));
					assert_eq!(Some(f32::INFINITY), field.distance_at_cell(cell));
				}
			}
		}
	}
	#[test]
	fn detour_around_wall() {
		// a wall straight across the grid apart from a gap in the bottom row
		let walls = WallMap::new(vec![WallRegion::new((5, 0), (5, 9))], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(vec![Vec2::new(130.0, 10.0)], &walls);
		// directly west of the wall the only route is south to the gap
		let result = step(field.get_field_cell_value(GridCell::new(4, 0)));
		let actual = (0, 1);
		assert_eq!(actual, result);
		// (4, 0) down to (4, 10), through (5, 10), then up to (6, 0)
		let result = field.distance_at_cell(GridCell::new(4, 0)).unwrap();
		let actual = 10.0 + 2.0 + 10.0;
		assert_eq!(actual, result);
	}
	#[test]
	fn unreachable_cells_zero() {
		// box the top-left corner off
		let regions = vec![WallRegion::new((0, 2), (2, 2)), WallRegion::new((2, 0), (2, 1))];
		let walls = WallMap::new(regions, dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(vec![Vec2::new(150.0, 150.0)], &walls);
		let result = field.force_at_cell(GridCell::new(0, 0));
		assert_eq!(Some(Vec2::ZERO), result);
	}
	#[test]
	fn nearest_goal_wins() {
		let walls = WallMap::new(vec![], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(
			vec![Vec2::new(10.0, 10.0), Vec2::new(190.0, 10.0)],
			&walls,
		);
		assert!(field.force_at(Vec2::new(50.0, 10.0)).unwrap().x < 0.0);
		assert!(field.force_at(Vec2::new(150.0, 10.0)).unwrap().x > 0.0);
	}
	#[test]
	fn recalculate_idempotent() {
		let walls = WallMap::new(vec![WallRegion::new((4, 2), (6, 8))], dims());
		let goals = vec![Vec2::new(30.0, 170.0), Vec2::new(190.0, 50.0)];
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(goals.clone(), &walls);
		let first = field.clone();
		field.recalculate(goals, &walls);
		assert_eq!(first, field);
	}
	#[test]
	fn goal_in_wall_skipped() {
		let walls = WallMap::new(vec![WallRegion::new((0, 0), (1, 1))], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(vec![Vec2::new(10.0, 10.0)], &walls);
		let result = field.force_at(Vec2::new(100.0, 100.0)).unwrap();
		assert_eq!(Vec2::ZERO, result);
	}
	#[test]
	fn goal_outside_world_skipped() {
		let walls = WallMap::new(vec![], dims());
		let mut field = ForceField::new(dims(), 1.0);
		field.recalculate(vec![Vec2::new(-10.0, 10.0)], &walls);
		let result = field.force_at(Vec2::new(100.0, 100.0)).unwrap();
		assert_eq!(Vec2::ZERO, result);
	}
	#[test]
	fn lookup_outside_world_is_error() {
		let field = ForceField::new(dims(), 1.0);
		let result = field.force_at(Vec2::new(100.0, 201.0));
		assert!(matches!(result, Err(FlockError::OutOfBounds { .. })));
	}
	#[test]
	#[should_panic]
	fn cell_outside_grid_panics() {
		let field = ForceField::new(dims(), 1.0);
		field.get_field_cell_value(GridCell::new(11, 0));
	}
}
