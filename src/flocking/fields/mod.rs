//! The grids agents are steered by
//!

pub mod force_field;
pub mod wall_map;

use crate::prelude::*;
use bevy::prelude::*;

/// Defines required access to field arrays
pub trait Field<T> {
	/// Size of the world the field covers
	fn get_dimensions(&self) -> &WorldDimensions;
	/// Retrieve a field cell value, panics if the cell lies outside of the grid
	fn get_field_cell_value(&self, grid_cell: GridCell) -> T;
	/// Set a field cell to a value, panics if the cell lies outside of the grid
	fn set_field_cell_value(&mut self, value: T, grid_cell: GridCell);
}

/// ID of a cell within a grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridCell((usize, usize));

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(column: usize, row: usize) -> Self {
		GridCell((column, row))
	}
	/// Get the cell `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the cell column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the cell row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// Find the orthogonal neighbours of the cell that lie within a grid of `columns` by `rows`, in
	/// the order north, east, south, west
	pub fn get_orthogonal_neighbours(&self, columns: usize, rows: usize) -> Vec<GridCell> {
		let mut neighbours = Vec::with_capacity(4);
		for dir in Cardinal::ALL {
			let (dx, dy) = dir.offset();
			let column = self.get_column() as i64 + dx as i64;
			let row = self.get_row() as i64 + dy as i64;
			if column >= 0 && row >= 0 && (column as usize) < columns && (row as usize) < rows {
				neighbours.push(GridCell::new(column as usize, row as usize));
			}
		}
		neighbours
	}
}
