//! Errors reported by the flocking core
//!

use thiserror::Error;

/// Usage errors returned by queries and constructors. None of them are fatal to the simulation,
/// callers log them and carry on with the remaining agents
#[derive(Debug, Error)]
pub enum FlockError {
	/// A world position was queried which lies outside of the grid
	#[error("position ({x}, {y}) is outside of the world ({width} x {height})")]
	OutOfBounds {
		/// Queried x
		x: f32,
		/// Queried y
		y: f32,
		/// World width
		width: f32,
		/// World height
		height: f32,
	},
	/// A tag index beyond the number of goal sets
	#[error("tag {tag} does not exist, there are {tag_count} tags")]
	UnknownTag {
		/// Requested tag
		tag: usize,
		/// Number of tags configured
		tag_count: usize,
	},
	/// A configuration value cannot be used
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
	/// Failed to read a file
	#[cfg(feature = "ron")]
	#[error("failed reading file: {0}")]
	Io(#[from] std::io::Error),
	/// Failed to deserialise a ron file
	#[cfg(feature = "ron")]
	#[error("failed deserializing ron: {0}")]
	Ron(#[from] ron::error::SpannedError),
}
