//! `use bevy_flocking_goals_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flocking::{
	agent::*,
	config::*,
	error::*,
	fields::{force_field::*, wall_map::*, *},
	goals::*,
	perturbation::*,
	priority_queue::*,
	spatial::*,
	utilities::*,
	vector::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{agent_layer::*, goal_layer::*, *},
};
