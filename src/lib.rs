//! This is a plugin for Bevy game engine to simulate flocks of boids which are steered towards
//! short-lived goals by obstacle-aware force fields
//!

pub mod bundle;
pub mod flocking;
pub mod plugin;

pub mod prelude;
