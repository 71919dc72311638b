//! Boids are a means of simulating a crowd of actors which move together
//! like a flock of birds or a school of fish.
//!
//! [Craig Reynolds - Boids](https://www.red3d.com/cwr/boids/)
//!
//! [Steering Behaviors For Autonomous Characters](https://www.red3d.com/cwr/steer/gdc99/)
//!
//! Every boid (agent) sums a series of steering forces each tick and then integrates them into its
//! velocity and position:
//!
//! * Flocking - alignment, cohesion and separation computed from the neighbours a spatial index
//! reports near the agent
//! * Goal seeking - a lookup into the [fields::force_field::ForceField] of the agent's tag
//! * Obstacle avoidance - a raycast along the current heading against the [fields::wall_map::WallMap],
//! rotating the heading until a clear direction is found
//! * Perturbations - pointer attraction/repulsion and explosions
//!
//! The world is broken into a grid of cells. Walls are described as inclusive rectangles of cells
//! and each tag owns a force field over that grid. A force field is rebuilt whenever the goals of
//! its tag change, using a multi-source Dijkstra search seeded from every live goal so each cell
//! points one step closer to its nearest goal:
//!
//! ```text
//!  _______________________
//! |  →|  →|  →|  ↓|  ←|  ←|
//! |___|___|___|___|___|___|
//! |  ↑|  X|  X|  ↓|  ←|  ←|
//! |___|___|___|___|___|___|
//! |  ↑|  X|  →|  G|  ←|  ←|
//! |___|___|___|___|___|___|
//! |  ↑|  X|  →|  ↑|  ↑|  ←|
//! |___|___|___|___|___|___|
//! ```
//!
//! Definitions:
//!
//! * Tag - a partition of agents and goals, agents only follow the force field of their own tag
//! * Goal - a transient attractor with a finite lifetime
//! * Wall region - a rectangular range of grid cells impassable to pathing and raycasting
//! * Force field - a grid of precomputed steering vectors guiding agents toward the nearest live goal
//!

pub mod agent;
pub mod config;
pub mod error;
pub mod fields;
pub mod goals;
pub mod perturbation;
pub mod priority_queue;
pub mod spatial;
pub mod utilities;
pub mod vector;
