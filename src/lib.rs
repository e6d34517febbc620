//! Meshplan plans two-dimensional parameter sweeps. A sweep is sampled on a
//! rectangular mesh of two coordinate axes; a physics model maps the
//! coordinates to derived quantities (e.g. gate voltages); and admissibility
//! constraints, written as arithmetic formulas over the mesh labels, mask out
//! points that must not be visited. The masked mesh is then cut into one
//! contiguous hardware ramp per row.

pub mod axis;
pub mod config;
pub mod error;
pub mod expression;
pub mod grid;
pub mod mesh;
pub mod ramp;
pub mod registry;

pub use error::Error;
