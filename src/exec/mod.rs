//! Execution layer: the run driver and the control handle given to tasks.

pub mod controller;
pub mod executor;

pub use controller::Controller;
pub use executor::{Executor, RunId, RunReport};
