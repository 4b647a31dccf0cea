//! # Towpath Simulator
//!
//! Independent re-simulation of winding programs from text. Used to
//! validate planner output or to evaluate hand-edited and streamed-back
//! programs: the simulator depends only on the command sequence itself,
//! recovering mandrel geometry from the embedded `; Parameters` header.

pub mod error;
pub mod simulator;

pub use error::SimulationError;
pub use simulator::{simulate_program, SimulationResult, DEFAULT_FEED_RATE_MMPM};
