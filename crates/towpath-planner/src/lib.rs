//! # Towpath Planner
//!
//! Toolpath planning for filament winding: turns a declarative
//! [`WindDefinition`](towpath_core::WindDefinition) into a discretized
//! multi-axis motion program while tracking elapsed time and tow
//! consumption.
//!
//! The planning core is single-threaded and synchronous. Each run owns one
//! [`WinderMachine`] exclusively for its duration; nothing is shared
//! between runs.

pub mod error;
pub mod layers;
pub mod machine;
pub mod planner;

pub use error::{LayerError, MachineError, PlanError};
pub use layers::layer_summary;
pub use machine::{MoveTarget, WinderMachine};
pub use planner::{plan_wind, LayerMetrics, PlanOptions, PlanResult};
