//! # Towpath Core
//!
//! Core types shared across the Towpath filament winding toolchain:
//! the machine axis model, the wind definition configuration schema,
//! and helpers for the generated program text format.

pub mod axis;
pub mod error;
pub mod gcode;
pub mod wind;

pub use axis::Axis;
pub use error::{WindFileError, WindFileResult};
pub use gcode::{
    count_commands, format_number, is_comment, read_program, sanitize_program, write_program,
    Dialect, MOTION_OPCODES,
};
pub use wind::{
    HelicalLayer, HoopLayer, Layer, MandrelParameters, ParametersHeader, SkipLayer, TowParameters,
    WindDefinition, PARAMETERS_PREFIX,
};
