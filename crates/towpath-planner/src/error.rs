//! Error types for wind planning.

use thiserror::Error;
use towpath_core::WindFileError;

/// Machine-level precondition violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    /// A move was requested before any feed rate was set.
    #[error("Feed rate must be set before moving the machine")]
    FeedRateNotSet,

    /// Feed rates must be strictly positive.
    #[error("Feed rate must be positive, got {rate} mm/min")]
    NonPositiveFeedRate {
        /// The rejected rate (mm/min).
        rate: f64,
    },
}

/// Errors raised while generating a single layer's toolpath.
///
/// Layer generation is all-or-nothing: these are returned before any
/// command is emitted for the layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    /// The wind angle must lie strictly between 0 and 90 degrees.
    #[error("Wind angle {angle} degrees is outside the open interval (0, 90)")]
    WindAngleOutOfRange {
        /// The rejected angle (degrees).
        angle: f64,
    },

    /// The pattern parameters revisit start positions before covering all
    /// circuits, leaving gaps on the mandrel surface.
    #[error(
        "Pattern number {pattern_number} with skip index {skip_index} \
         cannot cover {circuits} circuits without gaps"
    )]
    IncompleteCoverage {
        /// Requested pattern group count.
        pattern_number: u32,
        /// Requested pattern-group stride.
        skip_index: u32,
        /// Circuit count the geometry requires.
        circuits: u32,
    },

    /// The lead-in cannot be longer than the wind length.
    #[error("Lead-in of {lead_in_mm} mm exceeds the wind length of {wind_length_mm} mm")]
    LeadInTooLong {
        /// Requested lead-in (mm).
        lead_in_mm: f64,
        /// Available wind length (mm).
        wind_length_mm: f64,
    },

    /// A machine precondition was violated mid-layer.
    #[error(transparent)]
    Machine(#[from] MachineError),
}

/// Errors raised while planning a wind program.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The wind definition failed validation.
    #[error(transparent)]
    InvalidDefinition(#[from] WindFileError),

    /// The wind definition contains no layers.
    #[error("Wind definition contains no layers")]
    NoLayers,

    /// A machine precondition was violated.
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// A layer could not produce a valid path.
    #[error("Layer {index}: {source}")]
    Layer {
        /// 1-based index of the failing layer.
        index: usize,
        /// The underlying layer failure.
        #[source]
        source: LayerError,
    },
}
