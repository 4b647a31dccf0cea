//! Error types for program simulation.

use thiserror::Error;

/// Errors raised when a program cannot be simulated.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The program contained no lines at all.
    #[error("Program is empty")]
    EmptyProgram,

    /// No `; Parameters` comment was found; the simulator cannot assume
    /// any implicit geometry.
    #[error("Unable to locate Parameters header in program")]
    MissingHeader,

    /// The Parameters header payload is not valid JSON.
    #[error("Malformed Parameters header: {0}")]
    MalformedHeader(#[source] serde_json::Error),

    /// A numeric token could not be parsed.
    #[error("Line {line_number}: malformed token '{token}'")]
    MalformedToken {
        /// 1-based program line.
        line_number: usize,
        /// The offending token.
        token: String,
    },

    /// The fallback feed rate must be positive.
    #[error("Default feed rate must be positive, got {rate} mm/min")]
    NonPositiveDefaultFeedRate {
        /// The rejected rate (mm/min).
        rate: f64,
    },

    /// A motion command was accounted while the active feed rate was not
    /// positive, so its duration cannot be estimated.
    #[error("Line {line_number}: encountered non-positive feed rate during motion")]
    NonPositiveFeedRate {
        /// 1-based program line.
        line_number: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_line_context() {
        let err = SimulationError::MalformedToken {
            line_number: 12,
            token: "Xabc".to_string(),
        };
        assert_eq!(err.to_string(), "Line 12: malformed token 'Xabc'");
    }
}
