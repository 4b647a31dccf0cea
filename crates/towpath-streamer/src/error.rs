//! Error types for program streaming.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while streaming a program to a controller.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The loaded program contained no commands.
    #[error("G-code program contained no commands")]
    EmptyProgram,

    /// Streaming was requested before a program was loaded.
    #[error("No program loaded")]
    NoProgramLoaded,

    /// A pause was requested while already paused.
    #[error("Stream is already paused")]
    AlreadyPaused,

    /// A resume was requested while not paused.
    #[error("Stream is not paused")]
    NotPaused,

    /// The controller did not acknowledge a command in time.
    #[error("Timed out after {timeout:?} waiting for controller response")]
    ResponseTimeout {
        /// The acknowledgement deadline that elapsed.
        timeout: Duration,
    },

    /// The controller reported an error for a sent command.
    #[error("Controller reported: {message}")]
    Controller {
        /// The controller's error line, verbatim.
        message: String,
    },

    /// The underlying transport failed.
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}
