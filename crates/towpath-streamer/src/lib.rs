//! # Towpath Streamer
//!
//! The narrow contract through which planned programs reach a physical
//! controller: a line-oriented [`SerialTransport`] seam, and a
//! [`GcodeStreamer`] that sanitizes, queues, and streams a program with
//! per-command acknowledgement, dry-run support, and pause/resume.
//!
//! Live link backends (serial ports and their handshakes) live outside
//! this crate; they plug in by implementing [`SerialTransport`].

pub mod error;
pub mod streamer;
pub mod transport;

pub use error::StreamError;
pub use streamer::{GcodeStreamer, StreamProgress, DEFAULT_RESPONSE_TIMEOUT};
pub use transport::SerialTransport;
