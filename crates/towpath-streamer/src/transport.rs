//! Transport seam between the streamer and a physical controller.

use std::io;
use std::time::Duration;

/// Minimal line-oriented interface the streamer drives.
///
/// Implementations own the physical link (serial port, socket, test
/// double); the streamer never touches I/O primitives directly and can be
/// exercised end to end against a scripted transport.
pub trait SerialTransport {
    /// Write one command line. The transport appends any line terminator
    /// the link requires.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Read one response line, or `None` when `timeout` elapses first.
    fn read_line(&mut self, timeout: Duration) -> io::Result<Option<String>>;

    /// Close the link.
    fn close(&mut self) -> io::Result<()>;
}
