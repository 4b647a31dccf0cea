//! Queue and stream a planned program through a transport.

use std::time::{Duration, Instant};

use tracing::debug;

use towpath_core::{count_commands, sanitize_program};

use crate::error::StreamError;
use crate::transport::SerialTransport;

/// Default time to wait for a controller acknowledgement.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-command streaming progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamProgress {
    /// Commands sent so far, this one included.
    pub commands_sent: usize,
    /// Command lines in the loaded program, comments excluded.
    pub commands_total: usize,
    /// The command just sent.
    pub command: String,
    /// True when no transport traffic occurred.
    pub dry_run: bool,
}

/// Streams a sanitized program line by line, awaiting controller
/// acknowledgement of each command.
pub struct GcodeStreamer<T: SerialTransport> {
    transport: T,
    response_timeout: Duration,
    program: Vec<String>,
    cursor: usize,
    commands_sent: usize,
    commands_total: usize,
    paused: bool,
}

impl<T: SerialTransport> GcodeStreamer<T> {
    /// Create a streamer over `transport` with the default response
    /// timeout.
    pub fn new(transport: T) -> Self {
        Self::with_timeout(transport, DEFAULT_RESPONSE_TIMEOUT)
    }

    /// Create a streamer with an explicit acknowledgement timeout.
    pub fn with_timeout(transport: T, response_timeout: Duration) -> Self {
        Self {
            transport,
            response_timeout,
            program: Vec::new(),
            cursor: 0,
            commands_sent: 0,
            commands_total: 0,
            paused: false,
        }
    }

    /// Load and sanitize a program for streaming.
    pub fn load_program<I, S>(&mut self, commands: I) -> Result<(), StreamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sanitized = sanitize_program(commands);
        if sanitized.is_empty() {
            return Err(StreamError::EmptyProgram);
        }
        self.commands_total = count_commands(&sanitized);
        self.program = sanitized;
        self.cursor = 0;
        self.commands_sent = 0;
        Ok(())
    }

    /// Stream the loaded program, invoking `progress` after each sent
    /// command. Comments are logged, not sent. In dry-run mode nothing
    /// touches the transport.
    pub fn stream(
        &mut self,
        dry_run: bool,
        mut progress: impl FnMut(&StreamProgress),
    ) -> Result<(), StreamError> {
        if self.program.is_empty() {
            return Err(StreamError::NoProgramLoaded);
        }

        while self.cursor < self.program.len() {
            let line = self.program[self.cursor].clone();
            self.cursor += 1;

            if let Some(comment) = line.strip_prefix(';') {
                debug!(comment = comment.trim(), "program comment");
                continue;
            }

            if !dry_run {
                self.send_command(&line)?;
            }
            self.commands_sent += 1;
            progress(&StreamProgress {
                commands_sent: self.commands_sent,
                commands_total: self.commands_total,
                command: line,
                dry_run,
            });
        }
        Ok(())
    }

    /// Send `M0` asking the controller to pause.
    pub fn pause(&mut self) -> Result<(), StreamError> {
        if self.paused {
            return Err(StreamError::AlreadyPaused);
        }
        self.send_command("M0")?;
        self.paused = true;
        Ok(())
    }

    /// Send `M108` to resume after [`pause`](Self::pause).
    pub fn resume(&mut self) -> Result<(), StreamError> {
        if !self.paused {
            return Err(StreamError::NotPaused);
        }
        self.send_command("M108")?;
        self.paused = false;
        Ok(())
    }

    /// Restart streaming from the first command.
    pub fn reset_progress(&mut self) {
        self.cursor = 0;
        self.commands_sent = 0;
        self.paused = false;
    }

    /// Close the underlying transport.
    pub fn close(mut self) -> Result<(), StreamError> {
        self.transport.close()?;
        Ok(())
    }

    /// Command lines in the loaded program, comments excluded.
    pub fn commands_total(&self) -> usize {
        self.commands_total
    }

    /// Commands sent so far.
    pub fn commands_sent(&self) -> usize {
        self.commands_sent
    }

    /// Commands still to send.
    pub fn commands_remaining(&self) -> usize {
        self.commands_total.saturating_sub(self.commands_sent)
    }

    /// Whether a pause has been requested and not yet resumed.
    pub fn paused(&self) -> bool {
        self.paused
    }

    fn send_command(&mut self, command: &str) -> Result<(), StreamError> {
        self.transport.write_line(command)?;
        self.await_ok()
    }

    /// Wait for `ok`, tolerating busy notices and surfacing controller
    /// errors. Busy lines push the deadline out; other lines are logged.
    fn await_ok(&mut self) -> Result<(), StreamError> {
        let mut deadline = Instant::now() + self.response_timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(StreamError::ResponseTimeout {
                    timeout: self.response_timeout,
                });
            }
            let Some(line) = self.transport.read_line(deadline - now)? else {
                continue;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "ok" {
                return Ok(());
            }
            if line.starts_with("echo:busy") {
                deadline = Instant::now() + self.response_timeout;
                continue;
            }
            if line.starts_with("Error") {
                return Err(StreamError::Controller {
                    message: line.to_string(),
                });
            }
            debug!(response = line, "controller message");
        }
    }
}
