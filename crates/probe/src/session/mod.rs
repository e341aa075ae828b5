//! Debugging session state.
//!
//! A `Session` owns everything that persists between handler calls:
//! 1. **Counters:** Per-address misprediction counts.
//! 2. **Sink:** The optional log file receiving a copy of every record.
//! 3. **Console:** Where records and user-facing messages are always written.
//! 4. **Commands:** Parsing and dispatch of the debugger-facing commands.
//!
//! A session starts with an empty counter table and no sink. Nothing here is
//! global; hosts create one session and pass it to every call.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::warn;

use crate::common::{CaptureError, Result};
use crate::config::Config;

/// Debugger command parsing and dispatch.
pub mod command;

/// Per-address misprediction counters.
pub mod counters;

/// Log file sink.
pub mod sink;

pub use command::{Command, CommandOutcome};
pub use counters::MispredictCounters;
pub use sink::LogSink;

/// Result of [`Session::stop_log`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    /// The sink at this path was closed.
    Stopped(PathBuf),
    /// No sink was open.
    NotActive,
}

/// Session state shared by all handler calls.
pub struct Session {
    config: Config,
    counters: MispredictCounters,
    sink: Option<LogSink>,
    console: Box<dyn Write>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("counters", &self.counters)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session that writes to standard output.
    pub fn new(config: Config) -> Self {
        Self::with_console(config, io::stdout())
    }

    /// Creates a session that writes console output to `console`.
    pub fn with_console(config: Config, console: impl Write + 'static) -> Self {
        Self {
            config,
            counters: MispredictCounters::new(),
            sink: None,
            console: Box::new(console),
        }
    }

    /// Session configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Misprediction counters.
    pub const fn counters(&self) -> &MispredictCounters {
        &self.counters
    }

    pub(crate) const fn counters_mut(&mut self) -> &mut MispredictCounters {
        &mut self.counters
    }

    /// Path of the open sink, if any.
    pub fn log_path(&self) -> Option<&std::path::Path> {
        self.sink.as_ref().map(LogSink::path)
    }

    /// Starts logging to `path`, closing any sink that is already open.
    ///
    /// A missing or empty path is a usage error and changes nothing. A failure
    /// closing the previous sink is reported and does not prevent opening the
    /// new one. If the new file cannot be opened the session is left without a
    /// sink.
    pub fn start_log(&mut self, path: Option<&str>) -> Result<PathBuf> {
        let path = match path.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => return Err(CaptureError::Usage("start_log <filename>")),
        };

        if let Some(previous) = self.sink.take() {
            let closing = previous.path().to_path_buf();
            if let Err(error) = previous.close() {
                warn!(path = %closing.display(), %error, "closing previous log failed");
                self.report(&format!("Error closing log {}: {error}", closing.display()));
            }
        }

        let sink = LogSink::open(path)?;
        let opened = sink.path().to_path_buf();
        self.sink = Some(sink);
        Ok(opened)
    }

    /// Stops logging. Reports [`StopOutcome::NotActive`] if no sink is open.
    pub fn stop_log(&mut self) -> Result<StopOutcome> {
        match self.sink.take() {
            Some(sink) => Ok(StopOutcome::Stopped(sink.close()?)),
            None => Ok(StopOutcome::NotActive),
        }
    }

    /// Writes a record to the console and, if logging, to the sink.
    ///
    /// The console copy is authoritative. A failed sink write is reported, the
    /// broken sink is dropped along with its unwritten bytes, and the record
    /// still counts as emitted. Only a console write failure is an error.
    pub fn emit(&mut self, record: &impl fmt::Display) -> Result<()> {
        let text = record.to_string();
        self.console.write_all(text.as_bytes())?;
        self.console.flush()?;
        let failed = match self.sink.as_mut() {
            Some(sink) => sink.write_record(&text).err(),
            None => None,
        };
        if let Some(error) = failed {
            let path = self.sink.take().map(LogSink::abandon).unwrap_or_default();
            warn!(path = %path.display(), %error, "log write failed; logging stopped");
            self.report(&format!(
                "Error writing log {}: {error}. Logging stopped.",
                path.display()
            ));
        }
        Ok(())
    }

    /// Prints a user-facing message line to the console only.
    pub fn report(&mut self, message: &str) {
        if let Err(e) = writeln!(self.console, "{message}").and_then(|()| self.console.flush()) {
            warn!(error = %e, "console write failed");
        }
    }
}
