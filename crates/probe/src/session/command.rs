//! Debugger-facing commands.
//!
//! The host registers four commands and forwards their argument text here:
//!
//! | Command            | Effect                                   |
//! |--------------------|------------------------------------------|
//! | `start_log <file>` | Begin or redirect logging to `<file>`    |
//! | `stop_log`         | End logging                              |
//! | `log_mispred`      | Record a misprediction detection         |
//! | `log_recovery_end` | Record a recovery completion             |
//!
//! Failures are printed and returned as [`CommandOutcome::Failed`]; they never
//! leave the session unusable.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use super::{Session, StopOutcome};
use crate::common::{CaptureError, Result};
use crate::events::{self, EventRecord};
use crate::introspect::Introspector;

/// A parsed debugger command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `start_log [file]`; the argument is `None` when omitted.
    StartLog(Option<String>),
    /// `stop_log`
    StopLog,
    /// `log_mispred`
    LogMispred,
    /// `log_recovery_end`
    LogRecoveryEnd,
}

impl Command {
    /// Every command name, in registration order.
    pub const NAMES: [&'static str; 4] = ["start_log", "stop_log", "log_mispred", "log_recovery_end"];

    /// Command name as typed at the debugger prompt.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartLog(_) => "start_log",
            Self::StopLog => "stop_log",
            Self::LogMispred => "log_mispred",
            Self::LogRecoveryEnd => "log_recovery_end",
        }
    }
}

impl FromStr for Command {
    type Err = CaptureError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match name {
            "start_log" => Ok(Self::StartLog(arg.map(str::to_string))),
            "stop_log" => Ok(Self::StopLog),
            "log_mispred" => Ok(Self::LogMispred),
            "log_recovery_end" => Ok(Self::LogRecoveryEnd),
            other => Err(CaptureError::UnknownCommand(other.to_string())),
        }
    }
}

/// What a command did.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Logging now goes to this path.
    Logging(PathBuf),
    /// The sink at this path was closed.
    Stopped(PathBuf),
    /// `stop_log` with no sink open.
    NotActive,
    /// A record was emitted.
    Recorded(EventRecord),
    /// The event fell outside the configured cycle window.
    Skipped,
    /// The command failed; the message has already been printed.
    Failed(CaptureError),
}

impl Session {
    /// Parses and runs one command line.
    pub fn run_line<I: Introspector + ?Sized>(&mut self, line: &str, intro: &I) -> CommandOutcome {
        match line.parse::<Command>() {
            Ok(cmd) => self.execute(&cmd, intro),
            Err(e) => self.fail("command", e),
        }
    }

    /// Runs one command against the current live state.
    pub fn execute<I: Introspector + ?Sized>(&mut self, cmd: &Command, intro: &I) -> CommandOutcome {
        match cmd {
            Command::StartLog(path) => match self.start_log(path.as_deref()) {
                Ok(path) => {
                    self.report(&format!("Logging to '{}'", path.display()));
                    CommandOutcome::Logging(path)
                }
                Err(e) => self.fail(cmd.name(), e),
            },
            Command::StopLog => match self.stop_log() {
                Ok(StopOutcome::Stopped(path)) => {
                    self.report("Stopped logging.");
                    CommandOutcome::Stopped(path)
                }
                Ok(StopOutcome::NotActive) => {
                    self.report("Logging is not active.");
                    CommandOutcome::NotActive
                }
                Err(e) => self.fail(cmd.name(), e),
            },
            Command::LogMispred => {
                let result = events::on_mispredict_detected(self, intro);
                self.record_outcome(cmd, result)
            }
            Command::LogRecoveryEnd => {
                let result = events::on_recovery_completed(self, intro);
                self.record_outcome(cmd, result)
            }
        }
    }

    fn record_outcome(&mut self, cmd: &Command, result: Result<Option<EventRecord>>) -> CommandOutcome {
        match result {
            Ok(Some(record)) => CommandOutcome::Recorded(record),
            Ok(None) => CommandOutcome::Skipped,
            Err(e) => self.fail(cmd.name(), e),
        }
    }

    fn fail(&mut self, command: &str, error: CaptureError) -> CommandOutcome {
        warn!(command, %error, "command failed");
        let message = match &error {
            CaptureError::Usage(_) | CaptureError::SinkOpen { .. } => error.to_string(),
            CaptureError::Io(_) => format!("Error writing log: {error}"),
            CaptureError::UnknownCommand(_) => format!("{error} (expected one of: {})", Command::NAMES.join(", ")),
            _ => format!("Error accessing simulator state: {error}"),
        };
        self.report(&message);
        CommandOutcome::Failed(error)
    }
}
