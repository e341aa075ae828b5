//! Replay of dumped debugger stops.
//!
//! A replay script stands in for a live debugger session. Each stop carries a
//! heap dump of the simulator taken at a breakpoint and the commands the
//! breakpoint would have run:
//!
//! ```json
//! {
//!   "stops": [
//!     {
//!       "label": "bp_recovery: cycle 5",
//!       "commands": ["log_mispred"],
//!       "state": { "globals": { ... }, "objects": [ ... ] }
//!     }
//!   ]
//! }
//! ```
//!
//! The session, and with it the counters and log sink, persists across stops.

use std::fs;
use std::path::Path;

use recprobe_core::Result;
use recprobe_core::introspect::HeapSnapshot;
use recprobe_core::session::{CommandOutcome, Session};
use serde::Deserialize;
use tracing::info;

/// A full replay script.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    /// Breakpoint stops in the order they were hit.
    pub stops: Vec<Stop>,
}

/// One breakpoint stop.
#[derive(Debug, Deserialize)]
pub struct Stop {
    /// Free-form description used in diagnostics.
    #[serde(default)]
    pub label: Option<String>,
    /// Commands run at this stop, in order.
    pub commands: Vec<String>,
    /// Live state visible at this stop.
    pub state: HeapSnapshot,
}

/// Counts of command outcomes across a replay.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplayTally {
    /// Records emitted.
    pub recorded: usize,
    /// Events outside the cycle window.
    pub skipped: usize,
    /// Commands that failed.
    pub failed: usize,
}

impl ReplayScript {
    /// Reads and parses a replay script.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Runs every stop against `session`.
    pub fn run(&self, session: &mut Session) -> ReplayTally {
        let mut tally = ReplayTally::default();
        for (index, stop) in self.stops.iter().enumerate() {
            let label = stop.label.as_deref().unwrap_or("");
            info!(stop = index, label, commands = stop.commands.len(), "replaying stop");
            for line in &stop.commands {
                match session.run_line(line, &stop.state) {
                    CommandOutcome::Recorded(_) => tally.recorded += 1,
                    CommandOutcome::Skipped => tally.skipped += 1,
                    CommandOutcome::Failed(_) => tally.failed += 1,
                    CommandOutcome::Logging(_) | CommandOutcome::Stopped(_) | CommandOutcome::NotActive => {}
                }
            }
        }
        tally
    }
}
