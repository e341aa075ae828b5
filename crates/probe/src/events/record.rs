//! Event record formatting.
//!
//! An [`EventRecord`] is the immutable result of one handler call. It renders
//! through `Display` as four newline-terminated lines. The offline analyzer
//! matches the literal tokens (`[Mispred`, `[Recovery End`, `for PC`,
//! `[Cycle <n>]`, `(off_path:<0|1>)`) and the left-justified field padding,
//! so the layout below must not drift.

use std::fmt;

use crate::common::InstAddr;
use crate::window::{BranchOracle, WindowCensus};

/// Which trigger produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Misprediction detected; carries the cycle at which recovery will end.
    Mispredict {
        /// Cycle at which the recovery is scheduled to complete.
        recovery_cycle: u64,
    },
    /// Recovery completed at the record's cycle.
    RecoveryEnd,
}

/// One formatted diagnostic record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRecord {
    /// Trigger type.
    pub kind: EventKind,
    /// Address of the mispredicted instruction.
    pub addr: InstAddr,
    /// Misprediction ordinal for `addr`.
    pub ordinal: u64,
    /// Cycle at which the event was observed.
    pub cycle: u64,
    /// Sequence number of the pivot op.
    pub op_num: u64,
    /// Whether the pivot op was itself off-path.
    pub off_path: bool,
    /// Redirect address for refetch.
    pub fetch_addr: InstAddr,
    /// Window classification relative to the pivot.
    pub census: WindowCensus,
    /// Window occupancy reported by the simulator.
    pub window_total: u64,
    /// Scheduling sub-window occupancy reported by the simulator.
    pub rs_total: u64,
    /// Render the miss-occupancy column on the ROB line.
    pub miss_column: bool,
    /// Branch-oracle header fields, present when enabled in the record config.
    pub oracle: Option<OracleColumns>,
}

/// Oracle fields of the pivot plus its confidence counter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleColumns {
    /// Oracle fields read from the pivot op.
    pub oracle: BranchOracle,
    /// Counter table entry at `oracle.conf_index`.
    pub conf_counter: u64,
}

impl EventRecord {
    fn tag(&self) -> &'static str {
        match self.kind {
            EventKind::Mispredict { .. } => "Mispred",
            EventKind::RecoveryEnd => "Recovery End",
        }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.census;

        write!(
            f,
            "[{} for PC {} #{:<4}] [Cycle {:<10}] op_num:{:<10} (off_path:{})",
            self.tag(),
            self.addr,
            self.ordinal,
            self.cycle,
            self.op_num,
            u8::from(self.off_path),
        )?;
        if let Some(OracleColumns { oracle, conf_counter }) = self.oracle {
            write!(
                f,
                " Mispred_Type:{:<4} Conf:{} (Counter:{}) Target:{}",
                oracle.kind.tag(),
                oracle.pred_conf,
                conf_counter,
                oracle.target
            )?;
        }
        writeln!(f)?;

        match self.kind {
            EventKind::Mispredict { recovery_cycle } => writeln!(
                f,
                "  Next Fetch Addr: {}, Recovery Ends at Cycle: {:<10}",
                self.fetch_addr, recovery_cycle
            )?,
            EventKind::RecoveryEnd => writeln!(f, "  Next Fetch Addr: {}", self.fetch_addr)?,
        }

        write!(
            f,
            "  ROB state | Before op: Done={:<3}, Pending={:<3} | After op: Done={:<3}, Pending={:<3}",
            c.committed_before, c.pending_before, c.committed_after, c.pending_after
        )?;
        if self.miss_column {
            write!(
                f,
                " | Miss (Off:{:<3}, On:{:<3})",
                c.miss_off_path, c.miss_on_path
            )?;
        }
        writeln!(f, " | Total={:<3}", self.window_total)?;

        writeln!(
            f,
            "  RS non ready state  | Off-path ops: {:<3}, On_path ops: {:<3}, Total ops: {:<3}",
            c.rs_off_path, c.rs_on_path, self.rs_total
        )
    }
}
