//! In-flight op view.
//!
//! Reads the fields of one simulator op through an [`Introspector`] into a
//! typed, owned record. The numeric scheduling-state encoding is decoded here
//! and nowhere else.

use crate::common::{CaptureError, InstAddr, Result};
use crate::config::NameConfig;
use crate::introspect::{Handle, Introspector};

/// Scheduling state of an in-flight op, in the simulator's encoding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpState {
    /// Fetched, awaiting issue.
    Fetched,
    /// Issued into the node table (reorder buffer).
    Issued,
    /// In the scheduling window (RS), waiting for its sources.
    InRs,
    /// Pipelined schedule: wakes up next cycle.
    Sleep,
    /// Waiting for forwarding.
    WaitFwd,
    /// Waiting for forwarding at low priority.
    LowPriority,
    /// Ready to fire, awaiting scheduling.
    Ready,
    /// Scheduled but may fail and be rescheduled.
    Tentative,
    /// Scheduled and will complete.
    Scheduled,
    /// Missed in the data cache.
    Miss,
    /// Waiting for a data-cache port.
    WaitDcache,
    /// Waiting for a miss-buffer entry.
    WaitMem,
    /// Finished executing, awaiting retirement.
    Done,
}

impl OpState {
    const ALL: [Self; 13] = [
        Self::Fetched,
        Self::Issued,
        Self::InRs,
        Self::Sleep,
        Self::WaitFwd,
        Self::LowPriority,
        Self::Ready,
        Self::Tentative,
        Self::Scheduled,
        Self::Miss,
        Self::WaitDcache,
        Self::WaitMem,
        Self::Done,
    ];

    /// Decodes the simulator's numeric state tag.
    pub fn from_raw(raw: u64) -> Result<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(CaptureError::UnknownOpState(raw))
    }

    /// The simulator's numeric state tag.
    pub const fn encoding(self) -> u64 {
        self as u64
    }
}

/// Snapshot of one in-flight op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MicroOp {
    /// Identity of the live entry.
    pub handle: Handle,
    /// Instruction address.
    pub addr: InstAddr,
    /// Sequence number assigned at fetch.
    pub op_num: u64,
    /// Fetched down a wrong path.
    pub off_path: bool,
    /// Scheduling state.
    pub state: OpState,
    /// Completion cycle; 0 means the op has not completed.
    pub done_cycle: u64,
    /// Next op in program order.
    pub next: Option<Handle>,
}

impl MicroOp {
    /// Reads every op field a record needs.
    pub fn read<I: Introspector + ?Sized>(intro: &I, names: &NameConfig, handle: Handle) -> Result<Self> {
        Ok(Self {
            handle,
            addr: InstAddr(intro.scalar_at(handle, &names.op_addr)?),
            op_num: intro.scalar_at(handle, &names.op_num)?,
            off_path: intro.scalar_at(handle, &names.op_off_path)? != 0,
            state: OpState::from_raw(intro.scalar_at(handle, &names.op_state)?)?,
            done_cycle: intro.scalar_at(handle, &names.op_done_cycle)?,
            next: intro.link_at(handle, &names.op_next)?,
        })
    }

    /// True if the op completed at or before `cycle`.
    ///
    /// Cycle 0 is the "never completed" sentinel, so the bound is `1..=cycle`.
    #[inline]
    pub const fn committed_by(&self, cycle: u64) -> bool {
        self.done_cycle >= 1 && self.done_cycle <= cycle
    }
}

/// Oracle classification of a branch op, as printed in the record header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MispredKind {
    /// Direction or indirect-target misprediction.
    Mispredict,
    /// Target unknown at fetch (BTB miss).
    Misfetch,
    /// Correctly predicted.
    Correct,
}

impl MispredKind {
    /// Four-character tag used in the header line.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Mispredict => "MISP",
            Self::Misfetch => "MISF",
            Self::Correct => "----",
        }
    }
}

/// Branch-oracle fields of one op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchOracle {
    /// Misprediction type. A misprediction takes precedence over a misfetch.
    pub kind: MispredKind,
    /// Predictor confidence.
    pub pred_conf: u64,
    /// Slot in the confidence counter table.
    pub conf_index: u64,
    /// Correct next PC.
    pub target: InstAddr,
}

impl BranchOracle {
    /// Reads the oracle fields of the op at `handle`.
    pub fn read<I: Introspector + ?Sized>(intro: &I, names: &NameConfig, handle: Handle) -> Result<Self> {
        let kind = if intro.scalar_at(handle, &names.op_mispred)? != 0 {
            MispredKind::Mispredict
        } else if intro.scalar_at(handle, &names.op_misfetch)? != 0 {
            MispredKind::Misfetch
        } else {
            MispredKind::Correct
        };
        Ok(Self {
            kind,
            pred_conf: intro.scalar_at(handle, &names.op_pred_conf)?,
            conf_index: intro.scalar_at(handle, &names.op_pred_conf_index)?,
            target: InstAddr(intro.scalar_at(handle, &names.op_npc)?),
        })
    }

    /// Reads this op's entry in the confidence counter table.
    pub fn conf_counter<I: Introspector + ?Sized>(&self, intro: &I, names: &NameConfig) -> Result<u64> {
        let table = intro.resolve_struct(&names.conf_counters)?;
        intro.scalar_at(table, &self.conf_index.to_string())
    }
}
