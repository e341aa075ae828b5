//! Simulator window layout builder.
//!
//! Lays out a node stage, its in-flight op list, the cycle counter, and the
//! recovery structure inside a [`HeapSnapshot`], using the field names from a
//! [`NameConfig`]. The result has the same shape a debugger would expose from
//! a live simulator, so handlers run against it unchanged.

use super::heap::{HeapObject, HeapSnapshot, Slot};
use super::Handle;
use crate::common::Result;
use crate::config::NameConfig;
use crate::window::{BranchOracle, MispredKind, OpState};

/// Field values of one in-flight op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpSpec {
    /// Instruction address.
    pub addr: u64,
    /// Sequence number.
    pub op_num: u64,
    /// Fetched down a wrong path.
    pub off_path: bool,
    /// Scheduling state.
    pub state: OpState,
    /// Completion cycle, 0 if not completed.
    pub done_cycle: u64,
    /// Branch-oracle fields; omitted from the op when `None`.
    pub oracle: Option<BranchOracle>,
}

impl OpSpec {
    /// An on-path op in the issued state that has not completed.
    pub const fn new(op_num: u64, addr: u64) -> Self {
        Self {
            addr,
            op_num,
            off_path: false,
            state: OpState::Issued,
            done_cycle: 0,
            oracle: None,
        }
    }

    /// Sets the scheduling state.
    #[must_use]
    pub const fn state(mut self, state: OpState) -> Self {
        self.state = state;
        self
    }

    /// Marks the op as fetched down a wrong path.
    #[must_use]
    pub const fn off_path(mut self) -> Self {
        self.off_path = true;
        self
    }

    /// Sets the completion cycle.
    #[must_use]
    pub const fn done_at(mut self, cycle: u64) -> Self {
        self.done_cycle = cycle;
        self
    }

    /// Attaches branch-oracle fields.
    #[must_use]
    pub const fn oracle(mut self, oracle: BranchOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }
}

/// Incrementally builds a heap snapshot with a simulator's window layout.
#[derive(Debug)]
pub struct WindowLayout {
    names: NameConfig,
    heap: HeapSnapshot,
    window: Handle,
    recovery: Handle,
    tail: Option<Handle>,
    ops: Vec<Handle>,
    rs_count: Option<u64>,
}

impl WindowLayout {
    /// Creates an empty window, cycle counter 0, and an empty recovery structure.
    pub fn new(names: &NameConfig) -> Result<Self> {
        let mut heap = HeapSnapshot::new();
        let window = heap.alloc(HeapObject::new());
        let recovery = heap.alloc(HeapObject::new());
        heap.set_global(&names.window, Slot::to(window));
        heap.set_global(&names.recovery_info, Slot::to(recovery));
        heap.set_global(&names.cycle_count, 0_u64);
        heap.set_path(window, &names.window_head, Slot::Null)?;
        heap.set_path(recovery, &names.recovery_op, Slot::Null)?;

        Ok(Self {
            names: names.clone(),
            heap,
            window,
            recovery,
            tail: None,
            ops: Vec::new(),
            rs_count: None,
        })
    }

    /// Appends an op at the young end of the window and returns its handle.
    pub fn push(&mut self, spec: OpSpec) -> Result<Handle> {
        let op = self.heap.alloc(HeapObject::new());
        let names = &self.names;
        self.heap.set_path(op, &names.op_addr, spec.addr)?;
        self.heap.set_path(op, &names.op_num, spec.op_num)?;
        self.heap.set_path(op, &names.op_off_path, spec.off_path)?;
        self.heap.set_path(op, &names.op_state, spec.state.encoding())?;
        self.heap.set_path(op, &names.op_done_cycle, spec.done_cycle)?;
        self.heap.set_path(op, &names.op_next, Slot::Null)?;
        if let Some(oracle) = spec.oracle {
            self.heap
                .set_path(op, &names.op_mispred, oracle.kind == MispredKind::Mispredict)?;
            self.heap
                .set_path(op, &names.op_misfetch, oracle.kind == MispredKind::Misfetch)?;
            self.heap.set_path(op, &names.op_pred_conf, oracle.pred_conf)?;
            self.heap
                .set_path(op, &names.op_pred_conf_index, oracle.conf_index)?;
            self.heap.set_path(op, &names.op_npc, oracle.target.val())?;
        }

        match self.tail {
            Some(prev) => self.heap.set_path(prev, &names.op_next, Slot::to(op))?,
            None => self.heap.set_path(self.window, &names.window_head, Slot::to(op))?,
        }
        self.tail = Some(op);
        self.ops.push(op);
        Ok(op)
    }

    /// Handles of all pushed ops, oldest first.
    pub fn ops(&self) -> &[Handle] {
        &self.ops
    }

    /// Sets the cycle counter.
    pub fn cycle(&mut self, cycle: u64) {
        self.heap.set_global(&self.names.cycle_count, cycle);
    }

    /// Binds the current-op symbol, as at the misprediction breakpoint.
    pub fn current_op(&mut self, op: Handle) {
        self.heap.set_global(&self.names.current_op, Slot::to(op));
    }

    /// Fills the recovery structure.
    pub fn recovery(&mut self, op: Option<Handle>, fetch_addr: u64, recovery_cycle: u64) -> Result<()> {
        let names = &self.names;
        self.heap.set_path(self.recovery, &names.recovery_op, Slot::link(op))?;
        self.heap
            .set_path(self.recovery, &names.recovery_fetch_addr, fetch_addr)?;
        self.heap
            .set_path(self.recovery, &names.recovery_cycle, recovery_cycle)
    }

    /// Overrides the scheduling sub-window total. By default it is the number
    /// of pushed ops in [`OpState::InRs`].
    pub fn rs_count(&mut self, count: u64) {
        self.rs_count = Some(count);
    }

    /// Binds the confidence counter table, one element per slot.
    pub fn conf_counters(&mut self, counters: &[u64]) {
        let table = counters
            .iter()
            .enumerate()
            .fold(HeapObject::new(), |table, (i, &count)| table.with(&i.to_string(), count));
        let table = self.heap.alloc(table);
        self.heap.set_global(&self.names.conf_counters, Slot::to(table));
    }

    /// Writes the window totals and returns the finished snapshot.
    pub fn build(mut self) -> Result<HeapSnapshot> {
        let rs_count = match self.rs_count {
            Some(count) => count,
            None => self.count_in_rs()?,
        };
        self.heap
            .set_path(self.window, &self.names.window_count, self.ops.len() as u64)?;
        self.heap
            .set_path(self.window, &self.names.rs_count, rs_count)?;
        Ok(self.heap)
    }

    fn count_in_rs(&self) -> Result<u64> {
        use super::Introspector;

        let mut count = 0;
        for &op in &self.ops {
            let state = OpState::from_raw(self.heap.scalar_at(op, &self.names.op_state)?)?;
            if state == OpState::InRs {
                count += 1;
            }
        }
        Ok(count)
    }
}
