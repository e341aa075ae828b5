//! Event handlers.
//!
//! Two triggers produce records:
//! 1. **Misprediction detected:** The pivot is the current op; its address counter is incremented.
//! 2. **Recovery completed:** The pivot is the recovery op; its address counter is only read.
//!
//! Both handlers read every live value and finish the window walk before they
//! touch the counter table or write anything, so a failed read leaves no
//! partial record and no counter change behind.

use tracing::debug;

use crate::common::{InstAddr, Result};
use crate::config::NameConfig;
use crate::introspect::{Handle, Introspector};
use crate::session::Session;
use crate::window::{BranchOracle, MicroOp, WindowCensus, WindowWalker};

mod mispredict;
/// Record model and text layout.
pub mod record;
mod recovery;

pub use mispredict::on_mispredict_detected;
pub use record::{EventKind, EventRecord, OracleColumns};
pub use recovery::on_recovery_completed;

/// Live values shared by both record types.
#[derive(Debug)]
struct Capture {
    pivot: MicroOp,
    cycle: u64,
    fetch_addr: InstAddr,
    window_total: u64,
    rs_total: u64,
    census: WindowCensus,
    oracle: Option<OracleColumns>,
}

/// Reads the pivot, the window totals, and the recovery redirect, then walks the window.
fn capture<I: Introspector + ?Sized>(
    intro: &I,
    session: &Session,
    pivot: Handle,
    window: Handle,
    recovery: Handle,
    cycle: u64,
) -> Result<Capture> {
    let config = session.config();
    let names: &NameConfig = &config.names;

    let pivot = MicroOp::read(intro, names, pivot)?;
    let fetch_addr = InstAddr(intro.scalar_at(recovery, &names.recovery_fetch_addr)?);
    let window_total = intro.scalar_at(window, &names.window_count)?;
    let rs_total = intro.scalar_at(window, &names.rs_count)?;
    let oracle = if config.record.oracle_columns {
        let oracle = BranchOracle::read(intro, names, pivot.handle)?;
        let conf_counter = oracle.conf_counter(intro, names)?;
        Some(OracleColumns { oracle, conf_counter })
    } else {
        None
    };

    let census = WindowWalker::new(intro, names)
        .with_limit(config.general.max_walk)
        .classify_window(window, pivot.handle, cycle)?;

    Ok(Capture {
        pivot,
        cycle,
        fetch_addr,
        window_total,
        rs_total,
        census,
        oracle,
    })
}

impl Capture {
    fn into_record(self, kind: EventKind, ordinal: u64, miss_column: bool) -> EventRecord {
        EventRecord {
            kind,
            addr: self.pivot.addr,
            ordinal,
            cycle: self.cycle,
            op_num: self.pivot.op_num,
            off_path: self.pivot.off_path,
            fetch_addr: self.fetch_addr,
            census: self.census,
            window_total: self.window_total,
            rs_total: self.rs_total,
            miss_column,
            oracle: self.oracle,
        }
    }
}

/// True if events at `cycle` should be recorded.
fn in_window(session: &Session, event: &str, cycle: u64) -> bool {
    let window = session.config().general.cycle_window;
    let inside = window.contains(cycle);
    if !inside {
        debug!(event, cycle, start = window.start, stop = window.stop, "outside cycle window; skipped");
    }
    inside
}
