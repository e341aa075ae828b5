use super::{capture, in_window, EventKind, EventRecord};
use crate::common::Result;
use crate::introspect::Introspector;
use crate::session::Session;

/// Records a misprediction detection.
///
/// Resolves the current op, the window, the cycle counter, and the recovery
/// structure, walks the window with the current op as pivot, and increments
/// the op address's counter. The post-increment count is the record's
/// ordinal. Returns `Ok(None)` without touching the counter when the cycle is
/// outside the configured window.
pub fn on_mispredict_detected<I: Introspector + ?Sized>(
    session: &mut Session,
    intro: &I,
) -> Result<Option<EventRecord>> {
    let names = &session.config().names;
    let op = intro.resolve_struct(&names.current_op)?;
    let window = intro.resolve_struct(&names.window)?;
    let cycle = intro.resolve_scalar(&names.cycle_count)?;
    let recovery = intro.resolve_struct(&names.recovery_info)?;

    if !in_window(session, "mispredict", cycle) {
        return Ok(None);
    }

    let recovery_cycle = intro.scalar_at(recovery, &session.config().names.recovery_cycle)?;
    let captured = capture(intro, session, op, window, recovery, cycle)?;

    let ordinal = session.counters_mut().record(captured.pivot.addr);
    let miss_column = session.config().record.miss_column;
    let record = captured.into_record(EventKind::Mispredict { recovery_cycle }, ordinal, miss_column);
    session.emit(&record)?;
    Ok(Some(record))
}
