use super::{capture, in_window, EventKind, EventRecord};
use crate::common::Result;
use crate::introspect::Introspector;
use crate::session::Session;

/// Records a recovery completion.
///
/// The pivot is the op stored in the recovery structure, and the cycle
/// counter now holds the completion cycle. The op address's counter is read
/// but not incremented, so the ordinal matches the detection record for the
/// same misprediction; it is 0 if no detection was recorded for the address.
pub fn on_recovery_completed<I: Introspector + ?Sized>(
    session: &mut Session,
    intro: &I,
) -> Result<Option<EventRecord>> {
    let names = &session.config().names;
    let recovery = intro.resolve_struct(&names.recovery_info)?;
    let op = intro.struct_at(recovery, &names.recovery_op)?;
    let window = intro.resolve_struct(&names.window)?;
    let cycle = intro.resolve_scalar(&names.cycle_count)?;

    if !in_window(session, "recovery_end", cycle) {
        return Ok(None);
    }

    let captured = capture(intro, session, op, window, recovery, cycle)?;

    let ordinal = session.counters().ordinal(captured.pivot.addr);
    let miss_column = session.config().record.miss_column;
    let record = captured.into_record(EventKind::RecoveryEnd, ordinal, miss_column);
    session.emit(&record)?;
    Ok(Some(record))
}
