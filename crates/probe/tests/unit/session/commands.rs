//! Command parsing and user-facing messages.

use pretty_assertions::assert_eq;
use recprobe_core::introspect::HeapSnapshot;
use recprobe_core::session::{Command, CommandOutcome};
use recprobe_core::CaptureError;
use rstest::rstest;

use crate::common::harness::TestContext;

#[rstest]
#[case("stop_log", Command::StopLog)]
#[case("  log_mispred  ", Command::LogMispred)]
#[case("log_recovery_end", Command::LogRecoveryEnd)]
#[case("start_log trace.log", Command::StartLog(Some("trace.log".to_string())))]
fn parses_known_commands(#[case] line: &str, #[case] expected: Command) {
    assert_eq!(line.parse::<Command>().unwrap(), expected);
}

#[test]
fn command_names_round_trip_through_parsing() {
    for name in Command::NAMES {
        assert_eq!(name.parse::<Command>().unwrap().name(), name);
    }
}

#[test]
fn unknown_command_lists_valid_commands() {
    let mut ctx = TestContext::new();

    let outcome = ctx.run("log_everything", &HeapSnapshot::new());

    assert!(matches!(outcome, CommandOutcome::Failed(CaptureError::UnknownCommand(_))));
    assert_eq!(
        ctx.output(),
        "unknown command `log_everything` (expected one of: start_log, stop_log, log_mispred, log_recovery_end)\n"
    );
}

#[test]
fn stop_without_start_reports_inactive() {
    let mut ctx = TestContext::new();

    let outcome = ctx.run("stop_log", &HeapSnapshot::new());

    assert!(matches!(outcome, CommandOutcome::NotActive));
    assert_eq!(ctx.output(), "Logging is not active.\n");
}

#[test]
fn start_without_filename_prints_usage() {
    let mut ctx = TestContext::new();

    let outcome = ctx.run("start_log", &HeapSnapshot::new());

    assert!(matches!(outcome, CommandOutcome::Failed(CaptureError::Usage(_))));
    assert_eq!(ctx.output(), "Usage: start_log <filename>\n");
    assert!(ctx.session.log_path().is_none());
}

#[test]
fn handler_failure_is_reported_as_state_access_error() {
    let mut ctx = TestContext::new();

    let outcome = ctx.run("log_mispred", &HeapSnapshot::new());

    assert!(matches!(outcome, CommandOutcome::Failed(CaptureError::UnresolvedSymbol(_))));
    assert_eq!(
        ctx.output(),
        "Error accessing simulator state: symbol `op` is not resolvable in the current context\n"
    );
}
