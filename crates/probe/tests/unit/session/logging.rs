//! # Log Sink Tests
//!
//! Start/stop lifecycle through the command surface, redirection between
//! files, open failures, and byte-identical console and file output.

use std::fs;

use pretty_assertions::assert_eq;
use recprobe_core::introspect::HeapSnapshot;
use recprobe_core::session::{CommandOutcome, StopOutcome};
use recprobe_core::CaptureError;

use crate::common::builder::{ops_done_at, ScenarioBuilder};
use crate::common::harness::TestContext;

#[test]
fn start_then_stop_reports_both_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recovery.log");
    let mut ctx = TestContext::new();
    let heap = HeapSnapshot::new();

    let started = ctx.run(&format!("start_log {}", path.display()), &heap);
    assert!(matches!(started, CommandOutcome::Logging(ref p) if *p == path));
    assert_eq!(ctx.session.log_path(), Some(path.as_path()));

    let stopped = ctx.run("stop_log", &heap);
    assert!(matches!(stopped, CommandOutcome::Stopped(ref p) if *p == path));
    assert!(ctx.session.log_path().is_none());

    assert_eq!(
        ctx.output(),
        format!("Logging to '{}'\nStopped logging.\n", path.display())
    );
    assert!(path.exists());
}

#[test]
fn console_and_file_receive_identical_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.log");
    let mut ctx = TestContext::new();
    let scenario = ScenarioBuilder::new(&ctx.session.config().names)
        .ops(ops_done_at(&[1, 0, 3]))
        .pivot(1)
        .cycle(4)
        .build();

    let _ = ctx.session.start_log(path.to_str()).unwrap();
    for line in ["log_mispred", "log_recovery_end", "log_mispred"] {
        assert!(matches!(ctx.run(line, &scenario.heap), CommandOutcome::Recorded(_)));
    }
    let _ = ctx.session.stop_log().unwrap();

    let logged = fs::read_to_string(&path).unwrap();
    assert_eq!(logged, ctx.output());
    assert_eq!(logged.lines().count(), 12);
}

#[test]
fn records_are_flushed_while_logging() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("live.log");
    let mut ctx = TestContext::new();
    let scenario = ScenarioBuilder::new(&ctx.session.config().names)
        .ops(ops_done_at(&[0]))
        .pivot(0)
        .build();

    let _ = ctx.session.start_log(path.to_str()).unwrap();
    let _ = ctx.run("log_mispred", &scenario.heap);

    assert!(fs::read_to_string(&path).unwrap().starts_with("[Mispred for PC"));
}

#[test]
fn starting_again_redirects_to_the_new_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let mut ctx = TestContext::new();
    let scenario = ScenarioBuilder::new(&ctx.session.config().names)
        .ops(ops_done_at(&[0, 0]))
        .pivot(0)
        .build();

    let _ = ctx.session.start_log(first.to_str()).unwrap();
    let _ = ctx.run("log_mispred", &scenario.heap);
    let _ = ctx.session.start_log(second.to_str()).unwrap();
    let _ = ctx.run("log_mispred", &scenario.heap);

    assert_eq!(ctx.session.log_path(), Some(second.as_path()));
    let first_text = fs::read_to_string(&first).unwrap();
    let second_text = fs::read_to_string(&second).unwrap();
    assert!(first_text.contains(" #1   ]"));
    assert!(!first_text.contains(" #2   ]"));
    assert!(second_text.contains(" #2   ]"));
    assert!(!second_text.contains(" #1   ]"));
}

#[test]
fn open_failure_leaves_logging_inactive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("out.log");
    let mut ctx = TestContext::new();

    let outcome = ctx.run(&format!("start_log {}", path.display()), &HeapSnapshot::new());

    assert!(matches!(outcome, CommandOutcome::Failed(CaptureError::SinkOpen { .. })));
    assert!(ctx.output().starts_with(&format!("Error opening file {}:", path.display())));
    assert!(ctx.session.log_path().is_none());
    assert_eq!(ctx.session.stop_log().unwrap(), StopOutcome::NotActive);
}

#[test]
fn open_failure_after_success_drops_the_previous_sink() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.log");
    let bad = dir.path().join("missing-dir").join("bad.log");
    let mut ctx = TestContext::new();

    let _ = ctx.session.start_log(good.to_str()).unwrap();
    let result = ctx.session.start_log(bad.to_str());

    assert!(matches!(result, Err(CaptureError::SinkOpen { .. })));
    assert!(ctx.session.log_path().is_none());
}

#[test]
fn records_without_sink_only_reach_the_console() {
    let mut ctx = TestContext::new();
    let scenario = ScenarioBuilder::new(&ctx.session.config().names)
        .ops(ops_done_at(&[0]))
        .pivot(0)
        .build();

    let outcome = ctx.run("log_mispred", &scenario.heap);

    assert!(matches!(outcome, CommandOutcome::Recorded(_)));
    assert_eq!(ctx.output().lines().count(), 4);
}

#[cfg(target_os = "linux")]
#[test]
fn failed_log_write_keeps_the_record_and_stops_logging() {
    let mut ctx = TestContext::new();
    let scenario = ScenarioBuilder::new(&ctx.session.config().names)
        .ops(ops_done_at(&[0, 0]))
        .pivot(0)
        .build();

    let _ = ctx.session.start_log(Some("/dev/full")).unwrap();
    let outcome = ctx.run("log_mispred", &scenario.heap);

    assert!(matches!(outcome, CommandOutcome::Recorded(ref r) if r.ordinal == 1));
    assert_eq!(ctx.session.counters().total(), 1);
    assert!(ctx.session.log_path().is_none());
    let output = ctx.output();
    assert!(output.starts_with("[Mispred for PC 0x400000 #1   ]"));
    assert!(output.contains("Error writing log /dev/full:"));
    assert!(output.ends_with("Logging stopped.\n"));
}

#[cfg(target_os = "linux")]
#[test]
fn redirect_after_failed_log_write_opens_the_new_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.log");
    let mut ctx = TestContext::new();
    let scenario = ScenarioBuilder::new(&ctx.session.config().names)
        .ops(ops_done_at(&[0, 0]))
        .pivot(0)
        .build();

    let _ = ctx.run("start_log /dev/full", &scenario.heap);
    let _ = ctx.run("log_mispred", &scenario.heap);
    let outcome = ctx.run(&format!("start_log {}", good.display()), &scenario.heap);
    let _ = ctx.run("log_mispred", &scenario.heap);

    assert!(matches!(outcome, CommandOutcome::Logging(ref p) if *p == good));
    assert_eq!(ctx.session.log_path(), Some(good.as_path()));
    let logged = fs::read_to_string(&good).unwrap();
    assert!(logged.starts_with("[Mispred for PC 0x400000 #2   ]"));
    assert_eq!(logged.lines().count(), 4);
}
