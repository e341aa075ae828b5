//! Configuration defaults and JSON loading.

use std::io::Write;

use pretty_assertions::assert_eq;
use recprobe_core::config::{Config, CycleWindow};
use recprobe_core::CaptureError;

#[test]
fn defaults_match_stock_simulator_names() {
    let config = Config::default();

    assert_eq!(config.names.current_op, "op");
    assert_eq!(config.names.window, "node");
    assert_eq!(config.names.cycle_count, "cycle_count");
    assert_eq!(config.names.recovery_info, "bp_recovery_info");
    assert_eq!(config.names.op_addr, "inst_info.addr");
    assert_eq!(config.names.rs_count, "rs.rs_op_count");
    assert_eq!(config.general.cycle_window, CycleWindow::default());
    assert_eq!(config.general.max_walk, None);
    assert!(!config.record.miss_column);
}

#[test]
fn empty_document_is_the_default_config() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn partial_names_keep_remaining_defaults() {
    let config = Config::from_json(r#"{ "names": { "current_op": "uop", "op_next": "next" } }"#).unwrap();

    assert_eq!(config.names.current_op, "uop");
    assert_eq!(config.names.op_next, "next");
    assert_eq!(config.names.window, "node");
    assert_eq!(config.names.op_done_cycle, "done_cycle");
}

#[test]
fn cycle_window_stop_defaults_to_unbounded() {
    let config = Config::from_json(r#"{ "general": { "cycle_window": { "start": 500 } } }"#).unwrap();
    let window = config.general.cycle_window;

    assert_eq!(window.start, 500);
    assert_eq!(window.stop, u64::MAX);
    assert!(!window.contains(499));
    assert!(window.contains(500));
    assert!(window.contains(u64::MAX));
}

#[test]
fn cycle_window_bounds_are_inclusive() {
    let window = CycleWindow { start: 10, stop: 20 };

    assert!(window.contains(10));
    assert!(window.contains(20));
    assert!(!window.contains(21));
}

#[test]
fn load_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "max_walk": 4096 }}, "record": {{ "miss_column": true }} }}"#).unwrap();

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.general.max_walk, Some(4096));
    assert!(config.record.miss_column);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(Config::from_json("{ names: }"), Err(CaptureError::Json(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.json"));

    assert!(matches!(result, Err(CaptureError::Io(_))));
}

#[test]
fn config_survives_a_json_round_trip() {
    let config = Config::from_json(r#"{ "general": { "cycle_window": { "start": 3, "stop": 9 } } }"#).unwrap();
    let text = serde_json::to_string(&config).unwrap();

    assert_eq!(Config::from_json(&text).unwrap(), config);
}

#[test]
fn oracle_columns_default_off_with_stock_field_names() {
    let config = Config::from_json(r#"{ "record": { "oracle_columns": true } }"#).unwrap();

    assert!(config.record.oracle_columns);
    assert!(!config.record.miss_column);
    assert_eq!(config.names.op_mispred, "oracle_info.mispred");
    assert_eq!(config.names.op_misfetch, "oracle_info.misfetch");
    assert_eq!(config.names.op_pred_conf, "oracle_info.pred_conf");
    assert_eq!(config.names.op_pred_conf_index, "oracle_info.pred_conf_index");
    assert_eq!(config.names.op_npc, "oracle_info.npc");
    assert_eq!(config.names.conf_counters, "bpc_ctr_table");
    assert!(!Config::default().record.oracle_columns);
}
