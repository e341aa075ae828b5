//! Configuration system for window capture.
//!
//! This module defines the configuration structures used to parameterize a session. It provides:
//! 1. **Defaults:** The live symbol and field names exposed by the simulator's node stage.
//! 2. **Structures:** General (cycle window, walk bound), naming, and record layout settings.
//! 3. **Loading:** JSON deserialization with per-field defaults, so partial documents are valid.
//!
//! Use `Config::default()` when attaching to a stock simulator build, or load a JSON
//! document when the host binary renames its globals.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::Result;

/// Default live names, matching the simulator's node stage and recovery globals.
mod defaults {
    /// Op that triggered the current misprediction.
    pub const CURRENT_OP: &str = "op";
    /// Node stage holding the in-flight window.
    pub const WINDOW: &str = "node";
    /// Global cycle counter.
    pub const CYCLE_COUNT: &str = "cycle_count";
    /// Branch recovery bookkeeping structure.
    pub const RECOVERY_INFO: &str = "bp_recovery_info";

    pub const OP_ADDR: &str = "inst_info.addr";
    pub const OP_NUM: &str = "op_num";
    pub const OP_OFF_PATH: &str = "off_path";
    pub const OP_STATE: &str = "state";
    pub const OP_DONE_CYCLE: &str = "done_cycle";
    pub const OP_NEXT: &str = "next_node";

    pub const WINDOW_HEAD: &str = "node_head";
    pub const WINDOW_COUNT: &str = "node_count";
    pub const RS_COUNT: &str = "rs.rs_op_count";

    pub const RECOVERY_CYCLE: &str = "recovery_cycle";
    pub const RECOVERY_FETCH_ADDR: &str = "recovery_fetch_addr";
    pub const RECOVERY_OP: &str = "recovery_op";

    pub const OP_MISPRED: &str = "oracle_info.mispred";
    pub const OP_MISFETCH: &str = "oracle_info.misfetch";
    pub const OP_PRED_CONF: &str = "oracle_info.pred_conf";
    pub const OP_PRED_CONF_INDEX: &str = "oracle_info.pred_conf_index";
    pub const OP_NPC: &str = "oracle_info.npc";
    /// Confidence counter table, indexed by `OP_PRED_CONF_INDEX`.
    pub const CONF_COUNTERS: &str = "bpc_ctr_table";
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use recprobe_core::config::Config;
///
/// let json = r#"{
///     "general": { "cycle_window": { "start": 1000, "stop": 5000 } },
///     "names": { "window": "node_stage" },
///     "record": { "miss_column": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.cycle_window.start, 1000);
/// assert_eq!(config.names.window, "node_stage");
/// assert_eq!(config.names.cycle_count, "cycle_count");
/// assert!(config.record.miss_column);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Event gating and walk limits.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Live symbol and field names.
    #[serde(default)]
    pub names: NameConfig,
    /// Record layout options.
    #[serde(default)]
    pub record: RecordConfig,
}

impl Config {
    /// Parses a configuration from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Event gating and walk limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Only events whose current cycle lies in this window produce records.
    #[serde(default)]
    pub cycle_window: CycleWindow,

    /// Upper bound on entries visited per walk. `None` walks until the list ends.
    #[serde(default)]
    pub max_walk: Option<usize>,
}

/// Inclusive range of cycles for which events are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleWindow {
    /// First cycle that is recorded.
    #[serde(default)]
    pub start: u64,
    /// Last cycle that is recorded.
    #[serde(default = "CycleWindow::default_stop")]
    pub stop: u64,
}

impl CycleWindow {
    const fn default_stop() -> u64 {
        u64::MAX
    }

    /// Returns true if `cycle` lies within `[start, stop]`.
    #[inline]
    pub const fn contains(&self, cycle: u64) -> bool {
        cycle >= self.start && cycle <= self.stop
    }
}

impl Default for CycleWindow {
    fn default() -> Self {
        Self {
            start: 0,
            stop: Self::default_stop(),
        }
    }
}

/// Live names the handlers resolve through the introspector.
///
/// Field entries are dotted paths relative to the owning structure, so
/// `"inst_info.addr"` dereferences `inst_info` and then reads `addr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameConfig {
    /// Symbol of the op that triggered a misprediction.
    #[serde(default = "NameConfig::default_current_op")]
    pub current_op: String,
    /// Symbol of the structure holding the in-flight window.
    #[serde(default = "NameConfig::default_window")]
    pub window: String,
    /// Symbol of the cycle counter.
    #[serde(default = "NameConfig::default_cycle_count")]
    pub cycle_count: String,
    /// Symbol of the recovery bookkeeping structure.
    #[serde(default = "NameConfig::default_recovery_info")]
    pub recovery_info: String,

    /// Op field: instruction address.
    #[serde(default = "NameConfig::default_op_addr")]
    pub op_addr: String,
    /// Op field: sequence number.
    #[serde(default = "NameConfig::default_op_num")]
    pub op_num: String,
    /// Op field: off-path flag.
    #[serde(default = "NameConfig::default_op_off_path")]
    pub op_off_path: String,
    /// Op field: scheduling state encoding.
    #[serde(default = "NameConfig::default_op_state")]
    pub op_state: String,
    /// Op field: completion cycle.
    #[serde(default = "NameConfig::default_op_done_cycle")]
    pub op_done_cycle: String,
    /// Op field: next op in program order.
    #[serde(default = "NameConfig::default_op_next")]
    pub op_next: String,

    /// Window field: oldest in-flight op.
    #[serde(default = "NameConfig::default_window_head")]
    pub window_head: String,
    /// Window field: number of in-flight ops.
    #[serde(default = "NameConfig::default_window_count")]
    pub window_count: String,
    /// Window field: number of ops in the scheduling sub-window.
    #[serde(default = "NameConfig::default_rs_count")]
    pub rs_count: String,

    /// Recovery field: cycle at which recovery completes.
    #[serde(default = "NameConfig::default_recovery_cycle")]
    pub recovery_cycle: String,
    /// Recovery field: redirect address for refetch.
    #[serde(default = "NameConfig::default_recovery_fetch_addr")]
    pub recovery_fetch_addr: String,
    /// Recovery field: op whose misprediction is being recovered.
    #[serde(default = "NameConfig::default_recovery_op")]
    pub recovery_op: String,

    /// Op field: oracle flag for a direction or target misprediction.
    #[serde(default = "NameConfig::default_op_mispred")]
    pub op_mispred: String,
    /// Op field: oracle flag for a misfetch.
    #[serde(default = "NameConfig::default_op_misfetch")]
    pub op_misfetch: String,
    /// Op field: predictor confidence.
    #[serde(default = "NameConfig::default_op_pred_conf")]
    pub op_pred_conf: String,
    /// Op field: index into the confidence counter table.
    #[serde(default = "NameConfig::default_op_pred_conf_index")]
    pub op_pred_conf_index: String,
    /// Op field: correct next PC.
    #[serde(default = "NameConfig::default_op_npc")]
    pub op_npc: String,
    /// Symbol of the confidence counter table. Elements are read as fields
    /// named by their decimal index.
    #[serde(default = "NameConfig::default_conf_counters")]
    pub conf_counters: String,
}

impl NameConfig {
    fn default_current_op() -> String {
        defaults::CURRENT_OP.into()
    }
    fn default_window() -> String {
        defaults::WINDOW.into()
    }
    fn default_cycle_count() -> String {
        defaults::CYCLE_COUNT.into()
    }
    fn default_recovery_info() -> String {
        defaults::RECOVERY_INFO.into()
    }
    fn default_op_addr() -> String {
        defaults::OP_ADDR.into()
    }
    fn default_op_num() -> String {
        defaults::OP_NUM.into()
    }
    fn default_op_off_path() -> String {
        defaults::OP_OFF_PATH.into()
    }
    fn default_op_state() -> String {
        defaults::OP_STATE.into()
    }
    fn default_op_done_cycle() -> String {
        defaults::OP_DONE_CYCLE.into()
    }
    fn default_op_next() -> String {
        defaults::OP_NEXT.into()
    }
    fn default_window_head() -> String {
        defaults::WINDOW_HEAD.into()
    }
    fn default_window_count() -> String {
        defaults::WINDOW_COUNT.into()
    }
    fn default_rs_count() -> String {
        defaults::RS_COUNT.into()
    }
    fn default_recovery_cycle() -> String {
        defaults::RECOVERY_CYCLE.into()
    }
    fn default_recovery_fetch_addr() -> String {
        defaults::RECOVERY_FETCH_ADDR.into()
    }
    fn default_recovery_op() -> String {
        defaults::RECOVERY_OP.into()
    }
    fn default_op_mispred() -> String {
        defaults::OP_MISPRED.into()
    }
    fn default_op_misfetch() -> String {
        defaults::OP_MISFETCH.into()
    }
    fn default_op_pred_conf() -> String {
        defaults::OP_PRED_CONF.into()
    }
    fn default_op_pred_conf_index() -> String {
        defaults::OP_PRED_CONF_INDEX.into()
    }
    fn default_op_npc() -> String {
        defaults::OP_NPC.into()
    }
    fn default_conf_counters() -> String {
        defaults::CONF_COUNTERS.into()
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            current_op: Self::default_current_op(),
            window: Self::default_window(),
            cycle_count: Self::default_cycle_count(),
            recovery_info: Self::default_recovery_info(),
            op_addr: Self::default_op_addr(),
            op_num: Self::default_op_num(),
            op_off_path: Self::default_op_off_path(),
            op_state: Self::default_op_state(),
            op_done_cycle: Self::default_op_done_cycle(),
            op_next: Self::default_op_next(),
            window_head: Self::default_window_head(),
            window_count: Self::default_window_count(),
            rs_count: Self::default_rs_count(),
            recovery_cycle: Self::default_recovery_cycle(),
            recovery_fetch_addr: Self::default_recovery_fetch_addr(),
            recovery_op: Self::default_recovery_op(),
            op_mispred: Self::default_op_mispred(),
            op_misfetch: Self::default_op_misfetch(),
            op_pred_conf: Self::default_op_pred_conf(),
            op_pred_conf_index: Self::default_op_pred_conf_index(),
            op_npc: Self::default_op_npc(),
            conf_counters: Self::default_conf_counters(),
        }
    }
}

/// Record layout options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Append per-path data-cache miss occupancy to the ROB line.
    ///
    /// Off by default; the stock analyzer expects the four-line layout without it.
    #[serde(default)]
    pub miss_column: bool,

    /// Append the pivot's branch-oracle fields to the header line:
    /// misprediction type, confidence, confidence counter, and correct target.
    ///
    /// Off by default. When on, the simulator must expose the oracle fields
    /// and the confidence counter table.
    #[serde(default)]
    pub oracle_columns: bool,
}
