//! Branch-recovery window capture.
//!
//! This crate captures the state of an out-of-order simulator's in-flight
//! window at two trigger points, misprediction detection and recovery
//! completion, and emits a fixed-format text record for each:
//! 1. **Introspection:** A host-supplied [`Introspector`] resolves live symbols and fields.
//! 2. **Window:** A single pass classifies in-flight ops around the pivot op.
//! 3. **Events:** Handlers combine the census with per-address misprediction counters.
//! 4. **Session:** Counters, the log sink, and the debugger-facing commands.
//!
//! ```
//! use recprobe_core::config::Config;
//! use recprobe_core::introspect::{OpSpec, WindowLayout};
//! use recprobe_core::session::{CommandOutcome, Session};
//! use recprobe_core::window::OpState;
//!
//! let config = Config::default();
//! let mut layout = WindowLayout::new(&config.names).unwrap();
//! let _older = layout.push(OpSpec::new(10, 0x400500).done_at(3)).unwrap();
//! let branch = layout.push(OpSpec::new(11, 0x400504).state(OpState::Scheduled)).unwrap();
//! let _younger = layout.push(OpSpec::new(12, 0x400600).state(OpState::InRs).off_path()).unwrap();
//! layout.current_op(branch);
//! layout.cycle(5);
//! layout.recovery(Some(branch), 0x400508, 9).unwrap();
//! let heap = layout.build().unwrap();
//!
//! let mut session = Session::with_console(config, std::io::sink());
//! match session.run_line("log_mispred", &heap) {
//!     CommandOutcome::Recorded(record) => {
//!         assert_eq!(record.ordinal, 1);
//!         assert!(record.to_string().starts_with("[Mispred for PC 0x400504 #1"));
//!     }
//!     other => panic!("unexpected outcome {other:?}"),
//! }
//! ```

/// Common types (instruction addresses, errors).
pub mod common;
/// Capture configuration (live names, cycle window, record layout).
pub mod config;
/// Event handlers and record formatting.
pub mod events;
/// Live-state introspection trait and the heap-snapshot implementation.
pub mod introspect;
/// Session state, log sink, counters, and commands.
pub mod session;
/// In-flight window view and classification.
pub mod window;

/// Root configuration type.
pub use crate::config::Config;
/// Crate-wide error type.
pub use crate::common::{CaptureError, Result};
/// Host capability that live state is read through.
pub use crate::introspect::Introspector;
/// Session state passed to every handler call.
pub use crate::session::Session;
