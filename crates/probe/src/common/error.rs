//! Capture error definitions.
//!
//! This module defines the single error type returned by every fallible capture operation. It covers:
//! 1. **Introspection:** Unresolved symbols, missing fields, and value-kind mismatches.
//! 2. **External State:** Unknown op-state encodings and runaway window walks.
//! 3. **Session:** Log sink I/O failures and malformed commands.
//! 4. **Configuration:** JSON parse failures for configuration and replay scripts.
//!
//! Every variant is reported to the user and is non-fatal to the session.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::introspect::Handle;

/// Errors raised while reading live simulator state or driving the session.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A top-level symbol could not be resolved by the host.
    ///
    /// Usually means the simulator is stopped outside the frame the command expects.
    #[error("symbol `{0}` is not resolvable in the current context")]
    UnresolvedSymbol(String),

    /// A structured value has no field with the requested name.
    #[error("value {handle} has no field `{field}`")]
    MissingField {
        /// Structure that was dereferenced.
        handle: Handle,
        /// Field that was requested.
        field: String,
    },

    /// A scalar was required but the value is a structure or null.
    #[error("`{0}` is not a scalar")]
    ExpectedScalar(String),

    /// A structure was required but the value is a scalar or null.
    #[error("`{0}` is not a structure")]
    ExpectedStructure(String),

    /// A handle does not refer to any live object.
    #[error("handle {0} does not refer to a live object")]
    DanglingHandle(Handle),

    /// An op carried a scheduling-state encoding outside the known enumeration.
    #[error("unknown op state encoding {0}")]
    UnknownOpState(u64),

    /// The window walk exceeded the configured bound, which indicates a cyclic list.
    #[error("window walk exceeded {limit} entries; the in-flight list is likely cyclic")]
    WindowOverrun {
        /// Configured walk bound.
        limit: usize,
    },

    /// A command was invoked with missing or malformed arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// A command name that the session does not recognise.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// The log sink could not be opened.
    #[error("Error opening file {path}: {source}", path = .path.display())]
    SinkOpen {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: io::Error,
    },

    /// Writing or flushing a record failed.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    /// A configuration or replay document could not be parsed.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CaptureError>;
