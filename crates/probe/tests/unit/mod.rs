//! # Unit Components
//!
//! Behavioural tests grouped by the component under test.

/// Configuration defaults and JSON loading.
pub mod config;


/// Introspector path helpers and the heap snapshot.
pub mod introspect;
