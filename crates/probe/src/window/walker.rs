//! Single-pass window classification.
//!
//! The walker follows the in-flight list from its head and folds every entry
//! into a [`WindowCensus`]:
//! 1. **Scheduling sub-window:** Entries in [`OpState::InRs`] are counted by path, regardless of pivot position.
//! 2. **Miss occupancy:** Entries in [`OpState::Miss`] are counted by path.
//! 3. **Before/after split:** Every entry other than the pivot is committed or pending, on the
//!    side of the pivot it sits on.
//!
//! The list must be acyclic. Without a configured walk bound a cyclic list
//! never terminates; with one, the walk fails instead of returning a
//! truncated census.

use tracing::{debug, warn};

use super::op::{MicroOp, OpState};
use crate::common::{CaptureError, Result};
use crate::config::NameConfig;
use crate::introspect::{Handle, Introspector};

/// Counts produced by one walk over the window.
///
/// If the pivot is never matched, `pivot_found` is false and every entry is
/// counted on the "before" side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowCensus {
    /// Older than the pivot and completed.
    pub committed_before: u32,
    /// Older than the pivot and not completed.
    pub pending_before: u32,
    /// Younger than the pivot and completed.
    pub committed_after: u32,
    /// Younger than the pivot and not completed.
    pub pending_after: u32,
    /// On-path ops waiting in the scheduling window.
    pub rs_on_path: u32,
    /// Off-path ops waiting in the scheduling window.
    pub rs_off_path: u32,
    /// On-path ops waiting on a data-cache miss.
    pub miss_on_path: u32,
    /// Off-path ops waiting on a data-cache miss.
    pub miss_off_path: u32,
    /// Whether the pivot was seen.
    pub pivot_found: bool,
    /// Entries visited, pivot included.
    pub visited: u32,
}

impl WindowCensus {
    /// Folds one entry into the census.
    pub fn observe(&mut self, op: &MicroOp, pivot: Handle, cycle: u64) {
        self.visited += 1;

        match (op.state, op.off_path) {
            (OpState::InRs, true) => self.rs_off_path += 1,
            (OpState::InRs, false) => self.rs_on_path += 1,
            (OpState::Miss, true) => self.miss_off_path += 1,
            (OpState::Miss, false) => self.miss_on_path += 1,
            _ => {}
        }

        if op.handle == pivot {
            self.pivot_found = true;
            return;
        }

        let committed = op.committed_by(cycle);
        match (self.pivot_found, committed) {
            (false, true) => self.committed_before += 1,
            (false, false) => self.pending_before += 1,
            (true, true) => self.committed_after += 1,
            (true, false) => self.pending_after += 1,
        }
    }

    /// Entries on either side of the pivot, pivot excluded.
    pub const fn siblings(&self) -> u32 {
        self.committed_before + self.pending_before + self.committed_after + self.pending_after
    }

    /// Total scheduling sub-window occupants seen by the walk.
    pub const fn rs_seen(&self) -> u32 {
        self.rs_on_path + self.rs_off_path
    }
}

/// Walks the in-flight list through an introspector.
#[derive(Debug)]
pub struct WindowWalker<'a, I: ?Sized> {
    intro: &'a I,
    names: &'a NameConfig,
    max_walk: Option<usize>,
}

impl<'a, I: Introspector + ?Sized> WindowWalker<'a, I> {
    /// Creates a walker that reads fields by the given names.
    pub const fn new(intro: &'a I, names: &'a NameConfig) -> Self {
        Self {
            intro,
            names,
            max_walk: None,
        }
    }

    /// Fails the walk after `limit` entries instead of looping on a cyclic list.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.max_walk = limit;
        self
    }

    /// Iterates the list starting at `head`, oldest op first.
    pub fn iter(&self, head: Option<Handle>) -> WindowIter<'_, 'a, I> {
        WindowIter {
            walker: self,
            next: head,
            visited: 0,
        }
    }

    /// Classifies the window whose structure is `window`.
    pub fn classify_window(&self, window: Handle, pivot: Handle, cycle: u64) -> Result<WindowCensus> {
        let head = self.intro.link_at(window, &self.names.window_head)?;
        self.classify(head, pivot, cycle)
    }

    /// Classifies every entry from `head` relative to `pivot` at `cycle`.
    pub fn classify(&self, head: Option<Handle>, pivot: Handle, cycle: u64) -> Result<WindowCensus> {
        let mut census = WindowCensus::default();
        for op in self.iter(head) {
            census.observe(&op?, pivot, cycle);
        }

        debug!(
            visited = census.visited,
            before = census.committed_before + census.pending_before,
            after = census.committed_after + census.pending_after,
            rs_on = census.rs_on_path,
            rs_off = census.rs_off_path,
            "window classified"
        );
        if !census.pivot_found {
            warn!(%pivot, cycle, "pivot op not in flight; all entries counted before it");
        }
        Ok(census)
    }
}

/// Iterator over the ops of one window walk.
///
/// Yields an error and then stops if a field cannot be read or the walk bound
/// is exceeded.
#[derive(Debug)]
pub struct WindowIter<'w, 'a, I: ?Sized> {
    walker: &'w WindowWalker<'a, I>,
    next: Option<Handle>,
    visited: usize,
}

impl<I: Introspector + ?Sized> Iterator for WindowIter<'_, '_, I> {
    type Item = Result<MicroOp>;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next.take()?;

        if let Some(limit) = self.walker.max_walk {
            if self.visited >= limit {
                return Some(Err(CaptureError::WindowOverrun { limit }));
            }
        }
        self.visited += 1;

        let op = MicroOp::read(self.walker.intro, self.walker.names, handle);
        if let Ok(op) = &op {
            self.next = op.next;
        }
        Some(op)
    }
}
