use std::collections::VecDeque;

use log::debug;

use crate::error::EditorResult;
use crate::surface::{Snapshot, Surface};

/// Default number of snapshots kept before the oldest is evicted
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Linear undo/redo history of whole-surface snapshots.
///
/// The history always holds at least one entry and `cursor` always indexes
/// a valid entry: the snapshot matching the live surface.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Creates a history seeded with the surface's current state
    pub fn new(surface: &Surface, limit: usize) -> EditorResult<Self> {
        let mut entries = VecDeque::new();
        entries.push_back(surface.snapshot()?);
        Ok(Self {
            entries,
            cursor: 0,
            limit: limit.max(1),
        })
    }

    /// Record the surface's current state.
    ///
    /// Entries after the cursor are discarded first, so a new edit after an
    /// undo removes the possibility to redo.
    pub fn checkpoint(&mut self, surface: &Surface) -> EditorResult<()> {
        let snapshot = surface.snapshot()?;
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        self.cursor += 1;

        if self.entries.len() > self.limit {
            self.entries.pop_front();
            self.cursor -= 1;
        }

        debug!(
            "Checkpoint {} of {} recorded",
            self.cursor + 1,
            self.entries.len()
        );
        Ok(())
    }

    /// Step back one entry and restore it. Returns false at the oldest entry.
    pub fn undo(&mut self, surface: &mut Surface) -> EditorResult<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        surface.restore(&self.entries[self.cursor - 1])?;
        self.cursor -= 1;
        debug!("Undo to entry {}", self.cursor);
        Ok(true)
    }

    /// Step forward one entry and restore it. Returns false at the newest entry.
    pub fn redo(&mut self, surface: &mut Surface) -> EditorResult<bool> {
        if self.cursor + 1 >= self.entries.len() {
            return Ok(false);
        }
        surface.restore(&self.entries[self.cursor + 1])?;
        self.cursor += 1;
        debug!("Redo to entry {}", self.cursor);
        Ok(true)
    }

    /// Returns true if there are entries that can be undone
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there are entries that can be redone
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    // Never empty: seeded on creation
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
