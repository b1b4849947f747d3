use crate::snapshot::DocumentSnapshot;

/// Linear undo/redo log of document snapshots.
///
/// The stack always holds at least one entry (the snapshot the session was
/// opened with), so `current()` is total. Pushing after an undo discards
/// the redo branch.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<DocumentSnapshot>,
    cursor: usize,
    max_depth: usize,
}

impl HistoryStack {
    pub const DEFAULT_DEPTH: usize = 64;

    pub fn new(initial: DocumentSnapshot) -> Self {
        Self::with_depth(initial, Self::DEFAULT_DEPTH)
    }

    pub fn with_depth(initial: DocumentSnapshot, max_depth: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Append a snapshot, discarding any entries past the cursor.
    /// When the stack exceeds its depth the oldest entry is dropped.
    pub fn push(&mut self, snapshot: DocumentSnapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.max_depth {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. Idempotent no-op at the start of history.
    pub fn undo(&mut self) -> Option<&DocumentSnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry. Idempotent no-op at the end of history.
    pub fn redo(&mut self) -> Option<&DocumentSnapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn current(&self) -> &DocumentSnapshot {
        &self.entries[self.cursor]
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the stack retains the snapshot it was opened with.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
