//! The editing session: one open document, its history, selection, and
//! staged edits, plus the commit algorithm that bakes staged edits into a
//! new snapshot through the page codec.
//!
//! Cheap, reversible intents (rotate, reorder) only touch staged state.
//! Destructive intents (delete, insert) bake any pending staged edits
//! first so page indices are unambiguous, then go through the codec and
//! push a fresh snapshot. Every fallible codec step runs before any state
//! is mutated, so a codec failure rolls back by construction.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::watch;

use crate::codec::PageCodec;
use crate::history::HistoryStack;
use crate::selection::SelectionModel;
use crate::snapshot::DocumentSnapshot;
use crate::staged::StagedEdits;
use crate::types::{Result, Rotation, SessionError};

/// The observable state published to subscribers after every mutation.
///
/// Values are copied out of the session; consumers never alias its
/// internal collections.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    /// Version of the current snapshot (monotonic across commits).
    pub version: u64,
    pub page_count: usize,
    pub selected: BTreeSet<usize>,
    pub active_index: usize,
    /// Staged permutation; empty means identity order.
    pub staged_order: Vec<usize>,
    /// Staged rotation deltas keyed by visual index.
    pub staged_rotations: HashMap<usize, Rotation>,
    pub history_position: usize,
    pub history_len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    /// True while an asynchronous codec operation is in flight.
    pub busy: bool,
}

impl SessionState {
    /// Gates the save affordance: is there anything to commit?
    pub fn has_staged_edits(&self) -> bool {
        !self.staged_order.is_empty() || !self.staged_rotations.is_empty()
    }
}

/// An editing session over one open document.
///
/// The session is the sole mutator of its history, selection, and staged
/// state; construct one per open document and drop it when the document
/// closes. Nothing survives across documents.
pub struct EditSession<C: PageCodec> {
    codec: C,
    history: HistoryStack,
    selection: SelectionModel,
    staged: StagedEdits,
    busy: bool,
    next_version: u64,
    state_tx: watch::Sender<SessionState>,
}

impl<C: PageCodec> EditSession<C> {
    /// Open a document from raw bytes. Fails with `MalformedDocument` if
    /// the codec cannot parse them; no session is created in that case.
    pub async fn open(codec: C, bytes: Vec<u8>) -> Result<Self> {
        let page_count = codec.page_count(&bytes).await?;
        let snapshot = DocumentSnapshot::new(bytes, page_count, 0);
        let (state_tx, _) = watch::channel(SessionState::default());
        let session = Self {
            codec,
            history: HistoryStack::new(snapshot),
            selection: SelectionModel::new(),
            staged: StagedEdits::new(),
            busy: false,
            next_version: 1,
            state_tx,
        };
        session.publish();
        Ok(session)
    }

    /// The current committed snapshot.
    pub fn current(&self) -> &DocumentSnapshot {
        self.history.current()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn staged(&self) -> &StagedEdits {
        &self.staged
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> SessionState {
        self.observable_state()
    }

    /// Subscribe to state changes. Receivers see the latest state after
    /// every completed mutation, plus the busy flag around async commits.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    // ---- selection intents (synchronous, total) ----

    pub fn toggle_selection(&mut self, index: usize, additive: bool) {
        if index >= self.current().page_count() {
            return;
        }
        self.selection.toggle(index, additive);
        self.publish();
    }

    pub fn select_all(&mut self) {
        let page_count = self.current().page_count();
        self.selection.select_all(page_count);
        self.publish();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.publish();
    }

    pub fn set_active_page(&mut self, index: usize) {
        let page_count = self.current().page_count();
        self.selection.set_active(index, page_count);
        self.publish();
    }

    // ---- staged intents ----

    /// Stage a rotation delta on every selected page. Never touches
    /// history; a no-op when the selection is empty.
    pub fn rotate_selected(&mut self, delta: Rotation) {
        if self.selection.is_empty() || delta == Rotation::None {
            return;
        }
        for &index in self.selection.selected() {
            self.staged.stage_rotation(index, delta);
        }
        self.publish();
    }

    /// Move the page at visual position `from` to `to`.
    ///
    /// If any rotation is pending it is committed first: rotations are
    /// keyed by visual index and a move would re-key them onto the wrong
    /// pages. After that bake the reorder is the only staged edit.
    pub async fn reorder_page(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_idle()?;
        self.begin_operation();
        let result = self.reorder_inner(from, to).await;
        self.finish_operation();
        result
    }

    async fn reorder_inner(&mut self, from: usize, to: usize) -> Result<()> {
        if self.staged.has_rotations() {
            self.apply_staged().await?;
        }
        let page_count = self.current().page_count();
        self.staged.stage_reorder(from, to, page_count)
    }

    // ---- commit and destructive intents ----

    /// Bake staged edits into a new snapshot via the codec.
    ///
    /// A no-op returning the current snapshot when nothing is staged.
    /// On success the new snapshot is pushed onto history, staged state
    /// is reset, and the selection is cleared (visual indices now map
    /// 1:1 onto the new snapshot's natural order). On failure the session
    /// is untouched and `CommitFailed` is returned.
    pub async fn commit(&mut self) -> Result<DocumentSnapshot> {
        self.ensure_idle()?;
        if self.staged.is_empty() {
            return Ok(self.current().clone());
        }
        self.begin_operation();
        let result = self.apply_staged().await;
        self.finish_operation();
        result?;
        Ok(self.current().clone())
    }

    /// Delete the currently selected pages. No-op when nothing is selected.
    pub async fn delete_selected(&mut self) -> Result<()> {
        let indices = self.selection.selected().clone();
        self.delete_pages(&indices).await
    }

    /// Delete the given visual pages. Any pending staged edits are baked
    /// first so the indices are unambiguous; out-of-range indices are
    /// ignored, making a repeated call with stale indices harmless.
    pub async fn delete_pages(&mut self, indices: &BTreeSet<usize>) -> Result<()> {
        self.ensure_idle()?;
        if indices.is_empty() {
            return Ok(());
        }
        self.begin_operation();
        let result = self.delete_inner(indices).await;
        self.finish_operation();
        result
    }

    async fn delete_inner(&mut self, indices: &BTreeSet<usize>) -> Result<()> {
        let baked = self.bake_staged().await?;
        let (base_bytes, base_count) = match &baked {
            Some((bytes, count)) => (bytes.as_slice(), *count),
            None => (self.current().bytes(), self.current().page_count()),
        };

        let removed = indices.iter().filter(|&&i| i < base_count).count();
        if removed == 0 {
            if let Some((bytes, count)) = baked {
                self.push_snapshot(bytes, count);
            }
            return Ok(());
        }

        let new_bytes = self.codec.remove_pages(base_bytes, indices).await?;
        let new_count = base_count - removed;
        if let Some((bytes, count)) = baked {
            self.push_snapshot(bytes, count);
        }
        self.push_snapshot(new_bytes, new_count);
        Ok(())
    }

    /// Insert a blank page after the active page (clamped to the end of
    /// the document). Pending staged edits are baked first.
    pub async fn insert_blank_page(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.begin_operation();
        let result = self.insert_inner().await;
        self.finish_operation();
        result
    }

    async fn insert_inner(&mut self) -> Result<()> {
        let baked = self.bake_staged().await?;
        let (base_bytes, base_count) = match &baked {
            Some((bytes, count)) => (bytes.as_slice(), *count),
            None => (self.current().bytes(), self.current().page_count()),
        };

        let at_index = (self.selection.active() + 1).min(base_count);
        let new_bytes = self.codec.insert_blank_page(base_bytes, at_index).await?;
        if let Some((bytes, count)) = baked {
            self.push_snapshot(bytes, count);
        }
        self.push_snapshot(new_bytes, base_count + 1);
        Ok(())
    }

    // ---- history intents ----

    /// Step back one snapshot. Returns `Ok(false)` at the start of
    /// history. Staged edits and the selection are discarded on success;
    /// the restored snapshot's page identities are independent of any
    /// prior staging.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        let Some(snapshot) = self.history.undo() else {
            return Ok(false);
        };
        let page_count = snapshot.page_count();
        self.staged.reset();
        self.selection.clear();
        self.selection.clamp_to(page_count);
        self.publish();
        Ok(true)
    }

    /// Step forward one snapshot. Returns `Ok(false)` at the end of
    /// history.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        let Some(snapshot) = self.history.redo() else {
            return Ok(false);
        };
        let page_count = snapshot.page_count();
        self.staged.reset();
        self.selection.clear();
        self.selection.clamp_to(page_count);
        self.publish();
        Ok(true)
    }

    // ---- internals ----

    /// Run the codec over the staged edits without mutating any state.
    /// Returns the new bytes and page count, or `None` if nothing is
    /// staged.
    async fn bake_staged(&self) -> Result<Option<(Vec<u8>, usize)>> {
        if self.staged.is_empty() {
            return Ok(None);
        }
        let current = self.history.current();
        let order = self.staged.resolved_order(current.page_count());
        let bytes = self
            .codec
            .copy_and_rotate(current.bytes(), &order, self.staged.rotations())
            .await?;
        Ok(Some((bytes, order.len())))
    }

    async fn apply_staged(&mut self) -> Result<()> {
        if let Some((bytes, page_count)) = self.bake_staged().await? {
            self.push_snapshot(bytes, page_count);
        }
        Ok(())
    }

    fn push_snapshot(&mut self, bytes: Vec<u8>, page_count: usize) {
        let version = self.next_version;
        self.next_version += 1;
        self.history
            .push(DocumentSnapshot::new(bytes, page_count, version));
        self.staged.reset();
        self.selection.clear();
        self.selection.clamp_to(page_count);
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn begin_operation(&mut self) {
        self.busy = true;
        self.publish();
    }

    fn finish_operation(&mut self) {
        self.busy = false;
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.observable_state());
    }

    fn observable_state(&self) -> SessionState {
        let current = self.history.current();
        SessionState {
            version: current.version(),
            page_count: current.page_count(),
            selected: self.selection.selected().clone(),
            active_index: self.selection.active(),
            staged_order: self.staged.order().to_vec(),
            staged_rotations: self.staged.rotations().clone(),
            history_position: self.history.position(),
            history_len: self.history.len(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            busy: self.busy,
        }
    }
}
