use std::collections::HashMap;

use crate::types::{Result, Rotation, SessionError};

/// The virtual (uncommitted) edits applied on top of the current snapshot:
/// a page permutation and per-page rotation deltas keyed by visual index.
///
/// An empty `order` means identity over the current page count; otherwise
/// it is a full permutation of `[0, page_count)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedEdits {
    order: Vec<usize>,
    rotations: HashMap<usize, Rotation>,
}

impl StagedEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose a rotation delta onto the page at `visual_index`.
    /// Deltas that cancel back to zero are dropped so `is_empty`
    /// keeps gating the save affordance correctly.
    pub fn stage_rotation(&mut self, visual_index: usize, delta: Rotation) {
        let next = self.rotation_at(visual_index).compose(delta);
        if next == Rotation::None {
            self.rotations.remove(&visual_index);
        } else {
            self.rotations.insert(visual_index, next);
        }
    }

    /// Move the page at visual position `from` to visual position `to`,
    /// materializing the identity permutation first if nothing is staged.
    pub fn stage_reorder(&mut self, from: usize, to: usize, page_count: usize) -> Result<()> {
        // Validate before materializing so a rejected move stages nothing
        let len = if self.order.is_empty() {
            page_count
        } else {
            self.order.len()
        };
        if from >= len {
            return Err(SessionError::IndexOutOfRange {
                index: from,
                page_count: len,
            });
        }
        if to >= len {
            return Err(SessionError::IndexOutOfRange {
                index: to,
                page_count: len,
            });
        }
        if self.order.is_empty() {
            self.order = (0..page_count).collect();
        }
        let page = self.order.remove(from);
        self.order.insert(to, page);
        Ok(())
    }

    /// True iff no reorder and no rotation is pending.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.rotations.is_empty()
    }

    pub fn has_rotations(&self) -> bool {
        !self.rotations.is_empty()
    }

    pub fn has_reorder(&self) -> bool {
        !self.order.is_empty()
    }

    /// The staged permutation, or empty for identity.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The staged permutation with identity materialized.
    pub fn resolved_order(&self, page_count: usize) -> Vec<usize> {
        if self.order.is_empty() {
            (0..page_count).collect()
        } else {
            self.order.clone()
        }
    }

    pub fn rotations(&self) -> &HashMap<usize, Rotation> {
        &self.rotations
    }

    pub fn rotation_at(&self, visual_index: usize) -> Rotation {
        self.rotations
            .get(&visual_index)
            .copied()
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.order.clear();
        self.rotations.clear();
    }
}
