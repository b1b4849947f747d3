use std::collections::BTreeSet;

/// Multi-select state over visual page indices, plus one active index.
///
/// All operations are total; indices are clamped or ignored rather than
/// reported as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: BTreeSet<usize>,
    active: usize,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click semantics. Non-additive replaces the selection with `{index}`,
    /// except that clicking the sole selected page clears the selection.
    /// Additive toggles `index` in and out, preserving the rest.
    /// The active index always moves to `index`.
    pub fn toggle(&mut self, index: usize, additive: bool) {
        if additive {
            if !self.selected.remove(&index) {
                self.selected.insert(index);
            }
        } else if self.selected.len() == 1 && self.selected.contains(&index) {
            self.selected.clear();
        } else {
            self.selected.clear();
            self.selected.insert(index);
        }
        self.active = index;
    }

    pub fn select_all(&mut self, page_count: usize) {
        self.selected = (0..page_count).collect();
    }

    /// Empties the selection; the active index is unchanged.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn set_active(&mut self, index: usize, page_count: usize) {
        self.active = index.min(page_count.saturating_sub(1));
    }

    /// Drop selected indices that no longer exist and clamp the active
    /// index after the page count shrinks.
    pub fn clamp_to(&mut self, page_count: usize) {
        self.selected.retain(|&i| i < page_count);
        self.active = self.active.min(page_count.saturating_sub(1));
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
