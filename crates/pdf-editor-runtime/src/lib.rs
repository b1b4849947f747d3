mod worker;

pub use worker::worker_task;

// Re-export the observable state so UI code only needs this crate
pub use pdf_session::{Rotation, SessionState};

use std::collections::BTreeSet;

/// Commands sent from UI to the editor worker
#[derive(Debug, Clone)]
pub enum EditorCommand {
    /// Open a document from raw bytes, replacing any open session
    Open {
        bytes: Vec<u8>,
    },
    Close,
    ToggleSelection {
        index: usize,
        additive: bool,
    },
    SelectAll,
    ClearSelection,
    SetActivePage {
        index: usize,
    },
    RotateSelected {
        delta: Rotation,
    },
    ReorderPage {
        from: usize,
        to: usize,
    },
    Commit,
    DeleteSelected,
    DeletePages {
        indices: BTreeSet<usize>,
    },
    InsertBlankPage,
    Undo,
    Redo,
}

/// Updates sent from the editor worker to the UI
#[derive(Debug, Clone)]
pub enum EditorUpdate {
    SessionOpened { state: SessionState },
    StateChanged { state: SessionState },
    SessionClosed,
    Error { message: String },
}
