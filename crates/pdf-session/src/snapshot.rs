use std::sync::Arc;

/// One immutable committed state of the document.
///
/// Bytes are shared behind an `Arc` so snapshots can be handed to any
/// number of readers (renderers, thumbnail strips) without copying.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    bytes: Arc<[u8]>,
    page_count: usize,
    version: u64,
}

impl DocumentSnapshot {
    pub fn new(bytes: Vec<u8>, page_count: usize, version: u64) -> Self {
        Self {
            bytes: bytes.into(),
            page_count,
            version,
        }
    }

    /// Read-only view of the document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Defensive copy for consumers that need an owned buffer they may
    /// consume or detach (e.g. handing bytes to a renderer).
    pub fn bytes_copy(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
