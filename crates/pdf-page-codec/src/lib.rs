//! `lopdf`-backed implementation of the session's page codec.

mod tree;

use std::collections::{BTreeSet, HashMap};

use pdf_session::{PageCodec, Result, Rotation, SessionError};

/// Page codec backed by `lopdf`. Parsing and page-tree rewriting run on
/// the blocking thread pool; input buffers are copied, never mutated.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec;

impl LopdfCodec {
    pub fn new() -> Self {
        Self
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| SessionError::CommitFailed(format!("codec task failed: {e}")))?
}

impl PageCodec for LopdfCodec {
    async fn page_count(&self, bytes: &[u8]) -> Result<usize> {
        let bytes = bytes.to_vec();
        run_blocking(move || tree::page_count_sync(&bytes)).await
    }

    async fn copy_and_rotate(
        &self,
        bytes: &[u8],
        order: &[usize],
        rotations: &HashMap<usize, Rotation>,
    ) -> Result<Vec<u8>> {
        let bytes = bytes.to_vec();
        let order = order.to_vec();
        let rotations = rotations.clone();
        run_blocking(move || tree::copy_and_rotate_sync(&bytes, &order, &rotations)).await
    }

    async fn remove_pages(&self, bytes: &[u8], indices: &BTreeSet<usize>) -> Result<Vec<u8>> {
        let bytes = bytes.to_vec();
        let indices = indices.clone();
        run_blocking(move || tree::remove_pages_sync(&bytes, &indices)).await
    }

    async fn insert_blank_page(&self, bytes: &[u8], at_index: usize) -> Result<Vec<u8>> {
        let bytes = bytes.to_vec();
        run_blocking(move || tree::insert_blank_page_sync(&bytes, at_index)).await
    }
}
