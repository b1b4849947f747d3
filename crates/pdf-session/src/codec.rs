use std::collections::{BTreeSet, HashMap};

use crate::types::{Result, Rotation};

/// Byte-level document operations the session delegates to.
///
/// Implementations must treat input buffers as read-only and always return
/// freshly allocated output bytes; the raw input may be a view that becomes
/// invalid after being consumed once. Every call is single-shot and
/// asynchronous.
#[allow(async_fn_in_trait)]
pub trait PageCodec {
    /// Number of pages in the document, or `MalformedDocument` if the
    /// bytes cannot be parsed.
    async fn page_count(&self, bytes: &[u8]) -> Result<usize>;

    /// Produce new bytes with pages copied in `order` and, for each
    /// resulting page at a visual index, the mapped rotation added on top
    /// of the page's existing rotation (wrapping to [0, 360)).
    /// Fails with `CommitFailed` if any index in `order` is out of range.
    async fn copy_and_rotate(
        &self,
        bytes: &[u8],
        order: &[usize],
        rotations: &HashMap<usize, Rotation>,
    ) -> Result<Vec<u8>>;

    /// Produce new bytes with the given pages removed. Out-of-range
    /// indices are ignored, not errors.
    async fn remove_pages(&self, bytes: &[u8], indices: &BTreeSet<usize>) -> Result<Vec<u8>>;

    /// Produce new bytes with a blank page inserted at `at_index`,
    /// clamped to `[0, page_count]`.
    async fn insert_blank_page(&self, bytes: &[u8], at_index: usize) -> Result<Vec<u8>>;
}
