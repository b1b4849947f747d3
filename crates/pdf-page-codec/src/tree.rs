//! Page-tree level operations on lopdf documents.
//!
//! Reorder, removal, and insertion are all expressed as a rewrite of the
//! root Pages node's Kids array plus its Count. This assumes the common
//! flat page tree where the Kids of the root node are the page objects in
//! document order.

use std::collections::{BTreeSet, HashMap};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_session::{Result, Rotation, SessionError};

/// A4 in PDF points, used for inserted blank pages.
const BLANK_PAGE_SIZE: (f32, f32) = (595.276, 841.89);

fn malformed(e: lopdf::Error) -> SessionError {
    SessionError::MalformedDocument(e.to_string())
}

fn commit_err(e: lopdf::Error) -> SessionError {
    SessionError::CommitFailed(e.to_string())
}

fn load_document(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(malformed)
}

fn save_document(mut doc: Document) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| SessionError::CommitFailed(e.to_string()))?;
    Ok(out)
}

/// Page object ids in document order.
fn ordered_page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn pages_root(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(|obj| obj.as_reference())
        .map_err(commit_err)?;
    let catalog = doc.get_dictionary(catalog_id).map_err(commit_err)?;
    catalog
        .get(b"Pages")
        .and_then(|obj| obj.as_reference())
        .map_err(commit_err)
}

/// Replace the root Kids array (and Count) with the given page references.
fn set_kids(doc: &mut Document, kids: Vec<Object>) -> Result<()> {
    let pages_id = pages_root(doc)?;
    let count = kids.len() as i64;
    let pages_dict = doc.get_dictionary(pages_id).map_err(commit_err)?;
    let mut updated = pages_dict.clone();
    updated.set("Count", Object::Integer(count));
    updated.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(updated));
    Ok(())
}

/// Add a rotation delta on top of the page's existing /Rotate entry,
/// wrapping to [0, 360).
fn add_rotation(doc: &mut Document, page_id: ObjectId, delta: Rotation) -> Result<()> {
    let dict = doc
        .get_object_mut(page_id)
        .and_then(|obj| obj.as_dict_mut())
        .map_err(commit_err)?;
    let current = dict
        .get(b"Rotate")
        .and_then(|obj| obj.as_i64())
        .unwrap_or(0);
    let next = (current + i64::from(delta.degrees())).rem_euclid(360);
    dict.set("Rotate", Object::Integer(next));
    Ok(())
}

pub(crate) fn page_count_sync(bytes: &[u8]) -> Result<usize> {
    Ok(load_document(bytes)?.get_pages().len())
}

pub(crate) fn copy_and_rotate_sync(
    bytes: &[u8],
    order: &[usize],
    rotations: &HashMap<usize, Rotation>,
) -> Result<Vec<u8>> {
    let mut doc = load_document(bytes)?;
    let page_ids = ordered_page_ids(&doc);

    let mut kids = Vec::with_capacity(order.len());
    for (visual_index, &source_index) in order.iter().enumerate() {
        let page_id = *page_ids.get(source_index).ok_or_else(|| {
            SessionError::CommitFailed(format!(
                "page index {source_index} out of range for {} pages",
                page_ids.len()
            ))
        })?;
        if let Some(&delta) = rotations.get(&visual_index) {
            if delta != Rotation::None {
                add_rotation(&mut doc, page_id, delta)?;
            }
        }
        kids.push(Object::Reference(page_id));
    }

    set_kids(&mut doc, kids)?;
    save_document(doc)
}

pub(crate) fn remove_pages_sync(bytes: &[u8], indices: &BTreeSet<usize>) -> Result<Vec<u8>> {
    let mut doc = load_document(bytes)?;
    let page_ids = ordered_page_ids(&doc);

    // Out-of-range indices simply match nothing.
    let kids: Vec<Object> = page_ids
        .iter()
        .enumerate()
        .filter(|(index, _)| !indices.contains(index))
        .map(|(_, &id)| Object::Reference(id))
        .collect();

    set_kids(&mut doc, kids)?;
    save_document(doc)
}

pub(crate) fn insert_blank_page_sync(bytes: &[u8], at_index: usize) -> Result<Vec<u8>> {
    let mut doc = load_document(bytes)?;
    let page_ids = ordered_page_ids(&doc);
    let at_index = at_index.min(page_ids.len());

    let pages_id = pages_root(&doc)?;
    let blank_id = create_blank_page(&mut doc, pages_id);

    let mut kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();
    kids.insert(at_index, Object::Reference(blank_id));

    set_kids(&mut doc, kids)?;
    save_document(doc)
}

/// Create a blank A4 page with an empty content stream.
fn create_blank_page(doc: &mut Document, parent_id: ObjectId) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let (width, height) = BLANK_PAGE_SIZE;
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(width),
            Object::Real(height),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));
    doc.add_object(page_dict)
}
