use std::collections::{BTreeSet, HashMap};

use lopdf::{Dictionary, Document, Object, Stream};
use pdf_page_codec::LopdfCodec;
use pdf_session::{PageCodec, Rotation, SessionError};

/// Build a flat-tree PDF where page `i` has MediaBox width `100 + 10 * i`,
/// so page identity survives reordering and can be read back.
fn create_test_pdf(num_pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(100 + 10 * i as i64),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// MediaBox widths in page order, identifying which source page sits where.
fn page_widths(bytes: &[u8]) -> Vec<f32> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    pages
        .values()
        .map(|&id| {
            let dict = doc.get_dictionary(id).unwrap();
            let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            extract_number(&media_box[2]).unwrap()
        })
        .collect()
}

fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    pages
        .values()
        .map(|&id| {
            let dict = doc.get_dictionary(id).unwrap();
            dict.get(b"Rotate")
                .and_then(|obj| obj.as_i64())
                .unwrap_or(0)
        })
        .collect()
}

#[tokio::test]
async fn test_page_count() {
    let bytes = create_test_pdf(5);
    assert_eq!(LopdfCodec::new().page_count(&bytes).await.unwrap(), 5);
}

#[tokio::test]
async fn test_page_count_rejects_garbage() {
    let err = LopdfCodec::new()
        .page_count(b"not a pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::MalformedDocument(_)));
}

#[tokio::test]
async fn test_identity_copy_preserves_order() {
    let bytes = create_test_pdf(3);
    let out = LopdfCodec::new()
        .copy_and_rotate(&bytes, &[0, 1, 2], &HashMap::new())
        .await
        .unwrap();

    assert_eq!(page_widths(&out), vec![100.0, 110.0, 120.0]);
    assert_eq!(page_rotations(&out), vec![0, 0, 0]);
}

#[tokio::test]
async fn test_copy_applies_permutation() {
    let bytes = create_test_pdf(3);
    let out = LopdfCodec::new()
        .copy_and_rotate(&bytes, &[1, 2, 0], &HashMap::new())
        .await
        .unwrap();

    assert_eq!(page_widths(&out), vec![110.0, 120.0, 100.0]);
}

#[tokio::test]
async fn test_copy_rejects_out_of_range_order() {
    let bytes = create_test_pdf(2);
    let err = LopdfCodec::new()
        .copy_and_rotate(&bytes, &[0, 5], &HashMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::CommitFailed(_)));
}

#[tokio::test]
async fn test_rotation_is_additive_on_existing_rotate() {
    let bytes = create_test_pdf(2);
    let rotations: HashMap<usize, Rotation> = [(0, Rotation::Clockwise90)].into_iter().collect();

    let once = LopdfCodec::new()
        .copy_and_rotate(&bytes, &[0, 1], &rotations)
        .await
        .unwrap();
    assert_eq!(page_rotations(&once), vec![90, 0]);

    let twice = LopdfCodec::new()
        .copy_and_rotate(&once, &[0, 1], &rotations)
        .await
        .unwrap();
    assert_eq!(page_rotations(&twice), vec![180, 0]);
}

#[tokio::test]
async fn test_rotation_wraps_to_zero() {
    let bytes = create_test_pdf(1);
    let rotations: HashMap<usize, Rotation> = [(0, Rotation::Clockwise270)].into_iter().collect();

    let mut out = bytes;
    for _ in 0..4 {
        out = LopdfCodec::new()
            .copy_and_rotate(&out, &[0], &rotations)
            .await
            .unwrap();
    }
    // 4 * 270 = 1080 wraps to 0
    assert_eq!(page_rotations(&out), vec![0]);
}

#[tokio::test]
async fn test_rotation_keyed_by_visual_index() {
    let bytes = create_test_pdf(2);
    // Swap the pages and rotate whatever lands at visual index 0
    let rotations: HashMap<usize, Rotation> = [(0, Rotation::Clockwise90)].into_iter().collect();
    let out = LopdfCodec::new()
        .copy_and_rotate(&bytes, &[1, 0], &rotations)
        .await
        .unwrap();

    assert_eq!(page_widths(&out), vec![110.0, 100.0]);
    assert_eq!(page_rotations(&out), vec![90, 0]);
}

#[tokio::test]
async fn test_remove_pages() {
    let bytes = create_test_pdf(5);
    let indices: BTreeSet<usize> = [0, 2].into_iter().collect();

    let out = LopdfCodec::new().remove_pages(&bytes, &indices).await.unwrap();

    assert_eq!(page_widths(&out), vec![110.0, 130.0, 140.0]);
}

#[tokio::test]
async fn test_remove_ignores_out_of_range() {
    let bytes = create_test_pdf(3);
    let indices: BTreeSet<usize> = [1, 10, 99].into_iter().collect();

    let out = LopdfCodec::new().remove_pages(&bytes, &indices).await.unwrap();

    assert_eq!(page_widths(&out), vec![100.0, 120.0]);
}

#[tokio::test]
async fn test_insert_blank_page() {
    let bytes = create_test_pdf(2);

    let out = LopdfCodec::new().insert_blank_page(&bytes, 1).await.unwrap();

    let widths = page_widths(&out);
    assert_eq!(widths.len(), 3);
    assert_eq!(widths[0], 100.0);
    // A4 width in points
    assert!((widths[1] - 595.276).abs() < 0.5);
    assert_eq!(widths[2], 110.0);
}

#[tokio::test]
async fn test_insert_blank_page_clamps_index() {
    let bytes = create_test_pdf(2);

    let out = LopdfCodec::new()
        .insert_blank_page(&bytes, 99)
        .await
        .unwrap();

    let widths = page_widths(&out);
    assert_eq!(widths.len(), 3);
    assert!((widths[2] - 595.276).abs() < 0.5);
}

#[tokio::test]
async fn test_input_buffer_is_untouched() {
    let bytes = create_test_pdf(2);
    let before = bytes.clone();

    let indices: BTreeSet<usize> = [0].into_iter().collect();
    LopdfCodec::new().remove_pages(&bytes, &indices).await.unwrap();

    assert_eq!(bytes, before);
}
