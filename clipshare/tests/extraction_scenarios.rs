//! Extraction scenarios across the three capture surfaces

use clipshare::{
    collect_entries, CanonicalRecord, CaptureSource, ClipboardItemData, Extractor, MemoryBlob,
    RawEntry, TransferData,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn extract_source(source: &CaptureSource) -> Option<CanonicalRecord> {
    let entries = collect_entries(source);
    runtime()
        .block_on(Extractor::default().extract(&entries))
        .unwrap()
}

#[test]
fn test_json_entry_wins_in_any_position() {
    let rt = runtime();
    let extractor = Extractor::default();
    let json = r#"{"classes":["btn","btn-primary"]}"#;
    let others = vec![
        RawEntry::text("text/plain", "plain"),
        RawEntry::text("text/html", "<div class=\"btn\"></div>"),
        RawEntry::binary("image/png", MemoryBlob::new(vec![0x89, 0x50, 0x4e, 0x47])),
        RawEntry::text("text/uri-list", "https://example.com"),
    ];

    for position in 0..=others.len() {
        let mut entries = others.clone();
        entries.insert(position, RawEntry::text("application/json", json));
        let record = rt.block_on(extractor.extract(&entries)).unwrap().unwrap();
        assert_eq!(
            record,
            CanonicalRecord::new(json, "application/json"),
            "JSON entry at position {} was not selected",
            position
        );
    }
}

#[test]
fn test_json_clipboard_item_scenario() {
    let source = CaptureSource::ClipboardItems(vec![ClipboardItemData::new()
        .with_text("application/json", r#"{"classes":["btn","btn-primary"]}"#)]);
    let record = extract_source(&source).unwrap();
    assert_eq!(record.content_type, "application/json");
    assert_eq!(record.content, r#"{"classes":["btn","btn-primary"]}"#);
}

#[test]
fn test_plain_text_paste_scenario() {
    let source = CaptureSource::Paste(TransferData::new().with_string("text/plain", "hello world"));
    assert_eq!(
        extract_source(&source),
        Some(CanonicalRecord::text("hello world"))
    );
}

#[test]
fn test_empty_capture_scenario() {
    assert_eq!(extract_source(&CaptureSource::ClipboardItems(vec![])), None);
    assert_eq!(extract_source(&CaptureSource::DragDrop(TransferData::new())), None);
}

#[test]
fn test_dropped_image_file() {
    let source = CaptureSource::DragDrop(
        TransferData::new()
            .with_string("Files", "")
            .with_file("logo.png", "image/png", MemoryBlob::new(vec![1, 2, 3])),
    );
    let record = extract_source(&source).unwrap();
    assert_eq!(record.content_type, "image/png");
    assert_eq!(record.content, "data:image/png;base64,AQID");
}

#[test]
fn test_html_paste_over_plain_text() {
    let source = CaptureSource::Paste(
        TransferData::new()
            .with_string("text/plain", "Bold")
            .with_string("text/html", "<b>Bold</b>"),
    );
    let record = extract_source(&source).unwrap();
    assert_eq!(record, CanonicalRecord::new("<b>Bold</b>", "text/html"));
}

#[test]
fn test_mime_parameters_normalized() {
    let source = CaptureSource::Paste(
        TransferData::new().with_string("Text/Plain;charset=UTF-8", "[1, 2, 3]"),
    );
    let record = extract_source(&source).unwrap();
    assert_eq!(record.content_type, "application/json");
}

#[test]
fn test_extraction_is_deterministic() {
    let source = CaptureSource::ClipboardItems(vec![
        ClipboardItemData::new()
            .with_text("text/html", "<i>x</i>")
            .with_blob("image/jpeg", MemoryBlob::new(vec![0xff, 0xd8])),
        ClipboardItemData::new().with_text("text/plain", "x"),
    ]);
    let first = extract_source(&source);
    for _ in 0..5 {
        assert_eq!(extract_source(&source), first);
    }
    assert_eq!(first.unwrap().content_type, "text/html");
}
