//! Integration tests for the pdf-notes library

use lopdf::content::Content;
use lopdf::Document;
use pdf_notes::pdf::{count_pages, create_note_pdf, extract_metadata, NoteOutputOptions};
use pdf_notes::settings::Settings;
use pdf_notes::Error;
use std::path::Path;
use tempfile::TempDir;

fn options(dir: &Path) -> NoteOutputOptions {
    NoteOutputOptions {
        output_dir: dir.to_path_buf(),
        overwrite: false,
    }
}

/// Text-showing operand strings on the first page, in drawing order
fn drawn_strings(path: &Path) -> Vec<Vec<u8>> {
    let doc = Document::load(path).expect("Failed to load PDF");
    let page_id = *doc.get_pages().values().next().expect("PDF has no pages");
    let bytes = doc.get_page_content(page_id).expect("Failed to read page content");
    let content = Content::decode(&bytes).expect("Failed to decode content");

    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| operand.as_str().ok())
        .map(|s| s.to_vec())
        .collect()
}

#[test]
fn test_create_note_pdf_writes_title_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = Settings::default();

    let path = create_note_pdf("Hello", "Hello", &settings, &options(temp_dir.path()))
        .expect("Failed to create PDF");

    assert_eq!(path, temp_dir.path().join("Hello.pdf"));
    assert!(path.exists(), "PDF was not created");
    assert_eq!(count_pages(&path).expect("Failed to count pages"), 1);

    let metadata = extract_metadata(&path).expect("Failed to read metadata");
    assert_eq!(metadata.title.as_deref(), Some("Hello"));
    assert!(metadata.producer.unwrap_or_default().starts_with("pdf-notes"));
}

#[test]
fn test_blocks_drawn_in_plan_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = Settings {
        header_text: "Notes".to_string(),
        footer_text: "Page footer".to_string(),
        watermark_text: "Obsidian".to_string(),
        ..Default::default()
    };

    let path = create_note_pdf("Ordered", "Body text", &settings, &options(temp_dir.path()))
        .expect("Failed to create PDF");

    let strings = drawn_strings(&path);
    assert_eq!(
        strings,
        vec![
            b"Notes".to_vec(),
            b"Page footer".to_vec(),
            b"Body text".to_vec(),
            b"Obsidian".to_vec(),
        ]
    );
}

#[test]
fn test_all_text_empty_still_creates_pdf() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = Settings {
        watermark_text: String::new(),
        ..Default::default()
    };

    let path = create_note_pdf("Blank", "", &settings, &options(temp_dir.path()))
        .expect("Empty note should still render");

    assert_eq!(count_pages(&path).expect("Failed to count pages"), 1);
    assert!(drawn_strings(&path).is_empty());
}

#[test]
fn test_long_body_wraps_within_margins() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = Settings {
        watermark_text: String::new(),
        ..Default::default()
    };
    let content = "lorem ipsum dolor sit amet ".repeat(40);

    let path = create_note_pdf("Wrapped", content.trim_end(), &settings, &options(temp_dir.path()))
        .expect("Failed to create PDF");

    let strings = drawn_strings(&path);
    assert!(strings.len() > 1, "long body should wrap onto several lines");
}

#[test]
fn test_existing_output_is_not_overwritten() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let existing = temp_dir.path().join("Taken.pdf");
    std::fs::write(&existing, b"original").expect("Failed to write file");

    let result = create_note_pdf("Taken", "new", &Settings::default(), &options(temp_dir.path()));
    assert!(matches!(result, Err(Error::OutputExists(_))));
    assert_eq!(std::fs::read(&existing).expect("Failed to read file"), b"original");

    let forced = NoteOutputOptions {
        overwrite: true,
        ..options(temp_dir.path())
    };
    create_note_pdf("Taken", "new", &Settings::default(), &forced).expect("Overwrite should succeed");
    assert_eq!(count_pages(&existing).expect("Failed to count pages"), 1);
}

#[test]
fn test_invalid_settings_leave_no_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings_path = temp_dir.path().join("pdf-notes.json");
    std::fs::write(&settings_path, r#"{"watermarkAngle": null}"#).expect("Failed to write settings");

    let settings = Settings::load(&settings_path).expect("Settings with null angle still load");
    let result = create_note_pdf("Broken", "body", &settings, &options(temp_dir.path()));

    assert!(matches!(result, Err(Error::InvalidSetting { .. })));
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("Failed to list temp directory")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path() != settings_path)
        .collect();
    assert!(leftovers.is_empty(), "no output should be written: {:?}", leftovers);
}

#[test]
fn test_invalid_title_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let result = create_note_pdf("../escape", "body", &Settings::default(), &options(temp_dir.path()));
    assert!(matches!(result, Err(Error::InvalidTitle(_))));
}

#[test]
fn test_non_ascii_title_round_trips() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = create_note_pdf("Café notes", "Crème brûlée", &Settings::default(), &options(temp_dir.path()))
        .expect("Failed to create PDF");

    let metadata = extract_metadata(&path).expect("Failed to read metadata");
    assert_eq!(metadata.title.as_deref(), Some("Café notes"));

    let strings = drawn_strings(&path);
    assert_eq!(strings[0], vec![b'C', b'r', 0xE8, b'm', b'e', b' ', b'b', b'r', 0xFB, b'l', 0xE9, b'e']);
}
