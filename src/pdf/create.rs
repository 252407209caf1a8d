//! Create a note PDF and store it next to the other outputs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::error::{Error, Result};
use crate::layout::layout_document;
use crate::pdf::render::{render_page, serialize};
use crate::settings::Settings;

/// Producer string written to the document info dictionary
const PRODUCER: &str = concat!("pdf-notes ", env!("CARGO_PKG_VERSION"));

/// Where and how to store the generated PDF
#[derive(Debug, Clone)]
pub struct NoteOutputOptions {
    /// Directory the PDF is written to
    pub output_dir: PathBuf,
    /// Replace an existing file with the same name
    pub overwrite: bool,
}

impl Default for NoteOutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overwrite: false,
        }
    }
}

/// File name for a note title: `<title>.pdf`
///
/// Titles that are blank or would escape the output directory are rejected.
pub fn pdf_file_name(title: &str) -> Result<String> {
    if title.trim().is_empty()
        || title == "."
        || title == ".."
        || title.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidTitle(title.to_string()));
    }
    Ok(format!("{}.pdf", title))
}

/// Lay out and render a note, returning the PDF bytes
///
/// Settings are validated first; nothing is drawn if any of them is unusable.
pub fn render_note_pdf(title: &str, content: &str, settings: &Settings) -> Result<Vec<u8>> {
    let config = settings.document_config()?;
    let geometry = settings.page_geometry()?;
    let font = settings.font()?;

    let plan = layout_document(&config, content, &geometry, &font);
    let mut doc = render_page(&plan, &geometry, font)?;
    set_document_info(&mut doc, title);

    serialize(&mut doc)
}

/// Render a note and write it to `<output_dir>/<title>.pdf`
///
/// The file is written to a temporary name and moved into place, so a
/// failure never leaves a partial PDF behind. Without `overwrite`, a file
/// that appears at the target while rendering is left untouched.
///
/// # Example
///
/// ```no_run
/// use pdf_notes::pdf::{create_note_pdf, NoteOutputOptions};
/// use pdf_notes::settings::Settings;
///
/// let settings = Settings {
///     header_text: "Meeting notes".to_string(),
///     ..Default::default()
/// };
///
/// let path = create_note_pdf("Standup", "Discussed the release.", &settings, &NoteOutputOptions::default())
///     .expect("Failed to create PDF");
/// println!("PDF saved as {}", path.display());
/// ```
pub fn create_note_pdf(
    title: &str,
    content: &str,
    settings: &Settings,
    options: &NoteOutputOptions,
) -> Result<PathBuf> {
    let file_name = pdf_file_name(title)?;
    let output_path = options.output_dir.join(&file_name);

    if output_path.exists() && !options.overwrite {
        return Err(Error::OutputExists(output_path));
    }

    let bytes = render_note_pdf(title, content, settings)?;

    fs::create_dir_all(&options.output_dir)?;
    write_atomically(&output_path, &bytes, options.overwrite)?;

    log::info!("PDF saved as {} ({} bytes)", output_path.display(), bytes.len());
    Ok(output_path)
}

/// Write through a temporary file; without `overwrite` the final step is a
/// hard link, which fails instead of replacing a file created meanwhile
fn write_atomically(path: &Path, bytes: &[u8], overwrite: bool) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::General(format!("No file name in {}", path.display())))?;
    let temp_path = path.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let result = fs::write(&temp_path, bytes).and_then(|_| {
        if overwrite {
            fs::rename(&temp_path, path)
        } else {
            fs::hard_link(&temp_path, path).and_then(|_| fs::remove_file(&temp_path))
        }
    });

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            return Err(Error::OutputExists(path.to_path_buf()));
        }
        return Err(e.into());
    }
    Ok(())
}

/// Set Title, Producer and CreationDate in the document info dictionary
fn set_document_info(doc: &mut Document, title: &str) {
    let mut info = Dictionary::new();
    info.set("Title", text_string(title));
    info.set("Producer", Object::string_literal(PRODUCER));
    info.set(
        "CreationDate",
        Object::string_literal(Local::now().format("D:%Y%m%d%H%M%S").to_string()),
    );
    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));
}

/// Encode a PDF text string: literal for ASCII, UTF-16BE with BOM otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_file_name() {
        assert_eq!(pdf_file_name("Daily note").unwrap(), "Daily note.pdf");
        assert_eq!(pdf_file_name("2026-10-19").unwrap(), "2026-10-19.pdf");
    }

    #[test]
    fn test_pdf_file_name_rejects_bad_titles() {
        for title in ["", "   ", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(pdf_file_name(title), Err(Error::InvalidTitle(_))),
                "title {:?} should be rejected",
                title
            );
        }
    }

    #[test]
    fn test_text_string_encoding() {
        match text_string("Plain") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Plain".to_vec()),
            other => panic!("unexpected {:?}", other),
        }
        match text_string("Café") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(bytes.len(), 2 + 4 * 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_render_note_pdf_rejects_invalid_settings() {
        let settings = Settings { watermark_angle: f32::NAN, ..Default::default() };
        assert!(matches!(
            render_note_pdf("t", "body", &settings),
            Err(Error::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_render_note_pdf_sets_title() {
        let bytes = render_note_pdf("Weekly review", "Body", &Settings::default()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Weekly review");
    }

    #[test]
    fn test_write_atomically_never_replaces_without_overwrite() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("Raced.pdf");
        fs::write(&path, b"someone else").unwrap();

        let err = write_atomically(&path, b"ours", false).unwrap_err();
        assert!(matches!(err, Error::OutputExists(_)));
        assert_eq!(fs::read(&path).unwrap(), b"someone else");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1, "temp file left behind");

        write_atomically(&path, b"ours", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"ours");
    }

    #[test]
    fn test_write_atomically_creates_new_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("Fresh.pdf");

        write_atomically(&path, b"pdf", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"pdf");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
