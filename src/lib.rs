//! PDF Notes Library
//!
//! Prints a plain-text note to a single-page PDF. This library provides
//! functionality to:
//! - Lay out a header, footer, body and diagonal watermark on a page
//! - Measure text with the standard PDF fonts
//! - Load and validate persisted settings
//! - Render the layout with lopdf and store `<title>.pdf`
//!
//! # Example
//!
//! ```no_run
//! use pdf_notes::pdf::{create_note_pdf, NoteOutputOptions};
//! use pdf_notes::settings::Settings;
//! use std::path::Path;
//!
//! let settings = Settings::load(Path::new("pdf-notes.json")).expect("Failed to load settings");
//! let options = NoteOutputOptions::default();
//!
//! create_note_pdf("Groceries", "Milk\nEggs", &settings, &options).expect("Failed to create PDF");
//! ```

pub mod error;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod settings;

// Re-export commonly used items
pub use error::{Error, Result};
pub use fonts::{FontMetrics, StandardFont};
pub use layout::{layout_document, DocumentConfig, PageGeometry, RenderPlan, TextBlock};
pub use settings::Settings;
