//! PDF rendering, storage and inspection

pub mod render;
pub mod create;
pub mod metadata;

// Re-export commonly used items
pub use render::{render_page, serialize, wrap_lines};
pub use create::{create_note_pdf, pdf_file_name, render_note_pdf, NoteOutputOptions};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
