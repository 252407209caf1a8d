//! Paint a [`RenderPlan`] onto a fresh single-page PDF using lopdf
//!
//! Each text block becomes its own `q ... Q` group so colour, opacity and
//! the text matrix never leak between blocks. Text is set with one of the
//! standard 14 fonts under WinAnsiEncoding.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::{Error, Result};
use crate::fonts::{count_unmappable, encode_win_ansi, FontMetrics, StandardFont};
use crate::layout::{PageGeometry, RenderPlan, TextBlock, LINE_HEIGHT_RATIO};

/// Resource name of the text font on the page
const FONT_RESOURCE: &str = "F1";

/// Break text into lines for drawing
///
/// Newlines always break. With `max_width`, words (split on single spaces)
/// are packed greedily; a word wider than the line is kept whole on its own
/// line rather than split. Empty text yields no lines.
pub fn wrap_lines<F: FontMetrics + ?Sized>(
    text: &str,
    max_width: Option<f32>,
    font: &F,
    font_size: f32,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();

    for paragraph in normalized.split('\n') {
        let Some(max_width) = max_width else {
            lines.push(paragraph.to_string());
            continue;
        };

        let mut current = String::new();
        for (i, word) in paragraph.split(' ').enumerate() {
            if i == 0 {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if !current.is_empty() && font.measure_width(&candidate, font_size) > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }

    lines
}

/// Graphics states for the distinct opacities used on the page
struct OpacityStates {
    states: Vec<(f32, String)>,
}

impl OpacityStates {
    fn collect(plan: &RenderPlan) -> Self {
        let mut states: Vec<(f32, String)> = Vec::new();
        for block in plan.iter().filter(|b| !b.is_empty() && b.opacity < 1.0) {
            if !states.iter().any(|(opacity, _)| (*opacity - block.opacity).abs() < f32::EPSILON) {
                let name = format!("GS{}", states.len() + 1);
                states.push((block.opacity, name));
            }
        }
        Self { states }
    }

    fn name_for(&self, opacity: f32) -> Option<&str> {
        self.states
            .iter()
            .find(|(o, _)| (*o - opacity).abs() < f32::EPSILON)
            .map(|(_, name)| name.as_str())
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        for (opacity, name) in &self.states {
            let mut state = Dictionary::new();
            state.set("Type", Object::Name(b"ExtGState".to_vec()));
            state.set("ca", Object::from(opacity.clamp(0.0, 1.0)));
            state.set("CA", Object::from(opacity.clamp(0.0, 1.0)));
            dict.set(name.as_bytes().to_vec(), Object::Dictionary(state));
        }
        dict
    }
}

/// Content stream operations drawing a single block
fn block_operations(
    block: &TextBlock,
    font: StandardFont,
    opacity_state: Option<&str>,
) -> Result<Vec<Operation>> {
    let rotation = block.rotation.radians();
    if !rotation.is_finite() {
        return Err(Error::General(format!(
            "cannot draw '{}' with rotation {}",
            block.content,
            block.rotation.degrees()
        )));
    }

    let lines = wrap_lines(&block.content, block.max_width, &font, block.font_size);
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let unmappable = count_unmappable(&block.content);
    if unmappable > 0 {
        log::warn!(
            "{} character(s) cannot be drawn with {} and will appear as '?'",
            unmappable,
            font.base_font_name()
        );
    }

    let line_height = block.line_height.unwrap_or(block.font_size * LINE_HEIGHT_RATIO);
    let (sin, cos) = if block.rotation.is_none() { (0.0, 1.0) } else { rotation.sin_cos() };

    let mut ops = vec![Operation::new("q", vec![])];
    if let Some(name) = opacity_state {
        ops.push(Operation::new("gs", vec![Object::Name(name.as_bytes().to_vec())]));
    }
    ops.push(Operation::new(
        "rg",
        vec![block.color.r.into(), block.color.g.into(), block.color.b.into()],
    ));
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), block.font_size.into()],
    ));
    ops.push(Operation::new("TL", vec![line_height.into()]));
    ops.push(Operation::new(
        "Tm",
        vec![
            cos.into(),
            sin.into(),
            (-sin).into(),
            cos.into(),
            block.origin.x.into(),
            block.origin.y.into(),
        ],
    ));

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push(Operation::new("T*", vec![]));
        }
        ops.push(Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(line))]));
    }

    ops.push(Operation::new("ET", vec![]));
    ops.push(Operation::new("Q", vec![]));
    Ok(ops)
}

fn font_dictionary(font: StandardFont) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"Font".to_vec()));
    dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    dict.set("BaseFont", Object::Name(font.base_font_name().as_bytes().to_vec()));
    dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    dict
}

/// Create a one-page document and draw every block of `plan` on it
///
/// Blocks are painted in plan order, so later blocks sit on top.
pub fn render_page(plan: &RenderPlan, geometry: &PageGeometry, font: StandardFont) -> Result<Document> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let opacity_states = OpacityStates::collect(plan);
    let mut operations = Vec::new();
    for block in plan {
        let state = if block.opacity < 1.0 { opacity_states.name_for(block.opacity) } else { None };
        operations.extend(block_operations(block, font, state)?);
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let font_id = doc.add_object(Object::Dictionary(font_dictionary(font)));
    let mut fonts = Dictionary::new();
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    if !opacity_states.states.is_empty() {
        resources.set("ExtGState", Object::Dictionary(opacity_states.to_dictionary()));
    }

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set("MediaBox", Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        geometry.width.into(),
        geometry.height.into(),
    ]));
    page.set("Contents", Object::Reference(content_id));
    page.set("Resources", Object::Dictionary(resources));
    let page_id = doc.add_object(Object::Dictionary(page));

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    log::debug!("Rendered {} blocks with {}", plan.block_count(), font.base_font_name());
    Ok(doc)
}

/// Serialize a document to PDF bytes
pub fn serialize(doc: &mut Document) -> Result<Vec<u8>> {
    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
