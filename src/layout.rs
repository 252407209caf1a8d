//! Page layout calculations
//!
//! Turns a [`DocumentConfig`], the note body and a [`PageGeometry`] into a
//! [`RenderPlan`]: the ordered list of text blocks to paint on one page.
//! Nothing here draws or touches the filesystem.
//!
//! The coordinate system has its origin at the bottom-left of the page and
//! is measured in points (1/72 inch).

use crate::error::{Error, Result};
use crate::fonts::FontMetrics;

/// Margin on all four sides, in points
pub const MARGIN: f32 = 50.0;
/// Font size used for header, footer and body text
pub const BODY_FONT_SIZE: f32 = 12.0;
/// Space reserved between the header line and the first body line
pub const HEADER_BODY_GAP: f32 = 10.0;
/// Body leading as a multiple of the font size
pub const LINE_HEIGHT_RATIO: f32 = 1.2;
/// Watermark font size
pub const WATERMARK_FONT_SIZE: f32 = 70.0;
/// Watermark fill colour (light gray)
pub const WATERMARK_COLOR: Rgb = Rgb { r: 0.9, g: 0.9, b: 0.9 };
/// Watermark opacity
pub const WATERMARK_OPACITY: f32 = 0.5;
/// Default watermark angle in degrees (diagonal, bottom-left to top-right)
pub const DEFAULT_WATERMARK_ANGLE: f32 = -45.0;

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Paper size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// US Letter (8.5" × 11")
    #[default]
    Letter,
    /// A4 (210mm × 297mm)
    A4,
    /// US Legal (8.5" × 14")
    Legal,
}

impl PageSize {
    /// Width and height of the sheet
    pub fn dimensions(&self) -> (Length, Length) {
        match self {
            PageSize::Letter => (Length::from_inches(8.5), Length::from_inches(11.0)),
            PageSize::A4 => (Length::from_mm(210.0), Length::from_mm(297.0)),
            PageSize::Legal => (Length::from_inches(8.5), Length::from_inches(14.0)),
        }
    }

    /// Width and height in points
    pub fn size_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions();
        (w.pt() as f32, h.pt() as f32)
    }

    /// Geometry for this sheet with a uniform margin
    pub fn geometry(&self, margin: f32) -> PageGeometry {
        let (width, height) = self.size_pt();
        PageGeometry::new(width, height, margin)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageSize::Letter => "letter",
            PageSize::A4 => "a4",
            PageSize::Legal => "legal",
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" | "us-letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            "legal" | "us-legal" => Ok(PageSize::Legal),
            other => Err(Error::invalid_setting(
                "pageSize",
                format!("unknown page size '{}' (expected letter, a4 or legal)", other),
            )),
        }
    }
}

/// Physical page canvas: size and a uniform margin, in points
///
/// The layout engine trusts these numbers. Call [`PageGeometry::validate`]
/// where the values come in; the engine never clamps, so a margin larger
/// than half the page simply yields negative or crossed origins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub const fn new(width: f32, height: f32, margin: f32) -> Self {
        Self { width, height, margin }
    }

    /// Check that the page is positive and the margin leaves a content area
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite() && self.margin.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "non-finite dimensions {}x{} margin {}",
                self.width, self.height, self.margin
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "page must be larger than zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.margin < 0.0 {
            return Err(Error::InvalidGeometry(format!("negative margin {}", self.margin)));
        }
        if self.margin >= self.width.min(self.height) / 2.0 {
            return Err(Error::InvalidGeometry(format!(
                "margin {} leaves no content area on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width available to body text between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageSize::Letter.geometry(MARGIN)
    }
}

/// A point on the page, in points from the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// RGB colour with components on a 0–1 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    pub const fn gray(level: f32) -> Self {
        Rgb { r: level, g: level, b: level }
    }
}

/// Counter-clockwise rotation in degrees, applied about a block's origin
///
/// The raw value is kept as given (including NaN); [`Rotation::normalized`]
/// folds it into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation(pub f32);

impl Rotation {
    pub const NONE: Rotation = Rotation(0.0);

    pub fn degrees(&self) -> f32 {
        self.0
    }

    pub fn normalized(&self) -> f32 {
        self.0.rem_euclid(360.0)
    }

    pub fn radians(&self) -> f32 {
        self.0.to_radians()
    }

    /// True for multiples of a full turn
    pub fn is_none(&self) -> bool {
        self.normalized() == 0.0
    }
}

/// A single positioned, styled, orientable unit of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub font_size: f32,
    /// Baseline origin of the first line
    pub origin: Point,
    /// Wrap width handed to the renderer
    pub max_width: Option<f32>,
    /// Distance between successive baselines
    pub line_height: Option<f32>,
    pub color: Rgb,
    pub opacity: f32,
    pub rotation: Rotation,
}

impl TextBlock {
    /// Black, opaque, unrotated text at `origin`
    fn plain(content: &str, font_size: f32, origin: Point) -> Self {
        Self {
            content: content.to_string(),
            font_size,
            origin,
            max_width: None,
            line_height: None,
            color: Rgb::BLACK,
            opacity: 1.0,
            rotation: Rotation::NONE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Rendering options for one document
///
/// Text fields are `None` when the block should be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub watermark_text: Option<String>,
    /// Watermark rotation in degrees, passed through unvalidated
    pub watermark_angle: f32,
    pub watermark_font_size: f32,
    pub body_font_size: f32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            header_text: None,
            footer_text: None,
            watermark_text: None,
            watermark_angle: DEFAULT_WATERMARK_ANGLE,
            watermark_font_size: WATERMARK_FONT_SIZE,
            body_font_size: BODY_FONT_SIZE,
        }
    }
}

/// Ordered text blocks for one page: header, footer, body, watermark
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPlan {
    pub blocks: Vec<TextBlock>,
}

impl RenderPlan {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextBlock> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a RenderPlan {
    type Item = &'a TextBlock;
    type IntoIter = std::slice::Iter<'a, TextBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Text of an optional field; an empty string counts as absent
fn present(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

/// Header line in the top margin band, or `None` without header text
pub fn compute_header(config: &DocumentConfig, geometry: &PageGeometry) -> Option<TextBlock> {
    let text = present(&config.header_text)?;
    let origin = Point {
        x: geometry.margin,
        y: geometry.height - geometry.margin / 2.0,
    };
    Some(TextBlock::plain(text, config.body_font_size, origin))
}

/// Footer line in the bottom margin band, or `None` without footer text
pub fn compute_footer(config: &DocumentConfig, geometry: &PageGeometry) -> Option<TextBlock> {
    let text = present(&config.footer_text)?;
    let origin = Point {
        x: geometry.margin,
        y: geometry.margin / 2.0,
    };
    Some(TextBlock::plain(text, config.body_font_size, origin))
}

/// Body text bounded by the left/right margins
///
/// The first baseline drops by one line plus [`HEADER_BODY_GAP`] when a
/// header is present. Always returns a block, even for empty content.
pub fn compute_body(
    content: &str,
    config: &DocumentConfig,
    geometry: &PageGeometry,
    header_present: bool,
) -> TextBlock {
    let font_size = config.body_font_size;
    let header_offset = if header_present { font_size + HEADER_BODY_GAP } else { 0.0 };
    let origin = Point {
        x: geometry.margin,
        y: geometry.height - geometry.margin - header_offset,
    };

    TextBlock {
        max_width: Some(geometry.content_width()),
        line_height: Some(font_size * LINE_HEIGHT_RATIO),
        ..TextBlock::plain(content, font_size, origin)
    }
}

/// Watermark centred on the page, or `None` without watermark text
///
/// Centring uses the un-rotated bounding box; the rotation is then applied
/// about that origin, so angles other than 0 are not visually centred.
pub fn compute_watermark<F: FontMetrics + ?Sized>(
    config: &DocumentConfig,
    font: &F,
    geometry: &PageGeometry,
) -> Option<TextBlock> {
    let text = present(&config.watermark_text)?;
    let size = config.watermark_font_size;
    let text_width = font.measure_width(text, size);
    let text_height = font.measure_height(size);

    Some(TextBlock {
        content: text.to_string(),
        font_size: size,
        origin: Point {
            x: geometry.width / 2.0 - text_width / 2.0,
            y: geometry.height / 2.0 - text_height / 2.0,
        },
        max_width: None,
        line_height: None,
        color: WATERMARK_COLOR,
        opacity: WATERMARK_OPACITY,
        rotation: Rotation(config.watermark_angle),
    })
}

/// Lay out one page: `[header?, footer?, body, watermark?]`
///
/// Pure function of its inputs. Blocks are placed independently apart from
/// the header/body gap; no collision detection is done.
pub fn layout_document<F: FontMetrics + ?Sized>(
    config: &DocumentConfig,
    content: &str,
    geometry: &PageGeometry,
    font: &F,
) -> RenderPlan {
    let header = compute_header(config, geometry);
    let footer = compute_footer(config, geometry);
    let body = compute_body(content, config, geometry, header.is_some());
    let watermark = compute_watermark(config, font, geometry);

    let blocks: Vec<TextBlock> = [header, footer, Some(body), watermark]
        .into_iter()
        .flatten()
        .collect();

    log::debug!(
        "Laid out {} blocks on {}x{} page (margin {})",
        blocks.len(),
        geometry.width,
        geometry.height,
        geometry.margin
    );

    RenderPlan { blocks }
}
