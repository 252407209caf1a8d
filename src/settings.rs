//! Persisted settings
//!
//! Settings live in a JSON file using the same camelCase keys as the note
//! app's plugin data file. Loading overlays whatever the file contains onto
//! [`Settings::default`], so every field always has a concrete value.
//!
//! This is also the configuration boundary: [`Settings::document_config`]
//! and [`Settings::page_geometry`] reject values the layout engine would
//! otherwise pass straight through to the renderer.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::fonts::StandardFont;
use crate::layout::{
    DocumentConfig, PageGeometry, PageSize, BODY_FONT_SIZE, DEFAULT_WATERMARK_ANGLE, MARGIN,
    WATERMARK_FONT_SIZE,
};

/// Default watermark text
pub const DEFAULT_WATERMARK_TEXT: &str = "Obsidian";

/// Default settings file name, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "pdf-notes.json";

/// User-controlled rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedSettings")]
pub struct Settings {
    pub watermark_text: String,
    /// Degrees; a JSON `null` (what a non-numeric entry saves as) loads as NaN
    pub watermark_angle: f32,
    pub header_text: String,
    pub footer_text: String,
    pub watermark_font_size: f32,
    pub body_font_size: f32,
    pub margin: f32,
    pub page_size: String,
    pub font: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watermark_text: DEFAULT_WATERMARK_TEXT.to_string(),
            watermark_angle: DEFAULT_WATERMARK_ANGLE,
            header_text: String::new(),
            footer_text: String::new(),
            watermark_font_size: WATERMARK_FONT_SIZE,
            body_font_size: BODY_FONT_SIZE,
            margin: MARGIN,
            page_size: PageSize::default().name().to_string(),
            font: StandardFont::default().base_font_name().to_string(),
        }
    }
}

/// Settings as stored on disk: any field may be missing or `null`
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PersistedSettings {
    watermark_text: Option<String>,
    #[serde(deserialize_with = "nullable_angle")]
    watermark_angle: Option<f32>,
    header_text: Option<String>,
    footer_text: Option<String>,
    watermark_font_size: Option<f32>,
    body_font_size: Option<f32>,
    margin: Option<f32>,
    page_size: Option<String>,
    font: Option<String>,
}

/// Missing angle stays `None`; an explicit `null` becomes NaN
fn nullable_angle<'de, D>(deserializer: D) -> std::result::Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN)))
}

impl From<PersistedSettings> for Settings {
    fn from(stored: PersistedSettings) -> Self {
        let defaults = Settings::default();
        Settings {
            watermark_text: stored.watermark_text.unwrap_or(defaults.watermark_text),
            watermark_angle: stored.watermark_angle.unwrap_or(defaults.watermark_angle),
            header_text: stored.header_text.unwrap_or(defaults.header_text),
            footer_text: stored.footer_text.unwrap_or(defaults.footer_text),
            watermark_font_size: stored.watermark_font_size.unwrap_or(defaults.watermark_font_size),
            body_font_size: stored.body_font_size.unwrap_or(defaults.body_font_size),
            margin: stored.margin.unwrap_or(defaults.margin),
            page_size: stored.page_size.unwrap_or(defaults.page_size),
            font: stored.font.unwrap_or(defaults.font),
        }
    }
}

/// Optional replacements for individual settings
///
/// `Some("")` clears a text field; `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub watermark_text: Option<String>,
    pub watermark_angle: Option<f32>,
    pub watermark_font_size: Option<f32>,
    pub body_font_size: Option<f32>,
    pub margin: Option<f32>,
    pub page_size: Option<PageSize>,
    pub font: Option<StandardFont>,
}

impl SettingsOverrides {
    pub fn is_empty(&self) -> bool {
        self.header_text.is_none()
            && self.footer_text.is_none()
            && self.watermark_text.is_none()
            && self.watermark_angle.is_none()
            && self.watermark_font_size.is_none()
            && self.body_font_size.is_none()
            && self.margin.is_none()
            && self.page_size.is_none()
            && self.font.is_none()
    }
}

impl Settings {
    /// Load settings, falling back to defaults for a missing file or field
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let bytes = std::fs::read(path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        // A file holding just `null` means nothing was saved yet
        let settings: Option<Settings> = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Settings(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings.unwrap_or_default())
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Apply overrides on top of these settings
    pub fn apply(&mut self, overrides: SettingsOverrides) {
        if let Some(text) = overrides.header_text {
            self.header_text = text;
        }
        if let Some(text) = overrides.footer_text {
            self.footer_text = text;
        }
        if let Some(text) = overrides.watermark_text {
            self.watermark_text = text;
        }
        if let Some(angle) = overrides.watermark_angle {
            self.watermark_angle = angle;
        }
        if let Some(size) = overrides.watermark_font_size {
            self.watermark_font_size = size;
        }
        if let Some(size) = overrides.body_font_size {
            self.body_font_size = size;
        }
        if let Some(margin) = overrides.margin {
            self.margin = margin;
        }
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size.name().to_string();
        }
        if let Some(font) = overrides.font {
            self.font = font.base_font_name().to_string();
        }
    }

    /// Validated layout configuration
    ///
    /// Empty text fields become `None`. A non-finite angle or a font size
    /// that is not a positive number is rejected here.
    pub fn document_config(&self) -> Result<DocumentConfig> {
        if !self.watermark_angle.is_finite() {
            return Err(Error::invalid_setting(
                "watermarkAngle",
                format!("expected a number of degrees, got {}", self.watermark_angle),
            ));
        }
        check_font_size("watermarkFontSize", self.watermark_font_size)?;
        check_font_size("bodyFontSize", self.body_font_size)?;

        Ok(DocumentConfig {
            header_text: non_empty(&self.header_text),
            footer_text: non_empty(&self.footer_text),
            watermark_text: non_empty(&self.watermark_text),
            watermark_angle: self.watermark_angle,
            watermark_font_size: self.watermark_font_size,
            body_font_size: self.body_font_size,
        })
    }

    /// Page geometry for the configured paper size and margin
    pub fn page_geometry(&self) -> Result<PageGeometry> {
        let geometry = self.page_size()?.geometry(self.margin);
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn page_size(&self) -> Result<PageSize> {
        self.page_size.parse()
    }

    pub fn font(&self) -> Result<StandardFont> {
        self.font.parse()
    }
}

fn check_font_size(name: &'static str, size: f32) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_setting(name, format!("font size must be a positive number, got {}", size)))
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Parse an angle typed by the user
pub fn parse_angle(input: &str) -> Result<f32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_setting("watermarkAngle", "angle is empty"));
    }
    let angle: f32 = trimmed.parse().map_err(|_| {
        Error::invalid_setting("watermarkAngle", format!("'{}' is not a number", trimmed))
    })?;
    if !angle.is_finite() {
        return Err(Error::invalid_setting("watermarkAngle", format!("'{}' is not a finite angle", trimmed)));
    }
    Ok(angle)
}
