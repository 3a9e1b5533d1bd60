//! # Font Management
//!
//! Helvetica (regular and bold) is always available as a standard PDF font
//! and needs no embedding. Any other family is a TrueType font handed in
//! through [`EngineConfig`] and embedded by the PDF writer.
//!
//! Registration happens per render call into a fresh [`FontContext`]; there
//! is no process-wide font state.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Engine configuration passed explicitly into every render call.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// TrueType families to register before layout.
    pub fonts: Vec<FontEntry>,
}

impl EngineConfig {
    /// Register one more font face.
    pub fn with_font(mut self, entry: FontEntry) -> Self {
        self.fonts.push(entry);
        self
    }
}

/// A custom font to register with the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    /// Font family name (e.g. "Sarabun").
    pub family: String,
    /// Raw TTF bytes.
    #[serde(skip)]
    pub data: Arc<Vec<u8>>,
    /// Font weight (100-900). Defaults to 400.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    400
}

impl FontEntry {
    pub fn new(family: &str, weight: u32, data: Vec<u8>) -> Self {
        Self {
            family: family.to_string(),
            data: Arc::new(data),
            weight,
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
}

impl FontKey {
    /// Build a key with the weight snapped to regular (400) or bold (700).
    pub fn snapped(family: &str, weight: u32) -> Self {
        Self {
            family: family.to_string(),
            weight: if weight >= 600 { 700 } else { 400 },
        }
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// Helvetica or Helvetica-Bold. No embedding needed.
    Standard { bold: bool },
    /// A TrueType font that needs to be embedded.
    Custom {
        data: Arc<Vec<u8>>,
        metrics: CustomFontMetrics,
    },
}

impl FontData {
    /// The PDF base font name for a standard face.
    pub fn standard_name(bold: bool) -> &'static str {
        if bold {
            "Helvetica-Bold"
        } else {
            "Helvetica"
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    /// Maps characters to their glyph IDs in the font.
    pub glyph_ids: HashMap<char, u16>,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Result<Self, ttf_parser::FaceParsingError> {
        let face = ttf_parser::Face::parse(data, 0)?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    glyph_ids.insert(ch, glyph_id.0);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            glyph_ids,
        })
    }
}

static HELVETICA: FontData = FontData::Standard { bold: false };
static HELVETICA_BOLD: FontData = FontData::Standard { bold: true };

/// A font registry that maps font family + weight to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(FontKey::snapped("Helvetica", 400), FontData::Standard { bold: false });
        fonts.insert(FontKey::snapped("Helvetica", 700), FontData::Standard { bold: true });
        Self { fonts }
    }

    /// Look up a font, trying the other weight of the same family before
    /// falling back to Helvetica.
    pub fn resolve(&self, family: &str, weight: u32) -> (FontKey, &FontData) {
        let key = FontKey::snapped(family, weight);
        if let Some(font) = self.fonts.get(&key) {
            return (key, font);
        }

        let other = FontKey::snapped(family, if key.weight == 700 { 400 } else { 700 });
        if let Some(font) = self.fonts.get(&other) {
            return (other, font);
        }

        let fallback = FontKey::snapped("Helvetica", key.weight);
        match self.fonts.get(&fallback) {
            Some(font) => (fallback, font),
            None if fallback.weight == 700 => (fallback, &HELVETICA_BOLD),
            None => (fallback, &HELVETICA),
        }
    }

    /// Register a custom font.
    pub fn register(&mut self, entry: &FontEntry) -> Result<(), RenderError> {
        let metrics = CustomFontMetrics::from_font_data(&entry.data).map_err(|e| {
            RenderError::Font(format!("failed to parse TTF data for '{}': {}", entry.family, e))
        })?;
        self.fonts.insert(
            FontKey::snapped(&entry.family, entry.weight),
            FontData::Custom {
                data: Arc::clone(&entry.data),
                metrics,
            },
        );
        Ok(())
    }
}

/// Shared font context used by layout and PDF serialization.
/// Provides text measurement with real glyph metrics.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Build a context with every font in `config` registered.
    pub fn from_config(config: &EngineConfig) -> Result<Self, RenderError> {
        let mut ctx = Self::new();
        for entry in &config.fonts {
            ctx.registry.register(entry)?;
            log::debug!("registered font {} ({})", entry.family, entry.weight);
        }
        Ok(ctx)
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, family: &str, weight: u32, font_size: f64) -> f64 {
        match self.registry.resolve(family, weight).1 {
            FontData::Standard { bold } => {
                StandardFontMetrics::helvetica(*bold).char_width(ch, font_size)
            }
            FontData::Custom { metrics, .. } => metrics.char_width(ch, font_size),
        }
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, family: &str, weight: u32, font_size: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width(ch, family, weight, font_size))
            .sum()
    }

    /// Resolve a family/weight to the key and data that will actually be used.
    pub fn resolve(&self, family: &str, weight: u32) -> (FontKey, &FontData) {
        self.registry.resolve(family, weight)
    }
}
