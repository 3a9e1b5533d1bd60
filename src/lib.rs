//! # pump-report
//!
//! Bilingual pump-service visit reports: a form snapshot goes in, a
//! paginated, branded PDF comes out.
//!
//! The crate carries its own page-native PDF engine. Pages are the unit of
//! layout: every line break and table row placement is made with the page
//! boundary as a hard constraint, so content flows *into* pages instead of
//! being sliced afterwards.
//!
//! ## Architecture
//!
//! ```text
//!  FormSnapshot + ChecklistSnapshot + Language
//!       ↓
//!   [assets]     fetch logo and QR (concurrently)
//!   [normalize]  bound oversized rasters
//!       ↓
//!   [report]     compose blocks + style table, lower to a Document
//!       ↓
//!   [model]      Document tree: nodes, named styles, table layouts
//!   [style]      merge, cascade, inheritance, defaults
//!   [layout]     page-aware layout engine
//!   [pdf]        serialize to PDF bytes
//!       ↓
//!   [delivery]   download target, scoped preview handle
//! ```

pub mod assets;
pub mod delivery;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod pdf;
pub mod report;
pub mod style;
pub mod text;

pub use error::RenderError;
pub use font::{EngineConfig, FontEntry};

use font::FontContext;
use layout::LayoutEngine;
use model::Document;
use pdf::PdfWriter;

/// Render a document to PDF bytes.
///
/// Fonts listed in `config` are registered into a fresh context for this
/// call only, so concurrent renders never share font state.
pub fn render(document: &Document, config: &EngineConfig) -> Result<Vec<u8>, RenderError> {
    let font_context = FontContext::from_config(config)?;
    let pages = LayoutEngine::new().layout(document, &font_context);
    let bytes = PdfWriter::new().write(&pages, &document.metadata, &font_context)?;
    log::info!("rendered {} page(s), {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}

/// Render a document described as JSON to PDF bytes.
pub fn render_json(json: &str, config: &EngineConfig) -> Result<Vec<u8>, RenderError> {
    let document: Document = serde_json::from_str(json)?;
    render(&document, config)
}
