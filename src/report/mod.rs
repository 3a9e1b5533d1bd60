//! # Report
//!
//! The document composer. A [`FormSnapshot`] and [`ChecklistSnapshot`] are
//! turned into an ordered list of [`Block`]s with style tokens, lowered to
//! an engine [`Document`](crate::model::Document) and rendered.
//!
//! [`generate_document`] is the whole pipeline: fetch and normalize the
//! logo and QR concurrently, compose, render.

pub mod blocks;
pub mod compose;
pub mod config;
pub mod content;
pub mod i18n;
mod lower;
pub mod snapshot;
pub mod styles;

pub use blocks::{Block, CheckboxGlyph, CheckboxRow, KeyValueRow, KeyValueTable};
pub use compose::{compose, ComposedReport};
pub use config::{CompanyIdentity, DatePolicy, PageFlow, ReportConfig};
pub use i18n::{Bilingual, Language};
pub use snapshot::{ChecklistGroup, ChecklistItem, ChecklistSnapshot, ChecklistVariant, FormSnapshot};
pub use styles::{StyleTable, StyleToken};

use base64::Engine as _;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{AssetError, AssetSource};
use crate::error::RenderError;
use crate::font::EngineConfig;
use crate::normalize::{normalize_pair, NormalizedImage};

#[derive(Debug, Error)]
pub enum ReportError {
    /// Only raised when `ReportConfig::strict_assets` is set.
    #[error("could not fetch the {role} image: {source}")]
    Asset {
        role: &'static str,
        #[source]
        source: AssetError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ReportError {
    /// The one message shown to the user, whatever went wrong.
    pub fn user_notice(&self) -> &'static str {
        content::FAILURE_NOTICE
    }
}

/// A finished PDF and the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    bytes: Vec<u8>,
    filename: String,
}

impl GeneratedDocument {
    pub fn new(bytes: Vec<u8>, filename: String) -> Self {
        Self { bytes, filename }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// A self-contained locator for displaying the document.
    pub fn preview_locator(&self) -> String {
        format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Everything one generate request needs, as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRequest {
    pub snapshot: FormSnapshot,
    pub checklist: ChecklistSnapshot,
    pub language: Language,
    pub config: ReportConfig,
}

/// `pump-service-<company>-<yyyymmdd>.pdf`, with the company reduced to a
/// lowercase ASCII slug.
pub fn file_name(company: &str, date: NaiveDate) -> String {
    let mut slug = String::new();
    for c in company.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "report" } else { slug };
    format!("pump-service-{}-{}.pdf", slug, date.format("%Y%m%d"))
}

/// Run one generate request from start to finish.
///
/// Each call fetches its assets again and renders with its own font
/// context; concurrent calls share nothing.
pub async fn generate_document(
    source: &dyn AssetSource,
    snapshot: &FormSnapshot,
    checklist: &ChecklistSnapshot,
    language: Language,
    config: &ReportConfig,
    engine: &EngineConfig,
) -> Result<GeneratedDocument, ReportError> {
    log::info!(
        "generating {} report ({:?}, {:?})",
        language,
        config.variant,
        config.flow
    );
    if language == Language::Thai
        && !engine
            .fonts
            .iter()
            .any(|font| font.family == styles::THAI_FONT_FAMILY)
    {
        log::warn!(
            "Thai report requested but no '{}' font is registered; Thai text will not render",
            styles::THAI_FONT_FAMILY
        );
    }

    let (logo, qr) = normalize_pair(source, &config.logo_url, &config.qr_url).await;
    let logo = settle_asset("logo", logo, config.strict_assets)?;
    let qr = settle_asset("QR", qr, config.strict_assets)?;

    let report = compose(snapshot, checklist, language, &logo, &qr, config);
    let bytes = crate::render(&report.to_document(), engine)?;
    Ok(GeneratedDocument::new(
        bytes,
        file_name(&snapshot.company, Local::now().date_naive()),
    ))
}

fn settle_asset(
    role: &'static str,
    result: Result<NormalizedImage, AssetError>,
    strict: bool,
) -> Result<NormalizedImage, ReportError> {
    match result {
        Ok(image) => Ok(image),
        Err(source) if strict => Err(ReportError::Asset { role, source }),
        Err(e) => {
            log::warn!("{} image unavailable, leaving its slot blank: {}", role, e);
            Ok(NormalizedImage::empty())
        }
    }
}
