//! Per-report settings: which checklist, which page flow, fixed header
//! values and where the assets live.

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::content;
use super::i18n::Bilingual;
use super::snapshot::ChecklistVariant;

/// How content is distributed over pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageFlow {
    /// One free-flowing document with a title bar under the header.
    #[default]
    SingleFlow,
    /// Every section is kept on one page when it fits.
    Paged,
}

/// Where the header date comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// A literal date printed as given.
    Fixed(String),
    /// The local date at composition time, `dd/mm/yyyy`.
    Today,
}

impl DatePolicy {
    pub fn resolve(&self) -> String {
        match self {
            DatePolicy::Fixed(date) => date.clone(),
            DatePolicy::Today => Local::now().format("%d/%m/%Y").to_string(),
        }
    }
}

/// Name and address block printed in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub name: Bilingual<String>,
    pub address: Vec<Bilingual<String>>,
}

impl Default for CompanyIdentity {
    fn default() -> Self {
        Self {
            name: content::COMPANY_NAME.to_owned_text(),
            address: content::COMPANY_ADDRESS
                .iter()
                .map(|line| line.to_owned_text())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub variant: ChecklistVariant,
    pub flow: PageFlow,
    pub date: DatePolicy,
    pub document_number: String,
    pub revision: String,
    pub company: CompanyIdentity,
    pub logo_url: String,
    pub qr_url: String,
    /// Abort generation when an asset cannot be fetched instead of leaving
    /// its slot blank.
    pub strict_assets: bool,
}

impl ReportConfig {
    /// Pre-service form: six items, one flowing page, fixed date.
    pub fn pre_service() -> Self {
        Self {
            variant: ChecklistVariant::PreServiceOnly,
            flow: PageFlow::SingleFlow,
            date: DatePolicy::Fixed("01/03/2024".to_string()),
            document_number: "SPS-FM-SV-01".to_string(),
            revision: "00".to_string(),
            company: CompanyIdentity::default(),
            logo_url: "assets/logo.png".to_string(),
            qr_url: "assets/qr.png".to_string(),
            strict_assets: false,
        }
    }

    /// Full form: preparation and pre-service items, paged sections, today's date.
    pub fn full() -> Self {
        Self {
            variant: ChecklistVariant::Full,
            flow: PageFlow::Paged,
            date: DatePolicy::Today,
            document_number: "SPS-FM-SV-02".to_string(),
            ..Self::pre_service()
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::pre_service()
    }
}
