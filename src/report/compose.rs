//! Builds the report's block sequence from the snapshots.
//!
//! Composition is pure: the images are already normalized and the date is
//! resolved from the config, so the same inputs always produce the same
//! blocks (apart from a `Today` date).

use crate::model::Metadata;
use crate::normalize::NormalizedImage;

use super::blocks::{
    apply_table_layout, visit, Block, CheckboxGlyph, CheckboxRow, Column, KeyValueRow,
    KeyValueTable,
};
use super::config::{PageFlow, ReportConfig};
use super::content::{self, Text};
use super::i18n::Language;
use super::snapshot::{ChecklistSnapshot, FormSnapshot};
use super::styles::{StyleTable, StyleToken, TABLE_LAYOUT_NAME};

const LOGO_WIDTH: f64 = 60.0;
const QR_SIZE: f64 = 50.0;

/// Blocks plus everything needed to render them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReport {
    pub blocks: Vec<Block>,
    pub styles: StyleTable,
    pub metadata: Metadata,
    pub language: Language,
}

impl ComposedReport {
    /// Every key/value table in reading order.
    pub fn tables(&self) -> Vec<&KeyValueTable> {
        let mut out = Vec::new();
        visit(&self.blocks, &mut |block| {
            if let Block::KeyValueTable(table) = block {
                out.push(table);
            }
        });
        out
    }

    /// Every checklist row in reading order.
    pub fn checkboxes(&self) -> Vec<&CheckboxRow> {
        let mut out = Vec::new();
        visit(&self.blocks, &mut |block| {
            if let Block::Checkbox(row) = block {
                out.push(row);
            }
        });
        out
    }

    /// Every string that ends up on the page, in reading order.
    pub fn visible_text(&self) -> Vec<&str> {
        let mut out = Vec::new();
        visit(&self.blocks, &mut |block| match block {
            Block::Paragraph { text, .. } | Block::SectionHeader { text, .. } => {
                out.push(text.as_str())
            }
            Block::KeyValueTable(table) => {
                for row in &table.rows {
                    out.push(row.label.as_str());
                    out.push(row.value.as_str());
                }
            }
            Block::Checkbox(row) => out.push(row.label.as_str()),
            Block::BulletList { items, .. } => out.extend(items.iter().map(String::as_str)),
            _ => {}
        });
        out
    }

    /// Section headers in reading order.
    pub fn section_headers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        visit(&self.blocks, &mut |block| {
            if let Block::SectionHeader { text, .. } = block {
                out.push(text.as_str());
            }
        });
        out
    }
}

/// Compose the full report.
pub fn compose(
    snapshot: &FormSnapshot,
    checklist: &ChecklistSnapshot,
    language: Language,
    logo: &NormalizedImage,
    qr: &NormalizedImage,
    config: &ReportConfig,
) -> ComposedReport {
    let keep_together = config.flow == PageFlow::Paged;
    let mut blocks = vec![header(language, logo, qr, config)];

    if config.flow == PageFlow::SingleFlow {
        blocks.push(Block::Panel {
            style: StyleToken::TitleBar,
        });
        blocks.push(Block::Paragraph {
            text: content::TITLE.pick(language).to_string(),
            style: StyleToken::TitleText,
        });
    }

    let mut number = 0;
    let mut heading = |text: &Text| {
        number += 1;
        Block::SectionHeader {
            text: format!("{}. {}", number, text.pick(language)),
            style: StyleToken::SectionHeader,
        }
    };

    blocks.push(Block::Section {
        blocks: vec![
            heading(&content::CUSTOMER_HEADING),
            key_value_table(&content::customer_fields(snapshot), language),
        ],
        keep_together,
    });
    blocks.push(Block::Section {
        blocks: vec![
            heading(&content::PUMP_HEADING),
            key_value_table(&content::pump_fields(snapshot), language),
        ],
        keep_together,
    });
    blocks.push(Block::Section {
        blocks: vec![
            heading(&content::CONDITIONS_HEADING),
            key_value_table(&content::condition_fields(snapshot), language),
            Block::Paragraph {
                text: content::SERVICE_REASON_LABEL.pick(language).to_string(),
                style: StyleToken::FieldLabel,
            },
            Block::Paragraph {
                text: field_value(&snapshot.service_reason),
                style: StyleToken::Paragraph,
            },
        ],
        keep_together,
    });

    for &group in config.variant.groups() {
        let mut section = vec![heading(&content::group_heading(group))];
        section.extend(group.items().iter().map(|&item| {
            Block::Checkbox(CheckboxRow {
                glyph: CheckboxGlyph {
                    checked: checklist.is_checked(item),
                },
                label: content::checklist_label(item, &snapshot.training_hours, language),
            })
        }));
        blocks.push(Block::Section {
            blocks: section,
            keep_together,
        });
    }

    blocks.push(Block::Section {
        blocks: vec![
            Block::SectionHeader {
                text: content::NOTES_HEADING.pick(language).to_string(),
                style: StyleToken::NotesHeading,
            },
            Block::BulletList {
                items: content::notes(config.variant)
                    .iter()
                    .map(|note| note.pick(language).to_string())
                    .collect(),
                style: StyleToken::NoteItem,
            },
        ],
        keep_together,
    });

    apply_table_layout(&mut blocks, TABLE_LAYOUT_NAME);

    let report = ComposedReport {
        blocks,
        styles: StyleTable::for_language(language),
        metadata: metadata(language),
        language,
    };
    log::debug!(
        "composed {} report: {} tables, {} checklist rows",
        language,
        report.tables().len(),
        report.checkboxes().len()
    );
    report
}

fn header(
    language: Language,
    logo: &NormalizedImage,
    qr: &NormalizedImage,
    config: &ReportConfig,
) -> Block {
    let logo_column = Column {
        width: Some(LOGO_WIDTH + 10.0),
        style: StyleToken::LogoColumn,
        blocks: vec![Block::Image {
            data_uri: logo.to_data_uri(),
            width: LOGO_WIDTH,
            height: None,
            style: StyleToken::Logo,
        }],
    };

    let mut identity = vec![Block::Paragraph {
        text: config.company.name.pick(language).clone(),
        style: StyleToken::CompanyName,
    }];
    identity.extend(config.company.address.iter().map(|line| Block::Paragraph {
        text: line.pick(language).clone(),
        style: StyleToken::CompanyAddress,
    }));
    let company_column = Column {
        width: None,
        style: StyleToken::CompanyColumn,
        blocks: identity,
    };

    let meta_line = |label: &Text, value: &str| Block::Paragraph {
        text: format!("{} {}", label.pick(language), value),
        style: StyleToken::MetaLine,
    };
    let meta_column = Column {
        width: Some(150.0),
        style: StyleToken::MetaColumn,
        blocks: vec![
            meta_line(&content::DOC_NUMBER_LABEL, &config.document_number),
            meta_line(&content::REVISION_LABEL, &config.revision),
            meta_line(&content::DATE_LABEL, &config.date.resolve()),
            Block::Image {
                data_uri: qr.to_data_uri(),
                width: QR_SIZE,
                height: Some(QR_SIZE),
                style: StyleToken::Qr,
            },
        ],
    };

    Block::Columns {
        columns: vec![logo_column, company_column, meta_column],
        style: StyleToken::Header,
    }
}

fn key_value_table(fields: &[(Text, &str)], language: Language) -> Block {
    Block::KeyValueTable(KeyValueTable::new(
        fields
            .iter()
            .map(|(label, value)| KeyValueRow {
                label: label.pick(language).to_string(),
                value: field_value(value),
            })
            .collect(),
    ))
}

/// The trimmed value, or the placeholder when there is nothing to show.
fn field_value(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        content::PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

fn metadata(language: Language) -> Metadata {
    Metadata {
        title: Some(content::TITLE.pick(language).to_string()),
        author: Some(content::AUTHOR.to_string()),
        subject: Some(content::SUBJECT.to_string()),
        keywords: Some(content::KEYWORDS.to_string()),
        creator: Some(format!("pump-report {}", env!("CARGO_PKG_VERSION"))),
        lang: Some(language.bcp47().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::config::DatePolicy;
    use crate::report::snapshot::{ChecklistItem, ChecklistVariant};

    fn compose_with(
        snapshot: &FormSnapshot,
        checklist: &ChecklistSnapshot,
        language: Language,
        config: &ReportConfig,
    ) -> ComposedReport {
        let empty = NormalizedImage::empty();
        compose(snapshot, checklist, language, &empty, &empty, config)
    }

    #[test]
    fn empty_form_renders_placeholders() {
        let report = compose_with(
            &FormSnapshot::default(),
            &ChecklistSnapshot::new(),
            Language::English,
            &ReportConfig::pre_service(),
        );
        let tables = report.tables();
        assert_eq!(tables.len(), 3);
        for table in tables {
            assert_eq!(table.rows.len(), 6);
            assert!(table.rows.iter().all(|row| row.value == "-"));
        }
    }

    #[test]
    fn acme_first_rows() {
        let snapshot = FormSnapshot {
            company: "Acme Co".into(),
            ..Default::default()
        };
        let report = compose_with(
            &snapshot,
            &ChecklistSnapshot::new(),
            Language::English,
            &ReportConfig::pre_service(),
        );
        let first = report.tables()[0];
        assert_eq!(first.rows[0].label, "Company:");
        assert_eq!(first.rows[0].value, "Acme Co");
        assert_eq!(first.rows[1].label, "Site Location:");
        assert_eq!(first.rows[1].value, "-");
        assert_eq!(report.checkboxes().len(), 6);
        assert!(report.checkboxes().iter().all(|row| !row.glyph.checked));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let snapshot = FormSnapshot {
            phone: "   ".into(),
            service_reason: "\t".into(),
            ..Default::default()
        };
        let report = compose_with(
            &snapshot,
            &ChecklistSnapshot::new(),
            Language::English,
            &ReportConfig::pre_service(),
        );
        assert_eq!(report.tables()[0].rows[4].value, "-");
        assert!(report.blocks.iter().any(|b| matches!(
            b,
            Block::Section { blocks, .. } if blocks.iter().any(|inner| matches!(
                inner,
                Block::Paragraph { text, style: StyleToken::Paragraph } if text == "-"
            ))
        )));
    }

    #[test]
    fn sections_are_numbered_in_reading_order() {
        let report = compose_with(
            &FormSnapshot::default(),
            &ChecklistSnapshot::new(),
            Language::English,
            &ReportConfig::full(),
        );
        assert_eq!(
            report.section_headers(),
            vec![
                "1. Customer Details",
                "2. Pump Information",
                "3. Operating Conditions",
                "4. Pump Preparation Checklist",
                "5. Pre-Service Checklist",
                "Important Notes",
            ]
        );
        assert_eq!(report.checkboxes().len(), 15);
    }

    #[test]
    fn title_bar_only_in_single_flow() {
        let has_panel = |config: &ReportConfig| {
            compose_with(&FormSnapshot::default(), &ChecklistSnapshot::new(), Language::English, config)
                .blocks
                .iter()
                .any(|b| matches!(b, Block::Panel { .. }))
        };
        assert!(has_panel(&ReportConfig::pre_service()));
        assert!(!has_panel(&ReportConfig::full()));
    }

    #[test]
    fn paged_flow_keeps_sections_together() {
        for (config, expected) in [(ReportConfig::full(), true), (ReportConfig::pre_service(), false)] {
            let report = compose_with(
                &FormSnapshot::default(),
                &ChecklistSnapshot::new(),
                Language::English,
                &config,
            );
            for block in &report.blocks {
                if let Block::Section { keep_together, .. } = block {
                    assert_eq!(*keep_together, expected);
                }
            }
        }
    }

    #[test]
    fn checked_items_carry_checkmarks() {
        let config = ReportConfig::full();
        let checklist = ChecklistSnapshot::uniform(ChecklistVariant::Full, true)
            .with(ChecklistItem::Ppe, false);
        let report = compose_with(&FormSnapshot::default(), &checklist, Language::English, &config);
        let unchecked: Vec<_> = report
            .checkboxes()
            .into_iter()
            .filter(|row| !row.glyph.checked)
            .collect();
        assert_eq!(unchecked.len(), 1);
        assert!(unchecked[0].label.starts_with("Personal protective"));
    }

    #[test]
    fn every_table_gets_the_named_layout() {
        let report = compose_with(
            &FormSnapshot::default(),
            &ChecklistSnapshot::new(),
            Language::Thai,
            &ReportConfig::full(),
        );
        assert!(report
            .tables()
            .iter()
            .all(|t| t.layout.as_deref() == Some(TABLE_LAYOUT_NAME)));
    }

    #[test]
    fn switching_language_changes_every_fixed_string() {
        let config = ReportConfig {
            date: DatePolicy::Fixed("01/03/2024".into()),
            ..ReportConfig::full()
        };
        let snapshot = FormSnapshot {
            training_hours: "8".into(),
            ..Default::default()
        };
        let en = compose_with(&snapshot, &ChecklistSnapshot::new(), Language::English, &config);
        let th = compose_with(&snapshot, &ChecklistSnapshot::new(), Language::Thai, &config);

        let en_text = en.visible_text();
        let th_text = th.visible_text();
        assert_eq!(en_text.len(), th_text.len());
        for (a, b) in en_text.iter().zip(&th_text) {
            // Values and placeholders are language-neutral.
            if *a == "-" {
                assert_eq!(a, b);
            } else {
                assert_ne!(a, b, "'{}' did not change with the language", a);
            }
        }
        assert_eq!(th.metadata.lang.as_deref(), Some("th-TH"));
        assert_eq!(th.metadata.title.as_deref(), Some("รายงานการบริการปั๊ม"));
    }
}
