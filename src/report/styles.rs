//! Named styles for report blocks.
//!
//! The font family is chosen once per document from the report language and
//! set on the document's root style. Tokens never name a family, so a Thai
//! report can never end up with a Latin face on a single element.

use std::collections::BTreeMap;

use crate::model::{Edges, Rule, TableLayout};
use crate::style::{Color, Dimension, FlexDirection, Style, TextAlign};

use super::i18n::Language;

pub const LATIN_FONT_FAMILY: &str = "Helvetica";
/// Must be registered through `EngineConfig` for Thai glyphs to render.
pub const THAI_FONT_FAMILY: &str = "Sarabun";
/// The rule layout every key/value table uses.
pub const TABLE_LAYOUT_NAME: &str = "rowLines";

const BRAND: &str = "#1f4e79";
const MUTED: &str = "#555555";
const RULE_GRAY: &str = "#cccccc";

pub fn font_family(language: Language) -> &'static str {
    match language {
        Language::English => LATIN_FONT_FAMILY,
        Language::Thai => THAI_FONT_FAMILY,
    }
}

/// A reference to a named style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleToken {
    Header,
    LogoColumn,
    CompanyColumn,
    MetaColumn,
    CompanyName,
    CompanyAddress,
    MetaLine,
    Logo,
    Qr,
    TitleBar,
    TitleText,
    Section,
    SectionHeader,
    TableLabel,
    TableValue,
    FieldLabel,
    Paragraph,
    ChecklistRow,
    Checkbox,
    ChecklistLabel,
    NotesHeading,
    NoteRow,
    Bullet,
    NoteItem,
}

impl StyleToken {
    pub const ALL: [StyleToken; 24] = [
        StyleToken::Header,
        StyleToken::LogoColumn,
        StyleToken::CompanyColumn,
        StyleToken::MetaColumn,
        StyleToken::CompanyName,
        StyleToken::CompanyAddress,
        StyleToken::MetaLine,
        StyleToken::Logo,
        StyleToken::Qr,
        StyleToken::TitleBar,
        StyleToken::TitleText,
        StyleToken::Section,
        StyleToken::SectionHeader,
        StyleToken::TableLabel,
        StyleToken::TableValue,
        StyleToken::FieldLabel,
        StyleToken::Paragraph,
        StyleToken::ChecklistRow,
        StyleToken::Checkbox,
        StyleToken::ChecklistLabel,
        StyleToken::NotesHeading,
        StyleToken::NoteRow,
        StyleToken::Bullet,
        StyleToken::NoteItem,
    ];

    /// The key under which the style is stored in the document.
    pub fn name(self) -> &'static str {
        match self {
            StyleToken::Header => "header",
            StyleToken::LogoColumn => "logoColumn",
            StyleToken::CompanyColumn => "companyColumn",
            StyleToken::MetaColumn => "metaColumn",
            StyleToken::CompanyName => "companyName",
            StyleToken::CompanyAddress => "companyAddress",
            StyleToken::MetaLine => "metaLine",
            StyleToken::Logo => "logo",
            StyleToken::Qr => "qr",
            StyleToken::TitleBar => "titleBar",
            StyleToken::TitleText => "titleText",
            StyleToken::Section => "section",
            StyleToken::SectionHeader => "sectionHeader",
            StyleToken::TableLabel => "tableLabel",
            StyleToken::TableValue => "tableValue",
            StyleToken::FieldLabel => "fieldLabel",
            StyleToken::Paragraph => "paragraph",
            StyleToken::ChecklistRow => "checklistRow",
            StyleToken::Checkbox => "checkbox",
            StyleToken::ChecklistLabel => "checklistLabel",
            StyleToken::NotesHeading => "notesHeading",
            StyleToken::NoteRow => "noteRow",
            StyleToken::Bullet => "bullet",
            StyleToken::NoteItem => "noteItem",
        }
    }

    fn style(self) -> Style {
        let bold = Some(700);
        match self {
            StyleToken::Header => Style {
                flex_direction: Some(FlexDirection::Row),
                gap: Some(10.0),
                margin: Some(Edges::new(0.0, 0.0, 8.0, 0.0)),
                ..Default::default()
            },
            StyleToken::LogoColumn => Style {
                width: Some(Dimension::Pt(70.0)),
                ..Default::default()
            },
            StyleToken::CompanyColumn => Style::default(),
            StyleToken::MetaColumn => Style {
                width: Some(Dimension::Pt(150.0)),
                text_align: Some(TextAlign::Right),
                ..Default::default()
            },
            StyleToken::CompanyName => Style {
                font_size: Some(13.0),
                font_weight: bold,
                color: Some(Color::hex(BRAND)),
                margin: Some(Edges::new(0.0, 0.0, 3.0, 0.0)),
                ..Default::default()
            },
            StyleToken::CompanyAddress => Style {
                font_size: Some(8.0),
                color: Some(Color::hex(MUTED)),
                ..Default::default()
            },
            StyleToken::MetaLine => Style {
                font_size: Some(8.0),
                ..Default::default()
            },
            StyleToken::Logo => Style::default(),
            StyleToken::Qr => Style {
                margin: Some(Edges::new(4.0, 0.0, 0.0, 0.0)),
                ..Default::default()
            },
            StyleToken::TitleBar => Style {
                height: Some(26.0),
                background_color: Some(Color::hex(BRAND)),
                border_radius: Some(4.0),
                margin: Some(Edges::new(6.0, 0.0, 0.0, 0.0)),
                ..Default::default()
            },
            // Pulled up into the bar and centered on it.
            StyleToken::TitleText => Style {
                font_size: Some(14.0),
                font_weight: bold,
                line_height: Some(1.2),
                color: Some(Color::WHITE),
                text_align: Some(TextAlign::Center),
                margin: Some(Edges::new(-21.4, 0.0, 14.6, 0.0)),
                ..Default::default()
            },
            StyleToken::Section => Style {
                margin: Some(Edges::new(0.0, 0.0, 10.0, 0.0)),
                ..Default::default()
            },
            StyleToken::SectionHeader => Style {
                font_size: Some(11.0),
                font_weight: bold,
                color: Some(Color::hex(BRAND)),
                margin: Some(Edges::new(0.0, 0.0, 4.0, 0.0)),
                ..Default::default()
            },
            StyleToken::TableLabel => Style {
                font_weight: bold,
                ..Default::default()
            },
            StyleToken::TableValue => Style::default(),
            StyleToken::FieldLabel => Style {
                font_weight: bold,
                margin: Some(Edges::new(6.0, 0.0, 2.0, 0.0)),
                ..Default::default()
            },
            StyleToken::Paragraph => Style::default(),
            StyleToken::ChecklistRow => Style {
                flex_direction: Some(FlexDirection::Row),
                gap: Some(6.0),
                margin: Some(Edges::new(0.0, 0.0, 4.0, 0.0)),
                ..Default::default()
            },
            // Row children share the width unless they claim one.
            StyleToken::Checkbox => Style {
                width: Some(Dimension::Pt(10.0)),
                margin: Some(Edges::new(1.0, 0.0, 0.0, 0.0)),
                ..Default::default()
            },
            StyleToken::ChecklistLabel => Style::default(),
            StyleToken::NotesHeading => Style {
                font_size: Some(10.0),
                font_weight: bold,
                margin: Some(Edges::new(4.0, 0.0, 4.0, 0.0)),
                ..Default::default()
            },
            StyleToken::NoteRow => Style {
                flex_direction: Some(FlexDirection::Row),
                margin: Some(Edges::new(0.0, 0.0, 2.0, 0.0)),
                ..Default::default()
            },
            StyleToken::Bullet => Style {
                width: Some(Dimension::Pt(10.0)),
                font_size: Some(8.5),
                ..Default::default()
            },
            StyleToken::NoteItem => Style {
                font_size: Some(8.5),
                ..Default::default()
            },
        }
    }
}

/// Every token's style plus the document-wide base, for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    font_family: &'static str,
    line_height: f64,
    tokens: BTreeMap<StyleToken, Style>,
}

impl StyleTable {
    pub fn for_language(language: Language) -> Self {
        Self {
            font_family: font_family(language),
            // Thai stacks vowels and tone marks above and below the line.
            line_height: match language {
                Language::English => 1.3,
                Language::Thai => 1.5,
            },
            tokens: StyleToken::ALL.iter().map(|&t| (t, t.style())).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleToken, &Style)> {
        self.tokens.iter().map(|(t, s)| (*t, s))
    }

    /// Root style every element inherits from.
    pub fn default_style(&self) -> Style {
        Style {
            font_family: Some(self.font_family.to_string()),
            font_size: Some(9.0),
            font_weight: Some(400),
            line_height: Some(self.line_height),
            color: Some(Color::hex("#222222")),
            ..Default::default()
        }
    }

    /// The rule set for key/value tables: light rules between rows only.
    pub fn table_layout(&self) -> TableLayout {
        TableLayout {
            horizontal_rule: Some(Rule {
                width: 0.5,
                color: Color::hex(RULE_GRAY),
            }),
            vertical_rule: None,
            outer_rules: false,
            cell_padding: Edges::symmetric(4.0, 6.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_overrides_the_family() {
        for lang in Language::ALL {
            let table = StyleTable::for_language(lang);
            for (token, style) in table.iter() {
                assert!(style.font_family.is_none(), "{:?} sets a font family", token);
            }
        }
    }

    #[test]
    fn family_follows_language() {
        let th = StyleTable::for_language(Language::Thai);
        assert_eq!(th.default_style().font_family.as_deref(), Some(THAI_FONT_FAMILY));
        let en = StyleTable::for_language(Language::English);
        assert_eq!(en.default_style().font_family.as_deref(), Some(LATIN_FONT_FAMILY));
    }

    #[test]
    fn every_token_is_in_the_table() {
        let table = StyleTable::for_language(Language::English);
        assert_eq!(table.iter().count(), StyleToken::ALL.len());
        let mut names: Vec<_> = StyleToken::ALL.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StyleToken::ALL.len());
    }

    #[test]
    fn rows_have_rules_between_them_only() {
        let layout = StyleTable::for_language(Language::English).table_layout();
        assert!(layout.horizontal_rule.is_some());
        assert!(layout.vertical_rule.is_none());
        assert!(!layout.outer_rules);
    }
}
