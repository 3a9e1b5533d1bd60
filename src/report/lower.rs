//! Lowering composed blocks into an engine [`Document`].

use std::collections::BTreeMap;

use crate::model::{CanvasOp, ColumnDef, ColumnWidth, Document, Edges, Node, PageConfig, PageSize};
use crate::style::{Color, Dimension, Style};

use super::blocks::{Block, CheckboxGlyph, KeyValueTable};
use super::compose::ComposedReport;
use super::styles::{StyleToken, TABLE_LAYOUT_NAME};

const PAGE_MARGIN: f64 = 40.0;
const BULLET: &str = "•";

impl ComposedReport {
    /// The engine document: A4 with fixed margins, the language's font on
    /// the root style, every token as a named style and the row-rule table
    /// layout registered by name.
    pub fn to_document(&self) -> Document {
        let styles = self
            .styles
            .iter()
            .map(|(token, style)| (token.name().to_string(), style.clone()))
            .collect();
        let mut table_layouts = BTreeMap::new();
        table_layouts.insert(TABLE_LAYOUT_NAME.to_string(), self.styles.table_layout());

        Document {
            children: self.blocks.iter().map(lower).collect(),
            metadata: self.metadata.clone(),
            default_page: PageConfig {
                size: PageSize::A4,
                margin: Edges::uniform(PAGE_MARGIN),
            },
            default_style: self.styles.default_style(),
            styles,
            table_layouts,
        }
    }
}

fn lower(block: &Block) -> Node {
    match block {
        Block::Columns { columns, style } => {
            let children = columns
                .iter()
                .map(|column| {
                    let style = Style {
                        width: column.width.map(Dimension::Pt),
                        ..Default::default()
                    };
                    Node::view(style, column.blocks.iter().map(lower).collect())
                        .with_refs(&[column.style.name()])
                })
                .collect();
            Node::view(Style::default(), children).with_refs(&[style.name()])
        }
        Block::Panel { style } => Node::view(Style::default(), vec![]).with_refs(&[style.name()]),
        Block::Paragraph { text, style } | Block::SectionHeader { text, style } => {
            Node::text(text, Style::default()).with_refs(&[style.name()])
        }
        Block::KeyValueTable(table) => lower_table(table),
        Block::Checkbox(row) => Node::view(
            Style::default(),
            vec![
                Node::canvas(CheckboxGlyph::SIZE, CheckboxGlyph::SIZE, checkbox_ops(row.glyph))
                    .with_refs(&[StyleToken::Checkbox.name()]),
                Node::text(&row.label, Style::default())
                    .with_refs(&[StyleToken::ChecklistLabel.name()]),
            ],
        )
        .with_refs(&[StyleToken::ChecklistRow.name()]),
        Block::BulletList { items, style } => Node::view(
            Style::default(),
            items
                .iter()
                .map(|item| {
                    Node::view(
                        Style::default(),
                        vec![
                            Node::text(BULLET, Style::default())
                                .with_refs(&[StyleToken::Bullet.name()]),
                            Node::text(item, Style::default()).with_refs(&[style.name()]),
                        ],
                    )
                    .with_refs(&[StyleToken::NoteRow.name()])
                })
                .collect(),
        ),
        Block::Image {
            data_uri,
            width,
            height,
            style,
        } => {
            if data_uri.is_empty() {
                // Keep the slot so the header does not shift.
                let blank = Style {
                    width: Some(Dimension::Pt(*width)),
                    height: Some(height.unwrap_or(*width)),
                    ..Default::default()
                };
                Node::view(blank, vec![]).with_refs(&[style.name()])
            } else {
                Node::image(data_uri.clone(), Some(*width), *height).with_refs(&[style.name()])
            }
        }
        Block::Section {
            blocks,
            keep_together,
        } => {
            let style = Style {
                wrap: keep_together.then_some(false),
                ..Default::default()
            };
            Node::view(style, blocks.iter().map(lower).collect())
                .with_refs(&[StyleToken::Section.name()])
        }
    }
}

fn lower_table(table: &KeyValueTable) -> Node {
    let (label_width, value_width) = table.widths;
    let columns = vec![
        ColumnDef {
            width: ColumnWidth::Fraction(label_width),
        },
        ColumnDef {
            width: ColumnWidth::Fraction(value_width),
        },
    ];
    let rows = table
        .rows
        .iter()
        .map(|row| {
            Node::table_row(vec![
                Node::table_cell(vec![Node::text(&row.label, Style::default())
                    .with_refs(&[StyleToken::TableLabel.name()])]),
                Node::table_cell(vec![Node::text(&row.value, Style::default())
                    .with_refs(&[StyleToken::TableValue.name()])]),
            ])
        })
        .collect();
    Node::table(columns, table.layout.clone(), rows)
}

/// The square outline, then the checkmark strokes if checked.
fn checkbox_ops(glyph: CheckboxGlyph) -> Vec<CanvasOp> {
    let (x, y, w, h) = CheckboxGlyph::SQUARE;
    let mut ops = vec![CanvasOp::Rect {
        x,
        y,
        w,
        h,
        line_width: CheckboxGlyph::SQUARE_LINE_WIDTH,
        color: Color::BLACK,
    }];
    ops.extend(glyph.check_segments().iter().map(|segment| CanvasOp::Line {
        x1: segment.from.0,
        y1: segment.from.1,
        x2: segment.to.0,
        y2: segment.to.1,
        line_width: CheckboxGlyph::CHECK_LINE_WIDTH,
        color: Color::BLACK,
    }));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use crate::normalize::NormalizedImage;
    use crate::report::compose::compose;
    use crate::report::config::ReportConfig;
    use crate::report::i18n::Language;
    use crate::report::snapshot::{ChecklistSnapshot, ChecklistVariant, FormSnapshot};

    fn canvases(node: &Node, out: &mut Vec<Vec<CanvasOp>>) {
        if let NodeKind::Canvas { ops, .. } = &node.kind {
            out.push(ops.clone());
        }
        for child in &node.children {
            canvases(child, out);
        }
    }

    fn document(checked: bool, language: Language) -> Document {
        let config = ReportConfig::full();
        let empty = NormalizedImage::empty();
        compose(
            &FormSnapshot::default(),
            &ChecklistSnapshot::uniform(ChecklistVariant::Full, checked),
            language,
            &empty,
            &empty,
            &config,
        )
        .to_document()
    }

    fn all_canvases(doc: &Document) -> Vec<Vec<CanvasOp>> {
        let mut out = Vec::new();
        for node in &doc.children {
            canvases(node, &mut out);
        }
        out
    }

    #[test]
    fn unchecked_boxes_are_bare_squares() {
        let glyphs = all_canvases(&document(false, Language::English));
        assert_eq!(glyphs.len(), 15);
        for ops in glyphs {
            assert_eq!(
                ops,
                vec![CanvasOp::Rect {
                    x: 0.0,
                    y: 0.0,
                    w: 10.0,
                    h: 10.0,
                    line_width: 1.0,
                    color: Color::BLACK,
                }]
            );
        }
    }

    #[test]
    fn checked_boxes_carry_exact_checkmark() {
        let glyphs = all_canvases(&document(true, Language::English));
        assert_eq!(glyphs.len(), 15);
        for ops in glyphs {
            assert_eq!(ops.len(), 3);
            assert_eq!(
                ops[1],
                CanvasOp::Line {
                    x1: 2.0,
                    y1: 5.0,
                    x2: 4.0,
                    y2: 8.0,
                    line_width: 1.5,
                    color: Color::BLACK,
                }
            );
            assert_eq!(
                ops[2],
                CanvasOp::Line {
                    x1: 4.0,
                    y1: 8.0,
                    x2: 8.0,
                    y2: 2.0,
                    line_width: 1.5,
                    color: Color::BLACK,
                }
            );
        }
    }

    #[test]
    fn font_family_is_set_once_at_the_root() {
        let doc = document(false, Language::Thai);
        assert_eq!(doc.default_style.font_family.as_deref(), Some("Sarabun"));
        assert!(doc.styles.values().all(|s| s.font_family.is_none()));
        fn no_inline_family(node: &Node) -> bool {
            node.style.font_family.is_none() && node.children.iter().all(no_inline_family)
        }
        assert!(doc.children.iter().all(no_inline_family));
    }

    #[test]
    fn every_ref_and_layout_resolves() {
        let doc = document(true, Language::English);
        fn check(node: &Node, doc: &Document) {
            for name in &node.style_refs {
                assert!(doc.styles.contains_key(name), "missing style {}", name);
            }
            if let NodeKind::Table { layout, .. } = &node.kind {
                let layout = layout.as_deref().unwrap_or_default();
                assert!(doc.table_layouts.contains_key(layout));
            }
            for child in &node.children {
                check(child, doc);
            }
        }
        for node in &doc.children {
            check(node, &doc);
        }
    }

    #[test]
    fn paged_sections_are_unbreakable() {
        let doc = document(false, Language::English);
        let sections: Vec<_> = doc
            .children
            .iter()
            .filter(|n| n.style_refs.iter().any(|r| r == "section"))
            .collect();
        assert_eq!(sections.len(), 6);
        assert!(sections.iter().all(|n| !n.is_breakable()));
        assert_eq!(doc.default_page.size, PageSize::A4);
    }
}
