//! The composer's output vocabulary.
//!
//! Blocks carry content and a style token, never inline styling. Their
//! order is the reading order of the report.

use super::styles::StyleToken;

/// One renderable unit of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Side-by-side columns (the header).
    Columns { columns: Vec<Column>, style: StyleToken },
    /// A filled decorative bar; text placed after it can overlay it.
    Panel { style: StyleToken },
    Paragraph { text: String, style: StyleToken },
    SectionHeader { text: String, style: StyleToken },
    KeyValueTable(KeyValueTable),
    Checkbox(CheckboxRow),
    BulletList { items: Vec<String>, style: StyleToken },
    /// An embedded image. An empty `data_uri` leaves a blank slot.
    Image {
        data_uri: String,
        width: f64,
        height: Option<f64>,
        style: StyleToken,
    },
    /// A group of blocks. `keep_together` is the hint that the group should
    /// not be split across pages when it fits on one.
    Section { blocks: Vec<Block>, keep_together: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Fixed width in points; `None` takes the remaining space.
    pub width: Option<f64>,
    pub style: StyleToken,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueTable {
    pub rows: Vec<KeyValueRow>,
    /// Label and value column fractions.
    pub widths: (f64, f64),
    /// Named rule layout, stamped on by [`apply_table_layout`].
    pub layout: Option<String>,
}

impl KeyValueTable {
    pub const LABEL_FRACTION: f64 = 0.3;
    pub const VALUE_FRACTION: f64 = 0.7;

    pub fn new(rows: Vec<KeyValueRow>) -> Self {
        Self {
            rows,
            widths: (Self::LABEL_FRACTION, Self::VALUE_FRACTION),
            layout: None,
        }
    }
}

/// A straight stroke between two points, in glyph-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// The drawn checkbox: a square outline, plus a two-stroke checkmark when
/// checked. Coordinates are local, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckboxGlyph {
    pub checked: bool,
}

impl CheckboxGlyph {
    pub const SIZE: f64 = 10.0;
    pub const SQUARE: (f64, f64, f64, f64) = (0.0, 0.0, 10.0, 10.0);
    pub const SQUARE_LINE_WIDTH: f64 = 1.0;
    pub const CHECK_LINE_WIDTH: f64 = 1.5;
    pub const CHECK: [Segment; 2] = [
        Segment {
            from: (2.0, 5.0),
            to: (4.0, 8.0),
        },
        Segment {
            from: (4.0, 8.0),
            to: (8.0, 2.0),
        },
    ];

    /// Checkmark strokes; none when unchecked.
    pub fn check_segments(&self) -> &'static [Segment] {
        if self.checked {
            &Self::CHECK
        } else {
            &[]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxRow {
    pub glyph: CheckboxGlyph,
    pub label: String,
}

/// Visit every block depth-first, containers before their children.
pub fn visit<'a>(blocks: &'a [Block], f: &mut impl FnMut(&'a Block)) {
    for block in blocks {
        f(block);
        match block {
            Block::Columns { columns, .. } => {
                for column in columns {
                    visit(&column.blocks, &mut *f);
                }
            }
            Block::Section { blocks, .. } => visit(blocks, &mut *f),
            _ => {}
        }
    }
}

/// Stamp the named rule layout on every key/value table, however deeply
/// nested.
pub fn apply_table_layout(blocks: &mut [Block], name: &str) {
    for block in blocks {
        match block {
            Block::KeyValueTable(table) => table.layout = Some(name.to_string()),
            Block::Columns { columns, .. } => {
                for column in columns {
                    apply_table_layout(&mut column.blocks, name);
                }
            }
            Block::Section { blocks, .. } => apply_table_layout(blocks, name),
            _ => {}
        }
    }
}
