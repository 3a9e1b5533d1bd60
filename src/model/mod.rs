//! # Document Model
//!
//! The input representation for the rendering engine. A document is a tree of
//! nodes, each with a kind, style properties, and children, plus two named
//! tables the nodes refer into: `styles` (style tokens) and `table_layouts`
//! (reusable table rule sets).
//!
//! The model is serde-friendly so a document can be produced in-process by
//! the report composer or read from JSON.

use std::collections::BTreeMap;

use crate::style::{Color, Style};
use serde::{Deserialize, Serialize};

/// A complete document ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The root nodes of the document, flowed into pages in order.
    pub children: Vec<Node>,

    /// Document metadata (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Page configuration shared by every page.
    #[serde(default)]
    pub default_page: PageConfig,

    /// Root of style inheritance. The only place a document-wide font
    /// family is meant to be set.
    #[serde(default)]
    pub default_style: Style,

    /// Named styles, referenced by `Node::style_refs`.
    #[serde(default)]
    pub styles: BTreeMap<String, Style>,

    /// Named table rule sets, referenced by `NodeKind::Table::layout`.
    #[serde(default)]
    pub table_layouts: BTreeMap<String, TableLayout>,
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    pub creator: Option<String>,
    /// Document language (BCP 47 tag, e.g. "en-US"). Emitted as /Lang in the PDF Catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default)]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Edges::uniform(54.0), // ~0.75 inch
        }
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margin and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A stroked rule used by table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub width: f64,
    pub color: Color,
}

/// A reusable rule set for tables, referenced by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayout {
    /// Rule drawn between rows.
    #[serde(default)]
    pub horizontal_rule: Option<Rule>,
    /// Rule drawn between columns.
    #[serde(default)]
    pub vertical_rule: Option<Rule>,
    /// Whether the rules are also drawn around the outside of the table.
    #[serde(default)]
    pub outer_rules: bool,
    /// Padding applied to every cell.
    #[serde(default)]
    pub cell_padding: Edges,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Named styles from `Document::styles`, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_refs: Vec<String>,

    /// Inline style properties, applied over the named styles.
    #[serde(default)]
    pub style: Style,

    /// Child nodes.
    #[serde(default)]
    pub children: Vec<Node>,

    /// A unique identifier for this node (optional, useful for debugging).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The different kinds of nodes in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// A generic container. Children stack in a column, or sit side by side
    /// when the style's direction is `Row`.
    View,

    /// A text node with string content.
    Text { content: String },

    /// An image node.
    Image {
        /// Base64-encoded image data or a data URI.
        src: String,
        /// Image width in points (optional, will use intrinsic if not set).
        width: Option<f64>,
        /// Image height in points (optional, will use intrinsic if not set).
        height: Option<f64>,
    },

    /// A table container. Children should be TableRow nodes.
    Table {
        /// Column width definitions. If omitted, columns distribute evenly.
        #[serde(default)]
        columns: Vec<ColumnDef>,
        /// Name of a rule set in `Document::table_layouts`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<String>,
    },

    /// A row inside a Table.
    TableRow,

    /// A cell inside a TableRow.
    TableCell,

    /// A fixed-size box of vector drawing operations in local coordinates
    /// (origin top-left, y down).
    Canvas {
        width: f64,
        height: f64,
        ops: Vec<CanvasOp>,
    },

    /// An explicit page break.
    PageBreak,
}

/// A vector drawing operation inside a Canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum CanvasOp {
    /// Stroked rectangle outline.
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        line_width: f64,
        color: Color,
    },
    /// Stroked line segment.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line_width: f64,
        color: Color,
    },
    /// Filled rectangle with rounded corners.
    FilledRoundedRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        color: Color,
    },
}

/// Column definition for tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Width as a fraction (0.0-1.0) of available table width, or fixed points.
    pub width: ColumnWidth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnWidth {
    /// Fraction of available width (0.0-1.0).
    Fraction(f64),
    /// Fixed width in points.
    Fixed(f64),
    /// Distribute remaining space evenly among Auto columns.
    Auto,
}

impl Node {
    fn of_kind(kind: NodeKind, style: Style, children: Vec<Node>) -> Self {
        Self {
            kind,
            style_refs: vec![],
            style,
            children,
            id: None,
        }
    }

    /// Create a View node with children.
    pub fn view(style: Style, children: Vec<Node>) -> Self {
        Self::of_kind(NodeKind::View, style, children)
    }

    /// Create a Text node.
    pub fn text(content: &str, style: Style) -> Self {
        Self::of_kind(
            NodeKind::Text {
                content: content.to_string(),
            },
            style,
            vec![],
        )
    }

    /// Create an Image node.
    pub fn image(src: String, width: Option<f64>, height: Option<f64>) -> Self {
        Self::of_kind(NodeKind::Image { src, width, height }, Style::default(), vec![])
    }

    /// Create a Canvas node.
    pub fn canvas(width: f64, height: f64, ops: Vec<CanvasOp>) -> Self {
        Self::of_kind(NodeKind::Canvas { width, height, ops }, Style::default(), vec![])
    }

    /// Create a Table node from rows.
    pub fn table(columns: Vec<ColumnDef>, layout: Option<String>, rows: Vec<Node>) -> Self {
        Self::of_kind(NodeKind::Table { columns, layout }, Style::default(), rows)
    }

    /// Create a TableRow node from cells.
    pub fn table_row(cells: Vec<Node>) -> Self {
        Self::of_kind(NodeKind::TableRow, Style::default(), cells)
    }

    /// Create a TableCell node.
    pub fn table_cell(children: Vec<Node>) -> Self {
        Self::of_kind(NodeKind::TableCell, Style::default(), children)
    }

    /// Create a PageBreak node.
    pub fn page_break() -> Self {
        Self::of_kind(NodeKind::PageBreak, Style::default(), vec![])
    }

    /// Attach named style references.
    pub fn with_refs(mut self, refs: &[&str]) -> Self {
        self.style_refs = refs.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Is this node breakable across pages?
    pub fn is_breakable(&self) -> bool {
        match &self.kind {
            NodeKind::View | NodeKind::Table { .. } | NodeKind::Text { .. } => {
                self.style.wrap.unwrap_or(true)
            }
            NodeKind::TableRow | NodeKind::TableCell => true,
            NodeKind::Image { .. } | NodeKind::Canvas { .. } | NodeKind::PageBreak => false,
        }
    }
}
