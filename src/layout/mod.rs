//! # Page-Aware Layout Engine
//!
//! The page is the unit of layout. Content is never laid out on an infinite
//! canvas and sliced afterwards; it flows into pages:
//!
//! 1. Open a page with known dimensions and remaining space
//! 2. Before placing each node, ask: "does this fit?"
//! 3. If it fits: place it, reduce remaining space
//! 4. If it doesn't fit and is unbreakable: start a new page, place it there
//! 5. If it doesn't fit and is breakable: place what fits (text lines, table
//!    rows), continue the rest on a new page
//!
//! Heights are measured by running the same layout code against a scratch
//! cursor with no bottom edge, so a measured height and a placed height can
//! never disagree.

pub mod page_break;

use std::cell::RefCell;
use std::collections::HashSet;

use crate::font::{FontContext, FontKey};
use crate::image_loader::{load_image, LoadedImage};
use crate::model::*;
use crate::style::*;
use crate::text::{TextLayout, TextMetrics};
use page_break::{decide_break, BreakDecision, PageSpace};

/// A fully laid-out page ready for PDF serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Every text line on the page, in placement order.
    pub fn text_lines(&self) -> Vec<&TextLine> {
        fn walk<'a>(elements: &'a [LayoutElement], out: &mut Vec<&'a TextLine>) {
            for el in elements {
                if let DrawCommand::Text { lines, .. } = &el.draw {
                    out.extend(lines.iter());
                }
                walk(&el.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.elements, &mut out);
        out
    }
}

/// A positioned element on a page.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Absolute position on the page (top-left corner, y down).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The visual properties to draw.
    pub draw: DrawCommand,
    /// Child elements (positioned relative to page, not parent).
    pub children: Vec<LayoutElement>,
    /// Logical node type (e.g. "TextLine", "Image", "Canvas").
    pub node_type: Option<String>,
}

impl LayoutElement {
    fn leaf(x: f64, y: f64, width: f64, height: f64, draw: DrawCommand, node_type: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            draw,
            children: vec![],
            node_type: Some(node_type.to_string()),
        }
    }
}

/// What to actually draw for this element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Nothing to draw (just a layout container).
    None,
    /// Filled background rectangle.
    Rect { background: Color, radius: f64 },
    /// Draw text.
    Text { lines: Vec<TextLine>, color: Color },
    /// Draw an image.
    Image { image_data: LoadedImage },
    /// Draw a grey placeholder rectangle (fallback when image loading fails).
    ImagePlaceholder,
    /// Vector operations in the element's local coordinates.
    Vector { ops: Vec<CanvasOp> },
    /// A stroked rule between two absolute page points.
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        rule: Rule,
    },
}

#[derive(Debug, Clone)]
pub struct TextLine {
    pub x: f64,
    /// Baseline position, measured from the top of the page.
    pub y: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
    /// The font that will actually be used (after fallback).
    pub font: FontKey,
    pub font_size: f64,
}

/// Tracks where we are on the current page during layout.
#[derive(Debug, Clone)]
struct PageCursor {
    config: PageConfig,
    content_x: f64,
    content_y: f64,
    content_width: f64,
    content_height: f64,
    y: f64,
    elements: Vec<LayoutElement>,
    /// Scratch cursors have no bottom edge and never break pages.
    unbounded: bool,
}

impl PageCursor {
    fn new(config: &PageConfig) -> Self {
        let (page_w, page_h) = config.size.dimensions();
        Self {
            config: config.clone(),
            content_x: config.margin.left,
            content_y: config.margin.top,
            content_width: page_w - config.margin.horizontal(),
            content_height: page_h - config.margin.vertical(),
            y: 0.0,
            elements: Vec::new(),
            unbounded: false,
        }
    }

    /// A cursor at the same position with nothing placed and no bottom edge.
    fn scratch(&self) -> Self {
        Self {
            config: self.config.clone(),
            content_x: self.content_x,
            content_y: self.content_y,
            content_width: self.content_width,
            content_height: f64::INFINITY,
            y: self.y,
            elements: Vec::new(),
            unbounded: true,
        }
    }

    fn remaining_height(&self) -> f64 {
        (self.content_height - self.y).max(0.0)
    }

    fn at_page_top(&self) -> bool {
        self.y <= 0.0 && self.elements.is_empty()
    }

    fn space(&self) -> PageSpace {
        PageSpace {
            remaining: self.remaining_height(),
            capacity: self.content_height,
            at_page_top: self.at_page_top(),
        }
    }

    /// Absolute page y of the cursor.
    fn abs_y(&self) -> f64 {
        self.content_y + self.y
    }

    fn finalize(&mut self) -> LayoutPage {
        let (page_w, page_h) = self.config.size.dimensions();
        LayoutPage {
            width: page_w,
            height: page_h,
            elements: std::mem::take(&mut self.elements),
        }
    }

    /// Close the current page and open a fresh one. A no-op on an empty page
    /// or a scratch cursor.
    fn break_page(&mut self, pages: &mut Vec<LayoutPage>) {
        if self.unbounded || self.at_page_top() {
            return;
        }
        pages.push(self.finalize());
        *self = PageCursor::new(&self.config);
    }
}

struct LayoutContext<'a> {
    document: &'a Document,
    fonts: &'a FontContext,
}

/// The main layout engine.
#[derive(Default)]
pub struct LayoutEngine {
    text_layout: TextLayout,
    warned_families: RefCell<HashSet<String>>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main entry point: lay out a document into pages.
    ///
    /// Always returns at least one page, even for an empty document.
    pub fn layout(&self, document: &Document, fonts: &FontContext) -> Vec<LayoutPage> {
        let ctx = LayoutContext { document, fonts };
        let mut pages = Vec::new();
        let mut cursor = PageCursor::new(&document.default_page);
        let root = document.default_style.resolve(None, cursor.content_width);
        let (x, width) = (cursor.content_x, cursor.content_width);

        for node in &document.children {
            self.layout_node(&ctx, node, &mut cursor, &mut pages, x, width, &root);
        }

        if !cursor.elements.is_empty() || pages.is_empty() {
            pages.push(cursor.finalize());
        }
        pages
    }

    /// Named styles in order, then the node's inline style on top.
    fn effective_style(&self, ctx: &LayoutContext<'_>, node: &Node) -> Style {
        let mut style = Style::default();
        for name in &node.style_refs {
            match ctx.document.styles.get(name) {
                Some(named) => style = style.merge(named),
                None => log::warn!("unknown style reference '{}'", name),
            }
        }
        style.merge(&node.style)
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_node(
        &self,
        ctx: &LayoutContext<'_>,
        node: &Node,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        available_width: f64,
        parent: &ResolvedStyle,
    ) {
        let style = self
            .effective_style(ctx, node)
            .resolve(Some(parent), available_width);
        self.layout_resolved(ctx, node, &style, cursor, pages, x, available_width);
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_resolved(
        &self,
        ctx: &LayoutContext<'_>,
        node: &Node,
        style: &ResolvedStyle,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        available_width: f64,
    ) {
        if style.break_before {
            cursor.break_page(pages);
        }

        match &node.kind {
            NodeKind::PageBreak => cursor.break_page(pages),
            NodeKind::Text { content } => {
                self.layout_text(ctx, content, style, cursor, pages, x, available_width)
            }
            NodeKind::Image { src, width, height } => self.layout_image(
                src,
                *width,
                *height,
                style,
                cursor,
                pages,
                x,
                available_width,
            ),
            NodeKind::Canvas { width, height, ops } => {
                self.layout_canvas(*width, *height, ops, style, cursor, pages, x)
            }
            NodeKind::Table { columns, layout } => self.layout_table(
                ctx,
                node,
                style,
                columns,
                layout.as_deref(),
                cursor,
                pages,
                x,
                available_width,
            ),
            NodeKind::View | NodeKind::TableRow | NodeKind::TableCell => {
                self.layout_view(ctx, node, style, cursor, pages, x, available_width)
            }
        }
    }

    /// Move to a new page if an unbreakable block of `height` should not
    /// start here.
    fn keep_together(&self, height: f64, cursor: &mut PageCursor, pages: &mut Vec<LayoutPage>) {
        if cursor.unbounded {
            return;
        }
        if decide_break(cursor.space(), &[height], false, 1, 1) == BreakDecision::MoveToNextPage {
            cursor.break_page(pages);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_view(
        &self,
        ctx: &LayoutContext<'_>,
        node: &Node,
        style: &ResolvedStyle,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        available_width: f64,
    ) {
        let margin = style.margin;
        let padding = style.padding;
        let box_width = style
            .width
            .unwrap_or(available_width - margin.horizontal())
            .max(0.0);

        if !cursor.unbounded && (!style.breakable || style.background_color.is_some()) {
            let mut scratch = cursor.scratch();
            self.layout_view(ctx, node, style, &mut scratch, &mut Vec::new(), x, available_width);
            let height = scratch.y - cursor.y;

            if !style.breakable {
                self.keep_together(height, cursor, pages);
            }
            if let Some(background) = style.background_color {
                cursor.elements.push(LayoutElement::leaf(
                    x + margin.left,
                    cursor.abs_y() + margin.top,
                    box_width,
                    (height - margin.vertical()).max(0.0),
                    DrawCommand::Rect {
                        background,
                        radius: style.border_radius,
                    },
                    "Background",
                ));
            }
        }

        cursor.y += margin.top;
        let box_top = cursor.y;
        cursor.y += padding.top;

        let inner_x = x + margin.left + padding.left;
        let inner_width = (box_width - padding.horizontal()).max(0.0);

        match style.flex_direction {
            FlexDirection::Column => {
                for (i, child) in node.children.iter().enumerate() {
                    if i > 0 {
                        cursor.y += style.gap;
                    }
                    self.layout_node(ctx, child, cursor, pages, inner_x, inner_width, style);
                }
            }
            FlexDirection::Row => {
                self.layout_row(ctx, node, style, cursor, pages, inner_x, inner_width);
            }
        }

        cursor.y += padding.bottom;
        if let Some(height) = style.height {
            cursor.y = cursor.y.max(box_top + height);
        }
        cursor.y += margin.bottom;
    }

    /// Lay children side by side. A row never splits across pages.
    #[allow(clippy::too_many_arguments)]
    fn layout_row(
        &self,
        ctx: &LayoutContext<'_>,
        node: &Node,
        style: &ResolvedStyle,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        width: f64,
    ) {
        let children = &node.children;
        if children.is_empty() {
            return;
        }

        let gaps = style.gap * (children.len() - 1) as f64;
        let free = (width - gaps).max(0.0);

        let mut child_styles: Vec<ResolvedStyle> = children
            .iter()
            .map(|c| self.effective_style(ctx, c).resolve(Some(style), free))
            .collect();
        let fixed: f64 = child_styles
            .iter()
            .filter_map(|s| s.width.map(|w| w + s.margin.horizontal()))
            .sum();
        let auto_count = child_styles.iter().filter(|s| s.width.is_none()).count();
        let auto_width = if auto_count > 0 {
            ((free - fixed) / auto_count as f64).max(0.0)
        } else {
            0.0
        };
        let widths: Vec<f64> = child_styles
            .iter()
            .map(|s| s.width.map(|w| w + s.margin.horizontal()).unwrap_or(auto_width))
            .collect();
        // Widths are settled here; children fill the slot they were given.
        for s in &mut child_styles {
            s.width = None;
        }

        let slots = || {
            let mut slot_x = x;
            widths.iter().map(move |&w| {
                let this = slot_x;
                slot_x += w + style.gap;
                (this, w)
            })
        };

        let mut row_height: f64 = 0.0;
        for ((child, child_style), (slot_x, slot_w)) in children.iter().zip(&child_styles).zip(slots()) {
            let mut scratch = cursor.scratch();
            self.layout_resolved(ctx, child, child_style, &mut scratch, &mut Vec::new(), slot_x, slot_w);
            row_height = row_height.max(scratch.y - cursor.y);
        }

        self.keep_together(row_height, cursor, pages);

        let row_top = cursor.y;
        for ((child, child_style), (slot_x, slot_w)) in children.iter().zip(&child_styles).zip(slots()) {
            let mut overlay = cursor.scratch();
            self.layout_resolved(ctx, child, child_style, &mut overlay, &mut Vec::new(), slot_x, slot_w);
            cursor.elements.append(&mut overlay.elements);
        }
        cursor.y = row_top + row_height;
    }

    fn warn_on_fallback(&self, requested: &str, used: &FontKey) {
        if used.family != requested && self.warned_families.borrow_mut().insert(requested.to_string()) {
            log::warn!(
                "font family '{}' is not registered, falling back to {}",
                requested,
                used.family
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_text(
        &self,
        ctx: &LayoutContext<'_>,
        content: &str,
        style: &ResolvedStyle,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        available_width: f64,
    ) {
        let margin = style.margin;
        let padding = style.padding;
        let text_x = x + margin.left + padding.left;
        let text_width = (style.width.unwrap_or(available_width - margin.horizontal())
            - padding.horizontal())
        .max(0.0);

        cursor.y += margin.top + padding.top;

        let (font, _) = ctx.fonts.resolve(&style.font_family, style.font_weight);
        self.warn_on_fallback(&style.font_family, &font);

        let metrics = TextMetrics {
            family: &style.font_family,
            weight: style.font_weight,
            font_size: style.font_size,
        };
        let lines = self
            .text_layout
            .break_into_lines(ctx.fonts, content, text_width, metrics);
        let line_height = style.font_size * style.line_height;

        let mut forced_break_at = None;
        if !cursor.unbounded {
            let heights = vec![line_height; lines.len()];
            match decide_break(cursor.space(), &heights, style.breakable, 2, 2) {
                BreakDecision::MoveToNextPage => cursor.break_page(pages),
                BreakDecision::Split {
                    items_on_current_page,
                } => forced_break_at = Some(items_on_current_page),
                BreakDecision::Place => {}
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let overflow = !cursor.unbounded && line_height > cursor.remaining_height();
            if i > 0 && (forced_break_at == Some(i) || overflow) {
                cursor.break_page(pages);
            }

            let line_x = match style.text_align {
                TextAlign::Left => text_x,
                TextAlign::Right => text_x + text_width - line.width,
                TextAlign::Center => text_x + (text_width - line.width) / 2.0,
            };
            let top = cursor.abs_y();
            let baseline = top + (line_height - style.font_size) / 2.0 + style.font_size * 0.8;

            cursor.elements.push(LayoutElement::leaf(
                line_x,
                top,
                line.width,
                line_height,
                DrawCommand::Text {
                    lines: vec![TextLine {
                        x: line_x,
                        y: baseline,
                        text: line.text.clone(),
                        width: line.width,
                        height: line_height,
                        font: font.clone(),
                        font_size: style.font_size,
                    }],
                    color: style.color,
                },
                "TextLine",
            ));
            cursor.y += line_height;
        }

        cursor.y += padding.bottom + margin.bottom;
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_image(
        &self,
        src: &str,
        width: Option<f64>,
        height: Option<f64>,
        style: &ResolvedStyle,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        available_width: f64,
    ) {
        if src.is_empty() {
            return;
        }
        let margin = style.margin;
        let max_width = (available_width - margin.horizontal()).max(0.0);

        let loaded = match load_image(src) {
            Ok(img) => Some(img),
            Err(e) => {
                if !cursor.unbounded {
                    log::warn!("image could not be loaded, drawing a placeholder: {}", e);
                }
                None
            }
        };
        let (iw, ih) = loaded
            .as_ref()
            .map(|img| (img.width_px as f64, img.height_px as f64))
            .unwrap_or((100.0, 100.0));

        let (mut w, mut h) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * ih / iw),
            (None, Some(h)) => (h * iw / ih, h),
            (None, None) => (iw, ih),
        };
        if w > max_width && w > 0.0 {
            h *= max_width / w;
            w = max_width;
        }

        cursor.y += margin.top;
        self.keep_together(h, cursor, pages);

        let img_x = match style.text_align {
            TextAlign::Left => x + margin.left,
            TextAlign::Right => x + margin.left + max_width - w,
            TextAlign::Center => x + margin.left + (max_width - w) / 2.0,
        };
        let draw = match loaded {
            Some(image_data) => DrawCommand::Image { image_data },
            None => DrawCommand::ImagePlaceholder,
        };
        cursor
            .elements
            .push(LayoutElement::leaf(img_x, cursor.abs_y(), w, h, draw, "Image"));
        cursor.y += h + margin.bottom;
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_canvas(
        &self,
        width: f64,
        height: f64,
        ops: &[CanvasOp],
        style: &ResolvedStyle,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
    ) {
        cursor.y += style.margin.top;
        self.keep_together(height, cursor, pages);
        cursor.elements.push(LayoutElement::leaf(
            x + style.margin.left,
            cursor.abs_y(),
            width,
            height,
            DrawCommand::Vector { ops: ops.to_vec() },
            "Canvas",
        ));
        cursor.y += height + style.margin.bottom;
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_table(
        &self,
        ctx: &LayoutContext<'_>,
        node: &Node,
        style: &ResolvedStyle,
        columns: &[ColumnDef],
        layout_name: Option<&str>,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        x: f64,
        available_width: f64,
    ) {
        let table_layout = match layout_name {
            Some(name) => match ctx.document.table_layouts.get(name) {
                Some(layout) => layout.clone(),
                None => {
                    log::warn!("unknown table layout '{}', drawing without rules", name);
                    TableLayout::default()
                }
            },
            None => TableLayout::default(),
        };

        let margin = style.margin;
        let table_x = x + margin.left;
        let table_width = style
            .width
            .unwrap_or(available_width - margin.horizontal())
            .max(0.0);
        let column_count = node
            .children
            .iter()
            .map(|row| row.children.len())
            .max()
            .unwrap_or(0);
        let col_widths = resolve_column_widths(columns, table_width, column_count);

        cursor.y += margin.top;

        let row_count = node.children.len();
        for (row_idx, row) in node.children.iter().enumerate() {
            let row_style = self
                .effective_style(ctx, row)
                .resolve(Some(style), table_width);
            let row_height =
                self.measure_table_row(ctx, row, &row_style, &col_widths, &table_layout, cursor, table_x);

            if !cursor.unbounded && row_height > cursor.remaining_height() {
                cursor.break_page(pages);
            }

            let row_top = cursor.y;
            let opens_page = cursor.at_page_top();
            let top_y = cursor.abs_y();

            if let Some(bg) = row_style.background_color {
                cursor.elements.push(LayoutElement::leaf(
                    table_x,
                    top_y,
                    table_width,
                    row_height,
                    DrawCommand::Rect {
                        background: bg,
                        radius: 0.0,
                    },
                    "TableRow",
                ));
            }

            if let Some(rule) = table_layout.horizontal_rule {
                let between_rows = row_idx > 0 && !opens_page;
                let outer_top = table_layout.outer_rules && (row_idx == 0 || opens_page);
                if between_rows || outer_top {
                    cursor.elements.push(rule_element(table_x, top_y, table_x + table_width, top_y, rule));
                }
            }

            self.layout_table_cells(ctx, row, &row_style, &col_widths, &table_layout, cursor, table_x);

            if let Some(rule) = table_layout.vertical_rule {
                let mut edge_x = table_x;
                for (i, w) in col_widths.iter().enumerate() {
                    if i > 0 || table_layout.outer_rules {
                        cursor.elements.push(rule_element(edge_x, top_y, edge_x, top_y + row_height, rule));
                    }
                    edge_x += w;
                }
                if table_layout.outer_rules {
                    cursor.elements.push(rule_element(edge_x, top_y, edge_x, top_y + row_height, rule));
                }
            }

            cursor.y = row_top + row_height;

            if let (Some(rule), true) = (table_layout.horizontal_rule, table_layout.outer_rules) {
                if row_idx + 1 == row_count {
                    let bottom = cursor.abs_y();
                    cursor.elements.push(rule_element(table_x, bottom, table_x + table_width, bottom, rule));
                }
            }
        }

        cursor.y += margin.bottom;
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_table_cells(
        &self,
        ctx: &LayoutContext<'_>,
        row: &Node,
        row_style: &ResolvedStyle,
        col_widths: &[f64],
        table_layout: &TableLayout,
        cursor: &mut PageCursor,
        start_x: f64,
    ) {
        let mut cell_x = start_x;
        for (i, cell) in row.children.iter().enumerate() {
            let col_width = col_widths.get(i).copied().unwrap_or(0.0);
            let cell_style = self
                .effective_style(ctx, cell)
                .resolve(Some(row_style), col_width);
            let pad = add_edges(table_layout.cell_padding, cell_style.padding);

            let mut overlay = cursor.scratch();
            overlay.y += pad.top;
            let inner_width = (col_width - pad.horizontal()).max(0.0);
            for child in &cell.children {
                self.layout_node(
                    ctx,
                    child,
                    &mut overlay,
                    &mut Vec::new(),
                    cell_x + pad.left,
                    inner_width,
                    &cell_style,
                );
            }
            cursor.elements.append(&mut overlay.elements);
            cell_x += col_width;
        }
    }

    /// Height of the tallest cell in a row, padding included.
    #[allow(clippy::too_many_arguments)]
    fn measure_table_row(
        &self,
        ctx: &LayoutContext<'_>,
        row: &Node,
        row_style: &ResolvedStyle,
        col_widths: &[f64],
        table_layout: &TableLayout,
        cursor: &PageCursor,
        start_x: f64,
    ) -> f64 {
        let mut scratch = cursor.scratch();
        let mut tallest: f64 = 0.0;
        let mut cell_x = start_x;
        for (i, cell) in row.children.iter().enumerate() {
            let col_width = col_widths.get(i).copied().unwrap_or(0.0);
            let cell_style = self
                .effective_style(ctx, cell)
                .resolve(Some(row_style), col_width);
            let pad = add_edges(table_layout.cell_padding, cell_style.padding);

            scratch.y = cursor.y;
            for child in &cell.children {
                self.layout_node(
                    ctx,
                    child,
                    &mut scratch,
                    &mut Vec::new(),
                    cell_x + pad.left,
                    (col_width - pad.horizontal()).max(0.0),
                    &cell_style,
                );
            }
            tallest = tallest.max(scratch.y - cursor.y + pad.vertical());
            cell_x += col_width;
        }
        tallest
    }
}

fn rule_element(x1: f64, y1: f64, x2: f64, y2: f64, rule: Rule) -> LayoutElement {
    LayoutElement::leaf(
        x1.min(x2),
        y1.min(y2),
        (x2 - x1).abs(),
        (y2 - y1).abs(),
        DrawCommand::Rule { x1, y1, x2, y2, rule },
        "Rule",
    )
}

fn add_edges(a: Edges, b: Edges) -> Edges {
    Edges::new(a.top + b.top, a.right + b.right, a.bottom + b.bottom, a.left + b.left)
}

/// Resolve column definitions against the table width.
///
/// Fractions and fixed widths are taken as given; Auto columns (and columns
/// without a definition) share what is left equally.
fn resolve_column_widths(columns: &[ColumnDef], table_width: f64, column_count: usize) -> Vec<f64> {
    let count = column_count.max(columns.len());
    if count == 0 {
        return vec![];
    }

    let defs: Vec<Option<&ColumnWidth>> = (0..count).map(|i| columns.get(i).map(|c| &c.width)).collect();
    let used: f64 = defs
        .iter()
        .map(|d| match d {
            Some(ColumnWidth::Fraction(f)) => table_width * f,
            Some(ColumnWidth::Fixed(w)) => *w,
            Some(ColumnWidth::Auto) | None => 0.0,
        })
        .sum();
    let auto_count = defs
        .iter()
        .filter(|d| matches!(d, Some(ColumnWidth::Auto) | None))
        .count();
    let auto_width = if auto_count > 0 {
        ((table_width - used) / auto_count as f64).max(0.0)
    } else {
        0.0
    };

    defs.iter()
        .map(|d| match d {
            Some(ColumnWidth::Fraction(f)) => table_width * f,
            Some(ColumnWidth::Fixed(w)) => *w,
            Some(ColumnWidth::Auto) | None => auto_width,
        })
        .collect()
}
