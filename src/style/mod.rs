//! # Style System
//!
//! A CSS-like style model for document nodes. This is a subset of CSS covering
//! what a form report needs: box model, a row/column direction, typography,
//! color, rounded fills and page behavior.
//!
//! Styles can be declared inline on a node or referenced by name from the
//! document's style table. Named styles are merged in order, the inline style
//! wins last, and everything else inherits from the parent.

use crate::model::Edges;
use serde::{Deserialize, Serialize};

/// The complete set of style properties for a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // ── Box Model ──────────────────────────────────────────────
    /// Explicit width.
    pub width: Option<Dimension>,
    /// Explicit height in points.
    pub height: Option<f64>,
    /// Padding inside the box.
    pub padding: Option<Edges>,
    /// Margin outside the box. Negative top margins pull the node upward.
    pub margin: Option<Edges>,

    // ── Direction ──────────────────────────────────────────────
    /// Whether children stack vertically (default) or sit side by side.
    pub flex_direction: Option<FlexDirection>,
    /// Gap between children along the main axis.
    pub gap: Option<f64>,

    // ── Typography ─────────────────────────────────────────────
    /// Font family name.
    pub font_family: Option<String>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Font weight (100-900).
    pub font_weight: Option<u32>,
    /// Line height as a multiplier of font size.
    pub line_height: Option<f64>,
    /// Text alignment within the text block.
    pub text_align: Option<TextAlign>,

    // ── Color & Background ─────────────────────────────────────
    /// Text color.
    pub color: Option<Color>,
    /// Background fill.
    pub background_color: Option<Color>,
    /// Corner radius for the background fill.
    pub border_radius: Option<f64>,

    // ── Page Behavior ──────────────────────────────────────────
    /// Whether this node can be broken across pages.
    /// `false` = keep on one page; if it doesn't fit, move to next page.
    pub wrap: Option<bool>,
    /// Force a page break before this node.
    pub break_before: Option<bool>,
}

/// A dimension that can be points, percentage, or auto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// Fixed size in points (1/72 inch).
    Pt(f64),
    /// Percentage of parent's corresponding dimension.
    Percent(f64),
    /// Size determined by the parent.
    Auto,
}

impl Dimension {
    /// Resolve this dimension given a parent size.
    /// Returns None for Auto.
    pub fn resolve(&self, parent_size: f64) -> Option<f64> {
        match self {
            Dimension::Pt(v) => Some(*v),
            Dimension::Percent(p) => Some(parent_size * p / 100.0),
            Dimension::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum FlexDirection {
    #[default]
    Column,
    Row,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Resolved style: all values are concrete.
/// This is what the layout engine works with after style resolution.
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Edges,
    pub margin: Edges,

    pub flex_direction: FlexDirection,
    pub gap: f64,

    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u32,
    pub line_height: f64,
    pub text_align: TextAlign,

    pub color: Color,
    pub background_color: Option<Color>,
    pub border_radius: f64,

    pub breakable: bool,
    pub break_before: bool,
}

impl Style {
    /// Overlay `other` on top of `self`: every property `other` sets wins.
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            padding: other.padding.or(self.padding),
            margin: other.margin.or(self.margin),
            flex_direction: other.flex_direction.or(self.flex_direction),
            gap: other.gap.or(self.gap),
            font_family: other.font_family.clone().or_else(|| self.font_family.clone()),
            font_size: other.font_size.or(self.font_size),
            font_weight: other.font_weight.or(self.font_weight),
            line_height: other.line_height.or(self.line_height),
            text_align: other.text_align.or(self.text_align),
            color: other.color.or(self.color),
            background_color: other.background_color.or(self.background_color),
            border_radius: other.border_radius.or(self.border_radius),
            wrap: other.wrap.or(self.wrap),
            break_before: other.break_before.or(self.break_before),
        }
    }

    /// Resolve this style against a parent's resolved style and available width.
    ///
    /// Typography and color inherit; box model and page behavior do not.
    pub fn resolve(&self, parent: Option<&ResolvedStyle>, available_width: f64) -> ResolvedStyle {
        let parent_font_family = parent
            .map(|p| p.font_family.clone())
            .unwrap_or_else(|| "Helvetica".to_string());

        ResolvedStyle {
            width: self.width.and_then(|d| d.resolve(available_width)),
            height: self.height,
            padding: self.padding.unwrap_or_default(),
            margin: self.margin.unwrap_or_default(),

            flex_direction: self.flex_direction.unwrap_or_default(),
            gap: self.gap.unwrap_or(0.0),

            font_family: self.font_family.clone().unwrap_or(parent_font_family),
            font_size: self
                .font_size
                .unwrap_or(parent.map(|p| p.font_size).unwrap_or(12.0)),
            font_weight: self
                .font_weight
                .unwrap_or(parent.map(|p| p.font_weight).unwrap_or(400)),
            line_height: self
                .line_height
                .unwrap_or(parent.map(|p| p.line_height).unwrap_or(1.4)),
            text_align: self
                .text_align
                .unwrap_or(parent.map(|p| p.text_align).unwrap_or_default()),

            color: self
                .color
                .unwrap_or(parent.map(|p| p.color).unwrap_or(Color::BLACK)),
            background_color: self.background_color,
            border_radius: self.border_radius.unwrap_or(0.0),

            breakable: self.wrap.unwrap_or(true),
            break_before: self.break_before.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_overlay() {
        let base = Style {
            font_size: Some(10.0),
            font_weight: Some(400),
            ..Default::default()
        };
        let overlay = Style {
            font_weight: Some(700),
            ..Default::default()
        };
        let merged = base.merge(&overlay);
        assert_eq!(merged.font_size, Some(10.0));
        assert_eq!(merged.font_weight, Some(700));
    }

    #[test]
    fn typography_inherits_box_model_does_not() {
        let parent = Style {
            font_family: Some("Sarabun".to_string()),
            font_size: Some(9.0),
            padding: Some(Edges::uniform(4.0)),
            ..Default::default()
        }
        .resolve(None, 500.0);

        let child = Style::default().resolve(Some(&parent), 500.0);
        assert_eq!(child.font_family, "Sarabun");
        assert_eq!(child.font_size, 9.0);
        assert_eq!(child.padding.top, 0.0);
    }

    #[test]
    fn percent_width_resolves_against_available() {
        let s = Style {
            width: Some(Dimension::Percent(30.0)),
            ..Default::default()
        }
        .resolve(None, 400.0);
        assert_eq!(s.width, Some(120.0));
    }

    #[test]
    fn hex_colors() {
        let c = Color::hex("#ccc");
        assert!((c.r - 0.8).abs() < 0.001);
        let c = Color::hex("1f4e79");
        assert!((c.b - 121.0 / 255.0).abs() < 0.001);
    }
}
