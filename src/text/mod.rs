//! # Text Layout
//!
//! Line breaking and text measurement.
//!
//! Break opportunities come from UAX#14. Scripts written without spaces
//! (Thai among them) expose few opportunities, so a word that is wider than
//! the line on its own is broken at the last character that fits.

use crate::font::FontContext;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text on this line, trailing spaces removed.
    pub text: String,
    /// Total width of the line in points.
    pub width: f64,
}

/// Font parameters used while measuring one text block.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics<'a> {
    pub family: &'a str,
    pub weight: u32,
    pub font_size: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Returns a vec of length `text.chars().count()`. Each entry is the break
/// opportunity *before* that character position. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

#[derive(Default)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Empty input yields no lines. Explicit `\n` (or `\r\n`) always starts a
    /// new line.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        metrics: TextMetrics<'_>,
    ) -> Vec<BrokenLine> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
            self.break_paragraph(font_context, paragraph, max_width, metrics, &mut lines);
        }
        if text.is_empty() {
            lines.clear();
        }
        lines
    }

    fn break_paragraph(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        metrics: TextMetrics<'_>,
        lines: &mut Vec<BrokenLine>,
    ) {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            lines.push(BrokenLine {
                text: String::new(),
                width: 0.0,
            });
            return;
        }

        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| font_context.char_width(ch, metrics.family, metrics.weight, metrics.font_size))
            .collect();
        let opportunities = compute_break_opportunities(text);

        let mut line_start = 0usize;
        let mut line_width = 0.0;
        let mut last_break: Option<usize> = None;
        let mut i = 0usize;

        while i < chars.len() {
            if i > line_start && opportunities[i].is_some() {
                last_break = Some(i);
            }

            if line_width + widths[i] > max_width && i > line_start {
                let break_at = match last_break {
                    Some(b) if b > line_start => b,
                    // No opportunity on this line: break before the char that overflows.
                    _ => i,
                };
                lines.push(self.make_line(&chars[line_start..break_at], &widths[line_start..break_at]));

                line_start = break_at;
                while line_start < chars.len() && chars[line_start] == ' ' {
                    line_start += 1;
                }
                line_width = 0.0;
                last_break = None;
                i = line_start;
                continue;
            }

            line_width += widths[i];
            i += 1;
        }

        if line_start < chars.len() {
            lines.push(self.make_line(&chars[line_start..], &widths[line_start..]));
        }
    }

    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut end = chars.len();
        while end > 0 && chars[end - 1] == ' ' {
            end -= 1;
        }
        BrokenLine {
            text: chars[..end].iter().collect(),
            width: widths[..end].iter().sum(),
        }
    }

    /// Width of the text as a single unbroken line.
    pub fn measure_width(&self, font_context: &FontContext, text: &str, metrics: TextMetrics<'_>) -> f64 {
        font_context.measure_string(text, metrics.family, metrics.weight, metrics.font_size)
    }
}
