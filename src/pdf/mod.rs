//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a PDF 1.7 file
//! by hand.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, images, pages, streams
//! ...
//! xref                <- byte offset of every object
//! trailer             <- root and info references
//! %%EOF
//! ```
//!
//! Helvetica is referenced as a standard Type1 font with WinAnsiEncoding;
//! characters outside that encoding are written as `?`. Registered TrueType
//! fonts are embedded whole as CIDFontType2 with Identity-H encoding, five
//! objects per face: FontFile2, FontDescriptor, CIDFont, ToUnicode CMap and
//! the Type0 root.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::RenderError;
use crate::font::{FontContext, FontData, FontKey};
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage, TextLine};
use crate::model::{CanvasOp, Metadata};
use crate::style::Color;

const PRODUCER: &str = concat!("pump-report ", env!("CARGO_PKG_VERSION"));

/// Bezier control-point factor for quarter circles.
const KAPPA: f64 = 0.552_284_749_8;

#[derive(Default)]
pub struct PdfWriter;

/// Objects are stored by id; index 0 is the unused free-list head.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
    /// Font resources in `/F<index>` order.
    fonts: Vec<(FontKey, usize)>,
    /// Char to glyph id for every embedded TrueType face.
    glyph_maps: HashMap<FontKey, HashMap<char, u16>>,
    /// Image XObject ids per page, in drawing order.
    page_images: Vec<Vec<usize>>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            // 0 = free head, 1 = Catalog, 2 = Pages
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            fonts: Vec::new(),
            glyph_maps: HashMap::new(),
            page_images: Vec::new(),
        }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }

    fn push_stream(&mut self, dict_entries: &str, payload: &[u8]) -> usize {
        let mut data = Vec::with_capacity(payload.len() + 64);
        let _ = write!(data, "<< {} /Length {} >>\nstream\n", dict_entries, payload.len());
        data.extend_from_slice(payload);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }

    fn font_index(&self, key: &FontKey) -> usize {
        self.fonts.iter().position(|(k, _)| k == key).unwrap_or(0)
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        fonts: &FontContext,
    ) -> Result<Vec<u8>, RenderError> {
        let mut builder = PdfBuilder::new();

        self.register_fonts(&mut builder, pages, fonts)?;
        for page in pages {
            let mut ids = Vec::new();
            Self::register_images(&mut builder, &page.elements, &mut ids);
            builder.page_images.push(ids);
        }

        let font_resources = builder
            .fonts
            .iter()
            .enumerate()
            .map(|(i, (_, id))| format!("/F{} {} 0 R", i, id))
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_ids = Vec::with_capacity(pages.len());
        for (page_idx, page) in pages.iter().enumerate() {
            let content = self.content_stream(page, &builder, &builder.page_images[page_idx]);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);
            let content_id = builder.push_stream("/Filter /FlateDecode", &compressed);

            let xobjects = builder.page_images[page_idx]
                .iter()
                .enumerate()
                .map(|(i, id)| format!("/Im{} {} 0 R", i, id))
                .collect::<Vec<_>>()
                .join(" ");
            let mut resources = format!("/Font << {} >>", font_resources);
            if !xobjects.is_empty() {
                let _ = write!(resources, " /XObject << {} >>", xobjects);
            }

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_id, resources
            );
            page_ids.push(builder.push(page_dict.into_bytes()));
        }

        let mut catalog = String::from("<< /Type /Catalog /Pages 2 0 R");
        if let Some(lang) = &metadata.lang {
            let _ = write!(catalog, " /Lang {}", pdf_text_string(lang));
        }
        catalog.push_str(" >>");
        builder.objects[1] = catalog.into_bytes();

        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] =
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_ids.len()).into_bytes();

        let info_id = builder.push(Self::info_dict(metadata).into_bytes());

        log::debug!(
            "serialized {} page(s), {} font(s), {} object(s)",
            pages.len(),
            builder.fonts.len(),
            builder.objects.len() - 1
        );
        Ok(Self::serialize(&builder, info_id))
    }

    fn info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
            ("Creator", &metadata.creator),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                let _ = write!(info, "/{} {} ", name, pdf_text_string(v));
            }
        }
        let _ = write!(info, "/Producer {} >>", pdf_text_string(PRODUCER));
        info
    }

    fn content_stream(&self, page: &LayoutPage, builder: &PdfBuilder, images: &[usize]) -> String {
        let mut stream = String::new();
        let mut next_image = 0usize;
        for element in &page.elements {
            self.write_element(&mut stream, element, page.height, builder, images, &mut next_image);
        }
        stream
    }

    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page_height: f64,
        builder: &PdfBuilder,
        images: &[usize],
        next_image: &mut usize,
    ) {
        let x = element.x;
        let y = page_height - element.y - element.height;

        match &element.draw {
            DrawCommand::None => {}

            DrawCommand::Rect { background, radius } => {
                if background.a > 0.0 {
                    let _ = write!(stream, "q\n{} rg\n", rgb(background));
                    write_rect_path(stream, x, y, element.width, element.height, *radius);
                    stream.push_str("f\nQ\n");
                }
            }

            DrawCommand::Text { lines, color } => {
                let _ = write!(stream, "BT\n{} rg\n", rgb(color));
                for line in lines {
                    self.write_text_line(stream, line, page_height, builder);
                }
                stream.push_str("ET\n");
            }

            DrawCommand::Image { .. } => {
                if *next_image < images.len() {
                    let _ = write!(
                        stream,
                        "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                        element.width, element.height, x, y, *next_image
                    );
                    *next_image += 1;
                }
            }

            DrawCommand::ImagePlaceholder => {
                let _ = write!(
                    stream,
                    "q\n0.9 0.9 0.9 rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                    x, y, element.width, element.height
                );
            }

            DrawCommand::Vector { ops } => {
                for op in ops {
                    write_canvas_op(stream, op, element.x, element.y, page_height);
                }
            }

            DrawCommand::Rule { x1, y1, x2, y2, rule } => {
                let _ = write!(
                    stream,
                    "q\n{} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    rgb(&rule.color),
                    rule.width,
                    x1,
                    page_height - y1,
                    x2,
                    page_height - y2
                );
            }
        }

        for child in &element.children {
            self.write_element(stream, child, page_height, builder, images, next_image);
        }
    }

    fn write_text_line(&self, stream: &mut String, line: &TextLine, page_height: f64, builder: &PdfBuilder) {
        let font_idx = builder.font_index(&line.font);
        let _ = write!(
            stream,
            "/F{} {:.1} Tf\n1 0 0 1 {:.2} {:.2} Tm\n",
            font_idx,
            line.font_size,
            line.x,
            page_height - line.y
        );

        match builder.glyph_maps.get(&line.font) {
            Some(glyphs) => {
                let mut hex = String::with_capacity(line.text.len() * 4);
                for ch in line.text.chars() {
                    let gid = glyphs.get(&ch).copied().unwrap_or(0);
                    let _ = write!(hex, "{:04X}", gid);
                }
                let _ = writeln!(stream, "<{}> Tj", hex);
            }
            None => {
                let _ = writeln!(stream, "({}) Tj", encode_winansi(&line.text));
            }
        }
    }

    /// One font resource per distinct key used on any page.
    fn register_fonts(
        &self,
        builder: &mut PdfBuilder,
        pages: &[LayoutPage],
        fonts: &FontContext,
    ) -> Result<(), RenderError> {
        let mut used: BTreeMap<FontKey, BTreeSet<char>> = BTreeMap::new();
        for page in pages {
            collect_font_usage(&page.elements, &mut used);
        }
        if used.is_empty() {
            used.insert(FontKey::snapped("Helvetica", 400), BTreeSet::new());
        }

        for (key, chars) in &used {
            let (_, data) = fonts.resolve(&key.family, key.weight);
            let obj_id = match data {
                FontData::Standard { bold } => builder.push(
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                        FontData::standard_name(*bold)
                    )
                    .into_bytes(),
                ),
                FontData::Custom { data, .. } => Self::embed_truetype(builder, key, data, chars)?,
            };
            builder.fonts.push((key.clone(), obj_id));
        }
        Ok(())
    }

    fn register_images(builder: &mut PdfBuilder, elements: &[LayoutElement], ids: &mut Vec<usize>) {
        for element in elements {
            if let DrawCommand::Image { image_data } = &element.draw {
                ids.push(Self::write_image_xobject(builder, image_data));
            }
            Self::register_images(builder, &element.children, ids);
        }
    }

    /// JPEG passes through as DCTDecode; decoded pixels go out Flate
    /// compressed with an optional SMask.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        let dims = format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /BitsPerComponent 8",
            image.width_px, image.height_px
        );
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let cs = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };
                builder.push_stream(&format!("{} /ColorSpace {} /Filter /DCTDecode", dims, cs), data)
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let smask = alpha.as_ref().map(|a| {
                    let compressed = compress_to_vec_zlib(a, 6);
                    builder.push_stream(
                        &format!("{} /ColorSpace /DeviceGray /Filter /FlateDecode", dims),
                        &compressed,
                    )
                });
                let smask_ref = smask.map(|id| format!(" /SMask {} 0 R", id)).unwrap_or_default();
                let compressed = compress_to_vec_zlib(rgb, 6);
                builder.push_stream(
                    &format!("{} /ColorSpace /DeviceRGB /Filter /FlateDecode{}", dims, smask_ref),
                    &compressed,
                )
            }
        }
    }

    /// Embed a full TrueType face. Returns the Type0 font object id.
    fn embed_truetype(
        builder: &mut PdfBuilder,
        key: &FontKey,
        ttf: &[u8],
        used_chars: &BTreeSet<char>,
    ) -> Result<usize, RenderError> {
        let face = ttf_parser::Face::parse(ttf, 0).map_err(|e| {
            RenderError::Font(format!("failed to parse TTF data for '{}': {}", key.family, e))
        })?;
        let scale = 1000.0 / face.units_per_em() as f64;
        let base_name = sanitize_font_name(&key.family, key.weight);

        let glyphs: HashMap<char, u16> = used_chars
            .iter()
            .filter_map(|&ch| face.glyph_index(ch).map(|gid| (ch, gid.0)))
            .collect();
        let missing = used_chars.len() - glyphs.len();
        if missing > 0 {
            log::warn!("{} character(s) have no glyph in '{}'", missing, key.family);
        }

        let compressed = compress_to_vec_zlib(ttf, 6);
        let fontfile_id = builder.push_stream(
            &format!("/Length1 {} /Filter /FlateDecode", ttf.len()),
            &compressed,
        );

        let bbox = face.global_bounding_box();
        let descriptor = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 /FontBBox [{} {} {} {}] \
             /ItalicAngle 0 /Ascent {} /Descent {} /CapHeight {} /StemV {} /FontFile2 {} 0 R >>",
            base_name,
            (bbox.x_min as f64 * scale) as i32,
            (bbox.y_min as f64 * scale) as i32,
            (bbox.x_max as f64 * scale) as i32,
            (bbox.y_max as f64 * scale) as i32,
            (face.ascender() as f64 * scale) as i32,
            (face.descender() as f64 * scale) as i32,
            (face.capital_height().unwrap_or(face.ascender()) as f64 * scale) as i32,
            if key.weight >= 700 { 120 } else { 80 },
            fontfile_id,
        );
        let descriptor_id = builder.push(descriptor.into_bytes());

        let widths: BTreeMap<u16, u32> = glyphs
            .values()
            .map(|&gid| {
                let advance = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0);
                (gid, (advance as f64 * scale) as u32)
            })
            .collect();
        let mut w_array = String::from("[");
        for (gid, width) in &widths {
            let _ = write!(w_array, " {} [{}]", gid, width);
        }
        w_array.push_str(" ]");

        let cidfont = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW 1000 /W {} /CIDToGIDMap /Identity >>",
            base_name, descriptor_id, w_array
        );
        let cidfont_id = builder.push(cidfont.into_bytes());

        let cmap = build_tounicode_cmap(&glyphs, &base_name);
        let tounicode_id =
            builder.push_stream("/Filter /FlateDecode", &compress_to_vec_zlib(cmap.as_bytes(), 6));

        let type0 = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
            base_name, cidfont_id, tounicode_id
        );
        let type0_id = builder.push(type0.into_bytes());

        builder.glyph_maps.insert(key.clone(), glyphs);
        Ok(type0_id)
    }

    fn serialize(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = vec![0usize; builder.objects.len()];
        for (id, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[id] = out.len();
            let _ = write!(out, "{} 0 obj\n", id);
            out.extend_from_slice(data);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", builder.objects.len());
        for offset in offsets.iter().skip(1) {
            let _ = write!(out, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_id,
            xref_offset
        );
        out
    }
}

fn collect_font_usage(elements: &[LayoutElement], used: &mut BTreeMap<FontKey, BTreeSet<char>>) {
    for element in elements {
        if let DrawCommand::Text { lines, .. } = &element.draw {
            for line in lines {
                used.entry(line.font.clone()).or_default().extend(line.text.chars());
            }
        }
        collect_font_usage(&element.children, used);
    }
}

fn rgb(c: &Color) -> String {
    format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
}

/// Rectangle path in PDF space, with uniform rounded corners when `radius > 0`.
fn write_rect_path(stream: &mut String, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r <= 0.0 {
        let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} re", x, y, w, h);
        return;
    }
    let k = r * KAPPA;
    let _ = writeln!(stream, "{:.2} {:.2} m", x + r, y);
    let _ = writeln!(stream, "{:.2} {:.2} l", x + w - r, y);
    let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    let _ = writeln!(stream, "{:.2} {:.2} l", x + w, y + h - r);
    let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    let _ = writeln!(stream, "{:.2} {:.2} l", x + r, y + h);
    let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    let _ = writeln!(stream, "{:.2} {:.2} l", x, y + r);
    let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", x, y + r - k, x + r - k, y, x + r, y);
    stream.push_str("h\n");
}

/// Canvas ops use local top-left coordinates; flip them into page space.
fn write_canvas_op(stream: &mut String, op: &CanvasOp, origin_x: f64, origin_y: f64, page_height: f64) {
    let px = |x: f64| origin_x + x;
    let py = |y: f64| page_height - (origin_y + y);
    match op {
        CanvasOp::Rect { x, y, w, h, line_width, color } => {
            let _ = write!(
                stream,
                "q\n{} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
                rgb(color),
                line_width,
                px(*x),
                py(y + h),
                w,
                h
            );
        }
        CanvasOp::Line { x1, y1, x2, y2, line_width, color } => {
            let _ = write!(
                stream,
                "q\n{} RG\n{:.2} w\n1 J\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                rgb(color),
                line_width,
                px(*x1),
                py(*y1),
                px(*x2),
                py(*y2)
            );
        }
        CanvasOp::FilledRoundedRect { x, y, w, h, radius, color } => {
            let _ = write!(stream, "q\n{} rg\n", rgb(color));
            write_rect_path(stream, px(*x), py(y + h), *w, *h, *radius);
            stream.push_str("f\nQ\n");
        }
    }
}

fn build_tounicode_cmap(glyphs: &HashMap<char, u16>, font_name: &str) -> String {
    let by_gid: BTreeMap<u16, char> = glyphs.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    let entries: Vec<(u16, char)> = by_gid.into_iter().collect();

    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n");
    cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
    cmap.push_str("/CMapType 2 def\n1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");
    // At most 100 entries per bfchar block.
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch.encode_utf16(&mut units).iter().map(|u| format!("{:04X}", u)).collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", gid, hex);
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

fn sanitize_font_name(family: &str, weight: u32) -> String {
    let mut name: String = family
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if name.is_empty() {
        name = "CustomFont".to_string();
    }
    if weight >= 700 {
        name.push_str("-Bold");
    }
    name
}

/// A PDF text string: literal for ASCII, UTF-16BE hex with BOM otherwise.
fn pdf_text_string(s: &str) -> String {
    if s.is_ascii() {
        format!("({})", escape_pdf_string(s))
    } else {
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{:04X}", unit);
        }
        hex.push('>');
        hex
    }
}

fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Encode text for a standard font's literal string operand.
fn encode_winansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match unicode_to_winansi(ch).unwrap_or(b'?') {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b @ 0x20..=0x7E => out.push(b as char),
            b => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Map a Unicode codepoint to its Windows-1252 byte.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    let b = match cp {
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::model::{Document, Node};
    use crate::style::Style;

    fn write_doc(doc: &Document) -> Vec<u8> {
        let fonts = FontContext::new();
        let pages = LayoutEngine::new().layout(doc, &fonts);
        PdfWriter::new().write(&pages, &doc.metadata, &fonts).unwrap()
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("a(b)c\\"), "a\\(b\\)c\\\\");
    }

    #[test]
    fn test_winansi_fallback_is_question_mark() {
        assert_eq!(encode_winansi("ok"), "ok");
        assert_eq!(encode_winansi("ปั๊ม"), "????");
        assert_eq!(encode_winansi("\u{2022}"), "\\225");
    }

    #[test]
    fn test_non_ascii_text_string_is_utf16() {
        assert_eq!(pdf_text_string("Hi"), "(Hi)");
        assert_eq!(pdf_text_string("ก"), "<FEFF0E01>");
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let bytes = write_doc(&Document::default());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.7"));
        assert!(text.contains("/Count 1"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_metadata_and_lang_in_pdf() {
        let mut doc = Document::default();
        doc.metadata.title = Some("Pump Service Report".to_string());
        doc.metadata.keywords = Some("pump, service".to_string());
        doc.metadata.lang = Some("en-US".to_string());
        let text = String::from_utf8_lossy(&write_doc(&doc)).to_string();
        assert!(text.contains("/Title (Pump Service Report)"));
        assert!(text.contains("/Keywords (pump, service)"));
        assert!(text.contains("/Lang (en-US)"));
    }

    #[test]
    fn test_bold_font_registered_separately() {
        let doc = Document {
            children: vec![
                Node::text("regular", Style::default()),
                Node::text(
                    "bold",
                    Style {
                        font_weight: Some(700),
                        ..Default::default()
                    },
                ),
            ],
            ..Default::default()
        };
        let text = String::from_utf8_lossy(&write_doc(&doc)).to_string();
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn test_rounded_rect_uses_curves() {
        let mut s = String::new();
        write_rect_path(&mut s, 0.0, 0.0, 100.0, 20.0, 4.0);
        assert_eq!(s.matches(" c\n").count(), 4);
        let mut plain = String::new();
        write_rect_path(&mut plain, 0.0, 0.0, 100.0, 20.0, 0.0);
        assert!(plain.ends_with(" re\n"));
    }

    #[test]
    fn test_tounicode_cmap_format() {
        let glyphs: HashMap<char, u16> = [('A', 36), ('ก', 120)].into_iter().collect();
        let cmap = build_tounicode_cmap(&glyphs, "Sarabun");
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("<0078> <0E01>"));
    }

    #[test]
    fn test_sanitize_font_name() {
        assert_eq!(sanitize_font_name("Sarabun", 700), "Sarabun-Bold");
        assert_eq!(sanitize_font_name("ไทย", 400), "CustomFont");
    }
}
