//! Integration tests for the rendering engine.
//!
//! These tests exercise the full path from a document (built in code or
//! read from JSON) to PDF output. They verify:
//! - JSON deserialization, including named styles and table layouts
//! - The layout engine produces the right number of pages
//! - PDF output is structurally valid
//! - Page breaks, unbreakable blocks and row rules behave
//! - Custom TrueType fonts are embedded

use pump_report::font::FontContext;
use pump_report::layout::{DrawCommand, LayoutEngine, LayoutPage};
use pump_report::model::*;
use pump_report::style::*;
use pump_report::{EngineConfig, FontEntry, RenderError};

// ─── Helpers ────────────────────────────────────────────────────

fn make_text(content: &str, font_size: f64) -> Node {
    Node {
        kind: NodeKind::Text {
            content: content.to_string(),
        },
        style_refs: vec![],
        style: Style {
            font_size: Some(font_size),
            ..Default::default()
        },
        children: vec![],
        id: None,
    }
}

fn make_view(children: Vec<Node>) -> Node {
    make_styled_view(Style::default(), children)
}

fn make_styled_view(style: Style, children: Vec<Node>) -> Node {
    Node {
        kind: NodeKind::View,
        style_refs: vec![],
        style,
        children,
        id: None,
    }
}

fn make_key_value_table(rows: &[(&str, &str)], layout: Option<&str>) -> Node {
    Node::table(
        vec![
            ColumnDef {
                width: ColumnWidth::Fraction(0.3),
            },
            ColumnDef {
                width: ColumnWidth::Fraction(0.7),
            },
        ],
        layout.map(str::to_string),
        rows.iter()
            .map(|(k, v)| {
                Node::table_row(vec![
                    Node::table_cell(vec![make_text(k, 10.0)]),
                    Node::table_cell(vec![make_text(v, 10.0)]),
                ])
            })
            .collect(),
    )
}

fn row_lines() -> TableLayout {
    TableLayout {
        horizontal_rule: Some(Rule {
            width: 0.5,
            color: Color::hex("#cccccc"),
        }),
        vertical_rule: None,
        outer_rules: false,
        cell_padding: Edges::symmetric(4.0, 6.0),
    }
}

fn default_doc(children: Vec<Node>) -> Document {
    Document {
        children,
        ..Default::default()
    }
}

fn layout_doc(doc: &Document) -> Vec<LayoutPage> {
    let font_context = FontContext::new();
    let engine = LayoutEngine::new();
    engine.layout(doc, &font_context)
}

fn render_to_pdf(doc: &Document) -> Vec<u8> {
    pump_report::render(doc, &EngineConfig::default()).expect("render should succeed")
}

fn count_rules(pages: &[LayoutPage]) -> usize {
    pages
        .iter()
        .flat_map(|p| p.elements.iter())
        .filter(|e| matches!(e.draw, DrawCommand::Rule { .. }))
        .count()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
    assert!(
        bytes.windows(4).any(|w| w == b"xref"),
        "Missing xref table"
    );
    assert!(
        bytes.windows(7).any(|w| w == b"trailer"),
        "Missing trailer"
    );
}

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_empty_document_still_has_a_page() {
    let doc = default_doc(vec![]);
    let pages = layout_doc(&doc);
    assert_eq!(pages.len(), 1);
    assert_valid_pdf(&render_to_pdf(&doc));
}

#[test]
fn test_single_text_node() {
    let doc = default_doc(vec![make_text("Hello, World!", 12.0)]);
    let pages = layout_doc(&doc);
    assert_eq!(pages.len(), 1, "Single text should fit on one page");
    assert_eq!(pages[0].text_lines()[0].text, "Hello, World!");
}

#[test]
fn test_explicit_page_break() {
    let doc = default_doc(vec![
        make_text("Page 1", 12.0),
        Node::page_break(),
        make_text("Page 2", 12.0),
    ]);
    let pages = layout_doc(&doc);
    assert_eq!(pages.len(), 2, "Should have exactly 2 pages after a page break");
    assert_eq!(pages[1].text_lines()[0].text, "Page 2");
}

#[test]
fn test_break_before_starts_a_new_page() {
    let mut second = make_text("Second", 12.0);
    second.style.break_before = Some(true);
    let doc = default_doc(vec![make_text("First", 12.0), second]);
    assert_eq!(layout_doc(&doc).len(), 2);
}

// ─── Page Overflow Tests ────────────────────────────────────────

#[test]
fn test_content_overflow_creates_new_page() {
    // A4 content height is roughly 734pt (841.89 - 2*54).
    // At 12pt font with 1.4 line height = 16.8pt per line, ~43 lines per page.
    let children = (0..100)
        .map(|i| make_text(&format!("Line {}", i), 12.0))
        .collect();
    let pages = layout_doc(&default_doc(children));
    assert!(
        pages.len() >= 2,
        "100 lines should overflow to multiple pages, got {} pages",
        pages.len()
    );
    let placed: usize = pages.iter().map(|p| p.text_lines().len()).sum();
    assert_eq!(placed, 100, "no line may be lost at a page boundary");
}

#[test]
fn test_unbreakable_node_moves_to_next_page() {
    let mut children: Vec<Node> = (0..40)
        .map(|i| make_text(&format!("Filler {}", i), 12.0))
        .collect();
    let unbreakable = make_styled_view(
        Style {
            wrap: Some(false),
            ..Default::default()
        },
        (1..=6)
            .map(|i| make_text(&format!("Must stay together line {}", i), 12.0))
            .collect(),
    );
    children.push(unbreakable);

    let pages = layout_doc(&default_doc(children));
    assert_eq!(pages.len(), 2, "Unbreakable block should push to next page");
    let second: Vec<_> = pages[1].text_lines().iter().map(|l| l.text.clone()).collect();
    assert_eq!(second.len(), 6);
    assert_eq!(second[0], "Must stay together line 1");
}

#[test]
fn test_deeply_nested_views() {
    let mut node = make_text("Deep", 12.0);
    for _ in 0..10 {
        node = make_view(vec![node]);
    }
    let doc = default_doc(vec![node]);
    assert_eq!(layout_doc(&doc)[0].text_lines()[0].text, "Deep");
    assert_valid_pdf(&render_to_pdf(&doc));
}

// ─── Row Tests ──────────────────────────────────────────────────

#[test]
fn test_row_places_children_side_by_side() {
    let row = make_styled_view(
        Style {
            flex_direction: Some(FlexDirection::Row),
            gap: Some(12.0),
            ..Default::default()
        },
        vec![make_text("Left", 12.0), make_text("Right", 12.0)],
    );
    let pages = layout_doc(&default_doc(vec![row]));
    let lines = pages[0].text_lines();
    assert_eq!(lines.len(), 2);
    assert!((lines[0].y - lines[1].y).abs() < 0.001);
    assert!(lines[1].x > lines[0].x);
}

#[test]
fn test_fixed_width_child_keeps_its_width() {
    let row = make_styled_view(
        Style {
            flex_direction: Some(FlexDirection::Row),
            ..Default::default()
        },
        vec![
            Node::canvas(10.0, 10.0, vec![]),
            make_text("Label", 12.0),
        ],
    );
    let mut doc = default_doc(vec![row]);
    doc.children[0].children[0].style.width = Some(Dimension::Pt(10.0));
    let pages = layout_doc(&doc);
    let label = pages[0].text_lines()[0].x;
    assert!((label - (54.0 + 10.0)).abs() < 0.001, "label at {}", label);
}

// ─── Table Tests ────────────────────────────────────────────────

#[test]
fn test_named_table_layout_draws_rules_between_rows_only() {
    let mut doc = default_doc(vec![make_key_value_table(
        &[("Company:", "Acme Co"), ("Site Location:", "-"), ("Phone:", "-")],
        Some("rowLines"),
    )]);
    doc.table_layouts.insert("rowLines".to_string(), row_lines());
    let pages = layout_doc(&doc);
    assert_eq!(count_rules(&pages), 2);
    assert_valid_pdf(&render_to_pdf(&doc));
}

#[test]
fn test_unknown_table_layout_draws_no_rules() {
    let doc = default_doc(vec![make_key_value_table(
        &[("A", "1"), ("B", "2")],
        Some("missing"),
    )]);
    assert_eq!(count_rules(&layout_doc(&doc)), 0);
}

#[test]
fn test_table_page_break_with_many_rows() {
    let rows: Vec<(String, String)> = (0..80)
        .map(|i| (format!("Item {}", i), "Value".to_string()))
        .collect();
    let rows: Vec<(&str, &str)> = rows.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let mut doc = default_doc(vec![make_key_value_table(&rows, Some("rowLines"))]);
    doc.table_layouts.insert("rowLines".to_string(), row_lines());

    let pages = layout_doc(&doc);
    assert!(
        pages.len() >= 2,
        "80-row table should span multiple pages, got {}",
        pages.len()
    );
    // One rule per row boundary, minus the boundaries that open a page.
    assert_eq!(count_rules(&pages), 79 - (pages.len() - 1));
}

#[test]
fn test_column_fractions_split_the_width() {
    let doc = default_doc(vec![make_key_value_table(&[("Label", "Value")], None)]);
    let pages = layout_doc(&doc);
    let lines = pages[0].text_lines();
    let content_width = 595.28 - 108.0;
    assert!((lines[0].x - 54.0).abs() < 0.001);
    assert!((lines[1].x - (54.0 + content_width * 0.3)).abs() < 0.001);
}

// ─── JSON Deserialization Tests ─────────────────────────────────

#[test]
fn test_minimal_json() {
    let json = r#"{
        "children": [
            {
                "kind": { "type": "Text", "content": "Hello from JSON" },
                "style": { "fontSize": 14 }
            }
        ]
    }"#;
    let bytes = pump_report::render_json(json, &EngineConfig::default())
        .expect("Should parse minimal JSON");
    assert_valid_pdf(&bytes);
}

#[test]
fn test_named_styles_json() {
    let json = r#"{
        "defaultStyle": { "fontSize": 9 },
        "styles": {
            "sectionHeader": { "fontSize": 11, "fontWeight": 700 }
        },
        "children": [
            {
                "kind": { "type": "Text", "content": "1. Customer Details" },
                "styleRefs": ["sectionHeader"]
            },
            {
                "kind": { "type": "Text", "content": "Body" }
            }
        ]
    }"#;
    let doc: Document = serde_json::from_str(json).expect("Should deserialize named styles");
    let pages = layout_doc(&doc);
    let lines = pages[0].text_lines();
    assert_eq!(lines[0].font_size, 11.0);
    assert_eq!(lines[0].font.weight, 700);
    assert_eq!(lines[1].font_size, 9.0);
}

#[test]
fn test_canvas_json() {
    let json = r#"{
        "children": [
            {
                "kind": {
                    "type": "Canvas",
                    "width": 10,
                    "height": 10,
                    "ops": [
                        { "op": "Rect", "x": 0, "y": 0, "w": 10, "h": 10, "line_width": 1,
                          "color": { "r": 0, "g": 0, "b": 0, "a": 1 } },
                        { "op": "Line", "x1": 2, "y1": 5, "x2": 4, "y2": 8, "line_width": 1.5,
                          "color": { "r": 0, "g": 0, "b": 0, "a": 1 } }
                    ]
                }
            }
        ]
    }"#;
    let bytes = pump_report::render_json(json, &EngineConfig::default())
        .expect("Should parse canvas JSON");
    assert_valid_pdf(&bytes);
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let err = pump_report::render_json("{ \"children\": [", &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, RenderError::Parse { .. }));
}

#[test]
fn test_style_inheritance() {
    let json = r#"{
        "children": [
            {
                "kind": { "type": "View" },
                "style": { "fontSize": 20 },
                "children": [
                    { "kind": { "type": "Text", "content": "Should be 20pt" } }
                ]
            }
        ]
    }"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    let pages = layout_doc(&doc);
    assert_eq!(pages[0].text_lines()[0].font_size, 20.0);
}

// ─── Metadata ───────────────────────────────────────────────────

#[test]
fn test_metadata_in_output() {
    let doc = Document {
        children: vec![make_text("Content", 12.0)],
        metadata: Metadata {
            title: Some("Test Title".to_string()),
            author: Some("Test Author".to_string()),
            subject: Some("Testing".to_string()),
            keywords: Some("pump, service".to_string()),
            creator: None,
            lang: Some("th-TH".to_string()),
        },
        ..Default::default()
    };
    let bytes = render_to_pdf(&doc);
    assert_valid_pdf(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Title (Test Title)"));
    assert!(text.contains("/Author (Test Author)"));
    assert!(text.contains("/Keywords (pump, service)"));
    assert!(text.contains("/Lang (th-TH)"));
}

// ─── Images ─────────────────────────────────────────────────────

fn png_data_uri(width: u32, height: u32) -> String {
    use base64::Engine as _;
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 80, 120]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(out.into_inner())
    )
}

#[test]
fn test_image_is_embedded_as_xobject() {
    let doc = default_doc(vec![Node::image(png_data_uri(8, 4), Some(60.0), None)]);
    let pages = layout_doc(&doc);
    let image = &pages[0].elements[0];
    assert!(matches!(image.draw, DrawCommand::Image { .. }));
    assert!((image.height - 30.0).abs() < 0.001, "aspect ratio kept");

    let text = String::from_utf8_lossy(&render_to_pdf(&doc)).to_string();
    assert!(text.contains("/Subtype /Image"));
}

#[test]
fn test_broken_image_draws_placeholder() {
    let doc = default_doc(vec![Node::image("data:image/png;base64,AAAA".into(), Some(40.0), Some(40.0))]);
    let pages = layout_doc(&doc);
    assert!(matches!(pages[0].elements[0].draw, DrawCommand::ImagePlaceholder));
}

// ─── Custom Font Embedding Tests ────────────────────────────────

/// Load a system TTF font for testing. Returns None if not available.
fn load_test_font() -> Option<Vec<u8>> {
    let paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Verdana.ttf",
    ];
    for path in &paths {
        if let Ok(data) = std::fs::read(path) {
            if ttf_parser::Face::parse(&data, 0).is_ok() {
                return Some(data);
            }
        }
    }
    None
}

fn custom_font_doc(family: &str, text: &str) -> Document {
    let mut node = make_text(text, 14.0);
    node.style.font_family = Some(family.to_string());
    default_doc(vec![node])
}

#[test]
fn test_custom_font_has_cidfont_objects() {
    let font_data = match load_test_font() {
        Some(data) => data,
        None => {
            eprintln!("Skipping: no test TTF font found");
            return;
        }
    };

    let config = EngineConfig::default().with_font(FontEntry::new("TestFont", 400, font_data));
    let bytes = pump_report::render(&custom_font_doc("TestFont", "ABC"), &config).unwrap();
    assert_valid_pdf(&bytes);
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("CIDFontType2"), "Should contain CIDFontType2 subtype");
    assert!(text.contains("/FontFile2"), "Should contain FontFile2 reference");
    assert!(text.contains("/Type0"), "Should contain Type0 font dictionary");
    assert!(text.contains("/Identity-H"), "Should use Identity-H encoding");
    assert!(text.contains("/ToUnicode"), "Should have ToUnicode CMap for text extraction");
}

#[test]
fn test_mixed_standard_and_custom_fonts() {
    let font_data = match load_test_font() {
        Some(data) => data,
        None => {
            eprintln!("Skipping: no test TTF font found");
            return;
        }
    };

    let mut doc = custom_font_doc("CustomFont", "Custom Font Text");
    doc.children.push(make_text("Standard Helvetica", 12.0));
    let config = EngineConfig::default().with_font(FontEntry::new("CustomFont", 400, font_data));
    let bytes = pump_report::render(&doc, &config).unwrap();

    assert_valid_pdf(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Type1"), "Should have Type1 for standard font");
    assert!(text.contains("CIDFontType2"), "Should have CIDFontType2 for custom font");
}

#[test]
fn test_fonts_do_not_leak_between_renders() {
    let font_data = match load_test_font() {
        Some(data) => data,
        None => {
            eprintln!("Skipping: no test TTF font found");
            return;
        }
    };

    let doc = custom_font_doc("TestFont", "Hello");
    let with_font = EngineConfig::default().with_font(FontEntry::new("TestFont", 400, font_data));
    let first = pump_report::render(&doc, &with_font).unwrap();
    let second = pump_report::render(&doc, &EngineConfig::default()).unwrap();
    assert!(String::from_utf8_lossy(&first).contains("CIDFontType2"));
    assert!(!String::from_utf8_lossy(&second).contains("CIDFontType2"));
}

#[test]
fn test_unregistered_family_falls_back_to_helvetica() {
    let doc = custom_font_doc("Sarabun", "Hello");
    let pages = layout_doc(&doc);
    assert_eq!(pages[0].text_lines()[0].font.family, "Helvetica");
    assert_valid_pdf(&render_to_pdf(&doc));
}

#[test]
fn test_garbage_font_data_is_a_font_error() {
    let config = EngineConfig::default().with_font(FontEntry::new("Broken", 400, vec![0u8; 64]));
    let err = pump_report::render(&default_doc(vec![]), &config).unwrap_err();
    assert!(matches!(err, RenderError::Font(_)));
}
