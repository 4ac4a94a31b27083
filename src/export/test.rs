use std::path::PathBuf;

use image::{Rgb, RgbImage};

use super::renderer::{align_offset, justify, layout_lines, line_runs, underline_span, Line};
use super::static_page::{BLACK, WHITE};
use super::*;
use crate::config::ExportConfig;
use crate::document::{Document, PageSize, PaperColor, Px, TextAlign, TextBox, TextBoxId};
use crate::progress::Progress;

fn doc_with_boxes() -> Document {
    let mut doc = Document::new(PageSize::A4, PaperColor::Default);
    let mut b = TextBox::new(TextBoxId::new("1"), PaperColor::Default, "Georgia", Px(20.0));
    b.content = "Hello".to_string();
    b.italic = true;
    b.align = TextAlign::Right;
    doc.add_text_box(1, b);

    doc.insert_page_after(1);
    doc.page_mut(2).unwrap().set_size(PageSize::Letter);
    doc.page_mut(2).unwrap().set_color(PaperColor::Inverted);
    doc.add_text_box(2, TextBox::new(TextBoxId::new("2"), PaperColor::Default, "Arial", Px(14.0)));
    doc
}

/// Fills the page with its background; counts nothing
struct SolidRenderer;

impl PageRenderer for SolidRenderer {
    fn render(&self, page: &StaticPage) -> Result<RgbImage, ExportError> {
        Ok(RgbImage::from_pixel(8, 8, page.background))
    }
}

/// Fails on one page
struct FailingRenderer(usize);

impl PageRenderer for FailingRenderer {
    fn render(&self, page: &StaticPage) -> Result<RgbImage, ExportError> {
        if page.number == self.0 {
            return Err(ExportError::Render {
                page: page.number,
                message: "boom".to_string(),
            });
        }
        Ok(RgbImage::new(4, 4))
    }
}

fn chars(s: &str) -> f32 {
    s.chars().count() as f32
}

// === Static substitution ===

#[test]
fn test_static_page_carries_text_and_style() {
    let pages = StaticPage::from_document(&doc_with_boxes());
    assert_eq!(pages.len(), 2);

    let first = &pages[0];
    assert_eq!(first.number, 1);
    assert_eq!(first.background, WHITE);
    let block = &first.blocks[0];
    assert_eq!(block.text, "Hello");
    assert_eq!(block.font_family, "Georgia");
    assert_eq!(block.font_size, 20.0);
    assert!(block.italic && !block.bold);
    assert_eq!(block.align, TextAlign::Right);
    assert_eq!(block.ink, BLACK);
    assert_eq!(block.rect.left, Px(50.0));
}

#[test]
fn test_static_page_inverts_ink_on_dark_paper() {
    let pages = StaticPage::from_document(&doc_with_boxes());
    assert_eq!(pages[1].background, BLACK);
    assert_eq!(pages[1].blocks[0].ink, WHITE);
    assert_eq!(pages[1].size, PageSize::Letter);
}

#[test]
fn test_pixel_size_scales_content_area() {
    let pages = StaticPage::from_document(&doc_with_boxes());
    assert_eq!(pages[0].pixel_size(1.0), (794, 1123));
    assert_eq!(pages[0].pixel_size(2.0), (1588, 2246));
    assert_eq!(pages[1].pixel_size(0.5), (408, 528));
}

// === Layout ===

#[test]
fn test_layout_wraps_on_words() {
    let lines = layout_lines("the quick brown fox", 10.0, chars);
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["the quick", "brown fox"]);
    assert!(!lines[0].ends_paragraph);
    assert!(lines[1].ends_paragraph);
}

#[test]
fn test_layout_breaks_long_words() {
    let lines = layout_lines("abcdefghijkl", 5.0, chars);
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["abcde", "fghij", "kl"]);
}

#[test]
fn test_layout_keeps_hard_breaks_and_blank_lines() {
    let lines = layout_lines("a\n\nb", 10.0, chars);
    assert_eq!(
        lines,
        vec![
            Line { text: "a".to_string(), ends_paragraph: true },
            Line { text: String::new(), ends_paragraph: true },
            Line { text: "b".to_string(), ends_paragraph: true },
        ]
    );
}

#[test]
fn test_layout_keeps_indentation_and_space_runs() {
    let lines = layout_lines("    indented   gap", 1000.0, chars);
    assert_eq!(
        lines,
        vec![Line { text: "    indented   gap".to_string(), ends_paragraph: true }]
    );
}

#[test]
fn test_layout_drops_spaces_at_wrap() {
    let lines = layout_lines("aa   bb  ", 4.0, chars);
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["aa", "bb"]);
}

// === Alignment ===

fn owned(runs: &[(f32, &str)]) -> Vec<(f32, String)> {
    runs.iter().map(|(x, t)| (*x, t.to_string())).collect()
}

#[test]
fn test_justify_fills_width_exactly() {
    let runs = justify("a bb ccc", 10.0, 12.0, chars);
    assert_eq!(runs, owned(&[(10.0, "a"), (14.0, "bb"), (19.0, "ccc")]));
    let (x, last) = &runs[2];
    assert_eq!(x + chars(last), 22.0);
}

#[test]
fn test_justify_stretches_wide_gaps_more() {
    let runs = justify("a  b c", 0.0, 9.0, chars);
    assert_eq!(runs, owned(&[(0.0, "a"), (5.0, "b"), (8.0, "c")]));
}

#[test]
fn test_justify_keeps_indentation() {
    let runs = justify("  a b", 0.0, 7.0, chars);
    assert_eq!(runs, owned(&[(2.0, "a"), (6.0, "b")]));
}

#[test]
fn test_justify_single_word_is_left_aligned() {
    assert_eq!(justify("word", 3.0, 20.0, chars), owned(&[(3.0, "word")]));
}

#[test]
fn test_paragraph_end_is_not_stretched() {
    let last = Line { text: "a b".to_string(), ends_paragraph: true };
    assert_eq!(line_runs(&last, TextAlign::Justify, 5.0, 20.0, chars), owned(&[(5.0, "a b")]));

    let inner = Line { text: "a b".to_string(), ends_paragraph: false };
    let runs = line_runs(&inner, TextAlign::Justify, 5.0, 20.0, chars);
    assert_eq!(runs, owned(&[(5.0, "a"), (24.0, "b")]));
}

#[test]
fn test_alignment_offsets() {
    assert_eq!(align_offset(TextAlign::Left, 10.0, 4.0), 0.0);
    assert_eq!(align_offset(TextAlign::Center, 10.0, 4.0), 3.0);
    assert_eq!(align_offset(TextAlign::Right, 10.0, 4.0), 6.0);
    assert_eq!(align_offset(TextAlign::Justify, 10.0, 4.0), 0.0);

    let line = Line { text: "abcd".to_string(), ends_paragraph: true };
    assert_eq!(line_runs(&line, TextAlign::Right, 2.0, 10.0, chars), owned(&[(8.0, "abcd")]));
    assert_eq!(line_runs(&line, TextAlign::Center, 2.0, 10.0, chars), owned(&[(5.0, "abcd")]));
}

#[test]
fn test_underline_spans_all_runs() {
    let runs = owned(&[(2.0, "ab"), (6.0, "cde")]);
    assert_eq!(underline_span(&runs, chars), Some((2.0, 9.0)));
    assert_eq!(underline_span(&owned(&[(3.0, "")]), chars), None);
    assert_eq!(underline_span(&[], chars), None);
}

// === Raster renderer ===

#[test]
fn test_raster_renderer_paints_background() {
    let renderer = RasterRenderer::new(FontSet::default(), 0.25);
    let mut doc = Document::new(PageSize::A4, PaperColor::Inverted);
    // whitespace-only boxes draw nothing and need no font
    let mut b = TextBox::new(TextBoxId::new("1"), PaperColor::Inverted, "Arial", Px(14.0));
    b.content = "  ".to_string();
    doc.add_text_box(1, b);

    let page = StaticPage::from_page(doc.page(1).unwrap());
    let image = renderer.render(&page).unwrap();
    assert_eq!(image.dimensions(), page.pixel_size(0.25));
    assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

#[test]
fn test_raster_renderer_without_font_fails() {
    let renderer = RasterRenderer::new(FontSet::default(), 1.0);
    let pages = StaticPage::from_document(&doc_with_boxes());
    assert!(matches!(renderer.render(&pages[0]), Err(ExportError::MissingFont(f)) if f == "Georgia"));
}

#[test]
fn test_font_set_reports_unreadable_font() {
    let mut config = ExportConfig::default();
    config.fonts.insert("Arial".to_string(), PathBuf::from("/nonexistent/arial.ttf"));
    assert!(matches!(FontSet::load(&config), Err(ExportError::Font { .. })));
}

#[test]
fn test_font_set_resolve_empty() {
    assert!(FontSet::default().resolve("Arial", true, false).is_none());
}

// === PDF ===

#[test]
fn test_pdf_pages_get_media_boxes() {
    let pages = vec![
        PageImage { size: PageSize::A4, image: RgbImage::from_pixel(8, 8, WHITE) },
        PageImage { size: PageSize::Letter, image: RgbImage::from_pixel(8, 8, BLACK) },
    ];
    let mut buffer = Vec::new();
    pdf::write_pdf(&pages, &mut buffer).unwrap();
    assert!(buffer.starts_with(b"%PDF-"));

    let doc = lopdf::Document::load_mem(&buffer).unwrap();
    let ids: Vec<_> = doc.get_pages().into_values().collect();
    assert_eq!(ids.len(), 2);

    let media_box = |i: usize| -> Vec<f32> {
        doc.get_object(ids[i])
            .and_then(|o| o.as_dict())
            .and_then(|d| d.get(b"MediaBox"))
            .and_then(|m| m.as_array())
            .unwrap()
            .iter()
            .map(|v| v.as_float().unwrap())
            .collect()
    };
    let a4 = media_box(0);
    assert!((a4[2] - 595.28).abs() < 0.01);
    assert!((a4[3] - 841.89).abs() < 0.01);
    let letter = media_box(1);
    assert!((letter[2] - 612.0).abs() < 0.01);
    assert!((letter[3] - 792.0).abs() < 0.01);
}

#[test]
fn test_pdf_requires_pages() {
    assert!(matches!(pdf::assemble(&[]), Err(ExportError::Empty)));
}

// === Pipeline ===

#[test]
fn test_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.pdf");
    let pages = StaticPage::from_document(&doc_with_boxes());
    let progress = Progress::new(pages.len());

    let written = export_pdf(&SolidRenderer, &pages, &dest, &progress).unwrap();
    assert_eq!(written, dest);
    assert_eq!(progress.current(), 2);
    let bytes = std::fs::read(&dest).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_failed_export_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.pdf");
    let pages = StaticPage::from_document(&doc_with_boxes());

    let err = export_pdf(&FailingRenderer(2), &pages, &dest, &Progress::new(2)).unwrap_err();
    assert!(matches!(err, ExportError::Render { page: 2, .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_default_destination_name() {
    let dest = default_destination(std::path::Path::new("/tmp"));
    let name = dest.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("document_") && name.ends_with(".pdf"));
}
