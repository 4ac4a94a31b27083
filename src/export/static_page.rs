use image::Rgb;

use crate::document::{Document, Page, PageSize, PaperColor, Rect, TextAlign};

/// Inner padding between a block's edge and its text
pub const BLOCK_PADDING: f64 = 8.0;

/// Line advance as a multiple of the font size
pub const LINE_HEIGHT: f64 = 1.5;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Paper fill for a color variant
pub fn paper_fill(color: PaperColor) -> Rgb<u8> {
    match color {
        PaperColor::Default => WHITE,
        PaperColor::Inverted => BLACK,
    }
}

/// Text ink that contrasts a paper variant
pub fn ink_for(paper: PaperColor) -> Rgb<u8> {
    match paper {
        PaperColor::Default => BLACK,
        PaperColor::Inverted => WHITE,
    }
}

/// Non-interactive stand-in for a text box: only what ends up on paper
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBlock {
    pub rect: Rect,
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
    pub ink: Rgb<u8>,
}

/// A page frozen for rasterizing: paper plus static text blocks
#[derive(Debug, Clone, PartialEq)]
pub struct StaticPage {
    pub number: usize,
    pub size: PageSize,
    pub background: Rgb<u8>,
    pub blocks: Vec<StaticBlock>,
}

impl StaticPage {
    pub fn from_page(page: &Page) -> Self {
        let blocks = page
            .text_boxes
            .iter()
            .map(|b| StaticBlock {
                rect: b.rect(),
                text: b.content.clone(),
                font_family: b.font_family.clone(),
                font_size: b.font_size.value(),
                bold: b.bold,
                italic: b.italic,
                underline: b.underline,
                align: b.align,
                ink: ink_for(b.paper),
            })
            .collect();

        Self {
            number: page.number,
            size: page.size,
            background: paper_fill(page.color),
            blocks,
        }
    }

    /// Freeze every page of a document, in order
    pub fn from_document(doc: &Document) -> Vec<StaticPage> {
        doc.pages().iter().map(StaticPage::from_page).collect()
    }

    /// Raster size in pixels at the given scale
    pub fn pixel_size(&self, scale: f32) -> (u32, u32) {
        let (width, height) = self.size.content_size();
        (
            (width.value() * scale as f64).round().max(1.0) as u32,
            (height.value() * scale as f64).round().max(1.0) as u32,
        )
    }
}
