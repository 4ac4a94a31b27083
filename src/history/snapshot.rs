use serde::{Deserialize, Serialize};

use crate::document::{Document, PageSize, PaperColor, TextBox};

/// Immutable, fully detached copy of the whole document at one point in time.
///
/// Field names and value formats are the persisted-state contract: the same
/// shape is written to document files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub pages: Vec<PageSnapshot>,
    pub page_count: usize,
    pub active_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub number: usize,
    pub color: PaperColor,
    pub size: PageSize,
    pub text_boxes: Vec<TextBoxSnapshot>,
}

/// Style and geometry values are stored CSS-style: `"50px"`, `"bold"`,
/// `"italic"`, `"underline"`, `"center"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBoxSnapshot {
    pub id: String,
    pub content: String,
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub text_align: String,
    pub paper: PaperColor,
}

pub const WEIGHT_NORMAL: &str = "normal";
pub const WEIGHT_BOLD: &str = "bold";
pub const STYLE_NORMAL: &str = "normal";
pub const STYLE_ITALIC: &str = "italic";
pub const DECORATION_NONE: &str = "none";
pub const DECORATION_UNDERLINE: &str = "underline";

impl TextBoxSnapshot {
    fn capture(text_box: &TextBox) -> Self {
        Self {
            id: text_box.id.as_str().to_string(),
            content: text_box.content.clone(),
            left: text_box.left.to_string(),
            top: text_box.top.to_string(),
            width: text_box.width.to_string(),
            height: text_box.height.to_string(),
            font_family: text_box.font_family.clone(),
            font_size: text_box.font_size.to_string(),
            font_weight: if text_box.bold { WEIGHT_BOLD } else { WEIGHT_NORMAL }.to_string(),
            font_style: if text_box.italic { STYLE_ITALIC } else { STYLE_NORMAL }.to_string(),
            text_decoration: if text_box.underline {
                DECORATION_UNDERLINE
            } else {
                DECORATION_NONE
            }
            .to_string(),
            text_align: text_box.align.name().to_string(),
            paper: text_box.paper,
        }
    }
}

/// Walk the live document in page order, then box order, and copy every
/// attribute. Never fails; an empty document gives an empty snapshot.
pub fn capture_state(doc: &Document, active_page: usize) -> Snapshot {
    let pages = doc
        .pages()
        .iter()
        .map(|page| PageSnapshot {
            number: page.number,
            color: page.color,
            size: page.size,
            text_boxes: page.text_boxes.iter().map(TextBoxSnapshot::capture).collect(),
        })
        .collect();

    Snapshot {
        pages,
        page_count: doc.page_count(),
        active_page,
    }
}

impl Snapshot {
    pub fn text_box_count(&self) -> usize {
        self.pages.iter().map(|p| p.text_boxes.len()).sum()
    }
}
