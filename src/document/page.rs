use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::textbox::TextBox;
use super::units::Px;

/// Paper background of a page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperColor {
    /// Dark text on light paper
    #[default]
    Default,
    /// Light text on dark paper
    Inverted,
}

impl PaperColor {
    pub fn name(&self) -> &'static str {
        match self {
            PaperColor::Default => "default",
            PaperColor::Inverted => "inverted",
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["default", "inverted"]
    }
}

impl fmt::Display for PaperColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaperColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "white" => Ok(PaperColor::Default),
            "inverted" | "black" => Ok(PaperColor::Inverted),
            other => Err(format!("Unknown paper color: {}", other)),
        }
    }
}

/// Page size class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl PageSize {
    pub fn name(&self) -> &'static str {
        match self {
            PageSize::A4 => "a4",
            PageSize::A3 => "a3",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }

    /// Size of the page content area in CSS pixels (96 dpi)
    pub fn content_size(&self) -> (Px, Px) {
        match self {
            PageSize::A4 => (Px(794.0), Px(1123.0)),
            PageSize::A3 => (Px(1123.0), Px(1587.0)),
            PageSize::Letter => (Px(816.0), Px(1056.0)),
            PageSize::Legal => (Px(816.0), Px(1344.0)),
        }
    }

    /// Physical size in PDF points (1/72 inch), portrait
    pub fn points(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["a4", "a3", "letter", "legal"]
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "a3" => Ok(PageSize::A3),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!("Unknown page size: {}", other)),
        }
    }
}

/// One page of the document
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based position, contiguous across the document
    pub number: usize,
    pub color: PaperColor,
    pub size: PageSize,
    pub text_boxes: Vec<TextBox>,
}

impl Page {
    pub fn new(number: usize, color: PaperColor, size: PageSize) -> Self {
        Self {
            number,
            color,
            size,
            text_boxes: Vec::new(),
        }
    }

    pub fn content_size(&self) -> (Px, Px) {
        self.size.content_size()
    }

    /// Change the paper color, re-tagging every box on the page
    pub fn set_color(&mut self, color: PaperColor) {
        self.color = color;
        for text_box in self.text_boxes.iter_mut() {
            text_box.paper = color;
        }
    }

    /// Change the size class and pull boxes back inside the new content area
    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
        let (width, height) = size.content_size();
        for text_box in self.text_boxes.iter_mut() {
            text_box.clamp_into(width, height);
        }
    }
}
