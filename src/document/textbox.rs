use std::fmt;
use std::str::FromStr;

use super::page::PaperColor;
use super::units::{Px, Rect};

/// Default geometry of a freshly created box
pub const DEFAULT_LEFT: Px = Px(50.0);
pub const DEFAULT_TOP: Px = Px(50.0);
pub const DEFAULT_WIDTH: Px = Px(300.0);
pub const DEFAULT_HEIGHT: Px = Px(100.0);

/// Stable identity token of a text box, preserved across undo/redo
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextBoxId(String);

impl TextBoxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextBoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal text alignment inside a box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn name(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            "justify" => Ok(TextAlign::Justify),
            other => Err(format!("Unknown alignment: {}", other)),
        }
    }
}

/// A floating, styled text region owned by one page
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub id: TextBoxId,
    pub left: Px,
    pub top: Px,
    pub width: Px,
    pub height: Px,
    pub content: String,
    pub font_family: String,
    pub font_size: Px,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
    /// Mirrors the owning page's color
    pub paper: PaperColor,
}

impl TextBox {
    pub fn new(id: TextBoxId, paper: PaperColor, font_family: &str, font_size: Px) -> Self {
        Self {
            id,
            left: DEFAULT_LEFT,
            top: DEFAULT_TOP,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            content: String::new(),
            font_family: font_family.to_string(),
            font_size,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
            paper,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.left = rect.left;
        self.top = rect.top;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Move the box so it lies inside a `width` x `height` content area.
    /// Size is left alone; a box larger than the area is pinned at 0.
    pub fn clamp_into(&mut self, width: Px, height: Px) {
        let max_left = (width - self.width).max(Px::ZERO);
        let max_top = (height - self.height).max(Px::ZERO);
        if self.left > max_left {
            self.left = max_left;
        }
        if self.top > max_top {
            self.top = max_top;
        }
    }
}
