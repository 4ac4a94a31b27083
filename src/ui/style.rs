use std::path::Path;

use ratatui::style::{Color, Modifier, Style as RatStyle};
use serde::{Deserialize, Serialize};

use crate::document::PaperColor;
use crate::mode::Mode;

/// Color that can be serialized/deserialized
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// Named color: "red", "blue", "cyan", etc.
    Named(NamedColor),
    /// RGB color: [255, 128, 0]
    Rgb([u8; 3]),
    /// 256-color index: 42
    Indexed(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
    Reset,
}

impl From<NamedColor> for Color {
    fn from(n: NamedColor) -> Color {
        match n {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::Gray => Color::Gray,
            NamedColor::DarkGray => Color::DarkGray,
            NamedColor::LightRed => Color::LightRed,
            NamedColor::LightGreen => Color::LightGreen,
            NamedColor::LightYellow => Color::LightYellow,
            NamedColor::LightBlue => Color::LightBlue,
            NamedColor::LightMagenta => Color::LightMagenta,
            NamedColor::LightCyan => Color::LightCyan,
            NamedColor::White => Color::White,
            NamedColor::Reset => Color::Reset,
        }
    }
}

impl From<ThemeColor> for Color {
    fn from(tc: ThemeColor) -> Color {
        match tc {
            ThemeColor::Named(n) => n.into(),
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(r, g, b),
            ThemeColor::Indexed(i) => Color::Indexed(i),
        }
    }
}

/// Style definition for a single element
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<ThemeColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<ThemeColor>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub dim: bool,
}

impl ElementStyle {
    pub fn fg(color: ThemeColor) -> Self {
        Self { fg: Some(color), ..Default::default() }
    }

    pub fn with_bg(mut self, color: ThemeColor) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn to_ratatui(&self) -> RatStyle {
        let mut style = RatStyle::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg.into());
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg.into());
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underline {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

/// Complete theme configuration. Fields missing from a theme file are taken
/// from the light theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,

    /// Desk area around the pages; `None` keeps the terminal default
    pub background: Option<ThemeColor>,

    // Pages
    pub paper: ElementStyle,
    pub paper_inverted: ElementStyle,
    pub page_label: ElementStyle,

    // Text boxes
    pub box_border: ElementStyle,
    pub box_selected: ElementStyle,
    pub handle: ElementStyle,
    pub handle_active: ElementStyle,

    // Status bar
    pub status_bar: ElementStyle,
    pub status_mode_normal: ElementStyle,
    pub status_mode_insert: ElementStyle,
    pub status_mode_command: ElementStyle,
    pub status_mode_move: ElementStyle,
    pub status_mode_resize: ElementStyle,
    pub status_dirty: ElementStyle,
    pub status_progress: ElementStyle,

    // Messages
    pub message_info: ElementStyle,
    pub message_warning: ElementStyle,
    pub message_error: ElementStyle,

    // Command line
    pub command_line: ElementStyle,
    pub command_prompt: ElementStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Dark theme with black background
    pub fn dark() -> Self {
        use NamedColor::*;
        let c = ThemeColor::Named;
        Self {
            name: "dark".to_string(),
            background: Some(c(Black)),
            paper: ElementStyle::fg(c(Black)).with_bg(c(Gray)),
            paper_inverted: ElementStyle::fg(c(White)).with_bg(c(DarkGray)),
            page_label: ElementStyle::fg(c(DarkGray)),
            box_border: ElementStyle::fg(c(Blue)),
            box_selected: ElementStyle::fg(c(LightCyan)).with_bold(),
            handle: ElementStyle::fg(c(Black)).with_bg(c(LightCyan)),
            handle_active: ElementStyle::fg(c(Black)).with_bg(c(LightYellow)).with_bold(),
            status_bar: ElementStyle::fg(c(White)).with_bg(c(DarkGray)),
            status_mode_normal: ElementStyle::fg(c(Black)).with_bg(c(LightBlue)).with_bold(),
            status_mode_insert: ElementStyle::fg(c(Black)).with_bg(c(LightGreen)).with_bold(),
            status_mode_command: ElementStyle::fg(c(Black)).with_bg(c(LightYellow)).with_bold(),
            status_mode_move: ElementStyle::fg(c(Black)).with_bg(c(LightMagenta)).with_bold(),
            status_mode_resize: ElementStyle::fg(c(Black)).with_bg(c(LightCyan)).with_bold(),
            status_dirty: ElementStyle::fg(c(LightRed)).with_bg(c(DarkGray)).with_bold(),
            status_progress: ElementStyle::fg(c(LightYellow)).with_bg(c(DarkGray)),
            message_info: ElementStyle::fg(c(White)),
            message_warning: ElementStyle::fg(c(LightYellow)),
            message_error: ElementStyle::fg(c(LightRed)).with_bold(),
            command_line: ElementStyle::fg(c(White)),
            command_prompt: ElementStyle::fg(c(LightCyan)),
        }
    }

    /// Light theme (default)
    pub fn light() -> Self {
        use NamedColor::*;
        let c = ThemeColor::Named;
        Self {
            name: "light".to_string(),
            background: None,
            paper: ElementStyle::fg(c(Black)).with_bg(c(White)),
            paper_inverted: ElementStyle::fg(c(White)).with_bg(c(Black)),
            page_label: ElementStyle::fg(c(Gray)).with_dim(),
            box_border: ElementStyle::fg(c(Gray)),
            box_selected: ElementStyle::fg(c(Blue)).with_bold(),
            handle: ElementStyle::fg(c(White)).with_bg(c(Blue)),
            handle_active: ElementStyle::fg(c(Black)).with_bg(c(Yellow)).with_bold(),
            status_bar: ElementStyle::fg(c(Black)).with_bg(c(Gray)),
            status_mode_normal: ElementStyle::fg(c(White)).with_bg(c(Blue)).with_bold(),
            status_mode_insert: ElementStyle::fg(c(White)).with_bg(c(Green)).with_bold(),
            status_mode_command: ElementStyle::fg(c(Black)).with_bg(c(Yellow)).with_bold(),
            status_mode_move: ElementStyle::fg(c(White)).with_bg(c(Magenta)).with_bold(),
            status_mode_resize: ElementStyle::fg(c(White)).with_bg(c(Cyan)).with_bold(),
            status_dirty: ElementStyle::fg(c(Red)).with_bg(c(Gray)).with_bold(),
            status_progress: ElementStyle::fg(c(Blue)).with_bg(c(Gray)),
            message_info: ElementStyle::fg(c(Black)),
            message_warning: ElementStyle::fg(c(Yellow)),
            message_error: ElementStyle::fg(c(Red)).with_bold(),
            command_line: ElementStyle::fg(c(Black)),
            command_prompt: ElementStyle::fg(c(Blue)),
        }
    }

    /// Solarized dark theme
    pub fn solarized_dark() -> Self {
        let base03 = ThemeColor::Rgb([0, 43, 54]);
        let base02 = ThemeColor::Rgb([7, 54, 66]);
        let base01 = ThemeColor::Rgb([88, 110, 117]);
        let base0 = ThemeColor::Rgb([131, 148, 150]);
        let base1 = ThemeColor::Rgb([147, 161, 161]);
        let base3 = ThemeColor::Rgb([253, 246, 227]);
        let yellow = ThemeColor::Rgb([181, 137, 0]);
        let orange = ThemeColor::Rgb([203, 75, 22]);
        let red = ThemeColor::Rgb([220, 50, 47]);
        let magenta = ThemeColor::Rgb([211, 54, 130]);
        let blue = ThemeColor::Rgb([38, 139, 210]);
        let cyan = ThemeColor::Rgb([42, 161, 152]);
        let green = ThemeColor::Rgb([133, 153, 0]);

        Self {
            name: "solarized-dark".to_string(),
            background: Some(base03),
            paper: ElementStyle::fg(base03).with_bg(base3),
            paper_inverted: ElementStyle::fg(base1).with_bg(base02),
            page_label: ElementStyle::fg(base01),
            box_border: ElementStyle::fg(base01),
            box_selected: ElementStyle::fg(blue).with_bold(),
            handle: ElementStyle::fg(base03).with_bg(cyan),
            handle_active: ElementStyle::fg(base03).with_bg(yellow).with_bold(),
            status_bar: ElementStyle::fg(base1).with_bg(base02),
            status_mode_normal: ElementStyle::fg(base03).with_bg(blue).with_bold(),
            status_mode_insert: ElementStyle::fg(base03).with_bg(green).with_bold(),
            status_mode_command: ElementStyle::fg(base03).with_bg(yellow).with_bold(),
            status_mode_move: ElementStyle::fg(base03).with_bg(magenta).with_bold(),
            status_mode_resize: ElementStyle::fg(base03).with_bg(cyan).with_bold(),
            status_dirty: ElementStyle::fg(red).with_bg(base02).with_bold(),
            status_progress: ElementStyle::fg(yellow).with_bg(base02),
            message_info: ElementStyle::fg(base0),
            message_warning: ElementStyle::fg(orange),
            message_error: ElementStyle::fg(red).with_bold(),
            command_line: ElementStyle::fg(base0),
            command_prompt: ElementStyle::fg(cyan),
        }
    }

    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read theme file: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse theme file: {}", e))
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "solarized" | "solarized-dark" => Some(Self::solarized_dark()),
            _ => None,
        }
    }

    /// A built-in name, or else a path to a theme file
    pub fn resolve(name_or_path: &str) -> Result<Self, String> {
        if let Some(theme) = Self::by_name(name_or_path) {
            return Ok(theme);
        }
        let path = Path::new(name_or_path);
        if path.exists() {
            return Self::from_file(path);
        }
        Err(format!(
            "Unknown theme '{}'. Available: {}",
            name_or_path,
            Self::builtin_names().join(", ")
        ))
    }

    /// List available built-in themes
    pub fn builtin_names() -> &'static [&'static str] {
        &["dark", "light", "solarized-dark"]
    }
}

/// Runtime style manager
pub struct Style {
    pub theme: Theme,
}

impl Style {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn background(&self) -> RatStyle {
        match self.theme.background {
            Some(c) => RatStyle::default().bg(c.into()),
            None => RatStyle::default(),
        }
    }

    pub fn paper(&self, color: PaperColor) -> RatStyle {
        match color {
            PaperColor::Default => self.theme.paper.to_ratatui(),
            PaperColor::Inverted => self.theme.paper_inverted.to_ratatui(),
        }
    }

    pub fn page_label(&self) -> RatStyle {
        self.theme.page_label.to_ratatui()
    }

    pub fn box_border(&self, selected: bool) -> RatStyle {
        if selected {
            self.theme.box_selected.to_ratatui()
        } else {
            self.theme.box_border.to_ratatui()
        }
    }

    pub fn handle(&self, active: bool) -> RatStyle {
        if active {
            self.theme.handle_active.to_ratatui()
        } else {
            self.theme.handle.to_ratatui()
        }
    }

    pub fn status_bar(&self) -> RatStyle {
        self.theme.status_bar.to_ratatui()
    }

    pub fn status_mode(&self, mode: Mode) -> RatStyle {
        match mode {
            Mode::Normal => self.theme.status_mode_normal.to_ratatui(),
            Mode::Insert => self.theme.status_mode_insert.to_ratatui(),
            Mode::Command => self.theme.status_mode_command.to_ratatui(),
            Mode::Move => self.theme.status_mode_move.to_ratatui(),
            Mode::Resize => self.theme.status_mode_resize.to_ratatui(),
        }
    }

    pub fn status_dirty(&self) -> RatStyle {
        self.theme.status_dirty.to_ratatui()
    }

    pub fn status_progress(&self) -> RatStyle {
        self.theme.status_progress.to_ratatui()
    }

    pub fn message_info(&self) -> RatStyle {
        self.theme.message_info.to_ratatui()
    }

    pub fn message_warning(&self) -> RatStyle {
        self.theme.message_warning.to_ratatui()
    }

    pub fn message_error(&self) -> RatStyle {
        self.theme.message_error.to_ratatui()
    }

    pub fn command_line(&self) -> RatStyle {
        self.theme.command_line.to_ratatui()
    }

    pub fn command_prompt(&self) -> RatStyle {
        self.theme.command_prompt.to_ratatui()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_themes_resolve() {
        for name in Theme::builtin_names() {
            let theme = Theme::by_name(name).unwrap();
            assert_eq!(&theme.name, name);
        }
        assert_eq!(Theme::by_name("Solarized").unwrap().name, "solarized-dark");
        assert!(Theme::by_name("neon").is_none());
    }

    #[test]
    fn test_partial_theme_file_falls_back_to_light() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = \"mine\"").unwrap();
        writeln!(file, "[box_selected]").unwrap();
        writeln!(file, "fg = [255, 0, 0]").unwrap();
        writeln!(file, "bold = true").unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "mine");
        assert_eq!(theme.box_selected.fg, Some(ThemeColor::Rgb([255, 0, 0])));
        assert!(theme.box_selected.bold);
        assert_eq!(theme.paper, Theme::light().paper);

        let resolved = Theme::resolve(file.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved, theme);
    }

    #[test]
    fn test_resolve_unknown_lists_builtins() {
        let err = Theme::resolve("/no/such/theme.toml").unwrap_err();
        assert!(err.contains("dark, light, solarized-dark"));
    }

    #[test]
    fn test_paper_styles_follow_color() {
        let style = Style::with_theme(Theme::light());
        assert_eq!(style.paper(PaperColor::Default).bg, Some(Color::White));
        assert_eq!(style.paper(PaperColor::Inverted).bg, Some(Color::Black));
        assert_eq!(style.status_mode(Mode::Insert).bg, Some(Color::Green));
    }
}
