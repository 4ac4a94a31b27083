use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};

use crate::document::{PageSize, PaperColor, Px, TextAlign};
use crate::editor::StyleFlag;
use crate::input::is_escape;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Write(Option<PathBuf>),
    Quit,
    ForceQuit,
    WriteQuit,
    Export(Option<PathBuf>),
    Font(String),
    Size(Px),
    Align(TextAlign),
    /// Flip bold, italic or underline on the selected box
    Toggle(StyleFlag),
    /// Paper color of a page (the active one when `page` is `None`)
    Color { color: PaperColor, page: Option<usize> },
    PageSize { size: PageSize, page: Option<usize> },
    Page(usize),
    Theme(String),
    ThemeList,
    /// Recognized command with a bad argument
    Invalid(String),
    Unknown(String),
}

impl Command {
    /// Parse a command line (without the leading ':'). `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };
        let arg = if rest.is_empty() { None } else { Some(rest) };

        let command = match (name, arg) {
            ("w", path) => Command::Write(path.map(PathBuf::from)),
            ("q", None) => Command::Quit,
            ("q!", None) => Command::ForceQuit,
            ("wq" | "x", None) => Command::WriteQuit,
            ("export", path) => Command::Export(path.map(PathBuf::from)),
            ("font", Some(family)) => Command::Font(family.to_string()),
            ("size", Some(size)) => match parse_font_size(size) {
                Ok(px) => Command::Size(px),
                Err(e) => Command::Invalid(e),
            },
            ("align", Some(align)) => match align.parse() {
                Ok(align) => Command::Align(align),
                Err(e) => Command::Invalid(e),
            },
            ("color", Some(args)) => match parse_with_page::<PaperColor>(args) {
                Ok((color, page)) => Command::Color { color, page },
                Err(e) => Command::Invalid(e),
            },
            ("pagesize", Some(args)) => match parse_with_page::<PageSize>(args) {
                Ok((size, page)) => Command::PageSize { size, page },
                Err(e) => Command::Invalid(e),
            },
            ("page", Some(n)) => match parse_page_number(n) {
                Ok(n) => Command::Page(n),
                Err(e) => Command::Invalid(e),
            },
            ("bold", None) => Command::Toggle(StyleFlag::Bold),
            ("italic", None) => Command::Toggle(StyleFlag::Italic),
            ("underline", None) => Command::Toggle(StyleFlag::Underline),
            ("theme", Some(name)) => Command::Theme(name.to_string()),
            ("theme" | "themes", None) => Command::ThemeList,
            ("font" | "size" | "align" | "color" | "pagesize" | "page", None) => {
                Command::Invalid(format!("{} needs an argument", name))
            }
            _ => Command::Unknown(trimmed.to_string()),
        };
        Some(command)
    }
}

/// `16`, `16px` or `12.5`
fn parse_font_size(s: &str) -> Result<Px, String> {
    let px = s
        .parse::<Px>()
        .or_else(|_| s.parse::<f64>().map(Px))
        .map_err(|_| format!("Invalid font size: {}", s))?;
    if !px.value().is_finite() || px <= Px::ZERO {
        return Err(format!("Invalid font size: {}", s));
    }
    Ok(px)
}

fn parse_page_number(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Invalid page number: {}", s)),
    }
}

/// `<value> [page]`
fn parse_with_page<T>(args: &str) -> Result<(T, Option<usize>), String>
where
    T: std::str::FromStr<Err = String>,
{
    let mut parts = args.split_whitespace();
    let value = parts.next().unwrap_or_default().parse::<T>()?;
    let page = parts.next().map(parse_page_number).transpose()?;
    if let Some(extra) = parts.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }
    Ok((value, page))
}

/// Command-line editing
pub struct CommandHandler {
    pub buffer: String,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn start(&mut self) {
        self.buffer.clear();
    }

    /// Returns the finished line on Enter
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        if is_escape(key) {
            self.buffer.clear();
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(std::mem::take(&mut self.buffer)),
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                None
            }
            _ => None,
        }
    }
}
