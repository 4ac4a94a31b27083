//! The stacked page view
//!
//! [`ViewGeometry`] maps between terminal cells and page pixels for one
//! frame; [`PageView`] draws the pages and their boxes through it. Boxes are
//! bound to drawing and hit-testing by [`TextBoxId`] only, so a document
//! rebuilt by undo/redo needs nothing re-attached.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style as RatStyle};
use ratatui::text::Text;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::document::{Document, Page, Rect as PageRect, TextAlign, TextBox, TextBoxId};
use crate::editor::{floor_char_boundary, Pointer, ResizeHandle};
use crate::ui::style::Style;
use crate::visibility::PageTracker;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;
/// Never zoom in past this many page pixels per column
pub const MIN_PX_PER_COL: f64 = 4.0;
/// Desk columns kept free on each side of the widest page
const MARGIN_COLS: u16 = 2;

const HANDLE_SYMBOL: &str = "■";
const CARET_SYMBOL: char = '▏';

/// Where one page sits in the stacked layout, in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub number: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A run of cells in signed coordinates, end exclusive. May lie partly or
/// wholly outside the drawable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl CellSpan {
    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= self.x0 && col < self.x1 && row >= self.y0 && row < self.y1
    }

    /// The visible part of the span inside `area`
    pub fn clip(&self, area: Rect) -> Option<Rect> {
        let x0 = self.x0.max(area.x as i64);
        let y0 = self.y0.max(area.y as i64);
        let x1 = self.x1.min(area.right() as i64);
        let y1 = self.y1.min(area.bottom() as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
    }

    /// The border handle under a cell, if the cell lies on the span's edge
    pub fn handle_at(&self, col: i64, row: i64) -> Option<ResizeHandle> {
        if !self.contains(col, row) {
            return None;
        }
        let north = row == self.y0;
        let south = row == self.y1 - 1;
        let west = col == self.x0;
        let east = col == self.x1 - 1;
        match (north, south, east, west) {
            (true, _, true, _) => Some(ResizeHandle::NE),
            (true, _, _, true) => Some(ResizeHandle::NW),
            (_, true, true, _) => Some(ResizeHandle::SE),
            (_, true, _, true) => Some(ResizeHandle::SW),
            (true, _, _, _) => Some(ResizeHandle::N),
            (_, true, _, _) => Some(ResizeHandle::S),
            (_, _, true, _) => Some(ResizeHandle::E),
            (_, _, _, true) => Some(ResizeHandle::W),
            _ => None,
        }
    }

    /// Cell where a handle is drawn
    pub fn handle_cell(&self, handle: ResizeHandle) -> (i64, i64) {
        let mid_x = self.x0 + (self.x1 - self.x0) / 2;
        let mid_y = self.y0 + (self.y1 - self.y0) / 2;
        let x = if handle.west() {
            self.x0
        } else if handle.east() {
            self.x1 - 1
        } else {
            mid_x
        };
        let y = if handle.north() {
            self.y0
        } else if handle.south() {
            self.y1 - 1
        } else {
            mid_y
        };
        (x, y)
    }
}

/// What lies under a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// Inside a box
    Body(TextBoxId),
    /// On a box border
    Handle(TextBoxId, ResizeHandle),
    /// Bare paper
    Page(usize),
}

/// Cell/pixel mapping for one frame
#[derive(Debug, Clone)]
pub struct ViewGeometry {
    area: Rect,
    px_per_col: f64,
    px_per_row: f64,
    scroll: f64,
    frames: Vec<PageFrame>,
}

impl ViewGeometry {
    /// Fit the widest page to `area`, centering every page on the desk
    pub fn new(area: Rect, doc: &Document, tracker: &PageTracker) -> Self {
        let widest = doc
            .pages()
            .iter()
            .map(|p| p.content_size().0.value())
            .fold(0.0, f64::max);
        let usable = area.width.saturating_sub(2 * MARGIN_COLS).max(1) as f64;
        let px_per_col = (widest / usable).max(MIN_PX_PER_COL);
        let px_per_row = px_per_col * CELL_ASPECT;
        let desk = area.width as f64 * px_per_col;

        let frames = doc
            .pages()
            .iter()
            .filter_map(|page| {
                let extent = tracker.extent(page.number)?;
                let width = page.content_size().0.value();
                Some(PageFrame {
                    number: page.number,
                    left: ((desk - width) / 2.0).max(0.0),
                    top: extent.top,
                    width,
                    height: extent.height,
                })
            })
            .collect();

        Self {
            area,
            px_per_col,
            px_per_row,
            scroll: tracker.scroll(),
            frames,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn frames(&self) -> &[PageFrame] {
        &self.frames
    }

    pub fn frame(&self, number: usize) -> Option<&PageFrame> {
        self.frames.iter().find(|f| f.number == number)
    }

    /// Height of the area in page pixels
    pub fn viewport_px(&self) -> f64 {
        self.area.height as f64 * self.px_per_row
    }

    /// Page pixels covered by one terminal row
    pub fn px_per_row(&self) -> f64 {
        self.px_per_row
    }

    fn span(&self, left: f64, top: f64, right: f64, bottom: f64) -> CellSpan {
        let x0 = (left / self.px_per_col).floor() as i64;
        let x1 = (right / self.px_per_col).ceil() as i64;
        let y0 = ((top - self.scroll) / self.px_per_row).floor() as i64;
        let y1 = ((bottom - self.scroll) / self.px_per_row).ceil() as i64;
        CellSpan {
            x0: self.area.x as i64 + x0,
            y0: self.area.y as i64 + y0,
            x1: self.area.x as i64 + x1.max(x0 + 1),
            y1: self.area.y as i64 + y1.max(y0 + 1),
        }
    }

    pub fn page_span(&self, frame: &PageFrame) -> CellSpan {
        self.span(
            frame.left,
            frame.top,
            frame.left + frame.width,
            frame.top + frame.height,
        )
    }

    /// Cells of a box; always at least two each way so it has a border
    pub fn box_span(&self, frame: &PageFrame, rect: &PageRect) -> CellSpan {
        let mut span = self.span(
            frame.left + rect.left.value(),
            frame.top + rect.top.value(),
            frame.left + rect.right().value(),
            frame.top + rect.bottom().value(),
        );
        span.x1 = span.x1.max(span.x0 + 2);
        span.y1 = span.y1.max(span.y0 + 2);
        span
    }

    /// The center of a cell in layout pixels. Gestures only use deltas, so
    /// the layout space is as good as any page's.
    pub fn pointer_at(&self, col: u16, row: u16) -> Pointer {
        let x = (col as f64 - self.area.x as f64 + 0.5) * self.px_per_col;
        let y = self.scroll + (row as f64 - self.area.y as f64 + 0.5) * self.px_per_row;
        Pointer::new(x, y)
    }

    /// The topmost thing under a cell
    pub fn hit(&self, doc: &Document, col: u16, row: u16) -> Option<Hit> {
        let (col, row) = (col as i64, row as i64);
        for frame in &self.frames {
            if !self.page_span(frame).contains(col, row) {
                continue;
            }
            let page = doc.page(frame.number)?;
            for text_box in page.text_boxes.iter().rev() {
                let span = self.box_span(frame, &text_box.rect());
                if !span.contains(col, row) {
                    continue;
                }
                return Some(match span.handle_at(col, row) {
                    Some(handle) => Hit::Handle(text_box.id.clone(), handle),
                    None => Hit::Body(text_box.id.clone()),
                });
            }
            return Some(Hit::Page(frame.number));
        }
        None
    }
}

/// Widget drawing every visible page with its boxes
pub struct PageView<'a> {
    doc: &'a Document,
    geometry: &'a ViewGeometry,
    style: &'a Style,
    selection: Option<&'a TextBoxId>,
    caret: Option<usize>,
    show_handles: bool,
    active_handle: Option<ResizeHandle>,
}

impl<'a> PageView<'a> {
    pub fn new(doc: &'a Document, geometry: &'a ViewGeometry, style: &'a Style) -> Self {
        Self {
            doc,
            geometry,
            style,
            selection: None,
            caret: None,
            show_handles: false,
            active_handle: None,
        }
    }

    pub fn selection(mut self, id: Option<&'a TextBoxId>) -> Self {
        self.selection = id;
        self
    }

    /// Show a caret at this byte offset of the selected box
    pub fn caret(mut self, at: Option<usize>) -> Self {
        self.caret = at;
        self
    }

    /// Draw resize handles around the selected box
    pub fn handles(mut self, show: bool, active: Option<ResizeHandle>) -> Self {
        self.show_handles = show;
        self.active_handle = active;
        self
    }

    fn render_page(&self, frame: &PageFrame, page: &Page, buf: &mut Buffer) {
        let area = self.geometry.area();
        let span = self.geometry.page_span(frame);
        let cells = match span.clip(area) {
            Some(c) => c,
            None => return,
        };
        let paper = self.style.paper(page.color);
        Clear.render(cells, buf);
        buf.set_style(cells, paper);

        if span.y0 >= area.y as i64 {
            let label = format!(" {} ", page.number);
            let x = cells.right().saturating_sub(label.len() as u16);
            buf.set_string(x, cells.y, label, paper.patch(self.style.page_label()));
        }

        for text_box in &page.text_boxes {
            self.render_box(frame, page, text_box, buf);
        }
    }

    fn render_box(&self, frame: &PageFrame, page: &Page, text_box: &TextBox, buf: &mut Buffer) {
        let area = self.geometry.area();
        let span = self.geometry.box_span(frame, &text_box.rect());
        let cells = match span.clip(area) {
            Some(c) => c,
            None => return,
        };
        let selected = self.selection == Some(&text_box.id);

        let mut borders = Borders::NONE;
        if span.y0 >= cells.y as i64 {
            borders |= Borders::TOP;
        }
        if span.y1 <= cells.bottom() as i64 {
            borders |= Borders::BOTTOM;
        }
        if span.x0 >= cells.x as i64 {
            borders |= Borders::LEFT;
        }
        if span.x1 <= cells.right() as i64 {
            borders |= Borders::RIGHT;
        }
        // text rows scrolled off above the visible part
        let hidden = (cells.y as i64 - span.y0 - 1).max(0) as u16;

        let paper = self.style.paper(page.color);
        let mut text_style = paper;
        if text_box.bold {
            text_style = text_style.add_modifier(Modifier::BOLD);
        }
        if text_box.italic {
            text_style = text_style.add_modifier(Modifier::ITALIC);
        }
        if text_box.underline {
            text_style = text_style.add_modifier(Modifier::UNDERLINED);
        }

        let content = match (selected, self.caret) {
            (true, Some(at)) => {
                let mut shown = text_box.content.clone();
                shown.insert(floor_char_boundary(&shown, at), CARET_SYMBOL);
                shown
            }
            _ => text_box.content.clone(),
        };

        let block = Block::default()
            .borders(borders)
            .border_style(paper.patch(self.style.box_border(selected)));
        let paragraph = Paragraph::new(Text::styled(content, text_style))
            .style(paper)
            .alignment(alignment(text_box.align))
            .wrap(Wrap { trim: false })
            .scroll((hidden, 0))
            .block(block);

        Clear.render(cells, buf);
        paragraph.render(cells, buf);

        if selected && self.show_handles {
            self.render_handles(&span, buf);
        }
    }

    fn render_handles(&self, span: &CellSpan, buf: &mut Buffer) {
        let area = self.geometry.area();
        for handle in ResizeHandle::ALL {
            let (x, y) = span.handle_cell(handle);
            let visible = x >= area.x as i64
                && x < area.right() as i64
                && y >= area.y as i64
                && y < area.bottom() as i64;
            if !visible {
                continue;
            }
            let style: RatStyle = self.style.handle(self.active_handle == Some(handle));
            buf.get_mut(x as u16, y as u16)
                .set_symbol(HANDLE_SYMBOL)
                .set_style(style);
        }
    }
}

fn alignment(align: TextAlign) -> Alignment {
    match align {
        TextAlign::Left | TextAlign::Justify => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::Right => Alignment::Right,
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style.background());
        for frame in self.geometry.frames() {
            if let Some(page) = self.doc.page(frame.number) {
                self.render_page(frame, page, buf);
            }
        }
    }
}
