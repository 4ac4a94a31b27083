//! Tracking which page is "active" while the page stack scrolls
//!
//! Pages are laid out top to bottom with a fixed gap. The active page is the
//! one with the largest visible fraction of its own height, provided that
//! fraction exceeds [`MIN_VISIBLE_RATIO`].

use crate::document::Document;

/// Vertical gap between stacked pages, in page pixels
pub const PAGE_GAP: f64 = 40.0;

/// A page must show more than this fraction of itself to become active
pub const MIN_VISIBLE_RATIO: f64 = 0.1;

/// Vertical extent of one page in the stacked layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageExtent {
    pub number: usize,
    pub top: f64,
    pub height: f64,
}

impl PageExtent {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageTracker {
    extents: Vec<PageExtent>,
    scroll: f64,
    viewport: f64,
}

impl PageTracker {
    pub fn new(doc: &Document) -> Self {
        let mut tracker = Self::default();
        tracker.rebuild(doc);
        tracker
    }

    /// Recompute the layout for a (possibly brand new) page tree
    pub fn rebuild(&mut self, doc: &Document) {
        let mut top = 0.0;
        self.extents = doc
            .pages()
            .iter()
            .map(|page| {
                let (_, height) = page.content_size();
                let extent = PageExtent {
                    number: page.number,
                    top,
                    height: height.value(),
                };
                top += height.value() + PAGE_GAP;
                extent
            })
            .collect();
        self.clamp_scroll();
    }

    pub fn extents(&self) -> &[PageExtent] {
        &self.extents
    }

    pub fn extent(&self, number: usize) -> Option<&PageExtent> {
        self.extents.iter().find(|e| e.number == number)
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    /// Total height of the stacked layout
    pub fn total_height(&self) -> f64 {
        self.extents.last().map(|e| e.bottom()).unwrap_or(0.0)
    }

    pub fn set_viewport(&mut self, height: f64) {
        self.viewport = height.max(0.0);
        self.clamp_scroll();
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    pub fn scroll_to_page(&mut self, number: usize) {
        if let Some(top) = self.extent(number).map(|e| e.top) {
            self.scroll = top;
            self.clamp_scroll();
        }
    }

    fn clamp_scroll(&mut self) {
        let max = (self.total_height() - self.viewport).max(0.0);
        self.scroll = self.scroll.clamp(0.0, max);
    }

    /// Fraction of a page's height currently inside the viewport
    pub fn visible_ratio(&self, extent: &PageExtent) -> f64 {
        if extent.height <= 0.0 {
            return 0.0;
        }
        let view_top = self.scroll;
        let view_bottom = self.scroll + self.viewport;
        let overlap = extent.bottom().min(view_bottom) - extent.top.max(view_top);
        (overlap.max(0.0) / extent.height).min(1.0)
    }

    /// The page that should be treated as active, if any is visible enough
    pub fn most_visible(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for extent in &self.extents {
            let ratio = self.visible_ratio(extent);
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((extent.number, ratio));
            }
        }
        best.filter(|&(_, r)| r > MIN_VISIBLE_RATIO).map(|(n, _)| n)
    }
}
