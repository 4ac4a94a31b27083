//! Drag and resize geometry
//!
//! A gesture remembers where the pointer went down and the box's geometry at
//! that moment; every pointer update recomputes the geometry from those
//! origins, clamped to the page content area.

use std::fmt;
use std::str::FromStr;

use crate::document::{Px, Rect, TextBoxId};

/// Smallest width a resize may produce
pub const MIN_WIDTH: Px = Px(100.0);
/// Smallest height a resize may produce
pub const MIN_HEIGHT: Px = Px(40.0);

/// One of the eight resize handles around a box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn north(&self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn south(&self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    pub fn east(&self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn west(&self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::NE => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::SE => "se",
            ResizeHandle::S => "s",
            ResizeHandle::SW => "sw",
            ResizeHandle::W => "w",
            ResizeHandle::NW => "nw",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .iter()
            .copied()
            .find(|h| h.name() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown resize handle: {}", s))
    }
}

/// Pointer position in page content coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub x: Px,
    pub y: Px,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x: Px(x), y: Px(y) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub id: TextBoxId,
    pub origin: Rect,
    last: Pointer,
    current: Rect,
    moved: bool,
}

impl DragGesture {
    pub fn begin(id: TextBoxId, origin: Rect, pointer: Pointer) -> Self {
        Self {
            id,
            origin,
            last: pointer,
            current: origin,
            moved: false,
        }
    }

    /// Follow the pointer, keeping the box inside `container`
    pub fn update(&mut self, pointer: Pointer, container: (Px, Px)) -> Rect {
        let dx = pointer.x - self.last.x;
        let dy = pointer.y - self.last.y;
        self.last = pointer;
        self.moved = true;

        let (width, height) = container;
        let max_left = (width - self.current.width).max(Px::ZERO);
        let max_top = (height - self.current.height).max(Px::ZERO);
        self.current.left = (self.current.left + dx).clamp_to(Px::ZERO, max_left);
        self.current.top = (self.current.top + dy).clamp_to(Px::ZERO, max_top);
        self.current
    }

    /// Whether any pointer movement happened during the gesture
    pub fn moved(&self) -> bool {
        self.moved
    }

    pub fn current(&self) -> Rect {
        self.current
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub id: TextBoxId,
    pub handle: ResizeHandle,
    pub origin: Rect,
    start: Pointer,
    current: Rect,
}

impl ResizeGesture {
    pub fn begin(id: TextBoxId, handle: ResizeHandle, origin: Rect, pointer: Pointer) -> Self {
        Self {
            id,
            handle,
            origin,
            start: pointer,
            current: origin,
        }
    }

    /// Recompute the box from the pointer offset since the gesture began
    pub fn update(&mut self, pointer: Pointer, container: (Px, Px)) -> Rect {
        let (container_width, container_height) = container;
        let dx = pointer.x - self.start.x;
        let dy = pointer.y - self.start.y;
        let start = self.origin;
        let mut next = start;

        if self.handle.east() {
            let limit = container_width - start.left;
            next.width = (start.width + dx).min(limit).max(MIN_WIDTH);
        }
        if self.handle.west() {
            let delta = dx.max(Px(-start.left.value()));
            next.width = (start.width - delta).max(MIN_WIDTH);
            next.left = start.left + (start.width - next.width);
        }
        if self.handle.south() {
            let limit = container_height - start.top;
            next.height = (start.height + dy).min(limit).max(MIN_HEIGHT);
        }
        if self.handle.north() {
            let delta = dy.max(Px(-start.top.value()));
            next.height = (start.height - delta).max(MIN_HEIGHT);
            next.top = start.top + (start.height - next.height);
        }

        self.current = next;
        next
    }

    pub fn current(&self) -> Rect {
        self.current
    }
}

/// The modal geometry interaction currently owning the pointer, if any
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Drag(DragGesture),
    Resize(ResizeGesture),
}

impl Gesture {
    pub fn id(&self) -> &TextBoxId {
        match self {
            Gesture::Drag(g) => &g.id,
            Gesture::Resize(g) => &g.id,
        }
    }

    pub fn origin(&self) -> Rect {
        match self {
            Gesture::Drag(g) => g.origin,
            Gesture::Resize(g) => g.origin,
        }
    }
}
