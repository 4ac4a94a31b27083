use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// A length in CSS pixels.
///
/// Serialized snapshots carry lengths as strings with a unit suffix
/// (`"50px"`), so `Display` and `FromStr` are the wire format.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Px(pub f64);

impl Px {
    pub const ZERO: Px = Px(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }

    pub fn min(self, other: Px) -> Px {
        Px(self.0.min(other.0))
    }

    /// Clamp into `[lo, hi]`; when the range is inverted `lo` wins.
    pub fn clamp_to(self, lo: Px, hi: Px) -> Px {
        Px(self.0.min(hi.0).max(lo.0))
    }
}

impl std::ops::Add for Px {
    type Output = Px;
    fn add(self, rhs: Px) -> Px {
        Px(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Px {
    type Output = Px;
    fn sub(self, rhs: Px) -> Px {
        Px(self.0 - rhs.0)
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePxError(pub String);

impl fmt::Display for ParsePxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a pixel length: '{}'", self.0)
    }
}

impl std::error::Error for ParsePxError {}

fn px_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)px\s*$").unwrap())
}

impl FromStr for Px {
    type Err = ParsePxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = px_pattern()
            .captures(s)
            .ok_or_else(|| ParsePxError(s.to_string()))?;
        let value: f64 = caps[1].parse().map_err(|_| ParsePxError(s.to_string()))?;
        if !value.is_finite() {
            return Err(ParsePxError(s.to_string()));
        }
        Ok(Px(value))
    }
}

/// An axis-aligned rectangle in page content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: Px,
    pub top: Px,
    pub width: Px,
    pub height: Px,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Px(left),
            top: Px(top),
            width: Px(width),
            height: Px(height),
        }
    }

    pub fn right(&self) -> Px {
        self.left + self.width
    }

    pub fn bottom(&self) -> Px {
        self.top + self.height
    }

    pub fn contains(&self, x: Px, y: Px) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}
