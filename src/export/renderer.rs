//! Rasterizing static pages
//!
//! The export pipeline only depends on [`PageRenderer`]; [`RasterRenderer`]
//! is the shipped implementation, drawing text with imageproc and TrueType
//! faces loaded through ab_glyph.

use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect as PixelRect;
use tracing::debug;

use crate::config::ExportConfig;
use crate::document::TextAlign;

use super::static_page::{StaticBlock, StaticPage, BLOCK_PADDING, LINE_HEIGHT};
use super::ExportError;

/// Turns one static page into a page-sized raster
pub trait PageRenderer: Sync {
    fn render(&self, page: &StaticPage) -> Result<RgbImage, ExportError>;
}

/// Tried in order when no default font is configured
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn load_font(path: &Path) -> Result<FontVec, ExportError> {
    let data = std::fs::read(path).map_err(|e| ExportError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    FontVec::try_from_vec(data).map_err(|e| ExportError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Font faces keyed by lowercased family name, plus a fallback
#[derive(Default)]
pub struct FontSet {
    faces: HashMap<String, FontVec>,
    fallback: Option<FontVec>,
}

impl FontSet {
    pub fn load(config: &ExportConfig) -> Result<Self, ExportError> {
        let mut faces = HashMap::new();
        for (name, path) in &config.fonts {
            faces.insert(name.trim().to_lowercase(), load_font(path)?);
        }

        let fallback = match &config.default_font {
            Some(path) => Some(load_font(path)?),
            None => SYSTEM_FONTS
                .iter()
                .map(Path::new)
                .filter(|p| p.exists())
                .find_map(|p| load_font(p).ok()),
        };
        debug!(faces = faces.len(), fallback = fallback.is_some(), "fonts loaded");

        Ok(Self { faces, fallback })
    }

    /// Best face for a family and style. The flag says whether bold still
    /// has to be faked. A missing italic face falls back to upright.
    pub fn resolve(&self, family: &str, bold: bool, italic: bool) -> Option<(&FontVec, bool)> {
        let family = family.trim().to_lowercase();
        let face = |suffix: &str| self.faces.get(&format!("{} {}", family, suffix));

        if bold && italic {
            if let Some(f) = face("bold italic") {
                return Some((f, false));
            }
        }
        if bold {
            if let Some(f) = face("bold") {
                return Some((f, false));
            }
        }
        if italic {
            if let Some(f) = face("italic") {
                return Some((f, bold));
            }
        }
        self.faces
            .get(&family)
            .or(self.fallback.as_ref())
            .map(|f| (f, bold))
    }
}

/// One laid-out line of a block
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    /// Last line of a paragraph (never stretched when justifying)
    pub ends_paragraph: bool,
}

/// Greedy word wrap that keeps spacing as typed. Hard newlines start
/// paragraphs, leading indentation stays on a paragraph's first line and
/// runs of spaces between words survive. Whitespace at a wrap point is
/// dropped. Words wider than the block are broken between characters.
pub fn layout_lines<F>(text: &str, max_width: f32, measure: F) -> Vec<Line>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let body = paragraph.trim_start();
        let mut current = paragraph[..paragraph.len() - body.len()].to_string();
        let mut has_word = false;
        let mut gap = "";
        for run in whitespace_runs(body) {
            if run.starts_with(char::is_whitespace) {
                gap = run;
                continue;
            }
            if has_word {
                let candidate = format!("{}{}{}", current, gap, run);
                if measure(&candidate) <= max_width {
                    current = candidate;
                    continue;
                }
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    ends_paragraph: false,
                });
            }
            has_word = true;
            for c in run.chars() {
                current.push(c);
                if current.chars().count() > 1 && measure(&current) > max_width {
                    current.pop();
                    lines.push(Line {
                        text: std::mem::take(&mut current),
                        ends_paragraph: false,
                    });
                    current.push(c);
                }
            }
        }
        lines.push(Line {
            text: current.trim_end().to_string(),
            ends_paragraph: true,
        });
    }
    lines
}

/// Alternating runs of whitespace and non-whitespace
fn whitespace_runs(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        let blank = rest.chars().next()?.is_whitespace();
        let end = rest
            .find(|c: char| c.is_whitespace() != blank)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

/// Distance from the block's left edge to where a line of `line_width` starts
pub fn align_offset(align: TextAlign, width: f32, line_width: f32) -> f32 {
    match align {
        TextAlign::Left | TextAlign::Justify => 0.0,
        TextAlign::Center => (width - line_width) / 2.0,
        TextAlign::Right => width - line_width,
    }
}

/// Positioned text runs for one line. Justified lines are stretched unless
/// they end a paragraph.
pub fn line_runs<F>(
    line: &Line,
    align: TextAlign,
    left: f32,
    width: f32,
    measure: F,
) -> Vec<(f32, String)>
where
    F: Fn(&str) -> f32,
{
    if align == TextAlign::Justify && !line.ends_paragraph {
        return justify(&line.text, left, width, measure);
    }
    let x = left + align_offset(align, width, measure(&line.text));
    vec![(x, line.text.clone())]
}

/// Spread words so the line fills `width` exactly. The extra space is
/// shared between gaps in proportion to how many spaces each holds, and
/// leading indentation is kept.
pub fn justify<F>(text: &str, left: f32, width: f32, measure: F) -> Vec<(f32, String)>
where
    F: Fn(&str) -> f32,
{
    let text = text.trim_end();
    let body = text.trim_start();
    let indent = text.len() - body.len();
    let mut words = Vec::new();
    let mut gaps = Vec::new();
    let mut offset = indent;
    for run in whitespace_runs(body) {
        if run.starts_with(char::is_whitespace) {
            gaps.push(run.chars().count());
        } else {
            words.push((offset, run));
        }
        offset += run.len();
    }

    let spaces: usize = gaps.iter().sum();
    let extra = width - measure(text);
    if words.len() < 2 || spaces == 0 || extra <= 0.0 {
        return vec![(left, text.to_string())];
    }

    let mut stretched = 0usize;
    words
        .into_iter()
        .enumerate()
        .map(|(i, (at, word))| {
            if i > 0 {
                stretched += gaps[i - 1];
            }
            let x = left + measure(&text[..at]) + extra * stretched as f32 / spaces as f32;
            (x, word.to_string())
        })
        .collect()
}

/// Horizontal extent covered by a line's runs
pub fn underline_span<F>(runs: &[(f32, String)], measure: F) -> Option<(f32, f32)>
where
    F: Fn(&str) -> f32,
{
    let start = runs.iter().map(|(x, _)| *x).fold(f32::MAX, f32::min);
    let end = runs
        .iter()
        .map(|(x, text)| x + measure(text))
        .fold(f32::MIN, f32::max);
    (end > start).then_some((start, end))
}

/// Advance width of `text` including kerning
pub fn text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0;
    let mut prev = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

pub struct RasterRenderer {
    fonts: FontSet,
    scale: f32,
}

impl RasterRenderer {
    pub fn new(fonts: FontSet, scale: f32) -> Self {
        Self { fonts, scale }
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        Ok(Self::new(FontSet::load(config)?, config.scale))
    }

    fn render_block(&self, canvas: &mut RgbImage, block: &StaticBlock) -> Result<(), ExportError> {
        if block.text.trim().is_empty() {
            return Ok(());
        }
        let (font, fake_bold) = self
            .fonts
            .resolve(&block.font_family, block.bold, block.italic)
            .ok_or_else(|| ExportError::MissingFont(block.font_family.clone()))?;

        let s = self.scale;
        let px = PxScale::from(block.font_size as f32 * s);
        let pad = BLOCK_PADDING as f32 * s;
        let left = block.rect.left.value() as f32 * s + pad;
        let top = block.rect.top.value() as f32 * s + pad;
        let width = (block.rect.width.value() as f32 * s - 2.0 * pad).max(1.0);
        let advance = block.font_size as f32 * s * LINE_HEIGHT as f32;

        let scaled = font.as_scaled(px);
        // glyph box centered in the line box
        let leading = (advance - scaled.height()) / 2.0;
        let measure = |t: &str| text_width(font, px, t);

        for (i, line) in layout_lines(&block.text, width, measure).iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let y = top + i as f32 * advance + leading;
            let runs = line_runs(line, block.align, left, width, measure);
            for (x, text) in &runs {
                self.draw_run(canvas, font, px, *x, y, text, block.ink, fake_bold);
            }

            if !block.underline {
                continue;
            }
            if let Some((start, end)) = underline_span(&runs, measure) {
                let thickness = (block.font_size as f32 * s / 14.0).round().max(1.0);
                let baseline = y + scaled.ascent();
                let rect = PixelRect::at(start.round() as i32, (baseline + thickness).round() as i32)
                    .of_size((end - start).round().max(1.0) as u32, thickness as u32);
                draw_filled_rect_mut(canvas, rect, block.ink);
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_run(
        &self,
        canvas: &mut RgbImage,
        font: &FontVec,
        px: PxScale,
        x: f32,
        y: f32,
        text: &str,
        ink: Rgb<u8>,
        fake_bold: bool,
    ) {
        draw_text_mut(canvas, ink, x.round() as i32, y.round() as i32, px, font, text);
        if fake_bold {
            let offset = (self.scale * 0.5).max(1.0);
            draw_text_mut(canvas, ink, (x + offset).round() as i32, y.round() as i32, px, font, text);
        }
    }
}

impl PageRenderer for RasterRenderer {
    fn render(&self, page: &StaticPage) -> Result<RgbImage, ExportError> {
        let (width, height) = page.pixel_size(self.scale);
        let mut canvas = RgbImage::from_pixel(width, height, page.background);
        for block in &page.blocks {
            self.render_block(&mut canvas, block)?;
        }
        Ok(canvas)
    }
}
