//! # Text Metrics & Line Layout
//!
//! Measures strings and rasterizes caption text using the Spleen bitmap
//! font family, scaled to the requested point size with nearest-neighbor
//! sampling.
//!
//! ## Architecture
//!
//! ```text
//! (text, style, dpi) → measure() → (width_px, height_px)
//!
//! [Line, Line, ...] → stack() → per-line y offsets + total height
//!
//! GlyphRenderer::draw_line() → pixels on an RgbImage
//! ```
//!
//! Measurement is a pure function of its inputs. Reported heights carry a
//! ×0.9 deflation so stacked lines sit visually tight rather than at the
//! font's nominal cell height. Bold is rendered by double-striking with a
//! scale-proportional horizontal offset; Spleen ships no bold cut.

use std::collections::HashMap;

use image::{Rgb, RgbImage};
use spleen_font::{FONT_12X24, PSF2Font};

use crate::error::LabelError;
use crate::units::UnitConverter;

/// Base glyph cell width in the Spleen 12×24 font.
const BASE_WIDTH: usize = 12;
/// Base glyph cell height in the Spleen 12×24 font.
const BASE_HEIGHT: usize = 24;

/// Font/weight selection for one run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Point size; pixel meaning comes from the job's DPI.
    pub size_pt: f64,
    /// Double-strike bold.
    pub bold: bool,
}

impl TextStyle {
    /// Regular weight at the given point size.
    pub fn regular(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: false,
        }
    }

    /// Bold weight at the given point size.
    pub fn bold(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: true,
        }
    }

    /// Glyph cell height in pixels, deflated ×0.9 for tight line spacing.
    pub fn cell_height(&self, conv: &UnitConverter) -> u32 {
        (conv.pt_to_px(self.size_pt) * 9 / 10).max(1)
    }

    /// Glyph cell width in pixels (Spleen cells are 1:2).
    pub fn cell_width(&self, conv: &UnitConverter) -> u32 {
        (self.cell_height(conv) as usize * BASE_WIDTH / BASE_HEIGHT).max(1) as u32
    }

    /// Horizontal double-strike offset for bold, zero for regular.
    fn bold_offset(&self, conv: &UnitConverter) -> u32 {
        if self.bold {
            (self.cell_height(conv) / BASE_HEIGHT as u32).max(1)
        } else {
            0
        }
    }
}

/// Measure a string at a style and resolution.
///
/// Multi-line input (explicit `\n`) reports the widest line and the
/// stacked height. The empty string has zero width but still occupies one
/// line slot.
pub fn measure(text: &str, style: TextStyle, conv: &UnitConverter) -> (u32, u32) {
    let cell_w = style.cell_width(conv);
    let cell_h = style.cell_height(conv);
    let bold = style.bold_offset(conv);

    let mut width = 0u32;
    let mut lines = 0u32;
    for line in text.split('\n') {
        let chars = line.chars().count() as u32;
        let line_w = if chars == 0 { 0 } else { chars * cell_w + bold };
        width = width.max(line_w);
        lines += 1;
    }

    (width, lines * cell_h)
}

/// One run of same-styled text within a line.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub style: TextStyle,
}

/// A caption line: one or more segments sharing a baseline.
///
/// A prefixed line measures its prefix, then starts the value at the
/// prefix's right edge, so values align across labels even when prefixes
/// differ in width.
#[derive(Debug, Clone)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    /// Single-segment line.
    pub fn plain(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                style,
            }],
        }
    }

    /// Bold prefix followed by a regular-weight value at the same size.
    pub fn prefixed(prefix: impl Into<String>, value: impl Into<String>, size_pt: f64) -> Self {
        Self {
            segments: vec![
                Segment {
                    text: prefix.into(),
                    style: TextStyle::bold(size_pt),
                },
                Segment {
                    text: value.into(),
                    style: TextStyle::regular(size_pt),
                },
            ],
        }
    }

    /// Total width and line height (max over segments).
    pub fn measure(&self, conv: &UnitConverter) -> (u32, u32) {
        let mut width = 0u32;
        let mut height = 0u32;
        for seg in &self.segments {
            let (w, h) = measure(&seg.text, seg.style, conv);
            width += w;
            height = height.max(h.max(seg.style.cell_height(conv)));
        }
        (width, height)
    }
}

/// Stacking direction for a block of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First line at the top edge of the block.
    TopDown,
    /// Last line flush with the bottom edge of the block.
    BottomUp,
}

/// Per-line top y offsets plus the block's total height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStack {
    pub offsets: Vec<u32>,
    pub height: u32,
}

/// Stack lines vertically with a fixed gap between them.
///
/// Offsets are each line's top edge relative to the block's top. For
/// uniform line heights both directions coincide; they differ only when
/// line heights vary.
pub fn stack(lines: &[Line], gap_px: u32, direction: Direction, conv: &UnitConverter) -> LineStack {
    let heights: Vec<u32> = lines.iter().map(|l| l.measure(conv).1).collect();
    let total: u32 =
        heights.iter().sum::<u32>() + gap_px * (heights.len().saturating_sub(1)) as u32;

    let mut offsets = vec![0u32; heights.len()];
    match direction {
        Direction::TopDown => {
            let mut y = 0u32;
            for (i, h) in heights.iter().enumerate() {
                offsets[i] = y;
                y += h + gap_px;
            }
        }
        Direction::BottomUp => {
            let mut y = total;
            for (i, h) in heights.iter().enumerate().rev() {
                y -= h;
                offsets[i] = y;
                y = y.saturating_sub(gap_px);
            }
        }
    }

    LineStack {
        offsets,
        height: total,
    }
}

/// Rasterizes glyphs onto an `RgbImage`.
///
/// Owns a per-job glyph cache (base-resolution bitmaps keyed by char); the
/// PSF2 font data itself is a compile-time constant, so concurrent jobs
/// share nothing mutable.
pub struct GlyphRenderer {
    cache: HashMap<char, Vec<u8>>,
}

impl GlyphRenderer {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Base 12×24 bitmap for a character, 0/1 per pixel.
    ///
    /// Unknown characters fall back to a box outline, matching classic
    /// bitmap-font behavior.
    fn base_glyph(&mut self, ch: char) -> Result<Vec<u8>, LabelError> {
        if let Some(bitmap) = self.cache.get(&ch) {
            return Ok(bitmap.clone());
        }

        let mut font = PSF2Font::new(FONT_12X24)
            .map_err(|e| LabelError::Font(format!("spleen 12x24: {e:?}")))?;

        let mut bitmap = vec![0u8; BASE_WIDTH * BASE_HEIGHT];
        let utf8 = ch.to_string();
        if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
            for (y, row) in glyph.enumerate() {
                for (x, on) in row.enumerate() {
                    if y < BASE_HEIGHT && x < BASE_WIDTH && on {
                        bitmap[y * BASE_WIDTH + x] = 1;
                    }
                }
            }
        } else {
            draw_box(&mut bitmap);
        }

        self.cache.insert(ch, bitmap.clone());
        Ok(bitmap)
    }

    /// Draw a single-line string; returns the advance width in pixels.
    pub fn draw_text(
        &mut self,
        canvas: &mut RgbImage,
        x0: u32,
        y0: u32,
        text: &str,
        style: TextStyle,
        conv: &UnitConverter,
        color: Rgb<u8>,
    ) -> Result<u32, LabelError> {
        let cell_w = style.cell_width(conv);
        let cell_h = style.cell_height(conv);
        let bold = style.bold_offset(conv);

        let mut pen_x = x0;
        for ch in text.chars() {
            let bitmap = self.base_glyph(ch)?;

            for dy in 0..cell_h {
                let sy = dy as usize * BASE_HEIGHT / cell_h as usize;
                for dx in 0..cell_w {
                    let sx = dx as usize * BASE_WIDTH / cell_w as usize;
                    if bitmap[sy * BASE_WIDTH + sx] == 1 {
                        put_pixel_checked(canvas, pen_x + dx, y0 + dy, color);
                        if bold > 0 {
                            put_pixel_checked(canvas, pen_x + dx + bold, y0 + dy, color);
                        }
                    }
                }
            }

            pen_x += cell_w;
        }

        let drawn = if text.is_empty() { 0 } else { pen_x - x0 + bold };
        Ok(drawn)
    }

    /// Draw a line's segments left to right on a shared bottom baseline.
    pub fn draw_line(
        &mut self,
        canvas: &mut RgbImage,
        x0: u32,
        y0: u32,
        line: &Line,
        conv: &UnitConverter,
        color: Rgb<u8>,
    ) -> Result<(), LabelError> {
        let (_, line_h) = line.measure(conv);

        let mut pen_x = x0;
        for seg in &line.segments {
            let seg_h = seg.style.cell_height(conv);
            let y = y0 + line_h.saturating_sub(seg_h);
            let advance = self.draw_text(canvas, pen_x, y, &seg.text, seg.style, conv, color)?;
            pen_x += advance;
        }
        Ok(())
    }
}

impl Default for GlyphRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn put_pixel_checked(canvas: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>) {
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}

/// Box outline fallback for characters outside the font.
fn draw_box(bitmap: &mut [u8]) {
    for x in 0..BASE_WIDTH {
        bitmap[x] = 1;
        bitmap[(BASE_HEIGHT - 1) * BASE_WIDTH + x] = 1;
    }
    for y in 0..BASE_HEIGHT {
        bitmap[y * BASE_WIDTH] = 1;
        bitmap[y * BASE_WIDTH + BASE_WIDTH - 1] = 1;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONV: UnitConverter = UnitConverter::new(300);

    #[test]
    fn test_measure_scales_with_length() {
        let style = TextStyle::regular(18.0);
        let (w1, h1) = measure("a", style, &CONV);
        let (w5, h5) = measure("aaaaa", style, &CONV);
        assert_eq!(w5, w1 * 5);
        assert_eq!(h1, h5);
    }

    #[test]
    fn test_measure_empty_string() {
        let style = TextStyle::regular(18.0);
        let (w, h) = measure("", style, &CONV);
        assert_eq!(w, 0);
        // Still occupies one line slot.
        assert_eq!(h, style.cell_height(&CONV));
    }

    #[test]
    fn test_measure_multiline() {
        let style = TextStyle::regular(18.0);
        let (w, h) = measure("room 101\nb", style, &CONV);
        let (w_long, h_one) = measure("room 101", style, &CONV);
        assert_eq!(w, w_long);
        assert_eq!(h, h_one * 2);
    }

    #[test]
    fn test_deflation_factor() {
        // 18pt at 300 DPI is nominally 75px; deflated ×0.9 → 67.
        let style = TextStyle::regular(18.0);
        assert_eq!(style.cell_height(&CONV), 67);
    }

    #[test]
    fn test_bold_is_wider() {
        let (regular, _) = measure("sn:", TextStyle::regular(14.0), &CONV);
        let (bold, _) = measure("sn:", TextStyle::bold(14.0), &CONV);
        assert!(bold > regular);
    }

    #[test]
    fn test_prefixed_line_width_is_sum() {
        let line = Line::prefixed("inv: ", "0042", 14.0);
        let (prefix_w, _) = measure("inv: ", TextStyle::bold(14.0), &CONV);
        let (value_w, _) = measure("0042", TextStyle::regular(14.0), &CONV);
        assert_eq!(line.measure(&CONV).0, prefix_w + value_w);
    }

    #[test]
    fn test_stack_top_down() {
        let style = TextStyle::regular(18.0);
        let h = style.cell_height(&CONV);
        let lines = vec![
            Line::plain("a", style),
            Line::plain("b", style),
            Line::plain("c", style),
        ];
        let stacked = stack(&lines, 10, Direction::TopDown, &CONV);
        assert_eq!(stacked.offsets, vec![0, h + 10, 2 * (h + 10)]);
        assert_eq!(stacked.height, 3 * h + 20);
    }

    #[test]
    fn test_stack_bottom_up_matches_for_uniform_lines() {
        let style = TextStyle::regular(18.0);
        let lines = vec![Line::plain("a", style), Line::plain("b", style)];
        let down = stack(&lines, 6, Direction::TopDown, &CONV);
        let up = stack(&lines, 6, Direction::BottomUp, &CONV);
        assert_eq!(down, up);
    }

    #[test]
    fn test_stack_bottom_up_mixed_heights() {
        let lines = vec![
            Line::plain("big", TextStyle::regular(28.0)),
            Line::plain("small", TextStyle::regular(14.0)),
        ];
        let up = stack(&lines, 0, Direction::BottomUp, &CONV);
        let small_h = TextStyle::regular(14.0).cell_height(&CONV);
        // Last line flush with the bottom edge.
        assert_eq!(up.offsets[1] + small_h, up.height);
    }

    #[test]
    fn test_stack_empty() {
        let stacked = stack(&[], 10, Direction::TopDown, &CONV);
        assert_eq!(stacked.height, 0);
        assert!(stacked.offsets.is_empty());
    }

    #[test]
    fn test_draw_text_marks_pixels() {
        let mut renderer = GlyphRenderer::new();
        let mut canvas = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
        let advance = renderer
            .draw_text(
                &mut canvas,
                0,
                0,
                "A",
                TextStyle::regular(18.0),
                &CONV,
                Rgb([0, 0, 0]),
            )
            .unwrap();
        assert!(advance > 0);
        assert!(canvas.pixels().any(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_draw_empty_text_advances_nothing() {
        let mut renderer = GlyphRenderer::new();
        let mut canvas = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let advance = renderer
            .draw_text(
                &mut canvas,
                0,
                0,
                "",
                TextStyle::regular(18.0),
                &CONV,
                Rgb([0, 0, 0]),
            )
            .unwrap();
        assert_eq!(advance, 0);
        assert!(canvas.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_draw_clips_at_canvas_edge() {
        let mut renderer = GlyphRenderer::new();
        let mut canvas = RgbImage::from_pixel(5, 5, Rgb([255, 255, 255]));
        // Way out of bounds: must not panic.
        renderer
            .draw_text(
                &mut canvas,
                3,
                3,
                "XYZ",
                TextStyle::regular(28.0),
                &CONV,
                Rgb([0, 0, 0]),
            )
            .unwrap();
    }
}
