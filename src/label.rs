//! # Label Composer
//!
//! Combines one QR symbol with its human-readable caption into a single
//! label raster.
//!
//! Two layouts, one code path (the historical top/bottom and left/right
//! variants collapse into an [`Orientation`] parameter):
//!
//! ```text
//! Stacked                    SideBySide
//! ┌──────────┐               ┌──────────────────────────┐
//! │ ▄▄▄▄▄▄▄▄ │               │ ▄▄▄▄▄▄  Room 101         │
//! │ █ QR   █ │               │ █ QR █  Main Building    │
//! │ ▀▀▀▀▀▀▀▀ │               │ ▀▀▀▀▀▀  inv: 0042        │
//! │ Room 101 │               │         sn: X9-77        │
//! │ inv:0042 │               └──────────────────────────┘
//! └──────────┘
//! ```
//!
//! The canvas is filled with the configured background color before
//! anything is drawn, and QR modules use exactly the configured
//! fill/background pair: a quiet zone that differs from the label ground
//! degrades scanning.

use image::{Rgb, RgbImage};

use crate::config::LabelConfig;
use crate::device::DeviceLabelData;
use crate::error::LabelError;
use crate::qr::QrMatrix;
use crate::text::{Direction, GlyphRenderer, Line, TextStyle, stack};
use crate::units::UnitConverter;

/// Caption placement relative to the QR symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// QR on top, caption centered below. Used for single-label previews.
    Stacked,
    /// QR on the left, caption block to the right. Used on label sheets.
    SideBySide,
}

/// The caption's text block: an optional title line (room) separated from
/// the body lines by the configured title gap.
struct Caption {
    title: Option<Line>,
    body: Vec<Line>,
}

impl Caption {
    fn build(device: &DeviceLabelData, config: &LabelConfig) -> Self {
        let large = TextStyle::regular(config.font_size_large);
        let regular = TextStyle::regular(config.font_size);

        let title = config
            .fields
            .room
            .then(|| Line::plain(single_line(&device.room), large));

        let mut body = Vec::new();
        if config.fields.building {
            push_plain(&mut body, &device.building, regular);
        }
        if config.fields.model {
            push_plain(&mut body, &device.model_line(), regular);
        }
        if config.fields.owner {
            push_plain(&mut body, &device.owner, regular);
        }
        if config.fields.inventory_number {
            body.push(Line::prefixed(
                format!("{} ", config.inv_prefix),
                single_line(&device.inventory_number),
                config.font_size_small,
            ));
        }
        if config.fields.serial_number {
            body.push(Line::prefixed(
                format!("{} ", config.sn_prefix),
                single_line(&device.serial_number),
                config.font_size_small,
            ));
        }

        Self { title, body }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_empty()
    }

    /// Width and height of the whole block, title gap included.
    fn measure(&self, conv: &UnitConverter, title_gap: u32) -> (u32, u32) {
        let mut width = 0u32;
        let mut height = 0u32;

        if let Some(title) = &self.title {
            let (w, h) = title.measure(conv);
            width = width.max(w);
            height += h;
            if !self.body.is_empty() {
                height += title_gap;
            }
        }

        let body = stack(&self.body, 0, Direction::TopDown, conv);
        for line in &self.body {
            width = width.max(line.measure(conv).0);
        }
        height += body.height;

        (width, height)
    }

    /// Draw the block with its top-left corner at `(x0, y0)`.
    ///
    /// `centered` centers each line within `block_w` (stacked previews);
    /// otherwise lines are left-aligned (sheet labels).
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        renderer: &mut GlyphRenderer,
        canvas: &mut RgbImage,
        x0: u32,
        y0: u32,
        block_w: u32,
        centered: bool,
        title_gap: u32,
        conv: &UnitConverter,
        color: Rgb<u8>,
    ) -> Result<(), LabelError> {
        let line_x = |w: u32| {
            if centered {
                x0 + block_w.saturating_sub(w) / 2
            } else {
                x0
            }
        };

        let mut y = y0;
        if let Some(title) = &self.title {
            let (w, h) = title.measure(conv);
            renderer.draw_line(canvas, line_x(w), y, title, conv, color)?;
            y += h;
            if !self.body.is_empty() {
                y += title_gap;
            }
        }

        let body = stack(&self.body, 0, Direction::BottomUp, conv);
        for (line, offset) in self.body.iter().zip(&body.offsets) {
            let (w, _) = line.measure(conv);
            renderer.draw_line(canvas, line_x(w), y + offset, line, conv, color)?;
        }

        Ok(())
    }
}

/// Compose one label from an encoded QR symbol and a device's caption.
pub fn compose(
    qr: &QrMatrix,
    device: &DeviceLabelData,
    config: &LabelConfig,
    orientation: Orientation,
) -> Result<RgbImage, LabelError> {
    let conv = UnitConverter::new(config.dpi);
    let fill = config.fill_rgb()?;
    let back = config.background_rgb()?;

    let pad = conv.mm_to_px(config.label_padding_mm);
    let title_gap = conv.mm_to_px(config.label_title_gap_mm);
    let label_w = conv.mm_to_px(config.label_width_mm);
    let label_h = conv.mm_to_px(config.label_height_mm);

    let caption = Caption::build(device, config);
    let (cap_w, cap_h) = caption.measure(&conv, title_gap);

    let mut renderer = GlyphRenderer::new();

    match orientation {
        Orientation::Stacked => {
            // QR sized to the label's smaller edge, minus padding; the
            // symbol needs at least its module count in pixels.
            let qr_px = label_w
                .min(label_h)
                .saturating_sub(2 * pad)
                .max(qr.width() as u32);
            let scaled = qr.scaled(qr_px as usize);

            let width = qr_px.max(cap_w).max(1);
            let height = qr_px + cap_h + pad;
            let mut canvas = RgbImage::from_pixel(width, height, back);

            scaled.draw_onto(&mut canvas, (width - qr_px) / 2, 0, fill, back);
            if !caption.is_empty() {
                caption.draw(
                    &mut renderer,
                    &mut canvas,
                    0,
                    qr_px,
                    width,
                    true,
                    title_gap,
                    &conv,
                    fill,
                )?;
            }
            Ok(canvas)
        }
        Orientation::SideBySide => {
            let qr_px = label_h
                .saturating_sub(2 * pad)
                .max(qr.width() as u32);
            let scaled = qr.scaled(qr_px as usize);

            let inner_h = qr_px.max(cap_h);
            let width = pad + qr_px + pad + cap_w + pad;
            let height = inner_h + 2 * pad;
            let mut canvas = RgbImage::from_pixel(width.max(1), height.max(1), back);

            scaled.draw_onto(
                &mut canvas,
                pad,
                pad + (inner_h - qr_px) / 2,
                fill,
                back,
            );
            if !caption.is_empty() {
                caption.draw(
                    &mut renderer,
                    &mut canvas,
                    pad + qr_px + pad,
                    pad + (inner_h - cap_h) / 2,
                    cap_w,
                    false,
                    title_gap,
                    &conv,
                    fill,
                )?;
            }
            Ok(canvas)
        }
    }
}

/// Collapse embedded line breaks: caption slots are single lines.
fn single_line(text: &str) -> String {
    if text.contains('\n') {
        text.replace('\n', " ")
    } else {
        text.to_string()
    }
}

/// Push a plain field as one line per embedded line break.
fn push_plain(body: &mut Vec<Line>, text: &str, style: TextStyle) {
    for part in text.split('\n') {
        body.push(Line::plain(part, style));
    }
}

// ============================================================================
// TESTS
// ============================================================================
