//! # QR Symbol Encoding
//!
//! Turns a byte payload into a 2D module matrix and scales it to a target
//! pixel size.
//!
//! The `qrcode` crate picks the smallest symbol version that fits the
//! payload at the requested error-correction level. Scaling is strict
//! nearest-neighbor: QR symbols must stay sharp-edged to scan reliably, so
//! no anti-aliasing is ever applied. The matrix carries no quiet zone of
//! its own; the label composer supplies padding in the label's background
//! color.

use image::{Rgb, RgbImage};
use qrcode::QrCode;

use crate::config::ErrorCorrection;
use crate::error::LabelError;

/// A square matrix of QR modules. `true` = dark module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    bits: Vec<bool>,
}

impl QrMatrix {
    /// Side length in modules (or pixels, after scaling).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Module at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    /// Scale to `target_px` × `target_px` using nearest-neighbor sampling.
    ///
    /// A target no larger than the module count returns a matrix scaled
    /// down module-for-module; scanners need roughly 2px per module, which
    /// is the caller's geometry to get right.
    pub fn scaled(&self, target_px: usize) -> QrMatrix {
        let target = target_px.max(1);
        let mut bits = vec![false; target * target];
        for dy in 0..target {
            for dx in 0..target {
                let sx = dx * self.width / target;
                let sy = dy * self.width / target;
                bits[dy * target + dx] = self.bits[sy * self.width + sx];
            }
        }
        QrMatrix {
            width: target,
            bits,
        }
    }

    /// Blit the matrix onto `canvas` at `(x0, y0)`.
    ///
    /// Both dark and light modules are painted so the symbol's ground
    /// always matches the label background exactly; a mismatched quiet
    /// zone degrades scanning.
    pub fn draw_onto(&self, canvas: &mut RgbImage, x0: u32, y0: u32, fill: Rgb<u8>, back: Rgb<u8>) {
        for qy in 0..self.width {
            for qx in 0..self.width {
                let px = x0 + qx as u32;
                let py = y0 + qy as u32;
                if px < canvas.width() && py < canvas.height() {
                    let color = if self.get(qx, qy) { fill } else { back };
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }
}

/// Encode a payload at the given error-correction level.
///
/// The smallest fitting symbol version is selected. A payload that exceeds
/// the maximum version's capacity is an error; the data is never silently
/// truncated.
pub fn encode(payload: &[u8], level: ErrorCorrection) -> Result<QrMatrix, LabelError> {
    let code = QrCode::with_error_correction_level(payload, level.ec_level())
        .map_err(|e| LabelError::QrEncoding(e.to_string()))?;

    let width = code.width();
    let mut bits = Vec::with_capacity(width * width);
    for qy in 0..width {
        for qx in 0..width {
            bits.push(code[(qx, qy)] == qrcode::Color::Dark);
        }
    }

    Ok(QrMatrix { width, bits })
}

// ============================================================================
// TESTS
// ============================================================================
