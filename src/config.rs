//! # Label Configuration
//!
//! This module defines the geometry and style settings for one render job.
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | Label size | 50 × 30 mm |
//! | Padding | 2 mm |
//! | Spacing | 2 mm horizontal, 1 mm vertical |
//! | Page size | 210 × 297 mm (A4) |
//! | Resolution | 300 DPI |
//! | Font sizes | 14 / 18 / 28 pt |
//! | Colors | black on white |
//!
//! A config is constructed once per render job (persisted defaults merged
//! with request overrides happen upstream, typically via serde) and is
//! read-only afterwards. [`LabelConfig::validate`] must pass before any
//! rendering starts.

use crate::error::LabelError;
use image::Rgb;
use qrcode::EcLevel;
use serde::{Deserialize, Serialize};

/// QR error-correction level, trading payload capacity for damage
/// resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCorrection {
    /// ~7% recovery
    L,
    /// ~15% recovery (default)
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl ErrorCorrection {
    /// Map to the `qrcode` crate's level type.
    pub(crate) fn ec_level(self) -> EcLevel {
        match self {
            Self::L => EcLevel::L,
            Self::M => EcLevel::M,
            Self::Q => EcLevel::Q,
            Self::H => EcLevel::H,
        }
    }
}

/// Which device fields appear as caption lines on a label.
///
/// An included field with an empty value still renders its line (prefix
/// followed by an empty value); an excluded field renders nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionFields {
    pub room: bool,
    pub building: bool,
    pub owner: bool,
    pub model: bool,
    pub inventory_number: bool,
    pub serial_number: bool,
}

impl Default for CaptionFields {
    fn default() -> Self {
        Self {
            room: true,
            building: true,
            owner: true,
            model: true,
            inventory_number: true,
            serial_number: true,
        }
    }
}

/// Geometry and style settings for one label render job.
///
/// ## Example
///
/// ```
/// use inventag::config::LabelConfig;
///
/// let mut config = LabelConfig::default();
/// config.dpi = 203;
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Physical label width in millimeters.
    pub label_width_mm: f64,
    /// Physical label height in millimeters.
    pub label_height_mm: f64,
    /// Inner padding between label edge and content, in millimeters.
    pub label_padding_mm: f64,
    /// Horizontal gap between tiled labels, in millimeters.
    pub label_horizontal_spacing_mm: f64,
    /// Vertical gap between tiled labels, in millimeters.
    pub label_vertical_spacing_mm: f64,
    /// Gap between the title line (room) and the remaining caption lines.
    pub label_title_gap_mm: f64,
    /// Output page width in millimeters.
    pub page_width_mm: f64,
    /// Output page height in millimeters.
    pub page_height_mm: f64,
    /// Render resolution in dots per inch.
    pub dpi: u32,
    /// Small font size in points (inventory/serial lines).
    pub font_size_small: f64,
    /// Regular font size in points (body lines).
    pub font_size: f64,
    /// Large font size in points (title line).
    pub font_size_large: f64,
    /// QR modules and caption ink color, `#RRGGBB`.
    pub fill_color: String,
    /// Label and QR quiet-zone background color, `#RRGGBB`.
    pub background_color: String,
    /// Prefix drawn bold before the inventory number.
    pub inv_prefix: String,
    /// Prefix drawn bold before the serial number.
    pub sn_prefix: String,
    /// QR error-correction level.
    pub error_correction: ErrorCorrection,
    /// Caption line include flags.
    pub fields: CaptionFields,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            label_width_mm: 50.0,
            label_height_mm: 30.0,
            label_padding_mm: 2.0,
            label_horizontal_spacing_mm: 2.0,
            label_vertical_spacing_mm: 1.0,
            label_title_gap_mm: 2.0,
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            dpi: 300,
            font_size_small: 14.0,
            font_size: 18.0,
            font_size_large: 28.0,
            fill_color: "#000000".to_string(),
            background_color: "#FFFFFF".to_string(),
            inv_prefix: "inv:".to_string(),
            sn_prefix: "sn:".to_string(),
            error_correction: ErrorCorrection::M,
            fields: CaptionFields::default(),
        }
    }
}

impl LabelConfig {
    /// Check every invariant before rendering starts.
    ///
    /// Rejects non-positive dimensions, zero DPI, non-positive font sizes,
    /// and colors that don't parse as `#RRGGBB`. Nothing is partially
    /// built on failure.
    pub fn validate(&self) -> Result<(), LabelError> {
        let dims = [
            ("label_width_mm", self.label_width_mm),
            ("label_height_mm", self.label_height_mm),
            ("page_width_mm", self.page_width_mm),
            ("page_height_mm", self.page_height_mm),
        ];
        for (name, value) in dims {
            if value <= 0.0 || !value.is_finite() {
                return Err(LabelError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let gaps = [
            ("label_padding_mm", self.label_padding_mm),
            ("label_horizontal_spacing_mm", self.label_horizontal_spacing_mm),
            ("label_vertical_spacing_mm", self.label_vertical_spacing_mm),
            ("label_title_gap_mm", self.label_title_gap_mm),
        ];
        for (name, value) in gaps {
            if value < 0.0 || !value.is_finite() {
                return Err(LabelError::Config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.dpi == 0 {
            return Err(LabelError::Config("dpi must be positive".to_string()));
        }

        let fonts = [
            ("font_size_small", self.font_size_small),
            ("font_size", self.font_size),
            ("font_size_large", self.font_size_large),
        ];
        for (name, value) in fonts {
            if value <= 0.0 || !value.is_finite() {
                return Err(LabelError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        parse_color(&self.fill_color)?;
        parse_color(&self.background_color)?;

        Ok(())
    }

    /// Parsed fill (ink) color.
    pub fn fill_rgb(&self) -> Result<Rgb<u8>, LabelError> {
        parse_color(&self.fill_color)
    }

    /// Parsed background color.
    pub fn background_rgb(&self) -> Result<Rgb<u8>, LabelError> {
        parse_color(&self.background_color)
    }
}

/// Parse a `#RRGGBB` color string (case-insensitive).
pub fn parse_color(spec: &str) -> Result<Rgb<u8>, LabelError> {
    let hex = spec
        .strip_prefix('#')
        .ok_or_else(|| LabelError::Config(format!("color '{spec}' must start with '#'")))?;

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LabelError::Config(format!(
            "color '{spec}' must be #RRGGBB"
        )));
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Ok(Rgb([channel(0), channel(2), channel(4)]))
}

// ============================================================================
// TESTS
// ============================================================================
