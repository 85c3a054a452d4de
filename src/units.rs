//! # Unit Conversion
//!
//! Converts physical lengths (millimeters, centimeters, points) to device
//! pixels at a given resolution.
//!
//! All conversions truncate rather than round. Truncation is applied
//! consistently across the whole pipeline so that repeated conversions of
//! the same logical quantity always land on the same pixel count and grid
//! math stays stable.
//!
//! ## Calculations
//!
//! ```text
//! px_per_cm = dpi / 2.54
//! px_per_mm = (dpi / 2.54) / 10
//! px_per_pt = dpi / 72
//! ```

/// Inches per centimeter.
const INCH_TO_CM: f64 = 2.54;

/// Typographic points per inch.
const POINTS_PER_INCH: f64 = 72.0;

/// Converts physical lengths to pixels at a fixed resolution.
///
/// ## Example
///
/// ```
/// use inventag::units::UnitConverter;
///
/// let conv = UnitConverter::new(300);
/// assert_eq!(conv.mm_to_px(50.0), 590);
/// assert_eq!(conv.cm_to_px(5.0), 590);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    dpi: u32,
}

impl UnitConverter {
    /// Create a converter for the given resolution.
    ///
    /// DPI positivity is guaranteed by `LabelConfig` validation; a zero DPI
    /// here simply converts everything to zero pixels.
    pub const fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Resolution this converter was built for.
    #[inline]
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Convert centimeters to pixels (truncating).
    #[inline]
    pub fn cm_to_px(&self, cm: f64) -> u32 {
        (cm * self.dpi as f64 / INCH_TO_CM) as u32
    }

    /// Convert millimeters to pixels (truncating).
    #[inline]
    pub fn mm_to_px(&self, mm: f64) -> u32 {
        (mm * self.dpi as f64 / INCH_TO_CM / 10.0) as u32
    }

    /// Convert typographic points to pixels (truncating).
    ///
    /// Used for font sizes: a point size only has a pixel meaning at a
    /// concrete resolution.
    #[inline]
    pub fn pt_to_px(&self, pt: f64) -> u32 {
        (pt * self.dpi as f64 / POINTS_PER_INCH) as u32
    }

    /// Convert pixels back to millimeters (exact, for PDF placement).
    #[inline]
    pub fn px_to_mm(&self, px: u32) -> f64 {
        px as f64 * INCH_TO_CM * 10.0 / self.dpi as f64
    }
}

// ============================================================================
// TESTS
// ============================================================================
