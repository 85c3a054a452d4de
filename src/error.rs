//! # Error Types
//!
//! This module defines error types used throughout the inventag library.

use thiserror::Error;

/// Main error type for inventag operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Invalid label configuration (geometry, DPI, colors)
    #[error("Configuration error: {0}")]
    Config(String),

    /// QR payload exceeds symbol capacity, or encoding failed
    #[error("QR encoding error: {0}")]
    QrEncoding(String),

    /// Font loading or glyph rasterization error
    #[error("Font error: {0}")]
    Font(String),

    /// Raster image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// PDF document assembly error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Operation attempted on a sealed render job
    #[error("Render job already sealed: {0}")]
    Sealed(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
