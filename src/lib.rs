//! # Inventag - Device Inventory Label Renderer
//!
//! Inventag renders QR-coded identification labels for inventory devices
//! and tiles them onto printable PDF sheets. It provides:
//!
//! - **QR encoding**: compact per-device payloads as scannable symbols
//! - **Caption layout**: bitmap-font text metrics and line stacking
//! - **Label composition**: QR + caption in stacked or side-by-side form
//! - **Page tiling**: deterministic row-major grid assignment
//! - **PDF assembly**: multi-page output sized in physical units
//!
//! ## Quick Start
//!
//! ```
//! use inventag::{DeviceLabelData, LabelConfig, render_labels, render_single_qr};
//!
//! let config = LabelConfig::default();
//! let device = DeviceLabelData {
//!     id: 42,
//!     room: "101".to_string(),
//!     inventory_number: "IN-0042".to_string(),
//!     ..Default::default()
//! };
//!
//! // Multi-page PDF with one label per device
//! let pdf = render_labels(&[device.clone()], &config)?;
//! assert!(pdf.starts_with(b"%PDF"));
//!
//! // Single-label PNG preview
//! let png = render_single_qr(&device, &config)?;
//!
//! # Ok::<(), inventag::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Label geometry and style settings |
//! | [`device`] | Device label data and QR payloads |
//! | [`units`] | Physical-unit to pixel conversion |
//! | [`qr`] | QR symbol encoding and scaling |
//! | [`text`] | Text metrics and line layout |
//! | [`label`] | Label composition |
//! | [`layout`] | Page tiling |
//! | [`document`] | Render jobs and PDF assembly |
//! | [`error`] | Error types |
//!
//! Rendering is synchronous and CPU-bound; each render job owns its own
//! canvases and glyph cache, so concurrent jobs never share mutable
//! state. Persistence, authorization and HTTP concerns live with the
//! caller; this crate consumes validated device records and a validated
//! configuration, and returns document bytes.

pub mod config;
pub mod device;
pub mod document;
pub mod error;
pub mod label;
pub mod layout;
pub mod qr;
pub mod text;
pub mod units;

// Re-exports for convenience
pub use config::{CaptionFields, ErrorCorrection, LabelConfig};
pub use device::{DeviceLabelData, QrPayload};
pub use document::{RenderJob, render_labels, render_single_qr};
pub use error::LabelError;
pub use label::Orientation;
