//! # Document Builder
//!
//! Owns one label render job from configuration to final PDF bytes.
//!
//! ## Lifecycle
//!
//! ```text
//! RenderJob::new(config)      → Accepting   (config validated up front)
//!   .add_device(..)*          → composes one label per device, in order
//!   .finish()                 → Sealed      (tiles, draws, serializes)
//! ```
//!
//! `finish` is idempotent: the PDF bytes are cached on first call and
//! every later call returns the identical bytes. Adding a device after
//! sealing is an error. A job with zero devices seals into a valid
//! single-page document; an empty batch is a boundary case, not a
//! failure.
//!
//! Each job owns its canvases and glyph cache; concurrent jobs share no
//! mutable state.

use std::io::{BufWriter, Cursor, Write};

use image::{DynamicImage, ImageFormat, RgbImage};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};

use crate::config::LabelConfig;
use crate::device::{DeviceLabelData, QrPayload};
use crate::error::LabelError;
use crate::label::{self, Orientation};
use crate::layout::PageLayout;
use crate::qr;
use crate::units::UnitConverter;

/// One label render job: a validated config plus the labels composed so
/// far, sealed into PDF bytes by [`RenderJob::finish`].
pub struct RenderJob {
    config: LabelConfig,
    labels: Vec<RgbImage>,
    layout: Option<PageLayout>,
    sealed: Option<Vec<u8>>,
}

impl RenderJob {
    /// Validate the config and open an empty job.
    ///
    /// Validation failures reject the job before anything is built.
    pub fn new(config: LabelConfig) -> Result<Self, LabelError> {
        config.validate()?;
        Ok(Self {
            config,
            labels: Vec::new(),
            layout: None,
            sealed: None,
        })
    }

    /// The job's configuration.
    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Labels composed so far.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Pages in the sealed document; `None` until [`RenderJob::finish`].
    pub fn page_count(&self) -> Option<u32> {
        self.layout.map(|l| l.page_count)
    }

    /// Encode, compose and queue one device's label.
    ///
    /// An encoding failure (payload too large for the QR capacity) fails
    /// here and the caller should abandon the whole batch: a silently
    /// skipped label would leave a mismatched device/label set on the
    /// printed sheet.
    pub fn add_device(&mut self, device: &DeviceLabelData) -> Result<(), LabelError> {
        if self.sealed.is_some() {
            return Err(LabelError::Sealed(format!(
                "cannot add device {} to a finished job",
                device.id
            )));
        }

        let payload = QrPayload::from_device(device).to_bytes()?;
        let code = qr::encode(&payload, self.config.error_correction)?;
        let raster = label::compose(&code, device, &self.config, Orientation::SideBySide)?;
        self.labels.push(raster);
        Ok(())
    }

    /// Tile, draw and serialize the document. Idempotent: repeated calls
    /// return byte-identical output from the cache.
    pub fn finish(&mut self) -> Result<Vec<u8>, LabelError> {
        if let Some(bytes) = &self.sealed {
            return Ok(bytes.clone());
        }

        let bytes = self.build_pdf()?;
        self.sealed = Some(bytes.clone());
        Ok(bytes)
    }

    fn build_pdf(&mut self) -> Result<Vec<u8>, LabelError> {
        let conv = UnitConverter::new(self.config.dpi);
        let page_w_px = conv.mm_to_px(self.config.page_width_mm);
        let page_h_px = conv.mm_to_px(self.config.page_height_mm);
        let h_gap = conv.mm_to_px(self.config.label_horizontal_spacing_mm);
        let v_gap = conv.mm_to_px(self.config.label_vertical_spacing_mm);

        // Tile pitch: the largest label in the batch plus the configured
        // inter-label gap. Every slot shares one pitch so columns line up
        // across rows.
        let max_w = self.labels.iter().map(|l| l.width()).max().unwrap_or(1);
        let max_h = self.labels.iter().map(|l| l.height()).max().unwrap_or(1);
        let layout = PageLayout::tile(
            max_w + h_gap,
            max_h + v_gap,
            page_w_px,
            page_h_px,
            self.labels.len(),
        );
        self.layout = Some(layout);

        let page_w = Mm(self.config.page_width_mm as f32);
        let page_h = Mm(self.config.page_height_mm as f32);
        let (doc, first_page, first_layer) =
            PdfDocument::new("Device Labels", page_w, page_h, "labels");

        // Pages are created lazily up to the tiler's page count; the
        // document always carries at least page one.
        let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
        for i in 1..layout.page_count {
            let (page, layer) = doc.add_page(page_w, page_h, format!("labels {}", i + 1));
            layers.push(doc.get_page(page).get_layer(layer));
        }

        for (i, raster) in self.labels.iter().enumerate() {
            let place = layout.placement(i);
            let layer = &layers[place.page as usize];

            let x_mm = conv.px_to_mm(place.x_px);
            // PDF y axis runs bottom-up; anchor the raster's bottom edge.
            let y_mm =
                self.config.page_height_mm - conv.px_to_mm(place.y_px + raster.height());

            let image = Image::from(ImageXObject {
                width: Px(raster.width() as usize),
                height: Px(raster.height() as usize),
                color_space: ColorSpace::Rgb,
                bits_per_component: ColorBits::Bit8,
                interpolate: false,
                image_data: raster.as_raw().clone(),
                image_filter: None,
                clipping_bbox: None,
                smask: None,
            });

            // Embedding at the job's DPI maps raster pixels 1:1 onto the
            // physical grid the tiler computed, preserving aspect ratio.
            image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(x_mm as f32)),
                    translate_y: Some(Mm(y_mm as f32)),
                    dpi: Some(self.config.dpi as f32),
                    ..Default::default()
                },
            );
        }

        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut bytes));
            doc.save(&mut writer)
                .map_err(|e| LabelError::Pdf(e.to_string()))?;
            writer.flush()?;
        }
        Ok(bytes)
    }
}

/// Render a batch of devices into a multi-page PDF label sheet.
///
/// Devices keep their input order; page and slot assignment is
/// deterministic for the same order. Zero devices yield a valid one-page
/// document.
pub fn render_labels(
    devices: &[DeviceLabelData],
    config: &LabelConfig,
) -> Result<Vec<u8>, LabelError> {
    let mut job = RenderJob::new(config.clone())?;
    for device in devices {
        job.add_device(device)?;
    }
    job.finish()
}

/// Render one device's QR label as a PNG, caption below the symbol.
pub fn render_single_qr(
    device: &DeviceLabelData,
    config: &LabelConfig,
) -> Result<Vec<u8>, LabelError> {
    config.validate()?;

    let payload = QrPayload::from_device(device).to_bytes()?;
    let code = qr::encode(&payload, config.error_correction)?;
    let raster = label::compose(&code, device, config, Orientation::Stacked)?;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(raster)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| LabelError::Image(e.to_string()))?;
    Ok(bytes)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: u64) -> DeviceLabelData {
        DeviceLabelData {
            id,
            building: "Main".to_string(),
            room: "101".to_string(),
            owner: "Ada Lovelace".to_string(),
            inventory_number: format!("IN-{id:04}"),
            serial_number: format!("SN-{id:04}"),
            manufacturer: "Lenovo".to_string(),
            model: "T480".to_string(),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_building() {
        let mut config = LabelConfig::default();
        config.dpi = 0;
        assert!(matches!(
            RenderJob::new(config),
            Err(LabelError::Config(_))
        ));
    }

    #[test]
    fn test_zero_devices_single_empty_page() {
        let mut job = RenderJob::new(LabelConfig::default()).unwrap();
        let bytes = job.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(job.page_count(), Some(1));
        assert_eq!(job.label_count(), 0);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut job = RenderJob::new(LabelConfig::default()).unwrap();
        job.add_device(&device(1)).unwrap();
        job.add_device(&device(2)).unwrap();
        let first = job.finish().unwrap();
        let second = job.finish().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_after_finish_fails() {
        let mut job = RenderJob::new(LabelConfig::default()).unwrap();
        job.add_device(&device(1)).unwrap();
        job.finish().unwrap();
        assert!(matches!(
            job.add_device(&device(2)),
            Err(LabelError::Sealed(_))
        ));
    }

    #[test]
    fn test_render_labels_convenience() {
        let devices = [device(1), device(2), device(3)];
        let bytes = render_labels(&devices, &LabelConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_single_qr_is_png() {
        let bytes = render_single_qr(&device(7), &LabelConfig::default()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_small_page_forces_rollover() {
        // One slot per page: a 60x40mm page holds a single 50x30mm label
        // once spacing is added, so three devices need three pages.
        let mut config = LabelConfig::default();
        config.page_width_mm = 60.0;
        config.page_height_mm = 40.0;

        let mut job = RenderJob::new(config).unwrap();
        for id in 1..=3 {
            job.add_device(&device(id)).unwrap();
        }
        job.finish().unwrap();
        assert_eq!(job.page_count(), Some(3));
    }
}
