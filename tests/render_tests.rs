//! # End-to-End Render Tests
//!
//! These tests exercise the full pipeline: device records → QR payloads →
//! composed labels → tiled pages → serialized documents.
//!
//! ## Test Coverage
//!
//! - **PDF output**: header, pagination, idempotent sealing
//! - **PNG output**: single-label preview rendering
//! - **Boundary cases**: empty batches, empty device fields, payload
//!   capacity overflow

use inventag::{
    DeviceLabelData, ErrorCorrection, LabelConfig, LabelError, QrPayload, RenderJob,
    render_labels, render_single_qr,
};
use pretty_assertions::assert_eq;

/// A fully populated device record.
fn sample_device(id: u64) -> DeviceLabelData {
    DeviceLabelData {
        id,
        building: "Physics Building".to_string(),
        room: "D-204".to_string(),
        owner: "Grace Hopper".to_string(),
        inventory_number: format!("IN-{id:05}"),
        serial_number: format!("SN-{id:08}"),
        manufacturer: "Dell".to_string(),
        model: "Latitude 5440".to_string(),
    }
}

#[test]
fn test_batch_renders_to_pdf() {
    let devices: Vec<_> = (1..=5).map(sample_device).collect();
    let pdf = render_labels(&devices, &LabelConfig::default()).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.ends_with(b"%%EOF") || pdf.ends_with(b"%%EOF\n"));
}

#[test]
fn test_empty_batch_is_one_page_not_an_error() {
    let mut job = RenderJob::new(LabelConfig::default()).unwrap();
    let pdf = job.finish().unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert_eq!(job.page_count(), Some(1));
}

#[test]
fn test_sealed_job_returns_cached_bytes() {
    let mut job = RenderJob::new(LabelConfig::default()).unwrap();
    for id in 1..=4 {
        job.add_device(&sample_device(id)).unwrap();
    }
    let first = job.finish().unwrap();
    let second = job.finish().unwrap();
    let third = job.finish().unwrap();
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_pagination_follows_input_order() {
    // A page holding exactly one label turns N devices into N pages, in
    // input order by construction of the tiler.
    let mut config = LabelConfig::default();
    config.page_width_mm = 60.0;
    config.page_height_mm = 40.0;

    let mut job = RenderJob::new(config).unwrap();
    for id in 1..=4 {
        job.add_device(&sample_device(id)).unwrap();
    }
    job.finish().unwrap();
    assert_eq!(job.page_count(), Some(4));
}

#[test]
fn test_single_qr_png_at_50x30_300dpi() {
    // Default geometry: 50x30mm label at 300 DPI. An empty serial number
    // still renders its line (prefix + empty value).
    let config = LabelConfig::default();
    assert_eq!(config.label_width_mm, 50.0);
    assert_eq!(config.label_height_mm, 30.0);
    assert_eq!(config.dpi, 300);

    let mut device = sample_device(9);
    device.serial_number.clear();

    let png = render_single_qr(&device, &config).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_device_with_only_id_renders() {
    let device = DeviceLabelData {
        id: 1,
        ..Default::default()
    };
    let config = LabelConfig::default();
    render_single_qr(&device, &config).unwrap();
    render_labels(std::slice::from_ref(&device), &config).unwrap();
}

#[test]
fn test_payloads_isolated_between_devices() {
    // Two devices identical except id must not contaminate each other's
    // payloads within one job.
    let a = sample_device(1);
    let mut b = sample_device(1);
    b.id = 2;

    let pa = QrPayload::from_device(&a).to_bytes().unwrap();
    let pb = QrPayload::from_device(&b).to_bytes().unwrap();
    let sa = String::from_utf8(pa).unwrap();
    let sb = String::from_utf8(pb).unwrap();
    assert_ne!(sa, sb);
    assert_eq!(sa.replace("\"id\":1", ""), sb.replace("\"id\":2", ""));
}

#[test]
fn test_oversized_payload_fails_whole_batch() {
    // Blow past QR capacity via an absurd serial number; the batch must
    // fail rather than silently skip the device.
    let mut device = sample_device(1);
    device.serial_number = "x".repeat(4096);

    let devices = [sample_device(2), device, sample_device(3)];
    let result = render_labels(&devices, &LabelConfig::default());
    assert!(matches!(result, Err(LabelError::QrEncoding(_))));
}

#[test]
fn test_invalid_color_rejected_up_front() {
    let mut config = LabelConfig::default();
    config.background_color = "white".to_string();
    let result = render_labels(&[sample_device(1)], &config);
    assert!(matches!(result, Err(LabelError::Config(_))));
}

#[test]
fn test_higher_error_correction_still_renders() {
    let mut config = LabelConfig::default();
    config.error_correction = ErrorCorrection::H;
    let pdf = render_labels(&[sample_device(1)], &config).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_low_dpi_configuration() {
    // 96 DPI screen resolution: everything shrinks but nothing breaks.
    let mut config = LabelConfig::default();
    config.dpi = 96;
    let png = render_single_qr(&sample_device(4), &config).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}
