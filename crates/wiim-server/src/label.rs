//! QR label rendering for physical asset tagging

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, imageops};
use qrcode::{EcLevel, QrCode, Version};

/// Preferred symbol version; longer payloads grow past it
const LABEL_VERSION: Version = Version::Normal(4);
const MODULE_PIXELS: u32 = 10;
/// Light modules around the symbol
const BORDER_MODULES: u32 = 1;

pub fn process_payload(id: i32) -> String {
    format!("process:{}", id)
}

pub fn tag_payload(id: i32) -> String {
    format!("tag:{}", id)
}

/// Encode `payload` as a PNG QR code at error correction level H
pub fn render_png(payload: &str) -> anyhow::Result<Vec<u8>> {
    let code = QrCode::with_version(payload.as_bytes(), LABEL_VERSION, EcLevel::H)
        .or_else(|_| QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H))?;

    let symbol = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .quiet_zone(false)
        .build();

    let border = BORDER_MODULES * MODULE_PIXELS;
    let mut label = ImageBuffer::from_pixel(
        symbol.width() + 2 * border,
        symbol.height() + 2 * border,
        Luma([u8::MAX]),
    );
    imageops::overlay(&mut label, &symbol, i64::from(border), i64::from(border));

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(label).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(png)
}
