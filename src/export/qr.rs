//! QR codes generated from participant data.

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

/// Modules of light border around the code.
pub const QUIET_ZONE: u32 = 4;

/// Encode `data` as a one-pixel-per-module image with a quiet zone.
/// Scale it up without interpolation to keep modules crisp.
pub fn encode_qr(data: &str) -> Result<GrayImage, qrcode::types::QrError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M)?;
    let modules = code.width() as u32;
    let side = modules + QUIET_ZONE * 2;

    let mut image = GrayImage::from_pixel(side, side, Luma([255]));
    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx as usize, qy as usize)] == qrcode::Color::Dark {
                image.put_pixel(qx + QUIET_ZONE, qy + QUIET_ZONE, Luma([0]));
            }
        }
    }
    Ok(image)
}
