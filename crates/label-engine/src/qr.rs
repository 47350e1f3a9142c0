//! QR code generation for label images.

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::Result;

/// Light modules around the symbol (ISO/IEC 18004 minimum).
pub const QUIET_ZONE: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Generate a QR code image with one pixel per module.
///
/// Uses error correction level M and includes the quiet zone. Scale the
/// result with [`crate::resize::scale_nearest`] to keep modules square.
pub fn generate_qr(data: &str) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)?;
    let module_count = code.width() as u32;
    let img_size = module_count + QUIET_ZONE * 2;

    let mut img = GrayImage::from_pixel(img_size, img_size, LIGHT);

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color == Color::Dark {
            let x = (i as u32) % module_count;
            let y = (i as u32) / module_count;
            img.put_pixel(QUIET_ZONE + x, QUIET_ZONE + y, DARK);
        }
    }

    Ok(img)
}
