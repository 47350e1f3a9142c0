//! Image scaling for QR blocks.
//!
//! QR modules must stay axis-aligned squares, so scaling always uses
//! nearest-neighbour sampling and never introduces intermediate grey levels.

use image::GrayImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Scale a square image to `side × side` pixels with nearest-neighbour
/// sampling.
///
/// Returns the original image unchanged if it already has that size.
pub fn scale_nearest(img: &GrayImage, side: u32) -> GrayImage {
    let side = side.max(1);
    let (orig_w, orig_h) = img.dimensions();

    if orig_w == side && orig_h == side {
        debug!(side, "QR already at target size, skipping resize");
        return img.clone();
    }

    debug!(orig_w, orig_h, side, "Scaling QR block");
    imageops::resize(img, side, side, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Checkerboard with one pixel per cell.
    fn checkerboard(size: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    #[test]
    fn scale_to_target_side() {
        let result = scale_nearest(&checkerboard(29), 295);
        assert_eq!(result.dimensions(), (295, 295));
    }

    #[test]
    fn scale_keeps_pure_black_and_white() {
        let result = scale_nearest(&checkerboard(25), 200);
        assert!(result.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn integer_upscale_keeps_blocks() {
        let result = scale_nearest(&checkerboard(4), 40);
        // First cell is dark and covers a full 10x10 block.
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(result.get_pixel(x, y)[0], 0);
            }
        }
        assert_eq!(result.get_pixel(10, 0)[0], 255);
    }

    #[test]
    fn same_size_is_unchanged() {
        let src = checkerboard(8);
        assert_eq!(scale_nearest(&src, 8), src);
    }

    #[test]
    fn zero_side_clamps_to_one() {
        assert_eq!(scale_nearest(&checkerboard(8), 0).dimensions(), (1, 1));
    }
}
