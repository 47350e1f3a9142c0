//! Label rasterization.

use ab_glyph::{FontRef, PxScale};
use image::{DynamicImage, GrayImage, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, warn};

use crate::Result;
use crate::layout::{LabelLayout, MIN_FONT_PX};
use crate::qr::generate_qr;
use crate::resize::scale_nearest;
use crate::text::{fit_scale, fit_to_width, line_height, wrap_to_lines};

/// Side of the on-screen QR preview in pixels.
pub const PREVIEW_SIZE: u32 = 200;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Human-readable lines printed next to and below the QR block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelContent {
    pub case_line: String,
    pub code_line: String,
    pub timestamp: String,
}

impl LabelContent {
    pub fn new(case_number: &str, display: &str, timestamp: impl Into<String>) -> Self {
        Self {
            case_line: format!("Fallnummer: {case_number}"),
            code_line: format!("KDL: {display}"),
            timestamp: timestamp.into(),
        }
    }
}

/// Render the QR code alone, scaled to `side × side` for preview.
pub fn render_preview(payload: &str, side: u32) -> Result<GrayImage> {
    let qr = generate_qr(payload)?;
    Ok(scale_nearest(&qr, side))
}

/// Render the full label on a white background.
///
/// The QR block is scaled with nearest-neighbour sampling to
/// `layout.qr_side` and placed at `layout.qr_origin`. The case number and
/// KDL blocks are wrapped within the text column beside the QR, shrinking
/// the font (down to [`MIN_FONT_PX`]) until each block fits its height. The
/// timestamp is fitted to the label width. Without a font the text is left
/// out.
pub fn render_label(
    payload: &str,
    layout: &LabelLayout,
    content: &LabelContent,
    font: Option<&FontRef<'_>>,
) -> Result<RgbImage> {
    let qr = scale_nearest(&generate_qr(payload)?, layout.qr_side);
    let qr_rgb = DynamicImage::ImageLuma8(qr).to_rgb8();

    let mut img = RgbImage::from_pixel(layout.width, layout.height, WHITE);
    imageops::replace(
        &mut img,
        &qr_rgb,
        i64::from(layout.qr_origin.0),
        i64::from(layout.qr_origin.1),
    );

    let Some(font) = font else {
        warn!("No font available, rendering label without text");
        return Ok(img);
    };

    let text_width = layout.text_width();
    let blocks = [
        (layout.case_line, &content.case_line, layout.case_block_height()),
        (layout.code_line, &content.code_line, layout.code_block_height()),
    ];

    for ((x, y), text, max_height) in blocks {
        let scale = fit_scale(font, text, layout.font_px, MIN_FONT_PX, text_width, max_height);
        let step = line_height(font, scale).max(1);
        let max_lines = (max_height / step).max(1) as usize;
        let lines = wrap_to_lines(font, scale, text, text_width, max_lines);
        if is_shortened(text, &lines) {
            debug!(original = %text, lines = ?lines, "Label block shortened");
        }
        for (i, line) in lines.iter().enumerate() {
            let line_y = y + step * i as u32;
            draw_text_mut(&mut img, BLACK, x as i32, line_y as i32, scale, font, line);
        }
    }

    let scale = PxScale::from(layout.font_px as f32);
    let fitted = fit_to_width(font, scale, &content.timestamp, layout.width);
    if is_shortened(&content.timestamp, std::slice::from_ref(&fitted)) {
        debug!(original = %content.timestamp, fitted = %fitted, "Timestamp shortened");
    }
    let (x, y) = layout.timestamp_line;
    draw_text_mut(&mut img, BLACK, x as i32, y as i32, scale, font, &fitted);

    Ok(img)
}

/// Whether the drawn lines lost any of `original`. Whitespace runs do not
/// count.
fn is_shortened(original: &str, lines: &[String]) -> bool {
    let drawn = lines.iter().flat_map(|l| l.split_whitespace());
    !drawn.eq(original.split_whitespace())
}
