//! Label geometry in device pixels.
//!
//! Layout (4 cm wide, QR side 2.5 cm):
//! ```text
//! +-----------+------------------------+
//! |           | Fallnummer: <case>     |
//! |    QR     |                        |
//! |           | KDL: <display>         |
//! +-----------+------------------------+
//! | DD.MM.YYYY HH:MM                   |
//! +------------------------------------+
//! ```

use crate::{CM_TO_IN, LabelError, Result};

/// Printer resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dpi {
    pub x: u32,
    pub y: u32,
}

impl Dpi {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub const fn square(dpi: u32) -> Self {
        Self { x: dpi, y: dpi }
    }
}

/// Physical label dimensions in centimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Total label width.
    pub label_width_cm: f64,
    /// Maximum side of the QR square.
    pub qr_side_cm: f64,
    /// Space below the QR block for the timestamp line.
    pub bottom_margin_cm: f64,
    /// Horizontal gap between QR block and text.
    pub text_gap_cm: f64,
    /// Vertical offset of the KDL line below the case number line.
    pub line_offset_cm: f64,
    /// Text height.
    pub font_size_cm: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            label_width_cm: 4.0,
            qr_side_cm: 2.5,
            bottom_margin_cm: 0.4,
            text_gap_cm: 0.2,
            line_offset_cm: 0.7,
            font_size_cm: 0.3,
        }
    }
}

/// Smallest font size that is still legible on a label.
pub const MIN_FONT_PX: u32 = 8;

/// Computed label geometry. All coordinates are top-left anchors in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLayout {
    pub width: u32,
    pub height: u32,
    pub qr_side: u32,
    pub qr_origin: (u32, u32),
    pub case_line: (u32, u32),
    pub code_line: (u32, u32),
    pub timestamp_line: (u32, u32),
    pub font_px: u32,
}

impl LabelLayout {
    /// Horizontal space available to the text block.
    pub fn text_width(&self) -> u32 {
        self.width.saturating_sub(self.case_line.0)
    }

    /// Height available to the case number block, down to the KDL line.
    pub fn case_block_height(&self) -> u32 {
        self.code_line.1.saturating_sub(self.case_line.1)
    }

    /// Height available to the KDL block, down to the bottom of the QR.
    pub fn code_block_height(&self) -> u32 {
        (self.qr_origin.1 + self.qr_side).saturating_sub(self.code_line.1)
    }
}

/// Convert a physical length to device pixels (rounded to nearest).
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    (cm * CM_TO_IN * f64::from(dpi)).round() as u32
}

/// Compute the label geometry for a printer resolution.
pub fn compute_layout(dpi: Dpi, opts: &LayoutOptions) -> Result<LabelLayout> {
    if dpi.x == 0 || dpi.y == 0 {
        return Err(LabelError::InvalidDpi { x: dpi.x, y: dpi.y });
    }

    let qr_side = cm_to_px(opts.qr_side_cm, dpi.x.min(dpi.y));
    let width = cm_to_px(opts.label_width_cm, dpi.x);
    let height = qr_side + cm_to_px(opts.bottom_margin_cm, dpi.y);
    let text_x = qr_side + cm_to_px(opts.text_gap_cm, dpi.x);

    Ok(LabelLayout {
        width,
        height,
        qr_side,
        qr_origin: (0, 0),
        case_line: (text_x, 0),
        code_line: (text_x, cm_to_px(opts.line_offset_cm, dpi.y)),
        timestamp_line: (0, qr_side),
        font_px: cm_to_px(opts.font_size_cm, dpi.y).max(MIN_FONT_PX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(dpi: Dpi) -> LabelLayout {
        compute_layout(dpi, &LayoutOptions::default()).expect("layout should compute")
    }

    #[test]
    fn layout_at_300_dpi() {
        let l = layout(Dpi::square(300));
        assert_eq!(l.qr_side, 295);
        assert_eq!(l.width, 472);
        assert_eq!(l.height, 295 + 47);
        assert_eq!(l.qr_origin, (0, 0));
        assert_eq!(l.case_line, (295 + 24, 0));
        assert_eq!(l.code_line, (295 + 24, 83));
        assert_eq!(l.timestamp_line, (0, 295));
        assert_eq!(l.font_px, 35);
    }

    #[test]
    fn layout_at_203_dpi() {
        let l = layout(Dpi::square(203));
        // 2.5 cm at 203 dpi = 199.8 px, 4 cm = 319.7 px.
        assert_eq!(l.qr_side, 200);
        assert_eq!(l.width, 320);
    }

    #[test]
    fn qr_side_uses_smaller_resolution() {
        let l = layout(Dpi::new(600, 300));
        assert_eq!(l.qr_side, 295);
        assert_eq!(l.width, 945);
        assert_eq!(l.case_line.0, 295 + 47);
        assert_eq!(l.code_line.1, 83);
    }

    #[test]
    fn small_resolution_keeps_minimum_font() {
        let l = layout(Dpi::square(50));
        assert_eq!(l.font_px, MIN_FONT_PX);
        assert!(l.qr_side < l.width);
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let err = compute_layout(Dpi::new(0, 300), &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, LabelError::InvalidDpi { x: 0, y: 300 }));
    }

    #[test]
    fn text_width_is_space_right_of_gap() {
        let l = layout(Dpi::square(300));
        assert_eq!(l.text_width(), 472 - 319);
        assert_eq!(l.case_block_height(), 83);
        assert_eq!(l.code_block_height(), 295 - 83);
    }
}
