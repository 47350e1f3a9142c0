//! Label composition for KDL QR labels.
//!
//! Builds the QR payload for a case number and diagnosis code, computes the
//! label geometry for a printer resolution, and rasterizes the label.

pub mod compose;
pub mod layout;
pub mod payload;
pub mod qr;
pub mod render;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use compose::{ComposedLabel, LabelSpec, TIMESTAMP_FORMAT, compose, format_timestamp};
pub use layout::{Dpi, LabelLayout, LayoutOptions, compute_layout};
pub use payload::{build_payload, find_delimiter};
pub use qr::generate_qr;
pub use render::{LabelContent, PREVIEW_SIZE, render_label, render_preview};
pub use text::{fit_scale, fit_to_width, line_height, wrap_text, wrap_to_lines};

/// Centimetres to inches.
pub const CM_TO_IN: f64 = 0.393_700_787_4;

/// Errors that can occur while composing or rendering a label.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("QR encode error: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("Invalid printer resolution: {x}x{y} dpi")]
    InvalidDpi { x: u32, y: u32 },
}

/// Result type alias for label operations.
pub type Result<T> = std::result::Result<T, LabelError>;
