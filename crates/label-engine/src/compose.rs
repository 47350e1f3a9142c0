//! Label composition: payload plus layout for a case number and KDL code.

use ab_glyph::FontRef;
use chrono::NaiveDateTime;
use image::RgbImage;

use crate::Result;
use crate::layout::{Dpi, LabelLayout, LayoutOptions, compute_layout};
use crate::payload::build_payload;
use crate::render::{LabelContent, render_label};

/// Format of the print timestamp below the QR block.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// What goes on one label. Built at generation time, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpec {
    pub case_number: String,
    pub code: String,
    pub display: String,
}

/// A composed label ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedLabel {
    pub spec: LabelSpec,
    pub payload: String,
    pub layout: LabelLayout,
    pub timestamp: String,
}

impl ComposedLabel {
    pub fn content(&self) -> LabelContent {
        LabelContent::new(&self.spec.case_number, &self.spec.display, &self.timestamp)
    }

    /// Rasterize the label at the resolution it was composed for.
    pub fn render(&self, font: Option<&FontRef<'_>>) -> Result<RgbImage> {
        render_label(&self.payload, &self.layout, &self.content(), font)
    }

    /// Recompose the same label for another resolution, keeping the
    /// original timestamp.
    pub fn relayout(&self, dpi: Dpi, opts: &LayoutOptions) -> Result<Self> {
        Ok(Self {
            layout: compute_layout(dpi, opts)?,
            ..self.clone()
        })
    }
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Compose payload and layout. Inputs are assumed validated.
pub fn compose(
    spec: LabelSpec,
    dpi: Dpi,
    opts: &LayoutOptions,
    at: NaiveDateTime,
) -> Result<ComposedLabel> {
    let layout = compute_layout(dpi, opts)?;
    let payload = build_payload(&spec.case_number, &spec.code);
    tracing::debug!(payload = %payload, qr_side = layout.qr_side, width = layout.width, "Label composed");

    Ok(ComposedLabel {
        spec,
        payload,
        layout,
        timestamp: format_timestamp(at),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .expect("valid date")
    }

    fn spec() -> LabelSpec {
        LabelSpec {
            case_number: "20250042".into(),
            code: "C34".into(),
            display: "Bösartige Neubildung: Bronchien und Lunge".into(),
        }
    }

    #[test]
    fn compose_builds_payload_and_layout() {
        let label = compose(spec(), Dpi::square(300), &LayoutOptions::default(), at())
            .expect("compose should succeed");
        assert_eq!(label.payload, "{sys:GUN_CID,cid:20250042,formid:C34}");
        assert_eq!(label.layout.qr_side, 295);
        assert_eq!(label.layout.width, 472);
        assert_eq!(label.timestamp, "07.03.2025 09:05");
    }

    #[test]
    fn relayout_keeps_payload_and_timestamp() {
        let label = compose(spec(), Dpi::square(300), &LayoutOptions::default(), at())
            .expect("compose should succeed");
        let printed = label
            .relayout(Dpi::square(203), &LayoutOptions::default())
            .expect("relayout should succeed");
        assert_eq!(printed.payload, label.payload);
        assert_eq!(printed.timestamp, label.timestamp);
        assert_eq!(printed.layout.qr_side, 200);
    }

    #[test]
    fn content_uses_display_text() {
        let label = compose(spec(), Dpi::square(300), &LayoutOptions::default(), at())
            .expect("compose should succeed");
        let content = label.content();
        assert_eq!(
            content.code_line,
            "KDL: Bösartige Neubildung: Bronchien und Lunge"
        );
    }

    #[test]
    fn render_uses_layout_size() {
        let label = compose(spec(), Dpi::square(203), &LayoutOptions::default(), at())
            .expect("compose should succeed");
        let img = label.render(None).expect("render should succeed");
        assert_eq!(img.width(), label.layout.width);
        assert_eq!(img.height(), label.layout.height);
    }
}
