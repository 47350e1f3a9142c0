//! Application state shared by the commands and the interactive session.

use std::cell::OnceCell;
use std::path::PathBuf;

use ab_glyph::FontRef;

use crate::config::AppConfig;
use crate::services::font::load_font_data;
use crate::services::label::LabelService;
use crate::services::printer::PrintRequest;

const PREVIEW_FILE_NAME: &str = "kdl-qr-preview.png";

/// Everything one user session works with.
pub struct AppState {
    pub config: AppConfig,
    pub labels: LabelService,
    /// Case number passed on the command line.
    pub prefill: Option<String>,
    font_data: OnceCell<Option<Vec<u8>>>,
}

impl AppState {
    pub fn new(config: AppConfig, labels: LabelService, prefill: Option<String>) -> Self {
        Self {
            config,
            labels,
            prefill,
            font_data: OnceCell::new(),
        }
    }

    /// Label font, loaded on first use.
    pub fn font(&self) -> Option<FontRef<'_>> {
        let data = self
            .font_data
            .get_or_init(|| load_font_data(self.config.font_path.as_deref()))
            .as_deref()?;
        match FontRef::try_from_slice(data) {
            Ok(font) => Some(font),
            Err(_) => {
                tracing::warn!("Failed to parse label font data (TTF/OTF)");
                None
            }
        }
    }

    /// Where the on-screen QR preview is written.
    pub fn preview_path(&self) -> PathBuf {
        self.config.data_dir.join(PREVIEW_FILE_NAME)
    }

    /// Print request with command-line overrides on top of the config.
    pub fn print_request(&self, printer: Option<String>, dpi: Option<u32>) -> PrintRequest {
        PrintRequest {
            printer: printer.or_else(|| self.config.printer.clone()),
            dpi,
            fallback_dpi: self.config.fallback_dpi,
            work_dir: self.config.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use code_catalog::Catalog;
    use usage_store::UsageStore;

    use super::*;

    fn state() -> AppState {
        let config = AppConfig::from_lookup(|key| match key {
            "KDL_QR_DATA_DIR" => Some("/srv/kdl".into()),
            "KDL_QR_PRINTER" => Some("Zebra".into()),
            "KDL_QR_DPI" => Some("203".into()),
            _ => None,
        });
        let labels = LabelService::new(Catalog::fallback(), UsageStore::in_memory());
        AppState::new(config, labels, None)
    }

    #[test]
    fn print_request_uses_config_defaults() {
        let request = state().print_request(None, None);
        assert_eq!(request.printer.as_deref(), Some("Zebra"));
        assert_eq!(request.dpi, None);
        assert_eq!(request.fallback_dpi, 203);
        assert_eq!(request.work_dir, PathBuf::from("/srv/kdl"));
    }

    #[test]
    fn print_request_overrides_win() {
        let request = state().print_request(Some("Brother".into()), Some(600));
        assert_eq!(request.printer.as_deref(), Some("Brother"));
        assert_eq!(request.dpi, Some(600));
    }

    #[test]
    fn preview_lives_in_data_dir() {
        assert_eq!(
            state().preview_path(),
            PathBuf::from("/srv/kdl").join(PREVIEW_FILE_NAME)
        );
    }
}
