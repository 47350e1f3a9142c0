//! Runtime configuration loaded from `.env` + environment.

use std::path::PathBuf;

use code_catalog::CATALOG_FILE_NAME;
use usage_store::USAGE_FILE_NAME;

/// Application folder name inside the platform config directory.
const APP_DIR_NAME: &str = "KDL_QR_Tool";

/// Resolution assumed when the printer does not report one.
pub const DEFAULT_DPI: u32 = 300;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub catalog_file_name: String,
    pub printer: Option<String>,
    pub fallback_dpi: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_file_name: CATALOG_FILE_NAME.into(),
            printer: None,
            fallback_dpi: DEFAULT_DPI,
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn load() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            data_dir: g("KDL_QR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            catalog_file_name: g("KDL_QR_CATALOG_FILE").unwrap_or_else(|| CATALOG_FILE_NAME.into()),
            printer: g("KDL_QR_PRINTER"),
            fallback_dpi: g("KDL_QR_DPI")
                .map(|v| parse_dpi(&v, DEFAULT_DPI))
                .unwrap_or(DEFAULT_DPI),
            font_path: g("KDL_QR_FONT").map(PathBuf::from),
        }
    }

    /// Usage counter file inside the data directory.
    pub fn usage_file(&self) -> PathBuf {
        self.data_dir.join(USAGE_FILE_NAME)
    }
}

/// Determine the data directory for the application.
/// Priority: platform config dir (`%APPDATA%` on Windows) > ~/.kdl-qr > `.`
fn default_data_dir() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join(APP_DIR_NAME);
    }
    dirs::home_dir()
        .map(|home| home.join(".kdl-qr"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

fn parse_dpi(s: &str, default: u32) -> u32 {
    match s.parse::<u32>() {
        Ok(v) if v > 0 => v,
        _ => {
            tracing::warn!(value = s, default, "Invalid KDL_QR_DPI, using default");
            default
        }
    }
}
