//! Label font lookup.

use std::path::{Path, PathBuf};

const VALID_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Fonts tried when none is configured, in order.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Invalid font format (only TTF/OTF supported): {0}")]
    InvalidFormat(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a TTF/OTF file.
pub fn read_font(path: &Path) -> Result<Vec<u8>, FontError> {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VALID_EXTENSIONS.contains(&e.to_lowercase().as_str()));
    if !ext_ok {
        return Err(FontError::InvalidFormat(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

/// Load font data for label text.
///
/// The configured font wins; otherwise the first readable system font is
/// used. `None` means labels are rendered without text.
pub fn load_font_data(configured: Option<&Path>) -> Option<Vec<u8>> {
    if let Some(path) = configured {
        match read_font(path) {
            Ok(data) => {
                tracing::info!(path = %path.display(), "Using configured label font");
                return Some(data);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Configured font unusable");
            }
        }
    }

    let found = SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .filter(|p| p.is_file())
        .find_map(|p| read_font(p).ok().map(|data| (p, data)));

    match found {
        Some((path, data)) => {
            tracing::debug!(path = %path.display(), "Using system label font");
            Some(data)
        }
        None => {
            tracing::warn!("No label font found; set KDL_QR_FONT to a TTF/OTF file");
            None
        }
    }
}
