//! Text decoding for catalog files saved by Windows editors.

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode as UTF-8 (BOM stripped), falling back to Windows-1252.
pub(crate) fn decode_text(raw: &[u8]) -> String {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("Catalog file is not UTF-8, decoding as Windows-1252");
            encoding_rs::WINDOWS_1252
                .decode_without_bom_handling(raw)
                .0
                .into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_text("Rückenschmerzen".as_bytes()), "Rückenschmerzen");
    }

    #[test]
    fn bom_is_stripped() {
        let mut raw = UTF8_BOM.to_vec();
        raw.extend_from_slice(b"[]");
        assert_eq!(decode_text(&raw), "[]");
    }

    #[test]
    fn windows_1252_umlauts_and_euro() {
        // "Rückenschmerzen" with 0xFC for ü, then a euro sign.
        let raw = b"R\xFCckenschmerzen \x80";
        assert_eq!(decode_text(raw), "Rückenschmerzen €");
    }

    #[test]
    fn windows_1252_punctuation_and_unassigned_bytes() {
        // Curly quotes, en dash, and the unassigned 0x81 byte.
        let raw = b"\x93Asthma\x94 \x96 \x81";
        assert_eq!(decode_text(raw), "\u{201C}Asthma\u{201D} \u{2013} \u{0081}");
    }
}
