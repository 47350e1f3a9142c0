//! Text measurement, wrapping and fitting for label lines.

use ab_glyph::{Font, PxScale, ScaleFont};

/// Appended to lines that had to be shortened.
pub const ELLIPSIS: char = '…';

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &impl Font, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height(font: &impl Font, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Wrap text to fit within `max_width` pixels.
///
/// Breaks at whitespace; a word wider than the line is broken character by
/// character. Runs of whitespace collapse to one space.
pub fn wrap_text(font: &impl Font, scale: PxScale, text: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure_text_width(font, scale, &candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure_text_width(font, scale, word) <= max_width {
            current = word.to_string();
            continue;
        }

        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1 && measure_text_width(font, scale, &current) > max_width {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Largest scale from `max_px` down to `min_px` at which `text` wraps into
/// `max_width × max_height` without breaking a word.
///
/// Falls back to `min_px` when no size fits.
pub fn fit_scale(
    font: &impl Font,
    text: &str,
    max_px: u32,
    min_px: u32,
    max_width: u32,
    max_height: u32,
) -> PxScale {
    let min_px = min_px.min(max_px).max(1);

    for px in (min_px..=max_px).rev() {
        let scale = PxScale::from(px as f32);
        let words_fit = text
            .split_whitespace()
            .all(|word| measure_text_width(font, scale, word) <= max_width);
        if !words_fit {
            continue;
        }
        let lines = wrap_text(font, scale, text, max_width).len() as u32;
        if lines * line_height(font, scale) <= max_height {
            return scale;
        }
    }

    PxScale::from(min_px as f32)
}

/// Wrap `text` into at most `max_lines` lines.
///
/// When lines are dropped the last kept line ends in an [`ELLIPSIS`].
pub fn wrap_to_lines(
    font: &impl Font,
    scale: PxScale,
    text: &str,
    max_width: u32,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = wrap_text(font, scale, text, max_width);
    if lines.len() <= max_lines {
        return lines;
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.pop() {
        let shortened = ellipsize(font, scale, &last, max_width);
        if !shortened.is_empty() {
            lines.push(shortened);
        }
    }
    lines
}

/// Shorten `text` so that it fits in `max_width` pixels.
///
/// Characters are dropped from the end and an [`ELLIPSIS`] appended. Text
/// that already fits is returned unchanged; if not even the ellipsis fits,
/// the result is empty.
pub fn fit_to_width(font: &impl Font, scale: PxScale, text: &str, max_width: u32) -> String {
    if measure_text_width(font, scale, text) <= max_width {
        return text.to_string();
    }
    ellipsize(font, scale, text, max_width)
}

fn ellipsize(font: &impl Font, scale: PxScale, text: &str, max_width: u32) -> String {
    let mut chars: Vec<char> = text.trim_end().chars().collect();
    loop {
        let candidate: String = chars.iter().chain(std::iter::once(&ELLIPSIS)).collect();
        if measure_text_width(font, scale, &candidate) <= max_width {
            return candidate;
        }
        if chars.pop().is_none() {
            return String::new();
        }
    }
}
