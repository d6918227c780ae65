//! Code page utilities for single-byte thermal printers
//!
//! In their default character mode most ESC/POS printers render one byte per
//! column using the selected code page. This module provides utilities for:
//! - Measuring, truncating and padding text in printer columns
//! - Converting UTF-8 text to Windows-1252 (ESC/POS code page 16)

/// ESC t n value selecting the WPC1252 code page
pub const WPC1252_CODE_PAGE: u8 = 16;

/// Byte printed in place of characters the code page cannot represent
const REPLACEMENT: u8 = b'?';

/// Get the printed width of a string in columns
///
/// Every character occupies exactly one column once encoded.
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within `max_width` columns
pub fn truncate_text(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(s);
    if current_width >= width {
        return truncate_text(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Encode UTF-8 text to Windows-1252 bytes
///
/// ASCII passes through untouched. Anything the code page cannot represent
/// becomes `?`, keeping the one-byte-per-column invariant that the layout
/// helpers rely on.
pub fn encode_text(s: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(s.len());
    let mut scratch = [0u8; 4];

    for c in s.chars() {
        if c.is_ascii() {
            result.push(c as u8);
            continue;
        }

        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut scratch));
        if had_errors || bytes.len() != 1 {
            result.push(REPLACEMENT);
        } else {
            result.extend_from_slice(&bytes);
        }
    }

    result
}
