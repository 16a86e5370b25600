//! Input content decoding.
//!
//! Outlook exports are frequently Windows-1252 rather than UTF-8, so decoding
//! tries strict UTF-8 first and falls back to Windows-1252, which maps every
//! byte and therefore always succeeds. A UTF-8 byte-order mark is stripped.

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decodes raw export bytes into text.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}
