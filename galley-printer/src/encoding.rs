//! Text encoding for ticket printers
//!
//! Builders accumulate UTF-8 text interleaved with ESC/POS commands. Before
//! the buffer goes on the wire the text part is converted to what the
//! printer understands:
//! - ASCII printers: every non-ASCII character becomes `?`
//! - Chinese printers: GBK, with Chinese mode re-enabled after every INIT
//!
//! Command bytes are all below 0x80, so both conversions leave them intact.

use tracing::instrument;

/// Character set expected by the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Ascii,
    Gbk,
}

impl Encoding {
    /// Convert a mixed text/command buffer for the wire
    pub fn convert(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Encoding::Ascii => convert_to_ascii(bytes),
            Encoding::Gbk => convert_to_gbk(bytes),
        }
    }
}

/// Printed width of a string in character cells
pub fn text_width(s: &str, encoding: Encoding) -> usize {
    match encoding {
        Encoding::Ascii => s.chars().count(),
        Encoding::Gbk => gbk_width(s),
    }
}

/// Get the GBK byte width of a string
///
/// Chinese characters are typically 2 bytes in GBK, ASCII is 1 byte.
pub fn gbk_width(s: &str) -> usize {
    let (cow, _, _) = encoding_rs::GBK.encode(s);
    cow.len()
}

/// Longest prefix of `s` that fits in `max_width` character cells
pub fn truncate_to_width(s: &str, max_width: usize, encoding: Encoding) -> &str {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        width += text_width(c.encode_utf8(&mut [0u8; 4]), encoding);
        if width > max_width {
            return &s[..idx];
        }
    }
    s
}

/// Replace every non-ASCII character with `?`, keeping command bytes
#[instrument(skip(bytes))]
pub fn convert_to_ascii(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len());
    let mut pending = Vec::new();

    for &b in bytes {
        if b < 0x80 {
            flush_ascii(&mut pending, &mut result);
            result.push(b);
        } else {
            pending.push(b);
        }
    }
    flush_ascii(&mut pending, &mut result);
    result
}

fn flush_ascii(pending: &mut Vec<u8>, result: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }
    let s = String::from_utf8_lossy(pending);
    result.extend(std::iter::repeat_n(b'?', s.chars().count()));
    pending.clear();
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to GBK
///
/// This function preserves ASCII bytes (0x00-0x7F) exactly as is,
/// which protects ESC/POS commands from being corrupted.
/// Only bytes >= 0x80 are treated as UTF-8 sequences and converted to GBK.
///
/// Also handles:
/// - Re-enabling Chinese mode after INIT command (ESC @)
/// - Euro symbol (€) special handling
#[instrument(skip(bytes))]
pub fn convert_to_gbk(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() * 2);

    // FS & - enable Chinese mode, FS C 1 - select GBK code page
    result.extend_from_slice(&[0x1C, 0x26, 0x1C, 0x43, 0x01]);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // INIT resets the code page, Chinese mode must follow it
        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_gbk(&mut buffer, &mut result);
            result.extend_from_slice(&[0x1B, 0x40, 0x1C, 0x26]);
            i += 2;
            continue;
        }

        if b < 128 {
            flush_gbk(&mut buffer, &mut result);
            result.push(b);
        } else {
            buffer.push(b);
        }
        i += 1;
    }

    flush_gbk(&mut buffer, &mut result);

    // FS . - exit Chinese mode
    result.extend_from_slice(&[0x1C, 0x2E]);

    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to GBK
fn flush_gbk(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    let parts: Vec<&str> = s.split('€').collect();

    for (idx, part) in parts.iter().enumerate() {
        if !part.is_empty() {
            let (gbk, _, _) = encoding_rs::GBK.encode(part);
            result.extend_from_slice(&gbk);
        }
        if idx < parts.len() - 1 {
            // Exit Chinese -> PC858 -> Euro -> Enter Chinese
            result.extend_from_slice(&[0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26]);
        }
    }
    buffer.clear();
}
