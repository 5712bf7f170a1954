//! Byte-level encoding normalization.
//!
//! Every document and every served file goes through [`normalize`] before it is
//! tokenized or rendered. The detector is a cheap heuristic: it counts how many
//! high bytes start a well-formed 2- or 3-byte UTF-8 sequence and falls back to
//! GBK when fewer than half of them do.

use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// Legacy double-byte Chinese encoding (GBK / GB2312).
    Gbk,
}

/// Remove a leading UTF-8 or UTF-16 byte-order mark.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return rest;
    }
    if let Some(rest) = bytes
        .strip_prefix(UTF16_LE_BOM)
        .or_else(|| bytes.strip_prefix(UTF16_BE_BOM))
    {
        return rest;
    }
    bytes
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Guess the encoding of `bytes` (BOM already stripped).
pub fn detect(bytes: &[u8]) -> Encoding {
    if bytes.is_empty() || bytes.starts_with(UTF8_BOM) {
        return Encoding::Utf8;
    }

    let mut high_bytes = 0usize;
    let mut valid_sequences = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c > 0x7F {
            high_bytes += 1;
            if c & 0xE0 == 0xC0 && bytes.get(i + 1).copied().is_some_and(is_continuation) {
                valid_sequences += 1;
                i += 1;
            } else if c & 0xF0 == 0xE0
                && bytes.get(i + 1).copied().is_some_and(is_continuation)
                && bytes.get(i + 2).copied().is_some_and(is_continuation)
            {
                valid_sequences += 1;
                i += 2;
            }
        }
        i += 1;
    }

    if high_bytes == 0 || valid_sequences * 2 >= high_bytes {
        Encoding::Utf8
    } else {
        Encoding::Gbk
    }
}

/// Convert arbitrary bytes into UTF-8 text with any BOM removed. Never fails;
/// undecodable input degrades to replacement characters.
pub fn normalize(raw: &[u8]) -> String {
    let bytes = strip_bom(raw);
    let encoding = detect(bytes);
    tracing::trace!(?encoding, len = bytes.len(), "detected encoding");
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Gbk => decode_gbk(bytes).into_owned(),
    }
}

#[cfg(feature = "legacy-encodings")]
fn decode_gbk(bytes: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = encoding_rs::GBK.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!(len = bytes.len(), "lossy GBK conversion");
    }
    text
}

#[cfg(not(feature = "legacy-encodings"))]
fn decode_gbk(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        assert_eq!(normalize(b"\xEF\xBB\xBFhello"), "hello");
    }

    #[test]
    fn strips_utf16_boms() {
        assert_eq!(strip_bom(b"\xFF\xFEab"), b"ab");
        assert_eq!(strip_bom(b"\xFE\xFFab"), b"ab");
        assert_eq!(strip_bom(b"ab"), b"ab");
    }

    #[test]
    fn ascii_and_empty_are_utf8() {
        assert_eq!(detect(b""), Encoding::Utf8);
        assert_eq!(detect(b"plain ascii"), Encoding::Utf8);
    }

    #[test]
    fn chinese_utf8_is_detected() {
        assert_eq!(detect("搜索引擎".as_bytes()), Encoding::Utf8);
        assert_eq!(normalize("搜索引擎".as_bytes()), "搜索引擎");
    }

    #[test]
    fn truncated_sequence_at_end_does_not_overrun() {
        // lone 3-byte lead at the very end
        assert_eq!(detect(&[b'a', 0xE6]), Encoding::Gbk);
        assert_eq!(detect(&[0xE6, 0x90]), Encoding::Gbk);
    }

    #[cfg(feature = "legacy-encodings")]
    #[test]
    fn gbk_is_converted() {
        // "中文" in GBK
        let gbk = [0xD6, 0xD0, 0xCE, 0xC4];
        assert_eq!(detect(&gbk), Encoding::Gbk);
        assert_eq!(normalize(&gbk), "中文");
    }
}
