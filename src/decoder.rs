use std::borrow::Cow;

use encoding_rs::WINDOWS_874;

/// Decode one extract file into text.
///
/// Government extracts are historically TIS-620 encoded, so windows-874 (its
/// superset) is tried strictly first. Anything it rejects falls back to lossy
/// UTF-8 so a stray byte can never fail the run. Buffers containing NUL are
/// treated as binary, not text, and yield `None` — the caller records a
/// per-file skip instead of propagating an error.
pub fn decode(bytes: &[u8]) -> Option<Cow<'_, str>> {
    if bytes.contains(&0) {
        return None;
    }
    if let Some(text) = WINDOWS_874.decode_without_bom_handling_and_without_replacement(bytes) {
        return Some(text);
    }
    Some(String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(decode(b"HN|DIAG\n001|A01").unwrap(), "HN|DIAG\n001|A01");
    }

    #[test]
    fn test_tis620_thai_bytes() {
        // 0xA1 is KO KAI in TIS-620 / windows-874
        let decoded = decode(&[0xA1, b'|', b'1']).unwrap();
        assert_eq!(decoded, "\u{0e01}|1");
    }

    #[test]
    fn test_undefined_windows874_byte_falls_back_lossy() {
        // 0xDB is unmapped in windows-874 and invalid UTF-8, so the lossy
        // fallback substitutes a replacement character instead of failing.
        let decoded = decode(&[b'A', 0xDB, b'B']).unwrap();
        assert_eq!(decoded, "A\u{fffd}B");
    }

    #[test]
    fn test_binary_content_rejected() {
        assert!(decode(&[0x00, 0x01, 0x02]).is_none());
        assert!(decode(b"HN|DIAG\x00001|A01").is_none());
    }

    #[test]
    fn test_empty_buffer_decodes_to_empty() {
        assert_eq!(decode(b"").unwrap(), "");
    }
}
