//! Record codec - turns raw bytes plus metadata into a storable record
//!
//! The text/binary decision is a heuristic, not a format sniffer:
//! 1. Strictly decode the whole buffer as UTF-8, dropping a leading BOM.
//! 2. Count NUL code points in the decoded string.
//! 3. Below `max_nul_ratio` of the decoded length it is text, otherwise binary.
//!
//! The decoded length is measured in UTF-16 code units, so a character
//! outside the Basic Multilingual Plane counts twice.
//!
//! Text-like binary formats may pass and NUL-padded text may fail; both are
//! accepted outcomes.

use chrono::{SecondsFormat, Utc};
use crate::record::{FileMetadata, NewFileRecord};

/// Default upper bound (exclusive) on the share of NUL code points in text.
pub const DEFAULT_MAX_NUL_RATIO: f64 = 0.05;

const UTF8_BOM: char = '\u{feff}';

/// Classifies byte buffers as text or binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextClassifier {
    max_nul_ratio: f64,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self {
            max_nul_ratio: DEFAULT_MAX_NUL_RATIO,
        }
    }
}

impl TextClassifier {
    /// Create a classifier with a custom NUL ratio, clamped to `0.0..=1.0`.
    pub fn new(max_nul_ratio: f64) -> Self {
        let max_nul_ratio = if max_nul_ratio.is_nan() {
            DEFAULT_MAX_NUL_RATIO
        } else {
            max_nul_ratio.clamp(0.0, 1.0)
        };
        Self { max_nul_ratio }
    }

    pub fn max_nul_ratio(&self) -> f64 {
        self.max_nul_ratio
    }

    /// Return the decoded text if `data` is judged to be text.
    ///
    /// Empty input has length zero and never satisfies `nul < 0`, so it is
    /// classified as binary.
    pub fn classify(&self, data: &[u8]) -> Option<String> {
        let decoded = std::str::from_utf8(data).ok()?;
        let decoded = decoded.strip_prefix(UTF8_BOM).unwrap_or(decoded);

        let mut length = 0usize;
        let mut nul_count = 0usize;
        for c in decoded.chars() {
            length += c.len_utf16();
            if c == '\0' {
                nul_count += 1;
            }
        }

        if (nul_count as f64) < (length as f64) * self.max_nul_ratio {
            Some(decoded.to_owned())
        } else {
            None
        }
    }

    /// Produce the insert payload for `data`, stamping `created` now.
    pub fn encode(&self, data: Vec<u8>, meta: FileMetadata) -> NewFileRecord {
        let size = data.len() as u64;
        if meta.size != size {
            tracing::warn!(
                "Reported size {} for {:?} differs from content length {}; using content length",
                meta.size,
                meta.name,
                size
            );
        }

        let text_content = self.classify(&data);
        tracing::debug!(
            "Encoded {:?} ({} bytes, {})",
            meta.name,
            size,
            if text_content.is_some() { "text" } else { "binary" }
        );

        NewFileRecord {
            name: meta.name,
            mime_type: meta.mime_type,
            size,
            data,
            text_content,
            created: Utc::now(),
        }
    }
}

/// Render a timestamp the way records persist it: ISO 8601, millisecond
/// precision, `Z` suffix.
pub fn format_timestamp(ts: &chrono::DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(data: &[u8]) -> Option<String> {
        TextClassifier::default().classify(data)
    }

    /// Straight-line restatement of the rule over an owned UTF-16 view
    fn reference_classify(data: &[u8], ratio: f64) -> Option<String> {
        let decoded = String::from_utf8(data.to_vec()).ok()?;
        let decoded = match decoded.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => decoded,
        };
        let units: Vec<u16> = decoded.encode_utf16().collect();
        let nuls = units.iter().filter(|&&u| u == 0).count();
        ((nuls as f64) < units.len() as f64 * ratio).then_some(decoded)
    }

    proptest! {
        #[test]
        fn classify_matches_reference_on_arbitrary_bytes(
            data in prop::collection::vec(any::<u8>(), 0..512),
        ) {
            prop_assert_eq!(classify(&data), reference_classify(&data, DEFAULT_MAX_NUL_RATIO));
        }

        #[test]
        fn classify_matches_reference_on_utf8_with_nuls(
            text in "\\PC{0,64}",
            nuls in 0usize..8,
            ratio in 0.0f64..=1.0,
        ) {
            let mut data = text.into_bytes();
            data.extend(std::iter::repeat_n(0u8, nuls));
            let classifier = TextClassifier::new(ratio);
            prop_assert_eq!(classifier.classify(&data), reference_classify(&data, ratio));
        }

        #[test]
        fn invalid_utf8_is_never_text(
            prefix in "[a-z]{0,32}",
            bad in prop_oneof![Just(0xffu8), Just(0xfeu8), Just(0xc0u8), Just(0x80u8)],
        ) {
            let mut data = prefix.into_bytes();
            data.push(bad);
            prop_assert!(classify(&data).is_none());
        }

        #[test]
        fn nul_free_text_is_text(text in "[^\\u{0}\\u{feff}]{1,64}") {
            prop_assert_eq!(classify(text.as_bytes()), Some(text));
        }
    }

    #[test]
    fn test_plain_text_is_text() {
        assert_eq!(classify(b"hello world").as_deref(), Some("hello world"));
    }

    #[test]
    fn test_multibyte_text_is_text() {
        let text = "olá, ração, 日本語";
        assert_eq!(classify(text.as_bytes()).as_deref(), Some(text));
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        assert!(classify(&[0xff, 0xfe, 0x00, 0x41]).is_none());
        assert!(classify(&[b'a', b'b', 0xc3]).is_none());
    }

    #[test]
    fn test_png_header_is_binary() {
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        png.extend_from_slice(&[0u8; 64]);
        assert!(classify(&png).is_none());
    }

    #[test]
    fn test_nul_ratio_boundary() {
        // 1 NUL in 20 chars is exactly 5%: not below the threshold
        let mut at_limit = vec![b'a'; 19];
        at_limit.push(0);
        assert!(classify(&at_limit).is_none());

        // 1 NUL in 21 chars is below 5%
        let mut below = vec![b'a'; 20];
        below.push(0);
        assert_eq!(classify(&below).map(|s| s.len()), Some(21));
    }

    #[test]
    fn test_ratio_counts_utf16_units_not_bytes() {
        // 19 two-byte chars + 1 NUL = 20 units, 5% NUL
        let mut data = "é".repeat(19).into_bytes();
        data.push(0);
        assert!(classify(&data).is_none());
    }

    #[test]
    fn test_astral_chars_count_as_two_units() {
        // 19 emoji + 1 NUL = 39 units, 1 < 1.95
        let text = format!("{}\0", "😀".repeat(19));
        assert_eq!(classify(text.as_bytes()).as_deref(), Some(text.as_str()));

        // 9 emoji + 1 NUL = 19 units, 1 < 0.95 is false
        let text = format!("{}\0", "😀".repeat(9));
        assert!(classify(text.as_bytes()).is_none());
    }

    #[test]
    fn test_empty_is_binary() {
        assert!(classify(b"").is_none());
    }

    #[test]
    fn test_leading_bom_is_dropped() {
        let data = b"\xef\xbb\xbfhi";
        assert_eq!(classify(data).as_deref(), Some("hi"));

        // Only the first one goes
        let data = b"\xef\xbb\xbf\xef\xbb\xbfhi";
        assert_eq!(classify(data).as_deref(), Some("\u{feff}hi"));
    }

    #[test]
    fn test_bom_only_is_binary() {
        assert!(classify(b"\xef\xbb\xbf").is_none());
    }

    #[test]
    fn test_custom_ratio() {
        let strict = TextClassifier::new(0.0);
        assert!(strict.classify(b"no nul at all").is_none());

        let lenient = TextClassifier::new(0.6);
        assert!(lenient.classify(b"a\0").is_some());

        assert_eq!(TextClassifier::new(7.0).max_nul_ratio(), 1.0);
        assert_eq!(TextClassifier::new(f64::NAN).max_nul_ratio(), DEFAULT_MAX_NUL_RATIO);
    }

    #[test]
    fn test_encode_sets_size_from_content() {
        let meta = FileMetadata::new("notes.txt", "text/plain", 999);
        let before = Utc::now();
        let record = TextClassifier::default().encode(b"hello world".to_vec(), meta);
        assert_eq!(record.size, 11);
        assert_eq!(record.name, "notes.txt");
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.text_content.as_deref(), Some("hello world"));
        assert!(record.created >= before);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:30:45.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&ts), "2024-03-01T12:30:45.123Z");
    }
}
