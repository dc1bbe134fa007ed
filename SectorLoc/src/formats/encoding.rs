//! Text encoding detection and strict decoding for mod tables
//!
//! Mod tables are usually UTF-8, but translated mods in the wild are often
//! saved as GBK by spreadsheet tools. Detection produces a guess with a
//! confidence; guesses at or below the policy threshold are not trusted on
//! their own and the fallback list is walked instead. Decoding is always
//! strict: a malformed sequence is an error, never a replacement character.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};

use crate::error::{Error, Result};

/// Guesses that are not pure UTF-8 never score above this, so the
/// fallback list always gets a say.
const LEGACY_CONFIDENCE_CAP: f32 = 0.9;

/// The result of inspecting a byte buffer
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    /// Most likely encoding
    pub encoding: &'static Encoding,
    /// Confidence in `0.0..=1.0`
    pub confidence: f32,
    /// Length of the byte-order mark, if one was found
    pub bom_length: usize,
}

/// How to turn table bytes into text
#[derive(Debug, Clone)]
pub struct EncodingPolicy {
    /// Guesses above this confidence are used directly.
    pub threshold: f32,
    /// Tried in order when the guess is not confident enough.
    pub fallbacks: Vec<&'static Encoding>,
}

impl Default for EncodingPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            fallbacks: vec![GBK, UTF_8, WINDOWS_1252],
        }
    }
}

impl EncodingPolicy {
    /// Build a policy from encoding labels (`"GBK"`, `"utf-8"`, `"latin1"`, ...).
    ///
    /// # Errors
    /// Returns [`Error::UnknownEncoding`] for a label `encoding_rs` does not know.
    pub fn from_labels<S: AsRef<str>>(threshold: f32, labels: &[S]) -> Result<Self> {
        let fallbacks = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                Encoding::for_label(label.trim().as_bytes())
                    .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { threshold, fallbacks })
    }
}

/// Decoded file content
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The text, without any byte-order mark
    pub text: String,
    /// The encoding that decoded it
    pub encoding: &'static Encoding,
    /// Whether the source started with a byte-order mark
    pub had_bom: bool,
}

/// Inspect raw bytes and guess their encoding.
#[must_use]
pub fn detect(bytes: &[u8]) -> Detection {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        return Detection {
            encoding,
            confidence: 1.0,
            bom_length,
        };
    }

    if bytes.is_ascii() {
        return Detection {
            encoding: UTF_8,
            confidence: 1.0,
            bom_length: 0,
        };
    }

    if std::str::from_utf8(bytes).is_ok() {
        return Detection {
            encoding: UTF_8,
            confidence: 0.99,
            bom_length: 0,
        };
    }

    if let Some(text) = GBK.decode_without_bom_handling_and_without_replacement(bytes) {
        let (non_ascii, cjk) = text
            .chars()
            .filter(|c| !c.is_ascii())
            .fold((0usize, 0usize), |(total, cjk), c| {
                (total + 1, cjk + usize::from(is_cjk(c)))
            });
        let ratio = if non_ascii == 0 {
            0.0
        } else {
            cjk as f32 / non_ascii as f32
        };
        return Detection {
            encoding: GBK,
            confidence: (0.5 + 0.4 * ratio).min(LEGACY_CONFIDENCE_CAP),
            bom_length: 0,
        };
    }

    Detection {
        encoding: WINDOWS_1252,
        confidence: 0.3,
        bom_length: 0,
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'   // unified ideographs
        | '\u{3000}'..='\u{303F}' // CJK punctuation
        | '\u{FF00}'..='\u{FFEF}' // fullwidth forms
    )
}

fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Decode a byte buffer following `policy`.
///
/// `path` is only used for error reporting.
///
/// # Errors
/// Returns [`Error::Encoding`] if a confident guess fails strict decoding,
/// or if no fallback candidate decodes the bytes.
pub fn decode(bytes: &[u8], path: &Path, policy: &EncodingPolicy) -> Result<DecodedText> {
    let detection = detect(bytes);
    let had_bom = detection.bom_length > 0;
    let body = &bytes[detection.bom_length..];

    tracing::debug!(
        "{}: detected {} (confidence {:.2})",
        path.display(),
        detection.encoding.name(),
        detection.confidence
    );

    if had_bom || detection.confidence > policy.threshold {
        return match decode_strict(body, detection.encoding) {
            Some(text) => Ok(DecodedText {
                text: text.into_owned(),
                encoding: detection.encoding,
                had_bom,
            }),
            None => Err(Error::Encoding {
                path: path.to_path_buf(),
                tried: vec![detection.encoding.name().to_string()],
            }),
        };
    }

    let mut tried = Vec::with_capacity(policy.fallbacks.len());
    for &candidate in &policy.fallbacks {
        if let Some(text) = decode_strict(body, candidate) {
            if candidate != detection.encoding {
                tracing::debug!(
                    "{}: decoded as fallback {} instead of guess {}",
                    path.display(),
                    candidate.name(),
                    detection.encoding.name()
                );
            }
            return Ok(DecodedText {
                text: text.into_owned(),
                encoding: candidate,
                had_bom,
            });
        }
        tried.push(candidate.name().to_string());
    }

    Err(Error::Encoding {
        path: path.to_path_buf(),
        tried,
    })
}

/// Read and decode a text file.
///
/// # Errors
/// Returns [`Error::FileIo`] if the file cannot be read, or
/// [`Error::Encoding`] if it cannot be decoded.
pub fn read_text(path: &Path, policy: &EncodingPolicy) -> Result<DecodedText> {
    let bytes = std::fs::read(path).map_err(|e| Error::file_io(path, e))?;
    decode(&bytes, path, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_confident_utf8() {
        let detection = detect(b"id,name\nwasp,Wasp\n");
        assert_eq!(detection.encoding, UTF_8);
        assert!((detection.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_utf8_with_cjk() {
        let text = "id,name\nwasp,黄蜂\n";
        let decoded = decode(text.as_bytes(), Path::new("t.csv"), &EncodingPolicy::default()).unwrap();
        assert_eq!(decoded.encoding, UTF_8);
        assert_eq!(decoded.text, text);
        assert!(!decoded.had_bom);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"id,name\n");
        let decoded = decode(&bytes, Path::new("t.csv"), &EncodingPolicy::default()).unwrap();
        assert_eq!(decoded.text, "id,name\n");
        assert!(decoded.had_bom);
    }

    #[test]
    fn test_gbk_goes_through_fallbacks() {
        let source = "id,name\nhound,猎犬级护卫舰\n";
        let (bytes, _, _) = GBK.encode(source);
        let detection = detect(&bytes);
        assert_eq!(detection.encoding, GBK);
        assert!(detection.confidence <= 0.9);

        let decoded = decode(&bytes, Path::new("t.csv"), &EncodingPolicy::default()).unwrap();
        assert_eq!(decoded.encoding, GBK);
        assert_eq!(decoded.text, source);
    }

    #[test]
    fn test_corrupt_after_bom_fails() {
        let bytes = [0xEF, 0xBB, 0xBF, b'a', 0xFF, 0xFE, b'b'];
        let err = decode(&bytes, Path::new("bad.csv"), &EncodingPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }

    #[test]
    fn test_all_fallbacks_fail() {
        let policy = EncodingPolicy::from_labels(0.9, &["utf-8"]).unwrap();
        let err = decode(&[b'a', 0xC3, b'(', b'b'], Path::new("bad.csv"), &policy).unwrap_err();
        match err {
            Error::Encoding { tried, .. } => assert_eq!(tried, vec!["UTF-8".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_latin1_label_maps_to_windows_1252() {
        let policy = EncodingPolicy::from_labels(0.9, &["latin1"]).unwrap();
        assert_eq!(policy.fallbacks, vec![WINDOWS_1252]);
        assert!(EncodingPolicy::from_labels(0.9, &["nope"]).is_err());
    }
}
