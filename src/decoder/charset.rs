//! `charset=` label resolution and byte-to-text decoding.
//!
//! Labels follow the usual IANA / codec names. The ISO-8859-1, ASCII and
//! UTF-32 families are handled here; everything else is looked up in
//! `encoding_rs`, whose label table folds `latin1` and `ascii` into
//! windows-1252.

use crate::error::DecodeError;
use encoding_rs::{Encoding, REPLACEMENT, UTF_8};
use std::borrow::Cow;

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso_8859_1",
    "iso-ir-100",
    "8859",
    "cp819",
    "ibm819",
    "latin1",
    "latin-1",
    "latin_1",
    "l1",
];

const ASCII_LABELS: &[&str] = &[
    "ascii",
    "us-ascii",
    "us_ascii",
    "us",
    "646",
    "iso646-us",
    "ansi_x3.4-1968",
    "cp367",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Each byte is the code point with the same value.
    Latin1,
    /// 7-bit only.
    Ascii,
    /// `None` reads an optional byte order mark and defaults to little endian.
    Utf32 { big_endian: Option<bool> },
    Encoding(&'static Encoding),
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Encoding(UTF_8)
    }
}

impl Charset {
    pub fn from_label(label: &str) -> Result<Self, DecodeError> {
        let normalized = label.trim().to_ascii_lowercase();
        let name = normalized.as_str();

        if LATIN1_LABELS.contains(&name) {
            return Ok(Charset::Latin1);
        }
        if ASCII_LABELS.contains(&name) {
            return Ok(Charset::Ascii);
        }

        match name {
            "utf-32" | "utf_32" | "utf32" | "u32" => Ok(Charset::Utf32 { big_endian: None }),
            "utf-32le" | "utf-32-le" | "utf_32_le" => Ok(Charset::Utf32 {
                big_endian: Some(false),
            }),
            "utf-32be" | "utf-32-be" | "utf_32_be" => Ok(Charset::Utf32 {
                big_endian: Some(true),
            }),
            _ => Encoding::for_label(name.as_bytes())
                .filter(|encoding| *encoding != REPLACEMENT)
                .map(Charset::Encoding)
                .ok_or_else(|| DecodeError::UnsupportedCharset {
                    label: label.to_string(),
                }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "US-ASCII",
            Charset::Utf32 { big_endian: None } => "UTF-32",
            Charset::Utf32 {
                big_endian: Some(false),
            } => "UTF-32LE",
            Charset::Utf32 {
                big_endian: Some(true),
            } => "UTF-32BE",
            Charset::Encoding(encoding) => encoding.name(),
        }
    }

    /// Decode `bytes`, failing on the first byte sequence the charset
    /// cannot represent.
    pub fn decode_strict(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let text = match self {
            Charset::Latin1 => Some(latin1(bytes)),
            Charset::Ascii => bytes.is_ascii().then(|| latin1(bytes)),
            Charset::Utf32 { big_endian } => utf32(bytes, *big_endian, true),
            Charset::Encoding(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
        };

        text.ok_or_else(|| DecodeError::InvalidText {
            charset: self.name().to_string(),
        })
    }

    /// Decode `bytes`, substituting U+FFFD for anything undecodable.
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Latin1 => latin1(bytes),
            Charset::Ascii => bytes
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        char::from(b)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Charset::Utf32 { big_endian } => utf32(bytes, *big_endian, false).unwrap_or_default(),
            Charset::Encoding(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn utf32(bytes: &[u8], big_endian: Option<bool>, strict: bool) -> Option<String> {
    let (big_endian, body) = match big_endian {
        Some(big_endian) => (big_endian, bytes),
        None => match bytes {
            [0xFF, 0xFE, 0, 0, rest @ ..] => (false, rest),
            [0, 0, 0xFE, 0xFF, rest @ ..] => (true, rest),
            _ => (false, bytes),
        },
    };

    let mut text = String::with_capacity(body.len() / 4);
    for chunk in body.chunks(4) {
        let decoded = <[u8; 4]>::try_from(chunk)
            .ok()
            .map(|word| {
                if big_endian {
                    u32::from_be_bytes(word)
                } else {
                    u32::from_le_bytes(word)
                }
            })
            .and_then(char::from_u32);

        match decoded {
            Some(c) => text.push(c),
            None if strict => return None,
            None => text.push(char::REPLACEMENT_CHARACTER),
        }
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_family_labels() {
        for label in ["iso-8859-1", "ISO-8859-1", "latin1", "latin-1", " l1 ", "cp819"] {
            assert_eq!(Charset::from_label(label).unwrap(), Charset::Latin1, "{label}");
        }
    }

    #[test]
    fn test_latin1_keeps_c1_controls() {
        let text = Charset::Latin1.decode_strict(&[0x80, 0x9F, 0xE9]).unwrap();
        assert_eq!(text, "\u{80}\u{9F}é");
    }

    #[test]
    fn test_ascii_labels() {
        for label in ["ascii", "US-ASCII", "646"] {
            assert_eq!(Charset::from_label(label).unwrap(), Charset::Ascii, "{label}");
        }
    }

    #[test]
    fn test_ascii_rejects_high_bytes() {
        assert_eq!(Charset::Ascii.decode_strict(b"ok").unwrap(), "ok");
        assert_eq!(
            Charset::Ascii.decode_strict(&[b'c', 0xE9]).unwrap_err(),
            DecodeError::InvalidText {
                charset: "US-ASCII".to_string()
            }
        );
        assert_eq!(Charset::Ascii.decode_lossy(&[b'c', 0xE9]), "c\u{FFFD}");
    }

    #[test]
    fn test_utf32() {
        let little = [b'h', 0, 0, 0, b'i', 0, 0, 0];
        let big = [0, 0, 0xFE, 0xFF, 0, 0, 0, b'h'];

        let utf32 = Charset::from_label("utf-32").unwrap();
        assert_eq!(utf32.decode_strict(&little).unwrap(), "hi");
        assert_eq!(utf32.decode_strict(&big).unwrap(), "h");

        let utf32le = Charset::from_label("UTF-32LE").unwrap();
        assert_eq!(utf32le.name(), "UTF-32LE");
        assert!(utf32le.decode_strict(&little[..6]).is_err());
        assert_eq!(utf32le.decode_lossy(&little[..6]), "h\u{FFFD}");
    }

    #[test]
    fn test_other_labels_use_encoding_rs() {
        assert_eq!(Charset::from_label("utf-8").unwrap(), Charset::default());
        assert_eq!(Charset::from_label("iso-8859-2").unwrap().name(), "ISO-8859-2");
        assert_eq!(Charset::from_label("shift_jis").unwrap().name(), "Shift_JIS");
    }

    #[test]
    fn test_unknown_labels() {
        for label in ["klingon", "iso-2022-kr", ""] {
            assert!(matches!(
                Charset::from_label(label),
                Err(DecodeError::UnsupportedCharset { .. })
            ));
        }
    }
}
