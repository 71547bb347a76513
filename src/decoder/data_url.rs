//! RFC 2397 `data:` URL decoding for Ignition file and unit payloads.

use super::charset::Charset;
use crate::error::DecodeError;
use base64::Engine;

const DATA_PREFIX: &str = "data:";
const CHARSET_PARAM: &str = "charset=";
const BASE64_PARAM: &str = "base64";

/// How a payload string was classified before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind<'a> {
    /// No `data:` prefix; the whole string is percent-encoded text.
    Bare,
    /// `data:,<payload>` with an empty header.
    Untyped,
    /// `data:<header>,<payload>` with the header split on `;`.
    Typed { params: Vec<&'a str> },
}

/// A tokenized payload. The charset label is only resolved by
/// [`DataUrl::decode`], so a classified payload always has a trace line.
#[derive(Debug, Clone)]
pub struct DataUrl<'a> {
    kind: PayloadKind<'a>,
    charset_label: Option<&'a str>,
    base64: bool,
    payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(input: &'a str) -> Result<Self, DecodeError> {
        let Some(rest) = input.strip_prefix(DATA_PREFIX) else {
            return Ok(Self {
                kind: PayloadKind::Bare,
                charset_label: None,
                base64: false,
                payload: input,
            });
        };

        let (header, payload) = rest.split_once(',').ok_or(DecodeError::MissingComma)?;

        if header.is_empty() {
            return Ok(Self {
                kind: PayloadKind::Untyped,
                charset_label: None,
                base64: false,
                payload,
            });
        }

        let params: Vec<&str> = header.split(';').collect();
        // Last charset parameter wins
        let charset_label = params
            .iter()
            .rev()
            .find_map(|p| p.strip_prefix(CHARSET_PARAM));
        let base64 = params.iter().any(|p| *p == BASE64_PARAM);

        Ok(Self {
            kind: PayloadKind::Typed { params },
            charset_label,
            base64,
            payload,
        })
    }

    pub fn kind(&self) -> &PayloadKind<'a> {
        &self.kind
    }

    /// The declared charset, UTF-8 when none is given.
    pub fn charset(&self) -> Result<Charset, DecodeError> {
        self.charset_label
            .map_or_else(|| Ok(Charset::default()), Charset::from_label)
    }

    pub fn is_base64(&self) -> bool {
        self.base64
    }

    /// One line describing how the payload was classified, for the
    /// diagnostic stream. Untyped `data:,` payloads are not traced.
    pub fn classification(&self) -> Option<String> {
        match &self.kind {
            PayloadKind::Bare => Some("No type specified, assuming url-encoding".to_string()),
            PayloadKind::Untyped => None,
            PayloadKind::Typed { params } => Some(format!("data URL parameters: {:?}", params)),
        }
    }

    pub fn decode(&self) -> Result<String, DecodeError> {
        let charset = self.charset()?;

        if self.base64 {
            let compact: String = self
                .payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| DecodeError::Base64 {
                    message: e.to_string(),
                })?;

            return charset.decode_strict(&bytes);
        }

        // Invalid escapes stay literal and undecodable bytes become U+FFFD
        let bytes = urlencoding::decode_binary(self.payload.as_bytes());
        Ok(charset.decode_lossy(&bytes))
    }
}

/// Decode an Ignition payload string into text.
pub fn decode_data(data: &str) -> Result<String, DecodeError> {
    DataUrl::parse(data)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_roundtrip() {
        let samples = [
            "hello world",
            "[Unit]\nDescription=CRI-O\n\n[Service]\nExecStart=/usr/bin/crio $OPTS\n",
            "unicode: ünïcødé ✓ 100%",
            "",
        ];

        for sample in &samples {
            let encoded = urlencoding::encode(sample);
            assert_eq!(decode_data(&encoded).unwrap(), *sample);
        }
    }

    #[test]
    fn test_bare_string_is_classified() {
        let url = DataUrl::parse("a%20b").unwrap();
        assert_eq!(url.kind(), &PayloadKind::Bare);
        assert_eq!(
            url.classification().as_deref(),
            Some("No type specified, assuming url-encoding")
        );
    }

    #[test]
    fn test_untyped_data_url() {
        let url = DataUrl::parse("data:,hello%0Aworld").unwrap();
        assert_eq!(url.kind(), &PayloadKind::Untyped);
        assert!(url.classification().is_none());
        assert_eq!(url.decode().unwrap(), "hello\nworld");
    }

    #[test]
    fn test_base64_payload() {
        let text = "pids_limit = 1024\n";
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        let input = format!("data:;base64,{}", encoded);

        let url = DataUrl::parse(&input).unwrap();
        assert!(url.is_base64());
        assert_eq!(url.decode().unwrap(), text);
    }

    #[test]
    fn test_base64_with_mime_and_charset() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("[crio]\n");
        let input = format!("data:text/plain;charset=utf-8;base64,{}", encoded);

        let url = DataUrl::parse(&input).unwrap();
        assert_eq!(
            url.kind(),
            &PayloadKind::Typed {
                params: vec!["text/plain", "charset=utf-8", "base64"]
            }
        );
        assert_eq!(
            url.classification().unwrap(),
            r#"data URL parameters: ["text/plain", "charset=utf-8", "base64"]"#
        );
        assert_eq!(url.decode().unwrap(), "[crio]\n");
    }

    #[test]
    fn test_base64_ignores_line_breaks() {
        assert_eq!(decode_data("data:;base64,aGVs\nbG8=").unwrap(), "hello");
    }

    #[test]
    fn test_declared_charset_is_used_for_percent_decoding() {
        assert_eq!(decode_data("data:;charset=iso-8859-1,caf%e9").unwrap(), "café");
    }

    #[test]
    fn test_declared_charset_is_used_for_base64() {
        // "café" in latin-1
        assert_eq!(decode_data("data:;charset=latin1;base64,Y2Fm6Q==").unwrap(), "café");
    }

    #[test]
    fn test_latin1_maps_bytes_to_same_code_points() {
        assert_eq!(decode_data("data:;charset=iso-8859-1,%80").unwrap(), "\u{80}");
        assert_eq!(decode_data("data:;charset=latin-1;base64,gJ8=").unwrap(), "\u{80}\u{9F}");
    }

    #[test]
    fn test_ascii_is_strict_for_base64() {
        // 0xE9
        let err = decode_data("data:;charset=ascii;base64,6Q==").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidText { .. }));
    }

    #[test]
    fn test_ascii_percent_payload_is_lossy() {
        assert_eq!(decode_data("data:;charset=us-ascii,caf%e9").unwrap(), "caf\u{FFFD}");
    }

    #[test]
    fn test_last_charset_wins() {
        let url = DataUrl::parse("data:text/plain;charset=klingon;charset=latin1,%e9").unwrap();
        assert_eq!(url.charset().unwrap(), Charset::Latin1);
        assert_eq!(url.decode().unwrap(), "é");
    }

    #[test]
    fn test_default_charset_is_utf8() {
        let url = DataUrl::parse("data:text/plain,caf%C3%A9").unwrap();
        assert_eq!(url.charset().unwrap(), Charset::default());
        assert_eq!(url.decode().unwrap(), "café");
    }

    #[test]
    fn test_malformed_base64() {
        let err = decode_data("data:;base64,!!!not base64").unwrap_err();
        assert!(matches!(err, DecodeError::Base64 { .. }));
    }

    #[test]
    fn test_unknown_charset() {
        let err = decode_data("data:;charset=klingon,abc").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedCharset {
                label: "klingon".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_charset_is_still_classified() {
        let url = DataUrl::parse("data:text/plain;charset=klingon,abc").unwrap();
        assert_eq!(
            url.classification().unwrap(),
            r#"data URL parameters: ["text/plain", "charset=klingon"]"#
        );
        assert!(matches!(
            url.decode(),
            Err(DecodeError::UnsupportedCharset { .. })
        ));
    }

    #[test]
    fn test_invalid_bytes_for_charset() {
        // 0xFF 0xFE is not UTF-8
        let err = decode_data("data:;base64,//4=").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidText { .. }));
    }

    #[test]
    fn test_missing_comma() {
        assert_eq!(
            decode_data("data:text/plain").unwrap_err(),
            DecodeError::MissingComma
        );
    }

    #[test]
    fn test_payload_may_contain_commas() {
        assert_eq!(decode_data("data:,a,b,c").unwrap(), "a,b,c");
    }

    #[test]
    fn test_invalid_percent_escape_stays_literal() {
        assert_eq!(decode_data("data:,100%zz").unwrap(), "100%zz");
    }
}
