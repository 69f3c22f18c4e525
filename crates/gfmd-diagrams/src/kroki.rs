//! Kroki image links.
//!
//! Kroki accepts diagrams in the URL path: the source is zlib-compressed at
//! the strongest level and encoded with URL-safe base64.
//! See <https://docs.kroki.io/kroki/setup/encode-diagram/>.
//!
//! Encoding is deterministic, so the same diagram always produces the same link.

use std::fmt;
use std::io::{Read, Write};

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::consts::{DEFAULT_KROKI_URL, OUTPUT_FORMAT};
use crate::language::MarkupLanguage;

/// URL-safe base64 that emits padding but accepts payloads with or without it.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Payload decoding error.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid zlib stream: {0}")]
    Inflate(#[from] std::io::Error),
    #[error("diagram source is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("not a Kroki link: {0}")]
    NotALink(String),
}

/// Encode diagram source as a Kroki URL path payload.
#[must_use]
pub fn encode_payload(source: &str) -> String {
    URL_SAFE_LENIENT.encode(zlib_compress(source.as_bytes()))
}

/// Compress `bytes` into a zlib stream at the strongest level.
///
/// # Panics
///
/// Only if the in-memory writer fails. `Vec<u8>` never returns an I/O error,
/// so this cannot happen in practice.
fn zlib_compress(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(bytes)
        .and_then(|()| encoder.finish())
        .expect("zlib into Vec<u8> is infallible")
}

/// Decode a payload produced by [`encode_payload`] back to diagram source.
pub fn decode_payload(payload: &str) -> Result<String, DecodeError> {
    let compressed = URL_SAFE_LENIENT.decode(payload.trim())?;
    let mut bytes = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

/// Kroki image link for a single diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrokiLink {
    /// Kroki server URL without trailing slash.
    pub base_url: String,
    /// Kroki endpoint (diagram type).
    pub endpoint: String,
    /// Output format.
    pub format: String,
    /// Encoded diagram source.
    pub payload: String,
}

impl KrokiLink {
    /// Build the link for `source` on the Kroki server at `base_url`.
    #[must_use]
    pub fn new(base_url: &str, language: MarkupLanguage, source: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            endpoint: language.as_str().to_owned(),
            format: OUTPUT_FORMAT.to_owned(),
            payload: encode_payload(source),
        }
    }

    /// Split a link of the form `{base}/{endpoint}/{format}/{payload}`.
    pub fn parse(url: &str) -> Result<Self, DecodeError> {
        let not_a_link = || DecodeError::NotALink(url.to_owned());

        let (rest, payload) = url.trim().rsplit_once('/').ok_or_else(not_a_link)?;
        let (rest, format) = rest.rsplit_once('/').ok_or_else(not_a_link)?;
        let (base_url, endpoint) = rest.rsplit_once('/').ok_or_else(not_a_link)?;

        if payload.is_empty() || format.is_empty() || endpoint.is_empty() || base_url.is_empty() {
            return Err(not_a_link());
        }

        Ok(Self {
            base_url: base_url.to_owned(),
            endpoint: endpoint.to_owned(),
            format: format.to_owned(),
            payload: payload.to_owned(),
        })
    }

    /// Decode the diagram source carried by this link.
    pub fn decode_source(&self) -> Result<String, DecodeError> {
        decode_payload(&self.payload)
    }
}

impl fmt::Display for KrokiLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.base_url, self.endpoint, self.format, self.payload
        )
    }
}

/// Build a link on the public Kroki instance.
///
/// # Example
///
/// ```
/// use gfmd_diagrams::{MarkupLanguage, encode};
///
/// let link = encode(MarkupLanguage::Mermaid, "graph TD; A-->B;");
/// assert!(link.starts_with("https://kroki.io/mermaid/svg/"));
/// ```
#[must_use]
pub fn encode(language: MarkupLanguage, source: &str) -> String {
    encode_with_base(DEFAULT_KROKI_URL, language, source)
}

/// Build a link on the Kroki server at `base_url`.
#[must_use]
pub fn encode_with_base(base_url: &str, language: MarkupLanguage, source: &str) -> String {
    KrokiLink::new(base_url, language, source).to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = "graph TD; A-->B;";

    #[test]
    fn test_encode_url_shape() {
        let link = encode(MarkupLanguage::Mermaid, SAMPLE);
        let payload = link
            .strip_prefix("https://kroki.io/mermaid/svg/")
            .expect("unexpected link prefix");

        assert_eq!(payload, encode_payload(SAMPLE));
        assert!(!payload.contains('/'));
        assert!(!payload.contains('+'));
    }

    #[test]
    fn test_encode_matches_reference_zlib() {
        assert_eq!(
            encode(MarkupLanguage::Mermaid, SAMPLE),
            "https://kroki.io/mermaid/svg/eNpLL0osyFAIcbFWcNTVtXOyBgArZAR8"
        );
    }

    #[test]
    fn test_multiline_payload_matches_reference_zlib() {
        let source = "@startuml\nAlice -> Bob: hello hello hello hello\nBob -> Alice: hi\n@enduml";
        assert_eq!(
            encode_payload(source),
            "eNpzKC5JLCopzc3hcszJTE5V0LVTcMpPslLISM3JycckuYCSIDVgxUBVmVwOqXkpQO0AeDkYDQ=="
        );
    }

    #[test]
    fn test_empty_payload_matches_reference_zlib() {
        assert_eq!(encode_payload(""), "eNoDAAAAAAE=");
    }

    #[test]
    fn test_zlib_compress_is_inflatable() {
        let compressed = zlib_compress(b"A-->B");
        let mut inflated = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, b"A-->B");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let first = encode(MarkupLanguage::PlantUml, "@startuml\nA -> B\n@enduml");
        let second = encode(MarkupLanguage::PlantUml, "@startuml\nA -> B\n@enduml");
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_starts_with_zlib_header() {
        // 0x78 (deflate, 32K window) encodes to 'e'
        assert!(encode_payload(SAMPLE).starts_with('e'));
    }

    #[test]
    fn test_round_trip() {
        let sources = [
            SAMPLE,
            "",
            "@startuml\nAlice -> Bob: Привет\n@enduml",
            "sequenceDiagram\r\n  A->>B: ?&=/+\r\n",
        ];
        for source in sources {
            let decoded = decode_payload(&encode_payload(source)).unwrap();
            assert_eq!(decoded, source);
        }
    }

    #[test]
    fn test_empty_source_still_encodes() {
        let link = encode(MarkupLanguage::Mermaid, "");
        assert!(link.len() > "https://kroki.io/mermaid/svg/".len());
    }

    #[test]
    fn test_decode_accepts_missing_padding() {
        let payload = encode_payload("graph LR; A-->B");
        let unpadded = payload.trim_end_matches('=');
        assert_eq!(decode_payload(unpadded).unwrap(), "graph LR; A-->B");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_payload("not base64!"),
            Err(DecodeError::Base64(_))
        ));
        // Valid base64, not a zlib stream
        assert!(matches!(
            decode_payload("aGVsbG8="),
            Err(DecodeError::Inflate(_))
        ));
    }

    #[test]
    fn test_custom_base_url() {
        let link = encode_with_base("http://localhost:8000/", MarkupLanguage::Mermaid, SAMPLE);
        assert!(link.starts_with("http://localhost:8000/mermaid/svg/"));
    }

    #[test]
    fn test_link_parse_round_trip() {
        let link = KrokiLink::new("https://kroki.io", MarkupLanguage::PlantUml, "A -> B");
        let parsed = KrokiLink::parse(&link.to_string()).unwrap();

        assert_eq!(parsed, link);
        assert_eq!(parsed.decode_source().unwrap(), "A -> B");
    }

    #[test]
    fn test_link_parse_rejects_short_urls() {
        assert!(matches!(
            KrokiLink::parse("mermaid/svg"),
            Err(DecodeError::NotALink(_))
        ));
        assert!(KrokiLink::parse("https://kroki.io/mermaid/svg/").is_err());
    }
}
