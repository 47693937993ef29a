//! Embedded image payloads (`data:` URIs).

use std::fmt;
use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use thiserror::Error;

/// Media type assumed when a payload arrives without a `data:` header.
pub const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// Media type the restoration model answers with.
pub const RESULT_MEDIA_TYPE: &str = "image/png";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is empty")]
    Empty,
    #[error("payload body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Image bytes encoded as a base64 `data:` URI plus a declared media type.
///
/// Payloads are immutable: every constructor produces a finished value and
/// nothing hands out mutable access to the body.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    media_type: Option<String>,
    body: String,
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:(.*);base64,").expect("data URI header pattern is valid")
    })
}

impl ImagePayload {
    /// Encode raw bytes under the given media type.
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: Some(media_type.into()),
            body: STANDARD.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded body.
    pub fn from_base64(media_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            media_type: Some(media_type.into()),
            body: body.into(),
        }
    }

    /// Accept either a full `data:<type>;base64,<body>` URI or a bare base64 body.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PayloadError::Empty);
        }

        let media_type = header_pattern()
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let body = match raw.split_once(',') {
            Some((_, body)) if !body.is_empty() => body,
            _ => raw,
        };

        Ok(Self {
            media_type,
            body: body.to_string(),
        })
    }

    /// Declared media type, or [`FALLBACK_MEDIA_TYPE`] when none was given.
    pub fn media_type(&self) -> &str {
        self.media_type.as_deref().unwrap_or(FALLBACK_MEDIA_TYPE)
    }

    pub fn base64_body(&self) -> &str {
        &self.body
    }

    /// Decode the body back into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        Ok(STANDARD.decode(self.body.as_bytes())?)
    }

    pub fn as_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type(), self.body)
    }

    /// Approximate decoded size, useful for logging without decoding.
    pub fn approx_len(&self) -> usize {
        self.body.len() / 4 * 3
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type())
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type(), self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    #[test]
    fn decode_matches_source_bytes() {
        let payload = ImagePayload::from_bytes("image/png", PNG_MAGIC);
        assert_eq!(payload.decode().unwrap(), PNG_MAGIC);
        assert!(payload.as_data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn parse_reads_header_media_type() {
        let payload = ImagePayload::parse("data:image/webp;base64,AAEC").unwrap();
        assert_eq!(payload.media_type(), "image/webp");
        assert_eq!(payload.base64_body(), "AAEC");
        assert_eq!(payload.decode().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn bare_body_falls_back_to_jpeg() {
        let payload = ImagePayload::parse("AAEC").unwrap();
        assert_eq!(payload.media_type(), FALLBACK_MEDIA_TYPE);
        assert_eq!(payload.base64_body(), "AAEC");
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(ImagePayload::parse("  "), Err(PayloadError::Empty)));
    }

    #[test]
    fn invalid_body_fails_to_decode() {
        let payload = ImagePayload::parse("data:image/png;base64,@@@").unwrap();
        assert!(matches!(payload.decode(), Err(PayloadError::Base64(_))));
    }

    #[test]
    fn data_uri_round_trips_through_parse() {
        let original = ImagePayload::from_bytes("image/jpeg", b"jpeg bytes");
        let reparsed = ImagePayload::parse(&original.as_data_uri()).unwrap();
        assert_eq!(original, reparsed);
    }
}
