// Response body decoding
//
// JSON is the Controller's primary format. A handful of creation endpoints
// answer in XML, so `decode_body` picks the format from the content type and
// falls back to XML when no content type was sent.

use std::sync::LazyLock;

use bytes::Bytes;
use regex::Regex;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::Error;

static RESOURCE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)/?$").expect("resource id pattern is valid"));

static RESOURCE_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})/?$")
        .expect("resource uuid pattern is valid")
});

const PREVIEW_LEN: usize = 200;

fn preview(body: &str) -> &str {
    let mut end = body.len().min(PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

fn decode_error(e: &impl std::fmt::Display, body: &[u8]) -> Error {
    let body = String::from_utf8_lossy(body).into_owned();
    Error::Decode {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    }
}

/// Decode a JSON body. An empty body decodes as `null`, which suits `()`,
/// `Option<T>`, and `serde_json::Value` targets.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    let trimmed = body.trim_ascii();
    let input: &[u8] = if trimmed.is_empty() { b"null" } else { trimmed };
    serde_json::from_slice(input).map_err(|e| decode_error(&e, body))
}

/// Decode an XML body.
pub fn decode_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    let text = std::str::from_utf8(body).map_err(|e| decode_error(&e, body))?;
    quick_xml::de::from_str(text).map_err(|e| decode_error(&e, body))
}

/// Body format implied by a `Content-Type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Xml,
    /// No content type: try JSON, then XML.
    Unknown,
}

impl BodyFormat {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(raw) = content_type.map(str::trim).filter(|c| !c.is_empty()) else {
            return Self::Unknown;
        };
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("application/xml") || lower.starts_with("text/xml") {
            Self::Xml
        } else {
            Self::Json
        }
    }
}

/// Decode according to the response content type.
pub fn decode_body<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T, Error> {
    match BodyFormat::from_content_type(content_type) {
        BodyFormat::Json => decode_json(body),
        BodyFormat::Xml => decode_xml(body),
        BodyFormat::Unknown => decode_json(body).or_else(|json_err| {
            tracing::trace!(error = %json_err, "JSON decode failed, trying XML");
            decode_xml(body).map_err(|_| json_err)
        }),
    }
}

// ── PostResponse ─────────────────────────────────────────────────────

/// Result of a creation call: the raw body plus the new resource's URI.
#[derive(Debug, Clone, Default)]
pub struct PostResponse {
    pub body: Bytes,
    /// Value of the `Location` header, empty when the Controller sent none.
    pub resource_uri: String,
    pub content_type: Option<String>,
}

impl PostResponse {
    fn uri_path(&self) -> &str {
        // Location may be absolute or a bare path; only the path matters.
        let uri = self.resource_uri.trim();
        uri.find("://")
            .and_then(|scheme_end| {
                let rest = &uri[scheme_end + 3..];
                rest.find('/').map(|path_start| &rest[path_start..])
            })
            .unwrap_or(uri)
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }

    /// The trailing integer ID, e.g. `12345` from `/api/admin/configuration/v1/conference/12345/`.
    pub fn resource_id(&self) -> Result<u64, Error> {
        RESOURCE_ID
            .captures(self.uri_path())
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| Error::InvalidResourceUri {
                uri: self.resource_uri.clone(),
                expected: "numeric resource ID",
            })
    }

    /// The trailing lowercase UUID.
    pub fn resource_uuid(&self) -> Result<Uuid, Error> {
        RESOURCE_UUID
            .captures(self.uri_path())
            .and_then(|c| c.get(1))
            .and_then(|m| Uuid::parse_str(m.as_str()).ok())
            .ok_or_else(|| Error::InvalidResourceUri {
                uri: self.resource_uri.clone(),
                expected: "resource UUID",
            })
    }

    /// Decode the body content-type aware (see [`decode_body`]).
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        decode_body(self.content_type.as_deref(), &self.body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Created {
        id: u64,
    }

    fn post(uri: &str) -> PostResponse {
        PostResponse {
            resource_uri: uri.to_owned(),
            ..PostResponse::default()
        }
    }

    #[test]
    fn resource_id_from_absolute_uri() {
        let resp = post("https://host/api/admin/resource/12345/");
        assert_eq!(resp.resource_id().unwrap(), 12345);
    }

    #[test]
    fn resource_id_without_trailing_slash_or_host() {
        assert_eq!(post("/api/admin/configuration/v1/conference/7").resource_id().unwrap(), 7);
    }

    #[test]
    fn resource_id_mismatch() {
        let err = post("https://host/api/admin/resource/abc/").resource_id().unwrap_err();
        assert!(matches!(err, Error::InvalidResourceUri { .. }));
        assert!(post("").resource_id().is_err());
    }

    #[test]
    fn resource_uuid_extraction() {
        let resp = post("https://host/api/admin/status/v1/participant/0b7f2a4e-1c2d-4e5f-8a9b-0c1d2e3f4a5b/");
        assert_eq!(
            resp.resource_uuid().unwrap().to_string(),
            "0b7f2a4e-1c2d-4e5f-8a9b-0c1d2e3f4a5b"
        );
        assert!(post("https://host/x/12/").resource_uuid().is_err());
    }

    #[test]
    fn empty_body_decodes_as_null() {
        decode_json::<()>(b"").unwrap();
        assert_eq!(decode_json::<Option<Created>>(b"  ").unwrap(), None);
        assert!(decode_json::<Created>(b"").is_err());
    }

    #[test]
    fn decode_error_keeps_body() {
        let err = decode_json::<Created>(b"{not json").unwrap_err();
        match err {
            Error::Decode { body, .. } => assert_eq!(body, "{not json"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn content_type_selects_format() {
        assert_eq!(BodyFormat::from_content_type(None), BodyFormat::Unknown);
        assert_eq!(
            BodyFormat::from_content_type(Some("application/xml; charset=utf-8")),
            BodyFormat::Xml
        );
        assert_eq!(BodyFormat::from_content_type(Some("text/xml")), BodyFormat::Xml);
        assert_eq!(
            BodyFormat::from_content_type(Some("application/json")),
            BodyFormat::Json
        );
    }

    #[test]
    fn xml_body_with_xml_content_type() {
        let body = b"<response><id>12345</id></response>";
        let decoded: Created = decode_body(Some("application/xml"), body).unwrap();
        assert_eq!(decoded, Created { id: 12345 });
    }

    #[test]
    fn unknown_content_type_falls_back_to_xml() {
        let decoded: Created = decode_body(None, b"<response><id>9</id></response>").unwrap();
        assert_eq!(decoded.id, 9);
        let decoded: Created = decode_body(None, br#"{"id":10}"#).unwrap();
        assert_eq!(decoded.id, 10);
    }

    #[test]
    fn json_content_type_does_not_fall_back() {
        assert!(decode_body::<Created>(Some("application/json"), b"<response><id>1</id></response>").is_err());
    }
}
