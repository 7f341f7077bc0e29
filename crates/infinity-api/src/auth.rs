use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Decorates an outgoing request with credentials.
///
/// Called once per attempt, so implementations must be stateless and
/// cheap. The engine shares one instance across concurrent calls.
pub trait Authenticator: Send + Sync + fmt::Debug {
    fn authenticate(&self, request: &mut reqwest::Request) -> Result<(), Error>;
}

/// Build a sensitive header value, keeping the secret out of error text.
fn secret_header(value: &str) -> Result<HeaderValue, Error> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| Error::configuration("credential contains characters not valid in a header"))?;
    header.set_sensitive(true);
    Ok(header)
}

// ── Basic ────────────────────────────────────────────────────────────

/// `Authorization: Basic base64(user:pass)`.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    username: String,
    password: SecretString,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Authenticator for BasicAuth {
    fn authenticate(&self, request: &mut reqwest::Request) -> Result<(), Error> {
        let encoded = STANDARD.encode(format!(
            "{}:{}",
            self.username,
            self.password.expose_secret()
        ));
        let value = secret_header(&format!("Basic {encoded}"))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

// ── Token / Bearer ───────────────────────────────────────────────────

/// `Authorization: Token <token>`.
#[derive(Debug, Clone)]
pub struct TokenAuth {
    token: SecretString,
}

impl TokenAuth {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authenticator for TokenAuth {
    fn authenticate(&self, request: &mut reqwest::Request) -> Result<(), Error> {
        let value = secret_header(&format!("Token {}", self.token.expose_secret()))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// `Authorization: Bearer <token>` (OAuth2 access tokens).
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token: SecretString,
}

impl BearerAuth {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authenticator for BearerAuth {
    fn authenticate(&self, request: &mut reqwest::Request) -> Result<(), Error> {
        let value = secret_header(&format!("Bearer {}", self.token.expose_secret()))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

// ── Custom header ────────────────────────────────────────────────────

/// Arbitrary `<name>: <value>` credential header (API gateways, proxies).
#[derive(Clone)]
pub struct CustomHeaderAuth {
    name: HeaderName,
    value: SecretString,
}

impl CustomHeaderAuth {
    pub fn new(name: &str, value: impl Into<SecretString>) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::configuration("custom auth header name must not be empty"));
        }
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::configuration(format!("invalid auth header name {name:?}: {e}")))?;
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.name
    }
}

impl fmt::Debug for CustomHeaderAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomHeaderAuth")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl Authenticator for CustomHeaderAuth {
    fn authenticate(&self, request: &mut reqwest::Request) -> Result<(), Error> {
        let value = secret_header(self.value.expose_secret())?;
        request.headers_mut().insert(self.name.clone(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> reqwest::Request {
        reqwest::Request::new(
            reqwest::Method::GET,
            "https://mgr.example.com/api/admin/status/v1/conference/"
                .parse()
                .unwrap(),
        )
    }

    fn header(req: &reqwest::Request, name: &str) -> String {
        req.headers()
            .get(name)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[test]
    fn basic_encodes_user_and_password() {
        let mut req = request();
        BasicAuth::new("admin", "s3cret".to_owned())
            .authenticate(&mut req)
            .unwrap();
        assert_eq!(header(&req, "authorization"), "Basic YWRtaW46czNjcmV0");
        assert!(req.headers()["authorization"].is_sensitive());
    }

    #[test]
    fn token_and_bearer_prefixes() {
        let mut req = request();
        TokenAuth::new("abc".to_owned()).authenticate(&mut req).unwrap();
        assert_eq!(header(&req, "authorization"), "Token abc");

        BearerAuth::new("xyz".to_owned()).authenticate(&mut req).unwrap();
        assert_eq!(header(&req, "authorization"), "Bearer xyz");
    }

    #[test]
    fn custom_header() {
        let auth = CustomHeaderAuth::new("X-Api-Key", "k-123".to_owned()).unwrap();
        let mut req = request();
        auth.authenticate(&mut req).unwrap();
        assert_eq!(header(&req, "x-api-key"), "k-123");
        assert!(!format!("{auth:?}").contains("k-123"));
    }

    #[test]
    fn custom_header_rejects_empty_name() {
        let err = CustomHeaderAuth::new("", "v".to_owned()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn invalid_token_characters_fail() {
        let mut req = request();
        let err = TokenAuth::new("bad\ntoken".to_owned())
            .authenticate(&mut req)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
