// Management API HTTP engine
//
// Wraps `reqwest::Client` with Controller-specific URL construction,
// credential injection, the retry loop, and error-envelope mapping. Resource
// services sit on top through the `Requester` trait and never talk to
// `reqwest` directly.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, LOCATION, USER_AGENT,
};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{Authenticator, BasicAuth, BearerAuth, TokenAuth};
use crate::codec::{PostResponse, decode_json};
use crate::command::CommandService;
use crate::config::ConfigService;
use crate::context::RequestContext;
use crate::error::{ApiError, Error};
use crate::history::HistoryService;
use crate::options::QueryParams;
use crate::requester::Requester;
use crate::retry::{RetryPolicy, is_retriable};
use crate::status::StatusService;
use crate::transport::TransportConfig;

/// Path every management endpoint lives under.
pub const API_PREFIX: &str = "api/admin/";

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("infinity-sdk/", env!("CARGO_PKG_VERSION"));

const APPLICATION_JSON: &str = "application/json";

// ── Request / response descriptors ───────────────────────────────────

/// One management API call, before URL resolution.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    pub method: Method,
    /// Path below `/api/admin/`; a leading slash is ignored.
    pub endpoint: &'a str,
    /// Pre-encoded JSON body.
    pub body: Option<Bytes>,
    pub query: Option<&'a QueryParams>,
    pub headers: HeaderMap,
}

impl<'a> ApiRequest<'a> {
    pub fn new(method: Method, endpoint: &'a str) -> Self {
        Self {
            method,
            endpoint,
            body: None,
            query: None,
            headers: HeaderMap::new(),
        }
    }

    /// Encode `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        let encoded = serde_json::to_vec(body).map_err(Error::Serialization)?;
        self.body = Some(Bytes::from(encoded));
        Ok(self)
    }

    pub fn query(mut self, query: &'a QueryParams) -> Self {
        self.query = Some(query);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully read Controller response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON (empty body decodes as `null`).
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        decode_json(&self.body)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Controller management API.
///
/// Cheaply cloneable; clones share the connection pool, authenticator, and
/// retry policy. Safe to use from many tasks at once.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<Arc<dyn Authenticator>>,
    retry: RetryPolicy,
    user_agent: HeaderValue,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth", &self.inner.auth)
            .field("retry", &self.inner.retry)
            .field("user_agent", &self.inner.user_agent)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Controller root, normalized to end in `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry
    }

    pub fn user_agent(&self) -> &str {
        self.inner.user_agent.to_str().unwrap_or_default()
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    // ── Services ─────────────────────────────────────────────────────

    /// Configuration resources (`config/v1/…`).
    pub fn config(&self) -> ConfigService<&Self> {
        ConfigService::new(self)
    }

    /// Live status (`status/v1/…`).
    pub fn status(&self) -> StatusService<&Self> {
        StatusService::new(self)
    }

    /// Historical records (`history/v1/…`).
    pub fn history(&self) -> HistoryService<&Self> {
        HistoryService::new(self)
    }

    /// Imperative commands (`command/v1/…`).
    pub fn command(&self) -> CommandService<&Self> {
        CommandService::new(self)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}/api/admin/{endpoint}?{query}` with duplicate slashes collapsed.
    pub fn endpoint_url(&self, endpoint: &str, query: Option<&QueryParams>) -> Url {
        let mut url = self.inner.base_url.clone();
        let joined = format!(
            "{}/{API_PREFIX}{}",
            url.path().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        url.set_path(&collapse_slashes(&joined));
        url.set_query(None);
        url.set_fragment(None);

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.pairs() {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    // ── Engine ───────────────────────────────────────────────────────

    /// Perform one logical call, retrying transient failures.
    ///
    /// Returns the response for any status below 400. Controller errors come
    /// back as [`Error::Api`]; transient failures that outlive the retry
    /// budget come back wrapped in [`Error::RetriesExhausted`]. Cancellation
    /// of `ctx` aborts the in-flight attempt or backoff and is returned as-is.
    pub async fn request(
        &self,
        ctx: &RequestContext,
        req: ApiRequest<'_>,
    ) -> Result<ApiResponse, Error> {
        let url = self.endpoint_url(req.endpoint, req.query);
        let policy = self.inner.retry;
        let mut attempts: u32 = 0;

        loop {
            if let Some(err) = ctx.err() {
                debug!(%url, attempts, "context done before attempt");
                return Err(err);
            }

            attempts += 1;
            debug!(method = %req.method, %url, attempt = attempts, "sending request");

            let outcome = tokio::select! {
                biased;
                err = ctx.done() => {
                    debug!(%url, attempt = attempts, "request aborted by context");
                    return Err(err);
                }
                result = self.attempt(&req, &url) => result,
            };

            let error = match outcome {
                Ok(resp) if resp.status.as_u16() < 400 => {
                    trace!(status = %resp.status, bytes = resp.body.len(), "response received");
                    return Ok(resp);
                }
                Ok(resp) => Error::Api(ApiError::from_response(resp.status, resp.body)),
                Err(err) => err,
            };

            if !is_retriable(error.status(), Some(&error)) {
                return Err(error);
            }

            if attempts >= policy.max_attempts() {
                if policy.max_retries == 0 {
                    return Err(error);
                }
                warn!(%url, attempts, error = %error, "giving up after retries");
                return Err(Error::RetriesExhausted {
                    attempts,
                    source: Box::new(error),
                });
            }

            let delay = policy.calculate_backoff(attempts);
            warn!(
                %url,
                attempt = attempts,
                error = %error,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retriable failure, backing off"
            );

            tokio::select! {
                biased;
                err = ctx.done() => {
                    debug!(%url, attempts, "backoff interrupted by context");
                    return Err(err);
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// A single round-trip: build, authenticate, send, read the whole body.
    async fn attempt(&self, req: &ApiRequest<'_>, url: &Url) -> Result<ApiResponse, Error> {
        let mut request = reqwest::Request::new(req.method.clone(), url.clone());

        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(USER_AGENT, self.inner.user_agent.clone());
        for (name, value) in &req.headers {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(body) = &req.body {
            *request.body_mut() = Some(reqwest::Body::from(body.clone()));
        }

        if let Some(auth) = &self.inner.auth {
            auth.authenticate(&mut request)?;
        }

        let resp = self.inner.http.execute(request).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// POST and capture the `Location` of the created resource.
    async fn post_capturing_location<B>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> Result<PostResponse, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let req = ApiRequest::new(Method::POST, endpoint).json(body)?;
        let resp = self.request(ctx, req).await?;
        Ok(PostResponse {
            resource_uri: resp.location().unwrap_or_default().to_owned(),
            content_type: resp.content_type().map(str::to_owned),
            body: resp.body,
        })
    }

    async fn send_json<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: Option<&QueryParams>,
    ) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = ApiRequest::new(method, endpoint);
        if let Some(body) = body {
            req = req.json(body)?;
        }
        if let Some(query) = query {
            req = req.query(query);
        }
        let resp = self.request(ctx, req).await?;
        resp.json()
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }
    out
}

impl Requester for Client {
    async fn get_json<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        query: Option<&QueryParams>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        self.send_json::<(), T>(ctx, Method::GET, endpoint, None, query)
            .await
    }

    async fn post_json<B, T>(&self, ctx: &RequestContext, endpoint: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.send_json(ctx, Method::POST, endpoint, Some(body), None)
            .await
    }

    async fn put_json<B, T>(&self, ctx: &RequestContext, endpoint: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.send_json(ctx, Method::PUT, endpoint, Some(body), None)
            .await
    }

    async fn patch_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.send_json(ctx, Method::PATCH, endpoint, Some(body), None)
            .await
    }

    async fn delete_json<T>(&self, ctx: &RequestContext, endpoint: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        self.send_json::<(), T>(ctx, Method::DELETE, endpoint, None, None)
            .await
    }

    async fn post_with_response<B>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> Result<PostResponse, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.post_capturing_location(ctx, endpoint, body).await
    }
}

// ── Builder ──────────────────────────────────────────────────────────

/// Builder for [`Client`].
///
/// Option errors are remembered and reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    http: Option<reqwest::Client>,
    transport: TransportConfig,
    auth: Option<Arc<dyn Authenticator>>,
    retry: Option<RetryPolicy>,
    user_agent: Option<String>,
    error: Option<Error>,
}

impl ClientBuilder {
    fn fail(mut self, err: Error) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }

    /// Controller root, e.g. `https://mgr.example.com`. Must be absolute.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a caller-built HTTP client (proxy, pooling, TLS). Overrides
    /// [`transport`](Self::transport).
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Settings for the HTTP client built when none is supplied.
    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn auth(mut self, auth: impl Authenticator + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn shared_auth(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        self.auth(BasicAuth::new(username, password))
    }

    pub fn token_auth(self, token: impl Into<SecretString>) -> Self {
        self.auth(TokenAuth::new(token))
    }

    pub fn bearer_auth(self, token: impl Into<SecretString>) -> Self {
        self.auth(BearerAuth::new(token))
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Keep the current backoff schedule, change only the retry count.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        let policy = self.retry.unwrap_or_default();
        self.retry = Some(policy.with_max_retries(max_retries));
        self
    }

    pub fn no_retries(self) -> Self {
        self.max_retries(0)
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        if user_agent.trim().is_empty() {
            return self.fail(Error::configuration("user agent must not be empty"));
        }
        self.user_agent = Some(user_agent);
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let raw = self
            .base_url
            .ok_or_else(|| Error::configuration("base URL is required"))?;
        let base_url = normalize_base_url(&raw)?;

        let retry = self.retry.unwrap_or_default();
        retry.validate()?;

        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| Error::configuration(format!("invalid user agent: {e}")))?;

        let http = match self.http {
            Some(http) => http,
            None => self.transport.build_client()?,
        };

        debug!(base_url = %base_url, max_retries = retry.max_retries, "management client ready");

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                auth: self.auth,
                retry,
                user_agent,
            }),
        })
    }
}

/// Parse and normalize the Controller root.
///
/// Requires an absolute http(s) URL. A trailing `/api/admin` the caller
/// included is dropped so the prefix is never doubled.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() || !url.has_host() {
        return Err(Error::configuration(format!(
            "base URL must be an absolute http(s) URL, got {raw:?}"
        )));
    }

    let path = collapse_slashes(url.path().trim_end_matches('/'));
    let path = path.strip_suffix("/api/admin").unwrap_or(&path);
    url.set_path(&format!("{path}/"));
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
