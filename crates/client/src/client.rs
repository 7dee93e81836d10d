//! Core Wharf API client.

use std::time::Duration;

use async_trait::async_trait;
use model::response::AppVersion;
use model::{
    EndpointRequirement, Query, SemVer, VersionFetchError, VersionFlags, VersionGate,
    VersionSource,
};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::redact::REDACTED;
use crate::request::{build_request, execute, ApiRequest, RequestBody};

/// Default timeout applied to every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Connection settings and the HTTP client shared by every endpoint call.
#[derive(Clone)]
pub(crate) struct Transport {
    base_url: String,
    auth_header: Option<String>,
    http: HttpClient,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("auth_header", &self.auth_header.as_ref().map(|_| REDACTED))
            .finish()
    }
}

impl Transport {
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn auth_header(&self) -> Option<&str> {
        self.auth_header.as_deref()
    }

    /// Runs a request through the pipeline and returns the raw body.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let prepared = build_request(&self.http, &self.base_url, self.auth_header(), request);
        execute(prepared).await
    }

    /// Runs a request and decodes its JSON body.
    pub(crate) async fn send_decoded<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T> {
        self.send_decoded(ApiRequest::new(Method::GET, path).with_query(query))
            .await
    }

    /// Sends a JSON body and decodes the JSON response.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(method, path)
            .with_query(query)
            .with_body(RequestBody::json(body)?);
        self.send_decoded(request).await
    }

    /// Sends a JSON body and ignores the response body.
    pub(crate) async fn send_json_no_content<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(method, path).with_body(RequestBody::json(body)?);
        self.send(request).await.map(drop)
    }

    /// Succeeds on any 2xx, whatever the body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::new(Method::DELETE, path)).await.map(drop)
    }
}

#[async_trait]
impl VersionSource for Transport {
    async fn fetch_version(&self) -> std::result::Result<String, VersionFetchError> {
        self.get_json::<AppVersion>("/api/version", Query::new())
            .await
            .map(|version| version.version)
            .map_err(|err| VersionFetchError(err.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A client for the Wharf API.
///
/// Each instance owns its own version cache: the server version is fetched
/// at most once, on the first call that needs it, and reused until
/// [`reset_cached_version`](Self::reset_cached_version). Methods that consult
/// the version gate therefore take `&mut self`.
///
/// # Example
///
/// ```no_run
/// use client::Client;
/// use model::VersionFlags;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = Client::new("https://wharf.example.com")?
///     .with_bearer_token("my-secret-token")
///     .with_timeout(Duration::from_secs(10))?
///     .with_version_flags(VersionFlags {
///         err_if_outdated_server: true,
///         ..VersionFlags::default()
///     });
///
/// let health = client.get_health().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) transport: Transport,
    gate: VersionGate,
    flags: VersionFlags,
}

impl Client {
    /// Creates a client for the API at `base_url`, e.g. `"https://wharf.local"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not `http://` or `https://`, or the
    /// HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {base_url}"
            )));
        }

        let http = HttpClient::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            transport: Transport {
                base_url,
                auth_header: None,
                http,
            },
            gate: VersionGate::new(),
            flags: VersionFlags::default(),
        })
    }

    /// Sets the raw `Authorization` header value, e.g. `"Bearer abc123"`.
    ///
    /// An empty value sends no header.
    #[must_use]
    pub fn with_auth_header(mut self, header: impl Into<String>) -> Self {
        let header = header.into();
        self.transport.auth_header = (!header.is_empty()).then_some(header);
        self
    }

    /// Sets a `Bearer` token as the `Authorization` header.
    #[must_use]
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let header = format!("Bearer {}", token.as_ref());
        self.with_auth_header(header)
    }

    /// Sets the timeout applied to every HTTP request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.transport.http = HttpClient::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Sets the version enforcement flags.
    #[must_use]
    pub fn with_version_flags(mut self, flags: VersionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Checks the server against a custom highest supported version instead
    /// of [`model::HIGHEST_SUPPORTED_VERSION`]. Clears the version cache.
    #[must_use]
    pub fn with_highest_supported_version(mut self, version: SemVer) -> Self {
        self.gate = VersionGate::with_highest_supported(version);
        self
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn version_flags(&self) -> VersionFlags {
        self.flags
    }

    pub fn set_version_flags(&mut self, flags: VersionFlags) {
        self.flags = flags;
    }

    /// The cached server version, if one has been detected or set.
    pub fn cached_version(&self) -> Option<SemVer> {
        self.gate.cached_version()
    }

    /// Overrides the detected server version.
    pub fn set_cached_version(&mut self, major: u64, minor: u64, patch: u64) {
        self.gate.set_cached_version(SemVer::new(major, minor, patch));
    }

    /// Forgets the detected server version; the next gated call refetches it.
    pub fn reset_cached_version(&mut self) {
        self.gate.reset_cached_version();
    }

    /// Returns the server version, fetching it on first use.
    ///
    /// `None` when the version could not be fetched or parsed.
    pub async fn get_or_fetch_version(&mut self) -> Option<SemVer> {
        self.gate.get_or_fetch_version(&self.transport).await
    }

    /// Checks whether an endpoint introduced in `requirement` may be called.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Compatibility`] when the configured flags demand
    /// it; never fails because the version is unknown.
    pub async fn validate_endpoint(&mut self, requirement: EndpointRequirement) -> Result<()> {
        self.gate
            .validate_endpoint(requirement, self.flags, &self.transport)
            .await?;
        Ok(())
    }
}
