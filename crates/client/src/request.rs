//! Generic HTTP request pipeline.
//!
//! Every endpoint wrapper goes through the same two steps: [`build_request`]
//! assembles the URL, query, auth header and body, then [`execute`] sends it,
//! logs a redacted trace and classifies the response into a
//! [`RequestOutcome`].

use model::{is_problem_content_type, ProblemError, ProblemResponse, Query};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::multipart::Form;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, enabled, warn, Level};

use crate::error::{ClientError, Result};
use crate::redact::{redact_token_in_json, redact_token_in_url};

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// Body attached to an outgoing request.
#[derive(Debug)]
pub(crate) enum RequestBody {
    Empty,
    /// Pre-serialised JSON document.
    Json(Vec<u8>),
    /// `multipart/form-data`, possibly streamed from disk.
    Multipart(Form),
}

impl RequestBody {
    pub(crate) fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        Ok(Self::Json(serde_json::to_vec(body)?))
    }

    /// Text written to the request trace log. Secrets are redacted.
    fn trace_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Json(bytes) => redact_token_in_json(&String::from_utf8_lossy(bytes)).into_owned(),
            Self::Multipart(form) => format!("<multipart/form-data; boundary={}>", form.boundary()),
        }
    }
}

/// One API call, relative to the client's base URL.
#[derive(Debug)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Query,
    pub body: RequestBody,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub(crate) fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub(crate) fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// A request ready to be sent, together with its trace fields.
pub(crate) struct PreparedRequest {
    builder: RequestBuilder,
    method: Method,
    url: String,
    /// Redacted body text, only computed when debug logging is enabled.
    body_trace: Option<String>,
}

/// Joins the base URL, path and query and attaches auth and body.
pub(crate) fn build_request(
    http: &HttpClient,
    base_url: &str,
    auth_header: Option<&str>,
    request: ApiRequest,
) -> PreparedRequest {
    let url = request_url(base_url, &request.path, &request.query);
    let body_trace = enabled!(Level::DEBUG).then(|| request.body.trace_text());

    let mut builder = http.request(request.method.clone(), &url);
    if let Some(header) = auth_header.filter(|h| !h.is_empty()) {
        builder = builder.header(AUTHORIZATION, header);
    }
    builder = match request.body {
        RequestBody::Empty => builder,
        RequestBody::Json(bytes) => builder.header(CONTENT_TYPE, "application/json").body(bytes),
        RequestBody::Multipart(form) => builder.multipart(form),
    };

    PreparedRequest {
        builder,
        method: request.method,
        url,
        body_trace,
    }
}

fn request_url(base_url: &str, path: &str, query: &Query) -> String {
    let mut url = format!("{}{}", base_url.trim_end_matches('/'), path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.encode());
    }
    url
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// How the server answered a request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestOutcome {
    /// 2xx, with the raw response body.
    Success(Vec<u8>),
    /// 401, with the `WWW-Authenticate` value (empty when absent).
    AuthFailure { realm: String },
    /// Non-2xx with a parsable problem body.
    StructuredProblem(ProblemResponse),
    /// Any other non-2xx response.
    GenericFailure { status: u16, status_text: String },
}

impl RequestOutcome {
    /// Turns every non-success outcome into its [`ClientError`].
    pub(crate) fn into_result(self) -> Result<Vec<u8>> {
        match self {
            Self::Success(body) => Ok(body),
            Self::AuthFailure { realm } => Err(ClientError::Auth { realm }),
            Self::StructuredProblem(problem) => Err(ProblemError::new(problem).into()),
            Self::GenericFailure {
                status,
                status_text,
            } => Err(ClientError::Status {
                status,
                status_text,
            }),
        }
    }
}

/// Sends a prepared request and returns the response body on 2xx.
pub(crate) async fn execute(request: PreparedRequest) -> Result<Vec<u8>> {
    let PreparedRequest {
        builder,
        method,
        url,
        body_trace,
    } = request;

    debug!(
        method = %method,
        url = %redact_token_in_url(&url),
        body = body_trace.as_deref().unwrap_or_default(),
        "Sending request."
    );

    let response = builder.send().await?;
    classify_response(response).await?.into_result()
}

/// Reads a response into a [`RequestOutcome`].
///
/// Only transport failures while reading a body are returned as `Err`.
pub(crate) async fn classify_response(response: Response) -> Result<RequestOutcome> {
    let status = response.status();
    if status.is_success() {
        return Ok(RequestOutcome::Success(response.bytes().await?.to_vec()));
    }

    if status == StatusCode::UNAUTHORIZED {
        let realm = header_text(&response, WWW_AUTHENTICATE.as_str());
        return Ok(RequestOutcome::AuthFailure { realm });
    }

    let generic = RequestOutcome::GenericFailure {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    };

    if !is_problem_content_type(&header_text(&response, CONTENT_TYPE.as_str())) {
        return Ok(generic);
    }

    let body = response.bytes().await?;
    match serde_json::from_slice::<ProblemResponse>(&body) {
        Ok(problem) => Ok(RequestOutcome::StructuredProblem(problem)),
        Err(err) => {
            warn!(
                status = status.as_u16(),
                error = %err,
                "Failed to parse non-2xx response body as a problem response."
            );
            Ok(generic)
        }
    }
}

fn header_text(response: &Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
