//! Streaming build log upload over gRPC.
//!
//! [`LogStream`] is a bounded channel feeding a client-streaming
//! `CreateLogStream` call that runs on a background task. The producer side
//! waits while the channel is full.

use std::sync::LazyLock;

use model::request::NewLog;
use model::response::CreatedLogsSummary;
use regex::Regex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{ClientTlsConfig, Endpoint};
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::proto::{BuildsClient, CreateLogStreamRequest, CreateLogStreamResponse};

/// Number of log lines buffered between [`LogStream::send`] and the network.
pub const DEFAULT_LOG_STREAM_CAPACITY: usize = 64;

static HAS_PORT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\d+$").expect("port suffix regex"));

type CallResult = std::result::Result<Response<CreateLogStreamResponse>, Status>;

/// An open build log stream.
///
/// Send lines with [`send`](Self::send), then finish with
/// [`close_and_recv`](Self::close_and_recv) to learn how many were stored.
/// Dropping the stream without closing it aborts nothing on the server; the
/// call simply ends when the channel closes.
#[derive(Debug)]
pub struct LogStream {
    sender: mpsc::Sender<CreateLogStreamRequest>,
    call: Option<JoinHandle<CallResult>>,
}

impl LogStream {
    /// Queues a log line, waiting while the buffer is full.
    ///
    /// # Errors
    ///
    /// Fails once the underlying call has terminated; the call's own error is
    /// returned when it has one.
    pub async fn send(&mut self, log: NewLog) -> Result<()> {
        if self.sender.send(to_proto(log)).await.is_ok() {
            return Ok(());
        }

        Err(match self.call.take() {
            Some(call) => match call.await {
                Ok(Err(status)) => ClientError::GrpcStatus(status),
                Ok(Ok(_)) => ClientError::LogStream("server closed the stream early".to_string()),
                Err(join) => ClientError::LogStream(join.to_string()),
            },
            None => ClientError::LogStream("stream already terminated".to_string()),
        })
    }

    /// Closes the stream and waits for the server's summary.
    pub async fn close_and_recv(self) -> Result<CreatedLogsSummary> {
        let Self { sender, call } = self;
        drop(sender);

        let call = call.ok_or_else(|| ClientError::LogStream("stream already terminated".to_string()))?;
        let response = call
            .await
            .map_err(|join| ClientError::LogStream(join.to_string()))??;

        let summary = CreatedLogsSummary {
            logs_inserted: response.into_inner().lines_inserted,
        };
        debug!(logs_inserted = summary.logs_inserted, "Closed build log stream.");
        Ok(summary)
    }
}

/// Dials the API's gRPC endpoint and starts a `CreateLogStream` call.
pub(crate) async fn open(
    base_url: &str,
    auth_header: Option<&str>,
    capacity: usize,
) -> Result<LogStream> {
    let authorization = auth_header
        .filter(|header| !header.is_empty())
        .map(authorization_metadata)
        .transpose()?;

    let target = dial_target(base_url);
    let mut endpoint = Endpoint::from_shared(target.uri())?;
    if target.tls {
        endpoint = endpoint.tls_config(ClientTlsConfig::new().with_webpki_roots())?;
    }
    debug!(target = %target.uri(), tls = target.tls, "Dialing gRPC.");
    let channel = endpoint.connect().await?;

    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let mut request = Request::new(ReceiverStream::new(receiver));
    if let Some(value) = authorization {
        request.metadata_mut().insert("authorization", value);
    }

    let mut client = BuildsClient::new(channel);
    let call = tokio::spawn(async move { client.create_log_stream(request).await });

    Ok(LogStream {
        sender,
        call: Some(call),
    })
}

fn to_proto(log: NewLog) -> CreateLogStreamRequest {
    let at = log.timestamp.as_datetime();
    CreateLogStreamRequest {
        build_id: log.build_id.as_u64(),
        worker_log_id: log.worker_log_id.as_u64(),
        worker_step_id: log.worker_step_id.as_u64(),
        timestamp: Some(prost_types::Timestamp {
            seconds: at.timestamp(),
            nanos: at.timestamp_subsec_nanos() as i32,
        }),
        message: log.message,
    }
}

/// `authority` plus whether TLS is used.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DialTarget {
    authority: String,
    tls: bool,
}

impl DialTarget {
    fn uri(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}", self.authority)
    }
}

/// Strips the scheme and trailing `/` from the base URL and adds the
/// scheme's default port when none is given.
fn dial_target(base_url: &str) -> DialTarget {
    let (rest, tls) = if let Some(rest) = base_url.strip_prefix("https://") {
        (rest, true)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        (rest, false)
    } else {
        (base_url, false)
    };

    let trimmed = rest.trim_end_matches('/');
    let authority = if HAS_PORT_SUFFIX.is_match(trimmed) {
        trimmed.to_string()
    } else if tls {
        format!("{trimmed}:443")
    } else {
        format!("{trimmed}:80")
    };
    DialTarget { authority, tls }
}

/// Validates `<type> <credentials>` and turns it into metadata.
fn authorization_metadata(header: &str) -> Result<MetadataValue<Ascii>> {
    let (kind, credentials) = header.split_once(' ').ok_or(ClientError::InvalidAuthHeader)?;
    if kind.is_empty() || credentials.is_empty() {
        return Err(ClientError::InvalidAuthHeader);
    }
    format!("{kind} {credentials}")
        .parse()
        .map_err(|_| ClientError::InvalidAuthHeader)
}
