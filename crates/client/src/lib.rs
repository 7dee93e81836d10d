//! HTTP and gRPC client for the Wharf API.
//!
//! [`Client`] wraps every REST endpoint of wharf-api v5 plus the gRPC build
//! log stream. Before each call the client consults its version gate (see
//! [`model::version`]); requests then go through a shared pipeline that logs
//! a redacted trace and maps non-2xx responses to [`ClientError`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure adapter.** Domain types and version rules live in the
//! `model` crate; this crate only moves them over the network.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | `client` | [`Client`], configuration and the version gate wiring |
//! | `request` | Request building, execution and response classification |
//! | [`redact`] | Token redaction for trace logs |
//! | [`multipart`] | File uploads |
//! | [`proto`] | `wharf.api.v5.Builds` gRPC messages and client |
//! | [`log_stream`] | Build log stream over gRPC |
//! | `meta`, `build`, `project`, `provider`, `token`, `artifact`, `test_result` | Endpoint wrappers |

mod artifact;
mod build;
mod client;
mod error;
pub mod log_stream;
mod meta;
pub mod multipart;
mod project;
pub mod proto;
mod provider;
pub mod redact;
mod request;
mod test_result;
mod token;

pub use client::{Client, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
pub use log_stream::{LogStream, DEFAULT_LOG_STREAM_CAPACITY};
pub use multipart::{UploadFile, UploadSource};
