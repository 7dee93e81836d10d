//! Protobuf messages and client for the `wharf.api.v5.Builds` gRPC service.
//!
//! Generated at build time from `proto/wharf/api/v5/builds.proto`.

#[allow(clippy::all)]
mod generated {
    tonic::include_proto!("wharf.api.v5");
}

pub use generated::builds_client::BuildsClient;
pub use generated::{CreateLogStreamRequest, CreateLogStreamResponse};
