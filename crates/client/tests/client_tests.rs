//! Integration tests for the client API surface that need no server.

use std::time::Duration;

use client::redact::{redact_token_in_json, redact_token_in_url, REDACTED};
use client::{Client, ClientError};

#[test]
fn test_client_construction() {
    assert!(Client::new("http://localhost:5001").is_ok());
    assert!(Client::new("https://wharf.example.com/").is_ok());
}

#[test]
fn test_client_invalid_url() {
    match Client::new("localhost:5001") {
        Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("http://")),
        other => panic!("Expected InvalidUrl error, got {other:?}"),
    }
}

#[test]
fn test_client_builder_pattern() {
    let client = Client::new("http://localhost:5001")
        .unwrap()
        .with_auth_header("Bearer abc")
        .with_timeout(Duration::from_secs(5))
        .unwrap();
    assert_eq!(client.base_url(), "http://localhost:5001");
    assert_eq!(client.version_flags(), model::VersionFlags::default());
}

#[test]
fn test_redaction_never_leaks_token() {
    let secrets = ["abc", "with space", "sym_-./+=", "ünïcödé"];
    for secret in secrets {
        let json = format!(r#"{{"token" :  "{secret}"}}"#);
        let redacted = redact_token_in_json(&json);
        assert!(!redacted.contains(secret), "leaked in {redacted}");
        assert!(redacted.contains(REDACTED));

        let url = format!(
            "http://wharf.local/api/token?token={}",
            urlencoding::encode(secret)
        );
        let redacted = redact_token_in_url(&url);
        assert!(!redacted.contains(secret), "leaked in {redacted}");
        assert!(redacted.ends_with(REDACTED));
    }
}
