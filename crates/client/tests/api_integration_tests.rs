//! Integration tests for the Wharf API client against mock servers.
//!
//! These tests use wiremock to simulate wharf-api responses and verify the
//! request pipeline, the version gate and the endpoint wrappers end to end.

use client::{Client, ClientError, UploadFile};
use model::request::{NewToken, ProjectBuildRequest};
use model::{BuildId, BuildSearch, ProjectId, ProjectSearch, ProviderId, SemVer, VersionFlags};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_strict() -> VersionFlags {
    VersionFlags {
        err_if_outdated_server: true,
        ..VersionFlags::default()
    }
}

async fn mount_version(server: &MockServer, version: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": version })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_ping(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "pong" })))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_reports_realm() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(
            ResponseTemplate::new(401).insert_header("WWW-Authenticate", r#"Bearer realm="api""#),
        )
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    match client.ping().await {
        Err(ClientError::Auth { realm }) => assert_eq!(realm, r#"Bearer realm="api""#),
        other => panic!("Expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_without_challenge_has_empty_realm() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    match client.get_health().await {
        Err(ClientError::Auth { realm }) => assert!(realm.is_empty()),
        other => panic!("Expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn problem_response_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/3"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            json!({
                "type": "/prob/api/record-not-found",
                "title": "Project not found.",
                "status": 404,
                "errors": ["no project with ID 3"]
            })
            .to_string(),
            "application/problem+json; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    match client.get_project(ProjectId::new(3)).await {
        Err(ClientError::Problem(problem)) => {
            assert_eq!(problem.to_string(), "project not found: no project with ID 3");
            assert_eq!(problem.problem.problem_type, "/prob/api/record-not-found");
            assert_eq!(problem.problem.status, 404);
        }
        other => panic!("Expected Problem error, got {other:?}"),
    }
}

#[tokio::test]
async fn problem_with_null_errors_is_still_a_problem() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"title":"Bad request","status":400,"errors":null}"#,
            "application/problem+json",
        ))
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();
    match client.get_version().await {
        Err(ClientError::Problem(problem)) => {
            assert_eq!(problem.problem.title, "Bad request");
            assert!(problem.problem.errors.is_empty());
        }
        other => panic!("Expected Problem error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_problem_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/build/1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw("not json", "application/problem+json"),
        )
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    match client.get_build(BuildId::new(1)).await {
        Err(ClientError::Status {
            status,
            status_text,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_error_body_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/engine"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let err = client.get_engine_list().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 502, .. }));
}

#[tokio::test]
async fn auth_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "pong" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_bearer_token("abc123");
    assert_eq!(client.ping().await.unwrap().message, "pong");
}

// ---------------------------------------------------------------------------
// Version gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_flags_never_fetch_the_version() {
    let server = MockServer::start().await;
    mount_version(&server, "v1.0.0", 0).await;
    mount_ping(&server).await;

    let mut client = Client::new(server.uri()).unwrap();
    client.ping().await.unwrap();
    client.ping().await.unwrap();
    assert_eq!(client.cached_version(), None);
}

#[tokio::test]
async fn outdated_server_blocks_newer_endpoints_and_fetches_once() {
    let server = MockServer::start().await;
    mount_version(&server, "v5.0.0", 1).await;
    mount_ping(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/engine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_version_flags(server_strict());

    let err = client.get_engine_list().await.unwrap_err();
    assert!(err.is_outdated_server());
    assert!(err.to_string().contains("5.0.0"));
    assert!(err.to_string().contains("5.1.0"));

    client.ping().await.unwrap();
    client.ping().await.unwrap();
    assert_eq!(client.cached_version(), Some(SemVer::new(5, 0, 0)));
}

#[tokio::test]
async fn server_two_majors_ahead_blocks_outdated_client() {
    let server = MockServer::start().await;
    mount_version(&server, "7.0.0", 1).await;
    mount_ping(&server).await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_highest_supported_version(SemVer::new(5, 0, 0))
        .with_version_flags(VersionFlags {
            err_if_outdated_client: true,
            ..VersionFlags::default()
        });

    let err = client.ping().await.unwrap_err();
    assert!(err.is_outdated_client());
}

#[tokio::test]
async fn server_one_major_ahead_is_allowed() {
    let server = MockServer::start().await;
    mount_version(&server, "6.0.0", 1).await;
    mount_ping(&server).await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_highest_supported_version(SemVer::new(5, 0, 0))
        .with_version_flags(VersionFlags {
            err_if_outdated_client: true,
            ..VersionFlags::default()
        });

    assert_eq!(client.ping().await.unwrap().message, "pong");
}

#[tokio::test]
async fn failed_version_fetch_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    mount_ping(&server).await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_version_flags(VersionFlags {
            err_if_outdated_client: true,
            err_if_outdated_server: true,
            disable_outdated_logging: false,
        });

    client.ping().await.unwrap();
    client.ping().await.unwrap();
    assert_eq!(client.cached_version(), None);
}

#[tokio::test]
async fn reset_refetches_the_version() {
    let server = MockServer::start().await;
    mount_version(&server, "v5.1.0", 2).await;
    mount_ping(&server).await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_version_flags(server_strict());

    client.ping().await.unwrap();
    client.reset_cached_version();
    client.ping().await.unwrap();
}

#[tokio::test]
async fn overridden_version_skips_the_fetch() {
    let server = MockServer::start().await;
    mount_version(&server, "v5.1.0", 0).await;

    let mut client = Client::new(server.uri())
        .unwrap()
        .with_version_flags(server_strict());
    client.set_cached_version(4, 0, 0);

    let err = client.ping().await.unwrap_err();
    assert!(err.is_outdated_server());
}

#[tokio::test]
async fn get_version_reads_app_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "v5.1.2",
            "buildGitCommit": "0a1b2c3",
            "buildRef": 118
        })))
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();
    let version = client.get_version().await.unwrap();
    assert_eq!(version.version, "v5.1.2");
    assert_eq!(version.build_ref, 118);
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_search_is_sent_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project"))
        .and(query_param("limit", "10"))
        .and(query_param("nameMatch", "my project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{ "projectId": 3, "name": "my project" }],
            "totalCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let page = client
        .get_project_list(&ProjectSearch {
            limit: Some(10),
            name_match: Some("my project".to_string()),
            ..ProjectSearch::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.list[0].project_id, ProjectId::new(3));
}

#[tokio::test]
async fn invalid_search_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/build"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let err = client
        .get_build_list(&BuildSearch {
            offset: Some(10),
            ..BuildSearch::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Query(_)));
}

#[tokio::test]
async fn start_project_build_sends_stage_and_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/project/5/build"))
        .and(query_param("stage", "deploy"))
        .and(query_param("environment", "prod"))
        .and(body_partial_json(json!({ "replicas": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "buildRef": "42" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let mut inputs = model::request::BuildInputs::new();
    inputs.insert("replicas".to_string(), json!(2));
    let started = client
        .start_project_build(
            ProjectId::new(5),
            &ProjectBuildRequest {
                environment: Some("prod".to_string()),
                ..ProjectBuildRequest::new("deploy")
            },
            &inputs,
        )
        .await
        .unwrap();
    assert_eq!(started.build_reference, "42");
}

#[tokio::test]
async fn create_token_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_partial_json(json!({
            "token": "s3cr3t",
            "userName": "alice",
            "providerId": 2
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "tokenId": 9,
            "token": "s3cr3t",
            "userName": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let token = client
        .create_token(&NewToken {
            token: "s3cr3t".to_string(),
            user_name: "alice".to_string(),
            provider_id: ProviderId::new(2),
        })
        .await
        .unwrap();
    assert_eq!(token.token_id.as_u64(), 9);
}

#[tokio::test]
async fn delete_accepts_empty_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/project/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    client.delete_project(ProjectId::new(7)).await.unwrap();
}

#[tokio::test]
async fn artifact_upload_is_multipart_with_files_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/build/1/artifact"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "artifactId": 4, "fileName": "a.txt" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let artifacts = client
        .create_build_artifact(
            BuildId::new(1),
            vec![UploadFile::from_bytes("a.txt", b"hello artifact".to_vec())],
        )
        .await
        .unwrap();
    assert_eq!(artifacts[0].file_name, "a.txt");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="files""#));
    assert!(body.contains(r#"filename="a.txt""#));
    assert!(body.contains("hello artifact"));
}

#[tokio::test]
async fn artifact_download_returns_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/build/1/artifact/4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x00\x01binary".to_vec()))
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let bytes = client
        .get_build_artifact(BuildId::new(1), model::ArtifactId::new(4))
        .await
        .unwrap();
    assert_eq!(bytes, b"\x00\x01binary".to_vec());
}

#[tokio::test]
async fn test_result_list_summary_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/build/2/test-result/list-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "buildId": 2, "total": 10, "failed": 1, "passed": 8, "skipped": 1
        })))
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let summary = client
        .get_build_test_result_list_summary(BuildId::new(2))
        .await
        .unwrap();
    assert_eq!(summary.total, 10);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_result_details_of_one_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/build/2/test-result/summary/9/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{"testResultDetailId": 1, "artifactId": 9, "buildId": 2, "name": "parses", "status": "Success"}],
            "totalCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    let page = client
        .get_build_test_result_detail_list_for_artifact(BuildId::new(2), model::ArtifactId::new(9))
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.list[0].name, "parses");
    assert_eq!(page.list[0].artifact_id, model::ArtifactId::new(9));
}

#[tokio::test]
async fn stream_build_log_is_not_implemented() {
    let mut client = Client::new("http://localhost:1").unwrap();
    let err = client.stream_build_log(BuildId::new(1)).await.unwrap_err();
    assert!(matches!(err, ClientError::NotImplemented(_)));
}

#[tokio::test]
async fn log_stream_rejects_auth_header_without_type() {
    let mut client = Client::new("http://localhost:1")
        .unwrap()
        .with_auth_header("abc123");
    let err = client.create_build_log_stream().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidAuthHeader));
}
