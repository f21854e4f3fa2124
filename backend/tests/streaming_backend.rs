use classlive_backend::{
    config::StreamingConfig,
    services::streaming_backend::{LivegoClient, StreamingBackend, StreamingBackendError},
};
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer, timeout_secs: u64) -> LivegoClient {
    let config = StreamingConfig {
        api_url: server.uri(),
        request_timeout_secs: timeout_secs,
        ..StreamingConfig::default()
    };
    LivegoClient::new(&config).expect("build client")
}

#[tokio::test]
async fn provision_posts_stream_key_to_control_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stream/add"))
        .and(query_param("stream", "live_abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":200}"#))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, 5)
        .provision_stream("live_abc123")
        .await
        .expect("provision succeeds");
}

#[tokio::test]
async fn non_success_status_is_rejected_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stream/add"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client_for(&server, 5)
        .provision_stream("live_abc123")
        .await
        .expect_err("provision fails");
    match err {
        StreamingBackendError::Rejected { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "busy");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stream/add"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = client_for(&server, 1)
        .provision_stream("live_slow")
        .await
        .expect_err("request times out");
    assert!(matches!(err, StreamingBackendError::Request(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    let config = StreamingConfig {
        api_url: "http://127.0.0.1:9".into(),
        request_timeout_secs: 2,
        ..StreamingConfig::default()
    };
    let err = LivegoClient::new(&config)
        .expect("build client")
        .provision_stream("live_x")
        .await
        .expect_err("connection refused");
    assert!(matches!(err, StreamingBackendError::Request(_)));
}
