//! Gateway -> relay daemon -> stub API

use codesentry::{
    AnalysisFailure, AnalysisRequest, Backend, CodeSentryError, RelayClient,
};

use crate::common::{
    closed_ws_url, post_analyze, start_gateway, start_relay, StubApi, CODE_INJECTION_REPLY,
};

#[tokio::test]
async fn test_gateway_through_relay() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let relay_url = start_relay(stub.relay(Some("relay-key"))).await;

    let client = RelayClient::connect(relay_url).await.expect("relay reachable");
    let base = start_gateway(Backend::Remote(client)).await;

    let response = post_analyze(&base, r#"{"code":"eval(input())","language":"python"}"#).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"analysis":"1. **Code Injection**\n..."}"#
    );
    assert_eq!(stub.last().key.as_deref(), Some("relay-key"));
}

#[tokio::test]
async fn test_upstream_status_crosses_relay() {
    let stub = StubApi::start(429, "{}").await;
    let relay_url = start_relay(stub.relay(Some("relay-key"))).await;
    let base = start_gateway(Backend::Remote(RelayClient::connect(relay_url).await.unwrap())).await;

    let response = post_analyze(&base, r#"{"code":"eval(input())","language":"python"}"#).await;
    assert_eq!(response.status(), 200);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["analysis"].as_str().unwrap().contains("429"));
    assert_eq!(json["failure"]["kind"], "upstream_status");
}

#[tokio::test]
async fn test_client_receives_typed_failure() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let relay_url = start_relay(stub.relay(None)).await;

    let client = RelayClient::connect(relay_url).await.unwrap();
    let outcome = client
        .analyze(&AnalysisRequest::new("eval(input())", "python"))
        .await
        .unwrap();
    assert_eq!(outcome, Err(AnalysisFailure::ConfigMissing));
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_sequential_calls() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let relay_url = start_relay(stub.relay(Some("k"))).await;
    let client = RelayClient::connect(relay_url).await.unwrap();

    for _ in 0..3 {
        let result = client
            .analyze(&AnalysisRequest::new("x", "python"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.text, "1. **Code Injection**\n...");
    }
    assert_eq!(stub.hits(), 3);
}

#[tokio::test]
async fn test_connect_fails_when_relay_down() {
    let err = RelayClient::connect(closed_ws_url().await).await.unwrap_err();
    assert!(matches!(err, CodeSentryError::RelayUnavailable { .. }));
}

#[tokio::test]
async fn test_connect_rejects_non_websocket_url() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let url = start_relay(stub.relay(Some("k"))).await;
    let http_url = url.replacen("ws://", "http://", 1);

    let err = RelayClient::connect(http_url).await.unwrap_err();
    assert!(matches!(err, CodeSentryError::ConfigError { .. }));
    assert_eq!(stub.hits(), 0);
}
