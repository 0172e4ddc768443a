//! `POST /api/analyze` end to end

use std::sync::Arc;

use codesentry::{Backend, RelayClient};

use crate::common::{closed_ws_url, post_analyze, start_gateway, StubApi, CODE_INJECTION_REPLY};

const PYTHON_EVAL: &str = r#"{"code":"eval(input())","language":"python"}"#;

#[tokio::test]
async fn test_analysis_relayed_and_unwrapped() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("test-key"))))).await;

    let response = post_analyze(&base, PYTHON_EVAL).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"].to_str().unwrap(),
        "*"
    );
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"analysis":"1. **Code Injection**\n..."}"#
    );

    assert_eq!(stub.hits(), 1);
    let seen = stub.last();
    assert_eq!(seen.path, "/v1beta/models/gemini-2.0-flash:generateContent");
    assert_eq!(seen.key.as_deref(), Some("test-key"));
    let prompt = seen.body.unwrap()["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.starts_with("Analyze this python code for security vulnerabilities."));
    assert!(prompt.ends_with("Code to analyze:\neval(input())"));
}

#[tokio::test]
async fn test_upstream_status_reported_inline() {
    let stub = StubApi::start(429, r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("test-key"))))).await;

    let response = post_analyze(&base, PYTHON_EVAL).await;
    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["analysis"].as_str().unwrap().contains("429"));
    assert_eq!(json["failure"]["kind"], "upstream_status");
    assert_eq!(json["failure"]["status"], 429);
}

#[tokio::test]
async fn test_missing_credential_makes_no_outbound_call() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(None)))).await;

    let response = post_analyze(&base, PYTHON_EVAL).await;
    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "analysis": "Error: the API key is missing.",
            "failure": {"kind": "config_missing"}
        })
    );
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_unparseable_upstream_reply() {
    let stub = StubApi::start(200, r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("k"))))).await;

    let json: serde_json::Value = post_analyze(&base, PYTHON_EVAL).await.json().await.unwrap();
    assert_eq!(json["failure"]["kind"], "upstream_parse");
}

#[tokio::test]
async fn test_non_post_is_405_without_body() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("k"))))).await;
    let client = reqwest::Client::new();

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let response = client
            .request(method.clone(), format!("{}/api/analyze", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 405, "{} should be rejected", method);
        assert!(response.bytes().await.unwrap().is_empty());
    }
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_missing_or_empty_fields_rejected() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("k"))))).await;

    for body in [
        r#"{"code":"eval(input())"}"#,
        r#"{"language":"python"}"#,
        r#"{"code":"","language":"python"}"#,
        r#"not json"#,
    ] {
        let response = post_analyze(&base, body).await;
        assert_eq!(response.status(), 400, "body {}", body);
        assert_eq!(
            response.headers()["access-control-allow-origin"].to_str().unwrap(),
            "*"
        );
        let json: serde_json::Value = response.json().await.unwrap();
        assert!(json["error"].is_string());
    }
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_special_characters_survive() {
    let reply = r#"{"candidates":[{"content":{"parts":[{"text":"quote \" backslash \\ tab \t cr \r end"}]}}]}"#;
    let stub = StubApi::start(200, reply).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("k"))))).await;

    let body = serde_json::json!({"code": "printf(\"%s\\n\", argv[1]);\n", "language": "c"}).to_string();
    let json: serde_json::Value = post_analyze(&base, &body).await.json().await.unwrap();
    assert_eq!(json["analysis"], "quote \" backslash \\ tab \t cr \r end");

    let prompt = stub.last().body.unwrap()["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.ends_with("printf(\"%s\\n\", argv[1]);\n"));
}

#[tokio::test]
async fn test_snippet_over_default_body_limit_accepted() {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let base = start_gateway(Backend::Local(Arc::new(stub.relay(Some("k"))))).await;

    let code = "a = 1\n".repeat(3 * 1024 * 1024 / 6);
    assert!(code.len() > 2 * 1024 * 1024);
    let body = serde_json::json!({"code": code, "language": "python"}).to_string();

    let response = post_analyze(&base, &body).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"analysis":"1. **Code Injection**\n..."}"#
    );

    assert_eq!(stub.hits(), 1);
    let prompt = stub.last().body.unwrap()["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.ends_with(&code));
}

#[tokio::test]
async fn test_unreachable_relay_is_500_without_body() {
    let base = start_gateway(Backend::Remote(RelayClient::lazy(closed_ws_url().await))).await;

    let response = post_analyze(&base, PYTHON_EVAL).await;
    assert_eq!(response.status(), 500);
    assert!(response.bytes().await.unwrap().is_empty());
}
