//! Raw protocol behavior seen by a hand-driven WebSocket client

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use codesentry::relay_server::{ClientMessage, ServerMessage};
use codesentry::SERVICE_NAME;

use crate::common::{start_relay, StubApi, CODE_INJECTION_REPLY};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn open() -> (Ws, StubApi) {
    let stub = StubApi::start(200, CODE_INJECTION_REPLY).await;
    let url = start_relay(stub.relay(Some("k"))).await;
    let (ws, _) = connect_async(url.as_str()).await.unwrap();
    (ws, stub)
}

async fn send_raw(ws: &mut Ws, text: &str) {
    ws.send(Message::Text(text.to_string())).await.unwrap();
}

async fn send(ws: &mut Ws, msg: &ClientMessage) {
    send_raw(ws, &serde_json::to_string(msg).unwrap()).await;
}

async fn recv(ws: &mut Ws) -> ServerMessage {
    loop {
        match ws.next().await.expect("relay replied").unwrap() {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            _ => continue,
        }
    }
}

fn error_code(msg: &ServerMessage) -> &str {
    match msg {
        ServerMessage::Error { code, .. } => code.as_str(),
        other => panic!("Expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_analyze_before_hello_rejected() {
    let (mut ws, stub) = open().await;
    send(
        &mut ws,
        &ClientMessage::Analyze {
            id: 1,
            code: "x".to_string(),
            language: "python".to_string(),
        },
    )
    .await;

    let reply = recv(&mut ws).await;
    assert_eq!(error_code(&reply), "not_connected");
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_unknown_service_rejected() {
    let (mut ws, _stub) = open().await;
    send(&mut ws, &ClientMessage::Hello { service: "Other".to_string() }).await;
    assert_eq!(error_code(&recv(&mut ws).await), "unknown_service");
}

#[tokio::test]
async fn test_bad_message_keeps_connection() {
    let (mut ws, _stub) = open().await;
    send_raw(&mut ws, "{not json").await;
    assert_eq!(error_code(&recv(&mut ws).await), "bad_message");

    send(&mut ws, &ClientMessage::Ping).await;
    assert_eq!(recv(&mut ws).await, ServerMessage::Pong);
}

#[tokio::test]
async fn test_full_session() {
    let (mut ws, _stub) = open().await;
    send(&mut ws, &ClientMessage::Hello { service: SERVICE_NAME.to_string() }).await;
    match recv(&mut ws).await {
        ServerMessage::Ready { client_id, service } => {
            assert!(client_id.starts_with("gw_"));
            assert_eq!(service, SERVICE_NAME);
        }
        other => panic!("Expected Ready, got {:?}", other),
    }

    send(
        &mut ws,
        &ClientMessage::Analyze {
            id: 42,
            code: "eval(input())".to_string(),
            language: "python".to_string(),
        },
    )
    .await;
    assert_eq!(
        recv(&mut ws).await,
        ServerMessage::Analysis {
            id: 42,
            text: "1. **Code Injection**\n...".to_string()
        }
    );
}
