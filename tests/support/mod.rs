// One arena server per test binary, started on first use.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tank_arena::domain::ArenaConfig;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

static SERVER_URL: OnceLock<String> = OnceLock::new();

/// Small open arena so spawns never fall back to the centre and tests stay fast.
pub fn test_config() -> ArenaConfig {
    ArenaConfig {
        map_width: 1200.0,
        map_height: 900.0,
        obstacle_count: 0,
        ..ArenaConfig::default()
    }
}

/// Returns the `ws://` URL of the shared test server, starting it if needed.
pub fn ensure_server() -> &'static str {
    SERVER_URL.get_or_init(|| {
        let published = Arc::new(OnceLock::<String>::new());
        let published_thread = Arc::clone(&published);
        // A dedicated OS thread keeps the server alive across `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_thread.set(addr.to_string());
                tank_arena::run(listener, Arc::new(test_config()))
                    .await
                    .expect("server failed");
            });
        });
        let addr = wait_for_readiness(&published);
        format!("ws://{addr}/ws")
    })
}

fn wait_for_readiness(published: &OnceLock<String>) -> String {
    let addr = loop {
        if let Some(addr) = published.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return addr;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server did not become ready in time");
}

pub async fn connect() -> Client {
    let (client, _response) = tokio_tungstenite::connect_async(ensure_server())
        .await
        .expect("websocket handshake");
    client
}

/// Next JSON text message, skipping control frames. Panics after two seconds of silence.
pub async fn next_json(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("message before timeout")
            .expect("stream open")
            .expect("valid frame");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("server sends JSON");
        }
    }
}

/// Waits for the first `state` message that satisfies `pred`.
pub async fn next_state_where(client: &mut Client, pred: impl Fn(&Value) -> bool) -> Value {
    for _ in 0..200 {
        let msg = next_json(client).await;
        if msg["type"] == "state" && pred(&msg["state"]) {
            return msg["state"].clone();
        }
    }
    panic!("no matching state message");
}

pub async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("send intent");
}

pub async fn send_raw(client: &mut Client, text: &str) {
    client
        .send(Message::Text(text.to_string().into()))
        .await
        .expect("send raw frame");
}
