//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use country_letters::config::ServiceConfig;

/// A register body with four countries, one of them carrying a second item.
pub const REGISTER_BODY: &str = r#"{
    "DE": {"index-entry-number": "1", "item": [{"country": "DE", "name": "Germany"}]},
    "ES": {"index-entry-number": "2", "item": [{"country": "ES", "name": "Spain"}]},
    "GB": {"index-entry-number": "3", "item": [
        {"country": "GB", "name": "United Kingdom"},
        {"country": "GB", "name": "Great Britain"}
    ]},
    "ZM": {"index-entry-number": "4", "item": [{"country": "ZM", "name": "Zambia"}]}
}"#;

/// Start a mock register that always answers 200 with `body`.
pub async fn start_mock_register(body: &'static str) -> SocketAddr {
    start_programmable_register(move || async move { (200, body.to_string()) }).await
}

/// Start a programmable mock register; `f` decides status and body per request.
pub async fn start_programmable_register<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = std::sync::Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at a register on `addr`, listening on an ephemeral local port.
pub fn config_for(register: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.registry.url = format!("http://{}/records.json", register);
    config.registry.timeout_secs = 2;
    config.registry.system_proxy = false;
    config
}

/// HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
