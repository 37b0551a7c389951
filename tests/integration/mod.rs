#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for `gatewayctl`
//!
//! Each test runs the real API server against a mock gateway admin API.

mod gateway_error_test;
mod postgres_test;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use gatewayctl_common::ApisixConfig;
use gatewayctl_core::{ApisixGateway, MemoryCatalog, PluginCatalog, RegistrationService};
use gatewayctl_http::ApiServer;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

pub const ADMIN_TOKEN: &str = "test-admin-key";

static NEXT_PORT: std::sync::atomic::AtomicU16 = std::sync::atomic::AtomicU16::new(31000);

pub fn get_free_port() -> u16 {
    loop {
        let port = NEXT_PORT.fetch_add(1, Ordering::Relaxed);
        if std::net::TcpListener::bind(("127.0.0.1", port)).is_ok() {
            return port;
        }
    }
}

/// Wait for a server to start listening
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

/// Create a reqwest client configured for testing (no proxy, direct connection)
pub fn make_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build reqwest client")
}

/// A request received by the mock gateway
#[derive(Debug, Clone)]
pub struct AdminCall {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

/// Gateway admin API double that accepts every route change until told to
/// reject.
#[derive(Clone, Default)]
pub struct MockGateway {
    calls: Arc<Mutex<Vec<AdminCall>>>,
    reject: Arc<AtomicBool>,
}

impl MockGateway {
    pub fn calls(&self) -> Vec<AdminCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }
}

async fn admin_handler(
    State(mock): State<MockGateway>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let call = AdminCall {
        method: method.clone(),
        path: uri.path().to_string(),
        api_key: headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    mock.calls.lock().unwrap().push(call);

    if mock.reject.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            r#"{"error_msg":"route rejected by test"}"#.to_string(),
        );
    }

    let key = uri.path().replace("/apisix/admin", "");
    if method == Method::PUT {
        (StatusCode::CREATED, format!(r#"{{"key":"{key}"}}"#))
    } else {
        (StatusCode::OK, format!(r#"{{"deleted":"1","key":"{key}"}}"#))
    }
}

/// Start the mock gateway admin API on a free port.
pub async fn start_mock_gateway() -> (SocketAddr, MockGateway) {
    let mock = MockGateway::default();
    let app = Router::new().fallback(admin_handler).with_state(mock.clone());
    let addr: SocketAddr = format!("127.0.0.1:{}", get_free_port()).parse().unwrap();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, mock)
}

pub fn apisix_config(gateway_addr: SocketAddr) -> ApisixConfig {
    ApisixConfig {
        url: format!("http://{gateway_addr}/apisix/admin/routes"),
        token: ADMIN_TOKEN.to_string(),
        prefix: "/plugins".to_string(),
        timeout_secs: Some(5),
    }
}

/// A running API server wired to a mock gateway
pub struct TestApp {
    pub base_url: String,
    pub gateway: MockGateway,
    pub client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    /// Mock gateway plus in-memory catalog.
    pub async fn spawn() -> Self {
        Self::spawn_with_catalog(Arc::new(MemoryCatalog::new())).await
    }

    pub async fn spawn_with_catalog(catalog: Arc<dyn PluginCatalog>) -> Self {
        let (gateway_addr, mock) = start_mock_gateway().await;
        let gateway = ApisixGateway::new(&apisix_config(gateway_addr)).unwrap();
        Self::spawn_with(Arc::new(gateway), catalog, mock).await
    }

    pub async fn spawn_with(
        gateway: Arc<ApisixGateway>,
        catalog: Arc<dyn PluginCatalog>,
        mock: MockGateway,
    ) -> Self {
        let addr: SocketAddr = format!("127.0.0.1:{}", get_free_port()).parse().unwrap();
        let server = ApiServer::builder()
            .bind(addr)
            .service(RegistrationService::new(gateway, catalog))
            .build()
            .unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = server
                .run_until(async move {
                    let _ = rx.await;
                })
                .await;
        });
        assert!(
            wait_for_server(addr, Duration::from_secs(5)).await,
            "API server did not start"
        );

        Self {
            base_url: format!("http://{addr}"),
            gateway: mock,
            client: make_client(),
            shutdown: Some(tx),
        }
    }

    /// POST a JSON body and return `(http status, envelope)`.
    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
