//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving WebSocket clients
//! the way a browser would.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use pairchat_common::AppConfig;
use pairchat_gateway::{create_app, create_gateway_state};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// How long a client waits for an expected frame
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        // Build application
        let app = create_app(create_gateway_state(config));

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Create HTTP client
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Fetch `/stats` as JSON
    pub async fn stats(&self) -> Result<Value> {
        Ok(self.get("/stats").await?.json().await?)
    }

    /// Poll `/stats` until the server reports `count` registered connections
    pub async fn wait_for_connections(&self, count: u64) -> Result<()> {
        let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
        loop {
            let stats = self.stats().await?;
            if stats["connections"].as_u64() == Some(count) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                bail!("expected {count} connections, stats: {stats}");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Open a WebSocket client against this server
    pub async fn connect(&self) -> Result<TestClient> {
        TestClient::connect(self.addr).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Create a test configuration
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    // Tests drive reconciliation through disconnects, not the timer
    config.matchmaking.sweep_interval_secs = 3600;
    config
}

/// A decoded server frame
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub ack: Option<u64>,
}

impl Frame {
    /// Check if this is the `ack` reply for `id`
    pub fn is_ack_for(&self, id: u64) -> bool {
        self.event == "ack" && self.ack == Some(id)
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A WebSocket client speaking the gateway protocol
pub struct TestClient {
    /// Id announced in the `hello` frame
    pub connection_id: String,
    /// Heartbeat interval announced in the `hello` frame
    pub heartbeat_interval: u64,
    ws: WsStream,
    next_ack: u64,
}

impl TestClient {
    /// Connect and consume the `hello` frame
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (ws, _) = connect_async(format!("ws://{addr}/gateway")).await?;
        let mut client = Self {
            connection_id: String::new(),
            heartbeat_interval: 0,
            ws,
            next_ack: 1,
        };

        let hello = client.expect_event("hello").await?;
        client.connection_id = hello.data["connection_id"]
            .as_str()
            .context("hello without connection_id")?
            .to_string();
        client.heartbeat_interval = hello.data["heartbeat_interval"]
            .as_u64()
            .context("hello without heartbeat_interval")?;

        Ok(client)
    }

    /// Send a frame as-is
    pub async fn send_raw(&mut self, text: impl Into<String>) -> Result<()> {
        self.ws.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Send an event without an `ack` id
    pub async fn emit(&mut self, event: &str, data: Option<Value>) -> Result<()> {
        let mut frame = json!({ "event": event });
        if let Some(data) = data {
            frame["data"] = data;
        }
        self.send_raw(frame.to_string()).await
    }

    /// Send an event with a fresh `ack` id and collect every frame up to and
    /// including the matching `ack`
    pub async fn call(&mut self, event: &str, data: Option<Value>) -> Result<Vec<Frame>> {
        let id = self.next_ack;
        self.next_ack += 1;

        let mut frame = json!({ "event": event, "ack": id });
        if let Some(data) = data {
            frame["data"] = data;
        }
        self.send_raw(frame.to_string()).await?;

        let mut frames = Vec::new();
        loop {
            let frame = self.next_event().await?;
            let done = frame.is_ack_for(id);
            frames.push(frame);
            if done {
                return Ok(frames);
            }
        }
    }

    /// Wait for the next non-control frame
    pub async fn next_event(&mut self) -> Result<Frame> {
        loop {
            let msg = tokio::time::timeout(EVENT_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for a frame")?;

            match msg {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(other)) => bail!("unexpected frame: {other:?}"),
                Some(Err(e)) => return Err(e.into()),
                None => bail!("connection closed"),
            }
        }
    }

    /// Wait for the next frame and check its event name
    pub async fn expect_event(&mut self, event: &str) -> Result<Frame> {
        let frame = self.next_event().await?;
        if frame.event != event {
            bail!("expected `{event}`, got {frame:?}");
        }
        Ok(frame)
    }

    /// Assert nothing arrives for `window`
    pub async fn expect_silence(&mut self, window: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + window;
        loop {
            match tokio::time::timeout_at(deadline, self.ws.next()).await {
                Err(_) => return Ok(()),
                Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => {}
                Ok(other) => bail!("expected silence, got {other:?}"),
            }
        }
    }

    /// Close the socket cleanly
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}

/// Collect the event names of a batch of frames
pub fn events(frames: &[Frame]) -> Vec<&str> {
    frames.iter().map(|f| f.event.as_str()).collect()
}

/// Connect two clients and pair them with each other
pub async fn paired(server: &TestServer) -> Result<(TestClient, TestClient)> {
    let mut a = server.connect().await?;
    let mut b = server.connect().await?;

    a.call("startChat", None).await?;
    let frames = b.call("startChat", None).await?;
    if events(&frames) != ["chatStarted", "ack"] {
        bail!("second client was not paired: {frames:?}");
    }
    a.expect_event("chatStarted").await?;

    Ok((a, b))
}
