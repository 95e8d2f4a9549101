//! HTTP/WebSocket surface.
//!
//! API endpoints:
//! - GET  /health                        - liveness
//! - POST /api/login/submit              - {session_id, embedding[512]} JSON
//! - POST /api/login/image/{session_id}  - raw image bytes
//! - GET  /ws/login/{session_id}         - realtime result channel

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures::stream::{SplitSink, SplitStream, StreamExt};
use futures::SinkExt;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use facegate_gallery::MatchDecision;
use facegate_login::{run_login_channel, ChannelError, ChannelEvent, ChannelTransport, LoginCoordinator};
use facegate_session::{SessionError, SessionRegistry};

#[derive(Clone)]
struct AppState {
    coordinator: Arc<LoginCoordinator>,
    registry: Arc<SessionRegistry<MatchDecision>>,
    wait_timeout: Duration,
}

/// Starts the server and runs until shutdown.
pub async fn serve(
    addr: &str,
    coordinator: Arc<LoginCoordinator>,
    registry: Arc<SessionRegistry<MatchDecision>>,
    wait_timeout: Duration,
) -> Result<()> {
    let state = AppState {
        coordinator,
        registry,
        wait_timeout,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/login/submit", post(login_submit))
        .route("/api/login/image/{session_id}", post(login_image))
        .route("/ws/login/{session_id}", get(login_ws))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "facegated listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Deserialize)]
struct SubmitRequest {
    session_id: String,
    embedding: Vec<f32>,
}

fn session_error_response(e: SessionError) -> Response {
    let status = match e {
        SessionError::Unknown(_) => StatusCode::NOT_FOUND,
        SessionError::Duplicate(_) => StatusCode::CONFLICT,
    };
    (status, Json(json!({"error": e.to_string()}))).into_response()
}

async fn login_submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Response {
    match state
        .coordinator
        .submit_vector(&req.session_id, &req.embedding)
        .await
    {
        Ok(()) => Json(json!({"queued": true})).into_response(),
        Err(e) => session_error_response(e),
    }
}

async fn login_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Response {
    match state.coordinator.submit_image(&session_id, &body).await {
        Ok(()) => Json(json!({"queued": true})).into_response(),
        Err(e) => session_error_response(e),
    }
}

async fn login_ws(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let transport = WsTransport::new(socket);
        match run_login_channel(&state.registry, &transport, &session_id, state.wait_timeout).await
        {
            Ok(()) => {}
            Err(ChannelError::Session(e)) => {
                warn!(session_id, error = %e, "realtime channel refused");
                let _ = transport.close().await;
            }
            Err(e) => warn!(session_id, error = %e, "realtime channel failed"),
        }
    })
}

/// [`ChannelTransport`] over an axum WebSocket.
struct WsTransport {
    tx: Mutex<SplitSink<WebSocket, Message>>,
    rx: Mutex<SplitStream<WebSocket>>,
}

impl WsTransport {
    fn new(socket: WebSocket) -> Self {
        let (tx, rx) = socket.split();
        Self {
            tx: Mutex::new(tx),
            rx: Mutex::new(rx),
        }
    }

    async fn close(&self) -> Result<(), ChannelError> {
        self.tx
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }
}

#[async_trait]
impl ChannelTransport for WsTransport {
    async fn send(&self, event: &ChannelEvent) -> Result<(), ChannelError> {
        let text =
            serde_json::to_string(event).map_err(|e| ChannelError::Transport(e.to_string()))?;
        self.tx
            .lock()
            .await
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }

    async fn recv(&self) -> Result<Option<String>, ChannelError> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // Pings and pongs are handled by axum; binary frames are
                // not part of the control protocol.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ChannelError::Transport(e.to_string())),
            }
        }
    }
}
