//! Streamable HTTP transport.
//!
//! - `POST /mcp` takes one JSON-RPC message and answers it in the body
//! - `GET /mcp` opens an SSE stream of the session's replies, replaying
//!   anything after `Last-Event-ID`
//! - `DELETE /mcp` ends a session
//! - `GET /health` reports liveness

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::{Dispatcher, JsonRpcRequest, JsonRpcResponse, SERVER_NAME};
use super::session::{Session, SessionStore};

/// Header carrying the session id in both directions.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub dispatcher: Dispatcher,
    pub sessions: SessionStore,
}

/// Build the router. Does not start session cleanup; see [`SessionStore::spawn_cleanup`].
pub fn create_router(dispatcher: Dispatcher, sessions: SessionStore) -> Router {
    let state = Arc::new(HttpState { dispatcher, sessions });

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/mcp",
            get(handle_mcp_get).post(handle_mcp_post).delete(handle_mcp_delete),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let sessions = state.sessions.len().await;
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.dispatcher.tools().len(),
        "sessions": sessions
    }))
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

fn with_session_header(mut response: Response, session: &Session) -> Response {
    if let Some(value) = session.header_value() {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

async fn handle_mcp_post(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session = state.sessions.get_or_create(session_id(&headers)).await;

    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(session_id = %session.id(), error = %e, "Unparseable request body");
            let response = (StatusCode::BAD_REQUEST, Json(JsonRpcResponse::parse_error(&e)));
            return with_session_header(response.into_response(), &session);
        }
    };

    tracing::debug!(session_id = %session.id(), method = %request.method, "Handling MCP POST");

    let Some(reply) = state.dispatcher.handle(request).await else {
        return with_session_header(StatusCode::ACCEPTED.into_response(), &session);
    };

    match serde_json::to_string(&reply) {
        Ok(data) => {
            session.push("message", data).await;
        }
        Err(e) => tracing::error!(error = %e, "Failed to record reply for replay"),
    }

    with_session_header(Json(reply).into_response(), &session)
}

async fn handle_mcp_get(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> Response {
    let last_event_id: u64 = headers
        .get("Last-Event-ID")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);

    let session = state.sessions.get_or_create(session_id(&headers)).await;

    tracing::info!(
        session_id = %session.id(),
        last_event_id,
        "SSE stream opened"
    );

    let stream = event_stream(Arc::clone(&session), last_event_id).await;
    let sse = Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("ping"));

    let response = (
        [
            ("X-Accel-Buffering", "no"),
            ("Cache-Control", "no-cache, no-store, must-revalidate"),
        ],
        sse,
    )
        .into_response();
    with_session_header(response, &session)
}

async fn handle_mcp_delete(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> StatusCode {
    let Some(id) = session_id(&headers) else {
        return StatusCode::BAD_REQUEST;
    };
    if state.sessions.remove(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Missed events first, then live ones.
async fn event_stream(
    session: Arc<Session>,
    last_event_id: u64,
) -> impl Stream<Item = Result<Event, Infallible>> {
    // Subscribe before reading history so nothing falls between the two.
    let receiver = session.subscribe();
    let missed = session.events_after(last_event_id).await;
    let replayed_up_to = missed.last().map_or(last_event_id, |e| e.id);

    let replay = stream::iter(missed.into_iter().map(|e| Ok(e.to_sse_event())));

    let live = BroadcastStream::new(receiver).filter_map(move |result| async move {
        match result {
            Ok(event) if event.id > replayed_up_to => Some(Ok(event.to_sse_event())),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "SSE subscriber lagged");
                None
            }
        }
    });

    replay.chain(live)
}
