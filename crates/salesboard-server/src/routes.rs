//! HTTP and WebSocket routes for the Salesboard server.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::header,
    response::{IntoResponse, Json},
    routing::get,
};

#[cfg(feature = "embedded-frontend")]
use axum::extract::Path as AxumPath;

#[cfg(not(feature = "embedded-frontend"))]
use axum::response::Html;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tower_http::cors::CorsLayer;

use salesboard::widgets::{REGION_WIDGET, SEGMENT_WIDGET};
use salesboard::{Dashboard, DashboardConfig};
use salesboard_core::{Dataset, EXPORT_FILE_NAME, FilterSelection, to_csv_bytes};

use crate::error::ServerResult;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::DashboardSession;

#[cfg(feature = "embedded-frontend")]
use crate::embedded_frontend;

/// Application state shared across handlers.
pub struct AppState {
    /// Base order table, loaded once at startup.
    pub dataset: Arc<Dataset>,
    /// Presentation settings applied to every session.
    pub config: DashboardConfig,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Self { dataset, config }
    }
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/export", get(export_handler));

    // Add frontend routes
    #[cfg(feature = "embedded-frontend")]
    let router = router
        .route("/", get(frontend_index_handler))
        .route("/static/{*path}", get(static_handler));

    #[cfg(not(feature = "embedded-frontend"))]
    let router = router.route("/", get(index_handler));

    router
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page handler (fallback when embedded-frontend is disabled).
#[cfg(not(feature = "embedded-frontend"))]
async fn index_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Sales Dashboard</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 2rem; }
        h1 { color: #008000; }
        pre { background: #f3f4f6; padding: 1rem; border-radius: 0.5rem; }
    </style>
</head>
<body>
    <h1>Sales Analytics Dashboard</h1>
    <p>WebSocket endpoint: <code>/ws</code></p>
    <p>API endpoints:</p>
    <ul>
        <li><code>GET /health</code> - Health check</li>
        <li><code>GET /api/dashboard?region=..&amp;segment=..</code> - Dashboard snapshot</li>
        <li><code>GET /api/export</code> - Download the data as CSV</li>
    </ul>
    <p><em>Note: The full UI is available with the <code>embedded-frontend</code> feature.</em></p>
    <pre id="out"></pre>
    <script>
        const ws = new WebSocket(`ws://${location.host}/ws`);
        ws.onmessage = (e) => {
            const msg = JSON.parse(e.data);
            document.getElementById('out').textContent =
                JSON.stringify(msg.dashboard ? msg.dashboard.kpis : msg, null, 2);
        };
        ws.onopen = () => ws.send(JSON.stringify({ type: 'get_state' }));
    </script>
</body>
</html>"#,
    )
}

/// Serve the embedded frontend index.html.
#[cfg(feature = "embedded-frontend")]
async fn frontend_index_handler() -> impl IntoResponse {
    embedded_frontend::index()
}

/// Serve static assets from the embedded frontend.
#[cfg(feature = "embedded-frontend")]
async fn static_handler(AxumPath(path): AxumPath<String>) -> impl IntoResponse {
    embedded_frontend::asset(&path)
}

/// Health check handler.
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    #[cfg(feature = "embedded-frontend")]
    let assets = embedded_frontend::asset_names();
    #[cfg(not(feature = "embedded-frontend"))]
    let assets: Vec<String> = Vec::new();

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "rows": state.dataset.len(),
        "frontend_assets": assets,
    }))
}

/// Resolve a selection from repeated `region` / `segment` query keys.
///
/// An absent key selects every value; a key present only with empty values
/// selects nothing.
pub fn selection_from_query(dataset: &Dataset, params: &[(String, String)]) -> FilterSelection {
    let pick = |key: &str, all: Vec<String>| {
        let mut present = false;
        let mut values = Vec::new();
        for (k, v) in params {
            if k == key {
                present = true;
                if !v.is_empty() && !values.contains(v) {
                    values.push(v.clone());
                }
            }
        }
        if present { values } else { all }
    };

    FilterSelection::new(
        pick(REGION_WIDGET, dataset.distinct_regions()),
        pick(SEGMENT_WIDGET, dataset.distinct_segments()),
    )
}

/// Dashboard snapshot for the selection given in the query string.
async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Dashboard> {
    let selection = selection_from_query(&state.dataset, &params);
    Json(Dashboard::build(&state.dataset, &selection, &state.config))
}

/// Download the base table as CSV.
async fn export_handler(State(state): State<Arc<AppState>>) -> ServerResult<impl IntoResponse> {
    let body = to_csv_bytes(&state.dataset)?;
    tracing::info!("Serving CSV export ({} bytes)", body.len());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Handle WebSocket connection.
async fn handle_websocket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = DashboardSession::new(state.dataset.clone(), state.config.clone());

    tracing::debug!("WebSocket client connected");

    // Send initial state
    if !send_message(&mut sender, &session.get_state()).await {
        return;
    }

    // Handle incoming client messages
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => handle_client_message(msg, &mut session),
                    Err(e) => {
                        tracing::warn!("Failed to parse client message: {} (input: {})", e, text);
                        ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        }
                    }
                };
                if !send_message(&mut sender, &reply).await {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::warn!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    tracing::debug!("WebSocket client disconnected");
}

/// Send a server message through the WebSocket.
///
/// Returns `false` once the client is gone.
async fn send_message(sender: &mut SplitSink<WebSocket, Message>, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize server message: {}", e);
            true
        }
    }
}

/// Handle a client message.
fn handle_client_message(msg: ClientMessage, session: &mut DashboardSession) -> ServerMessage {
    match msg {
        ClientMessage::GetState => session.get_state(),
        ClientMessage::WidgetUpdate { widget_id, value } => {
            match session.update_widget(&widget_id, value) {
                Ok(state) => state,
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::ResetFilters => session.reset_filters(),
    }
}
