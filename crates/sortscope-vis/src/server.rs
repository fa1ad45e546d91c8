//! Axum web server with WebSocket streaming for visualization.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sortscope_steps::{Algorithm, RunCounters};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::VisConfig;
use crate::controller::Controller;
use crate::dataset::RandomData;
use crate::events::{BroadcastRenderer, Frame, VisEvent};
use crate::playback::{PlaybackSpeed, PlaybackStatus};

/// Buffered events per WebSocket subscriber before it starts lagging.
const EVENT_BUFFER: usize = 1024;

/// Shared application state.
pub struct AppState {
    controller: Controller,
    events: broadcast::Sender<VisEvent>,
    default_algorithm: Algorithm,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl VisServer {
    /// Create a server with a random data source and an initial sequence.
    pub fn new(config: &VisConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let renderer = Arc::new(BroadcastRenderer::new(events.clone()));
        let controller = Controller::new(
            Box::new(RandomData::new(config.seed)),
            config.size,
            renderer.clone(),
            renderer.clone(),
        )
        .with_status_listener(renderer);

        Self {
            state: Arc::new(AppState {
                controller,
                events,
                default_algorithm: config.algorithm,
            }),
            addr: config.addr,
        }
    }

    /// Apply the configured speed before serving.
    pub async fn with_speed(self, speed: PlaybackSpeed) -> Self {
        self.state.controller.set_speed(speed).await;
        self
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/api/status", get(status_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/counters", get(counters_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/run", post(run_handler))
            .route("/api/pause", post(pause_handler))
            .route("/api/stop", post(stop_handler))
            .route("/api/generate", post(generate_handler))
            .route("/api/speed", post(speed_handler))
            .route("/api/redraw", post(redraw_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Visualization server running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await
    }
}

/// Serve the bundled page.
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.controller.status().await)
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.controller.frame().await)
}

async fn counters_handler(State(state): State<Arc<AppState>>) -> Json<RunCounters> {
    Json(state.controller.counters().await)
}

async fn algorithms_handler() -> Json<Vec<&'static str>> {
    Json(Algorithm::ALL.iter().map(Algorithm::as_str).collect())
}

#[derive(Debug, Default, Deserialize)]
struct RunRequest {
    algorithm: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RunRequest>>,
) -> Result<Json<PlaybackStatus>, (StatusCode, Json<ErrorResponse>)> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    start_run(&state, req.algorithm.as_deref())
        .await
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e.to_string() })))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.controller.toggle_pause().await;
    Json(state.controller.status().await)
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.controller.stop().await;
    Json(state.controller.status().await)
}

#[derive(Deserialize)]
struct GenerateRequest {
    size: usize,
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Json<PlaybackStatus> {
    state.controller.regenerate(req.size).await;
    Json(state.controller.status().await)
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: PlaybackSpeed,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    state.controller.set_speed(req.speed).await;
    Json(state.controller.status().await)
}

async fn redraw_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    state.controller.redraw().await;
    Json(state.controller.frame().await)
}

async fn start_run(state: &AppState, id: Option<&str>) -> crate::Result<PlaybackStatus> {
    match id {
        Some(id) => state.controller.start_named(id).await?,
        None => state.controller.start(state.default_algorithm).await,
    };
    Ok(state.controller.status().await)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    let mut events = state.events.subscribe();

    // Send current status and frame so the client can draw immediately
    let initial = [
        VisEvent::Status(state.controller.status().await),
        VisEvent::Frame(state.controller.frame().await),
        VisEvent::Counters(state.controller.counters().await),
    ];
    for event in &initial {
        if let Err(e) = send_json(&mut socket, event).await {
            warn!("Failed to send initial state: {}", e);
            return;
        }
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error { error: e.to_string() },
                        };
                        if let Err(e) = send_json(&mut socket, &reply).await {
                            warn!("Failed to send reply: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Err(e) = send_json(&mut socket, &event).await {
                            warn!("Failed to push event: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped = skipped, "WebSocket client lagging, frames dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), axum::Error> {
    let json = serde_json::to_string(value).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    GetFrame,
    Run { algorithm: Option<String> },
    Pause,
    Resume,
    TogglePause,
    Stop,
    Generate { size: usize },
    Speed { speed: PlaybackSpeed },
    Redraw,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Status(PlaybackStatus),
    Frame(Frame),
    Error { error: String },
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    debug!(?cmd, "WebSocket command");
    let controller = &state.controller;
    match cmd {
        WsCommand::GetStatus => {}
        WsCommand::GetFrame => return WsResponse::Frame(controller.frame().await),
        WsCommand::Run { algorithm } => {
            if let Err(e) = start_run(state, algorithm.as_deref()).await {
                return WsResponse::Error { error: e.to_string() };
            }
        }
        WsCommand::Pause => {
            controller.pause().await;
        }
        WsCommand::Resume => {
            controller.resume().await;
        }
        WsCommand::TogglePause => {
            controller.toggle_pause().await;
        }
        WsCommand::Stop => {
            controller.stop().await;
        }
        WsCommand::Generate { size } => {
            controller.regenerate(size).await;
        }
        WsCommand::Speed { speed } => controller.set_speed(speed).await,
        WsCommand::Redraw => controller.redraw().await,
    }
    WsResponse::Status(controller.status().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server() -> VisServer {
        let config = VisConfig {
            size: 8,
            seed: Some(7),
            ..VisConfig::default()
        };
        VisServer::new(&config)
    }

    async fn request(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn run_rejects_unknown_algorithm() {
        let server = server();
        let (status, body) =
            request(server.router(), "POST", "/api/run", Some(json!({"algorithm": "bogo"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("bogo"));

        let (status, body) = request(server.router(), "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");
        assert_eq!(body["run_id"], 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_starts_the_named_algorithm() {
        let server = server();
        let (status, body) =
            request(server.router(), "POST", "/api/run", Some(json!({"algorithm": "merge"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "running");
        assert_eq!(body["algorithm"], "merge");

        let (_, body) = request(server.router(), "GET", "/api/status", None).await;
        assert_eq!(body["state"], "running");
        assert_eq!(body["run_id"], 1);

        let (_, body) = request(server.router(), "POST", "/api/stop", None).await;
        assert_eq!(body["state"], "idle");
    }

    #[tokio::test(start_paused = true)]
    async fn generate_speed_and_counters_routes() {
        let server = server();
        let (status, body) =
            request(server.router(), "POST", "/api/generate", Some(json!({"size": 5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["len"], 5);

        let (_, frame) = request(server.router(), "GET", "/api/frame", None).await;
        assert_eq!(frame["elements"].as_array().unwrap().len(), 5);

        let (status, body) =
            request(server.router(), "POST", "/api/speed", Some(json!({"speed": 75}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["speed"], 75);

        let (status, counters) = request(server.router(), "GET", "/api/counters", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(counters, json!({"comparisons": 0, "swaps": 0, "writes": 0}));
    }

    #[tokio::test(start_paused = true)]
    async fn server_starts_idle_with_configured_size() {
        let server = server();
        let status = server.state.controller.status().await;
        assert_eq!(status.state, PlaybackState::Idle);
        assert_eq!(status.len, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn ws_run_command_rejects_unknown_algorithm() {
        let server = server();
        let reply = handle_ws_command(
            &server.state,
            WsCommand::Run { algorithm: Some("bogo".into()) },
        )
        .await;
        assert!(matches!(reply, WsResponse::Error { .. }));
        assert_eq!(server.state.controller.status().await.state, PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn ws_commands_drive_the_controller() {
        let server = server();
        let state = &server.state;
        let mut events = state.events.subscribe();

        let reply = handle_ws_command(state, WsCommand::Run { algorithm: None }).await;
        match reply {
            WsResponse::Status(status) => {
                assert_eq!(status.state, PlaybackState::Running);
                assert_eq!(status.algorithm, Some(Algorithm::Bubble));
            }
            other => panic!("expected status, got {other:?}"),
        }

        let reply = handle_ws_command(state, WsCommand::TogglePause).await;
        assert!(matches!(reply, WsResponse::Status(s) if s.state == PlaybackState::Paused));

        let reply = handle_ws_command(state, WsCommand::Stop).await;
        assert!(matches!(reply, WsResponse::Status(s) if s.state == PlaybackState::Idle));

        // counters reset + status on start, status on pause, frame + status on stop
        let mut kinds = Vec::new();
        while let Ok(event) = events.try_recv() {
            kinds.push(match event {
                VisEvent::Frame(_) => "frame",
                VisEvent::Counters(_) => "counters",
                VisEvent::Status(_) => "status",
            });
        }
        assert_eq!(kinds, vec!["counters", "status", "status", "frame", "status"]);
    }

    #[test]
    fn ws_command_parsing() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"run","algorithm":"merge"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Run { algorithm: Some(ref a) } if a == "merge"));

        let cmd: WsCommand = serde_json::from_str(r#"{"type":"speed","speed":75}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Speed { speed } if speed.value() == 75));

        let cmd: WsCommand = serde_json::from_str(r#"{"type":"toggle_pause"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::TogglePause));
    }
}
