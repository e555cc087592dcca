//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use quarry_content::SiteContent;
use quarry_static::assets::AssetPipeline;
use quarry_static::sections::FEED_FRAGMENT;
use quarry_static::{client_config, render_fragment, render_page, PageOptions, TemplateEngine};

use crate::reload::{
    reload_client_script, ReloadHub, ReloadMessage, RELOAD_PATH, RELOAD_SCRIPT_PATH,
};
use crate::watcher::{FileWatcher, WatchEvent};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site content file
    pub content_path: PathBuf,

    /// Static files served at the site root
    pub public_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from("site.toml"),
            public_dir: PathBuf::from("public"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Content(#[from] quarry_content::ContentError),
}

/// Shared server state.
pub(crate) struct ServerState {
    content_path: PathBuf,
    /// Last content that loaded and validated
    content: SiteContent,
    templates: TemplateEngine,
    reload: ReloadHub,
}

type SharedState = Arc<RwLock<ServerState>>;

impl ServerState {
    pub(crate) fn new(content_path: PathBuf, content: SiteContent) -> Self {
        Self {
            content_path,
            content,
            templates: TemplateEngine::new(),
            reload: ReloadHub::new(),
        }
    }

    fn page_options() -> PageOptions {
        PageOptions {
            scripts: vec![RELOAD_SCRIPT_PATH.to_string()],
            ..PageOptions::default()
        }
    }
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = socket_addr(&self.config.host, self.config.port)?;

        // Refuse to start on content that does not load; later edits that
        // break it only log, keeping the last good version on screen.
        let content = SiteContent::load(&self.config.content_path)?;
        let state = Arc::new(RwLock::new(ServerState::new(
            self.config.content_path.clone(),
            content,
        )));

        let (watcher, mut rx) =
            FileWatcher::new(&self.config.content_path, &self.config.public_dir)
                .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &self.config.public_dir);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Serve a built site directory as-is.
pub async fn serve_dir(dir: PathBuf, host: &str, port: u16, open: bool) -> Result<(), ServerError> {
    let addr = socket_addr(host, port)?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

    if open {
        let _ = open::that(format!("http://{}", addr));
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))
}

fn socket_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let addr = format!("{}:{}", host, port);
    addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
}

pub(crate) fn router(state: SharedState, public_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/assets/main.css", get(css_handler))
        .route("/assets/main.js", get(js_handler))
        .route(&format!("/{}", FEED_FRAGMENT), get(fragment_handler))
        .route(RELOAD_PATH, get(ws_handler))
        .route(RELOAD_SCRIPT_PATH, get(reload_script_handler))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}

/// Handle file watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::ContentModified(path) => {
            tracing::info!("Content modified: {}", path.display());

            let content_path = state.read().await.content_path.clone();
            let loaded = tokio::task::spawn_blocking(move || SiteContent::load(&content_path)).await;

            let mut state = state.write().await;
            match loaded {
                Ok(Ok(content)) => {
                    state.content = content;
                    state.reload.send(ReloadMessage::Reload);
                }
                Ok(Err(e)) => {
                    tracing::warn!("Keeping previous content: {}", e);
                    state.reload.send(ReloadMessage::ContentError {
                        message: e.to_string(),
                    });
                }
                Err(e) => tracing::error!("Content reload task failed: {}", e),
            }
        }

        WatchEvent::AssetModified(path) if is_stylesheet(&path) => {
            state.read().await.reload.send(ReloadMessage::ReloadStyles);
        }

        WatchEvent::AssetModified(path) | WatchEvent::Created(path) | WatchEvent::Deleted(path) => {
            tracing::debug!("Public file changed: {}", path.display());
            state.read().await.reload.send(ReloadMessage::Reload);
        }
    }
}

fn is_stylesheet(path: &std::path::Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("css")
}

fn render_error(e: impl std::fmt::Display) -> Response {
    tracing::error!("Render failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Render failed: {}", e)).into_response()
}

/// Handler for the page.
async fn index_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    match render_page(&state.templates, &state.content, &ServerState::page_options()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// Handler for the deferred feed fragment.
async fn fragment_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    match render_fragment(&state.templates, &state.content, &ServerState::page_options()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

async fn css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        AssetPipeline::generate_css(),
    )
}

async fn js_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    match AssetPipeline::generate_js(&client_config(&state.content)) {
        Ok(js) => ([(header::CONTENT_TYPE, "application/javascript")], js).into_response(),
        Err(e) => render_error(e),
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward reload messages to one browser until it disconnects.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = state.read().await.reload.subscribe();

    if send_json(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_json(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

async fn reload_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_client_script(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn shared(content_path: PathBuf) -> SharedState {
        Arc::new(RwLock::new(ServerState::new(
            content_path,
            SiteContent::shipped(),
        )))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.content_path, PathBuf::from("site.toml"));
    }

    #[test]
    fn rejects_bad_address() {
        let err = socket_addr("not a host", 80).unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn page_includes_reload_script() {
        let state = shared(PathBuf::from("site.toml"));
        let response = index_handler(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("__reload.js"));
        assert!(html.contains("data-deferred-src"));
    }

    #[tokio::test]
    async fn serves_feed_fragment() {
        let state = shared(PathBuf::from("site.toml"));
        let html = body_text(fragment_handler(State(state)).await).await;

        assert!(html.contains("Follow Our Work"));
        assert!(!html.contains("Loading..."));
    }

    #[tokio::test]
    async fn script_reflects_current_content() {
        let state = shared(PathBuf::from("site.toml"));
        state.write().await.content.profile.email = "office@example.test".to_string();

        let js = body_text(js_handler(State(state)).await).await;
        assert!(js.contains("office@example.test"));
    }

    #[tokio::test]
    async fn content_change_reloads_browsers() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        let source = SiteContent::shipped_toml().replace(
            r#"name = "Hansen's Excavating & Trucking""#,
            r#"name = "Hansen's Excavating & Trucking Inc.""#,
        );
        fs::write(&path, source).unwrap();

        let state = shared(path.clone());
        let mut rx = state.read().await.reload.subscribe();

        handle_watch_event(&state, WatchEvent::ContentModified(path)).await;

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        assert!(state.read().await.content.profile.name.ends_with("Inc."));
    }

    #[tokio::test]
    async fn broken_content_keeps_last_good_version() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[site]\ntitle = ").unwrap();

        let state = shared(path.clone());
        let before = state.read().await.content.clone();
        let mut rx = state.read().await.reload.subscribe();

        handle_watch_event(&state, WatchEvent::ContentModified(path)).await;

        assert!(matches!(
            rx.try_recv().unwrap(),
            ReloadMessage::ContentError { .. }
        ));
        assert_eq!(state.read().await.content, before);
    }

    #[tokio::test]
    async fn stylesheet_change_swaps_styles() {
        let state = shared(PathBuf::from("site.toml"));
        let mut rx = state.read().await.reload.subscribe();

        handle_watch_event(
            &state,
            WatchEvent::AssetModified(PathBuf::from("public/extra.css")),
        )
        .await;
        handle_watch_event(&state, WatchEvent::Created(PathBuf::from("public/logo.svg"))).await;

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::ReloadStyles);
        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
    }
}
