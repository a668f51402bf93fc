use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{api, browser::SessionProvider, config::Config, error, info};

/// User expected by the HTTP access gate; the password is the configured
/// secret key.
const GATE_USER: &str = "admin";

/// Shared read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionProvider>,
}

pub async fn start_api_server(state: AppState, port: u16) {
    let gated = Router::new()
        .route("/api/oauth/{platform}/link", get(api::authorization_link))
        .route("/api/oauth/{platform}", post(api::authenticate))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            require_basic_auth,
        ));

    let app = Router::new()
        .route("/ping", get(api::ping))
        .merge(gated)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(Extension(state));

    let addr = match SocketAddr::from_str(&format!("0.0.0.0:{port}")) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    info!("Listening on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server terminated: {}", e);
    }
}

/// HTTP Basic gate for the `/api` routes.
///
/// Rejections never echo the presented password back to the caller.
async fn require_basic_auth(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    match presented_credentials(&request) {
        Some((user, password)) if user == GATE_USER && password == config.secret_key => {
            next.run(request).await
        }
        Some((user, _)) => unauthorized(format!("Credentials for {user} rejected")),
        None => unauthorized("No credentials provided".to_string()),
    }
}

fn presented_credentials(request: &Request) -> Option<(String, String)> {
    let header_value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn unauthorized(message: String) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"api\"")],
        message,
    )
        .into_response()
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
