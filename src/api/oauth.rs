use axum::{
    Extension,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};

use crate::{
    flow, providers,
    server::AppState,
    success,
    types::{Provider, VerdictBody},
    warning,
};

pub async fn authorization_link(
    Path(platform): Path<String>,
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    let Ok(provider) = platform.parse::<Provider>() else {
        return invalid_platform();
    };

    match providers::descriptor(provider).authorization_url(&state.config) {
        Ok(url) => (StatusCode::OK, Json(json!({ "data": url }))),
        Err(e) => {
            warning!("Could not build {} authorization URL: {}", provider, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Could not build authorization URL" })),
            )
        }
    }
}

pub async fn authenticate(
    Path(platform): Path<String>,
    Extension(state): Extension<AppState>,
) -> Response {
    let Ok(provider) = platform.parse::<Provider>() else {
        return invalid_platform().into_response();
    };

    let request = match providers::descriptor(provider).login_request(&state.config) {
        Ok(request) => request,
        Err(e) => {
            warning!("Could not assemble {} login request: {}", provider, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Could not assemble login request" })),
            )
                .into_response();
        }
    };

    let result = flow::authenticate(state.sessions.as_ref(), &request).await;

    let status = if result.succeeded {
        success!("{} authentication successful", provider);
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(VerdictBody::from(result))).into_response()
}

fn invalid_platform() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Invalid platform provided" })),
    )
}
