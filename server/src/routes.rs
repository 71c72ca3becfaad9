use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use database::HistoryPage;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use types::{HistoryParams, HistoryQuery, NewGameRecord};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let memory = Router::new()
        .route("/save", post(save_game_data))
        .route("/history", get(get_game_history));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/memory", memory)
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid allowed origin: {}", origin);
                    None
                }
            })
            .collect();
        if origins.is_empty() {
            tracing::warn!("no allowed origins configured; browser requests will be rejected");
        }
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

#[tracing::instrument(skip_all)]
async fn save_game_data(
    State(state): State<AppState>,
    payload: Result<Json<NewGameRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(candidate) = payload?;
    state.writer.save(candidate).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Game data saved successfully" })),
    ))
}

#[tracing::instrument(skip(state))]
async fn get_game_history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryPage>, ApiError> {
    let Query(params) = params?;
    let page = state.reader.query(HistoryQuery::from_params(params)).await?;
    Ok(Json(page))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}
