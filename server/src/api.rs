//! API handlers

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

const SUGGEST_UPSTREAM: &str = "https://duckduckgo.com/ac/";
const ICON_UPSTREAM: &str =
    "https://t2.gstatic.com/faviconV2?client=SOCIAL&type=FAVICON&fallback_opts=TYPE,SIZE,URL&size=64&url=";
const DEFAULT_ICON: &str = "/a/moon.svg";

#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
pub struct QueryParams {
    q: Option<String>,
}

/// Autocomplete relay for the address-bar overlay.
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Response {
    let Some(q) = params.q.filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Query parameter \"q\" is required." })),
        )
            .into_response();
    };

    let upstream = state
        .client
        .get(format!("{}?q={}", SUGGEST_UPSTREAM, urlencoding::encode(&q)))
        .header(header::USER_AGENT, "Mozilla/5.0")
        .header(header::ACCEPT, "application/json")
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(%error, "Suggestion upstream request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error." })),
            )
                .into_response();
        }
    };

    if !upstream.status().is_success() {
        let status =
            StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return (
            status,
            Json(json!({ "error": "Failed to fetch suggestions." })),
        )
            .into_response();
    }

    match upstream.json::<Value>().await {
        Ok(payload) => Json(json!({ "suggestions": parse_suggestions(&payload) })).into_response(),
        Err(error) => {
            tracing::error!(%error, "Suggestion payload parse failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error." })),
            )
                .into_response()
        }
    }
}

/// The upstream answers `[{"phrase": "..."}, ...]`.
fn parse_suggestions(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("phrase"))
                .filter_map(Value::as_str)
                .map(|phrase| phrase.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Deserialize)]
pub struct IconParams {
    url: Option<String>,
}

/// Favicon relay the bookmark logos point at. Failures redirect to the
/// default placeholder instead of surfacing an error.
pub async fn icon(State(state): State<AppState>, Query(params): Query<IconParams>) -> Response {
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return Redirect::temporary(DEFAULT_ICON).into_response();
    };

    let upstream = state
        .client
        .get(format!("{}{}", ICON_UPSTREAM, urlencoding::encode(&url)))
        .send()
        .await;

    match upstream {
        Ok(response) if response.status().is_success() => {
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("image/png")
                .to_string();
            match response.bytes().await {
                Ok(body) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
                Err(_) => Redirect::temporary(DEFAULT_ICON).into_response(),
            }
        }
        _ => Redirect::temporary(DEFAULT_ICON).into_response(),
    }
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
