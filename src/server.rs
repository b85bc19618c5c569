//! Local HTTP front for the function.
//!
//! Every request outside `/health` is converted into an [`HttpEvent`] and the
//! resulting [`HttpResponse`] is written back unchanged.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{HttpEvent, HttpResponse};
use crate::config::config;
use crate::database::Store;
use crate::handlers;

pub type SharedStore = Arc<dyn Store>;

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(function)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn function(State(store): State<SharedStore>, request: Request) -> Response {
    let event = match into_event(request).await {
        Ok(event) => event,
        Err(resp) => return resp,
    };
    into_response(handlers::handle(store.as_ref(), event).await)
}

async fn into_event(request: Request) -> Result<HttpEvent, Response> {
    let (parts, body) = request.into_parts();

    let query: HashMap<String, String> = parts
        .uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();

    let bytes = to_bytes(body, config().api.max_request_size_bytes)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected request body: {}", e);
            into_response(HttpResponse::json(413, &json!({ "error": "Request body too large" })))
        })?;

    Ok(HttpEvent {
        http_method: Some(parts.method.as_str().to_string()),
        query_string_parameters: Some(query),
        headers: Some(headers),
        body: Some(String::from_utf8_lossy(&bytes).into_owned()),
    })
}

fn into_response(resp: HttpResponse) -> Response {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Body::from(resp.body)).into_response();

    let headers = response.headers_mut();
    for (name, value) in resp.headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Dropping invalid response header '{}'", name),
        }
    }
    response
}

async fn health(State(store): State<SharedStore>) -> Response {
    let now = chrono::Utc::now();

    let resp = match store.health_check().await {
        Ok(()) => HttpResponse::json(
            200,
            &json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::json(
                503,
                &json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                }),
            )
        }
    };
    into_response(resp)
}
