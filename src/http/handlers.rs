//! Request handlers.

use axum::{
    extract::{RawQuery, State},
    response::Html,
    Json,
};
use std::time::Instant;

use crate::http::request::letters_param;
use crate::http::response::{render_page, HealthStatus, MatchesResponse};
use crate::http::server::AppState;
use crate::observability::metrics;

/// `GET /` — HTML page listing the countries that contain every letter.
pub async fn letters_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let start = Instant::now();
    let letters = letters_param(query.as_deref());
    let matches = state.registry.matching(&letters);

    tracing::debug!(letters = %letters, matches = matches.len(), "Letters query");
    metrics::record_matches(matches.len());
    metrics::record_request("page", 200, start);

    Html(render_page(&matches))
}

/// `GET /api/countries` — the same lookup as JSON.
pub async fn letters_json(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<MatchesResponse> {
    let start = Instant::now();
    let letters = letters_param(query.as_deref());
    let countries = state.registry.matching(&letters);

    tracing::debug!(letters = %letters, matches = countries.len(), "Letters API query");
    metrics::record_matches(countries.len());
    metrics::record_request("api", 200, start);

    Json(MatchesResponse {
        letters,
        count: countries.len(),
        countries,
    })
}

/// `GET /healthz` — liveness plus registry size.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        countries: state.registry.len(),
    })
}
