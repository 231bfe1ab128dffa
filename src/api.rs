//! HTTP surface: the three catalogue endpoints, CORS, and static hosting of
//! the frontend. Every request re-reads its snapshot(s) from disk; there is
//! no cache and no shared mutable state, so concurrent requests stay fully
//! independent.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::error;

use crate::config::CatalogueConfig;
use crate::origin::Origin;
use crate::programmes::{query_programmes, ProgrammePage};
use crate::query::PageParams;
use crate::scholarships::{query_scholarships, ScholarshipFilters, ScholarshipPage};
use crate::store::load_records;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CatalogueConfig>,
}

pub fn router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    Router::new()
        .route("/api/health", get(health))
        .route("/api/courses", get(courses))
        .route("/api/scholarships", get(scholarships))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// The two wire errors. Everything that is not an unsupported country maps
/// to a generic 500; the detail stays in the server log and never reaches
/// the client.
pub enum ApiError {
    UnsupportedCountry,
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::UnsupportedCountry => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Unsupported country" })),
            )
                .into_response(),
            Self::Internal(err) => {
                error!(error = ?err, "catalogue request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

// Pagination params arrive as raw strings so bad values can be coerced
// instead of failing extraction with a 400.
#[derive(Debug, Deserialize)]
struct CoursesQuery {
    country: Option<String>,
    q: Option<String>,
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

async fn courses(
    State(state): State<AppState>,
    Query(params): Query<CoursesQuery>,
) -> Result<Json<ProgrammePage>, ApiError> {
    let origin = params
        .country
        .as_deref()
        .and_then(Origin::parse)
        .ok_or(ApiError::UnsupportedCountry)?;

    let records = load_records(state.config.programme_source(origin)).await?;
    let pagination = PageParams::from_raw(params.page.as_deref(), params.page_size.as_deref());
    let text_filter = params.q.unwrap_or_default();

    Ok(Json(query_programmes(
        origin,
        records,
        &text_filter,
        &pagination,
    )))
}

#[derive(Debug, Deserialize)]
struct ScholarshipsQuery {
    q: Option<String>,
    country: Option<String>,
    level: Option<String>,
    deadline: Option<String>,
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

async fn scholarships(
    State(state): State<AppState>,
    Query(params): Query<ScholarshipsQuery>,
) -> Result<Json<ScholarshipPage>, ApiError> {
    // The two snapshot reads have no ordering dependency; run them
    // concurrently and join once both are in.
    let (main, details) = tokio::try_join!(
        load_records(state.config.scholarship_source()),
        load_records(state.config.scholarship_steps_source()),
    )?;

    let filters = ScholarshipFilters {
        country: non_empty(params.country),
        level: non_empty(params.level),
        deadline: non_empty(params.deadline),
        text: non_empty(params.q),
    };
    let pagination = PageParams::from_raw(params.page.as_deref(), params.page_size.as_deref());

    Ok(Json(query_scholarships(main, details, &filters, &pagination)))
}

/// An empty query parameter means "filter not supplied".
fn non_empty(param: Option<String>) -> Option<String> {
    param.filter(|value| !value.is_empty())
}
