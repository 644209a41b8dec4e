//! HTTP endpoint handlers
//!
//! Every response is wrapped in an [`Envelope`]; failures map to a status
//! code through [`ApiError`].

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use discovery_core::{
    checked_limit, DiscoveryError, RecommendationResult, SearchCorpusProvider, User,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Response wrapper shared by every endpoint
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &DiscoveryError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub users: usize,
    /// Entries in the current snapshot; zero until the first rebuild
    pub corpus_entries: usize,
    /// Whether the next search rebuilds the corpus first
    pub corpus_stale: bool,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub stale: bool,
}

fn resolve_limit(raw: Option<i64>, default: usize) -> Result<usize, ApiError> {
    match raw {
        Some(raw) => Ok(checked_limit(raw)?),
        None => Ok(default),
    }
}

/// POST /search
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Envelope<Vec<User>>>, ApiError> {
    let Json(req) = body?;
    let limit = resolve_limit(req.limit, state.default_search_limit)?;
    let users = state.search.search(&req.query, limit).await?;
    debug!(query = %req.query, limit, returned = users.len(), "Search served");
    Ok(Json(Envelope::ok(users)))
}

/// GET /recommendations/:user_id
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    query: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<RecommendationResult>>>, ApiError> {
    let Query(params) = query?;
    let limit = resolve_limit(params.limit, state.recommender.config().default_limit)?;
    let results = state.recommender.recommended_users(&user_id, limit).await?;
    Ok(Json(Envelope::ok(results)))
}

/// POST /search/invalidate
pub async fn invalidate(State(state): State<Arc<AppState>>) -> Json<Envelope<InvalidateResponse>> {
    state.corpus.mark_stale();
    info!("Search corpus marked stale");
    Json(Envelope::ok(InvalidateResponse { stale: true }))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Envelope<HealthResponse>> {
    Json(Envelope::ok(HealthResponse {
        status: "ok",
        users: state.store.user_count(),
        corpus_entries: state.corpus.len(),
        corpus_stale: state.corpus.needs_update(),
    }))
}
