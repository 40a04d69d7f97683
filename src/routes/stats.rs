use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::auth::OwnerId,
    models::BestMovie,
    services::stats,
    services::stats::OverallStats,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Year for the yearly counters; defaults to the current year.
    pub year: Option<i32>,
}

/// Handler for the aggregate statistics endpoint
pub async fn overall(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<OverallStats>> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());

    let stats = stats::overall_stats(state.store.as_ref(), owner, year, today).await?;

    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct BestMoviesQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BestMoviesResponse {
    pub total: usize,
    pub best_movies: Vec<BestMovie>,
}

/// Handler for the best movies endpoint
pub async fn best_movies(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Query(query): Query<BestMoviesQuery>,
) -> AppResult<Json<BestMoviesResponse>> {
    let limit = query.limit.unwrap_or(5);
    let best_movies = stats::best_movies(state.store.as_ref(), owner, limit).await?;

    Ok(Json(BestMoviesResponse {
        total: best_movies.len(),
        best_movies,
    }))
}
