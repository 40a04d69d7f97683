use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::BestMovie,
    store::LibraryStore,
};

use super::streak;

/// Yearly goal assumed when the owner has not configured one.
const DEFAULT_YEARLY_GOAL: i32 = 100;

/// Aggregate viewing statistics for one owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_watched: i64,
    pub yearly_watched: i64,
    pub yearly_goal: i32,
    pub yearly_goal_percentage: f64,
    pub average_rating: f64,
    pub total_watch_time_minutes: i64,
    pub total_watch_time_hours: f64,
    pub current_streak: u32,
}

/// Builds the aggregate statistics view: persisted totals plus the derived
/// consecutive-viewing streak as of `today`.
pub async fn overall_stats(
    store: &dyn LibraryStore,
    owner: Uuid,
    year: i32,
    today: NaiveDate,
) -> AppResult<OverallStats> {
    let totals = store.viewing_totals(owner, year).await?;
    let yearly_goal = store
        .yearly_goal(owner)
        .await?
        .unwrap_or(DEFAULT_YEARLY_GOAL);

    let watch_dates = store.completed_watch_dates(owner).await?;
    let current_streak = streak::current_streak(&watch_dates, today);

    let yearly_goal_percentage = if yearly_goal > 0 {
        totals.yearly_watched as f64 / f64::from(yearly_goal) * 100.0
    } else {
        0.0
    };

    Ok(OverallStats {
        total_watched: totals.total_watched,
        yearly_watched: totals.yearly_watched,
        yearly_goal,
        yearly_goal_percentage: round_tenth(yearly_goal_percentage),
        average_rating: totals.average_rating.map(round_tenth).unwrap_or(0.0),
        total_watch_time_minutes: totals.total_runtime_minutes,
        total_watch_time_hours: round_tenth(totals.total_runtime_minutes as f64 / 60.0),
        current_streak,
    })
}

/// Fetches the owner's best-flagged movies.
///
/// Thin delegation to the store, keeping HTTP routing separated from data
/// access.
pub async fn best_movies(
    store: &dyn LibraryStore,
    owner: Uuid,
    limit: i64,
) -> AppResult<Vec<BestMovie>> {
    store.best_movies(owner, limit).await
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
