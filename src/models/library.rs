use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Viewing status of a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "watch_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    Wishlist,
    Watching,
    Completed,
}

impl WatchStatus {
    /// Parses the lowercase wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wishlist" => Some(WatchStatus::Wishlist),
            "watching" => Some(WatchStatus::Watching),
            "completed" => Some(WatchStatus::Completed),
            _ => None,
        }
    }
}

/// One owner's library entry joined with its catalog metadata.
///
/// This is the projection the rule evaluator matches against: the per-user
/// fields come from the library entry, the production year and the
/// comma-joined genre/director fields from the shared movie record.
#[derive(Debug, Clone, FromRow)]
pub struct LibraryRow {
    pub user_movie_id: i32,
    pub status: WatchStatus,
    pub rating: Option<f64>,
    pub watch_date: Option<NaiveDate>,
    pub is_best_movie: bool,
    pub production_year: Option<i32>,
    pub genre: Option<String>,
    pub director: Option<String>,
}

/// A best-flagged library entry with display metadata.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BestMovie {
    pub user_movie_id: i32,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
    pub production_year: Option<i32>,
}
