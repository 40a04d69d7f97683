use std::collections::HashSet;

use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{BestMovie, Collection, CollectionSummary, LibraryRow},
};

pub mod postgres;

pub use postgres::PgLibraryStore;

/// Aggregate viewing totals for one owner.
#[derive(Debug, Clone, Default)]
pub struct ViewingTotals {
    pub total_watched: i64,
    pub yearly_watched: i64,
    pub average_rating: Option<f64>,
    pub total_runtime_minutes: i64,
}

/// Persistence seam for library, collection, and membership data.
///
/// All reads are scoped to the requesting owner where an owner id is taken.
/// Keeping this behind a trait lets the services run against a mock or an
/// in-memory double in tests, the same way external data providers are
/// pluggable elsewhere in the stack.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    /// Fetch one collection, if it exists and belongs to the owner.
    async fn collection_for_owner(
        &self,
        collection_id: i32,
        owner: Uuid,
    ) -> AppResult<Option<Collection>>;

    /// All collections of the owner with their membership counts, newest first.
    async fn collections_for_owner(&self, owner: Uuid) -> AppResult<Vec<CollectionSummary>>;

    /// The owner's full library joined with catalog metadata.
    async fn library_rows(&self, owner: Uuid) -> AppResult<Vec<LibraryRow>>;

    /// Current membership of a collection, as library entry ids.
    async fn membership_ids(&self, collection_id: i32) -> AppResult<HashSet<i32>>;

    /// Applies a membership correction in a single transaction.
    ///
    /// Inserts one membership row per addition and bulk-deletes the removals;
    /// either both take effect or neither does. Concurrent corrections of the
    /// same collection are serialized inside the transaction.
    async fn apply_membership_diff(
        &self,
        collection_id: i32,
        additions: &[i32],
        removals: &[i32],
    ) -> AppResult<()>;

    /// Watch dates of the owner's completed entries, nulls excluded.
    /// May contain duplicates when several entries share a date.
    async fn completed_watch_dates(&self, owner: Uuid) -> AppResult<Vec<NaiveDate>>;

    /// Viewing totals for the stats endpoint, with the yearly count taken
    /// over the given calendar year.
    async fn viewing_totals(&self, owner: Uuid, year: i32) -> AppResult<ViewingTotals>;

    /// The owner's configured yearly viewing goal, if any.
    async fn yearly_goal(&self, owner: Uuid) -> AppResult<Option<i32>>;

    /// Best-flagged entries, highest rated first.
    async fn best_movies(&self, owner: Uuid, limit: i64) -> AppResult<Vec<BestMovie>>;
}
