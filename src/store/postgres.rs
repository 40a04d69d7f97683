use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{BestMovie, Collection, CollectionSummary, LibraryRow, WatchStatus},
};

use super::{LibraryStore, ViewingTotals};

/// PostgreSQL-backed implementation of [`LibraryStore`].
pub struct PgLibraryStore {
    pool: PgPool,
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LibraryStore for PgLibraryStore {
    async fn collection_for_owner(
        &self,
        collection_id: i32,
        owner: Uuid,
    ) -> AppResult<Option<Collection>> {
        let collection = sqlx::query_as::<_, Collection>(
            r#"
            SELECT id, user_id, name, description, is_auto, auto_rule, created_at, updated_at
            FROM collections
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(collection_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(collection)
    }

    async fn collections_for_owner(&self, owner: Uuid) -> AppResult<Vec<CollectionSummary>> {
        let collections = sqlx::query_as::<_, CollectionSummary>(
            r#"
            SELECT c.id, c.user_id, c.name, c.description, c.is_auto, c.auto_rule,
                   c.created_at, c.updated_at,
                   COUNT(cm.id) AS movie_count
            FROM collections c
            LEFT JOIN collection_movies cm ON cm.collection_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(collections)
    }

    async fn library_rows(&self, owner: Uuid) -> AppResult<Vec<LibraryRow>> {
        let rows = sqlx::query_as::<_, LibraryRow>(
            r#"
            SELECT um.id AS user_movie_id, um.status, um.rating, um.watch_date,
                   um.is_best_movie,
                   m.production_year, m.genre, m.director
            FROM user_movies um
            JOIN movies m ON m.id = um.movie_id
            WHERE um.user_id = $1
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn membership_ids(&self, collection_id: i32) -> AppResult<HashSet<i32>> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT user_movie_id FROM collection_movies WHERE collection_id = $1",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn apply_membership_diff(
        &self,
        collection_id: i32,
        additions: &[i32],
        removals: &[i32],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent syncs of the same collection. The lock is
        // released automatically at commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(i64::from(collection_id))
            .execute(&mut *tx)
            .await?;

        if !additions.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO collection_movies (collection_id, user_movie_id)
                SELECT $1, UNNEST($2::int4[])
                ON CONFLICT (collection_id, user_movie_id) DO NOTHING
                "#,
            )
            .bind(collection_id)
            .bind(additions)
            .execute(&mut *tx)
            .await?;
        }

        if !removals.is_empty() {
            sqlx::query(
                "DELETE FROM collection_movies WHERE collection_id = $1 AND user_movie_id = ANY($2)",
            )
            .bind(collection_id)
            .bind(removals)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn completed_watch_dates(&self, owner: Uuid) -> AppResult<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT watch_date
            FROM user_movies
            WHERE user_id = $1 AND status = $2 AND watch_date IS NOT NULL
            "#,
        )
        .bind(owner)
        .bind(WatchStatus::Completed)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    async fn viewing_totals(&self, owner: Uuid, year: i32) -> AppResult<ViewingTotals> {
        let total_watched: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_movies WHERE user_id = $1 AND status = $2")
                .bind(owner)
                .bind(WatchStatus::Completed)
                .fetch_one(&self.pool)
                .await?;

        let yearly_watched: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_movies
            WHERE user_id = $1 AND status = $2
              AND watch_date >= MAKE_DATE($3, 1, 1)
              AND watch_date < MAKE_DATE($3 + 1, 1, 1)
            "#,
        )
        .bind(owner)
        .bind(WatchStatus::Completed)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        let average_rating: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(rating)
            FROM user_movies
            WHERE user_id = $1 AND status = $2 AND rating IS NOT NULL
            "#,
        )
        .bind(owner)
        .bind(WatchStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        let total_runtime: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(m.runtime)
            FROM user_movies um
            JOIN movies m ON m.id = um.movie_id
            WHERE um.user_id = $1 AND um.status = $2
            "#,
        )
        .bind(owner)
        .bind(WatchStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(ViewingTotals {
            total_watched,
            yearly_watched,
            average_rating,
            total_runtime_minutes: total_runtime.unwrap_or(0),
        })
    }

    async fn yearly_goal(&self, owner: Uuid) -> AppResult<Option<i32>> {
        let goal: Option<Option<i32>> =
            sqlx::query_scalar("SELECT yearly_goal FROM users WHERE id = $1")
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;

        Ok(goal.flatten())
    }

    async fn best_movies(&self, owner: Uuid, limit: i64) -> AppResult<Vec<BestMovie>> {
        let movies = sqlx::query_as::<_, BestMovie>(
            r#"
            SELECT um.id AS user_movie_id, m.title_ko AS title, m.poster_url,
                   um.rating, m.production_year
            FROM user_movies um
            JOIN movies m ON m.id = um.movie_id
            WHERE um.user_id = $1 AND um.is_best_movie
            ORDER BY um.rating DESC NULLS LAST, um.watch_date DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }
}
