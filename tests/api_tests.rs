use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use cinelog_api::error::AppResult;
use cinelog_api::models::{BestMovie, Collection, CollectionSummary, LibraryRow, WatchStatus};
use cinelog_api::routes::{create_router, AppState};
use cinelog_api::store::{LibraryStore, ViewingTotals};

/// In-memory stand-in for the Postgres store, so routes can be exercised
/// end to end without a database.
#[derive(Default)]
struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: Vec<Collection>,
    library: HashMap<Uuid, Vec<LibraryRow>>,
    membership: HashMap<i32, HashSet<i32>>,
    yearly_goals: HashMap<Uuid, i32>,
    runtime_minutes: HashMap<Uuid, i64>,
    best: HashMap<Uuid, Vec<BestMovie>>,
}

#[async_trait::async_trait]
impl LibraryStore for InMemoryStore {
    async fn collection_for_owner(
        &self,
        collection_id: i32,
        owner: Uuid,
    ) -> AppResult<Option<Collection>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .collections
            .iter()
            .find(|c| c.id == collection_id && c.user_id == owner)
            .cloned())
    }

    async fn collections_for_owner(&self, owner: Uuid) -> AppResult<Vec<CollectionSummary>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .collections
            .iter()
            .filter(|c| c.user_id == owner)
            .map(|c| CollectionSummary {
                movie_count: inner
                    .membership
                    .get(&c.id)
                    .map_or(0, |ids| ids.len() as i64),
                collection: c.clone(),
            })
            .collect())
    }

    async fn library_rows(&self, owner: Uuid) -> AppResult<Vec<LibraryRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.library.get(&owner).cloned().unwrap_or_default())
    }

    async fn membership_ids(&self, collection_id: i32) -> AppResult<HashSet<i32>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.membership.get(&collection_id).cloned().unwrap_or_default())
    }

    async fn apply_membership_diff(
        &self,
        collection_id: i32,
        additions: &[i32],
        removals: &[i32],
    ) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let members = inner.membership.entry(collection_id).or_default();
        members.extend(additions.iter().copied());
        for id in removals {
            members.remove(id);
        }
        Ok(())
    }

    async fn completed_watch_dates(&self, owner: Uuid) -> AppResult<Vec<NaiveDate>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .library
            .get(&owner)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.status == WatchStatus::Completed)
                    .filter_map(|r| r.watch_date)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn viewing_totals(&self, owner: Uuid, year: i32) -> AppResult<ViewingTotals> {
        let inner = self.inner.lock().unwrap();
        let rows = inner.library.get(&owner).cloned().unwrap_or_default();
        let completed: Vec<&LibraryRow> = rows
            .iter()
            .filter(|r| r.status == WatchStatus::Completed)
            .collect();

        let rated: Vec<f64> = completed.iter().filter_map(|r| r.rating).collect();
        let average_rating = if rated.is_empty() {
            None
        } else {
            Some(rated.iter().sum::<f64>() / rated.len() as f64)
        };

        Ok(ViewingTotals {
            total_watched: completed.len() as i64,
            yearly_watched: completed
                .iter()
                .filter(|r| {
                    r.watch_date
                        .is_some_and(|d| chrono::Datelike::year(&d) == year)
                })
                .count() as i64,
            average_rating,
            total_runtime_minutes: inner.runtime_minutes.get(&owner).copied().unwrap_or(0),
        })
    }

    async fn yearly_goal(&self, owner: Uuid) -> AppResult<Option<i32>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.yearly_goals.get(&owner).copied())
    }

    async fn best_movies(&self, owner: Uuid, limit: i64) -> AppResult<Vec<BestMovie>> {
        let inner = self.inner.lock().unwrap();
        let mut movies = inner.best.get(&owner).cloned().unwrap_or_default();
        movies.truncate(limit as usize);
        Ok(movies)
    }
}

fn create_test_server(store: Arc<InMemoryStore>) -> TestServer {
    let app = create_router(AppState { store });
    TestServer::new(app).unwrap()
}

fn owner_header(owner: Uuid) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&owner.to_string()).unwrap(),
    )
}

fn auto_collection(id: i32, owner: Uuid, rule: serde_json::Value) -> Collection {
    Collection {
        id,
        user_id: owner,
        name: format!("collection-{id}"),
        description: None,
        is_auto: true,
        auto_rule: Some(rule),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn entry(
    id: i32,
    status: WatchStatus,
    rating: Option<f64>,
    watch_date: Option<NaiveDate>,
) -> LibraryRow {
    LibraryRow {
        user_movie_id: id,
        status,
        rating,
        watch_date,
        is_best_movie: false,
        production_year: Some(2022),
        genre: Some("드라마,코미디".to_string()),
        director: Some("봉준호".to_string()),
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(InMemoryStore::default()));
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_validate_rule_accepts_valid_document() {
    let server = create_test_server(Arc::new(InMemoryStore::default()));

    let response = server
        .post("/api/v1/collections/validate-rule")
        .json(&json!({
            "status": "completed",
            "rating": { "min": 4.0 },
            "genre": "드라마"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn test_validate_rule_rejects_unknown_field() {
    let server = create_test_server(Arc::new(InMemoryStore::default()));

    let response = server
        .post("/api/v1/collections/validate-rule")
        .json(&json!({ "foo": 1 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "foo");
}

#[tokio::test]
async fn test_validate_rule_rejects_out_of_range_rating() {
    let server = create_test_server(Arc::new(InMemoryStore::default()));

    let response = server
        .post("/api/v1/collections/validate-rule")
        .json(&json!({ "rating": { "min": 6.0 } }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "rating");
}

#[tokio::test]
async fn test_missing_identity_is_rejected() {
    let server = create_test_server(Arc::new(InMemoryStore::default()));

    let response = server.get("/api/v1/collections").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sync_flow_and_idempotence() {
    let owner = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::default());
    {
        let mut inner = store.inner.lock().unwrap();
        inner.collections.push(auto_collection(
            1,
            owner,
            json!({ "status": "completed", "rating": { "min": 4.0 } }),
        ));
        inner.library.insert(
            owner,
            vec![
                entry(1, WatchStatus::Completed, Some(4.5), None),
                entry(2, WatchStatus::Completed, Some(5.0), None),
                entry(3, WatchStatus::Completed, Some(3.5), None),
                entry(4, WatchStatus::Watching, Some(4.5), None),
                entry(5, WatchStatus::Wishlist, None, None),
            ],
        );
        // Stale membership: 3 no longer matches, 1 is missing.
        inner.membership.insert(1, HashSet::from([2, 3]));
    }

    let server = create_test_server(store.clone());
    let (name, value) = owner_header(owner);

    let response = server
        .post("/api/v1/collections/1/sync")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    let report: serde_json::Value = response.json();
    assert_eq!(report["added_count"], 1);
    assert_eq!(report["removed_count"], 1);
    assert_eq!(report["total_count"], 2);

    assert_eq!(
        store.membership_ids(1).await.unwrap(),
        HashSet::from([1, 2])
    );

    // Second sync with no library change is a no-op.
    let response = server
        .post("/api/v1/collections/1/sync")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let report: serde_json::Value = response.json();
    assert_eq!(report["added_count"], 0);
    assert_eq!(report["removed_count"], 0);
    assert_eq!(report["total_count"], 2);
}

#[tokio::test]
async fn test_sync_rejects_manual_collection() {
    let owner = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::default());
    {
        let mut inner = store.inner.lock().unwrap();
        let mut manual = auto_collection(5, owner, json!({}));
        manual.is_auto = false;
        manual.auto_rule = None;
        inner.collections.push(manual);
    }

    let server = create_test_server(store);
    let (name, value) = owner_header(owner);

    let response = server
        .post("/api/v1/collections/5/sync")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_unknown_collection() {
    let server = create_test_server(Arc::new(InMemoryStore::default()));
    let (name, value) = owner_header(Uuid::new_v4());

    let response = server
        .post("/api/v1/collections/99/sync")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sync_is_owner_scoped() {
    let owner = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::default());
    {
        let mut inner = store.inner.lock().unwrap();
        inner
            .collections
            .push(auto_collection(1, owner, json!({ "status": "completed" })));
    }

    let server = create_test_server(store);
    let (name, value) = owner_header(Uuid::new_v4());

    // Another user cannot sync someone else's collection.
    let response = server
        .post("/api/v1/collections/1/sync")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_list_includes_counts() {
    let owner = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::default());
    {
        let mut inner = store.inner.lock().unwrap();
        inner
            .collections
            .push(auto_collection(1, owner, json!({ "genre": "드라마" })));
        inner.membership.insert(1, HashSet::from([10, 11, 12]));
    }

    let server = create_test_server(store);
    let (name, value) = owner_header(owner);

    let response = server
        .get("/api/v1/collections")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["collections"][0]["movie_count"], 3);
}

#[tokio::test]
async fn test_stats_include_current_streak() {
    let owner = Uuid::new_v4();
    let today = Utc::now().date_naive();
    let store = Arc::new(InMemoryStore::default());
    {
        let mut inner = store.inner.lock().unwrap();
        inner.library.insert(
            owner,
            vec![
                entry(1, WatchStatus::Completed, Some(4.0), Some(today)),
                entry(
                    2,
                    WatchStatus::Completed,
                    Some(5.0),
                    Some(today - Duration::days(1)),
                ),
                // An old watch does not extend the current streak.
                entry(
                    3,
                    WatchStatus::Completed,
                    None,
                    Some(today - Duration::days(10)),
                ),
            ],
        );
        inner.yearly_goals.insert(owner, 50);
        inner.runtime_minutes.insert(owner, 360);
    }

    let server = create_test_server(store);
    let (name, value) = owner_header(owner);

    let response = server.get("/api/v1/stats").add_header(name, value).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_watched"], 3);
    assert_eq!(body["yearly_goal"], 50);
    assert_eq!(body["current_streak"], 2);
    assert_eq!(body["average_rating"], 4.5);
    assert_eq!(body["total_watch_time_minutes"], 360);
    assert_eq!(body["total_watch_time_hours"], 6.0);
}

#[tokio::test]
async fn test_best_movies_endpoint() {
    let owner = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::default());
    {
        let mut inner = store.inner.lock().unwrap();
        inner.best.insert(
            owner,
            vec![BestMovie {
                user_movie_id: 1,
                title: "기생충".to_string(),
                poster_url: None,
                rating: Some(5.0),
                production_year: Some(2019),
            }],
        );
    }

    let server = create_test_server(store);
    let (name, value) = owner_header(owner);

    let response = server
        .get("/api/v1/stats/best-movies")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["best_movies"][0]["title"], "기생충");
}
