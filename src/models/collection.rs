use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A user-owned collection of library entries.
///
/// Manual collections are curated by hand; automatic collections carry a
/// predicate rule in `auto_rule` and have their membership maintained by the
/// sync engine. A manual collection is never evaluated by the rule engine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_auto: bool,
    /// Raw predicate document. Validated and parsed before every evaluation.
    pub auto_rule: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A collection together with its current membership count, as returned by
/// the collection list endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectionSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub collection: Collection,
    pub movie_count: i64,
}
