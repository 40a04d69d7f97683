use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{auth::OwnerId, request_id::RequestId},
    models::{Collection, CollectionSummary},
    services::{collection_sync, collection_sync::SyncReport, rule_validator},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CollectionListResponse {
    pub total: usize,
    pub collections: Vec<CollectionSummary>,
}

/// Handler for the collection list endpoint
pub async fn list(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<CollectionListResponse>> {
    let collections = state.store.collections_for_owner(owner).await?;

    Ok(Json(CollectionListResponse {
        total: collections.len(),
        collections,
    }))
}

/// Handler for the collection detail endpoint
pub async fn detail(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Path(collection_id): Path<i32>,
) -> AppResult<Json<Collection>> {
    let collection = state
        .store
        .collection_for_owner(collection_id, owner)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection not found: {collection_id}")))?;

    Ok(Json(collection))
}

/// Handler for auto-rule validation
///
/// Accepts a raw predicate document and reports whether it parses against
/// the rule schema. Rejections carry the offending field.
pub async fn validate_rule(Json(document): Json<Value>) -> AppResult<Json<Value>> {
    rule_validator::validate_rule(&document)?;

    Ok(Json(json!({ "valid": true })))
}

/// Handler for automatic collection synchronization
pub async fn sync(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    OwnerId(owner): OwnerId,
    Path(collection_id): Path<i32>,
) -> AppResult<Json<SyncReport>> {
    tracing::info!(
        request_id = %request_id,
        collection_id,
        "Processing collection sync request"
    );

    let report = collection_sync::sync_collection(state.store.as_ref(), collection_id, owner).await?;

    Ok(Json(report))
}
