use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    store::LibraryStore,
};

use super::{rule_evaluator, rule_validator};

/// Outcome of one reconciliation pass over an automatic collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub added_count: usize,
    pub removed_count: usize,
    pub total_count: usize,
}

/// Splits target vs. current membership into the minimal correcting write.
///
/// Returned ids are sorted so the write order (and any logging of it) is
/// deterministic.
fn membership_diff(target: &HashSet<i32>, current: &HashSet<i32>) -> (Vec<i32>, Vec<i32>) {
    let mut additions: Vec<i32> = target.difference(current).copied().collect();
    let mut removals: Vec<i32> = current.difference(target).copied().collect();
    additions.sort_unstable();
    removals.sort_unstable();

    (additions, removals)
}

/// Reconciles an automatic collection's membership with its rule.
///
/// Loads the collection scoped to the owner, validates its rule, evaluates
/// the rule into a target set, diffs against current membership, and applies
/// the correction in a single transaction. A second call with no intervening
/// library change reports zero additions and removals.
pub async fn sync_collection(
    store: &dyn LibraryStore,
    collection_id: i32,
    owner: Uuid,
) -> AppResult<SyncReport> {
    let collection = store
        .collection_for_owner(collection_id, owner)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection not found: {collection_id}")))?;

    if !collection.is_auto {
        return Err(AppError::InvalidState(format!(
            "Collection is not automatic: {collection_id}"
        )));
    }

    let Some(document) = collection.auto_rule.as_ref() else {
        return Err(AppError::InvalidState(format!(
            "Collection has no auto rule: {collection_id}"
        )));
    };

    let rule = rule_validator::validate_rule(document)?;

    let target = rule_evaluator::evaluate(store, owner, &rule).await?;
    let current = store.membership_ids(collection_id).await?;

    let (additions, removals) = membership_diff(&target, &current);

    if !additions.is_empty() || !removals.is_empty() {
        store
            .apply_membership_diff(collection_id, &additions, &removals)
            .await?;
    }

    tracing::info!(
        collection_id,
        added = additions.len(),
        removed = removals.len(),
        total = target.len(),
        "Collection synchronized"
    );

    Ok(SyncReport {
        added_count: additions.len(),
        removed_count: removals.len(),
        total_count: target.len(),
    })
}
