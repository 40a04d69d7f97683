use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AutoRule, LibraryRow, Predicate},
    store::LibraryStore,
};

/// Whether one library entry satisfies a single predicate.
///
/// Genre and director match by case-sensitive substring containment against
/// the comma-joined field, so "액션" matches "액션,코미디". Entries with a
/// null value never match a predicate over that value.
fn predicate_matches(predicate: &Predicate, row: &LibraryRow) -> bool {
    match predicate {
        Predicate::Status(status) => row.status == *status,
        Predicate::Rating(rule) => row.rating.is_some_and(|r| rule.matches(r)),
        Predicate::Year(rule) => row.production_year.is_some_and(|y| rule.matches(y)),
        Predicate::Genre(needle) => row.genre.as_deref().is_some_and(|g| g.contains(needle)),
        Predicate::Director(needle) => {
            row.director.as_deref().is_some_and(|d| d.contains(needle))
        }
        Predicate::BestMovie(flag) => row.is_best_movie == *flag,
        Predicate::WatchDate(range) => row.watch_date.is_some_and(|d| range.contains(d)),
    }
}

/// Whether one library entry satisfies every predicate of the rule.
pub fn rule_matches(rule: &AutoRule, row: &LibraryRow) -> bool {
    rule.predicates.iter().all(|p| predicate_matches(p, row))
}

/// Materializes the set of library entry ids owned by `owner` that satisfy
/// the rule. Stateless: the same rule over the same library yields the same
/// set.
pub async fn evaluate(
    store: &dyn LibraryStore,
    owner: Uuid,
    rule: &AutoRule,
) -> AppResult<HashSet<i32>> {
    let rows = store.library_rows(owner).await?;

    Ok(rows
        .iter()
        .filter(|row| rule_matches(rule, row))
        .map(|row| row.user_movie_id)
        .collect())
}
