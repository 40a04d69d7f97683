use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{AutoRule, DateRange, NumberRule, Predicate, WatchStatus, YearRule};

/// Recognized rule fields, in validation order.
///
/// Validation walks this list rather than the document's own keys, so the
/// first reported violation is the same on every run.
pub const RULE_FIELDS: [&str; 7] = [
    "status",
    "rating",
    "year",
    "genre",
    "director",
    "is_best_movie",
    "watch_date",
];

/// Error types for rule validation
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("auto rule must be a JSON object")]
    NotAnObject,

    #[error("auto rule cannot be empty")]
    EmptyRule,

    #[error("unrecognized rule field: {0}")]
    UnknownField(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl RuleError {
    /// The offending field, when the error concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            RuleError::UnknownField(field) => Some(field),
            RuleError::InvalidField { field, .. } => Some(field),
            RuleError::NotAnObject | RuleError::EmptyRule => None,
        }
    }
}

/// Validates a raw predicate document and parses it into a typed rule.
///
/// Fails closed on the first violation: unknown fields are rejected before
/// any value is inspected, then each recognized field is checked in
/// [`RULE_FIELDS`] order. Absent fields impose no constraint.
pub fn validate_rule(document: &Value) -> Result<AutoRule, RuleError> {
    let map = document.as_object().ok_or(RuleError::NotAnObject)?;

    if map.is_empty() {
        return Err(RuleError::EmptyRule);
    }

    for key in map.keys() {
        if !RULE_FIELDS.contains(&key.as_str()) {
            return Err(RuleError::UnknownField(key.clone()));
        }
    }

    let mut predicates = Vec::new();

    for field in RULE_FIELDS {
        let Some(value) = map.get(field) else {
            continue;
        };

        let predicate = match field {
            "status" => Predicate::Status(parse_status(value)?),
            "rating" => Predicate::Rating(parse_rating(value)?),
            "year" => Predicate::Year(parse_year(value)?),
            "genre" => Predicate::Genre(parse_text("genre", value)?),
            "director" => Predicate::Director(parse_text("director", value)?),
            "is_best_movie" => Predicate::BestMovie(
                value
                    .as_bool()
                    .ok_or_else(|| invalid("is_best_movie", "must be a boolean"))?,
            ),
            "watch_date" => Predicate::WatchDate(parse_date_range(value)?),
            _ => unreachable!("field list and match arms are kept in sync"),
        };

        predicates.push(predicate);
    }

    Ok(AutoRule { predicates })
}

fn invalid(field: &'static str, reason: impl Into<String>) -> RuleError {
    RuleError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn parse_status(value: &Value) -> Result<WatchStatus, RuleError> {
    let s = value
        .as_str()
        .ok_or_else(|| invalid("status", "must be a string"))?;

    WatchStatus::parse(s).ok_or_else(|| {
        invalid(
            "status",
            format!("must be one of wishlist, watching, completed, got {s:?}"),
        )
    })
}

fn parse_rating(value: &Value) -> Result<NumberRule, RuleError> {
    match value {
        Value::Object(bounds) => {
            let min = number_bound("rating", bounds, "min", 0.0, 5.0)?;
            let max = number_bound("rating", bounds, "max", 0.0, 5.0)?;
            Ok(NumberRule::Range { min, max })
        }
        _ => {
            let n = value
                .as_f64()
                .ok_or_else(|| invalid("rating", "must be a number or a {min, max} object"))?;
            if !(0.0..=5.0).contains(&n) {
                return Err(invalid("rating", "must be between 0 and 5"));
            }
            Ok(NumberRule::Exact(n))
        }
    }
}

fn number_bound(
    field: &'static str,
    bounds: &Map<String, Value>,
    key: &str,
    lo: f64,
    hi: f64,
) -> Result<Option<f64>, RuleError> {
    let Some(value) = bounds.get(key) else {
        return Ok(None);
    };

    let n = value
        .as_f64()
        .ok_or_else(|| invalid(field, format!("{key} must be a number")))?;
    if n < lo || n > hi {
        return Err(invalid(field, format!("{key} must be between {lo} and {hi}")));
    }

    Ok(Some(n))
}

fn parse_year(value: &Value) -> Result<YearRule, RuleError> {
    match value {
        Value::Object(bounds) => {
            let min = year_bound(bounds, "min")?;
            let max = year_bound(bounds, "max")?;
            Ok(YearRule::Range { min, max })
        }
        _ => {
            let y = value
                .as_i64()
                .ok_or_else(|| invalid("year", "must be an integer or a {min, max} object"))?;
            if !(1900..=2100).contains(&y) {
                return Err(invalid("year", "must be between 1900 and 2100"));
            }
            Ok(YearRule::Exact(y as i32))
        }
    }
}

fn year_bound(bounds: &Map<String, Value>, key: &str) -> Result<Option<i32>, RuleError> {
    let Some(value) = bounds.get(key) else {
        return Ok(None);
    };

    let y = value
        .as_i64()
        .ok_or_else(|| invalid("year", format!("{key} must be an integer")))?;
    if !(1900..=2100).contains(&y) {
        return Err(invalid("year", format!("{key} must be between 1900 and 2100")));
    }

    Ok(Some(y as i32))
}

fn parse_text(field: &'static str, value: &Value) -> Result<String, RuleError> {
    let s = value
        .as_str()
        .ok_or_else(|| invalid(field, "must be a string"))?;
    if s.is_empty() {
        return Err(invalid(field, "cannot be empty"));
    }

    Ok(s.to_string())
}

fn parse_date_range(value: &Value) -> Result<DateRange, RuleError> {
    let bounds = value
        .as_object()
        .ok_or_else(|| invalid("watch_date", "must be a {min, max} object"))?;

    let min = date_bound(bounds, "min")?;
    let max = date_bound(bounds, "max")?;

    Ok(DateRange { min, max })
}

fn date_bound(bounds: &Map<String, Value>, key: &str) -> Result<Option<NaiveDate>, RuleError> {
    let Some(value) = bounds.get(key) else {
        return Ok(None);
    };

    let s = value
        .as_str()
        .ok_or_else(|| invalid("watch_date", format!("{key} must be a date string")))?;
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| invalid("watch_date", format!("{key} must be a YYYY-MM-DD date, got {s:?}")))?;

    Ok(Some(date))
}
