use chrono::NaiveDate;

use super::WatchStatus;

/// Equality or inclusive-range constraint over a fractional value.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberRule {
    Exact(f64),
    Range { min: Option<f64>, max: Option<f64> },
}

impl NumberRule {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            // Ratings move in half-point steps, which are exact in binary
            // floating point, so direct equality is well-defined here.
            NumberRule::Exact(expected) => value == *expected,
            NumberRule::Range { min, max } => {
                min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
            }
        }
    }
}

/// Equality or inclusive-range constraint over a production year.
#[derive(Debug, Clone, PartialEq)]
pub enum YearRule {
    Exact(i32),
    Range { min: Option<i32>, max: Option<i32> },
}

impl YearRule {
    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearRule::Exact(expected) => year == *expected,
            YearRule::Range { min, max } => {
                min.map_or(true, |lo| year >= lo) && max.map_or(true, |hi| year <= hi)
            }
        }
    }
}

/// Inclusive calendar-date range, open on either end.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |lo| date >= lo) && self.max.map_or(true, |hi| date <= hi)
    }
}

/// One validated constraint of an auto-collection rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Status(WatchStatus),
    Rating(NumberRule),
    Year(YearRule),
    Genre(String),
    Director(String),
    BestMovie(bool),
    WatchDate(DateRange),
}

/// A validated auto-collection rule: the conjunction of its predicates.
///
/// Produced by the rule validator from the raw JSON document; downstream
/// code never re-inspects the untyped form.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoRule {
    pub predicates: Vec<Predicate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_range_is_inclusive() {
        let rule = NumberRule::Range {
            min: Some(4.0),
            max: Some(5.0),
        };
        assert!(rule.matches(4.0));
        assert!(rule.matches(5.0));
        assert!(!rule.matches(3.5));
    }

    #[test]
    fn test_number_range_open_ends() {
        let min_only = NumberRule::Range {
            min: Some(3.0),
            max: None,
        };
        assert!(min_only.matches(5.0));
        assert!(!min_only.matches(2.5));

        let max_only = NumberRule::Range {
            min: None,
            max: Some(3.0),
        };
        assert!(max_only.matches(0.0));
        assert!(!max_only.matches(3.5));
    }

    #[test]
    fn test_year_exact() {
        let rule = YearRule::Exact(2023);
        assert!(rule.matches(2023));
        assert!(!rule.matches(2022));
    }

    #[test]
    fn test_date_range_contains_bounds() {
        let range = DateRange {
            min: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            max: Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
        };
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }
}
