use chrono::{Duration, NaiveDate};

/// Counts the consecutive days ending today or yesterday on which at least
/// one completed viewing is recorded.
///
/// Pure function of the date set and the evaluation date. Duplicate dates
/// (several entries watched on the same day) count once. A most recent date
/// older than yesterday means the streak is broken, regardless of history.
pub fn current_streak(watch_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut dates = watch_dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let Some(&anchor) = dates.last() else {
        return 0;
    };

    let yesterday = today - Duration::days(1);
    if anchor != today && anchor != yesterday {
        return 0;
    }

    // Walk backwards from the anchor; the anchor itself contributes 1.
    let mut streak = 1;
    let mut prev = anchor;

    for &date in dates.iter().rev().skip(1) {
        match (prev - date).num_days() {
            // Duplicates are collapsed above; skip rather than break if one
            // slips through.
            0 => continue,
            1 => {
                streak += 1;
                prev = date;
            }
            _ => break,
        }
    }

    streak
}
