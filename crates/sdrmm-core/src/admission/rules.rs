//! Individual admission rules
//!
//! Each rule returns `Err(Rejection)` on failure so the chain can use `?`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use super::Rejection;
use crate::config::Limits;
use crate::model::Difficulty;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn check_queue_open(queue_open: bool) -> Result<(), Rejection> {
    if queue_open {
        Ok(())
    } else {
        Err(Rejection::QueueClosed)
    }
}

pub fn check_not_banned(id: &str, banned: bool) -> Result<(), Rejection> {
    if banned {
        Err(Rejection::Banned { id: id.to_string() })
    } else {
        Ok(())
    }
}

/// Refuse maps uploaded before midnight UTC of the cutoff date
pub fn check_cutoff_date(
    uploaded_at: DateTime<Utc>,
    cutoff: Option<NaiveDate>,
) -> Result<(), Rejection> {
    let Some(cutoff) = cutoff else {
        return Ok(());
    };

    let cutoff_start = Utc.from_utc_datetime(&cutoff.and_time(NaiveTime::default()));
    if uploaded_at < cutoff_start {
        return Err(Rejection::TooOld {
            uploaded: uploaded_at.date_naive(),
            cutoff,
        });
    }
    Ok(())
}

/// Refuse maps younger than `min_age_days`, measured in fractional days
pub fn check_map_age(
    uploaded_at: DateTime<Utc>,
    now: DateTime<Utc>,
    min_age_days: u32,
) -> Result<(), Rejection> {
    if min_age_days == 0 {
        return Ok(());
    }

    let age_days = now.signed_duration_since(uploaded_at).num_seconds() as f64 / SECONDS_PER_DAY;
    if age_days < f64::from(min_age_days) {
        return Err(Rejection::TooNew {
            uploaded: uploaded_at.date_naive(),
            min_age_days,
        });
    }
    Ok(())
}

/// Inclusive duration bounds; a zero bound is not enforced
pub fn check_duration(duration_secs: u32, min_secs: u32, max_secs: u32) -> Result<(), Rejection> {
    if min_secs > 0 && duration_secs < min_secs {
        return Err(Rejection::TooShort {
            duration_secs,
            min_secs,
        });
    }
    if max_secs > 0 && duration_secs > max_secs {
        return Err(Rejection::TooLong {
            duration_secs,
            max_secs,
        });
    }
    Ok(())
}

/// True if the range is disabled (`max == 0`) or any value falls inside `[min, max]`
pub fn any_within(values: impl IntoIterator<Item = f64>, min: f64, max: f64) -> bool {
    if max == 0.0 {
        return true;
    }
    values.into_iter().any(|v| min <= v && v <= max)
}

/// NJS and NPS are judged independently; different difficulties may satisfy each
pub fn check_difficulty_ranges(
    difficulties: &[Difficulty],
    limits: &Limits,
) -> Result<(), Rejection> {
    if !any_within(
        difficulties.iter().map(|d| d.njs),
        limits.min_njs,
        limits.max_njs,
    ) {
        return Err(Rejection::OutOfNjsRange {
            min: limits.min_njs,
            max: limits.max_njs,
        });
    }

    if !any_within(
        difficulties.iter().map(|d| d.nps),
        limits.min_nps,
        limits.max_nps,
    ) {
        return Err(Rejection::OutOfNpsRange {
            min: limits.min_nps,
            max: limits.max_nps,
        });
    }

    Ok(())
}

/// Fires only when the count equals the limit exactly
pub fn check_request_limit(successful_requests: i64, limit: i64) -> Result<(), Rejection> {
    if limit > 0 && successful_requests == limit {
        return Err(Rejection::UserRequestLimitReached { limit });
    }
    Ok(())
}

/// Fires only when the count equals the limit exactly
pub fn check_queue_limit(requests_in_queue: i64, limit: i64) -> Result<(), Rejection> {
    if limit > 0 && requests_in_queue == limit {
        return Err(Rejection::UserQueueLimitReached { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration_bounds_inclusive() {
        assert!(check_duration(5, 5, 10).is_ok());
        assert!(check_duration(10, 5, 10).is_ok());
        assert_eq!(
            check_duration(4, 5, 10),
            Err(Rejection::TooShort {
                duration_secs: 4,
                min_secs: 5
            })
        );
        assert_eq!(
            check_duration(11, 5, 10),
            Err(Rejection::TooLong {
                duration_secs: 11,
                max_secs: 10
            })
        );
    }

    #[test]
    fn test_duration_disabled_bounds() {
        assert!(check_duration(0, 0, 0).is_ok());
        assert!(check_duration(u32::MAX, 0, 0).is_ok());
        assert!(check_duration(1, 0, 10).is_ok());
        assert!(check_duration(10_000, 60, 0).is_ok());
    }

    #[test]
    fn test_empty_difficulties_fail_enabled_ranges() {
        let limits = Limits {
            min_njs: 10.0,
            max_njs: 20.0,
            ..Limits::unrestricted()
        };
        assert_eq!(
            check_difficulty_ranges(&[], &limits),
            Err(Rejection::OutOfNjsRange {
                min: 10.0,
                max: 20.0
            })
        );

        let limits = Limits {
            max_nps: 8.0,
            ..Limits::unrestricted()
        };
        assert_eq!(
            check_difficulty_ranges(&[], &limits),
            Err(Rejection::OutOfNpsRange { min: 0.0, max: 8.0 })
        );
    }

    #[test]
    fn test_empty_difficulties_pass_disabled_ranges() {
        assert!(check_difficulty_ranges(&[], &Limits::unrestricted()).is_ok());
    }

    #[test]
    fn test_ranges_satisfied_by_different_difficulties() {
        let limits = Limits {
            min_njs: 18.0,
            max_njs: 22.0,
            min_nps: 2.0,
            max_nps: 4.0,
            ..Limits::unrestricted()
        };
        let diffs = vec![
            Difficulty::new("Easy", "Standard", 10.0, 3.0),
            Difficulty::new("ExpertPlus", "Standard", 20.0, 9.0),
        ];
        assert!(check_difficulty_ranges(&diffs, &limits).is_ok());
    }

    #[test]
    fn test_cutoff_date_is_inclusive_of_the_day() {
        let cutoff = NaiveDate::from_ymd_opt(2018, 5, 8);
        let midnight = Utc.with_ymd_and_hms(2018, 5, 8, 0, 0, 0).unwrap();
        assert!(check_cutoff_date(midnight, cutoff).is_ok());
        assert!(check_cutoff_date(midnight - Duration::seconds(1), cutoff).is_err());
        assert!(check_cutoff_date(midnight - Duration::days(400), None).is_ok());
    }

    #[test]
    fn test_map_age() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert!(check_map_age(now - Duration::days(7), now, 7).is_ok());
        assert!(check_map_age(now - Duration::hours(7 * 24 - 1), now, 7).is_err());
        assert!(check_map_age(now, now, 0).is_ok());
    }

    #[test]
    fn test_limits_zero_disables() {
        assert!(check_request_limit(0, 0).is_ok());
        assert!(check_request_limit(5, 0).is_ok());
        assert!(check_queue_limit(0, 0).is_ok());
    }
}
