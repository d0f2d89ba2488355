//! Helpers shared by every service that talks to the database.

use crate::error::{AppError, AppResult};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use sea_orm::{DbErr, SqlErr};
use std::future::Future;
use std::time::Duration;

/// Runs one store call under `limit`; running out of time is reported as
/// [`AppError::StoreTimeout`] rather than as a database error.
pub async fn bounded<T, F>(limit: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::StoreTimeout(limit)),
    }
}

pub fn is_unique_violation(err: &AppError) -> bool {
    match err {
        AppError::DatabaseError(db_err) => {
            matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        }
        _ => false,
    }
}

/// Current UTC time at the precision a `TIMESTAMP` column keeps.
pub fn store_now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

/// `updated_at` for a write happening at `now`: strictly after `previous`
/// even if the clock has not moved or went backwards.
pub fn next_update_stamp(previous: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_bounded_passes_results_through() {
        let ok = bounded(Duration::from_secs(1), async { Ok::<_, DbErr>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = bounded(Duration::from_secs(1), async {
            Err::<i32, _>(DbErr::Custom("down".into()))
        })
        .await;
        assert!(matches!(err, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_bounded_reports_timeout() {
        let res = bounded(
            Duration::from_millis(10),
            std::future::pending::<Result<(), DbErr>>(),
        )
        .await;
        assert!(matches!(res, Err(AppError::StoreTimeout(_))));
    }

    #[test]
    fn test_next_update_stamp_always_advances() {
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let later = t + chrono::Duration::seconds(5);

        assert_eq!(next_update_stamp(t, later), later);
        assert!(next_update_stamp(t, t) > t);
        assert!(next_update_stamp(later, t) > later);
    }

    #[test]
    fn test_custom_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&AppError::DatabaseError(DbErr::Custom(
            "x".into()
        ))));
        assert!(!is_unique_violation(&AppError::NotFound("x".into())));
    }
}
