use crate::entities::{CustomerStatus, customer_entity as customers};
use crate::error::AppResult;
use crate::models::DashboardStats;
use crate::services::store::bounded;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QuerySelect,
};
use std::time::Duration;

#[derive(Clone)]
pub struct DashboardService {
    pool: DatabaseConnection,
    timeout: Duration,
}

/// The last full calendar month before `today`: `[first of previous month,
/// first of this month)`.
pub fn last_month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let this_month = today - ChronoDuration::days(today.day0() as i64);
    let last_day_prev = this_month - ChronoDuration::days(1);
    let prev_month = last_day_prev - ChronoDuration::days(last_day_prev.day0() as i64);
    (prev_month, this_month)
}

impl DashboardService {
    pub fn new(pool: DatabaseConnection, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        self.stats_as_of(Utc::now().date_naive()).await
    }

    /// Six independent counts; the windowed ones cover the month before `today`.
    pub async fn stats_as_of(&self, today: NaiveDate) -> AppResult<DashboardStats> {
        let (start, end) = last_month_window(today);
        let from: NaiveDateTime = start.and_time(NaiveTime::default());
        let until: NaiveDateTime = end.and_time(NaiveTime::default());

        let updated_in_window = || {
            Condition::all()
                .add(customers::Column::UpdatedAt.gte(from))
                .add(customers::Column::UpdatedAt.lt(until))
        };
        let any_paid = Condition::any()
            .add(customers::Column::PaidPackAmount.gt(Decimal::ZERO))
            .add(customers::Column::PaidSmsAmount.gt(Decimal::ZERO))
            .add(customers::Column::PaidWaAmount.gt(Decimal::ZERO));

        let (active, inactive, churn, new_sales, upsells, negative_churn) = tokio::try_join!(
            self.count_where(
                Condition::all().add(customers::Column::Status.eq(CustomerStatus::Active))
            ),
            self.count_where(
                Condition::all().add(customers::Column::Status.eq(CustomerStatus::Inactive))
            ),
            self.count_where(
                updated_in_window().add(customers::Column::Status.eq(CustomerStatus::Inactive))
            ),
            self.count_where(
                Condition::all()
                    .add(customers::Column::CreatedAt.gte(from))
                    .add(customers::Column::CreatedAt.lt(until))
            ),
            self.count_where(updated_in_window().add(any_paid)),
            self.count_where(
                updated_in_window().add(customers::Column::Status.eq(CustomerStatus::Active))
            ),
        )?;

        Ok(DashboardStats {
            active_customers: active,
            inactive_customers: inactive,
            churn_last_month: churn,
            new_sales_last_month: new_sales,
            new_upsells_last_month: upsells,
            negative_churn_last_month: negative_churn,
            period_start: start,
            period_end: end,
            trend_available: false,
        })
    }

    async fn count_where(&self, condition: Condition) -> AppResult<i64> {
        #[derive(Debug, FromQueryResult)]
        struct CountRow {
            count: i64,
        }
        let row = bounded(
            self.timeout,
            customers::Entity::find()
                .filter(condition)
                .select_only()
                .column_as(Expr::val(1).count(), "count")
                .into_model::<CountRow>()
                .one(&self.pool),
        )
        .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;
    use sea_orm::{ActiveModelTrait, Set};
    use std::str::FromStr;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    async fn seed(
        db: &DatabaseConnection,
        serial: &str,
        status: CustomerStatus,
        created: NaiveDateTime,
        updated: NaiveDateTime,
        pack: Option<&str>,
    ) {
        customers::ActiveModel {
            serial_number: Set(serial.to_string()),
            store_name: Set(format!("Store {serial}")),
            status: Set(status),
            paid_pack_amount: Set(pack.and_then(|p| Decimal::from_str(p).ok())),
            paid_sms_amount: Set(Some(Decimal::ZERO)),
            paid_wa_amount: Set(None),
            created_at: Set(created),
            updated_at: Set(updated),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[test]
    fn test_last_month_window() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(last_month_window(d(2026, 10, 19)), (d(2026, 9, 1), d(2026, 10, 1)));
        assert_eq!(last_month_window(d(2026, 10, 1)), (d(2026, 9, 1), d(2026, 10, 1)));
        assert_eq!(last_month_window(d(2025, 1, 15)), (d(2024, 12, 1), d(2025, 1, 1)));
        assert_eq!(last_month_window(d(2024, 3, 31)), (d(2024, 2, 1), d(2024, 3, 1)));
    }

    #[tokio::test]
    async fn test_stats_count_each_predicate_independently() {
        let db = memory_db().await;
        let svc = DashboardService::new(db.clone(), Duration::from_secs(5));

        // window for 2024-04-10 is March 2024
        let old = at(2024, 1, 5);
        let in_window = at(2024, 3, 15);
        let after = at(2024, 4, 2);

        // created long ago, churned in March
        seed(&db, "CUS000001", CustomerStatus::Inactive, old, in_window, None).await;
        // created in March, paid
        seed(&db, "CUS000002", CustomerStatus::Active, in_window, in_window, Some("10.00")).await;
        // old, touched in March without billing
        seed(&db, "CUS000003", CustomerStatus::Active, old, in_window, Some("0")).await;
        // untouched inactive
        seed(&db, "CUS000004", CustomerStatus::Inactive, old, old, None).await;
        // activity after the window does not count
        seed(&db, "CUS000005", CustomerStatus::Active, after, after, Some("99.00")).await;

        let stats = svc
            .stats_as_of(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(stats.active_customers, 3);
        assert_eq!(stats.inactive_customers, 2);
        assert_eq!(stats.churn_last_month, 1);
        assert_eq!(stats.new_sales_last_month, 1);
        assert_eq!(stats.new_upsells_last_month, 1);
        assert_eq!(stats.negative_churn_last_month, 2);
        assert_eq!(stats.period_start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(!stats.trend_available);
    }

    #[tokio::test]
    async fn test_empty_store_yields_zeroes() {
        let svc = DashboardService::new(memory_db().await, Duration::from_secs(5));
        let stats = svc.get_stats().await.unwrap();
        assert_eq!(stats.active_customers, 0);
        assert_eq!(stats.new_upsells_last_month, 0);
    }
}
