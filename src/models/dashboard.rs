use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Point-in-time counts for the dashboard.
///
/// No history is kept, so trend series are reported as unavailable instead of
/// being made up.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_customers: i64,
    pub inactive_customers: i64,
    pub churn_last_month: i64,
    pub new_sales_last_month: i64,
    pub new_upsells_last_month: i64,
    pub negative_churn_last_month: i64,
    /// First day of the reporting window (inclusive).
    #[schema(value_type = String, example = "2026-09-01")]
    pub period_start: NaiveDate,
    /// First day after the reporting window (exclusive).
    #[schema(value_type = String, example = "2026-10-01")]
    pub period_end: NaiveDate,
    pub trend_available: bool,
}
