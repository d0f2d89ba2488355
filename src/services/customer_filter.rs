//! Translates the list query string into one predicate that feeds both the
//! count query and the page query.

use crate::entities::{CustomerStatus, customer_entity as customers};
use crate::error::{AppError, AppResult};
use crate::models::CustomerQuery;
use crate::utils::parse_date;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition};

/// Value meaning "no filter" for `status` and `category`.
const ALL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub status: Option<CustomerStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CustomerFilter {
    pub fn from_query(query: &CustomerQuery) -> AppResult<Self> {
        let status = match non_sentinel(query.status.as_deref()) {
            Some(s) => Some(s.parse::<CustomerStatus>().map_err(AppError::ValidationError)?),
            None => None,
        };

        let parse_bound = |value: Option<&str>, name: &str| -> AppResult<Option<NaiveDate>> {
            match value {
                Some(v) => parse_date(v)
                    .map_err(|e| AppError::ValidationError(format!("{name}: {e}"))),
                None => Ok(None),
            }
        };

        Ok(Self {
            status,
            category: non_sentinel(query.category.as_deref()).map(str::to_string),
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            start_date: parse_bound(query.start_date.as_deref(), "startDate")?,
            end_date: parse_bound(query.end_date.as_deref(), "endDate")?,
        })
    }

    /// AND of every supplied filter; an empty filter matches all rows.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(status) = self.status {
            cond = cond.add(customers::Column::Status.eq(status));
        }
        if let Some(category) = &self.category {
            cond = cond.add(customers::Column::Category.eq(category.clone()));
        }
        if let Some(term) = &self.search {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let contains_term = |column: customers::Column| {
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            cond = cond.add(
                Condition::any()
                    .add(contains_term(customers::Column::StoreName))
                    .add(contains_term(customers::Column::CustomerEmail))
                    .add(contains_term(customers::Column::AccountId)),
            );
        }
        if let Some(start) = self.start_date {
            cond = cond.add(customers::Column::SignupDate.gte(start));
        }
        if let Some(end) = self.end_date {
            cond = cond.add(customers::Column::SignupDate.lte(end));
        }

        cond
    }
}

fn non_sentinel(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

/// Search terms are literal text, not LIKE patterns.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn sql_for(filter: &CustomerFilter) -> String {
        customers::Entity::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string()
    }

    fn query() -> CustomerQuery {
        CustomerQuery::default()
    }

    #[test]
    fn test_sentinel_all_and_blank_values_are_skipped() {
        let filter = CustomerFilter::from_query(&CustomerQuery {
            status: Some("all".into()),
            category: Some("ALL".into()),
            search: Some("   ".into()),
            start_date: Some(String::new()),
            ..query()
        })
        .unwrap();

        assert_eq!(filter, CustomerFilter::default());
        // an empty AND renders as a bare `WHERE TRUE`
        let sql = sql_for(&filter);
        assert!(sql.ends_with("WHERE TRUE"), "{sql}");
        assert!(!sql.contains(" AND "), "{sql}");
        assert!(!sql.contains("LIKE"), "{sql}");
    }

    #[test]
    fn test_status_and_category_are_exact_matches() {
        let filter = CustomerFilter::from_query(&CustomerQuery {
            status: Some("Active".into()),
            category: Some("Premium".into()),
            ..query()
        })
        .unwrap();
        let sql = sql_for(&filter);

        assert!(sql.contains(r#""status" = 'Active'"#), "{sql}");
        assert!(sql.contains(r#""category" = 'Premium'"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let res = CustomerFilter::from_query(&CustomerQuery {
            status: Some("Paused".into()),
            ..query()
        });
        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_search_is_or_across_three_columns() {
        let filter = CustomerFilter::from_query(&CustomerQuery {
            search: Some(" AcMe ".into()),
            ..query()
        })
        .unwrap();
        assert_eq!(filter.search.as_deref(), Some("AcMe"));

        let sql = sql_for(&filter);
        assert!(sql.contains(r#"LOWER("store_name") LIKE"#), "{sql}");
        assert!(sql.contains(r#"LOWER("customer_email") LIKE"#), "{sql}");
        assert!(sql.contains(r#"LOWER("account_id") LIKE"#), "{sql}");
        assert!(sql.contains("%acme%"), "{sql}");
        assert_eq!(sql.matches(" OR ").count(), 2, "{sql}");
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = CustomerFilter::from_query(&CustomerQuery {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-12-31".into()),
            ..query()
        })
        .unwrap();
        let sql = sql_for(&filter);

        assert!(sql.contains(r#""signup_date" >= '2024-01-01'"#), "{sql}");
        assert!(sql.contains(r#""signup_date" <= '2024-12-31'"#), "{sql}");
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let res = CustomerFilter::from_query(&CustomerQuery {
            end_date: Some("yesterday".into()),
            ..query()
        });
        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
