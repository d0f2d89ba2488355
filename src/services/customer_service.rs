use crate::entities::customer_entity as customers;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::CustomerFilter;
use crate::services::store::{bounded, is_unique_violation, next_update_stamp, store_now};
use crate::utils::{format_serial, next_sequence};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::time::Duration;

/// Attempts at inserting with a freshly derived serial before giving up.
const MAX_SERIAL_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct CustomerService {
    pool: DatabaseConnection,
    timeout: Duration,
}

impl CustomerService {
    pub fn new(pool: DatabaseConnection, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Filtered, paginated list ordered by creation time, newest first.
    pub async fn list_customers(&self, query: &CustomerQuery) -> AppResult<CustomerListResponse> {
        let filter = CustomerFilter::from_query(query)?;
        let params = PaginationParams::new(query.page, query.limit);
        let condition = filter.condition();

        #[derive(Debug, FromQueryResult)]
        struct CountRow {
            count: i64,
        }
        let count = bounded(
            self.timeout,
            customers::Entity::find()
                .filter(condition.clone())
                .select_only()
                .column_as(Expr::val(1).count(), "count")
                .into_model::<CountRow>()
                .one(&self.pool),
        );
        let page = bounded(
            self.timeout,
            customers::Entity::find()
                .filter(condition)
                .order_by_desc(customers::Column::CreatedAt)
                .order_by_desc(customers::Column::Id)
                .limit(params.get_limit())
                .offset(params.get_offset())
                .all(&self.pool),
        );
        let (count, models) = tokio::try_join!(count, page)?;
        let total = count.map(|r| r.count).unwrap_or(0);

        Ok(CustomerListResponse {
            customers: models.into_iter().map(CustomerResponse::from).collect(),
            total_count: total,
            current_page: params.page,
            total_pages: params.total_pages(total),
        })
    }

    /// All-digit ids match the numeric key or an identical serial; anything
    /// else is looked up as a serial only.
    pub async fn get_customer(&self, id: &str) -> AppResult<CustomerResponse> {
        let id = id.trim();
        let mut condition = Condition::any().add(customers::Column::SerialNumber.eq(id));
        if !id.is_empty()
            && id.bytes().all(|b| b.is_ascii_digit())
            && let Ok(key) = id.parse::<i32>()
        {
            condition = condition.add(customers::Column::Id.eq(key));
        }

        let model = bounded(
            self.timeout,
            customers::Entity::find()
                .filter(condition)
                .order_by_asc(customers::Column::Id)
                .one(&self.pool),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        Ok(CustomerResponse::from(model))
    }

    pub async fn create_customer(&self, payload: CustomerPayload) -> AppResult<CustomerResponse> {
        let model = self.insert_customer(payload).await?;
        log::info!(
            "Customer created: id={} serial={}",
            model.id,
            model.serial_number
        );
        Ok(CustomerResponse::from(model))
    }

    /// Single insertion path used by both the API and bulk import.
    ///
    /// The serial comes from a count read followed by an insert, so two
    /// concurrent creators can pick the same one; the loser hits the unique
    /// constraint, re-derives and tries again.
    pub async fn insert_customer(&self, payload: CustomerPayload) -> AppResult<customers::Model> {
        payload.validate()?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let serial = self.next_serial_number().await?;
            let now = store_now();

            let mut active = customers::ActiveModel {
                serial_number: Set(serial.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            apply_payload(&mut active, payload.clone());

            match bounded(self.timeout, active.insert(&self.pool)).await {
                Ok(model) => return Ok(model),
                Err(e) if is_unique_violation(&e) && attempt < MAX_SERIAL_ATTEMPTS => {
                    log::warn!("Serial {serial} already taken (attempt {attempt}), retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn next_serial_number(&self) -> AppResult<String> {
        #[derive(Debug, FromQueryResult)]
        struct SerialRow {
            total: i64,
            highest: Option<String>,
        }
        let row = bounded(
            self.timeout,
            customers::Entity::find()
                .select_only()
                .column_as(Expr::val(1).count(), "total")
                .column_as(Expr::col(customers::Column::SerialNumber).max(), "highest")
                .into_model::<SerialRow>()
                .one(&self.pool),
        )
        .await?;

        let (total, highest) = row
            .map(|r| (r.total.max(0) as u64, r.highest))
            .unwrap_or((0, None));
        Ok(format_serial(next_sequence(total, highest.as_deref())))
    }

    /// Full overwrite of every field except id, serial and `created_at`.
    pub async fn update_customer(
        &self,
        id: i32,
        payload: CustomerPayload,
    ) -> AppResult<CustomerResponse> {
        payload.validate()?;

        let existing = bounded(
            self.timeout,
            customers::Entity::find_by_id(id).one(&self.pool),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        let previous_update = existing.updated_at;
        let mut active = existing.into_active_model();
        apply_payload(&mut active, payload);
        active.updated_at = Set(next_update_stamp(previous_update, store_now()));

        let updated = bounded(self.timeout, active.update(&self.pool)).await?;
        log::info!("Customer updated: id={} serial={}", updated.id, updated.serial_number);
        Ok(CustomerResponse::from(updated))
    }

    pub async fn delete_customer(&self, id: i32) -> AppResult<()> {
        let result = bounded(
            self.timeout,
            customers::Entity::delete_by_id(id).exec(&self.pool),
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Customer not found".to_string()));
        }
        log::info!("Customer deleted: id={id}");
        Ok(())
    }
}

fn apply_payload(active: &mut customers::ActiveModel, p: CustomerPayload) {
    active.sales_person = Set(p.sales_person);
    active.support_person = Set(p.support_person);
    active.store_name = Set(p.store_name.trim().to_string());
    active.customer_email = Set(p.customer_email);
    active.customer_phone = Set(p.customer_phone);
    active.account_id = Set(p.account_id);
    active.outlet_id = Set(p.outlet_id);
    active.address_line = Set(p.address_line);
    active.city = Set(p.city);
    active.state = Set(p.state);
    active.country = Set(p.country);
    active.gstin = Set(p.gstin);
    active.signup_date = Set(p.signup_date);
    active.signup_pack = Set(p.signup_pack);
    active.current_plan = Set(p.current_plan);
    active.validity_till = Set(p.validity_till);
    active.next_renewal_on = Set(p.next_renewal_on);
    active.channel_partner = Set(p.channel_partner);
    active.status = Set(p.status);
    active.category = Set(p.category);
    active.product_name = Set(p.product_name);
    active.paid_pack_amount = Set(p.paid_pack_amount);
    active.paid_sms_amount = Set(p.paid_sms_amount);
    active.paid_wa_amount = Set(p.paid_wa_amount);
}
