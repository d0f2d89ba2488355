//! Spreadsheet import and export of customer rows.
//!
//! Both directions share one column table so the export headers are always
//! a superset of what import understands.

use crate::entities::{CustomerStatus, customer_entity as customers};
use crate::error::{AppError, AppResult};
use crate::models::{CustomerPayload, ImportSummary};
use crate::services::CustomerService;
use crate::services::store::bounded;
use crate::utils::{format_date, format_time};
use crate::utils::spreadsheet::{
    Cell, SheetRow, cell_date, cell_decimal, cell_text, read_first_sheet, write_sheet,
};
use calamine::Data;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::time::Duration;

pub const SHEET_NAME: &str = "Customers";
pub const SERIAL_HEADER: &str = "Serial Number";
pub const CREATED_AT_HEADER: &str = "Created At";

type ReadCell = fn(&mut CustomerPayload, &Data) -> Result<(), String>;
type WriteCell = fn(&customers::Model) -> Cell;

struct SheetColumn {
    header: &'static str,
    read: ReadCell,
    write: WriteCell,
}

macro_rules! text_column {
    ($header:expr, $field:ident) => {
        SheetColumn {
            header: $header,
            read: |p, cell| {
                p.$field = Some(cell_text(cell).unwrap_or_default());
                Ok(())
            },
            write: |m| Cell::from(m.$field.clone()),
        }
    };
}

macro_rules! date_column {
    ($header:expr, $field:ident) => {
        SheetColumn {
            header: $header,
            read: |p, cell| {
                p.$field = cell_date(cell)?;
                Ok(())
            },
            write: |m| Cell::from(format_date(m.$field)),
        }
    };
}

macro_rules! amount_column {
    ($header:expr, $field:ident) => {
        SheetColumn {
            header: $header,
            read: |p, cell| {
                p.$field = Some(cell_decimal(cell)?.unwrap_or(Decimal::ZERO));
                Ok(())
            },
            write: |m| amount_cell(m.$field),
        }
    };
}

fn amount_cell(amount: Option<Decimal>) -> Cell {
    amount
        .and_then(|a| a.to_f64())
        .map(Cell::Number)
        .unwrap_or(Cell::Empty)
}

/// Import columns in export order.
fn columns() -> Vec<SheetColumn> {
    vec![
        text_column!("Sales Person", sales_person),
        text_column!("Support Person", support_person),
        SheetColumn {
            header: "Store Name",
            read: |p, cell| {
                p.store_name = cell_text(cell).unwrap_or_default();
                Ok(())
            },
            write: |m| Cell::Text(m.store_name.clone()),
        },
        text_column!("Customer Email", customer_email),
        text_column!("Customer Phone", customer_phone),
        text_column!("Account ID", account_id),
        text_column!("Outlet ID", outlet_id),
        text_column!("Address Line", address_line),
        text_column!("City", city),
        text_column!("State", state),
        text_column!("Country", country),
        text_column!("GSTIN", gstin),
        date_column!("Signup Date", signup_date),
        text_column!("Signup Pack", signup_pack),
        text_column!("Current Plan", current_plan),
        date_column!("Validity Till", validity_till),
        date_column!("Next Renewal On", next_renewal_on),
        text_column!("Channel Partner", channel_partner),
        SheetColumn {
            header: "Status",
            read: |p, cell| {
                p.status = match cell_text(cell) {
                    Some(s) => s.parse::<CustomerStatus>()?,
                    None => CustomerStatus::default(),
                };
                Ok(())
            },
            write: |m| Cell::Text(m.status.to_string()),
        },
        text_column!("Category", category),
        text_column!("Product Name", product_name),
        amount_column!("Paid Pack Amount", paid_pack_amount),
        amount_column!("Paid SMS Amount", paid_sms_amount),
        amount_column!("Paid WA Amount", paid_wa_amount),
    ]
}

/// Every header an exported sheet carries, in column order.
pub fn export_headers() -> Vec<&'static str> {
    let mut headers = vec![SERIAL_HEADER];
    headers.extend(columns().iter().map(|c| c.header));
    headers.push(CREATED_AT_HEADER);
    headers
}

fn row_to_payload(row: &SheetRow, columns: &[SheetColumn]) -> Result<CustomerPayload, String> {
    let mut payload = CustomerPayload::default();
    for column in columns {
        let cell = row.get(column.header).unwrap_or(&Data::Empty);
        (column.read)(&mut payload, cell).map_err(|e| format!("{}: {e}", column.header))?;
    }
    Ok(payload)
}

fn model_to_row(model: &customers::Model, columns: &[SheetColumn]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(columns.len() + 2);
    cells.push(Cell::Text(model.serial_number.clone()));
    cells.extend(columns.iter().map(|c| (c.write)(model)));
    cells.push(Cell::from(format_time(Some(model.created_at))));
    cells
}

fn rejection_reason(err: &AppError) -> String {
    match err {
        AppError::ValidationError(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct BulkTransferService {
    pool: DatabaseConnection,
    timeout: Duration,
    customers: CustomerService,
}

impl BulkTransferService {
    pub fn new(pool: DatabaseConnection, timeout: Duration) -> Self {
        let customers = CustomerService::new(pool.clone(), timeout);
        Self {
            pool,
            timeout,
            customers,
        }
    }

    /// Inserts every data row of the first sheet, one at a time, through the
    /// same path as a single create. A bad row is reported and skipped.
    pub async fn import_customers(&self, bytes: &[u8]) -> AppResult<ImportSummary> {
        let rows = read_first_sheet(bytes)?;
        let columns = columns();

        let mut imported = 0;
        let mut errors = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            // data rows count from 1, the header is not numbered
            let row_number = index + 1;
            let payload = match row_to_payload(row, &columns) {
                Ok(payload) => payload,
                Err(reason) => {
                    errors.push(format!("Row {row_number}: {reason}"));
                    continue;
                }
            };
            match self.customers.insert_customer(payload).await {
                Ok(_) => imported += 1,
                Err(e) => errors.push(format!("Row {row_number}: {}", rejection_reason(&e))),
            }
        }

        log::info!(
            "Customer import finished: imported={} rejected={}",
            imported,
            errors.len()
        );
        Ok(ImportSummary::new(imported, errors))
    }

    /// Workbook bytes holding every customer, newest first.
    pub async fn export_customers(&self) -> AppResult<Vec<u8>> {
        let models = bounded(
            self.timeout,
            customers::Entity::find()
                .order_by_desc(customers::Column::CreatedAt)
                .order_by_desc(customers::Column::Id)
                .all(&self.pool),
        )
        .await?;

        let columns = columns();
        let rows: Vec<Vec<Cell>> = models.iter().map(|m| model_to_row(m, &columns)).collect();
        let bytes = write_sheet(SHEET_NAME, &export_headers(), &rows)?;
        log::info!("Customer export built: rows={}", rows.len());
        Ok(bytes)
    }
}
