use crate::entities::{CustomerStatus, customer_entity};
use crate::error::{AppError, AppResult};
use crate::utils::{format_date, format_time};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /customers` and `PUT /customers/{id}`.
///
/// Identity, serial number and timestamps are never taken from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(default)]
    pub sales_person: Option<String>,
    #[serde(default)]
    pub support_person: Option<String>,
    #[schema(example = "Acme Stores")]
    pub store_name: String,
    #[serde(default)]
    #[schema(example = "owner@acme.test")]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub outlet_id: Option<String>,
    #[serde(default)]
    pub address_line: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    #[schema(value_type = Option<String>, example = "2024-03-05")]
    pub signup_date: Option<NaiveDate>,
    #[serde(default)]
    pub signup_pack: Option<String>,
    #[serde(default)]
    pub current_plan: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    #[schema(value_type = Option<String>, example = "2025-03-04")]
    pub validity_till: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::optional_date")]
    #[schema(value_type = Option<String>, example = "2025-03-05")]
    pub next_renewal_on: Option<NaiveDate>,
    #[serde(default)]
    pub channel_partner: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    #[schema(example = "Premium")]
    pub category: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    #[schema(value_type = Option<String>, example = "1499.00")]
    pub paid_pack_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    #[schema(value_type = Option<String>, example = "0.00")]
    pub paid_sms_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    #[schema(value_type = Option<String>, example = "0.00")]
    pub paid_wa_amount: Option<Decimal>,
}

impl CustomerPayload {
    pub fn validate(&self) -> AppResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Store name is required".to_string(),
            ));
        }

        for (label, amount) in [
            ("Paid pack amount", self.paid_pack_amount),
            ("Paid SMS amount", self.paid_sms_amount),
            ("Paid WhatsApp amount", self.paid_wa_amount),
        ] {
            if let Some(a) = amount {
                if a.is_sign_negative() && !a.is_zero() {
                    return Err(AppError::ValidationError(format!(
                        "{label} cannot be negative"
                    )));
                }
                // DECIMAL(10, 2)
                if a.trunc().abs() >= Decimal::from(100_000_000) {
                    return Err(AppError::ValidationError(format!("{label} is too large")));
                }
            }
        }

        Ok(())
    }
}

/// External shape of a stored customer row.
///
/// Column names are translated by the serde rename below, dates go through
/// the shared display formatter.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i32,
    #[schema(example = "CUS000001")]
    pub serial_number: String,
    pub sales_person: Option<String>,
    pub support_person: Option<String>,
    pub store_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub account_id: Option<String>,
    pub outlet_id: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub gstin: Option<String>,
    #[schema(example = "05 - MAR - 2024")]
    pub signup_date: Option<String>,
    pub signup_pack: Option<String>,
    pub current_plan: Option<String>,
    pub validity_till: Option<String>,
    pub next_renewal_on: Option<String>,
    pub channel_partner: Option<String>,
    pub status: CustomerStatus,
    pub category: Option<String>,
    pub product_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub paid_pack_amount: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub paid_sms_amount: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub paid_wa_amount: Option<Decimal>,
    #[schema(example = "14:03:27")]
    pub created_at: Option<String>,
}

impl From<customer_entity::Model> for CustomerResponse {
    fn from(m: customer_entity::Model) -> Self {
        Self {
            id: m.id,
            serial_number: m.serial_number,
            sales_person: m.sales_person,
            support_person: m.support_person,
            store_name: m.store_name,
            customer_email: m.customer_email,
            customer_phone: m.customer_phone,
            account_id: m.account_id,
            outlet_id: m.outlet_id,
            address_line: m.address_line,
            city: m.city,
            state: m.state,
            country: m.country,
            gstin: m.gstin,
            signup_date: format_date(m.signup_date),
            signup_pack: m.signup_pack,
            current_plan: m.current_plan,
            validity_till: format_date(m.validity_till),
            next_renewal_on: format_date(m.next_renewal_on),
            channel_partner: m.channel_partner,
            status: m.status,
            category: m.category,
            product_name: m.product_name,
            paid_pack_amount: m.paid_pack_amount,
            paid_sms_amount: m.paid_sms_amount,
            paid_wa_amount: m.paid_wa_amount,
            created_at: format_time(Some(m.created_at)),
        }
    }
}

/// Query string of `GET /customers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[schema(example = "Active")]
    pub status: Option<String>,
    #[schema(example = "Premium")]
    pub category: Option<String>,
    pub search: Option<String>,
    #[schema(example = "2024-01-01")]
    pub start_date: Option<String>,
    #[schema(example = "2024-12-31")]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerResponse>,
    pub total_count: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

mod de {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, de::Error};
    use serde_json::Value;
    use std::str::FromStr;

    /// `null`, `""` and missing all mean no date.
    pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => crate::utils::parse_date(&s).map_err(D::Error::custom),
            None => Ok(None),
        }
    }

    /// Accepts JSON numbers and numeric strings; blank means no amount.
    pub fn optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Decimal::from_str(s.trim())
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid amount: {s}"))),
            Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid amount: {n}"))),
            Some(other) => Err(D::Error::custom(format!("invalid amount: {other}"))),
        }
    }
}
