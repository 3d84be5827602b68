use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::services::InvoiceTotals;
use crate::work_hours::dto::number_or_string;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub shifts: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub rate: Option<f64>,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub contract_number: String,
    pub invoice_number: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
    pub items: Json<Vec<InvoiceItem>>,
    pub other: f64,
    pub paid: bool,
    pub created_at: OffsetDateTime,
}

/// Invoice as returned to clients, with its totals worked out.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: Uuid,
    pub contract_number: String,
    pub invoice_number: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub other: f64,
    pub paid: bool,
    #[serde(flatten)]
    pub totals: InvoiceTotals,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<InvoiceRow> for Invoice {
    fn from(r: InvoiceRow) -> Self {
        let items = r.items.0;
        let totals = InvoiceTotals::compute(&items, r.other);
        Self {
            id: r.id,
            contract_number: r.contract_number,
            invoice_number: r.invoice_number,
            date: r.date,
            description: r.description,
            items,
            other: r.other,
            paid: r.paid,
            totals,
            created_at: r.created_at,
        }
    }
}
