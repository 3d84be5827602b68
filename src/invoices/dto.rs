use serde::Deserialize;
use time::Date;

use super::repo_types::InvoiceItem;
use crate::{error::ApiError, work_hours::dto::number_or_string};

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub invoice_number: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub other: Option<f64>,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub invoice_number: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
    pub items: Option<Vec<InvoiceItem>>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub other: Option<f64>,
    pub paid: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TogglePaidRequest {
    pub paid: bool,
}

fn check_items(items: &[InvoiceItem]) -> Result<(), ApiError> {
    if items.iter().any(|i| !i.amount.is_finite() || i.amount < 0.0) {
        return Err(ApiError::bad_request("Item amounts must be zero or more"));
    }
    Ok(())
}

fn check_other(other: f64) -> Result<(), ApiError> {
    if !other.is_finite() {
        return Err(ApiError::bad_request("Other must be a number"));
    }
    Ok(())
}

impl CreateInvoiceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_items(&self.items)?;
        check_other(self.other_amount())
    }

    /// Missing or blank `other` counts as zero.
    pub fn other_amount(&self) -> f64 {
        self.other.unwrap_or(0.0)
    }
}

impl UpdateInvoiceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(items) = &self.items {
            check_items(items)?;
        }
        if let Some(other) = self.other {
            check_other(other)?;
        }
        Ok(())
    }
}
