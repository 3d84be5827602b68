use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub employee_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub week_label: String,
    #[serde(default)]
    pub is_paid: bool,
    pub gross_amount: Option<f64>,
    pub net_amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePaymentRequest {
    pub is_paid: Option<bool>,
    pub gross_amount: Option<f64>,
    pub net_amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub updated: usize,
    pub skipped: usize,
}

pub(crate) fn check_amount(value: Option<f64>, field: &str) -> Result<(), crate::error::ApiError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(crate::error::ApiError::bad_request(format!(
            "{field} must be zero or more"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_not_be_negative() {
        assert!(check_amount(None, "gross_amount").is_ok());
        assert!(check_amount(Some(0.0), "gross_amount").is_ok());
        assert!(check_amount(Some(-5.0), "gross_amount").is_err());
        assert!(check_amount(Some(f64::NAN), "net_amount").is_err());
    }
}
