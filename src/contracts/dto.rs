use serde::Deserialize;
use time::Date;

use super::repo_types::ContractStatus;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateContractRequest {
    pub contract_number: Option<String>,
    pub company: String,
    pub company_email: Option<String>,
    pub site_name: String,
    pub contract_value: f64,
    pub start_date: Date,
    pub finish_date: Date,
    pub status: Option<ContractStatus>,
    pub documents: Option<serde_json::Value>,
    pub comments: Option<serde_json::Value>,
}

impl CreateContractRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.company.trim().is_empty() {
            return Err(ApiError::bad_request("Company is required"));
        }
        if self.site_name.trim().is_empty() {
            return Err(ApiError::bad_request("Site name is required"));
        }
        if !self.contract_value.is_finite() || self.contract_value <= 0.0 {
            return Err(ApiError::bad_request("Contract value must be positive"));
        }
        check_dates(self.start_date, self.finish_date)
    }
}

/// Partial update. A body with only `status` is a status change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateContractRequest {
    pub company: Option<String>,
    pub company_email: Option<String>,
    pub site_name: Option<String>,
    pub contract_value: Option<f64>,
    pub start_date: Option<Date>,
    pub finish_date: Option<Date>,
    pub status: Option<ContractStatus>,
    pub documents: Option<serde_json::Value>,
    pub comments: Option<serde_json::Value>,
}

impl UpdateContractRequest {
    /// Dates missing from the body fall back to the stored ones, so a lone
    /// `finish_date` is still checked against the stored `start_date`.
    pub fn validate(&self, stored_start: Date, stored_finish: Date) -> Result<(), ApiError> {
        if let Some(v) = self.contract_value {
            if !v.is_finite() || v <= 0.0 {
                return Err(ApiError::bad_request("Contract value must be positive"));
            }
        }
        check_dates(
            self.start_date.unwrap_or(stored_start),
            self.finish_date.unwrap_or(stored_finish),
        )
    }
}

fn check_dates(start: Date, finish: Date) -> Result<(), ApiError> {
    if finish < start {
        return Err(ApiError::bad_request("Finish date must not be before start date"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn create(body: &str) -> CreateContractRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn valid_create() {
        let req = create(
            r#"{"company":"Acme Build","site_name":"Camden","contract_value":125000,
                "start_date":"2025-01-06","finish_date":"2025-06-30"}"#,
        );
        assert!(req.validate().is_ok());
        assert!(req.contract_number.is_none());
    }

    #[test]
    fn rejects_reversed_dates_and_bad_value() {
        let req = create(
            r#"{"company":"Acme","site_name":"Camden","contract_value":10,
                "start_date":"2025-06-30","finish_date":"2025-01-06"}"#,
        );
        assert!(req.validate().is_err());

        let req = create(
            r#"{"company":"Acme","site_name":"Camden","contract_value":0,
                "start_date":"2025-01-06","finish_date":"2025-01-06"}"#,
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn status_only_update() {
        let req: UpdateContractRequest = serde_json::from_str(r#"{"status":"Pezulluar"}"#).unwrap();
        assert_eq!(req.status, Some(ContractStatus::Suspended));
        assert!(req.validate(date!(2025 - 01 - 06), date!(2025 - 06 - 30)).is_ok());
    }

    #[test]
    fn partial_dates_are_checked_against_stored_ones() {
        let stored = (date!(2025 - 01 - 06), date!(2025 - 06 - 30));

        let req: UpdateContractRequest =
            serde_json::from_str(r#"{"finish_date":"2024-12-31"}"#).unwrap();
        assert!(req.validate(stored.0, stored.1).is_err());

        let req: UpdateContractRequest =
            serde_json::from_str(r#"{"start_date":"2025-07-01"}"#).unwrap();
        assert!(req.validate(stored.0, stored.1).is_err());

        let req: UpdateContractRequest =
            serde_json::from_str(r#"{"finish_date":"2025-09-30"}"#).unwrap();
        assert!(req.validate(stored.0, stored.1).is_ok());
    }
}
