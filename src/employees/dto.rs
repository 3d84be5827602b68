use serde::Deserialize;

use crate::{error::ApiError, payroll::LabelType};

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub label_type: LabelType,
    #[serde(default)]
    pub workplace: Vec<String>,
    pub status: Option<String>,
}

impl CreateEmployeeRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ApiError::bad_request("First and last name are required"));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(ApiError::bad_request("Hourly rate must be zero or more"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hourly_rate: Option<f64>,
    pub label_type: Option<LabelType>,
    pub workplace: Option<Vec<String>>,
    pub status: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if [&self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .any(|n| n.trim().is_empty())
        {
            return Err(ApiError::bad_request("Name cannot be empty"));
        }
        if let Some(rate) = self.hourly_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ApiError::bad_request("Hourly rate must be zero or more"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_to_utr() {
        let req: CreateEmployeeRequest =
            serde_json::from_str(r#"{"first_name":"A","last_name":"B","hourly_rate":12}"#).unwrap();
        assert_eq!(req.label_type, LabelType::Utr);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_negative_rate_and_blank_names() {
        let req: CreateEmployeeRequest =
            serde_json::from_str(r#"{"first_name":" ","last_name":"B"}"#).unwrap();
        assert!(req.validate().is_err());

        let upd = UpdateEmployeeRequest { hourly_rate: Some(-1.0), ..Default::default() };
        assert!(upd.validate().is_err());
        assert!(UpdateEmployeeRequest::default().validate().is_ok());
    }
}
