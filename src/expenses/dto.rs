use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    #[serde(alias = "contractId")]
    pub contract_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    #[serde(alias = "contractId")]
    pub contract_id: Option<Uuid>,
    pub date: Date,
    #[serde(alias = "expenseType")]
    pub expense_type: String,
    pub description: Option<String>,
    pub gross: f64,
    pub net: Option<f64>,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(alias = "contractId")]
    pub contract_id: Option<Uuid>,
    pub date: Option<Date>,
    #[serde(alias = "expenseType")]
    pub expense_type: Option<String>,
    pub description: Option<String>,
    pub gross: Option<f64>,
    pub net: Option<f64>,
    pub paid: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TogglePaidRequest {
    pub paid: bool,
}

fn check_money(value: f64, field: &str) -> Result<(), ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::bad_request(format!("{field} must be zero or more")));
    }
    Ok(())
}

impl CreateExpenseRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.expense_type.trim().is_empty() {
            return Err(ApiError::bad_request("Expense type is required"));
        }
        check_money(self.gross, "Gross")?;
        if let Some(net) = self.net {
            check_money(net, "Net")?;
        }
        Ok(())
    }
}

impl UpdateExpenseRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if matches!(self.expense_type.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(ApiError::bad_request("Expense type is required"));
        }
        if let Some(gross) = self.gross {
            check_money(gross, "Gross")?;
        }
        if let Some(net) = self.net {
            check_money(net, "Net")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_both_field_spellings() {
        let req: CreateExpenseRequest = serde_json::from_str(
            r#"{"contractId":"7b0c2a52-0d53-4c39-9a39-0e1f6f7a1e11","date":"2025-02-03",
                "expenseType":"Materials","gross":320.5}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.contract_id.is_some());
        assert!(!req.paid);
    }

    #[test]
    fn rejects_blank_type_and_negative_gross() {
        let req: CreateExpenseRequest =
            serde_json::from_str(r#"{"date":"2025-02-03","expense_type":" ","gross":10}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateExpenseRequest =
            serde_json::from_str(r#"{"date":"2025-02-03","expense_type":"Fuel","gross":-1}"#).unwrap();
        assert!(req.validate().is_err());

        let req = UpdateExpenseRequest {
            expense_type: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
