use crate::error::CustomersError;
use autoims_kernel::prelude::{api_model, trimmed};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

#[api_model(response)]
#[derive(Clone, PartialEq, Eq)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[api_model(request)]
/// Customer fields; all required on create, any subset on update
#[derive(Default)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Case-insensitive match on name, phone or email
    pub search: Option<String>,
}

#[api_model(response)]
pub struct CustomerResponse {
    pub message: &'static str,
    pub customer: Customer,
}

#[api_model(response)]
pub struct CustomerList {
    pub message: &'static str,
    pub customers: Vec<Customer>,
}

/// A customer that passed validation, every field trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

fn required(value: Option<&str>, message: &'static str) -> Result<String, CustomersError> {
    trimmed(value).ok_or(CustomersError::Validation { message: message.into() })
}

impl CustomerInput {
    /// Checks name, phone, email and address in that order.
    ///
    /// # Errors
    ///
    /// [`CustomersError::Validation`] naming the first missing field.
    pub fn into_new(self) -> Result<NewCustomer, CustomersError> {
        Ok(NewCustomer {
            name: required(self.name.as_deref(), "Name is required")?,
            phone: required(self.phone.as_deref(), "Phone is required")?,
            email: required(self.email.as_deref(), "Email is required")?,
            address: required(self.address.as_deref(), "Address is required")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_missing_field_is_reported() {
        let input = CustomerInput { name: Some("Ada".into()), email: Some("a@b.c".into()), ..Default::default() };
        assert_eq!(input.into_new().expect_err("phone").to_string(), "Phone is required");

        let input = CustomerInput::default();
        assert_eq!(input.into_new().expect_err("name").to_string(), "Name is required");
    }

    #[test]
    fn values_are_trimmed() {
        let input = CustomerInput {
            name: Some(" Ada ".into()),
            phone: Some(" 555-0100".into()),
            email: Some("ada@garage.test ".into()),
            address: Some("\t1 Main St".into()),
        };
        let customer = input.into_new().expect("valid");
        assert_eq!(customer.phone, "555-0100");
        assert_eq!(customer.address, "1 Main St");
    }
}
