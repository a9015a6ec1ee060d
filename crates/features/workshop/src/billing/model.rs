use crate::error::WorkshopError;
use crate::input::{labor_cost, required_id};
use autoims_kernel::prelude::{NumberLike, PaymentStatus, api_model};
use chrono::NaiveDate;

#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct Bill {
    pub bill_id: i64,
    pub job_id: i64,
    pub labor_cost: f64,
    pub parts_cost: f64,
    pub total_amount: f64,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "Unpaid"))]
    pub payment_status: PaymentStatus,
    pub bill_date: NaiveDate,
}

/// A bill with its job, vehicle and customer.
#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct BillDetails {
    #[serde(flatten)]
    pub bill: Bill,
    pub job_status: Option<String>,
    pub service_type: Option<String>,
    pub plate_no: Option<String>,
    pub customer_name: Option<String>,
}

#[api_model(request)]
#[derive(Default)]
pub struct BillInput {
    pub job_id: Option<NumberLike>,
    /// Defaults to the labor cost recorded on the job
    pub labor_cost: Option<NumberLike>,
}

#[api_model(response)]
pub struct BillResponse {
    pub message: &'static str,
    pub bill: BillDetails,
}

#[api_model(response)]
pub struct BillList {
    pub message: &'static str,
    pub bills: Vec<BillDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewBill {
    pub job_id: i64,
    pub labor_cost: Option<f64>,
}

impl BillInput {
    /// # Errors
    ///
    /// "job_id is required" or a negative labor cost.
    pub fn into_new(self) -> Result<NewBill, WorkshopError> {
        Ok(NewBill {
            job_id: required_id(self.job_id.as_ref(), "job_id is required")?,
            labor_cost: labor_cost(self.labor_cost.as_ref())?,
        })
    }
}
