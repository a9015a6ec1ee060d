use crate::error::WorkshopError;
use crate::input::{present, required_id};
use autoims_kernel::prelude::{NumberLike, api_model};

#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct JobPart {
    pub job_part_id: i64,
    pub job_id: i64,
    pub part_id: i64,
    pub quantity_used: i64,
    /// Unit price copied from the inventory when the part was used.
    pub unit_price_at_time: f64,
}

#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct JobPartDetails {
    #[serde(flatten)]
    pub usage: JobPart,
    pub part_name: String,
    pub part_code: String,
    pub brand: Option<String>,
}

#[api_model(request)]
#[derive(Default)]
pub struct JobPartInput {
    pub job_id: Option<NumberLike>,
    pub part_id: Option<NumberLike>,
    pub quantity_used: Option<NumberLike>,
}

#[api_model(response)]
pub struct JobPartResponse {
    pub message: &'static str,
    pub job_part: JobPartDetails,
}

#[api_model(response)]
pub struct JobPartList {
    pub message: &'static str,
    pub job_id: i64,
    pub parts: Vec<JobPartDetails>,
    pub total_cost: f64,
}

#[api_model(response)]
pub struct PartsTotal {
    pub message: &'static str,
    pub job_id: i64,
    pub total_parts_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewJobPart {
    pub job_id: i64,
    pub part_id: i64,
    pub quantity_used: i64,
}

impl JobPartInput {
    /// Presence of each field in order, then a positive whole quantity.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::Validation`] naming the problem.
    pub fn into_new(self) -> Result<NewJobPart, WorkshopError> {
        let job_id = required_id(self.job_id.as_ref(), "job_id is required")?;
        let part_id = required_id(self.part_id.as_ref(), "part_id is required")?;
        let quantity_used = present(self.quantity_used.as_ref())
            .ok_or_else(|| WorkshopError::invalid("quantity_used is required"))?
            .as_i64()
            .ok_or_else(|| WorkshopError::invalid("quantity_used must be an integer"))?;
        if quantity_used <= 0 {
            return Err(WorkshopError::invalid("quantity_used must be positive"));
        }
        Ok(NewJobPart { job_id, part_id, quantity_used })
    }
}
