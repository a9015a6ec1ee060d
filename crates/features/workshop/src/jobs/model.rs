use crate::error::WorkshopError;
use crate::input::{labor_cost, present, required_id};
use autoims_kernel::prelude::{JobStatus, NumberLike, api_model, trimmed};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct ServiceJob {
    pub job_id: i64,
    pub request_id: i64,
    pub assigned_employee: Option<i64>,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "Pending"))]
    pub job_status: JobStatus,
    pub labor_cost: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ServiceJob {
    /// Start and end times after moving to `status` at `now`.
    ///
    /// Starting keeps an earlier start; completing always stamps the end and
    /// fills a missing start.
    #[must_use]
    pub fn stamps_for(
        &self,
        status: JobStatus,
        now: DateTime<Utc>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match status {
            JobStatus::Pending => (self.start_time, self.end_time),
            JobStatus::InProgress => (self.start_time.or(Some(now)), self.end_time),
            JobStatus::Completed => (self.start_time.or(Some(now)), Some(now)),
        }
    }
}

#[api_model(response)]
/// A job with its request and vehicle
#[derive(Clone, PartialEq)]
pub struct JobDetails {
    #[serde(flatten)]
    pub job: ServiceJob,
    pub service_type: Option<String>,
    pub request_status: Option<String>,
    pub plate_no: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub employee_name: Option<String>,
}

#[api_model(request)]
#[derive(Default)]
pub struct JobInput {
    pub request_id: Option<NumberLike>,
    pub assigned_employee: Option<NumberLike>,
    pub labor_cost: Option<NumberLike>,
    pub notes: Option<String>,
}

#[api_model(request)]
pub struct JobStatusInput {
    #[serde(alias = "job_status")]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobQuery {
    /// Only the jobs of this service request
    pub request_id: Option<i64>,
}

#[api_model(response)]
pub struct JobResponse {
    pub message: &'static str,
    pub job: JobDetails,
}

#[api_model(response)]
pub struct JobList {
    pub message: &'static str,
    pub jobs: Vec<JobDetails>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub request_id: i64,
    pub assigned_employee: Option<i64>,
    pub labor_cost: f64,
    pub notes: Option<String>,
}

impl JobInput {
    /// # Errors
    ///
    /// "request_id is required" or a negative labor cost.
    pub fn into_new(self) -> Result<NewJob, WorkshopError> {
        Ok(NewJob {
            request_id: required_id(self.request_id.as_ref(), "request_id is required")?,
            assigned_employee: present(self.assigned_employee.as_ref())
                .map(|id| id.as_i64().unwrap_or(crate::input::UNKNOWN_ID)),
            labor_cost: labor_cost(self.labor_cost.as_ref())?.unwrap_or(0.0),
            notes: trimmed(self.notes.as_deref()),
        })
    }
}

impl JobStatusInput {
    /// # Errors
    ///
    /// "Status is required", or the list of valid statuses.
    pub fn into_status(self) -> Result<JobStatus, WorkshopError> {
        let status = trimmed(self.status.as_deref()).ok_or_else(|| WorkshopError::invalid("Status is required"))?;
        status.parse().map_err(|_| WorkshopError::Validation {
            message: format!("Invalid status. Must be one of: {}", JobStatus::choices()).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn job() -> ServiceJob {
        ServiceJob {
            job_id: 1,
            request_id: 1,
            assigned_employee: None,
            job_status: JobStatus::Pending,
            labor_cost: 0.0,
            start_time: None,
            end_time: None,
            notes: None,
        }
    }

    #[test]
    fn starting_keeps_an_earlier_start() {
        let now = Utc::now();
        let earlier = now - TimeDelta::hours(2);

        assert_eq!(job().stamps_for(JobStatus::InProgress, now), (Some(now), None));
        let started = ServiceJob { start_time: Some(earlier), ..job() };
        assert_eq!(started.stamps_for(JobStatus::InProgress, now), (Some(earlier), None));
        assert_eq!(started.stamps_for(JobStatus::Completed, now), (Some(earlier), Some(now)));
        assert_eq!(job().stamps_for(JobStatus::Completed, now), (Some(now), Some(now)));
        assert_eq!(job().stamps_for(JobStatus::Pending, now), (None, None));
    }

    #[test]
    fn status_input_lists_choices() {
        let err = JobStatusInput { status: Some("Cancelled".into()) }.into_status().expect_err("jobs cannot cancel");
        assert_eq!(err.to_string(), "Invalid status. Must be one of: Pending, In Progress, Completed");
        assert_eq!(JobStatusInput { status: None }.into_status().expect_err("missing").to_string(), "Status is required");
    }

    #[test]
    fn new_job_defaults() {
        let input = JobInput { request_id: Some(NumberLike::Int(3)), ..Default::default() };
        let job = input.into_new().expect("valid");
        assert_eq!(job, NewJob { request_id: 3, assigned_employee: None, labor_cost: 0.0, notes: None });
    }
}
