use crate::error::WorkforceError;
use autoims_kernel::prelude::{NumberLike, WorkingStatus, api_model, trimmed};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub salary: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "Working"))]
    pub working_status: WorkingStatus,
    pub rating: f64,
    pub jobs_done: i64,
    pub created_at: DateTime<Utc>,
}

#[api_model(request)]
/// Employee fields. `employeeName` and `role` stand in for `name` and
/// `position`; status and job count also accept camelCase.
#[derive(Default)]
pub struct EmployeeInput {
    pub name: Option<String>,
    #[serde(rename = "employeeName")]
    pub employee_name: Option<String>,
    pub position: Option<String>,
    pub role: Option<String>,
    pub salary: Option<NumberLike>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "workingStatus")]
    pub working_status: Option<String>,
    pub rating: Option<NumberLike>,
    #[serde(alias = "jobsDone")]
    pub jobs_done: Option<NumberLike>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    /// `true` also lists employees who are not working
    pub include_inactive: Option<String>,
}

impl EmployeeQuery {
    #[must_use]
    pub fn include_inactive(&self) -> bool {
        self.include_inactive.as_deref().is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

#[api_model(response)]
pub struct EmployeeResponse {
    pub message: &'static str,
    pub employee: Employee,
}

#[api_model(response)]
pub struct EmployeeList {
    pub message: &'static str,
    pub employees: Vec<Employee>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub salary: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub working_status: WorkingStatus,
    pub rating: f64,
    pub jobs_done: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub working_status: Option<WorkingStatus>,
    pub rating: Option<f64>,
    pub jobs_done: Option<i64>,
}

fn number<T>(value: Option<&NumberLike>, read: impl Fn(&NumberLike) -> Option<T>) -> Result<Option<T>, WorkforceError> {
    value
        .filter(|v| !matches!(v, NumberLike::Text(text) if text.trim().is_empty()))
        .map(|v| read(v).ok_or_else(|| WorkforceError::invalid("Invalid numeric values")))
        .transpose()
}

fn status(value: Option<&str>) -> Result<Option<WorkingStatus>, WorkforceError> {
    trimmed(value).map(|s| s.parse().map_err(|_| WorkforceError::invalid_status())).transpose()
}

impl EmployeeInput {
    fn name(&self) -> Option<String> {
        trimmed(self.name.as_deref()).or_else(|| trimmed(self.employee_name.as_deref()))
    }

    fn position(&self) -> Option<String> {
        trimmed(self.position.as_deref()).or_else(|| trimmed(self.role.as_deref()))
    }

    /// # Errors
    ///
    /// "Name is required", "Position is required", a bad number or an
    /// unknown working status.
    pub fn into_new(self) -> Result<NewEmployee, WorkforceError> {
        let name = self.name().ok_or_else(|| WorkforceError::invalid("Name is required"))?;
        let position = self.position().ok_or_else(|| WorkforceError::invalid("Position is required"))?;

        Ok(NewEmployee {
            name,
            position,
            salary: number(self.salary.as_ref(), NumberLike::as_f64)?.unwrap_or(0.0),
            phone: trimmed(self.phone.as_deref()),
            email: trimmed(self.email.as_deref()),
            working_status: status(self.working_status.as_deref())?.unwrap_or(WorkingStatus::Working),
            rating: number(self.rating.as_ref(), NumberLike::as_f64)?.unwrap_or(0.0),
            jobs_done: number(self.jobs_done.as_ref(), NumberLike::as_i64)?.unwrap_or(0),
        })
    }

    /// # Errors
    ///
    /// A bad number or an unknown working status.
    pub fn into_patch(self) -> Result<EmployeePatch, WorkforceError> {
        Ok(EmployeePatch {
            name: self.name(),
            position: self.position(),
            salary: number(self.salary.as_ref(), NumberLike::as_f64)?,
            phone: trimmed(self.phone.as_deref()),
            email: trimmed(self.email.as_deref()),
            working_status: status(self.working_status.as_deref())?,
            rating: number(self.rating.as_ref(), NumberLike::as_f64)?,
            jobs_done: number(self.jobs_done.as_ref(), NumberLike::as_i64)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fill_name_and_position() {
        let input: EmployeeInput = serde_json::from_value(serde_json::json!({
            "employeeName": " Jane ",
            "role": "Mechanic",
            "workingStatus": "Not Working",
            "jobsDone": "12",
        }))
        .expect("deserialize");

        let employee = input.into_new().expect("valid");
        assert_eq!(employee.name, "Jane");
        assert_eq!(employee.position, "Mechanic");
        assert_eq!(employee.working_status, WorkingStatus::NotWorking);
        assert_eq!(employee.jobs_done, 12);
        assert!(employee.salary.abs() < f64::EPSILON);
    }

    #[test]
    fn name_beats_alias_and_is_required() {
        let input = EmployeeInput {
            name: Some("Ann".into()),
            employee_name: Some("Other".into()),
            position: Some("Manager".into()),
            ..Default::default()
        };
        assert_eq!(input.into_new().expect("valid").name, "Ann");

        let input = EmployeeInput { position: Some("Manager".into()), ..Default::default() };
        assert_eq!(input.into_new().expect_err("name").to_string(), "Name is required");

        let input = EmployeeInput { name: Some("Ann".into()), role: Some(" ".into()), ..Default::default() };
        assert_eq!(input.into_new().expect_err("position").to_string(), "Position is required");
    }

    #[test]
    fn patch_validates_status_and_numbers() {
        let input = EmployeeInput { working_status: Some("Retired".into()), ..Default::default() };
        assert_eq!(
            input.into_patch().expect_err("status").to_string(),
            "Invalid working status. Must be one of: Working, Not Working"
        );

        let input = EmployeeInput { rating: Some(NumberLike::Text("great".into())), ..Default::default() };
        assert_eq!(input.into_patch().expect_err("rating").to_string(), "Invalid numeric values");

        let patch = EmployeeInput { role: Some("Lead".into()), ..Default::default() }.into_patch().expect("patch");
        assert_eq!(patch, EmployeePatch { position: Some("Lead".into()), ..Default::default() });
    }
}
