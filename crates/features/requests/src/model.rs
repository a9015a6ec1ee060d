use crate::error::RequestsError;
use autoims_customers::{CustomerInput, NewCustomer};
use autoims_kernel::prelude::{DEFAULT_PRIORITY, NumberLike, RequestStatus, api_model, trimmed};
use autoims_vehicles::{NewVehicle, VehicleInput};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[api_model(response)]
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub request_id: i64,
    pub vehicle_id: i64,
    pub service_type: String,
    pub problem_note: Option<String>,
    pub priority: String,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "Pending"))]
    pub status: RequestStatus,
    pub request_date: NaiveDate,
}

#[api_model(response)]
#[derive(Clone, PartialEq, Eq)]
pub struct AssignedEmployee {
    pub employee_id: i64,
    pub employee_name: String,
    pub role: String,
}

#[api_model(response)]
/// A request joined with its vehicle and the vehicle's owner
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceRequestDetails {
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub plate_no: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_year: Option<i64>,
    pub vehicle_color: Option<String>,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    /// Present only when employees were asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<AssignedEmployee>>,
}

#[api_model(request)]
/// Either `vehicle_id`, or nested `customer` and `vehicle` for a walk-in
#[derive(Default)]
pub struct RequestInput {
    pub vehicle_id: Option<NumberLike>,
    pub customer: Option<CustomerInput>,
    pub vehicle: Option<VehicleInput>,
    pub service_type: Option<String>,
    pub problem_note: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

#[api_model(request)]
pub struct StatusInput {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestQuery {
    /// Exact status, e.g. `In Progress`
    pub status: Option<String>,
    /// Match on customer name, plate or service type
    pub search: Option<String>,
    /// Blank is ignored; a non-number matches nothing
    pub customer_id: Option<String>,
    pub vehicle_id: Option<String>,
    /// `true` adds the employees assigned to each request's jobs
    pub include_employees: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    pub include_employees: Option<String>,
}

#[api_model(response)]
pub struct RequestResponse {
    pub message: &'static str,
    pub request: ServiceRequestDetails,
}

#[api_model(response)]
pub struct RequestList {
    pub message: &'static str,
    pub requests: Vec<ServiceRequestDetails>,
}

/// Which requests a listing returns. Only one filter applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFilter {
    Status(String),
    Search(String),
    Customer(i64),
    Vehicle(i64),
    WithEmployees,
    All,
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

impl RequestQuery {
    /// First filter present wins: status, search, customer, vehicle, employees.
    #[must_use]
    pub fn into_filter(self) -> RequestFilter {
        let text = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let id = |value: Option<String>| text(value).map(|v| v.trim().parse().unwrap_or(UNKNOWN_ID));

        if let Some(status) = text(self.status) {
            RequestFilter::Status(status)
        } else if let Some(term) = text(self.search) {
            RequestFilter::Search(term)
        } else if let Some(customer_id) = id(self.customer_id) {
            RequestFilter::Customer(customer_id)
        } else if let Some(vehicle_id) = id(self.vehicle_id) {
            RequestFilter::Vehicle(vehicle_id)
        } else if flag(self.include_employees.as_deref()) {
            RequestFilter::WithEmployees
        } else {
            RequestFilter::All
        }
    }
}

impl DetailQuery {
    #[must_use]
    pub fn with_employees(&self) -> bool {
        flag(self.include_employees.as_deref())
    }
}

/// Where the vehicle of a new request comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Existing(i64),
    /// Customer and vehicle are created with the request. The vehicle's
    /// `customer_id` is filled in once the customer row exists.
    WalkIn { customer: NewCustomer, vehicle: NewVehicle },
}

/// A request that passed the checks that need no database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    pub origin: Origin,
    /// Checked after the vehicle is resolved.
    pub service_type: Option<String>,
    pub problem_note: Option<String>,
    pub priority: String,
    pub status: RequestStatus,
}

/// Row values for the `service_requests` insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub vehicle_id: i64,
    pub service_type: String,
    pub problem_note: Option<String>,
    pub priority: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPatch {
    pub vehicle_id: Option<i64>,
    pub service_type: Option<String>,
    pub problem_note: Option<String>,
    pub priority: Option<String>,
    pub status: Option<RequestStatus>,
}

/// Ids that are not whole numbers can never match a row.
const UNKNOWN_ID: i64 = -1;

fn present_id(value: Option<&NumberLike>) -> Option<i64> {
    value
        .filter(|v| !matches!(v, NumberLike::Text(text) if text.trim().is_empty()))
        .map(|id| id.as_i64().unwrap_or(UNKNOWN_ID))
}

/// Parses an optional status; absent stays absent.
///
/// # Errors
///
/// "Invalid status. Must be one of: .." for unknown text.
pub fn parse_status(value: Option<&str>) -> Result<Option<RequestStatus>, RequestsError> {
    value.map(|status| status.parse().map_err(|_| RequestsError::invalid_status())).transpose()
}

fn walk_in(customer: CustomerInput, vehicle: VehicleInput) -> Result<Origin, RequestsError> {
    let customer_fields = (
        trimmed(customer.name.as_deref()),
        trimmed(customer.phone.as_deref()),
        trimmed(customer.email.as_deref()),
        trimmed(customer.address.as_deref()),
    );
    let (Some(name), Some(phone), Some(email), Some(address)) = customer_fields else {
        return Err(RequestsError::invalid("Customer name, phone, email, and address are required"));
    };

    let year = vehicle.year.filter(|v| !matches!(v, NumberLike::Text(text) if text.trim().is_empty()));
    let vehicle_fields = (
        trimmed(vehicle.plate_no.as_deref()),
        trimmed(vehicle.brand.as_deref()),
        trimmed(vehicle.model.as_deref()),
        year,
        trimmed(vehicle.color.as_deref()),
    );
    let (Some(plate_no), Some(brand), Some(model), Some(year), Some(color)) = vehicle_fields else {
        return Err(RequestsError::invalid("Vehicle plate_no, brand, model, year, and color are required"));
    };
    let year = year.as_i64().ok_or_else(|| RequestsError::invalid("Invalid year value"))?;

    Ok(Origin::WalkIn {
        customer: NewCustomer { name, phone, email, address },
        vehicle: NewVehicle { plate_no, brand, model, year, color, customer_id: UNKNOWN_ID },
    })
}

impl RequestInput {
    /// `vehicle_id` wins; nested customer and vehicle are used only without it.
    ///
    /// # Errors
    ///
    /// [`RequestsError::Validation`] for missing nested fields, a missing
    /// vehicle id, or an unknown status.
    pub fn into_draft(self) -> Result<RequestDraft, RequestsError> {
        let origin = match (present_id(self.vehicle_id.as_ref()), self.customer, self.vehicle) {
            (Some(vehicle_id), _, _) => Origin::Existing(vehicle_id),
            (None, Some(customer), Some(vehicle)) => walk_in(customer, vehicle)?,
            (None, _, _) => return Err(RequestsError::invalid("vehicle_id is required")),
        };

        Ok(RequestDraft {
            origin,
            service_type: trimmed(self.service_type.as_deref()),
            problem_note: trimmed(self.problem_note.as_deref()),
            priority: trimmed(self.priority.as_deref()).unwrap_or_else(|| DEFAULT_PRIORITY.to_owned()),
            status: parse_status(self.status.as_deref())?.unwrap_or(RequestStatus::Pending),
        })
    }

    /// # Errors
    ///
    /// An unknown status.
    pub fn into_patch(self) -> Result<RequestPatch, RequestsError> {
        Ok(RequestPatch {
            vehicle_id: present_id(self.vehicle_id.as_ref()),
            service_type: trimmed(self.service_type.as_deref()),
            problem_note: trimmed(self.problem_note.as_deref()),
            priority: trimmed(self.priority.as_deref()),
            status: parse_status(trimmed(self.status.as_deref()).as_deref())?,
        })
    }
}

impl StatusInput {
    /// # Errors
    ///
    /// "Status is required", or the invalid status message.
    pub fn into_status(self) -> Result<RequestStatus, RequestsError> {
        let status =
            self.status.filter(|s| !s.is_empty()).ok_or_else(|| RequestsError::invalid("Status is required"))?;
        parse_status(Some(&status))?.ok_or_else(RequestsError::invalid_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerInput {
        CustomerInput {
            name: Some("John Doe".into()),
            phone: Some("1234567890".into()),
            email: Some("john@example.com".into()),
            address: Some("123 Main St".into()),
        }
    }

    fn vehicle() -> VehicleInput {
        VehicleInput {
            plate_no: Some(" ABC-1234 ".into()),
            brand: Some("Toyota".into()),
            model: Some("Corolla".into()),
            year: Some(NumberLike::Int(2022)),
            color: Some("White".into()),
            customer_id: None,
        }
    }

    #[test]
    fn vehicle_id_wins_over_nested_objects() {
        let input = RequestInput {
            vehicle_id: Some(NumberLike::Text("7".into())),
            customer: Some(CustomerInput::default()),
            vehicle: Some(VehicleInput::default()),
            ..Default::default()
        };
        let draft = input.into_draft().expect("draft");
        assert_eq!(draft.origin, Origin::Existing(7));
        assert_eq!(draft.priority, "Normal");
        assert_eq!(draft.status, RequestStatus::Pending);
    }

    #[test]
    fn walk_in_requires_every_piece() {
        let input = RequestInput {
            customer: Some(CustomerInput { address: None, ..customer() }),
            vehicle: Some(vehicle()),
            ..Default::default()
        };
        assert_eq!(
            input.into_draft().expect_err("address").to_string(),
            "Customer name, phone, email, and address are required"
        );

        let input = RequestInput {
            customer: Some(customer()),
            vehicle: Some(VehicleInput { color: Some("  ".into()), ..vehicle() }),
            ..Default::default()
        };
        assert_eq!(
            input.into_draft().expect_err("color").to_string(),
            "Vehicle plate_no, brand, model, year, and color are required"
        );

        let input = RequestInput { customer: Some(customer()), ..Default::default() };
        assert_eq!(input.into_draft().expect_err("no vehicle").to_string(), "vehicle_id is required");
    }

    #[test]
    fn walk_in_trims_and_parses_year() {
        let input = RequestInput {
            customer: Some(customer()),
            vehicle: Some(VehicleInput { year: Some(NumberLike::Text("2022".into())), ..vehicle() }),
            priority: Some("High".into()),
            ..Default::default()
        };
        let Origin::WalkIn { vehicle, .. } = input.into_draft().expect("draft").origin else {
            panic!("expected a walk-in");
        };
        assert_eq!(vehicle.plate_no, "ABC-1234");
        assert_eq!(vehicle.year, 2022);
    }

    #[test]
    fn status_rules() {
        let missing = StatusInput { status: None }.into_status().expect_err("missing");
        assert_eq!(missing.to_string(), "Status is required");
        assert_eq!(
            StatusInput { status: Some("Done".into()) }.into_status().expect_err("unknown").to_string(),
            "Invalid status. Must be one of: Pending, In Progress, Completed, Cancelled"
        );
        assert_eq!(
            StatusInput { status: Some("In Progress".into()) }.into_status().expect("valid"),
            RequestStatus::InProgress
        );
    }

    #[test]
    fn first_filter_wins() {
        let query = RequestQuery {
            status: Some(String::new()),
            search: Some("corolla".into()),
            vehicle_id: Some("3".into()),
            ..Default::default()
        };
        assert_eq!(query.into_filter(), RequestFilter::Search("corolla".into()));

        let query = RequestQuery { customer_id: Some(" ".into()), vehicle_id: Some("3".into()), ..Default::default() };
        assert_eq!(query.into_filter(), RequestFilter::Vehicle(3));

        let query = RequestQuery { customer_id: Some("abc".into()), ..Default::default() };
        assert_eq!(query.into_filter(), RequestFilter::Customer(UNKNOWN_ID));

        let query = RequestQuery { include_employees: Some("TRUE".into()), ..Default::default() };
        assert_eq!(query.into_filter(), RequestFilter::WithEmployees);
        assert_eq!(RequestQuery::default().into_filter(), RequestFilter::All);
    }
}
