use crate::error::VehiclesError;
use autoims_kernel::prelude::{NumberLike, api_model, trimmed};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

#[api_model(response)]
#[derive(Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub plate_no: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
}

#[api_model(response)]
/// A vehicle with its owner's contact details
#[derive(Clone, PartialEq, Eq)]
pub struct VehicleDetails {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

#[api_model(request)]
/// Vehicle fields; all required on create, any subset on update
#[derive(Default)]
pub struct VehicleInput {
    pub plate_no: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<NumberLike>,
    pub color: Option<String>,
    pub customer_id: Option<NumberLike>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VehicleQuery {
    /// Match on plate, brand or model
    pub search: Option<String>,
    /// Only this customer's vehicles; blank is ignored
    pub customer_id: Option<String>,
}

impl VehicleQuery {
    /// Customer filter; a value that is not a number matches nothing.
    #[must_use]
    pub fn customer(&self) -> Option<i64> {
        let raw = self.customer_id.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        Some(raw.parse().unwrap_or(UNKNOWN_ID))
    }
}

#[api_model(response)]
pub struct VehicleResponse {
    pub message: &'static str,
    pub vehicle: VehicleDetails,
}

#[api_model(response)]
pub struct VehicleList {
    pub message: &'static str,
    pub vehicles: Vec<VehicleDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub plate_no: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    pub customer_id: i64,
}

/// Fields that survived validation on a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehiclePatch {
    pub plate_no: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub color: Option<String>,
    pub customer_id: Option<i64>,
}

/// `Some` when the value is present at all, even if it is not a usable number.
fn present(value: Option<&NumberLike>) -> Option<&NumberLike> {
    value.filter(|v| !matches!(v, NumberLike::Text(text) if text.trim().is_empty()))
}

/// Ids that are not whole numbers can never match a row.
const UNKNOWN_ID: i64 = -1;

/// Vehicle input that passed the presence checks.
///
/// The customer lookup sits between presence and the year parse, so the
/// year stays raw until [`Self::resolve_year`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedVehicle {
    pub plate_no: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub customer_id: i64,
    year: NumberLike,
}

impl CheckedVehicle {
    /// # Errors
    ///
    /// [`VehiclesError::Validation`] "Invalid year value".
    pub fn resolve_year(self) -> Result<NewVehicle, VehiclesError> {
        let year = self.year.as_i64().ok_or_else(|| VehiclesError::invalid("Invalid year value"))?;
        Ok(NewVehicle {
            plate_no: self.plate_no,
            brand: self.brand,
            model: self.model,
            year,
            color: self.color,
            customer_id: self.customer_id,
        })
    }
}

impl VehicleInput {
    /// Presence checks in order: plate, brand, model, year, color, customer.
    ///
    /// # Errors
    ///
    /// [`VehiclesError::Validation`] naming the first missing field.
    pub fn check_required(self) -> Result<CheckedVehicle, VehiclesError> {
        let required = |value: Option<&str>, message| trimmed(value).ok_or_else(|| VehiclesError::invalid(message));

        let plate_no = required(self.plate_no.as_deref(), "Plate number is required")?;
        let brand = required(self.brand.as_deref(), "Brand is required")?;
        let model = required(self.model.as_deref(), "Model is required")?;
        let year = present(self.year.as_ref()).cloned().ok_or_else(|| VehiclesError::invalid("Year is required"))?;
        let color = required(self.color.as_deref(), "Color is required")?;
        let customer_id = present(self.customer_id.as_ref())
            .ok_or_else(|| VehiclesError::invalid("Customer ID is required"))?
            .as_i64()
            .unwrap_or(UNKNOWN_ID);

        Ok(CheckedVehicle { plate_no, brand, model, color, customer_id, year })
    }

    /// Validates the present fields of a partial update.
    ///
    /// # Errors
    ///
    /// "Invalid year value" for a year that is not a whole number.
    pub fn into_patch(self) -> Result<VehiclePatch, VehiclesError> {
        let year = present(self.year.as_ref())
            .map(|year| year.as_i64().ok_or_else(|| VehiclesError::invalid("Invalid year value")))
            .transpose()?;
        Ok(VehiclePatch {
            plate_no: trimmed(self.plate_no.as_deref()),
            brand: trimmed(self.brand.as_deref()),
            model: trimmed(self.model.as_deref()),
            year,
            color: trimmed(self.color.as_deref()),
            customer_id: present(self.customer_id.as_ref()).map(|id| id.as_i64().unwrap_or(UNKNOWN_ID)),
        })
    }
}
