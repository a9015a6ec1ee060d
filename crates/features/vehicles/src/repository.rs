//! SQL for the `vehicles` table.

use crate::error::{VehiclesError, VehiclesErrorExt};
use crate::model::{CheckedVehicle, NewVehicle, Vehicle, VehicleDetails, VehiclePatch};
use autoims_kernel::prelude::{
    Changes, ConstraintViolation, Entity, ResourceGuard, VEHICLES, fetch_all, like_pattern,
};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

const DETAILS: &str = "SELECT v.*, c.name AS customer_name, c.phone AS customer_phone, c.email AS customer_email
     FROM vehicles v LEFT JOIN customers c ON v.customer_id = c.customer_id";

pub fn vehicle_from_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        vehicle_id: row.get("vehicle_id")?,
        plate_no: row.get("plate_no")?,
        brand: row.get("brand")?,
        model: row.get("model")?,
        year: row.get("year")?,
        color: row.get("color")?,
        customer_id: row.get("customer_id")?,
        created_at: row.get("created_at")?,
    })
}

/// Row of a vehicle list: owner name and phone, no email.
pub fn listed_from_row(row: &Row<'_>) -> rusqlite::Result<VehicleDetails> {
    Ok(VehicleDetails {
        vehicle: vehicle_from_row(row)?,
        customer_name: row.get("customer_name")?,
        customer_phone: row.get("customer_phone")?,
        customer_email: None,
    })
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<VehicleDetails> {
    Ok(VehicleDetails { customer_email: row.get("customer_email")?, ..listed_from_row(row)? })
}

/// Filters are exclusive: a search term wins over a customer id.
pub(crate) fn list(
    conn: &Connection,
    search: Option<&str>,
    customer_id: Option<i64>,
) -> Result<Vec<VehicleDetails>, VehiclesError> {
    let rows = match (search, customer_id) {
        (Some(term), _) => fetch_all(
            conn,
            &format!(
                "{DETAILS} WHERE v.plate_no LIKE ?1 ESCAPE '\\' OR v.brand LIKE ?1 ESCAPE '\\'
                 OR v.model LIKE ?1 ESCAPE '\\' ORDER BY v.vehicle_id DESC"
            ),
            [like_pattern(term)],
            listed_from_row,
        ),
        (None, Some(customer_id)) => fetch_all(
            conn,
            &format!("{DETAILS} WHERE v.customer_id = ?1 ORDER BY v.vehicle_id DESC"),
            [customer_id],
            listed_from_row,
        ),
        (None, None) => {
            fetch_all(conn, &format!("{DETAILS} ORDER BY v.vehicle_id DESC"), [], listed_from_row)
        },
    };
    rows.context("Listing vehicles")
}

/// Vehicles of one customer, newest first; the customer must exist.
pub(crate) fn for_customer(conn: &Connection, customer_id: i64) -> Result<Vec<VehicleDetails>, VehiclesError> {
    ensure_customer(conn, customer_id)?;
    list(conn, None, Some(customer_id))
}

pub(crate) fn get(conn: &Connection, vehicle_id: i64) -> Result<VehicleDetails, VehiclesError> {
    conn.query_row(&format!("{DETAILS} WHERE v.vehicle_id = ?1"), [vehicle_id], details_from_row)
        .optional()
        .context("Loading vehicle")?
        .ok_or(VehiclesError::NotFound)
}

pub(crate) fn by_plate(conn: &Connection, plate_no: &str) -> Result<VehicleDetails, VehiclesError> {
    conn.query_row(&format!("{DETAILS} WHERE v.plate_no = ?1"), [plate_no], details_from_row)
        .optional()
        .context("Loading vehicle by plate")?
        .ok_or(VehiclesError::NotFound)
}

fn ensure_customer(conn: &Connection, customer_id: i64) -> Result<(), VehiclesError> {
    if ResourceGuard::exists(conn, Entity::Customer, customer_id)? {
        Ok(())
    } else {
        Err(VehiclesError::CustomerNotFound)
    }
}

/// Plain insert, shared with flows that register a vehicle inside their own transaction.
///
/// # Errors
///
/// SQLite failures, including a UNIQUE violation on the plate.
pub fn insert(conn: &Connection, vehicle: &NewVehicle) -> rusqlite::Result<Vehicle> {
    conn.query_row(
        "INSERT INTO vehicles (plate_no, brand, model, year, color, customer_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING *",
        params![
            vehicle.plate_no,
            vehicle.brand,
            vehicle.model,
            vehicle.year,
            vehicle.color,
            vehicle.customer_id,
            Utc::now()
        ],
        vehicle_from_row,
    )
}

/// Customer first, then the year, then the insert itself.
pub(crate) fn register(conn: &Connection, checked: CheckedVehicle) -> Result<VehicleDetails, VehiclesError> {
    ensure_customer(conn, checked.customer_id)?;
    let vehicle = checked.resolve_year()?;
    create(conn, &vehicle)
}

pub(crate) fn create(conn: &Connection, vehicle: &NewVehicle) -> Result<VehicleDetails, VehiclesError> {
    let created = insert(conn, vehicle).map_err(|err| conflict_or(err, "Creating vehicle"))?;
    get(conn, created.vehicle_id)
}

pub(crate) fn update(
    conn: &Connection,
    vehicle_id: i64,
    patch: VehiclePatch,
) -> Result<VehicleDetails, VehiclesError> {
    if !ResourceGuard::exists(conn, Entity::Vehicle, vehicle_id)? {
        return Err(VehiclesError::NotFound);
    }
    if let Some(customer_id) = patch.customer_id {
        ensure_customer(conn, customer_id)?;
    }

    let changes = Changes::new()
        .set_opt("plate_no", patch.plate_no)
        .set_opt("brand", patch.brand)
        .set_opt("model", patch.model)
        .set_opt("year", patch.year)
        .set_opt("color", patch.color)
        .set_opt("customer_id", patch.customer_id);
    changes
        .apply(conn, VEHICLES, "vehicle_id", vehicle_id, vehicle_from_row)
        .map_err(|err| conflict_or(err, "Updating vehicle"))?;
    get(conn, vehicle_id)
}

/// Service requests reference vehicles with `ON DELETE RESTRICT`.
pub(crate) fn delete(conn: &Connection, vehicle_id: i64) -> Result<(), VehiclesError> {
    match conn.execute("DELETE FROM vehicles WHERE vehicle_id = ?1", [vehicle_id]) {
        Ok(0) => Err(VehiclesError::NotFound),
        Ok(_) => Ok(()),
        Err(err) if err.is_foreign_key_violation() => Err(VehiclesError::HasServiceRequests),
        Err(err) => Err(err).context("Deleting vehicle"),
    }
}

fn conflict_or(err: rusqlite::Error, context: &'static str) -> VehiclesError {
    if err.is_unique_violation() {
        VehiclesError::DuplicatePlate
    } else {
        VehiclesError::Sqlite { source: err, context: Some(context.into()) }
    }
}
