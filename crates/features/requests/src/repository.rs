//! SQL for the `service_requests` table.

use crate::error::{RequestsError, RequestsErrorExt};
use crate::model::{
    AssignedEmployee, NewRequest, Origin, RequestDraft, RequestFilter, RequestPatch, ServiceRequest,
    ServiceRequestDetails,
};
use autoims_kernel::prelude::{
    Changes, ConstraintViolation, Entity, RequestStatus, ResourceGuard, SERVICE_REQUESTS, fetch_all,
    like_pattern, parse_column,
};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

const DETAILS: &str = "SELECT sr.*,
            v.plate_no, v.brand AS vehicle_brand, v.model AS vehicle_model,
            v.year AS vehicle_year, v.color AS vehicle_color,
            c.customer_id, c.name AS customer_name, c.phone AS customer_phone,
            c.email AS customer_email, c.address AS customer_address
     FROM service_requests sr
     LEFT JOIN vehicles v ON sr.vehicle_id = v.vehicle_id
     LEFT JOIN customers c ON v.customer_id = c.customer_id";

const NEWEST_FIRST: &str = "ORDER BY sr.request_date DESC, sr.request_id DESC";

pub fn request_from_row(row: &Row<'_>) -> rusqlite::Result<ServiceRequest> {
    Ok(ServiceRequest {
        request_id: row.get("request_id")?,
        vehicle_id: row.get("vehicle_id")?,
        service_type: row.get("service_type")?,
        problem_note: row.get("problem_note")?,
        priority: row.get("priority")?,
        status: parse_column(row, "status")?,
        request_date: row.get("request_date")?,
    })
}

pub fn details_from_row(row: &Row<'_>) -> rusqlite::Result<ServiceRequestDetails> {
    Ok(ServiceRequestDetails {
        request: request_from_row(row)?,
        plate_no: row.get("plate_no")?,
        vehicle_brand: row.get("vehicle_brand")?,
        vehicle_model: row.get("vehicle_model")?,
        vehicle_year: row.get("vehicle_year")?,
        vehicle_color: row.get("vehicle_color")?,
        customer_id: row.get("customer_id")?,
        customer_name: row.get("customer_name")?,
        customer_phone: row.get("customer_phone")?,
        customer_email: row.get("customer_email")?,
        customer_address: row.get("customer_address")?,
        employees: None,
    })
}

pub(crate) fn list(conn: &Connection, filter: RequestFilter) -> Result<Vec<ServiceRequestDetails>, RequestsError> {
    let rows = match &filter {
        RequestFilter::Status(status) => fetch_all(
            conn,
            &format!("{DETAILS} WHERE sr.status = ?1 {NEWEST_FIRST}"),
            [status],
            details_from_row,
        ),
        RequestFilter::Search(term) => fetch_all(
            conn,
            &format!(
                "{DETAILS} WHERE c.name LIKE ?1 ESCAPE '\\' OR v.plate_no LIKE ?1 ESCAPE '\\'
                 OR sr.service_type LIKE ?1 ESCAPE '\\' {NEWEST_FIRST}"
            ),
            [like_pattern(term)],
            details_from_row,
        ),
        RequestFilter::Customer(customer_id) => fetch_all(
            conn,
            &format!("{DETAILS} WHERE v.customer_id = ?1 {NEWEST_FIRST}"),
            [customer_id],
            details_from_row,
        ),
        RequestFilter::Vehicle(vehicle_id) => fetch_all(
            conn,
            &format!("{DETAILS} WHERE sr.vehicle_id = ?1 {NEWEST_FIRST}"),
            [vehicle_id],
            details_from_row,
        ),
        RequestFilter::WithEmployees | RequestFilter::All => {
            fetch_all(conn, &format!("{DETAILS} {NEWEST_FIRST}"), [], details_from_row)
        },
    };
    let mut requests = rows.context("Listing service requests")?;

    if filter == RequestFilter::WithEmployees {
        for request in &mut requests {
            request.employees = Some(employees_for(conn, request.request.request_id)?);
        }
    }
    Ok(requests)
}

/// Requests of one vehicle; the vehicle must exist.
pub(crate) fn for_vehicle(conn: &Connection, vehicle_id: i64) -> Result<Vec<ServiceRequestDetails>, RequestsError> {
    ensure_vehicle(conn, vehicle_id)?;
    list(conn, RequestFilter::Vehicle(vehicle_id))
}

pub(crate) fn get(
    conn: &Connection,
    request_id: i64,
    with_employees: bool,
) -> Result<ServiceRequestDetails, RequestsError> {
    let mut request = conn
        .query_row(&format!("{DETAILS} WHERE sr.request_id = ?1"), [request_id], details_from_row)
        .optional()
        .context("Loading service request")?
        .ok_or(RequestsError::NotFound)?;
    if with_employees {
        request.employees = Some(employees_for(conn, request_id)?);
    }
    Ok(request)
}

/// Distinct employees assigned to any job of the request.
fn employees_for(conn: &Connection, request_id: i64) -> Result<Vec<AssignedEmployee>, RequestsError> {
    fetch_all(
        conn,
        "SELECT DISTINCT e.id AS employee_id, e.name AS employee_name, e.position AS role
         FROM service_jobs sj JOIN employees e ON sj.assigned_employee = e.id
         WHERE sj.request_id = ?1 ORDER BY e.id",
        [request_id],
        |row| {
            Ok(AssignedEmployee {
                employee_id: row.get("employee_id")?,
                employee_name: row.get("employee_name")?,
                role: row.get("role")?,
            })
        },
    )
    .context("Loading assigned employees")
}

fn ensure_vehicle(conn: &Connection, vehicle_id: i64) -> Result<(), RequestsError> {
    if ResourceGuard::exists(conn, Entity::Vehicle, vehicle_id)? {
        Ok(())
    } else {
        Err(RequestsError::VehicleNotFound)
    }
}

/// # Errors
///
/// SQLite failures, including a foreign key violation for an unknown vehicle.
pub fn insert(conn: &Connection, request: &NewRequest) -> rusqlite::Result<ServiceRequest> {
    conn.query_row(
        "INSERT INTO service_requests (vehicle_id, service_type, problem_note, priority, status, request_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING *",
        params![
            request.vehicle_id,
            request.service_type,
            request.problem_note,
            request.priority,
            request.status.as_str(),
            Utc::now().date_naive()
        ],
        request_from_row,
    )
}

/// Resolves the vehicle, creating a walk-in customer and vehicle when
/// needed, then inserts the request. Everything commits together.
pub(crate) fn create(conn: &mut Connection, draft: RequestDraft) -> Result<ServiceRequestDetails, RequestsError> {
    let tx = conn.transaction().context("Starting service request transaction")?;

    let vehicle_id = match draft.origin {
        Origin::Existing(vehicle_id) => {
            ensure_vehicle(&tx, vehicle_id)?;
            vehicle_id
        },
        Origin::WalkIn { customer, mut vehicle } => {
            let customer = autoims_customers::repository::insert(&tx, &customer)
                .map_err(|err| conflict_or(err, "Creating walk-in customer"))?;
            vehicle.customer_id = customer.customer_id;
            autoims_vehicles::repository::insert(&tx, &vehicle)
                .map_err(|err| conflict_or(err, "Creating walk-in vehicle"))?
                .vehicle_id
        },
    };

    let service_type = draft.service_type.ok_or_else(|| RequestsError::invalid("service_type is required"))?;
    let request = NewRequest {
        vehicle_id,
        service_type,
        problem_note: draft.problem_note,
        priority: draft.priority,
        status: draft.status,
    };
    let created = insert(&tx, &request).map_err(|err| conflict_or(err, "Creating service request"))?;
    let details = get(&tx, created.request_id, false)?;

    tx.commit().context("Committing service request")?;
    Ok(details)
}

pub(crate) fn update(
    conn: &Connection,
    request_id: i64,
    patch: RequestPatch,
) -> Result<ServiceRequestDetails, RequestsError> {
    if !ResourceGuard::exists(conn, Entity::ServiceRequest, request_id)? {
        return Err(RequestsError::NotFound);
    }
    if let Some(vehicle_id) = patch.vehicle_id {
        ensure_vehicle(conn, vehicle_id)?;
    }

    Changes::new()
        .set_opt("service_type", patch.service_type)
        .set_opt("problem_note", patch.problem_note)
        .set_opt("priority", patch.priority)
        .set_opt("status", patch.status.map(RequestStatus::as_str))
        .set_opt("vehicle_id", patch.vehicle_id)
        .apply(conn, SERVICE_REQUESTS, "request_id", request_id, request_from_row)
        .context("Updating service request")?;
    get(conn, request_id, false)
}

pub(crate) fn set_status(
    conn: &Connection,
    request_id: i64,
    status: RequestStatus,
) -> Result<ServiceRequestDetails, RequestsError> {
    let updated = conn
        .execute("UPDATE service_requests SET status = ?1 WHERE request_id = ?2", params![status.as_str(), request_id])
        .context("Updating service request status")?;
    if updated == 0 {
        return Err(RequestsError::NotFound);
    }
    get(conn, request_id, false)
}

/// Service jobs reference requests with `ON DELETE RESTRICT`.
pub(crate) fn delete(conn: &Connection, request_id: i64) -> Result<(), RequestsError> {
    match conn.execute("DELETE FROM service_requests WHERE request_id = ?1", [request_id]) {
        Ok(0) => Err(RequestsError::NotFound),
        Ok(_) => Ok(()),
        Err(err) if err.is_foreign_key_violation() => Err(RequestsError::HasJobs),
        Err(err) => Err(err).context("Deleting service request"),
    }
}

fn conflict_or(err: rusqlite::Error, context: &'static str) -> RequestsError {
    if err.is_unique_violation() {
        RequestsError::Duplicate
    } else {
        RequestsError::Sqlite { source: err, context: Some(context.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoims_customers::NewCustomer;
    use autoims_vehicles::NewVehicle;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("memory db");
        conn.pragma_update(None, "foreign_keys", true).expect("fk");
        let migrations =
            autoims_customers::MIGRATIONS.iter().chain(autoims_vehicles::MIGRATIONS).chain(crate::MIGRATIONS);
        for migration in migrations {
            conn.execute_batch(migration.script).expect("migrate");
        }
        conn
    }

    fn customer(phone: &str) -> NewCustomer {
        NewCustomer {
            name: format!("Client {phone}"),
            phone: phone.to_owned(),
            email: format!("{phone}@garage.test"),
            address: "1 Main St".to_owned(),
        }
    }

    fn vehicle(plate: &str) -> NewVehicle {
        NewVehicle {
            plate_no: plate.to_owned(),
            brand: "Toyota".to_owned(),
            model: "Corolla".to_owned(),
            year: 2022,
            color: "White".to_owned(),
            customer_id: -1,
        }
    }

    fn seeded_vehicle(conn: &Connection, phone: &str, plate: &str) -> i64 {
        let owner = autoims_customers::repository::insert(conn, &customer(phone)).expect("customer");
        let vehicle = NewVehicle { customer_id: owner.customer_id, ..vehicle(plate) };
        autoims_vehicles::repository::insert(conn, &vehicle).expect("vehicle").vehicle_id
    }

    fn draft(origin: Origin, service_type: Option<&str>) -> RequestDraft {
        RequestDraft {
            origin,
            service_type: service_type.map(ToOwned::to_owned),
            problem_note: None,
            priority: "Normal".to_owned(),
            status: RequestStatus::Pending,
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0)).expect("count")
    }

    #[test]
    fn request_for_existing_vehicle_joins_owner() {
        let mut conn = conn();
        let vehicle_id = seeded_vehicle(&conn, "555-0001", "AB-1");

        let created = create(&mut conn, draft(Origin::Existing(vehicle_id), Some("Oil change"))).expect("create");
        assert_eq!(created.request.status, RequestStatus::Pending);
        assert_eq!(created.request.request_date, Utc::now().date_naive());
        assert_eq!(created.plate_no.as_deref(), Some("AB-1"));
        assert_eq!(created.customer_name.as_deref(), Some("Client 555-0001"));
        assert!(created.employees.is_none());
    }

    #[test]
    fn unknown_vehicle_is_checked_before_service_type() {
        let mut conn = conn();
        let err = create(&mut conn, draft(Origin::Existing(42), None)).expect_err("no vehicle");
        assert!(matches!(err, RequestsError::VehicleNotFound));

        let vehicle_id = seeded_vehicle(&conn, "555-0001", "AB-1");
        let err = create(&mut conn, draft(Origin::Existing(vehicle_id), None)).expect_err("no type");
        assert_eq!(err.to_string(), "service_type is required");
    }

    #[test]
    fn walk_in_is_all_or_nothing() {
        let mut conn = conn();
        let walk_in = || Origin::WalkIn { customer: customer("555-0009"), vehicle: vehicle("NEW-1") };

        let err = create(&mut conn, draft(walk_in(), None)).expect_err("missing type");
        assert_eq!(err.to_string(), "service_type is required");
        assert_eq!(count(&conn, "customers"), 0);
        assert_eq!(count(&conn, "vehicles"), 0);

        let created = create(&mut conn, draft(walk_in(), Some("Engine Repair"))).expect("walk-in");
        assert_eq!(created.customer_phone.as_deref(), Some("555-0009"));
        assert_eq!(created.plate_no.as_deref(), Some("NEW-1"));

        let err = create(&mut conn, draft(walk_in(), Some("Engine Repair"))).expect_err("same phone");
        assert!(matches!(err, RequestsError::Duplicate));
        assert_eq!(count(&conn, "service_requests"), 1);
    }

    #[test]
    fn filters_and_status_changes() {
        let mut conn = conn();
        let corolla = seeded_vehicle(&conn, "555-0001", "AB-1");
        let civic = seeded_vehicle(&conn, "555-0002", "CD-2");
        let first = create(&mut conn, draft(Origin::Existing(corolla), Some("Brakes"))).expect("first");
        create(&mut conn, draft(Origin::Existing(civic), Some("Oil change"))).expect("second");

        let moved = set_status(&conn, first.request.request_id, RequestStatus::InProgress).expect("status");
        assert_eq!(moved.request.status, RequestStatus::InProgress);

        let ids = |found: Vec<ServiceRequestDetails>| found.into_iter().map(|r| r.request.vehicle_id).collect::<Vec<_>>();
        assert_eq!(ids(list(&conn, RequestFilter::Status("In Progress".into())).expect("status")), [corolla]);
        assert_eq!(ids(list(&conn, RequestFilter::Search("cd-".into())).expect("plate")), [civic]);
        assert_eq!(ids(list(&conn, RequestFilter::All).expect("all")), [civic, corolla]);
        assert_eq!(ids(for_vehicle(&conn, corolla).expect("vehicle")), [corolla]);
        assert!(matches!(for_vehicle(&conn, 999), Err(RequestsError::VehicleNotFound)));
        assert!(matches!(set_status(&conn, 999, RequestStatus::Completed), Err(RequestsError::NotFound)));
    }

    #[test]
    fn partial_update_and_delete() {
        let mut conn = conn();
        let corolla = seeded_vehicle(&conn, "555-0001", "AB-1");
        let created = create(&mut conn, draft(Origin::Existing(corolla), Some("Brakes"))).expect("create");
        let id = created.request.request_id;

        let patch = RequestPatch { priority: Some("High".into()), ..Default::default() };
        let updated = update(&conn, id, patch).expect("update");
        assert_eq!(updated.request.priority, "High");
        assert_eq!(updated.request.service_type, "Brakes");

        let patch = RequestPatch { vehicle_id: Some(999), ..Default::default() };
        assert!(matches!(update(&conn, id, patch), Err(RequestsError::VehicleNotFound)));

        delete(&conn, id).expect("delete");
        assert!(matches!(delete(&conn, id), Err(RequestsError::NotFound)));
    }
}
